//! Pure simulation logic for Tundra.
//!
//! This crate contains all game logic that is independent of any engine,
//! renderer, or runtime. Functions take plain data and return results, with
//! randomness passed in as `&mut impl rand::Rng`, making them unit-testable
//! and reproducible from a seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`body`] | Body parts and per-part character health |
//! | [`clock`] | World clock, calendar cascade, rollover and respawn events |
//! | [`config`] | Serde configuration with defaults and validation |
//! | [`constants`] | Grid size, path costs, calendar and climate tables, hit odds |
//! | [`geometry`] | 2D vectors and oriented rectangles |
//! | [`grid`] | Fixed-size cell lattice with walkability and occupancy |
//! | [`hitbox`] | Weighted body-part hit resolution for a crossing shot |
//! | [`lighting`] | Ambient light intensity and color over the day |
//! | [`pathfinding`] | 8-connected A* with goal reservation and string-pulling |
//! | [`rasterize`] | Static obstacles onto the grid, path-blocking sight layer |
//! | [`survival`] | Hunger, thirst, tiredness, stamina, body temperature |
//! | [`tasks`] | Delayed actions advanced by the frame clock |
//! | [`weather`] | Daily min/max temperature window and its daily curve |

pub mod body;
pub mod clock;
pub mod config;
pub mod constants;
pub mod geometry;
pub mod grid;
pub mod hitbox;
pub mod lighting;
pub mod pathfinding;
pub mod rasterize;
pub mod survival;
pub mod tasks;
pub mod weather;
