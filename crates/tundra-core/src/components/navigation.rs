//! Navigation agent state for grid-pathing characters.

use serde::{Deserialize, Serialize};
use tundra_logic::geometry::Vec2;

/// Where an agent is in its request → walk → arrive cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavState {
    Idle,
    /// A destination was set; a path is requested on the next update.
    Pending,
    Moving,
    Arrived,
    /// The last request found no path.
    Blocked,
}

/// Path-following agent
///
/// `reserved` is the world position of the tile the pathfinder reserved for
/// this agent. `vacating` holds a previous reservation that is released
/// once the agent is no longer standing on that tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavAgent {
    /// World units per second
    pub speed: f32,
    pub state: NavState,
    pub destination: Option<Vec2>,
    pub waypoints: Vec<Vec2>,
    pub waypoint_index: usize,
    pub reserved: Option<Vec2>,
    pub vacating: Option<Vec2>,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            state: NavState::Idle,
            destination: None,
            waypoints: Vec::new(),
            waypoint_index: 0,
            reserved: None,
            vacating: None,
        }
    }

    /// Request a path to `destination` on the next navigation pass.
    pub fn set_destination(&mut self, destination: Vec2) {
        self.destination = Some(destination);
        self.state = NavState::Pending;
    }

    /// Next waypoint to walk toward, if any.
    pub fn current_waypoint(&self) -> Option<Vec2> {
        self.waypoints.get(self.waypoint_index).copied()
    }

    /// Follow a freshly found path.
    pub fn follow(&mut self, waypoints: Vec<Vec2>) {
        self.waypoints = waypoints;
        self.waypoint_index = 0;
        self.state = if self.waypoints.is_empty() {
            NavState::Arrived
        } else {
            NavState::Moving
        };
    }

    /// Drop the current path and destination.
    pub fn stop(&mut self) {
        self.waypoints.clear();
        self.waypoint_index = 0;
        self.destination = None;
        self.state = NavState::Idle;
    }

    pub fn is_moving(&self) -> bool {
        self.state == NavState::Moving
    }
}
