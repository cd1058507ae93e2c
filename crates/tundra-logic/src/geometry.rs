//! Planar geometry shared by the grid, rasterizer and line-of-sight checks.
//!
//! World space is a 2D plane measured in world units; rotations are in
//! degrees, counter-clockwise, matching how obstacle transforms are authored.

use serde::{Deserialize, Serialize};

/// 2D world-space vector.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Rotate around the origin by `degrees` (counter-clockwise).
    pub fn rotated(&self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Step toward `target` by at most `max_step`, never overshooting.
    pub fn move_towards(&self, target: Self, max_step: f32) -> Self {
        let delta = target - *self;
        let dist = delta.length();
        if dist <= max_step || dist == 0.0 {
            target
        } else {
            *self + delta * (max_step / dist)
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// A rectangle described by a transform: center, rotation and full size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrientedRect {
    pub center: Vec2,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f32,
    /// Full width/height (the transform's scale).
    pub size: Vec2,
}

impl OrientedRect {
    pub fn new(center: Vec2, rotation: f32, size: Vec2) -> Self {
        Self {
            center,
            rotation,
            size,
        }
    }

    /// The four world-space corners, rotation applied.
    pub fn corners(&self) -> [Vec2; 4] {
        let hw = self.size.x / 2.0;
        let hh = self.size.y / 2.0;
        [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
        .map(|c| self.center + c.rotated(self.rotation))
    }

    /// Whether the segment `a`→`b` touches the rectangle.
    ///
    /// The segment is moved into the rectangle's local frame and clipped
    /// against the axis-aligned slabs there.
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        let la = (a - self.center).rotated(-self.rotation);
        let lb = (b - self.center).rotated(-self.rotation);
        let hw = self.size.x / 2.0;
        let hh = self.size.y / 2.0;

        let d = lb - la;
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;

        for (origin, dir, half) in [(la.x, d.x, hw), (la.y, d.y, hh)] {
            if dir.abs() < f32::EPSILON {
                if origin < -half || origin > half {
                    return false;
                }
                continue;
            }
            let mut t0 = (-half - origin) / dir;
            let mut t1 = (half - origin) / dir;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

/// Linear interpolation from `a` to `b`; `t` is clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Inverse of `lerp`: where `value` sits between `a` and `b`, clamped.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}
