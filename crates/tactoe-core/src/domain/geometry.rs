//! 2-D points and the current/target motion pair shared by every animated
//! entity (cards, placed markers, the optimistic ghost marker).

use serde::{Deserialize, Serialize};

/// A point (or offset) in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The origin, also the default spawn point for new cards.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Current and target visual state of one animated entity.
///
/// The `current_*` fields are crate-private: outside this crate only the
/// [`crate::AnimationDriver`] can move them, so layout code in other crates
/// can retarget an entity but never teleport it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub(crate) current: Vec2,
    pub(crate) target: Vec2,
    pub(crate) current_scale: f32,
    pub(crate) target_scale: f32,
}

impl Motion {
    /// Creates a motion at rest at `position` with scale `1.0`.
    pub fn at(position: Vec2) -> Self {
        Self::with_scale(position, 1.0)
    }

    /// Creates a motion at rest at `position` with the given scale.
    pub fn with_scale(position: Vec2, scale: f32) -> Self {
        Self {
            current: position,
            target: position,
            current_scale: scale,
            target_scale: scale,
        }
    }

    /// Where the entity is drawn right now.
    pub fn current(&self) -> Vec2 {
        self.current
    }

    /// Where the entity is heading.
    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// The scale the entity is drawn at right now.
    pub fn scale(&self) -> f32 {
        self.current_scale
    }

    /// The scale the entity is heading toward.
    pub fn target_scale(&self) -> f32 {
        self.target_scale
    }

    /// Sets a new target position.  The current position is untouched.
    pub fn retarget(&mut self, target: Vec2) {
        self.target = target;
    }

    /// Sets a new target scale.  The current scale is untouched.
    pub fn rescale(&mut self, target_scale: f32) {
        self.target_scale = target_scale;
    }

    /// Remaining distance between current and target position.
    pub fn distance_to_target(&self) -> f32 {
        self.current.distance(self.target)
    }

    /// `true` when current position and scale exactly equal their targets.
    pub fn is_settled(&self) -> bool {
        self.current == self.target && self.current_scale == self.target_scale
    }

    /// Jumps current and target to `position`.
    ///
    /// Crate-private: used when geometry is rebuilt (a resize must not send
    /// placed markers on a trip across the screen).
    pub(crate) fn snap_to(&mut self, position: Vec2) {
        self.current = position;
        self.target = position;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
