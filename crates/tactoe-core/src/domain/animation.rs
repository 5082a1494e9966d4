//! Per-frame easing of every animated entity toward its target.
//!
//! Each tick moves the current position a fixed fraction of the remaining
//! distance (exponential ease-out).  Once both axes are within `epsilon` of
//! the target the position snaps onto it, so motion always terminates and
//! post-snap ticks are no-ops.

use serde::{Deserialize, Serialize};

use crate::domain::board::{Board, Marker};
use crate::domain::geometry::Motion;
use crate::domain::hand::Hand;

/// Default share of the remaining distance covered per tick.
pub const DEFAULT_FRACTION: f32 = 0.1;

/// Default snap threshold for positions, in screen units.
pub const DEFAULT_EPSILON: f32 = 0.5;

/// Default snap threshold for scales.
pub const DEFAULT_SCALE_EPSILON: f32 = 0.005;

/// Moves current visual state toward target state, once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationDriver {
    /// Share of the remaining distance covered per tick, in `(0, 1]`.
    pub fraction: f32,
    /// Per-axis snap threshold for positions.
    pub epsilon: f32,
    /// Snap threshold for scales.
    pub scale_epsilon: f32,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_FRACTION,
            epsilon: DEFAULT_EPSILON,
            scale_epsilon: DEFAULT_SCALE_EPSILON,
        }
    }
}

impl AnimationDriver {
    /// Builds a driver, falling back to the defaults for out-of-range values.
    pub fn new(fraction: f32, epsilon: f32) -> Self {
        let defaults = Self::default();
        Self {
            fraction: if fraction > 0.0 && fraction <= 1.0 {
                fraction
            } else {
                defaults.fraction
            },
            epsilon: if epsilon > 0.0 && epsilon.is_finite() {
                epsilon
            } else {
                defaults.epsilon
            },
            scale_epsilon: defaults.scale_epsilon,
        }
    }

    /// Advances one motion by one tick.  Returns `true` if anything moved.
    pub fn step(&self, motion: &mut Motion) -> bool {
        if motion.is_settled() {
            return false;
        }

        let dx = motion.target.x - motion.current.x;
        let dy = motion.target.y - motion.current.y;
        if dx.abs() < self.epsilon && dy.abs() < self.epsilon {
            motion.current = motion.target;
        } else {
            motion.current.x += dx * self.fraction;
            motion.current.y += dy * self.fraction;
        }

        let ds = motion.target_scale - motion.current_scale;
        if ds.abs() < self.scale_epsilon {
            motion.current_scale = motion.target_scale;
        } else {
            motion.current_scale += ds * self.fraction;
        }

        true
    }

    /// Advances every card, every placed marker, and the in-flight ghost
    /// marker by one tick.  Returns `true` if anything moved.
    pub fn tick(&self, board: &mut Board, hand: &mut Hand, ghost: Option<&mut Marker>) -> bool {
        let mut moved = false;
        for motion in hand.motions_mut() {
            moved |= self.step(motion);
        }
        for motion in board.marker_motions_mut() {
            moved |= self.step(motion);
        }
        if let Some(marker) = ghost {
            moved |= self.step(marker.motion_mut());
        }
        moved
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Vec2;

    fn moving(from: Vec2, to: Vec2) -> Motion {
        let mut m = Motion::at(from);
        m.retarget(to);
        m
    }

    #[test]
    fn test_step_moves_fraction_of_distance() {
        let driver = AnimationDriver::default();
        let mut m = moving(Vec2::ZERO, Vec2::new(100.0, 0.0));

        assert!(driver.step(&mut m));

        assert!((m.current().x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_distance_strictly_decreases_until_snap() {
        // Arrange
        let driver = AnimationDriver::default();
        let mut m = moving(Vec2::new(-300.0, 40.0), Vec2::new(500.0, 600.0));
        let mut previous = m.distance_to_target();

        // Act / Assert
        let mut ticks = 0;
        while !m.is_settled() {
            driver.step(&mut m);
            let d = m.distance_to_target();
            assert!(d < previous, "distance did not shrink at tick {ticks}");
            previous = d;
            ticks += 1;
            assert!(ticks < 1000, "motion never converged");
        }
        assert_eq!(m.current(), m.target());
    }

    #[test]
    fn test_step_after_snap_is_noop() {
        let driver = AnimationDriver::default();
        let mut m = moving(Vec2::ZERO, Vec2::new(0.3, 0.2));

        assert!(driver.step(&mut m));
        assert!(m.is_settled());
        let before = m;
        assert!(!driver.step(&mut m));
        assert_eq!(m, before);
    }

    #[test]
    fn test_scale_converges_with_position() {
        let driver = AnimationDriver::default();
        let mut m = Motion::with_scale(Vec2::ZERO, 1.0);
        m.rescale(0.45);

        for _ in 0..200 {
            driver.step(&mut m);
        }

        assert_eq!(m.scale(), 0.45);
        assert!(m.is_settled());
    }

    #[test]
    fn test_new_rejects_out_of_range_parameters() {
        let d = AnimationDriver::new(0.0, -1.0);
        assert_eq!(d, AnimationDriver::default());
        let d = AnimationDriver::new(0.25, 1.0);
        assert_eq!(d.fraction, 0.25);
        assert_eq!(d.epsilon, 1.0);
    }

    #[test]
    fn test_tick_reports_idle_when_everything_settled() {
        let driver = AnimationDriver::default();
        let mut board = Board::new();
        let mut hand = Hand::new();
        assert!(!driver.tick(&mut board, &mut hand, None));
    }

    #[test]
    fn test_tick_moves_ghost_marker() {
        let driver = AnimationDriver::default();
        let mut board = Board::new();
        let mut hand = Hand::new();
        let mut ghost = Marker::new("g.png", Vec2::ZERO, Vec2::new(100.0, 100.0));

        assert!(driver.tick(&mut board, &mut hand, Some(&mut ghost)));
        assert!(ghost.motion().current().x > 0.0);
    }
}
