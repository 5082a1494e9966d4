//! Viewport layout engine.
//!
//! [`compute_layout`] is a pure function from a viewport size to the handful
//! of sizes the rest of the client needs: how big a board slot is, how large
//! cards are drawn, how far apart hand cards sit, and how high the hand
//! floats above the bottom edge.
//!
//! # Layout tiers (for beginners)
//!
//! Instead of scaling everything continuously with the window width (which
//! makes text and artwork shimmer while the user drags the window edge), the
//! viewport width is split into a few *tiers*.  Inside one tier every size is
//! fixed; crossing a breakpoint jumps to the next tier's constants.
//!
//! ```text
//!   width:   0 ─────── 512 ─────── 1024 ─────── 1600 ──────▶
//!   tier:     Compact  │  Medium   │    Wide    │   Ultra
//! ```
//!
//! Breakpoints are closed on the lower bound: a width of exactly `512`
//! belongs to `Medium`, not `Compact`.

use serde::{Deserialize, Serialize};

use crate::domain::geometry::Vec2;

/// Edge length of a board slot at scale `1.0`, in screen units.
pub const BASE_SLOT_SIZE: f32 = 100.0;

/// Width of card artwork at scale `1.0`.
pub const CARD_BASE_WIDTH: f32 = 200.0;

/// Height of card artwork at scale `1.0`.
pub const CARD_BASE_HEIGHT: f32 = 280.0;

/// Hand spacing as a multiple of the scaled card width (a small gap between
/// neighbours when the hand is short).
const HAND_SPACING_FACTOR: f32 = 1.1;

/// How much of a scaled card's height sits above the hand baseline.
const HAND_OFFSET_FACTOR: f32 = 0.6;

/// A viewport width bracket with fixed sizing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LayoutTier {
    /// `width < 512` (phones in portrait).
    Compact,
    /// `512 <= width < 1024`.
    Medium,
    /// `1024 <= width < 1600`.
    Wide,
    /// `width >= 1600`.
    Ultra,
}

impl LayoutTier {
    /// All tiers in ascending width order.
    pub const ALL: [LayoutTier; 4] = [
        LayoutTier::Compact,
        LayoutTier::Medium,
        LayoutTier::Wide,
        LayoutTier::Ultra,
    ];

    /// Returns the tier a viewport width belongs to.
    pub fn for_width(width: f32) -> Self {
        // Walk the tiers from the top; the first lower bound that is met wins.
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|tier| width >= tier.min_width())
            .unwrap_or(LayoutTier::Compact)
    }

    /// Inclusive lower width bound of this tier.
    pub fn min_width(self) -> f32 {
        match self {
            LayoutTier::Compact => 0.0,
            LayoutTier::Medium => 512.0,
            LayoutTier::Wide => 1024.0,
            LayoutTier::Ultra => 1600.0,
        }
    }

    /// Slot size multiplier applied to [`BASE_SLOT_SIZE`].
    ///
    /// Non-decreasing across tiers, so a wider viewport never gets a smaller
    /// board.
    pub fn slot_scale(self) -> f32 {
        match self {
            LayoutTier::Compact => 0.80,
            LayoutTier::Medium => 1.00,
            LayoutTier::Wide => 1.25,
            LayoutTier::Ultra => 1.50,
        }
    }

    /// Card scale applied to card artwork.
    pub fn card_scale(self) -> f32 {
        match self {
            LayoutTier::Compact => 0.35,
            LayoutTier::Medium => 0.45,
            LayoutTier::Wide => 0.55,
            LayoutTier::Ultra => 0.65,
        }
    }
}

/// The size of the drawable area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport, clamping non-finite or non-positive sizes to `1`.
    ///
    /// Window systems report a zero-sized viewport while minimised; clamping
    /// keeps every downstream division and centring well-defined.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
        }
    }

    /// Where the centre of the 3×3 board goes for the given layout.
    ///
    /// Horizontally centred; vertically centred in the area above the hand.
    pub fn board_center(&self, layout: &Layout) -> Vec2 {
        Vec2::new(
            self.width / 2.0,
            (self.height - layout.hand_vertical_offset) / 2.0,
        )
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() && value >= 1.0 {
        value
    } else {
        1.0
    }
}

/// Geometric parameters derived from the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// The tier the viewport fell into.
    pub tier: LayoutTier,
    /// Edge length of one board slot.
    pub slot_size: f32,
    /// Scale applied to card artwork.
    pub card_scale: f32,
    /// Maximum distance between neighbouring hand cards (used while the hand
    /// is short; longer hands decay toward a minimum, see
    /// [`crate::domain::hand`]).
    pub hand_spacing: f32,
    /// Distance from the bottom edge of the viewport to the hand baseline.
    pub hand_vertical_offset: f32,
}

/// Computes the layout for a viewport.
///
/// Pure and deterministic: the same input always yields the same output, so
/// calling it twice is harmless.  Must be called on every resize before any
/// board or hand geometry is rebuilt.
///
/// # Example
///
/// ```rust
/// use tactoe_core::{compute_layout, LayoutTier};
///
/// let layout = compute_layout(1280.0, 720.0);
/// assert_eq!(layout.tier, LayoutTier::Wide);
/// assert_eq!(layout, compute_layout(1280.0, 720.0));
/// ```
pub fn compute_layout(viewport_width: f32, viewport_height: f32) -> Layout {
    let viewport = Viewport::new(viewport_width, viewport_height);
    let tier = LayoutTier::for_width(viewport.width);
    let card_scale = tier.card_scale();

    Layout {
        tier,
        slot_size: BASE_SLOT_SIZE * tier.slot_scale(),
        card_scale,
        hand_spacing: CARD_BASE_WIDTH * card_scale * HAND_SPACING_FACTOR,
        hand_vertical_offset: CARD_BASE_HEIGHT * card_scale * HAND_OFFSET_FACTOR,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
