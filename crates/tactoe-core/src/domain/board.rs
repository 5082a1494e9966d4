//! The board: a fixed 3×3 grid of slots and the markers placed on them.
//!
//! Slots are created once and never destroyed.  A layout pass only moves
//! them; a server confirmation only annotates them with a [`Marker`].  The
//! slot identity (`id = row * 3 + col`) never changes, so a marker survives
//! any number of resizes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::geometry::{Motion, Vec2};
use crate::domain::layout::Layout;

/// Number of rows (and columns) on the board.
pub const BOARD_DIMENSION: u8 = 3;

/// Total number of slots.
pub const SLOT_COUNT: usize = (BOARD_DIMENSION * BOARD_DIMENSION) as usize;

/// Errors raised by board operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    /// A slot id outside `0..=8`.
    ///
    /// Unreachable from the board's own hit testing; only a malformed server
    /// message can produce one.
    #[error("invalid slot id {0}: the board has slots 0..=8")]
    InvalidSlot(i64),
}

/// Identity of a slot, guaranteed to be in `0..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct SlotId(u8);

impl SlotId {
    /// Validates a raw slot id.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSlot`] when `raw` is outside `0..=8`.
    pub fn new(raw: i64) -> Result<Self, BoardError> {
        if (0..SLOT_COUNT as i64).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(BoardError::InvalidSlot(raw))
        }
    }

    /// Builds the id for a row/column pair.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidSlot`] when either coordinate is `>= 3`.
    pub fn from_row_col(row: u8, col: u8) -> Result<Self, BoardError> {
        if row >= BOARD_DIMENSION || col >= BOARD_DIMENSION {
            return Err(BoardError::InvalidSlot(
                i64::from(row) * i64::from(BOARD_DIMENSION) + i64::from(col),
            ));
        }
        Ok(Self(row * BOARD_DIMENSION + col))
    }

    /// Iterates all nine ids in ascending order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..SLOT_COUNT as u8).map(SlotId)
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    pub fn row(self) -> u8 {
        self.0 / BOARD_DIMENSION
    }

    pub fn col(self) -> u8 {
        self.0 % BOARD_DIMENSION
    }
}

impl TryFrom<i64> for SlotId {
    type Error = BoardError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        SlotId::new(raw)
    }
}

impl From<SlotId> for u8 {
    fn from(id: SlotId) -> u8 {
        id.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The visual token shown in a slot after a card was played there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    graphic_path: String,
    motion: Motion,
}

impl Marker {
    /// Creates a marker drawn at `spawn` and heading for `destination`.
    pub fn new(graphic_path: impl Into<String>, spawn: Vec2, destination: Vec2) -> Self {
        let mut motion = Motion::at(spawn);
        motion.retarget(destination);
        Self {
            graphic_path: graphic_path.into(),
            motion,
        }
    }

    pub fn graphic_path(&self) -> &str {
        &self.graphic_path
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Mutable access for the animation driver.
    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }
}

/// One cell of the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    id: SlotId,
    row: u8,
    col: u8,
    /// Centre of the slot on screen.  Derived: rewritten by every
    /// [`Board::rebuild_geometry`].
    screen: Vec2,
    marker: Option<Marker>,
}

impl Slot {
    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }
}

/// The fixed 3×3 board.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Always exactly [`SLOT_COUNT`] entries, indexed by slot id.
    slots: Vec<Slot>,
    /// Slot edge length from the last geometry rebuild (`0` before the first).
    slot_size: f32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Creates an empty board.  Geometry is zero until the first
    /// [`Board::rebuild_geometry`].
    pub fn new() -> Self {
        let slots = SlotId::all()
            .map(|id| Slot {
                id,
                row: id.row(),
                col: id.col(),
                screen: Vec2::ZERO,
                marker: None,
            })
            .collect();
        Self {
            slots,
            slot_size: 0.0,
        }
    }

    /// Recomputes every slot's screen position around `center`.
    ///
    /// Each axis follows `center - 1.5 * slot + index * slot`, which is the
    /// slot's top-left edge; half a slot is added so `screen` is the slot's
    /// centre.  Slots are updated in place, so placed markers stay attached
    /// to their slot id; they are snapped to the new centre rather than
    /// animated across the screen.
    pub fn rebuild_geometry(&mut self, layout: &Layout, center: Vec2) {
        let size = layout.slot_size;
        self.slot_size = size;

        for slot in &mut self.slots {
            let origin_x = center.x - 1.5 * size + f32::from(slot.col) * size;
            let origin_y = center.y - 1.5 * size + f32::from(slot.row) * size;
            slot.screen = Vec2::new(origin_x + size / 2.0, origin_y + size / 2.0);

            if let Some(marker) = slot.marker.as_mut() {
                marker.motion.snap_to(slot.screen);
            }
        }

        debug!(slot_size = size, "board geometry rebuilt");
    }

    /// Places (or replaces) the marker on `slot_id`.
    ///
    /// The server is authoritative, so an existing marker is simply
    /// overwritten.  `spawn_from` is where the marker starts its flight
    /// (typically the played card's on-screen position); `None` places it
    /// directly at the slot centre.  Returns the replaced marker, if any.
    pub fn place_marker(
        &mut self,
        slot_id: SlotId,
        graphic_path: impl Into<String>,
        spawn_from: Option<Vec2>,
    ) -> Option<Marker> {
        let slot = &mut self.slots[slot_id.index()];
        let spawn = spawn_from.unwrap_or(slot.screen);
        let marker = Marker::new(graphic_path, spawn, slot.screen);
        debug!(slot = %slot_id, graphic = marker.graphic_path(), "marker placed");
        slot.marker.replace(marker)
    }

    /// Removes every marker (game reset).
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.marker = None;
        }
    }

    pub fn slot(&self, slot_id: SlotId) -> &Slot {
        &self.slots[slot_id.index()]
    }

    /// Iterates slots in id order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Slot edge length from the last rebuild.
    pub fn slot_size(&self) -> f32 {
        self.slot_size
    }

    /// Number of slots that currently hold a marker.
    pub fn marker_count(&self) -> usize {
        self.slots.iter().filter(|s| s.marker.is_some()).count()
    }

    /// Returns the slot under `point`, if any.
    ///
    /// Slot squares are half-open (`[left, right)`), so a point on a shared
    /// edge belongs to exactly one slot.
    pub fn slot_at(&self, point: Vec2) -> Option<SlotId> {
        if self.slot_size <= 0.0 {
            return None;
        }
        let half = self.slot_size / 2.0;
        self.slots
            .iter()
            .find(|s| {
                point.x >= s.screen.x - half
                    && point.x < s.screen.x + half
                    && point.y >= s.screen.y - half
                    && point.y < s.screen.y + half
            })
            .map(|s| s.id)
    }

    /// Motions of every placed marker, for the animation driver.
    pub fn marker_motions_mut(&mut self) -> impl Iterator<Item = &mut Motion> {
        self.slots
            .iter_mut()
            .filter_map(|s| s.marker.as_mut().map(Marker::motion_mut))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
