//! Selection state machine and the description panel derived from it.
//!
//! # States and transitions (for beginners)
//!
//! ```text
//!              click(A)                     click(B)
//!  Unselected ─────────▶ Selected(A) ─────────────────▶ Selected(B)
//!      ▲                    │   ▲                            │
//!      │      click(A) /    │   └────────────────────────────┘
//!      └──── deselect() ────┘          click(A)  (Switched)
//! ```
//!
//! Clicking the selected card again toggles it off.  Clicking a different
//! card is a single [`SelectionChange::Switched`] transition rather than a
//! deselect followed by a select, so observers (the description panel) see
//! exactly one update and there is never an instant with two cards
//! selected.
//!
//! The selection stores a [`CardId`] (identity), never a reference to the
//! card, so a removed card can always be detected with [`Selection::forget`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::hand::{Card, CardId};

/// The two selection states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(CardId),
}

/// What a selection operation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// `Unselected → Selected(card)`.
    Selected(CardId),
    /// `Selected(card) → Unselected`.
    Deselected(CardId),
    /// `Selected(from) → Selected(to)` as one compound transition.
    Switched { from: CardId, to: CardId },
    /// Nothing changed.
    Unchanged,
}

impl SelectionChange {
    pub fn is_change(self) -> bool {
        !matches!(self, SelectionChange::Unchanged)
    }
}

/// Which card, if any, is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    state: SelectionState,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// The selected card id, if any.
    pub fn selected(&self) -> Option<CardId> {
        match self.state {
            SelectionState::Unselected => None,
            SelectionState::Selected(id) => Some(id),
        }
    }

    pub fn is_selected(&self, card: CardId) -> bool {
        self.selected() == Some(card)
    }

    /// Applies a click on `card`.
    pub fn click(&mut self, card: CardId) -> SelectionChange {
        let change = match self.state {
            SelectionState::Unselected => {
                self.state = SelectionState::Selected(card);
                SelectionChange::Selected(card)
            }
            SelectionState::Selected(current) if current == card => {
                self.state = SelectionState::Unselected;
                SelectionChange::Deselected(card)
            }
            SelectionState::Selected(current) => {
                self.state = SelectionState::Selected(card);
                SelectionChange::Switched {
                    from: current,
                    to: card,
                }
            }
        };
        debug!(?change, "selection click");
        change
    }

    /// Clears the selection.  A no-op on `Unselected`.
    pub fn deselect(&mut self) -> SelectionChange {
        match self.state {
            SelectionState::Unselected => SelectionChange::Unchanged,
            SelectionState::Selected(current) => {
                self.state = SelectionState::Unselected;
                SelectionChange::Deselected(current)
            }
        }
    }

    /// Drops the selection if it refers to `card` (the card left the hand).
    pub fn forget(&mut self, card: CardId) -> SelectionChange {
        if self.is_selected(card) {
            self.deselect()
        } else {
            SelectionChange::Unchanged
        }
    }

    /// Unconditionally returns to `Unselected` (full hand reset).
    pub fn reset(&mut self) {
        self.state = SelectionState::Unselected;
    }
}

/// The text shown for the selected card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionPanel {
    pub card: CardId,
    pub title: String,
    pub body: String,
}

impl DescriptionPanel {
    /// Builds the panel for a card.
    pub fn for_card(card: &Card) -> Self {
        Self {
            card: card.id(),
            title: card.name().to_string(),
            body: card.description().to_string(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
