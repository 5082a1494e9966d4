//! The player's hand: an ordered set of cards, its layout pass, and the
//! selection it owns.
//!
//! # Ownership of fields (for beginners)
//!
//! A [`Card`] has two positions (see [`Motion`]):
//!
//! - its **target** is written only by [`Hand::layout_hand`], which runs
//!   whenever the hand's composition, the selection, or the viewport changes;
//! - its **current** position is written only by the
//!   [`crate::AnimationDriver`], once per frame.
//!
//! The hand also owns the [`Selection`].  Routing every selection change
//! through the hand lets it keep each card's `selected` flag in sync with the
//! selection state, so at most one card is ever flagged.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::geometry::{Motion, Vec2};
use crate::domain::layout::{Layout, Viewport, CARD_BASE_HEIGHT, CARD_BASE_WIDTH};
use crate::domain::selection::{Selection, SelectionChange};

/// Cards in a hand of this size or fewer use the maximum spacing.
pub const FULL_SPACING_CARD_COUNT: usize = 3;

/// Per-card decay of spacing beyond [`FULL_SPACING_CARD_COUNT`].
pub const SPACING_DECAY: f32 = 0.85;

/// Minimum spacing as a fraction of the maximum.
pub const MIN_SPACING_RATIO: f32 = 0.30;

/// How far the selected card is lifted above the baseline, before scaling.
pub const SELECT_LIFT: f32 = 40.0;

/// Visual scale of the selected card; every other card is drawn at `1.0`.
pub const SELECTED_VISUAL_SCALE: f32 = 1.1;

// ── Card ──────────────────────────────────────────────────────────────────────

/// Identity of a card within one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub(crate) u64);

impl CardId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The server-provided description of a card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,
    pub description: String,
    pub graphic_path: String,
    /// Graphic of the marker this card leaves on the board.
    pub marker_path: String,
}

/// Decoded artwork, shared between every card using the same path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteHandle {
    pub path: String,
    pub bytes: Arc<[u8]>,
}

/// Loading state of a card's artwork.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpriteState {
    #[default]
    Pending,
    Ready(SpriteHandle),
    Failed(String),
}

/// One card in the hand.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    id: CardId,
    data: CardData,
    /// Multiplier on top of the layout's card scale:
    /// [`SELECTED_VISUAL_SCALE`] while selected, `1.0` otherwise.
    visual_scale: f32,
    selected: bool,
    motion: Motion,
    z_index: i32,
    sprite: SpriteState,
}

impl Card {
    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn data(&self) -> &CardData {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn description(&self) -> &str {
        &self.data.description
    }

    pub fn graphic_path(&self) -> &str {
        &self.data.graphic_path
    }

    pub fn marker_path(&self) -> &str {
        &self.data.marker_path
    }

    pub fn visual_scale(&self) -> f32 {
        self.visual_scale
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn sprite(&self) -> &SpriteState {
        &self.sprite
    }

    /// A card accepts clicks only once its artwork has loaded.
    pub fn is_interactive(&self) -> bool {
        matches!(self.sprite, SpriteState::Ready(_))
    }

    /// `true` when `point` is inside the card's drawn rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        let center = self.motion.current();
        let half_w = CARD_BASE_WIDTH * self.motion.scale() / 2.0;
        let half_h = CARD_BASE_HEIGHT * self.motion.scale() / 2.0;
        (point.x - center.x).abs() <= half_w && (point.y - center.y).abs() <= half_h
    }
}

// ── Layout inputs ─────────────────────────────────────────────────────────────

/// Everything the hand layout pass needs from the viewport and layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandGeometry {
    pub viewport: Viewport,
    /// Maximum spacing between neighbouring cards.
    pub hand_spacing: f32,
    /// Distance from the bottom edge to the hand baseline.
    pub vertical_offset: f32,
    pub card_scale: f32,
}

impl HandGeometry {
    pub fn new(viewport: Viewport, layout: &Layout) -> Self {
        Self {
            viewport,
            hand_spacing: layout.hand_spacing,
            vertical_offset: layout.hand_vertical_offset,
            card_scale: layout.card_scale,
        }
    }
}

/// Spacing between neighbouring cards for a hand of `count` cards.
///
/// Up to three cards use `max_spacing`; every extra card shrinks the spacing
/// by [`SPACING_DECAY`], never below `max_spacing * MIN_SPACING_RATIO`.
pub fn spacing_for(count: usize, max_spacing: f32) -> f32 {
    if count <= FULL_SPACING_CARD_COUNT {
        return max_spacing;
    }
    let min_spacing = max_spacing * MIN_SPACING_RATIO;
    let extra = (count - FULL_SPACING_CARD_COUNT).min(i32::MAX as usize) as i32;
    (max_spacing * SPACING_DECAY.powi(extra)).max(min_spacing)
}

// ── Hand ──────────────────────────────────────────────────────────────────────

/// The ordered set of cards the player holds.
#[derive(Debug, Clone)]
pub struct Hand {
    /// Arrival order.
    cards: Vec<Card>,
    next_id: u64,
    selection: Selection,
    geometry: Option<HandGeometry>,
    /// Where new cards appear before flying to their slot in the hand.
    spawn: Vec2,
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

impl Hand {
    /// An empty hand whose new cards spawn at the origin.
    pub fn new() -> Self {
        Self::with_spawn(Vec2::ZERO)
    }

    /// An empty hand whose new cards spawn at `spawn` (the deck position).
    pub fn with_spawn(spawn: Vec2) -> Self {
        Self {
            cards: Vec::new(),
            next_id: 1,
            selection: Selection::new(),
            geometry: None,
            spawn,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected card, if any.
    pub fn selected_card(&self) -> Option<&Card> {
        self.selection.selected().and_then(|id| self.get(id))
    }

    /// The topmost interactive card under `point`.
    pub fn card_at(&self, point: Vec2) -> Option<CardId> {
        self.cards
            .iter()
            .filter(|c| c.is_interactive() && c.contains(point))
            .max_by_key(|c| c.z_index)
            .map(|c| c.id)
    }

    /// Current spacing between neighbouring cards (`0` before any layout).
    pub fn current_spacing(&self) -> f32 {
        self.geometry
            .map(|g| spacing_for(self.cards.len(), g.hand_spacing))
            .unwrap_or(0.0)
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    /// Appends a card at the spawn point and re-lays out the hand.
    pub fn add_card(&mut self, data: CardData) -> CardId {
        let id = CardId(self.next_id);
        self.next_id += 1;

        let scale = self.geometry.map(|g| g.card_scale).unwrap_or(1.0);
        debug!(card = %id, name = %data.name, "card added to hand");
        self.cards.push(Card {
            id,
            data,
            visual_scale: 1.0,
            selected: false,
            motion: Motion::with_scale(self.spawn, scale),
            z_index: 0,
            sprite: SpriteState::Pending,
        });
        self.relayout();
        id
    }

    /// Removes a card.  Missing ids are ignored.
    ///
    /// If the removed card was selected the selection returns to
    /// `Unselected`.
    pub fn remove_card(&mut self, id: CardId) -> Option<Card> {
        let index = self.cards.iter().position(|c| c.id == id)?;
        let card = self.cards.remove(index);
        self.selection.forget(id);
        debug!(card = %id, name = %card.data.name, "card removed from hand");
        self.relayout();
        Some(card)
    }

    /// Removes the first card (in arrival order) with the given name.
    pub fn remove_first_named(&mut self, name: &str) -> Option<Card> {
        let id = self.cards.iter().find(|c| c.data.name == name)?.id;
        self.remove_card(id)
    }

    /// Removes every card and resets the selection.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.selection.reset();
    }

    /// Applies a click on `id`.
    ///
    /// Unknown or non-interactive cards leave the selection unchanged.
    pub fn select_card(&mut self, id: CardId) -> SelectionChange {
        match self.get(id) {
            Some(card) if card.is_interactive() => {}
            Some(_) => {
                debug!(card = %id, "click on non-interactive card ignored");
                return SelectionChange::Unchanged;
            }
            None => return SelectionChange::Unchanged,
        }
        let change = self.selection.click(id);
        self.sync_selected_flags();
        self.relayout();
        change
    }

    /// Clears the selection.  A no-op when nothing is selected.
    pub fn deselect(&mut self) -> SelectionChange {
        let change = self.selection.deselect();
        if change.is_change() {
            self.sync_selected_flags();
            self.relayout();
        }
        change
    }

    /// Attaches a sprite load result to every pending card using `path`.
    ///
    /// Returns the number of cards updated.
    pub fn resolve_sprite(&mut self, path: &str, outcome: Result<SpriteHandle, String>) -> usize {
        let mut updated = 0;
        for card in self
            .cards
            .iter_mut()
            .filter(|c| c.data.graphic_path == path && c.sprite == SpriteState::Pending)
        {
            card.sprite = match &outcome {
                Ok(handle) => SpriteState::Ready(handle.clone()),
                Err(reason) => {
                    warn!(card = %card.id, path, %reason, "card artwork failed to load; card disabled");
                    SpriteState::Failed(reason.clone())
                }
            };
            updated += 1;
        }
        updated
    }

    /// Recomputes every card's target from `geometry` and remembers it for
    /// later composition changes.
    ///
    /// Writes targets, target scales and z-order only; current positions are
    /// left to the animation driver.
    pub fn layout_hand(&mut self, geometry: HandGeometry) {
        self.geometry = Some(geometry);
        self.relayout();
    }

    /// Motions of every card, for the animation driver.
    pub fn motions_mut(&mut self) -> impl Iterator<Item = &mut Motion> {
        self.cards.iter_mut().map(|c| &mut c.motion)
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn sync_selected_flags(&mut self) {
        let selected = self.selection.selected();
        for card in &mut self.cards {
            card.selected = Some(card.id) == selected;
            card.visual_scale = if card.selected {
                SELECTED_VISUAL_SCALE
            } else {
                1.0
            };
        }
    }

    fn relayout(&mut self) {
        let Some(g) = self.geometry else {
            return;
        };
        let count = self.cards.len();
        if count == 0 {
            return;
        }

        let spacing = spacing_for(count, g.hand_spacing);
        let total_width = spacing * (count - 1) as f32;
        let start_x = g.viewport.width / 2.0 - total_width / 2.0;
        let baseline = g.viewport.height - g.vertical_offset;
        let lift = SELECT_LIFT * g.card_scale;
        let top_z = count as i32;

        for (i, card) in self.cards.iter_mut().enumerate() {
            let y = if card.selected { baseline - lift } else { baseline };
            card.motion.retarget(Vec2::new(start_x + spacing * i as f32, y));
            card.motion.rescale(g.card_scale * card.visual_scale);
            card.z_index = if card.selected { top_z } else { i as i32 };
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::compute_layout;

    fn data(name: &str) -> CardData {
        CardData {
            name: name.to_string(),
            description: format!("{name} description"),
            graphic_path: format!("src/{name}.png"),
            marker_path: format!("src/{name}_marker.png"),
        }
    }

    fn sprite(path: &str) -> SpriteHandle {
        SpriteHandle {
            path: path.to_string(),
            bytes: Arc::from(vec![1u8, 2, 3]),
        }
    }

    fn laid_out_hand() -> Hand {
        let viewport = Viewport::new(800.0, 600.0);
        let layout = compute_layout(viewport.width, viewport.height);
        let mut hand = Hand::new();
        hand.layout_hand(HandGeometry::new(viewport, &layout));
        hand
    }

    fn add_ready(hand: &mut Hand, name: &str) -> CardId {
        let id = hand.add_card(data(name));
        hand.resolve_sprite(&format!("src/{name}.png"), Ok(sprite(name)));
        id
    }

    // ── spacing_for ───────────────────────────────────────────────────────────

    #[test]
    fn test_spacing_is_max_for_three_or_fewer_cards() {
        for n in 0..=3 {
            assert_eq!(spacing_for(n, 100.0), 100.0);
        }
    }

    #[test]
    fn test_spacing_strictly_decreases_until_minimum() {
        let min = 100.0 * MIN_SPACING_RATIO;
        let mut previous = spacing_for(3, 100.0);
        for n in 4..40 {
            let s = spacing_for(n, 100.0);
            assert!(s >= min, "spacing below minimum at n={n}");
            if previous > min {
                assert!(s < previous, "spacing did not shrink at n={n}");
            } else {
                assert_eq!(s, min);
            }
            previous = s;
        }
    }

    #[test]
    fn test_spacing_for_four_cards_is_decayed_once() {
        assert!((spacing_for(4, 100.0) - 85.0).abs() < 1e-4);
    }

    // ── add / remove ──────────────────────────────────────────────────────────

    #[test]
    fn test_add_card_spawns_at_deck_and_targets_hand() {
        // Arrange
        let mut hand = laid_out_hand();

        // Act
        let id = hand.add_card(data("A"));

        // Assert: one card sits at the horizontal centre of the viewport
        let card = hand.get(id).unwrap();
        assert_eq!(card.motion().current(), Vec2::ZERO);
        assert_eq!(card.motion().target().x, 400.0);
    }

    #[test]
    fn test_two_cards_are_symmetric_about_centre() {
        let mut hand = laid_out_hand();
        let a = hand.add_card(data("A"));
        let b = hand.add_card(data("B"));

        let ta = hand.get(a).unwrap().motion().target();
        let tb = hand.get(b).unwrap().motion().target();
        assert_ne!(ta, tb);
        assert!((400.0 - ta.x - (tb.x - 400.0)).abs() < 1e-3);
        assert_eq!(ta.y, tb.y);
    }

    #[test]
    fn test_remove_missing_card_is_noop() {
        let mut hand = laid_out_hand();
        hand.add_card(data("A"));
        assert!(hand.remove_card(CardId(999)).is_none());
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn test_remove_selected_card_clears_selection() {
        let mut hand = laid_out_hand();
        let a = add_ready(&mut hand, "A");
        hand.select_card(a);

        hand.remove_card(a);

        assert!(hand.selected_card().is_none());
        assert_eq!(hand.selection().selected(), None);
    }

    #[test]
    fn test_remove_first_named_takes_earliest_match() {
        let mut hand = laid_out_hand();
        let first = hand.add_card(data("A"));
        let second = hand.add_card(data("A"));

        let removed = hand.remove_first_named("A").unwrap();

        assert_eq!(removed.id(), first);
        assert!(hand.get(second).is_some());
    }

    #[test]
    fn test_card_ids_are_unique() {
        let mut hand = Hand::new();
        let a = hand.add_card(data("A"));
        let b = hand.add_card(data("A"));
        assert_ne!(a, b);
    }

    // ── selection ─────────────────────────────────────────────────────────────

    #[test]
    fn test_pending_card_cannot_be_selected() {
        let mut hand = laid_out_hand();
        let a = hand.add_card(data("A"));
        assert_eq!(hand.select_card(a), SelectionChange::Unchanged);
    }

    #[test]
    fn test_at_most_one_card_flagged_selected() {
        let mut hand = laid_out_hand();
        let a = add_ready(&mut hand, "A");
        let b = add_ready(&mut hand, "B");

        hand.select_card(a);
        hand.select_card(b);

        let flagged: Vec<_> = hand.cards().iter().filter(|c| c.is_selected()).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id(), b);
    }

    #[test]
    fn test_selected_card_is_lifted_and_on_top() {
        let mut hand = laid_out_hand();
        let a = add_ready(&mut hand, "A");
        let b = add_ready(&mut hand, "B");

        hand.select_card(a);

        let ca = hand.get(a).unwrap();
        let cb = hand.get(b).unwrap();
        assert!(ca.motion().target().y < cb.motion().target().y);
        assert!(ca.z_index() > cb.z_index());
    }

    #[test]
    fn test_selected_card_is_enlarged_until_deselected() {
        // Arrange
        let mut hand = laid_out_hand();
        let a = add_ready(&mut hand, "A");
        let b = add_ready(&mut hand, "B");
        let base = hand.get(b).unwrap().motion().target_scale();

        // Act
        hand.select_card(a);

        // Assert
        let ca = hand.get(a).unwrap();
        assert_eq!(ca.visual_scale(), SELECTED_VISUAL_SCALE);
        assert_eq!(ca.motion().target_scale(), base * SELECTED_VISUAL_SCALE);
        assert_eq!(hand.get(b).unwrap().visual_scale(), 1.0);

        hand.deselect();
        let ca = hand.get(a).unwrap();
        assert_eq!(ca.visual_scale(), 1.0);
        assert_eq!(ca.motion().target_scale(), base);
    }

    #[test]
    fn test_deselect_on_empty_selection_is_noop() {
        let mut hand = laid_out_hand();
        add_ready(&mut hand, "A");
        assert_eq!(hand.deselect(), SelectionChange::Unchanged);
    }

    // ── sprites and hit testing ───────────────────────────────────────────────

    #[test]
    fn test_failed_sprite_leaves_card_non_interactive() {
        let mut hand = laid_out_hand();
        let a = hand.add_card(data("A"));

        let updated = hand.resolve_sprite("src/A.png", Err("not found".into()));

        assert_eq!(updated, 1);
        assert!(!hand.get(a).unwrap().is_interactive());
    }

    #[test]
    fn test_card_at_ignores_non_interactive_cards() {
        let mut hand = Hand::with_spawn(Vec2::new(50.0, 50.0));
        let a = hand.add_card(data("A"));
        assert_eq!(hand.card_at(Vec2::new(50.0, 50.0)), None);

        hand.resolve_sprite("src/A.png", Ok(sprite("A")));
        assert_eq!(hand.card_at(Vec2::new(50.0, 50.0)), Some(a));
    }

    #[test]
    fn test_card_at_prefers_topmost_card() {
        // Both cards spawn on the same point, so they overlap completely.
        let mut hand = Hand::with_spawn(Vec2::new(50.0, 50.0));
        let _a = add_ready(&mut hand, "A");
        let b = add_ready(&mut hand, "B");
        let viewport = Viewport::new(800.0, 600.0);
        hand.layout_hand(HandGeometry::new(viewport, &compute_layout(800.0, 600.0)));

        assert_eq!(hand.card_at(Vec2::new(50.0, 50.0)), Some(b));
    }
}
