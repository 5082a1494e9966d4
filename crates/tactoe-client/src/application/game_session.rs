//! GameSession: the client's single game-state container.
//!
//! Every input the client reacts to, whether a server message, a click, a
//! resize, a frame tick, or a finished asset load, is applied by one
//! synchronous method on [`GameSession`].  The event loop in `main.rs` calls
//! exactly one of these methods per event and waits for it to return before
//! taking the next one, so no two handlers ever observe a half-applied
//! update.
//!
//! # Optimistic plays (for beginners)
//!
//! When the player clicks a slot with a card selected, the client does not
//! wait for the server before showing something.  It sends `play_card`,
//! records a [`PendingPlay`], and draws a translucent *ghost* marker flying
//! toward the slot.  What happens next depends on the server:
//!
//! ```text
//!   click slot ──▶ PendingPlay{ghost} ──┬─ play_card_success ─▶ real marker, card removed
//!                                       ├─ error ─────────────▶ rollback (selection left as is)
//!                                       └─ timeout ───────────▶ rollback, play remembered
//! ```
//!
//! The server is authoritative: `game_state` always overwrites the board, and
//! a `play_card_success` for a different slot than the one clicked places the
//! marker where the server says.  A confirmation never replaces a marker that
//! `game_state` already put on the played slot.
//!
//! A play rolled back by the timeout is remembered, so a confirmation that
//! arrives late still removes the card that was actually played.  A
//! confirmation that matches no play removes nothing.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tactoe_core::{
    compute_layout, AnimationDriver, Board, CardData, CardId, CardSpec, ClientMessage,
    DescriptionPanel, Hand, HandGeometry, Layout, Marker, SelectionChange, SlotId, SlotState,
    SpriteHandle, Vec2, Viewport,
};
use tracing::{debug, info, warn};

use crate::application::load_assets::{AssetLoader, SpriteLoaded};

/// Default time a play may stay unconfirmed before it is rolled back.
pub const DEFAULT_PENDING_PLAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Card requested by the development draw key.
pub const DEFAULT_DEV_CARD_NAME: &str = "Mark";

/// Artwork of the development card.
pub const DEFAULT_DEV_CARD_GRAPHIC: &str = "src/card_test_mark.png";

// ── Configuration ─────────────────────────────────────────────────────────────

/// Settings the session needs at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub animation: AnimationDriver,
    /// `None` keeps a pending play until the server answers.
    pub pending_play_timeout: Option<Duration>,
    pub dev_card_name: String,
    pub dev_card_graphic: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            animation: AnimationDriver::default(),
            pending_play_timeout: Some(DEFAULT_PENDING_PLAY_TIMEOUT),
            dev_card_name: DEFAULT_DEV_CARD_NAME.to_string(),
            dev_card_graphic: DEFAULT_DEV_CARD_GRAPHIC.to_string(),
        }
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// A key the session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

/// Input from the window system (or the console standing in for it).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A primary-button click at screen coordinates.
    Click(Vec2),
    Resize { width: f32, height: f32 },
    Key(Key),
}

// ── Pending play ──────────────────────────────────────────────────────────────

/// A `play_card` that was sent but not yet confirmed or rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlay {
    pub card: CardId,
    pub slot: SlotId,
    /// Optimistic marker.  Dropped early if a `game_state` reconciles the
    /// slot before the confirmation arrives.
    pub ghost: Option<Marker>,
    /// `true` once a `game_state` has set this play's slot.
    pub reconciled: bool,
    pub issued_at: Instant,
}

// ── GameSession ───────────────────────────────────────────────────────────────

/// All client-side game state, and the only code that mutates it.
pub struct GameSession {
    viewport: Viewport,
    layout: Layout,
    board: Board,
    hand: Hand,
    driver: AnimationDriver,
    panel: Option<DescriptionPanel>,
    pending: Option<PendingPlay>,
    /// Last play rolled back by the timeout, kept for a late confirmation.
    rolled_back: Option<PendingPlay>,
    pending_timeout: Option<Duration>,
    is_my_turn: bool,
    outbox: Vec<ClientMessage>,
    assets: Box<dyn AssetLoader>,
    /// Paths already handed to the loader.
    requested: HashSet<String>,
    /// Finished loads, so cards drawn later reuse the result.
    sprites: HashMap<String, Result<SpriteHandle, String>>,
    dev_card_name: String,
    dev_card_graphic: String,
}

impl GameSession {
    /// Creates a session with an empty board and hand, laid out for the
    /// configured viewport.
    pub fn new(config: SessionConfig, assets: Box<dyn AssetLoader>) -> Self {
        let viewport = Viewport::new(config.viewport_width, config.viewport_height);
        let mut session = Self {
            viewport,
            layout: compute_layout(viewport.width, viewport.height),
            board: Board::new(),
            hand: Hand::new(),
            driver: config.animation,
            panel: None,
            pending: None,
            rolled_back: None,
            pending_timeout: config.pending_play_timeout,
            is_my_turn: false,
            outbox: Vec::new(),
            assets,
            requested: HashSet::new(),
            sprites: HashMap::new(),
            dev_card_name: config.dev_card_name,
            dev_card_graphic: config.dev_card_graphic,
        };
        session.resize(viewport.width, viewport.height);
        session
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// The description panel for the selected card, if any.
    pub fn panel(&self) -> Option<&DescriptionPanel> {
        self.panel.as_ref()
    }

    pub fn pending_play(&self) -> Option<&PendingPlay> {
        self.pending.as_ref()
    }

    /// The last play rolled back by the timeout, if still unresolved.
    pub fn rolled_back_play(&self) -> Option<&PendingPlay> {
        self.rolled_back.as_ref()
    }

    /// UI cue only; never gates input.
    pub fn is_my_turn(&self) -> bool {
        self.is_my_turn
    }

    /// Takes every message queued for the server since the last call.
    pub fn drain_outbox(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outbox)
    }

    // ── Frame and window events ───────────────────────────────────────────────

    /// Recomputes layout, board geometry, and hand targets for a new size.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.layout = compute_layout(self.viewport.width, self.viewport.height);

        let center = self.viewport.board_center(&self.layout);
        self.board.rebuild_geometry(&self.layout, center);
        self.hand
            .layout_hand(HandGeometry::new(self.viewport, &self.layout));

        if let Some(pending) = self.pending.as_mut() {
            let target = self.board.slot(pending.slot).screen();
            if let Some(ghost) = pending.ghost.as_mut() {
                ghost.motion_mut().retarget(target);
            }
        }

        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            tier = ?self.layout.tier,
            "viewport resized"
        );
    }

    /// Advances one frame.  Returns `true` if anything moved on screen.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        self.expire_pending_play(now);
        let ghost = self.pending.as_mut().and_then(|p| p.ghost.as_mut());
        self.driver.tick(&mut self.board, &mut self.hand, ghost)
    }

    /// Applies one input event.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Click(point) => self.click_at(point, now),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Key(Key::Escape) => {
                self.deselect();
            }
            InputEvent::Key(Key::Char('d')) => self.request_dev_draw(),
            InputEvent::Key(other) => debug!(key = ?other, "unbound key ignored"),
        }
    }

    /// Cards are drawn above the board, so they take the click first.
    fn click_at(&mut self, point: Vec2, now: Instant) {
        if let Some(card) = self.hand.card_at(point) {
            self.click_card(card);
        } else if let Some(slot) = self.board.slot_at(point) {
            self.click_slot(slot, now);
        } else {
            debug!(x = point.x, y = point.y, "click hit nothing");
        }
    }

    // ── Player actions ────────────────────────────────────────────────────────

    /// Toggles or switches the selection to `card`.
    pub fn click_card(&mut self, card: CardId) -> SelectionChange {
        let change = self.hand.select_card(card);
        if change.is_change() {
            self.refresh_panel();
        }
        change
    }

    /// Clears the selection.  A no-op when nothing is selected.
    pub fn deselect(&mut self) -> SelectionChange {
        let change = self.hand.deselect();
        if change.is_change() {
            self.refresh_panel();
        }
        change
    }

    /// Plays the selected card onto `slot`.
    ///
    /// Queues a `play_card` message and starts a ghost marker toward the
    /// slot.  Returns `false` (and does nothing) when no card is selected or
    /// another play is still waiting for the server.
    pub fn click_slot(&mut self, slot: SlotId, now: Instant) -> bool {
        if let Some(pending) = &self.pending {
            debug!(%slot, pending_slot = %pending.slot, "slot click ignored while a play is pending");
            return false;
        }
        let Some(card) = self.hand.selected_card() else {
            debug!(%slot, "slot click without a selected card ignored");
            return false;
        };

        let message = ClientMessage::play_card(card.data(), u8::from(slot));
        let ghost = Marker::new(
            marker_graphic(card.data()),
            card.motion().current(),
            self.board.slot(slot).screen(),
        );
        let card_id = card.id();

        info!(card = %card_id, name = card.name(), %slot, "playing card");
        self.outbox.push(message);
        self.pending = Some(PendingPlay {
            card: card_id,
            slot,
            ghost: Some(ghost),
            reconciled: false,
            issued_at: now,
        });
        true
    }

    /// Queues the development `draw_card` request.
    pub fn request_dev_draw(&mut self) {
        debug!(card = %self.dev_card_name, "requesting development card");
        self.outbox.push(ClientMessage::DrawCard {
            card_name: self.dev_card_name.clone(),
            graphic_path: self.dev_card_graphic.clone(),
        });
    }

    // ── Server events ─────────────────────────────────────────────────────────

    /// Starts a new game: clears everything, then deals `cards`.
    pub fn start_game(&mut self, cards: Vec<CardSpec>) {
        self.board.clear_all();
        self.hand.clear();
        self.pending = None;
        self.rolled_back = None;
        self.panel = None;
        self.is_my_turn = false;

        info!(cards = cards.len(), "game started");
        for spec in cards {
            self.grant_card(spec);
        }
    }

    /// Adds one card to the hand and makes sure its artwork is on the way.
    pub fn grant_card(&mut self, spec: CardSpec) -> CardId {
        let data = CardData::from(spec);
        let path = data.graphic_path.clone();
        let id = self.hand.add_card(data);
        self.ensure_sprite(&path);
        id
    }

    /// The server accepted a play onto `target_slot`.
    ///
    /// The play is resolved against the pending play, or against the play
    /// last rolled back by the timeout when only that one matches the slot.
    /// The current selection is never used to guess the card.  The card
    /// leaves the hand and the selection is cleared.  Its marker flies in
    /// from where the ghost (or the card) is right now, unless a
    /// `game_state` already set the slot.
    pub fn confirm_play(&mut self, target_slot: i64) {
        self.is_my_turn = false;

        let slot = match SlotId::new(target_slot) {
            Ok(slot) => slot,
            Err(e) => {
                warn!("play_card_success ignored: {e}");
                return;
            }
        };

        let Some(play) = self.take_confirmed_play(slot) else {
            warn!(%slot, "play confirmed with no matching play; no card removed");
            self.hand.deselect();
            self.refresh_panel();
            return;
        };
        if play.slot != slot {
            warn!(clicked = %play.slot, confirmed = %slot, "server confirmed a different slot");
        }
        if self.rolled_back.as_ref().is_some_and(|r| r.card == play.card) {
            self.rolled_back = None;
        }

        if self.hand.get(play.card).is_none() {
            warn!(card = %play.card, %slot, "play confirmed for a card no longer in hand");
            self.hand.deselect();
            self.refresh_panel();
            return;
        }
        let Some(card) = self.hand.get(play.card) else {
            return;
        };

        if play.reconciled && play.slot == slot {
            debug!(%slot, "slot already set by server state; marker kept");
        } else {
            let spawn = play
                .ghost
                .as_ref()
                .map(|g| g.motion().current())
                .unwrap_or_else(|| card.motion().current());
            let graphic = marker_graphic(card.data()).to_string();
            self.board.place_marker(slot, graphic, Some(spawn));
        }

        let card_id = card.id();
        self.hand.remove_card(card_id);
        self.hand.deselect();
        self.refresh_panel();
        info!(card = %card_id, %slot, "play confirmed");
    }

    /// Applies the authoritative board state.
    ///
    /// For each entry the newest displayable effect becomes the slot's
    /// marker.  Entries without one leave the slot alone; entries with an
    /// out-of-range id are skipped.
    pub fn reconcile_board(&mut self, board_state: &[SlotState]) {
        for state in board_state {
            let slot = match SlotId::new(state.id) {
                Ok(slot) => slot,
                Err(e) => {
                    warn!("game_state entry skipped: {e}");
                    continue;
                }
            };
            let Some(effect) = state.displayed_effect() else {
                continue;
            };

            let unchanged = self
                .board
                .slot(slot)
                .marker()
                .is_some_and(|m| m.graphic_path() == effect.graphic_path);
            if !unchanged {
                self.board
                    .place_marker(slot, effect.graphic_path.clone(), None);
            }

            for play in self.pending.iter_mut().chain(self.rolled_back.iter_mut()) {
                if play.slot == slot {
                    play.reconciled = true;
                    if play.ghost.take().is_some() {
                        debug!(%slot, "ghost marker replaced by server state");
                    }
                }
            }
        }
        debug!(entries = board_state.len(), "board reconciled");
    }

    /// Marks the start of this player's turn.
    pub fn start_turn(&mut self) {
        self.is_my_turn = true;
        info!("turn started");
    }

    /// Removes cards by name, first match per entry.
    pub fn remove_cards(&mut self, cards: &[CardSpec]) {
        for spec in cards {
            match self.hand.remove_first_named(&spec.name) {
                Some(card) => {
                    if self.pending.as_ref().is_some_and(|p| p.card == card.id()) {
                        debug!(card = %card.id(), "pending play dropped with its card");
                        self.pending = None;
                    }
                    if self.rolled_back.as_ref().is_some_and(|p| p.card == card.id()) {
                        self.rolled_back = None;
                    }
                }
                None => debug!(name = %spec.name, "remove_cards: no such card in hand"),
            }
        }
        self.refresh_panel();
    }

    /// The server rejected the last request: roll the pending play back.
    ///
    /// The ghost disappears and the card stays in the hand so the player can
    /// try again; the selection is left as it is.  With no play pending the
    /// error answers the play rolled back by the timeout, which is then
    /// forgotten.
    pub fn reject_pending_play(&mut self, reason: &str) {
        match self.pending.take() {
            Some(p) => warn!(card = %p.card, slot = %p.slot, reason, "play rolled back"),
            None => match self.rolled_back.take() {
                Some(p) => warn!(card = %p.card, slot = %p.slot, reason, "timed-out play rejected"),
                None => warn!(reason, "server reported an error with no play pending"),
            },
        }
    }

    /// Attaches a finished artwork load to every card waiting for it.
    pub fn on_sprite_loaded(&mut self, event: SpriteLoaded) {
        let outcome = event.outcome.map_err(|e| e.to_string());
        if let Err(reason) = &outcome {
            warn!(path = %event.path, %reason, "artwork failed to load");
        }
        let updated = self.hand.resolve_sprite(&event.path, outcome.clone());
        debug!(path = %event.path, cards = updated, "artwork resolved");
        self.sprites.insert(event.path, outcome);
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn ensure_sprite(&mut self, path: &str) {
        if let Some(outcome) = self.sprites.get(path) {
            self.hand.resolve_sprite(path, outcome.clone());
        } else if self.requested.insert(path.to_string()) {
            self.assets.request(path);
        }
    }

    fn expire_pending_play(&mut self, now: Instant) {
        let Some(timeout) = self.pending_timeout else {
            return;
        };
        let expired = self
            .pending
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.issued_at) >= timeout);
        if expired {
            if let Some(mut play) = self.pending.take() {
                warn!(card = %play.card, slot = %play.slot, "no answer from server; play rolled back");
                play.ghost = None;
                self.rolled_back = Some(play);
            }
        }
    }

    /// Picks the play a confirmation for `slot` refers to.
    ///
    /// The pending play wins unless only the rolled-back play matches the
    /// slot; a pending play for another slot is taken as a mismatch.
    fn take_confirmed_play(&mut self, slot: SlotId) -> Option<PendingPlay> {
        let pending_matches = self.pending.as_ref().is_some_and(|p| p.slot == slot);
        let rolled_back_matches = self.rolled_back.as_ref().is_some_and(|p| p.slot == slot);
        if pending_matches || !rolled_back_matches {
            self.pending.take().or_else(|| self.rolled_back.take())
        } else {
            self.rolled_back.take()
        }
    }

    fn refresh_panel(&mut self) {
        self.panel = self.hand.selected_card().map(DescriptionPanel::for_card);
    }
}

/// The marker a card leaves behind: its own marker art, or its card art when
/// the server sent none.
fn marker_graphic(card: &CardData) -> &str {
    if card.marker_path.is_empty() {
        &card.graphic_path
    } else {
        &card.marker_path
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
