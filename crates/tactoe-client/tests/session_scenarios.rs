//! End-to-end scenarios for the game session.
//!
//! Each test drives a `GameSession` only through its public surface: server
//! frames go through `route_frame` exactly as the event loop delivers them,
//! and player input goes through `handle_input` with screen coordinates.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tactoe_client::application::game_session::{GameSession, InputEvent, SessionConfig};
use tactoe_client::application::load_assets::SpriteLoaded;
use tactoe_client::application::message_router::route_frame;
use tactoe_client::infrastructure::assets::mock::RecordingAssetLoader;
use tactoe_core::{ClientMessage, SelectionState, SlotId, SpriteHandle, Vec2};

// ── Helpers ───────────────────────────────────────────────────────────────────

const GAME_START_TWO_CARDS: &str = r#"{
    "type": "game_start",
    "cards_to_add": [
        {"Name":"A","Description":"First card","GraphicPath":"src/a.png","MarkerPath":"src/a_mark.png"},
        {"Name":"B","Description":"Second card","GraphicPath":"src/b.png","MarkerPath":"src/b_mark.png"}
    ]
}"#;

fn new_session() -> (GameSession, RecordingAssetLoader) {
    let loader = RecordingAssetLoader::new();
    let session = GameSession::new(SessionConfig::default(), Box::new(loader.clone()));
    (session, loader)
}

fn load(session: &mut GameSession, path: &str) {
    session.on_sprite_loaded(SpriteLoaded {
        path: path.to_string(),
        outcome: Ok(SpriteHandle {
            path: path.to_string(),
            bytes: Arc::from(vec![0u8; 16]),
        }),
    });
}

/// Ticks until nothing moves any more.
fn settle(session: &mut GameSession) {
    let now = Instant::now();
    for _ in 0..2000 {
        if !session.on_frame(now) {
            return;
        }
    }
    panic!("scene never settled");
}

fn click(session: &mut GameSession, at: Vec2) {
    session.handle_input(InputEvent::Click(at), Instant::now());
}

fn slot(raw: i64) -> SlotId {
    SlotId::new(raw).unwrap()
}

/// A started game with both cards loaded and settled in the hand.
fn started_game() -> GameSession {
    let (mut session, _) = new_session();
    route_frame(&mut session, GAME_START_TWO_CARDS);
    load(&mut session, "src/a.png");
    load(&mut session, "src/b.png");
    settle(&mut session);
    session
}

/// Clicks the centre of the named card.
fn click_card_named(session: &mut GameSession, name: &str) {
    let at = card_position(session, name);
    click(session, at);
}

/// Clicks the centre of a board slot.
fn click_slot_numbered(session: &mut GameSession, raw: i64) {
    let at = session.board().slot(slot(raw)).screen();
    click(session, at);
}

fn card_position(session: &GameSession, name: &str) -> Vec2 {
    session
        .hand()
        .cards()
        .iter()
        .find(|c| c.name() == name)
        .map(|c| c.motion().current())
        .expect("card in hand")
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn test_game_start_with_two_cards_gives_symmetric_distinct_targets() {
    // Arrange
    let (mut session, loader) = new_session();

    // Act
    route_frame(&mut session, GAME_START_TWO_CARDS);

    // Assert
    let cards = session.hand().cards();
    assert_eq!(cards.len(), 2);
    let a = cards[0].motion().target();
    let b = cards[1].motion().target();
    assert_ne!(a, b, "cards must not overlap");
    let centre = session.viewport().width / 2.0;
    assert!(((centre - a.x) - (b.x - centre)).abs() < 1e-3, "hand must be centred");
    assert_eq!(a.y, b.y);
    assert_eq!(
        loader.requests().lock().unwrap().as_slice(),
        ["src/a.png", "src/b.png"]
    );
}

#[test]
fn test_select_card_then_click_slot_sends_play_card() {
    // Arrange
    let mut session = started_game();
    let a_pos = card_position(&session, "A");

    // Act: click card A, then the centre slot
    click(&mut session, a_pos);
    let centre_slot = session.board().slot(slot(4)).screen();
    click(&mut session, centre_slot);

    // Assert
    assert_eq!(
        session.drain_outbox(),
        vec![ClientMessage::PlayCard {
            name: "A".into(),
            description: "First card".into(),
            graphic_path: "src/a.png".into(),
            target_slot: 4,
        }]
    );
    let pending = session.pending_play().expect("play is pending");
    assert_eq!(pending.slot, slot(4));
    assert!(pending.ghost.is_some());
}

#[test]
fn test_play_card_success_places_marker_and_removes_card() {
    // Arrange
    let mut session = started_game();
    click_card_named(&mut session, "A");
    click_slot_numbered(&mut session, 4);

    // Act
    route_frame(&mut session, r#"{"type":"play_card_success","target_slot":4}"#);
    settle(&mut session);

    // Assert
    let marker = session
        .board()
        .slot(slot(4))
        .marker()
        .expect("marker on slot 4");
    assert_eq!(marker.graphic_path(), "src/a_mark.png");
    assert_eq!(marker.motion().current(), session.board().slot(slot(4)).screen());
    assert!(session.hand().cards().iter().all(|c| c.name() != "A"));
    assert_eq!(session.hand().selection().state(), SelectionState::Unselected);
    assert!(session.pending_play().is_none());
    assert!(session.panel().is_none());
}

#[test]
fn test_game_state_shows_latest_displayable_effect() {
    // Arrange
    let (mut session, _) = new_session();
    let frame = r#"{"type":"game_state","board_state":[
        {"ID":3,"Effects":[
            {"GraphicPath":"src/first.png","IsDisplayable":false},
            {"GraphicPath":"src/second.png","IsDisplayable":true}
        ]}
    ]}"#;

    // Act
    route_frame(&mut session, frame);

    // Assert
    assert_eq!(
        session.board().slot(slot(3)).marker().unwrap().graphic_path(),
        "src/second.png"
    );
    assert_eq!(session.board().marker_count(), 1);
}

#[test]
fn test_game_state_without_displayable_effect_leaves_slot_alone() {
    let (mut session, _) = new_session();
    route_frame(
        &mut session,
        r#"{"type":"game_state","board_state":[{"ID":2,"Effects":[{"GraphicPath":"src/x.png","IsDisplayable":true}]}]}"#,
    );

    route_frame(
        &mut session,
        r#"{"type":"game_state","board_state":[{"ID":2,"Effects":[{"GraphicPath":"src/trap.png","IsDisplayable":false}]},{"ID":42}]}"#,
    );

    assert_eq!(
        session.board().slot(slot(2)).marker().unwrap().graphic_path(),
        "src/x.png"
    );
}

#[test]
fn test_server_error_rolls_back_optimistic_play() {
    // Arrange
    let mut session = started_game();
    click_card_named(&mut session, "B");
    click_slot_numbered(&mut session, 0);
    session.drain_outbox();

    // Act
    route_frame(&mut session, r#"{"type":"error"}"#);

    // Assert
    assert!(session.pending_play().is_none());
    assert_eq!(session.board().marker_count(), 0);
    assert_eq!(session.hand().len(), 2);
    assert_eq!(session.panel().map(|p| p.title.as_str()), Some("B"));
}

#[test]
fn test_switching_selection_updates_panel_once_and_keeps_one_selected() {
    let mut session = started_game();

    click_card_named(&mut session, "A");
    settle(&mut session);
    click_card_named(&mut session, "B");

    let selected: Vec<_> = session
        .hand()
        .cards()
        .iter()
        .filter(|c| c.is_selected())
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(selected, vec!["B".to_string()]);
    assert_eq!(session.panel().unwrap().title, "B");
}

#[test]
fn test_resize_keeps_markers_on_their_slots() {
    // Arrange
    let (mut session, _) = new_session();
    route_frame(
        &mut session,
        r#"{"type":"game_state","board_state":[{"ID":8,"Effects":[{"GraphicPath":"src/o.png","IsDisplayable":true}]}]}"#,
    );
    let before = session.board().slot(slot(8)).screen();

    // Act
    session.handle_input(
        InputEvent::Resize {
            width: 480.0,
            height: 800.0,
        },
        Instant::now(),
    );

    // Assert
    let after = session.board().slot(slot(8));
    assert_ne!(after.screen(), before);
    let marker = after.marker().expect("marker survives resize");
    assert_eq!(marker.graphic_path(), "src/o.png");
    assert_eq!(marker.motion().current(), after.screen());
}

#[test]
fn test_unknown_message_leaves_state_untouched() {
    let mut session = started_game();

    let routed = route_frame(&mut session, r#"{"type":"emote","id":3}"#);

    assert!(routed.is_none());
    assert_eq!(session.hand().len(), 2);
}

#[test]
fn test_remove_cards_removes_by_name() {
    let mut session = started_game();

    route_frame(
        &mut session,
        r#"{"type":"remove_cards","cards_to_remove":[{"Name":"A"}]}"#,
    );

    assert_eq!(session.hand().len(), 1);
    assert_eq!(session.hand().cards()[0].name(), "B");
}

#[test]
fn test_game_state_before_confirmation_keeps_server_marker() {
    // Arrange
    let mut session = started_game();
    click_card_named(&mut session, "A");
    click_slot_numbered(&mut session, 4);
    route_frame(
        &mut session,
        r#"{"type":"game_state","board_state":[{"ID":4,"Effects":[{"GraphicPath":"src/server.png","IsDisplayable":true}]}]}"#,
    );
    settle(&mut session);

    // Act
    route_frame(&mut session, r#"{"type":"play_card_success","target_slot":4}"#);
    settle(&mut session);

    // Assert
    let slot4 = session.board().slot(slot(4));
    let marker = slot4.marker().expect("marker on slot 4");
    assert_eq!(marker.graphic_path(), "src/server.png");
    assert_eq!(marker.motion().current(), slot4.screen());
    assert_eq!(session.hand().len(), 1);
    assert_eq!(session.hand().cards()[0].name(), "B");
}

#[test]
fn test_confirmation_after_timeout_removes_the_played_card() {
    // Arrange: a short timeout so the play of A is rolled back
    let loader = RecordingAssetLoader::new();
    let config = SessionConfig {
        pending_play_timeout: Some(Duration::from_millis(100)),
        ..SessionConfig::default()
    };
    let mut session = GameSession::new(config, Box::new(loader));
    route_frame(&mut session, GAME_START_TWO_CARDS);
    load(&mut session, "src/a.png");
    load(&mut session, "src/b.png");
    settle(&mut session);

    click_card_named(&mut session, "A");
    click_slot_numbered(&mut session, 4);
    session.on_frame(Instant::now() + Duration::from_millis(500));
    assert!(session.pending_play().is_none());
    settle(&mut session);
    click_card_named(&mut session, "B");

    // Act: the server's answer for A arrives late
    route_frame(&mut session, r#"{"type":"play_card_success","target_slot":4}"#);

    // Assert
    let names: Vec<_> = session.hand().cards().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["B"]);
    assert_eq!(
        session.board().slot(slot(4)).marker().unwrap().graphic_path(),
        "src/a_mark.png"
    );
    assert_eq!(session.hand().selection().state(), SelectionState::Unselected);
}
