//! Integration tests for the tactoe-core JSON codec.
//!
//! These tests feed literal frames, shaped exactly as the game server writes
//! them, through the public API and check the typed result.

use tactoe_core::{
    decode_server_message, encode_client_message, CardData, CardSpec, ClientMessage,
    ProtocolError, ServerMessage,
};

#[test]
fn test_game_start_with_two_cards() {
    let frame = r#"{
        "type": "game_start",
        "cards_to_add": [
            {"Type":"attack","Name":"Mark","Description":"Place a mark","GraphicPath":"src/card_test_mark.png","MarkerPath":"src/mark.png","ImpactType":"singular"},
            {"Type":"attack","Name":"Bomb","Description":"Clear an area","GraphicPath":"src/bomb.png","MarkerPath":"src/bomb_mark.png"}
        ]
    }"#;

    let msg = decode_server_message(frame).expect("game_start must decode");

    let ServerMessage::GameStart { cards_to_add } = msg else {
        panic!("expected GameStart, got {msg:?}");
    };
    assert_eq!(cards_to_add.len(), 2);
    assert_eq!(cards_to_add[0].name, "Mark");
    assert_eq!(cards_to_add[1].graphic_path, "src/bomb.png");
}

#[test]
fn test_draw_card_fields_sit_next_to_type() {
    let frame = r#"{"type":"draw_card","Name":"Mark","Description":"d","GraphicPath":"g.png","MarkerPath":"m.png"}"#;

    let msg = decode_server_message(frame).unwrap();

    assert_eq!(
        msg,
        ServerMessage::DrawCard(CardSpec {
            name: "Mark".into(),
            description: "d".into(),
            graphic_path: "g.png".into(),
            marker_path: "m.png".into(),
        })
    );
}

#[test]
fn test_draw_card_without_name_decodes_with_empty_name() {
    let frame = r#"{"type":"draw_card","Description":"d","GraphicPath":"g.png","MarkerPath":"m.png"}"#;

    let ServerMessage::DrawCard(spec) = decode_server_message(frame).unwrap() else {
        panic!("expected DrawCard");
    };
    assert_eq!(spec.name, "");
}

#[test]
fn test_game_state_keeps_effect_order() {
    let frame = r#"{"type":"game_state","board_state":[
        {"ID":3,"Effects":[
            {"GraphicPath":"first.png","IsDisplayable":false},
            {"GraphicPath":"second.png","IsDisplayable":true}
        ]},
        {"ID":5}
    ]}"#;

    let ServerMessage::GameState { board_state } = decode_server_message(frame).unwrap() else {
        panic!("expected GameState");
    };
    assert_eq!(board_state.len(), 2);
    assert_eq!(board_state[0].id, 3);
    assert_eq!(
        board_state[0].displayed_effect().unwrap().graphic_path,
        "second.png"
    );
    assert!(board_state[1].effects.is_empty());
}

#[test]
fn test_error_frame_without_fields() {
    let msg = decode_server_message(r#"{"type":"error"}"#).unwrap();
    assert_eq!(msg, ServerMessage::Error { reason: None });
}

#[test]
fn test_remove_cards_by_name() {
    let frame = r#"{"type":"remove_cards","cards_to_remove":[{"Name":"Mark"}]}"#;
    let ServerMessage::RemoveCards { cards_to_remove } = decode_server_message(frame).unwrap()
    else {
        panic!("expected RemoveCards");
    };
    assert_eq!(cards_to_remove[0].name, "Mark");
}

#[test]
fn test_unknown_kind_is_distinguished_from_malformed_frame() {
    let unknown = decode_server_message(r#"{"type":"spectator_joined"}"#).unwrap_err();
    let broken = decode_server_message(r#"{"type":"game_state","board_state":"x"}"#).unwrap_err();

    assert!(matches!(unknown, ProtocolError::UnknownMessageType(_)));
    assert!(matches!(broken, ProtocolError::Malformed { .. }));
}

#[test]
fn test_play_card_frame_built_from_card_data() {
    let card = CardData {
        name: "Mark".into(),
        description: "Place a mark".into(),
        graphic_path: "src/card_test_mark.png".into(),
        marker_path: "src/mark.png".into(),
    };

    let text = encode_client_message(&ClientMessage::play_card(&card, 4)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "type": "play_card",
            "name": "Mark",
            "description": "Place a mark",
            "graphicPath": "src/card_test_mark.png",
            "target_slot": 4
        })
    );
}
