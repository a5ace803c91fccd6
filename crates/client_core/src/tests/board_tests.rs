use crate::board::{BattleBoard, MoveChoice, SwitchChoice, UPDATE_ERR_TEXT, WAIT_TEXT};
use shared::protocol::ServerUpdate;

fn board_with_content() -> BattleBoard {
    BattleBoard {
        moves: vec![MoveChoice {
            idx: 0,
            label: "Tackle\n10/10".to_string(),
            disabled: false,
        }],
        switches: vec![SwitchChoice {
            idx: 0,
            label: "Pikachu 100/100".to_string(),
            disabled: true,
        }],
        message: "old message".to_string(),
    }
}

fn parse(frame: &str) -> ServerUpdate {
    ServerUpdate::parse(frame).expect("frame should parse")
}

#[test]
fn inactive_clears_all_regions_and_shows_wait_text() {
    let mut board = board_with_content();
    board.apply(&parse("inactive"));
    assert!(board.moves.is_empty());
    assert!(board.switches.is_empty());
    assert_eq!(board.message, WAIT_TEXT);
}

#[test]
fn uperr_touches_only_the_message_region() {
    let mut board = board_with_content();
    let before = board.clone();
    board.apply(&parse("uperr"));
    assert_eq!(board.moves, before.moves);
    assert_eq!(board.switches, before.switches);
    assert_eq!(board.message, UPDATE_ERR_TEXT);
}

#[test]
fn log_frame_shows_raw_payload_verbatim() {
    let raw = r#"["|turn|2","|-damage|p2a: Gengar|12\/100"]"#;
    let mut board = board_with_content();
    board.apply(&parse(raw));
    assert_eq!(board.message, raw);
}

#[test]
fn wait_update_changes_nothing() {
    let mut board = board_with_content();
    let before = board.clone();
    board.apply(&parse(r#"{"wait":true}"#));
    assert_eq!(board, before);
}

#[test]
fn forced_switch_skips_the_move_region() {
    let frame = r#"{
        "forceSwitch": [true],
        "active": [{"moves": [{"move":"Tackle","pp":10,"maxpp":10}]}],
        "side": {"pokemon": [
            {"details":"Pikachu","condition":"0 fnt","active":true},
            {"details":"Eevee","condition":"80/100"}
        ]}
    }"#;
    let mut board = board_with_content();
    board.apply(&parse(frame));
    assert!(board.moves.is_empty());
    assert_eq!(board.switches.len(), 2);
}

#[test]
fn unforced_snapshot_renders_one_option_per_move_in_order() {
    let frame = r#"{
        "forceSwitch": [false],
        "active": [{"moves": [
            {"move":"Thunderbolt","pp":15,"maxpp":24},
            {"move":"Quick Attack","pp":0,"maxpp":48,"disabled":true}
        ]}],
        "side": {"pokemon": [{"details":"Pikachu","condition":"100/100","active":true}]}
    }"#;
    let mut board = BattleBoard::default();
    board.apply(&parse(frame));
    assert_eq!(
        board.moves,
        vec![
            MoveChoice {
                idx: 0,
                label: "Thunderbolt\n15/24".to_string(),
                disabled: false,
            },
            MoveChoice {
                idx: 1,
                label: "Quick Attack\n0/48".to_string(),
                disabled: true,
            },
        ]
    );
}

#[test]
fn fainted_and_active_members_are_disabled_switch_targets() {
    let frame = r#"{
        "active": [{"moves": [{"move":"Tackle","pp":10,"maxpp":10}]}],
        "side": {"pokemon": [
            {"details":"Pikachu","condition":"100/100","active":true},
            {"details":"Gengar","condition":"0 fnt"},
            {"details":"Eevee","condition":"55/100"}
        ]}
    }"#;
    let mut board = BattleBoard::default();
    board.apply(&parse(frame));
    let disabled: Vec<bool> = board.switches.iter().map(|s| s.disabled).collect();
    assert_eq!(disabled, vec![true, true, false]);
    assert_eq!(board.switches[1].label, "Gengar 0 fnt");
    assert_eq!(board.switches[2].idx, 2);
}

// Worked example from the server's wire protocol.
#[test]
fn contract_example_snapshot_renders_expected_labels() {
    let frame = r#"{"active":[{"moves":[{"move":"Tackle","pp":10,"maxpp":10,"disabled":false}]}],"side":{"pokemon":[{"details":"Pikachu","condition":"100/100","active":true}]}}"#;
    let mut board = BattleBoard::default();
    board.apply(&parse(frame));

    assert_eq!(board.moves.len(), 1);
    assert_eq!(board.moves[0].label, "Tackle\n10/10");
    assert!(!board.moves[0].disabled);

    assert_eq!(board.switches.len(), 1);
    assert_eq!(board.switches[0].label, "Pikachu 100/100");
    assert!(board.switches[0].disabled);

    assert!(board.message.is_empty());
}

#[test]
fn snapshot_without_active_combatant_renders_no_moves() {
    let frame = r#"{"side":{"pokemon":[{"details":"Eevee","condition":"80/100"}]}}"#;
    let mut board = board_with_content();
    board.apply(&parse(frame));
    assert!(board.moves.is_empty());
    assert_eq!(board.switches.len(), 1);
}
