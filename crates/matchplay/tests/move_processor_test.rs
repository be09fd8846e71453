//! Tests for the pure move processor and match lifecycle transitions.

use chrono::Utc;
use matchplay::{
    InvalidMove, Mark, Match, MatchError, MatchStatus, PlayerId, Slot, Square, apply_move,
};

fn u1() -> PlayerId {
    PlayerId::new("u1")
}

fn u2() -> PlayerId {
    PlayerId::new("u2")
}

/// Match with u1 in slot 0, u2 in slot 1, started with `first` to move.
fn started(first: Slot) -> Match {
    Match::create(u1(), Utc::now())
        .start(&u2(), first, Utc::now())
        .expect("Start failed")
}

/// Plays `moves` alternately starting with whoever holds the turn.
fn play(mut m: Match, moves: &[usize]) -> Match {
    for &index in moves {
        let turn = m.turn().expect("No turn");
        let player = m.occupant(turn).expect("Empty seat").clone();
        m = apply_move(&m, &player, index, Utc::now()).expect("Move failed");
    }
    m
}

#[test]
fn test_create_seats_creator() {
    let m = Match::create(u1(), Utc::now());
    assert_eq!(*m.status(), MatchStatus::Created);
    assert_eq!(m.players().len(), 1);
    assert_eq!(m.players()[0].user_id(), &u1());
    assert_eq!(*m.players()[0].slot(), Slot::First);
    assert_eq!(*m.turn(), None);
    assert!(m.squares().squares().iter().all(|s| *s == Square::Empty));
    assert_eq!(*m.version(), 0);
}

#[test]
fn test_start_seats_second_player() {
    let m = started(Slot::Second);
    assert_eq!(*m.status(), MatchStatus::InProgress);
    assert_eq!(m.slot_of(&u2()), Some(Slot::Second));
    assert_eq!(*m.turn(), Some(Slot::Second));
    assert_eq!(*m.version(), 1);
}

#[test]
fn test_start_by_creator_alone() {
    let m = Match::create(u1(), Utc::now())
        .start(&u1(), Slot::First, Utc::now())
        .expect("Start failed");
    assert_eq!(*m.status(), MatchStatus::InProgress);
    assert_eq!(m.players().len(), 1);
}

#[test]
fn test_start_rejects_third_player() {
    let m = started(Slot::First);
    let err = m
        .start(&PlayerId::new("u3"), Slot::First, Utc::now())
        .expect_err("Third player should be rejected");
    assert!(matches!(err, MatchError::NotParticipant(p) if p == PlayerId::new("u3")));
}

#[test]
fn test_restart_clears_board_and_winner() {
    let won = play(started(Slot::First), &[0, 3, 1, 4, 2]);
    assert_eq!(*won.status(), MatchStatus::Won);
    assert_eq!(won.winner_id().as_ref(), Some(&u1()));

    let again = won.start(&u2(), Slot::Second, Utc::now()).expect("Restart failed");
    assert_eq!(*again.status(), MatchStatus::InProgress);
    assert_eq!(*again.winner_id(), None);
    assert_eq!(again.squares().evaluate(), matchplay::Outcome::Undecided);
    assert!(again.squares().squares().iter().all(|s| *s == Square::Empty));
    assert_eq!(again.players().len(), 2);
}

#[test]
fn test_first_move_by_creator() {
    let m = started(Slot::First);
    let next = apply_move(&m, &u1(), 0, Utc::now()).expect("Move failed");
    assert_eq!(next.squares().get(0), Some(Square::Occupied(Mark::X)));
    assert_eq!(*next.turn(), Some(Slot::Second));
    assert_eq!(*next.status(), MatchStatus::InProgress);
    assert_eq!(*next.version(), *m.version() + 1);
}

#[test]
fn test_second_slot_plays_o() {
    let m = started(Slot::Second);
    let next = apply_move(&m, &u2(), 8, Utc::now()).expect("Move failed");
    assert_eq!(next.squares().get(8), Some(Square::Occupied(Mark::O)));
    assert_eq!(*next.turn(), Some(Slot::First));
}

#[test]
fn test_out_of_turn_rejected() {
    let m = started(Slot::First);
    let err = apply_move(&m, &u2(), 4, Utc::now()).expect_err("Should be out of turn");
    match err {
        MatchError::OutOfTurn { requester, expected } => {
            assert_eq!(requester, u2());
            assert_eq!(expected, Some(u1()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_stranger_rejected_as_out_of_turn() {
    let m = started(Slot::First);
    let err = apply_move(&m, &PlayerId::new("u3"), 4, Utc::now()).expect_err("Stranger moved");
    assert!(matches!(err, MatchError::OutOfTurn { .. }));
}

#[test]
fn test_empty_seat_holds_turn() {
    let m = Match::create(u1(), Utc::now())
        .start(&u1(), Slot::Second, Utc::now())
        .expect("Start failed");
    let err = apply_move(&m, &u1(), 0, Utc::now()).expect_err("Nobody sits in slot 1");
    assert!(matches!(err, MatchError::OutOfTurn { expected: None, .. }));
}

#[test]
fn test_occupied_square_rejected() {
    let m = play(started(Slot::First), &[4]);
    assert_eq!(m.squares().get(4), Some(Square::Occupied(Mark::X)));

    let err = apply_move(&m, &u2(), 4, Utc::now()).expect_err("Overwrite accepted");
    assert!(matches!(
        err,
        MatchError::InvalidMove(InvalidMove::Occupied(4))
    ));
}

#[test]
fn test_out_of_range_rejected() {
    let m = started(Slot::First);
    let err = apply_move(&m, &u1(), 9, Utc::now()).expect_err("Index 9 accepted");
    assert!(matches!(
        err,
        MatchError::InvalidMove(InvalidMove::OutOfRange(9))
    ));
}

#[test]
fn test_move_before_start_rejected() {
    let m = Match::create(u1(), Utc::now());
    let err = apply_move(&m, &u1(), 0, Utc::now()).expect_err("Unstarted match accepted move");
    assert!(matches!(
        err,
        MatchError::InvalidMove(InvalidMove::NotInProgress(MatchStatus::Created))
    ));
}

#[test]
fn test_move_after_win_rejected() {
    let won = play(started(Slot::First), &[0, 3, 1, 4, 2]);
    let turn = won.turn().expect("Turn cleared");
    let player = won.occupant(turn).expect("Empty seat").clone();
    let err = apply_move(&won, &player, 8, Utc::now()).expect_err("Finished match accepted move");
    assert!(matches!(
        err,
        MatchError::InvalidMove(InvalidMove::NotInProgress(MatchStatus::Won))
    ));
}

#[test]
fn test_win_by_second_slot() {
    // O takes the middle column.
    let m = play(started(Slot::Second), &[1, 0, 4, 2, 7]);
    assert_eq!(*m.status(), MatchStatus::Won);
    assert_eq!(m.winner_id().as_ref(), Some(&u2()));
}

#[test]
fn test_draw_on_last_square() {
    // X O X / X O O / O X X
    let m = play(started(Slot::First), &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    assert_eq!(*m.status(), MatchStatus::Drawn);
    assert_eq!(*m.winner_id(), None);
    assert!(m.squares().is_full());
}

#[test]
fn test_rejected_move_leaves_input_untouched() {
    let m = play(started(Slot::First), &[4]);
    let before = m.clone();
    let _ = apply_move(&m, &u2(), 4, Utc::now());
    assert_eq!(m, before);
}

#[test]
fn test_board_display_tracks_moves() {
    let m = play(started(Slot::First), &[4, 0]);
    assert_eq!(m.squares().display(), "O|1|2\n-+-+-\n3|X|5\n-+-+-\n6|7|8");
}

#[test]
fn test_removed_tombstone() {
    let m = started(Slot::First);
    let gone = m.removed(Utc::now());
    assert_eq!(*gone.status(), MatchStatus::Removed);
    assert_eq!(gone.id(), m.id());
}

#[test]
fn test_match_wire_format() {
    let m = play(started(Slot::First), &[0]);
    let json = serde_json::to_value(&m).expect("Serialize failed");
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["turn"], 1);
    assert_eq!(json["squares"][0], "X");
    assert!(json["squares"][1].is_null());
    assert_eq!(json["players"][1]["userId"], "u2");
    assert_eq!(json["players"][1]["slot"], 1);
    assert!(json["winnerId"].is_null());

    let back: Match = serde_json::from_value(json).expect("Deserialize failed");
    assert_eq!(back, m);
}
