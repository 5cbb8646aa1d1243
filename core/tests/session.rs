//! End-to-end session flows through the public API: playing, undoing,
//! saving and resuming through a store.

use game_128_core::{
    apply_move, start_new_game, undo, Board, Direction, GameState, History, MemoryStore,
    Persistence, Session, Status, Store, HISTORY_KEY, HISTORY_LIMIT, STATE_KEY,
};
use rand::rngs::mock::StepRng;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn lone_tile_state() -> GameState {
    GameState {
        board: Board::empty().with_tile(0, 3, 2),
        score: 0,
        is_game_over: false,
        is_win: false,
    }
}

#[test]
fn left_move_on_lone_tile() {
    let state = lone_tile_state();
    let mut rng = SmallRng::seed_from_u64(2048);
    let outcome = apply_move(&state, &History::new(), Direction::Left, &mut rng).unwrap();
    let board = outcome.state.board;

    assert_eq!(board.get(0, 0), 2);
    assert_eq!(board.empty_count(), 14);
    let spawned: Vec<u32> = board
        .cells()
        .filter(|&(i, j, v)| (i, j) != (0, 0) && v != 0)
        .map(|(_, _, v)| v)
        .collect();
    assert_eq!(spawned.len(), 1);
    assert!(spawned[0] == 2 || spawned[0] == 4);
    assert_eq!(outcome.state.score, 0);
    assert!(!outcome.state.is_game_over);
    assert!(!outcome.state.is_win);
}

#[test]
fn undo_after_one_move_restores_exact_state() {
    let mut rng = SmallRng::seed_from_u64(11);
    let (start, history) = start_new_game(&mut rng);

    let outcome = Direction::all()
        .into_iter()
        .find_map(|d| apply_move(&start, &history, d, &mut rng))
        .unwrap();
    let forced_terminal = GameState {
        is_game_over: true,
        is_win: true,
        ..outcome.state
    };

    let (restored, rest) = undo(&forced_terminal, &outcome.history).unwrap();
    assert_eq!(restored, start);
    assert_eq!(restored.status(), Status::Playing);
    assert!(rest.is_empty());
}

#[test]
fn eleventh_push_evicts_first_entry() {
    let mut rng = StepRng::new(0, 0);
    let mut state = GameState {
        board: Board::empty().with_tile(0, 0, 2),
        score: 0,
        is_game_over: false,
        is_win: false,
    };
    let mut history = History::new();
    let mut boards = Vec::new();

    // A board needs at least 14 accepted moves before it can fill up, so
    // some direction is always available here.
    for _ in 0..=HISTORY_LIMIT {
        boards.push(state.board);
        let outcome = Direction::all()
            .into_iter()
            .find_map(|d| apply_move(&state, &history, d, &mut rng))
            .unwrap();
        state = outcome.state;
        history = outcome.history;
    }

    assert_eq!(history.len(), HISTORY_LIMIT);
    let kept: Vec<Board> = history.iter().map(|e| e.board).collect();
    assert_eq!(kept, boards[1..].to_vec());
}

#[test]
fn session_resumes_from_store() {
    let mut first = Session::with_persistence(5, MemoryStore::new());
    for direction in [Direction::Left, Direction::Down, Direction::Right, Direction::Up] {
        first.step(direction);
    }
    let state = *first.state();
    let history = first.history().clone();
    let store = first.persistence().unwrap().store().clone();

    let resumed = Session::with_persistence(999, store);
    assert_eq!(resumed.state(), &state);
    assert_eq!(resumed.history(), &history);
}

#[test]
fn corrupt_save_starts_fresh() {
    let mut store = MemoryStore::new();
    store.set(STATE_KEY, "definitely not json").unwrap();
    store.set(HISTORY_KEY, "[").unwrap();

    let session = Session::with_persistence(5, store);
    assert_eq!(session.score(), 0);
    assert_eq!(session.board().empty_count(), 14);
    assert!(!session.can_undo());

    // The fresh game replaced the corrupt data.
    let saved = session.persistence().unwrap().load();
    assert_eq!(saved.game_state, Some(*session.state()));
}

#[test]
fn oversized_tile_save_starts_fresh() {
    let mut store = MemoryStore::new();
    store
        .set(
            STATE_KEY,
            r#"{"board":[[2147483648,2147483648,0,0],[0,0,0,0],[0,0,0,0],[0,0,0,0]],"score":0,"isGameOver":false,"isWin":false}"#,
        )
        .unwrap();

    let mut session = Session::with_persistence(3, store);
    assert_eq!(session.score(), 0);
    assert_eq!(session.board().empty_count(), 14);
    for direction in Direction::all() {
        session.step(direction);
    }
    assert!(session.board().max_tile() <= 32);
}

#[test]
fn saved_state_reads_like_browser_save() {
    let mut store = MemoryStore::new();
    store
        .set(
            STATE_KEY,
            r#"{"board":[[2,0,0,0],[0,4,0,0],[0,0,0,0],[0,0,0,128]],"score":260,"isGameOver":false,"isWin":true}"#,
        )
        .unwrap();
    store
        .set(
            HISTORY_KEY,
            r#"[{"board":[[2,0,0,0],[0,4,0,0],[0,0,0,64],[0,0,0,64]],"score":132}]"#,
        )
        .unwrap();

    let mut session = Session::with_persistence(0, store);
    assert_eq!(session.status(), Status::Won);
    assert_eq!(session.score(), 260);
    assert!(!session.step(Direction::Left).changed);

    assert!(session.undo());
    assert_eq!(session.status(), Status::Playing);
    assert_eq!(session.score(), 132);
    assert_eq!(session.board().get(3, 3), 64);
}

#[test]
fn clear_forgets_session() {
    let mut persistence = Persistence::new(MemoryStore::new());
    let mut rng = SmallRng::seed_from_u64(1);
    let (state, history) = start_new_game(&mut rng);
    persistence.save(&state, &history).unwrap();
    persistence.clear().unwrap();
    assert!(persistence.load().game_state.is_none());
}
