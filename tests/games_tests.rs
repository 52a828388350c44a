//! Reference game tests against the GameState contract.

use mcts_engine::games::connect4::{Column, COLS, ROWS};
use mcts_engine::games::tictactoe::Cell;
use mcts_engine::games::{Connect4, TicTacToe};
use mcts_engine::{GameResult, GameRng, GameState, MctsError, PlayerId};

/// Play uniformly random games, checking the contract after every move.
fn check_random_games<S: GameState + Default>(games: usize, seed: u64) {
    let mut rng = GameRng::new(seed);

    for _ in 0..games {
        let mut state = S::default();
        while !state.is_terminal() {
            assert!(state.winner().is_none());
            let moves = state.possible_moves();
            assert!(!moves.is_empty());

            let before = state.current_player();
            let mv = rng.choose(&moves).unwrap().clone();
            state.make_move(&mv).unwrap();

            assert_eq!(state.last_move(), Some(&mv));
            assert_eq!(state.previous_player(), before);
            assert_eq!(state.current_player(), before.next(state.player_count()));
        }

        assert!(state.winner().is_some());
        assert!(state.possible_moves().is_empty());
    }
}

// =============================================================================
// Contract
// =============================================================================

#[test]
fn test_tictactoe_terminal_iff_winner() {
    check_random_games::<TicTacToe>(200, 1);
}

#[test]
fn test_connect4_terminal_iff_winner() {
    check_random_games::<Connect4>(100, 2);
}

#[test]
fn test_simulation_never_mutates() {
    let mut rng = GameRng::new(3);
    let mut state = Connect4::new();
    state.make_move(&Column::new(3).unwrap()).unwrap();
    let before = state.clone();

    for _ in 0..50 {
        if let GameResult::Winner(winner) = state.simulate_until_end(&mut rng).unwrap() {
            assert!(winner == PlayerId::new(1) || winner == PlayerId::new(2));
        }
    }

    assert_eq!(state, before);
}

#[test]
fn test_duplicate_diverges() {
    let mut original = TicTacToe::new();
    original.make_move(&Cell::new(0, 0).unwrap()).unwrap();

    let mut copy = original.duplicate();
    copy.make_move(&Cell::new(2, 2).unwrap()).unwrap();

    assert_eq!(original.moves_played(), 1);
    assert_eq!(copy.moves_played(), 2);
    assert_eq!(original.cell(Cell::new(2, 2).unwrap()), None);
}

// =============================================================================
// Connect Four
// =============================================================================

#[test]
fn test_full_column_scenario() {
    let mut state = Connect4::new();
    assert_eq!(state.possible_moves().len(), COLS);

    let col = Column::new(0).unwrap();
    for i in 0..ROWS {
        // A single column alternates colours, so nobody wins
        assert!(state.winner().is_none());
        assert!(state.possible_moves().contains(&col));
        state.make_move(&col).unwrap();
        assert_eq!(state.height(0) as usize, i + 1);
    }

    assert_eq!(state.possible_moves().len(), COLS - 1);
    assert!(!state.possible_moves().contains(&col));

    let err = state.make_move(&col).unwrap_err();
    assert!(matches!(err, MctsError::InvalidMove { .. }));
    assert!(err.to_string().contains("full"));

    // The failed move changed nothing
    assert_eq!(state.height(0) as usize, ROWS);
    assert_eq!(state.current_player(), PlayerId::new(1));
}

#[test]
fn test_off_board_moves_rejected() {
    assert!(matches!(Column::new(COLS as u8), Err(MctsError::InvalidMove { .. })));
    assert!(matches!(Cell::new(3, 0), Err(MctsError::InvalidMove { .. })));
    assert!(matches!(Cell::new(0, 3), Err(MctsError::InvalidMove { .. })));
}

#[test]
fn test_connect4_horizontal_win() {
    let mut state = Connect4::new();
    for col in [0, 0, 1, 1, 2, 2, 3] {
        state.make_move(&Column::new(col).unwrap()).unwrap();
    }

    assert_eq!(state.winner(), Some(GameResult::Winner(PlayerId::new(1))));
    assert!(state.is_terminal());
    assert!(matches!(
        state.make_move(&Column::new(4).unwrap()),
        Err(MctsError::InvalidMove { .. })
    ));
}
