//! TreeSearch integration tests on the reference games.

use std::sync::Arc;
use std::thread;

use mcts_engine::games::connect4::Column;
use mcts_engine::games::tictactoe::{Cell, TicTacToe};
use mcts_engine::games::Connect4;
use mcts_engine::mcts::{MCTSConfig, MCTSTree, StepOutcome, StopReason, TreeSearch, Worker};
use mcts_engine::{GameResult, GameState, PlayerId};
use proptest::prelude::*;

fn tictactoe_after(cells: &[(u8, u8)]) -> TicTacToe {
    let mut state = TicTacToe::new();
    for &(r, c) in cells {
        state.make_move(&Cell::new(r, c).unwrap()).unwrap();
    }
    state
}

/// Check structural and visit-count invariants over the whole tree.
///
/// With `rollouts` playouts per simulated node, every non-root node holds
/// its own playouts (1 for a terminal) plus everything its children hold.
fn assert_tree_invariants<S: GameState>(tree: &MCTSTree<S>, rollouts: u32) {
    for (id, node) in tree.iter() {
        let from_children: u32 = node.children().iter().map(|&c| tree.get(c).visits()).sum();
        let own = match node.parent() {
            None => 0,
            Some(_) if node.is_leaf() => 1,
            Some(_) => rollouts,
        };
        assert_eq!(node.visits(), own + from_children, "visit sum at {id}");

        let avg = node.average_score();
        assert!((0.0..=1.0).contains(&avg), "average {avg} at {id}");
        assert!(node.total_score() <= node.visits() as f64);

        if let Some(parent) = node.parent() {
            assert_eq!(node.depth(), tree.get(parent).depth() + 1);
            assert!(tree.get(parent).children().contains(&id));
        }

        assert_eq!(node.is_leaf(), node.state().winner().is_some());
        if node.is_fully_explored() {
            assert!(!node.has_untried());
            assert!(node.children().iter().all(|&c| tree.get(c).is_fully_explored()));
        }
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_nine_steps_expand_every_opening() {
    let search = TreeSearch::new(TicTacToe::new(), MCTSConfig::default()).unwrap();

    for _ in 0..9 {
        assert!(matches!(search.step().unwrap(), StepOutcome::Expanded(_)));
    }

    assert!(search.unique_node_count().unwrap() >= 2);
    search
        .with_tree(|tree| {
            let root = tree.root_node();
            assert_eq!(root.children().len(), root.state().possible_moves().len());
            assert_eq!(root.children().len(), 9);
            assert!(!root.has_untried());
            assert_eq!(root.visits(), 9);
            assert_tree_invariants(tree, 1);
        })
        .unwrap();
}

#[test]
fn test_endgame_scores_follow_mover() {
    // X to move: (0,2) wins now, (2,1) and (2,2) leave O a winning reply
    let state = tictactoe_after(&[(0, 0), (1, 0), (0, 1), (1, 1), (1, 2), (2, 0)]);
    let search = TreeSearch::new(state, MCTSConfig::default()).unwrap();

    assert_eq!(search.run_steps(u64::MAX).unwrap(), 9);
    assert_eq!(search.step().unwrap(), StepOutcome::Exhausted);

    search
        .with_tree(|tree| {
            assert_tree_invariants(tree, 1);
            assert!(tree.root_node().is_fully_explored());

            // Every game in this subtree is won by whoever moves last
            for (_, node) in tree.iter().filter(|(_, n)| n.is_leaf()) {
                assert_eq!(node.visits(), 1);
                assert_eq!(node.total_score(), 1.0);
                assert!(node.state().winner().unwrap().is_winner(node.mover().unwrap()));
            }
        })
        .unwrap();
}

#[test]
fn test_drawing_move_scores_half() {
    let state = tictactoe_after(&[
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 1),
        (1, 0),
        (1, 2),
        (2, 1),
        (2, 0),
    ]);
    let search = TreeSearch::new(state, MCTSConfig::default()).unwrap();

    assert!(matches!(search.step().unwrap(), StepOutcome::Expanded(_)));
    assert_eq!(search.step().unwrap(), StepOutcome::Exhausted);

    search
        .with_tree(|tree| {
            let child = tree.get(tree.root_node().children()[0]);
            assert_eq!(child.outcome(), Some(GameResult::Draw));
            assert_eq!(child.total_score(), 0.5);
            assert_eq!(tree.root_node().total_score(), 0.5);
        })
        .unwrap();

    // A single visit is not enough to recommend anything
    assert_eq!(search.best_move().unwrap(), None);
}

#[test]
fn test_reply_credit_alternates() {
    // One step below the root: the root's children are credited to
    // player 1, the grandchildren to player 2.
    let search = TreeSearch::new(TicTacToe::new(), MCTSConfig::default()).unwrap();
    search.run_steps(50).unwrap();

    search
        .with_tree(|tree| {
            for (_, node) in tree.iter().skip(1) {
                let expected = if node.depth() % 2 == 1 {
                    PlayerId::new(1)
                } else {
                    PlayerId::new(2)
                };
                assert_eq!(node.mover(), Some(expected));
                assert_eq!(node.perspective(), expected);
            }
        })
        .unwrap();
}

#[test]
fn test_connect4_search_with_parallel_rollouts() {
    let config = MCTSConfig::default()
        .with_rollouts(16)
        .with_parallel_rollouts(8, 4);
    let search = TreeSearch::new(Connect4::new(), config).unwrap();

    assert_eq!(search.run_steps(40).unwrap(), 40);

    let stats = search.stats().unwrap();
    assert_eq!(stats.steps, 40);
    assert_eq!(stats.parallel_batches, 40 - stats.terminal_expansions);
    assert_eq!(stats.simulations, 16 * stats.parallel_batches);

    search.with_tree(|tree| assert_tree_invariants(tree, 16)).unwrap();

    let best: Column = search.best_move().unwrap().unwrap();
    assert!((best.column() as usize) < 7);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_threads_stepping_one_search() {
    let search = Arc::new(TreeSearch::new(Connect4::new(), MCTSConfig::default()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let search = Arc::clone(&search);
            thread::spawn(move || search.run_steps(250).unwrap())
        })
        .collect();
    let total: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(total, 1000);
    assert_eq!(search.node_count().unwrap(), 1001);
    search
        .with_tree(|tree| {
            assert_eq!(tree.root_node().visits(), 1000);
            assert_tree_invariants(tree, 1);
        })
        .unwrap();
}

#[test]
fn test_workers_keep_tree_consistent() {
    let config = MCTSConfig::default()
        .with_max_nodes(1501)
        .with_rollouts(4)
        .with_parallel_rollouts(2, 2);
    let search = Arc::new(TreeSearch::new(Connect4::new(), config).unwrap());

    let workers = Worker::spawn_pool(3, &search).unwrap();
    let reports: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    assert!(reports.iter().all(|r| r.reason == StopReason::NodeLimit));
    assert_eq!(reports.iter().map(|r| r.steps).sum::<u64>(), 1500);

    search.with_tree(|tree| assert_tree_invariants(tree, 4)).unwrap();
    let unique = search.unique_nodes().unwrap();
    let all = search.all_nodes().unwrap();
    assert!(unique.len() <= all.len());
    assert!(unique.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_finish_from_another_thread() {
    let search = Arc::new(TreeSearch::new(Connect4::new(), MCTSConfig::default()).unwrap());
    let driver = {
        let search = Arc::clone(&search);
        thread::spawn(move || search.run_steps(u64::MAX).unwrap())
    };

    while search.node_count().unwrap() < 100 {
        thread::yield_now();
    }
    search.finish();

    let steps = driver.join().unwrap();
    assert!(steps >= 99);
    assert_eq!(search.stats().unwrap().steps, steps);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_visits_and_exhaustion_are_monotone(seed in any::<u64>(), steps in 1u64..120) {
        let config = MCTSConfig::default().with_seed(seed);
        let search = TreeSearch::new(TicTacToe::new(), config).unwrap();

        let snapshot = |s: &TreeSearch<TicTacToe>| {
            s.with_tree(|tree| {
                tree.iter()
                    .map(|(_, n)| (n.visits(), n.is_fully_explored()))
                    .collect::<Vec<_>>()
            })
            .unwrap()
        };

        let mut before = snapshot(&search);
        for _ in 0..steps {
            search.step().unwrap();
            let after = snapshot(&search);
            for (old, new) in before.iter().zip(&after) {
                prop_assert!(new.0 >= old.0);
                prop_assert!(new.1 || !old.1);
            }
            before = after;
        }
    }

    #[test]
    fn prop_averages_stay_in_unit_range(seed in any::<u64>(), rollouts in 1u32..6) {
        let config = MCTSConfig::default().with_seed(seed).with_rollouts(rollouts);
        let search = TreeSearch::new(Connect4::new(), config).unwrap();
        search.run_steps(60).unwrap();

        search
            .with_tree(|tree| {
                for (_, node) in tree.iter() {
                    let avg = node.average_score();
                    assert!((0.0..=1.0).contains(&avg));
                }
                assert_tree_invariants(tree, rollouts);
            })
            .unwrap();
    }
}
