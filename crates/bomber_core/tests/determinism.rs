//! Full-match determinism: identical seeds and action streams must
//! reproduce identical final states, hash for hash.

use bomber_core::arena::Arena;
use bomber_core::components::Action;
use bomber_core::config::GameConfig;
use bomber_test_utils::determinism::{
    find_first_divergence, run_parallel_matches_scoped, strategies, verify_determinism,
};
use bomber_test_utils::fixtures;
use proptest::prelude::*;

/// Play a scripted match: the same action stream fed to every agent in
/// turn order, with bomb updates at round boundaries.
fn play_script(config: GameConfig, script: &[Action]) -> Arena {
    let mut arena = Arena::new(config);
    let mut cursor = 0usize;
    while cursor < script.len() {
        for _ in 0..arena.agents().len() {
            let agent = arena.current_agent_id();
            if arena.agent(agent).unwrap().alive {
                let action = script[cursor % script.len()];
                arena.apply_move(agent, action).unwrap();
            }
            cursor += 1;
            arena.next_turn();
            if arena.current_index() == 0 {
                arena.update_bombs();
            }
        }
    }
    arena
}

#[test]
fn idle_matches_are_reproducible() {
    verify_determinism(
        5,
        50,
        || Arena::new(GameConfig::default().with_seed(12345)),
        bomber_test_utils::determinism::idle_round,
        Arena::state_hash,
    )
    .assert_deterministic();
}

#[test]
fn parallel_idle_matches_agree() {
    run_parallel_matches_scoped(|| fixtures::open_arena(2024), 8, 40).assert_deterministic();
}

#[test]
fn no_divergence_over_long_runs() {
    assert_eq!(
        find_first_divergence(|| Arena::new(GameConfig::default().with_seed(9)), 200),
        None
    );
}

proptest! {
    #[test]
    fn random_action_streams_replay_identically(
        seed in 1u64..5000,
        script in strategies::arb_action_stream(40),
    ) {
        let config = GameConfig::default().with_seed(seed);
        let a = play_script(config.clone(), &script);
        let b = play_script(config, &script);
        prop_assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn turn_and_round_counters_stay_coupled(turns in 0u64..500) {
        let mut arena = fixtures::open_arena(1);
        let n = arena.agents().len() as u64;
        for _ in 0..turns {
            arena.next_turn();
        }
        prop_assert_eq!(u64::from(arena.round_count()), turns / n);
        prop_assert_eq!(arena.current_index() as u64, turns % n);
    }
}
