//! Property tests for batch processing

use arcstd_engine::{
    ArcStandard, ExecutionMode, ExplorationPolicy, FirstValidScorer, GoldTree, OracleMode,
    OracleProcessor, OracleProcessorBuilder, TransitionSystem,
};
use proptest::prelude::*;

const NUM_LABELS: usize = 4;

/// Random projective tree from arbitrary valid actions
fn random_tree(num_words: usize, choices: &[usize]) -> GoldTree {
    let system = ArcStandard::new(NUM_LABELS);
    let mut state = system.initial_state(num_words + 1);
    let mut picks = choices.iter().cycle();
    while !state.is_terminal() {
        let valid = system.valid_actions(&state);
        let pick = picks.next().copied().unwrap_or(0);
        system.perform_action(&mut state, valid[pick % valid.len()]);
    }
    let (heads, deprels) = state.read_out().into_parts();
    GoldTree::new(heads, deprels, NUM_LABELS).unwrap()
}

fn corpus() -> impl Strategy<Value = Vec<GoldTree>> {
    prop::collection::vec(
        (1usize..9, prop::collection::vec(0usize..16, 1..24))
            .prop_map(|(n, choices)| random_tree(n, &choices)),
        1..12,
    )
}

fn processor(mode: ExecutionMode) -> OracleProcessor {
    OracleProcessorBuilder::new(NUM_LABELS)
        .execution_mode(mode)
        .threads(Some(2))
        .oracle_mode(OracleMode::Dynamic)
        .exploration(ExplorationPolicy::Always)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parallel_and_sequential_derivations_agree(trees in corpus()) {
        let sequential = processor(ExecutionMode::Sequential).derive(&trees).unwrap();
        let parallel = processor(ExecutionMode::Parallel).derive(&trees).unwrap();

        prop_assert_eq!(&sequential.items, &parallel.items);
        prop_assert_eq!(sequential.metrics.skipped, 0);
        for (derivation, tree) in sequential.items.iter().zip(&trees) {
            prop_assert!(derivation.reproduces);
            prop_assert_eq!(derivation.actions.len(), 2 * tree.num_words());
        }
        prop_assert_eq!(sequential.metrics.score.labeled, sequential.metrics.score.total);
    }

    #[test]
    fn exploring_episodes_stay_well_formed(trees in corpus()) {
        let output = processor(ExecutionMode::Sequential)
            .train(&trees, &FirstValidScorer)
            .unwrap();

        for (episode, tree) in output.items.iter().zip(&trees) {
            prop_assert_eq!(episode.steps.len(), 2 * tree.num_words());
            for step in &episode.steps {
                prop_assert_eq!(step.costs.len(), step.candidates.len());
                prop_assert!(step.candidates.contains(&step.taken));
                let oracle = step.candidates.iter().position(|&a| a == step.oracle).unwrap();
                prop_assert_eq!(Some(&step.costs[oracle]), step.costs.iter().min());
            }
        }
    }
}
