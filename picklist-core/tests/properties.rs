use std::collections::{HashMap, HashSet};

use picklist_core::{
    compliance_percent, resolve_contradictions, tally_points, Comparison, Outcome, RankingEngine,
    RankingTree, RawComparison, TeamId,
};
use proptest::prelude::*;

const TEAMS: [TeamId; 6] = [1, 2, 3, 4, 5, 6];

/// Comparisons among teams 1..=6. `pick` 0 is a tie, 1 picks the first team, 2 the second.
fn comparisons() -> impl Strategy<Value = Vec<Comparison>> {
    prop::collection::vec((1u32..=6, 1u32..=6, 0u8..3), 0..30).prop_map(|records| {
        records
            .into_iter()
            .filter(|(a, b, _)| a != b)
            .map(|(a, b, pick)| {
                let outcome = match pick {
                    0 => Outcome::Tie,
                    1 => Outcome::Better(a),
                    _ => Outcome::Better(b),
                };
                Comparison::new(a, b, outcome).unwrap()
            })
            .collect()
    })
}

/// A tree holding every team in `TEAMS` at an arbitrary (compacted) level.
fn tree() -> impl Strategy<Value = RankingTree> {
    prop::collection::vec(0usize..6, TEAMS.len()).prop_map(|levels| {
        let map: HashMap<TeamId, usize> = TEAMS.iter().copied().zip(levels).collect();
        RankingTree::from_level_map(&map)
    })
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Above(TeamId, TeamId),
    Below(TeamId, TeamId),
    Alongside(TeamId, TeamId),
    Promote(TeamId),
    Demote(TeamId),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        (1u32..=8, 1u32..=8).prop_map(|(t, r)| Mutation::Above(t, r)),
        (1u32..=8, 1u32..=8).prop_map(|(t, r)| Mutation::Below(t, r)),
        (1u32..=8, 1u32..=8).prop_map(|(t, r)| Mutation::Alongside(t, r)),
        (1u32..=8).prop_map(Mutation::Promote),
        (1u32..=8).prop_map(Mutation::Demote),
    ]
}

proptest! {
    #[test]
    fn resolver_is_idempotent(input in comparisons()) {
        let once = resolve_contradictions(&input);
        let twice = resolve_contradictions(&once.comparisons);
        prop_assert_eq!(&twice.comparisons, &once.comparisons);
        prop_assert_eq!(twice.contradictions_removed, 0);
        prop_assert_eq!(twice.duplicates_removed, 0);
        prop_assert_eq!(twice.ties_dropped, 0);
    }

    #[test]
    fn contradicted_pairs_do_not_survive(input in comparisons()) {
        let clean = resolve_contradictions(&input).comparisons;
        for a in &input {
            for b in &input {
                if a.contradicts(b) {
                    prop_assert!(
                        !clean.iter().any(|c| c.same_pair(a)),
                        "pair {}-{} survived", a.lower_team(), a.higher_team()
                    );
                }
            }
        }
        prop_assert!(clean.iter().all(|c| !c.is_tie()));
        let unique: HashSet<&Comparison> = clean.iter().collect();
        prop_assert_eq!(unique.len(), clean.len());
    }

    #[test]
    fn compliance_is_a_percentage(tree in tree(), input in comparisons()) {
        let percent = compliance_percent(&tree, &input);
        prop_assert!((0.0..=100.0).contains(&percent));

        let all_satisfied = input.iter().all(|c| tree.is_comparison_compliant(c));
        prop_assert_eq!(percent == 100.0, all_satisfied);
    }

    #[test]
    fn point_tally_sums_to_zero(input in comparisons()) {
        let points = tally_points(&TEAMS, &input);
        prop_assert_eq!(points.values().sum::<i64>(), 0);
        prop_assert_eq!(points.len(), TEAMS.len());
    }

    #[test]
    fn demote_then_promote_is_identity(tree in tree(), pick in 0usize..6) {
        let team = TEAMS[pick];
        let level = tree.get_level(team).unwrap();
        let shares_level = tree.level_map().iter().any(|(&t, &l)| t != team && l == level);
        // Only without compaction: the team must not be alone on a level above 0.
        prop_assume!(level > 0 && shares_level);

        let mut moved = tree.clone();
        moved.demote(team).unwrap();
        prop_assert_eq!(moved.get_level(team), Some(level - 1));
        moved.promote(team).unwrap();
        prop_assert_eq!(moved, tree);
    }

    #[test]
    fn mutations_keep_levels_contiguous(seed in 1u32..=8, ops in prop::collection::vec(mutation(), 0..60)) {
        let mut tree = RankingTree::new();
        tree.add_node(seed).unwrap();

        for op in ops {
            // Rejected mutations (missing or duplicate teams) must leave the tree untouched.
            let before = tree.clone();
            let outcome = match op {
                Mutation::Above(t, r) => tree.add_node_above(t, r),
                Mutation::Below(t, r) => tree.add_node_below(t, r),
                Mutation::Alongside(t, r) => tree.add_node_alongside(t, r),
                Mutation::Promote(t) => tree.promote(t),
                Mutation::Demote(t) => tree.demote(t),
            };
            if outcome.is_err() {
                prop_assert_eq!(&tree, &before);
            }
            prop_assert!(tree.validate().is_ok(), "gap after {:?}: {:?}", op, tree.level_map());
        }
    }

    #[test]
    fn engine_results_cover_every_team(
        records in prop::collection::vec((1u32..=6, 1u32..=6, 0u32..=6), 0..25)
    ) {
        let raw: Vec<RawComparison> = records
            .into_iter()
            .map(|(a, b, better)| RawComparison::new(a, b, better))
            .collect();
        let engine = RankingEngine::new(&TEAMS, &raw).unwrap();
        let summary = engine.summary();
        prop_assert_eq!(summary.accepted + summary.rejected.len(), summary.total);

        for result in [
            engine.rank_by_point_tally().unwrap(),
            engine.rank_by_greedy_insertion(&Default::default()).unwrap(),
        ] {
            let mut teams = result.ordered_entities.clone();
            teams.sort_unstable();
            prop_assert_eq!(teams, TEAMS.to_vec());
            prop_assert!((0.0..=100.0).contains(&result.compliance_percent));
            let tiered: usize = result.tiers.iter().map(Vec::len).sum();
            prop_assert_eq!(tiered, TEAMS.len());
        }
    }
}
