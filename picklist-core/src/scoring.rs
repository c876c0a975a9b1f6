/// Compliance scoring: the share of judgments a ranking satisfies.
///
/// Ties never count toward the denominator. With no non-tie comparisons the
/// score is 100 (nothing to violate).
use std::collections::HashMap;

use crate::comparison::Comparison;
use crate::tree::RankingTree;
use crate::types::TeamId;

/// Percent of non-tie `comparisons` the tree satisfies, in `[0, 100]`.
pub fn compliance_percent(tree: &RankingTree, comparisons: &[Comparison]) -> f64 {
    let (compliant, total) = count_compliant(comparisons, |c| tree.is_comparison_compliant(c));
    as_percent(compliant, total)
}

/// Like `compliance_percent`, but only over comparisons whose teams are
/// both already placed in the tree. Used while a tree is still being built.
pub fn placed_compliance_percent(tree: &RankingTree, comparisons: &[Comparison]) -> f64 {
    let (compliant, total) = comparisons
        .iter()
        .filter(|c| !c.is_tie() && tree.contains_node(c.lower_team()) && tree.contains_node(c.higher_team()))
        .fold((0usize, 0usize), |(compliant, total), c| {
            (compliant + usize::from(tree.is_comparison_compliant(c)), total + 1)
        });
    as_percent(compliant, total)
}

/// Percent of non-tie `comparisons` a strict best-first order satisfies.
/// A team missing from `order` fails every comparison it appears in.
pub fn order_compliance_percent(order: &[TeamId], comparisons: &[Comparison]) -> f64 {
    let position: HashMap<TeamId, usize> = order.iter().enumerate().map(|(i, &t)| (t, i)).collect();
    let (compliant, total) = count_compliant(comparisons, |c| {
        match (c.better_team(), c.worse_team()) {
            (Some(better), Some(worse)) => match (position.get(&better), position.get(&worse)) {
                (Some(b), Some(w)) => b < w,
                _ => false,
            },
            _ => true,
        }
    });
    as_percent(compliant, total)
}

/// (compliant, total) over non-tie comparisons.
pub fn count_compliant(comparisons: &[Comparison], is_compliant: impl Fn(&Comparison) -> bool) -> (usize, usize) {
    comparisons
        .iter()
        .filter(|c| !c.is_tie())
        .fold((0, 0), |(compliant, total), c| {
            (compliant + usize::from(is_compliant(c)), total + 1)
        })
}

fn as_percent(compliant: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * compliant as f64 / total as f64
}
