/// Contradiction removal and the per-team lookup index.
///
/// Cancellation is pairwise, not a vote: if any judgment on a pair disagrees
/// with another judgment on the same pair, every judgment on that pair is
/// dropped. A 2-vs-1 split therefore resolves to no judgment at all.
/// Transitive cycles (A > B, B > C, C > A) are left in place for the ranking
/// strategies to absorb.
use std::collections::{HashMap, HashSet};

use crate::comparison::Comparison;
use crate::types::TeamId;

/// The clean comparison set plus counts of what was removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Non-tie, non-contradicted, deduplicated comparisons in first-seen order.
    pub comparisons: Vec<Comparison>,
    pub ties_dropped: usize,
    /// Input judgments removed because an opposing judgment exists on their pair.
    pub contradictions_removed: usize,
    pub duplicates_removed: usize,
}

/// Filter `input` into a fresh clean set. The input is never modified.
pub fn resolve_contradictions(input: &[Comparison]) -> Resolution {
    // Winners seen per unordered pair; two distinct winners means the pair is contested.
    let mut winners: HashMap<(TeamId, TeamId), HashSet<TeamId>> = HashMap::new();
    for comparison in input {
        if let Some(better) = comparison.better_team() {
            winners
                .entry((comparison.lower_team(), comparison.higher_team()))
                .or_default()
                .insert(better);
        }
    }

    let mut resolution = Resolution::default();
    let mut seen: HashSet<Comparison> = HashSet::new();

    for comparison in input {
        if comparison.is_tie() {
            resolution.ties_dropped += 1;
            continue;
        }

        let contested = winners
            .get(&(comparison.lower_team(), comparison.higher_team()))
            .is_some_and(|w| w.len() > 1);
        if contested {
            resolution.contradictions_removed += 1;
            continue;
        }

        if seen.insert(*comparison) {
            resolution.comparisons.push(*comparison);
        } else {
            resolution.duplicates_removed += 1;
        }
    }

    resolution
}

/// Team → comparisons that mention it, in clean-set order. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    by_team: HashMap<TeamId, Vec<Comparison>>,
}

impl LookupIndex {
    /// Every team in `teams` gets an entry, even with no comparisons.
    pub fn build(teams: &[TeamId], comparisons: &[Comparison]) -> Self {
        let mut by_team: HashMap<TeamId, Vec<Comparison>> =
            teams.iter().map(|&team| (team, Vec::new())).collect();

        for comparison in comparisons {
            by_team.entry(comparison.lower_team()).or_default().push(*comparison);
            by_team.entry(comparison.higher_team()).or_default().push(*comparison);
        }

        LookupIndex { by_team }
    }

    pub fn get(&self, team: TeamId) -> &[Comparison] {
        self.by_team.get(&team).map(Vec::as_slice).unwrap_or(&[])
    }
}
