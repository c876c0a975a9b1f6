/// Head-to-head refinement of an existing order.
///
/// Bubble passes over the list: whenever a direct judgment says the team
/// placed lower beat its upper neighbour, the two swap. Only direct
/// judgments matter, never scores. Passes are capped by `max_passes`; a run
/// that hits the cap is reported incomplete.
use tracing::warn;

use crate::comparison::Comparison;
use crate::constants::DEFAULT_MAX_HEAD_TO_HEAD_PASSES;
use crate::resolver::LookupIndex;
use crate::scoring::order_compliance_percent;
use crate::types::{RankingResult, Strategy, TeamId};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeadToHeadConfig {
    pub max_passes: usize,
}

impl Default for HeadToHeadConfig {
    fn default() -> Self {
        HeadToHeadConfig {
            max_passes: DEFAULT_MAX_HEAD_TO_HEAD_PASSES,
        }
    }
}

fn beats(lookup: &LookupIndex, team: TeamId, opponent: TeamId) -> bool {
    lookup
        .get(team)
        .iter()
        .any(|c| c.contains(opponent) && c.better_team() == Some(team))
}

/// Refine `order` (best first). The result has one team per tier.
pub fn refine_head_to_head(
    order: &[TeamId],
    comparisons: &[Comparison],
    lookup: &LookupIndex,
    config: &HeadToHeadConfig,
) -> RankingResult {
    let mut order = order.to_vec();
    let mut passes = 0;
    let mut complete = false;

    while passes < config.max_passes {
        passes += 1;
        let mut swapped = false;
        for i in 0..order.len().saturating_sub(1) {
            if beats(lookup, order[i + 1], order[i]) {
                order.swap(i, i + 1);
                swapped = true;
            }
        }
        if !swapped {
            complete = true;
            break;
        }
    }

    if !complete && !order.is_empty() {
        warn!(passes, "head-to-head refinement did not settle");
    }
    // An empty or single-team list needs no passes at all.
    if order.len() < 2 {
        complete = true;
    }

    let compliance_percent = order_compliance_percent(&order, comparisons);
    RankingResult {
        strategy: Strategy::HeadToHead,
        tiers: order.iter().map(|&team| vec![team]).collect(),
        ordered_entities: order,
        compliance_percent,
        complete,
        iterations: passes,
    }
}
