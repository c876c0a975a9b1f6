/// Point tally: the cheap baseline ranking.
///
/// Every non-tie comparison gives the better team +1 and the worse team -1.
/// This rewards how often a team was paired favorably, not how strong it is
/// (a team that keeps playing next to weak partners collects points), so use
/// it as a baseline to compare the search strategies against.
use std::collections::HashMap;

use crate::comparison::Comparison;
use crate::error::RankingError;
use crate::scoring::order_compliance_percent;
use crate::tree::RankingTree;
use crate::types::{IdMap, RankingResult, Strategy, TeamId};

/// Net score per team. Every team in `teams` is present, starting at zero;
/// comparisons naming a team outside `teams` score nothing.
pub fn tally_points(teams: &[TeamId], comparisons: &[Comparison]) -> HashMap<TeamId, i64> {
    let mut points: HashMap<TeamId, i64> = teams.iter().map(|&team| (team, 0)).collect();
    for comparison in comparisons {
        let (Some(better), Some(worse)) = (comparison.better_team(), comparison.worse_team()) else {
            continue;
        };
        if points.contains_key(&better) && points.contains_key(&worse) {
            *points.entry(better).or_default() += 1;
            *points.entry(worse).or_default() -= 1;
        }
    }
    points
}

/// Rank by descending points, ties by ascending team id.
///
/// `teams` must be valid (no 0, no duplicates) and every comparison must name
/// teams from it.
pub fn rank_by_point_tally(teams: &[TeamId], comparisons: &[Comparison]) -> Result<RankingResult, RankingError> {
    IdMap::from_ids(teams)?.check_comparisons(comparisons)?;

    let points = tally_points(teams, comparisons);
    let scores: HashMap<TeamId, f64> = points.iter().map(|(&team, &p)| (team, p as f64)).collect();
    let tree = RankingTree::from_scores(&scores);

    let ordered_entities = tree.to_ordered_list();
    let compliance_percent = order_compliance_percent(&ordered_entities, comparisons);

    Ok(RankingResult {
        strategy: Strategy::PointTally,
        ordered_entities,
        tiers: tree.tiers(),
        compliance_percent,
        complete: true,
        iterations: 0,
    })
}
