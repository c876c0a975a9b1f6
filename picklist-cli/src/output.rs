/// Output formatting: terminal table and JSON.
use std::collections::HashMap;
use std::fmt::Write;

use picklist_core::{InputSummary, RankingResult, Strategy, TeamId};
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedTeam {
    rank: usize,
    team: TeamId,
    /// 1 is the best tier.
    tier: usize,
}

#[derive(Serialize)]
struct JsonResult<'a> {
    strategy: Strategy,
    compliance_percent: f64,
    complete: bool,
    iterations: usize,
    teams: Vec<JsonRankedTeam>,
    tiers: &'a [Vec<TeamId>],
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    seed: u64,
    input: &'a InputSummary,
    results: Vec<JsonResult<'a>>,
}

fn tier_of(result: &RankingResult) -> HashMap<TeamId, usize> {
    result
        .tiers
        .iter()
        .enumerate()
        .flat_map(|(i, tier)| tier.iter().map(move |&team| (team, i + 1)))
        .collect()
}

fn summary_line(summary: &InputSummary) -> String {
    format!(
        "{} comparisons read: {} rejected, {} ties, {} contradicted, {} duplicates, {} used",
        summary.total,
        summary.rejected.len(),
        summary.ties_dropped,
        summary.contradictions_removed,
        summary.duplicates_removed,
        summary.clean,
    )
}

pub fn render_table(results: &[RankingResult], summary: &InputSummary) -> String {
    let mut out = String::new();

    for (n, result) in results.iter().enumerate() {
        if n > 0 {
            out.push('\n');
        }
        let tiers = tier_of(result);
        let status = if result.complete { "" } else { " (incomplete)" };
        let _ = writeln!(
            out,
            "{}: {:.1}% compliance{}",
            result.strategy, result.compliance_percent, status
        );

        let team_width = result
            .ordered_entities
            .iter()
            .map(|team| team.to_string().len())
            .max()
            .unwrap_or(4)
            .max(4); // at least "Team"

        let _ = writeln!(out, "  # | {:<team_width$} | Tier", "Team");
        let _ = writeln!(out, "----|-{}-|-----", "-".repeat(team_width));
        for (i, team) in result.ordered_entities.iter().enumerate() {
            let tier = tiers.get(team).copied().unwrap_or(0);
            let _ = writeln!(out, "{:>3} | {:<team_width$} | {:>4}", i + 1, team, tier);
        }
    }

    let _ = writeln!(out, "\n{}", summary_line(summary));
    out
}

pub fn render_json(results: &[RankingResult], summary: &InputSummary, seed: u64) -> Result<String, serde_json::Error> {
    let results = results
        .iter()
        .map(|result| {
            let tiers = tier_of(result);
            JsonResult {
                strategy: result.strategy,
                compliance_percent: result.compliance_percent,
                complete: result.complete,
                iterations: result.iterations,
                teams: result
                    .ordered_entities
                    .iter()
                    .enumerate()
                    .map(|(i, &team)| JsonRankedTeam {
                        rank: i + 1,
                        team,
                        tier: tiers.get(&team).copied().unwrap_or(0),
                    })
                    .collect(),
                tiers: &result.tiers,
            }
        })
        .collect();

    serde_json::to_string_pretty(&JsonOutput {
        seed,
        input: summary,
        results,
    })
}

/// Print results as a formatted terminal table.
pub fn print_table(results: &[RankingResult], summary: &InputSummary) {
    print!("{}", render_table(results, summary));
}

/// Print results as JSON.
pub fn print_json(results: &[RankingResult], summary: &InputSummary, seed: u64) {
    match render_json(results, summary, seed) {
        Ok(json) => println!("{json}"),
        Err(e) => crate::bail(format!("Failed to serialize results: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RankingResult {
        RankingResult {
            strategy: Strategy::PointTally,
            ordered_entities: vec![254, 1114, 118],
            tiers: vec![vec![254], vec![1114, 118]],
            compliance_percent: 75.0,
            complete: true,
            iterations: 0,
        }
    }

    #[test]
    fn test_table_lists_rank_team_and_tier() {
        let table = render_table(&[sample()], &InputSummary::default());
        assert!(table.starts_with("point tally: 75.0% compliance\n"), "{table}");
        assert!(table.contains("  1 | 254  |    1"), "{table}");
        assert!(table.contains("  3 | 118  |    2"), "{table}");
        assert!(table.contains("0 comparisons read"), "{table}");
    }

    #[test]
    fn test_table_flags_incomplete_runs() {
        let mut result = sample();
        result.complete = false;
        let table = render_table(&[result], &InputSummary::default());
        assert!(table.contains("(incomplete)"), "{table}");
    }

    #[test]
    fn test_json_shape() {
        let summary = InputSummary {
            total: 4,
            accepted: 4,
            clean: 3,
            ties_dropped: 1,
            ..InputSummary::default()
        };
        let json = render_json(&[sample()], &summary, 25).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["seed"], 25);
        assert_eq!(value["input"]["clean"], 3);
        let result = &value["results"][0];
        assert_eq!(result["strategy"], "point-tally");
        assert_eq!(result["teams"][1]["team"], 1114);
        assert_eq!(result["teams"][1]["tier"], 2);
        assert_eq!(result["tiers"][1], serde_json::json!([1114, 118]));
    }
}
