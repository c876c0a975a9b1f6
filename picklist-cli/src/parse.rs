/// Comparison and team list parsing.
///
/// Both loaders auto-detect a JSON array (content starting with `[`) versus
/// plain text. Plain-text comparisons are one `team_a,team_b,better_team` per
/// line, `better_team` 0 meaning a tie. `#` starts a comment.
use picklist_core::{RawComparison, TeamId};

/// Drop a trailing `#` comment and surrounding whitespace.
fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or("").trim()
}

fn parse_team(field: &str, line_no: usize) -> Result<TeamId, String> {
    field
        .trim()
        .parse()
        .map_err(|_| format!("line {line_no}: \"{}\" is not a team number", field.trim()))
}

/// Parse a JSON array of `{team_a, team_b, better_team}` objects or plain `a,b,better` lines.
///
/// Only syntax is checked here. Semantic problems (self-comparisons, unknown
/// teams) are left to the engine, which rejects and counts them.
pub fn parse_comparisons_from_str(content: &str) -> Result<Vec<RawComparison>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| format!("File looks like JSON but failed to parse: {e}"));
    }

    let mut comparisons = Vec::new();
    for (idx, raw_line) in trimmed.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line);
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        let [a, b, better] = fields.as_slice() else {
            return Err(format!(
                "line {line_no}: expected \"team_a,team_b,better_team\", got {} fields",
                fields.len()
            ));
        };
        comparisons.push(RawComparison::new(
            parse_team(a, line_no)?,
            parse_team(b, line_no)?,
            parse_team(better, line_no)?,
        ));
    }
    Ok(comparisons)
}

/// Parse a JSON array of team numbers, or team numbers separated by commas or whitespace.
pub fn parse_teams_from_str(content: &str) -> Result<Vec<TeamId>, String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| format!("File looks like JSON but failed to parse: {e}"));
    }

    let mut teams = Vec::new();
    for (idx, raw_line) in trimmed.lines().enumerate() {
        for field in strip_comment(raw_line).split([',', ' ', '\t']).filter(|f| !f.is_empty()) {
            teams.push(parse_team(field, idx + 1)?);
        }
    }
    Ok(teams)
}
