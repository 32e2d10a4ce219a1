use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::models::PronoStatus;

/// Highest goal line accepted from a market or selection label. Anything
/// above is assumed to be digits picked up from unrelated text.
const MAX_GOAL_LINE: i64 = 20;

const BTTS_MARKET_CODES: &[&str] = &["btts"];

const BTTS_SELECTION_PHRASES: &[&str] = &[
    "both teams to score",
    "les deux équipes marquent",
    "les deux equipes marquent",
];

/// Everything the resolver looks at when a result is reported.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub explicit: Option<PronoStatus>,
    pub current: PronoStatus,
    pub market: &'a str,
    pub selection: &'a str,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// One market family: returns a grade when the family recognizes the prono.
struct MarketRule {
    name: &'static str,
    grade: fn(&ResolveInput<'_>, i32, i32) -> Option<PronoStatus>,
}

/// Evaluated in order; the first family that recognizes the market wins.
const MARKET_RULES: &[MarketRule] = &[
    MarketRule {
        name: "over_under",
        grade: grade_over_under,
    },
    MarketRule {
        name: "btts",
        grade: grade_btts,
    },
];

/// Decide the status a prono should carry after a result report.
///
/// Priority:
/// 1. An explicit status always wins, even over a settled prono.
/// 2. Without both final scores nothing is inferred.
/// 3. A settled prono is never re-graded automatically.
/// 4. Otherwise the first matching market family grades it; unknown
///    markets stay as they are.
pub fn resolve_status(input: &ResolveInput<'_>) -> PronoStatus {
    if let Some(explicit) = input.explicit {
        return explicit;
    }

    let (Some(home), Some(away)) = (input.home_score, input.away_score) else {
        return input.current;
    };

    if input.current.is_settled() {
        return input.current;
    }

    for rule in MARKET_RULES {
        if let Some(status) = (rule.grade)(input, home, away) {
            tracing::debug!(
                rule = rule.name,
                market = input.market,
                home,
                away,
                status = %status,
                "Prono graded from final score"
            );
            return status;
        }
    }

    input.current
}

fn over_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "over" must start a token; `_` separates tokens in market codes
        Regex::new(r"(?i)(?:^|[^a-z])over[\s_]*(\d+)(?:[.,_](\d+))?")
            .expect("over line pattern is valid")
    })
}

/// Extract the goal line following "over" (`over_2_5`, `Over 2.5`, `over 2,5`).
pub fn extract_over_line(text: &str) -> Option<Decimal> {
    let caps = over_line_regex().captures(text)?;
    let whole = caps.get(1)?.as_str();
    let raw = match caps.get(2) {
        Some(frac) => format!("{whole}.{}", frac.as_str()),
        None => whole.to_string(),
    };
    Decimal::from_str(&raw).ok()
}

fn plausible_line(line: Decimal) -> bool {
    line > Decimal::ZERO && line <= Decimal::from(MAX_GOAL_LINE)
}

/// First plausible line, market code before selection text.
fn goal_line(market: &str, selection: &str) -> Option<Decimal> {
    let mut rejected = None;

    for line in [market, selection].into_iter().filter_map(extract_over_line) {
        if plausible_line(line) {
            return Some(line);
        }
        rejected.get_or_insert(line);
    }

    if let Some(line) = rejected {
        tracing::warn!(
            market,
            selection,
            line = %line,
            "Implausible over/under line, leaving prono ungraded"
        );
    }
    None
}

fn grade_over_under(input: &ResolveInput<'_>, home: i32, away: i32) -> Option<PronoStatus> {
    let line = goal_line(input.market, input.selection)?;

    let total = Decimal::from(i64::from(home) + i64::from(away));
    Some(if total > line {
        PronoStatus::Won
    } else {
        PronoStatus::Lost
    })
}

fn is_btts(market: &str, selection: &str) -> bool {
    let market = market.trim().to_lowercase();
    if BTTS_MARKET_CODES.contains(&market.as_str()) {
        return true;
    }

    let selection = selection.to_lowercase();
    BTTS_SELECTION_PHRASES
        .iter()
        .any(|phrase| selection.contains(phrase))
}

fn grade_btts(input: &ResolveInput<'_>, home: i32, away: i32) -> Option<PronoStatus> {
    if !is_btts(input.market, input.selection) {
        return None;
    }

    Some(if home > 0 && away > 0 {
        PronoStatus::Won
    } else {
        PronoStatus::Lost
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
