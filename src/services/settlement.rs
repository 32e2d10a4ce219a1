use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Deserialize;
use serde_json::Value;

use crate::db::PronoStore;
use crate::errors::AppError;
use crate::grading::{enrich, resolve_status, ResolveInput};
use crate::models::{OutcomeUpdate, PronoStatus, PronoView};

/// A result report for one prono, as sent by the caller.
///
/// Scores are kept as raw JSON so that malformed values degrade to "absent"
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultReport {
    pub id: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub home_score: Option<Value>,
    #[serde(default)]
    pub away_score: Option<Value>,
}

/// Parse a caller-supplied status. Blank strings count as absent.
pub fn parse_explicit_status(raw: Option<&str>) -> Result<Option<PronoStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::InvalidStatus(s.to_string())),
    }
}

/// Coerce a reported score to a goal count.
///
/// Accepts JSON integers, integral floats and numeric strings. Anything
/// else, negatives included, is treated as no score at all.
pub fn normalize_score(raw: Option<&Value>) -> Option<i32> {
    let goals = match raw? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;

    if goals < 0 {
        return None;
    }
    i32::try_from(goals).ok()
}

/// Apply a result report: fetch, resolve, persist, enrich.
///
/// Performs exactly one read and, when the prono exists, one write.
/// An unknown status is rejected before the store is touched.
pub async fn settle_prono<S>(
    store: &S,
    report: &ResultReport,
    now: DateTime<Utc>,
) -> Result<PronoView, AppError>
where
    S: PronoStore + ?Sized,
{
    let explicit = parse_explicit_status(report.status.as_deref())?;

    let current = store
        .get(report.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prono not found".into()))?;

    let home_score = normalize_score(report.home_score.as_ref());
    let away_score = normalize_score(report.away_score.as_ref());

    if report.home_score.as_ref().is_some_and(|v| !v.is_null()) && home_score.is_none() {
        tracing::warn!(id = report.id, raw = ?report.home_score, "Ignoring malformed home score");
    }
    if report.away_score.as_ref().is_some_and(|v| !v.is_null()) && away_score.is_none() {
        tracing::warn!(id = report.id, raw = ?report.away_score, "Ignoring malformed away score");
    }

    let final_home = home_score.or(current.home_score);
    let final_away = away_score.or(current.away_score);

    let status = resolve_status(&ResolveInput {
        explicit,
        current: current.status,
        market: &current.market,
        selection: &current.selection,
        home_score: final_home,
        away_score: final_away,
    });

    let update = OutcomeUpdate {
        status,
        home_score: final_home,
        away_score: final_away,
    };

    let updated = store
        .update_outcome(report.id, &update)
        .await?
        .ok_or_else(|| AppError::NotFound("Prono not found".into()))?;

    counter!("prono_updates_total").increment(1);
    if explicit.is_none() && status != current.status {
        counter!("prono_auto_graded_total").increment(1);
    }

    tracing::info!(
        id = updated.id,
        market = %updated.market,
        previous = %current.status,
        status = %updated.status,
        home_score = ?updated.home_score,
        away_score = ?updated.away_score,
        explicit = explicit.is_some(),
        "Prono updated"
    );

    Ok(enrich(updated, now))
}
