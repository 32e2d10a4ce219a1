use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::PronoStore;
use crate::errors::AppError;
use crate::grading::{enrich, summarize};
use crate::models::{NewProno, PronoView, Summary};

use super::settlement::parse_explicit_status;

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DayListing {
    pub date: NaiveDate,
    pub now_utc: DateTime<Utc>,
    pub count: usize,
    pub pronos: Vec<PronoView>,
}

#[derive(Debug, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct HistoryListing {
    pub range: DateRange,
    pub now_utc: DateTime<Utc>,
    pub count: usize,
    pub summary: Summary,
    pub pronos: Vec<PronoView>,
}

#[derive(Debug, Serialize)]
pub struct UpcomingListing {
    pub now_utc: DateTime<Utc>,
    pub max_rows: i64,
    pub count: usize,
    pub pronos: Vec<PronoView>,
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    let invalid = || AppError::BadRequest(format!("Invalid '{field}' format, expected YYYY-MM-DD"));

    let well_formed = raw.len() == 10
        && raw
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())
}

/// Pronos kicking off on `date` (UTC), defaulting to today.
pub async fn list_for_date<S>(
    store: &S,
    date: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DayListing, AppError>
where
    S: PronoStore + ?Sized,
{
    let date = match date {
        Some(raw) => parse_date(raw, "date")?,
        None => now.date_naive(),
    };

    let pronos: Vec<PronoView> = store
        .list_on_date(date)
        .await?
        .into_iter()
        .map(|p| enrich(p, now))
        .collect();

    Ok(DayListing {
        date,
        now_utc: now,
        count: pronos.len(),
        pronos,
    })
}

/// `days` before `to`, saturating at the earliest representable date.
fn default_history_start(to: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days.max(0))
        .and_then(|window| to.checked_sub_signed(window))
        .unwrap_or(NaiveDate::MIN)
}

/// Pronos between `from` and `to` inclusive, with a performance summary.
///
/// `to` defaults to today and `from` to `default_days` before `to`.
pub async fn list_history<S>(
    store: &S,
    from: Option<&str>,
    to: Option<&str>,
    default_days: i64,
    now: DateTime<Utc>,
) -> Result<HistoryListing, AppError>
where
    S: PronoStore + ?Sized,
{
    let to = match to {
        Some(raw) => parse_date(raw, "to")?,
        None => now.date_naive(),
    };
    let from = match from {
        Some(raw) => parse_date(raw, "from")?,
        None => default_history_start(to, default_days),
    };

    if from > to {
        return Err(AppError::BadRequest(format!(
            "'from' ({from}) must not be after 'to' ({to})"
        )));
    }

    let rows = store.list_between(from, to).await?;
    let summary = summarize(&rows);

    tracing::debug!(
        %from,
        %to,
        total = summary.total_bets,
        settled = summary.settled,
        "History summarized"
    );

    let pronos: Vec<PronoView> = rows.into_iter().map(|p| enrich(p, now)).collect();

    Ok(HistoryListing {
        range: DateRange { from, to },
        now_utc: now,
        count: pronos.len(),
        summary,
        pronos,
    })
}

/// The next pronos from `now` on.
pub async fn list_upcoming<S>(
    store: &S,
    limit: i64,
    now: DateTime<Utc>,
) -> Result<UpcomingListing, AppError>
where
    S: PronoStore + ?Sized,
{
    let limit = limit.max(0);
    let pronos: Vec<PronoView> = store
        .list_upcoming(now, limit)
        .await?
        .into_iter()
        .map(|p| enrich(p, now))
        .collect();

    Ok(UpcomingListing {
        now_utc: now,
        max_rows: limit,
        count: pronos.len(),
        pronos,
    })
}

pub async fn get_prono<S>(store: &S, id: i64, now: DateTime<Utc>) -> Result<PronoView, AppError>
where
    S: PronoStore + ?Sized,
{
    let prono = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prono not found".into()))?;

    Ok(enrich(prono, now))
}

// ---------------------------------------------------------------------------
// Create / delete
// ---------------------------------------------------------------------------

/// Body of a create request. Everything is optional here so that missing
/// fields can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePronoRequest {
    pub sport: Option<String>,
    pub league: Option<String>,
    #[serde(rename = "match")]
    pub match_label: Option<String>,
    pub market: Option<String>,
    pub selection: Option<String>,
    pub odds: Option<Decimal>,
    pub kickoff: Option<String>,
    pub status: Option<String>,
    pub confidence: Option<i32>,
    pub bookmaker: Option<String>,
    pub implied_prob: Option<Decimal>,
    pub model_prob: Option<Decimal>,
    pub edge: Option<Decimal>,
    pub fair_odds: Option<Decimal>,
    pub note: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl CreatePronoRequest {
    /// Validate required fields and formats, producing an insert payload.
    pub fn into_new_prono(self) -> Result<NewProno, AppError> {
        let mut missing = Vec::new();
        if !present(&self.sport) {
            missing.push("sport");
        }
        if !present(&self.league) {
            missing.push("league");
        }
        if !present(&self.match_label) {
            missing.push("match");
        }
        if !present(&self.market) {
            missing.push("market");
        }
        if !present(&self.selection) {
            missing.push("selection");
        }
        if self.odds.is_none() {
            missing.push("odds");
        }
        if !present(&self.kickoff) {
            missing.push("kickoff");
        }
        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let kickoff_raw = self.kickoff.unwrap_or_default();
        let kickoff = DateTime::parse_from_rfc3339(kickoff_raw.trim())
            .map(|k| k.with_timezone(&Utc))
            .map_err(|_| {
                AppError::BadRequest("Invalid 'kickoff', expected an RFC 3339 timestamp".into())
            })?;

        if let Some(confidence) = self.confidence {
            if !(1..=5).contains(&confidence) {
                return Err(AppError::BadRequest(format!(
                    "'confidence' must be between 1 and 5, got {confidence}"
                )));
            }
        }

        match (self.home_score, self.away_score) {
            (Some(home), Some(away)) if home < 0 || away < 0 => {
                return Err(AppError::BadRequest("Scores must not be negative".into()));
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(AppError::BadRequest(
                    "'home_score' and 'away_score' must be given together".into(),
                ));
            }
            _ => {}
        }

        let status = parse_explicit_status(self.status.as_deref())?.unwrap_or_default();

        Ok(NewProno {
            sport: self.sport.unwrap_or_default(),
            league: self.league.unwrap_or_default(),
            match_label: self.match_label.unwrap_or_default(),
            market: self.market.unwrap_or_default(),
            selection: self.selection.unwrap_or_default(),
            bookmaker: self.bookmaker,
            odds: self.odds.unwrap_or_default(),
            kickoff,
            status,
            confidence: self.confidence,
            implied_prob: self.implied_prob,
            model_prob: self.model_prob,
            edge: self.edge,
            fair_odds: self.fair_odds,
            note: self.note,
            home_score: self.home_score,
            away_score: self.away_score,
        })
    }
}

pub async fn create_prono<S>(
    store: &S,
    request: CreatePronoRequest,
    now: DateTime<Utc>,
) -> Result<PronoView, AppError>
where
    S: PronoStore + ?Sized,
{
    let new = request.into_new_prono()?;
    let prono = store.insert(&new).await?;

    tracing::info!(
        id = prono.id,
        match_label = %prono.match_label,
        market = %prono.market,
        kickoff = %prono.kickoff,
        "Prono created"
    );

    Ok(enrich(prono, now))
}

/// Delete a prono, returning the row as it was.
pub async fn delete_prono<S>(store: &S, id: i64, now: DateTime<Utc>) -> Result<PronoView, AppError>
where
    S: PronoStore + ?Sized,
{
    let existing = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Prono not found".into()))?;

    if !store.delete(id).await? {
        return Err(AppError::NotFound("Prono not found".into()));
    }

    tracing::info!(id, "Prono deleted");

    Ok(enrich(existing, now))
}
