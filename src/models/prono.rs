use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::PronoStatus;

/// Database row for pronos table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Prono {
    pub id: i64,
    pub sport: String,
    pub league: String,
    #[serde(rename = "match")]
    #[sqlx(rename = "match")]
    pub match_label: String,
    pub market: String,
    pub selection: String,
    pub bookmaker: Option<String>,
    pub odds: Option<Decimal>,
    pub kickoff: DateTime<Utc>,
    pub status: PronoStatus,
    pub confidence: Option<i32>,
    pub implied_prob: Option<Decimal>,
    pub model_prob: Option<Decimal>,
    pub edge: Option<Decimal>,
    pub fair_odds: Option<Decimal>,
    pub note: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// Insert payload: every descriptive field plus an optional initial outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProno {
    pub sport: String,
    pub league: String,
    #[serde(rename = "match")]
    pub match_label: String,
    pub market: String,
    pub selection: String,
    pub bookmaker: Option<String>,
    pub odds: Decimal,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub status: PronoStatus,
    pub confidence: Option<i32>,
    pub implied_prob: Option<Decimal>,
    pub model_prob: Option<Decimal>,
    pub edge: Option<Decimal>,
    pub fair_odds: Option<Decimal>,
    pub note: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// Mutable outcome fields written back by the update pipeline.
/// `None` scores keep whatever the store already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeUpdate {
    pub status: PronoStatus,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

/// Temporal and validation state, computed on read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    pub is_finished: bool,
    pub is_validated: bool,
}

/// A prono as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PronoView {
    #[serde(flatten)]
    pub prono: Prono,
    #[serde(flatten)]
    pub state: DerivedState,
}

impl Prono {
    /// Final score pair, only when both sides are known.
    pub fn final_score(&self) -> Option<(i32, i32)> {
        self.home_score.zip(self.away_score)
    }
}
