pub mod prono;
pub mod summary;

pub use prono::{DerivedState, NewProno, OutcomeUpdate, Prono, PronoView};
pub use summary::Summary;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// PronoStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum PronoStatus {
    #[default]
    Pending,
    Won,
    Lost,
    Void,
}

impl PronoStatus {
    pub const ALL: [PronoStatus; 4] = [
        PronoStatus::Pending,
        PronoStatus::Won,
        PronoStatus::Lost,
        PronoStatus::Void,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PronoStatus::Pending => "pending",
            PronoStatus::Won => "won",
            PronoStatus::Lost => "lost",
            PronoStatus::Void => "void",
        }
    }

    /// True once the prediction carries a graded outcome.
    pub fn is_settled(&self) -> bool {
        !matches!(self, PronoStatus::Pending)
    }
}

impl fmt::Display for PronoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown prono status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for PronoStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PronoStatus::Pending),
            "won" => Ok(PronoStatus::Won),
            "lost" => Ok(PronoStatus::Lost),
            "void" => Ok(PronoStatus::Void),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
