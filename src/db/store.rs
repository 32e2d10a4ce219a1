use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::{NewProno, OutcomeUpdate, Prono};

use super::prono_repo;

/// Row-level access to stored pronos.
///
/// List operations return rows ordered by kickoff, then id. Dates are
/// compared on the UTC calendar day of kickoff.
#[async_trait]
pub trait PronoStore: Send + Sync {
    /// Cheap round trip used by health checks.
    async fn ping(&self) -> anyhow::Result<()>;

    async fn get(&self, id: i64) -> anyhow::Result<Option<Prono>>;

    async fn list_on_date(&self, date: NaiveDate) -> anyhow::Result<Vec<Prono>>;

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> anyhow::Result<Vec<Prono>>;

    async fn list_upcoming(&self, since: DateTime<Utc>, limit: i64) -> anyhow::Result<Vec<Prono>>;

    async fn insert(&self, new: &NewProno) -> anyhow::Result<Prono>;

    /// Single-row update of status and scores. `None` when the id is unknown.
    async fn update_outcome(
        &self,
        id: i64,
        update: &OutcomeUpdate,
    ) -> anyhow::Result<Option<Prono>>;

    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl PronoStore for PgPool {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Prono>> {
        prono_repo::get_prono(self, id).await
    }

    async fn list_on_date(&self, date: NaiveDate) -> anyhow::Result<Vec<Prono>> {
        prono_repo::get_pronos_on_date(self, date).await
    }

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> anyhow::Result<Vec<Prono>> {
        prono_repo::get_pronos_between(self, from, to).await
    }

    async fn list_upcoming(&self, since: DateTime<Utc>, limit: i64) -> anyhow::Result<Vec<Prono>> {
        prono_repo::get_upcoming_pronos(self, since, limit).await
    }

    async fn insert(&self, new: &NewProno) -> anyhow::Result<Prono> {
        prono_repo::insert_prono(self, new).await
    }

    async fn update_outcome(
        &self,
        id: i64,
        update: &OutcomeUpdate,
    ) -> anyhow::Result<Option<Prono>> {
        prono_repo::update_outcome(self, id, update).await
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        prono_repo::delete_prono(self, id).await
    }
}
