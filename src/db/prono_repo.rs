use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::{NewProno, OutcomeUpdate, Prono};

const PRONO_COLUMNS: &str = r#"
    id, sport, league, match, market, selection, bookmaker, odds, kickoff, status,
    confidence, implied_prob, model_prob, edge, fair_odds, note, home_score, away_score
"#;

/// Fetch a single prono by id.
pub async fn get_prono(pool: &PgPool, id: i64) -> anyhow::Result<Option<Prono>> {
    let prono = sqlx::query_as::<_, Prono>(&format!(
        "SELECT {PRONO_COLUMNS} FROM pronos WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(prono)
}

/// All pronos kicking off on the given UTC calendar day.
pub async fn get_pronos_on_date(pool: &PgPool, date: NaiveDate) -> anyhow::Result<Vec<Prono>> {
    let pronos = sqlx::query_as::<_, Prono>(&format!(
        r#"
        SELECT {PRONO_COLUMNS} FROM pronos
        WHERE (kickoff AT TIME ZONE 'UTC')::date = $1
        ORDER BY kickoff ASC, id ASC
        "#
    ))
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(pronos)
}

/// All pronos whose UTC kickoff day lies within `[from, to]`.
pub async fn get_pronos_between(
    pool: &PgPool,
    from: NaiveDate,
    to: NaiveDate,
) -> anyhow::Result<Vec<Prono>> {
    let pronos = sqlx::query_as::<_, Prono>(&format!(
        r#"
        SELECT {PRONO_COLUMNS} FROM pronos
        WHERE (kickoff AT TIME ZONE 'UTC')::date >= $1
          AND (kickoff AT TIME ZONE 'UTC')::date <= $2
        ORDER BY kickoff ASC, id ASC
        "#
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(pronos)
}

/// The next `limit` pronos kicking off at or after `since`.
pub async fn get_upcoming_pronos(
    pool: &PgPool,
    since: DateTime<Utc>,
    limit: i64,
) -> anyhow::Result<Vec<Prono>> {
    let pronos = sqlx::query_as::<_, Prono>(&format!(
        r#"
        SELECT {PRONO_COLUMNS} FROM pronos
        WHERE kickoff >= $1
        ORDER BY kickoff ASC, id ASC
        LIMIT $2
        "#
    ))
    .bind(since)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(pronos)
}

/// Insert a new prono and return it with its assigned id.
pub async fn insert_prono(pool: &PgPool, new: &NewProno) -> anyhow::Result<Prono> {
    let prono = sqlx::query_as::<_, Prono>(&format!(
        r#"
        INSERT INTO pronos (
            sport, league, match, market, selection, bookmaker, odds, kickoff, status,
            confidence, implied_prob, model_prob, edge, fair_odds, note, home_score, away_score
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        RETURNING {PRONO_COLUMNS}
        "#
    ))
    .bind(&new.sport)
    .bind(&new.league)
    .bind(&new.match_label)
    .bind(&new.market)
    .bind(&new.selection)
    .bind(&new.bookmaker)
    .bind(new.odds)
    .bind(new.kickoff)
    .bind(new.status.as_str())
    .bind(new.confidence)
    .bind(new.implied_prob)
    .bind(new.model_prob)
    .bind(new.edge)
    .bind(new.fair_odds)
    .bind(&new.note)
    .bind(new.home_score)
    .bind(new.away_score)
    .fetch_one(pool)
    .await?;

    Ok(prono)
}

/// Write the outcome fields of a prono in a single statement.
/// Absent scores keep the stored values.
pub async fn update_outcome(
    pool: &PgPool,
    id: i64,
    update: &OutcomeUpdate,
) -> anyhow::Result<Option<Prono>> {
    let prono = sqlx::query_as::<_, Prono>(&format!(
        r#"
        UPDATE pronos
        SET status     = $2,
            home_score = COALESCE($3, home_score),
            away_score = COALESCE($4, away_score)
        WHERE id = $1
        RETURNING {PRONO_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.status.as_str())
    .bind(update.home_score)
    .bind(update.away_score)
    .fetch_optional(pool)
    .await?;

    Ok(prono)
}

/// Delete a prono. Returns false when no row matched.
pub async fn delete_prono(pool: &PgPool, id: i64) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM pronos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
