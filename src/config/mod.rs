use std::env;

/// Connection string variables, checked in order.
const DATABASE_URL_VARS: &[&str] = &["DATABASE_URL", "DB_url", "DB_DATABASE_URL"];

const MAX_HISTORY_DAYS: i64 = 3650;
const MAX_UPCOMING_LIMIT: i64 = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub run_migrations: bool,

    // Bearer token for /api routes; auth is disabled when unset
    pub api_token: Option<String>,

    // Range queries
    pub history_default_days: i64,
    pub upcoming_limit: i64,

    pub log_json: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = DATABASE_URL_VARS
            .iter()
            .find_map(|name| env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| {
                anyhow::anyhow!("one of {} must be set", DATABASE_URL_VARS.join(", "))
            })?;

        Ok(Self {
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .unwrap_or(10),
            run_migrations: env::var("RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),

            history_default_days: history_days(
                env::var("HISTORY_DEFAULT_DAYS")
                    .unwrap_or_else(|_| "30".into())
                    .parse()
                    .unwrap_or(30),
            ),
            upcoming_limit: upcoming_limit(
                env::var("UPCOMING_LIMIT")
                    .unwrap_or_else(|_| "100".into())
                    .parse()
                    .unwrap_or(100),
            ),

            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Defaults for everything except the connection string.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "0.0.0.0".into(),
            port: 8080,
            db_max_connections: 10,
            run_migrations: true,
            api_token: None,
            history_default_days: 30,
            upcoming_limit: 100,
            log_json: false,
        }
    }
}

fn history_days(days: i64) -> i64 {
    days.clamp(0, MAX_HISTORY_DAYS)
}

fn upcoming_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_UPCOMING_LIMIT)
}
