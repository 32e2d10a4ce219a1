use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use pronos::config::AppConfig;
use pronos::db::PronoStore;
use pronos::models::{NewProno, OutcomeUpdate, Prono, PronoStatus};
use pronos::AppState;

/// In-memory `PronoStore` that counts reads and writes.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Prono>>,
    next_id: AtomicUsize,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
    pub failing: AtomicBool,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }

    async fn sorted(&self, keep: impl Fn(&Prono) -> bool) -> Vec<Prono> {
        let mut rows: Vec<Prono> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then(a.id.cmp(&b.id)));
        rows
    }
}

#[async_trait]
impl PronoStore for MemoryStore {
    async fn ping(&self) -> anyhow::Result<()> {
        self.check()
    }

    async fn get(&self, id: i64) -> anyhow::Result<Option<Prono>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.rows.lock().await.iter().find(|p| p.id == id).cloned())
    }

    async fn list_on_date(&self, date: NaiveDate) -> anyhow::Result<Vec<Prono>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.sorted(|p| p.kickoff.date_naive() == date).await)
    }

    async fn list_between(&self, from: NaiveDate, to: NaiveDate) -> anyhow::Result<Vec<Prono>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .sorted(|p| p.kickoff.date_naive() >= from && p.kickoff.date_naive() <= to)
            .await)
    }

    async fn list_upcoming(&self, since: DateTime<Utc>, limit: i64) -> anyhow::Result<Vec<Prono>> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.sorted(|p| p.kickoff >= since).await;
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn insert(&self, new: &NewProno) -> anyhow::Result<Prono> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        let prono = Prono {
            id,
            sport: new.sport.clone(),
            league: new.league.clone(),
            match_label: new.match_label.clone(),
            market: new.market.clone(),
            selection: new.selection.clone(),
            bookmaker: new.bookmaker.clone(),
            odds: Some(new.odds),
            kickoff: new.kickoff,
            status: new.status,
            confidence: new.confidence,
            implied_prob: new.implied_prob,
            model_prob: new.model_prob,
            edge: new.edge,
            fair_odds: new.fair_odds,
            note: new.note.clone(),
            home_score: new.home_score,
            away_score: new.away_score,
        };
        self.rows.lock().await.push(prono.clone());
        Ok(prono)
    }

    async fn update_outcome(
        &self,
        id: i64,
        update: &OutcomeUpdate,
    ) -> anyhow::Result<Option<Prono>> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        row.status = update.status;
        row.home_score = update.home_score.or(row.home_score);
        row.away_score = update.away_score.or(row.away_score);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|p| p.id != id);
        Ok(rows.len() < before)
    }
}

/// Build a prono insert payload for testing.
#[allow(dead_code)]
pub fn new_prono(
    market: &str,
    selection: &str,
    odds: Decimal,
    kickoff: DateTime<Utc>,
) -> NewProno {
    NewProno {
        sport: "football".into(),
        league: "Ligue 1".into(),
        match_label: "PSG - OM".into(),
        market: market.into(),
        selection: selection.into(),
        bookmaker: Some("pinnacle".into()),
        odds,
        kickoff,
        status: PronoStatus::Pending,
        confidence: Some(4),
        implied_prob: Some(Decimal::new(541, 1)),
        model_prob: Some(Decimal::new(590, 1)),
        edge: Some(Decimal::new(49, 1)),
        fair_odds: Some(Decimal::new(169, 2)),
        note: None,
        home_score: None,
        away_score: None,
    }
}

/// Seed a prono directly into the store.
#[allow(dead_code)]
pub async fn seed_prono(
    store: &MemoryStore,
    market: &str,
    status: PronoStatus,
    odds: Decimal,
    kickoff: DateTime<Utc>,
) -> Prono {
    let mut new = new_prono(market, "", odds, kickoff);
    new.status = status;
    let prono = store.insert(&new).await.expect("Failed to seed prono");
    store.writes.store(0, Ordering::SeqCst);
    prono
}

#[allow(dead_code)]
pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// App state backed by an in-memory store.
#[allow(dead_code)]
pub fn test_state(store: Arc<MemoryStore>, api_token: Option<&str>) -> AppState {
    let mut config = AppConfig::with_database_url("postgres://unused");
    config.api_token = api_token.map(str::to_string);

    AppState {
        store,
        config,
        metrics_handle: pronos::metrics::init_metrics(),
    }
}
