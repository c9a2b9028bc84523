use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use szybkie_db::db::fetch_last_draws_numbers;
use szybkie_db::models::DRAW_SIZE;
use szybkie_db::rusqlite::Connection;

/// Durée de validité par défaut de l'historique en cache (3 minutes).
pub const DEFAULT_TTL: Duration = Duration::from_secs(180);

pub type History = Vec<[u8; DRAW_SIZE]>;

/// Source d'historique. Une erreur ou une liste vide signifie « pas d'historique ».
pub trait HistoryProvider {
    fn name(&self) -> &str;
    fn fetch(&mut self) -> Result<History>;
}

impl<P: HistoryProvider + ?Sized> HistoryProvider for &mut P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&mut self) -> Result<History> {
        (**self).fetch()
    }
}

impl<P: HistoryProvider + ?Sized> HistoryProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(&mut self) -> Result<History> {
        (**self).fetch()
    }
}

/// Les `window` derniers tirages de la base locale.
pub struct SqliteHistory<'a> {
    conn: &'a Connection,
    window: u32,
}

impl<'a> SqliteHistory<'a> {
    pub fn new(conn: &'a Connection, window: u32) -> Self {
        Self { conn, window }
    }
}

impl HistoryProvider for SqliteHistory<'_> {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn fetch(&mut self) -> Result<History> {
        let draws = fetch_last_draws_numbers(self.conn, self.window)?;
        if draws.is_empty() {
            bail!("Base vide, aucun tirage à analyser");
        }
        Ok(draws)
    }
}

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Mémorise le dernier historique obtenu avec succès pendant `ttl`.
/// Les échecs ne sont pas mis en cache : l'appel suivant réinterroge la source.
pub struct CachedHistory<P, C = SystemClock> {
    inner: P,
    clock: C,
    ttl: Duration,
    cached: Option<(Instant, History)>,
}

impl<P: HistoryProvider> CachedHistory<P, SystemClock> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, SystemClock)
    }
}

impl<P: HistoryProvider, C: Clock> CachedHistory<P, C> {
    pub fn with_clock(inner: P, ttl: Duration, clock: C) -> Self {
        Self {
            inner,
            clock,
            ttl,
            cached: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_fresh(&self) -> bool {
        match &self.cached {
            Some((at, _)) => self.clock.now().saturating_duration_since(*at) < self.ttl,
            None => false,
        }
    }
}

impl<P: HistoryProvider, C: Clock> HistoryProvider for CachedHistory<P, C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&mut self) -> Result<History> {
        if self.is_fresh() {
            if let Some((_, history)) = &self.cached {
                log::debug!("Historique servi depuis le cache ({} tirages)", history.len());
                return Ok(history.clone());
            }
        }

        let history = self.inner.fetch()?;
        log::info!("Historique rafraîchi depuis {} ({} tirages)", self.inner.name(), history.len());
        self.cached = Some((self.clock.now(), history.clone()));
        Ok(history)
    }
}
