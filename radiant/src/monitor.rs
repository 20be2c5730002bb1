//! Background purchase monitors.
//!
//! Each monitored pair runs in its own tokio task that polls the pair feed
//! at a fixed interval, reports new buy transactions over an `mpsc` channel,
//! and exits when its [`CancellationToken`] fires or the receiver is dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rtooling::ToolError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tools::market::{MarketDataClient, PairBuy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub pair_address: String,
    pub transaction_hash: String,
    pub amount_usd: String,
    pub message: String,
}

impl Notification {
    fn from_buy(pair_address: &str, buy: PairBuy) -> Self {
        let message = format!(
            "Token purchase detected: ${} on pair {pair_address}",
            buy.amount_usd
        );
        Self {
            pair_address: pair_address.to_string(),
            transaction_hash: buy.transaction_hash,
            amount_usd: buy.amount_usd,
            message,
        }
    }
}

/// Buys newer than `last_seen`, oldest first. `buys` is newest first.
pub(crate) fn unseen_buys(buys: &[PairBuy], last_seen: &str) -> Vec<PairBuy> {
    let mut fresh = buys
        .iter()
        .take_while(|buy| buy.transaction_hash != last_seen)
        .cloned()
        .collect::<Vec<_>>();
    fresh.reverse();
    fresh
}

pub struct PurchaseMonitor {
    market: Arc<MarketDataClient>,
    pair_address: String,
    poll_interval: Duration,
    notifications: mpsc::Sender<Notification>,
    last_seen: Option<String>,
    primed: bool,
}

impl PurchaseMonitor {
    pub fn new(
        market: Arc<MarketDataClient>,
        pair_address: impl Into<String>,
        poll_interval: Duration,
        notifications: mpsc::Sender<Notification>,
    ) -> Self {
        Self {
            market,
            pair_address: pair_address.into(),
            poll_interval,
            notifications,
            last_seen: None,
            primed: false,
        }
    }

    pub fn pair_address(&self) -> &str {
        &self.pair_address
    }

    /// Fetches the feed once. The first successful poll only records the
    /// newest hash; purchases made before monitoring started are not reported.
    pub async fn poll_once(&mut self) -> Result<Vec<Notification>, ToolError> {
        let buys = self.market.pair_buys(&self.pair_address).await?;

        let fresh = match (&self.last_seen, self.primed) {
            (Some(last_seen), true) => unseen_buys(&buys, last_seen),
            (None, true) => {
                let mut all = buys.clone();
                all.reverse();
                all
            }
            (_, false) => Vec::new(),
        };

        self.primed = true;
        if let Some(newest) = buys.first() {
            self.last_seen = Some(newest.transaction_hash.clone());
        }

        Ok(fresh
            .into_iter()
            .map(|buy| Notification::from_buy(&self.pair_address, buy))
            .collect())
    }

    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            phase = "monitor",
            event = "started",
            pair_address = %self.pair_address,
            poll_secs = self.poll_interval.as_secs()
        );

        loop {
            let polled = tokio::select! {
                polled = self.poll_once() => polled,
                _ = cancel.cancelled() => break,
            };

            match polled {
                Ok(notifications) => {
                    for notification in notifications {
                        if self.notifications.send(notification).await.is_err() {
                            tracing::info!(
                                phase = "monitor",
                                event = "receiver_closed",
                                pair_address = %self.pair_address
                            );
                            return;
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        phase = "monitor",
                        event = "poll_failed",
                        pair_address = %self.pair_address,
                        error = %error
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = cancel.cancelled() => break,
            }
        }

        tracing::info!(
            phase = "monitor",
            event = "stopped",
            pair_address = %self.pair_address
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStart {
    Started,
    AlreadyRunning,
}

impl MonitorStart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::AlreadyRunning => "already_running",
        }
    }
}

type ActiveMonitors = Arc<Mutex<HashMap<String, (u64, CancellationToken)>>>;

/// Owns the running monitors; at most one per pair address.
pub struct MonitorSupervisor {
    market: Arc<MarketDataClient>,
    poll_interval: Duration,
    notifications: mpsc::Sender<Notification>,
    shutdown: CancellationToken,
    active: ActiveMonitors,
    generation: AtomicU64,
}

impl MonitorSupervisor {
    pub fn new(
        market: Arc<MarketDataClient>,
        poll_interval: Duration,
        notifications: mpsc::Sender<Notification>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            market,
            poll_interval,
            notifications,
            shutdown,
            active: Arc::new(Mutex::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn start(&self, pair_address: &str) -> Result<MonitorStart, ToolError> {
        let pair_address = pair_address.trim();
        if pair_address.is_empty() {
            return Err(ToolError::invalid_arguments("pair_address must not be empty"));
        }
        if self.shutdown.is_cancelled() {
            return Err(ToolError::execution("monitors are shutting down"));
        }
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|err| ToolError::execution(format!("no async runtime: {err}")))?;

        let mut active = self
            .active
            .lock()
            .map_err(|_| ToolError::other("monitor registry lock poisoned"))?;
        if active.contains_key(pair_address) {
            return Ok(MonitorStart::AlreadyRunning);
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let cancel = self.shutdown.child_token();
        active.insert(pair_address.to_string(), (generation, cancel.clone()));
        drop(active);

        let monitor = PurchaseMonitor::new(
            Arc::clone(&self.market),
            pair_address,
            self.poll_interval,
            self.notifications.clone(),
        );
        let registry = Arc::clone(&self.active);
        let key = pair_address.to_string();
        handle.spawn(async move {
            monitor.run(cancel).await;
            if let Ok(mut active) = registry.lock()
                && active.get(&key).is_some_and(|(current, _)| *current == generation)
            {
                active.remove(&key);
            }
        });

        Ok(MonitorStart::Started)
    }

    pub fn stop(&self, pair_address: &str) -> bool {
        let removed = match self.active.lock() {
            Ok(mut active) => active.remove(pair_address.trim()),
            Err(_) => None,
        };
        match removed {
            Some((_, cancel)) => {
                cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&self) {
        self.shutdown.cancel();
        if let Ok(mut active) = self.active.lock() {
            active.clear();
        }
    }

    pub fn active_pairs(&self) -> Vec<String> {
        let mut pairs = match self.active.lock() {
            Ok(active) => active.keys().cloned().collect::<Vec<_>>(),
            Err(_) => Vec::new(),
        };
        pairs.sort();
        pairs
    }
}

impl std::fmt::Debug for MonitorSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorSupervisor")
            .field("poll_interval", &self.poll_interval)
            .field("active", &self.active_pairs())
            .finish_non_exhaustive()
    }
}
