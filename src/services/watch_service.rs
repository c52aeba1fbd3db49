use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{ interval, Duration, Interval, MissedTickBehavior };

use crate::enums::Chain;
use crate::providers::BalanceResult;
use crate::services::MultiChainBalanceClient;

/// Latest outcome published by a [`BalanceWatcher`].
#[derive(Debug, Clone, PartialEq)]
pub enum WatchUpdate {
    Pending,
    Balance(BalanceResult),
    Failed {
        code: &'static str,
        message: String,
    },
}

/// Probes and polls one (chain, address) pair on a fixed period.
///
/// Each tick awaits its call before the next tick is taken, so there is at
/// most one request in flight for the pair. Late ticks are skipped.
pub struct BalanceWatcher {
    client: Arc<MultiChainBalanceClient>,
    chain: Chain,
    address: String,
    period: Duration,
    updates: watch::Sender<WatchUpdate>,
}

impl BalanceWatcher {
    pub fn new(
        client: Arc<MultiChainBalanceClient>,
        chain: Chain,
        address: impl Into<String>,
        period: Duration
    ) -> Self {
        let (updates, _) = watch::channel(WatchUpdate::Pending);
        Self {
            client,
            chain,
            address: address.into(),
            period,
            updates,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WatchUpdate> {
        self.updates.subscribe()
    }

    /// Run until `shutdown` changes or its sender is dropped. An in-flight
    /// request is dropped on shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            chain = %self.chain,
            address = %self.address,
            "Watching balance every {:?}",
            self.period
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = self.tick(&mut ticker) => {}
            }
        }

        tracing::info!(chain = %self.chain, address = %self.address, "Balance watcher stopped");
    }

    /// Probe the endpoint, then fetch, so an outage surfaces as a
    /// connection failure on every refresh.
    async fn tick(&self, ticker: &mut Interval) {
        ticker.tick().await;

        match self.client.refresh(self.chain, &self.address).await {
            Ok(result) => {
                tracing::info!(
                    chain = %self.chain,
                    address = %self.address,
                    "Balance: {} {}",
                    result.formatted(),
                    result.symbol
                );
                self.updates.send_replace(WatchUpdate::Balance(result));
            }
            Err(e) => self.publish_failure(&e),
        }
    }

    fn publish_failure(&self, e: &crate::error::AppError) {
        tracing::warn!(chain = %self.chain, address = %self.address, "Balance refresh failed: {}", e);
        self.updates.send_replace(WatchUpdate::Failed {
            code: e.code(),
            message: e.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ AppError, Result };
    use crate::providers::{ BalanceRequest, ChainProvider };
    use async_trait::async_trait;
    use std::sync::atomic::{ AtomicUsize, Ordering };

    /// Healthy for the first `healthy_probes` probes, then unreachable.
    struct CountingProvider {
        probe_calls: AtomicUsize,
        balance_calls: AtomicUsize,
        healthy_probes: usize,
    }

    impl CountingProvider {
        fn new(healthy_probes: usize) -> Arc<Self> {
            Arc::new(Self {
                probe_calls: AtomicUsize::new(0),
                balance_calls: AtomicUsize::new(0),
                healthy_probes,
            })
        }
    }

    #[async_trait]
    impl ChainProvider for CountingProvider {
        fn chain(&self) -> Chain {
            Chain::Solana
        }

        async fn connect(&self) -> Result<bool> {
            let n = self.probe_calls.fetch_add(1, Ordering::SeqCst);
            if n < self.healthy_probes {
                Ok(true)
            } else {
                Err(AppError::Connection { chain: Chain::Solana })
            }
        }

        async fn get_balance(&self, address: &str) -> Result<BalanceResult> {
            let n = self.balance_calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(BalanceResult::new(BalanceRequest::new(Chain::Solana, address)?, n as f64))
        }
    }

    fn watcher(provider: Arc<CountingProvider>) -> BalanceWatcher {
        let client = MultiChainBalanceClient::from_providers(vec![provider as Arc<dyn ChainProvider>]);
        BalanceWatcher::new(Arc::new(client), Chain::Solana, "So1ana", Duration::from_millis(20))
    }

    fn assert_connection_failure(update: &WatchUpdate) {
        match update {
            WatchUpdate::Failed { code, message } => {
                assert_eq!(*code, "CONNECTION_ERROR");
                assert_eq!(message, "Failed to connect to Solana network");
            }
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_publishes_balances_until_shutdown() {
        let provider = CountingProvider::new(usize::MAX);
        let watcher = watcher(provider.clone());
        let mut updates = watcher.subscribe();
        let (stop, shutdown) = watch::channel(false);

        let handle = tokio::spawn(watcher.run(shutdown));

        // first fetch happens right away, later ones on the period
        for expected in [1.0, 2.0] {
            updates.changed().await.unwrap();
            match &*updates.borrow_and_update() {
                WatchUpdate::Balance(result) => assert_eq!(result.balance, expected),
                other => panic!("unexpected update: {:?}", other),
            }
        }
        assert!(provider.probe_calls.load(Ordering::SeqCst) >= 2);

        stop.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();

        let calls = provider.balance_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(provider.balance_calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_connection_failure_is_published() {
        let provider = CountingProvider::new(0);
        let watcher = watcher(provider.clone());
        let mut updates = watcher.subscribe();
        let (_stop, shutdown) = watch::channel(false);

        let handle = tokio::spawn(watcher.run(shutdown));

        updates.changed().await.unwrap();
        assert_connection_failure(&updates.borrow());
        assert_eq!(provider.balance_calls.load(Ordering::SeqCst), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_later_outage_is_reported_as_connection_failure() {
        let provider = CountingProvider::new(1);
        let watcher = watcher(provider.clone());
        let mut updates = watcher.subscribe();
        let (_stop, shutdown) = watch::channel(false);

        let handle = tokio::spawn(watcher.run(shutdown));

        updates.changed().await.unwrap();
        assert!(matches!(&*updates.borrow_and_update(), WatchUpdate::Balance(_)));

        updates.changed().await.unwrap();
        assert_connection_failure(&updates.borrow_and_update());
        assert!(provider.probe_calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(provider.balance_calls.load(Ordering::SeqCst), 1);

        handle.abort();
    }
}
