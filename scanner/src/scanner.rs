use std::{mem, time::Duration};

use fblock_node::FblockResponse;
use fblock_postgres::{FblockModel, InsertOutcome};

use crate::{
    config::ScannerConfig, error::ScanError, sink::BlockSink, source::BlockSource, transform,
};

/// The scan loop's position in its pipeline.
#[derive(Debug)]
enum ScanState {
    Idle,
    Fetching(u32),
    Persisting(u32, FblockModel),
    Advancing(u32),
    Faulted,
}

/// Forward-only, strictly sequential block ingester.
///
/// Height `h + 1` is never fetched before the row for height `h` is durable
/// (or known to be a benign duplicate), so a fully ingested store is always
/// gap-free. The loop tracks the chain tip forever unless a stop height is
/// configured or a kill signal arrives; a kill is only honored between
/// heights, never between fetch and insert.
pub struct Scanner<Source, Sink> {
    source: Source,
    sink: Sink,
    config: ScannerConfig,
    state: ScanState,
}

impl<Source, Sink> Scanner<Source, Sink>
where
    Source: BlockSource,
    Sink: BlockSink,
{
    pub fn new(source: Source, sink: Sink, config: ScannerConfig) -> Self {
        Self {
            source,
            sink,
            config,
            state: ScanState::Idle,
        }
    }

    /// Drive the scan until a stop condition, kill signal, or fault.
    pub async fn run(&mut self, kill_rx: flume::Receiver<()>) -> Result<(), ScanError> {
        let result = self.scan(&kill_rx).await;
        match &result {
            Ok(()) => self.state = ScanState::Idle,
            Err(err) => {
                log::error!(target: "scanner", "Scan faulted: {}", err);
                self.state = ScanState::Faulted;
            }
        }
        result
    }

    async fn scan(&mut self, kill_rx: &flume::Receiver<()>) -> Result<(), ScanError> {
        let resume = match self.config.start_height {
            Some(height) => height,
            None => match self.sink.max_height().await? {
                Some(max) => max as u32 + 1,
                None => 0,
            },
        };
        log::info!(target: "scanner", "Scanning from height #{}", resume);
        self.state = ScanState::Fetching(resume);

        loop {
            self.state = match mem::replace(&mut self.state, ScanState::Idle) {
                ScanState::Idle | ScanState::Faulted => return Ok(()),
                ScanState::Fetching(height) => {
                    if matches!(self.config.stop_height, Some(stop) if height > stop) {
                        log::info!(target: "scanner", "Reached stop height, stopping before #{}", height);
                        return Ok(());
                    }
                    if kill_requested(kill_rx) {
                        log::info!(target: "scanner", "Shutdown requested, stopping before #{}", height);
                        return Ok(());
                    }
                    match self.fetch(height, kill_rx).await? {
                        Some(response) => {
                            ScanState::Persisting(height, transform::into_model(height, response)?)
                        }
                        // Killed during a backoff wait.
                        None => return Ok(()),
                    }
                }
                ScanState::Persisting(height, model) => {
                    let tx_count = model.tx_count;
                    let ec_exchange_rate = model.ec_exchange_rate;
                    match self.sink.insert_fblock(model).await? {
                        InsertOutcome::Inserted => log::info!(
                            target: "scanner",
                            "Ingested fblock #{}: tx_count = {}, ec_exchange_rate = {}",
                            height, tx_count, ec_exchange_rate
                        ),
                        InsertOutcome::Duplicate => log::warn!(
                            target: "scanner",
                            "Fblock #{} was already ingested, advancing",
                            height
                        ),
                    }
                    ScanState::Advancing(height)
                }
                ScanState::Advancing(height) => ScanState::Fetching(height + 1),
            };
        }
    }

    /// Fetch one height, absorbing not-yet-produced waits and transient
    /// transport failures. Returns `None` when killed during a wait.
    async fn fetch(
        &self,
        height: u32,
        kill_rx: &flume::Receiver<()>,
    ) -> Result<Option<FblockResponse>, ScanError> {
        let mut attempts: u32 = 0;
        loop {
            match self.source.factoid_block_by_height(height).await {
                Ok(Some(response)) => return Ok(Some(response)),
                Ok(None) => {
                    // The chain tip has not reached this height; not an error.
                    attempts = 0;
                    log::info!(
                        target: "scanner",
                        "Height #{} not yet produced, polling again in {}ms",
                        height, self.config.poll_interval_ms
                    );
                    if wait(self.config.poll_interval_ms, kill_rx).await {
                        return Ok(None);
                    }
                }
                Err(err) => {
                    attempts += 1;
                    if attempts > self.config.retry_limit {
                        return Err(ScanError::Transport(err));
                    }
                    let backoff = backoff_ms(self.config.retry_backoff_ms, attempts);
                    log::warn!(
                        target: "scanner",
                        "Fetch #{} failed ({}), retry {}/{} in {}ms",
                        height, err, attempts, self.config.retry_limit, backoff
                    );
                    if wait(backoff, kill_rx).await {
                        return Ok(None);
                    }
                }
            }
        }
    }
}

/// Exponential backoff, capped at 64x the base delay.
fn backoff_ms(base: u64, attempts: u32) -> u64 {
    base.saturating_mul(1 << (attempts - 1).min(6))
}

fn kill_requested(kill_rx: &flume::Receiver<()>) -> bool {
    // A disconnected controller counts as a kill.
    !matches!(kill_rx.try_recv(), Err(flume::TryRecvError::Empty))
}

/// Sleep for `ms`, returning early with `true` if killed meanwhile.
async fn wait(ms: u64, kill_rx: &flume::Receiver<()>) -> bool {
    tokio::select! {
        _ = kill_rx.recv_async() => true,
        _ = tokio::time::sleep(Duration::from_millis(ms)) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::{
            atomic::{AtomicU32, Ordering},
            Arc, Mutex,
        },
    };

    use fblock_node::{FactoidTransaction, Fblock, NodeError};
    use fblock_postgres::SqlxError;

    use super::*;

    fn response(height: u32) -> FblockResponse {
        FblockResponse {
            fblock: Fblock {
                height,
                key_mr: "ab12".to_string(),
                ec_exchange_rate: 1_000_000,
                transactions: vec![FactoidTransaction {
                    millitimestamp: 1000,
                    txid: None,
                }],
            },
            rawdata: "deadbeef".to_string(),
        }
    }

    /// A node serving heights up to `tip`; behavior knobs for the failure
    /// paths.
    #[derive(Default)]
    struct TestNode {
        tip: AtomicU32,
        /// Pretend a new block is produced every time a height is missed.
        advance_on_miss: bool,
        /// Fail this many leading calls with a transport error.
        failures_left: AtomicU32,
        /// Report `height + 1` instead of the requested height.
        misreport_height: bool,
        fetched: Mutex<Vec<u32>>,
        misses: AtomicU32,
    }

    impl TestNode {
        fn with_tip(tip: u32) -> Self {
            Self {
                tip: AtomicU32::new(tip),
                ..Self::default()
            }
        }
    }

    #[async_trait::async_trait]
    impl BlockSource for TestNode {
        async fn factoid_block_by_height(
            &self,
            height: u32,
        ) -> Result<Option<FblockResponse>, NodeError> {
            self.fetched.lock().unwrap().push(height);
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(NodeError::Rpc {
                    code: -1,
                    message: "node unreachable".to_string(),
                });
            }
            if height > self.tip.load(Ordering::SeqCst) {
                self.misses.fetch_add(1, Ordering::SeqCst);
                if self.advance_on_miss {
                    self.tip.fetch_add(1, Ordering::SeqCst);
                }
                return Ok(None);
            }
            let mut response = response(height);
            if self.misreport_height {
                response.fblock.height = height + 1;
            }
            Ok(Some(response))
        }
    }

    /// In-memory stand-in for the fblock relation.
    #[derive(Default)]
    struct MemSink {
        rows: Mutex<BTreeMap<i64, FblockModel>>,
    }

    impl MemSink {
        fn heights(&self) -> Vec<i64> {
            self.rows.lock().unwrap().keys().copied().collect()
        }
    }

    #[async_trait::async_trait]
    impl BlockSink for MemSink {
        async fn max_height(&self) -> Result<Option<i64>, SqlxError> {
            Ok(self.rows.lock().unwrap().keys().next_back().copied())
        }

        async fn insert_fblock(&self, model: FblockModel) -> Result<InsertOutcome, SqlxError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.contains_key(&model.height) {
                return Ok(InsertOutcome::Duplicate);
            }
            rows.insert(model.height, model);
            Ok(InsertOutcome::Inserted)
        }
    }

    fn fast_config(stop_height: u32) -> ScannerConfig {
        ScannerConfig {
            stop_height: Some(stop_height),
            poll_interval_ms: 1,
            retry_backoff_ms: 1,
            ..ScannerConfig::default()
        }
    }

    #[tokio::test]
    async fn ingests_genesis_through_stop_height() {
        let node = Arc::new(TestNode::with_tip(2));
        let sink = Arc::new(MemSink::default());
        let (_kill_tx, kill_rx) = flume::bounded(1);

        let mut scanner = Scanner::new(node.clone(), sink.clone(), fast_config(2));
        scanner.run(kill_rx).await.unwrap();

        assert_eq!(sink.heights(), vec![0, 1, 2]);
        let genesis = sink.rows.lock().unwrap()[&0].clone();
        assert_eq!(
            genesis,
            FblockModel {
                height: 0,
                timestamp: Some(1000),
                tx_count: 1,
                ec_exchange_rate: 1_000_000,
                price: None,
                key_mr: vec![0xab, 0x12],
                data: vec![0xde, 0xad, 0xbe, 0xef],
            }
        );
    }

    #[tokio::test]
    async fn waits_on_tip_and_continues_once_it_advances() {
        let node = Arc::new(TestNode {
            advance_on_miss: true,
            ..TestNode::with_tip(2)
        });
        let sink = Arc::new(MemSink::default());
        let (_kill_tx, kill_rx) = flume::bounded(1);

        let mut scanner = Scanner::new(node.clone(), sink.clone(), fast_config(4));
        scanner.run(kill_rx).await.unwrap();

        // Heights 3 and 4 were each missed once, then served after the
        // simulated tip advanced. The run never faulted.
        assert_eq!(sink.heights(), vec![0, 1, 2, 3, 4]);
        assert_eq!(node.misses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn resumes_from_the_highest_ingested_height() {
        let sink = Arc::new(MemSink::default());

        let first = Arc::new(TestNode::with_tip(5));
        let (_kill_tx, kill_rx) = flume::bounded(1);
        let mut scanner = Scanner::new(first.clone(), sink.clone(), fast_config(2));
        scanner.run(kill_rx).await.unwrap();
        assert_eq!(sink.heights(), vec![0, 1, 2]);

        // A fresh scanner against the same store picks up at #3 without
        // re-fetching anything below it.
        let second = Arc::new(TestNode::with_tip(5));
        let (_kill_tx, kill_rx) = flume::bounded(1);
        let mut scanner = Scanner::new(second.clone(), sink.clone(), fast_config(5));
        scanner.run(kill_rx).await.unwrap();

        assert_eq!(sink.heights(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(*second.fetched.lock().unwrap(), vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn duplicate_rows_are_benign() {
        let node = Arc::new(TestNode::with_tip(2));
        let sink = Arc::new(MemSink::default());
        sink.insert_fblock(FblockModel {
            height: 1,
            timestamp: Some(999),
            tx_count: 0,
            ec_exchange_rate: 0,
            price: None,
            key_mr: vec![],
            data: vec![],
        })
        .await
        .unwrap();

        // Force an overlapping scan from genesis over the existing row.
        let config = ScannerConfig {
            start_height: Some(0),
            ..fast_config(2)
        };
        let (_kill_tx, kill_rx) = flume::bounded(1);
        let mut scanner = Scanner::new(node.clone(), sink.clone(), config);
        scanner.run(kill_rx).await.unwrap();

        assert_eq!(sink.heights(), vec![0, 1, 2]);
        // The pre-existing row at #1 was not overwritten.
        assert_eq!(sink.rows.lock().unwrap()[&1].timestamp, Some(999));
    }

    #[tokio::test]
    async fn height_mismatch_faults_without_persisting() {
        let node = Arc::new(TestNode {
            misreport_height: true,
            ..TestNode::with_tip(2)
        });
        let sink = Arc::new(MemSink::default());
        let (_kill_tx, kill_rx) = flume::bounded(1);

        let mut scanner = Scanner::new(node.clone(), sink.clone(), fast_config(2));
        let err = scanner.run(kill_rx).await.unwrap_err();

        assert!(matches!(
            err,
            ScanError::HeightMismatch {
                requested: 0,
                reported: 1
            }
        ));
        assert!(sink.heights().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_fault_once_retries_are_exhausted() {
        let node = Arc::new(TestNode {
            failures_left: AtomicU32::new(u32::MAX),
            ..TestNode::with_tip(2)
        });
        let sink = Arc::new(MemSink::default());
        let config = ScannerConfig {
            retry_limit: 2,
            ..fast_config(2)
        };
        let (_kill_tx, kill_rx) = flume::bounded(1);

        let mut scanner = Scanner::new(node.clone(), sink.clone(), config);
        let err = scanner.run(kill_rx).await.unwrap_err();

        assert!(matches!(err, ScanError::Transport(_)));
        // The first attempt plus `retry_limit` retries.
        assert_eq!(node.fetched.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn transient_transport_errors_are_retried() {
        let node = Arc::new(TestNode {
            failures_left: AtomicU32::new(2),
            ..TestNode::with_tip(2)
        });
        let sink = Arc::new(MemSink::default());
        let (_kill_tx, kill_rx) = flume::bounded(1);

        let mut scanner = Scanner::new(node.clone(), sink.clone(), fast_config(2));
        scanner.run(kill_rx).await.unwrap();

        assert_eq!(sink.heights(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn kill_is_honored_during_a_tip_wait() {
        let node = Arc::new(TestNode::with_tip(0));
        let sink = Arc::new(MemSink::default());
        // No stop height and a long poll interval: only the kill ends this.
        let config = ScannerConfig {
            poll_interval_ms: 60_000,
            ..ScannerConfig::default()
        };
        let (kill_tx, kill_rx) = flume::bounded(1);

        let sink2 = sink.clone();
        let handle = tokio::spawn(async move {
            let mut scanner = Scanner::new(node, sink2, config);
            scanner.run(kill_rx).await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        kill_tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scanner did not honor the kill")
            .unwrap();
        assert!(result.is_ok());
        // Height #0 was ingested before the scan started waiting on #1.
        assert_eq!(sink.heights(), vec![0]);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        assert_eq!(backoff_ms(1000, 1), 1000);
        assert_eq!(backoff_ms(1000, 2), 2000);
        assert_eq!(backoff_ms(1000, 4), 8000);
        assert_eq!(backoff_ms(1000, 20), 64_000);
    }
}
