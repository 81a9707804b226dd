use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use fblock_node::NodeClient;
use fblock_postgres::{ensure_schema, PostgresDb};
use fblock_scanner::{Scanner, ScannerConfig};

use crate::{cli::ArchiveConfig, error::ArchiveError};

/// Owns the worker thread that drives the scan loop on a tokio runtime.
///
/// The schema is ensured before the worker is spawned, so the scanner never
/// issues an insert against a missing relation.
pub struct ArchiveSystem {
    start_tx: flume::Sender<()>,
    kill_tx: flume::Sender<()>,
    done_rx: flume::Receiver<()>,
    handle: jod_thread::JoinHandle<Result<(), ArchiveError>>,
}

impl ArchiveSystem {
    pub fn new(config: ArchiveConfig) -> Result<Self, ArchiveError> {
        let (start_tx, start_rx) = flume::bounded(1);
        let (kill_tx, kill_rx) = flume::bounded(1);
        let (done_tx, done_rx) = flume::bounded(1);

        let runtime = tokio::runtime::Runtime::new()?;
        // The schema must be in place before the first insert.
        runtime.block_on(ensure_schema(config.postgres.uri()))?;
        let db = runtime.block_on(PostgresDb::new(config.postgres))?;
        let node = NodeClient::new(config.node)?;
        let scanner_config = config.scanner;

        log::info!(target: "archive", "Start Archive Task");
        let handle = jod_thread::spawn(move || {
            start_rx.recv().expect("Start Archive Work Loop");
            log::info!(target: "archive", "Start Archive Work Loop");
            let result = runtime.block_on(Self::work(node, db, scanner_config, kill_rx));
            let _ = done_tx.send(());
            result
        });

        Ok(Self {
            start_tx,
            kill_tx,
            done_rx,
            handle,
        })
    }

    pub fn drive(&self) -> Result<(), ArchiveError> {
        self.start_tx.send(())?;
        Ok(())
    }

    /// Block until the scan loop ends on its own or `running` is cleared by
    /// the signal handler.
    pub fn wait(&self, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            if self
                .done_rx
                .recv_timeout(Duration::from_millis(200))
                .is_ok()
            {
                break;
            }
        }
    }

    /// Stop the scan loop and surface its result. A faulted scan propagates
    /// here so the process can exit non-zero.
    pub fn shutdown(self) -> Result<(), ArchiveError> {
        // The worker may already be gone; joining surfaces its result either way.
        let _ = self.kill_tx.send(());
        self.handle.join()
    }

    async fn work(
        node: NodeClient,
        db: PostgresDb,
        config: ScannerConfig,
        kill_rx: flume::Receiver<()>,
    ) -> Result<(), ArchiveError> {
        let mut scanner = Scanner::new(node, db, config);
        scanner.run(kill_rx).await?;
        Ok(())
    }
}
