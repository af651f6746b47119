//! Bridge between the state machine and the external tiered-memory service.
//!
//! The bridge is strictly best-effort: indexing goes through a bounded queue
//! drained by one supervised worker, compression is a trigger consumed by the
//! same worker, and every failure is logged at this boundary and ignored. The
//! tick path never awaits a memory call and the bridge never touches agent
//! state.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use contracts::{CompressionReport, CompressionThresholds, IndexRequest, MemoryEvent};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

const EVENT_QUEUE_CAPACITY: usize = 1024;
const COMPRESS_QUEUE_CAPACITY: usize = 4;

#[derive(Debug)]
pub enum MemoryServiceError {
    Http(reqwest::Error),
}

impl fmt::Display for MemoryServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(err) => write!(f, "memory service http error: {err}"),
        }
    }
}

impl std::error::Error for MemoryServiceError {}

impl From<reqwest::Error> for MemoryServiceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// The narrow interface of the external tiered-memory collaborator. The
/// engine only ever indexes events, runs compression passes, and reads
/// opaque stats; everything behind these calls is out of its hands.
pub trait MemoryService: Send + Sync + 'static {
    fn index(
        &self,
        request: IndexRequest,
    ) -> impl Future<Output = Result<(), MemoryServiceError>> + Send;

    fn compress(
        &self,
        thresholds: CompressionThresholds,
    ) -> impl Future<Output = Result<CompressionReport, MemoryServiceError>> + Send;

    fn stats(&self) -> impl Future<Output = Result<Value, MemoryServiceError>> + Send;
}

/// Accepts everything and reports empty stats; used when no memory backend
/// is configured. The simulation ticks identically either way.
#[derive(Debug, Clone, Default)]
pub struct NullMemoryService;

impl MemoryService for NullMemoryService {
    fn index(
        &self,
        _request: IndexRequest,
    ) -> impl Future<Output = Result<(), MemoryServiceError>> + Send {
        async { Ok(()) }
    }

    fn compress(
        &self,
        _thresholds: CompressionThresholds,
    ) -> impl Future<Output = Result<CompressionReport, MemoryServiceError>> + Send {
        async { Ok(CompressionReport::default()) }
    }

    fn stats(&self) -> impl Future<Output = Result<Value, MemoryServiceError>> + Send {
        async { Ok(Value::Object(serde_json::Map::new())) }
    }
}

/// JSON client for a memory service reachable over HTTP:
/// `POST /index`, `POST /compress`, `GET /stats`.
#[derive(Debug, Clone)]
pub struct HttpMemoryService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMemoryService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl MemoryService for HttpMemoryService {
    fn index(
        &self,
        request: IndexRequest,
    ) -> impl Future<Output = Result<(), MemoryServiceError>> + Send {
        let call = self
            .client
            .post(format!("{}/index", self.base_url))
            .json(&request)
            .send();
        async move {
            call.await?.error_for_status()?;
            Ok(())
        }
    }

    fn compress(
        &self,
        thresholds: CompressionThresholds,
    ) -> impl Future<Output = Result<CompressionReport, MemoryServiceError>> + Send {
        let call = self
            .client
            .post(format!("{}/compress", self.base_url))
            .json(&thresholds)
            .send();
        async move {
            let report = call.await?.error_for_status()?.json().await?;
            Ok(report)
        }
    }

    fn stats(&self) -> impl Future<Output = Result<Value, MemoryServiceError>> + Send {
        let call = self.client.get(format!("{}/stats", self.base_url)).send();
        async move {
            let stats = call.await?.error_for_status()?.json().await?;
            Ok(stats)
        }
    }
}

/// Cloneable handle to the bridge worker. Publishing and compression
/// triggers are non-blocking; the cached stats are the last good snapshot
/// read from the service and are echoed verbatim into world snapshots.
#[derive(Debug, Clone)]
pub struct MemoryBridge {
    event_tx: mpsc::Sender<MemoryEvent>,
    compress_tx: mpsc::Sender<()>,
    stats_cache: Arc<Mutex<Option<Value>>>,
}

impl MemoryBridge {
    /// Spawn the worker that owns the external service. Stopping the
    /// lifecycle timers later does not stop this worker, so in-flight calls
    /// run to completion or failure on their own.
    pub fn spawn<S: MemoryService>(service: S, thresholds: CompressionThresholds) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let (compress_tx, compress_rx) = mpsc::channel(COMPRESS_QUEUE_CAPACITY);
        let stats_cache = Arc::new(Mutex::new(None));

        tokio::spawn(run_worker(
            service,
            event_rx,
            compress_rx,
            Arc::clone(&stats_cache),
            thresholds,
        ));

        Self {
            event_tx,
            compress_tx,
            stats_cache,
        }
    }

    /// Queue one event for indexing. On a full queue the event is dropped;
    /// the tick path is never back-pressured.
    pub fn publish(&self, event: MemoryEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(agent_id = %event.agent_id, source = %event.source, "memory queue full, dropping event");
            }
            Err(TrySendError::Closed(event)) => {
                warn!(agent_id = %event.agent_id, "memory bridge worker gone, dropping event");
            }
        }
    }

    /// Ask the worker to run one compression pass and refresh the stats
    /// cache. Coalesces if a pass is already queued.
    pub fn request_compression(&self) {
        let _ = self.compress_tx.try_send(());
    }

    pub fn cached_stats(&self) -> Option<Value> {
        match self.stats_cache.lock() {
            Ok(cache) => cache.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

async fn run_worker<S: MemoryService>(
    service: S,
    mut event_rx: mpsc::Receiver<MemoryEvent>,
    mut compress_rx: mpsc::Receiver<()>,
    stats_cache: Arc<Mutex<Option<Value>>>,
    thresholds: CompressionThresholds,
) {
    loop {
        tokio::select! {
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                if let Err(err) = service.index(IndexRequest::from(event)).await {
                    warn!(error = %err, "memory index call failed");
                }
            }
            request = compress_rx.recv() => {
                if request.is_none() {
                    break;
                }
                match service.compress(thresholds).await {
                    Ok(report) => debug!(
                        hot_to_warm = report.hot_to_warm,
                        warm_to_cold = report.warm_to_cold,
                        tokens_reclaimed = report.tokens_reclaimed,
                        "memory compression pass finished"
                    ),
                    Err(err) => warn!(error = %err, "memory compression failed"),
                }
                match service.stats().await {
                    Ok(stats) => {
                        match stats_cache.lock() {
                            Ok(mut cache) => *cache = Some(stats),
                            Err(poisoned) => *poisoned.into_inner() = Some(stats),
                        }
                    }
                    Err(err) => warn!(error = %err, "memory stats refresh failed"),
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{RecordingMemoryService, UnreachableMemoryService};
    use super::*;
    use contracts::{MemorySource, MemoryVisibility, SimConfig};
    use std::time::Duration;

    fn event(agent_id: &str, content: &str) -> MemoryEvent {
        MemoryEvent {
            agent_id: agent_id.to_string(),
            source: MemorySource::Thought,
            content: content.to_string(),
            visibility: MemoryVisibility::Private,
        }
    }

    #[tokio::test]
    async fn published_events_reach_the_service() {
        let service = RecordingMemoryService::default();
        let bridge = MemoryBridge::spawn(
            service.clone(),
            CompressionThresholds::from_config(&SimConfig::default()),
        );

        bridge.publish(event("agent_ada", "first"));
        bridge.publish(event("agent_ada", "second"));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let indexed = service.indexed();
        assert_eq!(indexed.len(), 2);
        assert_eq!(indexed[0].agent_id, "agent_ada");
        assert_eq!(indexed[0].layer, MemoryVisibility::Private);
    }

    #[tokio::test]
    async fn compression_refreshes_the_stats_cache() {
        let service = RecordingMemoryService::default();
        let bridge = MemoryBridge::spawn(
            service.clone(),
            CompressionThresholds::from_config(&SimConfig::default()),
        );
        assert_eq!(bridge.cached_stats(), None);

        bridge.request_compression();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(service.compression_count(), 1);
        let stats = bridge.cached_stats().expect("stats cached");
        assert_eq!(stats["hot"], serde_json::json!(5));
    }

    #[tokio::test]
    async fn service_failures_never_escape_the_bridge() {
        let bridge = MemoryBridge::spawn(
            UnreachableMemoryService,
            CompressionThresholds::from_config(&SimConfig::default()),
        );

        bridge.publish(event("agent_ada", "lost"));
        bridge.request_compression();
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Everything failed, nothing panicked, the cache simply stays empty
        // and the bridge keeps accepting events.
        assert_eq!(bridge.cached_stats(), None);
        bridge.publish(event("agent_ada", "still accepted"));
    }
}
