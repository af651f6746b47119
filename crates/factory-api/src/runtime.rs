//! Lifecycle controller: owns the world, the two periodic timers, and the
//! snapshot broadcast. Constructed explicitly by the composition root; tests
//! instantiate independent runtimes with independent clocks.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use contracts::{FactoryStatus, WorldSnapshot, SCHEMA_VERSION_V1};
use factory_core::world::FactoryWorld;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::memory::MemoryBridge;

const SNAPSHOT_CHANNEL_CAPACITY: usize = 4096;

#[derive(Debug, Default)]
struct Timers {
    tick: Option<JoinHandle<()>>,
    compression: Option<JoinHandle<()>>,
}

/// The one running simulation instance. All agent mutation happens inside
/// the tick task; every other consumer reads through short lock holds or the
/// broadcast channel.
#[derive(Debug)]
pub struct FactoryRuntime {
    world: Arc<Mutex<FactoryWorld>>,
    bridge: MemoryBridge,
    snapshot_tx: broadcast::Sender<WorldSnapshot>,
    timers: Mutex<Timers>,
    tick_interval_ms: u64,
    compression_interval_ms: u64,
}

impl FactoryRuntime {
    pub fn new(world: FactoryWorld, bridge: MemoryBridge) -> Self {
        let tick_interval_ms = world.config().tick_interval_ms.max(1);
        let compression_interval_ms = world.config().compression_interval_ms.max(1);
        let (snapshot_tx, _) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);

        Self {
            world: Arc::new(Mutex::new(world)),
            bridge,
            snapshot_tx,
            timers: Mutex::new(Timers::default()),
            tick_interval_ms,
            compression_interval_ms,
        }
    }

    /// Start both timers. Idempotent: a second call while running is a
    /// no-op, so restarting can never leak a duplicate interval.
    pub async fn start(&self) {
        let mut timers = self.timers.lock().await;
        if timers.tick.is_some() {
            debug!("start ignored, engine already running");
            return;
        }

        info!(
            tick_interval_ms = self.tick_interval_ms,
            compression_interval_ms = self.compression_interval_ms,
            "starting factory engine"
        );

        timers.tick = Some(self.spawn_tick_timer());
        timers.compression = Some(self.spawn_compression_timer());
    }

    /// Cancel both timers. Safe when not running. In-flight memory calls
    /// are not cancelled; they complete or fail on the bridge worker and
    /// only ever update the stats cache.
    pub async fn stop(&self) {
        let mut timers = self.timers.lock().await;
        if let Some(handle) = timers.tick.take() {
            handle.abort();
        }
        if let Some(handle) = timers.compression.take() {
            handle.abort();
        }
        info!("factory engine stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.timers.lock().await.tick.is_some()
    }

    pub async fn status(&self) -> FactoryStatus {
        let (tick_count, agent_count) = {
            let world = self.world.lock().await;
            (world.tick_count(), world.agents().len())
        };
        FactoryStatus {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            running: self.is_running().await,
            tick_count,
            agent_count,
            observer_count: self.snapshot_tx.receiver_count(),
        }
    }

    /// The current full world view, with the latest cached memory stats.
    pub async fn snapshot_now(&self) -> WorldSnapshot {
        let world = self.world.lock().await;
        world.snapshot(epoch_ms(), self.bridge.cached_stats())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorldSnapshot> {
        self.snapshot_tx.subscribe()
    }

    fn spawn_tick_timer(&self) -> JoinHandle<()> {
        let world = Arc::clone(&self.world);
        let bridge = self.bridge.clone();
        let snapshot_tx = self.snapshot_tx.clone();
        let interval_ms = self.tick_interval_ms;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The interval's first tick completes immediately; consume it so
            // the first simulation tick lands one full period after start.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let now_ms = epoch_ms();
                let snapshot = {
                    let mut world = world.lock().await;
                    let outcome = world.step(now_ms);
                    for event in outcome.events {
                        bridge.publish(event);
                    }
                    world.snapshot(now_ms, bridge.cached_stats())
                };
                // No receivers is fine; observers come and go.
                let _ = snapshot_tx.send(snapshot);
            }
        })
    }

    fn spawn_compression_timer(&self) -> JoinHandle<()> {
        let bridge = self.bridge.clone();
        let interval_ms = self.compression_interval_ms;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First pass runs immediately so stats are available well before
            // the first full compression interval elapses.
            loop {
                ticker.tick().await;
                bridge.request_compression();
            }
        })
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
