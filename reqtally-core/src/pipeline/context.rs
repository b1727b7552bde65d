use crate::conf::PipelineConfig;
use crate::pipeline::counters::PipelineCounters;
use crate::pipeline::events::EventStore;
use crate::pipeline::lines::LineWindow;
use crate::pipeline::stats::StatsStore;
use crate::runtime::Clock;
use crate::store::TimeKeyedStore;
use std::sync::Arc;

/// Everything the workers share: configuration, the clock and the stores.
///
/// Built once at startup and handed to every worker as an `Arc`.
#[derive(Debug)]
pub struct Context {
    pub config: PipelineConfig,
    pub clock: Arc<dyn Clock>,

    /// Line windows the reader is still appending to.
    pub filling_lines: TimeKeyedStore<LineWindow>,
    /// Closed line windows waiting for the parser.
    pub ready_lines: TimeKeyedStore<LineWindow>,

    pub requests: EventStore,
    pub responses: EventStore,

    /// Per output interval counters waiting for the gate.
    pub stats: StatsStore,

    pub counters: PipelineCounters,
}

impl Context {
    pub fn new(config: PipelineConfig, clock: Arc<dyn Clock>) -> Arc<Self> {
        let event_window = config.event_window();
        Arc::new(Self {
            config,
            clock,
            filling_lines: TimeKeyedStore::new(),
            ready_lines: TimeKeyedStore::new(),
            requests: EventStore::new(event_window),
            responses: EventStore::new(event_window),
            stats: StatsStore::new(),
            counters: PipelineCounters::default(),
        })
    }

    pub fn now(&self) -> i64 {
        self.clock.now_secs()
    }
}
