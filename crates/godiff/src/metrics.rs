//! Metrics collection and reporting using metrics-rs.
//!
//! Cycle verdicts and toolchain timings go through the `metrics` facade. With
//! no recorder installed they are no-ops; `--metrics` installs [`CliRecorder`]
//! and prints a summary at exit.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use metrics::{
    Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit, counter,
    describe_counter, describe_histogram, histogram,
};
use parking_lot::RwLock;

use crate::runner::Verdict;

/// Initialize metric descriptions.
pub fn init() {
    describe_counter!(
        "godiff_cycles_total",
        Unit::Count,
        "Comparison cycles classified, by verdict"
    );
    describe_counter!(
        "godiff_cycles_skipped_total",
        Unit::Count,
        "Cycles skipped because their scratch directory could not be prepared"
    );
    describe_counter!(
        "godiff_toolchain_failures_total",
        Unit::Count,
        "Executions that ended in a failure marker, by toolchain"
    );
    describe_histogram!(
        "godiff_execute_duration_seconds",
        Unit::Seconds,
        "Build-and-run wall time per toolchain"
    );
    describe_histogram!(
        "godiff_program_statements",
        Unit::Count,
        "Statements per generated program"
    );
}

/// Record one toolchain invocation.
pub fn record_execution(toolchain: &str, elapsed: Duration, failed: bool) {
    let labels = [("toolchain", toolchain.to_string())];
    histogram!("godiff_execute_duration_seconds", &labels).record(elapsed.as_secs_f64());
    if failed {
        counter!("godiff_toolchain_failures_total", &labels).increment(1);
    }
}

/// Record a classified cycle.
#[allow(clippy::cast_precision_loss)]
pub fn record_cycle(verdict: Verdict, statements: usize) {
    counter!("godiff_cycles_total", "verdict" => verdict.as_str()).increment(1);
    histogram!("godiff_program_statements").record(statements as f64);
}

/// Record a skipped cycle.
pub fn record_skipped() {
    counter!("godiff_cycles_skipped_total").increment(1);
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// In-memory metric values, keyed by rendered name and labels.
#[derive(Default)]
struct Store {
    counters: RwLock<BTreeMap<String, u64>>,
    histograms: RwLock<BTreeMap<String, Vec<f64>>>,
}

struct CliCounter {
    key: String,
    store: Arc<Store>,
}

impl metrics::CounterFn for CliCounter {
    fn increment(&self, value: u64) {
        *self.store.counters.write().entry(self.key.clone()).or_insert(0) += value;
    }

    fn absolute(&self, value: u64) {
        self.store.counters.write().insert(self.key.clone(), value);
    }
}

struct CliHistogram {
    key: String,
    store: Arc<Store>,
}

impl metrics::HistogramFn for CliHistogram {
    fn record(&self, value: f64) {
        self.store
            .histograms
            .write()
            .entry(self.key.clone())
            .or_default()
            .push(value);
    }
}

/// Recorder that keeps counters and histograms in memory for a summary.
///
/// Gauges are not used by godiff and are dropped.
#[derive(Default)]
pub struct CliRecorder {
    store: Arc<Store>,
}

impl CliRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install this recorder as the global metrics recorder.
    ///
    /// Returns `None` if a recorder is already installed.
    #[must_use]
    pub fn install(self) -> Option<CliRecorderHandle> {
        let store = Arc::clone(&self.store);
        metrics::set_global_recorder(self).ok()?;
        Some(CliRecorderHandle { store })
    }
}

fn key_to_string(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|l| format!("{}={}", l.key(), l.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CliCounter {
            key: key_to_string(key),
            store: Arc::clone(&self.store),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(Arc::new(CliHistogram {
            key: key_to_string(key),
            store: Arc::clone(&self.store),
        }))
    }
}

/// Handle for reading metrics after installing the CLI recorder.
pub struct CliRecorderHandle {
    store: Arc<Store>,
}

impl CliRecorderHandle {
    #[must_use]
    pub fn get_counter(&self, key: &str) -> Option<u64> {
        self.store.counters.read().get(key).copied()
    }

    #[must_use]
    pub fn get_histogram(&self, key: &str) -> Option<Vec<f64>> {
        self.store.histograms.read().get(key).cloned()
    }

    /// Print all collected metrics in a human-readable format.
    #[allow(clippy::cast_precision_loss)]
    pub fn print_summary(&self) {
        let counters = self.store.counters.read();
        let histograms = self.store.histograms.read();

        if counters.is_empty() && histograms.is_empty() {
            println!("No metrics collected.");
            return;
        }

        println!();
        println!("## Metrics Summary");
        println!();

        if !counters.is_empty() {
            println!("### Counters");
            for (key, value) in counters.iter() {
                println!("  {key}: {value}");
            }
            println!();
        }

        if !histograms.is_empty() {
            println!("### Histograms");
            for (key, values) in histograms.iter().filter(|(_, v)| !v.is_empty()) {
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let avg = values.iter().sum::<f64>() / values.len() as f64;
                println!(
                    "  {key}: count={}, min={min:.3}, max={max:.3}, avg={avg:.3}",
                    values.len()
                );
            }
            println!();
        }
    }
}
