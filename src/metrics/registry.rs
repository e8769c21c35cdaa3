//! Named metric instruments backed by a Prometheus registry.

use prometheus::core::Collector;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Instant;

use crate::error::{Error, Result};

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const UPTIME_METRIC: &str = "process_uptime_seconds";

/// A registered instrument, keyed by name in the registry.
#[derive(Clone)]
enum Instrument {
    Counter(IntCounterVec),
    Histogram(HistogramVec),
}

impl Instrument {
    fn label_arity(&self) -> usize {
        let desc = match self {
            Instrument::Counter(c) => c.desc(),
            Instrument::Histogram(h) => h.desc(),
        };
        desc.first().map_or(0, |d| d.variable_labels.len())
    }
}

/// Process-lifetime collection of counters and histograms.
///
/// Instruments are addressed by name; label values must match the arity
/// declared at registration. Nothing is ever reset by [`export`](Self::export).
pub struct MetricsRegistry {
    registry: Registry,
    instruments: RwLock<HashMap<String, Instrument>>,
    uptime: IntGauge,
    started_at: Instant,
}

impl MetricsRegistry {
    /// Creates a registry carrying the default process metrics.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        let uptime = IntGauge::new(UPTIME_METRIC, "Number of seconds since the process started")?;
        registry.register(Box::new(uptime.clone()))?;

        Ok(MetricsRegistry {
            registry,
            instruments: RwLock::new(HashMap::new()),
            uptime,
            started_at: Instant::now(),
        })
    }

    /// Registers a counter partitioned by `labels`.
    pub fn register_counter(&self, name: &str, help: &str, labels: &[&str]) -> Result<()> {
        let counter = IntCounterVec::new(Opts::new(name, help), labels)?;
        self.register(name, Instrument::Counter(counter))
    }

    /// Registers a histogram partitioned by `labels` with the given bucket bounds.
    pub fn register_histogram(
        &self,
        name: &str,
        help: &str,
        labels: &[&str],
        buckets: Vec<f64>,
    ) -> Result<()> {
        let histogram = HistogramVec::new(HistogramOpts::new(name, help).buckets(buckets), labels)?;
        self.register(name, Instrument::Histogram(histogram))
    }

    fn register(&self, name: &str, instrument: Instrument) -> Result<()> {
        let mut instruments = self
            .instruments
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if instruments.contains_key(name) || name == UPTIME_METRIC {
            return Err(Error::AlreadyRegistered(name.to_string()));
        }

        let collector: Box<dyn Collector> = match &instrument {
            Instrument::Counter(c) => Box::new(c.clone()),
            Instrument::Histogram(h) => Box::new(h.clone()),
        };
        self.registry.register(collector).map_err(|e| match e {
            prometheus::Error::AlreadyReg => Error::AlreadyRegistered(name.to_string()),
            other => Error::Metrics(other),
        })?;

        instruments.insert(name.to_string(), instrument);
        Ok(())
    }

    fn lookup(&self, name: &str, label_values: &[&str]) -> Result<Instrument> {
        let instrument = self
            .instruments
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownInstrument(name.to_string()))?;

        let expected = instrument.label_arity();
        if expected != label_values.len() {
            return Err(Error::LabelMismatch {
                name: name.to_string(),
                expected,
                actual: label_values.len(),
            });
        }
        Ok(instrument)
    }

    /// Adds one to the counter `name` for the given label combination.
    pub fn increment(&self, name: &str, label_values: &[&str]) -> Result<()> {
        match self.lookup(name, label_values)? {
            Instrument::Counter(c) => {
                c.get_metric_with_label_values(label_values)?.inc();
                Ok(())
            }
            Instrument::Histogram(_) => Err(Error::UnknownInstrument(name.to_string())),
        }
    }

    /// Records one observation into the histogram `name`.
    ///
    /// Negative and non-finite values are rejected.
    pub fn observe(&self, name: &str, label_values: &[&str], value: f64) -> Result<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidObservation {
                name: name.to_string(),
                value,
            });
        }
        match self.lookup(name, label_values)? {
            Instrument::Histogram(h) => {
                h.get_metric_with_label_values(label_values)?.observe(value);
                Ok(())
            }
            Instrument::Counter(_) => Err(Error::UnknownInstrument(name.to_string())),
        }
    }

    /// Renders every instrument in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String> {
        self.uptime
            .set(i64::try_from(self.started_at.elapsed().as_secs()).unwrap_or(i64::MAX));

        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Encoding(e.to_string()))
    }
}
