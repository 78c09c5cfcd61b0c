//! Lightweight operation timing. Values are emitted as `tracing` events
//! rather than held in process state.

/// Record a named value.
pub fn track_metric(name: &str, value: f64) {
    tracing::debug!(metric = name, value, "metric");
}

/// Guard that reports its lifetime as `<name>_duration_ms` when dropped.
pub struct OperationTimer {
    start: std::time::Instant,
    name: &'static str,
}

impl OperationTimer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: std::time::Instant::now(),
            name,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        track_metric(&format!("{}_duration_ms", self.name), self.elapsed_ms());
    }
}

/// Time the enclosing scope: `let _timer = measure_operation!("query.search");`
#[macro_export]
macro_rules! measure_operation {
    ($operation_name:expr) => {
        $crate::metrics::OperationTimer::start($operation_name)
    };
}
