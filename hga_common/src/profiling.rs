//! Optional wall-clock accounting per labelled phase.
//!
//! With the `profiling` feature a [`Timer`] adds its lifetime to a global
//! table on drop; without it every call compiles to nothing.

#[cfg(feature = "profiling")]
mod enabled {
    use std::sync::OnceLock;
    use std::time::{Duration, Instant};

    use dashmap::DashMap;

    type Count = u64;
    type TotalNanos = u128;

    static STATS: OnceLock<DashMap<&'static str, (Count, TotalNanos)>> = OnceLock::new();

    #[inline]
    fn stats() -> &'static DashMap<&'static str, (Count, TotalNanos)> {
        STATS.get_or_init(DashMap::new)
    }

    /// Records the time between construction and drop under `label`.
    pub struct Timer {
        label: &'static str,
        start: Instant,
    }

    impl Timer {
        /// Starts timing.
        #[inline]
        #[must_use]
        pub fn new(label: &'static str) -> Self {
            Self {
                label,
                start: Instant::now(),
            }
        }
    }

    impl Drop for Timer {
        fn drop(&mut self) {
            record(self.label, self.start.elapsed());
        }
    }

    /// Adds one sample to `label`.
    pub fn record(label: &'static str, dur: Duration) {
        let mut entry = stats().entry(label).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += dur.as_nanos();
    }

    /// Renders the table, slowest phase first.
    #[must_use]
    pub fn report() -> String {
        let mut rows: Vec<(&'static str, Count, TotalNanos)> = stats()
            .iter()
            .map(|kv| (*kv.key(), kv.value().0, kv.value().1))
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2));

        let mut out = String::from("==== hga phase profile ====\n");
        for (label, count, total_ns) in rows {
            let avg_ns = if count == 0 {
                0.0
            } else {
                total_ns as f64 / count as f64
            };
            out.push_str(&format!(
                "{:<32} calls={:<8} total={:>9.3} ms avg={:>12.1} ns\n",
                label,
                count,
                total_ns as f64 / 1_000_000.0,
                avg_ns
            ));
        }
        out
    }
}

#[cfg(not(feature = "profiling"))]
mod disabled {
    use std::time::Duration;

    /// No-op stand-in.
    #[derive(Clone, Copy)]
    pub struct Timer;

    impl Timer {
        /// Does nothing.
        #[inline]
        #[must_use]
        pub const fn new(_: &'static str) -> Self {
            Self
        }
    }

    /// Does nothing.
    pub const fn record(_: &'static str, _: Duration) {}

    /// Always empty.
    #[must_use]
    pub const fn report() -> String {
        String::new()
    }
}

#[cfg(feature = "profiling")]
pub use enabled::*;

#[cfg(not(feature = "profiling"))]
pub use disabled::*;
