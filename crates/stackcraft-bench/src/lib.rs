//! Benchmark suite for build-plan resolution.
//!
//! This crate provides benchmarking utilities and fixtures for measuring
//! the materializer, target resolver, and flag selector's performance.
//!
//! # Benchmark Categories
//!
//! - **Version/range parsing**: dotted versions and the Cabal-style
//!   range algebra
//! - **Materialization**: turning a raw snapshot into a `MiniPlan`
//! - **Target resolution**: transitive closure over a target set
//! - **Flag selection**: bounded per-package flag search
//! - **Snapshot picking**: classifying candidates against a bundle
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --package stackcraft-bench
//! cargo bench --package stackcraft-bench -- --save-baseline main
//! cargo bench --package stackcraft-bench -- --baseline main
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod fixtures;

use std::time::{Duration, Instant};

/// Benchmark result with timing and metadata.
#[derive(Debug, Clone)]
pub struct BenchResult {
    pub name: String,
    pub duration: Duration,
    pub iterations: u64,
    pub memory_bytes: Option<u64>,
}

impl BenchResult {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: Duration, iterations: u64) -> Self {
        Self { name: name.into(), duration, iterations, memory_bytes: None }
    }

    #[must_use]
    pub fn with_memory(mut self, bytes: u64) -> Self {
        self.memory_bytes = Some(bytes);
        self
    }

    #[must_use]
    pub fn ops_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() == 0.0 {
            return 0.0;
        }
        self.iterations as f64 / self.duration.as_secs_f64()
    }
}

/// Simple timer for manual benchmarking.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    #[must_use]
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[must_use]
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}

/// Peak memory usage on Linux via /proc/self/status.
#[cfg(target_os = "linux")]
pub fn peak_memory_bytes() -> Option<u64> {
    use std::fs;
    let status = fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if line.starts_with("VmPeak:") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() >= 2 {
                if let Ok(kb) = parts[1].parse::<u64>() {
                    return Some(kb * 1024);
                }
            }
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
pub fn peak_memory_bytes() -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_result() {
        let result = BenchResult::new("test", Duration::from_secs(1), 100);
        assert!((result.ops_per_second() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.stop();
        assert!(elapsed >= Duration::from_millis(10));
    }
}
