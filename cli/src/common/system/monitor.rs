//! # Arcsum Resource Sampler (`common::system::monitor`)
//!
//! File: cli/src/common/system/monitor.rs
//!
//! ## Overview
//!
//! Samples this process's resident memory and CPU utilisation in a background
//! tokio task while an archive is being written. Sampling is diagnostic only:
//! if process information cannot be obtained the sampler logs it and returns
//! whatever it has (possibly nothing). It never produces an error.
//!
//! ## Architecture
//!
//! - `ResourceSampler::start` spawns the task and takes a baseline reading.
//! - Each iteration waits for either the stop signal or the sampling window.
//!   When the window elapses, the process is refreshed and CPU usage over that
//!   window plus current RSS are recorded.
//! - `ResourceSampler::stop` signals through a `watch` channel and awaits the
//!   task. The accumulated `ResourceUsage` is returned through the join handle,
//!   so the caller only ever reads it after the task has finished.
//!
use std::time::Duration;
use sysinfo::{Pid, ProcessRefreshKind, System};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Accumulated samples from one archiving run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceUsage {
    pub peak_memory_bytes: u64,
    pub cpu_samples: Vec<f32>,
}

impl ResourceUsage {
    fn record_memory(&mut self, bytes: u64) {
        self.peak_memory_bytes = self.peak_memory_bytes.max(bytes);
    }

    fn record(&mut self, memory_bytes: u64, cpu_percent: f32) {
        self.record_memory(memory_bytes);
        self.cpu_samples.push(cpu_percent);
    }

    pub fn peak_memory_mib(&self) -> f64 {
        self.peak_memory_bytes as f64 / BYTES_PER_MIB
    }

    /// Mean of the CPU samples, or `None` if none were taken.
    pub fn average_cpu(&self) -> Option<f64> {
        if self.cpu_samples.is_empty() {
            return None;
        }
        let total: f64 = self.cpu_samples.iter().map(|&s| f64::from(s)).sum();
        Some(total / self.cpu_samples.len() as f64)
    }
}

/// Handle to a running sampler task.
pub struct ResourceSampler {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<ResourceUsage>,
}

impl ResourceSampler {
    /// Spawns the sampling task. Must be called from within a tokio runtime.
    pub fn start(window: Duration) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(sample_loop(window, stop_rx));
        debug!("Resource sampler started (window {:?})", window);
        Self { stop_tx, handle }
    }

    /// Signals the task to stop, waits for it, and returns the final usage.
    pub async fn stop(self) -> ResourceUsage {
        // The receiver may already be gone if the task ended early; nothing to do then.
        let _ = self.stop_tx.send(true);
        match self.handle.await {
            Ok(usage) => {
                debug!(
                    "Resource sampler stopped after {} samples",
                    usage.cpu_samples.len()
                );
                usage
            }
            Err(e) => {
                warn!("Resource sampler task failed: {}", e);
                ResourceUsage::default()
            }
        }
    }
}

fn refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::new().with_cpu().with_memory()
}

async fn sample_loop(window: Duration, mut stop_rx: watch::Receiver<bool>) -> ResourceUsage {
    let mut usage = ResourceUsage::default();

    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            warn!("Resource sampling unavailable: {}", e);
            let _ = stop_rx.changed().await;
            return usage;
        }
    };

    let mut system = System::new();
    // Baseline refresh; CPU usage is measured relative to it.
    if let Some(memory) = refresh_memory(&mut system, pid) {
        usage.record_memory(memory);
    }

    loop {
        tokio::select! {
            // Stop requested, or the handle was dropped.
            _ = stop_rx.changed() => break,
            _ = tokio::time::sleep(window) => {}
        }
        match refresh_memory(&mut system, pid) {
            Some(memory) => {
                let cpu = system.process(pid).map(|p| p.cpu_usage()).unwrap_or(0.0);
                usage.record(memory, cpu);
            }
            None => debug!("Process {} could not be refreshed; sample skipped", pid),
        }
    }
    usage
}

fn refresh_memory(system: &mut System, pid: Pid) -> Option<u64> {
    if !system.refresh_process_specifics(pid, refresh_kind()) {
        return None;
    }
    system.process(pid).map(|p| p.memory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_statistics() {
        let mut usage = ResourceUsage::default();
        assert_eq!(usage.average_cpu(), None);
        assert_eq!(usage.peak_memory_mib(), 0.0);

        usage.record(2 * 1024 * 1024, 10.0);
        usage.record(1024 * 1024, 30.0);
        usage.record_memory(512);

        assert_eq!(usage.peak_memory_bytes, 2 * 1024 * 1024);
        assert!((usage.peak_memory_mib() - 2.0).abs() < f64::EPSILON);
        assert_eq!(usage.average_cpu(), Some(20.0));
    }

    #[tokio::test]
    async fn test_sampler_collects_and_stops() {
        let sampler = ResourceSampler::start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(120)).await;
        let usage = sampler.stop().await;

        // Best effort: on platforms without process info both may be empty.
        if sysinfo::IS_SUPPORTED_SYSTEM {
            assert!(usage.peak_memory_bytes > 0);
            assert!(!usage.cpu_samples.is_empty());
        }
    }

    #[tokio::test]
    async fn test_sampler_stops_immediately() {
        let sampler = ResourceSampler::start(Duration::from_secs(60));
        // Stopping must not wait for the window to elapse.
        let usage = tokio::time::timeout(Duration::from_secs(5), sampler.stop())
            .await
            .expect("sampler did not stop promptly");
        assert!(usage.cpu_samples.is_empty());
    }
}
