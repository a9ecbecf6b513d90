//! Simulation observer trait for progress reporting and data collection.

use swarm_behavior::Actuators;
use swarm_core::Tick;

use crate::Pose;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, broadcasts: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {broadcasts} broadcasts");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `broadcasts` is the number of broadcasts staged during the tick.
    fn on_tick_end(&mut self, _tick: Tick, _broadcasts: usize) {}

    /// Called at snapshot intervals (every `config.snapshot_interval_ticks`
    /// ticks).
    ///
    /// Provides read-only access to the full pose and actuator state so that
    /// output writers can record a snapshot without the sim needing to know
    /// about any specific output format.
    fn on_snapshot(&mut self, _tick: Tick, _poses: &[Pose], _actuators: &[Actuators]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
