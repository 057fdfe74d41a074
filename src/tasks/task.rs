//! Core traits of the background task system.
//!
//! A [`Task`] is a self-contained unit of work executed on a worker thread;
//! it returns a [`TaskResult`] that is applied on the thread driving the
//! world. Results may spawn follow-up tasks, which is how generation chains
//! into meshing without the workers ever holding the world lock across a
//! computation.

use crate::core::MtResource;
use crate::voxels::world::World;

/// A unit of work that runs on a worker thread.
///
/// Implementations own the data they need; any world access inside
/// `process` must take and release locks promptly so other tasks and the
/// driving thread are not starved.
pub trait Task: Send {
    /// Performs the work and returns the result to apply on the driving
    /// thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a completed [`Task`], applied on the driving thread.
pub trait TaskResult: Send {
    /// Applies the result to the world and returns any follow-up tasks to
    /// schedule.
    ///
    /// Runs on the thread that drains completions; keep it short.
    fn handle_result(self: Box<Self>, world: &MtResource<World>) -> Vec<Box<dyn Task + Send>>;
}
