//! # Task Management System
//!
//! A small worker pool for running generation and meshing off the driving
//! thread.
//!
//! ## Architecture
//!
//! * [`TaskManager`] - distributes tasks across workers and drains results
//! * [`Task`] / [`TaskResult`] - the unit of work and its completion
//! * [`TaskChannel`] - one worker thread plus its two mpsc channels
//!
//! Each worker owns a dedicated task channel; distribution is round-robin
//! over workers with capacity, and tasks beyond capacity wait in a FIFO
//! queue. Results are drained on the driving thread, where they mutate the
//! world and may spawn follow-up tasks.
//!
//! ## Lifecycle
//!
//! 1. Tasks are published via [`TaskManager::publish_task`]
//! 2. Workers call `Task::process` and send back a `TaskResult`
//! 3. [`TaskManager::process_completed_tasks`] applies results in arrival
//!    order and schedules any tasks they spawn
//! 4. [`TaskManager::process_queued_tasks`] tops workers back up

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::warn;

use crate::core::MtResource;
use crate::voxels::world::World;

pub use task::{Task, TaskResult};

/// Maximum tasks in flight per worker channel.
///
/// One per worker keeps completion order predictable within a channel and
/// lets the queue rebalance onto whichever worker frees up first.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// One worker thread and its communication channels.
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Coordinates a pool of worker threads.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
    world: MtResource<World>,
}

impl TaskManager {
    /// Spawns `num_workers` worker threads over the given world.
    pub fn new(num_workers: usize, world: MtResource<World>) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
            world,
        }
    }

    /// Total work not yet applied: queued plus in flight.
    pub fn pending_tasks(&self) -> usize {
        self.queued_tasks.len()
            + self
                .channels
                .iter()
                .map(|channel| channel.num_tasks_in_flight)
                .sum::<usize>()
    }

    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(send_error) => Err(send_error.0),
        }
    }

    /// Next worker with spare capacity, round-robin from the last used.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        let start = self.current_channel % self.channels.len();
        (0..self.channels.len())
            .map(|offset| (start + offset) % self.channels.len())
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a task, dispatching immediately when a worker is free and
    /// queueing otherwise. Returns whether it was dispatched.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(()) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    warn!("worker channel disconnected, queueing task");
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Dispatches queued tasks, oldest first, while workers have capacity.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                return;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                return;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(()) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                }
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    return;
                }
            }
        }
    }

    /// Drains completed results, applies them to the world and schedules
    /// any follow-up tasks they spawn. Call from the driving thread.
    pub fn process_completed_tasks(&mut self) {
        let mut spawned = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                spawned.extend(result.handle_result(&self.world));
            }
        }
        for task in spawned {
            self.publish_task(task);
        }
    }

    /// Runs one scheduling beat: drain completions, then top workers up
    /// from the queue.
    pub fn tick(&mut self) {
        self.process_completed_tasks();
        self.process_queued_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingTask {
        counter: Arc<AtomicUsize>,
        follow_ups: usize,
    }

    struct CountingResult {
        counter: Arc<AtomicUsize>,
        follow_ups: usize,
    }

    impl Task for CountingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            Box::new(CountingResult {
                counter: self.counter.clone(),
                follow_ups: self.follow_ups,
            })
        }
    }

    impl TaskResult for CountingResult {
        fn handle_result(self: Box<Self>, _world: &MtResource<World>) -> Vec<Box<dyn Task + Send>> {
            self.counter.fetch_add(1, Ordering::SeqCst);
            (0..self.follow_ups)
                .map(|_| {
                    Box::new(CountingTask {
                        counter: self.counter.clone(),
                        follow_ups: 0,
                    }) as Box<dyn Task + Send>
                })
                .collect()
        }
    }

    fn drain(manager: &mut TaskManager) {
        for _ in 0..200 {
            manager.tick();
            if manager.pending_tasks() == 0 {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("tasks did not drain");
    }

    #[test]
    fn overflow_tasks_queue_and_eventually_run() {
        let world = MtResource::new(World::new(&WorldConfig::default()));
        let mut manager = TaskManager::new(2, world);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            manager.publish_task(Box::new(CountingTask {
                counter: counter.clone(),
                follow_ups: 0,
            }));
        }
        assert!(manager.pending_tasks() >= 8, "two workers, one in flight each");

        drain(&mut manager);
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn results_can_spawn_follow_up_tasks() {
        let world = MtResource::new(World::new(&WorldConfig::default()));
        let mut manager = TaskManager::new(1, world);
        let counter = Arc::new(AtomicUsize::new(0));

        manager.publish_task(Box::new(CountingTask {
            counter: counter.clone(),
            follow_ups: 3,
        }));

        drain(&mut manager);
        assert_eq!(counter.load(Ordering::SeqCst), 4);
    }
}
