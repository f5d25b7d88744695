// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The [`QueueThreadPool`] implementation.
//!
//! Two tiers of locking are used and never nested the other way round:
//! the dispatch lock guards the pending FIFO and the idle list and is only
//! held for a few pointer moves, while the completion lock and its condition
//! variable carry the blocking waits. Each worker additionally owns a slot
//! lock that only the dispatcher and the worker itself touch.

use super::{AsyncError, FnWork, QueuedWork, ThreadPoolConfig, WorkId};
use crossbeam_utils::{Backoff, CachePadded};
use parking_lot::{Condvar, Mutex};
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Maximum number of idle workers a single [`QueueThreadPool::add_works`]
/// call hands work to directly. The rest of the batch is queued.
pub const MAX_BATCH_DISPATCH: usize = 64;

const IN_WORKER_POLL: Duration = Duration::from_millis(1);

type Job = (WorkId, Box<dyn QueuedWork>);

struct DispatchState {
    pending: VecDeque<Job>,
    idle: Vec<usize>,
}

struct WorkerSlot {
    job: Mutex<Option<Job>>,
    has_work: AtomicBool,
    wake: Condvar,
}

impl WorkerSlot {
    fn new() -> Self {
        Self {
            job: Mutex::new(None),
            has_work: AtomicBool::new(false),
            wake: Condvar::new(),
        }
    }
}

struct Shared {
    dispatch: Mutex<DispatchState>,
    completion: Mutex<()>,
    completion_cv: Condvar,
    slots: Vec<CachePadded<WorkerSlot>>,
    want_die: AtomicBool,
    spin_iterations: u32,
}

impl Shared {
    /// Gives `job` to the idle worker `index`. Must be called without the
    /// dispatch lock held.
    fn hand_to(&self, index: usize, job: Job) {
        let slot = &self.slots[index];
        let mut guard = slot.job.lock();
        debug_assert!(guard.is_none(), "idle worker {index} already holds work");
        *guard = Some(job);
        slot.has_work.store(true, Ordering::Release);
        drop(guard);
        slot.wake.notify_one();
    }

    fn pop_pending(&self) -> Option<Job> {
        self.dispatch.lock().pending.pop_front()
    }

    fn notify_completion(&self) {
        let _guard = self.completion.lock();
        self.completion_cv.notify_all();
    }

    /// `tolerate_caller` accepts one busy worker, for waits issued from a
    /// worker thread that counts itself as non-idle.
    fn is_all_complete(&self, tolerate_caller: bool) -> bool {
        let state = self.dispatch.lock();
        let total = self.slots.len();
        let idle = state.idle.len();
        state.pending.is_empty() && (idle == total || (tolerate_caller && idle + 1 == total))
    }
}

/// A fixed pool of worker threads consuming [`QueuedWork`] items.
///
/// Submission never blocks: work goes straight to an idle worker when one
/// exists and into a FIFO otherwise. Only work that sits in the FIFO keeps
/// its submission order; work handed directly to an idle worker may start
/// before older queued items.
///
/// Dropping the pool cancels pending work, waits for running work to finish
/// and joins every worker.
pub struct QueueThreadPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl QueueThreadPool {
    /// Spawns `num_threads` workers with the given stack size (`0` for the
    /// platform default). Every worker starts idle.
    ///
    /// ## Errors
    /// * `AsyncError::InvalidThreadCount` - If `num_threads` is zero.
    /// * `AsyncError::SpawnFailed` - If a worker thread could not be spawned.
    pub fn init(num_threads: usize, stack_size: usize) -> Result<Self, AsyncError> {
        Self::with_config(ThreadPoolConfig {
            num_threads,
            stack_size,
            ..ThreadPoolConfig::default()
        })
    }

    /// Spawns a pool from a full [`ThreadPoolConfig`].
    pub fn with_config(config: ThreadPoolConfig) -> Result<Self, AsyncError> {
        let num_threads = config.num_threads;
        if num_threads == 0 {
            return Err(AsyncError::InvalidThreadCount);
        }

        let shared = Arc::new(Shared {
            dispatch: Mutex::new(DispatchState {
                pending: VecDeque::new(),
                idle: (0..num_threads).rev().collect(),
            }),
            completion: Mutex::new(()),
            completion_cv: Condvar::new(),
            slots: (0..num_threads)
                .map(|_| CachePadded::new(WorkerSlot::new()))
                .collect(),
            want_die: AtomicBool::new(false),
            spin_iterations: config.spin_iterations,
        });

        // On a spawn failure `pool` is dropped, which joins the workers
        // already started.
        let mut pool = Self {
            shared,
            threads: Vec::with_capacity(num_threads),
        };
        for index in 0..num_threads {
            let mut builder = thread::Builder::new().name(format!("fly-worker-{index}"));
            if config.stack_size > 0 {
                builder = builder.stack_size(config.stack_size);
            }
            let shared = Arc::clone(&pool.shared);
            let handle = builder
                .spawn(move || worker_main(shared, index))
                .map_err(|e| AsyncError::SpawnFailed(e.to_string()))?;
            pool.threads.push(handle);
        }

        log::info!("QueueThreadPool started with {num_threads} worker threads.");
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.shared.slots.len()
    }

    /// Number of workers currently parked in the idle list.
    pub fn num_idle_threads(&self) -> usize {
        self.shared.dispatch.lock().idle.len()
    }

    /// Number of work items waiting in the FIFO.
    pub fn num_pending_works(&self) -> usize {
        self.shared.dispatch.lock().pending.len()
    }

    /// Submits one work item.
    pub fn add_work(&self, work: Box<dyn QueuedWork>) -> WorkId {
        let id = WorkId::next();
        let mut state = self.shared.dispatch.lock();
        if let Some(index) = state.idle.pop() {
            drop(state);
            self.shared.hand_to(index, (id, work));
        } else {
            state.pending.push_back((id, work));
        }
        id
    }

    /// Submits a closure as a work item.
    pub fn add_fn<F>(&self, func: F) -> WorkId
    where
        F: FnOnce() + Send + 'static,
    {
        self.add_work(Box::new(FnWork::new(func)))
    }

    /// Submits a batch of work items.
    ///
    /// Up to [`MAX_BATCH_DISPATCH`] items go directly to idle workers; the
    /// rest are queued in order. Workers are woken only after the dispatch
    /// lock has been released.
    pub fn add_works(&self, works: Vec<Box<dyn QueuedWork>>) -> Vec<WorkId> {
        let mut ids = Vec::with_capacity(works.len());
        let mut dispatched: Vec<(usize, Job)> = Vec::new();
        {
            let mut state = self.shared.dispatch.lock();
            for work in works {
                let id = WorkId::next();
                ids.push(id);
                if dispatched.len() < MAX_BATCH_DISPATCH {
                    if let Some(index) = state.idle.pop() {
                        dispatched.push((index, (id, work)));
                        continue;
                    }
                }
                state.pending.push_back((id, work));
            }
        }
        for (index, job) in dispatched {
            self.shared.hand_to(index, job);
        }
        ids
    }

    /// Removes a work item from the pending FIFO before any worker claims it.
    ///
    /// Returns the item to the caller, who now owns it; the pool will neither
    /// execute nor abandon it. Returns `None` once a worker has claimed the
    /// item, or if the id is unknown.
    pub fn retract_work(&self, id: WorkId) -> Option<Box<dyn QueuedWork>> {
        let mut state = self.shared.dispatch.lock();
        let position = state
            .pending
            .iter()
            .position(|(pending_id, _)| *pending_id == id)?;
        state.pending.remove(position).map(|(_, work)| work)
    }

    /// Busy-waits until every worker is in the idle list.
    pub fn wait_all_thread_idle(&self) {
        while self.num_idle_threads() < self.num_threads() {
            thread::yield_now();
        }
    }

    /// Blocks until the FIFO is empty and every worker is idle.
    ///
    /// Must not be called from a worker thread; use
    /// [`wait_all_work_complete_in_worker`](Self::wait_all_work_complete_in_worker) there.
    pub fn wait_all_work_complete(&self) {
        let mut guard = self.shared.completion.lock();
        while !self.shared.is_all_complete(false) {
            self.shared.completion_cv.wait(&mut guard);
        }
    }

    /// Like [`wait_all_work_complete`](Self::wait_all_work_complete), but the
    /// calling thread executes pending work itself while it waits.
    ///
    /// The wait also ends when all workers but one are idle, so a worker that
    /// calls this from inside its own work item does not wait on itself.
    pub fn wait_all_work_complete_in_worker(&self) {
        loop {
            while let Some((id, work)) = self.shared.pop_pending() {
                run_job(id, work);
            }
            let mut guard = self.shared.completion.lock();
            if self.shared.is_all_complete(true) {
                break;
            }
            self.shared
                .completion_cv
                .wait_for(&mut guard, IN_WORKER_POLL);
        }
    }

    /// Abandons and releases every work item still in the FIFO.
    ///
    /// Work already claimed by a worker is unaffected. Returns the number of
    /// cancelled items.
    pub fn cancel_all_works(&self) -> usize {
        let cancelled: Vec<Job> = self.shared.dispatch.lock().pending.drain(..).collect();
        let count = cancelled.len();
        for (_, mut work) in cancelled {
            work.abandon();
            work.release();
        }
        if count > 0 {
            log::debug!("Cancelled {count} pending work items.");
        }
        count
    }
}

impl fmt::Debug for QueueThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueThreadPool")
            .field("num_threads", &self.num_threads())
            .field("num_idle_threads", &self.num_idle_threads())
            .field("num_pending_works", &self.num_pending_works())
            .finish()
    }
}

impl Drop for QueueThreadPool {
    fn drop(&mut self) {
        self.cancel_all_works();
        self.wait_all_thread_idle();

        self.shared.want_die.store(true, Ordering::Release);
        for slot in &self.shared.slots {
            let _guard = slot.job.lock();
            slot.wake.notify_one();
        }
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                log::error!("A worker thread terminated abnormally.");
            }
        }
        log::info!("QueueThreadPool shut down.");
    }
}

fn worker_main(shared: Arc<Shared>, index: usize) {
    log::trace!("fly-worker-{index} started.");
    while let Some(job) = wait_for_work(&shared, index) {
        let mut next = Some(job);
        while let Some((id, work)) = next.take() {
            run_job(id, work);

            let mut state = shared.dispatch.lock();
            match state.pending.pop_front() {
                Some(job) => next = Some(job),
                None => state.idle.push(index),
            }
        }
        shared.notify_completion();
    }
    log::trace!("fly-worker-{index} exiting.");
}

/// Spins briefly on the slot flag, then parks until work arrives.
/// Returns `None` once the pool is shutting down.
fn wait_for_work(shared: &Shared, index: usize) -> Option<Job> {
    let slot = &shared.slots[index];

    let backoff = Backoff::new();
    for _ in 0..shared.spin_iterations {
        if slot.has_work.load(Ordering::Acquire) || shared.want_die.load(Ordering::Acquire) {
            break;
        }
        backoff.spin();
    }

    let mut guard = slot.job.lock();
    loop {
        if let Some(job) = guard.take() {
            slot.has_work.store(false, Ordering::Release);
            return Some(job);
        }
        if shared.want_die.load(Ordering::Acquire) {
            return None;
        }
        slot.wake.wait(&mut guard);
    }
}

fn run_job(id: WorkId, mut work: Box<dyn QueuedWork>) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| work.execute_work()));
    if let Err(payload) = result {
        log::error!(
            "Queued work {:?} panicked on thread '{}': {}",
            id,
            thread::current().name().unwrap_or("<unnamed>"),
            panic_payload_to_string(&*payload)
        );
    }
    if panic::catch_unwind(AssertUnwindSafe(move || work.release())).is_err() {
        log::error!("Releasing queued work {id:?} panicked.");
    }
}

fn panic_payload_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
