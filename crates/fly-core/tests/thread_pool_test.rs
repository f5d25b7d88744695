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

use anyhow::Result;
use fly_core::async_work::{QueueThreadPool, QueuedWork, MAX_BATCH_DISPATCH};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

// --- Test Setup: work items that count every lifecycle call ---

#[derive(Default)]
struct Counters {
    executed: AtomicUsize,
    abandoned: AtomicUsize,
    released: AtomicUsize,
}

struct TrackedWork {
    counters: Arc<Counters>,
    per_item: Option<Arc<AtomicUsize>>,
    should_panic: bool,
}

impl TrackedWork {
    fn boxed(counters: &Arc<Counters>) -> Box<dyn QueuedWork> {
        Box::new(Self {
            counters: Arc::clone(counters),
            per_item: None,
            should_panic: false,
        })
    }
}

impl QueuedWork for TrackedWork {
    fn execute_work(&mut self) {
        self.counters.executed.fetch_add(1, Ordering::SeqCst);
        if let Some(item) = &self.per_item {
            item.fetch_add(1, Ordering::SeqCst);
        }
        if self.should_panic {
            panic!("tracked work asked to panic");
        }
    }

    fn abandon(&mut self) {
        self.counters.abandoned.fetch_add(1, Ordering::SeqCst);
    }

    fn release(self: Box<Self>) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Spins until `gate` opens, then counts itself as executed.
struct GatedWork {
    gate: Arc<AtomicBool>,
    counters: Arc<Counters>,
}

impl QueuedWork for GatedWork {
    fn execute_work(&mut self) {
        while !self.gate.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        self.counters.executed.fetch_add(1, Ordering::SeqCst);
    }

    fn abandon(&mut self) {
        self.counters.abandoned.fetch_add(1, Ordering::SeqCst);
    }
}

/// Occupies every worker until `gate` opens.
fn block_all_workers(pool: &QueueThreadPool, gate: &Arc<AtomicBool>) {
    let started = Arc::new(AtomicUsize::new(0));
    for _ in 0..pool.num_threads() {
        let gate = Arc::clone(gate);
        let started = Arc::clone(&started);
        pool.add_fn(move || {
            started.fetch_add(1, Ordering::SeqCst);
            while !gate.load(Ordering::SeqCst) {
                thread::yield_now();
            }
        });
    }
    while started.load(Ordering::SeqCst) < pool.num_threads() {
        thread::yield_now();
    }
}

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---

#[test]
fn thousand_increments_on_four_threads() -> Result<()> {
    init_logs();
    let pool = QueueThreadPool::init(4, 0)?;
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..1000 {
        let counter = Arc::clone(&counter);
        pool.add_fn(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
    }
    pool.wait_all_work_complete();

    assert_eq!(counter.load(Ordering::SeqCst), 1000);
    assert_eq!(pool.num_pending_works(), 0);
    assert_eq!(pool.num_idle_threads(), 4);
    Ok(())
}

#[test]
fn every_item_executes_exactly_once() -> Result<()> {
    let pool = QueueThreadPool::init(4, 0)?;
    let counters = Arc::new(Counters::default());
    let items: Vec<Arc<AtomicUsize>> = (0..500).map(|_| Arc::new(AtomicUsize::new(0))).collect();

    let works: Vec<Box<dyn QueuedWork>> = items
        .iter()
        .map(|item| {
            Box::new(TrackedWork {
                counters: Arc::clone(&counters),
                per_item: Some(Arc::clone(item)),
                should_panic: false,
            }) as Box<dyn QueuedWork>
        })
        .collect();
    let ids = pool.add_works(works);
    pool.wait_all_work_complete();

    assert_eq!(ids.len(), 500);
    assert!(items.iter().all(|item| item.load(Ordering::SeqCst) == 1));
    assert_eq!(counters.executed.load(Ordering::SeqCst), 500);
    assert_eq!(counters.released.load(Ordering::SeqCst), 500);
    assert_eq!(counters.abandoned.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn batch_larger_than_dispatch_limit_is_queued() -> Result<()> {
    let pool = QueueThreadPool::init(2, 0)?;
    let gate = Arc::new(AtomicBool::new(false));
    block_all_workers(&pool, &gate);

    let counters = Arc::new(Counters::default());
    let batch = MAX_BATCH_DISPATCH * 2;
    pool.add_works((0..batch).map(|_| TrackedWork::boxed(&counters)).collect());

    // No worker is idle, so the whole batch waits in the FIFO.
    assert_eq!(pool.num_pending_works(), batch);

    gate.store(true, Ordering::SeqCst);
    pool.wait_all_work_complete();
    assert_eq!(counters.executed.load(Ordering::SeqCst), batch);
    Ok(())
}

#[test]
fn batch_dispatch_is_capped_at_the_limit() -> Result<()> {
    // --- ARRANGE ---
    let overflow = 6;
    let num_threads = MAX_BATCH_DISPATCH + overflow;
    let pool = QueueThreadPool::init(num_threads, 0)?;
    let gate = Arc::new(AtomicBool::new(false));
    let counters = Arc::new(Counters::default());
    let works: Vec<Box<dyn QueuedWork>> = (0..num_threads)
        .map(|_| {
            Box::new(GatedWork {
                gate: Arc::clone(&gate),
                counters: Arc::clone(&counters),
            }) as Box<dyn QueuedWork>
        })
        .collect();

    // --- ACT ---
    pool.add_works(works);

    // --- ASSERT ---
    // Dispatched workers stay blocked on the gate, so the overflow remains
    // queued even though idle workers are left over.
    assert_eq!(pool.num_pending_works(), overflow);
    assert_eq!(pool.num_idle_threads(), overflow);

    gate.store(true, Ordering::SeqCst);
    pool.wait_all_work_complete();
    assert_eq!(counters.executed.load(Ordering::SeqCst), num_threads);
    assert_eq!(pool.num_pending_works(), 0);
    Ok(())
}

#[test]
fn cancel_abandons_only_pending_work() -> Result<()> {
    init_logs();
    let pool = QueueThreadPool::init(2, 0)?;
    let gate = Arc::new(AtomicBool::new(false));
    block_all_workers(&pool, &gate);

    let counters = Arc::new(Counters::default());
    for _ in 0..10 {
        pool.add_work(TrackedWork::boxed(&counters));
    }
    assert_eq!(pool.num_pending_works(), 10);

    // ACT
    let cancelled = pool.cancel_all_works();

    // ASSERT
    assert_eq!(cancelled, 10);
    assert_eq!(counters.abandoned.load(Ordering::SeqCst), 10);
    assert_eq!(counters.released.load(Ordering::SeqCst), 10);
    assert_eq!(counters.executed.load(Ordering::SeqCst), 0);

    // The blocked (claimed) work still finishes normally.
    gate.store(true, Ordering::SeqCst);
    pool.wait_all_work_complete();
    assert_eq!(pool.num_idle_threads(), 2);
    assert_eq!(counters.executed.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn retract_removes_unclaimed_work() -> Result<()> {
    let pool = QueueThreadPool::init(1, 0)?;
    let gate = Arc::new(AtomicBool::new(false));
    block_all_workers(&pool, &gate);

    let counters = Arc::new(Counters::default());
    let keep = pool.add_work(TrackedWork::boxed(&counters));
    let retract = pool.add_work(TrackedWork::boxed(&counters));

    let retracted = pool.retract_work(retract);
    assert!(retracted.is_some());
    assert!(pool.retract_work(retract).is_none());
    assert_eq!(pool.num_pending_works(), 1);

    gate.store(true, Ordering::SeqCst);
    pool.wait_all_work_complete();

    // Once executed, the kept item can no longer be retracted.
    assert!(pool.retract_work(keep).is_none());
    assert_eq!(counters.executed.load(Ordering::SeqCst), 1);
    // The pool never touched the retracted item.
    assert_eq!(counters.abandoned.load(Ordering::SeqCst), 0);
    assert_eq!(counters.released.load(Ordering::SeqCst), 1);

    drop(retracted);
    Ok(())
}

#[test]
fn panicking_work_does_not_kill_the_worker() -> Result<()> {
    init_logs();
    let pool = QueueThreadPool::init(1, 0)?;
    let counters = Arc::new(Counters::default());

    pool.add_work(Box::new(TrackedWork {
        counters: Arc::clone(&counters),
        per_item: None,
        should_panic: true,
    }));
    for _ in 0..5 {
        pool.add_work(TrackedWork::boxed(&counters));
    }
    pool.wait_all_work_complete();

    assert_eq!(counters.executed.load(Ordering::SeqCst), 6);
    assert_eq!(counters.released.load(Ordering::SeqCst), 6);
    assert_eq!(pool.num_idle_threads(), 1);
    Ok(())
}

#[test]
fn wait_in_worker_drains_nested_work() -> Result<()> {
    let pool = Arc::new(QueueThreadPool::init(2, 0)?);
    let counter = Arc::new(AtomicUsize::new(0));
    let observed = Arc::new(AtomicUsize::new(usize::MAX));

    {
        let pool_in_work = Arc::clone(&pool);
        let counter = Arc::clone(&counter);
        let observed = Arc::clone(&observed);
        pool.add_fn(move || {
            for _ in 0..20 {
                let counter = Arc::clone(&counter);
                pool_in_work.add_fn(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            // This thread is itself a worker; a plain wait would never see
            // every worker idle.
            pool_in_work.wait_all_work_complete_in_worker();
            observed.store(counter.load(Ordering::SeqCst), Ordering::SeqCst);
        });
    }
    pool.wait_all_work_complete();

    assert_eq!(observed.load(Ordering::SeqCst), 20);
    assert_eq!(counter.load(Ordering::SeqCst), 20);
    Ok(())
}

#[test]
fn drop_cancels_pending_work() -> Result<()> {
    let counters = Arc::new(Counters::default());
    let gate = Arc::new(AtomicBool::new(false));
    {
        let pool = QueueThreadPool::init(1, 512 * 1024)?;
        block_all_workers(&pool, &gate);
        for _ in 0..3 {
            pool.add_work(TrackedWork::boxed(&counters));
        }
        gate.store(true, Ordering::SeqCst);
    }
    // Whatever was not yet claimed at drop time was abandoned, never lost.
    let executed = counters.executed.load(Ordering::SeqCst);
    let abandoned = counters.abandoned.load(Ordering::SeqCst);
    assert_eq!(executed + abandoned, 3);
    assert_eq!(counters.released.load(Ordering::SeqCst), 3);
    Ok(())
}
