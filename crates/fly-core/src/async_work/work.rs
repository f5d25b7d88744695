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

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies a work item submitted to a [`QueueThreadPool`](super::QueueThreadPool).
///
/// Used to retract work that is still waiting in the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkId(pub u64);

impl WorkId {
    pub(crate) fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        WorkId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A unit of work the pool can run.
///
/// The pool calls exactly one of [`execute_work`](Self::execute_work) or
/// [`abandon`](Self::abandon) on every item it accepts, and then hands the
/// box back through [`release`](Self::release). An item that is retracted
/// by its submitter gets none of these calls.
pub trait QueuedWork: Send {
    /// Runs the work. Called on a worker thread, at most once.
    fn execute_work(&mut self);

    /// Called instead of `execute_work` when the item is cancelled while
    /// still pending.
    fn abandon(&mut self);

    /// Gives the item back once the pool is done with it. Dropping is the
    /// default; items recycled by their owner can override this.
    fn release(self: Box<Self>) {}
}

/// Adapts a closure into a [`QueuedWork`].
///
/// Abandoning the work drops the closure without calling it.
pub struct FnWork<F>
where
    F: FnOnce() + Send,
{
    func: Option<F>,
}

impl<F> FnWork<F>
where
    F: FnOnce() + Send,
{
    /// Wraps `func`.
    pub fn new(func: F) -> Self {
        Self { func: Some(func) }
    }
}

impl<F> QueuedWork for FnWork<F>
where
    F: FnOnce() + Send,
{
    fn execute_work(&mut self) {
        if let Some(func) = self.func.take() {
            func();
        }
    }

    fn abandon(&mut self) {
        self.func = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn fn_work_runs_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let mut work = FnWork::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        work.execute_work();
        work.execute_work();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn abandoned_fn_work_never_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let mut work = FnWork::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        work.abandon();
        work.execute_work();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn work_ids_are_unique() {
        let a = WorkId::next();
        let b = WorkId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }
}
