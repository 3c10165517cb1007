use std::collections::VecDeque;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

type Task = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct State {
    queue: VecDeque<Task>,
    queued: u64,
    completed: u64,
    pending_flushes: u32,
    shutdown: bool,
    panicked: bool,
}

struct Shared {
    state: Mutex<State>,
    cv: Condvar,
    worker_count: usize,
}

/// Fixed-size pool of worker threads fed by one FIFO queue.
///
/// `submit` applies backpressure: it blocks while the queue already holds
/// twice the worker count, or while a flush is in progress. `flush` blocks
/// until every submitted task has completed. Workers drain the queue on
/// shutdown before exiting.
pub struct WorkerPool {
    shared: Arc<Shared>,
    threads: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    #[must_use]
    pub fn new(thread_count: usize) -> Self {
        let worker_count = thread_count.max(1);
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            cv: Condvar::new(),
            worker_count,
        });

        let threads = (0..worker_count)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || worker_loop(&shared))
            })
            .collect();

        Self { shared, threads }
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.shared.worker_count
    }

    pub fn submit(&self, task: impl FnOnce() + Send + 'static) {
        let mut state = self.shared.state.lock().expect("pool mutex poisoned");
        let capacity = 2 * self.shared.worker_count;
        while state.pending_flushes > 0 || state.queue.len() >= capacity {
            state = self.shared.cv.wait(state).expect("pool mutex poisoned");
        }
        state.queue.push_back(Box::new(task));
        state.queued += 1;
        drop(state);
        self.shared.cv.notify_all();
    }

    /// Wait until every submitted task has completed. New submissions are
    /// held back while a flush is pending.
    ///
    /// # Panics
    ///
    /// Panics if any task executed since the previous flush panicked.
    pub fn flush(&self) {
        let mut state = self.shared.state.lock().expect("pool mutex poisoned");
        state.pending_flushes += 1;
        while state.completed != state.queued {
            state = self.shared.cv.wait(state).expect("pool mutex poisoned");
        }
        state.pending_flushes -= 1;
        let panicked = std::mem::take(&mut state.panicked);
        drop(state);
        self.shared.cv.notify_all();
        assert!(!panicked, "a worker task panicked");
    }

    /// Run `op` over every input on the pool, writing each result into the
    /// matching output slot, and flush. Output order matches input order.
    pub fn transform<T, R, F>(&self, inputs: Vec<T>, op: F) -> Vec<R>
    where
        T: Send + Sync + 'static,
        R: Send + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        let inputs = Arc::new(inputs);
        let slots: Arc<Vec<Mutex<Option<R>>>> =
            Arc::new((0..inputs.len()).map(|_| Mutex::new(None)).collect());
        let op = Arc::new(op);

        for index in 0..inputs.len() {
            let inputs = Arc::clone(&inputs);
            let slots = Arc::clone(&slots);
            let op = Arc::clone(&op);
            self.submit(move || {
                let result = op(&inputs[index]);
                *slots[index].lock().expect("slot mutex poisoned") = Some(result);
            });
        }
        self.flush();

        let slots = Arc::try_unwrap(slots).unwrap_or_else(|_| {
            unreachable!("all tasks completed at flush, no slot references remain")
        });
        slots
            .into_iter()
            .map(|slot| {
                slot.into_inner()
                    .expect("slot mutex poisoned")
                    .expect("flush guarantees every slot is written")
            })
            .collect()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().expect("pool mutex poisoned");
            state.shutdown = true;
        }
        self.shared.cv.notify_all();
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let task = {
            let mut state = shared.state.lock().expect("pool mutex poisoned");
            while !state.shutdown && state.queue.is_empty() {
                state = shared.cv.wait(state).expect("pool mutex poisoned");
            }
            if state.shutdown && state.queue.is_empty() {
                return;
            }
            state.queue.pop_front().expect("queue checked non-empty")
        };
        shared.cv.notify_all();

        let result = catch_unwind(AssertUnwindSafe(task));

        let mut state = shared.state.lock().expect("pool mutex poisoned");
        state.completed += 1;
        if result.is_err() {
            state.panicked = true;
        }
        drop(state);
        shared.cv.notify_all();
    }
}

#[cfg(test)]
#[path = "parallel_tests.rs"]
mod tests;
