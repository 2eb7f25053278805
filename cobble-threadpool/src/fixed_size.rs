use crate::Pool;
use cobble_std::RingBuffer;
use std::num::NonZeroUsize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;

type Thunk = Box<dyn FnOnce() + Send>;

///
/// A fixed-size thread pool.
///
/// Workers block on a condition variable and pull tasks off a shared FIFO queue, so tasks begin
/// in submission order (completion order across workers is unspecified). [`FixedSizePool::new`]
/// creates an instance; [`FixedSizePool::shutdown`] (or dropping the pool) stops and joins every
/// worker. Workers keep popping until the queue is empty before they notice the stop flag, so
/// every task submitted before shutdown gets executed.
///
/// A panicking task terminates only itself: the worker catches the unwind and moves on to the
/// next task.
pub struct FixedSizePool {
    data: Arc<SharedData>,
    workers: Vec<JoinHandle<()>>,
    size: usize,
}

struct SharedData {
    state: Mutex<PoolState>,
    has_work: Condvar,
    thread_ids: AtomicUsize,
}

struct PoolState {
    queue: RingBuffer<Thunk>,
    running: bool,
}

impl FixedSizePool {
    ///
    /// Creates a new pool that will always maintain exactly `size` running threads available for
    /// executing tasks.
    ///
    /// # Panics
    /// This function panics if `size` is `0`, or if a worker thread cannot be spawned.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert_ne!(size, 0, "expected `size` to be non-zero");

        let data = Arc::new(SharedData {
            state: Mutex::new(PoolState {
                queue: RingBuffer::new(),
                running: true,
            }),
            has_work: Condvar::new(),
            thread_ids: AtomicUsize::new(0),
        });

        let workers = (0..size)
            .map(|_| spawn_thread(Arc::clone(&data)))
            .collect();

        Self {
            data,
            workers,
            size,
        }
    }

    ///
    /// The number of worker threads.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    ///
    /// Stops and joins every worker thread. Blocks until the queue has drained and every task
    /// submitted before this call has completed.
    ///
    /// Dropping the pool has the same effect.
    pub fn shutdown(self) {
        // Drop does the actual work; taking `self` by value just makes the blocking explicit
        drop(self);
    }

    fn shutdown_internal(&mut self) {
        {
            let mut state = self
                .data
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            state.running = false;
        }

        self.data.has_work.notify_all();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Pool for FixedSizePool {
    ///
    /// Enqueues some work. The task is boxed, pushed onto the FIFO queue under the pool mutex,
    /// and exactly one waiting worker is signalled. Never blocks waiting for a free thread: the
    /// queue grows as needed.
    fn submit<F>(&self, func: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self
                .data
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            state.queue.push_back(Box::new(func));
        }

        self.data.has_work.notify_one();
    }
}

impl Default for FixedSizePool {
    ///
    /// Creates a pool with one worker per available CPU.
    fn default() -> Self {
        Self::new(std::thread::available_parallelism().map_or(1, NonZeroUsize::get))
    }
}

impl Drop for FixedSizePool {
    fn drop(&mut self) {
        self.shutdown_internal();
    }
}

fn spawn_thread(data: Arc<SharedData>) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name(format!(
            "cobble-worker-{}",
            data.thread_ids.fetch_add(1, Ordering::Relaxed)
        ))
        .spawn(move || data.do_work())
        .expect("should have been able to spawn worker thread")
}

impl SharedData {
    fn do_work(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            if let Some(job) = state.queue.pop_front() {
                // don't hold the lock while we're performing the work
                drop(state);

                // a failing task is its own problem; the pool and its worker carry on
                let _ = catch_unwind(AssertUnwindSafe(job));

                state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                continue;
            }

            if !state.running {
                return;
            }

            // releases and re-acquires the mutex atomically; spurious wakeups are fine
            // because the loop re-tests the queue
            state = self
                .has_work
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}
