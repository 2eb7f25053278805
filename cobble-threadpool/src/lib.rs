//!
//! A small thread pool built for dispatching per-connection work: a fixed set of worker threads
//! pulling boxed tasks off a shared FIFO queue, coordinated by a single mutex and condition
//! variable.

///
/// A fixed-size thread [`Pool`] implementation.
pub mod fixed_size;

///
/// A pool to which work may be submitted, typically for execution on another thread (though this
/// is not required).
pub trait Pool {
    ///
    /// Submits some work to the pool.
    ///
    /// It is unspecified whether this function will return before or after `func` has executed.
    /// Implementations may provide stronger guarantees.
    ///
    /// If `func` panics, the behavior is unspecified: the panic may propagate to the caller, it
    /// may be silently swallowed, logged by the pool implementation, or anything else (as long as
    /// it does not cause undefined behavior).
    ///
    /// It is unspecified what happens to the execution of `func` when [`self`] is dropped. It may
    /// continue until completion or panic.
    fn submit<F>(&self, func: F)
    where
        F: FnOnce() + Send + 'static;
}

pub use fixed_size::FixedSizePool;
