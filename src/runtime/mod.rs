//! A single-threaded executor for driving chain runs and the tasks they spawn.

use scoped_tls::scoped_thread_local;
use smol::{LocalExecutor, Task};
use std::future::Future;

scoped_thread_local!(static EXECUTOR: LocalExecutor<'_>);

/// Creates a fresh single-threaded executor and blocks until the given future
/// completes on it.
///
/// A chain run borrows the task that polls it, so a bare [run_local] call is
/// enough to drive a whole chain end to end. [spawn_local] is only needed for
/// runs that should make progress side by side.
pub fn run_local<T>(future: impl Future<Output = T>) -> T {
    let executor = LocalExecutor::new();
    EXECUTOR.set(&executor, || {
        futures_lite::future::block_on(executor.run(future))
    })
}

/// Spawns a task onto the executor entered via [run_local].
///
/// If called outside of [run_local], this method panics.
pub fn spawn_local<T: 'static>(future: impl Future<Output = T> + 'static) -> Task<T> {
    if EXECUTOR.is_set() {
        EXECUTOR.with(|executor| executor.spawn(future))
    } else {
        panic!("`spawn_local()` must be called from within `run_local()`")
    }
}
