use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::chain::next::Next;
use crate::error::Error;

/// The resolution of a middleware invocation, pending until polled to completion.
///
/// Every operation of a chain speaks this one currency: the middleware trait
/// method, [Next::run] and the [Chain](crate::chain::Chain) entry points all
/// return it, so a resolution can be forwarded from any of them without being
/// forced to completion first.
pub type MiddlewareFuture<T> = Pin<Box<dyn Future<Output = Result<T, Error>>>>;

/// Handles one position of a chain and decides if and when the rest of the
/// chain runs.
///
/// A middleware receives the run's shared context and a single-use [Next]
/// handle. Awaiting [Next::run] runs everything after it and resumes here
/// once the downstream positions have resolved, which is what nests the
/// before and after logic of the positions like the layers of an onion.
pub trait Middleware<C, T> {
    /// Processes the context, advancing to the rest of the chain via `next`.
    fn call(&self, context: Rc<C>, next: Next<C, T>) -> MiddlewareFuture<T>;
}

/// A [Middleware] implemented by a plain async function or closure.
pub struct MiddlewareFn<F> {
    f: F,
}

impl<F> MiddlewareFn<F> {
    /// Creates a new MiddlewareFn
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<C, T, F, Fut> Middleware<C, T> for MiddlewareFn<F>
where
    F: Fn(Rc<C>, Next<C, T>) -> Fut,
    Fut: Future<Output = Result<T, Error>> + 'static,
{
    fn call(&self, context: Rc<C>, next: Next<C, T>) -> MiddlewareFuture<T> {
        Box::pin((self.f)(context, next))
    }
}

/// Wraps an async function or closure into a shared [Middleware] handle,
/// ready to be placed in a stack.
pub fn middleware_fn<C, T, F, Fut>(f: F) -> Rc<dyn Middleware<C, T>>
where
    C: 'static,
    T: 'static,
    F: Fn(Rc<C>, Next<C, T>) -> Fut + 'static,
    Fut: Future<Output = Result<T, Error>> + 'static,
{
    Rc::new(MiddlewareFn::new(f))
}

impl<C, T, M: Middleware<C, T> + ?Sized> Middleware<C, T> for Rc<M> {
    fn call(&self, context: Rc<C>, next: Next<C, T>) -> MiddlewareFuture<T> {
        (**self).call(context, next)
    }
}
