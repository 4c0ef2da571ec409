use std::any::Any;
use std::rc::Rc;

use crate::chain::middleware::{Middleware, MiddlewareFuture};
use crate::chain::next::{advance, Invocation, Next};
use crate::error::Error;

/// Chain runs an ordered middleware stack as a single unit, giving each
/// position full control over if and when the positions after it run.
///
/// A chain holds no per-run state. Every [run](Chain::run) threads the given
/// context through a fresh set of [Next](crate::chain::Next) handles, so one
/// chain may be run any number of times, sequentially or side by side.
pub struct Chain<C, T> {
    stack: Rc<[Rc<dyn Middleware<C, T>>]>,
}

impl<C, T> Clone for Chain<C, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<C, T> Chain<C, T> {
    #[allow(clippy::len_without_is_empty)]
    /// Returns the number of middlewares in this chain.
    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

impl<C: 'static, T: Default + 'static> Chain<C, T> {
    /// Runs the chain over the given context.
    ///
    /// Resolves with the first position's result. A run that advances past
    /// the last position resolves with `T::default()`, so an empty chain
    /// resolves with `T::default()` right away.
    pub fn run(&self, context: Rc<C>) -> MiddlewareFuture<T> {
        let invocation = Rc::new(Invocation::new(self.stack.clone(), None, context));
        advance(invocation, 0)
    }

    /// Runs the chain over the given context with `tail` appended after the
    /// last position.
    ///
    /// The tail is treated like every other position of the run: the advance
    /// that reaches it is single-use, it is invoked at most once, and its own
    /// [Next](crate::chain::Next) handle resolves with `T::default()`.
    pub fn run_with(
        &self,
        context: Rc<C>,
        tail: impl Middleware<C, T> + 'static,
    ) -> MiddlewareFuture<T> {
        let tail: Rc<dyn Middleware<C, T>> = Rc::new(tail);
        let invocation = Rc::new(Invocation::new(self.stack.clone(), Some(tail), context));
        advance(invocation, 0)
    }
}

impl<C: 'static, T: Default + 'static> Middleware<C, T> for Chain<C, T> {
    fn call(&self, context: Rc<C>, next: Next<C, T>) -> MiddlewareFuture<T> {
        self.run_with(context, next)
    }
}

/// Composes an ordered middleware stack into a [Chain].
///
/// The stack is copied, so changes to the caller's storage after composition
/// do not affect the chain. No middleware is invoked here.
pub fn compose<C: 'static, T: 'static>(stack: &[Rc<dyn Middleware<C, T>>]) -> Chain<C, T> {
    Chain {
        stack: stack.to_vec().into(),
    }
}

/// Composes a type-erased middleware stack into a [Chain].
///
/// This is the entry for callers that assemble stacks dynamically. The input
/// must downcast to `Vec<Box<dyn Any>>`, else the composition fails with
/// [Error::TypeMismatch] carrying `Middleware stack must be an array!`; each
/// element must downcast to `Rc<dyn Middleware<C, T>>`, else it fails with
/// `Middleware stack must be composed of functions!`. No middleware is
/// invoked here.
pub fn compose_any<C: 'static, T: 'static>(stack: Box<dyn Any>) -> Result<Chain<C, T>, Error> {
    let stack = match stack.downcast::<Vec<Box<dyn Any>>>() {
        Ok(stack) => *stack,
        Err(_) => {
            return Err(Error::TypeMismatch("Middleware stack must be an array!"));
        }
    };

    let mut middlewares: Vec<Rc<dyn Middleware<C, T>>> = Vec::with_capacity(stack.len());
    for entry in stack {
        match entry.downcast::<Rc<dyn Middleware<C, T>>>() {
            Ok(middleware) => middlewares.push(*middleware),
            Err(_) => {
                return Err(Error::TypeMismatch(
                    "Middleware stack must be composed of functions!",
                ));
            }
        }
    }

    Ok(Chain {
        stack: middlewares.into(),
    })
}
