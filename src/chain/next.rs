use log::{trace, warn};
use std::cell::Cell;
use std::rc::Rc;

use crate::chain::middleware::{Middleware, MiddlewareFuture};
use crate::error::Error;

pub(crate) struct Invocation<C, T> {
    stack: Rc<[Rc<dyn Middleware<C, T>>]>,
    tail: Option<Rc<dyn Middleware<C, T>>>,
    context: Rc<C>,
}

impl<C, T> Invocation<C, T> {
    pub(crate) fn new(
        stack: Rc<[Rc<dyn Middleware<C, T>>]>,
        tail: Option<Rc<dyn Middleware<C, T>>>,
        context: Rc<C>,
    ) -> Self {
        Self {
            stack,
            tail,
            context,
        }
    }
}

pub(crate) fn advance<C: 'static, T: Default + 'static>(
    invocation: Rc<Invocation<C, T>>,
    position: usize,
) -> MiddlewareFuture<T> {
    let middleware = if position < invocation.stack.len() {
        Some(invocation.stack[position].clone())
    } else if position == invocation.stack.len() {
        invocation.tail.clone()
    } else {
        None
    };

    match middleware {
        Some(middleware) => {
            let context = invocation.context.clone();
            middleware.call(context, Next::new(invocation, position + 1))
        }
        None => {
            trace!("advance reached end of chain");
            Box::pin(async { Ok(T::default()) })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NextState {
    Pending,
    Invoked,
}

/// A single-use handle that advances one run of a chain to the positions
/// after the holder's.
pub struct Next<C, T> {
    invocation: Rc<Invocation<C, T>>,
    position: usize,
    state: Cell<NextState>,
}

impl<C: 'static, T: Default + 'static> Next<C, T> {
    pub(crate) fn new(invocation: Rc<Invocation<C, T>>, position: usize) -> Self {
        Self {
            invocation,
            position,
            state: Cell::new(NextState::Pending),
        }
    }

    /// Runs the rest of the chain.
    ///
    /// The handle is consumed the moment this method is called. A second call
    /// resolves with [Error::DoubleAdvance] and invokes nothing downstream,
    /// even if the resolution of the first call was dropped without being
    /// polled.
    pub fn run(&self) -> MiddlewareFuture<T> {
        match self.state.replace(NextState::Invoked) {
            NextState::Pending => advance(self.invocation.clone(), self.position),
            NextState::Invoked => {
                warn!("next() called more than once");
                Box::pin(async { Err(Error::DoubleAdvance) })
            }
        }
    }
}

impl<C: 'static, T: Default + 'static> Middleware<C, T> for Next<C, T> {
    fn call(&self, _context: Rc<C>, _next: Next<C, T>) -> MiddlewareFuture<T> {
        self.run()
    }
}
