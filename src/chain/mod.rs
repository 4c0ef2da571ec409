//! The middleware and chain APIs which compose an ordered middleware stack into a single runnable unit


pub(crate) mod compose;
pub(crate) mod middleware;
pub(crate) mod next;

pub use self::{
    compose::{compose, compose_any, Chain},
    middleware::{middleware_fn, Middleware, MiddlewareFn, MiddlewareFuture},
    next::Next,
};
