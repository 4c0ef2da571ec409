use std::fmt::{Display, Formatter};

/// Errors that arise from composing or running a middleware chain
#[derive(Debug)]
pub enum Error {
    /// A stack handed to [compose_any](crate::chain::compose_any) that does not
    /// satisfy the composition contract. Carries the exact contract message.
    TypeMismatch(&'static str),
    /// A [Next](crate::chain::Next) handle that was invoked more than once
    /// within a single run.
    DoubleAdvance,
    /// A fault raised by a middleware itself, forwarded as is.
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TypeMismatch(message) => write!(f, "{}", message),
            Error::DoubleAdvance => write!(f, "next() should only be called once"),
            Error::Handler(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Handler(Box::new(e))
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Handler(message.into())
    }
}

impl From<&'static str> for Error {
    fn from(message: &'static str) -> Self {
        Error::Handler(message.into())
    }
}

impl Error {
    /// Creates a handler fault from any error value raised inside a middleware.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Handler(err.into())
    }
}
