#![warn(rust_2018_idioms)]
#![allow(dead_code)]
#![warn(missing_docs)]

pub mod chain;
pub mod error;
pub mod runtime;
