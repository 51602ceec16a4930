//! Write a sequence as a push-style routine that calls
//! [`Yielder::yield_`], consume it as an ordinary pull iterator.
//!
//! The routine runs on a dedicated worker thread spawned afresh for every
//! generation cycle. Items travel through a bounded buffer, so the worker
//! runs at most the configured buffer capacity ahead of the consumer.
//!
//! ```
//! use thread_gen::{Generator, Yielder};
//!
//! let squares = Generator::with_capacity(
//!     |co: &Yielder<u64>| {
//!         for i in 1..=4 {
//!             co.yield_(i * i);
//!         }
//!     },
//!     2,
//! )?;
//! assert_eq!(squares.iter().collect::<Vec<_>>(), [1, 4, 9, 16]);
//! assert!(!squares.has_next()?);
//!
//! // a finished generator replays its routine after a reset
//! squares.reset()?;
//! assert_eq!(squares.take_n(2)?, [1, 4]);
//! # Ok::<(), thread_gen::GeneratorError>(())
//! ```

mod config;
mod error;
mod generator;
mod utils;

pub use config::{GeneratorConfig, DEFAULT_CAPACITY, DEFAULT_THREAD_NAME};
pub use error::{GeneratorError, Result};
pub use generator::{Generate, Generator, Iter, State, Yielder};
