use derive_more::{Display, Error, From};

/// Errors raised by a [`Generator`](crate::Generator) at the call site.
#[derive(Debug, Display, Error, From)]
#[non_exhaustive]
pub enum GeneratorError {
    /// `reset()` was called while a generation cycle is still running.
    #[display("cannot reset while a generation cycle is in progress")]
    IllegalState,
    /// The sequence is exhausted; a checked `has_next()` would return false.
    #[display("no more items in the generated sequence")]
    NoSuchElement,
    /// A blocking `put` could not complete because the generator owning the
    /// buffer is gone. Only a worker can observe this; the consuming side
    /// holds a sender of its own, so its `take` never disconnects.
    #[display("blocking wait on the generator buffer was interrupted")]
    Interrupted,
    /// The generation routine panicked before finishing its cycle.
    #[display("generation routine panicked: {message}")]
    Panicked { message: String },
    #[display("buffer capacity must be positive, got {capacity}")]
    InvalidCapacity { capacity: usize },
    #[display("failed to spawn generator worker: {source}")]
    #[from]
    Spawn { source: std::io::Error },
}

pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;
