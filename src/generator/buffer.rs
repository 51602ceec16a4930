//! The bounded hand-off channel between a worker and the consuming facade.

use crossbeam_channel::{Receiver, Sender};

use crate::error::{GeneratorError, Result};

/// One entry of the buffer. Every produced value travels as [`Slot::Item`],
/// so a `None` payload of a `Generator<Option<U>>` is never mistaken for the
/// end of the sequence.
pub(crate) enum Slot<T> {
    Item(T),
    /// Posted exactly once after the routine returns.
    EndOfStream,
    /// Posted instead of [`Slot::EndOfStream`] when the routine panics.
    Panicked(String),
}

/// Fixed-capacity FIFO owned by a single generator for its whole lifetime.
pub(crate) struct Buffer<T> {
    tx: Sender<Slot<T>>,
    rx: Receiver<Slot<T>>,
    capacity: usize,
}

impl<T> Buffer<T> {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// A producing end for one worker cycle.
    pub fn producer(&self) -> Producer<T> {
        Producer {
            tx: self.tx.clone(),
        }
    }

    /// Blocks until a slot is available and returns the oldest one.
    ///
    /// `self.tx` keeps the channel connected for as long as the buffer
    /// exists, so the error arm is unreachable in practice.
    pub fn take(&self) -> Result<Slot<T>> {
        self.rx.recv().map_err(|_| GeneratorError::Interrupted)
    }

    /// Drops everything left over from a previous cycle, returns how many
    /// slots were discarded.
    pub fn clear(&self) -> usize {
        self.rx.try_iter().count()
    }
}

pub(crate) struct Producer<T> {
    tx: Sender<Slot<T>>,
}

impl<T> Producer<T> {
    /// Blocks while the buffer is full. Fails once the owning generator has
    /// been dropped.
    pub fn put(&self, slot: Slot<T>) -> Result<()> {
        self.tx.send(slot).map_err(|_| GeneratorError::Interrupted)
    }
}
