mod buffer;
mod traits;
mod worker;

use std::{fmt, sync::Arc};

use log::{debug, trace};
use parking_lot::Mutex;
pub use traits::Generate;
pub use worker::Yielder;

use self::{buffer::Buffer, worker::Worker};
use crate::{
    config::GeneratorConfig,
    error::{GeneratorError, Result},
    utils::group_thousands,
};

/// Lifecycle of a generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No cycle in progress; the next demand starts one.
    Ready,
    /// A worker is alive and/or items of the current cycle are undelivered.
    Running,
    /// The end of the sequence has been observed. Stays here until reset.
    Finished,
}

/// Everything guarded by the per-instance lock.
struct Cycle<T> {
    state: State,
    /// An item taken from the buffer but not yet returned by `try_next`.
    lookahead: Option<T>,
    worker: Option<Worker>,
}

/// Runs a push-style [`Generate`] routine on its own thread and hands its
/// items to a pull-style consumer through a bounded buffer.
///
/// The producer blocks while the buffer is full and the consumer blocks
/// while it is empty, so memory use does not depend on the sequence length.
/// A new worker thread is spawned for every cycle. One consumer at a time.
pub struct Generator<T> {
    routine: Arc<dyn Generate<T>>,
    config: GeneratorConfig,
    buffer: Buffer<T>,
    cycle: Mutex<Cycle<T>>,
}

impl<T: Send + 'static> Generator<T> {
    /// Create a generator with the default buffer capacity.
    pub fn new(routine: impl Generate<T>) -> Self {
        Self::build(Arc::new(routine), GeneratorConfig::default())
    }

    /// Create a generator whose buffer holds at most `capacity` items.
    pub fn with_capacity(routine: impl Generate<T>, capacity: usize) -> Result<Self> {
        Self::with_config(routine, GeneratorConfig::default().capacity(capacity))
    }

    pub fn with_config(routine: impl Generate<T>, config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(Arc::new(routine), config))
    }

    fn build(routine: Arc<dyn Generate<T>>, config: GeneratorConfig) -> Self {
        Self {
            routine,
            buffer: Buffer::new(config.capacity),
            config,
            cycle: Mutex::new(Cycle {
                state: State::Ready,
                lookahead: None,
                worker: None,
            }),
        }
    }

    /// Whether another item is available, blocking until the worker produced
    /// one or finished. Starts a new cycle when called on a ready generator.
    ///
    /// Repeated calls without `try_next` in between do not consume anything.
    /// If the routine panicked, the panic message is returned once as
    /// [`GeneratorError::Panicked`] and the cycle is finished.
    pub fn has_next(&self) -> Result<bool> {
        let mut cycle = self.cycle.lock();
        self.advance(&mut cycle)
    }

    /// Returns the next item, or [`GeneratorError::NoSuchElement`] once the
    /// sequence is exhausted. Does not require a prior `has_next` call.
    pub fn try_next(&self) -> Result<T> {
        let mut cycle = self.cycle.lock();
        if !self.advance(&mut cycle)? {
            return Err(GeneratorError::NoSuchElement);
        }
        cycle.lookahead.take().ok_or(GeneratorError::NoSuchElement)
    }

    /// Makes a finished generator ready to replay its sequence from the
    /// start. Fails with [`GeneratorError::IllegalState`] while running.
    pub fn reset(&self) -> Result<()> {
        let mut cycle = self.cycle.lock();
        if cycle.state == State::Running {
            return Err(GeneratorError::IllegalState);
        }
        cycle.lookahead = None;
        cycle.state = State::Ready;
        debug!("{} reset", self);
        Ok(())
    }

    /// Takes up to `n` items; fewer if the sequence ends first.
    pub fn take_n(&self, n: usize) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(n.min(self.capacity()));
        let mut cycle = self.cycle.lock();
        while out.len() < n && self.advance(&mut cycle)? {
            out.extend(cycle.lookahead.take());
        }
        trace!("takes {} items out from {}", out.len(), self);
        Ok(out)
    }

    /// Iterate over this generator by reference. Every `iter()` of the same
    /// instance shares one cursor.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { gen: self }
    }

    fn advance(&self, cycle: &mut Cycle<T>) -> Result<bool> {
        if cycle.state == State::Ready {
            self.start(cycle)?;
        }
        if cycle.state == State::Finished {
            return Ok(false);
        }
        if cycle.lookahead.is_some() {
            return Ok(true);
        }
        match self.buffer.take()? {
            buffer::Slot::Item(item) => {
                cycle.lookahead = Some(item);
                Ok(true)
            }
            buffer::Slot::EndOfStream => {
                self.finish(cycle);
                Ok(false)
            }
            buffer::Slot::Panicked(message) => {
                self.finish(cycle);
                Err(GeneratorError::Panicked { message })
            }
        }
    }

    fn start(&self, cycle: &mut Cycle<T>) -> Result<()> {
        let stale = self.buffer.clear();
        if stale > 0 {
            debug!("discarded {} stale items from {}", stale, self);
        }
        let worker = Worker::spawn(
            Arc::clone(&self.routine),
            self.buffer.producer(),
            self.config.thread_name_or_default(),
        )?;
        trace!("{} started cycle on `{}`", self, worker.name());
        cycle.worker = Some(worker);
        cycle.state = State::Running;
        Ok(())
    }

    fn finish(&self, cycle: &mut Cycle<T>) {
        cycle.state = State::Finished;
        if let Some(worker) = cycle.worker.take() {
            worker.join();
        }
        trace!("{} finished", self);
    }
}

impl<T> Generator<T> {
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// The current lifecycle state. Blocks while another thread is waiting
    /// in `has_next`/`try_next` for the worker.
    pub fn state(&self) -> State {
        self.cycle.lock().state
    }
}

/// Pulls the next item for the [`Iterator`] views: exhaustion ends the
/// iteration, any other error panics at the call site.
fn next_or_panic<T: Send + 'static>(gen: &Generator<T>) -> Option<T> {
    match gen.try_next() {
        Ok(item) => Some(item),
        Err(GeneratorError::NoSuchElement) => None,
        Err(e) => panic!("{}", e),
    }
}

impl<T: Send + 'static> Iterator for Generator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        next_or_panic(self)
    }
}

/// Borrowing iterator over a [`Generator`], see [`Generator::iter`].
pub struct Iter<'a, T> {
    gen: &'a Generator<T>,
}

impl<T: Send + 'static> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        next_or_panic(self.gen)
    }
}

impl<'a, T: Send + 'static> IntoIterator for &'a Generator<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> fmt::Display for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generator(capacity={})", group_thousands(self.capacity()))
    }
}

impl<T> fmt::Debug for Generator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `None` while a consumer holds the lock waiting for the worker
        let state = self.cycle.try_lock().map(|cycle| cycle.state);
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("state", &state)
            .finish_non_exhaustive()
    }
}
