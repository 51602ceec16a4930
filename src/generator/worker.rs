//! The per-cycle producer thread.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use log::{debug, trace, warn};

use super::{
    buffer::{Producer, Slot},
    Generate,
};
use crate::{error::Result, utils::panic_message};

/// Process-wide number of workers ever spawned, used in thread names only.
static WORKER_COUNT: AtomicU64 = AtomicU64::new(0);

/// Unwind payload raised by [`Yielder::yield_`] when nobody will ever read
/// the buffer again.
struct Abandoned;

/// Handle through which a generation routine emits its items.
pub struct Yielder<T> {
    producer: Producer<T>,
}

impl<T> Yielder<T> {
    /// Emits one item, blocking while the buffer is full.
    ///
    /// If the generator has been dropped in the middle of the cycle, this
    /// unwinds out of the routine and the worker exits quietly.
    pub fn yield_(&self, item: T) {
        if self.producer.put(Slot::Item(item)).is_err() {
            panic::resume_unwind(Box::new(Abandoned));
        }
    }
}

/// A running generation cycle.
pub(crate) struct Worker {
    name: String,
    handle: JoinHandle<()>,
}

impl Worker {
    /// Spawns a fresh thread running `routine` once. The thread posts either
    /// [`Slot::EndOfStream`] or [`Slot::Panicked`] as its last slot.
    pub fn spawn<T: Send + 'static>(
        routine: Arc<dyn Generate<T>>,
        producer: Producer<T>,
        name_prefix: &str,
    ) -> Result<Self> {
        let id = WORKER_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
        let name = format!("{name_prefix} {id}");
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || run(&*routine, Yielder { producer }))?;
        debug!("spawned `{}`", name);
        Ok(Self { name, handle })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the thread to exit. Only called after its terminal slot has
    /// been taken, so this returns promptly.
    pub fn join(self) {
        match self.handle.join() {
            Ok(()) => trace!("`{}` joined", self.name),
            Err(_) => warn!("`{}` terminated abnormally", self.name),
        }
    }
}

fn run<T: 'static>(routine: &dyn Generate<T>, co: Yielder<T>) {
    let name = thread::current().name().unwrap_or_default().to_string();
    let terminal = match panic::catch_unwind(AssertUnwindSafe(|| routine.generate(&co))) {
        Ok(()) => Slot::EndOfStream,
        Err(payload) if payload.is::<Abandoned>() => {
            debug!("`{}` abandoned by its generator, exiting", name);
            return;
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            warn!("generation routine on `{}` panicked: {}", name, message);
            Slot::Panicked(message)
        }
    };
    if co.producer.put(terminal).is_err() {
        debug!("`{}` finished after its generator was dropped", name);
    } else {
        trace!("`{}` posted end of stream", name);
    }
}
