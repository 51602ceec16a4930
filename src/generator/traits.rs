use super::worker::Yielder;

/// A generation routine: push-style producer logic that emits its sequence
/// by calling [`Yielder::yield_`] once per item, in delivery order.
///
/// It is invoked once per generation cycle, on a dedicated worker thread.
/// Since a reset generator replays the sequence from the start, a routine
/// should produce the same items every time it is run.
///
/// Closures taking `&Yielder<T>` implement this trait.
pub trait Generate<T>: Send + Sync + 'static {
    fn generate(&self, co: &Yielder<T>);
}

impl<T, F> Generate<T> for F
where
    F: Fn(&Yielder<T>) + Send + Sync + 'static,
{
    fn generate(&self, co: &Yielder<T>) {
        self(co)
    }
}
