//! Tracker reset notification

use std::fmt;

/// Fire-and-forget, payload-less notification that the identity tracker was reset.
///
/// Listeners run synchronously inside `notify`; nothing is queued, so each
/// notification reaches every listener at most once. Pollers can compare
/// `generation()` instead of subscribing.
#[derive(Default)]
pub struct ResetSignal {
    listeners: Vec<Box<dyn FnMut()>>,
    generation: u64,
}

impl fmt::Debug for ResetSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetSignal")
            .field("listeners", &self.listeners.len())
            .field("generation", &self.generation)
            .finish()
    }
}

impl ResetSignal {
    /// Register a listener
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Notify every listener once
    pub fn notify(&mut self) {
        self.generation += 1;
        for listener in &mut self.listeners {
            listener();
        }
    }

    /// Number of notifications sent so far
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_notify_reaches_listeners_once() {
        let hits = Rc::new(Cell::new(0));
        let mut signal = ResetSignal::default();
        let counter = Rc::clone(&hits);
        signal.subscribe(move || counter.set(counter.get() + 1));

        signal.notify();
        assert_eq!(hits.get(), 1);
        assert_eq!(signal.generation(), 1);

        signal.notify();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_notify_without_listeners() {
        let mut signal = ResetSignal::default();
        signal.notify();
        assert_eq!(signal.generation(), 1);
    }
}
