//! View-originated events.
//!
//! Views expose a [`Signal`] per event (a button press, a submitted form).
//! Presenters subscribe during initialization and keep the returned
//! [`Subscription`]; handing it back to [`Subscription::cancel`] removes the
//! handler regardless of the order in which other handlers are dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<T> = Box<dyn FnMut(&T)>;

struct Slots<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
    /// Handlers taken out by an in-flight `emit`.
    running: usize,
    emitting: usize,
    /// Ids cancelled while their handler was taken out.
    cancelled: Vec<u64>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
            running: 0,
            emitting: 0,
            cancelled: Vec::new(),
        }
    }
}

impl<T> Slots<T> {
    fn detach(&mut self, id: u64) {
        let before = self.handlers.len();
        self.handlers.retain(|(slot, _)| *slot != id);
        if self.handlers.len() == before && self.emitting > 0 && !self.cancelled.contains(&id) {
            self.cancelled.push(id);
        }
    }
}

pub struct Signal<T> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Rc::clone(&self.slots),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots::default())),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: FnMut(&T) + 'static,
    {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.handlers.push((id, Box::new(handler)));

        let weak: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Subscription {
            id,
            detach: Some(Box::new(move |id: u64| {
                if let Some(slots) = weak.upgrade() {
                    slots.borrow_mut().detach(id);
                }
            })),
        }
    }

    /// Invoke every handler in subscription order.
    ///
    /// Handlers may subscribe or cancel while running. A handler subscribed
    /// during an emit first runs on the next one; a nested emit skips the
    /// handlers the outer emit is still running.
    pub fn emit(&self, value: &T) {
        let mut running = {
            let mut slots = self.slots.borrow_mut();
            let taken = std::mem::take(&mut slots.handlers);
            slots.emitting += 1;
            slots.running += taken.len();
            taken
        };

        for (id, handler) in running.iter_mut() {
            if self.slots.borrow().cancelled.contains(id) {
                continue;
            }
            handler(value);
        }

        let mut slots = self.slots.borrow_mut();
        slots.emitting -= 1;
        slots.running -= running.len();
        running.retain(|(id, _)| !slots.cancelled.contains(id));
        let added = std::mem::replace(&mut slots.handlers, running);
        slots.handlers.extend(added);
        if slots.emitting == 0 {
            slots.cancelled.clear();
        }
    }
}

impl<T> Signal<T> {
    pub fn handler_count(&self) -> usize {
        let slots = self.slots.borrow();
        let live = slots.handlers.len() + slots.running;
        live.saturating_sub(slots.cancelled.len())
    }
}

/// Registration handle returned by [`Signal::subscribe`].
///
/// Dropping it without calling [`Subscription::cancel`] leaves the handler in
/// place.
#[must_use = "keep the subscription so it can be cancelled on dispose"]
pub struct Subscription {
    id: u64,
    detach: Option<Box<dyn FnOnce(u64)>>,
}

impl Subscription {
    pub fn cancel(mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_every_handler() {
        let signal = Signal::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = {
            let seen = Rc::clone(&seen);
            signal.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
        };
        let b = {
            let seen = Rc::clone(&seen);
            signal.subscribe(move |v| seen.borrow_mut().push(("b", *v)))
        };

        signal.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
        a.cancel();
        b.cancel();
    }

    #[test]
    fn cancel_removes_only_its_handler() {
        let signal = Signal::<()>::new();
        let first = signal.subscribe(|_| {});
        let second = signal.subscribe(|_| {});
        assert_eq!(signal.handler_count(), 2);

        second.cancel();
        assert_eq!(signal.handler_count(), 1);
        first.cancel();
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn handler_can_cancel_itself() {
        let signal = Signal::<()>::new();
        let calls = Rc::new(RefCell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let subscription = {
            let calls = Rc::clone(&calls);
            let slot = Rc::clone(&slot);
            signal.subscribe(move |_| {
                *calls.borrow_mut() += 1;
                if let Some(own) = slot.borrow_mut().take() {
                    own.cancel();
                }
            })
        };
        *slot.borrow_mut() = Some(subscription);
        let other = signal.subscribe(|_| {});

        signal.emit(&());
        assert_eq!(signal.handler_count(), 1);
        signal.emit(&());
        assert_eq!(*calls.borrow(), 1);
        other.cancel();
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn handler_cancels_a_later_handler() {
        let signal = Signal::<()>::new();
        let later_calls = Rc::new(RefCell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let first = {
            let slot = Rc::clone(&slot);
            signal.subscribe(move |_| {
                if let Some(later) = slot.borrow_mut().take() {
                    later.cancel();
                }
            })
        };
        let later = {
            let later_calls = Rc::clone(&later_calls);
            signal.subscribe(move |_| *later_calls.borrow_mut() += 1)
        };
        *slot.borrow_mut() = Some(later);

        signal.emit(&());
        assert_eq!(*later_calls.borrow(), 0);
        assert_eq!(signal.handler_count(), 1);
        first.cancel();
    }

    #[test]
    fn handler_subscribed_during_emit_runs_next_time() {
        let signal = Signal::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let added: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let outer = {
            let inner = signal.clone();
            let seen = Rc::clone(&seen);
            let added = Rc::clone(&added);
            signal.subscribe(move |_| {
                if added.borrow().is_empty() {
                    let seen = Rc::clone(&seen);
                    let sub = inner.subscribe(move |v| seen.borrow_mut().push(*v));
                    added.borrow_mut().push(sub);
                }
            })
        };

        signal.emit(&1);
        assert!(seen.borrow().is_empty());
        assert_eq!(signal.handler_count(), 2);
        signal.emit(&2);
        assert_eq!(*seen.borrow(), vec![2]);

        outer.cancel();
        for sub in added.borrow_mut().drain(..) {
            sub.cancel();
        }
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn cancel_after_signal_dropped_is_harmless() {
        let signal = Signal::<()>::new();
        let sub = signal.subscribe(|_| {});
        drop(signal);
        sub.cancel();
    }
}
