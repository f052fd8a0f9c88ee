//! Typed, synchronous publish/subscribe.
//!
//! Handlers run in registration order on the emitting call stack and see
//! the payload by reference. The first failing handler stops delivery and
//! its error is returned to the emitter.
//!
//! A handler may emit on another channel. Emitting the channel that is
//! currently being dispatched is rejected with [`BusError::Reentrant`]
//! rather than recursing.

use crate::{BusError, HandlerError};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

pub trait BusEvent {
    type Channel: Copy + Eq + fmt::Debug;

    fn channel(&self) -> Self::Channel;
}

pub type Handler<E> = Rc<dyn Fn(&E) -> Result<(), HandlerError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription<E: BusEvent> {
    id: SubscriptionId,
    channel: E::Channel,
    handler: Handler<E>,
}

pub struct EventBus<E: BusEvent> {
    subscriptions: RefCell<Vec<Subscription<E>>>,
    next_id: Cell<u64>,
    dispatching: RefCell<Vec<E::Channel>>,
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            dispatching: RefCell::new(Vec::new()),
        }
    }

    pub fn on<F>(&self, channel: E::Channel, handler: F) -> SubscriptionId
    where
        F: Fn(&E) -> Result<(), HandlerError> + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscriptions.borrow_mut().push(Subscription {
            id,
            channel,
            handler: Rc::new(handler),
        });
        id
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }

    pub fn clear_all(&self) {
        self.subscriptions.borrow_mut().clear();
    }

    pub fn subscriber_count(&self, channel: E::Channel) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.channel == channel)
            .count()
    }

    pub fn emit(&self, event: &E) -> Result<usize, BusError> {
        let channel = event.channel();
        if self.dispatching.borrow().contains(&channel) {
            return Err(BusError::Reentrant {
                channel: format!("{:?}", channel),
            });
        }
        // Snapshot so handlers can subscribe or unsubscribe mid-dispatch.
        let handlers: Vec<Handler<E>> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.channel == channel)
            .map(|s| s.handler.clone())
            .collect();

        self.dispatching.borrow_mut().push(channel);
        let _guard = DispatchGuard { bus: self, channel };
        for handler in &handlers {
            if let Err(source) = handler(event) {
                tracing::warn!(?channel, error = %source, "bus handler failed");
                return Err(BusError::Handler {
                    channel: format!("{:?}", channel),
                    source,
                });
            }
        }
        tracing::trace!(?channel, delivered = handlers.len(), "bus emit");
        Ok(handlers.len())
    }
}

struct DispatchGuard<'a, E: BusEvent> {
    bus: &'a EventBus<E>,
    channel: E::Channel,
}

impl<E: BusEvent> Drop for DispatchGuard<'_, E> {
    fn drop(&mut self) {
        let mut stack = self.bus.dispatching.borrow_mut();
        if let Some(pos) = stack.iter().rposition(|c| *c == self.channel) {
            stack.remove(pos);
        }
    }
}
