use bt_core::{BusEvent, EventBus, HandlerError, SubscriptionId};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiListener {
    SettingsTogglerClick,
    PlusButtonClick,
}

#[derive(Debug, Default)]
pub struct ListenerSet {
    subscriptions: Vec<SubscriptionId>,
    ui: HashSet<UiListener>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, id: SubscriptionId) {
        self.subscriptions.push(id);
    }

    pub fn listen(&mut self, listener: UiListener) {
        self.ui.insert(listener);
    }

    pub fn is_listening(&self, listener: UiListener) -> bool {
        self.ui.contains(&listener)
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty() && self.ui.is_empty()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn clear_all<E: BusEvent>(&mut self, bus: &EventBus<E>) {
        for id in self.subscriptions.drain(..) {
            bus.off(id);
        }
        self.ui.clear();
    }
}

pub type SettingsObserver = Rc<dyn Fn(Uuid) -> Result<(), HandlerError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Host callbacks run after a settings panel is in place. Kept apart from
/// the bus so rebinding never reorders them ahead of the panel.
#[derive(Clone, Default)]
pub struct SettingsObservers {
    entries: Rc<RefCell<Vec<(ObserverId, SettingsObserver)>>>,
    next_id: Rc<Cell<u64>>,
}

impl SettingsObservers {
    pub fn add<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(Uuid) -> Result<(), HandlerError> + 'static,
    {
        let id = ObserverId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(observer)));
        id
    }

    pub fn remove(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify(&self, block: Uuid) -> Result<(), HandlerError> {
        let snapshot: Vec<SettingsObserver> = self.entries.borrow().iter().map(|(_, f)| f.clone()).collect();
        for observer in snapshot {
            observer(block)?;
        }
        Ok(())
    }
}
