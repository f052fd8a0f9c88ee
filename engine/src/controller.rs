use crate::{
    toolbar_offset, DeferredTask, EngineError, ListenerSet, MenuEntry, ObserverId, PluginRegistry, Press,
    SettingsObservers, SettingsPanel, SettingsView, ToolPlugin, Toolbar, ToolbarState, ToolbarView, ToolboxPanel,
    TuneActivation, TuneApi, UiListener, Viewport,
};
use bt_core::{
    Block, BlockRef, BlockSequence, Channel, EditorEvent, EventBus, HandlerError, SequenceCommand, SequenceError,
    ToolbarConfig,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
struct Shared {
    blocks: Rc<RefCell<dyn BlockSequence>>,
    toolbar: Rc<RefCell<Toolbar>>,
    registry: Rc<PluginRegistry>,
    viewport: Rc<RefCell<Viewport>>,
    messages: Rc<HashMap<String, String>>,
    observers: SettingsObservers,
    mobile_breakpoint: f32,
}

impl Shared {
    fn is_mobile(&self) -> bool {
        self.viewport.borrow().is_mobile(self.mobile_breakpoint)
    }

    fn on_block_hovered(&self, block: BlockRef) -> Result<(), HandlerError> {
        let mobile = self.is_mobile();
        let blocks = self.blocks.borrow();
        let mut toolbar = self.toolbar.borrow_mut();
        // A popover opened while the toolbar was closed must not pin it shut.
        if toolbar.popover().kind().is_some() && toolbar.state().opened() {
            return Ok(());
        }
        toolbar
            .move_and_open(blocks.block_by_id(block.id), &*blocks, mobile)
            .map(|_| ())
            .map_err(|err| HandlerError::new(err.to_string()))
    }

    fn open_settings(&self, block: Uuid) -> Result<bool, HandlerError> {
        if !self.toolbar.borrow().is_built() {
            return Ok(false);
        }
        let index = self.blocks.borrow().index_of(block);
        let Some(index) = index else {
            return Ok(false);
        };
        self.blocks
            .borrow_mut()
            .execute(SequenceCommand::SetCurrent(index))?;

        let api = TuneApi::new(self.blocks.clone(), self.viewport.clone(), self.messages.clone());
        let entries: Vec<MenuEntry> = self
            .registry
            .instantiate_tunes(&api)
            .iter()
            .map(|tune| tune.render())
            .collect();
        tracing::debug!(block = %block, entries = entries.len(), "block settings opened");
        self.toolbar
            .borrow_mut()
            .open_settings(SettingsPanel::new(block, entries, api));
        self.observers.notify(block)?;
        Ok(true)
    }
}

pub struct ToolbarEngine {
    bus: Rc<EventBus<EditorEvent>>,
    shared: Shared,
    listeners: ListenerSet,
    rebuild: DeferredTask,
    read_only: bool,
    config: ToolbarConfig,
}

impl ToolbarEngine {
    pub fn new(
        bus: Rc<EventBus<EditorEvent>>,
        blocks: Rc<RefCell<dyn BlockSequence>>,
        registry: PluginRegistry,
        config: ToolbarConfig,
        viewport: Viewport,
    ) -> Self {
        let shared = Shared {
            blocks,
            toolbar: Rc::new(RefCell::new(Toolbar::new())),
            registry: Rc::new(registry),
            viewport: Rc::new(RefCell::new(viewport)),
            messages: Rc::new(config.messages.clone()),
            observers: SettingsObservers::default(),
            mobile_breakpoint: config.mobile_breakpoint,
        };
        let mut engine = Self {
            bus,
            shared,
            listeners: ListenerSet::new(),
            rebuild: DeferredTask::new(),
            read_only: config.read_only,
            config,
        };
        engine.prepare();
        engine
    }

    pub fn with_defaults(blocks: Rc<RefCell<dyn BlockSequence>>, config: ToolbarConfig, viewport: Viewport) -> Self {
        Self::new(
            Rc::new(EventBus::new()),
            blocks,
            PluginRegistry::with_defaults(),
            config,
            viewport,
        )
    }

    fn prepare(&mut self) {
        self.shared.toolbar.borrow_mut().set_read_only(self.read_only);
        if self.read_only || self.config.hide_toolbar {
            return;
        }
        self.shared.toolbar.borrow_mut().build();
        self.bind();
    }

    fn bind(&mut self) {
        self.listeners.clear_all(&self.bus);
        self.listeners.listen(UiListener::SettingsTogglerClick);
        self.listeners.listen(UiListener::PlusButtonClick);

        if !self.shared.is_mobile() {
            let shared = self.shared.clone();
            let id = self
                .bus
                .on(Channel::BlockHovered, move |event| shared.on_block_hovered(event.block()));
            self.listeners.track(id);
        }

        let shared = self.shared.clone();
        let id = self.bus.on(Channel::SettingsRequested, move |event| {
            shared.open_settings(event.block().id).map(|_| ())
        });
        self.listeners.track(id);
        tracing::debug!(subscriptions = self.listeners.subscription_count(), "toolbar bindings enabled");
    }

    pub fn on_settings_opened<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(Uuid) -> Result<(), HandlerError> + 'static,
    {
        self.shared.observers.add(observer)
    }

    pub fn remove_settings_observer(&self, id: ObserverId) -> bool {
        self.shared.observers.remove(id)
    }

    pub fn bus(&self) -> &Rc<EventBus<EditorEvent>> {
        &self.bus
    }

    pub fn blocks(&self) -> &Rc<RefCell<dyn BlockSequence>> {
        &self.shared.blocks
    }

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    pub fn is_mobile(&self) -> bool {
        self.shared.is_mobile()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_bound(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn rebuild_pending(&self) -> bool {
        self.rebuild.is_pending()
    }

    pub fn state(&self) -> ToolbarState {
        self.shared.toolbar.borrow().state()
    }

    pub fn view(&self) -> ToolbarView {
        self.shared.toolbar.borrow().view()
    }

    pub fn hovered(&self) -> Option<Uuid> {
        self.shared.toolbar.borrow().hovered()
    }

    pub fn settings_view(&self) -> Option<SettingsView> {
        self.shared.toolbar.borrow().settings().map(SettingsPanel::view)
    }

    pub fn toolbox_tools(&self) -> Option<Vec<ToolPlugin>> {
        self.shared
            .toolbar
            .borrow()
            .toolbox()
            .map(|panel| panel.tools().to_vec())
    }

    pub fn viewport(&self) -> Viewport {
        *self.shared.viewport.borrow()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        let was_mobile = self.shared.is_mobile();
        *self.shared.viewport.borrow_mut() = viewport;
        let mobile = self.shared.is_mobile();
        if was_mobile != mobile && self.is_bound() {
            tracing::debug!(mobile, "form factor changed");
            self.bind();
        }
        let blocks = self.shared.blocks.borrow();
        self.shared.toolbar.borrow_mut().resync(&*blocks, mobile);
    }

    pub fn set_scroll(&mut self, scroll_y: f32) {
        self.shared.viewport.borrow_mut().scroll_y = scroll_y;
    }

    pub fn hover(&self, block: BlockRef) -> Result<usize, EngineError> {
        Ok(self.bus.emit(&EditorEvent::BlockHovered { block })?)
    }

    pub fn move_and_open(&self, block: Option<Uuid>) -> Result<bool, EngineError> {
        let mobile = self.shared.is_mobile();
        let blocks = self.shared.blocks.borrow();
        let block = block.and_then(|id| blocks.block_by_id(id));
        let opened = self
            .shared
            .toolbar
            .borrow_mut()
            .move_and_open(block, &*blocks, mobile)?;
        Ok(opened)
    }

    pub fn focus_block(&self, index: usize) -> Result<bool, EngineError> {
        let mobile = self.shared.is_mobile();
        let id = {
            let blocks = self.shared.blocks.borrow();
            let block = blocks.block(index).ok_or(SequenceError::IndexOutOfRange {
                index,
                len: blocks.len(),
            })?;
            toolbar_offset(&block.geometry, mobile)?;
            block.id
        };
        self.shared
            .blocks
            .borrow_mut()
            .execute(SequenceCommand::SetCurrent(index))?;
        self.move_and_open(Some(id))
    }

    pub fn open(&self, with_actions: bool) {
        self.shared.toolbar.borrow_mut().open(with_actions);
    }

    pub fn hide_block_actions(&self) {
        self.shared.toolbar.borrow_mut().hide_block_actions();
    }

    pub fn close(&self) {
        self.shared.toolbar.borrow_mut().close();
    }

    pub fn activate(&self, block: BlockRef) -> Result<usize, EngineError> {
        Ok(self.bus.emit(&EditorEvent::SettingsRequested { block })?)
    }

    pub fn click_settings_toggler(&self) -> Result<(), EngineError> {
        if !self.listeners.is_listening(UiListener::SettingsTogglerClick) {
            return Ok(());
        }
        let hovered = {
            let mut toolbar = self.shared.toolbar.borrow_mut();
            if toolbar.settings().is_some() {
                toolbar.close_popover();
                return Ok(());
            }
            toolbar.hovered()
        };
        let Some(id) = hovered else {
            return Ok(());
        };
        self.make_current(id)?;
        self.bus.emit(&EditorEvent::SettingsRequested {
            block: BlockRef { id },
        })?;
        Ok(())
    }

    pub fn click_plus_button(&self) -> Result<(), EngineError> {
        if !self.listeners.is_listening(UiListener::PlusButtonClick) {
            return Ok(());
        }
        let hovered = {
            let mut toolbar = self.shared.toolbar.borrow_mut();
            if toolbar.toolbox().is_some() {
                toolbar.close_popover();
                return Ok(());
            }
            toolbar.hovered()
        };
        let Some(id) = hovered else {
            return Ok(());
        };
        self.make_current(id)?;
        let tools: Vec<ToolPlugin> = self.shared.registry.tools().cloned().collect();
        self.shared
            .toolbar
            .borrow_mut()
            .open_toolbox(ToolboxPanel::new(tools));
        Ok(())
    }

    pub fn choose_tool(&self, tool: &str) -> Result<Option<Uuid>, EngineError> {
        let listed = self.shared.toolbar.borrow().toolbox().map(|panel| panel.contains(tool));
        match listed {
            None => return Ok(None),
            Some(false) => return Err(EngineError::UnknownTool(tool.to_string())),
            Some(true) => {}
        }
        let block = Block::new(tool);
        let id = block.id;
        {
            let mut blocks = self.shared.blocks.borrow_mut();
            let target = blocks
                .current_index()
                .and_then(|index| blocks.block(index).map(|b| (index, b.is_empty() && b.editable)));
            match target {
                Some((index, true)) => blocks.execute(SequenceCommand::Replace { index, block })?,
                Some((index, false)) => {
                    blocks.execute(SequenceCommand::Insert { index: index + 1, block })?;
                    blocks.execute(SequenceCommand::SetCurrent(index + 1))?;
                }
                None => {
                    let index = blocks.len();
                    blocks.execute(SequenceCommand::Insert { index, block })?;
                }
            }
        }
        self.shared.toolbar.borrow_mut().close_popover();
        self.move_and_open(Some(id))?;
        Ok(Some(id))
    }

    pub fn activate_tune(&self, name: &str) -> Result<TuneActivation, EngineError> {
        let (press, api) = {
            let mut toolbar = self.shared.toolbar.borrow_mut();
            let Some(panel) = toolbar.settings_mut() else {
                return Ok(TuneActivation::NotOpen);
            };
            (panel.press(name), panel.api().clone())
        };
        let callback = match press {
            Press::Unknown => return Ok(TuneActivation::Unknown),
            Press::Disabled => return Ok(TuneActivation::Disabled),
            Press::Armed => return Ok(TuneActivation::AwaitingConfirmation),
            Press::Run(callback) => callback,
        };
        let outcome = callback()?;
        tracing::debug!(tune = name, ?outcome, "tune activated");
        self.settle_after_tune(api.take_settings_request())?;
        Ok(TuneActivation::Completed(outcome))
    }

    fn settle_after_tune(&self, settings_request: Option<bool>) -> Result<(), EngineError> {
        let mobile = self.shared.is_mobile();
        {
            let blocks = self.shared.blocks.borrow();
            self.shared.toolbar.borrow_mut().resync(&*blocks, mobile);
        }
        match settings_request {
            Some(true) => {
                let current = self.shared.blocks.borrow().current_block().map(|b| b.id);
                if let Some(id) = current {
                    self.shared.open_settings(id)?;
                }
            }
            Some(false) => self.shared.toolbar.borrow_mut().close_popover(),
            None => {}
        }
        Ok(())
    }

    fn make_current(&self, id: Uuid) -> Result<(), EngineError> {
        let index = self
            .shared
            .blocks
            .borrow()
            .index_of(id)
            .ok_or(SequenceError::UnknownBlock(id))?;
        self.shared
            .blocks
            .borrow_mut()
            .execute(SequenceCommand::SetCurrent(index))?;
        Ok(())
    }

    pub fn set_read_only(&mut self, enabled: bool, now: Duration) {
        if enabled {
            self.read_only = true;
            if self.rebuild.cancel().is_some() {
                tracing::debug!("pending toolbar rebuild cancelled");
            }
            self.listeners.clear_all(&self.bus);
            let mut toolbar = self.shared.toolbar.borrow_mut();
            toolbar.destroy();
            toolbar.set_read_only(true);
            return;
        }

        let was_read_only = std::mem::replace(&mut self.read_only, false);
        self.shared.toolbar.borrow_mut().set_read_only(false);
        if self.config.hide_toolbar {
            return;
        }
        if !was_read_only && self.shared.toolbar.borrow().is_built() {
            return;
        }
        self.rebuild.schedule(now, self.config.rebuild_timeout());
    }

    pub fn on_idle(&mut self) -> bool {
        match self.rebuild.poll_idle() {
            Some(_) => self.run_rebuild(),
            None => false,
        }
    }

    pub fn tick(&mut self, now: Duration) -> bool {
        match self.rebuild.poll_deadline(now) {
            Some(_) => self.run_rebuild(),
            None => false,
        }
    }

    fn run_rebuild(&mut self) -> bool {
        if self.read_only || self.config.hide_toolbar {
            tracing::debug!("stale toolbar rebuild skipped");
            return false;
        }
        {
            let mut toolbar = self.shared.toolbar.borrow_mut();
            toolbar.destroy();
            toolbar.build();
        }
        self.bind();
        true
    }
}
