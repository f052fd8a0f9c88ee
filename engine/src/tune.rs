use crate::Viewport;
use bt_core::{Block, BlockSequence, SequenceCommand, SequenceError, SharedStr};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TuneError {
    #[error("no current block to tune")]
    NoCurrentBlock,
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Boundary {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TuneOutcome {
    Applied,
    Boundary(Boundary),
    ConfirmationRequired,
}

pub type TuneCallback = Rc<dyn Fn() -> Result<TuneOutcome, TuneError>>;

#[derive(Clone)]
pub struct Confirmation {
    pub title: SharedStr,
    pub on_activate: TuneCallback,
}

#[derive(Clone)]
pub struct MenuEntry {
    pub icon: SharedStr,
    pub title: SharedStr,
    pub name: SharedStr,
    pub is_disabled: bool,
    pub confirmation: Option<Confirmation>,
    pub on_activate: TuneCallback,
}

impl std::fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuEntry")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("is_disabled", &self.is_disabled)
            .field("confirmation", &self.confirmation.as_ref().map(|c| &c.title))
            .finish()
    }
}

pub trait BlockTune {
    fn render(&self) -> MenuEntry;
}

#[derive(Clone)]
pub struct TuneApi {
    blocks: Rc<RefCell<dyn BlockSequence>>,
    viewport: Rc<RefCell<Viewport>>,
    settings_request: Rc<Cell<Option<bool>>>,
    messages: Rc<HashMap<String, String>>,
}

impl TuneApi {
    pub fn new(
        blocks: Rc<RefCell<dyn BlockSequence>>,
        viewport: Rc<RefCell<Viewport>>,
        messages: Rc<HashMap<String, String>>,
    ) -> Self {
        Self {
            blocks,
            viewport,
            settings_request: Rc::new(Cell::new(None)),
            messages,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.blocks.borrow().current_index()
    }

    pub fn block_by_index(&self, index: usize) -> Option<Block> {
        self.blocks.borrow().block(index).cloned()
    }

    pub fn blocks_count(&self) -> usize {
        self.blocks.borrow().len()
    }

    pub fn move_block(&self, to: usize, from: usize) -> Result<(), SequenceError> {
        self.blocks.borrow_mut().execute(SequenceCommand::Move { to, from })
    }

    pub fn delete_current(&self) -> Result<(), SequenceError> {
        self.blocks.borrow_mut().execute(SequenceCommand::DeleteCurrent)
    }

    pub fn toggle_block_settings(&self, open: bool) {
        self.settings_request.set(Some(open));
    }

    pub fn take_settings_request(&self) -> Option<bool> {
        self.settings_request.take()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    pub fn scroll_by(&self, dy: f32) {
        let max_scroll = {
            let blocks = self.blocks.borrow();
            blocks.content_height() - self.viewport.borrow().height
        };
        self.viewport.borrow_mut().scroll_by(dy, max_scroll);
    }

    pub fn t(&self, key: &str) -> SharedStr {
        Arc::from(self.messages.get(key).map(String::as_str).unwrap_or(key))
    }
}

pub type TuneFactory = Rc<dyn Fn(TuneApi) -> Box<dyn BlockTune>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PluginKind {
    Tool,
    Tune,
}

#[derive(Debug, Clone)]
pub struct ToolPlugin {
    pub name: SharedStr,
    pub title: SharedStr,
    pub icon: SharedStr,
}

#[derive(Clone)]
pub struct TunePlugin {
    pub name: SharedStr,
    pub factory: TuneFactory,
}

impl TunePlugin {
    pub fn new<F, T>(name: &str, factory: F) -> Self
    where
        F: Fn(TuneApi) -> T + 'static,
        T: BlockTune + 'static,
    {
        Self {
            name: Arc::from(name),
            factory: Rc::new(move |api| Box::new(factory(api)) as Box<dyn BlockTune>),
        }
    }
}

#[derive(Clone)]
pub enum Plugin {
    Tool(ToolPlugin),
    Tune(TunePlugin),
}

impl Plugin {
    pub fn name(&self) -> &str {
        match self {
            Plugin::Tool(tool) => &tool.name,
            Plugin::Tune(tune) => &tune.name,
        }
    }

    pub fn kind(&self) -> PluginKind {
        match self {
            Plugin::Tool(_) => PluginKind::Tool,
            Plugin::Tune(_) => PluginKind::Tune,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("plugin `{0}` is already registered")]
    Duplicate(String),
}

#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Plugin>,
}

impl PluginRegistry {
    pub fn new(plugins: impl IntoIterator<Item = Plugin>) -> Result<Self, RegistryError> {
        let mut registry = Self::default();
        for plugin in plugins {
            registry.register(plugin)?;
        }
        Ok(registry)
    }

    pub fn with_defaults() -> Self {
        Self {
            plugins: vec![
                Plugin::Tool(ToolPlugin {
                    name: Arc::from(bt_core::DEFAULT_TOOL),
                    title: Arc::from("Text"),
                    icon: Arc::from(crate::icons::TEXT),
                }),
                Plugin::Tune(TunePlugin::new(crate::MoveUpTune::NAME, crate::MoveUpTune::new)),
                Plugin::Tune(TunePlugin::new(crate::DeleteTune::NAME, crate::DeleteTune::new)),
                Plugin::Tune(TunePlugin::new(crate::MoveDownTune::NAME, crate::MoveDownTune::new)),
            ],
        }
    }

    pub fn register(&mut self, plugin: Plugin) -> Result<(), RegistryError> {
        if self.kind_of(plugin.name()).is_some() {
            return Err(RegistryError::Duplicate(plugin.name().to_string()));
        }
        tracing::debug!(name = plugin.name(), kind = ?plugin.kind(), "plugin registered");
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn kind_of(&self, name: &str) -> Option<PluginKind> {
        self.plugins.iter().find(|p| p.name() == name).map(Plugin::kind)
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolPlugin> {
        self.plugins.iter().filter_map(|p| match p {
            Plugin::Tool(tool) => Some(tool),
            Plugin::Tune(_) => None,
        })
    }

    pub fn tool(&self, name: &str) -> Option<&ToolPlugin> {
        self.tools().find(|t| &*t.name == name)
    }

    pub fn tunes(&self) -> impl Iterator<Item = &TunePlugin> {
        self.plugins.iter().filter_map(|p| match p {
            Plugin::Tune(tune) => Some(tune),
            Plugin::Tool(_) => None,
        })
    }

    pub fn instantiate_tunes(&self, api: &TuneApi) -> Vec<Box<dyn BlockTune>> {
        self.tunes().map(|tune| (tune.factory)(api.clone())).collect()
    }
}
