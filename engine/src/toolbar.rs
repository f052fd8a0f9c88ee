use crate::{toolbar_offset, PositionError, SettingsPanel, ToolboxPanel};
use bt_core::{Block, BlockSequence};
use serde::Serialize;
use uuid::Uuid;

pub mod markers {
    pub const TOOLBAR: &str = "bt-toolbar";
    pub const TOOLBAR_OPENED: &str = "bt-toolbar--opened";
    pub const ACTIONS_OPENED: &str = "bt-toolbar__actions--opened";
    pub const SETTINGS_TOGGLER_HIDDEN: &str = "bt-toolbar__settings-btn--hidden";
    pub const PAGE_TOOLBOX_OPENED: &str = "bt-editor--toolbox-opened";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ToolbarPhase {
    Closed,
    OpenBare,
    OpenWithActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolbarState {
    pub phase: ToolbarPhase,
    pub settings_toggler_visible: bool,
    pub vertical_offset: Option<i32>,
}

impl ToolbarState {
    fn closed() -> Self {
        Self {
            phase: ToolbarPhase::Closed,
            settings_toggler_visible: true,
            vertical_offset: None,
        }
    }

    pub fn opened(&self) -> bool {
        self.phase != ToolbarPhase::Closed
    }

    pub fn actions_visible(&self) -> bool {
        self.phase == ToolbarPhase::OpenWithActions
    }
}

/// At most one popover is open at a time.
pub enum Popover {
    None,
    Settings(SettingsPanel),
    Toolbox(ToolboxPanel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PopoverKind {
    Settings,
    Toolbox,
}

impl Popover {
    pub fn kind(&self) -> Option<PopoverKind> {
        match self {
            Popover::None => None,
            Popover::Settings(_) => Some(PopoverKind::Settings),
            Popover::Toolbox(_) => Some(PopoverKind::Toolbox),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarUi {
    pub generation: u64,
}

/// The settings toggler is hidden only for a lone empty block.
pub fn settings_toggler_visible(blocks_len: usize, block_is_empty: bool) -> bool {
    !(blocks_len == 1 && block_is_empty)
}

pub struct Toolbar {
    state: ToolbarState,
    ui: Option<ToolbarUi>,
    builds: u64,
    hovered: Option<Uuid>,
    popover: Popover,
    read_only: bool,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolbar {
    pub fn new() -> Self {
        Self {
            state: ToolbarState::closed(),
            ui: None,
            builds: 0,
            hovered: None,
            popover: Popover::None,
            read_only: false,
        }
    }

    pub fn state(&self) -> ToolbarState {
        self.state
    }

    pub fn ui(&self) -> Option<ToolbarUi> {
        self.ui
    }

    pub fn is_built(&self) -> bool {
        self.ui.is_some()
    }

    pub fn hovered(&self) -> Option<Uuid> {
        self.hovered
    }

    pub fn popover(&self) -> &Popover {
        &self.popover
    }

    pub fn settings(&self) -> Option<&SettingsPanel> {
        match &self.popover {
            Popover::Settings(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn settings_mut(&mut self) -> Option<&mut SettingsPanel> {
        match &mut self.popover {
            Popover::Settings(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn toolbox(&self) -> Option<&ToolboxPanel> {
        match &self.popover {
            Popover::Toolbox(panel) => Some(panel),
            _ => None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn build(&mut self) {
        self.builds += 1;
        self.ui = Some(ToolbarUi {
            generation: self.builds,
        });
        tracing::debug!(generation = self.builds, "toolbar built");
    }

    pub fn destroy(&mut self) {
        if self.ui.take().is_some() {
            tracing::debug!("toolbar destroyed");
        }
        self.state = ToolbarState::closed();
        self.hovered = None;
        self.popover = Popover::None;
    }

    /// Place the toolbar next to `block` and open it with actions shown.
    ///
    /// Does nothing when there is no block or the overlay is not built. If
    /// the block has no usable geometry the call fails and nothing changes.
    pub fn move_and_open(
        &mut self,
        block: Option<&Block>,
        blocks: &dyn BlockSequence,
        mobile: bool,
    ) -> Result<bool, PositionError> {
        let Some(block) = block else {
            return Ok(false);
        };
        if self.ui.is_none() {
            return Ok(false);
        }
        let offset = toolbar_offset(&block.geometry, mobile)?;

        self.popover = Popover::None;
        self.hovered = Some(block.id);
        self.state = ToolbarState {
            phase: ToolbarPhase::OpenWithActions,
            settings_toggler_visible: settings_toggler_visible(blocks.len(), block.is_empty()),
            vertical_offset: Some(offset),
        };
        tracing::trace!(block = %block.id, offset, mobile, "toolbar moved");
        Ok(true)
    }

    pub fn resync(&mut self, blocks: &dyn BlockSequence, mobile: bool) {
        let Some(id) = self.hovered else {
            return;
        };
        let Some(block) = blocks.block_by_id(id) else {
            tracing::debug!(block = %id, "hovered block removed");
            self.hovered = None;
            self.close();
            return;
        };
        if !self.state.opened() {
            return;
        }
        match toolbar_offset(&block.geometry, mobile) {
            Ok(offset) => {
                self.state.vertical_offset = Some(offset);
                self.state.settings_toggler_visible =
                    settings_toggler_visible(blocks.len(), block.is_empty());
            }
            Err(err) => tracing::warn!(block = %id, error = %err, "toolbar kept at last position"),
        }
    }

    pub fn open(&mut self, with_actions: bool) {
        if self.ui.is_none() {
            return;
        }
        self.state.phase = if with_actions {
            ToolbarPhase::OpenWithActions
        } else {
            ToolbarPhase::OpenBare
        };
    }

    pub fn hide_block_actions(&mut self) {
        if self.state.opened() {
            self.state.phase = ToolbarPhase::OpenBare;
        }
    }

    pub fn close(&mut self) {
        if self.read_only {
            return;
        }
        self.state.phase = ToolbarPhase::Closed;
        self.state.vertical_offset = None;
        self.popover = Popover::None;
        self.hovered = None;
    }

    pub fn open_settings(&mut self, panel: SettingsPanel) {
        self.popover = Popover::Settings(panel);
    }

    pub fn open_toolbox(&mut self, panel: ToolboxPanel) {
        self.popover = Popover::Toolbox(panel);
    }

    pub fn close_popover(&mut self) {
        self.popover = Popover::None;
    }

    pub fn view(&self) -> ToolbarView {
        let mut root = vec![markers::TOOLBAR];
        if self.state.opened() {
            root.push(markers::TOOLBAR_OPENED);
        }
        let mut actions = Vec::new();
        if self.state.actions_visible() {
            actions.push(markers::ACTIONS_OPENED);
        }
        let mut settings_toggler = Vec::new();
        if !self.state.settings_toggler_visible {
            settings_toggler.push(markers::SETTINGS_TOGGLER_HIDDEN);
        }
        let mut page = Vec::new();
        if matches!(self.popover, Popover::Toolbox(_)) {
            page.push(markers::PAGE_TOOLBOX_OPENED);
        }
        ToolbarView {
            built: self.ui.is_some(),
            state: self.state,
            hovered: self.hovered,
            popover: self.popover.kind(),
            root,
            actions,
            settings_toggler,
            page,
            top: self.state.vertical_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolbarView {
    pub built: bool,
    pub state: ToolbarState,
    pub hovered: Option<Uuid>,
    pub popover: Option<PopoverKind>,
    pub root: Vec<&'static str>,
    pub actions: Vec<&'static str>,
    pub settings_toggler: Vec<&'static str>,
    pub page: Vec<&'static str>,
    pub top: Option<i32>,
}
