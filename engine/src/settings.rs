use crate::{MenuEntry, ToolPlugin, TuneApi, TuneCallback, TuneOutcome};
use bt_core::SharedStr;
use serde::Serialize;
use uuid::Uuid;

pub enum Press {
    Unknown,
    Disabled,
    Armed,
    Run(TuneCallback),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TuneActivation {
    NotOpen,
    Unknown,
    Disabled,
    AwaitingConfirmation,
    Completed(TuneOutcome),
}

pub struct SettingsPanel {
    block: Uuid,
    entries: Vec<MenuEntry>,
    armed: Option<SharedStr>,
    api: TuneApi,
}

impl SettingsPanel {
    pub fn new(block: Uuid, entries: Vec<MenuEntry>, api: TuneApi) -> Self {
        Self {
            block,
            entries,
            armed: None,
            api,
        }
    }

    pub fn block(&self) -> Uuid {
        self.block
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn api(&self) -> &TuneApi {
        &self.api
    }

    pub fn armed(&self) -> Option<&str> {
        self.armed.as_deref()
    }

    pub fn press(&mut self, name: &str) -> Press {
        let Some(entry) = self.entries.iter().find(|e| &*e.name == name) else {
            return Press::Unknown;
        };
        if entry.is_disabled {
            self.armed = None;
            return Press::Disabled;
        }
        match &entry.confirmation {
            Some(confirmation) if self.armed.as_deref() == Some(name) => {
                self.armed = None;
                Press::Run(confirmation.on_activate.clone())
            }
            Some(_) => {
                self.armed = Some(entry.name.clone());
                Press::Armed
            }
            None => {
                self.armed = None;
                Press::Run(entry.on_activate.clone())
            }
        }
    }

    pub fn view(&self) -> SettingsView {
        SettingsView {
            block: self.block,
            entries: self
                .entries
                .iter()
                .map(|entry| {
                    let armed = self.armed.as_deref() == Some(&*entry.name);
                    let title = match (&entry.confirmation, armed) {
                        (Some(confirmation), true) => confirmation.title.clone(),
                        _ => entry.title.clone(),
                    };
                    MenuEntryView {
                        name: entry.name.clone(),
                        title,
                        icon: entry.icon.clone(),
                        disabled: entry.is_disabled,
                        armed,
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolboxPanel {
    tools: Vec<ToolPlugin>,
}

impl ToolboxPanel {
    pub fn new(tools: Vec<ToolPlugin>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[ToolPlugin] {
        &self.tools
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| &*t.name == name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuEntryView {
    pub name: SharedStr,
    pub title: SharedStr,
    pub icon: SharedStr,
    pub disabled: bool,
    pub armed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub block: Uuid,
    pub entries: Vec<MenuEntryView>,
}
