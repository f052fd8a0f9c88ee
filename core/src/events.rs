use crate::{Block, BusEvent};
use serde::Serialize;
use uuid::Uuid;

/// Non-owning reference to a block. Stays valid across index shifts; the
/// block itself may be gone by the time a handler looks it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BlockRef {
    pub id: Uuid,
}

impl From<&Block> for BlockRef {
    fn from(block: &Block) -> Self {
        Self { id: block.id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    BlockHovered,
    SettingsRequested,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    BlockHovered { block: BlockRef },
    SettingsRequested { block: BlockRef },
}

impl EditorEvent {
    pub fn block(&self) -> BlockRef {
        match self {
            EditorEvent::BlockHovered { block } | EditorEvent::SettingsRequested { block } => *block,
        }
    }
}

impl BusEvent for EditorEvent {
    type Channel = Channel;

    fn channel(&self) -> Channel {
        match self {
            EditorEvent::BlockHovered { .. } => Channel::BlockHovered,
            EditorEvent::SettingsRequested { .. } => Channel::SettingsRequested,
        }
    }
}
