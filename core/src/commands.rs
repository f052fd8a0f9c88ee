use crate::Block;

#[derive(Debug, Clone)]
pub enum SequenceCommand {
    SetCurrent(usize),
    Move { to: usize, from: usize },
    DeleteCurrent,
    Insert { index: usize, block: Block },
    Replace { index: usize, block: Block },
    UpdateText { index: usize, text: String },
}

impl SequenceCommand {
    pub fn name(&self) -> &'static str {
        match self {
            SequenceCommand::SetCurrent(_) => "set_current",
            SequenceCommand::Move { .. } => "move",
            SequenceCommand::DeleteCurrent => "delete_current",
            SequenceCommand::Insert { .. } => "insert",
            SequenceCommand::Replace { .. } => "replace",
            SequenceCommand::UpdateText { .. } => "update_text",
        }
    }
}
