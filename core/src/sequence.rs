use crate::{Block, Document, SequenceCommand, SequenceError};
use std::sync::Arc;
use uuid::Uuid;

pub trait BlockSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn current_index(&self) -> Option<usize>;

    fn block(&self, index: usize) -> Option<&Block>;

    fn index_of(&self, id: Uuid) -> Option<usize>;

    fn execute(&mut self, cmd: SequenceCommand) -> Result<(), SequenceError>;

    fn block_by_id(&self, id: Uuid) -> Option<&Block> {
        self.index_of(id).and_then(|index| self.block(index))
    }

    fn current_block(&self) -> Option<&Block> {
        self.current_index().and_then(|index| self.block(index))
    }

    fn content_height(&self) -> f32 {
        (0..self.len())
            .filter_map(|index| self.block(index))
            .map(|b| b.geometry.bottom())
            .filter(|bottom| bottom.is_finite())
            .fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone)]
pub struct BlockList {
    pub doc: Document,
    current: Option<usize>,
    origin_top: f32,
    auto_layout: bool,
}

impl BlockList {
    pub fn new(doc: Document) -> Self {
        let current = if doc.blocks.is_empty() { None } else { Some(0) };
        let mut list = Self {
            doc,
            current,
            origin_top: 0.0,
            auto_layout: true,
        };
        list.relayout();
        list
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self::new(Document::with_blocks(blocks))
    }

    pub fn with_origin(mut self, top: f32) -> Self {
        self.origin_top = top;
        self.relayout();
        self
    }

    pub fn with_auto_layout(mut self, enabled: bool) -> Self {
        self.auto_layout = enabled;
        self.relayout();
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.doc.blocks
    }

    pub fn set_geometry(&mut self, index: usize, geometry: crate::BlockGeometry) -> Result<(), SequenceError> {
        let len = self.doc.blocks.len();
        let block = self
            .doc
            .blocks
            .get_mut(index)
            .ok_or(SequenceError::IndexOutOfRange { index, len })?;
        block.geometry = geometry;
        Ok(())
    }

    pub fn relayout(&mut self) {
        if !self.auto_layout {
            return;
        }
        let mut top = self.origin_top;
        for block in &mut self.doc.blocks {
            block.geometry.top = top;
            if block.geometry.height.is_finite() {
                top += block.geometry.height;
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), SequenceError> {
        let len = self.doc.blocks.len();
        if index < len {
            Ok(())
        } else {
            Err(SequenceError::IndexOutOfRange { index, len })
        }
    }

    fn move_block(&mut self, to: usize, from: usize) -> Result<(), SequenceError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let block = self.doc.blocks.remove(from);
        self.doc.blocks.insert(to, block);
        self.current = Some(to);
        Ok(())
    }

    fn delete_current(&mut self) -> Result<(), SequenceError> {
        let index = self.current.ok_or(SequenceError::NoCurrentBlock)?;
        self.check_index(index)?;
        self.doc.blocks.remove(index);
        self.current = if self.doc.blocks.is_empty() {
            None
        } else {
            Some(index.saturating_sub(1))
        };
        Ok(())
    }

    fn insert(&mut self, index: usize, block: Block) -> Result<(), SequenceError> {
        let len = self.doc.blocks.len();
        if index > len {
            return Err(SequenceError::IndexOutOfRange { index, len });
        }
        self.doc.blocks.insert(index, block);
        self.current = match self.current {
            Some(current) if index <= current => Some(current + 1),
            Some(current) => Some(current),
            None => Some(index),
        };
        Ok(())
    }
}

impl BlockSequence for BlockList {
    fn len(&self) -> usize {
        self.doc.blocks.len()
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    fn block(&self, index: usize) -> Option<&Block> {
        self.doc.blocks.get(index)
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.doc.blocks.iter().position(|b| b.id == id)
    }

    fn execute(&mut self, cmd: SequenceCommand) -> Result<(), SequenceError> {
        let name = cmd.name();
        match cmd {
            SequenceCommand::SetCurrent(index) => {
                self.check_index(index)?;
                self.current = Some(index);
                tracing::debug!(command = name, index, "current block set");
                return Ok(());
            }
            SequenceCommand::Move { to, from } => self.move_block(to, from)?,
            SequenceCommand::DeleteCurrent => self.delete_current()?,
            SequenceCommand::Insert { index, block } => self.insert(index, block)?,
            SequenceCommand::Replace { index, block } => {
                self.check_index(index)?;
                self.doc.blocks[index] = block;
            }
            SequenceCommand::UpdateText { index, text } => {
                self.check_index(index)?;
                self.doc.blocks[index].text = Arc::from(text);
            }
        }
        tracing::debug!(command = name, current = ?self.current, len = self.doc.blocks.len(), "sequence command");
        self.relayout();
        self.doc.touch();
        Ok(())
    }
}
