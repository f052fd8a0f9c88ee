use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub type SharedStr = Arc<str>;

pub const DEFAULT_TOOL: &str = "paragraph";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub version: u64,
    pub blocks: Vec<Block>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub title: SharedStr,
    pub author: SharedStr,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: Arc::from(""),
            author: Arc::from(""),
            created_at: 0,
            updated_at: 0,
        }
    }
}

/// On-screen box of a block's root container, in document pixels.
///
/// `content_padding_top` is the top padding of the rendered content region,
/// i.e. the distance from the block's top edge to its first line of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockGeometry {
    pub top: f32,
    pub height: f32,
    pub content_padding_top: f32,
}

impl Default for BlockGeometry {
    fn default() -> Self {
        Self {
            top: 0.0,
            height: 40.0,
            content_padding_top: 8.0,
        }
    }
}

impl BlockGeometry {
    pub fn unmeasured() -> Self {
        Self {
            top: f32::NAN,
            height: f32::NAN,
            content_padding_top: f32::NAN,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.top.is_finite()
            && self.height.is_finite()
            && self.content_padding_top.is_finite()
            && self.height >= 0.0
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: Uuid,
    pub tool: SharedStr,
    #[serde(default = "empty_text")]
    pub text: SharedStr,
    #[serde(default = "editable_default")]
    pub editable: bool,
    #[serde(default)]
    pub geometry: BlockGeometry,
}

fn empty_text() -> SharedStr {
    Arc::from("")
}

fn editable_default() -> bool {
    true
}

impl Block {
    pub fn new(tool: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool: Arc::from(tool),
            text: empty_text(),
            editable: true,
            geometry: BlockGeometry::default(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self {
            text: Arc::from(text),
            ..Self::new(DEFAULT_TOOL)
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.geometry.height = height;
        self
    }

    pub fn with_padding_top(mut self, padding: f32) -> Self {
        self.geometry.content_padding_top = padding;
        self
    }

    pub fn non_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            version: 1,
            blocks: Vec::new(),
            metadata: Metadata::default(),
        }
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::new()
        }
    }

    pub fn touch(&mut self) {
        self.version = self.version.saturating_add(1);
        self.metadata.updated_at = chrono::Utc::now().timestamp();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
