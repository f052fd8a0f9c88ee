use bt_core::BlockGeometry;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PositionError {
    #[error("block geometry has not been measured")]
    Unmeasured,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
    pub touch: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
            touch: false,
        }
    }
}

impl Viewport {
    pub fn desktop(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn mobile(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
            touch: true,
        }
    }

    pub fn is_mobile(&self, breakpoint: f32) -> bool {
        self.touch || self.width <= breakpoint
    }

    pub fn relative_top(&self, document_y: f32) -> f32 {
        document_y - self.scroll_y
    }

    pub fn scroll_by(&mut self, dy: f32, max_scroll: f32) {
        if !dy.is_finite() {
            return;
        }
        let max_scroll = if max_scroll.is_finite() { max_scroll.max(0.0) } else { 0.0 };
        self.scroll_y = (self.scroll_y + dy).clamp(0.0, max_scroll);
    }
}

/// Vertical toolbar offset for a block.
///
/// On touch layouts the toolbar sits under the block; elsewhere it lines up
/// with the first line of the block's content. Floored to whole pixels.
pub fn toolbar_offset(geometry: &BlockGeometry, mobile: bool) -> Result<i32, PositionError> {
    if !geometry.is_measured() {
        return Err(PositionError::Unmeasured);
    }
    let y = if mobile {
        geometry.top + geometry.height
    } else {
        geometry.top + geometry.content_padding_top
    };
    Ok(y.floor() as i32)
}
