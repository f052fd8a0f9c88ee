use crate::{icons, Boundary, BlockTune, MenuEntry, TuneApi, TuneError, TuneOutcome};
use std::rc::Rc;
use std::sync::Arc;

pub struct MoveUpTune {
    api: TuneApi,
}

impl MoveUpTune {
    pub const NAME: &'static str = "move-up";

    pub fn new(api: TuneApi) -> Self {
        Self { api }
    }
}

impl BlockTune for MoveUpTune {
    fn render(&self) -> MenuEntry {
        let api = self.api.clone();
        MenuEntry {
            icon: Arc::from(icons::CHEVRON_UP),
            title: self.api.t("Move up"),
            name: Arc::from(Self::NAME),
            is_disabled: !matches!(self.api.current_index(), Some(index) if index > 0),
            confirmation: None,
            on_activate: Rc::new(move || move_up(&api)),
        }
    }
}

pub struct MoveDownTune {
    api: TuneApi,
}

impl MoveDownTune {
    pub const NAME: &'static str = "move-down";

    pub fn new(api: TuneApi) -> Self {
        Self { api }
    }
}

impl BlockTune for MoveDownTune {
    fn render(&self) -> MenuEntry {
        let api = self.api.clone();
        let count = self.api.blocks_count();
        MenuEntry {
            icon: Arc::from(icons::CHEVRON_DOWN),
            title: self.api.t("Move down"),
            name: Arc::from(Self::NAME),
            is_disabled: !matches!(self.api.current_index(), Some(index) if index + 1 < count),
            confirmation: None,
            on_activate: Rc::new(move || move_down(&api)),
        }
    }
}

fn move_up(api: &TuneApi) -> Result<TuneOutcome, TuneError> {
    let index = api.current_index().ok_or(TuneError::NoCurrentBlock)?;
    if index == 0 {
        tracing::debug!(index, "move up ignored at first block");
        return Ok(TuneOutcome::Boundary(Boundary::Top));
    }
    let current = api.block_by_index(index).ok_or(TuneError::NoCurrentBlock)?;
    let previous = api.block_by_index(index - 1).ok_or(TuneError::NoCurrentBlock)?;

    let viewport = api.viewport();
    let current_top = viewport.relative_top(current.geometry.top);
    let previous_top = viewport.relative_top(previous.geometry.top);
    let offset = if previous_top > 0.0 {
        current_top.abs() - previous_top.abs()
    } else {
        current_top.abs() + previous.geometry.height
    };
    api.scroll_by(-offset);

    api.move_block(index - 1, index)?;
    api.toggle_block_settings(true);
    Ok(TuneOutcome::Applied)
}

fn move_down(api: &TuneApi) -> Result<TuneOutcome, TuneError> {
    let index = api.current_index().ok_or(TuneError::NoCurrentBlock)?;
    if index + 1 >= api.blocks_count() {
        tracing::debug!(index, "move down ignored at last block");
        return Ok(TuneOutcome::Boundary(Boundary::Bottom));
    }
    let next = api.block_by_index(index + 1).ok_or(TuneError::NoCurrentBlock)?;

    let viewport = api.viewport();
    let next_top = viewport.relative_top(next.geometry.top);
    let offset = if next_top < viewport.height {
        next.geometry.height
    } else {
        (viewport.height - next.geometry.height).abs()
    };
    api.scroll_by(offset);

    api.move_block(index + 1, index)?;
    api.toggle_block_settings(true);
    Ok(TuneOutcome::Applied)
}
