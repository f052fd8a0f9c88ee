use crate::{icons, BlockTune, Confirmation, MenuEntry, TuneApi, TuneError, TuneOutcome};
use std::rc::Rc;
use std::sync::Arc;

/// Removes the current block. Acts only through its confirmation, so the
/// user has to press it twice.
pub struct DeleteTune {
    api: TuneApi,
}

impl DeleteTune {
    pub const NAME: &'static str = "delete";

    pub fn new(api: TuneApi) -> Self {
        Self { api }
    }
}

impl BlockTune for DeleteTune {
    fn render(&self) -> MenuEntry {
        let api = self.api.clone();
        let editable = self
            .api
            .current_index()
            .and_then(|index| self.api.block_by_index(index))
            .map(|block| block.editable)
            .unwrap_or(false);
        MenuEntry {
            icon: Arc::from(icons::CROSS),
            title: self.api.t("Delete"),
            name: Arc::from(Self::NAME),
            is_disabled: !editable,
            confirmation: Some(Confirmation {
                title: self.api.t("Click to delete"),
                on_activate: Rc::new(move || delete_current(&api)),
            }),
            on_activate: Rc::new(|| Ok(TuneOutcome::ConfirmationRequired)),
        }
    }
}

fn delete_current(api: &TuneApi) -> Result<TuneOutcome, TuneError> {
    if api.current_index().is_none() {
        return Err(TuneError::NoCurrentBlock);
    }
    api.delete_current()?;
    api.toggle_block_settings(false);
    Ok(TuneOutcome::Applied)
}
