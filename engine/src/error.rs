use crate::{PositionError, TuneError};
use bt_core::{BusError, HandlerError, SequenceError};

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Tune(#[from] TuneError),
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Handler(#[from] HandlerError),
    #[error("tool `{0}` is not in the toolbox")]
    UnknownTool(String),
}
