use thiserror::Error;

use crate::{CabbageId, GoatId};

/// Errors returned by externally triggered world commands.
///
/// None of these are fatal: the tick cycle never produces them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    #[error("no goat with handle {0}")]
    UnknownGoat(GoatId),

    #[error("no cabbage with handle {0}")]
    UnknownCabbage(CabbageId),

    #[error("cabbage {0} is being eaten and cannot be modified")]
    CabbageReserved(CabbageId),

    #[error("goat {field} is out of range: {value}")]
    InvalidAttribute { field: &'static str, value: f32 },

    #[error("cabbage size must be positive, got {0}")]
    InvalidCabbageSize(f32),
}
