use crate::{curve::CurveKey, curve_store::StoreError};

/// Rejected user input. No state is changed when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("{0} - is not a number")]
    NotANumber(String),

    #[error("no curve selected")]
    NoChart,

    #[error("pad {0} does not exist")]
    NoSuchPad(usize),

    #[error("pad {pad} has no chart {chart}")]
    NoSuchChart { pad: usize, chart: usize },

    #[error("curve {0} is not loaded")]
    UnknownCurve(CurveKey),

    #[error("pad width must be positive")]
    InvalidWidth,

    #[error(transparent)]
    Store(#[from] StoreError),
}
