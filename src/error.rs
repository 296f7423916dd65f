use thiserror::Error;

/// Everything that can go wrong while configuring or feeding the effects.
///
/// None of these ever reach the hosting page as a crash: the adapter logs them
/// and leaves the affected effect inert.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("invalid configuration json: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    Color(String),

    #[error("config field `{field}` {reason}")]
    OutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    #[error("gif decode failed: {0}")]
    Decode(#[from] gif::DecodingError),

    #[error("gif has a zero-sized logical screen")]
    EmptyScreen,

    #[error("gif contains no usable frames")]
    NoFrames,

    #[error("dom: {0}")]
    Dom(String),
}

pub type Result<T, E = FxError> = std::result::Result<T, E>;
