use thiserror::Error;

pub type ChoreoResult<T> = Result<T, ChoreoError>;

#[derive(Debug, Error)]
pub enum ChoreoError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid phase table: {0}")]
    InvalidPhaseTable(String),

    #[error(
        "property `{property}` is discontinuous at progress {boundary}: phase end={left}, next phase start={right}"
    )]
    DiscontinuousMapping {
        property: String,
        boundary: f64,
        left: f64,
        right: f64,
    },

    #[error("unknown {kind} handle: {id}")]
    UnknownHandle { kind: &'static str, id: u64 },
}
