use crate::entity::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A snapshot failed structural validation. The restore that found it
    /// aborted before discarding any live state.
    #[error("Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    /// restore() was handed a record of the wrong kind. A contract
    /// violation by the caller, not a data fault.
    #[error("Record kind mismatch: expected {expected:?}, found {found:?}")]
    RecordMismatch {
        expected: EntityKind,
        found: EntityKind,
    },
}

pub type SimResult<T> = Result<T, EngineError>;
