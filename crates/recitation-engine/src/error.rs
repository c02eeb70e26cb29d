use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cannot start playback of an empty verse sequence")]
    EmptySequence,

    #[error("Start position {position} is outside a sequence of {len} verses")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Verse {0} is not part of the active sequence")]
    VerseNotInSequence(u32),

    #[error("Invalid resource template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = EngineError::PositionOutOfRange { position: 7, len: 7 };
        assert_eq!(
            err.to_string(),
            "Start position 7 is outside a sequence of 7 verses"
        );
        assert!(EngineError::VerseNotInSequence(262)
            .to_string()
            .contains("262"));
    }
}
