//! Error types for parsing, loading, and running programs.

use cowvm_derive::Error;

/// Coarse classification used by hosts to route failures.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The source text or instruction sequence was rejected before execution.
    Parse,
    /// The program performed an illegal operation.
    Runtime,
    /// A sandbox ceiling was reached; the program itself may be well-formed.
    Limit,
    /// A host I/O channel failed.
    Io,
}

/// Every failure the crate reports.
///
/// Variants carry structured positions and ceilings; [`CowError::kind`] maps
/// each onto the [`ErrorKind`] taxonomy.
#[derive(Debug, Error)]
pub enum CowError {
    /// A loop start with no matching loop end, caught while validating
    /// source text.
    #[error("unmatched 'MOO' at position {position} (line {line}, column {column})")]
    UnmatchedLoopStart {
        position: usize,
        line: usize,
        column: usize,
    },

    /// A loop end with no matching loop start, caught while validating
    /// source text.
    #[error("unmatched 'moo' at position {position} (line {line}, column {column})")]
    UnmatchedLoopEnd {
        position: usize,
        line: usize,
        column: usize,
    },

    /// A loop start with no matching loop end in an instruction sequence
    /// built without source text.
    #[error("dangling loop start at instruction {position}")]
    DanglingLoopStart { position: usize },

    /// A loop end with no matching loop start in an instruction sequence
    /// built without source text.
    #[error("dangling loop end at instruction {position}")]
    DanglingLoopEnd { position: usize },

    /// The memory pointer would move below the first cell.
    #[error("memory pointer underflow at instruction {pc}")]
    TapeUnderflow { pc: usize },

    /// Chained indirect execution exceeded the dispatch depth cap.
    #[error("indirect execution chained more than {max} times at instruction {pc}")]
    IndirectionOverflow { pc: usize, max: usize },

    /// The configured step ceiling was reached.
    #[error("step limit of {limit} exceeded")]
    StepLimit { limit: u64 },

    /// Growing the tape would exceed the configured cell ceiling.
    #[error("tape limit of {limit} cells exceeded")]
    TapeLimit { limit: usize },

    /// Emitting output would exceed the configured byte ceiling.
    #[error("output limit of {limit} bytes exceeded")]
    OutputLimit { limit: u64 },

    /// The host output channel reported a failure.
    #[error("output failed: {reason}")]
    OutputFailed { reason: String },

    /// The host input channel reported a failure.
    #[error("input failed: {reason}")]
    InputFailed { reason: String },
}

impl CowError {
    /// The taxonomy bucket this failure belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CowError::UnmatchedLoopStart { .. }
            | CowError::UnmatchedLoopEnd { .. }
            | CowError::DanglingLoopStart { .. }
            | CowError::DanglingLoopEnd { .. } => ErrorKind::Parse,
            CowError::TapeUnderflow { .. } | CowError::IndirectionOverflow { .. } => {
                ErrorKind::Runtime
            }
            CowError::StepLimit { .. }
            | CowError::TapeLimit { .. }
            | CowError::OutputLimit { .. } => ErrorKind::Limit,
            CowError::OutputFailed { .. } | CowError::InputFailed { .. } => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_the_taxonomy() {
        let parse = CowError::UnmatchedLoopStart {
            position: 0,
            line: 1,
            column: 1,
        };
        assert_eq!(parse.kind(), ErrorKind::Parse);
        assert_eq!(
            CowError::DanglingLoopEnd { position: 2 }.kind(),
            ErrorKind::Parse
        );
        assert_eq!(CowError::TapeUnderflow { pc: 0 }.kind(), ErrorKind::Runtime);
        assert_eq!(
            CowError::IndirectionOverflow { pc: 1, max: 16 }.kind(),
            ErrorKind::Runtime
        );
        assert_eq!(CowError::StepLimit { limit: 5 }.kind(), ErrorKind::Limit);
        assert_eq!(CowError::TapeLimit { limit: 8 }.kind(), ErrorKind::Limit);
        assert_eq!(CowError::OutputLimit { limit: 9 }.kind(), ErrorKind::Limit);
        assert_eq!(
            CowError::OutputFailed {
                reason: "sink closed".into()
            }
            .kind(),
            ErrorKind::Io
        );
        assert_eq!(
            CowError::InputFailed {
                reason: "tty gone".into()
            }
            .kind(),
            ErrorKind::Io
        );
    }

    #[test]
    fn messages_carry_the_key_facts() {
        let err = CowError::UnmatchedLoopStart {
            position: 4,
            line: 2,
            column: 7,
        };
        let text = err.to_string();
        assert!(text.contains("MOO"));
        assert!(text.contains("position 4"));
        assert!(text.contains("line 2"));
        assert!(text.contains("column 7"));

        assert_eq!(
            CowError::StepLimit { limit: 100 }.to_string(),
            "step limit of 100 exceeded"
        );
        assert_eq!(
            CowError::TapeUnderflow { pc: 3 }.to_string(),
            "memory pointer underflow at instruction 3"
        );
    }
}
