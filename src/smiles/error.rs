use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("structure string is empty")]
    Empty,

    #[error("failed to parse SMILES: {details} (at position {position})")]
    Parse { position: usize, details: String },

    #[error("ring bond {0} was opened but never closed")]
    UnclosedRing(u16),

    #[error("unbalanced parentheses: {0} branch(es) left open")]
    UnclosedBranch(usize),
}

impl Error {
    pub fn parse(position: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            position,
            details: details.into(),
        }
    }
}
