use thiserror::Error;

use crate::parse::ParseError;
use crate::EvaluationError;

/// Unified error type covering parsing and evaluation.
///
/// Returned by one-shot helpers like [`validate()`](crate::validate) that
/// parse and evaluate in a single call.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_transparently() {
        let err: Error = EvaluationError::UnknownRule { name: "nope".into() }.into();
        assert_eq!(err.to_string(), "unknown rule 'nope'");
        assert!(matches!(err, Error::Evaluation(_)));

        let err: Error = crate::parse("required||email").unwrap_err().into();
        assert!(matches!(err, Error::Parse(ref p) if p.offset() == 9));
    }
}
