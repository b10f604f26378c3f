use num_bigint::BigInt;
use thiserror::Error;

/// Result type alias for the KLPT routines.
pub type Result<T> = core::result::Result<T, KlptError>;

/// Various errors raised by the quaternion lattice code and the KLPT steps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KlptError {
    /// Inversion or division by an element of reduced norm zero.
    #[error("division by an element of reduced norm zero")]
    DivisionByZeroNorm,

    /// A generator handed to `left_ideal` is not an element of the order.
    #[error("generator {generator} is not an element of the order")]
    InvalidGenerator { generator: String },

    /// The supplied basis does not span an order.
    #[error("basis does not define an order: {reason}")]
    InvalidOrder { reason: &'static str },

    /// Malformed arguments to a number theoretic routine.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Discriminant, order or ideal conditions of a routine are not met.
    #[error("precondition violated: {reason}")]
    PreconditionViolated { reason: String },

    /// The generators found for an ideal do not generate it again.
    #[error("generators ({norm}, {alpha}) do not generate the ideal {ideal}")]
    GeneratorSearchInconsistent {
        norm: BigInt,
        alpha: String,
        ideal: String,
    },

    /// The left null space modulo N contains no vector with a j/k component.
    #[error("no solution of the ideal congruence modulo {modulus}")]
    NoCongruenceSolution { modulus: BigInt },

    /// A bounded randomised or exhaustive search ran out of attempts.
    #[error("{search} exhausted after {attempts} attempts")]
    SearchExhausted {
        search: &'static str,
        attempts: usize,
    },

    /// Strong approximation passed its exponent ceiling.
    #[error("strong approximation gave up beyond exponent {max_exponent}")]
    StrongApproximationExhausted { max_exponent: u32 },

    /// A postcondition of the reduction itself failed.
    #[error("internal consistency failure: {context}")]
    InternalConsistency { context: String },
}

impl KlptError {
    /// Whether running the same call again (with fresh randomness or larger
    /// ceilings) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            KlptError::SearchExhausted { .. } | KlptError::StrongApproximationExhausted { .. }
        )
    }

    /// Whether the error signals a bug rather than bad input or bad luck.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            KlptError::GeneratorSearchInconsistent { .. } | KlptError::InternalConsistency { .. }
        )
    }

    pub(crate) fn precondition(reason: impl Into<String>) -> Self {
        KlptError::PreconditionViolated {
            reason: reason.into(),
        }
    }

    pub(crate) fn internal(context: impl Into<String>) -> Self {
        KlptError::InternalConsistency {
            context: context.into(),
        }
    }
}
