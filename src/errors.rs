use thiserror::Error;

/// Represents an error in the generation or verification of a zero
/// knowledge proof.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ProofError {
    /// This error occurs when verification of a proof fails.
    #[error("proof verification failed")]
    VerificationFailed,
    /// This error occurs when a proof generator detects an inconsistency
    /// in its inputs, e.g. a witness outside its domain.
    #[error("proof generation failed in `{subproof}`: {reason}")]
    GenerationFailed {
        subproof: &'static str,
        reason: String,
    },
}

/// Boundary errors of the trustee operations. No operation retries, and
/// no partial result is ever emitted alongside one of these.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MixnetError {
    /// This error occurs when the group parameters fail validation,
    /// e.g. `p` is not a safe prime or the generator does not have
    /// order `q`.
    #[error("invalid group parameters: {0}")]
    InvalidGroupParameters(String),
    /// This error occurs when the online ciphertext batch does not
    /// match the arity fixed by the offline phase.
    #[error("ciphertext batch arity mismatch: expected {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    /// This error occurs when a ciphertext batch of size zero is
    /// submitted.
    #[error("empty ciphertext batch")]
    EmptyBatch,
    /// This error occurs when a ciphertext carries the group identity
    /// as its first component, which would make any decryption proof
    /// for it vacuous.
    #[error("ciphertext {index} has an identity first component")]
    DegenerateCiphertext { index: usize },
    /// This error occurs when the system randomness source fails.
    #[error("randomness source failure: {0}")]
    RandomnessFailure(String),
    #[error(transparent)]
    Proof(#[from] ProofError),
    /// This error occurs when a canonical string cannot be decoded, or
    /// a produced value does not survive the encode/decode round trip.
    #[error("canonical encoding failure: {0}")]
    EncodingFailure(String),
}
