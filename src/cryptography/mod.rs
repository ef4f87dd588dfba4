//! Cryptographic procedures of the mix network core.
pub mod challenge_context;
pub mod dl_equality;
pub mod elgamal;
pub mod encoding;
pub mod permutation;
pub mod preimage;
pub mod shuffle;
