//! Non-interactive Zero Knowledge proof of knowledge of a discrete
//! logarithm, used for key shares.
//!
//! The proof is the following:
//!
//! `NIZK{(y), (x): y = g^x}`
//!
//! made non-interactive by deriving the challenge from the transcript
//! `(y, t, proverId)` where `t` is the prover commitment.

use rand_core::{CryptoRng, RngCore};

use crate::cryptography::challenge_context::ChallengeContext;
use crate::errors::{MixnetError, ProofError};
use crate::groups::{CryptoSettings, GroupElement, ScalarElement};
use crate::trustee::dto::SigmaProofDTO;

/// Proof of knowledge of the exponent behind a public key share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreimageZkp {
    pub commitment: GroupElement,
    pub challenge: ScalarElement,
    pub response: ScalarElement,
}

impl PreimageZkp {
    /// Generate a proof of knowledge of `witness` with `image = g^witness`.
    pub fn generate<R>(
        witness: &ScalarElement,
        image: &GroupElement,
        prover_id: &str,
        settings: &CryptoSettings,
        rng: &mut R,
    ) -> Self
    where
        R: CryptoRng + RngCore,
    {
        let group = settings.group.as_ref();
        let s = group.random_scalar(rng);
        let commitment = group.exp_g(&s);
        let mut ctx = ChallengeContext::new();
        ctx.absorb(&image.to_decimal());
        ctx.absorb(&commitment.to_decimal());
        let challenge = ctx.challenge(prover_id, group);
        let response = group.scalar_add(&s, &group.scalar_mul(&challenge, witness));

        PreimageZkp {
            commitment,
            challenge,
            response,
        }
    }

    /// Verify the proof against `image` and the prover identity.
    pub fn verify(
        &self,
        image: &GroupElement,
        prover_id: &str,
        settings: &CryptoSettings,
    ) -> Result<(), ProofError> {
        let group = settings.group.as_ref();
        let mut ctx = ChallengeContext::new();
        ctx.absorb(&image.to_decimal());
        ctx.absorb(&self.commitment.to_decimal());
        let challenge = ctx.challenge(prover_id, group);
        if challenge != self.challenge {
            return Err(ProofError::VerificationFailed);
        }
        let lhs = group.exp_g(&self.response);
        let rhs = group.mul(&self.commitment, &group.exp(image, &self.challenge));
        // no need for constant time equality because of the hash in the challenge
        if lhs == rhs {
            Ok(())
        } else {
            Err(ProofError::VerificationFailed)
        }
    }

    pub fn to_dto(&self) -> SigmaProofDTO {
        SigmaProofDTO {
            commitment: self.commitment.to_decimal(),
            challenge: self.challenge.to_decimal(),
            response: self.response.to_decimal(),
        }
    }

    pub fn from_dto(dto: &SigmaProofDTO, settings: &CryptoSettings) -> Result<Self, MixnetError> {
        let group = settings.group.as_ref();
        Ok(PreimageZkp {
            commitment: group.element_from_decimal(&dto.commitment)?,
            challenge: group.scalar_from_decimal(&dto.challenge)?,
            response: group.scalar_from_decimal(&dto.response)?,
        })
    }
}
