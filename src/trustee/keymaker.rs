//! The KeyMaker trustee role: contributes a share of the distributed
//! election key with a proof of possession, and later partially
//! decrypts a ciphertext batch with a proof of correct decryption.
//! Both operations are stateless per call.

use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cryptography::dl_equality::{DlEqualityZkp, PointMap};
use crate::cryptography::elgamal::ElGamalCiphertext;
use crate::cryptography::preimage::PreimageZkp;
use crate::errors::{MixnetError, ProofError};
use crate::groups::{CryptoSettings, GroupElement, ScalarElement};
use crate::trustee::dto::{EncryptionKeyShareDTO, PartialDecryptionDTO};

/// A trustee's private key share. Zeroized in place on drop; the
/// public share travels in the emitted DTO instead.
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct PrivateShare(ScalarElement);

impl PrivateShare {
    pub(crate) fn scalar(&self) -> &ScalarElement {
        &self.0
    }
}

/// How partial decryptions are shaped and proven.
///
/// The branch is intrinsic to the protocol: in the two-trustee case the
/// emitted values are pre-inverted so that reconstruction multiplies
/// them directly, while in the threshold case inversion is deferred to
/// reconstruction and the proof runs against an externally supplied
/// verification key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecryptionMode {
    /// Two-trustee case: `d_i = (a_i^x)^-1`, proven against the
    /// trustee's own public share `g^x`.
    Symmetric,
    /// Threshold case: `d_i = a_i^x`, proven against the given
    /// verification key.
    Threshold { verification_key: GroupElement },
}

impl DecryptionMode {
    fn point_map(&self) -> PointMap {
        match self {
            DecryptionMode::Symmetric => PointMap::Inverted,
            DecryptionMode::Threshold { .. } => PointMap::Direct,
        }
    }

    fn effective_public_key(&self, own_share: &GroupElement) -> GroupElement {
        match self {
            DecryptionMode::Symmetric => own_share.clone(),
            DecryptionMode::Threshold { verification_key } => verification_key.clone(),
        }
    }
}

/// A KeyMaker bound to one trustee identity and one parameter set.
pub struct KeyMaker {
    settings: CryptoSettings,
    prover_id: String,
}

impl KeyMaker {
    pub fn new(prover_id: impl Into<String>, settings: &CryptoSettings) -> Self {
        KeyMaker {
            settings: settings.clone(),
            prover_id: prover_id.into(),
        }
    }

    /// Sample a key share `(x, y = g^x)` and emit the public share with
    /// a proof of knowledge of `x`. The private share is returned to
    /// the caller and never serialized.
    pub fn create_share<R>(&self, rng: &mut R) -> (PrivateShare, EncryptionKeyShareDTO)
    where
        R: CryptoRng + RngCore,
    {
        let group = self.settings.group.as_ref();
        let x = group.random_scalar(rng);
        let y = group.exp_g(&x);
        let proof = PreimageZkp::generate(&x, &y, &self.prover_id, &self.settings, rng);
        debug!(prover_id = %self.prover_id, "generated encryption key share");
        let dto = EncryptionKeyShareDTO {
            proof: proof.to_dto(),
            public_key: y.to_decimal(),
        };
        (PrivateShare(x), dto)
    }

    /// Partially decrypt a batch with the given share, emitting one
    /// element per input ciphertext in input order together with an
    /// equality-of-preimages proof.
    ///
    /// A batch containing a ciphertext whose first component is the
    /// group identity is rejected before any randomness is drawn: such
    /// a component would decrypt to the identity under every key and
    /// make the proof vacuous.
    pub fn partial_decrypt<R>(
        &self,
        votes: &[ElGamalCiphertext],
        share: &PrivateShare,
        mode: &DecryptionMode,
        rng: &mut R,
    ) -> Result<PartialDecryptionDTO, MixnetError>
    where
        R: CryptoRng + RngCore,
    {
        if votes.is_empty() {
            return Err(MixnetError::EmptyBatch);
        }
        let group = self.settings.group.as_ref();
        if let Some(index) = votes.iter().position(|v| group.is_identity(&v.a)) {
            return Err(MixnetError::DegenerateCiphertext { index });
        }

        let x = share.scalar();
        let own_share = group.exp_g(x);
        let effective_key = mode.effective_public_key(&own_share);
        if effective_key != own_share {
            return Err(MixnetError::Proof(ProofError::GenerationFailed {
                subproof: "partial_decryption",
                reason: "verification key does not match the private share".to_string(),
            }));
        }
        let map = mode.point_map();

        let bases: Vec<GroupElement> = votes.iter().map(|v| v.a.clone()).collect();
        let decryptions: Vec<GroupElement> = bases
            .par_iter()
            .map(|a| {
                let raised = group.exp(a, x);
                match map {
                    PointMap::Direct => raised,
                    PointMap::Inverted => group.invert(&raised),
                }
            })
            .collect();

        let proof = DlEqualityZkp::generate(
            x,
            &effective_key,
            &bases,
            &decryptions,
            map,
            &self.prover_id,
            &self.settings,
            rng,
        )?;
        debug!(
            prover_id = %self.prover_id,
            batch = votes.len(),
            "generated partial decryption"
        );

        Ok(PartialDecryptionDTO {
            decryptions: decryptions.par_iter().map(|d| d.to_decimal()).collect(),
            proof: proof.to_dto(),
        })
    }
}

/// Check a key share DTO against the trustee identity, returning the
/// decoded public share on success.
pub fn verify_key_share(
    dto: &EncryptionKeyShareDTO,
    prover_id: &str,
    settings: &CryptoSettings,
) -> Result<GroupElement, MixnetError> {
    let group = settings.group.as_ref();
    let public_key = group.element_from_decimal(&dto.public_key)?;
    let proof = PreimageZkp::from_dto(&dto.proof, settings)?;
    proof.verify(&public_key, prover_id, settings)?;
    Ok(public_key)
}

/// Check a partial decryption DTO against the input batch, the
/// trustee's public share and the mode it was produced under, returning
/// the decoded partial decryptions on success.
pub fn verify_partial_decryption(
    dto: &PartialDecryptionDTO,
    votes: &[ElGamalCiphertext],
    share_public_key: &GroupElement,
    mode: &DecryptionMode,
    prover_id: &str,
    settings: &CryptoSettings,
) -> Result<Vec<GroupElement>, MixnetError> {
    let group = settings.group.as_ref();
    if dto.decryptions.len() != votes.len() {
        return Err(MixnetError::ArityMismatch {
            expected: votes.len(),
            actual: dto.decryptions.len(),
        });
    }
    let decryptions = dto
        .decryptions
        .iter()
        .map(|d| group.element_from_decimal(d))
        .collect::<Result<Vec<_>, _>>()?;
    let bases: Vec<GroupElement> = votes.iter().map(|v| v.a.clone()).collect();
    let effective_key = mode.effective_public_key(share_public_key);
    let proof = DlEqualityZkp::from_dto(&dto.proof, settings)?;
    proof.verify(
        &effective_key,
        &bases,
        &decryptions,
        mode.point_map(),
        prover_id,
        settings,
    )?;
    Ok(decryptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cryptography::elgamal::{self, KeyPair};
    use crate::groups::SchnorrGroup;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn settings() -> CryptoSettings {
        CryptoSettings::new(SchnorrGroup::modp_768())
    }

    #[test]
    fn key_share_round_trip() {
        let settings = settings();
        let mut rng = ChaCha20Rng::from_seed([30u8; 32]);
        let keymaker = KeyMaker::new("T1", &settings);
        let (_share, dto) = keymaker.create_share(&mut rng);
        let y = verify_key_share(&dto, "T1", &settings).unwrap();
        assert_eq!(y.to_decimal(), dto.public_key);
        assert!(verify_key_share(&dto, "T2", &settings).is_err());
    }

    #[test]
    fn symmetric_partial_decryption_multiplies_back() {
        let settings = settings();
        let group = settings.group.clone();
        let mut rng = ChaCha20Rng::from_seed([31u8; 32]);

        let k1 = KeyMaker::new("T1", &settings);
        let k2 = KeyMaker::new("T2", &settings);
        let (x1, share1) = k1.create_share(&mut rng);
        let (x2, share2) = k2.create_share(&mut rng);
        let y1 = verify_key_share(&share1, "T1", &settings).unwrap();
        let y2 = verify_key_share(&share2, "T2", &settings).unwrap();
        let joint = elgamal::combine_public_keys(&[y1.clone(), y2.clone()], &group);

        let messages: Vec<_> = (0..3)
            .map(|i| group.exp_g(&group.scalar_from_u64(40 + i)))
            .collect();
        let votes: Vec<_> = messages
            .iter()
            .map(|m| elgamal::encrypt(m, &joint, &group, &mut rng))
            .collect();

        let d1 = k1
            .partial_decrypt(&votes, &x1, &DecryptionMode::Symmetric, &mut rng)
            .unwrap();
        let d2 = k2
            .partial_decrypt(&votes, &x2, &DecryptionMode::Symmetric, &mut rng)
            .unwrap();
        let d1 = verify_partial_decryption(
            &d1,
            &votes,
            &y1,
            &DecryptionMode::Symmetric,
            "T1",
            &settings,
        )
        .unwrap();
        let d2 = verify_partial_decryption(
            &d2,
            &votes,
            &y2,
            &DecryptionMode::Symmetric,
            "T2",
            &settings,
        )
        .unwrap();

        // inverted shares reconstruct by direct multiplication
        for i in 0..votes.len() {
            let recovered = group.mul(&votes[i].b, &group.mul(&d1[i], &d2[i]));
            assert_eq!(recovered, messages[i]);
        }
    }

    #[test]
    fn threshold_mode_requires_matching_verification_key() {
        let settings = settings();
        let group = settings.group.clone();
        let mut rng = ChaCha20Rng::from_seed([32u8; 32]);
        let keymaker = KeyMaker::new("T1", &settings);
        let (share, dto) = keymaker.create_share(&mut rng);
        let y = verify_key_share(&dto, "T1", &settings).unwrap();
        let votes = vec![elgamal::encrypt(
            &group.exp_g(&group.scalar_from_u64(5)),
            &y,
            &group,
            &mut rng,
        )];

        let good = DecryptionMode::Threshold {
            verification_key: y.clone(),
        };
        assert!(keymaker
            .partial_decrypt(&votes, &share, &good, &mut rng)
            .is_ok());

        let foreign = KeyPair::generate(&group, &mut rng);
        let bad = DecryptionMode::Threshold {
            verification_key: foreign.y,
        };
        assert!(matches!(
            keymaker.partial_decrypt(&votes, &share, &bad, &mut rng),
            Err(MixnetError::Proof(ProofError::GenerationFailed { .. }))
        ));
    }

    #[test]
    fn degenerate_ciphertext_is_rejected() {
        let settings = settings();
        let group = settings.group.clone();
        let mut rng = ChaCha20Rng::from_seed([33u8; 32]);
        let keymaker = KeyMaker::new("T1", &settings);
        let (share, dto) = keymaker.create_share(&mut rng);
        let y = verify_key_share(&dto, "T1", &settings).unwrap();

        let mut votes = vec![elgamal::encrypt(
            &group.exp_g(&group.scalar_from_u64(5)),
            &y,
            &group,
            &mut rng,
        )];
        votes.push(ElGamalCiphertext {
            a: group.identity(),
            b: y.clone(),
        });
        assert_eq!(
            keymaker.partial_decrypt(&votes, &share, &DecryptionMode::Symmetric, &mut rng),
            Err(MixnetError::DegenerateCiphertext { index: 1 })
        );
        assert_eq!(
            keymaker.partial_decrypt(&[], &share, &DecryptionMode::Symmetric, &mut rng),
            Err(MixnetError::EmptyBatch)
        );
    }
}
