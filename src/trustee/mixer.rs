//! The Mixer trustee role. Mixing is split into an offline phase that
//! commits to a permutation and proves it well formed, and an online
//! phase that re-encrypts and permutes a ciphertext batch and proves
//! the result consistent with the committed permutation. A one-shot
//! variant runs both phases back to back, generating the two proofs
//! concurrently.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use tracing::debug;

use crate::cryptography::elgamal::ElGamalCiphertext;
use crate::cryptography::permutation::{PermutationCommitment, PermutationData};
use crate::cryptography::shuffle::{re_encrypt_batch, MixProof, PermutationProof};
use crate::errors::MixnetError;
use crate::groups::{CryptoSettings, GroupElement, ScalarElement};
use crate::trustee::dto::{PermutationProofDTO, ShuffleProofDTO, ShuffleResultDTO};

/// The offline output of [`Mixer::prepare`]: the private permutation
/// data and the emitted proof, bound to a fixed batch size. Consumed by
/// [`Mixer::shuffle`]; the private data is zeroized when the value is
/// dropped.
#[derive(Debug)]
pub struct PreparedPermutation {
    data: PermutationData,
    proof: PermutationProofDTO,
    batch_size: usize,
}

impl PreparedPermutation {
    /// The proof to publish ahead of the online phase.
    pub fn proof(&self) -> &PermutationProofDTO {
        &self.proof
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

/// A Mixer bound to one trustee identity, one joint public key and one
/// parameter set.
pub struct Mixer {
    settings: CryptoSettings,
    prover_id: String,
    public_key: GroupElement,
}

impl Mixer {
    pub fn new(
        prover_id: impl Into<String>,
        public_key: GroupElement,
        settings: &CryptoSettings,
    ) -> Self {
        Mixer {
            settings: settings.clone(),
            prover_id: prover_id.into(),
            public_key,
        }
    }

    /// Offline phase: sample a permutation, commit to it and prove the
    /// commitment well formed. The batch size is fixed here and cannot
    /// change in the online phase.
    pub fn prepare<R>(
        &self,
        batch_size: usize,
        rng: &mut R,
    ) -> Result<PreparedPermutation, MixnetError>
    where
        R: CryptoRng + RngCore,
    {
        if batch_size == 0 {
            return Err(MixnetError::EmptyBatch);
        }
        let group = self.settings.group.as_ref();
        let generators = group.independent_generators(batch_size);
        let data = PermutationData::generate(batch_size, group, rng);
        let commitment = PermutationCommitment::commit(&data, &generators, group);
        let proof = PermutationProof::generate(
            &data,
            &commitment,
            &generators,
            &self.public_key,
            &self.prover_id,
            &self.settings,
            rng,
        )?;
        debug!(
            prover_id = %self.prover_id,
            batch = batch_size,
            "prepared permutation commitment"
        );
        Ok(PreparedPermutation {
            data,
            proof: proof.to_dto(),
            batch_size,
        })
    }

    /// Online phase: re-encrypt and permute the batch under the
    /// prepared permutation and prove the result. The prepared state is
    /// consumed; a batch of the wrong arity is rejected before any
    /// randomness is drawn.
    pub fn shuffle<R>(
        &self,
        prepared: PreparedPermutation,
        votes: &[ElGamalCiphertext],
        rng: &mut R,
    ) -> Result<ShuffleResultDTO, MixnetError>
    where
        R: CryptoRng + RngCore,
    {
        if votes.len() != prepared.batch_size {
            return Err(MixnetError::ArityMismatch {
                expected: prepared.batch_size,
                actual: votes.len(),
            });
        }
        let group = self.settings.group.as_ref();
        let n = votes.len();
        let generators = group.independent_generators(n);
        // the commitment is recomputed from the private data, never
        // taken from a caller-supplied encoding
        let commitment = PermutationCommitment::commit(&prepared.data, &generators, group);

        let reencryption: Vec<ScalarElement> =
            (0..n).map(|_| group.random_scalar(rng)).collect();
        let shuffled = re_encrypt_batch(
            votes,
            prepared.data.permutation(),
            &reencryption,
            &self.public_key,
            group,
        );
        let mix_proof = MixProof::generate(
            &prepared.data,
            &reencryption,
            &commitment,
            &generators,
            &self.public_key,
            votes,
            &shuffled,
            &self.prover_id,
            &self.settings,
            rng,
        )?;
        debug!(prover_id = %self.prover_id, batch = n, "shuffled batch");

        Ok(assemble(
            mix_proof,
            prepared.proof.clone(),
            &commitment,
            &shuffled,
        ))
    }

    /// One-shot variant: both phases back to back. After the
    /// commitment exists, the permutation proof and the re-encryption
    /// with its mix proof are independent and generated concurrently,
    /// joining before the DTO is assembled.
    pub fn mix<R>(
        &self,
        votes: &[ElGamalCiphertext],
        rng: &mut R,
    ) -> Result<ShuffleResultDTO, MixnetError>
    where
        R: CryptoRng + RngCore,
    {
        if votes.is_empty() {
            return Err(MixnetError::EmptyBatch);
        }
        let group = self.settings.group.as_ref();
        let n = votes.len();
        let generators = group.independent_generators(n);
        let data = PermutationData::generate(n, group, rng);
        let commitment = PermutationCommitment::commit(&data, &generators, group);

        let mut offline_rng = fork_rng(rng)?;
        let mut online_rng = fork_rng(rng)?;
        let (permutation_proof, online) = rayon::join(
            || {
                PermutationProof::generate(
                    &data,
                    &commitment,
                    &generators,
                    &self.public_key,
                    &self.prover_id,
                    &self.settings,
                    &mut offline_rng,
                )
            },
            || {
                let reencryption: Vec<ScalarElement> = (0..n)
                    .map(|_| group.random_scalar(&mut online_rng))
                    .collect();
                let shuffled = re_encrypt_batch(
                    votes,
                    data.permutation(),
                    &reencryption,
                    &self.public_key,
                    group,
                );
                MixProof::generate(
                    &data,
                    &reencryption,
                    &commitment,
                    &generators,
                    &self.public_key,
                    votes,
                    &shuffled,
                    &self.prover_id,
                    &self.settings,
                    &mut online_rng,
                )
                .map(|proof| (proof, shuffled))
            },
        );
        let permutation_proof = permutation_proof?;
        let (mix_proof, shuffled) = online?;
        debug!(prover_id = %self.prover_id, batch = n, "mixed batch");

        Ok(assemble(
            mix_proof,
            permutation_proof.to_dto(),
            &commitment,
            &shuffled,
        ))
    }
}

fn assemble(
    mix_proof: MixProof,
    permutation_proof: PermutationProofDTO,
    commitment: &PermutationCommitment,
    shuffled: &[ElGamalCiphertext],
) -> ShuffleResultDTO {
    ShuffleResultDTO {
        shuffle_proof: ShuffleProofDTO {
            mix_proof: mix_proof.to_dto(),
            permutation_proof,
            permutation_commitment: commitment.to_canonical_string(),
        },
        shuffled_votes: shuffled
            .par_iter()
            .map(|v| v.to_canonical_string())
            .collect(),
    }
}

fn fork_rng<R>(rng: &mut R) -> Result<StdRng, MixnetError>
where
    R: CryptoRng + RngCore,
{
    StdRng::from_rng(rng).map_err(|e| MixnetError::RandomnessFailure(e.to_string()))
}

/// Check a shuffle result DTO against the input batch, the joint public
/// key and the mixer identity, returning the decoded shuffled batch on
/// success.
pub fn verify_shuffle(
    result: &ShuffleResultDTO,
    votes: &[ElGamalCiphertext],
    public_key: &GroupElement,
    prover_id: &str,
    settings: &CryptoSettings,
) -> Result<Vec<ElGamalCiphertext>, MixnetError> {
    let group = settings.group.as_ref();
    let commitment = PermutationCommitment::from_canonical_string(
        &result.shuffle_proof.permutation_commitment,
        group,
    )?;
    let shuffled = result
        .shuffled_votes
        .iter()
        .map(|v| ElGamalCiphertext::from_canonical_string(v, group))
        .collect::<Result<Vec<_>, _>>()?;
    if shuffled.len() != votes.len() || commitment.len() != votes.len() {
        return Err(MixnetError::ArityMismatch {
            expected: votes.len(),
            actual: shuffled.len(),
        });
    }
    let generators = group.independent_generators(votes.len());

    let permutation_proof =
        PermutationProof::from_dto(&result.shuffle_proof.permutation_proof, settings)?;
    permutation_proof.verify(&commitment, &generators, public_key, prover_id, settings)?;

    let mix_proof = MixProof::from_dto(&result.shuffle_proof.mix_proof, settings)?;
    mix_proof.verify(
        &commitment,
        &generators,
        public_key,
        votes,
        &shuffled,
        prover_id,
        settings,
    )?;

    Ok(shuffled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cryptography::elgamal::{self, KeyPair};
    use crate::groups::SchnorrGroup;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn setup(seed: u8) -> (CryptoSettings, KeyPair, Vec<ElGamalCiphertext>, ChaCha20Rng) {
        let settings = CryptoSettings::new(SchnorrGroup::modp_768());
        let group = settings.group.clone();
        let mut rng = ChaCha20Rng::from_seed([seed; 32]);
        let keypair = KeyPair::generate(&group, &mut rng);
        let votes: Vec<_> = (0..4)
            .map(|i| {
                let m = group.exp_g(&group.scalar_from_u64(200 + i));
                elgamal::encrypt(&m, &keypair.y, &group, &mut rng)
            })
            .collect();
        (settings, keypair, votes, rng)
    }

    #[test]
    fn two_phase_shuffle_verifies() {
        let (settings, keypair, votes, mut rng) = setup(41);
        let mixer = Mixer::new("M1", keypair.y.clone(), &settings);
        let prepared = mixer.prepare(votes.len(), &mut rng).unwrap();
        assert_eq!(prepared.batch_size(), votes.len());
        assert_eq!(prepared.proof().e_values.len(), votes.len());
        let result = mixer.shuffle(prepared, &votes, &mut rng).unwrap();
        assert!(verify_shuffle(&result, &votes, &keypair.y, "M1", &settings).is_ok());
    }

    #[test]
    fn one_shot_mix_verifies_and_decrypts_to_same_multiset() {
        let (settings, keypair, votes, mut rng) = setup(42);
        let group = settings.group.clone();
        let mixer = Mixer::new("M1", keypair.y.clone(), &settings);
        let result = mixer.mix(&votes, &mut rng).unwrap();
        let shuffled = verify_shuffle(&result, &votes, &keypair.y, "M1", &settings).unwrap();

        let mut original: Vec<String> = votes
            .iter()
            .map(|v| keypair.decrypt(v, &group).to_decimal())
            .collect();
        let mut mixed: Vec<String> = shuffled
            .iter()
            .map(|v| keypair.decrypt(v, &group).to_decimal())
            .collect();
        original.sort();
        mixed.sort();
        assert_eq!(original, mixed);
    }

    #[test]
    fn arity_mismatch_is_fatal() {
        let (settings, keypair, votes, mut rng) = setup(43);
        let mixer = Mixer::new("M1", keypair.y.clone(), &settings);
        let prepared = mixer.prepare(5, &mut rng).unwrap();
        assert_eq!(
            mixer.shuffle(prepared, &votes, &mut rng).unwrap_err(),
            MixnetError::ArityMismatch {
                expected: 5,
                actual: 4
            }
        );
        assert_eq!(mixer.mix(&[], &mut rng).unwrap_err(), MixnetError::EmptyBatch);
        assert_eq!(
            mixer.prepare(0, &mut rng).unwrap_err(),
            MixnetError::EmptyBatch
        );
    }

    #[test]
    fn verification_binds_the_statement() {
        let (settings, keypair, votes, mut rng) = setup(44);
        let group = settings.group.clone();
        let mixer = Mixer::new("M1", keypair.y.clone(), &settings);
        let result = mixer.mix(&votes, &mut rng).unwrap();

        assert!(verify_shuffle(&result, &votes, &keypair.y, "M2", &settings).is_err());

        let other_key = KeyPair::generate(&group, &mut rng);
        assert!(verify_shuffle(&result, &votes, &other_key.y, "M1", &settings).is_err());

        let mut reordered = votes.clone();
        reordered.swap(0, 1);
        assert!(verify_shuffle(&result, &reordered, &keypair.y, "M1", &settings).is_err());

        let mut tampered = result.clone();
        tampered.shuffled_votes.swap(0, 1);
        assert!(verify_shuffle(&tampered, &votes, &keypair.y, "M1", &settings).is_err());
    }
}
