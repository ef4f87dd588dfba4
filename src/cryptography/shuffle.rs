//! Verifiable re-encryption shuffle, decomposed in the
//! Terelius-Wikstrom fashion: an offline argument that a vector of
//! commitments opens to a permutation, and an online argument that the
//! shuffled batch is consistent with the committed permutation.
//!
//! Both arguments share the per-index challenge vector construction and
//! are tied together by the permutation commitment
//! `c_i = g^{r_i} * h_{pi(i)}`.
//!
//! With per-index challenges `e_i` and their permuted images
//! `e'_i = e_{pi^-1(i)}`, the offline argument proves knowledge of
//! `(pi, r)` satisfying
//!
//! * `prod c_i^{e_i} = g^A * prod h_j^{e'_j}` with `A = sum r_i e_i`,
//! * the bridging chain `B_i = g^{b_i} * B_{i-1}^{e'_i}` with `B_0`
//!   anchored at `h_1`,
//! * `prod c_i / prod h_i = g^{sum r_i}`, and
//! * `B_N * h_1^{-prod e_i} = g^d` for the telescoped exponent `d`,
//!
//! and the online argument proves, for fresh challenges bound to the
//! ciphertexts, knowledge of `(pi, r, s)` satisfying the commitment
//! relation above together with
//!
//! * `prod V_j^{e_j} = Enc_y(1; -F) * prod V'_i^{e'_i}` with
//!   `F = sum e'_i s_i`.

use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;

use crate::cryptography::challenge_context::ChallengeContext;
use crate::cryptography::elgamal::ElGamalCiphertext;
use crate::cryptography::encoding;
use crate::cryptography::permutation::{Permutation, PermutationCommitment, PermutationData};
use crate::errors::{MixnetError, ProofError};
use crate::groups::{CryptoSettings, GroupElement, ScalarElement, SchnorrGroup};
use crate::trustee::dto::{MixProofDTO, PermutationProofDTO, SigmaProofDTO};

/// Offline argument that a commitment vector opens to a permutation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PermutationProof {
    pub e_values: Vec<ScalarElement>,
    pub bridging_commitments: Vec<GroupElement>,
    pub a_prime: GroupElement,
    pub b_primes: Vec<GroupElement>,
    pub c_prime: GroupElement,
    pub d_prime: GroupElement,
    pub challenge: ScalarElement,
    pub k_a: ScalarElement,
    pub k_b: Vec<ScalarElement>,
    pub k_c: ScalarElement,
    pub k_d: ScalarElement,
    pub k_e: Vec<ScalarElement>,
}

impl PermutationProof {
    pub fn generate<R>(
        data: &PermutationData,
        commitment: &PermutationCommitment,
        generators: &[GroupElement],
        public_key: &GroupElement,
        prover_id: &str,
        settings: &CryptoSettings,
        rng: &mut R,
    ) -> Result<Self, ProofError>
    where
        R: CryptoRng + RngCore,
    {
        let n = data.len();
        if n == 0 || commitment.len() != n || generators.len() != n {
            return Err(ProofError::GenerationFailed {
                subproof: "permutation_commitment",
                reason: format!(
                    "inconsistent arities: data {}, commitment {}, generators {}",
                    n,
                    commitment.len(),
                    generators.len()
                ),
            });
        }
        let group = settings.group.as_ref();
        let permutation = data.permutation();
        let randomness = data.randomness();

        let e_values = offline_transcript(public_key, generators, commitment)
            .index_generator(prover_id)
            .scalars(n, group);
        let permuted_e: Vec<ScalarElement> = (0..n)
            .map(|i| e_values[permutation.preimage_of(i)].clone())
            .collect();

        // bridging chain anchored at the first generator
        let b: Vec<ScalarElement> = (0..n).map(|_| group.random_scalar(rng)).collect();
        let mut bridging = Vec::with_capacity(n);
        let mut previous = generators[0].clone();
        for i in 0..n {
            let next = group.mul(&group.exp_g(&b[i]), &group.exp(&previous, &permuted_e[i]));
            bridging.push(next.clone());
            previous = next;
        }

        // witnesses of the aggregated statements
        let a = (0..n).fold(group.scalar_zero(), |acc, i| {
            group.scalar_add(&acc, &group.scalar_mul(&randomness[i], &e_values[i]))
        });
        let c_bar = randomness
            .iter()
            .fold(group.scalar_zero(), |acc, r| group.scalar_add(&acc, r));
        let mut d = b[0].clone();
        for i in 1..n {
            d = group.scalar_add(&b[i], &group.scalar_mul(&permuted_e[i], &d));
        }

        let omega_a = group.random_scalar(rng);
        let omega_c = group.random_scalar(rng);
        let omega_d = group.random_scalar(rng);
        let omega_b: Vec<ScalarElement> = (0..n).map(|_| group.random_scalar(rng)).collect();
        let omega_e: Vec<ScalarElement> = (0..n).map(|_| group.random_scalar(rng)).collect();

        let blinded_generators = generators
            .par_iter()
            .zip(omega_e.par_iter())
            .map(|(h, w)| group.exp(h, w))
            .reduce(|| group.identity(), |x, y| group.mul(&x, &y));
        let a_prime = group.mul(&group.exp_g(&omega_a), &blinded_generators);

        let b_primes: Vec<GroupElement> = (0..n)
            .into_par_iter()
            .map(|i| {
                let anchor = if i == 0 { &generators[0] } else { &bridging[i - 1] };
                group.mul(&group.exp_g(&omega_b[i]), &group.exp(anchor, &omega_e[i]))
            })
            .collect();
        let c_prime = group.exp_g(&omega_c);
        let d_prime = group.exp_g(&omega_d);

        let commitment_encoding =
            offline_commitment_string(&a_prime, &b_primes, &c_prime, &d_prime);
        let challenge = offline_challenge(
            public_key,
            generators,
            commitment,
            &bridging,
            &e_values,
            &commitment_encoding,
            prover_id,
            group,
        );

        let k_a = group.scalar_add(&omega_a, &group.scalar_mul(&challenge, &a));
        let k_b: Vec<ScalarElement> = (0..n)
            .map(|i| group.scalar_add(&omega_b[i], &group.scalar_mul(&challenge, &b[i])))
            .collect();
        let k_c = group.scalar_add(&omega_c, &group.scalar_mul(&challenge, &c_bar));
        let k_d = group.scalar_add(&omega_d, &group.scalar_mul(&challenge, &d));
        let k_e: Vec<ScalarElement> = (0..n)
            .map(|i| group.scalar_add(&omega_e[i], &group.scalar_mul(&challenge, &permuted_e[i])))
            .collect();

        Ok(PermutationProof {
            e_values,
            bridging_commitments: bridging,
            a_prime,
            b_primes,
            c_prime,
            d_prime,
            challenge,
            k_a,
            k_b,
            k_c,
            k_d,
            k_e,
        })
    }

    pub fn verify(
        &self,
        commitment: &PermutationCommitment,
        generators: &[GroupElement],
        public_key: &GroupElement,
        prover_id: &str,
        settings: &CryptoSettings,
    ) -> Result<(), ProofError> {
        let group = settings.group.as_ref();
        let n = commitment.len();
        if n == 0
            || generators.len() != n
            || self.e_values.len() != n
            || self.bridging_commitments.len() != n
            || self.b_primes.len() != n
            || self.k_b.len() != n
            || self.k_e.len() != n
        {
            return Err(ProofError::VerificationFailed);
        }

        let expected_e = offline_transcript(public_key, generators, commitment)
            .index_generator(prover_id)
            .scalars(n, group);
        if expected_e != self.e_values {
            return Err(ProofError::VerificationFailed);
        }

        let commitment_encoding =
            offline_commitment_string(&self.a_prime, &self.b_primes, &self.c_prime, &self.d_prime);
        let challenge = offline_challenge(
            public_key,
            generators,
            commitment,
            &self.bridging_commitments,
            &self.e_values,
            &commitment_encoding,
            prover_id,
            group,
        );
        if challenge != self.challenge {
            return Err(ProofError::VerificationFailed);
        }

        // prod c_i^{e_i} relation
        let weighted_commitments = commitment
            .elements
            .par_iter()
            .zip(self.e_values.par_iter())
            .map(|(c, e)| group.exp(c, e))
            .reduce(|| group.identity(), |x, y| group.mul(&x, &y));
        let lhs = group.mul(
            &group.exp(&weighted_commitments, &self.challenge),
            &self.a_prime,
        );
        let responded_generators = generators
            .par_iter()
            .zip(self.k_e.par_iter())
            .map(|(h, k)| group.exp(h, k))
            .reduce(|| group.identity(), |x, y| group.mul(&x, &y));
        let rhs = group.mul(&group.exp_g(&self.k_a), &responded_generators);
        if lhs != rhs {
            return Err(ProofError::VerificationFailed);
        }

        // bridging chain relations
        let chain_ok = (0..n).into_par_iter().all(|i| {
            let anchor = if i == 0 {
                &generators[0]
            } else {
                &self.bridging_commitments[i - 1]
            };
            let lhs = group.mul(
                &group.exp(&self.bridging_commitments[i], &self.challenge),
                &self.b_primes[i],
            );
            let rhs = group.mul(&group.exp_g(&self.k_b[i]), &group.exp(anchor, &self.k_e[i]));
            lhs == rhs
        });
        if !chain_ok {
            return Err(ProofError::VerificationFailed);
        }

        // commitment randomness sum relation
        let commitment_product = commitment
            .elements
            .iter()
            .fold(group.identity(), |acc, c| group.mul(&acc, c));
        let generator_product = generators
            .iter()
            .fold(group.identity(), |acc, h| group.mul(&acc, h));
        let sum_statement = group.mul(&commitment_product, &group.invert(&generator_product));
        let lhs = group.mul(&group.exp(&sum_statement, &self.challenge), &self.c_prime);
        if lhs != group.exp_g(&self.k_c) {
            return Err(ProofError::VerificationFailed);
        }

        // telescoped chain end relation
        let e_product = self
            .e_values
            .iter()
            .fold(group.scalar_one(), |acc, e| group.scalar_mul(&acc, e));
        let chain_statement = group.mul(
            &self.bridging_commitments[n - 1],
            &group.invert(&group.exp(&generators[0], &e_product)),
        );
        let lhs = group.mul(&group.exp(&chain_statement, &self.challenge), &self.d_prime);
        if lhs != group.exp_g(&self.k_d) {
            return Err(ProofError::VerificationFailed);
        }

        Ok(())
    }

    pub fn to_dto(&self) -> PermutationProofDTO {
        let commitment = offline_commitment_string(
            &self.a_prime,
            &self.b_primes,
            &self.c_prime,
            &self.d_prime,
        );
        let response = encoding::tuple([
            self.k_a.to_decimal(),
            encoding::tuple(self.k_b.iter().map(|k| k.to_decimal())),
            self.k_c.to_decimal(),
            self.k_d.to_decimal(),
            encoding::tuple(self.k_e.iter().map(|k| k.to_decimal())),
        ]);
        PermutationProofDTO {
            proof: SigmaProofDTO {
                commitment,
                challenge: self.challenge.to_decimal(),
                response,
            },
            bridging_commitments: self
                .bridging_commitments
                .par_iter()
                .map(|b| b.to_decimal())
                .collect(),
            e_values: self.e_values.par_iter().map(|e| e.to_decimal()).collect(),
        }
    }

    pub fn from_dto(
        dto: &PermutationProofDTO,
        settings: &CryptoSettings,
    ) -> Result<Self, MixnetError> {
        let group = settings.group.as_ref();
        let commitment_parts = encoding::split_tuple_exact(&dto.proof.commitment, 4)?;
        let response_parts = encoding::split_tuple_exact(&dto.proof.response, 5)?;
        Ok(PermutationProof {
            e_values: decode_scalars(&dto.e_values, group)?,
            bridging_commitments: decode_elements(&dto.bridging_commitments, group)?,
            a_prime: group.element_from_decimal(&commitment_parts[0])?,
            b_primes: decode_elements(&encoding::split_tuple(&commitment_parts[1])?, group)?,
            c_prime: group.element_from_decimal(&commitment_parts[2])?,
            d_prime: group.element_from_decimal(&commitment_parts[3])?,
            challenge: group.scalar_from_decimal(&dto.proof.challenge)?,
            k_a: group.scalar_from_decimal(&response_parts[0])?,
            k_b: decode_scalars(&encoding::split_tuple(&response_parts[1])?, group)?,
            k_c: group.scalar_from_decimal(&response_parts[2])?,
            k_d: group.scalar_from_decimal(&response_parts[3])?,
            k_e: decode_scalars(&encoding::split_tuple(&response_parts[4])?, group)?,
        })
    }
}

/// Online argument that the shuffled batch is a re-encryption of the
/// input batch under the committed permutation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MixProof {
    pub e_values: Vec<ScalarElement>,
    pub a_prime: GroupElement,
    pub f_prime: ElGamalCiphertext,
    pub challenge: ScalarElement,
    pub k_a: ScalarElement,
    pub k_f: ScalarElement,
    pub k_e: Vec<ScalarElement>,
}

impl MixProof {
    #[allow(clippy::too_many_arguments)]
    pub fn generate<R>(
        data: &PermutationData,
        reencryption: &[ScalarElement],
        commitment: &PermutationCommitment,
        generators: &[GroupElement],
        public_key: &GroupElement,
        votes: &[ElGamalCiphertext],
        shuffled: &[ElGamalCiphertext],
        prover_id: &str,
        settings: &CryptoSettings,
        rng: &mut R,
    ) -> Result<Self, ProofError>
    where
        R: CryptoRng + RngCore,
    {
        let n = data.len();
        if n == 0
            || reencryption.len() != n
            || commitment.len() != n
            || generators.len() != n
            || votes.len() != n
            || shuffled.len() != n
        {
            return Err(ProofError::GenerationFailed {
                subproof: "mix",
                reason: "inconsistent arities across witness and statement".to_string(),
            });
        }
        let group = settings.group.as_ref();
        let permutation = data.permutation();
        let randomness = data.randomness();

        let e_values =
            online_transcript(public_key, generators, commitment, votes, shuffled)
                .index_generator(prover_id)
                .scalars(n, group);
        let permuted_e: Vec<ScalarElement> = (0..n)
            .map(|i| e_values[permutation.preimage_of(i)].clone())
            .collect();

        let a = (0..n).fold(group.scalar_zero(), |acc, i| {
            group.scalar_add(&acc, &group.scalar_mul(&randomness[i], &e_values[i]))
        });
        let f = (0..n).fold(group.scalar_zero(), |acc, i| {
            group.scalar_add(&acc, &group.scalar_mul(&permuted_e[i], &reencryption[i]))
        });

        let omega_a = group.random_scalar(rng);
        let omega_f = group.random_scalar(rng);
        let omega_e: Vec<ScalarElement> = (0..n).map(|_| group.random_scalar(rng)).collect();

        let blinded_generators = generators
            .par_iter()
            .zip(omega_e.par_iter())
            .map(|(h, w)| group.exp(h, w))
            .reduce(|| group.identity(), |x, y| group.mul(&x, &y));
        let a_prime = group.mul(&group.exp_g(&omega_a), &blinded_generators);

        let (blinded_a, blinded_b) = weighted_ciphertext_product(shuffled, &omega_e, group);
        let neg_omega_f = group.scalar_neg(&omega_f);
        let f_prime = ElGamalCiphertext {
            a: group.mul(&group.exp_g(&neg_omega_f), &blinded_a),
            b: group.mul(&group.exp(public_key, &neg_omega_f), &blinded_b),
        };

        let commitment_encoding = online_commitment_string(&a_prime, &f_prime);
        let challenge = online_challenge(
            public_key,
            generators,
            commitment,
            votes,
            shuffled,
            &e_values,
            &commitment_encoding,
            prover_id,
            group,
        );

        let k_a = group.scalar_add(&omega_a, &group.scalar_mul(&challenge, &a));
        let k_f = group.scalar_add(&omega_f, &group.scalar_mul(&challenge, &f));
        let k_e: Vec<ScalarElement> = (0..n)
            .map(|i| group.scalar_add(&omega_e[i], &group.scalar_mul(&challenge, &permuted_e[i])))
            .collect();

        Ok(MixProof {
            e_values,
            a_prime,
            f_prime,
            challenge,
            k_a,
            k_f,
            k_e,
        })
    }

    pub fn verify(
        &self,
        commitment: &PermutationCommitment,
        generators: &[GroupElement],
        public_key: &GroupElement,
        votes: &[ElGamalCiphertext],
        shuffled: &[ElGamalCiphertext],
        prover_id: &str,
        settings: &CryptoSettings,
    ) -> Result<(), ProofError> {
        let group = settings.group.as_ref();
        let n = commitment.len();
        if n == 0
            || generators.len() != n
            || votes.len() != n
            || shuffled.len() != n
            || self.e_values.len() != n
            || self.k_e.len() != n
        {
            return Err(ProofError::VerificationFailed);
        }

        let expected_e =
            online_transcript(public_key, generators, commitment, votes, shuffled)
                .index_generator(prover_id)
                .scalars(n, group);
        if expected_e != self.e_values {
            return Err(ProofError::VerificationFailed);
        }

        let commitment_encoding = online_commitment_string(&self.a_prime, &self.f_prime);
        let challenge = online_challenge(
            public_key,
            generators,
            commitment,
            votes,
            shuffled,
            &self.e_values,
            &commitment_encoding,
            prover_id,
            group,
        );
        if challenge != self.challenge {
            return Err(ProofError::VerificationFailed);
        }

        // commitment relation under the online challenges
        let weighted_commitments = commitment
            .elements
            .par_iter()
            .zip(self.e_values.par_iter())
            .map(|(c, e)| group.exp(c, e))
            .reduce(|| group.identity(), |x, y| group.mul(&x, &y));
        let lhs = group.mul(
            &group.exp(&weighted_commitments, &self.challenge),
            &self.a_prime,
        );
        let responded_generators = generators
            .par_iter()
            .zip(self.k_e.par_iter())
            .map(|(h, k)| group.exp(h, k))
            .reduce(|| group.identity(), |x, y| group.mul(&x, &y));
        let rhs = group.mul(&group.exp_g(&self.k_a), &responded_generators);
        if lhs != rhs {
            return Err(ProofError::VerificationFailed);
        }

        // ciphertext relation
        let (votes_a, votes_b) = weighted_ciphertext_product(votes, &self.e_values, group);
        let (shuffled_a, shuffled_b) = weighted_ciphertext_product(shuffled, &self.k_e, group);
        let neg_k_f = group.scalar_neg(&self.k_f);

        let lhs_a = group.mul(&group.exp(&votes_a, &self.challenge), &self.f_prime.a);
        let rhs_a = group.mul(&group.exp_g(&neg_k_f), &shuffled_a);
        if lhs_a != rhs_a {
            return Err(ProofError::VerificationFailed);
        }
        let lhs_b = group.mul(&group.exp(&votes_b, &self.challenge), &self.f_prime.b);
        let rhs_b = group.mul(&group.exp(public_key, &neg_k_f), &shuffled_b);
        if lhs_b != rhs_b {
            return Err(ProofError::VerificationFailed);
        }

        Ok(())
    }

    pub fn to_dto(&self) -> MixProofDTO {
        let commitment = online_commitment_string(&self.a_prime, &self.f_prime);
        let response = encoding::tuple([
            self.k_a.to_decimal(),
            self.k_f.to_decimal(),
            encoding::tuple(self.k_e.iter().map(|k| k.to_decimal())),
        ]);
        MixProofDTO {
            proof: SigmaProofDTO {
                commitment,
                challenge: self.challenge.to_decimal(),
                response,
            },
            e_values: self.e_values.par_iter().map(|e| e.to_decimal()).collect(),
        }
    }

    pub fn from_dto(dto: &MixProofDTO, settings: &CryptoSettings) -> Result<Self, MixnetError> {
        let group = settings.group.as_ref();
        let commitment_parts = encoding::split_tuple_exact(&dto.proof.commitment, 2)?;
        let response_parts = encoding::split_tuple_exact(&dto.proof.response, 3)?;
        Ok(MixProof {
            e_values: decode_scalars(&dto.e_values, group)?,
            a_prime: group.element_from_decimal(&commitment_parts[0])?,
            f_prime: ElGamalCiphertext::from_canonical_string(&commitment_parts[1], group)?,
            challenge: group.scalar_from_decimal(&dto.proof.challenge)?,
            k_a: group.scalar_from_decimal(&response_parts[0])?,
            k_f: group.scalar_from_decimal(&response_parts[1])?,
            k_e: decode_scalars(&encoding::split_tuple(&response_parts[2])?, group)?,
        })
    }
}

/// Re-encrypt and permute a batch: output slot `i` holds
/// `ReEnc(V_{pi^-1(i)}; s_i)`.
pub fn re_encrypt_batch(
    votes: &[ElGamalCiphertext],
    permutation: &Permutation,
    reencryption: &[ScalarElement],
    public_key: &GroupElement,
    group: &SchnorrGroup,
) -> Vec<ElGamalCiphertext> {
    (0..votes.len())
        .into_par_iter()
        .map(|i| {
            votes[permutation.preimage_of(i)].re_encrypt(&reencryption[i], public_key, group)
        })
        .collect()
}

fn weighted_ciphertext_product(
    ciphertexts: &[ElGamalCiphertext],
    weights: &[ScalarElement],
    group: &SchnorrGroup,
) -> (GroupElement, GroupElement) {
    ciphertexts
        .par_iter()
        .zip(weights.par_iter())
        .map(|(v, w)| (group.exp(&v.a, w), group.exp(&v.b, w)))
        .reduce(
            || (group.identity(), group.identity()),
            |(xa, xb), (ya, yb)| (group.mul(&xa, &ya), group.mul(&xb, &yb)),
        )
}

fn decode_elements(parts: &[String], group: &SchnorrGroup) -> Result<Vec<GroupElement>, MixnetError> {
    parts
        .iter()
        .map(|part| group.element_from_decimal(part))
        .collect()
}

fn decode_scalars(parts: &[String], group: &SchnorrGroup) -> Result<Vec<ScalarElement>, MixnetError> {
    parts
        .iter()
        .map(|part| group.scalar_from_decimal(part))
        .collect()
}

fn offline_transcript(
    public_key: &GroupElement,
    generators: &[GroupElement],
    commitment: &PermutationCommitment,
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.absorb(&public_key.to_decimal());
    ctx.absorb(&encoding::tuple(generators.iter().map(|h| h.to_decimal())));
    ctx.absorb(&commitment.to_canonical_string());
    ctx
}

#[allow(clippy::too_many_arguments)]
fn offline_challenge(
    public_key: &GroupElement,
    generators: &[GroupElement],
    commitment: &PermutationCommitment,
    bridging: &[GroupElement],
    e_values: &[ScalarElement],
    commitment_encoding: &str,
    prover_id: &str,
    group: &SchnorrGroup,
) -> ScalarElement {
    let mut ctx = offline_transcript(public_key, generators, commitment);
    ctx.absorb(&encoding::tuple(bridging.iter().map(|b| b.to_decimal())));
    ctx.absorb(&encoding::tuple(e_values.iter().map(|e| e.to_decimal())));
    ctx.absorb(commitment_encoding);
    ctx.challenge(prover_id, group)
}

fn offline_commitment_string(
    a_prime: &GroupElement,
    b_primes: &[GroupElement],
    c_prime: &GroupElement,
    d_prime: &GroupElement,
) -> String {
    encoding::tuple([
        a_prime.to_decimal(),
        encoding::tuple(b_primes.iter().map(|b| b.to_decimal())),
        c_prime.to_decimal(),
        d_prime.to_decimal(),
    ])
}

fn online_transcript(
    public_key: &GroupElement,
    generators: &[GroupElement],
    commitment: &PermutationCommitment,
    votes: &[ElGamalCiphertext],
    shuffled: &[ElGamalCiphertext],
) -> ChallengeContext {
    let mut ctx = offline_transcript(public_key, generators, commitment);
    ctx.absorb(&encoding::tuple(
        votes.iter().map(|v| v.to_canonical_string()),
    ));
    ctx.absorb(&encoding::tuple(
        shuffled.iter().map(|v| v.to_canonical_string()),
    ));
    ctx
}

#[allow(clippy::too_many_arguments)]
fn online_challenge(
    public_key: &GroupElement,
    generators: &[GroupElement],
    commitment: &PermutationCommitment,
    votes: &[ElGamalCiphertext],
    shuffled: &[ElGamalCiphertext],
    e_values: &[ScalarElement],
    commitment_encoding: &str,
    prover_id: &str,
    group: &SchnorrGroup,
) -> ScalarElement {
    let mut ctx = online_transcript(public_key, generators, commitment, votes, shuffled);
    ctx.absorb(&encoding::tuple(e_values.iter().map(|e| e.to_decimal())));
    ctx.absorb(commitment_encoding);
    ctx.challenge(prover_id, group)
}

fn online_commitment_string(a_prime: &GroupElement, f_prime: &ElGamalCiphertext) -> String {
    encoding::tuple([a_prime.to_decimal(), f_prime.to_canonical_string()])
}
