//! Non-interactive Zero Knowledge proof of equality of preimages under
//! two one-way homomorphisms sharing one witness.
//!
//! The proof is the following:
//!
//! `NIZK{(y, (a_i), (d_i)), (x): y = g^x AND d_i = f(a_i, x) for all i}`
//!
//! where `f(a, x) = a^x` in direct form and `f(a, x) = (a^x)^-1` in
//! inverted form. The inverted form covers partial decryptions that are
//! emitted pre-inverted so that reconstruction multiplies them
//! directly.

use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;

use crate::cryptography::challenge_context::ChallengeContext;
use crate::cryptography::encoding;
use crate::errors::{MixnetError, ProofError};
use crate::groups::{CryptoSettings, GroupElement, ScalarElement};
use crate::trustee::dto::SigmaProofDTO;

/// Shape of the second homomorphism.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointMap {
    /// `d_i = a_i^x`
    Direct,
    /// `d_i = (a_i^x)^-1`
    Inverted,
}

/// Proof of equality of preimages across `g` and a vector of bases.
///
/// The commitment is the pair `(t_1, (t_2i))` with `t_1 = g^s` and
/// `t_2i` the image of `s` under the per-base homomorphism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlEqualityZkp {
    pub base_commitment: GroupElement,
    pub point_commitments: Vec<GroupElement>,
    pub challenge: ScalarElement,
    pub response: ScalarElement,
}

impl DlEqualityZkp {
    /// Generate the proof. `points` must hold `f(bases_i, witness)` for
    /// the given map, and `public_key` must equal `g^witness`.
    pub fn generate<R>(
        witness: &ScalarElement,
        public_key: &GroupElement,
        bases: &[GroupElement],
        points: &[GroupElement],
        map: PointMap,
        prover_id: &str,
        settings: &CryptoSettings,
        rng: &mut R,
    ) -> Result<Self, ProofError>
    where
        R: CryptoRng + RngCore,
    {
        if bases.len() != points.len() {
            return Err(ProofError::GenerationFailed {
                subproof: "dl_equality",
                reason: format!(
                    "{} bases against {} points",
                    bases.len(),
                    points.len()
                ),
            });
        }
        let group = settings.group.as_ref();
        let s = group.random_scalar(rng);
        let base_commitment = group.exp_g(&s);
        let point_commitments: Vec<GroupElement> = bases
            .par_iter()
            .map(|base| {
                let raised = group.exp(base, &s);
                match map {
                    PointMap::Direct => raised,
                    PointMap::Inverted => group.invert(&raised),
                }
            })
            .collect();

        let commitment_encoding =
            commitment_string(&base_commitment, &point_commitments);
        let challenge = transcript(public_key, points, &commitment_encoding)
            .challenge(prover_id, group);
        let response = group.scalar_add(&s, &group.scalar_mul(&challenge, witness));

        Ok(DlEqualityZkp {
            base_commitment,
            point_commitments,
            challenge,
            response,
        })
    }

    /// Verify the proof against the public statement.
    pub fn verify(
        &self,
        public_key: &GroupElement,
        bases: &[GroupElement],
        points: &[GroupElement],
        map: PointMap,
        prover_id: &str,
        settings: &CryptoSettings,
    ) -> Result<(), ProofError> {
        let group = settings.group.as_ref();
        if bases.len() != points.len() || self.point_commitments.len() != points.len() {
            return Err(ProofError::VerificationFailed);
        }
        let commitment_encoding =
            commitment_string(&self.base_commitment, &self.point_commitments);
        let challenge = transcript(public_key, points, &commitment_encoding)
            .challenge(prover_id, group);
        if challenge != self.challenge {
            return Err(ProofError::VerificationFailed);
        }

        let lhs = group.exp_g(&self.response);
        let rhs = group.mul(
            &self.base_commitment,
            &group.exp(public_key, &self.challenge),
        );
        if lhs != rhs {
            return Err(ProofError::VerificationFailed);
        }

        let pointwise_ok = bases
            .par_iter()
            .zip(points.par_iter())
            .zip(self.point_commitments.par_iter())
            .all(|((base, point), commitment)| {
                let raised = group.exp(base, &self.response);
                let lhs = match map {
                    PointMap::Direct => raised,
                    PointMap::Inverted => group.invert(&raised),
                };
                let rhs = group.mul(commitment, &group.exp(point, &self.challenge));
                lhs == rhs
            });
        if pointwise_ok {
            Ok(())
        } else {
            Err(ProofError::VerificationFailed)
        }
    }

    /// The canonical encoding of the commitment pair.
    pub fn commitment_string(&self) -> String {
        commitment_string(&self.base_commitment, &self.point_commitments)
    }

    pub fn to_dto(&self) -> SigmaProofDTO {
        SigmaProofDTO {
            commitment: self.commitment_string(),
            challenge: self.challenge.to_decimal(),
            response: self.response.to_decimal(),
        }
    }

    pub fn from_dto(dto: &SigmaProofDTO, settings: &CryptoSettings) -> Result<Self, MixnetError> {
        let group = settings.group.as_ref();
        let outer = encoding::split_tuple_exact(&dto.commitment, 2)?;
        let base_commitment = group.element_from_decimal(&outer[0])?;
        let point_commitments = encoding::split_tuple(&outer[1])?
            .iter()
            .map(|part| group.element_from_decimal(part))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DlEqualityZkp {
            base_commitment,
            point_commitments,
            challenge: group.scalar_from_decimal(&dto.challenge)?,
            response: group.scalar_from_decimal(&dto.response)?,
        })
    }
}

fn commitment_string(base: &GroupElement, points: &[GroupElement]) -> String {
    let inner = encoding::tuple(points.iter().map(|p| p.to_decimal()));
    encoding::tuple([base.to_decimal(), inner])
}

fn transcript(
    public_key: &GroupElement,
    points: &[GroupElement],
    commitment_encoding: &str,
) -> ChallengeContext {
    let mut ctx = ChallengeContext::new();
    ctx.absorb(&public_key.to_decimal());
    ctx.absorb(&encoding::tuple(points.iter().map(|p| p.to_decimal())));
    ctx.absorb(commitment_encoding);
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::SchnorrGroup;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn settings() -> CryptoSettings {
        CryptoSettings::new(SchnorrGroup::modp_768())
    }

    fn statement(
        settings: &CryptoSettings,
        map: PointMap,
        rng: &mut ChaCha20Rng,
    ) -> (ScalarElement, GroupElement, Vec<GroupElement>, Vec<GroupElement>) {
        let group = settings.group.as_ref();
        let x = group.random_scalar(rng);
        let y = group.exp_g(&x);
        let bases: Vec<GroupElement> = (0..4)
            .map(|_| group.exp_g(&group.random_scalar(rng)))
            .collect();
        let points: Vec<GroupElement> = bases
            .iter()
            .map(|base| {
                let raised = group.exp(base, &x);
                match map {
                    PointMap::Direct => raised,
                    PointMap::Inverted => group.invert(&raised),
                }
            })
            .collect();
        (x, y, bases, points)
    }

    #[test]
    fn direct_map_round_trip() {
        let settings = settings();
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let (x, y, bases, points) = statement(&settings, PointMap::Direct, &mut rng);
        let proof = DlEqualityZkp::generate(
            &x, &y, &bases, &points, PointMap::Direct, "T1", &settings, &mut rng,
        )
        .unwrap();
        assert!(proof
            .verify(&y, &bases, &points, PointMap::Direct, "T1", &settings)
            .is_ok());
        // the map is part of the statement
        assert!(proof
            .verify(&y, &bases, &points, PointMap::Inverted, "T1", &settings)
            .is_err());
        assert!(proof
            .verify(&y, &bases, &points, PointMap::Direct, "T2", &settings)
            .is_err());
    }

    #[test]
    fn inverted_map_round_trip() {
        let settings = settings();
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        let (x, y, bases, points) = statement(&settings, PointMap::Inverted, &mut rng);
        let proof = DlEqualityZkp::generate(
            &x, &y, &bases, &points, PointMap::Inverted, "T1", &settings, &mut rng,
        )
        .unwrap();
        assert!(proof
            .verify(&y, &bases, &points, PointMap::Inverted, "T1", &settings)
            .is_ok());
    }

    #[test]
    fn rejects_wrong_points() {
        let settings = settings();
        let group = settings.group.clone();
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let (x, y, bases, mut points) = statement(&settings, PointMap::Direct, &mut rng);
        let proof = DlEqualityZkp::generate(
            &x, &y, &bases, &points, PointMap::Direct, "T1", &settings, &mut rng,
        )
        .unwrap();
        points[2] = group.exp_g(&group.random_scalar(&mut rng));
        assert!(proof
            .verify(&y, &bases, &points, PointMap::Direct, "T1", &settings)
            .is_err());
    }

    #[test]
    fn rejects_length_mismatch() {
        let settings = settings();
        let mut rng = ChaCha20Rng::from_seed([10u8; 32]);
        let (x, y, bases, points) = statement(&settings, PointMap::Direct, &mut rng);
        let result = DlEqualityZkp::generate(
            &x,
            &y,
            &bases[..3],
            &points,
            PointMap::Direct,
            "T1",
            &settings,
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(ProofError::GenerationFailed { .. })
        ));
    }

    #[test]
    fn serialisation() {
        let settings = settings();
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        let (x, y, bases, points) = statement(&settings, PointMap::Direct, &mut rng);
        let proof = DlEqualityZkp::generate(
            &x, &y, &bases, &points, PointMap::Direct, "T1", &settings, &mut rng,
        )
        .unwrap();
        let dto = proof.to_dto();
        let restored = DlEqualityZkp::from_dto(&dto, &settings).unwrap();
        assert_eq!(restored, proof);
        assert!(restored
            .verify(&y, &bases, &points, PointMap::Direct, "T1", &settings)
            .is_ok());
    }
}
