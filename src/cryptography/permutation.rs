//! Permutations, commitments to permutations, and the private data
//! linking the offline and online mixing phases.

use rand::seq::SliceRandom;
use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::cryptography::encoding;
use crate::errors::MixnetError;
use crate::groups::{GroupElement, ScalarElement, SchnorrGroup};

/// A bijection on `{0, .., n-1}` with its inverse, both in one-line
/// notation.
#[derive(Clone, Debug, Eq, PartialEq, Zeroize)]
pub struct Permutation {
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Draw a permutation uniformly with Fisher-Yates.
    pub fn generate<R>(size: usize, rng: &mut R) -> Self
    where
        R: CryptoRng + RngCore,
    {
        let mut forward: Vec<usize> = (0..size).collect();
        forward.shuffle(rng);
        Self::from_forward(forward)
    }

    fn from_forward(forward: Vec<usize>) -> Self {
        let mut inverse = vec![0usize; forward.len()];
        for (i, &v) in forward.iter().enumerate() {
            inverse[v] = i;
        }
        Permutation { forward, inverse }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The image `pi(i)`.
    pub fn image_of(&self, index: usize) -> usize {
        self.forward[index]
    }

    /// The preimage `pi^-1(i)`.
    pub fn preimage_of(&self, index: usize) -> usize {
        self.inverse[index]
    }
}

/// A commitment to a permutation under the reproducible generator
/// family: component `i` is `g^{r_i} * h_{pi(i)}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PermutationCommitment {
    pub elements: Vec<GroupElement>,
}

impl PermutationCommitment {
    /// Commit to the permutation in `data` under `generators`.
    pub fn commit(
        data: &PermutationData,
        generators: &[GroupElement],
        group: &SchnorrGroup,
    ) -> Self {
        let elements = data
            .randomness
            .par_iter()
            .enumerate()
            .map(|(i, r)| {
                let blinded = group.exp_g(r);
                group.mul(&blinded, &generators[data.permutation.image_of(i)])
            })
            .collect();
        PermutationCommitment { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Canonical tuple encoding of the commitment vector.
    pub fn to_canonical_string(&self) -> String {
        encoding::tuple(self.elements.iter().map(|e| e.to_decimal()))
    }

    pub fn from_canonical_string(
        encoding_str: &str,
        group: &SchnorrGroup,
    ) -> Result<Self, MixnetError> {
        let elements = encoding::split_tuple(encoding_str)?
            .iter()
            .map(|part| group.element_from_decimal(part))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PermutationCommitment { elements })
    }
}

/// The private link between the offline and online phases: the
/// permutation and the commitment randomness. Zeroized in place on
/// drop; never part of a transport DTO.
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct PermutationData {
    permutation: Permutation,
    randomness: Vec<ScalarElement>,
}

impl PermutationData {
    pub fn new(permutation: Permutation, randomness: Vec<ScalarElement>) -> Self {
        debug_assert_eq!(permutation.len(), randomness.len());
        PermutationData {
            permutation,
            randomness,
        }
    }

    pub fn generate<R>(size: usize, group: &SchnorrGroup, rng: &mut R) -> Self
    where
        R: CryptoRng + RngCore,
    {
        let permutation = Permutation::generate(size, rng);
        let randomness = (0..size).map(|_| group.random_scalar(rng)).collect();
        PermutationData {
            permutation,
            randomness,
        }
    }

    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn randomness(&self) -> &[ScalarElement] {
        &self.randomness
    }

    /// Opt-in serialized form for storage between the phases.
    pub fn to_stored(&self) -> StoredPermutationData {
        StoredPermutationData {
            permutation: self.permutation.forward.clone(),
            randomness: self.randomness.iter().map(|r| r.to_decimal()).collect(),
        }
    }

    pub fn from_stored(
        stored: &StoredPermutationData,
        group: &SchnorrGroup,
    ) -> Result<Self, MixnetError> {
        let size = stored.permutation.len();
        if stored.randomness.len() != size {
            return Err(MixnetError::EncodingFailure(
                "stored permutation and randomness lengths differ".to_string(),
            ));
        }
        let mut seen = vec![false; size];
        for &v in &stored.permutation {
            if v >= size || seen[v] {
                return Err(MixnetError::EncodingFailure(
                    "stored permutation is not a bijection".to_string(),
                ));
            }
            seen[v] = true;
        }
        let randomness = stored
            .randomness
            .iter()
            .map(|r| group.scalar_from_decimal(r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PermutationData {
            permutation: Permutation::from_forward(stored.permutation.clone()),
            randomness,
        })
    }
}

/// Storage form of [`PermutationData`], kept out of the transport DTOs.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StoredPermutationData {
    pub permutation: Vec<usize>,
    pub randomness: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::testing::tiny_group;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn generation_and_inverse() {
        let mut rng = ChaCha20Rng::from_seed([12u8; 32]);
        let size = 10;
        let perm = Permutation::generate(size, &mut rng);

        let mut sorted = perm.forward.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..size).collect::<Vec<_>>());

        for i in 0..size {
            assert_eq!(perm.image_of(perm.preimage_of(i)), i);
            assert_eq!(perm.preimage_of(perm.image_of(i)), i);
        }
    }

    #[test]
    fn empty_permutation() {
        let mut rng = ChaCha20Rng::from_seed([13u8; 32]);
        let perm = Permutation::generate(0, &mut rng);
        assert_eq!(perm.len(), 0);
        assert!(perm.is_empty());
    }

    #[test]
    fn commitment_matches_definition() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([14u8; 32]);
        let data = PermutationData::generate(6, &group, &mut rng);
        let generators = group.independent_generators(6);
        let commitment = PermutationCommitment::commit(&data, &generators, &group);
        for i in 0..6 {
            let expected = group.mul(
                &group.exp_g(&data.randomness()[i]),
                &generators[data.permutation().image_of(i)],
            );
            assert_eq!(commitment.elements[i], expected);
        }
    }

    #[test]
    fn commitment_encoding_round_trip() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([15u8; 32]);
        let data = PermutationData::generate(4, &group, &mut rng);
        let generators = group.independent_generators(4);
        let commitment = PermutationCommitment::commit(&data, &generators, &group);
        let encoded = commitment.to_canonical_string();
        let decoded = PermutationCommitment::from_canonical_string(&encoded, &group).unwrap();
        assert_eq!(decoded, commitment);
    }

    #[test]
    fn stored_form_round_trip() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([16u8; 32]);
        let data = PermutationData::generate(5, &group, &mut rng);
        let stored = data.to_stored();
        let restored = PermutationData::from_stored(&stored, &group).unwrap();
        assert_eq!(restored.permutation(), data.permutation());
        assert_eq!(restored.randomness(), data.randomness());

        let mut corrupted = stored.clone();
        corrupted.permutation[0] = corrupted.permutation[1];
        assert!(PermutationData::from_stored(&corrupted, &group).is_err());
    }
}
