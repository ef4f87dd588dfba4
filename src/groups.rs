//! Safe-prime group backend. The group is the subgroup of quadratic
//! residues of `(Z/pZ)*` with `p = 2q + 1` and `p`, `q` prime, so the
//! subgroup has prime order `q`. Group elements and scalars are distinct
//! types with distinct rings of operations, which makes ill-typed
//! arithmetic unrepresentable.
//!
//! Canonical encodings are decimal: the representative in `[1, p)` for a
//! group element, and the representative in `[0, q)` for a scalar. These
//! encodings are the interoperability surface of every emitted artifact,
//! and they are also exactly what is fed to the challenge hash.

use blake2::{Blake2b512, Digest};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::sync::Arc;
use zeroize::Zeroize;

use crate::errors::MixnetError;

/// Number of Miller-Rabin rounds used when validating group parameters.
const PRIMALITY_ROUNDS: usize = 24;

/// A member of the prime-order subgroup, held as its canonical
/// representative in `[1, p)`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct GroupElement(BigUint);

impl GroupElement {
    /// Canonical decimal encoding.
    pub fn to_decimal(&self) -> String {
        self.0.to_str_radix(10)
    }
}

/// A member of the ring of integers modulo `q`, held as its canonical
/// representative in `[0, q)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScalarElement(BigUint);

impl ScalarElement {
    /// Canonical decimal encoding.
    pub fn to_decimal(&self) -> String {
        self.0.to_str_radix(10)
    }
}

impl Zeroize for ScalarElement {
    fn zeroize(&mut self) {
        let bits = self.0.bits();
        if bits == 0 {
            return;
        }
        // `BigUint` does not expose its limb buffer, so the wipe goes
        // through its in-place assign operators: force every limb to an
        // all-ones pattern of the same width, then subtract it away.
        // Both passes write the buffer in place (the widths match, so
        // neither reallocates) and the normalization after the
        // subtraction reads the zeroed limbs back, keeping the stores
        // observable.
        let mask = (BigUint::one() << bits) - 1u32;
        self.0 |= &mask;
        self.0 -= &mask;
    }
}

/// The subgroup of quadratic residues of `(Z/pZ)*` for a safe prime
/// `p = 2q + 1`, together with a generator `g` of order `q`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchnorrGroup {
    p: BigUint,
    q: BigUint,
    g: GroupElement,
}

impl SchnorrGroup {
    /// Validate the parameters and construct the group.
    ///
    /// Fails with [`MixnetError::InvalidGroupParameters`] unless
    /// `p = 2q + 1`, both `p` and `q` pass a Miller-Rabin primality
    /// test, `g` lies in `(1, p)` and `g^q = 1 mod p`.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self, MixnetError> {
        let one = BigUint::one();
        if p != (&q << 1u32) + &one {
            return Err(MixnetError::InvalidGroupParameters(
                "p is not equal to 2q + 1".to_string(),
            ));
        }
        if !is_probable_prime(&q) {
            return Err(MixnetError::InvalidGroupParameters(
                "q is not prime".to_string(),
            ));
        }
        if !is_probable_prime(&p) {
            return Err(MixnetError::InvalidGroupParameters(
                "p is not prime".to_string(),
            ));
        }
        if g <= one || g >= p {
            return Err(MixnetError::InvalidGroupParameters(
                "generator outside (1, p)".to_string(),
            ));
        }
        if !g.modpow(&q, &p).is_one() {
            return Err(MixnetError::InvalidGroupParameters(
                "generator does not have order q".to_string(),
            ));
        }
        Ok(SchnorrGroup {
            p,
            q,
            g: GroupElement(g),
        })
    }

    /// The 2048-bit MODP group of RFC 3526 (group 14). The modulus is a
    /// safe prime congruent to 7 mod 8, so 2 generates the subgroup of
    /// quadratic residues of order `q = (p - 1) / 2`.
    pub fn modp_2048() -> Self {
        let p = biguint_from_hex(MODP_2048_PRIME);
        let q = &p >> 1u32;
        SchnorrGroup::new(p, q, BigUint::from(2u32))
            .expect("RFC 3526 group 14 parameters are valid")
    }

    /// The 768-bit Oakley group of RFC 2409 (group 1). Too small for
    /// production elections; useful for interop exercises and tests.
    pub fn modp_768() -> Self {
        let p = biguint_from_hex(MODP_768_PRIME);
        let q = &p >> 1u32;
        SchnorrGroup::new(p, q, BigUint::from(2u32))
            .expect("RFC 2409 group 1 parameters are valid")
    }

    pub fn generator(&self) -> &GroupElement {
        &self.g
    }

    /// The multiplicative identity of the group.
    pub fn identity(&self) -> GroupElement {
        GroupElement(BigUint::one())
    }

    pub fn is_identity(&self, a: &GroupElement) -> bool {
        a.0.is_one()
    }

    pub fn mul(&self, a: &GroupElement, b: &GroupElement) -> GroupElement {
        GroupElement((&a.0 * &b.0) % &self.p)
    }

    pub fn exp(&self, base: &GroupElement, exponent: &ScalarElement) -> GroupElement {
        GroupElement(base.0.modpow(&exponent.0, &self.p))
    }

    /// `g^exponent` for the group generator.
    pub fn exp_g(&self, exponent: &ScalarElement) -> GroupElement {
        GroupElement(self.g.0.modpow(&exponent.0, &self.p))
    }

    /// The multiplicative inverse in `(Z/pZ)*`.
    pub fn invert(&self, a: &GroupElement) -> GroupElement {
        let two = BigUint::from(2u32);
        GroupElement(a.0.modpow(&(&self.p - two), &self.p))
    }

    /// Decode a canonical decimal encoding, rejecting representatives
    /// outside `[1, p)`.
    pub fn element_from_decimal(&self, encoding: &str) -> Result<GroupElement, MixnetError> {
        let value = BigUint::parse_bytes(encoding.as_bytes(), 10).ok_or_else(|| {
            MixnetError::EncodingFailure(format!("not a decimal group element: `{encoding}`"))
        })?;
        if value.is_zero() || value >= self.p {
            return Err(MixnetError::EncodingFailure(format!(
                "group element representative out of range: `{encoding}`"
            )));
        }
        if value.to_str_radix(10) != encoding {
            return Err(MixnetError::EncodingFailure(format!(
                "non-canonical group element encoding: `{encoding}`"
            )));
        }
        Ok(GroupElement(value))
    }

    pub fn scalar_zero(&self) -> ScalarElement {
        ScalarElement(BigUint::zero())
    }

    pub fn scalar_one(&self) -> ScalarElement {
        ScalarElement(BigUint::one())
    }

    pub fn scalar_from_u64(&self, value: u64) -> ScalarElement {
        ScalarElement(BigUint::from(value) % &self.q)
    }

    pub fn scalar_add(&self, a: &ScalarElement, b: &ScalarElement) -> ScalarElement {
        ScalarElement((&a.0 + &b.0) % &self.q)
    }

    pub fn scalar_mul(&self, a: &ScalarElement, b: &ScalarElement) -> ScalarElement {
        ScalarElement((&a.0 * &b.0) % &self.q)
    }

    /// The additive inverse modulo `q`.
    pub fn scalar_neg(&self, a: &ScalarElement) -> ScalarElement {
        if a.0.is_zero() {
            ScalarElement(BigUint::zero())
        } else {
            ScalarElement(&self.q - &a.0)
        }
    }

    /// The multiplicative inverse modulo `q`, when it exists.
    pub fn scalar_invert(&self, a: &ScalarElement) -> Option<ScalarElement> {
        if a.0.is_zero() {
            return None;
        }
        let two = BigUint::from(2u32);
        Some(ScalarElement(a.0.modpow(&(&self.q - two), &self.q)))
    }

    /// Uniform sample from `[0, q)`.
    pub fn random_scalar<R>(&self, rng: &mut R) -> ScalarElement
    where
        R: CryptoRng + RngCore,
    {
        ScalarElement(rng.gen_biguint_below(&self.q))
    }

    /// Decode a canonical decimal encoding, rejecting representatives
    /// outside `[0, q)`.
    pub fn scalar_from_decimal(&self, encoding: &str) -> Result<ScalarElement, MixnetError> {
        let value = BigUint::parse_bytes(encoding.as_bytes(), 10).ok_or_else(|| {
            MixnetError::EncodingFailure(format!("not a decimal scalar: `{encoding}`"))
        })?;
        if value >= self.q {
            return Err(MixnetError::EncodingFailure(format!(
                "scalar representative out of range: `{encoding}`"
            )));
        }
        if value.to_str_radix(10) != encoding {
            return Err(MixnetError::EncodingFailure(format!(
                "non-canonical scalar encoding: `{encoding}`"
            )));
        }
        Ok(ScalarElement(value))
    }

    /// Interpret a hash output as a scalar by reduction modulo `q`.
    pub(crate) fn scalar_from_digest(&self, digest: &[u8]) -> ScalarElement {
        ScalarElement(BigUint::from_bytes_be(digest) % &self.q)
    }

    /// A reproducible family of `count` generators of the subgroup,
    /// independent of `g` and of each other under the discrete logarithm
    /// assumption. Each is obtained by hashing a domain tag, the group
    /// modulus and the index, then squaring the digest into the
    /// quadratic-residue subgroup; the identity is skipped.
    ///
    /// Both prover and verifier must derive the family from the same
    /// group parameters.
    pub fn independent_generators(&self, count: usize) -> Vec<GroupElement> {
        (0..count)
            .into_par_iter()
            .map(|index| {
                let mut counter = 0u64;
                loop {
                    let mut hasher = Blake2b512::new();
                    hasher.update(b"mixnet/commitment-generator");
                    hasher.update(self.p.to_bytes_be());
                    hasher.update((index as u64).to_be_bytes());
                    hasher.update(counter.to_be_bytes());
                    let candidate = BigUint::from_bytes_be(&hasher.finalize()) % &self.p;
                    let square = (&candidate * &candidate) % &self.p;
                    if !square.is_zero() && !square.is_one() {
                        return GroupElement(square);
                    }
                    counter += 1;
                }
            })
            .collect()
    }
}

/// Immutable configuration shared by reference across all trustee
/// operations.
#[derive(Clone, Debug)]
pub struct CryptoSettings {
    pub group: Arc<SchnorrGroup>,
}

impl CryptoSettings {
    pub fn new(group: SchnorrGroup) -> Self {
        CryptoSettings {
            group: Arc::new(group),
        }
    }
}

fn biguint_from_hex(hex: &str) -> BigUint {
    let compact: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    BigUint::parse_bytes(compact.as_bytes(), 16).expect("well-formed hex constant")
}

/// Miller-Rabin with random bases.
fn is_probable_prime(n: &BigUint) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);
    if *n < two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if (n % 2u32).is_zero() {
        return false;
    }
    let n_minus_1 = n - &one;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;
    let mut rng = rand::rngs::OsRng;
    'witness: for _ in 0..PRIMALITY_ROUNDS {
        let a = rng.gen_biguint_range(&two, &n_minus_1);
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_1 {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

const MODP_2048_PRIME: &str = "\
    FFFFFFFF FFFFFFFF C90FDAA2 2168C234 C4C6628B 80DC1CD1 \
    29024E08 8A67CC74 020BBEA6 3B139B22 514A0879 8E3404DD \
    EF9519B3 CD3A431B 302B0A6D F25F1437 4FE1356D 6D51C245 \
    E485B576 625E7EC6 F44C42E9 A637ED6B 0BFF5CB6 F406B7ED \
    EE386BFB 5A899FA5 AE9F2411 7C4B1FE6 49286651 ECE45B3D \
    C2007CB8 A163BF05 98DA4836 1C55D39A 69163FA8 FD24CF5F \
    83655D23 DCA3AD96 1C62F356 208552BB 9ED52907 7096966D \
    670C354E 4ABC9804 F1746C08 CA18217C 32905E46 2E36CE3B \
    E39E772C 180E8603 9B2783A2 EC07A28F B5C55DF0 6F4C52C9 \
    DE2BCBF6 95581718 3995497C EA956AE5 15D22618 98FA0510 \
    15728E5A 8AACAA68 FFFFFFFF FFFFFFFF";

const MODP_768_PRIME: &str = "\
    FFFFFFFF FFFFFFFF C90FDAA2 2168C234 C4C6628B 80DC1CD1 \
    29024E08 8A67CC74 020BBEA6 3B139B22 514A0879 8E3404DD \
    EF9519B3 CD3A431B 302B0A6D F25F1437 4FE1356D 6D51C245 \
    E485B576 625E7EC6 F44C42E9 A63A3620 FFFFFFFF FFFFFFFF";

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A tiny safe-prime group for unit tests of the algebra and the
    /// encodings. Never use outside tests.
    pub(crate) fn tiny_group() -> SchnorrGroup {
        SchnorrGroup::new(
            BigUint::from(2039u32),
            BigUint::from(1019u32),
            BigUint::from(4u32),
        )
        .unwrap()
    }
}
