//! ElGamal over the safe-prime group, restricted to what the mix
//! network needs: key generation, encryption of group-encoded
//! messages, re-encryption, and decryption arithmetic. Ciphertexts are
//! pairs `(a, b) = (g^r, m * y^r)` under a public key `y`.

use rand_core::{CryptoRng, RngCore};

use crate::cryptography::encoding;
use crate::errors::MixnetError;
use crate::groups::{GroupElement, ScalarElement, SchnorrGroup};

/// ElGamal ciphertext, an ordered pair of group elements.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElGamalCiphertext {
    pub a: GroupElement,
    pub b: GroupElement,
}

impl ElGamalCiphertext {
    /// Canonical tuple encoding `"(a,b)"`.
    pub fn to_canonical_string(&self) -> String {
        encoding::tuple([self.a.to_decimal(), self.b.to_decimal()])
    }

    pub fn from_canonical_string(
        encoding_str: &str,
        group: &SchnorrGroup,
    ) -> Result<Self, MixnetError> {
        let parts = encoding::split_tuple_exact(encoding_str, 2)?;
        Ok(ElGamalCiphertext {
            a: group.element_from_decimal(&parts[0])?,
            b: group.element_from_decimal(&parts[1])?,
        })
    }

    /// Multiply by a fresh encryption of one, yielding a new ciphertext
    /// of the same plaintext: `(a * g^s, b * y^s)`.
    pub fn re_encrypt(
        &self,
        randomness: &ScalarElement,
        public_key: &GroupElement,
        group: &SchnorrGroup,
    ) -> Self {
        ElGamalCiphertext {
            a: group.mul(&self.a, &group.exp_g(randomness)),
            b: group.mul(&self.b, &group.exp(public_key, randomness)),
        }
    }
}

/// ElGamal keypair `(x, y)` with `y = g^x`.
#[derive(Clone, Debug)]
pub struct KeyPair {
    pub(crate) x: ScalarElement,
    pub y: GroupElement,
}

impl KeyPair {
    pub fn generate<R>(group: &SchnorrGroup, rng: &mut R) -> Self
    where
        R: CryptoRng + RngCore,
    {
        let x = group.random_scalar(rng);
        let y = group.exp_g(&x);
        KeyPair { x, y }
    }

    pub fn from_secret(x: ScalarElement, group: &SchnorrGroup) -> Self {
        let y = group.exp_g(&x);
        KeyPair { x, y }
    }

    pub fn secret(&self) -> &ScalarElement {
        &self.x
    }

    /// Decrypt `(a, b)` to the group-encoded message `b * (a^x)^-1`.
    pub fn decrypt(&self, cipher: &ElGamalCiphertext, group: &SchnorrGroup) -> GroupElement {
        let mask = group.exp(&cipher.a, &self.x);
        group.mul(&cipher.b, &group.invert(&mask))
    }
}

/// Encrypt a group-encoded message under `public_key` with the given
/// randomness.
pub fn encrypt_with_r(
    message: &GroupElement,
    randomness: &ScalarElement,
    public_key: &GroupElement,
    group: &SchnorrGroup,
) -> ElGamalCiphertext {
    ElGamalCiphertext {
        a: group.exp_g(randomness),
        b: group.mul(message, &group.exp(public_key, randomness)),
    }
}

/// Encrypt a group-encoded message under `public_key` with fresh
/// randomness.
pub fn encrypt<R>(
    message: &GroupElement,
    public_key: &GroupElement,
    group: &SchnorrGroup,
    rng: &mut R,
) -> ElGamalCiphertext
where
    R: CryptoRng + RngCore,
{
    let r = group.random_scalar(rng);
    encrypt_with_r(message, &r, public_key, group)
}

/// Combine trustee public shares into the joint election key, the
/// product of the shares.
pub fn combine_public_keys(shares: &[GroupElement], group: &SchnorrGroup) -> GroupElement {
    shares
        .iter()
        .fold(group.identity(), |acc, share| group.mul(&acc, share))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::testing::tiny_group;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    #[test]
    fn encrypt_decrypt() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        for n in 1..5u64 {
            let keypair = KeyPair::generate(&group, &mut rng);
            let m = group.exp_g(&group.scalar_from_u64(n * 24));
            let cipher = encrypt(&m, &keypair.y, &group, &mut rng);
            assert_eq!(keypair.decrypt(&cipher, &group), m);
        }
    }

    #[test]
    fn re_encrypt_preserves_plaintext() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        let keypair = KeyPair::generate(&group, &mut rng);
        let m = group.exp_g(&group.scalar_from_u64(77));
        let cipher = encrypt(&m, &keypair.y, &group, &mut rng);
        let s = group.random_scalar(&mut rng);
        let rerandomized = cipher.re_encrypt(&s, &keypair.y, &group);
        assert_eq!(keypair.decrypt(&rerandomized, &group), m);
    }

    #[test]
    fn ciphertext_encoding_round_trip() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let keypair = KeyPair::generate(&group, &mut rng);
        let m = group.exp_g(&group.scalar_from_u64(9));
        let cipher = encrypt(&m, &keypair.y, &group, &mut rng);
        let encoded = cipher.to_canonical_string();
        let decoded = ElGamalCiphertext::from_canonical_string(&encoded, &group).unwrap();
        assert_eq!(decoded, cipher);
        assert!(ElGamalCiphertext::from_canonical_string("(1,2,3)", &group).is_err());
    }

    #[test]
    fn joint_key_decrypts_with_summed_secret() {
        let group = tiny_group();
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        let k1 = KeyPair::generate(&group, &mut rng);
        let k2 = KeyPair::generate(&group, &mut rng);
        let joint_pk = combine_public_keys(&[k1.y.clone(), k2.y.clone()], &group);
        let joint = KeyPair::from_secret(group.scalar_add(k1.secret(), k2.secret()), &group);
        assert_eq!(joint.y, joint_pk);
        let m = group.exp_g(&group.scalar_from_u64(123));
        let cipher = encrypt(&m, &joint_pk, &group, &mut rng);
        assert_eq!(joint.decrypt(&cipher, &group), m);
    }
}
