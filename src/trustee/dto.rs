//! Structures related to the artifacts exchanged between trustees and
//! the election orchestration. Every field is a canonical string or an
//! array of canonical strings, so the JSON projection is stable across
//! implementations. The field order of the sigma triple is
//! `(commitment, challenge, response)` and never changes.

use serde::{Deserialize, Serialize};

/// A non-interactive sigma protocol transcript.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigmaProofDTO {
    pub commitment: String,
    pub challenge: String,
    pub response: String,
}

/// The offline permutation-commitment proof, with its bridging
/// commitments and per-index challenge values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermutationProofDTO {
    pub proof: SigmaProofDTO,
    pub bridging_commitments: Vec<String>,
    pub e_values: Vec<String>,
}

/// The online re-encryption proof, with its per-index challenge values.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixProofDTO {
    pub proof: SigmaProofDTO,
    pub e_values: Vec<String>,
}

/// The complete two-part shuffle proof together with the permutation
/// commitment both parts bind to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleProofDTO {
    pub mix_proof: MixProofDTO,
    pub permutation_proof: PermutationProofDTO,
    pub permutation_commitment: String,
}

/// A shuffled batch and its proof.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleResultDTO {
    pub shuffle_proof: ShuffleProofDTO,
    pub shuffled_votes: Vec<String>,
}

/// A trustee's public key share with its proof of possession.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionKeyShareDTO {
    pub proof: SigmaProofDTO,
    pub public_key: String,
}

/// A trustee's partial decryption of a batch, one element per input
/// ciphertext in input order, with the proof of correct decryption.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDecryptionDTO {
    pub decryptions: Vec<String>,
    pub proof: SigmaProofDTO,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_field_names_are_stable() {
        let dto = EncryptionKeyShareDTO {
            proof: SigmaProofDTO {
                commitment: "3".to_string(),
                challenge: "1".to_string(),
                response: "2".to_string(),
            },
            public_key: "7".to_string(),
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(
            json,
            r#"{"proof":{"commitment":"3","challenge":"1","response":"2"},"publicKey":"7"}"#
        );
        let back: EncryptionKeyShareDTO = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dto);
    }

    #[test]
    fn sequence_fields_serialize_as_arrays() {
        let dto = PermutationProofDTO {
            proof: SigmaProofDTO {
                commitment: "(1,(2),3,4)".to_string(),
                challenge: "5".to_string(),
                response: "(6,(7),8,9,(10))".to_string(),
            },
            bridging_commitments: vec!["11".to_string(), "12".to_string()],
            e_values: vec!["13".to_string(), "14".to_string()],
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert!(json.contains(r#""bridgingCommitments":["11","12"]"#));
        assert!(json.contains(r#""eValues":["13","14"]"#));
        let back: PermutationProofDTO = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dto);
    }
}
