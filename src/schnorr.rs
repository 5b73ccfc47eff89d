//! Schnorr signatures over secp256k1 with a fixed 192-byte encoding
//!
//! A signature is the pair `(e, s)` with `R = s·G + e·P` and
//! `e = SHA-256(tag || R || P || m)`. Each scalar occupies a 96-byte big-endian
//! slot, right-aligned, so the upper 64 bytes of a slot are always zero in a
//! valid encoding.
//!
//! Messages are [`FieldElement`]s, typically a certificate leaf or a root of
//! the commitment tree.

use std::fmt;

use bitcoin::secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

use crate::errors::{EncodingError, SignatureError};
use crate::field::FieldElement;
use crate::types::{
    SCHNORR_CHALLENGE_TAG, SCHNORR_NONCE_TAG, SCHNORR_SCALAR_SLOT_SIZE, SCHNORR_SIGNATURE_SIZE,
};

const SCALAR_SIZE: usize = 32;
const SLOT_PADDING: usize = SCHNORR_SCALAR_SLOT_SIZE - SCALAR_SIZE;

/// Upper bound on nonce attempts; each retry fails with probability ~2^-128
const MAX_NONCE_ATTEMPTS: u32 = 16;

/// A serialized Schnorr signature
///
/// Decoding without validity checks keeps the raw bytes, so
/// [`serialize`](Self::serialize) always returns exactly what was decoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SchnorrSignature {
    bytes: [u8; SCHNORR_SIGNATURE_SIZE],
}

impl fmt::Debug for SchnorrSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchnorrSignature({})", hex::encode(self.bytes))
    }
}

fn nonce(secret_key: &SecretKey, message: &FieldElement, counter: u32) -> [u8; SCALAR_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(SCHNORR_NONCE_TAG);
    hasher.update(secret_key.secret_bytes());
    hasher.update(message.serialize());
    hasher.update(counter.to_le_bytes());
    hasher.finalize().into()
}

/// The challenge scalar, or `None` if the digest is zero or not below the order
fn challenge(r: &PublicKey, public_key: &PublicKey, message: &FieldElement) -> Option<Scalar> {
    let mut hasher = Sha256::new();
    hasher.update(SCHNORR_CHALLENGE_TAG);
    hasher.update(r.serialize());
    hasher.update(public_key.serialize());
    hasher.update(message.serialize());
    let digest: [u8; SCALAR_SIZE] = hasher.finalize().into();

    let e = Scalar::from_be_bytes(digest).ok()?;
    (e != Scalar::ZERO).then_some(e)
}

impl SchnorrSignature {
    fn from_scalars(e: &Scalar, s: &SecretKey) -> Self {
        let mut bytes = [0u8; SCHNORR_SIGNATURE_SIZE];
        bytes[SLOT_PADDING..SCHNORR_SCALAR_SLOT_SIZE].copy_from_slice(&e.to_be_bytes());
        bytes[SCHNORR_SCALAR_SLOT_SIZE + SLOT_PADDING..].copy_from_slice(&s.secret_bytes());
        Self { bytes }
    }

    fn slot(&self, index: usize) -> (&[u8], &[u8]) {
        let start = index * SCHNORR_SCALAR_SLOT_SIZE;
        self.bytes[start..start + SCHNORR_SCALAR_SLOT_SIZE].split_at(SLOT_PADDING)
    }

    fn scalars(&self) -> Result<(Scalar, SecretKey), SignatureError> {
        let (e_padding, e_bytes) = self.slot(0);
        let (s_padding, s_bytes) = self.slot(1);
        if e_padding.iter().chain(s_padding).any(|&b| b != 0) {
            return Err(SignatureError::OutOfRange("non-zero slot padding"));
        }

        let mut e_array = [0u8; SCALAR_SIZE];
        e_array.copy_from_slice(e_bytes);
        let e = Scalar::from_be_bytes(e_array)
            .map_err(|_| SignatureError::OutOfRange("e is not below the group order"))?;
        if e == Scalar::ZERO {
            return Err(SignatureError::OutOfRange("e is zero"));
        }
        let s = SecretKey::from_slice(s_bytes)
            .map_err(|_| SignatureError::OutOfRange("s is zero or not below the group order"))?;

        Ok((e, s))
    }

    /// Signs `message` with a deterministic nonce
    ///
    /// # Errors
    /// [`SignatureError::SigningFailed`] if no usable nonce was found, which
    /// does not happen in practice.
    pub fn sign(secret_key: &SecretKey, message: &FieldElement) -> Result<Self, SignatureError> {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, secret_key);

        for counter in 0..MAX_NONCE_ATTEMPTS {
            let Ok(k) = SecretKey::from_slice(&nonce(secret_key, message, counter)) else {
                continue;
            };
            let r = PublicKey::from_secret_key(&secp, &k);
            let Some(e) = challenge(&r, &public_key, message) else {
                continue;
            };

            // s = k - e·x
            let ex = secret_key
                .mul_tweak(&e)
                .map_err(|err| SignatureError::SigningFailed(err.to_string()))?;
            let Ok(s) = k.add_tweak(&Scalar::from(ex.negate())) else {
                continue;
            };
            return Ok(Self::from_scalars(&e, &s));
        }

        Err(SignatureError::SigningFailed("nonce attempts exhausted".to_string()))
    }

    /// Verifies the signature on `message` under `public_key`
    ///
    /// Encodings that fail [`is_valid`](Self::is_valid) never verify.
    pub fn verify(&self, public_key: &PublicKey, message: &FieldElement) -> bool {
        let Ok((e, s)) = self.scalars() else {
            return false;
        };
        let secp = Secp256k1::new();

        let s_g = PublicKey::from_secret_key(&secp, &s);
        let Ok(e_p) = public_key.mul_tweak(&secp, &e) else {
            return false;
        };
        let Ok(r) = s_g.combine(&e_p) else {
            return false;
        };

        challenge(&r, public_key, message) == Some(e)
    }

    /// The 192-byte encoding
    pub fn serialize(&self) -> [u8; SCHNORR_SIGNATURE_SIZE] { self.bytes }

    /// Decodes a signature
    ///
    /// With `check_validity` the scalars must also pass
    /// [`is_valid`](Self::is_valid).
    ///
    /// # Errors
    /// [`SignatureError::Encoding`] if `bytes` is not 192 bytes long, and
    /// [`SignatureError::OutOfRange`] if validity is checked and fails.
    pub fn deserialize(bytes: &[u8], check_validity: bool) -> Result<Self, SignatureError> {
        let bytes: [u8; SCHNORR_SIGNATURE_SIZE] =
            bytes.try_into().map_err(|_| EncodingError::InvalidLength {
                field: "schnorr signature",
                expected: SCHNORR_SIGNATURE_SIZE,
                actual: bytes.len(),
            })?;
        let signature = Self { bytes };

        if check_validity {
            signature.scalars()?;
        }
        Ok(signature)
    }

    /// Whether both slots hold canonical scalars with `0 < e < n` and `0 < s < n`
    pub fn is_valid(&self) -> bool { self.scalars().is_ok() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(byte: u8) -> (SecretKey, PublicKey) {
        let secret_key = SecretKey::from_slice(&[byte; 32]).expect("valid secret key");
        let public_key = PublicKey::from_secret_key(&Secp256k1::new(), &secret_key);
        (secret_key, public_key)
    }

    #[test]
    fn test_sign_and_verify() {
        let (secret_key, public_key) = keypair(7);
        let message = FieldElement::from_u64(42);

        let signature = SchnorrSignature::sign(&secret_key, &message).expect("signing succeeds");

        assert!(signature.is_valid());
        assert!(signature.verify(&public_key, &message));
        assert!(!signature.verify(&public_key, &FieldElement::from_u64(43)));
        assert!(!signature.verify(&keypair(8).1, &message));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let (secret_key, _) = keypair(3);
        let message = FieldElement::hash_bytes(b"certificate");

        let first = SchnorrSignature::sign(&secret_key, &message).expect("signing succeeds");
        let second = SchnorrSignature::sign(&secret_key, &message).expect("signing succeeds");

        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_layout() {
        let (secret_key, _) = keypair(5);
        let signature =
            SchnorrSignature::sign(&secret_key, &FieldElement::ZERO).expect("signing succeeds");

        let bytes = signature.serialize();

        assert!(bytes[..SLOT_PADDING].iter().all(|&b| b == 0));
        assert!(bytes[96..96 + SLOT_PADDING].iter().all(|&b| b == 0));
        let decoded = SchnorrSignature::deserialize(&bytes, true).expect("valid encoding");
        assert_eq!(decoded, signature);
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        for len in [0, 191, 193] {
            let result = SchnorrSignature::deserialize(&vec![0u8; len], false);

            assert_eq!(
                result,
                Err(SignatureError::Encoding(EncodingError::InvalidLength {
                    field: "schnorr signature",
                    expected: SCHNORR_SIGNATURE_SIZE,
                    actual: len,
                }))
            );
        }
    }

    #[test]
    fn test_validity_checks() {
        let (secret_key, public_key) = keypair(9);
        let message = FieldElement::from_u64(1);
        let valid =
            SchnorrSignature::sign(&secret_key, &message).expect("signing succeeds").serialize();

        let mut padded = valid;
        padded[0] = 1;
        assert!(SchnorrSignature::deserialize(&padded, false).is_ok());
        assert!(matches!(
            SchnorrSignature::deserialize(&padded, true),
            Err(SignatureError::OutOfRange(_))
        ));

        let mut large_e = valid;
        large_e[SLOT_PADDING..96].fill(0xff);
        assert!(SchnorrSignature::deserialize(&large_e, true).is_err());

        let mut zero_s = valid;
        zero_s[96..].fill(0);
        let unchecked = SchnorrSignature::deserialize(&zero_s, false).expect("length is correct");
        assert!(!unchecked.is_valid());
        assert!(!unchecked.verify(&public_key, &message));

        assert!(!SchnorrSignature::deserialize(&[0u8; 192], false)
            .expect("length is correct")
            .is_valid());
    }

    #[test]
    fn test_tampered_signature_fails() {
        let (secret_key, public_key) = keypair(11);
        let message = FieldElement::from_u64(77);
        let mut bytes =
            SchnorrSignature::sign(&secret_key, &message).expect("signing succeeds").serialize();

        bytes[SCHNORR_SIGNATURE_SIZE - 1] ^= 1;
        let tampered = SchnorrSignature::deserialize(&bytes, false).expect("length is correct");

        assert!(!tampered.verify(&public_key, &message));
    }
}
