//! P-256 key material in its portable text form: base64 of PKCS#8 (private) and X.509
//! `SubjectPublicKeyInfo` (public) DER documents.

use std::fmt;

use p256::{
    pkcs8::{
        spki::SubjectPublicKeyInfoRef, EncodePrivateKey, EncodePublicKey, ObjectIdentifier,
        PrivateKeyInfo,
    },
    SecretKey,
};
use rand::rngs::OsRng;
use uaf_types::{encoding, UafError};
use zeroize::Zeroizing;

/// `id-ecPublicKey`, RFC 5480
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// `secp256r1`, RFC 5480
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
/// `rsaEncryption`, RFC 8017
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// `id-Ed25519`, RFC 8410
const ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// A P-256 key pair, both halves as standard base64 of their DER encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// base64 of a PKCS#8 `PrivateKeyInfo`.
    pub private_key: String,
    /// base64 of a `SubjectPublicKeyInfo`.
    pub public_key: String,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Generate a fresh P-256 key pair from the operating system's random source.
pub fn generate_key_pair() -> Result<KeyPair, UafError> {
    let private_key = SecretKey::random(&mut OsRng);

    let private_der = private_key
        .to_pkcs8_der()
        .map_err(|e| UafError::KeyGeneration(format!("failed to marshal private key: {e}")))?;
    let public_der = private_key
        .public_key()
        .to_public_key_der()
        .map_err(|e| UafError::KeyGeneration(format!("failed to marshal public key: {e}")))?;

    Ok(KeyPair {
        private_key: encoding::base64(private_der.as_bytes()),
        public_key: encoding::base64(public_der.as_bytes()),
    })
}

/// A private key decoded from PKCS#8, classified by the algorithm it is tagged with.
///
/// Only [`DecodedPrivateKey::P256`] can sign UAF assertions.
#[derive(Debug)]
pub enum DecodedPrivateKey {
    /// An elliptic curve key on P-256.
    P256(SecretKey),
    /// An elliptic curve key on another curve, or without a named curve.
    Ec {
        /// The named curve, if the parameters held one.
        curve: Option<ObjectIdentifier>,
    },
    /// An RSA key.
    Rsa,
    /// An Ed25519 key.
    Ed25519,
    /// Any other algorithm.
    Other(ObjectIdentifier),
}

impl DecodedPrivateKey {
    /// Decode the base64 text form of a PKCS#8 private key.
    pub fn from_base64(text: &str) -> Result<Self, UafError> {
        let der = encoding::try_from_base64(text)
            .map(Zeroizing::new)
            .ok_or_else(|| UafError::KeyDecoding("private key is not valid base64".to_owned()))?;
        Self::from_pkcs8_der(&der)
    }

    /// Decode a PKCS#8 `PrivateKeyInfo` DER document.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self, UafError> {
        let info = PrivateKeyInfo::try_from(der).map_err(|e| {
            UafError::KeyDecoding(format!("failed to parse PKCS#8 private key: {e}"))
        })?;

        let algorithm = info.algorithm.oid;
        if algorithm == EC_PUBLIC_KEY {
            let curve = info.algorithm.parameters_oid().ok();
            if curve != Some(SECP256R1) {
                return Ok(DecodedPrivateKey::Ec { curve });
            }
            let key = SecretKey::try_from(info).map_err(|e| {
                UafError::KeyDecoding(format!("failed to parse P-256 private key: {e}"))
            })?;
            Ok(DecodedPrivateKey::P256(key))
        } else if algorithm == RSA_ENCRYPTION {
            Ok(DecodedPrivateKey::Rsa)
        } else if algorithm == ED25519 {
            Ok(DecodedPrivateKey::Ed25519)
        } else {
            Ok(DecodedPrivateKey::Other(algorithm))
        }
    }

    /// Human readable name of the key's algorithm.
    pub fn algorithm(&self) -> String {
        match self {
            DecodedPrivateKey::P256(_) => "EC P-256".to_owned(),
            DecodedPrivateKey::Ec { curve: Some(curve) } => format!("EC on curve {curve}"),
            DecodedPrivateKey::Ec { curve: None } => "EC without a named curve".to_owned(),
            DecodedPrivateKey::Rsa => "RSA".to_owned(),
            DecodedPrivateKey::Ed25519 => "Ed25519".to_owned(),
            DecodedPrivateKey::Other(oid) => format!("algorithm {oid}"),
        }
    }

    /// The P-256 key, or [`UafError::KeyType`] for every other variant.
    pub fn into_p256(self) -> Result<SecretKey, UafError> {
        match self {
            DecodedPrivateKey::P256(key) => Ok(key),
            other => Err(UafError::KeyType(format!(
                "expected an EC P-256 private key, found {}",
                other.algorithm()
            ))),
        }
    }
}

/// Decode the base64 text form of a P-256 `SubjectPublicKeyInfo`, returning its DER bytes.
pub fn decode_public_key_der(text: &str) -> Result<Vec<u8>, UafError> {
    let der = encoding::try_from_base64(text)
        .ok_or_else(|| UafError::KeyDecoding("public key is not valid base64".to_owned()))?;

    let spki = SubjectPublicKeyInfoRef::try_from(der.as_slice()).map_err(|e| {
        UafError::KeyDecoding(format!("failed to parse PKIX public key: {e}"))
    })?;
    if spki.algorithm.oid != EC_PUBLIC_KEY
        || spki.algorithm.parameters_oid().ok() != Some(SECP256R1)
    {
        return Err(UafError::KeyType(format!(
            "expected an EC P-256 public key, found algorithm {}",
            spki.algorithm.oid
        )));
    }

    Ok(der)
}
