//! ES256 signing: SHA-256 digest, ECDSA over P-256 with a random nonce, DER encoded `(R, S)`.

use p256::ecdsa::{signature::hazmat::RandomizedPrehashSigner, DerSignature, Signature, SigningKey};
use rand::rngs::OsRng;
use uaf_types::{crypto::sha256, encoding, UafError};

use crate::keys::DecodedPrivateKey;

/// Pluggable signing step of the assertion builder.
#[cfg_attr(any(test, feature = "testable"), mockall::automock)]
pub trait AssertionSigner {
    /// Sign `data` with the base64 PKCS#8 `private_key`, returning the encoded signature.
    fn sign(&self, data: &[u8], private_key: &str) -> Result<Vec<u8>, UafError>;
}

/// The [`AssertionSigner`] used by default, see [`sign`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Es256Signer;

impl AssertionSigner for Es256Signer {
    fn sign(&self, data: &[u8], private_key: &str) -> Result<Vec<u8>, UafError> {
        sign(data, private_key)
    }
}

/// Sign `data` with a base64 PKCS#8 P-256 private key.
///
/// The signature is computed over SHA-256 of `data` with a fresh random nonce, so signing the
/// same data twice gives two different, equally valid, signatures. It is returned as a DER
/// `SEQUENCE { r INTEGER, s INTEGER }`.
pub fn sign(data: &[u8], private_key: &str) -> Result<Vec<u8>, UafError> {
    let secret_key = DecodedPrivateKey::from_base64(private_key)?.into_p256()?;
    sign_with_key(&SigningKey::from(secret_key), data)
}

/// Like [`sign`] but taking and returning text: `data` is signed as its UTF-8 bytes and the DER
/// signature is returned as standard base64.
pub fn sign_data(data: &str, private_key: &str) -> Result<String, UafError> {
    sign(data.as_bytes(), private_key).map(|signature| encoding::base64(&signature))
}

pub(crate) fn sign_with_key(signing_key: &SigningKey, data: &[u8]) -> Result<Vec<u8>, UafError> {
    let digest = sha256(data);

    let signature: Signature = signing_key
        .sign_prehash_with_rng(&mut OsRng, &digest)
        .map_err(|e| UafError::Signing(e.to_string()))?;

    // r and s are minimally encoded as DER integers, their length varies between signatures
    let der: DerSignature = signature.to_der();

    Ok(der.as_bytes().to_vec())
}
