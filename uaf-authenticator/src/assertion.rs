//! Builds the single signed assertion carried in a UAF response.
//!
//! Registration:
//!
//! ```text
//! TAG_UAFV1_REG_ASSERTION
//!   TAG_UAFV1_KRD                     <- signed
//!     TAG_AAID, TAG_ASSERTION_INFO, TAG_FINAL_CHALLENGE_HASH, TAG_KEYID, TAG_COUNTERS, TAG_PUB_KEY
//!   TAG_ATTESTATION_BASIC_SURROGATE
//!     TAG_SIGNATURE
//! ```
//!
//! Authentication:
//!
//! ```text
//! TAG_UAFV1_AUTH_ASSERTION
//!   TAG_UAFV1_SIGNED_DATA             <- signed
//!     TAG_AAID, TAG_ASSERTION_INFO, TAG_AUTHENTICATOR_NONCE, TAG_FINAL_CHALLENGE_HASH,
//!     TAG_TRANSACTION_CONTENT_HASH, TAG_KEYID, TAG_COUNTERS
//!   TAG_SIGNATURE
//! ```

use uaf_types::{
    crypto::SHA256_LEN,
    rand::random_vec,
    tlv::{PublicKeyEncoding, SignatureAlgorithm, Tag, TlvWriter},
    AuthenticatorSignAssertion, UafError,
};

use crate::{
    keys::decode_public_key_der,
    profile::{AuthenticatorProfile, MODE_TRANSACTION_CONFIRMED},
    AssertionSigner,
};

/// A signed assertion together with the metadata it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAssertion {
    /// Authenticator attestation identifier.
    pub aaid: String,
    /// Identifier of the key that signed.
    pub key_id: String,
    /// The public key as given by the caller.
    pub public_key: String,
    /// The signature bytes placed in `TAG_SIGNATURE`.
    pub signature: Vec<u8>,
    /// The complete TLV assertion.
    pub encoded: Vec<u8>,
}

impl From<&SignedAssertion> for AuthenticatorSignAssertion {
    fn from(assertion: &SignedAssertion) -> Self {
        AuthenticatorSignAssertion::uafv1_tlv(&assertion.encoded)
    }
}

/// Collects everything one assertion is made of.
///
/// Unless an overridden signature is given, the builder signs with the [`AssertionSigner`] passed
/// to [`AssertionBuilder::build_registration`] or [`AssertionBuilder::build_authentication`]:
/// the caller supplied sign data when there is some, the encoded signed block otherwise.
#[derive(Debug, Clone)]
pub struct AssertionBuilder<'a> {
    aaid: &'a str,
    key_id: &'a str,
    final_challenge_hash: [u8; SHA256_LEN],
    private_key: &'a str,
    public_key: &'a str,
    overridden_signature: Option<&'a str>,
    sign_data: Option<&'a [u8]>,
    transaction_content_hash: Option<[u8; SHA256_LEN]>,
    profile: AuthenticatorProfile,
}

impl<'a> AssertionBuilder<'a> {
    /// Start an assertion for `key_id` of authenticator `aaid` over `final_challenge_hash`.
    pub fn new(aaid: &'a str, key_id: &'a str, final_challenge_hash: [u8; SHA256_LEN]) -> Self {
        Self {
            aaid,
            key_id,
            final_challenge_hash,
            private_key: "",
            public_key: "",
            overridden_signature: None,
            sign_data: None,
            transaction_content_hash: None,
            profile: AuthenticatorProfile::default(),
        }
    }

    /// The base64 PKCS#8 private key that signs and the base64 SPKI public key it pairs with.
    pub fn keys(mut self, private_key: &'a str, public_key: &'a str) -> Self {
        self.private_key = private_key;
        self.public_key = public_key;
        self
    }

    /// Use the bytes of `signature` verbatim instead of signing. Empty values are ignored.
    ///
    /// The text is never decoded: base64 output of [`crate::sign_data`] ends up in the assertion
    /// as base64 text.
    pub fn overridden_signature(mut self, signature: Option<&'a str>) -> Self {
        self.overridden_signature = signature.filter(|s| !s.is_empty());
        self
    }

    /// Sign exactly `data` instead of the encoded signed block. Empty values are ignored.
    pub fn sign_data(mut self, data: Option<&'a [u8]>) -> Self {
        self.sign_data = data.filter(|d| !d.is_empty());
        self
    }

    /// Hash of the transaction content the user confirmed, authentication only.
    pub fn transaction_content_hash(mut self, hash: Option<[u8; SHA256_LEN]>) -> Self {
        self.transaction_content_hash = hash;
        self
    }

    /// Replace the default [`AuthenticatorProfile`].
    pub fn profile(mut self, profile: AuthenticatorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Build a `TAG_UAFV1_REG_ASSERTION` with surrogate basic attestation.
    ///
    /// Every failure is reported as [`UafError::AssertionBuild`].
    pub fn build_registration<S>(&self, signer: &S) -> Result<SignedAssertion, UafError>
    where
        S: AssertionSigner + ?Sized,
    {
        self.registration(signer)
            .map_err(UafError::into_assertion_build)
    }

    /// Build a `TAG_UAFV1_AUTH_ASSERTION`.
    ///
    /// Every failure is reported as [`UafError::AssertionBuild`].
    pub fn build_authentication<S>(&self, signer: &S) -> Result<SignedAssertion, UafError>
    where
        S: AssertionSigner + ?Sized,
    {
        self.authentication(signer)
            .map_err(UafError::into_assertion_build)
    }

    fn registration<S>(&self, signer: &S) -> Result<SignedAssertion, UafError>
    where
        S: AssertionSigner + ?Sized,
    {
        self.check_aaid();
        let public_key = decode_public_key_der(self.public_key)?;

        let assertion_info = self
            .profile
            .authenticator_version
            .to_le_bytes()
            .into_iter()
            .chain([self.profile.authentication_mode])
            .chain(SignatureAlgorithm::Secp256r1EcdsaSha256Der.as_primitive().to_le_bytes())
            .chain(PublicKeyEncoding::EccX962Der.as_primitive().to_le_bytes())
            .collect::<Vec<u8>>();
        let counters = self
            .profile
            .sign_counter
            .to_le_bytes()
            .into_iter()
            .chain(self.profile.reg_counter.to_le_bytes())
            .collect::<Vec<u8>>();

        let mut krd = TlvWriter::new();
        krd.push(Tag::Aaid, self.aaid.as_bytes())?
            .push(Tag::AssertionInfo, &assertion_info)?
            .push(Tag::FinalChallengeHash, &self.final_challenge_hash)?
            .push(Tag::KeyId, self.key_id.as_bytes())?
            .push(Tag::Counters, &counters)?
            .push(Tag::PubKey, &public_key)?;

        let mut body = TlvWriter::new();
        body.push_nested(Tag::Krd, &krd)?;
        let signature = self.signature(signer, body.as_bytes())?;

        let mut attestation = TlvWriter::new();
        attestation.push(Tag::Signature, &signature)?;
        body.push_nested(Tag::AttestationBasicSurrogate, &attestation)?;

        let mut assertion = TlvWriter::new();
        assertion.push_nested(Tag::RegAssertion, &body)?;

        Ok(self.signed(signature, assertion))
    }

    fn authentication<S>(&self, signer: &S) -> Result<SignedAssertion, UafError>
    where
        S: AssertionSigner + ?Sized,
    {
        self.check_aaid();

        let mode = if self.transaction_content_hash.is_some() {
            MODE_TRANSACTION_CONFIRMED
        } else {
            self.profile.authentication_mode
        };
        let assertion_info = self
            .profile
            .authenticator_version
            .to_le_bytes()
            .into_iter()
            .chain([mode])
            .chain(SignatureAlgorithm::Secp256r1EcdsaSha256Der.as_primitive().to_le_bytes())
            .collect::<Vec<u8>>();
        let transaction_hash: &[u8] = match &self.transaction_content_hash {
            Some(hash) => hash,
            None => &[],
        };

        let mut signed_data = TlvWriter::new();
        signed_data
            .push(Tag::Aaid, self.aaid.as_bytes())?
            .push(Tag::AssertionInfo, &assertion_info)?
            .push(Tag::AuthenticatorNonce, &random_vec(self.profile.nonce_len))?
            .push(Tag::FinalChallengeHash, &self.final_challenge_hash)?
            .push(Tag::TransactionContentHash, transaction_hash)?
            .push(Tag::KeyId, self.key_id.as_bytes())?
            .push(Tag::Counters, &self.profile.sign_counter.to_le_bytes())?;

        let mut body = TlvWriter::new();
        body.push_nested(Tag::SignedData, &signed_data)?;
        let signature = self.signature(signer, body.as_bytes())?;
        body.push(Tag::Signature, &signature)?;

        let mut assertion = TlvWriter::new();
        assertion.push_nested(Tag::AuthAssertion, &body)?;

        Ok(self.signed(signature, assertion))
    }

    fn signature<S>(&self, signer: &S, signed_block: &[u8]) -> Result<Vec<u8>, UafError>
    where
        S: AssertionSigner + ?Sized,
    {
        if let Some(signature) = self.overridden_signature {
            log::debug!("Using overridden signature for key {}", self.key_id);
            return Ok(signature.as_bytes().to_vec());
        }

        match self.sign_data {
            Some(data) => {
                log::debug!("Signing caller supplied data with key {}", self.key_id);
                signer.sign(data, self.private_key)
            }
            None => {
                log::debug!("Signing assertion block with key {}", self.key_id);
                signer.sign(signed_block, self.private_key)
            }
        }
    }

    fn signed(&self, signature: Vec<u8>, assertion: TlvWriter) -> SignedAssertion {
        SignedAssertion {
            aaid: self.aaid.to_owned(),
            key_id: self.key_id.to_owned(),
            public_key: self.public_key.to_owned(),
            signature,
            encoded: assertion.into_bytes(),
        }
    }

    fn check_aaid(&self) {
        if !is_canonical_aaid(self.aaid) {
            log::warn!(
                "AAID {:?} is not of the form VVVV#MMMM, servers may reject it",
                self.aaid
            );
        }
    }
}

/// `VVVV#MMMM`, vendor and model as four hex digits each.
fn is_canonical_aaid(aaid: &str) -> bool {
    let bytes = aaid.as_bytes();
    bytes.len() == 9
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 { *b == b'#' } else { b.is_ascii_hexdigit() })
}
