//! # UAF Client
//!
//! This crate defines a [`Client`] type that answers [FIDO UAF] registration and authentication
//! requests. The [`Client`] uses an [`AssertionSigner`] to perform the actual cryptographic
//! operations, while the Client itself marshals data to and from the documents exchanged with the
//! Relying Party.
//!
//! This crate does not provide any code to perform networking requests to and from Relying Parties.
//!
//! [FIDO UAF]: https://fidoalliance.org/specs/fido-uaf-v1.1-ps-20170202/fido-uaf-protocol-v1.1-ps-20170202.html

mod final_challenge;

use std::fmt;

use uaf_authenticator::{AssertionBuilder, AssertionSigner, AuthenticatorProfile, Es256Signer};
use uaf_types::{
    crypto::SHA256_LEN,
    AuthenticatorSignAssertion, Operation, RequestEntry, ResponseContext, ResponseEntry,
    SendUafResponse, UafError, UafRequest,
};

pub use self::final_challenge::{canonicalize, CanonicalChallenge};

#[cfg(test)]
mod tests;

/// The registered (or about to be registered) key a response is signed with.
#[derive(Clone, Copy)]
pub struct Credential<'a> {
    /// Authenticator attestation identifier, `VVVV#MMMM`.
    pub aaid: &'a str,
    /// Identifier of the key.
    pub key_id: &'a str,
    /// base64 PKCS#8 DER of the P-256 private key.
    pub private_key: &'a str,
    /// base64 SPKI DER of the matching public key.
    pub public_key: &'a str,
    /// A signature to use instead of signing, see [`AssertionBuilder::overridden_signature`].
    pub overridden_signature: Option<&'a str>,
    /// Data to sign instead of the assertion's signed block.
    pub sign_data: Option<&'a str>,
}

impl<'a> Credential<'a> {
    /// A credential that signs its assertions itself.
    pub fn new(aaid: &'a str, key_id: &'a str, private_key: &'a str, public_key: &'a str) -> Self {
        Self {
            aaid,
            key_id,
            private_key,
            public_key,
            overridden_signature: None,
            sign_data: None,
        }
    }

    fn assertion_builder(&self, final_challenge_hash: [u8; SHA256_LEN]) -> AssertionBuilder<'a> {
        AssertionBuilder::new(self.aaid, self.key_id, final_challenge_hash)
            .keys(self.private_key, self.public_key)
            .overridden_signature(self.overridden_signature)
            .sign_data(self.sign_data.map(str::as_bytes))
    }
}

impl fmt::Debug for Credential<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("aaid", &self.aaid)
            .field("key_id", &self.key_id)
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .field("overridden_signature", &self.overridden_signature.is_some())
            .field("sign_data", &self.sign_data)
            .finish()
    }
}

/// A `Client` represents a UAF client running as the application with the trusted facet
/// identifier `facet_id`.
///
/// Most applications can use [`Client::new`], which signs with [`Es256Signer`]. Use
/// [`Client::with_signer`] to supply another [`AssertionSigner`].
#[derive(Debug, Clone)]
pub struct Client<S = Es256Signer> {
    facet_id: String,
    signer: S,
    profile: AuthenticatorProfile,
}

impl Client<Es256Signer> {
    /// Create a `Client` for `facet_id` that signs with P-256 ECDSA.
    pub fn new(facet_id: impl Into<String>) -> Self {
        Self::with_signer(facet_id, Es256Signer)
    }
}

impl<S> Client<S>
where
    S: AssertionSigner,
{
    /// Create a `Client` for `facet_id` with a custom signer.
    pub fn with_signer(facet_id: impl Into<String>, signer: S) -> Self {
        Self {
            facet_id: facet_id.into(),
            signer,
            profile: AuthenticatorProfile::default(),
        }
    }

    /// Replace the [`AuthenticatorProfile`] of the emulated authenticator.
    pub fn profile(mut self, profile: AuthenticatorProfile) -> Self {
        self.profile = profile;
        self
    }

    /// The trusted facet identifier responses are produced for.
    pub fn facet_id(&self) -> &str {
        &self.facet_id
    }

    /// Read access to the Client's signer.
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Answer a registration `uaf_request` with a new key registration for `credential`.
    ///
    /// The response context is empty.
    pub fn register(
        &self,
        uaf_request: &str,
        credential: &Credential<'_>,
    ) -> Result<SendUafResponse, UafError> {
        let (entry, challenge) = self.prepare(uaf_request, Operation::Reg)?;

        let assertion = credential
            .assertion_builder(challenge.hash)
            .profile(self.profile.clone())
            .build_registration(&self.signer)?;

        respond(
            entry,
            challenge,
            AuthenticatorSignAssertion::from(&assertion),
            &ResponseContext::default(),
        )
    }

    /// Answer an authentication `uaf_request` by signing with `credential` on behalf of `username`.
    ///
    /// When the request asks for a transaction to be confirmed, its content hash is included in
    /// the signed data.
    pub fn authenticate(
        &self,
        uaf_request: &str,
        credential: &Credential<'_>,
        username: &str,
    ) -> Result<SendUafResponse, UafError> {
        let (entry, challenge) = self.prepare(uaf_request, Operation::Auth)?;

        let assertion = credential
            .assertion_builder(challenge.hash)
            .transaction_content_hash(transaction_content_hash(&entry))
            .profile(self.profile.clone())
            .build_authentication(&self.signer)?;

        respond(
            entry,
            challenge,
            AuthenticatorSignAssertion::from(&assertion),
            &ResponseContext {
                username: Some(username.to_owned()),
            },
        )
    }

    fn prepare(
        &self,
        uaf_request: &str,
        expected: Operation,
    ) -> Result<(RequestEntry, CanonicalChallenge), UafError> {
        let request = UafRequest::from_json(uaf_request)?;
        if request.len() > 1 {
            log::warn!(
                "uafRequest holds {} entries, only the first one is answered",
                request.len()
            );
        }

        let entry = request.first().clone();
        match entry.header.op {
            Some(op) if op != expected => {
                log::warn!("Answering a {op:?} request with a {expected:?} response")
            }
            _ => {}
        }

        let app_id = entry.header.app_id_or(&self.facet_id);
        let challenge = canonicalize(app_id, &entry.challenge, &self.facet_id)?;
        Ok((entry, challenge))
    }
}

fn transaction_content_hash(entry: &RequestEntry) -> Option<[u8; SHA256_LEN]> {
    let transaction = entry.displayed_transaction()?;
    let hash = transaction.content_hash();
    if hash.is_none() {
        log::warn!(
            "Transaction content of type {} is not base64url, confirming without it",
            transaction.content_type
        );
    }
    hash
}

fn respond(
    entry: RequestEntry,
    challenge: CanonicalChallenge,
    assertion: AuthenticatorSignAssertion,
    context: &ResponseContext,
) -> Result<SendUafResponse, UafError> {
    let response = ResponseEntry {
        header: entry.header,
        fc_params: challenge.fc_params,
        assertions: vec![assertion],
    };
    SendUafResponse::new(&[response], context)
}
