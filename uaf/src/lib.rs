//! # uaf-rs
//!
//! The `uaf-rs` libraries let test harnesses and software authenticators answer [FIDO UAF]
//! registration and authentication requests with responses a relying party server verifies. It
//! is comprised of three sub-libraries:
//!
//! - `uaf-client` - a library, usable as [`client`], which turns a server's `uafRequest` into a
//!   signed response envelope.
//! - `uaf-authenticator` - a library, usable as [`authenticator`], which generates P-256 keys,
//!   signs with ES256 and encodes UAFV1 TLV assertions.
//! - `uaf-types` - type definitions, usable as [`types`], for the UAF protocol messages, the TLV
//!   encoding and the shared [`UafError`].
//!
//! This crate adds a string based surface on top, convenient for embedding in scripting hosts:
//! keys, signatures, requests and responses all travel as text.
//!
//! Keys are never stored. Every call receives the key material it needs and an error is always
//! returned to the caller, never turned into a panic.
//!
//! ### Example
//!
//! ```
//! let (private_key, public_key) = uaf::generate_key_pair()?;
//!
//! let uaf_request = r#"[{
//!     "header": {"upv": {"major": 1, "minor": 0}, "op": "Reg", "appID": "https://example.com"},
//!     "challenge": "abc123",
//!     "username": "alice"
//! }]"#;
//!
//! let response = uaf::generate_registration_response(
//!     "ABCD#0001",
//!     uaf_request,
//!     "android:apk-key-hash:XYZ",
//!     "",
//!     "",
//!     &private_key,
//!     &public_key,
//!     "a2V5LWlk",
//! )?;
//! assert!(response.starts_with(r#"{"uafResponse":"#));
//! # Ok::<(), uaf::UafError>(())
//! ```
//!
//! [FIDO UAF]: https://fidoalliance.org/specs/fido-uaf-v1.1-ps-20170202/fido-uaf-protocol-v1.1-ps-20170202.html

use uaf_authenticator::KeyPair;
use uaf_client::{Client, Credential};

pub use uaf_authenticator as authenticator;
pub use uaf_client as client;
pub use uaf_types as types;

pub use uaf_types::UafError;

/// Generate a P-256 key pair, returned as `(private_key, public_key)`: base64 of the PKCS#8 and
/// SubjectPublicKeyInfo DER documents.
pub fn generate_key_pair() -> Result<(String, String), UafError> {
    let KeyPair {
        private_key,
        public_key,
    } = uaf_authenticator::generate_key_pair()?;
    Ok((private_key, public_key))
}

/// Sign the UTF-8 bytes of `data` with a base64 PKCS#8 P-256 private key, returning the DER
/// signature as base64.
pub fn sign_data(data: &str, private_key: &str) -> Result<String, UafError> {
    uaf_authenticator::sign_data(data, private_key)
}

/// Answer the registration request `uaf_request` as the application `trusted_facet_id`.
///
/// A non-empty `overridden_signature` is placed in the assertion instead of signing. Otherwise a
/// non-empty `signature_sign_data` is signed with `priv_key`, and when both are empty the
/// assertion's key registration data is signed. Returns the JSON text of the response envelope.
#[allow(clippy::too_many_arguments)]
pub fn generate_registration_response(
    aaid: &str,
    uaf_request: &str,
    trusted_facet_id: &str,
    overridden_signature: &str,
    signature_sign_data: &str,
    priv_key: &str,
    pub_key: &str,
    key_id: &str,
) -> Result<String, UafError> {
    let credential = Credential {
        overridden_signature: non_empty(overridden_signature),
        sign_data: non_empty(signature_sign_data),
        ..Credential::new(aaid, key_id, priv_key, pub_key)
    };

    Client::new(trusted_facet_id)
        .register(uaf_request, &credential)?
        .to_json()
}

/// Answer the authentication request `uaf_request` as the application `trusted_facet_id` on
/// behalf of `username`.
///
/// Signing follows the same rules as [`generate_registration_response`], with the assertion's
/// signed data in place of the key registration data.
#[allow(clippy::too_many_arguments)]
pub fn generate_authentication_response(
    aaid: &str,
    uaf_request: &str,
    trusted_facet_id: &str,
    overridden_signature: &str,
    signature_sign_data: &str,
    priv_key: &str,
    pub_key: &str,
    username: &str,
    key_id: &str,
) -> Result<String, UafError> {
    let credential = Credential {
        overridden_signature: non_empty(overridden_signature),
        sign_data: non_empty(signature_sign_data),
        ..Credential::new(aaid, key_id, priv_key, pub_key)
    };

    Client::new(trusted_facet_id)
        .authenticate(uaf_request, &credential, username)?
        .to_json()
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}
