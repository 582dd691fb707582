//! # UAF Authenticator
//!
//! A software FIDO UAF authenticator. It generates P-256 key pairs in their portable base64
//! DER form, signs with ES256 and packs the result into the UAFV1 TLV assertions a relying party
//! verifies.
//!
//! Keys are never stored: every operation receives the key material it needs and forgets it
//! when it returns.
//!
//! ## Why RustCrypto?
//!
//! The pure Rust implementations of the [RustCrypto] libraries build everywhere the rest of this
//! crate does, WASM included, and cover every primitive needed here: P-256 ECDSA, PKCS#8/SPKI
//! DER documents and SHA-256.
//!
//! [RustCrypto]: https://github.com/RustCrypto

mod assertion;
mod keys;
mod profile;
mod signer;

pub use self::{
    assertion::{AssertionBuilder, SignedAssertion},
    keys::{decode_public_key_der, generate_key_pair, DecodedPrivateKey, KeyPair},
    profile::{AuthenticatorProfile, MIN_NONCE_LEN, MODE_TRANSACTION_CONFIRMED, MODE_USER_VERIFIED},
    signer::{sign, sign_data, AssertionSigner, Es256Signer},
};

#[cfg(feature = "testable")]
pub use self::signer::MockAssertionSigner;
