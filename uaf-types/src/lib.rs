//! # UAF Types
//!
//! Rust type definitions for the [FIDO UAF] protocol messages exchanged with a relying party,
//! the UAFV1 TLV encoding used by authenticator assertions, and the error type shared by the
//! `uaf` crates.
//!
//! [FIDO UAF]: https://fidoalliance.org/specs/fido-uaf-v1.1-ps-20170202/fido-uaf-protocol-v1.1-ps-20170202.html

#[macro_use]
mod utils;

mod error;
pub mod tlv;
pub mod uaf;

// Re-exports
pub use self::{
    error::UafError,
    uaf::{
        AuthenticatorSignAssertion, Extension, FinalChallengeParams, Operation, OperationHeader,
        RequestEntry, ResponseContext, ResponseEntry, SendUafResponse, Transaction, UafRequest,
        Version,
    },
    utils::{crypto, encoding, rand},
};
