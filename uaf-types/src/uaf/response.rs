use serde::{Deserialize, Serialize};
use typeshare::typeshare;

use crate::{encoding, Extension, OperationHeader, UafError};

/// Assertion scheme of TLV encoded assertions.
pub const UAFV1_TLV: &str = "UAFV1TLV";

/// A single authenticator's signed assertion as carried in a UAF response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct AuthenticatorSignAssertion {
    /// How [`AuthenticatorSignAssertion::assertion`] is encoded, [`UAFV1_TLV`] here.
    pub assertion_scheme: String,

    /// base64url (no padding) of the authenticator's TLV assertion.
    pub assertion: String,

    /// Assertion extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exts: Option<Vec<Extension>>,
}

impl AuthenticatorSignAssertion {
    /// Wrap an encoded `TAG_UAFV1_REG_ASSERTION` or `TAG_UAFV1_AUTH_ASSERTION`.
    pub fn uafv1_tlv(encoded: &[u8]) -> Self {
        Self {
            assertion_scheme: UAFV1_TLV.to_owned(),
            assertion: encoding::base64url(encoded),
            exts: None,
        }
    }
}

/// One entry of the `uafResponse` array, answering one [`crate::RequestEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// The request entry's header, unchanged.
    pub header: OperationHeader,

    /// The padded base64url final challenge parameters whose hash the assertion carries.
    #[serde(rename = "fcParams")]
    pub fc_params: String,

    /// The signed assertions, one per authenticator.
    pub assertions: Vec<AuthenticatorSignAssertion>,
}

/// Free-form context returned next to the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseContext {
    /// The authenticating user, absent for registrations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// The envelope sent back to the relying party.
///
/// Both fields hold JSON text rather than nested objects: servers parse `uafResponse` and
/// `context` a second time after decoding the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct SendUafResponse {
    /// JSON array of [`ResponseEntry`].
    pub uaf_response: String,
    /// JSON object of [`ResponseContext`].
    pub context: String,
}

impl SendUafResponse {
    /// Serialize `entries` and `context` into their string fields.
    pub fn new(entries: &[ResponseEntry], context: &ResponseContext) -> Result<Self, UafError> {
        Ok(Self {
            uaf_response: serde_json::to_string(entries)?,
            context: serde_json::to_string(context)?,
        })
    }

    /// The envelope as the JSON text handed to the caller.
    pub fn to_json(&self) -> Result<String, UafError> {
        Ok(serde_json::to_string(self)?)
    }
}
