use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use typeshare::typeshare;

/// UAF protocol version, `upv` in the operation header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare]
pub struct Version {
    /// Major version, `1` for every published UAF version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
}

impl Default for Version {
    fn default() -> Self {
        Self { major: 1, minor: 0 }
    }
}

/// The operation a UAF message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[typeshare(serialized_as = "String")]
pub enum Operation {
    /// Registration of a new key.
    Reg,
    /// Authentication with a registered key.
    Auth,
    /// Deregistration of a key.
    Dereg,
}

/// A generic UAF extension carried in headers and assertions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[typeshare]
pub struct Extension {
    /// Identifies the extension.
    pub id: String,
    /// base64url encoded extension data.
    pub data: String,
    /// Whether a party that does not understand the extension must abort.
    pub fail_if_unknown: bool,
}

/// Header shared by every UAF message.
///
/// The response reuses the request's header as is, so keys this type does not know about are
/// kept in [`OperationHeader::unknown_keys`] in their original order and written back on
/// serialization.
///
/// <https://fidoalliance.org/specs/fido-uaf-v1.1-ps-20170202/fido-uaf-protocol-v1.1-ps-20170202.html#operationheader-dictionary>
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationHeader {
    /// UAF protocol version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upv: Option<Version>,

    /// Name of the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<Operation>,

    /// The application identifier the relying party wants the key bound to. When missing, UAF
    /// clients fall back to the caller's facet identifier.
    #[serde(rename = "appID", default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Opaque session data the server expects back untouched.
    #[serde(rename = "serverData", default, skip_serializing_if = "Option::is_none")]
    pub server_data: Option<String>,

    /// Header extensions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exts: Option<Vec<Extension>>,

    /// Keys unknown to this library, in the order they were received.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, serde_json::Value>,
}

impl OperationHeader {
    /// The application identifier to bind into the final challenge, falling back to `facet_id`
    /// when the header has none.
    pub fn app_id_or<'a>(&'a self, facet_id: &'a str) -> &'a str {
        match self.app_id.as_deref() {
            Some(app_id) if !app_id.is_empty() => app_id,
            _ => facet_id,
        }
    }
}
