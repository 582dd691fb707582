use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    crypto::{sha256, SHA256_LEN},
    encoding, OperationHeader, UafError,
};

/// Content type of transactions shown as plain text.
pub const TEXT_PLAIN: &str = "text/plain";

/// A transaction the relying party asks the user to confirm during authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// MIME type of [`Transaction::content`], `text/plain` or `image/png`.
    pub content_type: String,

    /// base64url encoded transaction content.
    pub content: String,

    /// Display characteristics for `image/png` content.
    #[serde(
        rename = "tcDisplayPNGCharacteristics",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tc_display_png_characteristics: Option<serde_json::Value>,
}

impl Transaction {
    /// SHA-256 of the decoded content, `None` when the content is not base64url.
    pub fn content_hash(&self) -> Option<[u8; SHA256_LEN]> {
        encoding::try_from_base64url(&self.content).map(|content| sha256(&content))
    }
}

/// One entry of a server issued `uafRequest`. Registration and authentication requests share
/// this shape; `username` only appears in registration and `transaction` only in authentication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEntry {
    /// The operation header, mirrored into the response.
    pub header: OperationHeader,

    /// The server challenge.
    pub challenge: String,

    /// The user the registration is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Authenticator selection policy. Kept opaque, a software authenticator matches any policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<serde_json::Value>,

    /// Transactions to confirm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<Vec<Transaction>>,

    /// Keys unknown to this library.
    #[serde(flatten)]
    pub unknown_keys: IndexMap<String, serde_json::Value>,
}

impl RequestEntry {
    /// The transaction an authenticator displays: the first `text/plain` one, or the first one
    /// when none is plain text.
    pub fn displayed_transaction(&self) -> Option<&Transaction> {
        let transactions = self.transaction.as_deref()?;
        transactions
            .iter()
            .find(|t| t.content_type == TEXT_PLAIN)
            .or_else(|| transactions.first())
    }
}

/// A parsed `uafRequest`: a JSON array holding at least one [`RequestEntry`].
#[derive(Debug, Clone, PartialEq)]
pub struct UafRequest {
    first: RequestEntry,
    rest: Vec<RequestEntry>,
}

impl UafRequest {
    /// Parse the request document, failing with [`UafError::RequestParse`] on malformed JSON or
    /// an empty array.
    pub fn from_json(json: &str) -> Result<Self, UafError> {
        let entries: Vec<RequestEntry> =
            serde_json::from_str(json).map_err(|e| UafError::RequestParse(e.to_string()))?;
        let mut entries = entries.into_iter();
        let first = entries
            .next()
            .ok_or_else(|| UafError::RequestParse("request holds no entries".to_owned()))?;
        Ok(Self {
            first,
            rest: entries.collect(),
        })
    }

    /// The entry a response is produced for.
    pub fn first(&self) -> &RequestEntry {
        &self.first
    }

    /// Number of entries in the request, always at least one.
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`, a request holds at least one entry.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every entry, in request order.
    pub fn entries(&self) -> impl Iterator<Item = &RequestEntry> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}
