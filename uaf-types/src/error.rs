//! Error taxonomy shared by every `uaf` crate.

use std::fmt;

/// Errors produced while generating keys, signing or assembling a UAF response.
///
/// Every variant is terminal for the call that produced it. Use [`UafError::is_input_error`] to
/// tell caller input faults (bad base64, wrong key algorithm, malformed request) apart from
/// internal encoder faults.
#[derive(Debug)]
pub enum UafError {
    /// The random source or a key encoder failed while generating a key pair.
    KeyGeneration(String),
    /// A key given as text is not valid base64 or not a well formed key structure.
    KeyDecoding(String),
    /// The key decoded fine but is not a P-256 elliptic curve key.
    KeyType(String),
    /// The ECDSA signing primitive failed.
    Signing(String),
    /// The `(R, S)` pair could not be encoded as a DER sequence.
    SignatureEncoding(String),
    /// The UAF request document is not valid JSON, has the wrong shape or holds no entries.
    RequestParse(String),
    /// The signed assertion could not be built, the boxed error is the underlying cause.
    AssertionBuild(Box<UafError>),
    /// A response document or TLV structure could not be encoded.
    Serialization(String),
}

impl UafError {
    /// Was this error caused by the input given to the operation rather than by an encoder?
    pub fn is_input_error(&self) -> bool {
        match self {
            UafError::KeyDecoding(_) | UafError::KeyType(_) | UafError::RequestParse(_) => true,
            UafError::AssertionBuild(inner) => inner.is_input_error(),
            UafError::KeyGeneration(_)
            | UafError::Signing(_)
            | UafError::SignatureEncoding(_)
            | UafError::Serialization(_) => false,
        }
    }

    /// Wrap this error as the cause of an assertion build failure.
    ///
    /// Errors that already are [`UafError::AssertionBuild`] are returned as is.
    pub fn into_assertion_build(self) -> Self {
        match self {
            err @ UafError::AssertionBuild(_) => err,
            err => UafError::AssertionBuild(Box::new(err)),
        }
    }
}

impl fmt::Display for UafError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UafError::KeyGeneration(msg) => write!(f, "failed to generate key pair: {msg}"),
            UafError::KeyDecoding(msg) => write!(f, "failed to decode key: {msg}"),
            UafError::KeyType(msg) => write!(f, "unsupported key type: {msg}"),
            UafError::Signing(msg) => write!(f, "failed to sign data: {msg}"),
            UafError::SignatureEncoding(msg) => {
                write!(f, "failed to DER encode ECDSA signature: {msg}")
            }
            UafError::RequestParse(msg) => write!(f, "invalid uafRequest: {msg}"),
            UafError::AssertionBuild(inner) => write!(f, "failed to build assertion: {inner}"),
            UafError::Serialization(msg) => write!(f, "failed to serialize response: {msg}"),
        }
    }
}

impl std::error::Error for UafError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UafError::AssertionBuild(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for UafError {
    fn from(err: serde_json::Error) -> Self {
        UafError::Serialization(err.to_string())
    }
}
