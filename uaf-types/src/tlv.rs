//! UAFV1 TLV encoding of authenticator assertions.
//!
//! Every item is a little-endian `u16` tag, a little-endian `u16` length and `length` bytes of
//! value. Composite tags (`0x3Exx`) carry a sequence of items as their value.
//!
//! <https://fidoalliance.org/specs/fido-uaf-v1.1-ps-20170202/fido-uaf-authnr-cmds-v1.1-ps-20170202.html#tlv-tags>

use std::fmt;

pub use crate::utils::repr_enum::CodeOutOfRange;
use crate::UafError;

repr_enum! {
    /// Tags of the UAF authenticator command TLV registry used in assertions.
    Tag: u16 {
        /// Authenticator response to a register command.
        RegAssertion: 0x3E01 => "TAG_UAFV1_REG_ASSERTION",
        /// Authenticator response to a sign command.
        AuthAssertion: 0x3E02 => "TAG_UAFV1_AUTH_ASSERTION",
        /// Key registration data, the part of a registration that gets signed.
        Krd: 0x3E03 => "TAG_UAFV1_KRD",
        /// The part of an authentication that gets signed.
        SignedData: 0x3E04 => "TAG_UAFV1_SIGNED_DATA",
        /// DER encoded attestation certificate.
        AttestationCert: 0x2E05 => "TAG_ATTESTATION_CERT",
        /// A cryptographic signature.
        Signature: 0x2E06 => "TAG_SIGNATURE",
        /// Full basic attestation: signature plus certificate chain.
        AttestationBasicFull: 0x3E07 => "TAG_ATTESTATION_BASIC_FULL",
        /// Surrogate basic attestation: signed with the freshly registered key itself.
        AttestationBasicSurrogate: 0x3E08 => "TAG_ATTESTATION_BASIC_SURROGATE",
        /// The key identifier of a registered key.
        KeyId: 0x2E09 => "TAG_KEYID",
        /// SHA-256 of the final challenge parameters.
        FinalChallengeHash: 0x2E0A => "TAG_FINAL_CHALLENGE_HASH",
        /// Authenticator attestation identifier.
        Aaid: 0x2E0B => "TAG_AAID",
        /// The public key of a newly registered key.
        PubKey: 0x2E0C => "TAG_PUB_KEY",
        /// Signature and registration counters.
        Counters: 0x2E0D => "TAG_COUNTERS",
        /// Authenticator version, mode and algorithm information.
        AssertionInfo: 0x2E0E => "TAG_ASSERTION_INFO",
        /// Random nonce picked by the authenticator.
        AuthenticatorNonce: 0x2E0F => "TAG_AUTHENTICATOR_NONCE",
        /// Hash of the transaction content shown to the user, empty when there is none.
        TransactionContentHash: 0x2E10 => "TAG_TRANSACTION_CONTENT_HASH",
        /// A critical extension.
        Extension: 0x3E11 => "TAG_EXTENSION",
        /// A non critical extension.
        ExtensionNonCritical: 0x3E12 => "TAG_EXTENSION_NON_CRITICAL",
        /// Identifier of an extension.
        ExtensionId: 0x2E13 => "TAG_EXTENSION_ID",
        /// Payload of an extension.
        ExtensionData: 0x2E14 => "TAG_EXTENSION_DATA",
    }
}

repr_enum! {
    /// Signature algorithm and encoding identifiers, `UAF_ALG_SIGN_*`.
    SignatureAlgorithm: u16 {
        /// ECDSA over P-256 with SHA-256, `r | s` as two 32 byte big-endian integers.
        Secp256r1EcdsaSha256Raw: 0x0001 => "UAF_ALG_SIGN_SECP256R1_ECDSA_SHA256_RAW",
        /// ECDSA over P-256 with SHA-256, DER `SEQUENCE { r INTEGER, s INTEGER }`.
        Secp256r1EcdsaSha256Der: 0x0002 => "UAF_ALG_SIGN_SECP256R1_ECDSA_SHA256_DER",
        /// RSASSA-PSS with SHA-256, raw.
        RsassaPssSha256Raw: 0x0003 => "UAF_ALG_SIGN_RSASSA_PSS_SHA256_RAW",
        /// RSASSA-PSS with SHA-256, DER.
        RsassaPssSha256Der: 0x0004 => "UAF_ALG_SIGN_RSASSA_PSS_SHA256_DER",
    }
}

repr_enum! {
    /// Public key encoding identifiers, `UAF_ALG_KEY_*`.
    PublicKeyEncoding: u16 {
        /// Uncompressed X9.62 point.
        EccX962Raw: 0x0100 => "UAF_ALG_KEY_ECC_X962_RAW",
        /// DER `SubjectPublicKeyInfo` of an EC key.
        EccX962Der: 0x0101 => "UAF_ALG_KEY_ECC_X962_DER",
        /// Raw RSA modulus and exponent.
        Rsa2048PssRaw: 0x0102 => "UAF_ALG_KEY_RSA_2048_PSS_RAW",
        /// DER RSA public key.
        Rsa2048PssDer: 0x0103 => "UAF_ALG_KEY_RSA_2048_PSS_DER",
    }
}

/// Failure to encode or decode a TLV structure.
#[derive(Debug, PartialEq, Eq)]
pub enum TlvError {
    /// The value does not fit the 16 bit length field.
    ValueTooLong {
        /// Tag of the offending item.
        tag: Tag,
        /// Length of the value that was given.
        len: usize,
    },
    /// The input ended inside an item's header or value.
    Truncated {
        /// Offset of the item that could not be read.
        offset: usize,
    },
}

impl fmt::Display for TlvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlvError::ValueTooLong { tag, len } => {
                write!(f, "value of {tag} is {len} bytes, more than a TLV can hold")
            }
            TlvError::Truncated { offset } => write!(f, "TLV item at offset {offset} is truncated"),
        }
    }
}

impl std::error::Error for TlvError {}

impl From<TlvError> for UafError {
    fn from(err: TlvError) -> Self {
        UafError::Serialization(err.to_string())
    }
}

/// Accumulates TLV items in order.
#[derive(Debug, Default, Clone)]
pub struct TlvWriter {
    buf: Vec<u8>,
}

impl TlvWriter {
    /// An empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one item.
    pub fn push(&mut self, tag: Tag, value: &[u8]) -> Result<&mut Self, TlvError> {
        let len = u16::try_from(value.len()).map_err(|_| TlvError::ValueTooLong {
            tag,
            len: value.len(),
        })?;
        self.buf.extend(tag.as_primitive().to_le_bytes());
        self.buf.extend(len.to_le_bytes());
        self.buf.extend_from_slice(value);
        Ok(self)
    }

    /// Append a composite item whose value is everything written to `inner`.
    pub fn push_nested(&mut self, tag: Tag, inner: &TlvWriter) -> Result<&mut Self, TlvError> {
        self.push(tag, inner.as_bytes())
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// A single decoded item borrowing its value from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    /// The raw tag. Unknown tags are kept as is.
    pub tag: u16,
    /// The item's value.
    pub value: &'a [u8],
}

impl<'a> Tlv<'a> {
    /// The tag if it is a registered one.
    pub fn known_tag(&self) -> Option<Tag> {
        Tag::try_from(self.tag).ok()
    }

    /// Decode the value of a composite item.
    pub fn children(&self) -> Result<Vec<Tlv<'a>>, TlvError> {
        parse(self.value)
    }
}

/// Decode one level of TLV items. Composite values are left for [`Tlv::children`].
pub fn parse(data: &[u8]) -> Result<Vec<Tlv<'_>>, TlvError> {
    let mut items = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let header = data
            .get(offset..offset + 4)
            .ok_or(TlvError::Truncated { offset })?;
        let tag = u16::from_le_bytes([header[0], header[1]]);
        let len = usize::from(u16::from_le_bytes([header[2], header[3]]));
        let value = data
            .get(offset + 4..offset + 4 + len)
            .ok_or(TlvError::Truncated { offset })?;
        items.push(Tlv { tag, value });
        offset += 4 + len;
    }
    Ok(items)
}
