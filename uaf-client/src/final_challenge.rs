use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use uaf_types::{
    crypto::{sha256, SHA256_LEN},
    encoding, FinalChallengeParams, UafError,
};

/// The final challenge parameters in the two forms a response needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalChallenge {
    /// Padded base64url of the JSON serialized [`FinalChallengeParams`], sent as `fcParams`.
    pub fc_params: String,
    /// SHA-256 over the bytes of [`CanonicalChallenge::fc_params`], the text and not the JSON.
    pub hash: [u8; SHA256_LEN],
}

/// Bind the server `challenge` to the application and facet the response is produced for.
///
/// The JSON is written the way existing UAF clients write it: compact, keys in `AppID`,
/// `Challenge`, `FacetID` order, and `<`, `>`, `&`, U+2028 and U+2029 escaped as `\uXXXX`.
/// The result is deterministic: the same three inputs always give the same `fc_params` and hash.
pub fn canonicalize(
    app_id: &str,
    challenge: &str,
    facet_id: &str,
) -> Result<CanonicalChallenge, UafError> {
    let params = FinalChallengeParams {
        app_id: app_id.to_owned(),
        challenge: challenge.to_owned(),
        facet_id: facet_id.to_owned(),
    };

    let mut json = Vec::with_capacity(128);
    params.serialize(&mut Serializer::with_formatter(&mut json, HtmlSafeFormatter))?;
    let fc_params = encoding::base64url_padded(&json);
    log::debug!(
        "Final challenge parameters {} encoded as {fc_params}",
        String::from_utf8_lossy(&json)
    );

    let hash = sha256(fc_params.as_bytes());
    Ok(CanonicalChallenge { fc_params, hash })
}

/// Compact JSON that additionally escapes the characters HTML and JavaScript treat specially.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(&fragment.as_bytes()[start..i])?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

#[cfg(test)]
mod tests;
