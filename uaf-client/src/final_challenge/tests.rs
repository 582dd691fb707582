use uaf_types::encoding;

use super::*;

const FC_PARAMS: &str = "eyJBcHBJRCI6Imh0dHBzOi8vZXhhbXBsZS5jb20iLCJDaGFsbGVuZ2UiOiJhYmMxMjMiLCJGYWNldElEIjoiYW5kcm9pZDphcGsta2V5LWhhc2g6WFlaIn0=";

#[test]
fn known_vector() {
    let canonical =
        canonicalize("https://example.com", "abc123", "android:apk-key-hash:XYZ").unwrap();

    assert_eq!(canonical.fc_params, FC_PARAMS);
    assert_eq!(
        canonical.hash,
        [
            0x7c, 0x2a, 0xa4, 0xec, 0xc1, 0x47, 0x35, 0xa9, 0xa7, 0x22, 0x90, 0x8f, 0x7b, 0xd2,
            0xfe, 0x8e, 0x92, 0x3a, 0x1a, 0x87, 0x3e, 0x4a, 0x53, 0xc9, 0xce, 0xfd, 0x1f, 0x50,
            0xcf, 0x46, 0x52, 0xe5
        ]
    );
}

#[test]
fn fc_params_decode_to_ordered_json() {
    let canonical =
        canonicalize("https://example.com", "abc123", "android:apk-key-hash:XYZ").unwrap();
    let json = encoding::try_from_base64url(&canonical.fc_params).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        r#"{"AppID":"https://example.com","Challenge":"abc123","FacetID":"android:apk-key-hash:XYZ"}"#
    );
}

#[test]
fn hash_is_over_the_encoded_text() {
    let canonical = canonicalize("a", "b", "c").unwrap();
    assert_eq!(canonical.hash, sha256(canonical.fc_params.as_bytes()));

    let json = encoding::try_from_base64url(&canonical.fc_params).unwrap();
    assert_ne!(canonical.hash, sha256(&json));
}

#[test]
fn deterministic() {
    let first = canonicalize("https://rp.example", "Y2hhbGxlbmdl", "ios:bundle-id:rp").unwrap();
    let second = canonicalize("https://rp.example", "Y2hhbGxlbmdl", "ios:bundle-id:rp").unwrap();
    assert_eq!(first, second);

    let other = canonicalize("https://rp.example", "Y2hhbGxlbmdm", "ios:bundle-id:rp").unwrap();
    assert_ne!(first.hash, other.hash);
}

#[test]
fn empty_fields_are_still_encoded() {
    let canonical = canonicalize("", "", "").unwrap();
    let json = encoding::try_from_base64url(&canonical.fc_params).unwrap();
    assert_eq!(json, br#"{"AppID":"","Challenge":"","FacetID":""}"#);
    // padded alphabet
    assert!(canonical.fc_params.ends_with('='));
}

#[test]
fn html_characters_are_escaped() {
    let canonical = canonicalize(
        "https://example.com/facets?a=1&b=2",
        "<script>",
        "ios:bundle-id:a\u{2028}b",
    )
    .unwrap();

    let json = encoding::try_from_base64url(&canonical.fc_params).unwrap();
    assert_eq!(
        String::from_utf8(json).unwrap(),
        r#"{"AppID":"https://example.com/facets?a=1\u0026b=2","Challenge":"\u003cscript\u003e","FacetID":"ios:bundle-id:a\u2028b"}"#
    );
}

#[test]
fn escaped_json_still_decodes_to_the_inputs() {
    let canonical = canonicalize("https://rp.example/?x=<y>&z", "c", "f").unwrap();
    let json = encoding::try_from_base64url(&canonical.fc_params).unwrap();
    let params: FinalChallengeParams = serde_json::from_slice(&json).unwrap();
    assert_eq!(params.app_id, "https://rp.example/?x=<y>&z");
    assert_eq!(params.challenge, "c");
    assert_eq!(params.facet_id, "f");
}
