use p256::{
    ecdsa::{signature::Verifier, Signature, VerifyingKey},
    pkcs8::DecodePublicKey,
};
use serde_json::{json, Value};
use uaf_authenticator::{generate_key_pair, KeyPair, MockAssertionSigner, MODE_TRANSACTION_CONFIRMED};
use uaf_types::{
    crypto::sha256,
    encoding,
    tlv::{self, Tag, TlvWriter},
    ResponseEntry, UafError,
};

use super::*;

const FACET_ID: &str = "android:apk-key-hash:XYZ";
const AAID: &str = "ABCD#0001";
const KEY_ID: &str = "ZHVtbXkta2V5LWlk";

fn reg_request() -> String {
    json!([{
        "header": {
            "upv": { "major": 1, "minor": 0 },
            "op": "Reg",
            "appID": "https://example.com",
            "serverData": "c2VydmVyLWRhdGE"
        },
        "challenge": "abc123",
        "username": "alice",
        "policy": { "accepted": [[{ "aaid": [AAID] }]] }
    }])
    .to_string()
}

fn auth_request() -> String {
    json!([{
        "header": {
            "upv": { "major": 1, "minor": 0 },
            "op": "Auth",
            "appID": "https://example.com",
            "serverData": "YXV0aC1zZXJ2ZXItZGF0YQ"
        },
        "challenge": "ZGVmNDU2"
    }])
    .to_string()
}

fn credential(pair: &KeyPair) -> Credential<'_> {
    Credential::new(AAID, KEY_ID, &pair.private_key, &pair.public_key)
}

/// Unpack the envelope into its single response entry and its context.
fn unpack(response: &SendUafResponse) -> (ResponseEntry, Value) {
    let envelope: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    let uaf_response = envelope["uafResponse"].as_str().expect("uafResponse is text");
    let context = envelope["context"].as_str().expect("context is text");

    let mut entries: Vec<ResponseEntry> = serde_json::from_str(uaf_response).unwrap();
    assert_eq!(entries.len(), 1);
    (entries.remove(0), serde_json::from_str(context).unwrap())
}

fn assertion_bytes(entry: &ResponseEntry) -> Vec<u8> {
    assert_eq!(entry.assertions.len(), 1);
    assert_eq!(entry.assertions[0].assertion_scheme, "UAFV1TLV");
    encoding::try_from_base64url(&entry.assertions[0].assertion).unwrap()
}

/// The signed block of a registration or authentication assertion and the signature over it.
fn signed_block_and_signature(assertion: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let top = tlv::parse(assertion).unwrap();
    let body = top[0].children().unwrap();

    let mut block = TlvWriter::new();
    block
        .push(body[0].known_tag().unwrap(), body[0].value)
        .unwrap();

    let signature = match body[1].known_tag().unwrap() {
        Tag::AttestationBasicSurrogate => body[1].children().unwrap()[0].value.to_vec(),
        Tag::Signature => body[1].value.to_vec(),
        other => panic!("unexpected {other}"),
    };
    (block.into_bytes(), signature)
}

fn verify(pair: &KeyPair, data: &[u8], signature: &[u8]) {
    let der = encoding::try_from_base64(&pair.public_key).unwrap();
    VerifyingKey::from_public_key_der(&der)
        .unwrap()
        .verify(data, &Signature::from_der(signature).unwrap())
        .expect("signature verifies");
}

#[test]
fn register_produces_a_verifiable_response() {
    let pair = generate_key_pair().unwrap();
    let client = Client::new(FACET_ID);

    let response = client.register(&reg_request(), &credential(&pair)).unwrap();
    let (entry, context) = unpack(&response);

    assert_eq!(context, json!({}));
    assert_eq!(
        serde_json::to_value(&entry.header).unwrap(),
        json!({
            "upv": { "major": 1, "minor": 0 },
            "op": "Reg",
            "appID": "https://example.com",
            "serverData": "c2VydmVyLWRhdGE"
        })
    );
    assert_eq!(
        entry.fc_params,
        canonicalize("https://example.com", "abc123", FACET_ID)
            .unwrap()
            .fc_params
    );

    let assertion = assertion_bytes(&entry);
    let top = tlv::parse(&assertion).unwrap();
    assert_eq!(top[0].known_tag(), Some(Tag::RegAssertion));

    let krd = top[0].children().unwrap()[0].children().unwrap();
    assert_eq!(krd[2].value, sha256(entry.fc_params.as_bytes()));

    let (block, signature) = signed_block_and_signature(&assertion);
    verify(&pair, &block, &signature);
}

#[test]
fn authenticate_puts_the_username_in_the_context() {
    let pair = generate_key_pair().unwrap();
    let client = Client::new(FACET_ID);

    let response = client
        .authenticate(&auth_request(), &credential(&pair), "alice")
        .unwrap();
    let (entry, context) = unpack(&response);

    assert_eq!(context, json!({ "username": "alice" }));
    assert_eq!(entry.header.server_data.as_deref(), Some("YXV0aC1zZXJ2ZXItZGF0YQ"));

    let assertion = assertion_bytes(&entry);
    let top = tlv::parse(&assertion).unwrap();
    assert_eq!(top[0].known_tag(), Some(Tag::AuthAssertion));

    let (block, signature) = signed_block_and_signature(&assertion);
    verify(&pair, &block, &signature);
}

#[test]
fn the_envelope_holds_json_text() {
    let pair = generate_key_pair().unwrap();
    let response = Client::new(FACET_ID)
        .authenticate(&auth_request(), &credential(&pair), "bob")
        .unwrap();

    let envelope: Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
    let object = envelope.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object["uafResponse"].is_string());
    assert!(object["context"].is_string());

    let entries: Value = serde_json::from_str(object["uafResponse"].as_str().unwrap()).unwrap();
    let entry = &entries[0];
    assert!(entry["header"].is_object());
    assert!(entry["fcParams"].is_string());
    assert_eq!(entry["assertions"][0]["assertionScheme"], "UAFV1TLV");
}

#[test]
fn missing_app_id_falls_back_to_the_facet() {
    let pair = generate_key_pair().unwrap();
    let request = json!([{
        "header": { "upv": { "major": 1, "minor": 0 }, "op": "Reg" },
        "challenge": "abc123"
    }])
    .to_string();

    let response = Client::new(FACET_ID)
        .register(&request, &credential(&pair))
        .unwrap();
    let (entry, _) = unpack(&response);

    let params = encoding::try_from_base64url(&entry.fc_params).unwrap();
    let params: Value = serde_json::from_slice(&params).unwrap();
    assert_eq!(params["AppID"], FACET_ID);
    assert_eq!(params["FacetID"], FACET_ID);
    assert!(entry.header.app_id.is_none());
}

#[test]
fn empty_and_malformed_requests_are_rejected() {
    let pair = generate_key_pair().unwrap();
    let client = Client::new(FACET_ID);

    for request in ["[]", "", "{}", "[{\"challenge\": 1}]"] {
        let err = client.register(request, &credential(&pair)).unwrap_err();
        assert!(matches!(err, UafError::RequestParse(_)), "{request}: {err}");

        let err = client
            .authenticate(request, &credential(&pair), "alice")
            .unwrap_err();
        assert!(matches!(err, UafError::RequestParse(_)), "{request}: {err}");
    }
}

#[test]
fn only_the_first_entry_is_answered() {
    let pair = generate_key_pair().unwrap();
    let request = json!([
        { "header": { "op": "Auth", "appID": "https://first.example" }, "challenge": "one" },
        { "header": { "op": "Auth", "appID": "https://second.example" }, "challenge": "two" }
    ])
    .to_string();

    let response = Client::new(FACET_ID)
        .authenticate(&request, &credential(&pair), "alice")
        .unwrap();
    let (entry, _) = unpack(&response);
    assert_eq!(entry.header.app_id.as_deref(), Some("https://first.example"));
    assert_eq!(
        entry.fc_params,
        canonicalize("https://first.example", "one", FACET_ID)
            .unwrap()
            .fc_params
    );
}

#[test]
fn mismatched_operation_is_still_answered() {
    let pair = generate_key_pair().unwrap();
    let response = Client::new(FACET_ID)
        .register(&auth_request(), &credential(&pair))
        .unwrap();
    let (entry, _) = unpack(&response);
    assert_eq!(entry.header.op, Some(Operation::Auth));
}

#[test]
fn signer_signs_the_caller_supplied_data() {
    let mut signer = MockAssertionSigner::new();
    signer
        .expect_sign()
        .withf(|data, key| data == b"sign me".as_slice() && key == "cHJpdmF0ZQ==")
        .times(1)
        .returning(|_, _| Ok(vec![0x30, 0x00]));

    let client = Client::with_signer(FACET_ID, signer);
    let credential = Credential {
        sign_data: Some("sign me"),
        ..Credential::new(AAID, KEY_ID, "cHJpdmF0ZQ==", "")
    };
    let response = client
        .authenticate(&auth_request(), &credential, "alice")
        .unwrap();

    let (entry, _) = unpack(&response);
    let (_, signature) = signed_block_and_signature(&assertion_bytes(&entry));
    assert_eq!(signature, [0x30, 0x00]);
}

#[test]
fn overridden_signature_is_used_without_signing() {
    let mut signer = MockAssertionSigner::new();
    signer.expect_sign().never();

    let pair = generate_key_pair().unwrap();
    let client = Client::with_signer(FACET_ID, signer);
    let credential = Credential {
        overridden_signature: Some("AQIDBA=="),
        sign_data: Some("never signed"),
        ..credential(&pair)
    };

    let response = client.register(&reg_request(), &credential).unwrap();
    let (entry, _) = unpack(&response);
    let (_, signature) = signed_block_and_signature(&assertion_bytes(&entry));
    assert_eq!(signature, b"AQIDBA==");
}

#[test]
fn transaction_content_is_confirmed() {
    let pair = generate_key_pair().unwrap();
    let request = json!([{
        "header": { "upv": { "major": 1, "minor": 0 }, "op": "Auth", "appID": "https://example.com" },
        "challenge": "ZGVmNDU2",
        "transaction": [
            { "contentType": "image/png", "content": "iVBORw0KGgo" },
            { "contentType": "text/plain", "content": "UGF5IDEwIEVVUg" }
        ]
    }])
    .to_string();

    let response = Client::new(FACET_ID)
        .authenticate(&request, &credential(&pair), "alice")
        .unwrap();
    let (entry, _) = unpack(&response);

    let assertion = assertion_bytes(&entry);
    let top = tlv::parse(&assertion).unwrap();
    let signed_data = top[0].children().unwrap()[0].children().unwrap();
    assert_eq!(signed_data[1].value[2], MODE_TRANSACTION_CONFIRMED);
    assert_eq!(signed_data[4].value, sha256(b"Pay 10 EUR"));

    let (block, signature) = signed_block_and_signature(&assertion);
    verify(&pair, &block, &signature);
}

#[test]
fn profile_counters_reach_the_assertion() {
    let pair = generate_key_pair().unwrap();
    let client =
        Client::new(FACET_ID).profile(AuthenticatorProfile::default().sign_counter(41));

    let response = client
        .authenticate(&auth_request(), &credential(&pair), "alice")
        .unwrap();
    let (entry, _) = unpack(&response);
    let assertion = assertion_bytes(&entry);
    let top = tlv::parse(&assertion).unwrap();
    let signed_data = top[0].children().unwrap()[0].children().unwrap();
    assert_eq!(signed_data[6].value, 41u32.to_le_bytes());
}

#[test]
fn key_errors_are_reported_as_assertion_build_failures() {
    let pair = generate_key_pair().unwrap();
    let client = Client::new(FACET_ID);
    let credential = Credential::new(AAID, KEY_ID, "%%%", &pair.public_key);

    let err = client.register(&reg_request(), &credential).unwrap_err();
    assert!(err.is_input_error());
    assert!(
        matches!(&err, UafError::AssertionBuild(cause) if matches!(**cause, UafError::KeyDecoding(_))),
        "{err}"
    );
}

#[test]
fn credential_debug_hides_the_private_key() {
    let pair = generate_key_pair().unwrap();
    let debug = format!("{:?}", credential(&pair));
    assert!(!debug.contains(&pair.private_key));
    assert!(debug.contains(KEY_ID));
}
