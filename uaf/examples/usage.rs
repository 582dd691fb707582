//! Sample App for UAF responses
use uaf::UafError;

const FACET_ID: &str = "android:apk-key-hash:XYZ";

fn main() -> Result<(), UafError> {
    // Keys would usually be created once and kept by the test harness between calls
    let (private_key, public_key) = uaf::generate_key_pair()?;
    println!("public key: {public_key}");

    // The following request would usually be retrieved from a Relying Party.
    let registration_request = r#"[{
        "header": {"upv": {"major": 1, "minor": 0}, "op": "Reg", "appID": "https://example.com",
                   "serverData": "cmVnaXN0cmF0aW9u"},
        "challenge": "H9iW9yA9aAXF_lelQoi_DhUk514Ad8Tqv0zCnCqKDpo",
        "username": "alice"
    }]"#;
    let registration = uaf::generate_registration_response(
        "ABCD#0001",
        registration_request,
        FACET_ID,
        "",
        "",
        &private_key,
        &public_key,
        "a2V5LWlk",
    )?;
    println!("registration response: {registration}");

    let authentication_request = r#"[{
        "header": {"upv": {"major": 1, "minor": 0}, "op": "Auth", "appID": "https://example.com",
                   "serverData": "YXV0aGVudGljYXRpb24"},
        "challenge": "qVbuBo1KkfkMmvO4u4H3Fu2ng3rC0eAUnp2KOLRKD8g"
    }]"#;
    let authentication = uaf::generate_authentication_response(
        "ABCD#0001",
        authentication_request,
        FACET_ID,
        "",
        "",
        &private_key,
        &public_key,
        "alice",
        "a2V5LWlk",
    )?;
    println!("authentication response: {authentication}");

    Ok(())
}
