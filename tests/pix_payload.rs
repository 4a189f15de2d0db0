use aldoria_server::payments::{PixIssuer, StaticPixIssuer, build_br_code};

#[test]
fn br_code_has_emv_framing() {
    let payload = build_br_code(
        "pagamentos@aldoria.example",
        "ALDORIA GAMES",
        "SAO PAULO",
        1990,
        "ABC123",
    );
    assert!(payload.starts_with("000201"), "payload: {}", payload);
    assert!(payload.contains("br.gov.bcb.pix"));
    assert!(payload.contains("ALDORIA GAMES"));
    assert!(payload.contains("5303986")); // currency = BRL
    assert!(payload.contains("19.90"));
    assert!(payload.contains("ABC123"));
    // CRC field: id 63, length 04, then four uppercase hex digits.
    let crc_pos = payload.len() - 8;
    assert_eq!(&payload[crc_pos..crc_pos + 4], "6304");
    assert!(
        payload[crc_pos + 4..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
    );
}

#[test]
fn br_code_is_deterministic_for_same_inputs() {
    let a = build_br_code("key", "NAME", "CITY", 500, "TX1");
    let b = build_br_code("key", "NAME", "CITY", 500, "TX1");
    assert_eq!(a, b);
    let c = build_br_code("key", "NAME", "CITY", 501, "TX1");
    assert_ne!(a, c);
}

#[test]
fn static_issuer_caps_txid_at_br_code_limit() {
    let issuer = StaticPixIssuer::new("key@example.com");
    let charge = tokio_test::block_on(issuer.issue(2990, "Starlight Cloak")).unwrap();
    assert_eq!(charge.txid.len(), 25);
    assert!(charge.txid.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(charge.copy_paste.contains(&charge.txid));
    assert!(charge.expires_at > chrono::Utc::now());
}

#[test]
fn static_issuer_rejects_non_positive_amounts() {
    let issuer = StaticPixIssuer::new("key@example.com");
    assert!(tokio_test::block_on(issuer.issue(0, "Nothing")).is_err());
    assert!(tokio_test::block_on(issuer.issue(-100, "Refund")).is_err());
}
