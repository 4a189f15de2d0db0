//! PIX charge issuing.
//!
//! The concrete payment gateway lives outside this service; what the game
//! needs is a copy-paste BR Code for the client to render and a txid the
//! gateway webhook will echo back. `PixIssuer` is the seam: production
//! wires a gateway client here, tests and local runs use the static
//! issuer, which builds a well-formed BR Code payload itself.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::constants::PIX_EXPIRY_MINUTES;

#[derive(Debug, thiserror::Error)]
pub enum PixError {
    #[error("pix issuer rejected the charge: {0}")]
    Rejected(String),
}

/// An issued charge, ready to hand to the browser client.
#[derive(Debug, Clone)]
pub struct PixCharge {
    pub txid: String,
    pub copy_paste: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait PixIssuer: Send + Sync {
    async fn issue(&self, amount_cents: i64, description: &str) -> Result<PixCharge, PixError>;
}

/// Issues charges locally against a fixed PIX key. No network calls.
pub struct StaticPixIssuer {
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
}

impl StaticPixIssuer {
    pub fn new(pix_key: impl Into<String>) -> Self {
        StaticPixIssuer {
            pix_key: pix_key.into(),
            merchant_name: "ALDORIA GAMES".to_string(),
            merchant_city: "SAO PAULO".to_string(),
        }
    }
}

#[async_trait]
impl PixIssuer for StaticPixIssuer {
    async fn issue(&self, amount_cents: i64, _description: &str) -> Result<PixCharge, PixError> {
        if amount_cents <= 0 {
            return Err(PixError::Rejected("amount must be positive".to_string()));
        }
        // BR Code txids are capped at 25 alphanumeric characters.
        let txid: String = Uuid::new_v4().simple().to_string()[..25].to_string();
        let copy_paste = build_br_code(
            &self.pix_key,
            &self.merchant_name,
            &self.merchant_city,
            amount_cents,
            &txid,
        );
        Ok(PixCharge {
            txid,
            copy_paste,
            expires_at: Utc::now() + Duration::minutes(PIX_EXPIRY_MINUTES),
        })
    }
}

fn emv_field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.len(), value)
}

/// Assembles a static-initiation PIX BR Code (EMV QRCPS-MPM layout).
pub fn build_br_code(
    pix_key: &str,
    merchant_name: &str,
    merchant_city: &str,
    amount_cents: i64,
    txid: &str,
) -> String {
    let account = format!(
        "{}{}",
        emv_field("00", "br.gov.bcb.pix"),
        emv_field("01", pix_key)
    );
    let amount = format!("{}.{:02}", amount_cents / 100, amount_cents % 100);
    let additional = emv_field("05", txid);

    let mut payload = String::new();
    payload.push_str(&emv_field("00", "01")); // payload format indicator
    payload.push_str(&emv_field("26", &account));
    payload.push_str(&emv_field("52", "0000")); // merchant category
    payload.push_str(&emv_field("53", "986")); // BRL
    payload.push_str(&emv_field("54", &amount));
    payload.push_str(&emv_field("58", "BR"));
    payload.push_str(&emv_field("59", merchant_name));
    payload.push_str(&emv_field("60", merchant_city));
    payload.push_str(&emv_field("62", &additional));
    payload.push_str("6304"); // CRC field header; the CRC covers it
    let crc = crc16_ccitt(payload.as_bytes());
    payload.push_str(&format!("{:04X}", crc));
    payload
}

/// CRC-16/CCITT-FALSE as mandated by the EMV QR spec.
fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
