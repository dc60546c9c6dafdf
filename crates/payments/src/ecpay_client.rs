use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{DateTime, FixedOffset, Utc};
use md5::Md5;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const CHECK_MAC_FIELD: &str = "CheckMacValue";

/// Digest scheme selected per merchant account (`EncryptType` form field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptType {
    Md5,
    Sha256,
}

impl EncryptType {
    pub fn form_value(&self) -> &'static str {
        match self {
            EncryptType::Md5 => "0",
            EncryptType::Sha256 => "1",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EcpayConfig {
    pub merchant_id: String,
    pub hash_key: String,
    pub hash_iv: String,
    pub payment_url: String,
    pub return_url: String,
    pub client_back_url: String,
    pub encrypt_type: EncryptType,
}

/// ECPay all-in-one checkout client built on reqwest. The shared-secret
/// digest (CheckMacValue) is symmetric: the same algorithm signs outbound
/// payment forms and verifies inbound callbacks.
pub struct EcpayClient {
    http: reqwest::Client,
    config: EcpayConfig,
}

impl EcpayClient {
    pub fn new(config: EcpayConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build http client"),
            config,
        }
    }

    /// CheckMacValue over `params`, excluding any existing CheckMacValue key.
    /// Reference: https://developers.ecpay.com.tw/?p=2509
    pub fn generate_check_mac_value(&self, params: &BTreeMap<String, String>) -> String {
        // BTreeMap iteration is already the required lexicographic key order.
        let param_str = params
            .iter()
            .filter(|(key, _)| key.as_str() != CHECK_MAC_FIELD)
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let raw = format!(
            "HashKey={}&{}&HashIV={}",
            self.config.hash_key, param_str, self.config.hash_iv
        );
        let encoded = ecpay_urlencode(&raw);
        debug!(encoded, "check mac input after gateway encoding");

        let digest = match self.config.encrypt_type {
            EncryptType::Md5 => hex::encode(Md5::digest(encoded.as_bytes())),
            EncryptType::Sha256 => hex::encode(Sha256::digest(encoded.as_bytes())),
        };

        digest.to_uppercase()
    }

    /// True when the supplied CheckMacValue matches the digest recomputed
    /// from the other fields. Absent signature counts as a mismatch.
    pub fn verify_callback(&self, fields: &BTreeMap<String, String>) -> bool {
        let Some(received) = fields.get(CHECK_MAC_FIELD) else {
            warn!("callback carried no CheckMacValue field");
            return false;
        };

        let calculated = self.generate_check_mac_value(fields);
        let is_valid = *received == calculated;
        if !is_valid {
            warn!(
                merchant_trade_no = fields.get("MerchantTradeNo").map(String::as_str),
                "callback CheckMacValue mismatch"
            );
        }

        is_valid
    }

    /// Form fields for redirect submission to the gateway's checkout page,
    /// signed with the same digest the callback verifier checks.
    pub fn build_payment_form(
        &self,
        merchant_trade_no: &str,
        total_amount: i64,
        item_name: &str,
        trade_desc: &str,
        choose_payment: &str,
    ) -> BTreeMap<String, String> {
        let mut params = BTreeMap::from([
            ("MerchantID".to_string(), self.config.merchant_id.clone()),
            ("MerchantTradeNo".to_string(), merchant_trade_no.to_string()),
            (
                "MerchantTradeDate".to_string(),
                taipei_now().format("%Y/%m/%d %H:%M:%S").to_string(),
            ),
            ("PaymentType".to_string(), "aio".to_string()),
            ("TotalAmount".to_string(), total_amount.to_string()),
            ("TradeDesc".to_string(), trade_desc.to_string()),
            ("ItemName".to_string(), item_name.to_string()),
            ("ReturnURL".to_string(), self.config.return_url.clone()),
            (
                "ClientBackURL".to_string(),
                self.config.client_back_url.clone(),
            ),
            ("ChoosePayment".to_string(), choose_payment.to_string()),
            (
                "EncryptType".to_string(),
                self.config.encrypt_type.form_value().to_string(),
            ),
        ]);

        let check_mac = self.generate_check_mac_value(&params);
        params.insert(CHECK_MAC_FIELD.to_string(), check_mac);
        params
    }

    pub fn payment_url(&self) -> &str {
        &self.config.payment_url
    }

    /// QueryTradeInfo: server-to-server trade status lookup, response is a
    /// flat `key=value&...` document.
    pub async fn query_trade_info(
        &self,
        merchant_trade_no: &str,
        query_url: &str,
    ) -> Result<BTreeMap<String, String>> {
        let mut params = BTreeMap::from([
            ("MerchantID".to_string(), self.config.merchant_id.clone()),
            ("MerchantTradeNo".to_string(), merchant_trade_no.to_string()),
            ("TimeStamp".to_string(), Utc::now().timestamp().to_string()),
        ]);
        let check_mac = self.generate_check_mac_value(&params);
        params.insert(CHECK_MAC_FIELD.to_string(), check_mac);

        let response = self.http.post(query_url).form(&params).send().await?;
        if !response.status().is_success() {
            bail!("trade query returned status {}", response.status());
        }

        let body = response.text().await?;
        let mut result = BTreeMap::new();
        for pair in body.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                result.insert(key.to_string(), value.to_string());
            }
        }

        Ok(result)
    }
}

/// The gateway reads MerchantTradeDate as Taiwan local time (UTC+8).
fn taipei_now() -> DateTime<FixedOffset> {
    let taipei = FixedOffset::east_opt(8 * 3600).expect("UTC+8 is in range");
    Utc::now().with_timezone(&taipei)
}

/// The gateway's exact encoding: quote-plus (space to `+`, `A-Za-z0-9`,
/// `-`, `_`, `.`, `~` kept raw, everything else `%XX`), then the entire
/// string lowercased, then the characters the gateway spec lists restored
/// from their escapes.
fn ecpay_urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for &byte in raw.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }

    out.to_lowercase()
        .replace("%2d", "-")
        .replace("%5f", "_")
        .replace("%2e", ".")
        .replace("%21", "!")
        .replace("%2a", "*")
        .replace("%28", "(")
        .replace("%29", ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(encrypt_type: EncryptType) -> EcpayClient {
        EcpayClient::new(EcpayConfig {
            merchant_id: "2000132".to_string(),
            hash_key: "5294y06JbISpM5x9".to_string(),
            hash_iv: "v77hoKGq4kWxNNIS".to_string(),
            payment_url: "https://payment-stage.ecpay.com.tw/Cashier/AioCheckOut/V5".to_string(),
            return_url: "https://example.com/webhooks/ecpay/callback".to_string(),
            client_back_url: "https://example.com/orders".to_string(),
            encrypt_type,
        })
    }

    #[test]
    fn urlencode_matches_gateway_rules() {
        assert_eq!(ecpay_urlencode("a b"), "a+b");
        assert_eq!(ecpay_urlencode("Test=1&X!*()~"), "test%3d1%26x!*()~");
        assert_eq!(ecpay_urlencode("Keep-safe_chars.OK"), "keep-safe_chars.ok");
        assert_eq!(ecpay_urlencode("100%"), "100%25");
    }

    #[test]
    fn payment_form_round_trips_through_verifier() {
        let client = client(EncryptType::Sha256);
        let form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "Credit");

        assert_eq!(form.get("MerchantID").unwrap(), "2000132");
        assert_eq!(form.get("TotalAmount").unwrap(), "990");
        assert!(form.contains_key("CheckMacValue"));
        assert!(client.verify_callback(&form));
    }

    #[test]
    fn md5_mode_round_trips_too() {
        let client = client(EncryptType::Md5);
        let form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "ATM");
        assert_eq!(form.get("EncryptType").unwrap(), "0");
        assert!(client.verify_callback(&form));
    }

    #[test]
    fn any_single_field_mutation_breaks_verification() {
        let client = client(EncryptType::Sha256);
        let form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "Credit");

        for key in ["MerchantTradeNo", "TotalAmount", "ItemName", "ReturnURL"] {
            let mut tampered = form.clone();
            let mut value = tampered.get(key).unwrap().clone();
            value.push('x');
            tampered.insert(key.to_string(), value);
            assert!(!client.verify_callback(&tampered), "{key} mutation accepted");
        }
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let client = client(EncryptType::Sha256);
        let mut form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "Credit");

        let mac = form.get("CheckMacValue").unwrap().clone();
        let flipped = if mac.starts_with('A') {
            format!("B{}", &mac[1..])
        } else {
            format!("A{}", &mac[1..])
        };
        form.insert("CheckMacValue".to_string(), flipped);
        assert!(!client.verify_callback(&form));
    }

    #[test]
    fn missing_signature_is_rejected() {
        let client = client(EncryptType::Sha256);
        let mut form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "Credit");
        form.remove("CheckMacValue");
        assert!(!client.verify_callback(&form));
    }

    #[test]
    fn trade_date_is_taiwan_local_time() {
        let client = client(EncryptType::Sha256);
        let form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "Credit");

        let stamped = chrono::NaiveDateTime::parse_from_str(
            form.get("MerchantTradeDate").unwrap(),
            "%Y/%m/%d %H:%M:%S",
        )
        .unwrap();
        let expected = taipei_now().naive_local();
        let skew = (expected - stamped).num_seconds().abs();
        assert!(skew < 60, "trade date off by {skew}s from UTC+8 clock");
    }

    #[test]
    fn digest_ignores_embedded_check_mac_field() {
        let client = client(EncryptType::Sha256);
        let form = client.build_payment_form("250101120000ABC123", 990, "Pro Plan", "Subscription", "Credit");

        let mut without_mac = form.clone();
        without_mac.remove("CheckMacValue");
        assert_eq!(
            client.generate_check_mac_value(&form),
            client.generate_check_mac_value(&without_mac)
        );
    }
}
