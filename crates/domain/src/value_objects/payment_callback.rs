use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Gateway result codes we are willing to interpret. Anything else is
/// rejected fail-closed: guessing the meaning of an unrecognized code risks
/// mismarking a payment.
const SUCCESS_CODE: i64 = 1;
const KNOWN_FAILURE_CODES: [i64; 3] = [0, 10100058, 10300066];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayStatus {
    Paid,
    Failed,
    Unknown,
}

pub fn classify_rtn_code(code: i64) -> GatewayStatus {
    if code == SUCCESS_CODE {
        GatewayStatus::Paid
    } else if KNOWN_FAILURE_CODES.contains(&code) {
        GatewayStatus::Failed
    } else {
        GatewayStatus::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackFieldError {
    Missing(&'static str),
    Malformed(&'static str),
}

impl Display for CallbackFieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackFieldError::Missing(field) => write!(f, "missing required field {field}"),
            CallbackFieldError::Malformed(field) => write!(f, "malformed field {field}"),
        }
    }
}

impl std::error::Error for CallbackFieldError {}

/// Verified gateway callback, parsed from the raw form fields. The full field
/// map is kept verbatim so it can be stored as the order's `payment_data` and
/// reprocessed idempotently from a queued job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackPayload {
    pub merchant_trade_no: String,
    pub trade_no: String,
    pub trade_amt: i64,
    pub rtn_code: i64,
    pub rtn_msg: String,
    pub raw: BTreeMap<String, String>,
}

impl CallbackPayload {
    pub fn from_fields(fields: BTreeMap<String, String>) -> Result<Self, CallbackFieldError> {
        let merchant_trade_no = require(&fields, "MerchantTradeNo")?.to_string();
        let trade_no = require(&fields, "TradeNo")?.to_string();
        let trade_amt = require(&fields, "TradeAmt")?
            .parse::<i64>()
            .map_err(|_| CallbackFieldError::Malformed("TradeAmt"))?;
        let rtn_code = require(&fields, "RtnCode")?
            .parse::<i64>()
            .map_err(|_| CallbackFieldError::Malformed("RtnCode"))?;
        let rtn_msg = fields.get("RtnMsg").cloned().unwrap_or_default();

        Ok(Self {
            merchant_trade_no,
            trade_no,
            trade_amt,
            rtn_code,
            rtn_msg,
            raw: fields,
        })
    }

    /// The gateway reports amounts in whole currency units.
    pub fn amount_minor(&self) -> i64 {
        self.trade_amt * 100
    }

    pub fn status(&self) -> GatewayStatus {
        classify_rtn_code(self.rtn_code)
    }
}

fn require<'a>(
    fields: &'a BTreeMap<String, String>,
    name: &'static str,
) -> Result<&'a str, CallbackFieldError> {
    fields
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or(CallbackFieldError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("MerchantTradeNo".to_string(), "250101120000ABC123".to_string()),
            ("TradeNo".to_string(), "2501011200001234".to_string()),
            ("TradeAmt".to_string(), "990".to_string()),
            ("RtnCode".to_string(), "1".to_string()),
            ("RtnMsg".to_string(), "Succeeded".to_string()),
            ("PaymentType".to_string(), "Credit_CreditCard".to_string()),
        ])
    }

    #[test]
    fn parses_successful_callback() {
        let payload = CallbackPayload::from_fields(fields()).unwrap();
        assert_eq!(payload.merchant_trade_no, "250101120000ABC123");
        assert_eq!(payload.amount_minor(), 99_000);
        assert_eq!(payload.status(), GatewayStatus::Paid);
        assert_eq!(payload.raw.get("PaymentType").unwrap(), "Credit_CreditCard");
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut incomplete = fields();
        incomplete.remove("TradeNo");
        let err = CallbackPayload::from_fields(incomplete).unwrap_err();
        assert_eq!(err, CallbackFieldError::Missing("TradeNo"));
    }

    #[test]
    fn rejects_empty_required_field() {
        let mut blank = fields();
        blank.insert("MerchantTradeNo".to_string(), String::new());
        let err = CallbackPayload::from_fields(blank).unwrap_err();
        assert_eq!(err, CallbackFieldError::Missing("MerchantTradeNo"));
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let mut bad = fields();
        bad.insert("TradeAmt".to_string(), "99O".to_string());
        let err = CallbackPayload::from_fields(bad).unwrap_err();
        assert_eq!(err, CallbackFieldError::Malformed("TradeAmt"));
    }

    #[test]
    fn unknown_rtn_codes_fail_closed() {
        assert_eq!(classify_rtn_code(1), GatewayStatus::Paid);
        assert_eq!(classify_rtn_code(0), GatewayStatus::Failed);
        assert_eq!(classify_rtn_code(10100058), GatewayStatus::Failed);
        assert_eq!(classify_rtn_code(2), GatewayStatus::Unknown);
        assert_eq!(classify_rtn_code(800), GatewayStatus::Unknown);
    }
}
