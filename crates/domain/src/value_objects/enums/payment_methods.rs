use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Payment channels offered by the gateway's all-in-one checkout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Atm,
    Cvs,
    Barcode,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::Atm => "atm",
            PaymentMethod::Cvs => "cvs",
            PaymentMethod::Barcode => "barcode",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "credit_card" => Some(PaymentMethod::CreditCard),
            "atm" => Some(PaymentMethod::Atm),
            "cvs" => Some(PaymentMethod::Cvs),
            "barcode" => Some(PaymentMethod::Barcode),
            _ => None,
        }
    }

    /// Value for the gateway's `ChoosePayment` form field.
    pub fn gateway_choose_payment(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit",
            PaymentMethod::Atm => "ATM",
            PaymentMethod::Cvs => "CVS",
            PaymentMethod::Barcode => "BARCODE",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
