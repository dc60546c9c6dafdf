use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::enums::payment_methods::PaymentMethod;

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Gateway correlation keys are capped at 20 characters (MerchantTradeNo
/// limit), so: YYMMDDHHMMSS timestamp + 6 random chars = 18.
pub fn generate_order_number() -> String {
    let timestamp = Utc::now().format("%y%m%d%H%M%S");
    format!("{}{}", timestamp, random_suffix(6))
}

pub(crate) fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderModel {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDto {
    pub id: Uuid,
    pub order_number: String,
    pub plan_id: Uuid,
    pub subscription_id: Option<Uuid>,
    pub amount_minor: i32,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_fits_gateway_limit() {
        let number = generate_order_number();
        assert_eq!(number.len(), 18);
        assert!(number.len() <= 20);
        assert!(number.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn suffix_is_uppercase_alphanumeric() {
        let suffix = random_suffix(64);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
