use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::value_objects::orders::random_suffix;

/// Taiwan business tax, applied to TWD invoices: 5% expressed in basis points.
const TAX_RATE_BP: i64 = 500;

/// INV + YYMMDDHHMMSS + 5 random chars = 20 characters.
pub fn generate_invoice_number() -> String {
    let timestamp = Utc::now().format("%y%m%d%H%M%S");
    format!("INV{}{}", timestamp, random_suffix(5))
}

/// Tax owed for an order amount, rounded down to the minor unit.
pub fn tax_amount_minor(amount_minor: i32) -> i32 {
    ((amount_minor as i64 * TAX_RATE_BP) / 10_000) as i32
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDto {
    pub id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub amount_minor: i32,
    pub tax_amount_minor: i32,
    pub total_amount_minor: i32,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_number_has_fixed_shape() {
        let number = generate_invoice_number();
        assert_eq!(number.len(), 20);
        assert!(number.starts_with("INV"));
    }

    #[test]
    fn five_percent_tax_on_round_amounts() {
        // 990.00 TWD -> 49.50 tax
        assert_eq!(tax_amount_minor(99_000), 4_950);
        assert_eq!(tax_amount_minor(0), 0);
    }

    #[test]
    fn tax_rounds_down_to_minor_unit() {
        // 0.33 -> 0.0165, keeps 0.01
        assert_eq!(tax_amount_minor(33), 1);
    }
}
