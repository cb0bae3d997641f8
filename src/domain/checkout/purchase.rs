//! Purchase request - the pricing and student data behind one checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::CheckoutError;

/// Label recorded when a purchase carries no discount reason.
pub const NO_DISCOUNT_LABEL: &str = "no discount";

/// How the program price is split into charges.
///
/// Any tag other than `enrollment` is treated as a pure installment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// One-time enrollment fee, optionally followed by monthly fees.
    Enrollment,

    /// Equal monthly installments only.
    #[serde(other)]
    Installments,
}

impl PaymentType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "enrollment" => PaymentType::Enrollment,
            _ => PaymentType::Installments,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Enrollment => "enrollment",
            PaymentType::Installments => "installments",
        }
    }
}

/// A tuition program purchase as submitted by the storefront.
///
/// Exists only for the duration of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRequest {
    pub program_name: String,
    pub final_price: Decimal,
    pub payment_type: PaymentType,
    pub installments_count: u32,
    pub enrollment_fee: Decimal,
    pub monthly_fee: Decimal,
    pub student_name: String,
    pub student_email: String,
    pub discount_reason: Option<String>,
}

impl PurchaseRequest {
    /// Discount reason, or the "no discount" label when absent or blank.
    pub fn discount_label(&self) -> &str {
        match self.discount_reason.as_deref() {
            Some(reason) if !reason.is_empty() => reason,
            _ => NO_DISCOUNT_LABEL,
        }
    }

    /// Reject negative fees before anything is sent to the processor.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.enrollment_fee < Decimal::ZERO {
            return Err(CheckoutError::invalid_amount(
                "enrollmentFee",
                self.enrollment_fee,
            ));
        }
        if self.monthly_fee < Decimal::ZERO {
            return Err(CheckoutError::invalid_amount("monthlyFee", self.monthly_fee));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::purchase;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn payment_type_parses_known_tags() {
        assert_eq!(PaymentType::from_tag("enrollment"), PaymentType::Enrollment);
        assert_eq!(PaymentType::from_tag("installments"), PaymentType::Installments);
    }

    #[test]
    fn unknown_payment_type_falls_back_to_installments() {
        assert_eq!(PaymentType::from_tag("monthly"), PaymentType::Installments);
        let parsed: PaymentType = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(parsed, PaymentType::Installments);
    }

    #[test]
    fn discount_label_defaults_when_absent() {
        let request = purchase(PaymentType::Enrollment, dec!(100), dec!(50), 6);
        assert_eq!(request.discount_label(), NO_DISCOUNT_LABEL);
    }

    #[test]
    fn discount_label_defaults_when_blank() {
        let mut request = purchase(PaymentType::Enrollment, dec!(100), dec!(50), 6);
        request.discount_reason = Some(String::new());
        assert_eq!(request.discount_label(), NO_DISCOUNT_LABEL);
    }

    #[test]
    fn discount_label_uses_reason() {
        let mut request = purchase(PaymentType::Enrollment, dec!(100), dec!(50), 6);
        request.discount_reason = Some("sibling".to_string());
        assert_eq!(request.discount_label(), "sibling");
    }

    #[test]
    fn validate_accepts_zero_fees() {
        let request = purchase(PaymentType::Enrollment, dec!(0), dec!(0), 0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_enrollment_fee() {
        let request = purchase(PaymentType::Enrollment, dec!(-1), dec!(50), 6);
        assert!(matches!(
            request.validate(),
            Err(CheckoutError::InvalidAmount { field: "enrollmentFee", .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_monthly_fee() {
        let request = purchase(PaymentType::Installments, dec!(0), dec!(-80), 1);
        assert!(matches!(
            request.validate(),
            Err(CheckoutError::InvalidAmount { field: "monthlyFee", .. })
        ));
    }
}
