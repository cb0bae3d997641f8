//! HTTP DTOs (Data Transfer Objects) for the payment endpoints.
//!
//! These types define the JSON request/response structure the storefront
//! and the processor see. They serve as the boundary between HTTP and the
//! application layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::checkout::{CheckoutError, PaymentType, PurchaseRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Purchase submitted by the storefront.
///
/// Amounts arrive as JSON numbers or numeric strings, depending on whether
/// the form serialized them. Fees and the installment count are read the
/// way a browser form reads them: absent, null, blank or non-numeric values
/// count as zero, and only the leading numeric part of a string is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequestDto {
    pub program_name: String,
    pub final_price: Decimal,
    /// `enrollment` or `installments`; unknown tags fall back to installments.
    pub payment_type: String,
    #[serde(default)]
    pub installments_count: Option<InstallmentsCount>,
    #[serde(default)]
    pub enrollment_fee: Option<AmountField>,
    #[serde(default)]
    pub monthly_fee: Option<AmountField>,
    pub student_name: String,
    pub student_email: String,
    #[serde(default)]
    pub discount_reason: Option<String>,
}

/// Fee as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(Decimal),
    Text(String),
}

impl AmountField {
    fn resolve(field: Option<&Self>) -> Decimal {
        match field {
            Some(AmountField::Number(amount)) => *amount,
            Some(AmountField::Text(text)) => leading_number(text, true)
                .parse()
                .unwrap_or(Decimal::ZERO),
            None => Decimal::ZERO,
        }
    }
}

/// Installment count as an integer, a float (truncated) or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InstallmentsCount {
    Number(i64),
    Fractional(f64),
    Text(String),
}

impl InstallmentsCount {
    fn resolve(field: Option<&Self>) -> Result<u32, CheckoutError> {
        let raw = match field {
            Some(InstallmentsCount::Number(n)) => *n,
            Some(InstallmentsCount::Fractional(f)) => f.trunc() as i64,
            Some(InstallmentsCount::Text(text)) => {
                let digits = leading_number(text, false);
                if digits.is_empty() {
                    0
                } else {
                    digits.parse::<i64>().map_err(|_| {
                        CheckoutError::malformed_input(format!(
                            "Invalid installmentsCount: {}",
                            text
                        ))
                    })?
                }
            }
            None => 0,
        };

        u32::try_from(raw).map_err(|_| {
            CheckoutError::malformed_input(format!("Invalid installmentsCount: {}", raw))
        })
    }
}

/// Longest leading numeric part of `text`, or "" when there is none.
///
/// A leading `+` is dropped; a trailing `.` is not part of the number.
fn leading_number(text: &str, allow_fraction: bool) -> &str {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in text.char_indices() {
        match c {
            '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if seen_digit {
        text[..end].trim_end_matches('.')
    } else {
        ""
    }
}

impl PurchaseRequestDto {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CheckoutError> {
        serde_json::from_slice(body).map_err(|e| CheckoutError::malformed_input(e.to_string()))
    }
}

impl TryFrom<PurchaseRequestDto> for PurchaseRequest {
    type Error = CheckoutError;

    fn try_from(dto: PurchaseRequestDto) -> Result<Self, Self::Error> {
        Ok(PurchaseRequest {
            installments_count: InstallmentsCount::resolve(dto.installments_count.as_ref())?,
            enrollment_fee: AmountField::resolve(dto.enrollment_fee.as_ref()),
            monthly_fee: AmountField::resolve(dto.monthly_fee.as_ref()),
            program_name: dto.program_name,
            final_price: dto.final_price,
            payment_type: PaymentType::from_tag(&dto.payment_type),
            student_name: dto.student_name,
            student_email: dto.student_email,
            discount_reason: dto.discount_reason,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Redirect target for the hosted checkout page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutUrlResponse {
    pub url: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Webhook acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub received: bool,
}

impl AckResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// CORS preflight acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightResponse {
    pub message: String,
}

impl PreflightResponse {
    pub fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(json: &str) -> Result<PurchaseRequest, CheckoutError> {
        PurchaseRequestDto::from_slice(json.as_bytes()).and_then(PurchaseRequest::try_from)
    }

    #[test]
    fn parses_numeric_fields() {
        let purchase = parse(
            r#"{
                "programName": "Bachillerato Milenio",
                "finalPrice": 1200,
                "paymentType": "enrollment",
                "installmentsCount": 10,
                "enrollmentFee": 150,
                "monthlyFee": 49.995,
                "studentName": "Ana",
                "studentEmail": "ana@example.com",
                "discountReason": "sibling"
            }"#,
        )
        .unwrap();

        assert_eq!(purchase.payment_type, PaymentType::Enrollment);
        assert_eq!(purchase.installments_count, 10);
        assert_eq!(purchase.monthly_fee, dec!(49.995));
        assert_eq!(purchase.discount_reason.as_deref(), Some("sibling"));
    }

    #[test]
    fn parses_string_fields() {
        let purchase = parse(
            r#"{
                "programName": "ESO",
                "finalPrice": "960.50",
                "paymentType": "installments",
                "installmentsCount": "6",
                "enrollmentFee": "0",
                "monthlyFee": "80",
                "studentName": "Luis",
                "studentEmail": "luis@example.com"
            }"#,
        )
        .unwrap();

        assert_eq!(purchase.final_price, dec!(960.50));
        assert_eq!(purchase.installments_count, 6);
        assert_eq!(purchase.monthly_fee, dec!(80));
        assert_eq!(purchase.discount_reason, None);
    }

    #[test]
    fn unknown_payment_type_is_installments() {
        let purchase = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"monthly",
                "enrollmentFee":0,"monthlyFee":1,"studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap();

        assert_eq!(purchase.payment_type, PaymentType::Installments);
        assert_eq!(purchase.installments_count, 0);
    }

    #[test]
    fn negative_count_is_malformed() {
        let err = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"installments",
                "installmentsCount":-2,"enrollmentFee":0,"monthlyFee":1,
                "studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap_err();

        assert!(matches!(err, CheckoutError::MalformedInput(_)));
        assert_eq!(err.to_string(), "Invalid installmentsCount: -2");
    }

    #[test]
    fn non_numeric_count_reads_as_zero() {
        let purchase = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"installments",
                "installmentsCount":"six","enrollmentFee":0,"monthlyFee":1,
                "studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap();

        assert_eq!(purchase.installments_count, 0);
    }

    #[test]
    fn count_string_uses_leading_digits() {
        let purchase = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"installments",
                "installmentsCount":" 6 months","monthlyFee":1,
                "studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap();

        assert_eq!(purchase.installments_count, 6);
    }

    #[test]
    fn fractional_count_is_truncated() {
        for (raw, expected) in [("6.0", 6), ("6.9", 6), ("0.5", 0)] {
            let json = format!(
                r#"{{"programName":"ESO","finalPrice":1,"paymentType":"installments",
                    "installmentsCount":{},"monthlyFee":80,
                    "studentName":"a","studentEmail":"b"}}"#,
                raw
            );
            assert_eq!(parse(&json).unwrap().installments_count, expected, "{}", raw);
        }
    }

    #[test]
    fn null_count_reads_as_zero() {
        let purchase = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"installments",
                "installmentsCount":null,"monthlyFee":80,
                "studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap();

        assert_eq!(purchase.installments_count, 0);
    }

    #[test]
    fn absent_null_or_blank_fees_read_as_zero() {
        for enrollment_fee in [
            "",
            r#","enrollmentFee":null"#,
            r#","enrollmentFee":"""#,
            r#","enrollmentFee":"  ""#,
        ] {
            let json = format!(
                r#"{{"programName":"ESO","finalPrice":1,"paymentType":"installments",
                    "installmentsCount":6,"monthlyFee":"80"{},
                    "studentName":"a","studentEmail":"b"}}"#,
                enrollment_fee
            );
            let purchase = parse(&json).unwrap();
            assert_eq!(purchase.enrollment_fee, Decimal::ZERO, "{}", enrollment_fee);
            assert_eq!(purchase.monthly_fee, dec!(80));
        }
    }

    #[test]
    fn fee_string_uses_leading_number() {
        let purchase = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"enrollment",
                "installmentsCount":6,"enrollmentFee":"150.50 EUR","monthlyFee":"abc",
                "studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap();

        assert_eq!(purchase.enrollment_fee, dec!(150.50));
        assert_eq!(purchase.monthly_fee, Decimal::ZERO);
    }

    #[test]
    fn negative_fee_string_keeps_sign() {
        let purchase = parse(
            r#"{"programName":"ESO","finalPrice":1,"paymentType":"enrollment",
                "enrollmentFee":"-10","monthlyFee":0,
                "studentName":"a","studentEmail":"b"}"#,
        )
        .unwrap();

        assert_eq!(purchase.enrollment_fee, dec!(-10));
    }

    #[test]
    fn leading_number_extraction() {
        assert_eq!(leading_number("12.5kg", true), "12.5");
        assert_eq!(leading_number("12.5kg", false), "12");
        assert_eq!(leading_number("+7", false), "7");
        assert_eq!(leading_number("-3.", true), "-3");
        assert_eq!(leading_number("-", true), "");
        assert_eq!(leading_number(".", true), "");
        assert_eq!(leading_number("", true), "");
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse("{not json").unwrap_err();
        assert_eq!(err.kind(), "malformed_input");
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let err = parse(r#"{"programName":"ESO"}"#).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedInput(_)));
    }

    #[test]
    fn response_shapes() {
        assert_eq!(
            serde_json::to_value(AckResponse::received()).unwrap(),
            serde_json::json!({ "received": true })
        );
        assert_eq!(
            serde_json::to_value(PreflightResponse::ok()).unwrap(),
            serde_json::json!({ "message": "OK" })
        );
        assert_eq!(
            serde_json::to_value(ErrorResponse::new("boom")).unwrap(),
            serde_json::json!({ "error": "boom" })
        );
    }
}
