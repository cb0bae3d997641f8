//! CreateCheckoutSessionHandler - Command handler for starting a tuition checkout.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::checkout::{build_line_items, CheckoutError, PurchaseRequest, SessionMode};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, PaymentProvider,
};

/// Command to open a hosted checkout page for a purchase.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub purchase: PurchaseRequest,
    pub success_url: String,
    pub cancel_url: String,
}

/// Result of successful checkout initiation.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionResult {
    pub customer_id: String,
    pub mode: SessionMode,
    pub checkout_session: CheckoutSession,
}

/// Handler for initiating a checkout.
///
/// Registers the student as a processor customer, then opens a session whose
/// line items follow the program's payment plan. Nothing is persisted; the
/// processor owns all state after this call.
pub struct CreateCheckoutSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreateCheckoutSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, CheckoutError> {
        let purchase = cmd.purchase;

        // 1. Reject negative amounts before touching the processor
        purchase.validate()?;

        // 2. Create customer in payment provider
        let customer = self
            .payment_provider
            .create_customer(CreateCustomerRequest {
                name: purchase.student_name.clone(),
                email: purchase.student_email.clone(),
                metadata: customer_metadata(&purchase),
            })
            .await
            .map_err(|e| CheckoutError::processor(e.message))?;

        tracing::debug!(
            customer_id = %customer.id,
            program = %purchase.program_name,
            "customer created"
        );

        // 3. Price the purchase; a failure here leaves the customer behind
        let line_items = build_line_items(&purchase)?;
        let mode = SessionMode::select(&line_items, purchase.installments_count);

        // 4. Create checkout session
        let checkout_session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                customer_id: customer.id.clone(),
                line_items,
                mode,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
                metadata: session_metadata(&purchase),
            })
            .await
            .map_err(|e| CheckoutError::processor(e.message))?;

        tracing::info!(
            session_id = %checkout_session.id,
            customer_id = %customer.id,
            mode = %mode,
            payment_type = purchase.payment_type.as_str(),
            "checkout session created"
        );

        Ok(CreateCheckoutSessionResult {
            customer_id: customer.id,
            mode,
            checkout_session,
        })
    }
}

fn customer_metadata(purchase: &PurchaseRequest) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("program".to_string(), purchase.program_name.clone()),
        (
            "discountReason".to_string(),
            purchase.discount_label().to_string(),
        ),
    ])
}

fn session_metadata(purchase: &PurchaseRequest) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("program".to_string(), purchase.program_name.clone()),
        (
            "installments".to_string(),
            purchase.installments_count.to_string(),
        ),
        ("final_price".to_string(), purchase.final_price.to_string()),
        (
            "discount_reason".to_string(),
            purchase.discount_label().to_string(),
        ),
    ])
}
