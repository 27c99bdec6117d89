//! # Payment Endpoints
//!
//! Payments are created through `/transactions`; the response carries the
//! gateway link the user completes the payment at.

use shared::{CreatePaymentRequest, Payment, PaymentEnvelope, PaymentResponse, PaymentsResponse};

use super::client::ApiClient;
use crate::config::DEFAULT_CURRENCY;
use crate::core::error::ApiResult;

/// Create a payment. A request without a currency is sent as UAH.
#[tracing::instrument(skip(client, request), fields(amount = request.amount))]
pub async fn create_payment(client: &ApiClient, request: &CreatePaymentRequest) -> ApiResult<PaymentResponse> {
    let mut body = request.clone();
    if body.currency.is_none() {
        body.currency = Some(DEFAULT_CURRENCY.to_string());
    }
    let response: PaymentResponse = client.send_json(client.post("/transactions").json(&body)).await?;
    tracing::info!(
        transaction_id = %response.payment.transaction_id,
        status = ?response.payment.status,
        "Payment created"
    );
    Ok(response)
}

pub async fn get_payments(client: &ApiClient) -> ApiResult<Vec<Payment>> {
    let response: PaymentsResponse = client.send_json(client.get("/transactions")).await?;
    Ok(response.payments)
}

pub async fn get_payment(client: &ApiClient, transaction_id: &str) -> ApiResult<Payment> {
    let envelope: PaymentEnvelope = client
        .send_json(client.get(&format!("/transactions/{}", ApiClient::segment(transaction_id))))
        .await?;
    Ok(envelope.payment)
}
