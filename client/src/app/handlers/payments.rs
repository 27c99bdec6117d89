//! # Payment Actions

use shared::{CreatePaymentRequest, PaymentResponse};

use crate::app::state::{AppState, RequestState};
use crate::app::Store;
use crate::core::error::ApiResult;

fn payments_request(state: &mut AppState) -> &mut RequestState {
    &mut state.payments.request
}

impl Store {
    /// Create a payment and keep its gateway link for the view to open.
    pub async fn create_payment(&self, request: CreatePaymentRequest) -> ApiResult<PaymentResponse> {
        self.mutate(
            payments_request,
            "create_payment",
            self.api().create_payment(&request),
            |s, response: PaymentResponse| {
                s.payments.created(response.clone());
                response
            },
        )
        .await
    }

    pub async fn fetch_payments(&self) -> ApiResult<()> {
        self.fetch(payments_request, "payments", self.api().get_payments(), |s, payments| {
            s.payments.set_all(payments)
        })
        .await
    }

    pub async fn fetch_payment(&self, transaction_id: &str) -> ApiResult<()> {
        self.fetch(payments_request, "payment", self.api().get_payment(transaction_id), |s, payment| {
            s.payments.set_current(payment)
        })
        .await
    }
}
