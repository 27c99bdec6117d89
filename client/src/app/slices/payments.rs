//! # Payments Slice
//!
//! Payments keyed by transaction id. Incoming records only replace cached
//! ones along the status state machine, so a stale `PENDING` response can
//! never overwrite `COMPLETED`.

use std::collections::HashMap;

use shared::{Payment, PaymentResponse};

use crate::app::state::RequestState;

#[derive(Debug, Clone, Default)]
pub struct PaymentsSlice {
    pub entities: HashMap<String, Payment>,
    /// Newest first.
    pub order: Vec<String>,
    pub current: Option<String>,
    /// Gateway link of the most recently created payment.
    pub payment_link: Option<String>,
    pub request: RequestState,
}

impl PaymentsSlice {
    /// Merge one payment. Returns `false` when it was ignored as a backwards
    /// status change.
    pub fn apply(&mut self, payment: Payment) -> bool {
        let key = payment.transaction_id.clone();
        match self.entities.get(&key) {
            Some(cached)
                if cached.status != payment.status && !cached.status.can_transition_to(payment.status) =>
            {
                tracing::warn!(
                    transaction_id = %key,
                    cached = ?cached.status,
                    incoming = ?payment.status,
                    "Ignoring payment status regression"
                );
                false
            }
            Some(_) => {
                self.entities.insert(key, payment);
                true
            }
            None => {
                self.order.push(key.clone());
                self.entities.insert(key, payment);
                true
            }
        }
    }

    pub fn created(&mut self, response: PaymentResponse) {
        let key = response.payment.transaction_id.clone();
        self.apply(response.payment);
        self.order.retain(|k| *k != key);
        self.order.insert(0, key.clone());
        self.current = Some(key);
        self.payment_link = Some(response.payment_link);
    }

    pub fn set_all(&mut self, payments: Vec<Payment>) {
        let order: Vec<String> = payments.iter().map(|p| p.transaction_id.clone()).collect();
        for payment in payments {
            self.apply(payment);
        }
        self.order = order;
    }

    pub fn set_current(&mut self, payment: Payment) {
        self.current = Some(payment.transaction_id.clone());
        self.apply(payment);
    }

    pub fn get(&self, transaction_id: &str) -> Option<&Payment> {
        self.entities.get(transaction_id)
    }

    pub fn current(&self) -> Option<&Payment> {
        self.current.as_deref().and_then(|k| self.entities.get(k))
    }

    pub fn list(&self) -> Vec<&Payment> {
        self.order.iter().filter_map(|k| self.entities.get(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::PaymentStatus;

    fn payment(tx: &str, status: PaymentStatus) -> Payment {
        Payment {
            id: 1,
            owner_id: 7,
            amount: 500.0,
            currency: "UAH".to_string(),
            status,
            transaction_id: tx.to_string(),
            order_id: None,
            payment_method: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn completed_never_regresses() {
        let mut slice = PaymentsSlice::default();
        assert!(slice.apply(payment("tx-1", PaymentStatus::Pending)));
        assert!(slice.apply(payment("tx-1", PaymentStatus::Completed)));
        assert!(!slice.apply(payment("tx-1", PaymentStatus::Pending)));
        assert_eq!(slice.get("tx-1").unwrap().status, PaymentStatus::Completed);

        assert!(slice.apply(payment("tx-1", PaymentStatus::Refunded)));
        assert!(!slice.apply(payment("tx-1", PaymentStatus::Completed)));
    }

    #[test]
    fn created_keeps_link_and_goes_first() {
        let mut slice = PaymentsSlice::default();
        slice.set_all(vec![payment("tx-0", PaymentStatus::Completed)]);
        slice.created(PaymentResponse {
            payment: payment("tx-1", PaymentStatus::Pending),
            payment_link: "https://pay.example/tx-1".to_string(),
        });

        assert_eq!(slice.order, vec!["tx-1".to_string(), "tx-0".to_string()]);
        assert_eq!(slice.current().unwrap().status, PaymentStatus::Pending);
        assert_eq!(slice.payment_link.as_deref(), Some("https://pay.example/tx-1"));
    }

    #[test]
    fn stale_list_does_not_undo_completion() {
        let mut slice = PaymentsSlice::default();
        slice.set_current(payment("tx-1", PaymentStatus::Completed));
        slice.set_all(vec![payment("tx-1", PaymentStatus::Pending)]);
        assert_eq!(slice.get("tx-1").unwrap().status, PaymentStatus::Completed);
        assert_eq!(slice.list().len(), 1);
    }
}
