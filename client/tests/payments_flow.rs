//! # Payment Flow Tests

mod common;

use common::*;
use shared::{CreatePaymentRequest, PaymentStatus};
use toagro_client::ClassifiedError;

fn request(amount: f64) -> CreatePaymentRequest {
    CreatePaymentRequest {
        amount,
        currency: None,
        description: "Оплата за пшеницю".to_string(),
        order_id: None,
    }
}

#[tokio::test]
async fn test_create_payment_defaults_to_hryvnia_and_returns_link() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;

    // Act
    let response = h.store.create_payment(request(500.0)).await.expect("payment created");

    // Assert
    assert_eq!(response.payment.status, PaymentStatus::Pending);
    assert_eq!(response.payment.currency, "UAH");
    assert_eq!(response.payment.amount, 500.0);
    assert!(!response.payment_link.is_empty());

    let payments = h.store.read(|s| s.payments.clone());
    assert_eq!(payments.payment_link.as_deref(), Some(response.payment_link.as_str()));
    assert_eq!(
        payments.current().map(|p| p.transaction_id.as_str()),
        Some(TRANSACTION_ID)
    );
}

#[tokio::test]
async fn test_completed_payment_never_regresses() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    h.store.create_payment(request(500.0)).await.expect("payment created");

    // Act
    h.store.fetch_payment(TRANSACTION_ID).await.expect("confirmed payment");
    let confirmed = h.store.read(|s| s.payments.get(TRANSACTION_ID).map(|p| p.status));
    // The list endpoint still reports PENDING
    h.store.fetch_payments().await.expect("payment list");

    // Assert
    assert_eq!(confirmed, Some(PaymentStatus::Completed));
    let payments = h.store.read(|s| s.payments.clone());
    assert_eq!(payments.get(TRANSACTION_ID).map(|p| p.status), Some(PaymentStatus::Completed));
    assert_eq!(payments.list().len(), 1);
}

#[tokio::test]
async fn test_transaction_id_stays_one_path_segment() {
    // Arrange
    let h = Harness::start().await;
    h.sign_in().await;
    let crafted = format!("{TRANSACTION_ID}?status=COMPLETED");

    // Act
    let result = h.store.fetch_payment(&crafted).await;

    // Assert: the backend saw the whole value as the id, not a query string
    assert_eq!(result.unwrap_err(), ClassifiedError::NotFound);
    assert!(h.store.read(|s| s.payments.get(TRANSACTION_ID).is_none()));
}
