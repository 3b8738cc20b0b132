//! Payment gateway collaborator.
//!
//! Order creation and verification are delegated behind this seam. The
//! flow mirrors a hosted checkout: `create_order` opens an order for the
//! appointment fee, the customer settles it out of band, and the verify
//! endpoint fetches the order back to see whether it is paid. The order
//! receipt carries the appointment id.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("order not found")]
    OrderNotFound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
}

/// Order object returned to the client on `POST /payment`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in the gateway's sub-unit: fee times one hundred.
    pub amount: u64,
    pub currency: String,
    /// Appointment id the order settles.
    pub receipt: String,
    pub status: OrderStatus,
}

pub trait PaymentGateway: Send + Sync {
    fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError>;

    fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, PaymentError>;
}

/// In-process gateway used in development and tests. Orders start
/// `created`; `settle` stands in for the hosted checkout callback.
pub struct DevPaymentGateway {
    orders: Mutex<HashMap<String, PaymentOrder>>,
}

impl DevPaymentGateway {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
        }
    }

    /// Mark an order as paid, as a completed checkout would.
    pub fn settle(&self, order_id: &str) -> Result<(), PaymentError> {
        let mut orders = self.lock();
        let order = orders.get_mut(order_id).ok_or(PaymentError::OrderNotFound)?;
        order.status = OrderStatus::Paid;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, PaymentOrder>> {
        self.orders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DevPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentGateway for DevPaymentGateway {
    fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        let order = PaymentOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount,
            currency: currency.to_owned(),
            receipt: receipt.to_owned(),
            status: OrderStatus::Created,
        };
        self.lock().insert(order.id.clone(), order.clone());
        Ok(order)
    }

    fn fetch_order(&self, order_id: &str) -> Result<PaymentOrder, PaymentError> {
        self.lock()
            .get(order_id)
            .cloned()
            .ok_or(PaymentError::OrderNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_lifecycle() {
        let gateway = DevPaymentGateway::new();
        let order = gateway.create_order(7000, "USD", "appt-1").unwrap();
        assert_eq!(order.status, OrderStatus::Created);

        gateway.settle(&order.id).unwrap();
        let fetched = gateway.fetch_order(&order.id).unwrap();
        assert_eq!(fetched.status, OrderStatus::Paid);
        assert_eq!(fetched.receipt, "appt-1");
        assert_eq!(fetched.amount, 7000);
    }

    #[test]
    fn test_unknown_order() {
        let gateway = DevPaymentGateway::new();
        assert!(gateway.fetch_order("order_missing").is_err());
        assert!(gateway.settle("order_missing").is_err());
    }
}
