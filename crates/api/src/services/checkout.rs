//! Checkout orchestration.
//!
//! Validates a checkout request, signs the buyer in, checks the cart and the
//! payment method, waits out the simulated payment latency and hands off to
//! the order engine. Checkouts for the same user run one at a time.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use shopfast_core::{PaymentMethod, Price, ShippingMethod, UserId};

use super::auth::AuthService;
use super::orders::OrderService;
use crate::config::TimingConfig;
use crate::db::Database;
use crate::models::Order;

/// Password used when a checkout request omits one.
pub const DEFAULT_PASSWORD: &str = "defaultpass";

/// Delivery estimate quoted on every successful checkout.
pub const ESTIMATED_DELIVERY: &str = "3-5 business days";

/// Unit price assumed by the totals estimate, regardless of the product.
const ESTIMATE_UNIT_PRICE: Price = Price::new(Decimal::ONE_HUNDRED);

/// Tax rate applied by the totals estimate (8%).
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Checkout failures, in the order they are checked.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Missing required fields: userId, paymentMethod, shippingAddress, email")]
    MissingFields,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid payment method")]
    InvalidPaymentMethod,

    #[error("User ID is required")]
    UserIdRequired,

    #[error("Failed to create order")]
    OrderCreationFailed,
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<Value>,
    pub billing_address: Option<Value>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /api/checkout/validate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub user_id: Option<String>,
    pub payment_method: Option<String>,
    pub shipping_address: Option<Value>,
}

/// Body of `POST /api/checkout/calculate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRequest {
    pub user_id: Option<String>,
    pub shipping_method: Option<String>,
}

/// A completed checkout.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub order: Order,
    pub payment_method: PaymentMethod,
    /// Display-only; nothing waits for it.
    pub processing_time: Duration,
}

/// Rough shipping and tax estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

/// Result of [`CheckoutService::calculate_totals`].
#[derive(Debug, Clone)]
pub struct TotalsEstimate {
    pub breakdown: Breakdown,
    /// The method name as requested, even when it fell back to standard.
    pub shipping_method: String,
}

/// Orchestrates checkout over the stores and the order engine.
#[derive(Clone)]
pub struct CheckoutService {
    inner: Arc<CheckoutInner>,
}

struct CheckoutInner {
    db: Arc<Database>,
    orders: OrderService,
    timing: TimingConfig,
    user_locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(db: Arc<Database>, orders: OrderService, timing: TimingConfig) -> Self {
        Self {
            inner: Arc::new(CheckoutInner {
                db,
                orders,
                timing,
                user_locks: DashMap::new(),
            }),
        }
    }

    /// Turn the user's cart into an order.
    ///
    /// Field presence is checked before anything else and fails without
    /// delay. The simulated payment latency is only paid once every check
    /// has passed.
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`CheckoutError`].
    #[instrument(skip_all, fields(user_id = ?request.user_id))]
    pub async fn process_checkout(&self, request: CheckoutRequest) -> Result<Receipt, CheckoutError> {
        let (Some(user_id), Some(payment_method), Some(email)) = (
            present(request.user_id.as_deref()),
            present(request.payment_method.as_deref()),
            present(request.email.as_deref()),
        ) else {
            return Err(CheckoutError::MissingFields);
        };
        if !is_truthy(request.shipping_address.as_ref()) {
            return Err(CheckoutError::MissingFields);
        }
        let user_id = UserId::new(user_id);

        let lock = self.user_lock(&user_id);
        let _checkout = lock.lock().await;

        let password = present(request.password.as_deref()).unwrap_or(DEFAULT_PASSWORD);
        let user = AuthService::new(&self.inner.db)
            .authenticate(email, password)
            .map_err(|_| CheckoutError::AuthenticationFailed)?;
        if user.id != user_id {
            warn!(authenticated_as = %user.id, "Checkout identity mismatch");
            return Err(CheckoutError::AuthenticationFailed);
        }

        if self.inner.db.read().carts.is_empty_for(&user_id) {
            return Err(CheckoutError::EmptyCart);
        }

        let payment_method: PaymentMethod = payment_method
            .parse()
            .map_err(|_| CheckoutError::InvalidPaymentMethod)?;

        let waited = self.inner.timing.payment.wait().await;
        debug!(waited_ms = waited.as_millis(), "Payment processed");

        let order = self
            .inner
            .orders
            .create_order(&user_id)
            .ok_or(CheckoutError::OrderCreationFailed)?;

        info!(order_id = %order.id, %payment_method, "Checkout completed");
        Ok(Receipt {
            order,
            payment_method,
            processing_time: self.inner.timing.processing_time.sample(),
        })
    }

    /// Run the structural checkout checks and collect every failure.
    ///
    /// The cart is only checked when a user id is given. The payment method
    /// is checked whenever one is given.
    ///
    /// # Errors
    ///
    /// Returns the failure messages in a fixed order.
    pub fn validate_checkout(&self, request: &ValidateRequest) -> Result<(), Vec<String>> {
        let user_id = present(request.user_id.as_deref());
        let payment_method = present(request.payment_method.as_deref());

        let mut errors = Vec::new();
        if user_id.is_none() {
            errors.push("User ID is required".to_string());
        }
        if payment_method.is_none() {
            errors.push("Payment method is required".to_string());
        }
        if !is_truthy(request.shipping_address.as_ref()) {
            errors.push("Shipping address is required".to_string());
        }
        if let Some(user_id) = user_id
            && self.inner.db.read().carts.is_empty_for(&UserId::new(user_id))
        {
            errors.push(CheckoutError::EmptyCart.to_string());
        }
        if let Some(method) = payment_method
            && method.parse::<PaymentMethod>().is_err()
        {
            errors.push(CheckoutError::InvalidPaymentMethod.to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Estimate shipping and tax for the user's cart.
    ///
    /// Every unit is priced at a flat 100 rather than its catalog price.
    /// Unknown shipping methods are charged the standard rate.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::UserIdRequired` without delay when no user id
    /// is given.
    pub async fn calculate_totals(
        &self,
        request: TotalsRequest,
    ) -> Result<TotalsEstimate, CheckoutError> {
        let user_id = present(request.user_id.as_deref())
            .map(UserId::new)
            .ok_or(CheckoutError::UserIdRequired)?;
        let shipping_method = request
            .shipping_method
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "standard".to_string());

        self.inner.timing.totals.wait().await;

        let units: u32 = self
            .inner
            .db
            .read()
            .carts
            .by_user(&user_id)
            .iter()
            .map(|item| item.quantity)
            .fold(0, u32::saturating_add);

        let subtotal = ESTIMATE_UNIT_PRICE.times(units);
        let shipping = shipping_method
            .parse::<ShippingMethod>()
            .unwrap_or_default()
            .rate();
        let tax = subtotal.scaled(TAX_RATE);
        let total = subtotal + shipping + tax;

        Ok(TotalsEstimate {
            breakdown: Breakdown {
                subtotal: subtotal.rounded(),
                shipping: shipping.rounded(),
                tax: tax.rounded(),
                total: total.rounded(),
            },
            shipping_method,
        })
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    fn user_lock(&self, user_id: &UserId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.inner
                .user_locks
                .entry(user_id.clone())
                .or_default()
                .value(),
        )
    }
}

/// A non-empty string.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// JSON truthiness: null, false, 0 and "" count as absent.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
