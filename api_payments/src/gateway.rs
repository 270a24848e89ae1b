use std::time::Duration;

use async_trait::async_trait;
use common::error::{AppError, Res};
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus, Client,
    CreateCheckoutSession, CreatePrice, CreateProduct, Currency, IdOrCreate, Price, Product,
};

#[derive(Debug, Clone)]
pub struct CheckoutSessionInfo {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPaymentStatus {
    Paid,
    Unpaid,
}

/// Capability interface over the external checkout-session provider.
/// The payment workflow only ever talks to this trait, so tests drive it
/// with an in-memory substitute.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_product(&self, name: &str, description: &str) -> Res<String>;
    async fn create_price(&self, product_id: &str, amount_minor: i64) -> Res<String>;
    async fn create_checkout_session(
        &self,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Res<CheckoutSessionInfo>;
    async fn fetch_session(&self, session_id: &str) -> Res<SessionPaymentStatus>;
}

/// Stripe-backed gateway. Every call runs under a bounded timeout; an
/// elapsed timeout counts as a collaborator failure, not a program fault.
pub struct StripeGateway {
    client: Client,
    timeout: Duration,
}

impl StripeGateway {
    pub fn new(secret_key: &str, timeout_secs: u64) -> Self {
        StripeGateway {
            client: Client::new(secret_key),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, stripe::StripeError>>,
    ) -> Res<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::ServiceUnavailable(
                "Payment provider timed out".to_string(),
            )),
        }
    }
}

#[async_trait]
impl CheckoutGateway for StripeGateway {
    async fn create_product(&self, name: &str, description: &str) -> Res<String> {
        let mut params = CreateProduct::new(name);
        params.description = Some(description);
        let product = self.bounded(Product::create(&self.client, params)).await?;
        Ok(product.id.to_string())
    }

    async fn create_price(&self, product_id: &str, amount_minor: i64) -> Res<String> {
        let mut params = CreatePrice::new(Currency::USD);
        params.product = Some(IdOrCreate::Id(product_id));
        params.unit_amount = Some(amount_minor);
        let price = self.bounded(Price::create(&self.client, params)).await?;
        Ok(price.id.to_string())
    }

    async fn create_checkout_session(
        &self,
        price_id: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Res<CheckoutSessionInfo> {
        let params = CreateCheckoutSession {
            payment_method_types: Some(vec![
                stripe::CreateCheckoutSessionPaymentMethodTypes::Card,
            ]),
            line_items: Some(vec![stripe::CreateCheckoutSessionLineItems {
                price: Some(price_id.to_string()),
                quantity: Some(1),
                ..Default::default()
            }]),
            mode: Some(CheckoutSessionMode::Payment),
            success_url: Some(success_url),
            cancel_url: Some(cancel_url),
            ..Default::default()
        };
        let session = self
            .bounded(CheckoutSession::create(&self.client, params))
            .await?;

        let url = session.url.ok_or_else(|| {
            AppError::ServiceUnavailable("Checkout session has no redirect URL".to_string())
        })?;
        Ok(CheckoutSessionInfo {
            id: session.id.to_string(),
            url,
        })
    }

    async fn fetch_session(&self, session_id: &str) -> Res<SessionPaymentStatus> {
        let id = session_id.parse::<CheckoutSessionId>().map_err(|e| {
            AppError::Internal(format!("Failed to parse session id: {}. {}", session_id, e))
        })?;
        let session = self
            .bounded(CheckoutSession::retrieve(&self.client, &id, &[]))
            .await?;

        let status = match session.payment_status {
            CheckoutSessionPaymentStatus::Paid
            | CheckoutSessionPaymentStatus::NoPaymentRequired => SessionPaymentStatus::Paid,
            CheckoutSessionPaymentStatus::Unpaid => SessionPaymentStatus::Unpaid,
        };
        Ok(status)
    }
}
