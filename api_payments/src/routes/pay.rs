use actix_web::{Responder, get, post, web};
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use common::jwt::JwtClaims;
use sqlx::PgPool;
use std::sync::Arc;

use crate::dtos::pay::{PaymentCreateBody, PaymentListQuery};
use crate::gateway::CheckoutGateway;
use crate::services;

/// Starts a checkout for a course and returns the pending payment with its
/// redirect `payment_url`.
///
/// # Output
/// - Success: 201 Created with the payment record (`status: "session_pending"`)
/// - Error: 404 when the course does not exist
/// - Error: 503 when the payment provider fails or times out; no payment is
///   recorded in that case
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/payments/create', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   },
///   body: JSON.stringify({ course_id: courseId })
/// });
///
/// if (response.ok) {
///   const payment = await response.json();
///   window.location.href = payment.payment_url;
/// }
/// ```
#[post("/create")]
async fn post_create(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<PaymentCreateBody>,
    pool: web::Data<Arc<sqlx::PgPool>>,
    gateway: web::Data<Arc<dyn CheckoutGateway>>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let gateway: &dyn CheckoutGateway = &***gateway;
    let payment =
        services::pay::initiate(pg_pool, gateway, &config, claims.user_id, body.course_id).await?;
    Success::created(payment)
}

/// Lists the authenticated user's own payments. Supports filtering by
/// `course_id`, `lesson_id` and `method`, plus `ordering=-timestamp` and
/// `limit`/`offset` pagination.
#[get("")]
async fn get_payments(
    claims: web::ReqData<JwtClaims>,
    query: web::Query<PaymentListQuery>,
    pool: web::Data<Arc<sqlx::PgPool>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let payments = services::pay::list(pg_pool, claims.user_id, &query).await?;
    Success::ok(payments)
}

/// Polls the provider for the session's payment status and returns the
/// (possibly freshly paid) payment record. Safe to call repeatedly; only
/// the payment's owner can see it.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/payments/status/${sessionId}`, {
///   headers: {
///     'Authorization': `Bearer ${localStorage.getItem('authToken')}`
///   }
/// });
///
/// if (response.ok) {
///   const payment = await response.json();
///   if (payment.is_paid) {
///     console.log('Payment confirmed');
///   }
/// }
/// ```
#[get("/status/{session_id}")]
async fn get_status(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<String>,
    pool: web::Data<Arc<sqlx::PgPool>>,
    gateway: web::Data<Arc<dyn CheckoutGateway>>,
) -> Res<impl Responder> {
    let pg_pool: &PgPool = &**pool;
    let gateway: &dyn CheckoutGateway = &***gateway;
    let payment = services::pay::poll(pg_pool, gateway, claims.user_id, &path).await?;
    Success::ok(payment)
}
