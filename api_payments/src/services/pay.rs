use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use common::env_config::Config;
use common::error::{AppError, Res};
use db::dtos::payment::{PaymentCreateRequest, PaymentFilter};
use db::models::course::Course;
use db::models::payment::Payment;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dtos::pay::PaymentListQuery;
use crate::gateway::{CheckoutGateway, SessionPaymentStatus};

pub const METHOD_STRIPE: &str = "stripe";

/// Persisted payment states. `created` never reaches the database: a
/// payment row only exists once a checkout session was obtained, and a
/// failed session leaves no row at all.
pub mod status {
    pub const SESSION_PENDING: &str = "session_pending";
    pub const PAID: &str = "paid";
}

/// Converts a course price to gateway minor units: 19.99 becomes 1999.
pub fn to_minor_units(amount: &BigDecimal) -> Res<i64> {
    if amount.sign() == bigdecimal::num_bigint::Sign::Minus {
        return Err(AppError::Internal(format!(
            "Negative payment amount: {}",
            amount
        )));
    }
    (amount * BigDecimal::from(100))
        .with_scale_round(0, RoundingMode::HalfUp)
        .to_i64()
        .ok_or_else(|| AppError::Internal(format!("Payment amount out of range: {}", amount)))
}

#[derive(Debug, Clone)]
pub struct CheckoutStart {
    pub session_id: String,
    pub payment_url: String,
    pub amount_minor: i64,
}

fn unavailable(error: AppError) -> AppError {
    match error {
        AppError::ServiceUnavailable(_) => error,
        other => {
            log::warn!("Payment collaborator call failed: {}", other);
            AppError::ServiceUnavailable("Payment provider is unavailable".to_string())
        }
    }
}

/// Runs the three sequential collaborator calls that produce a checkout
/// session for a course. Touches no local state, so a failure anywhere
/// simply propagates as 503 with nothing to clean up.
pub async fn start_checkout(
    gateway: &dyn CheckoutGateway,
    course: &Course,
    success_url: &str,
    cancel_url: &str,
) -> Res<CheckoutStart> {
    let amount_minor = to_minor_units(&course.price)?;

    let product_id = gateway
        .create_product(&course.title, &course.description)
        .await
        .map_err(unavailable)?;
    let price_id = gateway
        .create_price(&product_id, amount_minor)
        .await
        .map_err(unavailable)?;
    let session = gateway
        .create_checkout_session(&price_id, success_url, cancel_url)
        .await
        .map_err(unavailable)?;

    Ok(CheckoutStart {
        session_id: session.id,
        payment_url: session.url,
        amount_minor,
    })
}

/// Initiates a payment for a course.
///
/// The payment row is persisted only after the checkout session exists;
/// collaborator failure leaves no partial record behind.
pub async fn initiate(
    pool: &PgPool,
    gateway: &dyn CheckoutGateway,
    config: &Config,
    user_id: Uuid,
    course_id: Uuid,
) -> Res<Payment> {
    let course = db::course::get_course_by_id(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let checkout = start_checkout(
        gateway,
        &course,
        &config.checkout_success_url,
        &config.checkout_cancel_url,
    )
    .await?;

    db::payment::insert_payment(
        pool,
        PaymentCreateRequest {
            user_id,
            course_id: Some(course.id),
            lesson_id: None,
            amount: course.price.clone(),
            method: METHOD_STRIPE.to_string(),
            session_id: Some(checkout.session_id),
            payment_url: Some(checkout.payment_url),
            status: status::SESSION_PENDING.to_string(),
        },
    )
    .await
}

/// Polls the external session status and applies the monotonic paid
/// transition. Re-polling an already-paid session changes nothing and
/// still returns the current payment state.
///
/// Another user's payment is hidden as absent, so a known session id does
/// not expose foreign payment records.
pub async fn poll(
    pool: &PgPool,
    gateway: &dyn CheckoutGateway,
    user_id: Uuid,
    session_id: &str,
) -> Res<Payment> {
    let payment = db::payment::get_payment_by_session_id(pool, session_id)
        .await?
        .filter(|payment| payment.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

    let external_status = gateway
        .fetch_session(session_id)
        .await
        .map_err(unavailable)?;

    if external_status == SessionPaymentStatus::Paid && !payment.is_paid {
        db::payment::mark_payment_paid(pool, session_id).await?;
        let refreshed = db::payment::get_payment_by_session_id(pool, session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
        return Ok(refreshed);
    }

    Ok(payment)
}

pub async fn list(
    pool: &PgPool,
    user_id: Uuid,
    query: &PaymentListQuery,
) -> Res<Vec<Payment>> {
    db::payment::list_payments_by_user(
        pool,
        user_id,
        PaymentFilter {
            course_id: query.course_id,
            lesson_id: query.lesson_id,
            method: query.method.clone(),
            newest_first: query.newest_first(),
            limit: query.limit(),
            offset: query.offset(),
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::CheckoutSessionInfo;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn course(price: &str) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Rust for Backenders".to_string(),
            description: "Ownership and friends".to_string(),
            preview_url: None,
            price: BigDecimal::from_str(price).unwrap(),
            owner_id: Uuid::new_v4(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    /// In-memory collaborator recording what it was asked for; optionally
    /// failing at a chosen step.
    #[derive(Default)]
    struct MockGateway {
        fail_step: Option<&'static str>,
        seen_amount_minor: Mutex<Option<i64>>,
        session_paid: bool,
    }

    impl MockGateway {
        fn failing_at(step: &'static str) -> Self {
            MockGateway {
                fail_step: Some(step),
                ..Default::default()
            }
        }

        fn fail(&self, step: &'static str) -> Res<()> {
            if self.fail_step == Some(step) {
                Err(AppError::ServiceUnavailable("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CheckoutGateway for MockGateway {
        async fn create_product(&self, _name: &str, _description: &str) -> Res<String> {
            self.fail("product")?;
            Ok("prod_mock".to_string())
        }

        async fn create_price(&self, product_id: &str, amount_minor: i64) -> Res<String> {
            self.fail("price")?;
            assert_eq!(product_id, "prod_mock");
            *self.seen_amount_minor.lock().unwrap() = Some(amount_minor);
            Ok("price_mock".to_string())
        }

        async fn create_checkout_session(
            &self,
            price_id: &str,
            _success_url: &str,
            _cancel_url: &str,
        ) -> Res<CheckoutSessionInfo> {
            self.fail("session")?;
            assert_eq!(price_id, "price_mock");
            Ok(CheckoutSessionInfo {
                id: "cs_mock_1".to_string(),
                url: "https://checkout.example/cs_mock_1".to_string(),
            })
        }

        async fn fetch_session(&self, _session_id: &str) -> Res<SessionPaymentStatus> {
            self.fail("fetch")?;
            Ok(if self.session_paid {
                SessionPaymentStatus::Paid
            } else {
                SessionPaymentStatus::Unpaid
            })
        }
    }

    #[test]
    fn minor_units_conversion() {
        let amount = BigDecimal::from_str("19.99").unwrap();
        assert_eq!(to_minor_units(&amount).unwrap(), 1999);

        let amount = BigDecimal::from_str("0").unwrap();
        assert_eq!(to_minor_units(&amount).unwrap(), 0);

        let amount = BigDecimal::from_str("100").unwrap();
        assert_eq!(to_minor_units(&amount).unwrap(), 10000);

        let amount = BigDecimal::from_str("-1.00").unwrap();
        assert!(to_minor_units(&amount).is_err());
    }

    #[tokio::test]
    async fn checkout_sends_minor_units_to_collaborator() {
        let gateway = MockGateway::default();
        let course = course("19.99");

        let checkout = start_checkout(&gateway, &course, "https://ok", "https://cancel")
            .await
            .unwrap();

        assert_eq!(checkout.amount_minor, 1999);
        assert_eq!(*gateway.seen_amount_minor.lock().unwrap(), Some(1999));
        assert_eq!(checkout.session_id, "cs_mock_1");
        assert_eq!(checkout.payment_url, "https://checkout.example/cs_mock_1");
    }

    #[tokio::test]
    async fn collaborator_failure_surfaces_as_service_unavailable() {
        let course = course("19.99");

        for step in ["product", "price", "session"] {
            let gateway = MockGateway::failing_at(step);
            let result = start_checkout(&gateway, &course, "https://ok", "https://cancel").await;
            assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
        }
    }

    #[tokio::test]
    async fn non_unavailable_collaborator_errors_are_converted() {
        struct BrokenGateway;

        #[async_trait]
        impl CheckoutGateway for BrokenGateway {
            async fn create_product(&self, _: &str, _: &str) -> Res<String> {
                Err(AppError::Internal("connection reset".to_string()))
            }
            async fn create_price(&self, _: &str, _: i64) -> Res<String> {
                unreachable!()
            }
            async fn create_checkout_session(
                &self,
                _: &str,
                _: &str,
                _: &str,
            ) -> Res<CheckoutSessionInfo> {
                unreachable!()
            }
            async fn fetch_session(&self, _: &str) -> Res<SessionPaymentStatus> {
                unreachable!()
            }
        }

        let result =
            start_checkout(&BrokenGateway, &course("5.00"), "https://ok", "https://cancel").await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    async fn test_pool() -> Option<std::sync::Arc<PgPool>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping database-backed test");
            return None;
        };
        Some(db::setup(&url, false).await.expect("database setup"))
    }

    async fn seed_pending_payment(pool: &PgPool) -> (Uuid, String) {
        let user = db::user::insert_user(
            pool,
            db::dtos::user::UserCreateRequest {
                email: format!("payer-{}@example.com", Uuid::new_v4()),
                password_hash: "irrelevant".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                phone: String::new(),
                city: String::new(),
                avatar_url: None,
            },
        )
        .await
        .expect("seed user")
        .id;

        let course = db::course::insert_course(
            pool,
            db::dtos::course::CourseCreateRequest {
                title: "Paid course".to_string(),
                description: String::new(),
                preview_url: None,
                price: BigDecimal::from_str("19.99").unwrap(),
                owner_id: user,
            },
        )
        .await
        .expect("seed course")
        .id;

        let session_id = format!("cs_test_{}", Uuid::new_v4());
        db::payment::insert_payment(
            pool,
            PaymentCreateRequest {
                user_id: user,
                course_id: Some(course),
                lesson_id: None,
                amount: BigDecimal::from_str("19.99").unwrap(),
                method: METHOD_STRIPE.to_string(),
                session_id: Some(session_id.clone()),
                payment_url: None,
                status: status::SESSION_PENDING.to_string(),
            },
        )
        .await
        .expect("seed payment");

        (user, session_id)
    }

    #[tokio::test]
    async fn poll_is_idempotent_once_paid() {
        let Some(pool) = test_pool().await else { return };
        let (user, session_id) = seed_pending_payment(&pool).await;
        let gateway = MockGateway {
            session_paid: true,
            ..Default::default()
        };

        let first = poll(&pool, &gateway, user, &session_id).await.unwrap();
        assert!(first.is_paid);
        assert_eq!(first.status, status::PAID);

        // the guarded update touches no rows the second time around
        assert!(
            !db::payment::mark_payment_paid(&*pool, &session_id)
                .await
                .unwrap()
        );

        let second = poll(&pool, &gateway, user, &session_id).await.unwrap();
        assert!(second.is_paid);
        assert_eq!(second.status, status::PAID);
    }

    #[tokio::test]
    async fn foreign_users_session_is_hidden_as_absent() {
        let Some(pool) = test_pool().await else { return };
        let (_owner, session_id) = seed_pending_payment(&pool).await;
        let stranger = Uuid::new_v4();
        let gateway = MockGateway {
            session_paid: true,
            ..Default::default()
        };

        let error = poll(&pool, &gateway, stranger, &session_id).await.unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));

        // the denied poll must not have flipped the payment
        let payment = db::payment::get_payment_by_session_id(&*pool, &session_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!payment.is_paid);
    }
}
