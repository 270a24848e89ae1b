use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, JWT configuration,
/// server host and port, number of worker threads, CORS settings,
/// logging preferences, Stripe credentials, checkout redirect URLs,
/// the video-domain allow-list and the mail relay settings.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Stripe secret key.
    pub stripe_secret_key: String,
    /// URL the checkout session redirects to on success.
    pub checkout_success_url: String,
    /// URL the checkout session redirects to on cancel.
    pub checkout_cancel_url: String,
    /// Per-call timeout for payment collaborator requests, in seconds.
    pub gateway_timeout_secs: u64,
    /// Domains lesson video URLs may point to.
    pub allowed_video_domains: Vec<String>,
    /// HTTP endpoint of the mail relay collaborator.
    pub mail_relay_url: String,
    /// Sender address for outgoing notifications.
    pub mail_from_address: String,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// This struct contains the secret key used to sign JWTs and
/// the expiration times in hours for issued tokens.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for access tokens in hours.
    pub access_expiration_hours: i64,
    /// The expiration time for refresh tokens in hours.
    pub refresh_expiration_hours: i64,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// Reads the JWT configuration from environment variables:
    /// - `JWT_SECRET`: Required. The secret key for JWT signing.
    /// - `JWT_ACCESS_EXPIRATION_HOURS`: Optional. Defaults to 24 hours.
    /// - `JWT_REFRESH_EXPIRATION_HOURS`: Optional. Defaults to 720 hours (30 days).
    ///
    /// # Panics
    ///
    /// This function will panic if:
    /// - `JWT_SECRET` environment variable is not set
    /// - an expiration variable is set but cannot be parsed as a valid number
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_expiration_hours: env::var("JWT_ACCESS_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_ACCESS_EXPIRATION_HOURS must be a valid number"),
            refresh_expiration_hours: env::var("JWT_REFRESH_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "720".to_string())
                .parse()
                .expect("JWT_REFRESH_EXPIRATION_HOURS must be a valid number"),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// Loads all configuration values from environment variables with sensible
    /// defaults for most optional settings.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: "development" or "production"
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT signing (via `JwtConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `STRIPE_SECRET_KEY`: Stripe credentials (default: empty)
    /// - `CHECKOUT_SUCCESS_URL` / `CHECKOUT_CANCEL_URL`: checkout redirects
    /// - `GATEWAY_TIMEOUT_SECS`: payment collaborator timeout (default: 10)
    /// - `ALLOWED_VIDEO_DOMAINS`: comma-separated (default: "youtube.com")
    /// - `MAIL_RELAY_URL` / `MAIL_FROM_ADDRESS`: mail collaborator settings
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing
    /// or if numeric values cannot be parsed correctly.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            checkout_success_url: env::var("CHECKOUT_SUCCESS_URL")
                .unwrap_or_else(|_| "http://localhost:3000/payments/success".to_string()),
            checkout_cancel_url: env::var("CHECKOUT_CANCEL_URL")
                .unwrap_or_else(|_| "http://localhost:3000/payments/cancel".to_string()),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            allowed_video_domains: env::var("ALLOWED_VIDEO_DOMAINS")
                .unwrap_or_else(|_| "youtube.com".to_string())
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            mail_relay_url: env::var("MAIL_RELAY_URL")
                .unwrap_or_else(|_| "http://localhost:8025/api/send".to_string()),
            mail_from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "noreply@lms.local".to_string()),
        })
    }
}
