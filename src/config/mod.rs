use std::env;

/// Runtime configuration for the web application
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Key used to sign session tokens (required in production)
    pub session_secret: String,

    /// Session lifetime in hours (default: 24)
    pub session_ttl_hours: i64,

    /// Name of the session cookie (default: "twilu-cookie")
    pub session_cookie_name: String,

    /// Mark session cookies `Secure` (default: false)
    pub secure_cookies: bool,

    /// Maximum number of folders returned by the public feed (default: 20)
    pub feed_limit: u64,

    /// Let contributors add items to folders they do not own (default: false)
    pub contributors_can_add_items: bool,

    /// Profile picture assigned to new accounts
    pub default_avatar_url: String,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session_secret: "secret".to_string(),
            session_ttl_hours: 24,
            session_cookie_name: "twilu-cookie".to_string(),
            secure_cookies: false,
            feed_limit: 20,
            contributors_can_add_items: false,
            default_avatar_url:
                "https://www.testhouse.net/wp-content/uploads/2021/11/default-avatar.jpg"
                    .to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

fn flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            session_secret: env::var("SESSION_SECRET").unwrap_or(default.session_secret),

            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|hours| *hours > 0)
                .unwrap_or(default.session_ttl_hours),

            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or(default.session_cookie_name),

            secure_cookies: env::var("SECURE_COOKIES")
                .map(|v| flag(&v))
                .unwrap_or(default.secure_cookies),

            feed_limit: env::var("FEED_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.feed_limit),

            contributors_can_add_items: env::var("CONTRIBUTORS_CAN_ADD_ITEMS")
                .map(|v| flag(&v))
                .unwrap_or(default.contributors_can_add_items),

            default_avatar_url: env::var("DEFAULT_AVATAR_URL")
                .unwrap_or(default.default_avatar_url),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Create config for development (relaxed cookies, dev secret)
    pub fn development() -> Self {
        Self {
            session_secret: "development-secret".to_string(),
            ..Self::default()
        }
    }

    /// Create config for production. Fails when `SESSION_SECRET` is not set.
    pub fn production() -> anyhow::Result<Self> {
        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set in production"))?;

        Ok(Self {
            session_secret,
            secure_cookies: env::var("SECURE_COOKIES").map(|v| flag(&v)).unwrap_or(true),
            ..Self::from_env()
        })
    }
}
