use std::env;

/// MIME types accepted by `/upload`
pub const DEFAULT_ALLOWED_MIMES: [&str; 6] = [
    "audio/webm",
    "audio/wav",
    "audio/mp3",
    "audio/mpeg",
    "video/webm",
    "video/mp4",
];

/// Gateway configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Maximum upload size in bytes (default: 250 MB)
    pub max_file_size: u64,

    /// Allowed CORS origins; the first entry is echoed for unknown origins
    pub allowed_origins: Vec<String>,

    /// Content types accepted for uploads (exact match)
    pub allowed_mimes: Vec<String>,

    /// Optional shared secret expected in `X-Auth-Secret`
    pub auth_secret: Option<String>,

    /// Prefix joined with the object key to build the public URL
    pub public_bucket_url: String,

    /// Resend API key; email relay is disabled without it
    pub resend_api_key: Option<String>,

    /// Resend API base URL
    pub resend_api_url: String,

    /// Fixed sender address for relayed email
    pub email_from: String,

    /// Recipient used when a request does not name one
    pub email_default_to: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_file_size: 250 * 1024 * 1024, // 250 MB
            allowed_origins: vec![
                "https://payal54rani.github.io".to_string(),
                "http://127.0.0.1:5500".to_string(),
                "http://localhost:3000".to_string(),
            ],
            allowed_mimes: DEFAULT_ALLOWED_MIMES.iter().map(|m| m.to_string()).collect(),
            auth_secret: None,
            public_bucket_url: "https://pub-f32ce6d68dac4a60b7e83a8c3aa2b5bc.r2.dev/".to_string(),
            resend_api_key: None,
            resend_api_url: "https://api.resend.com".to_string(),
            email_from: "onboarding@resend.dev".to_string(),
            email_default_to: "suvamsingh55@gmail.com".to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset, except `AUTH_SECRET`, which is only unset
    /// when empty: a whitespace secret still has to be sent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let allowed_origins = non_empty("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(default.allowed_origins);

        Self {
            max_file_size: non_empty("MAX_FILE_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.max_file_size),

            allowed_origins,

            allowed_mimes: default.allowed_mimes,

            auth_secret: lookup("AUTH_SECRET").filter(|v| !v.is_empty()),

            public_bucket_url: non_empty("PUBLIC_BUCKET_URL").unwrap_or(default.public_bucket_url),

            resend_api_key: non_empty("RESEND_API_KEY"),

            resend_api_url: non_empty("RESEND_API_URL").unwrap_or(default.resend_api_url),

            email_from: non_empty("EMAIL_FROM").unwrap_or(default.email_from),

            email_default_to: non_empty("EMAIL_DEFAULT_TO").unwrap_or(default.email_default_to),
        }
    }

    /// The origin echoed when the request origin is not allow-listed
    pub fn default_origin(&self) -> &str {
        self.allowed_origins
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Maximum upload size in whole megabytes, as shown in error messages
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / 1024 / 1024
    }
}
