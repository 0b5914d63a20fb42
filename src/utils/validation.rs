use crate::config::GatewayConfig;

/// Rules an upload is checked against, derived from [`GatewayConfig`]
#[derive(Debug, Clone, Default)]
pub struct UploadRules {
    pub allowed_mimes: Vec<String>,
    pub max_file_size: u64,
    pub auth_secret: Option<String>,
}

impl UploadRules {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            allowed_mimes: config.allowed_mimes.clone(),
            max_file_size: config.max_file_size,
            auth_secret: config.auth_secret.clone(),
        }
    }

    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / 1024 / 1024
    }
}

/// Request data the upload checks run over. Borrowed, never mutated.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadContext<'a> {
    pub file_name: Option<&'a str>,
    pub content_length: i64,
    pub content_type: Option<&'a str>,
    pub auth_secret: Option<&'a str>,
}

impl<'a> UploadContext<'a> {
    /// Parses a `Content-Length` value from its leading integer.
    ///
    /// Leading whitespace and a sign are accepted and trailing junk is ignored,
    /// so `"12abc"` is 12 and `"-5"` is -5. No digits at all counts as zero.
    pub fn parse_content_length(raw: Option<&str>) -> i64 {
        let Some(raw) = raw.map(str::trim_start) else {
            return 0;
        };
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let value = digits
            .bytes()
            .take_while(u8::is_ascii_digit)
            .fold(0i64, |acc, d| {
                acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
            });
        if negative { -value } else { value }
    }
}

/// An upload that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type UploadCheck = fn(&UploadContext<'_>, &UploadRules) -> Result<(), ValidationError>;

/// Upload checks in the order they are applied. The first failure wins.
pub const UPLOAD_CHECKS: [UploadCheck; 5] = [
    validate_auth_secret,
    validate_file_name,
    validate_file_size,
    validate_not_empty,
    validate_mime_type,
];

/// Runs [`UPLOAD_CHECKS`] and returns the accepted upload
pub fn validate_upload(
    ctx: &UploadContext<'_>,
    rules: &UploadRules,
) -> Result<ValidatedUpload, ValidationError> {
    for check in UPLOAD_CHECKS {
        check(ctx, rules)?;
    }

    match (ctx.file_name, ctx.content_type) {
        (Some(file_name), Some(content_type)) => Ok(ValidatedUpload {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        }),
        _ => Err(ValidationError::new(
            "INVALID_REQUEST",
            "Upload request is incomplete",
        )),
    }
}

/// Exact match against the configured shared secret, when one is set
pub fn validate_auth_secret(
    ctx: &UploadContext<'_>,
    rules: &UploadRules,
) -> Result<(), ValidationError> {
    match rules.auth_secret.as_deref() {
        Some(expected) if ctx.auth_secret != Some(expected) => {
            Err(ValidationError::new("UNAUTHORIZED", "Unauthorized"))
        }
        _ => Ok(()),
    }
}

pub fn validate_file_name(
    ctx: &UploadContext<'_>,
    _rules: &UploadRules,
) -> Result<(), ValidationError> {
    match ctx.file_name {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err(ValidationError::new(
            "MISSING_FILENAME",
            "Missing fileName parameter",
        )),
    }
}

/// Validates declared size against maximum limit
pub fn validate_file_size(
    ctx: &UploadContext<'_>,
    rules: &UploadRules,
) -> Result<(), ValidationError> {
    if u64::try_from(ctx.content_length).is_ok_and(|len| len > rules.max_file_size) {
        return Err(file_too_large(rules));
    }
    Ok(())
}

pub fn validate_not_empty(
    ctx: &UploadContext<'_>,
    _rules: &UploadRules,
) -> Result<(), ValidationError> {
    if ctx.content_length == 0 {
        return Err(ValidationError::new("EMPTY_FILE", "Empty file"));
    }
    Ok(())
}

/// Validates MIME type against allowlist (exact match, no normalization)
pub fn validate_mime_type(
    ctx: &UploadContext<'_>,
    rules: &UploadRules,
) -> Result<(), ValidationError> {
    let allowed = ctx
        .content_type
        .is_some_and(|ct| rules.allowed_mimes.iter().any(|m| m == ct));

    if !allowed {
        return Err(ValidationError::new(
            "INVALID_MIME_TYPE",
            "Invalid file type. Only audio and video files are allowed.",
        ));
    }
    Ok(())
}

/// Error for a payload above the configured limit
pub fn file_too_large(rules: &UploadRules) -> ValidationError {
    ValidationError::new(
        "FILE_TOO_LARGE",
        format!(
            "File too large. Maximum size is {}MB",
            rules.max_file_size_mb()
        ),
    )
}

/// Replaces everything outside `[A-Za-z0-9.-]` with `_`.
///
/// Characters outside the Basic Multilingual Plane count as two UTF-16 units
/// and become two underscores, so keys match those written by browser clients.
pub fn sanitize_filename(filename: &str) -> String {
    let mut sanitized = String::with_capacity(filename.len());
    for c in filename.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            sanitized.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                sanitized.push('_');
            }
        }
    }
    sanitized
}
