use crate::AppState;
use crate::config::GatewayConfig;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};

const ALLOW_METHODS: &str = "POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-Auth-Secret";
const MAX_AGE: &str = "86400";

/// Picks the `Access-Control-Allow-Origin` value: the request origin when it
/// is allow-listed, otherwise the first configured origin.
pub fn resolve_origin<'a>(config: &'a GatewayConfig, origin: Option<&str>) -> &'a str {
    origin
        .and_then(|o| config.allowed_origins.iter().find(|allowed| *allowed == o))
        .map(String::as_str)
        .unwrap_or_else(|| config.default_origin())
}

pub fn cors_headers(config: &GatewayConfig, origin: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(resolve_origin(config, origin)) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(MAX_AGE),
    );

    headers
}

/// Answers preflight requests and tags every other response with CORS headers.
pub async fn cors_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    let headers = cors_headers(&state.config, origin);

    if *req.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        response.headers_mut().extend(headers);
        return response;
    }

    let mut response = next.run(req).await;
    response.headers_mut().extend(headers);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_origin() {
        let config = GatewayConfig::default();
        assert_eq!(
            resolve_origin(&config, Some("http://localhost:3000")),
            "http://localhost:3000"
        );
        assert_eq!(
            resolve_origin(&config, Some("https://evil.example")),
            "https://payal54rani.github.io"
        );
        assert_eq!(resolve_origin(&config, Some("*")), "https://payal54rani.github.io");
        assert_eq!(resolve_origin(&config, None), "https://payal54rani.github.io");
    }

    #[test]
    fn test_cors_headers() {
        let headers = cors_headers(&GatewayConfig::default(), Some("http://127.0.0.1:5500"));
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://127.0.0.1:5500");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, X-Auth-Secret"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "86400");
    }
}
