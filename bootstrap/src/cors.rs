//! CORS 策略

use axum::http::HeaderValue;
use matc_config::CorsConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// 根据允许的源列表构建 CORS 层
///
/// 列表为空时，开发环境放行所有源，其他环境拒绝跨域；`*` 放行所有源
pub fn build_cors_layer(config: &CorsConfig, is_development: bool) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        if is_development {
            return CorsLayer::permissive();
        }
        warn!("No CORS origins configured, cross-origin requests will be rejected");
        return base;
    }

    if config.allowed_origins.iter().any(|o| o.trim() == "*") {
        return base.allow_origin(Any);
    }

    let patterns = config.allowed_origins.clone();
    base.allow_origin(AllowOrigin::predicate(
        move |origin: &HeaderValue, _parts| {
            origin
                .to_str()
                .map(|origin| patterns.iter().any(|p| origin_matches(p, origin)))
                .unwrap_or(false)
        },
    ))
}

/// 匹配单个源，模式中最多一个 `*`，例如 `https://*.amplifyapp.com`
pub fn origin_matches(pattern: &str, origin: &str) -> bool {
    let pattern = pattern.trim().trim_end_matches('/');
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            origin.len() > prefix.len() + suffix.len()
                && origin.starts_with(prefix)
                && origin.ends_with(suffix)
        }
        None => pattern.eq_ignore_ascii_case(origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_origin() {
        assert!(origin_matches("http://localhost:3000", "http://localhost:3000"));
        assert!(origin_matches("http://localhost:3000/", "http://localhost:3000"));
        assert!(!origin_matches("http://localhost:3000", "http://localhost:3001"));
    }

    #[test]
    fn test_wildcard_subdomain() {
        let pattern = "https://*.amplifyapp.com";
        assert!(origin_matches(pattern, "https://main.d1x2y3.amplifyapp.com"));
        assert!(!origin_matches(pattern, "https://.amplifyapp.com"));
        assert!(!origin_matches(pattern, "http://main.amplifyapp.com"));
        assert!(!origin_matches(pattern, "https://amplifyapp.com.evil.io"));
    }
}
