//! Security headers for HTTP responses
//!
//! Pages and API responses get different Content Security Policies; both
//! drop server information and forbid framing.

use warp::http::HeaderValue;
use warp::reply::Response;

/// Content Security Policy for rendered pages (forms post back to self)
const PAGE_CSP: &str = "default-src 'self'; script-src 'self'; style-src 'self'; img-src 'self' data:; object-src 'none'; frame-ancestors 'none'; form-action 'self'; base-uri 'self';";

/// Strict Content Security Policy for API endpoints
const API_CSP: &str = "default-src 'none'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=(), payment=(), usb=()";

fn add_common_headers(response: &mut Response) {
    let headers = response.headers_mut();

    // Prevent clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    // Prevent MIME type sniffing
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));

    headers.insert("Permissions-Policy", HeaderValue::from_static(PERMISSIONS_POLICY));

    // Remove server information disclosure
    headers.remove("Server");
}

/// Add security headers to a rendered page
pub fn add_page_security_headers(mut response: Response) -> Response {
    add_common_headers(&mut response);
    let headers = response.headers_mut();
    headers.insert("Referrer-Policy", HeaderValue::from_static("strict-origin-when-cross-origin"));
    headers.insert("Content-Security-Policy", HeaderValue::from_static(PAGE_CSP));
    response
}

/// Add strict security headers to an API response
///
/// API bodies may carry tokens or private todos, so nothing is cached.
pub fn add_api_security_headers(mut response: Response) -> Response {
    add_common_headers(&mut response);
    let headers = response.headers_mut();
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    headers.insert("Content-Security-Policy", HeaderValue::from_static(API_CSP));
    headers.insert(
        "Cache-Control",
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    response
}
