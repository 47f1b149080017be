//! Security utilities for HTTP responses

pub mod headers;
pub mod html;

pub use headers::{add_api_security_headers, add_page_security_headers};
pub use html::encode_html;
