//! HTML escaping for user content placed into pages

/// HTML entities for encoding special characters
const HTML_ENTITIES: &[(char, &str)] = &[
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
    ('`', "&#x60;"),
    ('=', "&#x3D;"),
];

/// Encode HTML entities to prevent XSS attacks
pub fn encode_html(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for c in input.chars() {
        match HTML_ENTITIES.iter().find(|(special, _)| *special == c) {
            Some((_, entity)) => result.push_str(entity),
            None => result.push(c),
        }
    }
    result
}
