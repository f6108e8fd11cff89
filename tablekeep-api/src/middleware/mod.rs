/// Response-level middleware for the API server
///
/// - `security`: OWASP security headers applied to every response

pub mod security;
