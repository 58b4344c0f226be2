//! Session cookie helpers
//!
//! The platform keys sessions on a single cookie (`gfsessionid` by default).
//! We keep it in request form, `name=value`, with attributes stripped.

/// Pick the session cookie out of `Set-Cookie` values
pub fn extract_session_cookie(set_cookies: &[String], name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies
        .iter()
        .map(|raw| raw.trim())
        .find(|raw| raw.starts_with(&prefix))
        .map(|raw| raw.split(';').next().unwrap_or(raw).trim().to_string())
}

/// Cookie sent on unauthenticated requests
pub fn empty_session_marker(name: &str) -> String {
    format!("{}=", name)
}

/// Value part of a `name=value` cookie
pub fn session_id_from_cookie<'a>(cookie: &'a str, name: &str) -> Option<&'a str> {
    cookie
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('='))
        .filter(|value| !value.is_empty())
}

/// Accept either `name=value` or a bare value and return `name=value`
pub fn normalize_cookie(raw: &str, name: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with(&format!("{}=", name)) {
        raw.split(';').next().unwrap_or(raw).to_string()
    } else {
        format!("{}={}", name, raw)
    }
}
