/// Browser-like request headers
use rand::seq::SliceRandom;

use crate::config::PlatformConfig;

/// Headers every platform request carries regardless of session state
pub fn default_browser_headers(platform: &PlatformConfig) -> Vec<(String, String)> {
    [
        ("accept", "application/json, text/plain, */*"),
        ("accept-language", "en-US,en;q=0.9"),
        ("priority", "u=1, i"),
        (
            "sec-ch-ua",
            "\"Brave\";v=\"141\", \"Not?A_Brand\";v=\"8\", \"Chromium\";v=\"141\"",
        ),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
        ("sec-gpc", "1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .chain([
        ("Referer".to_string(), platform.referer.clone()),
        ("Origin".to_string(), platform.origin.clone()),
    ])
    .collect()
}

/// Chromium major version announced by `sec-ch-ua`
pub const CHROMIUM_MAJOR: &str = "141";

/// Desktop Chromium user agent, chosen fresh for every request
///
/// Version and OS always agree with the client hints in
/// [`default_browser_headers`].
pub fn random_user_agent() -> String {
    let mut rng = rand::thread_rng();

    let builds = ["141.0.0.0", "141.0.7390.54", "141.0.7390.76", "141.0.7390.108"];
    let windows_versions = ["Windows NT 10.0; Win64; x64", "Windows NT 10.0; WOW64"];

    let build = builds.choose(&mut rng).unwrap_or(&"141.0.0.0");
    let os = windows_versions
        .choose(&mut rng)
        .unwrap_or(&"Windows NT 10.0; Win64; x64");
    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        os, build
    )
}

/// Milliseconds since the Unix epoch, as sent in the `timestamp` header
pub fn timestamp_ms() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
