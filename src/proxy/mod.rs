//! Outbound proxy selection
//!
//! [`ProxyRotator`] owns the parsed proxy list and hands out one entry per
//! request attempt. The run loop assigns proxies per wallet round-robin; the
//! wallet manager samples at random. A rotator is built with one policy and
//! keeps it.

pub mod parser;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use parser::{parse_proxy, parse_proxy_list, read_and_parse_proxies};

use crate::config::ProxyConfig;
use crate::logger::{self, LogTag};

/// Proxies from the configured file, empty when proxying is disabled
pub fn load_configured_proxies(config: &ProxyConfig) -> Vec<String> {
    if !config.enabled {
        return Vec::new();
    }
    let proxies = read_and_parse_proxies(&crate::paths::resolve(&config.file_path));
    logger::info(LogTag::Proxy, &format!("Loaded {} proxies", proxies.len()));
    proxies
}

/// How [`ProxyRotator::next`] picks an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Deterministic: cursor modulo list length
    RoundRobin,
    /// Uniform sample per call
    Random,
}

#[derive(Debug)]
pub struct ProxyRotator {
    proxies: Vec<String>,
    policy: RotationPolicy,
    cursor: usize,
    rng: StdRng,
}

impl ProxyRotator {
    pub fn new(proxies: Vec<String>, policy: RotationPolicy) -> Self {
        Self {
            proxies,
            policy,
            cursor: 0,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn round_robin(proxies: Vec<String>) -> Self {
        Self::new(proxies, RotationPolicy::RoundRobin)
    }

    pub fn random(proxies: Vec<String>) -> Self {
        Self::new(proxies, RotationPolicy::Random)
    }

    /// A rotator that always answers "no proxy"
    pub fn disabled() -> Self {
        Self::round_robin(Vec::new())
    }

    /// Next proxy URI, or `None` for a direct connection
    pub fn next(&mut self) -> Option<String> {
        if self.proxies.is_empty() {
            return None;
        }

        let index = match self.policy {
            RotationPolicy::RoundRobin => {
                let index = self.cursor % self.proxies.len();
                self.cursor = self.cursor.wrapping_add(1);
                index
            }
            RotationPolicy::Random => self.rng.gen_range(0..self.proxies.len()),
        };

        Some(self.proxies[index].clone())
    }

    /// First entry without advancing the cursor (setup login uses it)
    pub fn first(&self) -> Option<String> {
        self.proxies.first().cloned()
    }

    /// Rewind so the next batch starts from the first proxy again
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<String> {
        vec![
            "http://1.1.1.1:80".to_string(),
            "http://2.2.2.2:80".to_string(),
            "http://3.3.3.3:80".to_string(),
        ]
    }

    #[test]
    fn test_empty_list_always_none() {
        let mut rotator = ProxyRotator::disabled();
        for _ in 0..5 {
            assert_eq!(rotator.next(), None);
        }
        let mut random = ProxyRotator::random(Vec::new());
        assert_eq!(random.next(), None);
    }

    #[test]
    fn test_round_robin_cycles_in_order() {
        let mut rotator = ProxyRotator::round_robin(sample());
        let picked: Vec<String> = (0..7).filter_map(|_| rotator.next()).collect();
        assert_eq!(picked[0], "http://1.1.1.1:80");
        assert_eq!(picked[1], "http://2.2.2.2:80");
        assert_eq!(picked[2], "http://3.3.3.3:80");
        assert_eq!(picked[3], "http://1.1.1.1:80");
        assert_eq!(picked[6], "http://1.1.1.1:80");
    }

    #[test]
    fn test_reset_rewinds_cursor() {
        let mut rotator = ProxyRotator::round_robin(sample());
        rotator.next();
        rotator.next();
        rotator.reset();
        assert_eq!(rotator.next().as_deref(), Some("http://1.1.1.1:80"));
    }

    #[test]
    fn test_random_stays_within_list() {
        let list = sample();
        let mut rotator = ProxyRotator::random(list.clone());
        for _ in 0..50 {
            let picked = rotator.next().unwrap();
            assert!(list.contains(&picked));
        }
        assert_eq!(rotator.policy(), RotationPolicy::Random);
    }

    #[test]
    fn test_disabled_config_loads_nothing() {
        let config = ProxyConfig {
            enabled: false,
            file_path: "/nonexistent/proxies.txt".to_string(),
        };
        assert!(load_configured_proxies(&config).is_empty());
    }
}
