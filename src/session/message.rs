/// Sign-in message construction
///
/// The server re-renders this text from the submitted fields and checks the
/// signature against it, so every byte matters: line order, blank lines and the
/// timestamp format (UTC, millisecond precision, `Z` suffix).
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;

use crate::config::PlatformConfig;

const NONCE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
pub const NONCE_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct SignInMessage {
    pub domain: String,
    pub address: String,
    pub statement: String,
    pub uri: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
    pub expiration_time: DateTime<Utc>,
}

impl SignInMessage {
    pub fn new(
        platform: &PlatformConfig,
        address: &str,
        nonce: &str,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: platform.siwe_domain.clone(),
            address: address.to_string(),
            statement: platform.siwe_statement.clone(),
            uri: platform.siwe_uri.clone(),
            chain_id: platform.chain_id,
            nonce: nonce.to_string(),
            issued_at,
            expiration_time: issued_at + Duration::seconds(platform.signin_validity_secs),
        }
    }

    pub fn issued_at_str(&self) -> String {
        format_timestamp(&self.issued_at)
    }

    pub fn expiration_time_str(&self) -> String {
        format_timestamp(&self.expiration_time)
    }

    /// The exact text that gets signed
    pub fn render(&self) -> String {
        format!(
            "{domain} wants you to sign in with your Ethereum account:\n\
             {address}\n\
             \n\
             {statement}\n\
             \n\
             URI: {uri}\n\
             Version: 1\n\
             Chain ID: {chain_id}\n\
             Nonce: {nonce}\n\
             Issued At: {issued_at}\n\
             Expiration Time: {expiration}",
            domain = self.domain,
            address = self.address,
            statement = self.statement,
            uri = self.uri,
            chain_id = self.chain_id,
            nonce = self.nonce,
            issued_at = self.issued_at_str(),
            expiration = self.expiration_time_str(),
        )
    }
}

/// `2025-01-02T03:04:05.678Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Lowercase base-36 nonce
pub fn generate_nonce<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..NONCE_LENGTH)
        .map(|_| NONCE_ALPHABET[rng.gen_range(0..NONCE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 30, 45).unwrap() + Duration::milliseconds(123)
    }

    #[test]
    fn test_render_is_byte_exact() {
        let message = SignInMessage::new(
            &PlatformConfig::default(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "k3j9x0ab",
            fixed_time(),
        );

        let expected = "blockstreet.money wants you to sign in with your Ethereum account:\n\
0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266\n\
\n\
Welcome to Block Street\n\
\n\
URI: https://blockstreet.money\n\
Version: 1\n\
Chain ID: 1\n\
Nonce: k3j9x0ab\n\
Issued At: 2025-10-01T12:30:45.123Z\n\
Expiration Time: 2025-10-01T12:32:45.123Z";

        assert_eq!(message.render(), expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let platform = PlatformConfig::default();
        let a = SignInMessage::new(&platform, "0xabc", "nonce123", fixed_time());
        let b = SignInMessage::new(&platform, "0xabc", "nonce123", fixed_time());
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn test_timestamp_keeps_zero_millis() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_nonce_alphabet_and_length() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let nonce = generate_nonce(&mut rng);
            assert_eq!(nonce.len(), NONCE_LENGTH);
            assert!(nonce
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }
}
