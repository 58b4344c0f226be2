//! Wallets and message signing
//!
//! The session layer only needs an address and a way to sign text, so it
//! talks to [`SignatureProvider`]. [`LocalWallet`] implements it with an
//! in-memory secp256k1 key (EIP-191 personal-sign).

pub mod loader;
pub mod store;

use alloy::primitives::hex;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::BotError;

pub use loader::{load_wallets_from_env, load_wallets_from_store};
pub use store::{WalletRecord, WalletStore};

/// Signing capability bound to one address
#[async_trait]
pub trait SignatureProvider: Send + Sync {
    /// Checksummed `0x` address, the identity key of the wallet
    fn address(&self) -> String;

    /// Sign `message` exactly as given; returns `0x`-prefixed hex
    async fn sign_text(&self, message: &str) -> Result<String, BotError>;
}

/// Wallet backed by a raw private key
#[derive(Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
    address: String,
}

impl LocalWallet {
    /// Parse a hex private key (with or without `0x`)
    pub fn from_private_key(private_key: &str) -> Result<Self, BotError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| BotError::config(format!("Invalid private key: {}", e)))?;
        Ok(Self::from_signer(signer))
    }

    /// Fresh random key
    pub fn generate() -> Self {
        Self::from_signer(PrivateKeySigner::random())
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = signer.address().to_checksum(None);
        Self { signer, address }
    }

    /// `0x`-prefixed private key, only needed when persisting created wallets
    pub fn private_key_hex(&self) -> String {
        hex::encode_prefixed(self.signer.to_bytes())
    }

    pub fn into_provider(self) -> Arc<dyn SignatureProvider> {
        Arc::new(self)
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SignatureProvider for LocalWallet {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn sign_text(&self, message: &str) -> Result<String, BotError> {
        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| BotError::auth(format!("Failed to sign message: {}", e)))?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}

/// Shorten an address for log lines: `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (anvil/hardhat account #0)
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[test]
    fn test_address_is_checksummed() {
        let wallet = LocalWallet::from_private_key(DEV_KEY).unwrap();
        assert_eq!(wallet.address(), DEV_ADDRESS);
    }

    #[test]
    fn test_key_without_prefix_is_accepted() {
        let wallet = LocalWallet::from_private_key(DEV_KEY.trim_start_matches("0x")).unwrap();
        assert_eq!(wallet.address(), DEV_ADDRESS);
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let err = LocalWallet::from_private_key("not-a-key").unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[tokio::test]
    async fn test_signature_is_deterministic_hex() {
        let wallet = LocalWallet::from_private_key(DEV_KEY).unwrap();
        let first = wallet.sign_text("hello blockstreet").await.unwrap();
        let second = wallet.sign_text("hello blockstreet").await.unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("0x"));
        assert_eq!(first.len(), 2 + 65 * 2);
        assert_ne!(first, wallet.sign_text("hello blockstreet!").await.unwrap());
    }

    #[test]
    fn test_generated_key_round_trips() {
        let wallet = LocalWallet::generate();
        let restored = LocalWallet::from_private_key(&wallet.private_key_hex()).unwrap();
        assert_eq!(wallet.address(), restored.address());
    }

    #[test]
    fn test_short_address() {
        assert_eq!(short_address(DEV_ADDRESS), "0xf39F...2266");
        assert_eq!(short_address("0x12"), "0x12");
    }
}
