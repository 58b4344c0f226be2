/// Wallet loading from the environment and the wallet store
///
/// Keys named `<prefix><suffix>` are loaded in suffix order (numeric suffixes
/// compare numerically, so `PRIVATE_KEY_10` comes after `PRIVATE_KEY_2`).
/// Keys that fail to parse are skipped with a warning.
use std::cmp::Ordering;

use super::store::WalletStore;
use super::LocalWallet;
use crate::errors::BotError;
use crate::logger::{self, LogTag};

/// Load wallets from `vars` (normally `std::env::vars()`)
pub fn load_wallets_from_env<I>(prefix: &str, vars: I) -> Vec<LocalWallet>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut entries: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(key, value)| key.starts_with(prefix) && !value.trim().is_empty())
        .collect();

    entries.sort_by(|(a, _), (b, _)| compare_suffix(&a[prefix.len()..], &b[prefix.len()..]));

    entries
        .into_iter()
        .filter_map(|(key, value)| match LocalWallet::from_private_key(&value) {
            Ok(wallet) => Some(wallet),
            Err(_) => {
                logger::warning(
                    LogTag::Wallet,
                    &format!("Could not load wallet from {}", key),
                );
                None
            }
        })
        .collect()
}

/// Load wallets previously created by the wallet manager
pub fn load_wallets_from_store(store: &WalletStore) -> Result<Vec<LocalWallet>, BotError> {
    let wallets = store
        .load()?
        .into_iter()
        .filter_map(|record| match LocalWallet::from_private_key(&record.private_key) {
            Ok(wallet) => Some(wallet),
            Err(_) => {
                logger::warning(
                    LogTag::Wallet,
                    &format!("Skipping stored wallet {} with invalid key", record.address),
                );
                None
            }
        })
        .collect();
    Ok(wallets)
}

fn compare_suffix(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{SignatureProvider, WalletRecord};

    const KEY_A: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const KEY_B: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_loads_prefixed_keys_in_numeric_order() {
        let wallets = load_wallets_from_env(
            "PRIVATE_KEY_",
            vars(&[
                ("PRIVATE_KEY_10", KEY_A),
                ("HOME", "/root"),
                ("PRIVATE_KEY_2", KEY_B),
            ]),
        );

        assert_eq!(wallets.len(), 2);
        assert_eq!(wallets[0].address(), "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(wallets[1].address(), "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    }

    #[test]
    fn test_invalid_and_empty_keys_are_skipped() {
        let wallets = load_wallets_from_env(
            "PRIVATE_KEY_",
            vars(&[
                ("PRIVATE_KEY_1", "garbage"),
                ("PRIVATE_KEY_2", ""),
                ("PRIVATE_KEY_3", KEY_A),
            ]),
        );
        assert_eq!(wallets.len(), 1);
    }

    #[test]
    fn test_load_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(dir.path().join("wallets.json"));
        store
            .append(WalletRecord {
                address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
                private_key: KEY_A.to_string(),
                session_id: None,
            })
            .unwrap();
        store
            .append(WalletRecord {
                address: "0xbad".to_string(),
                private_key: "nope".to_string(),
                session_id: None,
            })
            .unwrap();

        let wallets = load_wallets_from_store(&store).unwrap();
        assert_eq!(wallets.len(), 1);
    }
}
