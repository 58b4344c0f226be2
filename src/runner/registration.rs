//! Wallet registration for the wallet manager tool
//!
//! Each new wallet gets a fresh key, a random proxy and its own captcha
//! token, signs in with the invite code, is confirmed through
//! `/account/info` and is then appended to the wallet store.

use std::sync::Arc;

use crate::captcha::CaptchaSolver;
use crate::config::Config;
use crate::errors::BotError;
use crate::logger::{self, LogTag};
use crate::proxy::ProxyRotator;
use crate::scheduler::{sleep_ms, ActionScheduler, CycleReport};
use crate::session::{SessionClient, TransportFactory};
use crate::wallet::{LocalWallet, WalletRecord, WalletStore};

#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub created: Vec<WalletRecord>,
    pub failed: usize,
    /// One onboarding report per created wallet when interaction was requested
    pub interactions: Vec<CycleReport>,
}

pub struct Registrar {
    config: Config,
    factory: Arc<dyn TransportFactory>,
    captcha: Arc<dyn CaptchaSolver>,
    rotator: ProxyRotator,
    store: WalletStore,
    scheduler: ActionScheduler,
}

impl Registrar {
    pub fn new(
        config: Config,
        factory: Arc<dyn TransportFactory>,
        captcha: Arc<dyn CaptchaSolver>,
        proxies: Vec<String>,
        store: WalletStore,
    ) -> Self {
        let scheduler = ActionScheduler::new(config.scheduler.clone());
        Self {
            config,
            factory,
            captcha,
            rotator: ProxyRotator::random(proxies),
            store,
            scheduler,
        }
    }

    pub fn with_scheduler(mut self, scheduler: ActionScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Dashboard URL carrying the invite code, as the captcha page
    fn captcha_page_url(&self) -> String {
        let platform = &self.config.platform;
        if platform.invite_code.is_empty() {
            platform.captcha_page_url.clone()
        } else {
            format!(
                "{}?invite_code={}",
                platform.captcha_page_url, platform.invite_code
            )
        }
    }

    /// Create, sign in, confirm and persist one wallet
    pub async fn register_one(&mut self) -> Result<(WalletRecord, SessionClient), BotError> {
        let wallet = LocalWallet::generate();
        let private_key = wallet.private_key_hex();
        let proxy = self.rotator.next();

        let token = self
            .captcha
            .solve(&self.config.platform.turnstile_site_key, &self.captcha_page_url())
            .await?;

        let mut client = SessionClient::connect(
            wallet.into_provider(),
            self.config.platform.clone(),
            self.factory.as_ref(),
            proxy,
        )?;
        client.login(Some(&token)).await?;
        client.account_info().await?;

        let record = WalletRecord {
            address: client.address(),
            private_key,
            session_id: client.session_id(),
        };
        let total = self.store.append(record.clone())?;
        logger::info(
            LogTag::Wallet,
            &format!(
                "Registered wallet {} ({} stored in {})",
                record.address,
                total,
                self.store.path().display()
            ),
        );

        Ok((record, client))
    }

    /// Register `count` wallets; `interact` onboards each new wallet
    ///
    /// Registration needs an invite code. Captcha and config errors stop the
    /// run, anything else only skips the wallet.
    pub async fn run(&mut self, count: u32, interact: bool) -> Result<RegistrationReport, BotError> {
        if self.config.platform.invite_code.trim().is_empty() {
            return Err(BotError::config("INVITE_CODE is missing or empty"));
        }
        let mut report = RegistrationReport::default();

        for index in 1..=count {
            logger::info(
                LogTag::Wallet,
                &format!("Creating wallet {}/{}", index, count),
            );

            match self.register_one().await {
                Ok((record, mut client)) => {
                    if interact {
                        report.interactions.push(self.interact(&mut client).await);
                    }
                    report.created.push(record);
                }
                Err(e) if e.is_batch_fatal() => {
                    logger::error(
                        LogTag::Wallet,
                        &format!("Stopping registration: {}", e),
                    );
                    report.failed += 1;
                    break;
                }
                Err(e) => {
                    logger::error(
                        LogTag::Wallet,
                        &format!("Error processing wallet {}: {}", index, e),
                    );
                    report.failed += 1;
                }
            }

            if index < count {
                sleep_ms(self.config.runner.wallet_delay_ms).await;
            }
        }

        Ok(report)
    }

    async fn interact(&mut self, client: &mut SessionClient) -> CycleReport {
        logger::info(
            LogTag::Wallet,
            &format!("Starting interactions for {}", client.address()),
        );
        self.scheduler.run_onboarding(client).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RunnerConfig, SchedulerConfig};
    use crate::session::testing::FakePlatform;
    use crate::session::HttpResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSolver {
        pages: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl CaptchaSolver for RecordingSolver {
        async fn solve(&self, _site_key: &str, page_url: &str) -> Result<String, BotError> {
            self.pages.lock().unwrap().push(page_url.to_string());
            if self.fail {
                Err(BotError::captcha("ERROR_ZERO_BALANCE"))
            } else {
                Ok("tok".to_string())
            }
        }
    }

    fn config() -> Config {
        let mut config = Config {
            scheduler: SchedulerConfig {
                action_delay_min_ms: 0,
                action_delay_max_ms: 0,
                ..SchedulerConfig::default()
            },
            runner: RunnerConfig {
                wallet_delay_ms: 0,
                ..RunnerConfig::default()
            },
            ..Config::default()
        };
        config.platform.invite_code = "REF42".to_string();
        config
    }

    #[tokio::test]
    async fn test_registers_and_persists_wallets() {
        let dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(dir.path().join("wallets.json"));
        let platform = FakePlatform::permissive();
        let solver = Arc::new(RecordingSolver::default());

        let mut registrar = Registrar::new(
            config(),
            Arc::new(platform.clone()),
            solver.clone(),
            vec!["http://9.9.9.9:3128".to_string()],
            store.clone(),
        );
        let report = registrar.run(2, false).await.unwrap();

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.failed, 0);
        assert_eq!(platform.count("/account/info"), 2);

        let stored = store.load().unwrap();
        assert_eq!(stored, report.created);
        assert_eq!(stored[0].session_id.as_deref(), Some("sess-1"));
        assert_eq!(stored[1].session_id.as_deref(), Some("sess-2"));
        assert_ne!(stored[0].address, stored[1].address);

        // Stored keys restore the same addresses
        let restored = LocalWallet::from_private_key(&stored[0].private_key).unwrap();
        assert_eq!(crate::wallet::SignatureProvider::address(&restored), stored[0].address);

        assert!(platform
            .requests()
            .iter()
            .all(|r| r.proxy.as_deref() == Some("http://9.9.9.9:3128")));
        assert_eq!(
            solver.pages.lock().unwrap()[0],
            "https://blockstreet.money/dashboard?invite_code=REF42"
        );

        let login = &platform.requests()[0];
        let crate::session::RequestBody::Form(form) = &login.body else {
            panic!("expected form body");
        };
        assert!(form.contains(&("invite_code".to_string(), "REF42".to_string())));
    }

    #[tokio::test]
    async fn test_unconfirmed_wallet_is_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let store = WalletStore::new(dir.path().join("wallets.json"));
        let platform = FakePlatform::permissive();
        platform.set_override("/account/info", || {
            Ok(HttpResponse::json(401, json!({"code": 401, "message": "not logged in"})))
        });

        let mut registrar = Registrar::new(
            config(),
            Arc::new(platform.clone()),
            Arc::new(RecordingSolver::default()),
            Vec::new(),
            store.clone(),
        );
        let report = registrar.run(2, false).await.unwrap();

        assert!(report.created.is_empty());
        assert_eq!(report.failed, 2);
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_captcha_failure_stops_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::permissive();
        let solver = Arc::new(RecordingSolver {
            fail: true,
            ..Default::default()
        });

        let mut registrar = Registrar::new(
            config(),
            Arc::new(platform.clone()),
            solver.clone(),
            Vec::new(),
            WalletStore::new(dir.path().join("wallets.json")),
        );
        let report = registrar.run(3, false).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(solver.pages.lock().unwrap().len(), 1);
        assert!(platform.requests().is_empty());
    }

    #[tokio::test]
    async fn test_missing_invite_code_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::permissive();
        let solver = Arc::new(RecordingSolver::default());
        let mut config = config();
        config.platform.invite_code = "  ".to_string();

        let mut registrar = Registrar::new(
            config,
            Arc::new(platform.clone()),
            solver.clone(),
            Vec::new(),
            WalletStore::new(dir.path().join("wallets.json")),
        );
        let result = registrar.run(2, false).await;

        assert_eq!(
            result.unwrap_err(),
            BotError::config("INVITE_CODE is missing or empty")
        );
        assert!(solver.pages.lock().unwrap().is_empty());
        assert_eq!(platform.count("/account/signverify"), 0);
    }

    #[tokio::test]
    async fn test_interaction_onboards_new_wallet() {
        let dir = tempfile::tempdir().unwrap();
        let platform = FakePlatform::permissive();
        platform.set_override("/account/assets", || {
            Ok(HttpResponse::json(
                200,
                json!({"code": 0, "data": [{"symbol": "BSD", "available_amount": "3"}]}),
            ))
        });
        let mut registrar = Registrar::new(
            config(),
            Arc::new(platform.clone()),
            Arc::new(RecordingSolver::default()),
            Vec::new(),
            WalletStore::new(dir.path().join("wallets.json")),
        )
        .with_scheduler(ActionScheduler::with_seed(config().scheduler, 11));

        let report = registrar.run(1, true).await.unwrap();

        assert_eq!(report.interactions.len(), 1);
        assert_eq!(platform.count("/account/assets"), 1);
        assert_eq!(platform.count("/swap/token_list"), 1);
        assert_eq!(platform.count("/swap"), 1);
        assert_eq!(platform.count("/supply"), 1);
        assert_eq!(platform.count("/withdraw"), 0);
        assert_eq!(report.interactions[0].successful(), 2);
        // Interaction reuses the registration session
        let cookie = "gfsessionid=sess-1";
        assert!(platform
            .requests()
            .iter()
            .filter(|r| r.path == "/supply" || r.path == "/swap")
            .all(|r| r.header("Cookie") == Some(cookie)));
    }
}
