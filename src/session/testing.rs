//! In-memory platform used by tests across the crate

use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportFactory};
use crate::config::PlatformConfig;
use crate::errors::BotError;

/// Anvil/hardhat development keys
pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_KEYS: [&str; 3] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
];

type Responder = Arc<dyn Fn() -> Result<HttpResponse, BotError> + Send + Sync>;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub proxy: Option<String>,
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Platform fake: answers every call with success unless a path is overridden
#[derive(Clone, Default)]
pub struct FakePlatform {
    log: Arc<Mutex<Vec<RecordedRequest>>>,
    overrides: Arc<Mutex<HashMap<String, Responder>>>,
    sessions_issued: Arc<AtomicUsize>,
}

impl FakePlatform {
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn set_override<F>(&self, path: &str, responder: F)
    where
        F: Fn() -> Result<HttpResponse, BotError> + Send + Sync + 'static,
    {
        self.overrides
            .lock()
            .unwrap()
            .insert(path.to_string(), Arc::new(responder));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    fn respond(&self, proxy: Option<String>, request: HttpRequest) -> Result<HttpResponse, BotError> {
        let base = PlatformConfig::default().api_base_url;
        let path = request
            .url
            .strip_prefix(&base)
            .unwrap_or(&request.url)
            .to_string();

        self.log.lock().unwrap().push(RecordedRequest {
            proxy,
            method: request.method.clone(),
            path: path.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
        });

        let responder = self.overrides.lock().unwrap().get(&path).cloned();
        if let Some(responder) = responder {
            return responder();
        }

        Ok(match path.as_str() {
            "/account/signverify" => {
                let n = self.sessions_issued.fetch_add(1, Ordering::SeqCst) + 1;
                HttpResponse::json(200, json!({"code": 0, "data": {"status": "ok"}}))
                    .with_cookie(format!("gfsessionid=sess-{}; Path=/; HttpOnly", n))
            }
            "/swap/token_list" => HttpResponse::json(
                200,
                json!({"code": 0, "data": [
                    {"symbol": "BSD", "price": "1", "type": "S"},
                    {"symbol": "ETH", "price": "2.0", "type": "B"},
                    {"symbol": "USDT", "price": 4.0, "type": "B"}
                ]}),
            ),
            "/my/supply" => HttpResponse::json(200, json!({"code": 0, "data": []})),
            _ => HttpResponse::json(200, json!({"code": 0, "data": null})),
        })
    }
}

struct FakeTransport {
    platform: FakePlatform,
    proxy: Option<String>,
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BotError> {
        self.platform.respond(self.proxy.clone(), request)
    }
}

impl TransportFactory for FakePlatform {
    fn build(&self, proxy: Option<&str>) -> Result<Box<dyn HttpTransport>, BotError> {
        Ok(Box::new(FakeTransport {
            platform: self.clone(),
            proxy: proxy.map(|p| p.to_string()),
        }))
    }
}
