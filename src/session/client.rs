/// One authenticated platform session for one wallet
///
/// Owns the wallet handle, its transport (already bound to a proxy) and the
/// session cookie. The cookie is set by the sign-in handshake and replaced
/// whenever any response carries a new one; it is never cleared.
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;

use super::cookie::{
    empty_session_marker, extract_session_cookie, normalize_cookie, session_id_from_cookie,
};
use super::headers::{default_browser_headers, random_user_agent, timestamp_ms};
use super::message::{generate_nonce, SignInMessage};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody, TransportFactory};
use super::types::{
    decode_list, decode_object, AccountAsset, BorrowPosition, EarnInfo, SessionInfo,
    SuppliedAsset, TokenDescriptor,
};
use crate::config::PlatformConfig;
use crate::errors::BotError;
use crate::logger::{self, LogTag};
use crate::wallet::{short_address, SignatureProvider};

/// Session state owned by exactly one client
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub cookie: Option<String>,
    pub last_authenticated_at: Option<DateTime<Utc>>,
}

/// Method, path and body of a platform call
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    /// Path below the API base, e.g. `/my/supply`
    pub path: String,
    pub body: RequestBody,
}

impl RequestSpec {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            body: RequestBody::Empty,
        }
    }

    pub fn post(path: &str) -> Self {
        Self {
            method: Method::POST,
            path: path.to_string(),
            body: RequestBody::Empty,
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }
}

pub struct SessionClient {
    wallet: Arc<dyn SignatureProvider>,
    transport: Box<dyn HttpTransport>,
    platform: PlatformConfig,
    proxy: Option<String>,
    session: Session,
}

impl SessionClient {
    pub fn new(
        wallet: Arc<dyn SignatureProvider>,
        platform: PlatformConfig,
        transport: Box<dyn HttpTransport>,
        proxy: Option<String>,
    ) -> Self {
        Self {
            wallet,
            transport,
            platform,
            proxy,
            session: Session::default(),
        }
    }

    /// Build the transport for `proxy` through `factory`
    pub fn connect(
        wallet: Arc<dyn SignatureProvider>,
        platform: PlatformConfig,
        factory: &dyn TransportFactory,
        proxy: Option<String>,
    ) -> Result<Self, BotError> {
        let transport = factory.build(proxy.as_deref())?;
        Ok(Self::new(wallet, platform, transport, proxy))
    }

    /// Resume a previously captured session (`name=value` or bare value)
    pub fn with_cookie(mut self, cookie: &str) -> Self {
        if !cookie.trim().is_empty() {
            self.session.cookie = Some(normalize_cookie(cookie, &self.platform.session_cookie_name));
        }
        self
    }

    pub fn address(&self) -> String {
        self.wallet.address()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cookie(&self) -> Option<&str> {
        self.session.cookie.as_deref()
    }

    /// Cookie value without the `name=` part
    pub fn session_id(&self) -> Option<String> {
        self.cookie()
            .and_then(|c| session_id_from_cookie(c, &self.platform.session_cookie_name))
            .map(|s| s.to_string())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.last_authenticated_at.is_some()
    }

    // =========================================================================
    // SIGN-IN
    // =========================================================================

    /// Sign-in handshake; any failure on the way is an `Auth` error
    pub async fn login(&mut self, captcha_token: Option<&str>) -> Result<SessionInfo, BotError> {
        let address = self.wallet.address();

        let nonce = if self.platform.use_server_nonce {
            match self.sign_nonce().await {
                Ok(Some(nonce)) => nonce,
                Ok(None) => {
                    logger::debug(LogTag::Session, "Server returned no nonce, using a local one");
                    generate_nonce(&mut rand::thread_rng())
                }
                Err(e) => return Err(BotError::auth(format!("Login failed: {}", e.cause()))),
            }
        } else {
            generate_nonce(&mut rand::thread_rng())
        };

        let message = SignInMessage::new(&self.platform, &address, &nonce, Utc::now());

        logger::debug(
            LogTag::Session,
            &format!("Signing message for {}", short_address(&address)),
        );
        let signature = self
            .wallet
            .sign_text(&message.render())
            .await
            .map_err(|e| BotError::auth(format!("Login failed: {}", e.cause())))?;

        let request = self.build_login_request(&message, &signature, captcha_token);

        logger::debug(LogTag::Session, "Sending signverify request");
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| BotError::auth(format!("Login failed: {}", e.cause())))?;
        self.capture_cookie(&response);

        let code_ok = response
            .body
            .as_ref()
            .map(|body| has_success_code(body))
            .unwrap_or(false);

        if !(code_ok || response.status == 200) {
            return Err(BotError::auth(format!(
                "Sign verify failed: {}",
                failure_message(&response)
            )));
        }

        let authenticated_at = Utc::now();
        self.session.last_authenticated_at = Some(authenticated_at);

        let payload = match &response.body {
            Some(body) => match body.get("data") {
                Some(data) if !data.is_null() => data.clone(),
                _ => body.clone(),
            },
            None => Value::Null,
        };

        Ok(SessionInfo {
            address,
            cookie: self.session.cookie.clone(),
            authenticated_at,
            payload,
        })
    }

    fn build_login_request(
        &self,
        message: &SignInMessage,
        signature: &str,
        captcha_token: Option<&str>,
    ) -> HttpRequest {
        let platform = &self.platform;

        let form = vec![
            ("address".to_string(), message.address.clone()),
            ("nonce".to_string(), message.nonce.clone()),
            ("signature".to_string(), signature.to_string()),
            ("chainId".to_string(), message.chain_id.to_string()),
            ("issuedAt".to_string(), message.issued_at_str()),
            ("expirationTime".to_string(), message.expiration_time_str()),
            ("invite_code".to_string(), platform.invite_code.clone()),
        ];

        let timestamp = if platform.static_timestamp.is_empty() {
            timestamp_ms()
        } else {
            platform.static_timestamp.clone()
        };
        let signature_header = if platform.use_static_signature {
            platform.static_signature.clone()
        } else {
            signature.to_string()
        };
        let cookie = self
            .session
            .cookie
            .clone()
            .unwrap_or_else(|| empty_session_marker(&platform.session_cookie_name));

        let mut headers = default_browser_headers(platform);
        headers.extend([
            ("User-Agent".to_string(), random_user_agent()),
            ("timestamp".to_string(), timestamp),
            ("signature".to_string(), signature_header),
            ("fingerprint".to_string(), platform.fingerprint.clone()),
            ("abs".to_string(), platform.abs.clone()),
            ("token".to_string(), platform.token.clone()),
            ("origin".to_string(), platform.origin.clone()),
            ("Cookie".to_string(), cookie),
        ]);
        if let Some(token) = captcha_token {
            headers.push(("Cf-Turnstile-Response".to_string(), token.to_string()));
        }

        HttpRequest {
            method: Method::POST,
            url: self.url("/account/signverify"),
            headers,
            body: RequestBody::Form(form),
        }
    }

    // =========================================================================
    // GENERIC DISPATCH
    // =========================================================================

    /// Send one platform call and normalize the outcome
    ///
    /// `code == 0` (number or string) yields the `data` payload, any other 2xx
    /// yields the raw body, everything else is a `Transport` error.
    pub async fn request(&mut self, spec: RequestSpec, requires_auth: bool) -> Result<Value, BotError> {
        let platform = &self.platform;

        let cookie = if requires_auth {
            self.session.cookie.clone().unwrap_or_default()
        } else {
            empty_session_marker(&platform.session_cookie_name)
        };

        let mut headers = default_browser_headers(platform);
        headers.extend([
            ("User-Agent".to_string(), random_user_agent()),
            ("fingerprint".to_string(), platform.fingerprint.clone()),
            ("timestamp".to_string(), timestamp_ms()),
            ("Cookie".to_string(), cookie),
            ("origin".to_string(), platform.origin.clone()),
        ]);
        if !platform.token.is_empty() {
            headers.push(("token".to_string(), platform.token.clone()));
        }

        let request = HttpRequest {
            method: spec.method.clone(),
            url: self.url(&spec.path),
            headers,
            body: spec.body,
        };

        logger::verbose(
            LogTag::Api,
            &format!("{} {} ({})", spec.method, spec.path, short_address(&self.wallet.address())),
        );

        let response = self.transport.send(request).await?;
        self.capture_cookie(&response);

        let result = interpret_response(&response);
        if let Err(e) = &result {
            logger::debug(
                LogTag::Api,
                &format!("{} {} failed: {}", spec.method, spec.path, e.cause()),
            );
        }
        result
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.platform.api_base_url.trim_end_matches('/'), path)
    }

    fn capture_cookie(&mut self, response: &HttpResponse) {
        if let Some(cookie) =
            extract_session_cookie(&response.set_cookies, &self.platform.session_cookie_name)
        {
            if self.session.cookie.as_deref() != Some(cookie.as_str()) {
                logger::verbose(LogTag::Session, "Session cookie refreshed");
            }
            self.session.cookie = Some(cookie);
        }
    }

    // =========================================================================
    // TYPED ACTIONS
    // =========================================================================

    pub async fn swap(
        &mut self,
        from_symbol: &str,
        to_symbol: &str,
        from_amount: &str,
        to_amount: &str,
    ) -> Result<Value, BotError> {
        let body = json!({
            "from_symbol": from_symbol,
            "to_symbol": to_symbol,
            "from_amount": from_amount,
            "to_amount": to_amount,
        });
        self.request(RequestSpec::post("/swap").json(body), true).await
    }

    pub async fn supply(&mut self, symbol: &str, amount: &str) -> Result<Value, BotError> {
        self.lending("/supply", symbol, amount).await
    }

    pub async fn withdraw(&mut self, symbol: &str, amount: &str) -> Result<Value, BotError> {
        self.lending("/withdraw", symbol, amount).await
    }

    pub async fn borrow(&mut self, symbol: &str, amount: &str) -> Result<Value, BotError> {
        self.lending("/borrow", symbol, amount).await
    }

    pub async fn repay(&mut self, symbol: &str, amount: &str) -> Result<Value, BotError> {
        self.lending("/repay", symbol, amount).await
    }

    async fn lending(&mut self, path: &str, symbol: &str, amount: &str) -> Result<Value, BotError> {
        let body = json!({ "symbol": symbol, "amount": amount });
        self.request(RequestSpec::post(path).json(body), true).await
    }

    /// Daily check-in
    pub async fn share(&mut self) -> Result<Value, BotError> {
        self.request(RequestSpec::post("/share"), true).await
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Token catalog (no session needed)
    pub async fn token_list(&mut self) -> Result<Vec<TokenDescriptor>, BotError> {
        let data = self.request(RequestSpec::get("/swap/token_list"), false).await?;
        decode_list(data)
    }

    pub async fn earn_info(&mut self) -> Result<EarnInfo, BotError> {
        let data = self.request(RequestSpec::get("/earn/info"), true).await?;
        decode_object(data)
    }

    pub async fn supplies(&mut self) -> Result<Vec<SuppliedAsset>, BotError> {
        let data = self.request(RequestSpec::get("/my/supply"), true).await?;
        decode_list(data)
    }

    pub async fn account_info(&mut self) -> Result<Value, BotError> {
        self.request(RequestSpec::get("/account/info"), true).await
    }

    pub async fn account_assets(&mut self) -> Result<Vec<AccountAsset>, BotError> {
        let data = self.request(RequestSpec::get("/account/assets"), true).await?;
        decode_list(data)
    }

    pub async fn market_borrow(&mut self) -> Result<Vec<BorrowPosition>, BotError> {
        let data = self.request(RequestSpec::get("/market/borrow"), true).await?;
        decode_list(data)
    }

    pub async fn my_borrow(&mut self) -> Result<Vec<BorrowPosition>, BotError> {
        let data = self.request(RequestSpec::get("/my/borrow"), true).await?;
        decode_list(data)
    }

    /// Server-issued nonce, if the endpoint returns one
    pub async fn sign_nonce(&mut self) -> Result<Option<String>, BotError> {
        let data = self.request(RequestSpec::get("/account/signnonce"), false).await?;
        Ok(data
            .get("signnonce")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()))
    }
}

/// `code` equal to `0` or `"0"`
fn has_success_code(body: &Value) -> bool {
    match body.get("code") {
        Some(Value::Number(n)) => n.as_i64() == Some(0) || n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.trim() == "0",
        _ => false,
    }
}

/// Success/failure rule shared by every platform call
pub fn interpret_response(response: &HttpResponse) -> Result<Value, BotError> {
    if let Some(body) = &response.body {
        if has_success_code(body) {
            return Ok(body.get("data").cloned().unwrap_or(Value::Null));
        }
    }

    if (200..300).contains(&response.status) {
        return Ok(response.body.clone().unwrap_or(Value::Null));
    }

    Err(BotError::http(response.status, failure_message(response)))
}

/// Best available description: platform message, raw text, status text, code
pub fn failure_message(response: &HttpResponse) -> String {
    if let Some(body) = &response.body {
        for key in ["message", "msg"] {
            if let Some(text) = body.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
        if let Some(text) = body.as_str() {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
    }

    match &response.status_text {
        Some(text) if !text.is_empty() => text.clone(),
        _ => response.status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{FakePlatform, TEST_KEY};
    use crate::wallet::LocalWallet;

    fn client_for(platform: &FakePlatform) -> SessionClient {
        let wallet = LocalWallet::from_private_key(TEST_KEY).unwrap().into_provider();
        SessionClient::connect(wallet, PlatformConfig::default(), platform, None).unwrap()
    }

    #[test]
    fn test_interpret_code_zero_returns_data() {
        let response = HttpResponse::json(200, json!({"code": 0, "data": {"x": 1}}));
        assert_eq!(interpret_response(&response).unwrap(), json!({"x": 1}));

        let response = HttpResponse::json(200, json!({"code": "0"}));
        assert_eq!(interpret_response(&response).unwrap(), Value::Null);
    }

    #[test]
    fn test_interpret_code_zero_wins_over_status() {
        let response = HttpResponse::json(500, json!({"code": 0, "data": [1]}));
        assert_eq!(interpret_response(&response).unwrap(), json!([1]));
    }

    #[test]
    fn test_interpret_2xx_returns_raw_body() {
        let body = json!({"code": 7, "message": "pending"});
        let response = HttpResponse::json(201, body.clone());
        assert_eq!(interpret_response(&response).unwrap(), body);
    }

    #[test]
    fn test_interpret_failure_message_preference() {
        let response = HttpResponse::json(400, json!({"code": 1, "message": "Insufficient balance"}));
        let err = interpret_response(&response).unwrap_err();
        assert_eq!(err, BotError::http(400, "Insufficient balance"));

        let response = HttpResponse::json(400, json!({"code": 1, "msg": "bad symbol"}));
        assert_eq!(interpret_response(&response).unwrap_err().cause(), "bad symbol");

        let response = HttpResponse {
            status: 502,
            ..Default::default()
        }
        .with_status_text("Bad Gateway");
        assert_eq!(interpret_response(&response).unwrap_err().cause(), "Bad Gateway");

        let response = HttpResponse {
            status: 599,
            ..Default::default()
        };
        assert_eq!(interpret_response(&response).unwrap_err().cause(), "599");
    }

    #[tokio::test]
    async fn test_cookie_lifecycle() {
        let platform = FakePlatform::permissive();
        let mut client = client_for(&platform);

        assert_eq!(client.cookie(), None);
        assert!(!client.is_authenticated());

        let info = client.login(Some("captcha-token")).await.unwrap();
        let cookie = client.cookie().map(|c| c.to_string()).unwrap();
        assert!(cookie.starts_with("gfsessionid="));
        assert_eq!(info.cookie.as_deref(), Some(cookie.as_str()));
        assert!(client.is_authenticated());

        // Permissive fake sets no cookie on ordinary calls
        client.supply("BSD", "0.00100000").await.unwrap();
        assert_eq!(client.cookie(), Some(cookie.as_str()));

        // Failed call without a cookie leaves the session alone
        platform.set_override("/withdraw", || {
            Ok(HttpResponse::json(400, json!({"code": 1, "message": "nope"})))
        });
        assert!(client.withdraw("BSD", "1").await.is_err());
        assert_eq!(client.cookie(), Some(cookie.as_str()));
    }

    #[tokio::test]
    async fn test_cookie_refreshed_from_any_response() {
        let platform = FakePlatform::permissive();
        let mut client = client_for(&platform);
        client.login(None).await.unwrap();

        platform.set_override("/borrow", || {
            Ok(HttpResponse::json(500, json!({"code": 1}))
                .with_cookie("gfsessionid=rotated; Path=/; HttpOnly"))
        });
        assert!(client.borrow("ETH", "0.001").await.is_err());
        assert_eq!(client.cookie(), Some("gfsessionid=rotated"));
        assert_eq!(client.session_id().as_deref(), Some("rotated"));
    }

    #[tokio::test]
    async fn test_login_request_shape() {
        let platform = FakePlatform::permissive();
        let mut client = client_for(&platform);
        client.login(Some("tok-123")).await.unwrap();

        let requests = platform.requests();
        let login = requests.last().unwrap();
        assert_eq!(login.path, "/account/signverify");
        assert_eq!(login.method, Method::POST);
        assert_eq!(login.header("Cf-Turnstile-Response"), Some("tok-123"));
        assert_eq!(login.header("Cookie"), Some("gfsessionid="));

        let RequestBody::Form(form) = &login.body else {
            panic!("signverify must be form encoded");
        };
        let field = |name: &str| {
            form.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(field("address"), client.address());
        assert_eq!(field("chainId"), "1");
        assert_eq!(field("nonce").len(), 8);
        assert!(field("signature").starts_with("0x"));
        assert_eq!(login.header("signature"), Some(field("signature").as_str()));
        assert!(field("issuedAt").ends_with('Z'));
    }

    #[tokio::test]
    async fn test_login_rejected_is_auth_error() {
        let platform = FakePlatform::permissive();
        platform.set_override("/account/signverify", || {
            Ok(HttpResponse::json(401, json!({"code": 1001, "message": "invalid signature"})))
        });
        let mut client = client_for(&platform);

        let err = client.login(None).await.unwrap_err();
        assert!(matches!(err, BotError::Auth(_)));
        assert!(err.cause().contains("invalid signature"));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_network_failure_is_auth_error() {
        let platform = FakePlatform::permissive();
        platform.set_override("/account/signverify", || {
            Err(BotError::transport("connection reset"))
        });
        let mut client = client_for(&platform);

        let err = client.login(None).await.unwrap_err();
        assert_eq!(err, BotError::auth("Login failed: connection reset"));
    }

    #[tokio::test]
    async fn test_login_http_200_without_code_is_success() {
        let platform = FakePlatform::permissive();
        platform.set_override("/account/signverify", || {
            Ok(HttpResponse::json(200, json!({"ok": true})).with_cookie("gfsessionid=s1"))
        });
        let mut client = client_for(&platform);
        let info = client.login(None).await.unwrap();
        assert_eq!(info.payload, json!({"ok": true}));
        assert_eq!(client.session_id().as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_server_nonce_is_used_when_enabled() {
        let platform = FakePlatform::permissive();
        platform.set_override("/account/signnonce", || {
            Ok(HttpResponse::json(200, json!({"code": 0, "data": {"signnonce": "srv-nonce-1"}})))
        });

        let wallet = LocalWallet::from_private_key(TEST_KEY).unwrap().into_provider();
        let config = PlatformConfig {
            use_server_nonce: true,
            ..PlatformConfig::default()
        };
        let mut client = SessionClient::connect(wallet, config, &platform, None).unwrap();
        client.login(None).await.unwrap();

        let requests = platform.requests();
        assert_eq!(requests[0].path, "/account/signnonce");
        let RequestBody::Form(form) = &requests[1].body else {
            panic!("expected form body");
        };
        assert!(form.contains(&("nonce".to_string(), "srv-nonce-1".to_string())));
    }

    #[tokio::test]
    async fn test_unauthenticated_request_sends_empty_marker() {
        let platform = FakePlatform::permissive();
        let mut client = client_for(&platform).with_cookie("abc");
        assert_eq!(client.cookie(), Some("gfsessionid=abc"));

        client.token_list().await.unwrap();
        client.earn_info().await.unwrap();

        let requests = platform.requests();
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].header("Cookie"), Some("gfsessionid="));
        assert_eq!(requests[1].header("Cookie"), Some("gfsessionid=abc"));
        assert!(requests[1].header("timestamp").is_some());
        assert!(requests[1].header("User-Agent").is_some());
        // Empty platform token is not sent
        assert_eq!(requests[1].header("token"), None);
    }

    #[tokio::test]
    async fn test_action_bodies() {
        let platform = FakePlatform::permissive();
        let mut client = client_for(&platform);

        client
            .swap("BSD", "ETH", "0.00120000", "0.00060000")
            .await
            .unwrap();
        client.repay("USDT", "0.00110000").await.unwrap();

        let requests = platform.requests();
        assert_eq!(requests[0].path, "/swap");
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(
            requests[0].body,
            RequestBody::Json(json!({
                "from_symbol": "BSD",
                "to_symbol": "ETH",
                "from_amount": "0.00120000",
                "to_amount": "0.00060000",
            }))
        );
        assert_eq!(requests[1].path, "/repay");
        assert_eq!(
            requests[1].body,
            RequestBody::Json(json!({"symbol": "USDT", "amount": "0.00110000"}))
        );
    }
}
