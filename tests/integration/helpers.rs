//! Shared test helpers for integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use tower::ServiceExt;

use fleetdesk_api::state::AppState;
use fleetdesk_auth::password::PasswordHasher;
use fleetdesk_cache::provider::CacheManager;
use fleetdesk_core::config::{AppConfig, DatabaseConfig};
use fleetdesk_core::result::AppResult;
use fleetdesk_core::traits::directory::AccountDirectory;
use fleetdesk_entity::account::{Account, AccountStatus, SessionPointer};
use fleetdesk_entity::role::Role;

/// Fixed account IDs seeded into every test app.
pub const ADMIN_ID: i64 = 1;
pub const DISPATCHER_ID: i64 = 2;
pub const INACTIVE_ID: i64 = 3;
pub const DRIVER_ID: i64 = 9;

pub const ADMIN_PASSWORD: &str = "admin-pass-123";
pub const DISPATCHER_PASSWORD: &str = "correct-horse";

/// In-memory stand-in for the PostgreSQL account repository.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    accounts: Mutex<HashMap<i64, Account>>,
    account_roles: Mutex<HashMap<i64, Vec<Role>>>,
    role_grants: Mutex<HashMap<i64, Vec<String>>>,
}

impl InMemoryDirectory {
    pub fn insert_account(&self, account: Account) {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account);
    }

    pub fn assign_roles(&self, account_id: i64, roles: Vec<Role>) {
        self.account_roles
            .lock()
            .unwrap()
            .insert(account_id, roles);
    }

    pub fn grant(&self, role_id: i64, codes: Vec<String>) {
        self.role_grants.lock().unwrap().insert(role_id, codes);
    }

    pub fn remove_account(&self, account_id: i64) {
        self.accounts.lock().unwrap().remove(&account_id);
    }

    pub fn stored_session(&self, account_id: i64) -> Option<SessionPointer> {
        self.accounts
            .lock()
            .unwrap()
            .get(&account_id)
            .and_then(|a| a.session_pointer())
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_id(&self, account_id: i64) -> AppResult<Option<Account>> {
        Ok(self.accounts.lock().unwrap().get(&account_id).cloned())
    }

    async fn roles_for_account(&self, account_id: i64) -> AppResult<Vec<Role>> {
        Ok(self
            .account_roles
            .lock()
            .unwrap()
            .get(&account_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn permission_codes_for_roles(&self, role_ids: &[i64]) -> AppResult<Vec<String>> {
        let grants = self.role_grants.lock().unwrap();
        let mut codes: Vec<String> = role_ids
            .iter()
            .flat_map(|id| grants.get(id).cloned().unwrap_or_default())
            .collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    async fn session_pointer(&self, account_id: i64) -> AppResult<Option<SessionPointer>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(&account_id)
            .and_then(|a| a.session_pointer()))
    }

    async fn persist_session_pointer(
        &self,
        account_id: i64,
        origin: &str,
        token: &str,
    ) -> AppResult<()> {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&account_id) {
            account.session_origin = Some(origin.to_string());
            account.session_token = Some(token.to_string());
        }
        Ok(())
    }

    async fn clear_session_pointer(&self, account_id: i64) -> AppResult<()> {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&account_id) {
            account.session_origin = None;
            account.session_token = None;
        }
        Ok(())
    }

    async fn touch_last_login(&self, account_id: i64, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&account_id) {
            account.last_login_at = Some(at);
        }
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: Arc<AppConfig>,
    /// Account fixture store
    pub directory: Arc<InMemoryDirectory>,
}

impl TestApp {
    /// Create a new test application with seeded accounts.
    ///
    /// Seeds: an admin, a dispatcher with customer/receipt grants, an
    /// inactive account, and a driver account for the signed surface.
    pub async fn new() -> Self {
        let config = Arc::new(test_config());

        let cache = Arc::new(
            CacheManager::new(&config.cache)
                .await
                .expect("Failed to init cache"),
        );

        let directory = Arc::new(InMemoryDirectory::default());
        seed_accounts(&directory);

        let state = AppState::build(
            Arc::clone(&config),
            None,
            cache,
            directory.clone() as Arc<dyn AccountDirectory>,
        );
        let router = fleetdesk_api::router::build_router(state);

        Self {
            router,
            config,
            directory,
        }
    }

    /// Login from the given origin and return the full response.
    pub async fn login_from(&self, username: &str, password: &str, origin: &str) -> TestResponse {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });

        self.request(
            "POST",
            "/api/auth/login",
            Some(body),
            &[("x-forwarded-for", origin)],
        )
        .await
    }

    /// Login and return the access token, asserting success.
    pub async fn login_ok(&self, username: &str, password: &str, origin: &str) -> String {
        let response = self.login_from(username, password, origin).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.body["data"]["access_token"]
            .as_str()
            .expect("No access_token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Make an authenticated request with a bearer token.
    pub async fn request_with_token(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: &str,
    ) -> TestResponse {
        let auth = format!("Bearer {token}");
        self.request(method, path, body, &[("authorization", auth.as_str())])
            .await
    }

    /// GET a signed driver endpoint, carrying all parameters in the
    /// query string the way the mobile client does.
    pub async fn signed_get(&self, path: &str, params: BTreeMap<String, String>) -> TestResponse {
        let signed = self.with_signature(params);
        let query: Vec<String> = signed.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let uri = format!("{path}?{}", query.join("&"));
        self.request("GET", &uri, None, &[]).await
    }

    /// POST a signed driver endpoint with all parameters in the body.
    pub async fn signed_post(&self, path: &str, params: BTreeMap<String, String>) -> TestResponse {
        let signed = self.with_signature(params);
        let body = serde_json::to_value(&signed).expect("Failed to build body");
        self.request("POST", path, Some(body), &[]).await
    }

    /// Base parameter set for a signed request from the driver fixture.
    pub fn driver_params(&self, nonce: &str) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("account_id".to_string(), DRIVER_ID.to_string());
        params.insert(
            "timestamp".to_string(),
            Utc::now().timestamp().to_string(),
        );
        params.insert("nonce".to_string(), nonce.to_string());
        params
    }

    /// Sign a parameter set with an independently computed client-side
    /// signature.
    pub fn with_signature(&self, mut params: BTreeMap<String, String>) -> BTreeMap<String, String> {
        let account_id: i64 = params
            .get("account_id")
            .and_then(|s| s.parse().ok())
            .expect("account_id required to sign");
        let signature = client_sign(&self.config.signature.base_secret, account_id, &params);
        params.insert("signature".to_string(), signature);
        params
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Computes the signature exactly as the mobile client does: derive the
/// per-account key from the base secret, canonicalize the sorted
/// parameters, and HMAC the result.
pub fn client_sign(
    base_secret: &str,
    account_id: i64,
    params: &BTreeMap<String, String>,
) -> String {
    let derived_key = {
        let mut mac = Hmac::<Sha256>::new_from_slice(base_secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(format!("user_{account_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    };

    let canonical: Vec<String> = params
        .iter()
        .filter(|(k, _)| k.as_str() != "signature")
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    let canonical = canonical.join("&");

    let mut mac = Hmac::<Sha256>::new_from_slice(derived_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(canonical.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn test_config() -> AppConfig {
    AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        cache: Default::default(),
        auth: fleetdesk_core::config::auth::AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            access_ttl_minutes: 120,
            refresh_ttl_hours: 168,
        },
        signature: fleetdesk_core::config::signature::SignatureConfig {
            base_secret: "integration-test-base-secret".to_string(),
            validity_window_seconds: 300,
            nonce_min_length: 8,
            sweep_interval_minutes: 10,
        },
        worker: Default::default(),
        logging: Default::default(),
    }
}

fn seed_accounts(directory: &InMemoryDirectory) {
    let hasher = PasswordHasher::new();
    let now = Utc::now();

    let admin_role = Role {
        id: 1,
        code: "admin".to_string(),
        name: "Administrator".to_string(),
        protected: true,
    };
    let dispatcher_role = Role {
        id: 2,
        code: "dispatcher".to_string(),
        name: "Dispatcher".to_string(),
        protected: false,
    };

    directory.insert_account(Account {
        id: ADMIN_ID,
        username: "root".to_string(),
        password_hash: hasher.hash_password(ADMIN_PASSWORD).unwrap(),
        display_name: Some("Root Admin".to_string()),
        status: AccountStatus::Active,
        session_origin: None,
        session_token: None,
        created_at: now,
        last_login_at: None,
    });
    directory.assign_roles(ADMIN_ID, vec![admin_role]);

    directory.insert_account(Account {
        id: DISPATCHER_ID,
        username: "alice".to_string(),
        password_hash: hasher.hash_password(DISPATCHER_PASSWORD).unwrap(),
        display_name: Some("Alice".to_string()),
        status: AccountStatus::Active,
        session_origin: None,
        session_token: None,
        created_at: now,
        last_login_at: None,
    });
    directory.assign_roles(DISPATCHER_ID, vec![dispatcher_role]);
    directory.grant(
        2,
        vec![
            "menu.customer".to_string(),
            "btn.customer.create".to_string(),
            "menu.receipt".to_string(),
        ],
    );

    directory.insert_account(Account {
        id: INACTIVE_ID,
        username: "bob".to_string(),
        password_hash: hasher.hash_password("bob-password").unwrap(),
        display_name: None,
        status: AccountStatus::Inactive,
        session_origin: None,
        session_token: None,
        created_at: now,
        last_login_at: None,
    });

    directory.insert_account(Account {
        id: DRIVER_ID,
        username: "dax".to_string(),
        password_hash: hasher.hash_password("driver-password").unwrap(),
        display_name: Some("Dax".to_string()),
        status: AccountStatus::Active,
        session_origin: None,
        session_token: None,
        created_at: now,
        last_login_at: None,
    });
}
