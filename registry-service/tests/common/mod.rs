use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenKind;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use registry_service::domain::identity::errors::IdentityError;
use registry_service::domain::identity::models::EmailAddress;
use registry_service::domain::identity::models::Identity;
use registry_service::domain::identity::models::IdentityId;
use registry_service::domain::identity::models::NewIdentity;
use registry_service::domain::identity::models::PersonName;
use registry_service::domain::identity::models::Role;
use registry_service::domain::identity::ports::IdentityRepository;
use registry_service::domain::identity::service::IdentityService;
use registry_service::domain::session::models::IdentityClaims;
use registry_service::domain::session::service::SessionService;
use registry_service::inbound::http::cookies::RefreshCookie;
use registry_service::inbound::http::router::create_router;

pub const PASSWORD: &str = "Secret123!";
pub const COOKIE_NAME: &str = "refreshToken";

/// Identity store kept in memory for the lifetime of one test.
#[derive(Default)]
pub struct InMemoryIdentityRepository {
    identities: Mutex<Vec<Identity>>,
}

impl InMemoryIdentityRepository {
    fn insert(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        let mut identities = self.identities.lock().unwrap();

        if identities.iter().any(|i| i.email == identity.email) {
            return Err(IdentityError::EmailAlreadyExists(
                identity.email.as_str().to_string(),
            ));
        }

        let id = IdentityId(identities.iter().map(|i| i.id.0).max().unwrap_or(0) + 1);
        let identity = identity.with_id(id);
        identities.push(identity.clone());

        Ok(identity)
    }

    pub fn set_role(&self, id: IdentityId, role: Option<Role>) {
        let mut identities = self.identities.lock().unwrap();
        if let Some(identity) = identities.iter_mut().find(|i| i.id == id) {
            identity.role = role;
        }
    }

    pub fn remove(&self, id: IdentityId) {
        self.identities.lock().unwrap().retain(|i| i.id != id);
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| &i.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityError> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn create(&self, identity: NewIdentity) -> Result<Identity, IdentityError> {
        self.insert(identity)
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryIdentityRepository>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(
            Authenticator::new(
                b"test-access-secret-for-jwt-signing-32-bytes",
                Duration::minutes(15),
                b"test-refresh-secret-for-jwt-signing-32-bytes",
                Duration::days(7),
            )
            .expect("Failed to create authenticator"),
        );
        let repository = Arc::new(InMemoryIdentityRepository::default());

        let session_service = Arc::new(SessionService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));
        let identity_service = Arc::new(IdentityService::new(Arc::clone(&repository)));
        let refresh_cookie = Arc::new(RefreshCookie::new(
            COOKIE_NAME,
            false,
            Arc::clone(&authenticator),
        ));

        let router = create_router(
            session_service,
            identity_service,
            Arc::clone(&authenticator),
            refresh_cookie,
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            authenticator,
        }
    }

    /// Store an identity with the shared test password.
    pub fn seed(&self, email: &str, role: Option<Role>) -> Identity {
        let identity = self
            .repository
            .insert(NewIdentity {
                name: PersonName::new("Ana".to_string()).unwrap(),
                surname: PersonName::new("Popescu".to_string()).unwrap(),
                email: EmailAddress::new(email.to_string()).unwrap(),
                password_hash: PasswordHasher::new().hash(PASSWORD).unwrap(),
                role: Role::Admin,
            })
            .expect("Failed to seed identity");

        self.repository.set_role(identity.id, role);

        Identity { role, ..identity }
    }

    /// Access token for `identity`, signed the way the service signs it.
    pub fn access_token_for(&self, identity: &Identity) -> String {
        self.authenticator
            .issue_tokens(&IdentityClaims::from(identity))
            .unwrap()
            .access_token
    }

    /// Token of the given class issued at `issued_at`.
    pub fn token_issued_at(
        &self,
        kind: TokenKind,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> String {
        self.authenticator
            .handler(kind)
            .sign_at(&IdentityClaims::from(identity), issued_at)
            .unwrap()
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// POST carrying the refresh cookie the way a browser would.
    pub fn post_with_cookie(&self, path: &str, value: &str) -> reqwest::RequestBuilder {
        self.post(path)
            .header(reqwest::header::COOKIE, format!("{}={}", COOKIE_NAME, value))
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// Value of the refresh cookie set by a response, if any.
pub fn refresh_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .cookies()
        .find(|cookie| cookie.name() == COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}
