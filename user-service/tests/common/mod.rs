use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use auth::TokenPolicy;
use user_service::domain::authentication::service::AuthenticationService;
use user_service::domain::user::events::ConfirmationRequestedEvent;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::domain::user::ports::EventPublisher;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::create_router;
use user_service::user::errors::EventPublisherError;
use user_service::user::errors::UserError;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// User store kept in memory, keyed by email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn remove(&self, email: &str) {
        self.users.lock().unwrap().remove(email);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<UserId, UserError> {
        let mut users = self.users.lock().unwrap();
        let email = user.email.as_str().to_string();
        if users.contains_key(&email) {
            return Err(UserError::EmailAlreadyRegistered(email));
        }
        let id = user.id;
        users.insert(email, user);
        Ok(id)
    }

    async fn set_confirmed(&self, email: &str) -> Result<(), UserError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.confirmed = true;
        }
        Ok(())
    }
}

/// Publisher that keeps every confirmation request it is given.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<ConfirmationRequestedEvent>>,
}

impl RecordingEventPublisher {
    pub fn confirmation_token_for(&self, email: &str) -> Option<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|event| event.email == email)
            .and_then(|event| event.confirmation_url.rsplit('/').next().map(String::from))
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish_confirmation_requested(
        &self,
        event: &ConfirmationRequestedEvent,
    ) -> Result<(), EventPublisherError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub publisher: Arc<RecordingEventPublisher>,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(TokenPolicy::default()).await
    }

    /// Spawn with custom token lifetimes, e.g. negative ones to force expiry.
    pub async fn spawn_with_policy(policy: TokenPolicy) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let publisher = Arc::new(RecordingEventPublisher::default());
        let authenticator = Arc::new(Authenticator::new(JwtHandler::hs256(TEST_SECRET), policy));

        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            Arc::clone(&publisher),
            Arc::clone(&authenticator),
            address.clone(),
        ));
        let authentication_service = Arc::new(AuthenticationService::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(user_service, authentication_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            publisher,
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/register")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/token")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn confirm(&self, token: &str) -> reqwest::Response {
        self.get(&format!("/confirm/{}", token))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register, follow the emailed confirmation link and log in.
    pub async fn registered_access_token(&self, email: &str, password: &str) -> String {
        self.register(email, password).await;
        let token = self
            .publisher
            .confirmation_token_for(email)
            .expect("No confirmation request published");
        self.confirm(&token).await;

        let body: serde_json::Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("No access token in response")
            .to_string()
    }
}
