use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::MakeRequestUuid;
use tower_http::request_id::PropagateRequestIdLayer;
use tower_http::request_id::SetRequestIdLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::confirm_email::confirm_email;
use super::handlers::get_current_user::get_current_user;
use super::handlers::login::login;
use super::handlers::register_user::register_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::authentication::ports::AuthenticationPort;
use crate::domain::user::ports::UserServicePort;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authentication_service: Arc<dyn AuthenticationPort>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authentication_service: Arc<dyn AuthenticationPort>,
) -> Router {
    let state = AppState {
        user_service,
        authentication_service,
    };

    let public_routes = Router::new()
        .route("/register", post(register_user))
        .route("/token", post(login))
        .route("/confirm/:token", get(confirm_email));

    let protected_routes = Router::new()
        .route("/users/me", get(get_current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();

            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    // Layers run outermost-last: the id is set before tracing sees the request.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace_layer)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::http::header;
    use axum::http::StatusCode;
    use mockall::mock;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::models::AccessToken;
    use crate::domain::user::models::Credential;
    use crate::domain::user::models::RegisterUserCommand;
    use crate::domain::user::models::User;
    use crate::user::errors::UserError;

    mock! {
        pub TestUserService {}

        #[async_trait]
        impl UserServicePort for TestUserService {
            async fn register_user(&self, command: RegisterUserCommand) -> Result<User, UserError>;
            async fn confirm_email(&self, token: &str) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestAuthenticationService {}

        #[async_trait]
        impl AuthenticationPort for TestAuthenticationService {
            async fn authenticate_by_password(&self, credential: &Credential) -> Result<User, UserError>;
            async fn resolve_principal_from_token(&self, token: &str) -> Result<User, UserError>;
            async fn login(&self, credential: &Credential) -> Result<AccessToken, UserError>;
        }
    }

    #[tokio::test]
    async fn test_protected_route_requires_bearer_token() {
        let mut authentication_service = MockTestAuthenticationService::new();
        authentication_service
            .expect_resolve_principal_from_token()
            .times(0);

        let router = create_router(
            Arc::new(MockTestUserService::new()),
            Arc::new(authentication_service),
        );

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_middleware_passes_raw_token_to_core() {
        let mut authentication_service = MockTestAuthenticationService::new();
        authentication_service
            .expect_resolve_principal_from_token()
            .withf(|token| token == "abc.def.ghi")
            .times(1)
            .returning(|_| {
                Err(UserError::Auth(auth::AuthError::InvalidSignature))
            });

        let router = create_router(
            Arc::new(MockTestUserService::new()),
            Arc::new(authentication_service),
        );

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/users/me")
                    .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
