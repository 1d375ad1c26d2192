use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::config::Config;
use user_service::domain::authentication::service::AuthenticationService;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::create_router;
use user_service::outbound::events::ConfirmationConsumer;
use user_service::outbound::events::KafkaEventProducer;
use user_service::outbound::mailer::LoggingMailer;
use user_service::outbound::repositories::PostgresUserRepository;
use user_service::telemetry;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    telemetry::set_obfuscated_email_chars(config.logging.obfuscated_email_chars);

    tracing::info!(
        http_port = config.server.http_port,
        public_url = %config.server.public_url,
        jwt_algorithm = %config.jwt.algorithm,
        access_token_expire_minutes = config.jwt.access_token_expire_minutes,
        confirm_token_expire_minutes = config.jwt.confirm_token_expire_minutes,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        obfuscated_email_chars = config.logging.obfuscated_email_chars,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(config.jwt.authenticator()?);
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let event_producer = Arc::new(KafkaEventProducer::new(&config.kafka)?);

    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        event_producer,
        Arc::clone(&authenticator),
        config.server.public_url.clone(),
    ));
    let authentication_service = Arc::new(AuthenticationService::new(
        user_repository,
        authenticator,
    ));

    let confirmation_consumer =
        ConfirmationConsumer::new(&config.kafka, Arc::new(LoggingMailer::new()))?;
    let consumer_task = tokio::spawn(confirmation_consumer.start_consuming());

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, authentication_service);
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    match tokio::try_join!(http_server, consumer_task) {
        Ok((Ok(()), ())) => tracing::info!("Server exited successfully"),
        Ok((Err(e), ())) => tracing::error!(error = %e, "Http server error"),
        Err(e) => tracing::error!(error = %e, "Task join error"),
    };

    Ok(())
}
