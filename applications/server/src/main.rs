/// Vibe Tuner - emotion-driven music recommendation server
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vibe_server::{
    api,
    config::ServerConfig,
    services::{
        auth::{validate_email, validate_password},
        AuthService, CatalogCredentials, HttpEmotionClassifier, SpotifyCatalog,
    },
    state::AppState,
};

#[derive(Parser)]
#[command(name = "vibe-server")]
#[command(about = "Vibe Tuner emotion-driven music recommendation server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "VIBE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Map an emotion to a curated catalog collection
    SetCollection {
        /// Emotion label (e.g. happy)
        #[arg(long)]
        emotion: String,
        /// Catalog collection (playlist) id
        #[arg(long)]
        collection_id: String,
        /// Display name of the collection
        #[arg(long)]
        name: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// List curated collection mappings
    ListCollections,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibe_server=info,vibe_storage=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser { email, password } => {
            add_user(&config, &email, &password).await?;
        }
        Commands::ListUsers => {
            list_users(&config).await?;
        }
        Commands::SetCollection {
            emotion,
            collection_id,
            name,
            description,
        } => {
            set_collection(&config, &emotion, &collection_id, &name, description.as_deref())
                .await?;
        }
        Commands::ListCollections => {
            list_collections(&config).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Vibe Tuner server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = connect(&config).await?;
    tracing::info!("Database connected");

    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_days,
        config.auth.bcrypt_cost,
    ));

    let classifier = HttpEmotionClassifier::new(
        &config.classifier.base_url,
        config.classifier.timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to build classifier client")?;
    tracing::info!("Classifier: {}", config.classifier.base_url);

    let catalog = SpotifyCatalog::new(
        CatalogCredentials {
            client_id: config.catalog.client_id.clone(),
            client_secret: config.catalog.client_secret.clone(),
        },
        &config.catalog.api_base_url,
        &config.catalog.auth_url,
        config.catalog.timeout_secs.map(Duration::from_secs),
    )
    .context("Failed to build catalog client")?;

    let app_state = AppState::new(
        pool,
        auth_service,
        Arc::new(classifier),
        Arc::new(catalog),
        config.catalog.tracks_per_recommendation,
    );

    let app = api::create_router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect(config: &ServerConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = vibe_storage::create_pool(&config.storage.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.storage.database_url))?;
    vibe_storage::run_migrations(&pool).await?;
    Ok(pool)
}

async fn add_user(config: &ServerConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let email = validate_email(email)?;
    validate_password(password)?;

    let pool = connect(config).await?;
    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_days,
        config.auth.bcrypt_cost,
    );

    let password_hash = auth_service.hash_password(password)?;
    let user = vibe_storage::users::create(&pool, &email, &password_hash).await?;

    println!("Created user {} ({})", user.email, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let users = vibe_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} (since {})", user.id, user.email, user.created_at);
    }

    Ok(())
}

async fn set_collection(
    config: &ServerConfig,
    emotion: &str,
    collection_id: &str,
    name: &str,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let collection =
        vibe_storage::collections::upsert(&pool, emotion, collection_id, name, description)
            .await?;

    println!(
        "{} -> {} ({})",
        collection.emotion, collection.collection_id, collection.name
    );

    Ok(())
}

async fn list_collections(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let collections = vibe_storage::collections::get_all(&pool).await?;

    println!("Curated collections:");
    for collection in collections {
        println!(
            "  {:<10} {} ({})",
            collection.emotion, collection.collection_id, collection.name
        );
    }

    Ok(())
}
