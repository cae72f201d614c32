/// Cadence Server - media catalog HTTP service
use anyhow::Context;
use cadence_core::{CatalogStore, CreateUser, Role};
use cadence_server::{
    api,
    config::ServerConfig,
    services::{AuthService, FileStorage},
    state::AppState,
};
use cadence_storage::SqliteCatalog;
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence media catalog server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// listener, artist or admin
        #[arg(short, long, default_value = "listener")]
        role: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            serve(config).await?;
        }
        Commands::AddUser {
            username,
            email,
            password,
            role,
        } => {
            add_user(config, username, email, &password, &role).await?;
        }
        Commands::ListUsers => {
            list_users(config).await?;
        }
    }

    Ok(())
}

async fn open_catalog(config: &ServerConfig) -> anyhow::Result<SqliteCatalog> {
    let pool = cadence_storage::create_pool(&config.storage.database_url)
        .await
        .context("failed to open database")?;
    cadence_storage::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    Ok(SqliteCatalog::new(pool))
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    )
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db = Arc::new(open_catalog(&config).await?);
    tracing::info!("Database connected");

    let file_storage = FileStorage::new(
        config.storage.media_path.clone(),
        config.storage.public_media_url.clone(),
        config.storage.max_upload_bytes,
    );
    file_storage.initialize().await?;
    tracing::info!("Media storage at {:?}", file_storage.base_path());

    let app_state = AppState::new(
        db,
        Arc::new(auth_service(&config)),
        Arc::new(file_storage),
        config.storage.max_upload_bytes,
    );

    let mut app = api::router(app_state);

    // Serve uploads ourselves unless they live behind an external URL
    let media_url = config.storage.public_media_url.trim_end_matches('/');
    if media_url.starts_with('/') && media_url.len() > 1 {
        app = app.nest_service(media_url, ServeDir::new(&config.storage.media_path));
    }

    let app = app
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: ServerConfig,
    username: String,
    email: String,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let catalog = open_catalog(&config).await?;

    let password_hash = auth_service(&config).hash_password(password)?;

    let user = catalog
        .create_user(CreateUser {
            username,
            email,
            role,
            password_hash,
        })
        .await?;

    println!("Created {} '{}' with id {}", user.role, user.username, user.id);

    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let catalog = open_catalog(&config).await?;
    let users = catalog.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}> ({})", user.id, user.username, user.email, user.role);
    }

    Ok(())
}
