//! Tradepost Server: application entry point.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use tradepost_auth::config::AuthConfig;
use tradepost_auth::service::AuthService;
use tradepost_core::error::TradepostError;
use tradepost_core::models::identity::{CreateIdentity, GlobalRole};
use tradepost_store::identity::MemoryIdentityRepository;
use tradepost_store::membership::MemoryMembershipRepository;

type Service = AuthService<MemoryIdentityRepository, MemoryMembershipRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradepost=info")),
        )
        .json()
        .init();

    tracing::info!("Starting Tradepost server...");

    let config = AuthConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(issuer = %config.token_issuer, "Configuration loaded");

    let service = AuthService::new(
        MemoryIdentityRepository::new(),
        MemoryMembershipRepository::new(),
        config,
    );

    seed_root_account(&service).await?;

    // TODO: Start REST API server

    tracing::info!("Tradepost server stopped.");
    Ok(())
}

/// Create the initial super-admin when `TRADEPOST_ROOT_PASSWORD` is
/// set. Safe to run on every start.
async fn seed_root_account(service: &Service) -> Result<()> {
    let Ok(password) = std::env::var("TRADEPOST_ROOT_PASSWORD") else {
        tracing::warn!("TRADEPOST_ROOT_PASSWORD not set, skipping root account seeding");
        return Ok(());
    };

    match service
        .create_account(CreateIdentity {
            username: "superadmin".into(),
            email: "superadmin@tradepost.local".into(),
            role: GlobalRole::SuperAdmin,
            display_name: "Super Admin".into(),
            password,
        })
        .await
    {
        Ok(identity) => {
            tracing::info!(identity_id = %identity.id, "Root account seeded");
            Ok(())
        }
        Err(TradepostError::AlreadyExists { .. }) => {
            tracing::info!("Root account already present");
            Ok(())
        }
        Err(err) => Err(err).context("Failed to seed root account"),
    }
}
