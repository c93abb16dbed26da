//! Operator CLI for PlankPort
//!
//! Every command prints a single JSON document so scripts can parse it.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plankport_core::config::Config;
use plankport_core::domains::auth::activities::sign_up;
use plankport_core::domains::auth::data::{SignUpAgency, SignUpInput};
use plankport_core::domains::auth::JwtService;
use plankport_core::domains::billing::data::ProductData;
use plankport_core::domains::billing::PRODUCTS;
use plankport_core::kernel::{LocalObjectStore, LoggingMagicLinkSender, ServerDeps};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "plankport_admin")]
#[command(about = "PlankPort operator commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Create an agency together with its owner account
    CreateAgency {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        slug: Option<String>,
    },

    /// Print the plan catalog
    Catalog,
}

#[derive(Serialize)]
struct Response<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

#[derive(Serialize)]
struct CreatedAgency {
    agency_id: String,
    slug: String,
    owner_id: String,
    token: String,
}

fn output<T: Serialize>(resp: Response<T>) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string(&resp).context("Failed to serialize response")?
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => cmd_migrate().await,
        Commands::CreateAgency {
            name,
            email,
            password,
            full_name,
            slug,
        } => cmd_create_agency(name, email, password, full_name, slug).await,
        Commands::Catalog => cmd_catalog(),
    };

    if let Err(e) = &result {
        output::<()>(Response {
            success: false,
            message: Some(format!("{:#}", e)),
            data: None,
        })?;
    }
    result
}

async fn get_pool(config: &Config) -> Result<PgPool> {
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_migrate() -> Result<()> {
    let config = Config::from_env()?;
    let pool = get_pool(&config).await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    output::<()>(Response {
        success: true,
        message: Some("Migrations applied".to_string()),
        data: None,
    })
}

async fn cmd_create_agency(
    name: String,
    email: String,
    password: String,
    full_name: String,
    slug: Option<String>,
) -> Result<()> {
    let config = Config::from_env()?;
    let pool = get_pool(&config).await?;

    let deps = ServerDeps::new(
        pool,
        Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())),
        Arc::new(LocalObjectStore::new(
            config.storage_root.clone(),
            config.storage_public_url.clone(),
        )),
        None,
        Arc::new(LoggingMagicLinkSender),
        config.app_base_url.clone(),
        config.auth_profile_timeout,
    );

    let session = sign_up(
        SignUpInput {
            email,
            password,
            full_name,
            phone: None,
            agency: SignUpAgency {
                name,
                slug,
                website: None,
                phone: None,
                billing_address: None,
                billing_city: None,
                billing_zip: None,
                billing_country: None,
            },
        },
        &deps,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create agency: {}", e))?;

    output(Response {
        success: true,
        message: None,
        data: Some(CreatedAgency {
            agency_id: session.agency.id,
            slug: session.agency.slug,
            owner_id: session.user.id,
            token: session.token,
        }),
    })
}

fn cmd_catalog() -> Result<()> {
    let products: Vec<ProductData> = PRODUCTS.iter().map(ProductData::from).collect();
    output(Response {
        success: true,
        message: None,
        data: Some(products),
    })
}
