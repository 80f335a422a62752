//! Operator CLI: schema migrations and default content.
//!
//! ```text
//! catalog-admin migrate up|down|status
//! catalog-admin seed
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use catalog_api::{
    config::{self, AppConfig},
    db,
    entities::merchandising::{carousel, Carousel, LinkLocation},
    migrator::Migrator,
    services::{
        catalog::{configuration::ConfigurationDraft, ConfigurationService},
        merchandising::{
            carousels::CarouselDraft, navigation::NavigationLinkDraft, CarouselService,
            NavigationLinkService,
        },
    },
};
use clap::{Parser, Subcommand};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "catalog-admin", version, about = "Catalog API maintenance commands")]
struct Cli {
    /// Override the configured database URL
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Schema migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Insert default settings, the main carousel and header links when missing
    Seed,
}

#[derive(Debug, Subcommand)]
enum MigrateAction {
    /// Apply every pending migration
    Up,
    /// Roll back the most recent migration
    Down {
        /// Number of migrations to roll back
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
}

const DEFAULT_SETTINGS: [(&str, &str, &str); 4] = [
    ("nombre_tienda", "Mi Tienda", "Nombre visible de la tienda"),
    ("moneda", "PEN", "Código ISO de la moneda de los precios"),
    ("email_contacto", "contacto@mitienda.com", "Correo de contacto mostrado en el sitio"),
    ("articulos_por_pagina", "12", "Artículos por página en el listado de la tienda"),
];

const HEADER_LINKS: [(&str, &str); 4] = [
    ("Inicio", "/"),
    ("Productos", "/productos"),
    ("Ofertas", "/ofertas"),
    ("Contacto", "/contacto"),
];

const MAIN_CAROUSEL: &str = "principal";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    let db = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Migrate { action } => migrate(&db, action).await?,
        Commands::Seed => seed(Arc::new(db), &cfg).await?,
    }
    Ok(())
}

async fn migrate(db: &DatabaseConnection, action: MigrateAction) -> Result<()> {
    match action {
        MigrateAction::Up => {
            db::run_migrations(db).await?;
        }
        MigrateAction::Down { steps } => {
            Migrator::down(db, Some(steps))
                .await
                .context("rollback failed")?;
            info!(steps, "Rolled back migrations");
        }
        MigrateAction::Status => {
            let applied = Migrator::get_applied_migrations(db).await?;
            let pending = Migrator::get_pending_migrations(db).await?;
            for migration in &applied {
                println!("applied  {}", migration.name());
            }
            for migration in &pending {
                println!("pending  {}", migration.name());
            }
        }
    }
    Ok(())
}

async fn seed(db: Arc<DatabaseConnection>, cfg: &AppConfig) -> Result<()> {
    if cfg.auto_migrate {
        db::run_migrations(&db).await?;
    }

    let settings = ConfigurationService::new(db.clone());
    let mut created = 0;
    for (key, value, description) in DEFAULT_SETTINGS {
        if settings
            .ensure(ConfigurationDraft::new(key, value, Some(description)))
            .await?
        {
            created += 1;
        }
    }
    info!(created, "Default settings ensured");

    let existing = Carousel::find()
        .filter(carousel::Column::Name.eq(MAIN_CAROUSEL))
        .one(&*db)
        .await?;
    if existing.is_none() {
        CarouselService::new(db.clone())
            .create(CarouselDraft {
                name: MAIN_CAROUSEL.to_string(),
                is_active: true,
            })
            .await?;
        info!(name = MAIN_CAROUSEL, "Created carousel");
    }

    let links = NavigationLinkService::new(db);
    let mut created = 0;
    for (order, (label, url)) in (0..).zip(HEADER_LINKS) {
        if links
            .ensure(NavigationLinkDraft::new(label, url, LinkLocation::Header, order))
            .await?
        {
            created += 1;
        }
    }
    info!(created, "Header links ensured");

    println!("seed complete");
    Ok(())
}
