//! CLI administration tool for openfoodweb.
//!
//! Seeds and inspects the catalog directly in PostgreSQL, without going
//! through the HTTP admin routes.
//!
//! # Usage
//!
//! ```bash
//! # Create a supplier and a distributor
//! cargo run --bin admin -- supplier create --name "Hillside Farm"
//! cargo run --bin admin -- distributor create --name "Green Hub" --pickup "12 Market St"
//!
//! # Create a product carried by distributors 1 and 2
//! cargo run --bin admin -- product create --name "Carrots" --supplier 1 -d 1 -d 2
//!
//! # List what is there
//! cargo run --bin admin -- distributor list
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use openfoodweb::application::services::{
    DistributorService, EnterpriseService, ProductService, SupplierService,
};
use openfoodweb::domain::entities::{NewDistributor, NewEnterprise, NewProduct};
use openfoodweb::infrastructure::persistence::{
    PgDistributorRepository, PgEnterpriseRepository, PgProductRepository, PgSupplierRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing openfoodweb.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage suppliers
    Supplier {
        #[command(subcommand)]
        action: SupplierAction,
    },

    /// Manage distributors
    Distributor {
        #[command(subcommand)]
        action: DistributorAction,
    },

    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Manage enterprises
    Enterprise {
        #[command(subcommand)]
        action: EnterpriseAction,
    },

    /// Show catalog and cart counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SupplierAction {
    /// Create a supplier
    Create {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List suppliers
    List,
}

#[derive(Subcommand)]
enum DistributorAction {
    /// Create a distributor
    Create {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Pickup address shown to shoppers
        #[arg(short, long)]
        pickup: Option<String>,
    },
    /// List distributors, including inactive ones
    List,
    /// Mark distributors inactive
    Deactivate {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Mark distributors active
    Activate {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        supplier: Option<i64>,
        /// Distributor carrying the product (repeatable)
        #[arg(short, long = "distributor")]
        distributors: Vec<i64>,
    },
    /// List products, optionally for one distributor
    List {
        #[arg(short, long)]
        distributor: Option<i64>,
    },
}

#[derive(Subcommand)]
enum EnterpriseAction {
    /// Create an enterprise
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        producer: bool,
        #[arg(long)]
        distributor: bool,
    },
    /// List enterprises
    List,
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Supplier { action } => handle_supplier_action(action, &pool).await?,
        Commands::Distributor { action } => handle_distributor_action(action, &pool).await?,
        Commands::Product { action } => handle_product_action(action, &pool).await?,
        Commands::Enterprise { action } => handle_enterprise_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn prompt_name(name: Option<String>, what: &str) -> Result<String> {
    match name {
        Some(n) => Ok(n),
        None => Ok(Input::new()
            .with_prompt(format!("{what} name"))
            .interact_text()?),
    }
}

async fn handle_supplier_action(action: SupplierAction, pool: &PgPool) -> Result<()> {
    let service = SupplierService::new(Arc::new(PgSupplierRepository::new(Arc::new(
        pool.clone(),
    ))));

    match action {
        SupplierAction::Create { name, email } => {
            let name = prompt_name(name, "Supplier")?;
            let supplier = service
                .create_supplier(name, None, email)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create supplier: {}", e))?;

            println!(
                "{} {} (id {})",
                "✅ Supplier created:".green().bold(),
                supplier.name.cyan(),
                supplier.id
            );
        }
        SupplierAction::List => {
            let suppliers = service
                .list_suppliers()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list suppliers: {}", e))?;

            println!("{}", "📋 Suppliers".bright_blue().bold());
            println!();
            for s in &suppliers {
                println!(
                    "  {:<5} {:<40} {}",
                    s.id.to_string().bright_black(),
                    s.name.cyan(),
                    s.email.as_deref().unwrap_or("-").bright_black()
                );
            }
            println!();
            println!("  Total: {}", suppliers.len().to_string().bright_white().bold());
        }
    }

    Ok(())
}

async fn handle_distributor_action(action: DistributorAction, pool: &PgPool) -> Result<()> {
    let service = DistributorService::new(Arc::new(PgDistributorRepository::new(Arc::new(
        pool.clone(),
    ))));

    match action {
        DistributorAction::Create {
            name,
            email,
            pickup,
        } => {
            let name = prompt_name(name, "Distributor")?;
            let distributor = service
                .create_distributor(NewDistributor {
                    name,
                    description: None,
                    email,
                    pickup_address: pickup,
                })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create distributor: {}", e))?;

            println!(
                "{} {} (id {})",
                "✅ Distributor created:".green().bold(),
                distributor.name.cyan(),
                distributor.id
            );
        }
        DistributorAction::List => {
            let distributors = service
                .list_distributors(false)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list distributors: {}", e))?;

            println!("{}", "📋 Distributors".bright_blue().bold());
            println!();
            println!(
                "  {:<5} {:<40} {:<10}",
                "ID".bright_white().bold(),
                "Name".bright_white().bold(),
                "Status".bright_white().bold()
            );
            println!("  {}", "─".repeat(60).bright_black());

            for d in &distributors {
                let status = if d.is_active {
                    "ACTIVE".green()
                } else {
                    "INACTIVE".red()
                };
                println!(
                    "  {:<5} {:<40} {}",
                    d.id.to_string().bright_black(),
                    d.name.cyan(),
                    status
                );
            }
            println!();
        }
        DistributorAction::Deactivate { ids } => {
            let confirmed = Confirm::new()
                .with_prompt(format!(
                    "Deactivate {} distributor(s)? Shoppers will no longer see them",
                    ids.len()
                ))
                .default(false)
                .interact()?;

            if !confirmed {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            let changed = service
                .bulk_set_active(ids, false)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to deactivate: {}", e))?;
            println!("{} {}", "✅ Deactivated:".green().bold(), changed);
        }
        DistributorAction::Activate { ids } => {
            let changed = service
                .bulk_set_active(ids, true)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to activate: {}", e))?;
            println!("{} {}", "✅ Activated:".green().bold(), changed);
        }
    }

    Ok(())
}

async fn handle_product_action(action: ProductAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let service = ProductService::new(
        Arc::new(PgProductRepository::new(pool.clone())),
        Arc::new(PgDistributorRepository::new(pool.clone())),
        Arc::new(PgSupplierRepository::new(pool)),
    );

    match action {
        ProductAction::Create {
            name,
            supplier,
            distributors,
        } => {
            if distributors.is_empty() {
                println!(
                    "{}",
                    "⚠️  No distributor given: the product cannot be added to any cart yet"
                        .yellow()
                );
            }

            let product = service
                .create_product(NewProduct {
                    name,
                    description: None,
                    supplier_id: supplier,
                    distributor_ids: distributors.into_iter().collect(),
                })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create product: {}", e))?;

            println!(
                "{} {} (id {})",
                "✅ Product created:".green().bold(),
                product.name.cyan(),
                product.id
            );
        }
        ProductAction::List { distributor } => {
            let products = service
                .list_products(distributor)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list products: {}", e))?;

            println!("{}", "📋 Products".bright_blue().bold());
            println!();
            for p in &products {
                let carried_by: Vec<String> =
                    p.distributor_ids.iter().map(|id| id.to_string()).collect();
                println!(
                    "  {:<5} {:<40} distributors: {}",
                    p.id.to_string().bright_black(),
                    p.name.cyan(),
                    carried_by.join(", ").bright_black()
                );
            }
            println!();
            println!("  Total: {}", products.len().to_string().bright_white().bold());
        }
    }

    Ok(())
}

async fn handle_enterprise_action(action: EnterpriseAction, pool: &PgPool) -> Result<()> {
    let service = EnterpriseService::new(Arc::new(PgEnterpriseRepository::new(Arc::new(
        pool.clone(),
    ))));

    match action {
        EnterpriseAction::Create {
            name,
            producer,
            distributor,
        } => {
            let enterprise = service
                .create_enterprise(NewEnterprise {
                    name,
                    description: None,
                    is_primary_producer: producer,
                    is_distributor: distributor,
                })
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create enterprise: {}", e))?;

            println!(
                "{} {} (id {})",
                "✅ Enterprise created:".green().bold(),
                enterprise.name.cyan(),
                enterprise.id
            );
        }
        EnterpriseAction::List => {
            let enterprises = service
                .list_enterprises()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list enterprises: {}", e))?;

            println!("{}", "📋 Enterprises".bright_blue().bold());
            println!();
            for e in &enterprises {
                let mut roles = Vec::new();
                if e.is_primary_producer {
                    roles.push("producer");
                }
                if e.is_distributor {
                    roles.push("distributor");
                }
                println!(
                    "  {:<5} {:<40} {}",
                    e.id.to_string().bright_black(),
                    e.name.cyan(),
                    roles.join(", ").bright_black()
                );
            }
            println!();
        }
    }

    Ok(())
}

/// Displays catalog and cart counts.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let rows = [
        ("Suppliers", "SELECT COUNT(*) FROM suppliers"),
        (
            "Distributors",
            "SELECT COUNT(*) FROM distributors WHERE is_active",
        ),
        ("Products", "SELECT COUNT(*) FROM products"),
        (
            "Open carts",
            "SELECT COUNT(*) FROM orders WHERE EXISTS (SELECT 1 FROM line_items li WHERE li.order_id = orders.id)",
        ),
    ];

    for (label, query) in rows {
        let count: i64 = sqlx::query_scalar(query).fetch_one(pool).await?;
        println!(
            "  {:<14} {}",
            format!("{label}:"),
            count.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
