//! Storefront CLI
//!
//! Back-office entry point: migrations, catalog management, and order
//! administration. Every command acts with admin privilege.

use std::process;

use clap::{Args, Parser, Subcommand};
use storefront::{
    auth::{CurrentUser, UserId},
    context::AppContext,
    database,
    domain::{
        orders::models::{OrderId, OrderStatus, StatusPolicy},
        products::models::{NewProduct, ProductId},
    },
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(DbCommand),
    Product(ProductCommand),
    Order(OrderCommand),
}

#[derive(Debug, Args)]
struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending database migrations
    Migrate(DatabaseArgs),
}

#[derive(Debug, Args)]
struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    Create(CreateProductArgs),
    List(DatabaseArgs),
}

#[derive(Debug, Args)]
struct OrderCommand {
    #[command(subcommand)]
    command: OrderSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrderSubcommand {
    /// List every order in the ledger
    List(DatabaseArgs),
    SetStatus(SetStatusArgs),
}

#[derive(Debug, Args)]
struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[derive(Debug, Args)]
struct CreateProductArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Product display title
    #[arg(long)]
    title: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Unit price in minor units (cents)
    #[arg(long)]
    price: u64,

    #[arg(long, default_value = "")]
    image: String,

    /// Initial stock level
    #[arg(long)]
    stock: u32,

    #[arg(long, default_value = "")]
    category: String,
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Order UUID
    #[arg(long)]
    order: uuid::Uuid,

    /// New status: pending, processing, shipped or delivered
    #[arg(long)]
    status: OrderStatus,

    /// Reject moves backward through the fulfilment sequence
    #[arg(long)]
    forward_only: bool,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Db(DbCommand {
            command: DbSubcommand::Migrate(args),
        }) => migrate(args).await,
        Commands::Product(ProductCommand { command }) => match command {
            ProductSubcommand::Create(args) => create_product(args).await,
            ProductSubcommand::List(args) => list_products(args).await,
        },
        Commands::Order(OrderCommand { command }) => match command {
            OrderSubcommand::List(args) => list_orders(args).await,
            OrderSubcommand::SetStatus(args) => set_status(args).await,
        },
    }
}

async fn migrate(args: DatabaseArgs) -> Result<(), String> {
    let pool = connect(&args.database_url).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}

async fn create_product(args: CreateProductArgs) -> Result<(), String> {
    let ctx = context(&args.database.database_url).await?;

    let product = ctx
        .products
        .create_product(
            back_office(),
            NewProduct {
                uuid: ProductId::new(),
                title: args.title,
                description: args.description,
                price: args.price,
                image: args.image,
                stock: args.stock,
                category: args.category,
            },
        )
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    print_json(&product)
}

async fn list_products(args: DatabaseArgs) -> Result<(), String> {
    let ctx = context(&args.database_url).await?;

    let products = ctx
        .products
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    print_json(&products)
}

async fn list_orders(args: DatabaseArgs) -> Result<(), String> {
    let ctx = context(&args.database_url).await?;

    let orders = ctx
        .orders
        .get_all_orders(back_office())
        .await
        .map_err(|error| format!("failed to list orders: {error}"))?;

    print_json(&orders)
}

async fn set_status(args: SetStatusArgs) -> Result<(), String> {
    let policy = if args.forward_only {
        StatusPolicy::ForwardOnly
    } else {
        StatusPolicy::AnyRecognized
    };

    let ctx = AppContext::from_database_url(&args.database.database_url, policy)
        .await
        .map_err(|error| format!("failed to initialise: {error}"))?;

    ctx.orders
        .update_status(back_office(), OrderId::from_uuid(args.order), args.status)
        .await
        .map_err(|error| format!("failed to update status: {error}"))?;

    println!("order {} -> {}", args.order, args.status);

    Ok(())
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool, String> {
    database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))
}

async fn context(database_url: &str) -> Result<AppContext, String> {
    AppContext::from_database_url(database_url, StatusPolicy::default())
        .await
        .map_err(|error| format!("failed to initialise: {error}"))
}

/// The CLI is a trusted back-office tool; it always acts as an admin.
fn back_office() -> CurrentUser {
    CurrentUser::admin(UserId::new())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to serialise output: {error}"))?;

    println!("{json}");

    Ok(())
}
