mod catalog;
mod client;
mod config;
mod error;
mod server;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::catalog::service::CatalogService;
use crate::catalog::store::SqliteStore;
use crate::catalog::types::{Product, ProductDraft};
use crate::client::api::ApiClient;
use crate::client::cache::{ProductCache, SortOrder};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(about = "Product catalog manager: HTTP API server and terminal client")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./stockroom.yaml, then $XDG_CONFIG_HOME/stockroom/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// API base URL for client commands (overrides config)
  #[arg(long, global = true)]
  api_url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the catalog API server
  Serve {
    /// Listening port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database path (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,
  },
  /// List products, with optional search and price sort
  List {
    /// Keep products whose name, description, or category contains this text
    #[arg(short, long)]
    search: Option<String>,

    /// Price sort for the listing; omitted keeps the fetch order
    #[arg(long, value_enum)]
    sort: Option<SortOrder>,
  },
  /// Show a single product
  Show { id: String },
  /// Add a product
  Add {
    #[arg(long)]
    name: String,

    #[arg(long)]
    price: f64,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, help = category_help())]
    category: Option<String>,
  },
  /// Replace a product's fields (whole-record update)
  Edit {
    id: String,

    #[arg(long)]
    name: String,

    #[arg(long)]
    price: f64,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, help = category_help())]
    category: Option<String>,
  },
  /// Delete a product
  Rm { id: String },
}

fn category_help() -> String {
  format!(
    "Category label, free text (suggestions: {})",
    client::SUGGESTED_CATEGORIES.join(", ")
  )
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let Args {
    config: config_path,
    api_url,
    command,
  } = Args::parse();

  init_tracing(&command);

  let config = Config::load(config_path.as_deref())?;

  match command {
    Command::Serve { port, db } => serve(config, port, db).await?,
    Command::List { search, sort } => {
      let mut cache = ProductCache::new(api_client(&config, api_url)?);
      cache.refresh().await?;
      cache.apply_filter(search.as_deref().unwrap_or(""), sort);
      print_product_table(cache.products());
    }
    Command::Show { id } => {
      let product = api_client(&config, api_url)?.get(&id).await?;
      print_product(&product);
    }
    Command::Add {
      name,
      price,
      description,
      category,
    } => {
      let mut cache = ProductCache::new(api_client(&config, api_url)?);
      let draft = ProductDraft {
        name: Some(name),
        price: Some(price),
        description,
        category,
      };
      let product = cache.create(draft).await?;
      println!("Created product {}", product.id);
      print_product(&product);
    }
    Command::Edit {
      id,
      name,
      price,
      description,
      category,
    } => {
      let mut cache = ProductCache::new(api_client(&config, api_url)?);
      let draft = ProductDraft {
        name: Some(name),
        price: Some(price),
        description,
        category,
      };
      let product = cache.update(&id, draft).await?;
      print_product(&product);
    }
    Command::Rm { id } => {
      let mut cache = ProductCache::new(api_client(&config, api_url)?);
      let message = cache.remove(&id).await?;
      println!("{message}");
    }
  }

  Ok(())
}

/// The server logs at info by default; client commands stay quiet unless
/// RUST_LOG says otherwise.
fn init_tracing(command: &Command) {
  let default_level = match command {
    Command::Serve { .. } => "info",
    _ => "warn",
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .init();
}

async fn serve(config: Config, port: Option<u16>, db: Option<PathBuf>) -> Result<()> {
  let mut server_config = config.server;
  if let Some(port) = port {
    server_config.port = port;
  }
  if let Some(db) = db {
    server_config.database = Some(db);
  }

  let db_path = match &server_config.database {
    Some(path) => path.clone(),
    None => SqliteStore::default_path()?,
  };
  let store = SqliteStore::open(&db_path)?;
  let service = CatalogService::new(store);

  let (server, addr) = server::bind(service, &server_config)?;
  tracing::info!(database = %db_path.display(), "catalog API listening on http://{addr}");
  server.await?;
  Ok(())
}

fn api_client(config: &Config, api_url: Option<String>) -> Result<ApiClient> {
  let url = api_url.unwrap_or_else(|| config.client.api_url.clone());
  Ok(ApiClient::new(&url)?)
}

fn print_product_table(products: &[Product]) {
  if products.is_empty() {
    println!("No products found.");
    return;
  }

  println!(
    "{:<36}  {:<24}  {:>10}  {:<14}  {}",
    "ID", "NAME", "PRICE", "CATEGORY", "DESCRIPTION"
  );
  for product in products {
    println!(
      "{:<36}  {:<24}  {:>10.2}  {:<14}  {}",
      product.id,
      truncate(&product.name, 24),
      product.price,
      truncate(&product.category, 14),
      truncate(&product.description, 40),
    );
  }
  println!("{} product(s)", products.len());
}

fn print_product(product: &Product) {
  println!("id:          {}", product.id);
  println!("name:        {}", product.name);
  println!("price:       {:.2}", product.price);
  println!("category:    {}", product.category);
  println!("description: {}", product.description);
}

fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{cut}...")
  }
}
