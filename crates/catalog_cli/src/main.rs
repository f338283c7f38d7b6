//! `catalog` CLI entry point.
//!
//! Sub-commands:
//! - `init`   create or migrate the database and report its schema version.
//! - `create` persist a new product.
//! - `list`   print every product.
//! - `find`   print one product by id.
//! - `search` print products matching one field.
//! - `update` change fields of a persisted product.
//! - `delete` remove a product by id.
//!
//! Products are printed as one JSON document per line.

use catalog_core::db::migrations::latest_version;
use catalog_core::db::open_db_from_uri;
use catalog_core::{
    parse_price, CatalogConfig, Category, Product, ProductId, ProductQuery, ProductRepository,
    RepoError, SqliteProductRepository,
};
use clap::{Parser, Subcommand};
use log::info;
use rust_decimal::Decimal;
use std::error::Error;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "catalog", about = "Product catalog maintenance tool", version)]
struct Cli {
    /// `sqlite://<path>`, a bare path, or `sqlite::memory:`.
    /// Overrides `DATABASE_URI` from the environment.
    #[arg(long)]
    database_uri: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or migrate the database.
    Init,
    /// Persist a new product.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = price_arg)]
        price: Decimal,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        available: bool,
        #[arg(long, value_parser = category_arg, default_value = "UNKNOWN")]
        category: Category,
    },
    /// Print every product.
    List,
    /// Print one product.
    Find { id: ProductId },
    /// Print products matching exactly one field.
    Search {
        #[command(subcommand)]
        by: SearchBy,
    },
    /// Change fields of a persisted product.
    Update {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = price_arg)]
        price: Option<Decimal>,
        #[arg(long)]
        available: Option<bool>,
        #[arg(long, value_parser = category_arg)]
        category: Option<Category>,
    },
    /// Remove a product. Missing ids are ignored.
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum SearchBy {
    Name { name: String },
    Availability {
        #[arg(action = clap::ArgAction::Set)]
        available: bool,
    },
    Category {
        #[arg(value_parser = category_arg)]
        category: Category,
    },
    Price {
        #[arg(value_parser = price_arg)]
        price: Decimal,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = apply_overrides(CatalogConfig::from_env()?, cli.database_uri);
    config.init_logging()?;

    let conn = open_db_from_uri(&config.database_uri)?;
    let repo = SqliteProductRepository::try_new(&conn)?;
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Command::Init => {
            println!("schema_version={}", latest_version());
        }
        Command::Create {
            name,
            description,
            price,
            available,
            category,
        } => {
            let mut product = Product::new(name, description, price, available, category);
            repo.create(&mut product)?;
            print_product(&product)?;
        }
        Command::List => {
            for product in repo.all()? {
                print_product(&product)?;
            }
        }
        Command::Find { id } => match repo.find(id)? {
            Some(product) => print_product(&product)?,
            None => return Err(RepoError::NotFound(id).into()),
        },
        Command::Search { by } => {
            let query = match by {
                SearchBy::Name { name } => repo.find_by_name(&name),
                SearchBy::Availability { available } => repo.find_by_availability(available),
                SearchBy::Category { category } => repo.find_by_category(category),
                SearchBy::Price { price } => repo.find_by_price(price),
            };
            print_query(&query)?;
        }
        Command::Update {
            id,
            name,
            description,
            price,
            available,
            category,
        } => {
            let mut product = repo.find(id)?.ok_or(RepoError::NotFound(id))?;
            if let Some(name) = name {
                product.name = name;
            }
            if let Some(description) = description {
                product.description = description;
            }
            if let Some(price) = price {
                product.price = price;
            }
            if let Some(available) = available {
                product.available = available;
            }
            if let Some(category) = category {
                product.category = category;
            }
            repo.update(&product)?;
            print_product(&product)?;
        }
        Command::Delete { id } => {
            repo.delete_by_id(id)?;
        }
    }

    Ok(())
}

/// Command-line flags win over environment settings.
fn apply_overrides(mut config: CatalogConfig, database_uri: Option<String>) -> CatalogConfig {
    if let Some(uri) = database_uri.filter(|uri| !uri.trim().is_empty()) {
        config.database_uri = uri.trim().to_string();
    }
    config
}

fn print_product(product: &Product) -> Result<(), Box<dyn Error>> {
    println!("{}", product.to_json()?);
    Ok(())
}

fn print_query<R: ProductRepository>(query: &ProductQuery<'_, R>) -> Result<(), Box<dyn Error>> {
    for product in query {
        print_product(&product?)?;
    }
    Ok(())
}

fn price_arg(value: &str) -> Result<Decimal, String> {
    parse_price(value).map_err(|err| err.to_string())
}

fn category_arg(value: &str) -> Result<Category, String> {
    Category::parse(value).map_err(|err| err.to_string())
}
