use clap::{Parser, Subcommand};
use serde::Serialize;

use catalog_storefront::api::ProductClient;
use catalog_storefront::catalog::{Draft, DraftField};
use catalog_storefront::config::ApiConfig;

#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(about = "Command-line access to the products API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "https://api-products-server.herokuapp.com")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every product
    List,
    /// Show one product
    Get { id: u64 },
    /// Create a product
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        img: String,
        #[arg(long)]
        description: String,
    },
    /// Delete a product
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ProductClient::new(&ApiConfig {
        base_url: cli.url,
        ..ApiConfig::default()
    })?;

    match cli.command {
        Commands::List => print_json(&client.list_products().await?)?,
        Commands::Get { id } => print_json(&client.get_product(id).await?)?,
        Commands::Add {
            title,
            price,
            img,
            description,
        } => {
            let mut draft = Draft::default();
            draft.set(DraftField::Title, title);
            draft.set(DraftField::Price, price);
            draft.set(DraftField::Img, img);
            draft.set(DraftField::Description, description);

            let product = match draft.validate() {
                Ok(product) => product,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };
            print_json(&client.create_product(&product).await?.0)?;
        }
        Commands::Delete { id } => print_json(&client.delete_product(id).await?.0)?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
