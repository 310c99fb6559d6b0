use anyhow::Result;
use clap::Parser;

use neurobrain_seed::{bootstrap, open_store};
use neurobrain_store::inspector::TableReport;
use neurobrain_store::TableInspector;

/// List every table in the configured region with its description
#[derive(Parser, Debug)]
#[command(name = "list-tables")]
#[command(about = "List DynamoDB tables and their schemas", long_about = None)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    let _args = Args::parse();
    let settings = bootstrap()?;

    println!("Checking DynamoDB tables in region {}...", settings.aws.region);
    let inspector = TableInspector::new(open_store(&settings, false).await);

    let tables = match inspector.list_all().await {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error accessing DynamoDB: {}", e);
            if let Some(code) = e.code() {
                eprintln!("Error code: {}", code);
            }
            return Ok(());
        }
    };

    if tables.is_empty() {
        println!("No tables found in this region.");
        return Ok(());
    }

    println!("Found {} tables:", tables.len());
    for (name, description) in tables {
        println!();
        println!("Table: {}", name);
        println!("{}", "-".repeat(name.len() + 7));
        match description {
            Ok(description) => print!("{}", TableReport(&description)),
            Err(e) => println!("Error describing table: {}", e),
        }
    }

    Ok(())
}
