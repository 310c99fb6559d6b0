use anyhow::Result;
use clap::Parser;

use neurobrain_seed::{bootstrap, open_store, InspectTarget};
use neurobrain_store::inspector::TableReport;
use neurobrain_store::item::item_to_json;
use neurobrain_store::TableInspector;

/// Describe one table and print a few of its rows
#[derive(Parser, Debug)]
#[command(name = "check-table")]
#[command(about = "Show a table's schema, row count and sample rows", long_about = None)]
struct Args {
    /// Table to inspect [default: the configured notes table]
    #[arg(short, long)]
    table: Option<String>,

    /// Rows to sample [default: inspect.sample_limit]
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..))]
    limit: Option<i32>,
}

fn format_capacity(units: Option<f64>) -> String {
    match units {
        Some(units) => format!("{} units", units),
        None => "N/A".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = bootstrap()?;
    let InspectTarget { table, limit, .. } = InspectTarget::resolve(&settings, args.table, None, args.limit);
    let inspector = TableInspector::new(open_store(&settings, false).await);

    println!("Checking table {}...", table);
    match inspector.describe(&table).await {
        Ok(description) => print!("{}", TableReport(&description)),
        Err(e) => {
            eprintln!("Error describing table: {}", e);
            return Ok(());
        }
    }

    println!();
    match inspector.count(&table).await {
        Ok(count) => println!("Actual item count (scan): {}", count),
        Err(e) => eprintln!("Error counting items: {}", e),
    }

    println!();
    println!("Sample items (limit {}):", limit);
    match inspector.sample(&table, limit).await {
        Ok(output) => {
            if output.items.is_empty() {
                println!("No items found.");
            }
            for (i, item) in output.items.iter().enumerate() {
                println!();
                println!("Item {}:", i + 1);
                println!("{}", item_to_json(item));
            }
            println!();
            println!("Consumed Capacity: {}", format_capacity(output.consumed_capacity));
        }
        Err(e) => eprintln!("Error scanning table: {}", e),
    }

    Ok(())
}
