use anyhow::Result;
use clap::Parser;

use neurobrain_seed::{bootstrap, open_store};
use neurobrain_store::Seeder;

/// Write the fixed review session and review response records
#[derive(Parser, Debug)]
#[command(name = "seed-review")]
#[command(about = "Initialize the ReviewSessions and ReviewResponses tables", long_about = None)]
struct Args {
    /// Write to an in-memory store instead of DynamoDB
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = bootstrap()?;

    println!("Initializing sample review data...");
    let store = open_store(&settings, args.dry_run).await;
    let seeder = Seeder::new(store, settings);

    let report = seeder.seed_review_fixtures().await;
    print!("{}", report);

    Ok(())
}
