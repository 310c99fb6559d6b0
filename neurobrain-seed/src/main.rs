use anyhow::Result;
use clap::Parser;

use neurobrain_seed::{bootstrap, open_store, rng_from};
use neurobrain_store::Seeder;

/// NeuroBrain sample data seeder
///
/// Creates users, one note per user and atoms linked to those notes, then
/// writes them to the User, Notes and Atoms tables.
#[derive(Parser, Debug)]
#[command(name = "seed-data")]
#[command(about = "Populate the NeuroBrain tables with sample users, notes and atoms", long_about = None)]
struct Args {
    /// Number of users to create
    #[arg(long)]
    users: Option<usize>,

    /// Notes generated for each user
    #[arg(long)]
    notes_per_user: Option<usize>,

    /// Atoms generated for each user
    #[arg(long)]
    atoms_per_user: Option<usize>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write to an in-memory store instead of DynamoDB
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = bootstrap()?;

    if let Some(users) = args.users {
        settings.seed.users = users;
    }
    if let Some(notes) = args.notes_per_user {
        settings.seed.notes_per_user = notes;
    }
    if let Some(atoms) = args.atoms_per_user {
        settings.seed.atoms_per_user = atoms;
    }

    println!("NeuroBrain Sample Data Seeder");
    println!("=============================");
    println!();
    println!("Region: {}", settings.aws.region);
    println!(
        "Users: {}, notes per user: {}, atoms per user: {}",
        settings.seed.users, settings.seed.notes_per_user, settings.seed.atoms_per_user
    );
    println!("Dry run: {}", args.dry_run);
    println!();

    let rng = rng_from(args.seed.or(settings.seed.rng_seed));
    let store = open_store(&settings, args.dry_run).await;
    let seeder = Seeder::new(store, settings);

    match seeder.seed_dataset(rng).await {
        Ok(report) => {
            println!();
            println!("Summary:");
            print!("{}", report);
            if report.is_complete() {
                println!("Sample data generation completed successfully!");
            } else {
                println!();
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Please make sure all required tables exist and are active.");
        }
    }

    Ok(())
}
