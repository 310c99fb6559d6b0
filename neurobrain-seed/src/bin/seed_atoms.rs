use anyhow::Result;
use clap::Parser;

use neurobrain_seed::{bootstrap, open_store, rng_from};
use neurobrain_store::Seeder;

/// Add sample atoms for a single user, outside the full dataset run
#[derive(Parser, Debug)]
#[command(name = "seed-atoms")]
#[command(about = "Add sample atoms for one user to the Atoms table", long_about = None)]
struct Args {
    /// Owner of the generated atoms
    #[arg(long)]
    user_id: Option<String>,

    /// Number of atoms to create
    #[arg(short, long)]
    count: Option<usize>,

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

    if let Some(user_id) = args.user_id {
        settings.seed.standalone_user_id = user_id;
    }
    if let Some(count) = args.count {
        settings.seed.standalone_atoms = count;
    }

    println!(
        "Adding {} sample atoms for {}",
        settings.seed.standalone_atoms, settings.seed.standalone_user_id
    );

    let rng = rng_from(args.seed.or(settings.seed.rng_seed));
    let store = open_store(&settings, args.dry_run).await;
    let seeder = Seeder::new(store, settings);

    match seeder.seed_standalone_atoms(rng).await {
        Ok(report) => print!("{}", report),
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_and_count() {
        let args = Args::try_parse_from(["seed-atoms", "--user-id", "user-003", "-c", "4"]).unwrap();
        assert_eq!(args.user_id.as_deref(), Some("user-003"));
        assert_eq!(args.count, Some(4));
        assert_eq!(args.seed, None);
    }
}
