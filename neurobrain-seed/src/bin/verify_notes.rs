use anyhow::Result;
use clap::Parser;

use neurobrain_seed::{bootstrap, open_store, InspectTarget};
use neurobrain_store::inspector::NoteSummary;
use neurobrain_store::{Record, TableInspector};
use neurobrain_types::Note;

/// Check that seeded notes are readable
#[derive(Parser, Debug)]
#[command(name = "verify-notes")]
#[command(about = "Count notes, show a sample and find notes by id prefix", long_about = None)]
struct Args {
    /// Notes table name [default: the configured notes table]
    #[arg(short, long)]
    table: Option<String>,

    /// NoteId prefix to match [default: inspect.note_prefix]
    #[arg(short, long)]
    prefix: Option<String>,

    /// Rows evaluated by each scan [default: inspect.sample_limit]
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..))]
    limit: Option<i32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = bootstrap()?;
    let InspectTarget { table, prefix, limit } =
        InspectTarget::resolve(&settings, args.table, args.prefix, args.limit);
    let inspector = TableInspector::new(open_store(&settings, false).await);

    println!("Checking notes in table {}...", table);
    match inspector.count(&table).await {
        Ok(count) => println!("Total notes in table: {}", count),
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(());
        }
    }

    println!();
    println!("Sample notes (limit {}):", limit);
    match inspector.sample(&table, limit).await {
        Ok(output) if output.items.is_empty() => println!("No notes found."),
        Ok(output) => {
            for (i, item) in output.items.iter().enumerate() {
                println!();
                println!("Note {}:", i + 1);
                println!("{}", NoteSummary::from_item(item));
            }
        }
        Err(e) => eprintln!("Error sampling notes: {}", e),
    }

    println!();
    println!("Notes with prefix '{}':", prefix);
    match inspector
        .find_by_prefix(&table, Note::KEY_ATTRIBUTE, &prefix, limit)
        .await
    {
        Ok(notes) if notes.is_empty() => println!("No matching notes found."),
        Ok(notes) => {
            println!("Found {} notes:", notes.len());
            for (i, item) in notes.iter().enumerate() {
                println!();
                println!("Note {}:", i + 1);
                println!("{}", NoteSummary::from_item(item));
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_come_from_settings() {
        let args = Args::try_parse_from(["verify-notes"]).unwrap();
        assert_eq!(args.table, None);
        assert_eq!(args.prefix, None);
        assert_eq!(args.limit, None);
    }

    #[test]
    fn test_overrides_and_limit_bounds() {
        let args = Args::try_parse_from(["verify-notes", "-t", "NotesV2", "-p", "note-user-01", "-l", "20"]).unwrap();
        assert_eq!(args.table.as_deref(), Some("NotesV2"));
        assert_eq!(args.prefix.as_deref(), Some("note-user-01"));
        assert_eq!(args.limit, Some(20));
        assert!(Args::try_parse_from(["verify-notes", "--limit", "0"]).is_err());
    }
}
