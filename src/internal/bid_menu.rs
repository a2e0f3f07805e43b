//! Interactive menu for loading, listing, finding and removing bids

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{Context, Result};
use bidtable::{
    BidTable, TableConfig, TableError,
    config::{DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR},
    loader, logging,
};
use clap::Parser;
use log::{error, info};

/// Menu shown before every choice
const MENU: &str = "Menu:
  1. Load Bids
  2. Display All Bids
  3. Find Bid
  4. Remove Bid
  9. Exit
Enter choice: ";

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "bid_menu", about = "Load, list, find and remove auction bids")]
struct Args {
    /// CSV export loaded by menu entry 1
    #[arg(default_value = "eBid_Monthly_Sales_Dec_2016.csv")]
    csv_path: PathBuf,
    /// Bid id used when the id prompt is left empty
    #[arg(default_value = "98223")]
    bid_key: String,
    /// Initial number of table slots
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
    /// Load factor above which the table grows
    #[arg(long, default_value_t = DEFAULT_MAX_LOAD_FACTOR)]
    load_factor: f64,
}

/// A menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    /// Load the CSV export
    Load,
    /// Print every bid
    PrintAll,
    /// Look up one bid
    Find,
    /// Remove one bid
    Remove,
    /// Leave the menu
    Exit,
}

impl Choice {
    /// Maps the typed menu number onto an entry
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Load),
            "2" => Some(Self::PrintAll),
            "3" => Some(Self::Find),
            "4" => Some(Self::Remove),
            "9" => Some(Self::Exit),
            _ => None,
        }
    }
}

fn main() -> Result<()> {
    logging::init_logger();
    let args = Args::parse();

    let config = TableConfig::default()
        .with_capacity(args.capacity)
        .with_max_load_factor(args.load_factor);
    let mut table = BidTable::with_config(config);
    info!("bid table ready with {} slots", table.capacity());

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&args, &mut table, &mut stdin.lock(), &mut stdout.lock()).context("bid menu failed")
}

/// Runs the menu until the user exits or input ends
fn run<R: BufRead, W: Write>(
    args: &Args,
    table: &mut BidTable,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    loop {
        write!(out, "{MENU}")?;
        out.flush()?;

        let Some(line) = read_line(input)? else { break };
        match Choice::parse(&line) {
            Some(Choice::Load) => load(&args.csv_path, table, out)?,
            Some(Choice::PrintAll) => table.print_all(out)?,
            Some(Choice::Find) => {
                let id = prompt_id(&args.bid_key, input, out)?;
                find(&id, table, out)?;
            }
            Some(Choice::Remove) => {
                let id = prompt_id(&args.bid_key, input, out)?;
                remove(&id, table, out)?;
            }
            Some(Choice::Exit) => break,
            None => writeln!(out, "Unknown choice {line:?}")?,
        }
    }

    writeln!(out, "Good bye.")?;
    Ok(())
}

/// Reads one trimmed line, `None` at end of input
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

/// Asks for a bid id, falling back to `default` on an empty answer
fn prompt_id<R: BufRead, W: Write>(default: &str, input: &mut R, out: &mut W) -> Result<String> {
    write!(out, "Enter bid id [{default}]: ")?;
    out.flush()?;
    Ok(read_line(input)?.filter(|id| !id.is_empty()).unwrap_or_else(|| default.to_string()))
}

/// Menu entry 1
fn load<W: Write>(path: &Path, table: &mut BidTable, out: &mut W) -> Result<()> {
    let start = Instant::now();
    match loader::load_bids(path, table) {
        Ok(report) => writeln!(
            out,
            "{} bids loaded ({} updated, {} rejected)",
            report.inserted,
            report.updated,
            report.rejected.len()
        )?,
        Err(err) => {
            error!("{err}");
            writeln!(out, "Failed to load bids: {err}")?;
        }
    }
    writeln!(out, "time: {} milliseconds", start.elapsed().as_millis())?;
    Ok(())
}

/// Menu entry 3
fn find<W: Write>(id: &str, table: &BidTable, out: &mut W) -> Result<()> {
    let start = Instant::now();
    let result = table.search(id);
    let elapsed = start.elapsed();

    match result {
        Ok(bid) => writeln!(out, "{bid}")?,
        Err(TableError::NotFound { .. }) => writeln!(out, "Bid Id {id} not found.")?,
        Err(err) => writeln!(out, "{err}")?,
    }
    writeln!(out, "time: {} microseconds", elapsed.as_micros())?;
    Ok(())
}

/// Menu entry 4
fn remove<W: Write>(id: &str, table: &mut BidTable, out: &mut W) -> Result<()> {
    match table.remove(id) {
        Ok(bid) => writeln!(out, "DELETING {}", bid.id())?,
        Err(TableError::NotFound { .. }) => {
            writeln!(out, "Removal failed! Bid Id {id} not found.")?;
        }
        Err(err) => writeln!(out, "{err}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bidtable::Bid;

    use super::*;

    fn session(script: &str, table: &mut BidTable) -> String {
        let args = Args::parse_from(["bid_menu", "/nonexistent/bids.csv"]);
        let mut out = Vec::new();
        run(&args, table, &mut script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(Choice::parse(" 1 "), Some(Choice::Load));
        assert_eq!(Choice::parse("9"), Some(Choice::Exit));
        assert_eq!(Choice::parse("5"), None);
    }

    #[test]
    fn test_find_and_remove() {
        let mut table = BidTable::new();
        table.insert(Bid::new("98223", "Hoover Steam Vac", "General Fund", 27.0)).unwrap();

        let output = session("3\n\n4\n98223\n4\n98223\n3\n98223\n9\n", &mut table);

        assert!(output.contains("98223: Hoover Steam Vac | 27 | General Fund"));
        assert!(output.contains("DELETING 98223"));
        assert!(output.contains("Removal failed! Bid Id 98223 not found."));
        assert!(output.contains("Bid Id 98223 not found."));
        assert!(output.ends_with("Good bye.\n"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_print_all_and_unknown_choice() {
        let mut table = BidTable::with_capacity(10);
        table.insert(Bid::new("13", "Desk", "Enterprise", 27.5)).unwrap();

        let output = session("2\n7\n", &mut table);

        assert!(output.contains("Key: 3 || bidID: 13 || title: Desk"));
        assert!(output.contains("Unknown choice \"7\""));
        // end of input leaves the menu
        assert!(output.ends_with("Good bye.\n"));
    }

    #[test]
    fn test_load_failure_keeps_running() {
        let mut table = BidTable::new();
        let output = session("1\n3\nabc\n9\n", &mut table);

        assert!(output.contains("Failed to load bids"));
        assert!(output.contains("is not a non-negative integer"));
        assert!(table.is_empty());
    }
}
