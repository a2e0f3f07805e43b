//! # Bid Table
//!
//! An open-addressing hash table that indexes auction bids by their numeric id.
//!
//! Collisions are resolved with linear probing from the slot the id hashes to. Removed bids
//! leave a tombstone so later lookups keep walking past them, and the table grows to the first
//! prime at least twice its size once it gets too full.
//!
//! The crate also ships a CSV loader for the monthly sales export, and two binaries: an
//! interactive menu (`bid_menu`) and a probe displacement report (`probe_stats`).
//!
//! ## Basic Usage
//!
//! ```rust
//! use bidtable::{Bid, BidTable, TableError};
//!
//! // Create a table with the default 179 slots
//! let mut table = BidTable::new();
//!
//! // Insert bids
//! table.insert(Bid::new("98223", "Hoover Steam Vac", "General Fund", 27.0))?;
//! table.insert(Bid::new("98109", "Oak Chair", "Enterprise", 12.5))?;
//!
//! // Look one up, a copy is returned
//! assert_eq!(table.search("98223")?.title(), "Hoover Steam Vac");
//!
//! // Inserting an existing id replaces the stored bid
//! let previous = table.insert(Bid::new("98109", "Oak Chair", "Enterprise", 15.0))?;
//! assert_eq!(previous.map(|bid| bid.amount()), Some(12.5));
//!
//! // Remove it
//! table.remove("98223")?;
//! assert!(matches!(table.search("98223"), Err(TableError::NotFound { .. })));
//!
//! // Ids must be non-negative integers
//! assert!(matches!(
//!     table.insert(Bid::new("A-17", "Lamp", "General Fund", 1.0)),
//!     Err(TableError::MalformedKey { .. })
//! ));
//! # Ok::<(), TableError>(())
//! ```
//!
//! ## Loading a CSV export
//!
//! ```rust
//! use bidtable::{BidTable, loader};
//!
//! let csv = "\
//! Title,ArticleID,Department,CloseDate,WinningBid,InventoryID,VehicleID,ReceiptNumber,Fund
//! Hoover Steam Vac,98223,Enterprise,11/12/16,$27.00,2016-101,,13458,General Fund
//! ";
//!
//! let mut table = BidTable::new();
//! let report = loader::load_bids_from_reader(csv.as_bytes(), &mut table)?;
//! assert_eq!(report.inserted, 1);
//! assert!(table.contains("98223"));
//! # Ok::<(), bidtable::LoadError>(())
//! ```

/// The bid record
mod bid;
/// The open-addressing table
mod bid_table;
/// Table construction parameters
pub mod config;
/// Error types
mod error;
/// CSV ingestion
pub mod loader;
/// Logger installation for binaries
pub mod logging;
/// Prime and currency helpers
pub mod utils;

pub use bid::{Bid, parse_key};
pub use bid_table::{BidTable, Iter, ProbeStats};
pub use config::TableConfig;
pub use error::{LoadError, RowError, TableError};
pub use loader::LoadReport;
