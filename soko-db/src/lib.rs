//! In-memory SQLite price source for market price views.
//!
//! This crate loads price CSV data into an in-memory SQLite database and
//! exposes typed queries plus [`Database::all_commodity_prices`], which hands
//! out a ready-to-select [`snapshot::PriceSnapshot`].
//!
//! # Architecture
//!
//! - `Rc<RefCell<Connection>>` wrapper for interior mutability in a single thread
//! - In-memory SQLite via `rusqlite`
//! - Rows keep an autoincrement id so queries return them in source order
//!
//! # Usage
//!
//! ```rust
//! use soko_db::Database;
//!
//! let db = Database::new().unwrap();
//! db.load_prices("commodity,county,market,price,unit,date\nMaize,Nakuru,Nakuru Town,45,kg,2024-01-01\n").unwrap();
//!
//! let prices = db.query_prices().unwrap();
//! assert_eq!(prices.len(), 1);
//! let snapshot = db.all_commodity_prices(5).unwrap();
//! assert_eq!(snapshot.index.len(), 1);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `prices` - Price observations in source order
//! - `refreshes` - One row per wholesale replacement of `prices`

pub mod schema;
mod loader;
mod queries;
pub mod models;
pub mod snapshot;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding the current price list.
///
/// This struct is cheaply cloneable (via `Rc`); clones share one connection.
///
/// # Example
///
/// ```rust
/// use soko_db::Database;
///
/// let db = Database::new().unwrap();
/// assert!(db.query_prices().unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
