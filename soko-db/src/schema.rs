//! SQL schema definitions for the in-memory SQLite database.

/// Returns the full SQL schema as a single batch string.
///
/// - `prices` - one row per observation; `id` only records source order,
///   identical rows are allowed
/// - `refreshes` - fetch time, source and row count of each replacement
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS prices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        commodity TEXT NOT NULL,
        county TEXT NOT NULL,
        market TEXT NOT NULL,
        price REAL NOT NULL,
        unit TEXT NOT NULL,
        date TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_prices_county ON prices(county);
    CREATE INDEX IF NOT EXISTS idx_prices_commodity ON prices(commodity);

    CREATE TABLE IF NOT EXISTS refreshes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        fetched_at TEXT NOT NULL,
        source TEXT NOT NULL,
        record_count INTEGER NOT NULL
    );
    "#
}
