use serde_json::{Map, Value};

/// One row to insert, keyed by column name.
///
/// Values must match the column types of the target database; the client does
/// not check them.
pub type DatabaseRow = Map<String, Value>;
