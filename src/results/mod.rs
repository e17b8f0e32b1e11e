// Query results - the record type delivered to consumers.
//
// - row: one delivered row, column name -> string value

mod row;

pub use row::{NULL_SENTINEL, Row};
