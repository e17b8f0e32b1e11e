use std::rc::Rc;

/// The literal delivered in place of a database NULL.
///
/// Known ambiguity, deliberately not resolved: a genuine text column value
/// equal to `"NULL"` is indistinguishable from a true SQL NULL once a `Row`
/// has been built. The driver seam keeps the distinction (`Option` cells);
/// it is lost here, at record-building time. Callers that must tell the two
/// apart cannot do so at this layer.
pub const NULL_SENTINEL: &str = "NULL";

/// A row from a query result: an ordered mapping from column name to
/// string value, in server-returned column order.
///
/// Column names are shared across all rows of one result set to avoid
/// duplicating them per row.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Rc<Vec<String>>,
    values: Vec<String>,
}

impl Row {
    #[must_use]
    pub(crate) fn new(columns: Rc<Vec<String>>, values: Vec<String>) -> Self {
        Self { columns, values }
    }

    /// Column names, in server order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values, positionally aligned with [`columns`](Self::columns).
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Look up a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|name| name == column)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Number of columns in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
