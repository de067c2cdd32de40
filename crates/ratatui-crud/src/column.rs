use ratatui::layout::Alignment;
use ratatui_crud_core::schema;
use serde_json::Value;

pub type Accessor<R> = Box<dyn Fn(&R) -> Value>;
pub type Formatter = Box<dyn Fn(&Value) -> String>;

/// Extraction and formatting rule for one field of a row.
///
/// The accessor is a typed field-selector function instead of a string-keyed
/// lookup, so "column addresses a missing field" cannot happen at runtime;
/// an accessor returning [`Value::Null`] renders as a blank cell.
pub struct Column<R> {
    pub key: String,
    pub label: String,
    pub width: u16,
    pub align: Alignment,
    accessor: Accessor<R>,
    format: Option<Formatter>,
}

impl<R> Column<R> {
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        width: u16,
        accessor: impl Fn(&R) -> Value + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width,
            align: Alignment::Left,
            accessor: Box::new(accessor),
            format: None,
        }
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Overrides the default display coercion for this column's raw value.
    pub fn format(mut self, format: impl Fn(&Value) -> String + 'static) -> Self {
        self.format = Some(Box::new(format));
        self
    }

    pub fn raw_value(&self, row: &R) -> Value {
        (self.accessor)(row)
    }

    /// Display text for one cell: `format(raw)` when a formatter is set,
    /// else the raw value's display coercion.
    pub fn display_text(&self, row: &R) -> String {
        let raw = self.raw_value(row);
        match &self.format {
            Some(f) => f(&raw),
            None => schema::display_value(&raw),
        }
    }
}
