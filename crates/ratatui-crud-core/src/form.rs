use crate::input::InputEvent;
use crate::schema::FormSchema;
use crate::theme::Theme;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use serde_json::Map;
use serde_json::Value;

/// One field-level validation failure, forwarded verbatim to the caller's
/// error callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of feeding an input event to a form renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum FormAction {
    None,
    Redraw,
    /// The user submitted and every field validated; the bag holds one value
    /// per filled-in field.
    Submitted(Map<String, Value>),
    /// The user submitted but validation failed.
    Rejected(Vec<FieldError>),
}

/// Contract for a schema-driven form renderer.
///
/// The table widget owns one of these behind a `Box<dyn SchemaForm>` and
/// drives it while its modal is open. Implementations must support
/// required-field enforcement, string and number scalars, enumerated
/// choices, and default pre-population; anything beyond that is up to them.
pub trait SchemaForm {
    /// Resets the renderer to a fresh instance of `schema`. Called on every
    /// modal open; any state from a previous schema is discarded.
    fn open(&mut self, schema: FormSchema);

    fn handle_event(&mut self, event: &InputEvent) -> FormAction;

    /// Lines the renderer wants for the current schema. The table widget
    /// sizes its modal from this, clamped to the available area.
    fn height(&self) -> u16;

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme);
}
