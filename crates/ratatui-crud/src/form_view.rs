use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_crud_core::form::FieldError;
use ratatui_crud_core::form::FormAction;
use ratatui_crud_core::form::SchemaForm;
use ratatui_crud_core::input::InputEvent;
use ratatui_crud_core::input::KeyCode;
use ratatui_crud_core::input::KeyEvent;
use ratatui_crud_core::render;
use ratatui_crud_core::schema;
use ratatui_crud_core::schema::FieldType;
use ratatui_crud_core::schema::FormSchema;
use ratatui_crud_core::theme::Theme;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

#[derive(Clone, Debug)]
struct FieldState {
    name: String,
    title: String,
    field_type: FieldType,
    required: bool,
    enum_values: Option<Vec<String>>,
    enum_index: Option<usize>,
    buffer: String,
}

impl FieldState {
    fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    fn is_empty(&self) -> bool {
        match &self.enum_values {
            Some(_) => self.enum_index.is_none(),
            None => self.buffer.is_empty(),
        }
    }
}

/// Basic built-in [`SchemaForm`] implementation: a vertical field list with
/// focus traversal (Tab/Up/Down), character editing for scalar fields,
/// Left/Right cycling for enumerated fields, and Enter to submit.
///
/// Validation covers what the table widget relies on: required fields must
/// be filled and number fields must parse. Failures come back as
/// [`FormAction::Rejected`] with one [`FieldError`] per offending field.
#[derive(Clone, Debug, Default)]
pub struct SchemaFormView {
    fields: Vec<FieldState>,
    focus: usize,
}

impl SchemaFormView {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> FormAction {
        if self.fields.is_empty() {
            return match key.code {
                KeyCode::Enter => FormAction::Submitted(Map::new()),
                _ => FormAction::None,
            };
        }

        match key.code {
            KeyCode::Tab if key.modifiers.shift => {
                self.focus_prev();
                FormAction::Redraw
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus_next();
                FormAction::Redraw
            }
            KeyCode::Up => {
                self.focus_prev();
                FormAction::Redraw
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Left => self.cycle_enum(-1),
            KeyCode::Right => self.cycle_enum(1),
            KeyCode::Backspace => {
                let field = &mut self.fields[self.focus];
                if !field.is_enum() && field.buffer.pop().is_some() {
                    FormAction::Redraw
                } else {
                    FormAction::None
                }
            }
            KeyCode::Char(c) if !key.modifiers.ctrl && !key.modifiers.alt => {
                let field = &mut self.fields[self.focus];
                if field.is_enum() {
                    return FormAction::None;
                }
                field.buffer.push(c);
                FormAction::Redraw
            }
            _ => FormAction::None,
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn cycle_enum(&mut self, step: isize) -> FormAction {
        let field = &mut self.fields[self.focus];
        let Some(values) = &field.enum_values else {
            return FormAction::None;
        };
        if values.is_empty() {
            return FormAction::None;
        }
        let len = values.len() as isize;
        let next = match field.enum_index {
            Some(i) => (i as isize + step).rem_euclid(len),
            None => {
                if step >= 0 {
                    0
                } else {
                    len - 1
                }
            }
        };
        field.enum_index = Some(next as usize);
        FormAction::Redraw
    }

    fn submit(&mut self) -> FormAction {
        let mut errors = Vec::new();
        let mut bag = Map::new();

        for field in &self.fields {
            if field.is_empty() {
                if field.required {
                    errors.push(FieldError::new(&field.name, "is a required property"));
                }
                continue;
            }
            match self.field_value(field) {
                Some(value) => {
                    bag.insert(field.name.clone(), value);
                }
                None => errors.push(FieldError::new(&field.name, "should be number")),
            }
        }

        if errors.is_empty() {
            FormAction::Submitted(bag)
        } else {
            FormAction::Rejected(errors)
        }
    }

    fn field_value(&self, field: &FieldState) -> Option<Value> {
        if let (Some(values), Some(i)) = (&field.enum_values, field.enum_index) {
            return values.get(i).map(|v| Value::String(v.clone()));
        }
        match field.field_type {
            FieldType::String => Some(Value::String(field.buffer.clone())),
            FieldType::Number => {
                let text = field.buffer.trim();
                if let Ok(n) = text.parse::<i64>() {
                    return Some(Value::Number(n.into()));
                }
                let f: f64 = text.parse().ok()?;
                Number::from_f64(f).map(Value::Number)
            }
        }
    }

    fn field_line(&self, field: &FieldState) -> String {
        let marker = if field.required { "*" } else { "" };
        let value = match (&field.enum_values, field.enum_index) {
            (Some(values), Some(i)) => {
                format!("\u{2039} {} \u{203a}", values.get(i).map(String::as_str).unwrap_or(""))
            }
            (Some(_), None) => "\u{2039} - \u{203a}".to_string(),
            _ => field.buffer.clone(),
        };
        format!("{}{marker}: {value}", field.title)
    }
}

impl SchemaForm for SchemaFormView {
    fn open(&mut self, schema: FormSchema) {
        self.focus = 0;
        self.fields = schema
            .properties
            .iter()
            .map(|(name, spec)| {
                let default_text = spec.default.as_ref().map(schema::display_value);
                let enum_index = match (&spec.enum_values, &default_text) {
                    (Some(values), Some(d)) => values.iter().position(|v| v == d),
                    _ => None,
                };
                FieldState {
                    name: name.clone(),
                    title: if spec.title.is_empty() {
                        name.clone()
                    } else {
                        spec.title.clone()
                    },
                    field_type: spec.field_type,
                    required: schema.is_required(name),
                    enum_values: spec.enum_values.clone(),
                    enum_index,
                    buffer: if spec.enum_values.is_some() {
                        String::new()
                    } else {
                        default_text.unwrap_or_default()
                    },
                }
            })
            .collect();
    }

    fn handle_event(&mut self, event: &InputEvent) -> FormAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) => FormAction::None,
        }
    }

    /// One line per field plus the hint line.
    fn height(&self) -> u16 {
        self.fields.len().max(1) as u16 + 1
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        for (i, field) in self.fields.iter().enumerate() {
            if i as u16 >= area.height.saturating_sub(1) {
                break;
            }
            let style = if i == self.focus {
                theme.selection
            } else {
                theme.text_primary
            };
            render::render_line(
                Rect::new(area.x, area.y + i as u16, area.width, 1),
                buf,
                &self.field_line(field),
                style,
            );
        }
        let hint_y = area.y + area.height - 1;
        render::render_line(
            Rect::new(area.x, hint_y, area.width, 1),
            buf,
            "tab next \u{2022} \u{2190}\u{2192} choice \u{2022} enter submit",
            theme.text_muted,
        );
    }
}
