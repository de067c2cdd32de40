use crate::column::Column;
use crate::form_view::SchemaFormView;
use crate::pagination::Pagination;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use ratatui::widgets::Widget;
use ratatui_crud_core::form::FieldError;
use ratatui_crud_core::form::FormAction;
use ratatui_crud_core::form::SchemaForm;
use ratatui_crud_core::input::InputEvent;
use ratatui_crud_core::input::KeyCode;
use ratatui_crud_core::input::KeyEvent;
use ratatui_crud_core::input::MouseButton;
use ratatui_crud_core::input::MouseEvent;
use ratatui_crud_core::input::MouseEventKind;
use ratatui_crud_core::keymap;
use ratatui_crud_core::keymap::Binding;
use ratatui_crud_core::render;
use ratatui_crud_core::schema;
use ratatui_crud_core::schema::FormSchema;
use ratatui_crud_core::theme::Theme;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

pub type SubmitFn = Box<dyn FnMut(Value)>;
pub type FormErrorFn = Box<dyn FnMut(Vec<FieldError>)>;
pub type DeleteFn = Box<dyn FnMut(Value)>;
pub type IdExtractor<R> = Box<dyn Fn(&R, usize) -> String>;

/// Add or edit descriptor: an optional form schema plus the caller's
/// submit/error callbacks.
///
/// With no schema the action is trivial and non-modal: `on_submit` fires
/// immediately on the triggering interaction.
pub struct ItemAction {
    form: Option<FormSchema>,
    on_submit: SubmitFn,
    on_form_error: Option<FormErrorFn>,
}

impl ItemAction {
    pub fn new(on_submit: impl FnMut(Value) + 'static) -> Self {
        Self {
            form: None,
            on_submit: Box::new(on_submit),
            on_form_error: None,
        }
    }

    pub fn with_form(mut self, form: FormSchema) -> Self {
        self.form = Some(form);
        self
    }

    pub fn on_form_error(mut self, f: impl FnMut(Vec<FieldError>) + 'static) -> Self {
        self.on_form_error = Some(Box::new(f));
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Modal {
    Closed,
    Open(Mode),
}

/// What the host loop should do after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrudTableAction {
    None,
    Redraw,
    SelectionChanged,
}

/// Key bindings for the table. Every group is a [`Binding`], matched exactly
/// including modifiers; the help text feeds hint lines in host apps.
#[derive(Clone, Debug)]
pub struct CrudBindings {
    pub cursor_up: Binding,
    pub cursor_down: Binding,
    pub cursor_first: Binding,
    pub cursor_last: Binding,
    pub select: Binding,
    pub add: Binding,
    pub edit: Binding,
    pub delete: Binding,
    pub prev_page: Binding,
    pub next_page: Binding,
    pub first_page: Binding,
    pub last_page: Binding,
    pub cycle_rows_per_page: Binding,
    pub dismiss: Binding,
}

impl Default for CrudBindings {
    fn default() -> Self {
        Self {
            cursor_up: Binding::new(
                "\u{2191}/k",
                "up",
                vec![keymap::key_code(KeyCode::Up), keymap::key_char('k')],
            ),
            cursor_down: Binding::new(
                "\u{2193}/j",
                "down",
                vec![keymap::key_code(KeyCode::Down), keymap::key_char('j')],
            ),
            cursor_first: Binding::new("home", "first row", vec![keymap::key_code(KeyCode::Home)]),
            cursor_last: Binding::new("end", "last row", vec![keymap::key_code(KeyCode::End)]),
            select: Binding::new(
                "enter",
                "select",
                vec![keymap::key_code(KeyCode::Enter), keymap::key_char(' ')],
            ),
            add: Binding::new("a", "add", vec![keymap::key_char('a')]),
            edit: Binding::new("e", "edit", vec![keymap::key_char('e')]),
            delete: Binding::new("d", "delete", vec![keymap::key_char('d')]),
            prev_page: Binding::new(
                "\u{2190}",
                "prev page",
                vec![keymap::key_code(KeyCode::Left)],
            ),
            next_page: Binding::new(
                "\u{2192}",
                "next page",
                vec![keymap::key_code(KeyCode::Right)],
            ),
            first_page: Binding::new("<", "first page", vec![keymap::key_char('<')]),
            last_page: Binding::new(">", "last page", vec![keymap::key_char('>')]),
            cycle_rows_per_page: Binding::new("r", "page size", vec![keymap::key_char('r')]),
            dismiss: Binding::new("esc", "dismiss", vec![keymap::key_code(KeyCode::Esc)]),
        }
    }
}

impl CrudBindings {
    /// "key desc" pairs joined for a one-line hint bar, covering the groups a
    /// read-only host cares about first.
    pub fn help_line(&self) -> String {
        [
            &self.cursor_up,
            &self.cursor_down,
            &self.select,
            &self.add,
            &self.edit,
            &self.delete,
            &self.prev_page,
            &self.next_page,
            &self.cycle_rows_per_page,
        ]
        .iter()
        .map(|b| format!("{} {}", b.help_key, b.help_desc))
        .collect::<Vec<_>>()
        .join(" \u{2022} ")
    }
}

/// Options for [`CrudTableView`].
#[derive(Clone, Debug)]
pub struct CrudTableViewOptions {
    pub show_toolbar: bool,
    pub show_header: bool,
    pub zebra_stripes: bool,
    pub col_gap: u16,
    pub add_marker: String,
    pub edit_marker: String,
    pub delete_marker: String,
    pub modal_width: u16,
}

impl Default for CrudTableViewOptions {
    fn default() -> Self {
        Self {
            show_toolbar: true,
            show_header: true,
            zebra_stripes: false,
            col_gap: 1,
            add_marker: "[+]".to_string(),
            edit_marker: "[e]".to_string(),
            delete_marker: "[d]".to_string(),
            modal_width: 40,
        }
    }
}

/// A declarative CRUD table.
///
/// The widget renders the caller's rows through column descriptors, tracks a
/// cursor and a single id-based selection, and delegates everything with a
/// side effect (submission, deletion, page changes) to caller callbacks.
/// Pagination is a pure pass-through of the supplied descriptor; the caller
/// hands in only the visible page's rows.
///
/// You drive it from your app loop by calling `handle_event` and `render`.
pub struct CrudTableView<R> {
    title: String,
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    id_extractor: IdExtractor<R>,
    pagination: Option<Pagination>,
    on_delete: Option<DeleteFn>,
    add_item: Option<ItemAction>,
    edit_item: Option<ItemAction>,
    options: CrudTableViewOptions,
    bindings: CrudBindings,
    form: Box<dyn SchemaForm>,
    cursor: Option<usize>,
    selected: Option<String>,
    modal: Modal,
    // Last-rendered layout, so mouse events can be mapped back to rows.
    body_area: Rect,
    modal_area: Rect,
}

impl<R: Serialize> Default for CrudTableView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Serialize> CrudTableView<R> {
    /// A table with the built-in form renderer and index-based row ids.
    pub fn new() -> Self {
        Self::with_form_renderer(Box::new(SchemaFormView::new()))
    }

    pub fn with_form_renderer(form: Box<dyn SchemaForm>) -> Self {
        Self {
            title: String::new(),
            rows: Vec::new(),
            columns: Vec::new(),
            id_extractor: Box::new(|_, index| index.to_string()),
            pagination: None,
            on_delete: None,
            add_item: None,
            edit_item: None,
            options: CrudTableViewOptions::default(),
            bindings: CrudBindings::default(),
            form,
            cursor: None,
            selected: None,
            modal: Modal::Closed,
            body_area: Rect::default(),
            modal_area: Rect::default(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the visible rows. The cursor is clamped; the selection is
    /// kept as-is and simply stops matching if its row left the page.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.cursor = clamp_cursor(self.cursor, self.rows.len());
    }

    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.columns = columns;
    }

    pub fn set_id_extractor(&mut self, f: impl Fn(&R, usize) -> String + 'static) {
        self.id_extractor = Box::new(f);
    }

    pub fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    pub fn set_on_delete(&mut self, f: impl FnMut(Value) + 'static) {
        self.on_delete = Some(Box::new(f));
    }

    pub fn set_add_item(&mut self, action: ItemAction) {
        self.add_item = Some(action);
    }

    pub fn set_edit_item(&mut self, action: ItemAction) {
        self.edit_item = Some(action);
    }

    pub fn set_options(&mut self, options: CrudTableViewOptions) {
        self.options = options;
    }

    pub fn set_bindings(&mut self, bindings: CrudBindings) {
        self.bindings = bindings;
    }

    pub fn bindings(&self) -> &CrudBindings {
        &self.bindings
    }

    pub fn options(&self) -> &CrudTableViewOptions {
        &self.options
    }

    pub fn pagination_mut(&mut self) -> Option<&mut Pagination> {
        self.pagination.as_mut()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_row(&self) -> Option<&R> {
        let id = self.selected.as_deref()?;
        self.rows
            .iter()
            .enumerate()
            .find(|(i, r)| (self.id_extractor)(r, *i) == id)
            .map(|(_, r)| r)
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.modal, Modal::Open(_))
    }

    pub fn modal_mode(&self) -> Option<Mode> {
        match self.modal {
            Modal::Open(mode) => Some(mode),
            Modal::Closed => None,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> CrudTableAction {
        match event {
            InputEvent::Key(key) => {
                if self.is_modal_open() {
                    self.handle_modal_key(*key)
                } else {
                    self.handle_table_key(*key)
                }
            }
            InputEvent::Mouse(mouse) => self.handle_mouse(*mouse),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> CrudTableAction {
        // Dismissal hides the modal without firing any callback; the form's
        // in-progress state is discarded, selection stays put.
        if self.bindings.dismiss.matches(&key) {
            self.modal = Modal::Closed;
            return CrudTableAction::Redraw;
        }
        let Modal::Open(mode) = self.modal else {
            return CrudTableAction::None;
        };
        match self.form.handle_event(&InputEvent::Key(key)) {
            FormAction::Submitted(bag) => {
                self.finish_submit(mode, bag);
                self.modal = Modal::Closed;
                CrudTableAction::Redraw
            }
            FormAction::Rejected(errors) => {
                self.finish_error(mode, errors);
                self.modal = Modal::Closed;
                CrudTableAction::Redraw
            }
            FormAction::Redraw => CrudTableAction::Redraw,
            FormAction::None => CrudTableAction::None,
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> CrudTableAction {
        let b_cursor_up = self.bindings.cursor_up.matches(&key);
        let b_cursor_down = self.bindings.cursor_down.matches(&key);
        let b_cursor_first = self.bindings.cursor_first.matches(&key);
        let b_cursor_last = self.bindings.cursor_last.matches(&key);
        if b_cursor_up || b_cursor_down || b_cursor_first || b_cursor_last {
            if self.rows.is_empty() {
                self.cursor = None;
                return CrudTableAction::None;
            }
            let cur = self.cursor.unwrap_or(0);
            let next = if b_cursor_first {
                0
            } else if b_cursor_last {
                self.rows.len() - 1
            } else if b_cursor_down {
                (cur + 1).min(self.rows.len() - 1)
            } else {
                cur.saturating_sub(1)
            };
            let moved = self.cursor != Some(next);
            self.cursor = Some(next);
            return if moved {
                CrudTableAction::Redraw
            } else {
                CrudTableAction::None
            };
        }

        if self.bindings.select.matches(&key) {
            return self.select_row(self.cursor.unwrap_or(0));
        }
        if self.bindings.add.matches(&key) {
            return self.trigger_add();
        }
        if self.bindings.edit.matches(&key) {
            return self.trigger_edit();
        }
        if self.bindings.delete.matches(&key) {
            return self.trigger_delete();
        }

        if self.pagination.is_some() {
            return self.handle_pagination_key(key);
        }
        CrudTableAction::None
    }

    fn handle_pagination_key(&mut self, key: KeyEvent) -> CrudTableAction {
        let Some(p) = self.pagination.as_mut() else {
            return CrudTableAction::None;
        };
        let fired = if self.bindings.prev_page.matches(&key) {
            p.prev_page()
        } else if self.bindings.next_page.matches(&key) {
            p.next_page()
        } else if self.bindings.first_page.matches(&key) {
            p.first_page()
        } else if self.bindings.last_page.matches(&key) {
            p.jump_last_page()
        } else if self.bindings.cycle_rows_per_page.matches(&key) {
            p.cycle_rows_per_page()
        } else {
            false
        };
        if fired {
            CrudTableAction::Redraw
        } else {
            CrudTableAction::None
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> CrudTableAction {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return CrudTableAction::None;
        }
        if self.is_modal_open() {
            // A click on the backdrop dismisses; clicks inside the modal go
            // nowhere (the built-in form is keyboard-driven).
            if !self.modal_area.contains((mouse.x, mouse.y).into()) {
                self.modal = Modal::Closed;
                return CrudTableAction::Redraw;
            }
            return CrudTableAction::None;
        }
        if !self.body_area.contains((mouse.x, mouse.y).into()) {
            return CrudTableAction::None;
        }
        let row = (mouse.y - self.body_area.y) as usize;
        if row >= self.rows.len() {
            return CrudTableAction::None;
        }
        self.cursor = Some(row);
        self.select_row(row)
    }

    /// Makes `index` the sole selection, replacing any previous one.
    fn select_row(&mut self, index: usize) -> CrudTableAction {
        let Some(row) = self.rows.get(index) else {
            return CrudTableAction::None;
        };
        self.selected = Some((self.id_extractor)(row, index));
        CrudTableAction::SelectionChanged
    }

    fn trigger_add(&mut self) -> CrudTableAction {
        if self.add_item.is_none() {
            return CrudTableAction::None;
        }
        let template = self.add_item.as_ref().and_then(|a| a.form.clone());
        match template {
            Some(form) => {
                // Schema goes in verbatim: add pre-populates nothing.
                self.form.open(form);
                self.modal = Modal::Open(Mode::Add);
                CrudTableAction::Redraw
            }
            None => {
                let payload = self.selected_value();
                if let Some(add) = self.add_item.as_mut() {
                    (add.on_submit)(payload);
                }
                CrudTableAction::Redraw
            }
        }
    }

    fn trigger_edit(&mut self) -> CrudTableAction {
        if self.edit_item.is_none() || self.selected_row().is_none() {
            return CrudTableAction::None;
        }
        let template = self.edit_item.as_ref().and_then(|e| e.form.clone());
        match template {
            Some(form) => {
                // A fresh schema per open: defaults come from the selected
                // row, the caller's template is never mutated.
                let schema = schema::with_row_defaults(&form, &self.selected_object());
                self.form.open(schema);
                self.modal = Modal::Open(Mode::Edit);
                CrudTableAction::Redraw
            }
            None => {
                let payload = self.selected_value();
                if let Some(edit) = self.edit_item.as_mut() {
                    (edit.on_submit)(payload);
                }
                CrudTableAction::Redraw
            }
        }
    }

    fn trigger_delete(&mut self) -> CrudTableAction {
        if self.on_delete.is_none() || self.selected_row().is_none() {
            return CrudTableAction::None;
        }
        let payload = self.selected_value();
        if let Some(on_delete) = self.on_delete.as_mut() {
            on_delete(payload);
        }
        CrudTableAction::Redraw
    }

    fn finish_submit(&mut self, mode: Mode, bag: Map<String, Value>) {
        match mode {
            Mode::Add => {
                if let Some(add) = self.add_item.as_mut() {
                    (add.on_submit)(Value::Object(bag));
                }
            }
            Mode::Edit => {
                // Shallow merge: submitted fields override the selected
                // row's, untouched row fields survive.
                let mut merged = self.selected_object();
                for (k, v) in bag {
                    merged.insert(k, v);
                }
                if let Some(edit) = self.edit_item.as_mut() {
                    (edit.on_submit)(Value::Object(merged));
                }
            }
        }
    }

    fn finish_error(&mut self, mode: Mode, errors: Vec<FieldError>) {
        let action = match mode {
            Mode::Add => self.add_item.as_mut(),
            Mode::Edit => self.edit_item.as_mut(),
        };
        if let Some(on_form_error) = action.and_then(|a| a.on_form_error.as_mut()) {
            on_form_error(errors);
        }
    }

    fn selected_value(&self) -> Value {
        self.selected_row()
            .and_then(|r| serde_json::to_value(r).ok())
            .unwrap_or(Value::Null)
    }

    /// The selected row as a JSON object; empty when nothing is selected or
    /// the row does not serialize to an object.
    fn selected_object(&self) -> Map<String, Value> {
        match self.selected_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, theme.text_primary);

        let toolbar_h = u16::from(self.options.show_toolbar).min(area.height);
        let header_h = u16::from(self.options.show_header);
        let footer_h = u16::from(self.pagination.is_some());

        let mut y = area.y;
        if toolbar_h > 0 {
            self.render_toolbar(Rect::new(area.x, y, area.width, 1), buf, theme);
            y += 1;
        }
        if header_h > 0 && y < area.y + area.height {
            self.render_header(Rect::new(area.x, y, area.width, 1), buf, theme);
            y += 1;
        }

        let below = (area.y + area.height).saturating_sub(y);
        let body_h = below.saturating_sub(footer_h);
        self.body_area = Rect::new(area.x, y, area.width, body_h);
        self.render_body(buf, theme);

        if footer_h > 0 && below > 0 {
            let footer = Rect::new(area.x, y + body_h, area.width, 1);
            if let Some(p) = &self.pagination {
                p.render(footer, buf, theme);
            }
        }

        if self.is_modal_open() {
            self.render_modal(area, buf, theme);
        } else {
            self.modal_area = Rect::default();
        }
    }

    fn render_toolbar(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        render::render_line(area, buf, &self.title, theme.header);
        if self.add_item.is_some() {
            let marker = &self.options.add_marker;
            let w = marker.width() as u16;
            if area.width > w {
                buf.set_stringn(
                    area.x + area.width - w,
                    area.y,
                    marker,
                    w as usize,
                    theme.accent,
                );
            }
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        buf.set_style(area, theme.header);
        let mut x = area.x;
        for col in &self.columns {
            let width = col.width.min((area.x + area.width).saturating_sub(x));
            if width == 0 {
                break;
            }
            render::render_cell(buf, x, area.y, width, &col.label, col.align, theme.header);
            x += width + self.options.col_gap;
        }
    }

    fn render_body(&self, buf: &mut Buffer, theme: &Theme) {
        let area = self.body_area;
        for (i, row) in self.rows.iter().enumerate() {
            if i as u16 >= area.height {
                break;
            }
            let y = area.y + i as u16;
            let id = (self.id_extractor)(row, i);
            let is_selected = self.selected.as_deref() == Some(id.as_str());
            let is_cursor = self.cursor == Some(i);

            let base = if is_selected {
                theme.selection
            } else if is_cursor {
                theme.accent
            } else if self.options.zebra_stripes && i % 2 == 1 {
                theme.stripe
            } else {
                theme.text_primary
            };
            buf.set_style(Rect::new(area.x, y, area.width, 1), base);

            let mut x = area.x;
            for (j, col) in self.columns.iter().enumerate() {
                let width = col.width.min((area.x + area.width).saturating_sub(x));
                if width == 0 {
                    break;
                }
                let text = col.display_text(row);
                render::render_cell(buf, x, y, width, &text, col.align, base);
                if j == 0 && is_selected {
                    self.render_row_markers(buf, x, y, width, &text, theme);
                }
                x += width + self.options.col_gap;
            }
        }
    }

    /// Edit/delete affordances, drawn inside the first column's cell of the
    /// selected row, after the cell text.
    fn render_row_markers(
        &self,
        buf: &mut Buffer,
        x: u16,
        y: u16,
        width: u16,
        text: &str,
        theme: &Theme,
    ) {
        let mut mx = x + (text.width() as u16).min(width);
        let end = x + width;
        if self.edit_item.is_some() {
            let marker = format!(" {}", self.options.edit_marker);
            if mx < end {
                buf.set_stringn(mx, y, &marker, (end - mx) as usize, theme.accent);
                mx += marker.width() as u16;
            }
        }
        if self.on_delete.is_some() {
            let marker = format!(" {}", self.options.delete_marker);
            if mx < end {
                buf.set_stringn(mx, y, &marker, (end - mx) as usize, theme.danger);
            }
        }
    }

    fn render_modal(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        // Form lines plus the border rows; centered_rect clamps to the area.
        let form_h = self.form.height().saturating_add(2);
        let rect = render::centered_rect(area, self.options.modal_width, form_h);
        self.modal_area = rect;

        Clear.render(rect, buf);
        buf.set_style(rect, theme.overlay);

        let title = match self.modal {
            Modal::Open(Mode::Add) => "Add Item",
            Modal::Open(Mode::Edit) => "Edit Item",
            Modal::Closed => "",
        };
        let block = ratatui::widgets::Block::bordered().title(title);
        let inner = block.inner(rect);
        block.render(rect, buf);
        self.form.render(inner, buf, theme);
    }
}

fn clamp_cursor(cursor: Option<usize>, rows: usize) -> Option<usize> {
    if rows == 0 {
        return None;
    }
    Some(cursor.unwrap_or(0).min(rows - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_crud_core::schema::FieldSpec;
    use serde::Serialize;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Serialize)]
    struct Dessert {
        id: u64,
        name: String,
        calories: u64,
    }

    fn dessert(id: u64, name: &str, calories: u64) -> Dessert {
        Dessert {
            id,
            name: name.to_string(),
            calories,
        }
    }

    fn columns() -> Vec<Column<Dessert>> {
        vec![
            Column::new("name", "Dessert", 12, |d: &Dessert| json!(d.name)),
            Column::new("calories", "Calories", 8, |d: &Dessert| json!(d.calories)),
        ]
    }

    fn view() -> CrudTableView<Dessert> {
        let mut v = CrudTableView::new();
        v.set_columns(columns());
        v.set_id_extractor(|d: &Dessert, _| d.id.to_string());
        v.set_rows(vec![
            dessert(1, "Cupcake", 305),
            dessert(2, "Donut", 452),
            dessert(3, "Eclair", 262),
        ]);
        v
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code))
    }

    fn ch(c: char) -> InputEvent {
        InputEvent::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    fn edit_schema() -> FormSchema {
        FormSchema::new()
            .property("name", FieldSpec::string("name"))
            .property("calories", FieldSpec::number("calories"))
            .require(["name"])
    }

    #[test]
    fn selecting_another_row_replaces_the_selection() {
        let mut v = view();
        v.handle_event(&key(KeyCode::Enter));
        assert_eq!(v.selected_id(), Some("1"));

        v.handle_event(&key(KeyCode::Down));
        let action = v.handle_event(&key(KeyCode::Enter));
        assert_eq!(action, CrudTableAction::SelectionChanged);
        assert_eq!(v.selected_id(), Some("2"));
    }

    #[test]
    fn home_and_end_jump_the_cursor() {
        let mut v = view();
        v.handle_event(&key(KeyCode::Down));
        v.handle_event(&key(KeyCode::Down));
        assert_eq!(v.cursor(), Some(2));

        let action = v.handle_event(&key(KeyCode::Home));
        assert_eq!(action, CrudTableAction::Redraw);
        assert_eq!(v.cursor(), Some(0));

        let action = v.handle_event(&key(KeyCode::End));
        assert_eq!(action, CrudTableAction::Redraw);
        assert_eq!(v.cursor(), Some(2));

        // Already at the last row; nothing moves.
        assert_eq!(v.handle_event(&key(KeyCode::End)), CrudTableAction::None);
    }

    #[test]
    fn id_collisions_are_indistinguishable() {
        let mut v = view();
        v.set_rows(vec![dessert(7, "Twin", 100), dessert(7, "Twin", 100)]);
        v.handle_event(&key(KeyCode::Down));
        v.handle_event(&key(KeyCode::Enter));
        // Both rows extract id "7"; the first match wins on lookup.
        assert_eq!(v.selected_row().map(|d| d.calories), Some(100));
        assert_eq!(v.selected_id(), Some("7"));
    }

    #[test]
    fn no_form_add_fires_synchronously_without_modal() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = submitted.clone();
        let mut v = view();
        v.set_add_item(ItemAction::new(move |val| sink.borrow_mut().push(val)));

        v.handle_event(&ch('a'));
        assert!(!v.is_modal_open());
        assert_eq!(*submitted.borrow(), vec![Value::Null]);

        v.handle_event(&key(KeyCode::Enter));
        v.handle_event(&ch('a'));
        assert_eq!(submitted.borrow()[1]["name"], json!("Cupcake"));
    }

    #[test]
    fn add_with_form_forwards_bag_unmodified_and_closes() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = submitted.clone();
        let mut v = view();
        v.set_add_item(
            ItemAction::new(move |val| sink.borrow_mut().push(val)).with_form(edit_schema()),
        );

        v.handle_event(&ch('a'));
        assert!(v.is_modal_open());
        assert_eq!(v.modal_mode(), Some(Mode::Add));

        for c in "Oreo".chars() {
            v.handle_event(&ch(c));
        }
        v.handle_event(&key(KeyCode::Tab));
        for c in "437".chars() {
            v.handle_event(&ch(c));
        }
        v.handle_event(&key(KeyCode::Enter));

        assert!(!v.is_modal_open());
        assert_eq!(
            *submitted.borrow(),
            vec![json!({"name": "Oreo", "calories": 437})]
        );
    }

    #[test]
    fn edit_merges_submitted_fields_over_selected_row() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = submitted.clone();
        let mut v = view();
        v.set_edit_item(
            ItemAction::new(move |val| sink.borrow_mut().push(val)).with_form(edit_schema()),
        );

        v.handle_event(&key(KeyCode::Enter)); // select Cupcake
        v.handle_event(&ch('e'));
        assert_eq!(v.modal_mode(), Some(Mode::Edit));

        // Clear the pre-populated name, type a new one, keep calories.
        for _ in 0.."Cupcake".len() {
            v.handle_event(&key(KeyCode::Backspace));
        }
        for c in "Brownie".chars() {
            v.handle_event(&ch(c));
        }
        v.handle_event(&key(KeyCode::Enter));

        assert!(!v.is_modal_open());
        assert_eq!(
            *submitted.borrow(),
            vec![json!({"id": 1, "name": "Brownie", "calories": 305})]
        );
    }

    #[test]
    fn edit_without_selection_is_inert() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = submitted.clone();
        let mut v = view();
        v.set_edit_item(
            ItemAction::new(move |val| sink.borrow_mut().push(val)).with_form(edit_schema()),
        );

        assert_eq!(v.handle_event(&ch('e')), CrudTableAction::None);
        assert!(!v.is_modal_open());
        assert!(submitted.borrow().is_empty());
    }

    #[test]
    fn delete_fires_with_selection_and_leaves_modal_untouched() {
        let deleted = Rc::new(RefCell::new(Vec::new()));
        let sink = deleted.clone();
        let mut v = view();
        v.set_on_delete(move |val| sink.borrow_mut().push(val));

        assert_eq!(v.handle_event(&ch('d')), CrudTableAction::None);

        v.handle_event(&key(KeyCode::Down));
        v.handle_event(&key(KeyCode::Enter));
        v.handle_event(&ch('d'));

        assert!(!v.is_modal_open());
        assert_eq!(
            *deleted.borrow(),
            vec![json!({"id": 2, "name": "Donut", "calories": 452})]
        );
    }

    #[test]
    fn rejected_submission_routes_errors_and_closes() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let errors = Rc::new(RefCell::new(Vec::new()));
        let submit_sink = submitted.clone();
        let error_sink = errors.clone();
        let mut v = view();
        v.set_add_item(
            ItemAction::new(move |val| submit_sink.borrow_mut().push(val))
                .with_form(edit_schema())
                .on_form_error(move |e| error_sink.borrow_mut().push(e)),
        );

        v.handle_event(&ch('a'));
        v.handle_event(&key(KeyCode::Enter)); // required "name" empty

        assert!(!v.is_modal_open());
        assert!(submitted.borrow().is_empty());
        assert_eq!(
            errors.borrow().as_slice(),
            &[vec![FieldError::new("name", "is a required property")]]
        );
    }

    #[test]
    fn dismiss_hides_modal_without_callbacks() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = submitted.clone();
        let mut v = view();
        v.set_add_item(
            ItemAction::new(move |val| sink.borrow_mut().push(val)).with_form(edit_schema()),
        );

        v.handle_event(&key(KeyCode::Enter));
        v.handle_event(&ch('a'));
        assert!(v.is_modal_open());

        v.handle_event(&key(KeyCode::Esc));
        assert!(!v.is_modal_open());
        assert!(submitted.borrow().is_empty());
        // Selection persists across the open/close cycle.
        assert_eq!(v.selected_id(), Some("1"));
    }

    #[test]
    fn second_open_supersedes_prior_transient_state() {
        let submitted = Rc::new(RefCell::new(Vec::new()));
        let sink = submitted.clone();
        let mut v = view();
        v.set_edit_item(
            ItemAction::new(move |val| sink.borrow_mut().push(val)).with_form(edit_schema()),
        );

        v.handle_event(&key(KeyCode::Enter)); // select Cupcake
        v.handle_event(&ch('e'));
        v.handle_event(&key(KeyCode::Esc));

        v.handle_event(&key(KeyCode::Down));
        v.handle_event(&key(KeyCode::Enter)); // select Donut
        v.handle_event(&ch('e'));
        v.handle_event(&key(KeyCode::Enter)); // submit defaults verbatim

        assert_eq!(submitted.borrow()[0]["name"], json!("Donut"));
        assert_eq!(submitted.borrow()[0]["calories"], json!(452));
    }

    #[test]
    fn pagination_keys_pass_through() {
        let pages = Rc::new(RefCell::new(Vec::new()));
        let sink = pages.clone();
        let mut v = view();
        v.set_pagination(Some(
            Pagination::new(1, 10, 30)
                .options([10, 25])
                .on_page_change(move |p| sink.borrow_mut().push(p)),
        ));

        v.handle_event(&key(KeyCode::Right));
        assert_eq!(*pages.borrow(), vec![2]);
        v.handle_event(&key(KeyCode::Left));
        assert_eq!(*pages.borrow(), vec![2, 0]);
    }

    #[test]
    fn mouse_click_selects_the_hit_row() {
        let mut v = view();
        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 8));
        v.render(Rect::new(0, 0, 30, 8), &mut buf, &theme);

        let click = InputEvent::Mouse(MouseEvent {
            x: 3,
            y: 3, // toolbar + header above the body
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: Default::default(),
        });
        assert_eq!(v.handle_event(&click), CrudTableAction::SelectionChanged);
        assert_eq!(v.selected_id(), Some("2"));
    }

    #[test]
    fn markers_render_only_in_selected_rows_first_cell() {
        let mut v = view();
        v.set_edit_item(ItemAction::new(|_| {}));
        v.set_on_delete(|_| {});
        v.handle_event(&key(KeyCode::Enter)); // select Cupcake (row 0)

        let theme = Theme::default();
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 8));
        v.render(Rect::new(0, 0, 30, 8), &mut buf, &theme);

        let line = |y: u16| -> String {
            (0..30)
                .map(|x| buf[(x, y)].symbol().chars().next().unwrap_or(' '))
                .collect()
        };
        assert!(line(2).contains("Cupcake [e]"));
        assert!(!line(3).contains("[e]"));
    }
}
