//! The nutrition table demo: a paginated dessert list with add/edit/delete
//! wired to an in-memory Vec. Run with `--features crossterm`.

use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui_crud::column::Column;
use ratatui_crud::input::InputEvent;
use ratatui_crud::input::KeyCode;
use ratatui_crud::input::input_event_from_crossterm;
use ratatui_crud::pagination::Pagination;
use ratatui_crud::schema::FieldSpec;
use ratatui_crud::schema::FormSchema;
use ratatui_crud::table::view::CrudTableView;
use ratatui_crud::table::view::CrudTableViewOptions;
use ratatui_crud::table::view::ItemAction;
use ratatui_crud::theme::Theme;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Dessert {
    id: u64,
    name: String,
    calories: f64,
    fat: f64,
    carbs: f64,
    protein: f64,
    cost: u64,
}

fn dessert(id: u64, name: &str, calories: f64, fat: f64, carbs: f64, protein: f64) -> Dessert {
    Dessert {
        id,
        name: name.to_string(),
        calories,
        fat,
        carbs,
        protein,
        cost: 1000,
    }
}

struct AppState {
    data: Vec<Dessert>,
    page: usize,
    rows_per_page: usize,
}

impl AppState {
    fn visible(&self) -> Vec<Dessert> {
        self.data
            .iter()
            .skip(self.page * self.rows_per_page)
            .take(self.rows_per_page)
            .cloned()
            .collect()
    }
}

fn seed() -> Vec<Dessert> {
    vec![
        dessert(1, "Cupcake", 305.0, 3.7, 67.0, 4.3),
        dessert(2, "Donut", 452.0, 25.0, 51.0, 4.9),
        dessert(3, "Eclair", 262.0, 16.0, 24.0, 6.0),
        dessert(4, "Frozen yoghurt", 159.0, 6.0, 24.0, 4.0),
        dessert(5, "Gingerbread", 356.0, 16.0, 49.0, 3.9),
        dessert(6, "Honeycomb", 408.0, 3.2, 87.0, 6.5),
        dessert(7, "Ice cream sandwich", 237.0, 9.0, 37.0, 4.3),
        dessert(8, "Jelly Bean", 375.0, 0.0, 94.0, 0.0),
        dessert(9, "KitKat", 518.0, 26.0, 65.0, 7.0),
        dessert(10, "Lollipop", 392.0, 0.2, 98.0, 0.0),
        dessert(11, "Marshmallow", 318.0, 0.0, 81.0, 2.0),
        dessert(12, "Nougat", 360.0, 19.0, 9.0, 37.0),
        dessert(13, "Oreo", 437.0, 18.0, 63.0, 4.0),
    ]
}

fn item_form() -> FormSchema {
    FormSchema::new()
        .property("name", FieldSpec::string("name"))
        .property("calories", FieldSpec::number("calories"))
        .property("fat", FieldSpec::number("fat"))
        .property("carbs", FieldSpec::number("carbs"))
        .property("protein", FieldSpec::number("protein"))
        .property(
            "gluten",
            FieldSpec::string("Gluten Free").with_enum(["Yes", "No"]),
        )
        .require(["name", "calories", "fat", "carbs", "protein"])
}

fn number_col(key: &str, label: &str, accessor: impl Fn(&Dessert) -> f64 + 'static) -> Column<Dessert> {
    Column::new(key, label, 8, move |d: &Dessert| json!(accessor(d))).align(Alignment::Right)
}

fn build_view(state: &Rc<RefCell<AppState>>) -> CrudTableView<Dessert> {
    let mut view = CrudTableView::new();
    view.set_title("Nutrition");
    view.set_options(CrudTableViewOptions {
        zebra_stripes: true,
        ..Default::default()
    });
    view.set_id_extractor(|d: &Dessert, _| d.id.to_string());
    view.set_columns(vec![
        Column::new("name", "Dessert", 20, |d: &Dessert| json!(d.name)),
        number_col("calories", "Calories", |d| d.calories),
        number_col("fat", "fat", |d| d.fat),
        number_col("carbs", "carbs", |d| d.carbs),
        number_col("protein", "protein", |d| d.protein),
        Column::new("cost", "Cost", 8, |d: &Dessert| json!(d.cost))
            .align(Alignment::Right)
            .format(|v| format!("${}", v.as_u64().unwrap_or(0))),
    ]);

    let s = state.clone();
    view.set_on_delete(move |item: Value| {
        let id = item["id"].as_u64().unwrap_or(0);
        s.borrow_mut().data.retain(|d| d.id != id);
    });

    let s = state.clone();
    view.set_add_item(
        ItemAction::new(move |item: Value| {
            let mut s = s.borrow_mut();
            let mut row: Dessert = serde_json::from_value(item).unwrap_or_default();
            row.id = s.data.iter().map(|d| d.id).max().unwrap_or(0) + 1;
            row.cost = 1000;
            s.data.push(row);
        })
        .with_form(item_form()),
    );

    let s = state.clone();
    view.set_edit_item(
        ItemAction::new(move |item: Value| {
            let mut s = s.borrow_mut();
            let row: Dessert = match serde_json::from_value(item) {
                Ok(row) => row,
                Err(_) => return,
            };
            if let Some(slot) = s.data.iter_mut().find(|d| d.id == row.id) {
                *slot = row;
            }
        })
        .with_form(item_form()),
    );

    view
}

fn sync_pagination(view: &mut CrudTableView<Dessert>, state: &Rc<RefCell<AppState>>) {
    let (page, rows_per_page, total) = {
        let s = state.borrow();
        (s.page, s.rows_per_page, s.data.len())
    };
    let on_page = state.clone();
    let on_size = state.clone();
    view.set_pagination(Some(
        Pagination::new(page, rows_per_page, total)
            .options([5, 10, 25])
            .on_page_change(move |p| on_page.borrow_mut().page = p)
            .on_rows_per_page_change(move |size| {
                let mut s = on_size.borrow_mut();
                s.rows_per_page = size;
                s.page = 0;
            }),
    ));
}

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let state = Rc::new(RefCell::new(AppState {
        data: seed(),
        page: 0,
        rows_per_page: 10,
    }));
    let mut view = build_view(&state);

    let res = run(&mut terminal, &state, &mut view);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &Rc<RefCell<AppState>>,
    view: &mut CrudTableView<Dessert>,
) -> io::Result<()> {
    let theme = Theme::default();

    loop {
        view.set_rows(state.borrow().visible());
        sync_pagination(view, state);

        terminal.draw(|f| {
            let area = f.area();
            let buf = f.buffer_mut();
            let table_area = Rect::new(
                area.x,
                area.y,
                area.width,
                area.height.saturating_sub(1),
            );
            view.render(table_area, buf, &theme);

            let hints = format!("{} \u{2022} q quit", view.bindings().help_line());
            let span = Span::styled(hints, theme.text_muted);
            buf.set_span(area.x, area.y + table_area.height, &span, area.width);
        })?;

        if crossterm::event::poll(Duration::from_millis(50))? {
            let ev = crossterm::event::read()?;
            if let Some(input) = input_event_from_crossterm(ev) {
                if let InputEvent::Key(key) = input {
                    if key.code == KeyCode::Char('q') && !view.is_modal_open() {
                        return Ok(());
                    }
                }
                view.handle_event(&input);
            }
        }
    }
}
