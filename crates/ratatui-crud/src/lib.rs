//! `ratatui-crud` renders a caller-supplied slice of rows as a table with
//! inline create/edit/delete affordances and delegated pagination.
//!
//! The host app owns the data and the event loop: it feeds
//! [`input::InputEvent`]s to [`table::view::CrudTableView::handle_event`] and
//! calls `render` each frame. Row selection reveals edit/delete affordances;
//! add/edit actions either fire their callback directly or open a modal
//! backed by a [`schema::FormSchema`] and a [`form::SchemaForm`] renderer.
//!
//! See `examples/nutrition.rs` for a complete crossterm host.
pub use ratatui_crud_core::form;
pub use ratatui_crud_core::input;
pub use ratatui_crud_core::keymap;
pub use ratatui_crud_core::render;
pub use ratatui_crud_core::schema;
pub use ratatui_crud_core::theme;

pub mod column;
pub mod form_view;
pub mod pagination;
pub mod table;
