//! `ratatui-crud-core` provides the building blocks behind the `ratatui-crud`
//! table widget.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: the host app drives input + rendering.
//! - No async runtime: everything runs on the main thread.
//! - Persistence and validation side effects stay with the caller: widgets
//!   forward form submissions and errors through caller-supplied callbacks
//!   instead of owning any storage.
//!
//! Most users should depend on the facade crate `ratatui-crud`. Use this
//! crate directly if you only need the primitives, e.g. to build your own
//! form renderer against the [`form::SchemaForm`] trait.
//!
//! Useful entry points:
//! - [`schema::FormSchema`]: declarative description of an editable form.
//! - [`schema::with_row_defaults`]: pre-populate a schema from a row's
//!   current values without touching the template.
//! - [`form::SchemaForm`]: the contract a schema-driven form renderer
//!   implements.
pub mod theme;

pub mod form;
pub mod input;
pub mod keymap;
pub mod render;
pub mod schema;
