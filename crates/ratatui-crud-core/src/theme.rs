use ratatui::style::Style;

/// Explicit style configuration for the table widget and its modal.
///
/// There is no ambient styling registry: the host constructs one `Theme`
/// (or uses the default) and passes it into `render` each frame.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub header: Style,
    pub selection: Style,
    pub stripe: Style,
    pub overlay: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Modifier;
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            header: Style::default().add_modifier(Modifier::BOLD),
            selection: Style::default().add_modifier(Modifier::REVERSED),
            stripe: Style::default().on_dark_gray(),
            overlay: Style::default(),
        }
    }
}
