use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Truncates `input` to at most `max_cols` display columns.
///
/// A wide character that would straddle the boundary is dropped rather than
/// split, so the result can be narrower than `max_cols` by one column.
pub fn truncate_to_cols(input: &str, max_cols: u16) -> &str {
    let max_cols = max_cols as usize;
    let mut cols = 0usize;
    for (i, ch) in input.char_indices() {
        let w = ch.width().unwrap_or(0);
        if cols + w > max_cols {
            return &input[..i];
        }
        cols += w;
    }
    input
}

/// Writes one table cell: the text truncated to the cell width and positioned
/// per `align` inside it. The cell background is not touched beyond the text.
pub fn render_cell(
    buf: &mut Buffer,
    x: u16,
    y: u16,
    width: u16,
    text: &str,
    align: Alignment,
    style: Style,
) {
    if width == 0 {
        return;
    }
    let text = truncate_to_cols(text, width);
    let text_w = text.width().min(width as usize) as u16;
    let dx = match align {
        Alignment::Left => 0,
        Alignment::Center => (width - text_w) / 2,
        Alignment::Right => width - text_w,
    };
    buf.set_stringn(x + dx, y, text, width as usize, style);
}

/// Fills a one-line area with `style`, then writes `text` left-aligned.
pub fn render_line(area: Rect, buf: &mut Buffer, text: &str, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    buf.set_style(Rect::new(area.x, area.y, area.width, 1), style);
    buf.set_stringn(
        area.x,
        area.y,
        truncate_to_cols(text, area.width),
        area.width as usize,
        style,
    );
}

/// Centers a `w` x `h` rectangle inside `area`, clamping to its bounds.
pub fn centered_rect(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width);
    let h = h.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}
