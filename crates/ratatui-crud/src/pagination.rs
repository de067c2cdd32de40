use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_crud_core::theme::Theme;

pub type PageChangeFn = Box<dyn FnMut(usize)>;
pub type RowsPerPageChangeFn = Box<dyn FnMut(usize)>;

/// Caller-owned pagination descriptor.
///
/// The widget is a pure pass-through: it renders whatever the descriptor
/// says and forwards page / page-size changes to the callbacks. It never
/// slices data, retains no page state of its own, and does not validate the
/// descriptor; an inconsistent one renders as-is.
pub struct Pagination {
    pub page: usize,
    pub rows_per_page: usize,
    pub total_elements: usize,
    pub rows_per_page_options: Vec<usize>,
    on_page_change: PageChangeFn,
    on_rows_per_page_change: RowsPerPageChangeFn,
}

impl Pagination {
    pub fn new(page: usize, rows_per_page: usize, total_elements: usize) -> Self {
        Self {
            page,
            rows_per_page,
            total_elements,
            rows_per_page_options: Vec::new(),
            on_page_change: Box::new(|_| {}),
            on_rows_per_page_change: Box::new(|_| {}),
        }
    }

    pub fn options(mut self, options: impl IntoIterator<Item = usize>) -> Self {
        self.rows_per_page_options = options.into_iter().collect();
        self
    }

    pub fn on_page_change(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_page_change = Box::new(f);
        self
    }

    pub fn on_rows_per_page_change(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_rows_per_page_change = Box::new(f);
        self
    }

    /// Index of the last page implied by the descriptor.
    pub fn last_page(&self) -> usize {
        if self.rows_per_page == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.rows_per_page).saturating_sub(1)
    }

    /// Fires `on_page_change(page + 1)` unless already on the last page.
    /// Returns whether the callback fired.
    pub fn next_page(&mut self) -> bool {
        if self.page >= self.last_page() {
            return false;
        }
        (self.on_page_change)(self.page + 1);
        true
    }

    /// Fires `on_page_change(page - 1)` unless already on page 0.
    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        (self.on_page_change)(self.page - 1);
        true
    }

    pub fn first_page(&mut self) -> bool {
        (self.on_page_change)(0);
        true
    }

    pub fn jump_last_page(&mut self) -> bool {
        let last = self.last_page();
        (self.on_page_change)(last);
        true
    }

    /// Fires `on_rows_per_page_change` with the option after the current
    /// size, wrapping around. A size not in the list starts from the first
    /// option. Returns `false` when no options were configured.
    pub fn cycle_rows_per_page(&mut self) -> bool {
        if self.rows_per_page_options.is_empty() {
            return false;
        }
        let next = match self
            .rows_per_page_options
            .iter()
            .position(|&o| o == self.rows_per_page)
        {
            Some(i) => self.rows_per_page_options[(i + 1) % self.rows_per_page_options.len()],
            None => self.rows_per_page_options[0],
        };
        (self.on_rows_per_page_change)(next);
        true
    }

    /// The "from-to of total" label, straight from the descriptor.
    pub fn range_label(&self) -> String {
        if self.total_elements == 0 {
            return "0-0 of 0".to_string();
        }
        let from = self.page * self.rows_per_page + 1;
        let to = ((self.page + 1) * self.rows_per_page).min(self.total_elements);
        format!("{from}-{to} of {}", self.total_elements)
    }

    /// Renders the footer line: page size, range, and paging affordances.
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(Rect::new(area.x, area.y, area.width, 1), theme.text_muted);

        let label = format!(
            "Rows per page: {}   {}   ",
            self.rows_per_page,
            self.range_label()
        );
        buf.set_stringn(area.x, area.y, &label, area.width as usize, theme.text_muted);

        let arrows = "|< \u{2039} \u{203a} >|";
        let x = area.x + (label.len() as u16).min(area.width);
        if x < area.x + area.width {
            buf.set_stringn(
                x,
                area.y,
                arrows,
                (area.x + area.width - x) as usize,
                theme.accent,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(page: usize, rows_per_page: usize, total: usize) -> (Pagination, Rc<RefCell<Vec<usize>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let p = Pagination::new(page, rows_per_page, total)
            .on_page_change(move |page| sink.borrow_mut().push(page));
        (p, calls)
    }

    #[test]
    fn next_page_forwards_target_index() {
        let (mut p, calls) = recorded(1, 10, 25);
        assert!(p.next_page());
        assert_eq!(*calls.borrow(), vec![2]);
    }

    #[test]
    fn boundary_pages_do_not_fire() {
        let (mut p, calls) = recorded(0, 10, 25);
        assert!(!p.prev_page());
        let (mut q, more) = recorded(2, 10, 25);
        assert!(!q.next_page());
        assert!(calls.borrow().is_empty());
        assert!(more.borrow().is_empty());
    }

    #[test]
    fn first_and_last_always_fire() {
        let (mut p, calls) = recorded(1, 10, 25);
        p.first_page();
        p.jump_last_page();
        assert_eq!(*calls.borrow(), vec![0, 2]);
    }

    #[test]
    fn cycle_wraps_through_options() {
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let sink = sizes.clone();
        let mut p = Pagination::new(0, 50, 100)
            .options([10, 25, 50])
            .on_rows_per_page_change(move |s| sink.borrow_mut().push(s));
        assert!(p.cycle_rows_per_page());
        assert_eq!(*sizes.borrow(), vec![10]);
    }

    #[test]
    fn range_label_tracks_descriptor_verbatim() {
        let p = Pagination::new(1, 10, 13);
        assert_eq!(p.range_label(), "11-13 of 13");
        // Inconsistent descriptors are the caller's problem and render as-is.
        let p = Pagination::new(5, 10, 13);
        assert_eq!(p.range_label(), "51-13 of 13");
    }
}
