use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub stats_area: Rect,
    pub form_area: Rect,
    pub entries_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application.
    /// Height: 3 stats + 12 form + 3 entries + 1 status
    pub const MIN_WIDTH: u16 = 48;
    pub const MIN_HEIGHT: u16 = 19;

    /// Height the entry form wants when there is room for it
    pub const FORM_HEIGHT: u16 = 17;

    pub fn calculate(size: Rect, form_open: bool) -> Self {
        let min_width_with_border = Self::MIN_WIDTH + 2;
        let min_height_with_border = Self::MIN_HEIGHT + 2;
        let width = size.width.max(min_width_with_border);
        let height = size.height.max(min_height_with_border);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let form_height = if form_open {
            // Leave the entries list at least 3 lines
            Self::FORM_HEIGHT.min(inner_area.height.saturating_sub(3 + 3 + 1))
        } else {
            0
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),           // Stats cards
                Constraint::Length(form_height), // Entry form
                Constraint::Min(3),              // Entries
                Constraint::Length(1),           // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            stats_area: vertical[0],
            form_area: vertical[1],
            entries_area: vertical[2],
            status_area: vertical[3],
        }
    }
}
