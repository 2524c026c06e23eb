use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Browser layout
pub struct AppLayout {
    pub input_area: Rect,
    pub facets_area: Rect,
    pub results_area: Rect,
    pub preview_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create the browser layout:
    /// - Query input: top, 3 rows (bordered)
    /// - Facet panel: 25% width (left)
    /// - Results table: 45% width (middle)
    /// - Preview pane: 30% width (right)
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query input
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(45),
                Constraint::Percentage(30),
            ])
            .split(vertical_chunks[1]);

        Self {
            input_area: vertical_chunks[0],
            facets_area: horizontal_chunks[0],
            results_area: horizontal_chunks[1],
            preview_area: horizontal_chunks[2],
            status_area: vertical_chunks[2],
        }
    }
}
