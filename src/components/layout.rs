//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Dashboard screen areas
pub struct DashboardLayout {
    pub datasets: Rect,
    pub upload: Rect,
    pub preview: Rect,
    pub ask: Rect,
    pub answer: Rect,
    pub history: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Full-screen overlay inset by `margin` on every side
pub fn inset(area: Rect, margin: u16) -> Rect {
    Rect::new(
        area.x + margin.min(area.width / 2),
        area.y + margin.min(area.height / 2),
        area.width.saturating_sub(margin * 2),
        area.height.saturating_sub(margin * 2),
    )
}

/// Calculate the dashboard layout
pub fn calculate_dashboard_layout(area: Rect) -> DashboardLayout {
    // Content + status line + help bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(main_chunks[0]);

    // Left: dataset list above the upload input
    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(horizontal_chunks[0]);

    // Right: preview, question input, answer, history
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Percentage(25),
        ])
        .split(horizontal_chunks[1]);

    DashboardLayout {
        datasets: left_chunks[0],
        upload: left_chunks[1],
        preview: right_chunks[0],
        ask: right_chunks[1],
        answer: right_chunks[2],
        history: right_chunks[3],
        status: main_chunks[1],
        help: main_chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_popup(area, 40, 10);
        assert_eq!(popup, Rect::new(30, 15, 40, 10));

        // Never larger than the screen
        let small = centered_popup(Rect::new(0, 0, 20, 5), 40, 10);
        assert_eq!(small.width, 20);
        assert_eq!(small.height, 5);
    }

    #[test]
    fn test_dashboard_layout_covers_screen() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = calculate_dashboard_layout(area);

        assert_eq!(layout.help.y, 39);
        assert_eq!(layout.status.y, 38);
        assert_eq!(layout.upload.height, 3);
        assert_eq!(layout.ask.height, 3);
        assert!(layout.datasets.x < layout.preview.x);
        assert!(layout.preview.y < layout.ask.y);
        assert!(layout.answer.y < layout.history.y);
    }
}
