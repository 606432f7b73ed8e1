use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = split_vertical(
        r,
        &[
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ],
    );
    let horizontal = split_horizontal(
        vertical[1],
        &[
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ],
    );
    horizontal[1]
}

pub fn split_vertical(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints.to_vec())
        .split(area)
        .to_vec()
}

pub fn split_horizontal(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints.to_vec())
        .split(area)
        .to_vec()
}

/// Keep `selected` inside the window `[offset, offset + capacity)`.
pub fn scroll_into_view(selected: usize, offset: &mut usize, capacity: usize) {
    let capacity = capacity.max(1);
    if selected < *offset {
        *offset = selected;
    } else if selected >= *offset + capacity {
        *offset = selected + 1 - capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolls_down_and_up() {
        let mut offset = 0;
        scroll_into_view(12, &mut offset, 10);
        assert_eq!(offset, 3);
        scroll_into_view(1, &mut offset, 10);
        assert_eq!(offset, 1);
        scroll_into_view(5, &mut offset, 10);
        assert_eq!(offset, 1);
    }

    #[test]
    fn centered_rect_stays_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 50, parent);
        assert!(inner.x >= parent.x && inner.right() <= parent.right());
        assert!(inner.y >= parent.y && inner.bottom() <= parent.bottom());
        assert!((58..=60).contains(&inner.width), "width {}", inner.width);
    }
}
