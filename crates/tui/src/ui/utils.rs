//! Layout helpers shared by the components.

use ratatui::prelude::*;

/// Center a `width` x `height` box inside `r`, shrinking it to fit.
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fixed_clamps_to_parent() {
        let parent = Rect::new(10, 5, 20, 6);
        assert_eq!(centered_fixed(8, 2, parent), Rect::new(16, 7, 8, 2));
        assert_eq!(centered_fixed(50, 50, parent), parent);
    }
}
