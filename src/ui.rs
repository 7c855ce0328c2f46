//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to the
//! visible area.
//!
//! Windows may hang partly off screen, so their rectangles routinely drift
//! outside the terminal buffer. Everything that draws goes through this type
//! (or through the free helpers below) so out-of-range writes are clipped
//! instead of panicking inside `Buffer`.
use crate::window::FloatRect;
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    ///
    /// Window content is drawn into an offscreen buffer at its logical size
    /// before being composited onto the terminal, and tests draw into plain
    /// buffers the same way.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        let clipped = area.intersection(self.area);
        if clipped.width > 0 && clipped.height > 0 {
            widget.render(clipped, self.buffer);
        }
    }

    /// Copy `src` (whose area starts at 0,0) to a possibly negative
    /// destination, skipping cells outside `clip` and the frame.
    pub fn blit_from_signed(&mut self, src: &Buffer, dest: FloatRect, clip: Rect) {
        let bounds = clip.intersection(self.area);
        let x0 = i32::from(bounds.x);
        let y0 = i32::from(bounds.y);
        let x1 = x0 + i32::from(bounds.width);
        let y1 = y0 + i32::from(bounds.height);
        for sy in 0..i32::from(dest.height) {
            let dy = dest.y + sy;
            if dy < y0 || dy >= y1 {
                continue;
            }
            for sx in 0..i32::from(dest.width) {
                let dx = dest.x + sx;
                if dx < x0 || dx >= x1 {
                    continue;
                }
                if let (Some(src_cell), Some(dst_cell)) = (
                    src.cell((sx as u16, sy as u16)),
                    self.buffer.cell_mut((dx as u16, dy as u16)),
                ) {
                    *dst_cell = src_cell.clone();
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    let bounds = bounds.intersection(buffer.area);
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Paint every cell of `area` (clipped to the buffer) blank with `style`.
pub(crate) fn fill(buffer: &mut Buffer, area: Rect, style: Style) {
    let area = area.intersection(buffer.area);
    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(area: Rect, symbol: &str) -> Buffer {
        let mut buffer = Buffer::empty(area);
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                }
            }
        }
        buffer
    }

    #[test]
    fn blit_from_signed_clips_negative_offsets() {
        let frame_area = Rect::new(0, 0, 4, 2);
        let mut dest = Buffer::empty(frame_area);
        let mut frame = UiFrame::from_parts(frame_area, &mut dest);
        let src = filled(Rect::new(0, 0, 3, 2), "#");
        frame.blit_from_signed(&src, FloatRect::new(-1, 0, 3, 2), frame_area);
        let buffer = frame.buffer();
        assert_eq!(buffer.cell((0, 0)).unwrap().symbol(), "#");
        assert_eq!(buffer.cell((1, 0)).unwrap().symbol(), "#");
        assert_eq!(buffer.cell((2, 0)).unwrap().symbol(), " ");
    }

    #[test]
    fn blit_from_signed_respects_clip() {
        let frame_area = Rect::new(0, 0, 4, 4);
        let mut dest = Buffer::empty(frame_area);
        let mut frame = UiFrame::from_parts(frame_area, &mut dest);
        let src = filled(Rect::new(0, 0, 4, 4), "#");
        frame.blit_from_signed(&src, FloatRect::new(0, 0, 4, 4), Rect::new(0, 0, 4, 3));
        let buffer = frame.buffer();
        assert_eq!(buffer.cell((3, 2)).unwrap().symbol(), "#");
        assert_eq!(buffer.cell((0, 3)).unwrap().symbol(), " ");
    }

    #[test]
    fn blit_from_signed_ignores_non_overlapping() {
        let frame_area = Rect::new(0, 0, 3, 3);
        let mut dest = Buffer::empty(frame_area);
        let mut frame = UiFrame::from_parts(frame_area, &mut dest);
        let src = filled(Rect::new(0, 0, 2, 2), "#");
        frame.blit_from_signed(&src, FloatRect::new(-5, -5, 2, 2), frame_area);
        assert_eq!(frame.buffer(), &Buffer::empty(frame_area));
    }

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 7, 0, "hello", Style::default());
        assert_eq!(buf.cell((7, 0)).unwrap().symbol(), "h");
        assert_eq!(buf.cell((9, 0)).unwrap().symbol(), "l");
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
    }

    #[test]
    fn render_widget_clips_to_frame_area() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);

        struct FillWidget;
        impl Widget for FillWidget {
            fn render(self, area: Rect, buf: &mut Buffer) {
                fill(buf, area, Style::default());
                for y in area.y..area.y + area.height {
                    for x in area.x..area.x + area.width {
                        if let Some(cell) = buf.cell_mut((x, y)) {
                            cell.set_symbol("A");
                        }
                    }
                }
            }
        }

        ui.render_widget(FillWidget, Rect::new(3, 1, 5, 2));
        assert_eq!(buf.cell((3, 1)).unwrap().symbol(), "A");
        assert_eq!(buf.cell((2, 1)).unwrap().symbol(), " ");
    }

    #[test]
    fn rect_contains_uses_half_open_edges() {
        let rect = Rect::new(2, 2, 3, 1);
        assert!(rect_contains(rect, 2, 2));
        assert!(rect_contains(rect, 4, 2));
        assert!(!rect_contains(rect, 5, 2));
        assert!(!rect_contains(rect, 2, 3));
    }
}
