use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Modifier;
use tui::widgets::Widget;

use crate::ui::theme::{Palette, Theme, resolve};
use crate::view::stadiums::TimeSlotView;

/// Columns taken by one slot chip, including the gap after it.
pub const CHIP_WIDTH: u16 = 9;

/// Time slots as a wrapping row of chips. Booked slots are dimmed and struck
/// through; the cursor slot is highlighted whether or not it is free.
pub struct SlotGrid<'a> {
    pub slots: &'a [TimeSlotView],
    pub theme: Theme,
}

impl SlotGrid<'_> {
    pub fn columns(width: u16) -> u16 {
        (width / CHIP_WIDTH).max(1)
    }

    /// Rows needed to show every slot at `width`.
    pub fn height(&self, width: u16) -> u16 {
        let cols = Self::columns(width) as usize;
        self.slots.len().div_ceil(cols) as u16
    }
}

impl Widget for SlotGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < CHIP_WIDTH || area.height == 0 {
            return;
        }
        if self.slots.is_empty() {
            buf.set_string(area.x, area.y, "No slots listed", resolve(Palette::Dim, self.theme));
            return;
        }

        let cols = Self::columns(area.width);
        for (idx, slot) in self.slots.iter().enumerate() {
            let row = idx as u16 / cols;
            if row >= area.height {
                break;
            }
            let x = area.x + (idx as u16 % cols) * CHIP_WIDTH;
            let y = area.y + row;
            let style = match (slot.selected, slot.available) {
                (true, _) => resolve(Palette::Highlight, self.theme),
                (false, true) => resolve(Palette::Success, self.theme),
                (false, false) => resolve(Palette::Dim, self.theme).add_modifier(Modifier::CROSSED_OUT),
            };
            let label: String = slot.label.chars().take(CHIP_WIDTH as usize - 3).collect();
            buf.set_string(x, y, format!(" {label:<5} "), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(label: &str, available: bool, selected: bool) -> TimeSlotView {
        TimeSlotView { label: label.into(), available, selected }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn wraps_onto_next_row() {
        let slots = [slot("09:00", true, false), slot("11:00", false, false), slot("13:00", true, true)];
        let grid = SlotGrid { slots: &slots, theme: Theme::Dark };
        assert_eq!(grid.height(20), 2);

        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        SlotGrid { slots: &slots, theme: Theme::Dark }.render(area, &mut buf);
        assert!(row_text(&buf, 0).starts_with(" 09:00   11:00 "));
        assert!(row_text(&buf, 1).starts_with(" 13:00 "));
    }

    #[test]
    fn booked_slot_is_struck_through() {
        let slots = [slot("09:00", false, false)];
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        SlotGrid { slots: &slots, theme: Theme::Light }.render(area, &mut buf);
        assert!(buf[(1, 0)].modifier.contains(Modifier::CROSSED_OUT));
    }
}
