use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::widgets::Widget;

use crate::state::forms::{CANCEL, FieldKind, FormState, SUBMIT};
use crate::ui::theme::{Palette, Theme, resolve};

const LABEL_WIDTH: usize = 22;

/// One row per field, then the submit and cancel buttons. The focused row is
/// highlighted; a focused select shows its arrows.
pub struct FormView<'a> {
    pub form: &'a FormState,
    pub focused: Option<&'a str>,
    pub submit_label: &'a str,
    pub theme: Theme,
}

impl FormView<'_> {
    /// Rows the form needs: fields, a blank line, the buttons.
    pub fn height(&self) -> u16 {
        self.form.fields.len() as u16 + 2
    }

    fn is_focused(&self, key: &str) -> bool {
        self.focused.and_then(|id| self.form.key_for(id)) == Some(key)
    }
}

impl Widget for FormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = resolve(Palette::Text, self.theme);
        let dim = resolve(Palette::Dim, self.theme);
        let highlight = resolve(Palette::Highlight, self.theme);
        let width = area.width as usize;

        for (row, field) in self.form.fields.iter().enumerate() {
            let y = area.y + row as u16;
            if y >= area.bottom() {
                return;
            }
            let focused = self.is_focused(field.key);
            let marker = if field.required { "*" } else { " " };
            let label = format!("{marker}{:<w$}", field.label, w = LABEL_WIDTH - 1);
            buf.set_stringn(area.x, y, &label, width, dim);

            let mut value = field.display();
            match &field.kind {
                FieldKind::Choice(_) | FieldKind::Multi(_) if focused => value = format!("◀ {value} ▶"),
                FieldKind::Text | FieldKind::Number if focused => value.push('▏'),
                _ => {}
            }
            if let (FieldKind::Multi(options), true) = (&field.kind, focused)
                && let Some(option) = options.get(field.cursor)
            {
                let mark = if field.selected.get(field.cursor).copied().unwrap_or(false) { "[x]" } else { "[ ]" };
                value = format!("{value}  {mark} {option}");
            }
            let x = area.x + LABEL_WIDTH as u16;
            let room = width.saturating_sub(LABEL_WIDTH);
            buf.set_stringn(x, y, value, room, if focused { highlight } else { text });
        }

        let y = area.y + self.form.fields.len() as u16 + 1;
        if y >= area.bottom() {
            return;
        }
        let submit = format!("[ {} ]", self.submit_label);
        let submit_style = if self.is_focused(SUBMIT) { highlight } else { resolve(Palette::Primary, self.theme) };
        buf.set_stringn(area.x, y, &submit, width, submit_style);
        let cancel_x = area.x + submit.chars().count() as u16 + 2;
        let cancel_style = if self.is_focused(CANCEL) { highlight } else { dim };
        buf.set_stringn(cancel_x, y, "[ Cancel ]", width.saturating_sub(cancel_x as usize), cancel_style);
    }
}

/// A `width` x `height` box centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::FormField;

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_rect(area, 20, 4), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_rect(area, 80, 20), area);
    }

    #[test]
    fn focused_field_gets_highlight() {
        let form = FormState::new(
            "login",
            vec![FormField::text("name", "Name").required(), FormField::text("phone", "Phone")],
        );
        let view = FormView { form: &form, focused: Some("login.phone"), submit_label: "Sign in", theme: Theme::Dark };
        assert_eq!(view.height(), 4);

        let area = Rect::new(0, 0, 50, 4);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        let highlight = resolve(Palette::Highlight, Theme::Dark);
        assert_eq!(buf[(0, 0)].symbol(), "*");
        assert_eq!(buf[(LABEL_WIDTH as u16, 1)].fg, highlight.fg.unwrap());
        assert_ne!(buf[(LABEL_WIDTH as u16, 0)].fg, highlight.fg.unwrap());
        assert_eq!(buf[(2, 3)].symbol(), "S");
    }
}
