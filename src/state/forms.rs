use crate::state::focus::{Element, ElementId, ElementKind};

pub const SUBMIT: &str = "submit";
pub const CANCEL: &str = "cancel";

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    /// One of `(value, label)`; `cursor` is the selected option.
    Choice(Vec<(String, String)>),
    /// Any subset of the options; `cursor` points at the option Space toggles.
    Multi(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
    pub cursor: usize,
    pub selected: Vec<bool>,
    pub required: bool,
}

impl FormField {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Text,
            value: String::new(),
            cursor: 0,
            selected: Vec::new(),
            required: false,
        }
    }

    pub fn number(key: &'static str, label: &'static str) -> Self {
        Self { kind: FieldKind::Number, ..Self::text(key, label) }
    }

    pub fn choice(key: &'static str, label: &'static str, options: Vec<(String, String)>) -> Self {
        let value = options.first().map(|(v, _)| v.clone()).unwrap_or_default();
        Self { kind: FieldKind::Choice(options), value, ..Self::text(key, label) }
    }

    pub fn multi(key: &'static str, label: &'static str, options: Vec<String>) -> Self {
        let selected = vec![false; options.len()];
        Self { kind: FieldKind::Multi(options), selected, ..Self::text(key, label) }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if let FieldKind::Choice(options) = &self.kind
            && let Some(pos) = options.iter().position(|(v, _)| *v == value)
        {
            self.cursor = pos;
        }
        self.value = value;
        self
    }

    /// Text shown for the field in its current state.
    pub fn display(&self) -> String {
        match &self.kind {
            FieldKind::Text | FieldKind::Number => self.value.clone(),
            FieldKind::Choice(options) => options
                .get(self.cursor)
                .map(|(_, label)| label.clone())
                .unwrap_or_else(|| self.value.clone()),
            FieldKind::Multi(options) => {
                let picked: Vec<&str> = options
                    .iter()
                    .zip(&self.selected)
                    .filter(|(_, on)| **on)
                    .map(|(o, _)| o.as_str())
                    .collect();
                if picked.is_empty() { "none".to_string() } else { picked.join(", ") }
            }
        }
    }

    fn is_empty(&self) -> bool {
        match self.kind {
            FieldKind::Multi(_) => !self.selected.iter().any(|s| *s),
            _ => self.value.trim().is_empty(),
        }
    }
}

/// Editable form backing a modal or the profile page. Element ids are
/// `"{form}.{field}"`, plus `"{form}.submit"` and `"{form}.cancel"`.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub id: &'static str,
    pub fields: Vec<FormField>,
}

impl FormState {
    pub fn new(id: &'static str, fields: Vec<FormField>) -> Self {
        Self { id, fields }
    }

    pub fn element_id(&self, key: &str) -> ElementId {
        format!("{}.{key}", self.id)
    }

    pub fn elements(&self) -> Vec<Element> {
        let mut elements: Vec<Element> = self
            .fields
            .iter()
            .map(|f| {
                let kind = match f.kind {
                    FieldKind::Text | FieldKind::Number => ElementKind::TextInput,
                    FieldKind::Choice(_) | FieldKind::Multi(_) => ElementKind::Select,
                };
                Element::new(self.element_id(f.key), kind)
            })
            .collect();
        elements.push(Element::new(self.element_id(SUBMIT), ElementKind::Button));
        elements.push(Element::new(self.element_id(CANCEL), ElementKind::Button));
        elements
    }

    /// Field key, `SUBMIT`, or `CANCEL` for an element id of this form.
    pub fn key_for<'a>(&self, element_id: &'a str) -> Option<&'a str> {
        element_id.strip_prefix(self.id)?.strip_prefix('.')
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    pub fn value(&self, key: &str) -> &str {
        self.field(key).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn trimmed(&self, key: &str) -> String {
        self.value(key).trim().to_string()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.field_mut(key) {
            field.value = value.into();
        }
    }

    pub fn multi_values(&self, key: &str) -> Vec<String> {
        let Some(field) = self.field(key) else {
            return Vec::new();
        };
        match &field.kind {
            FieldKind::Multi(options) => options
                .iter()
                .zip(&field.selected)
                .filter(|(_, on)| **on)
                .map(|(o, _)| o.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Label of the first required field left blank.
    pub fn missing_required(&self) -> Option<&'static str> {
        self.fields.iter().find(|f| f.required && f.is_empty()).map(|f| f.label)
    }

    pub fn input_char(&mut self, key: &str, c: char) {
        let Some(field) = self.field_mut(key) else {
            return;
        };
        match field.kind {
            FieldKind::Text => field.value.push(c),
            FieldKind::Number if c.is_ascii_digit() || c == '.' || c == '-' => field.value.push(c),
            FieldKind::Multi(_) if c == ' ' => toggle(field),
            _ => {}
        }
    }

    pub fn backspace(&mut self, key: &str) {
        if let Some(field) = self.field_mut(key)
            && matches!(field.kind, FieldKind::Text | FieldKind::Number)
        {
            field.value.pop();
        }
    }

    /// Move a choice or multi-select cursor by `delta`, wrapping.
    pub fn cycle(&mut self, key: &str, delta: isize) {
        let Some(field) = self.field_mut(key) else {
            return;
        };
        let len = match &field.kind {
            FieldKind::Choice(options) => options.len(),
            FieldKind::Multi(options) => options.len(),
            _ => return,
        };
        if len == 0 {
            return;
        }
        field.cursor = (field.cursor as isize + delta).rem_euclid(len as isize) as usize;
        if let FieldKind::Choice(options) = &field.kind {
            field.value = options[field.cursor].0.clone();
        }
    }

    /// Replace a choice field's options, keeping the current value when it
    /// is still offered.
    pub fn set_choices(&mut self, key: &str, options: Vec<(String, String)>) {
        let Some(field) = self.field_mut(key) else {
            return;
        };
        let position = options.iter().position(|(v, _)| *v == field.value);
        field.cursor = position.unwrap_or(0);
        field.value = options.get(field.cursor).map(|(v, _)| v.clone()).unwrap_or_default();
        field.kind = FieldKind::Choice(options);
    }
}

fn toggle(field: &mut FormField) {
    if let Some(on) = field.selected.get_mut(field.cursor) {
        *on = !*on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> FormState {
        FormState::new(
            "match",
            vec![
                FormField::text("title", "Title").required(),
                FormField::number("fee", "Fee"),
                FormField::choice(
                    "stadium",
                    "Stadium",
                    vec![("s1".into(), "North".into()), ("s2".into(), "South".into())],
                ),
                FormField::multi("friends", "Friends", vec!["Ana".into(), "Ben".into(), "Cy".into()]),
            ],
        )
    }

    #[test]
    fn element_ids_map_back_to_keys() {
        let f = form();
        let ids: Vec<String> = f.elements().into_iter().map(|e| e.id).collect();
        assert_eq!(ids.first().map(String::as_str), Some("match.title"));
        assert_eq!(ids.last().map(String::as_str), Some("match.cancel"));
        assert_eq!(f.key_for("match.fee"), Some("fee"));
        assert_eq!(f.key_for("match.submit"), Some(SUBMIT));
        assert_eq!(f.key_for("login.fee"), None);
    }

    #[test]
    fn number_fields_reject_letters() {
        let mut f = form();
        for c in "1a2".chars() {
            f.input_char("fee", c);
        }
        assert_eq!(f.value("fee"), "12");
        f.backspace("fee");
        assert_eq!(f.value("fee"), "1");
    }

    #[test]
    fn choice_cycles_and_wraps() {
        let mut f = form();
        assert_eq!(f.value("stadium"), "s1");
        f.cycle("stadium", 1);
        assert_eq!(f.value("stadium"), "s2");
        f.cycle("stadium", 1);
        assert_eq!(f.value("stadium"), "s1");
        f.cycle("stadium", -1);
        assert_eq!(f.field("stadium").unwrap().display(), "South");
    }

    #[test]
    fn multi_select_toggles_under_cursor() {
        let mut f = form();
        f.input_char("friends", ' ');
        f.cycle("friends", 2);
        f.input_char("friends", ' ');
        assert_eq!(f.multi_values("friends"), vec!["Ana".to_string(), "Cy".to_string()]);
        assert_eq!(f.field("friends").unwrap().display(), "Ana, Cy");
    }

    #[test]
    fn missing_required_reports_label() {
        let mut f = form();
        assert_eq!(f.missing_required(), Some("Title"));
        f.set("title", "Sunday kickabout");
        assert_eq!(f.missing_required(), None);
    }

    #[test]
    fn set_choices_keeps_offered_value() {
        let mut f = form();
        f.cycle("stadium", 1);
        f.set_choices("stadium", vec![("s0".into(), "West".into()), ("s2".into(), "South".into())]);
        assert_eq!(f.value("stadium"), "s2");
        f.set_choices("stadium", vec![("s9".into(), "East".into())]);
        assert_eq!(f.value("stadium"), "s9");
    }
}
