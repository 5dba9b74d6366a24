//! Accessible modal semantics for the terminal UI: focus trap, escape and
//! overlay dismissal, and focus restoration on close.

use log::debug;

pub type ElementId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Link,
    TextInput,
    Select,
    TextArea,
    /// Non-interactive element opted into focus order by tab index.
    Other { tab_index: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub visible: bool,
    pub disabled: bool,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind) -> Self {
        Self { id: id.into(), kind, visible: true, disabled: false }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.visible = !hidden;
        self
    }

    /// The fixed focus selector: buttons, links, form controls, and anything
    /// with a non-negative tab index. Disabled controls never match.
    fn matches_focus_selector(&self) -> bool {
        match self.kind {
            ElementKind::Button | ElementKind::TextInput | ElementKind::Select | ElementKind::TextArea => {
                !self.disabled
            }
            ElementKind::Link => true,
            ElementKind::Other { tab_index } => tab_index.is_some_and(|i| i >= 0),
        }
    }

    pub fn is_focusable(&self) -> bool {
        self.visible && self.matches_focus_selector()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub id: ElementId,
    pub elements: Vec<Element>,
    /// Hidden from assistive technology while closed.
    pub aria_hidden: bool,
}

impl Modal {
    pub fn new(id: impl Into<ElementId>, elements: Vec<Element>) -> Self {
        Self { id: id.into(), elements, aria_hidden: true }
    }

    pub fn focusable(&self) -> Vec<&ElementId> {
        self.elements
            .iter()
            .filter(|e| e.is_focusable())
            .map(|e| &e.id)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    Escape,
    Tab,
    BackTab,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Overlay,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent<C> {
    /// The modal asked to be dismissed; the caller runs its close action.
    Close(C),
    FocusMoved(ElementId),
    Ignored,
}

/// Listener registration for one open modal. Holding it in the manager is
/// what routes key and click input to the modal.
#[derive(Debug)]
struct Registration<C> {
    modal_id: ElementId,
    previous_focus: Option<ElementId>,
    on_close: C,
}

/// Tracks the focused element and the stack of open modals. The topmost
/// registration receives key and overlay input.
#[derive(Debug)]
pub struct FocusManager<C> {
    focused: Option<ElementId>,
    registrations: Vec<Registration<C>>,
}

impl<C> Default for FocusManager<C> {
    fn default() -> Self {
        Self { focused: None, registrations: Vec::new() }
    }
}

impl<C: Clone> FocusManager<C> {
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn focus(&mut self, id: impl Into<ElementId>) {
        self.focused = Some(id.into());
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn is_open(&self, modal_id: &str) -> bool {
        self.registrations.iter().any(|r| r.modal_id == modal_id)
    }

    pub fn has_open_modal(&self) -> bool {
        !self.registrations.is_empty()
    }

    /// Register listeners, expose the modal, and move focus inside it.
    pub fn open(&mut self, modal: &mut Modal, on_close: C) {
        if self.is_open(&modal.id) {
            debug!("modal {} already open", modal.id);
            return;
        }
        self.registrations.push(Registration {
            modal_id: modal.id.clone(),
            previous_focus: self.focused.take(),
            on_close,
        });
        modal.aria_hidden = false;
        self.focused = Some(
            modal
                .focusable()
                .first()
                .map(|id| (*id).clone())
                .unwrap_or_else(|| modal.id.clone()),
        );
    }

    /// Unregister listeners, hide the modal, and restore the focus captured at
    /// open time if `background` still has it focusable. Closing a modal that
    /// is not open is a no-op apart from hiding it.
    pub fn close(&mut self, modal: &mut Modal, background: &[Element]) {
        modal.aria_hidden = true;
        let Some(pos) = self.registrations.iter().position(|r| r.modal_id == modal.id) else {
            return;
        };
        let registration = self.registrations.remove(pos);
        self.focused = registration
            .previous_focus
            .filter(|prev| background.iter().any(|e| &e.id == prev && e.is_focusable()));
    }

    pub fn handle_key(&mut self, modal: &Modal, key: KeyInput) -> ModalEvent<C> {
        let Some(on_close) = self.top_for(&modal.id).map(|r| r.on_close.clone()) else {
            return ModalEvent::Ignored;
        };
        match key {
            KeyInput::Escape => ModalEvent::Close(on_close),
            KeyInput::Tab | KeyInput::BackTab => {
                let targets = modal.focusable();
                match cycle(&targets, self.focused.as_deref(), key == KeyInput::Tab) {
                    Some(next) => {
                        self.focused = Some(next.clone());
                        ModalEvent::FocusMoved(next)
                    }
                    None => ModalEvent::Ignored,
                }
            }
            KeyInput::Other => ModalEvent::Ignored,
        }
    }

    /// Only a click on the overlay itself dismisses the modal.
    pub fn handle_click(&self, modal: &Modal, target: ClickTarget) -> ModalEvent<C> {
        match (self.top_for(&modal.id), target) {
            (Some(registration), ClickTarget::Overlay) => ModalEvent::Close(registration.on_close.clone()),
            _ => ModalEvent::Ignored,
        }
    }

    /// Move focus through a plain element list without trapping semantics.
    pub fn cycle_within(&mut self, elements: &[Element], forward: bool) -> Option<&str> {
        let targets: Vec<&ElementId> = elements.iter().filter(|e| e.is_focusable()).map(|e| &e.id).collect();
        let next = cycle(&targets, self.focused.as_deref(), forward)?;
        self.focused = Some(next);
        self.focused.as_deref()
    }

    fn top_for(&self, modal_id: &str) -> Option<&Registration<C>> {
        self.registrations.last().filter(|r| r.modal_id == modal_id)
    }
}

/// Next focus target. Wraps at both ends; an unknown current focus enters at
/// the first (forward) or last (backward) target.
fn cycle(targets: &[&ElementId], current: Option<&str>, forward: bool) -> Option<ElementId> {
    if targets.is_empty() {
        return None;
    }
    let last = targets.len() - 1;
    let position = current.and_then(|c| targets.iter().position(|t| t.as_str() == c));
    let next = match (position, forward) {
        (Some(i), true) if i < last => i + 1,
        (_, true) => 0,
        (Some(i), false) if i > 0 => i - 1,
        (_, false) => last,
    };
    Some(targets[next].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn background() -> Vec<Element> {
        vec![
            Element::new("page.join", ElementKind::Button),
            Element::new("page.back", ElementKind::Link),
        ]
    }

    fn login_modal() -> Modal {
        Modal::new(
            "login",
            vec![
                Element::new("login.name", ElementKind::TextInput),
                Element::new("login.hint", ElementKind::Other { tab_index: None }),
                Element::new("login.phone", ElementKind::TextInput),
                Element::new("login.hidden", ElementKind::Button).hidden(true),
                Element::new("login.disabled", ElementKind::Button).disabled(true),
                Element::new("login.submit", ElementKind::Button),
            ],
        )
    }

    #[test]
    fn open_focuses_first_focusable_and_unhides() {
        let mut focus: FocusManager<&str> = FocusManager::default();
        let mut modal = login_modal();
        focus.focus("page.join");
        focus.open(&mut modal, "dismiss");
        assert!(!modal.aria_hidden);
        assert_eq!(focus.focused(), Some("login.name"));
    }

    #[test]
    fn open_without_focusables_focuses_container() {
        let mut focus: FocusManager<()> = FocusManager::default();
        let mut modal = Modal::new("empty", vec![Element::new("x", ElementKind::Button).disabled(true)]);
        focus.open(&mut modal, ());
        assert_eq!(focus.focused(), Some("empty"));
    }

    #[test]
    fn tab_cycles_only_within_modal() {
        let mut focus: FocusManager<()> = FocusManager::default();
        let mut modal = login_modal();
        focus.focus("page.join");
        focus.open(&mut modal, ());

        let mut seen = Vec::new();
        for _ in 0..7 {
            focus.handle_key(&modal, KeyInput::Tab);
            seen.push(focus.focused().unwrap().to_string());
        }
        assert_eq!(
            seen,
            vec![
                "login.phone", "login.submit", "login.name", "login.phone", "login.submit", "login.name",
                "login.phone"
            ]
        );
        assert!(seen.iter().all(|id| id.starts_with("login.")));
    }

    #[test]
    fn shift_tab_wraps_backwards() {
        let mut focus: FocusManager<()> = FocusManager::default();
        let mut modal = login_modal();
        focus.open(&mut modal, ());
        focus.handle_key(&modal, KeyInput::BackTab);
        assert_eq!(focus.focused(), Some("login.submit"));
        focus.handle_key(&modal, KeyInput::BackTab);
        assert_eq!(focus.focused(), Some("login.phone"));
    }

    #[test]
    fn escape_requests_close() {
        let mut focus = FocusManager::default();
        let mut modal = login_modal();
        focus.open(&mut modal, 7u8);
        assert_eq!(focus.handle_key(&modal, KeyInput::Escape), ModalEvent::Close(7));
    }

    #[test]
    fn only_overlay_click_closes() {
        let mut focus = FocusManager::default();
        let mut modal = login_modal();
        focus.open(&mut modal, "closed");
        assert_eq!(focus.handle_click(&modal, ClickTarget::Content), ModalEvent::Ignored);
        assert_eq!(focus.handle_click(&modal, ClickTarget::Overlay), ModalEvent::Close("closed"));
    }

    #[test]
    fn close_restores_previous_focus() {
        let mut focus: FocusManager<()> = FocusManager::default();
        let mut modal = login_modal();
        focus.focus("page.join");
        focus.open(&mut modal, ());
        focus.handle_key(&modal, KeyInput::Tab);
        focus.close(&mut modal, &background());
        assert!(modal.aria_hidden);
        assert!(!focus.has_open_modal());
        assert_eq!(focus.focused(), Some("page.join"));
    }

    #[test]
    fn close_skips_restore_when_element_no_longer_focusable() {
        let mut focus: FocusManager<()> = FocusManager::default();
        let mut modal = login_modal();
        focus.focus("page.join");
        focus.open(&mut modal, ());
        let background = vec![Element::new("page.join", ElementKind::Button).disabled(true)];
        focus.close(&mut modal, &background);
        assert_eq!(focus.focused(), None);
    }

    #[test]
    fn closing_twice_is_harmless() {
        let mut focus: FocusManager<()> = FocusManager::default();
        let mut modal = login_modal();
        focus.open(&mut modal, ());
        focus.close(&mut modal, &background());
        focus.close(&mut modal, &background());
        assert!(modal.aria_hidden);
        assert_eq!(focus.handle_key(&modal, KeyInput::Escape), ModalEvent::Ignored);
    }

    #[test]
    fn nested_modal_owns_input_until_closed() {
        let mut focus = FocusManager::default();
        let mut outer = login_modal();
        let mut inner = Modal::new("confirm", vec![Element::new("confirm.ok", ElementKind::Button)]);
        focus.open(&mut outer, "outer");
        focus.open(&mut inner, "inner");
        assert_eq!(focus.handle_key(&outer, KeyInput::Escape), ModalEvent::Ignored);
        assert_eq!(focus.handle_key(&inner, KeyInput::Escape), ModalEvent::Close("inner"));
        focus.close(&mut inner, &outer.elements);
        assert_eq!(focus.focused(), Some("login.name"));
        assert_eq!(focus.handle_key(&outer, KeyInput::Escape), ModalEvent::Close("outer"));
    }

    #[test]
    fn cycle_within_page_elements() {
        let mut focus: FocusManager<()> = FocusManager::default();
        assert_eq!(focus.cycle_within(&background(), true), Some("page.join"));
        assert_eq!(focus.cycle_within(&background(), true), Some("page.back"));
        assert_eq!(focus.cycle_within(&background(), false), Some("page.join"));
        assert_eq!(focus.cycle_within(&[], true), None);
    }
}
