use crate::state::cache::DomainCache;
use crate::state::focus::{FocusManager, Modal};
use crate::state::forms::FormState;
use crate::state::notice::Notice;
use crate::state::router::Router;
use crate::ui::theme::Theme;
use crate::view::matches::MatchTab;
use crate::view::stadiums::CardLayout;
use pitchside_api::Stadium;
use tui::layout::Rect;

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModalId {
    Login,
    CreateMatch,
    CreateStadium,
}

impl ModalId {
    pub fn element_id(&self) -> &'static str {
        match self {
            ModalId::Login => "login",
            ModalId::CreateMatch => "create-match",
            ModalId::CreateStadium => "create-stadium",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ModalId::Login => " Sign in ",
            ModalId::CreateMatch => " Create match ",
            ModalId::CreateStadium => " Add a pitch ",
        }
    }
}

/// A modal on screen together with the form it edits.
#[derive(Debug)]
pub struct OpenModal {
    pub id: ModalId,
    pub modal: Modal,
    pub form: FormState,
}

impl OpenModal {
    pub fn new(id: ModalId, form: FormState) -> Self {
        let modal = Modal::new(id.element_id(), form.elements());
        Self { id, modal, form }
    }
}

/// Something the user asked for while signed out, replayed after login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingAction {
    Join { match_id: String },
    Book { stadium_id: String, slot: String },
    CreateMatch,
}

// ---------------------------------------------------------------------------
// Per-page state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StadiumListState {
    pub query: String,
    /// Keystrokes go to the search box.
    pub searching: bool,
    pub layout: CardLayout,
    pub selected: usize,
}

#[derive(Debug, Default)]
pub struct MatchListState {
    pub tab: MatchTab,
    pub selected: usize,
}

#[derive(Debug, Default)]
pub struct StadiumDetailState {
    pub stadium_id: Option<String>,
    pub slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl MapBounds {
    const MIN_PADDING: f64 = 0.01;
    /// Fallback while no stadium has been loaded.
    pub const WORLD: MapBounds = MapBounds { x: [-180.0, 180.0], y: [-90.0, 90.0] };

    /// Box around every stadium, padded by a tenth of its span.
    pub fn around(stadiums: &[Stadium]) -> Self {
        let Some(first) = stadiums.first() else {
            return Self::WORLD;
        };
        let init = ([first.lng, first.lng], [first.lat, first.lat]);
        let (x, y) = stadiums.iter().fold(init, |(x, y), s| {
            ([x[0].min(s.lng), x[1].max(s.lng)], [y[0].min(s.lat), y[1].max(s.lat)])
        });
        let pad_x = ((x[1] - x[0]) * 0.1).max(Self::MIN_PADDING);
        let pad_y = ((y[1] - y[0]) * 0.1).max(Self::MIN_PADDING);
        Self { x: [x[0] - pad_x, x[1] + pad_x], y: [y[0] - pad_y, y[1] + pad_y] }
    }
}

/// Bounds stay `None` until the page has settled once.
#[derive(Debug, Default)]
pub struct MapState {
    pub bounds: Option<MapBounds>,
    pub selected: usize,
}

#[derive(Debug, Default)]
pub struct ProfileState {
    /// Populated after the page settles.
    pub form: Option<FormState>,
    pub pending_avatar: Option<String>,
    pub editing: bool,
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

/// Everything the UI reads and the handlers in `App` mutate. Renderers take
/// it by reference; nothing lives in globals.
#[derive(Debug, Default)]
pub struct AppState {
    pub cache: DomainCache,
    pub router: Router,
    pub focus: FocusManager<ModalId>,
    pub modal: Option<OpenModal>,
    /// Screen area of the open modal from the last draw, for click routing.
    pub modal_area: Option<Rect>,
    pub notice: Option<Notice>,
    pub stadium_list: StadiumListState,
    pub match_list: MatchListState,
    pub stadium_detail: StadiumDetailState,
    pub match_detail_id: Option<String>,
    pub map: MapState,
    pub profile: ProfileState,
    pub pending_action: Option<PendingAction>,
    pub theme: Theme,
    pub show_logs: bool,
}

impl AppState {
    pub fn new(theme: Theme) -> Self {
        Self { theme, router: Router::new(), ..Self::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lng: f64) -> Stadium {
        Stadium { lat, lng, ..Stadium::default() }
    }

    #[test]
    fn bounds_pad_around_stadiums() {
        let b = MapBounds::around(&[at(51.0, -1.0), at(52.0, 1.0)]);
        assert!((b.x[0] - -1.2).abs() < 1e-9 && (b.x[1] - 1.2).abs() < 1e-9);
        assert!((b.y[0] - 50.9).abs() < 1e-9 && (b.y[1] - 52.1).abs() < 1e-9);
    }

    #[test]
    fn single_stadium_gets_minimum_padding() {
        let b = MapBounds::around(&[at(10.0, 20.0)]);
        assert!(b.x[1] > b.x[0]);
        assert!(b.y[1] > b.y[0]);
    }

    #[test]
    fn no_stadiums_shows_the_world() {
        assert_eq!(MapBounds::around(&[]), MapBounds { x: [-180.0, 180.0], y: [-90.0, 90.0] });
    }
}
