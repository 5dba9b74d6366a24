use crate::state::app_settings::{AppSettings, StartupAction};
use crate::state::app_state::{AppState, MapBounds, ModalId, OpenModal, PendingAction};
use crate::state::focus::{ClickTarget, Element, ElementKind, KeyInput, ModalEvent};
use crate::state::forms::{CANCEL, FormField, FormState, SUBMIT};
use crate::state::messages::{Mutation, MutationOutput, NetworkRequest};
use crate::state::notice::{Notice, NoticeKind};
use crate::state::router::Page;
use crate::state::session::SessionStore;
use crate::state::validation::{
    LoginDraft, MatchDraft, ProfileDraft, StadiumDraft, ValidationError, apply_profile, build_login_user,
    build_new_match, build_new_stadium, check_booking, check_join,
};
use crate::view::matches::{JoinState, MatchTab, filter_matches, join_state};
use crate::view::profile::render_profile_form;
use crate::view::stadiums::filter_stadiums;
use log::{debug, info, warn};
use pitchside_api::client::ApiFailure;
use pitchside_api::{Identified, Match, Role, Stadium, StatusThresholds, User};
use std::collections::HashSet;
use std::time::Instant;
use tui::layout::Position;

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub session: SessionStore,
    thresholds: StatusThresholds,
    startup_action: Option<StartupAction>,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let session = SessionStore::new(settings.session_file.clone());
        let theme = session.theme().unwrap_or_default();
        info!("session file {}", session.path().display());

        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        Self {
            thresholds: settings.thresholds(),
            startup_action: settings.startup_action,
            state: AppState::new(theme),
            session,
            settings,
        }
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    /// Initial wholesale load of every collection.
    pub fn startup_requests(&mut self) -> Vec<NetworkRequest> {
        let cache = &mut self.state.cache;
        vec![
            NetworkRequest::LoadStadiums { generation: cache.next_generation() },
            NetworkRequest::LoadMatches { generation: cache.next_generation() },
            NetworkRequest::LoadUsers { generation: cache.next_generation() },
        ]
    }

    // -----------------------------------------------------------------------
    // Network response handlers (called from main_ui_loop)
    // -----------------------------------------------------------------------

    pub fn on_stadiums_loaded(&mut self, generation: u64, stadiums: Option<Vec<Stadium>>) {
        if !self.state.cache.load_stadiums(generation, stadiums) {
            return;
        }
        let visible = self.filtered_stadiums().len();
        clamp(&mut self.state.stadium_list.selected, visible);
        clamp(&mut self.state.map.selected, self.state.cache.stadiums.len());
        if self.state.map.bounds == Some(MapBounds::WORLD) {
            self.state.map.bounds = Some(MapBounds::around(&self.state.cache.stadiums));
        }
    }

    pub fn on_matches_loaded(&mut self, generation: u64, matches: Option<Vec<Match>>) {
        if !self.state.cache.load_matches(generation, matches) {
            return;
        }
        let visible = self.visible_matches().len();
        clamp(&mut self.state.match_list.selected, visible);
    }

    /// Re-resolves the current user from the session snapshot, then runs the
    /// startup action once the first user load has been attempted.
    pub fn on_users_loaded(&mut self, generation: u64, users: Option<Vec<User>>) -> Vec<NetworkRequest> {
        let saved = self.session.saved_user();
        let had_snapshot = saved.is_some();
        // A sign-in whose record came back without an identifier is matched
        // by phone once the fresh list arrives.
        let unsaved_phone = self
            .state
            .cache
            .current_user
            .as_ref()
            .filter(|u| u.key().is_none())
            .map(|u| u.phone.clone());
        if self.state.cache.load_users(generation, users, saved) {
            if self.state.cache.current_user.is_none()
                && let Some(phone) = unsaved_phone
            {
                self.state.cache.current_user = self.state.cache.find_user_by_phone(&phone).cloned();
            }
            match &self.state.cache.current_user {
                Some(user) => self.remember(user),
                None if had_snapshot => info!("saved session matches no user, continuing as guest"),
                None => {}
            }
            if self.state.router.current() == Page::Profile && !self.state.profile.editing {
                self.populate_profile_form();
            }
        }
        self.run_startup_action()
    }

    pub fn on_mutation_finished(
        &mut self,
        mutation: Mutation,
        result: Result<MutationOutput, ApiFailure>,
    ) -> Vec<NetworkRequest> {
        let output = match result {
            Ok(output) => output,
            Err(failure) => {
                self.notify(NoticeKind::Error, failure.error);
                return Vec::new();
            }
        };
        match (mutation, output) {
            (Mutation::CreateUser, MutationOutput::User(user)) => return self.sign_in(*user),
            (Mutation::UpdateUser, MutationOutput::User(user)) => {
                let user = self.keep_identity(*user);
                self.remember(&user);
                self.state.cache.current_user = Some(user);
                self.state.profile.editing = false;
                self.state.profile.pending_avatar = None;
                self.populate_profile_form();
                self.notify(NoticeKind::Success, "Profile saved");
            }
            (Mutation::BookSlot { time }, MutationOutput::Stadium(stadium)) => {
                self.notify(NoticeKind::Success, format!("Booked {time} at {}", stadium.name));
            }
            (Mutation::CreateMatch, MutationOutput::Match(m)) => {
                self.close_modal(ModalId::CreateMatch);
                self.notify(NoticeKind::Success, format!("Match \"{}\" created", m.title));
            }
            (Mutation::JoinMatch, MutationOutput::Joined) => {
                self.notify(NoticeKind::Success, "You're in. See you on the pitch");
            }
            (Mutation::CreateStadium, MutationOutput::Stadium(stadium)) => {
                self.close_modal(ModalId::CreateStadium);
                self.notify(NoticeKind::Success, format!("{} added", stadium.name));
            }
            (mutation, output) => warn!("unexpected output for {mutation:?}: {output:?}"),
        }
        Vec::new()
    }

    // -----------------------------------------------------------------------
    // Session
    // -----------------------------------------------------------------------

    /// Snapshots are only useful with an identifier to re-resolve by.
    fn remember(&self, user: &User) {
        if user.key().is_none() {
            warn!("not saving session for {}: record has no identifier", user.name);
            return;
        }
        if let Err(e) = self.session.save_user(Some(user)) {
            warn!("could not save session: {e:#}");
        }
    }

    /// An update response without an identifier keeps the signed-in
    /// record's. A body that is not a user record at all leaves the current
    /// record in place until the reload refreshes it.
    fn keep_identity(&self, mut updated: User) -> User {
        if updated.key().is_some() {
            return updated;
        }
        let Some(current) = self.state.cache.current_user.as_ref() else {
            return updated;
        };
        if updated.name.trim().is_empty() {
            debug!("update response carried no user record, keeping {}", current.name);
            return current.clone();
        }
        updated.id = current.id.clone();
        updated.alt_id = current.alt_id.clone();
        updated
    }

    fn sign_in(&mut self, user: User) -> Vec<NetworkRequest> {
        info!("signed in as {} ({:?})", user.name, user.key());
        self.remember(&user);
        let greeting = format!("Welcome, {}", user.name);
        self.state.cache.current_user = Some(user);
        self.close_modal(ModalId::Login);
        self.notify(NoticeKind::Success, greeting);
        self.resume_pending_action()
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!("could not clear session: {e:#}");
        }
        self.state.cache.current_user = None;
        self.state.profile = Default::default();
        self.state.focus.blur();
        self.notify(NoticeKind::Info, "Signed out");
    }

    fn resume_pending_action(&mut self) -> Vec<NetworkRequest> {
        match self.state.pending_action.take() {
            Some(PendingAction::Join { match_id }) => self.join_match(&match_id),
            Some(PendingAction::Book { stadium_id, slot }) => self.book_slot(&stadium_id, &slot),
            Some(PendingAction::CreateMatch) => {
                self.open_create_match();
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn run_startup_action(&mut self) -> Vec<NetworkRequest> {
        let Some(action) = self.startup_action.take() else {
            return Vec::new();
        };
        let has_session = self.session.has_saved_user() && self.state.cache.is_signed_in();
        debug!("startup action {action:?} (session: {has_session})");
        match action {
            StartupAction::Login if !has_session => self.open_login(None),
            StartupAction::Login => info!("already signed in"),
            StartupAction::CreateMatch => {
                self.navigate(Page::Matches);
                if has_session {
                    self.open_create_match();
                } else {
                    self.open_login(Some(PendingAction::CreateMatch));
                }
            }
            StartupAction::JoinMatch => {
                self.navigate(Page::Matches);
                self.state.match_list.tab = MatchTab::Open;
                if !has_session {
                    self.open_login(None);
                }
            }
        }
        Vec::new()
    }

    // -----------------------------------------------------------------------
    // Notices & theme
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let notice = Notice::new(kind, message, Instant::now());
        debug!("notice {} {}", notice.kind.icon(), notice.message);
        self.state.notice = Some(notice);
    }

    fn reject(&mut self, err: ValidationError) {
        self.notify(NoticeKind::Error, err.to_string());
    }

    /// Returns true when a notice was dismissed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.state.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.state.notice = None;
            return true;
        }
        false
    }

    pub fn toggle_theme(&mut self) {
        self.state.theme = self.state.theme.toggled();
        if let Err(e) = self.session.save_theme(self.state.theme) {
            warn!("could not save theme: {e:#}");
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Returns the page to settle when it needs deferred initialization.
    pub fn navigate(&mut self, page: Page) -> Option<Page> {
        if page != Page::Profile {
            self.state.profile.editing = false;
        }
        self.state.router.navigate_to(page, true).map(|_| page)
    }

    pub fn go_back(&mut self) -> Option<Page> {
        self.state.profile.editing = false;
        self.state.router.go_back().map(|_| self.state.router.current())
    }

    /// Deferred work for a page that has had time to lay out. Skipped when
    /// the user has already moved on.
    pub fn on_page_settled(&mut self, page: Page) {
        if self.state.router.current() != page {
            debug!("{page:?} settled after navigating away, skipping init");
            return;
        }
        match page {
            Page::Map if self.state.map.bounds.is_none_or(|b| b == MapBounds::WORLD) => {
                self.state.map.bounds = Some(MapBounds::around(&self.state.cache.stadiums));
            }
            Page::Profile if !self.state.profile.editing => self.populate_profile_form(),
            _ => {}
        }
    }

    pub fn filtered_stadiums(&self) -> Vec<&Stadium> {
        filter_stadiums(&self.state.cache.stadiums, &self.state.stadium_list.query)
    }

    pub fn visible_matches(&self) -> Vec<&Match> {
        filter_matches(&self.state.cache, self.state.match_list.tab, &self.thresholds)
    }

    pub fn selected_stadium(&self) -> Option<&Stadium> {
        let id = self.state.stadium_detail.stadium_id.as_deref()?;
        self.state.cache.get_stadium_by_id(id)
    }

    pub fn selected_match(&self) -> Option<&Match> {
        let id = self.state.match_detail_id.as_deref()?;
        self.state.cache.get_match_by_id(id)
    }

    pub fn selected_slot(&self) -> Option<&str> {
        let stadium = self.selected_stadium()?;
        stadium.slots.get(self.state.stadium_detail.slot).map(String::as_str)
    }

    pub fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.state.router.current() {
            Page::Stadiums => (self.state.stadium_list.selected, self.filtered_stadiums().len()),
            Page::Matches => (self.state.match_list.selected, self.visible_matches().len()),
            Page::Map => (self.state.map.selected, self.state.cache.stadiums.len()),
            Page::StadiumDetail => (
                self.state.stadium_detail.slot,
                self.selected_stadium().map(|s| s.slots.len()).unwrap_or(0),
            ),
            _ => return,
        };
        if len == 0 {
            return;
        }
        let next = (selected as isize + delta).clamp(0, len as isize - 1) as usize;
        match self.state.router.current() {
            Page::Stadiums => self.state.stadium_list.selected = next,
            Page::Matches => self.state.match_list.selected = next,
            Page::Map => self.state.map.selected = next,
            Page::StadiumDetail => self.state.stadium_detail.slot = next,
            _ => {}
        }
    }

    pub fn shift_match_tab(&mut self, delta: isize) {
        self.state.match_list.tab = self.state.match_list.tab.shifted(delta);
        self.state.match_list.selected = 0;
    }

    pub fn open_stadium(&mut self, stadium_id: String) -> Option<Page> {
        let first_open = self
            .state
            .cache
            .get_stadium_by_id(&stadium_id)
            .and_then(|s| s.slots.iter().position(|slot| s.is_slot_available(slot)))
            .unwrap_or(0);
        self.state.stadium_detail.stadium_id = Some(stadium_id);
        self.state.stadium_detail.slot = first_open;
        self.navigate(Page::StadiumDetail)
    }

    /// Enter on a list row or map marker.
    pub fn open_selected(&mut self) -> Option<Page> {
        match self.state.router.current() {
            Page::Stadiums => {
                let id = self
                    .filtered_stadiums()
                    .get(self.state.stadium_list.selected)
                    .and_then(|s| s.key().map(ToString::to_string))?;
                self.open_stadium(id)
            }
            Page::Map => {
                let id = self
                    .state
                    .cache
                    .stadiums
                    .get(self.state.map.selected)
                    .and_then(|s| s.key().map(ToString::to_string))?;
                self.open_stadium(id)
            }
            Page::Matches => {
                let id = self
                    .visible_matches()
                    .get(self.state.match_list.selected)
                    .and_then(|m| m.key().map(ToString::to_string))?;
                self.state.match_detail_id = Some(id);
                self.navigate(Page::MatchDetail)
            }
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Stadium search
    // -----------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.state.stadium_list.searching = true;
        self.state.focus.focus("stadiums.search");
    }

    pub fn stop_search(&mut self) {
        self.state.stadium_list.searching = false;
    }

    pub fn search_input(&mut self, c: char) {
        self.state.stadium_list.query.push(c);
        self.state.stadium_list.selected = 0;
    }

    pub fn search_backspace(&mut self) {
        self.state.stadium_list.query.pop();
        self.state.stadium_list.selected = 0;
    }

    pub fn toggle_card_layout(&mut self) {
        self.state.stadium_list.layout = self.state.stadium_list.layout.toggled();
    }

    // -----------------------------------------------------------------------
    // Mutations: validated locally, then handed to the network worker
    // -----------------------------------------------------------------------

    pub fn join_selected_match(&mut self) -> Vec<NetworkRequest> {
        let Some(id) = self.state.match_detail_id.clone() else {
            return Vec::new();
        };
        self.state.focus.focus("match.join");
        self.join_match(&id)
    }

    fn join_match(&mut self, match_id: &str) -> Vec<NetworkRequest> {
        let outcome = {
            let Some(m) = self.state.cache.get_match_by_id(match_id) else {
                self.notify(NoticeKind::Error, "That match no longer exists");
                return Vec::new();
            };
            check_join(m, self.state.cache.current_user.as_ref(), &self.thresholds)
                .map(|name| (m.key().unwrap_or(match_id).to_string(), name.to_string()))
        };
        match outcome {
            Ok((match_id, player_name)) => {
                let generation = self.state.cache.next_generation();
                vec![NetworkRequest::JoinMatch { match_id, player_name, generation }]
            }
            Err(ValidationError::SignInRequired) => {
                self.open_login(Some(PendingAction::Join { match_id: match_id.to_string() }));
                Vec::new()
            }
            Err(e) => {
                self.reject(e);
                Vec::new()
            }
        }
    }

    pub fn book_selected_slot(&mut self) -> Vec<NetworkRequest> {
        let (Some(id), Some(slot)) = (
            self.state.stadium_detail.stadium_id.clone(),
            self.selected_slot().map(ToString::to_string),
        ) else {
            return Vec::new();
        };
        self.state.focus.focus(format!("slot.{slot}"));
        self.book_slot(&id, &slot)
    }

    fn book_slot(&mut self, stadium_id: &str, slot: &str) -> Vec<NetworkRequest> {
        let outcome = {
            let Some(stadium) = self.state.cache.get_stadium_by_id(stadium_id) else {
                self.notify(NoticeKind::Error, "That stadium no longer exists");
                return Vec::new();
            };
            check_booking(stadium, slot, self.state.cache.current_user.as_ref()).map(ToString::to_string)
        };
        match outcome {
            Ok(stadium_id) => {
                let generation = self.state.cache.next_generation();
                vec![NetworkRequest::BookSlot { stadium_id, time: slot.to_string(), generation }]
            }
            Err(ValidationError::SignInRequired) => {
                self.open_login(Some(PendingAction::Book {
                    stadium_id: stadium_id.to_string(),
                    slot: slot.to_string(),
                }));
                Vec::new()
            }
            Err(e) => {
                self.reject(e);
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Modals
    // -----------------------------------------------------------------------

    fn open_modal(&mut self, id: ModalId, form: FormState) {
        if let Some(current) = self.state.modal.as_ref().map(|m| m.id) {
            self.close_modal(current);
        }
        let mut open = OpenModal::new(id, form);
        self.state.focus.open(&mut open.modal, id);
        self.state.modal = Some(open);
    }

    /// Closes `id` if it is the open modal; otherwise a no-op.
    pub fn close_modal(&mut self, id: ModalId) {
        if self.state.modal.as_ref().map(|m| m.id) != Some(id) {
            return;
        }
        let background = self.background_elements();
        if let Some(mut open) = self.state.modal.take() {
            self.state.focus.close(&mut open.modal, &background);
        }
        self.state.modal_area = None;
    }

    /// User-initiated close. Dismissing the login modal drops whatever was
    /// waiting on it.
    fn dismiss_modal(&mut self, id: ModalId) {
        if id == ModalId::Login {
            self.state.pending_action = None;
        }
        self.close_modal(id);
    }

    pub fn open_login(&mut self, pending: Option<PendingAction>) {
        self.state.pending_action = pending;
        self.open_modal(
            ModalId::Login,
            FormState::new(
                ModalId::Login.element_id(),
                vec![
                    FormField::text("name", "Name").required(),
                    FormField::text("phone", "Phone").required(),
                    FormField::text("position", "Position"),
                    FormField::text("skill", "Skill level"),
                ],
            ),
        );
    }

    pub fn open_create_match(&mut self) {
        if !self.state.cache.is_signed_in() {
            self.open_login(Some(PendingAction::CreateMatch));
            return;
        }
        if self.state.router.current() == Page::Matches {
            self.state.focus.focus("matches.create");
        }
        let cache = &self.state.cache;
        let stadiums: Vec<(String, String)> = cache
            .stadiums
            .iter()
            .filter_map(|s| s.key().map(|id| (id.to_string(), s.name.clone())))
            .collect();
        let me = cache.current_user_name();
        let mut seen = HashSet::new();
        let friends: Vec<String> = cache
            .users
            .iter()
            .map(|u| u.name.clone())
            .filter(|name| !name.is_empty() && Some(name.as_str()) != me)
            .filter(|name| seen.insert(name.clone()))
            .collect();

        let mut stadium = FormField::choice("stadium", "Stadium", stadiums).required();
        if self.state.router.current() == Page::StadiumDetail
            && let Some(id) = self.state.stadium_detail.stadium_id.clone()
        {
            stadium = stadium.with_value(id);
        }
        let form = FormState::new(
            ModalId::CreateMatch.element_id(),
            vec![
                FormField::text("title", "Title").required(),
                stadium,
                FormField::text("date", "Date (YYYY-MM-DD)")
                    .required()
                    .with_value(self.thresholds.past_before.format("%Y-%m-%d").to_string()),
                FormField::text("time", "Time").required(),
                FormField::number("fee", "Fee").with_value("0"),
                FormField::number("max_players", "Max players").required().with_value("10"),
                FormField::text("rules", "Rules (comma separated)"),
                FormField::multi("friends", "Friends", friends),
            ],
        );
        self.open_modal(ModalId::CreateMatch, form);
        self.prefill_match_time();
    }

    /// Offer the chosen stadium's first free slot when no time is typed yet.
    fn prefill_match_time(&mut self) {
        let Some(open) = self.state.modal.as_mut().filter(|m| m.id == ModalId::CreateMatch) else {
            return;
        };
        if !open.form.value("time").trim().is_empty() {
            return;
        }
        let slot = self
            .state
            .cache
            .get_stadium_by_id(open.form.value("stadium"))
            .and_then(|s| s.available_slots().next().map(ToString::to_string));
        if let Some(slot) = slot {
            open.form.set("time", slot);
        }
    }

    pub fn open_create_stadium(&mut self) {
        match &self.state.cache.current_user {
            None => self.open_login(None),
            Some(user) if !user.is_owner() => {
                self.notify(NoticeKind::Info, "Switch your profile role to Pitch Owner to add stadiums");
            }
            Some(_) => self.open_modal(
                ModalId::CreateStadium,
                FormState::new(
                    ModalId::CreateStadium.element_id(),
                    vec![
                        FormField::text("name", "Name").required(),
                        FormField::text("address", "Address").required(),
                        FormField::number("lat", "Latitude").required(),
                        FormField::number("lng", "Longitude").required(),
                        FormField::number("price", "Price per hour").required(),
                        FormField::text("surface", "Surface"),
                        FormField::text("amenities", "Amenities (comma separated)"),
                        FormField::text("slots", "Slots (comma separated)").required(),
                    ],
                ),
            ),
        }
    }

    fn modal_focus_key(&self) -> Option<String> {
        let open = self.state.modal.as_ref()?;
        let focused = self.state.focus.focused()?;
        open.form.key_for(focused).map(ToString::to_string)
    }

    pub fn modal_key(&mut self, key: KeyInput) {
        let Some(open) = self.state.modal.as_ref() else {
            return;
        };
        if let ModalEvent::Close(id) = self.state.focus.handle_key(&open.modal, key) {
            self.dismiss_modal(id);
        }
    }

    pub fn modal_click(&mut self, column: u16, row: u16) {
        let Some(open) = self.state.modal.as_ref() else {
            return;
        };
        let inside = self.state.modal_area.is_some_and(|area| area.contains(Position::new(column, row)));
        let target = if inside { ClickTarget::Content } else { ClickTarget::Overlay };
        if let ModalEvent::Close(id) = self.state.focus.handle_click(&open.modal, target) {
            self.dismiss_modal(id);
        }
    }

    /// Enter inside a modal: submit, cancel, or advance to the next field.
    pub fn modal_activate(&mut self) -> Vec<NetworkRequest> {
        let Some(id) = self.state.modal.as_ref().map(|m| m.id) else {
            return Vec::new();
        };
        match self.modal_focus_key().as_deref() {
            Some(SUBMIT) => self.submit_modal(id),
            Some(CANCEL) => {
                self.dismiss_modal(id);
                Vec::new()
            }
            _ => {
                self.modal_key(KeyInput::Tab);
                Vec::new()
            }
        }
    }

    pub fn modal_input(&mut self, c: char) {
        let Some(key) = self.modal_focus_key() else {
            return;
        };
        if let Some(open) = self.state.modal.as_mut() {
            open.form.input_char(&key, c);
        }
    }

    pub fn modal_backspace(&mut self) {
        let Some(key) = self.modal_focus_key() else {
            return;
        };
        if let Some(open) = self.state.modal.as_mut() {
            open.form.backspace(&key);
        }
    }

    pub fn modal_cycle(&mut self, delta: isize) {
        let Some(key) = self.modal_focus_key() else {
            return;
        };
        let Some(open) = self.state.modal.as_mut() else {
            return;
        };
        match (open.id, key.as_str()) {
            (ModalId::CreateMatch, "stadium") => {
                open.form.cycle(&key, delta);
                open.form.set("time", "");
                self.prefill_match_time();
            }
            // Free text, but arrows step through the stadium's open slots.
            (ModalId::CreateMatch, "time") => {
                let slots: Vec<String> = self
                    .state
                    .cache
                    .get_stadium_by_id(open.form.value("stadium"))
                    .map(|s| s.available_slots().map(ToString::to_string).collect())
                    .unwrap_or_default();
                if slots.is_empty() {
                    return;
                }
                let current = slots.iter().position(|s| s == open.form.value("time").trim());
                let next = match current {
                    Some(i) => (i as isize + delta).rem_euclid(slots.len() as isize) as usize,
                    None => 0,
                };
                open.form.set("time", slots[next].clone());
            }
            _ => open.form.cycle(&key, delta),
        }
    }

    fn submit_modal(&mut self, id: ModalId) -> Vec<NetworkRequest> {
        let Some(form) = self.state.modal.as_ref().map(|m| m.form.clone()) else {
            return Vec::new();
        };
        if let Some(label) = form.missing_required() {
            self.reject(ValidationError::MissingField(label));
            return Vec::new();
        }
        match id {
            ModalId::Login => self.submit_login(&form),
            ModalId::CreateMatch => self.submit_create_match(&form),
            ModalId::CreateStadium => self.submit_create_stadium(&form),
        }
    }

    /// A phone number already on file signs that user in without creating a
    /// new record.
    fn submit_login(&mut self, form: &FormState) -> Vec<NetworkRequest> {
        let draft = LoginDraft {
            name: form.value("name").to_string(),
            phone: form.value("phone").to_string(),
            position: form.value("position").to_string(),
            skill_level: form.value("skill").to_string(),
        };
        let user = match build_login_user(&draft) {
            Ok(user) => user,
            Err(e) => {
                self.reject(e);
                return Vec::new();
            }
        };
        if let Some(existing) = self.state.cache.find_user_by_phone(&user.phone).cloned() {
            debug!("phone already registered to {:?}", existing.key());
            return self.sign_in(existing);
        }
        let generation = self.state.cache.next_generation();
        vec![NetworkRequest::CreateUser { user, generation }]
    }

    fn submit_create_match(&mut self, form: &FormState) -> Vec<NetworkRequest> {
        let draft = MatchDraft {
            title: form.value("title").to_string(),
            stadium_id: form.value("stadium").to_string(),
            date: form.value("date").to_string(),
            time: form.value("time").to_string(),
            fee: form.value("fee").to_string(),
            max_players: form.value("max_players").to_string(),
            rules: form.value("rules").to_string(),
            friends: form.multi_values("friends"),
        };
        match build_new_match(&draft, self.state.cache.current_user.as_ref()) {
            Ok(new_match) => {
                let generation = self.state.cache.next_generation();
                vec![NetworkRequest::CreateMatch { new_match, generation }]
            }
            Err(e) => {
                self.reject(e);
                Vec::new()
            }
        }
    }

    fn submit_create_stadium(&mut self, form: &FormState) -> Vec<NetworkRequest> {
        let draft = StadiumDraft {
            name: form.value("name").to_string(),
            address: form.value("address").to_string(),
            lat: form.value("lat").to_string(),
            lng: form.value("lng").to_string(),
            price: form.value("price").to_string(),
            surface: form.value("surface").to_string(),
            amenities: form.value("amenities").to_string(),
            slots: form.value("slots").to_string(),
        };
        match build_new_stadium(&draft, self.state.cache.current_user.as_ref()) {
            Ok(stadium) => {
                let generation = self.state.cache.next_generation();
                vec![NetworkRequest::CreateStadium { stadium, generation }]
            }
            Err(e) => {
                self.reject(e);
                Vec::new()
            }
        }
    }

    /// Focusable elements of the page under the modal; focus returns to one
    /// of these on close.
    fn background_elements(&self) -> Vec<Element> {
        match self.state.router.current() {
            Page::MatchDetail => {
                let joinable = self
                    .selected_match()
                    .map(|m| join_state(m, self.state.cache.current_user_name()) == JoinState::Join)
                    .unwrap_or(false);
                vec![Element::new("match.join", ElementKind::Button).disabled(!joinable)]
            }
            Page::StadiumDetail => self
                .selected_stadium()
                .map(|s| {
                    s.slots
                        .iter()
                        .map(|slot| {
                            Element::new(format!("slot.{slot}"), ElementKind::Button)
                                .disabled(!s.is_slot_available(slot))
                        })
                        .collect()
                })
                .unwrap_or_default(),
            Page::Matches => vec![Element::new("matches.create", ElementKind::Button)],
            Page::Stadiums => vec![Element::new("stadiums.search", ElementKind::TextInput)],
            Page::Profile => self.profile_elements(),
            _ => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Profile
    // -----------------------------------------------------------------------

    fn populate_profile_form(&mut self) {
        let pending = self.state.profile.pending_avatar.as_deref();
        self.state.profile.form = self
            .state
            .cache
            .current_user
            .as_ref()
            .map(|user| render_profile_form(user, pending).form);
    }

    fn profile_elements(&self) -> Vec<Element> {
        match (&self.state.profile.form, self.state.profile.editing) {
            (Some(form), true) => form.elements(),
            _ => Vec::new(),
        }
    }

    fn profile_focus_key(&self) -> Option<String> {
        let form = self.state.profile.form.as_ref()?;
        let focused = self.state.focus.focused()?;
        form.key_for(focused).map(ToString::to_string)
    }

    pub fn start_profile_edit(&mut self) {
        if !self.state.cache.is_signed_in() {
            self.open_login(None);
            return;
        }
        if self.state.profile.form.is_none() {
            self.populate_profile_form();
        }
        self.state.profile.editing = true;
        self.state.focus.blur();
        let elements = self.profile_elements();
        self.state.focus.cycle_within(&elements, true);
    }

    pub fn cancel_profile_edit(&mut self) {
        self.state.profile.editing = false;
        self.state.profile.pending_avatar = None;
        self.state.focus.blur();
        self.populate_profile_form();
    }

    pub fn profile_focus_next(&mut self, forward: bool) {
        let elements = self.profile_elements();
        self.state.focus.cycle_within(&elements, forward);
    }

    pub fn profile_activate(&mut self) -> Vec<NetworkRequest> {
        match self.profile_focus_key().as_deref() {
            Some(SUBMIT) => self.save_profile(),
            Some(CANCEL) => {
                self.cancel_profile_edit();
                Vec::new()
            }
            _ => {
                self.profile_focus_next(true);
                Vec::new()
            }
        }
    }

    pub fn profile_input(&mut self, c: char) {
        let Some(key) = self.profile_focus_key() else {
            return;
        };
        if let Some(form) = self.state.profile.form.as_mut() {
            form.input_char(&key, c);
        }
        self.sync_pending_avatar(&key);
    }

    pub fn profile_backspace(&mut self) {
        let Some(key) = self.profile_focus_key() else {
            return;
        };
        if let Some(form) = self.state.profile.form.as_mut() {
            form.backspace(&key);
        }
        self.sync_pending_avatar(&key);
    }

    pub fn profile_cycle(&mut self, delta: isize) {
        let Some(key) = self.profile_focus_key() else {
            return;
        };
        if let Some(form) = self.state.profile.form.as_mut() {
            form.cycle(&key, delta);
        }
    }

    fn sync_pending_avatar(&mut self, key: &str) {
        if key != "avatar" {
            return;
        }
        let value = self.state.profile.form.as_ref().map(|f| f.trimmed("avatar")).unwrap_or_default();
        self.state.profile.pending_avatar = Some(value).filter(|v| !v.is_empty());
    }

    pub fn save_profile(&mut self) -> Vec<NetworkRequest> {
        let (Some(form), Some(base)) = (self.state.profile.form.as_ref(), self.state.cache.current_user.as_ref())
        else {
            self.reject(ValidationError::SignInRequired);
            return Vec::new();
        };
        let draft = ProfileDraft {
            name: form.value("name").to_string(),
            phone: form.value("phone").to_string(),
            age: form.value("age").to_string(),
            position: form.value("position").to_string(),
            skill_level: form.value("skill").to_string(),
            bio: form.value("bio").to_string(),
            avatar: self.state.profile.pending_avatar.clone(),
            role: if form.value("role") == "owner" { Role::Owner } else { Role::Player },
        };
        let user_id = base.key().map(ToString::to_string);
        match apply_profile(&draft, base) {
            Ok(user) => {
                let generation = self.state.cache.next_generation();
                vec![NetworkRequest::UpdateUser { user_id, user, generation }]
            }
            Err(e) => {
                self.reject(e);
                Vec::new()
            }
        }
    }
}

fn clamp(selected: &mut usize, len: usize) {
    *selected = (*selected).min(len.saturating_sub(1));
}
