use crate::app::App;
use crate::state::focus::KeyInput;
use crate::state::messages::{NetworkRequest, UiEvent};
use crate::state::router::{NAV_PAGES, Page};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

/// Long enough for the first frame of a page to be drawn.
const SETTLE_DELAY: Duration = Duration::from_millis(60);

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    ui_events: &mpsc::Sender<UiEvent>,
) {
    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    let mut guard = app.lock().await;
    let (requests, settle) = if guard.state.modal.is_some() {
        (modal_keys(&mut guard, key_event), None)
    } else if guard.state.router.current() == Page::Profile && guard.state.profile.editing {
        (profile_form_keys(&mut guard, key_event), None)
    } else if guard.state.router.current() == Page::Stadiums && guard.state.stadium_list.searching {
        search_keys(&mut guard, key_event);
        (Vec::new(), None)
    } else {
        page_keys(&mut guard, key_event)
    };
    drop(guard);

    for request in requests {
        if let Err(e) = network_requests.send(request).await {
            error!("Failed to queue network request: {e}");
        }
    }
    if let Some(page) = settle {
        schedule_settle(page, ui_events.clone());
    }
}

/// Deferred page init runs after the page has had a frame to lay out.
fn schedule_settle(page: Page, ui_events: mpsc::Sender<UiEvent>) {
    tokio::spawn(async move {
        tokio::time::sleep(SETTLE_DELAY).await;
        let _ = ui_events.send(UiEvent::PageSettled(page)).await;
    });
}

fn modal_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    match key_event.code {
        KeyCode::Esc => app.modal_key(KeyInput::Escape),
        KeyCode::Tab => app.modal_key(KeyInput::Tab),
        KeyCode::BackTab => app.modal_key(KeyInput::BackTab),
        KeyCode::Enter => return app.modal_activate(),
        KeyCode::Left => app.modal_cycle(-1),
        KeyCode::Right => app.modal_cycle(1),
        KeyCode::Backspace => app.modal_backspace(),
        Char(c) => app.modal_input(c),
        _ => app.modal_key(KeyInput::Other),
    }
    Vec::new()
}

fn profile_form_keys(app: &mut App, key_event: KeyEvent) -> Vec<NetworkRequest> {
    match key_event.code {
        KeyCode::Esc => app.cancel_profile_edit(),
        KeyCode::Tab | KeyCode::Down => app.profile_focus_next(true),
        KeyCode::BackTab | KeyCode::Up => app.profile_focus_next(false),
        KeyCode::Enter => return app.profile_activate(),
        KeyCode::Left => app.profile_cycle(-1),
        KeyCode::Right => app.profile_cycle(1),
        KeyCode::Backspace => app.profile_backspace(),
        Char(c) => app.profile_input(c),
        _ => {}
    }
    Vec::new()
}

fn search_keys(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Down => app.stop_search(),
        KeyCode::Backspace => app.search_backspace(),
        Char(c) => app.search_input(c),
        _ => {}
    }
}

fn page_keys(app: &mut App, key_event: KeyEvent) -> (Vec<NetworkRequest>, Option<Page>) {
    let mut requests = Vec::new();
    let mut settle = None;

    match (app.state.router.current(), key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Navigation bar
        (_, Char(c @ '1'..='5'), _) => {
            let index = c as usize - '1' as usize;
            settle = app.navigate(NAV_PAGES[index]);
        }
        (page, Char('?'), _) if page != Page::Help => settle = app.navigate(Page::Help),
        (_, KeyCode::Esc | KeyCode::Backspace, _) => settle = app.go_back(),

        // Stadium list
        (Page::Stadiums, Char('j') | KeyCode::Down, _) => app.move_selection(1),
        (Page::Stadiums, Char('k') | KeyCode::Up, _) => app.move_selection(-1),
        (Page::Stadiums, Char('/'), _) => app.start_search(),
        (Page::Stadiums, Char('v'), _) => app.toggle_card_layout(),
        (Page::Stadiums | Page::Map, KeyCode::Enter, _) => settle = app.open_selected(),

        // Stadium detail
        (Page::StadiumDetail, Char('l') | KeyCode::Right, _) => app.move_selection(1),
        (Page::StadiumDetail, Char('h') | KeyCode::Left, _) => app.move_selection(-1),
        (Page::StadiumDetail, Char('b') | KeyCode::Enter, _) => requests = app.book_selected_slot(),

        // Map
        (Page::Map, Char('j' | 'l') | KeyCode::Down | KeyCode::Right, _) => app.move_selection(1),
        (Page::Map, Char('k' | 'h') | KeyCode::Up | KeyCode::Left, _) => app.move_selection(-1),

        // Match list
        (Page::Matches, Char('l') | KeyCode::Right, _) => app.shift_match_tab(1),
        (Page::Matches, Char('h') | KeyCode::Left, _) => app.shift_match_tab(-1),
        (Page::Matches, Char('j') | KeyCode::Down, _) => app.move_selection(1),
        (Page::Matches, Char('k') | KeyCode::Up, _) => app.move_selection(-1),
        (Page::Matches, KeyCode::Enter, _) => settle = app.open_selected(),

        // Match detail
        (Page::MatchDetail, Char('j') | KeyCode::Enter, _) => requests = app.join_selected_match(),

        // Profile
        (Page::Profile, Char('e') | KeyCode::Enter, _) => app.start_profile_edit(),

        // Account & creation
        (Page::Home | Page::Matches | Page::StadiumDetail, Char('c'), _) => app.open_create_match(),
        (Page::Stadiums | Page::Profile, Char('o'), _) => app.open_create_stadium(),
        (_, Char('i'), _) if !app.state.cache.is_signed_in() => app.open_login(None),
        (_, Char('L'), _) if app.state.cache.is_signed_in() => app.logout(),

        // Global
        (_, Char('t'), _) => app.toggle_theme(),
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }

    (requests, settle)
}
