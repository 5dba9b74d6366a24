use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::symbols::Marker;
use tui::text::{Line, Span};
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::form::{FormView, centered_rect};
use crate::components::slot_grid::SlotGrid;
use crate::state::app_state::ModalId;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::notice::NoticeKind;
use crate::state::router::{NAV_PAGES, Page};
use crate::ui::layout::LayoutAreas;
use crate::ui::theme::{Palette, Theme, resolve};
use crate::view::home::render_home;
use crate::view::matches::{Badge, MATCH_TABS, MatchCard, PlayerSlot, render_match_cards, render_match_detail};
use crate::view::profile::{ProfileHeader, match_history, render_profile_header};
use crate::view::stadiums::{
    CardLayout, StadiumCard, render_map_markers, render_stadium_cards, render_stadium_detail,
};
use pitchside_api::MatchStatus;

const MODAL_WIDTH: u16 = 68;
const GRID_CARD_WIDTH: u16 = 38;
const GRID_CARD_HEIGHT: u16 = 6;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
        }

        match app.state.router.current() {
            Page::Home => draw_home(f, layout.main, app),
            Page::Stadiums => draw_stadiums(f, layout.main, app),
            Page::StadiumDetail => draw_stadium_detail(f, layout.main, app),
            Page::Map => draw_map(f, layout.main, app),
            Page::Matches => draw_matches(f, layout.main, app),
            Page::MatchDetail => draw_match_detail(f, layout.main, app),
            Page::Profile => draw_profile(f, layout.main, app),
            Page::Help => draw_help(f, layout.main, app.state.theme),
        }

        if let Some(area) = layout.logs {
            draw_logs(f, area, app.state.theme);
        }

        app.state.modal_area = draw_modal(f, f.area(), app);
        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        error!("Failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(style: Style) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str, theme: Theme) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(resolve(Palette::Dim, theme))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn badge_style(badge: Badge, theme: Theme) -> Style {
    let palette = match badge.status {
        MatchStatus::Open => Palette::Success,
        MatchStatus::Soon => Palette::Warning,
        MatchStatus::Full => Palette::Danger,
        MatchStatus::Past => Palette::Dim,
    };
    resolve(palette, theme)
}

/// First row to show so that `selected` stays visible.
fn scroll_offset(selected: usize, visible: usize) -> usize {
    selected.saturating_sub(visible.saturating_sub(1))
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let theme = app.state.theme;
    let style = resolve(Palette::Text, theme);
    let border_type = BorderType::Rounded;

    let titles: Vec<Line> = NAV_PAGES
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(resolve(Palette::Primary, theme).add_modifier(Modifier::UNDERLINED))
        .select(app.state.router.nav_highlight())
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let who = match app.state.cache.current_user_name() {
        Some(name) => format!("● {name} "),
        None => "Guest · i sign in ".to_string(),
    };
    let account = Paragraph::new(who)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(account, tab_bar[1]);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let line = match &app.state.notice {
        Some(notice) => {
            let palette = match notice.kind {
                NoticeKind::Success => Palette::Success,
                NoticeKind::Error => Palette::Danger,
                NoticeKind::Info => Palette::Primary,
            };
            Line::from(Span::styled(format!(" {} {}", notice.kind.icon(), notice.message), resolve(palette, theme)))
        }
        None => Line::from(Span::styled(format!(" {}", page_hint(app)), resolve(Palette::Dim, theme))),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn page_hint(app: &App) -> &'static str {
    match app.state.router.current() {
        Page::Home => "1-5 pages · c create match · t theme · ? help · q quit",
        Page::Stadiums if app.state.stadium_list.searching => "type to filter · Enter/Esc done",
        Page::Stadiums => "j/k move · Enter open · / search · v layout · o add pitch · Esc back",
        Page::StadiumDetail => "h/l pick slot · Enter book · c create match here · Esc back",
        Page::Map => "j/k pick pitch · Enter open · Esc back",
        Page::Matches => "h/l tab · j/k move · Enter open · c create match · Esc back",
        Page::MatchDetail => "Enter join · Esc back",
        Page::Profile if app.state.profile.editing => "Tab move · ←/→ choose · Enter save/next · Esc cancel",
        Page::Profile => "e edit · o add pitch · L sign out · Esc back",
        Page::Help => "Esc back",
    }
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => resolve(Palette::Danger, app.state.theme),
        _ => resolve(Palette::Text, app.state.theme),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(3), 0, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn draw_logs(f: &mut Frame, area: Rect, theme: Theme) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(resolve(Palette::Dim, theme)).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(resolve(Palette::Text, theme));
    f.render_widget(logs, area);
}

fn draw_modal(f: &mut Frame, screen: Rect, app: &App) -> Option<Rect> {
    let open = app.state.modal.as_ref()?;
    let theme = app.state.theme;
    let submit_label = match open.id {
        ModalId::Login => "Sign in",
        ModalId::CreateMatch => "Create match",
        ModalId::CreateStadium => "Add pitch",
    };
    let form = FormView { form: &open.form, focused: app.state.focus.focused(), submit_label, theme };
    let area = centered_rect(screen, MODAL_WIDTH, form.height() + 4);

    f.render_widget(Clear, area);
    let block = default_border(resolve(Palette::Accent, theme)).title(open.id.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [body, _gap, hint] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    f.render_widget(form, body);
    f.render_widget(
        Paragraph::new("Tab move · ←/→ choose · Space toggle · Enter confirm · Esc close")
            .style(resolve(Palette::Dim, theme)),
        hint,
    );
    Some(area)
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

fn draw_home(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let block = default_border(resolve(Palette::Dim, theme)).title(" Pitchside ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = render_home(&app.state.cache, app.thresholds());
    let mut lines = vec![
        Line::from(Span::styled(view.greeting, resolve(Palette::Accent, theme))),
        Line::from(Span::styled(
            format!("{} pitches · {} open matches", view.stadium_count, view.open_match_count),
            resolve(Palette::Dim, theme),
        )),
        Line::default(),
        Line::from(Span::styled("Upcoming matches", resolve(Palette::Primary, theme))),
    ];
    if view.upcoming.is_empty() {
        lines.push(Line::from(Span::styled("  Nothing scheduled yet", resolve(Palette::Dim, theme))));
    }
    lines.extend(view.upcoming.iter().map(|card| match_card_line(card, theme)));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Top rated pitches", resolve(Palette::Primary, theme))));
    lines.extend(view.featured.iter().map(|card| stadium_card_line(card, theme)));

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Stadiums
// ---------------------------------------------------------------------------

fn stadium_card_line(card: &StadiumCard, theme: Theme) -> Line<'static> {
    let marker = if card.selected { "▶ " } else { "  " };
    let name_style = if card.selected {
        resolve(Palette::Highlight, theme)
    } else {
        resolve(Palette::Text, theme).add_modifier(Modifier::BOLD)
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(card.name.clone(), name_style),
        Span::styled(format!("  {}", card.address), resolve(Palette::Dim, theme)),
        Span::styled(format!("  {}", card.price_label), resolve(Palette::Primary, theme)),
        Span::styled(format!("  {}", card.rating_label), resolve(Palette::Accent, theme)),
        Span::styled(format!("  {} open", card.open_slots), resolve(Palette::Dim, theme)),
    ])
}

fn stadium_grid_card(card: &StadiumCard, theme: Theme) -> Paragraph<'static> {
    let mut amenities = card.amenities.join(" · ");
    if card.more_amenities > 0 {
        amenities.push_str(&format!(" +{} more", card.more_amenities));
    }
    let lines = vec![
        Line::from(Span::styled(card.address.clone(), resolve(Palette::Dim, theme))),
        Line::from(vec![
            Span::styled(card.price_label.clone(), resolve(Palette::Primary, theme)),
            Span::styled(format!("  {}", card.rating_label), resolve(Palette::Accent, theme)),
            Span::styled(format!("  {}", card.surface), resolve(Palette::Text, theme)),
        ]),
        Line::from(Span::styled(amenities, resolve(Palette::Dim, theme))),
        Line::from(Span::styled(format!("{} slots open", card.open_slots), resolve(Palette::Success, theme))),
    ];
    let border = if card.selected { resolve(Palette::Accent, theme) } else { resolve(Palette::Dim, theme) };
    Paragraph::new(lines).block(default_border(border).title(format!(" {} ", card.name)))
}

fn draw_stadiums(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let list = &app.state.stadium_list;
    let block = default_border(resolve(Palette::Dim, theme)).title(" Stadiums ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [search, content] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    let mut query = format!("Search: {}", list.query);
    if list.searching {
        query.push('▏');
    }
    let search_style = if list.searching { resolve(Palette::Accent, theme) } else { resolve(Palette::Text, theme) };
    let layout_label = match list.layout {
        CardLayout::Grid => "grid",
        CardLayout::List => "list",
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(query, search_style),
            Span::styled(format!("   [{layout_label}]"), resolve(Palette::Dim, theme)),
        ])),
        search,
    );

    let stadiums = app.filtered_stadiums();
    if stadiums.is_empty() {
        let msg = if app.state.cache.stadiums.is_empty() { "No pitches loaded yet" } else { "No pitches match your search" };
        draw_placeholder(f, content, msg, theme);
        return;
    }
    let cards = render_stadium_cards(&stadiums, list.layout, Some(list.selected));

    match list.layout {
        CardLayout::List => {
            let visible = content.height as usize;
            let lines: Vec<Line> = cards
                .iter()
                .skip(scroll_offset(list.selected, visible))
                .map(|card| stadium_card_line(card, theme))
                .collect();
            f.render_widget(Paragraph::new(lines), content);
        }
        CardLayout::Grid => {
            let cols = (content.width / GRID_CARD_WIDTH).max(1) as usize;
            let rows = (content.height / GRID_CARD_HEIGHT).max(1) as usize;
            let first_row = scroll_offset(list.selected / cols, rows);
            let card_width = content.width / cols as u16;
            for (i, card) in cards.iter().enumerate().skip(first_row * cols).take(rows * cols) {
                let slot = i - first_row * cols;
                let x = content.x + (slot % cols) as u16 * card_width;
                let y = content.y + (slot / cols) as u16 * GRID_CARD_HEIGHT;
                if y + GRID_CARD_HEIGHT > content.bottom() {
                    break;
                }
                f.render_widget(stadium_grid_card(card, theme), Rect::new(x, y, card_width, GRID_CARD_HEIGHT));
            }
        }
    }
}

fn draw_stadium_detail(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let Some(stadium) = app.selected_stadium() else {
        draw_placeholder(f, area, "That pitch is no longer listed", theme);
        return;
    };
    let view = render_stadium_detail(stadium, app.selected_slot());
    let block = default_border(resolve(Palette::Dim, theme)).title(format!(" {} ", view.card.name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut info = vec![
        Line::from(Span::styled(view.card.address.clone(), resolve(Palette::Text, theme))),
        Line::from(Span::styled(format!("📍 {}", view.coordinates), resolve(Palette::Dim, theme))),
        Line::from(vec![
            Span::styled(view.card.price_label.clone(), resolve(Palette::Primary, theme)),
            Span::styled(format!("  {}", view.card.rating_label), resolve(Palette::Accent, theme)),
            Span::styled(format!("  {}", view.card.surface), resolve(Palette::Text, theme)),
        ]),
    ];
    if !view.card.amenities.is_empty() {
        info.push(Line::from(Span::styled(view.card.amenities.join(" · "), resolve(Palette::Dim, theme))));
    }
    if !view.images.is_empty() {
        info.push(Line::from(Span::styled(
            format!("{} photo(s): {}", view.images.len(), view.images.join(", ")),
            resolve(Palette::Dim, theme),
        )));
    }

    let grid = SlotGrid { slots: &view.slots, theme };
    let grid_height = grid.height(inner.width).max(1);
    let [info_area, title_area, slots_area] = Layout::vertical([
        Constraint::Length(info.len() as u16 + 1),
        Constraint::Length(1),
        Constraint::Length(grid_height),
    ])
    .areas(inner);
    f.render_widget(Paragraph::new(info), info_area);
    f.render_widget(
        Paragraph::new(Span::styled("Time slots", resolve(Palette::Primary, theme))),
        title_area,
    );
    f.render_widget(grid, slots_area);
}

fn draw_map(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let Some(bounds) = app.state.map.bounds else {
        draw_placeholder(f, area, "Loading map...", theme);
        return;
    };
    let markers = render_map_markers(&app.state.cache.stadiums, Some(app.state.map.selected));
    let point_color = resolve(Palette::Primary, theme).fg.unwrap_or(Color::Green);
    let selected_color = resolve(Palette::Accent, theme).fg.unwrap_or(Color::Yellow);

    let canvas = Canvas::default()
        .block(default_border(resolve(Palette::Dim, theme)).title(" Map "))
        .marker(Marker::Braille)
        .x_bounds(bounds.x)
        .y_bounds(bounds.y)
        .paint(move |ctx| {
            let coords: Vec<(f64, f64)> = markers.iter().filter(|m| !m.selected).map(|m| (m.x, m.y)).collect();
            ctx.draw(&Points { coords: &coords, color: point_color });
            ctx.layer();
            for marker in &markers {
                let (label, color) = if marker.selected {
                    (format!("◉ {}", marker.label), selected_color)
                } else {
                    ("•".to_string(), point_color)
                };
                ctx.print(marker.x, marker.y, Span::styled(label, Style::default().fg(color)));
            }
        });
    f.render_widget(canvas, area);
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

fn match_card_line(card: &MatchCard, theme: Theme) -> Line<'static> {
    let marker = if card.selected { "▶ " } else { "  " };
    let title_style = if card.selected {
        resolve(Palette::Highlight, theme)
    } else {
        resolve(Palette::Text, theme).add_modifier(Modifier::BOLD)
    };
    let mut avatars = card.avatars.join(" ");
    if let Some(extra) = card.overflow {
        avatars.push_str(&format!(" +{extra}"));
    }
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("[{}]", card.badge.label), badge_style(card.badge, theme)),
        Span::raw(" "),
        Span::styled(card.title.clone(), title_style),
        Span::styled(
            format!("  {} · {} {} · {}", card.stadium_name, card.date, card.time, card.fee_label),
            resolve(Palette::Dim, theme),
        ),
        Span::styled(format!("  {} left", card.spots_left), resolve(Palette::Primary, theme)),
        Span::styled(format!("  {avatars}"), resolve(Palette::Text, theme)),
    ])
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let block = default_border(resolve(Palette::Dim, theme)).title(" Matches ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [tab_area, content] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    let selected_tab = MATCH_TABS.iter().position(|t| *t == app.state.match_list.tab);
    let tabs = Tabs::new(MATCH_TABS.iter().map(|t| t.label()))
        .highlight_style(resolve(Palette::Highlight, theme))
        .select(selected_tab)
        .style(resolve(Palette::Text, theme));
    f.render_widget(tabs, tab_area);

    let matches = app.visible_matches();
    if matches.is_empty() {
        draw_placeholder(f, content, "No matches here yet", theme);
        return;
    }
    let selected = app.state.match_list.selected;
    let cards = render_match_cards(&app.state.cache, &matches, app.thresholds(), Some(selected));
    let lines: Vec<Line> = cards
        .iter()
        .skip(scroll_offset(selected, content.height as usize))
        .map(|card| match_card_line(card, theme))
        .collect();
    f.render_widget(Paragraph::new(lines), content);
}

fn draw_match_detail(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let Some(m) = app.selected_match() else {
        draw_placeholder(f, area, "That match is no longer listed", theme);
        return;
    };
    let view = render_match_detail(&app.state.cache, m, app.thresholds());
    let block = default_border(resolve(Palette::Dim, theme)).title(format!(" {} ", view.title));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("[{}] ", view.badge.label), badge_style(view.badge, theme)),
            Span::styled(view.meta_line.clone(), resolve(Palette::Text, theme)),
        ]),
        Line::default(),
    ];
    match &view.stadium {
        Some(s) => {
            lines.push(Line::from(Span::styled(s.name.clone(), resolve(Palette::Primary, theme))));
            lines.push(Line::from(Span::styled(
                format!("{} · {} · {}", s.address, s.surface, s.price_label),
                resolve(Palette::Dim, theme),
            )));
        }
        None => lines.push(Line::from(Span::styled("Stadium unknown", resolve(Palette::Dim, theme)))),
    }
    if !view.rules.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Rules", resolve(Palette::Primary, theme))));
        lines.extend(
            view.rules.iter().map(|r| Line::from(Span::styled(format!("  • {r}"), resolve(Palette::Text, theme)))),
        );
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Players", resolve(Palette::Primary, theme))));
    let roster: Vec<Span> = view
        .players
        .iter()
        .map(|slot| match slot {
            PlayerSlot::Taken { name, initials, is_you: true } => {
                Span::styled(format!(" ({initials}) {name} (you) "), resolve(Palette::Accent, theme))
            }
            PlayerSlot::Taken { name, initials, .. } => {
                Span::styled(format!(" ({initials}) {name} "), resolve(Palette::Text, theme))
            }
            PlayerSlot::Open => Span::styled(" ( + ) open ", resolve(Palette::Dim, theme)),
        })
        .collect();
    lines.push(Line::from(roster));
    lines.push(Line::default());

    let focused = app.state.focus.focused() == Some("match.join");
    let button_style = match (view.join.enabled, focused) {
        (false, _) => resolve(Palette::Dim, theme),
        (true, true) => resolve(Palette::Highlight, theme),
        (true, false) => resolve(Palette::Primary, theme).add_modifier(Modifier::REVERSED),
    };
    lines.push(Line::from(Span::styled(format!("[ {} ]", view.join.label), button_style)));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ---------------------------------------------------------------------------
// Profile & help
// ---------------------------------------------------------------------------

fn draw_profile(f: &mut Frame, area: Rect, app: &App) {
    let theme = app.state.theme;
    let block = default_border(resolve(Palette::Dim, theme)).title(" Profile ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (name, avatar, role_label, show_owner_menu, stats_line) =
        match render_profile_header(app.state.cache.current_user.as_ref()) {
            ProfileHeader::Guest { prompt } => {
                draw_placeholder(f, inner, &format!("{prompt}\nPress i to sign in"), theme);
                return;
            }
            ProfileHeader::Member { name, avatar, role_label, show_owner_menu, stats_line } => {
                (name, avatar, role_label, show_owner_menu, stats_line)
            }
        };
    let avatar_label = match &app.state.profile.pending_avatar {
        Some(pending) => format!("{pending} (unsaved)"),
        None => avatar.label().to_string(),
    };

    let mut header = vec![
        Line::from(vec![
            Span::styled(format!("[{avatar_label}] "), resolve(Palette::Accent, theme)),
            Span::styled(name, resolve(Palette::Text, theme).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {role_label}"), resolve(Palette::Primary, theme)),
        ]),
        Line::from(Span::styled(stats_line, resolve(Palette::Dim, theme))),
    ];
    if show_owner_menu {
        header.push(Line::from(Span::styled("Owner tools: o add a pitch", resolve(Palette::Warning, theme))));
    }

    let [header_area, body] =
        Layout::vertical([Constraint::Length(header.len() as u16 + 1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(Paragraph::new(header), header_area);

    let Some(form) = app.state.profile.form.as_ref() else {
        draw_placeholder(f, body, "Loading profile...", theme);
        return;
    };

    if app.state.profile.editing {
        let view = FormView { form, focused: app.state.focus.focused(), submit_label: "Save profile", theme };
        f.render_widget(view, body);
        return;
    }

    let [details, history] = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);
    let detail_lines: Vec<Line> = form
        .fields
        .iter()
        .filter(|field| field.key != "avatar")
        .map(|field| {
            Line::from(vec![
                Span::styled(format!("{:<14}", field.label), resolve(Palette::Dim, theme)),
                Span::styled(field.display(), resolve(Palette::Text, theme)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(detail_lines), details);

    let entries = app
        .state
        .cache
        .current_user
        .as_ref()
        .map(|user| match_history(&app.state.cache, user))
        .unwrap_or_default();
    let mut history_lines = vec![Line::from(Span::styled("Match history", resolve(Palette::Primary, theme)))];
    if entries.is_empty() {
        history_lines.push(Line::from(Span::styled("  No matches yet", resolve(Palette::Dim, theme))));
    }
    history_lines.extend(
        entries
            .into_iter()
            .map(|e| Line::from(Span::styled(format!("  • {}", e.label), resolve(Palette::Text, theme)))),
    );
    f.render_widget(Paragraph::new(history_lines), history);
}

fn draw_help(f: &mut Frame, area: Rect, theme: Theme) {
    let block = default_border(resolve(Palette::Dim, theme)).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = [
        ("1-5", "Home, Stadiums, Map, Matches, Profile"),
        ("Esc / Backspace", "Go back"),
        ("j/k h/l arrows", "Move selection, switch tabs and slots"),
        ("Enter", "Open, book the selected slot, join a match"),
        ("/", "Search stadiums by name or address"),
        ("v", "Grid or list stadium cards"),
        ("c", "Create a match"),
        ("o", "Add a pitch (pitch owners)"),
        ("e", "Edit your profile"),
        ("i / L", "Sign in / sign out"),
        ("t", "Toggle light and dark theme"),
        ("\"", "Show logs"),
        ("f", "Full screen"),
        ("q / Ctrl-c", "Quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:<18}"), resolve(Palette::Accent, theme)),
                Span::styled(*what, resolve(Palette::Text, theme)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
