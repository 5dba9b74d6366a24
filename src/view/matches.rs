use crate::state::cache::DomainCache;
use crate::view::{initials, price_label};
use pitchside_api::{Identified, Match, MatchStatus, StatusThresholds};

/// Player avatars shown on a card before the "+N" counter takes over.
pub const MAX_AVATARS: usize = 3;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchTab {
    #[default]
    All,
    Open,
    Joined,
    Hosting,
    Past,
}

pub const MATCH_TABS: [MatchTab; 5] = [MatchTab::All, MatchTab::Open, MatchTab::Joined, MatchTab::Hosting, MatchTab::Past];

impl MatchTab {
    pub fn label(&self) -> &'static str {
        match self {
            MatchTab::All => "All",
            MatchTab::Open => "Open",
            MatchTab::Joined => "Joined",
            MatchTab::Hosting => "My Pitches",
            MatchTab::Past => "Past",
        }
    }

    pub fn shifted(self, delta: isize) -> Self {
        let pos = MATCH_TABS.iter().position(|t| *t == self).unwrap_or(0) as isize;
        MATCH_TABS[(pos + delta).rem_euclid(MATCH_TABS.len() as isize) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub status: MatchStatus,
}

impl From<MatchStatus> for Badge {
    fn from(status: MatchStatus) -> Self {
        Self { label: status.badge_label(), status }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCard {
    pub id: Option<String>,
    pub title: String,
    pub stadium_name: String,
    pub date: String,
    pub time: String,
    pub fee_label: String,
    pub spots_left: u32,
    pub badge: Badge,
    pub avatars: Vec<String>,
    /// Players beyond the first `MAX_AVATARS`.
    pub overflow: Option<usize>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSlot {
    Taken { name: String, initials: String, is_you: bool },
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinState {
    AlreadyJoined,
    Full,
    Join,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinButton {
    pub state: JoinState,
    pub label: &'static str,
    pub enabled: bool,
}

impl From<JoinState> for JoinButton {
    fn from(state: JoinState) -> Self {
        let (label, enabled) = match state {
            JoinState::AlreadyJoined => ("Already Joined", false),
            JoinState::Full => ("Match is Full", false),
            JoinState::Join => ("Join Match", true),
        };
        Self { state, label, enabled }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StadiumSummary {
    pub name: String,
    pub address: String,
    pub surface: String,
    pub price_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetailView {
    pub title: String,
    pub meta_line: String,
    pub badge: Badge,
    pub stadium: Option<StadiumSummary>,
    pub rules: Vec<String>,
    pub players: Vec<PlayerSlot>,
    pub join: JoinButton,
}

fn stadium_name(cache: &DomainCache, m: &Match) -> String {
    cache
        .stadium_for(m)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "Unknown stadium".to_string())
}

pub fn render_match_card(cache: &DomainCache, m: &Match, thresholds: &StatusThresholds, selected: bool) -> MatchCard {
    let avatars = m.players.iter().take(MAX_AVATARS).map(|p| initials(p)).collect();
    let overflow = m.players.len().checked_sub(MAX_AVATARS).filter(|n| *n > 0);
    MatchCard {
        id: m.key().map(ToString::to_string),
        title: m.title.clone(),
        stadium_name: stadium_name(cache, m),
        date: m.date.clone(),
        time: m.time.clone(),
        fee_label: price_label(m.fee, None),
        spots_left: m.spots_left(),
        badge: m.status(thresholds).into(),
        avatars,
        overflow,
        selected,
    }
}

pub fn render_match_cards(
    cache: &DomainCache,
    matches: &[&Match],
    thresholds: &StatusThresholds,
    selected: Option<usize>,
) -> Vec<MatchCard> {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| render_match_card(cache, m, thresholds, selected == Some(i)))
        .collect()
}

/// Already joined beats full, full beats joinable.
pub fn join_state(m: &Match, current_user_name: Option<&str>) -> JoinState {
    if current_user_name.is_some_and(|name| m.has_player(name)) {
        JoinState::AlreadyJoined
    } else if m.is_full() {
        JoinState::Full
    } else {
        JoinState::Join
    }
}

pub fn render_match_detail(cache: &DomainCache, m: &Match, thresholds: &StatusThresholds) -> MatchDetailView {
    let you = cache.current_user_name();
    let mut players: Vec<PlayerSlot> = m
        .players
        .iter()
        .map(|name| PlayerSlot::Taken {
            name: name.clone(),
            initials: initials(name),
            is_you: you == Some(name.as_str()),
        })
        .collect();
    let capacity = m.max_players as usize;
    if players.len() < capacity {
        players.resize(capacity, PlayerSlot::Open);
    }

    let stadium = cache.stadium_for(m).map(|s| StadiumSummary {
        name: s.name.clone(),
        address: s.address.clone(),
        surface: s.surface.clone(),
        price_label: price_label(s.price_per_hour, Some("hr")),
    });

    MatchDetailView {
        title: m.title.clone(),
        meta_line: format!(
            "{} · {} · {} · {} · {}/{} players",
            m.date,
            m.time,
            stadium_name(cache, m),
            price_label(m.fee, None),
            m.players.len(),
            m.max_players
        ),
        badge: m.status(thresholds).into(),
        stadium,
        rules: m.rules.clone(),
        players,
        join: join_state(m, you).into(),
    }
}

/// Matches shown under `tab`. Membership is by the current user's name;
/// hosting is by ownership of the match's stadium.
pub fn filter_matches<'a>(cache: &'a DomainCache, tab: MatchTab, thresholds: &StatusThresholds) -> Vec<&'a Match> {
    let user = cache.current_user.as_ref();
    cache
        .matches
        .iter()
        .filter(|m| match tab {
            MatchTab::All => true,
            MatchTab::Open => matches!(m.status(thresholds), MatchStatus::Open | MatchStatus::Soon),
            MatchTab::Past => m.status(thresholds) == MatchStatus::Past,
            MatchTab::Joined => user.is_some_and(|u| m.has_player(&u.name)),
            MatchTab::Hosting => user
                .and_then(|u| u.key())
                .is_some_and(|owner| cache.stadium_for(m).is_some_and(|s| s.is_owned_by(owner))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pitchside_api::{Stadium, User};

    fn thresholds() -> StatusThresholds {
        StatusThresholds::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 1)
    }

    fn fixture(id: &str, date: &str, players: &[&str], max: u32) -> Match {
        Match {
            id: Some(id.into()),
            title: format!("Match {id}"),
            stadium_id: Some("s1".into()),
            date: date.into(),
            time: "18:00".into(),
            fee: 5,
            max_players: max,
            players: players.iter().map(|p| p.to_string()).collect(),
            ..Match::default()
        }
    }

    fn cache(current: Option<&str>) -> DomainCache {
        let mut cache = DomainCache::default();
        let g = cache.next_generation();
        cache.load_stadiums(
            g,
            Some(vec![Stadium {
                id: Some("s1".into()),
                name: "Riverside".into(),
                owner_id: Some("owner-1".into()),
                ..Stadium::default()
            }]),
        );
        cache.current_user = current.map(|name| User {
            id: Some("owner-1".into()),
            name: name.into(),
            ..User::default()
        });
        cache
    }

    #[test]
    fn card_counts_spots_and_overflow() {
        let c = cache(None);
        let m = fixture("m1", "2025-07-01", &["ana lopez", "Ben", "Cy", "Dee", "Eve"], 10);
        let card = render_match_card(&c, &m, &thresholds(), false);
        assert_eq!(card.spots_left, 5);
        assert_eq!(card.avatars, vec!["AL", "B", "C"]);
        assert_eq!(card.overflow, Some(2));
        assert_eq!(card.stadium_name, "Riverside");
        assert_eq!(card.badge.label, "Open");

        let small = fixture("m2", "2025-07-01", &["Ana"], 10);
        assert_eq!(render_match_card(&c, &small, &thresholds(), false).overflow, None);
    }

    #[test]
    fn full_match_shows_full_badge_and_button() {
        let c = cache(Some("Cy"));
        let m = fixture("m1", "2025-07-01", &["A", "B"], 2);
        let detail = render_match_detail(&c, &m, &thresholds());
        assert_eq!(detail.badge.status, MatchStatus::Full);
        assert_eq!(detail.join.state, JoinState::Full);
        assert_eq!(detail.join.label, "Match is Full");
        assert!(!detail.join.enabled);
    }

    #[test]
    fn already_joined_wins_over_full() {
        let m = fixture("m1", "2025-07-01", &["A", "B"], 2);
        assert_eq!(join_state(&m, Some("A")), JoinState::AlreadyJoined);
        assert_eq!(join_state(&m, None), JoinState::Full);
        let open = fixture("m2", "2025-07-01", &["A"], 2);
        assert_eq!(join_state(&open, Some("B")), JoinState::Join);
    }

    #[test]
    fn player_grid_pads_open_slots() {
        let c = cache(Some("B"));
        let m = fixture("m1", "2025-07-01", &["A", "B"], 4);
        let detail = render_match_detail(&c, &m, &thresholds());
        assert_eq!(detail.players.len(), 4);
        assert_eq!(
            detail.players[1],
            PlayerSlot::Taken { name: "B".into(), initials: "B".into(), is_you: true }
        );
        assert_eq!(detail.players[2], PlayerSlot::Open);
        assert_eq!(detail.stadium.as_ref().map(|s| s.name.as_str()), Some("Riverside"));
        assert!(detail.meta_line.contains("2/4 players"));
    }

    #[test]
    fn tabs_filter_by_status_membership_and_ownership() {
        let mut c = cache(Some("Ana"));
        let g = c.next_generation();
        c.load_matches(
            g,
            Some(vec![
                fixture("open", "2025-07-01", &["Ana"], 10),
                fixture("full", "2025-07-01", &["A", "B"], 2),
                fixture("old", "2025-05-01", &[], 10),
            ]),
        );
        let ids = |tab| {
            filter_matches(&c, tab, &thresholds())
                .iter()
                .map(|m| m.id.clone().unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(MatchTab::All).len(), 3);
        assert_eq!(ids(MatchTab::Open), vec!["open"]);
        assert_eq!(ids(MatchTab::Past), vec!["old"]);
        assert_eq!(ids(MatchTab::Joined), vec!["open"]);
        assert_eq!(ids(MatchTab::Hosting).len(), 3);
    }

    #[test]
    fn tab_shift_wraps() {
        assert_eq!(MatchTab::All.shifted(-1), MatchTab::Past);
        assert_eq!(MatchTab::Past.shifted(1), MatchTab::All);
    }
}
