use crate::state::cache::DomainCache;
use crate::view::matches::{MatchCard, render_match_card};
use crate::view::stadiums::{CardLayout, StadiumCard, render_stadium_card};
use pitchside_api::{MatchStatus, Stadium, StatusThresholds};

const HOME_ITEMS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct HomeView {
    pub greeting: String,
    pub upcoming: Vec<MatchCard>,
    pub featured: Vec<StadiumCard>,
    pub stadium_count: usize,
    pub open_match_count: usize,
}

pub fn render_home(cache: &DomainCache, thresholds: &StatusThresholds) -> HomeView {
    let greeting = match cache.current_user_name() {
        Some(name) => format!("Welcome back, {}", name.split_whitespace().next().unwrap_or(name)),
        None => "Find a pitch, join a game".to_string(),
    };

    let joinable: Vec<_> = cache
        .matches
        .iter()
        .filter(|m| matches!(m.status(thresholds), MatchStatus::Open | MatchStatus::Soon))
        .collect();
    let upcoming = joinable
        .iter()
        .take(HOME_ITEMS)
        .map(|m| render_match_card(cache, m, thresholds, false))
        .collect();

    let mut by_rating: Vec<&Stadium> = cache.stadiums.iter().collect();
    by_rating.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    let featured = by_rating
        .into_iter()
        .take(HOME_ITEMS)
        .map(|s| render_stadium_card(s, CardLayout::Grid, false))
        .collect();

    HomeView {
        greeting,
        upcoming,
        featured,
        stadium_count: cache.stadiums.len(),
        open_match_count: joinable.len(),
    }
}
