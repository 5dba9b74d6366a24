pub mod client;
pub mod wire;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub use wire::StadiumRef;

// ---------------------------------------------------------------------------
// Identity: records arrive with either `id` or `_id` depending on origin
// ---------------------------------------------------------------------------

/// Records that can be addressed by a primary or an alternate identifier.
///
/// Lookups must accept either form: a record created through one backend
/// carries `id`, a record populated by another carries `_id`.
pub trait Identified {
    fn primary_id(&self) -> Option<&str>;
    fn alternate_id(&self) -> Option<&str>;

    /// The identifier used in request paths: primary first, then alternate.
    fn key(&self) -> Option<&str> {
        self.primary_id().or_else(|| self.alternate_id())
    }

    fn has_id(&self, id: &str) -> bool {
        self.primary_id() == Some(id) || self.alternate_id() == Some(id)
    }
}

/// Linear lookup by either identifier form.
pub fn find_by_id<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.has_id(id))
}

macro_rules! impl_identified {
    ($ty:ty) => {
        impl Identified for $ty {
            fn primary_id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn alternate_id(&self) -> Option<&str> {
                self.alt_id.as_deref()
            }
        }
    };
}

impl_identified!(Stadium);
impl_identified!(Match);
impl_identified!(User);

// ---------------------------------------------------------------------------
// Stadium
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stadium {
    #[serde(default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
    #[serde(default, alias = "price")]
    pub price_per_hour: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub surface: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Bookable time-slot labels in display order ("09:00", "11:00", ...).
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(default)]
    pub unavailable_slots: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl Stadium {
    pub fn has_slot(&self, slot: &str) -> bool {
        self.slots.iter().any(|s| s == slot)
    }

    pub fn is_slot_available(&self, slot: &str) -> bool {
        self.has_slot(slot) && !self.unavailable_slots.iter().any(|s| s == slot)
    }

    pub fn available_slots(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .map(String::as_str)
            .filter(|s| !self.unavailable_slots.iter().any(|u| u == s))
    }

    /// Drop unavailable entries that are not real slots, keeping
    /// `unavailable_slots ⊆ slots`. Returns the dropped labels.
    pub fn retain_known_unavailable(&mut self) -> Vec<String> {
        let (kept, dropped): (Vec<String>, Vec<String>) = std::mem::take(&mut self.unavailable_slots)
            .into_iter()
            .partition(|u| self.slots.iter().any(|s| s == u));
        self.unavailable_slots = kept;
        dropped
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id.as_deref() == Some(user_id)
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub stadium_id: Option<String>,
    /// Raw reference as sent by the API: bare identifier or populated record.
    #[serde(rename = "stadium", default, skip_serializing_if = "Option::is_none")]
    pub stadium_ref: Option<StadiumRef>,
    /// Back-reference kept after normalization when the API populated the stadium.
    #[serde(skip)]
    pub stadium: Option<Box<Stadium>>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub fee: u32,
    #[serde(default)]
    pub max_players: u32,
    /// Display names in join order. Membership is keyed by name, not user id.
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Match {
    /// Split a populated stadium reference into the `stadium` back-reference
    /// and a flat `stadium_id`, so lookups work the same for both shapes.
    pub fn normalize_stadium_ref(&mut self) {
        match self.stadium_ref.take() {
            Some(StadiumRef::Populated(stadium)) => {
                if let Some(key) = stadium.key() {
                    self.stadium_id = Some(key.to_string());
                }
                self.stadium = Some(stadium);
            }
            Some(StadiumRef::Id(raw)) => {
                if self.stadium_id.is_none() {
                    self.stadium_id = Some(raw.into_string());
                }
            }
            None => {}
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        let head = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    pub fn has_player(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }

    pub fn spots_left(&self) -> u32 {
        self.max_players.saturating_sub(self.players.len() as u32)
    }

    /// Always derived from the current player count, never stored.
    pub fn status(&self, thresholds: &StatusThresholds) -> MatchStatus {
        let date = self.date();
        if date.is_some_and(|d| d < thresholds.past_before) {
            return MatchStatus::Past;
        }
        if self.is_full() {
            return MatchStatus::Full;
        }
        // An unrepresentable window means no match counts as soon.
        let soon_until = Duration::try_days(thresholds.soon_within_days)
            .and_then(|window| thresholds.past_before.checked_add_signed(window));
        if let (Some(d), Some(until)) = (date, soon_until)
            && d <= until
        {
            return MatchStatus::Soon;
        }
        MatchStatus::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Open,
    Soon,
    Full,
    Past,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Open => "open",
            MatchStatus::Soon => "soon",
            MatchStatus::Full => "full",
            MatchStatus::Past => "past",
        }
    }

    pub fn badge_label(&self) -> &'static str {
        match self {
            MatchStatus::Open => "Open",
            MatchStatus::Soon => "Starting Soon",
            MatchStatus::Full => "Full",
            MatchStatus::Past => "Finished",
        }
    }
}

/// Time thresholds for status derivation. The "past" cutoff is explicit
/// configuration rather than a literal buried in the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    /// Matches dated strictly before this day are past.
    pub past_before: NaiveDate,
    pub soon_within_days: i64,
}

impl StatusThresholds {
    pub fn new(past_before: NaiveDate, soon_within_days: i64) -> Self {
        Self { past_before, soon_within_days }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Player,
    Owner,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Owner => "Pitch Owner",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Role::Player => Role::Owner,
            Role::Owner => Role::Player,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub matches_played: u32,
    #[serde(default)]
    pub goals: u32,
    #[serde(default)]
    pub rating: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Absent until the record has been persisted once.
    #[serde(default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "wire::optional_id", skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub skill_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub match_history: Vec<String>,
}

impl User {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

/// Phone numbers compare on their digits only, so "0555 123 456" and
/// "0555123456" identify the same user.
pub fn same_phone(a: &str, b: &str) -> bool {
    let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
    let (a, b) = (digits(a), digits(b));
    !a.is_empty() && a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> StatusThresholds {
        StatusThresholds::new(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(), 1)
    }

    fn game(date: &str, players: &[&str], max: u32) -> Match {
        Match {
            date: date.into(),
            max_players: max,
            players: players.iter().map(|p| p.to_string()).collect(),
            ..Match::default()
        }
    }

    #[test]
    fn full_when_players_reach_capacity() {
        let m = game("2025-07-01", &["A", "B"], 2);
        assert_eq!(m.status(&thresholds()), MatchStatus::Full);
        assert_eq!(m.spots_left(), 0);
    }

    #[test]
    fn huge_soon_window_does_not_overflow() {
        let m = game("2025-07-01", &["A"], 2);
        for days in [1_000_000_000, -1_000_000_000, i64::MAX, i64::MIN] {
            let thresholds = StatusThresholds::new(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(), days);
            assert_eq!(m.status(&thresholds), MatchStatus::Open);
        }
    }

    #[test]
    fn status_follows_player_count() {
        let mut m = game("2025-07-01", &["A"], 2);
        assert_eq!(m.status(&thresholds()), MatchStatus::Open);
        m.players.push("B".into());
        assert_eq!(m.status(&thresholds()), MatchStatus::Full);
    }

    #[test]
    fn past_uses_configured_cutoff() {
        let m = game("2025-06-09", &[], 10);
        assert_eq!(m.status(&thresholds()), MatchStatus::Past);
        let later = StatusThresholds::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 1);
        assert_eq!(m.status(&later), MatchStatus::Soon);
    }

    #[test]
    fn soon_inside_window_open_outside() {
        assert_eq!(game("2025-06-11", &[], 10).status(&thresholds()), MatchStatus::Soon);
        assert_eq!(game("2025-06-12", &[], 10).status(&thresholds()), MatchStatus::Open);
    }

    #[test]
    fn date_accepts_timestamps() {
        let m = game("2025-06-12T18:00:00.000Z", &[], 10);
        assert_eq!(m.date(), NaiveDate::from_ymd_opt(2025, 6, 12));
    }

    #[test]
    fn populated_stadium_reference_is_split() {
        let mut m: Match = serde_json::from_str(
            r#"{"_id":"m1","title":"Five-a-side","stadium":{"_id":"s9","name":"Green Park"},"maxPlayers":10}"#,
        )
        .unwrap();
        m.normalize_stadium_ref();
        assert_eq!(m.stadium_id.as_deref(), Some("s9"));
        assert_eq!(m.stadium.as_ref().map(|s| s.name.as_str()), Some("Green Park"));
        assert!(m.stadium_ref.is_none());
    }

    #[test]
    fn bare_stadium_reference_becomes_id() {
        let mut m: Match = serde_json::from_str(r#"{"id":7,"stadium":3}"#).unwrap();
        m.normalize_stadium_ref();
        assert_eq!(m.id.as_deref(), Some("7"));
        assert_eq!(m.stadium_id.as_deref(), Some("3"));
        assert!(m.stadium.is_none());
    }

    #[test]
    fn lookup_accepts_either_identifier() {
        let stadiums = vec![
            Stadium { id: Some("1".into()), name: "A".into(), ..Stadium::default() },
            Stadium { alt_id: Some("abc".into()), name: "B".into(), ..Stadium::default() },
        ];
        assert_eq!(find_by_id(&stadiums, "1").map(|s| s.name.as_str()), Some("A"));
        assert_eq!(find_by_id(&stadiums, "abc").map(|s| s.name.as_str()), Some("B"));
        assert!(find_by_id(&stadiums, "zzz").is_none());
    }

    #[test]
    fn unknown_unavailable_slots_are_dropped() {
        let mut s = Stadium {
            slots: vec!["09:00".into(), "11:00".into()],
            unavailable_slots: vec!["09:00".into(), "23:00".into()],
            ..Stadium::default()
        };
        assert_eq!(s.retain_known_unavailable(), vec!["23:00".to_string()]);
        assert_eq!(s.unavailable_slots, vec!["09:00".to_string()]);
        assert!(!s.is_slot_available("09:00"));
        assert!(s.is_slot_available("11:00"));
        assert_eq!(s.available_slots().collect::<Vec<_>>(), vec!["11:00"]);
    }

    #[test]
    fn phones_compare_by_digits() {
        assert!(same_phone("0555 123 456", "0555123456"));
        assert!(!same_phone("", ""));
        assert!(!same_phone("0555", "0556"));
    }

    #[test]
    fn role_defaults_to_player() {
        let u: User = serde_json::from_str(r#"{"name":"Sam"}"#).unwrap();
        assert_eq!(u.role, Role::Player);
        assert!(u.id.is_none());
    }
}
