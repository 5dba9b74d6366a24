use chrono::NaiveDate;
use pitchside_api::wire::NewMatch;
use pitchside_api::{Identified, Match, MatchStatus, Role, Stadium, StatusThresholds, User};
use std::fmt;

/// Problems caught locally, before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    SignInRequired,
    MissingField(&'static str),
    InvalidNumber(&'static str),
    InvalidDate,
    AlreadyJoined,
    MatchFull,
    MatchFinished,
    TooManyPlayers { selected: usize, max: u32 },
    UnknownSlot(String),
    SlotUnavailable(String),
    MissingIdentifier,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::SignInRequired => write!(f, "Please sign in first"),
            ValidationError::MissingField(label) => write!(f, "{label} is required"),
            ValidationError::InvalidNumber(label) => write!(f, "{label} must be a number"),
            ValidationError::InvalidDate => write!(f, "Date must look like 2025-06-30"),
            ValidationError::AlreadyJoined => write!(f, "You already joined this match"),
            ValidationError::MatchFull => write!(f, "Match is full"),
            ValidationError::MatchFinished => write!(f, "This match has already been played"),
            ValidationError::TooManyPlayers { selected, max } => {
                write!(f, "Too many players: {selected} selected, only {max} allowed")
            }
            ValidationError::UnknownSlot(slot) => write!(f, "{slot} is not a bookable slot"),
            ValidationError::SlotUnavailable(slot) => write!(f, "{slot} is already booked"),
            ValidationError::MissingIdentifier => write!(f, "This record has not been saved yet"),
        }
    }
}

impl std::error::Error for ValidationError {}

pub type Validated<T> = Result<T, ValidationError>;

// ---------------------------------------------------------------------------
// Join & booking
// ---------------------------------------------------------------------------

/// Returns the player name to send. Players are keyed by display name.
pub fn check_join<'a>(m: &Match, user: Option<&'a User>, thresholds: &StatusThresholds) -> Validated<&'a str> {
    let user = user.ok_or(ValidationError::SignInRequired)?;
    if m.key().is_none() {
        return Err(ValidationError::MissingIdentifier);
    }
    if m.has_player(&user.name) {
        return Err(ValidationError::AlreadyJoined);
    }
    match m.status(thresholds) {
        MatchStatus::Full => Err(ValidationError::MatchFull),
        MatchStatus::Past => Err(ValidationError::MatchFinished),
        MatchStatus::Open | MatchStatus::Soon => Ok(user.name.as_str()),
    }
}

/// Returns the stadium identifier to book against.
pub fn check_booking<'a>(stadium: &'a Stadium, slot: &str, user: Option<&User>) -> Validated<&'a str> {
    user.ok_or(ValidationError::SignInRequired)?;
    let id = stadium.key().ok_or(ValidationError::MissingIdentifier)?;
    if !stadium.has_slot(slot) {
        return Err(ValidationError::UnknownSlot(slot.to_string()));
    }
    if !stadium.is_slot_available(slot) {
        return Err(ValidationError::SlotUnavailable(slot.to_string()));
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Drafts: raw form input turned into request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct MatchDraft {
    pub title: String,
    pub stadium_id: String,
    pub date: String,
    pub time: String,
    pub fee: String,
    pub max_players: String,
    pub rules: String,
    pub friends: Vec<String>,
}

/// The creator plus every selected friend must fit under `max_players`.
pub fn build_new_match(draft: &MatchDraft, creator: Option<&User>) -> Validated<NewMatch> {
    let creator = creator.ok_or(ValidationError::SignInRequired)?;
    let title = required(&draft.title, "Title")?;
    let stadium_id = required(&draft.stadium_id, "Stadium")?;
    let date = required(&draft.date, "Date")?;
    NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)?;
    let time = required(&draft.time, "Time")?;
    let fee = optional_number(&draft.fee, "Fee")?.unwrap_or(0);
    let max_players = optional_number(&draft.max_players, "Max players")?
        .ok_or(ValidationError::MissingField("Max players"))?;
    if max_players == 0 {
        return Err(ValidationError::InvalidNumber("Max players"));
    }

    let mut players = vec![creator.name.clone()];
    for friend in &draft.friends {
        if !players.contains(friend) {
            players.push(friend.clone());
        }
    }
    if players.len() > max_players as usize {
        return Err(ValidationError::TooManyPlayers { selected: players.len(), max: max_players });
    }

    Ok(NewMatch {
        title,
        stadium_id,
        date,
        time,
        fee,
        max_players,
        players,
        rules: split_list(&draft.rules),
    })
}

#[derive(Debug, Clone, Default)]
pub struct LoginDraft {
    pub name: String,
    pub phone: String,
    pub position: String,
    pub skill_level: String,
}

pub fn build_login_user(draft: &LoginDraft) -> Validated<User> {
    Ok(User {
        name: required(&draft.name, "Name")?,
        phone: required(&draft.phone, "Phone")?,
        position: draft.position.trim().to_string(),
        skill_level: draft.skill_level.trim().to_string(),
        role: Role::Player,
        ..User::default()
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub phone: String,
    pub age: String,
    pub position: String,
    pub skill_level: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub role: Role,
}

/// Apply edits on top of the persisted record, keeping stats and history.
pub fn apply_profile(draft: &ProfileDraft, base: &User) -> Validated<User> {
    Ok(User {
        name: required(&draft.name, "Name")?,
        phone: required(&draft.phone, "Phone")?,
        age: optional_number(&draft.age, "Age")?,
        position: draft.position.trim().to_string(),
        skill_level: draft.skill_level.trim().to_string(),
        bio: draft.bio.trim().to_string(),
        avatar: draft.avatar.clone().or_else(|| base.avatar.clone()),
        role: draft.role,
        ..base.clone()
    })
}

#[derive(Debug, Clone, Default)]
pub struct StadiumDraft {
    pub name: String,
    pub address: String,
    pub lat: String,
    pub lng: String,
    pub price: String,
    pub surface: String,
    pub amenities: String,
    pub slots: String,
}

pub fn build_new_stadium(draft: &StadiumDraft, owner: Option<&User>) -> Validated<Stadium> {
    let owner = owner.ok_or(ValidationError::SignInRequired)?;
    let owner_id = owner.key().ok_or(ValidationError::MissingIdentifier)?;
    let slots = split_list(&draft.slots);
    if slots.is_empty() {
        return Err(ValidationError::MissingField("Slots"));
    }
    Ok(Stadium {
        name: required(&draft.name, "Name")?,
        address: required(&draft.address, "Address")?,
        lat: parse_coordinate(&draft.lat, "Latitude")?,
        lng: parse_coordinate(&draft.lng, "Longitude")?,
        price_per_hour: optional_number(&draft.price, "Price")?.ok_or(ValidationError::MissingField("Price"))?,
        surface: draft.surface.trim().to_string(),
        amenities: split_list(&draft.amenities),
        slots,
        owner_id: Some(owner_id.to_string()),
        ..Stadium::default()
    })
}

fn required(raw: &str, label: &'static str) -> Validated<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(label));
    }
    Ok(value.to_string())
}

fn optional_number(raw: &str, label: &'static str) -> Validated<Option<u32>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| ValidationError::InvalidNumber(label))
}

fn parse_coordinate(raw: &str, label: &'static str) -> Validated<f64> {
    let value = required(raw, label)?;
    value.parse().map_err(|_| ValidationError::InvalidNumber(label))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> StatusThresholds {
        StatusThresholds::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 1)
    }

    fn user(name: &str) -> User {
        User { id: Some(format!("id-{name}")), name: name.into(), ..User::default() }
    }

    fn fixture(players: &[&str], max: u32) -> Match {
        Match {
            id: Some("m1".into()),
            date: "2025-07-01".into(),
            max_players: max,
            players: players.iter().map(|p| p.to_string()).collect(),
            ..Match::default()
        }
    }

    fn draft(max: &str, friends: &[&str]) -> MatchDraft {
        MatchDraft {
            title: "Friday five".into(),
            stadium_id: "s1".into(),
            date: "2025-07-04".into(),
            time: "19:00".into(),
            fee: "5".into(),
            max_players: max.into(),
            rules: "no slide tackles, bibs provided".into(),
            friends: friends.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn join_rejected_when_full() {
        let m = fixture(&["A", "B"], 2);
        let c = user("C");
        assert_eq!(check_join(&m, Some(&c), &thresholds()), Err(ValidationError::MatchFull));
        assert_eq!(m.players, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn join_rejected_when_already_in() {
        let m = fixture(&["A"], 4);
        let a = user("A");
        assert_eq!(check_join(&m, Some(&a), &thresholds()), Err(ValidationError::AlreadyJoined));
    }

    #[test]
    fn join_requires_sign_in_and_returns_name() {
        let m = fixture(&[], 4);
        assert_eq!(check_join(&m, None, &thresholds()), Err(ValidationError::SignInRequired));
        let ana = user("Ana");
        assert_eq!(check_join(&m, Some(&ana), &thresholds()), Ok("Ana"));
    }

    #[test]
    fn booking_rejects_unavailable_and_unknown_slots() {
        let s = Stadium {
            id: Some("s1".into()),
            slots: vec!["09:00".into(), "11:00".into()],
            unavailable_slots: vec!["09:00".into()],
            ..Stadium::default()
        };
        let u = user("Ana");
        assert_eq!(
            check_booking(&s, "09:00", Some(&u)),
            Err(ValidationError::SlotUnavailable("09:00".into()))
        );
        assert_eq!(check_booking(&s, "13:00", Some(&u)), Err(ValidationError::UnknownSlot("13:00".into())));
        assert_eq!(check_booking(&s, "11:00", None), Err(ValidationError::SignInRequired));
        assert_eq!(check_booking(&s, "11:00", Some(&u)), Ok("s1"));
    }

    #[test]
    fn creator_plus_friends_must_fit() {
        let creator = user("Host");
        let err = build_new_match(&draft("4", &["A", "B", "C", "D"]), Some(&creator)).unwrap_err();
        assert_eq!(err, ValidationError::TooManyPlayers { selected: 5, max: 4 });

        let ok = build_new_match(&draft("4", &["A", "B", "C"]), Some(&creator)).unwrap();
        assert_eq!(ok.players, vec!["Host", "A", "B", "C"]);
        assert_eq!(ok.rules, vec!["no slide tackles", "bibs provided"]);
        assert_eq!(ok.fee, 5);
    }

    #[test]
    fn match_draft_field_checks() {
        let creator = user("Host");
        let mut d = draft("10", &[]);
        d.title = "  ".into();
        assert_eq!(build_new_match(&d, Some(&creator)), Err(ValidationError::MissingField("Title")));
        let mut d = draft("ten", &[]);
        d.fee.clear();
        assert_eq!(build_new_match(&d, Some(&creator)), Err(ValidationError::InvalidNumber("Max players")));
        let mut d = draft("10", &[]);
        d.date = "04/07/2025".into();
        assert_eq!(build_new_match(&d, Some(&creator)), Err(ValidationError::InvalidDate));
        assert_eq!(build_new_match(&draft("0", &[]), Some(&creator)), Err(ValidationError::InvalidNumber("Max players")));
    }

    #[test]
    fn login_requires_name_and_phone() {
        let d = LoginDraft { name: "Ana".into(), ..LoginDraft::default() };
        assert_eq!(build_login_user(&d), Err(ValidationError::MissingField("Phone")));
        let d = LoginDraft { name: " Ana ".into(), phone: "0555".into(), ..LoginDraft::default() };
        let u = build_login_user(&d).unwrap();
        assert_eq!(u.name, "Ana");
        assert!(u.id.is_none());
    }

    #[test]
    fn profile_keeps_stats_and_falls_back_to_saved_avatar() {
        let mut base = user("Ana");
        base.avatar = Some("ana.png".into());
        base.stats.goals = 12;
        let d = ProfileDraft {
            name: "Ana B".into(),
            phone: "0555".into(),
            age: "29".into(),
            role: Role::Owner,
            ..ProfileDraft::default()
        };
        let updated = apply_profile(&d, &base).unwrap();
        assert_eq!(updated.name, "Ana B");
        assert_eq!(updated.age, Some(29));
        assert_eq!(updated.avatar.as_deref(), Some("ana.png"));
        assert_eq!(updated.stats.goals, 12);
        assert_eq!(updated.id, base.id);
        assert!(updated.is_owner());
    }

    #[test]
    fn stadium_draft_sets_owner_and_parses_lists() {
        let owner = user("Olu");
        let d = StadiumDraft {
            name: "Dockside".into(),
            address: "1 Quay St".into(),
            lat: "51.5".into(),
            lng: "-0.1".into(),
            price: "60".into(),
            surface: "3G".into(),
            amenities: "lights, showers".into(),
            slots: "18:00, 19:00".into(),
        };
        let s = build_new_stadium(&d, Some(&owner)).unwrap();
        assert_eq!(s.owner_id.as_deref(), Some("id-Olu"));
        assert_eq!(s.slots, vec!["18:00", "19:00"]);
        assert_eq!(s.amenities, vec!["lights", "showers"]);
        let bad = StadiumDraft { lat: "north".into(), ..d };
        assert_eq!(build_new_stadium(&bad, Some(&owner)), Err(ValidationError::InvalidNumber("Latitude")));
    }
}
