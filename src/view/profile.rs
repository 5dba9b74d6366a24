use crate::state::cache::DomainCache;
use crate::state::forms::{FieldKind, FormField, FormState};
use crate::view::initials;
use pitchside_api::{Identified, Role, User};

pub const PROFILE_FORM: &str = "profile";

pub const POSITIONS: [&str; 5] = ["", "Goalkeeper", "Defender", "Midfielder", "Forward"];
pub const SKILL_LEVELS: [&str; 4] = ["", "Beginner", "Intermediate", "Advanced"];

/// What the avatar slot shows, highest precedence first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarView {
    /// Picked in the form but not saved yet.
    Pending(String),
    Saved(String),
    Initials(String),
}

impl AvatarView {
    pub fn label(&self) -> &str {
        match self {
            AvatarView::Pending(s) | AvatarView::Saved(s) | AvatarView::Initials(s) => s,
        }
    }
}

pub fn avatar_for(user: &User, pending: Option<&str>) -> AvatarView {
    match (pending, user.avatar.as_deref()) {
        (Some(p), _) if !p.trim().is_empty() => AvatarView::Pending(p.to_string()),
        (_, Some(saved)) if !saved.trim().is_empty() => AvatarView::Saved(saved.to_string()),
        _ => AvatarView::Initials(initials(&user.name)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileHeader {
    Guest {
        prompt: &'static str,
    },
    Member {
        name: String,
        avatar: AvatarView,
        role_label: &'static str,
        show_owner_menu: bool,
        stats_line: String,
    },
}

pub fn render_profile_header(user: Option<&User>) -> ProfileHeader {
    let Some(user) = user else {
        return ProfileHeader::Guest { prompt: "Sign in to book pitches and join matches" };
    };
    ProfileHeader::Member {
        name: user.name.clone(),
        avatar: avatar_for(user, None),
        role_label: user.role.label(),
        show_owner_menu: user.is_owner(),
        stats_line: format!(
            "{} played · {} goals · rating {:.1}",
            user.stats.matches_played, user.stats.goals, user.stats.rating
        ),
    }
}

fn options(values: &[&str]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| {
            let label = if v.is_empty() { "Not set" } else { v };
            (v.to_string(), label.to_string())
        })
        .collect()
}

/// Blank profile form. Position and skill keep any free-text value the
/// backend already holds as an extra option.
pub fn profile_form() -> FormState {
    FormState::new(
        PROFILE_FORM,
        vec![
            FormField::text("name", "Name").required(),
            FormField::text("phone", "Phone").required(),
            FormField::number("age", "Age"),
            FormField::choice("position", "Position", options(&POSITIONS)),
            FormField::choice("skill", "Skill level", options(&SKILL_LEVELS)),
            FormField::text("bio", "Bio"),
            FormField::text("avatar", "Avatar"),
            FormField::choice(
                "role",
                "Role",
                vec![
                    ("player".into(), Role::Player.label().into()),
                    ("owner".into(), Role::Owner.label().into()),
                ],
            ),
        ],
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileFormView {
    pub form: FormState,
    pub avatar: AvatarView,
}

/// Form pre-filled from the current user. The avatar field holds the pending
/// selection, if any; the persisted reference only shows in the preview.
pub fn render_profile_form(user: &User, pending_avatar: Option<&str>) -> ProfileFormView {
    let mut form = profile_form();
    form.set("name", user.name.clone());
    form.set("phone", user.phone.clone());
    form.set("age", user.age.map(|a| a.to_string()).unwrap_or_default());
    form.set("bio", user.bio.clone());
    form.set("avatar", pending_avatar.unwrap_or_default());
    select(&mut form, "position", &user.position, &POSITIONS);
    select(&mut form, "skill", &user.skill_level, &SKILL_LEVELS);
    let role = match user.role {
        Role::Player => "player",
        Role::Owner => "owner",
    };
    select(&mut form, "role", role, &["player", "owner"]);
    ProfileFormView { form, avatar: avatar_for(user, pending_avatar) }
}

fn select(form: &mut FormState, key: &str, value: &str, known: &[&str]) {
    let Some(field) = form.field(key) else {
        return;
    };
    let mut choices = match &field.kind {
        FieldKind::Choice(c) => c.clone(),
        _ => return,
    };
    if !known.contains(&value) {
        choices.push((value.to_string(), value.to_string()));
    }
    form.set(key, value);
    form.set_choices(key, choices);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub label: String,
    pub match_id: Option<String>,
}

/// Recorded history first, then matches the user's name appears in. Entries
/// naming the same match are listed once.
pub fn match_history(cache: &DomainCache, user: &User) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = user
        .match_history
        .iter()
        .map(|entry| match cache.get_match_by_id(entry) {
            Some(m) => HistoryEntry { label: m.title.clone(), match_id: m.key().map(ToString::to_string) },
            None => HistoryEntry { label: entry.clone(), match_id: None },
        })
        .collect();
    for m in cache.matches.iter().filter(|m| m.has_player(&user.name)) {
        let id = m.key().map(ToString::to_string);
        if id.is_some() && entries.iter().any(|e| e.match_id == id) {
            continue;
        }
        entries.push(HistoryEntry { label: format!("{} · {}", m.title, m.date), match_id: id });
    }
    entries
}
