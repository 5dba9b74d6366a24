use log::{debug, warn};
use pitchside_api::{Identified, Match, Stadium, User, find_by_id, same_phone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Stadiums,
    Matches,
    Users,
}

impl Collection {
    fn index(self) -> usize {
        match self {
            Collection::Stadiums => 0,
            Collection::Matches => 1,
            Collection::Users => 2,
        }
    }
}

/// Load generations. Every load request is stamped with a fresh number; a
/// response older than the last one applied to its collection is dropped.
#[derive(Debug, Default)]
struct Generations {
    issued: u64,
    applied: [u64; 3],
}

/// In-memory mirror of the backend collections.
///
/// Collections are only ever replaced wholesale by their `load_*` method. A
/// failed load (`None`) leaves the previous collection in place.
#[derive(Debug, Default)]
pub struct DomainCache {
    pub stadiums: Vec<Stadium>,
    pub matches: Vec<Match>,
    pub users: Vec<User>,
    /// `None` is the guest state.
    pub current_user: Option<User>,
    generations: Generations,
}

impl DomainCache {
    pub fn next_generation(&mut self) -> u64 {
        self.generations.issued += 1;
        self.generations.issued
    }

    fn accept(&mut self, collection: Collection, generation: u64) -> bool {
        let applied = &mut self.generations.applied[collection.index()];
        if generation < *applied {
            warn!("dropping stale {collection:?} load (generation {generation} < {applied})");
            return false;
        }
        *applied = generation;
        true
    }

    /// Returns true when the collection was replaced.
    pub fn load_stadiums(&mut self, generation: u64, result: Option<Vec<Stadium>>) -> bool {
        let Some(mut stadiums) = result else {
            debug!("stadium load failed, keeping {} cached", self.stadiums.len());
            return false;
        };
        if !self.accept(Collection::Stadiums, generation) {
            return false;
        }
        for stadium in &mut stadiums {
            let dropped = stadium.retain_known_unavailable();
            if !dropped.is_empty() {
                warn!("stadium {:?} lists unknown unavailable slots {dropped:?}", stadium.key());
            }
        }
        self.stadiums = stadiums;
        true
    }

    pub fn load_matches(&mut self, generation: u64, result: Option<Vec<Match>>) -> bool {
        let Some(mut matches) = result else {
            debug!("match load failed, keeping {} cached", self.matches.len());
            return false;
        };
        if !self.accept(Collection::Matches, generation) {
            return false;
        }
        for m in &mut matches {
            m.normalize_stadium_ref();
        }
        self.matches = matches;
        true
    }

    /// Replace users, then re-resolve the current user from the session
    /// snapshot against the fresh list.
    pub fn load_users(&mut self, generation: u64, result: Option<Vec<User>>, saved: Option<User>) -> bool {
        let Some(users) = result else {
            debug!("user load failed, keeping {} cached", self.users.len());
            return false;
        };
        if !self.accept(Collection::Users, generation) {
            return false;
        }
        self.users = users;
        self.resolve_current_user(saved.as_ref());
        true
    }

    /// Only the snapshot's identifier is trusted; its other fields may be
    /// stale. An unknown identifier yields the guest state.
    pub fn resolve_current_user(&mut self, saved: Option<&User>) {
        self.current_user = saved
            .and_then(|snapshot| snapshot.key())
            .and_then(|id| self.get_user_by_id(id))
            .cloned();
    }

    pub fn get_stadium_by_id(&self, id: &str) -> Option<&Stadium> {
        find_by_id(&self.stadiums, id)
    }

    pub fn get_match_by_id(&self, id: &str) -> Option<&Match> {
        find_by_id(&self.matches, id)
    }

    pub fn get_user_by_id(&self, id: &str) -> Option<&User> {
        find_by_id(&self.users, id)
    }

    pub fn find_user_by_phone(&self, phone: &str) -> Option<&User> {
        self.users.iter().find(|u| same_phone(&u.phone, phone))
    }

    /// Resolve a match's stadium: the cached record first, then the
    /// back-reference captured from a populated response.
    pub fn stadium_for<'a>(&'a self, m: &'a Match) -> Option<&'a Stadium> {
        m.stadium_id
            .as_deref()
            .and_then(|id| self.get_stadium_by_id(id))
            .or(m.stadium.as_deref())
    }

    pub fn current_user_name(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.name.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.current_user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stadium(id: Option<&str>, alt: Option<&str>, name: &str) -> Stadium {
        Stadium {
            id: id.map(Into::into),
            alt_id: alt.map(Into::into),
            name: name.into(),
            ..Stadium::default()
        }
    }

    fn user(id: &str, name: &str, phone: &str) -> User {
        User { id: Some(id.into()), name: name.into(), phone: phone.into(), ..User::default() }
    }

    #[test]
    fn lookups_accept_primary_and_alternate_ids() {
        let mut cache = DomainCache::default();
        let g = cache.next_generation();
        cache.load_stadiums(g, Some(vec![stadium(Some("1"), None, "A"), stadium(None, Some("x9"), "B")]));
        assert_eq!(cache.get_stadium_by_id("1").map(|s| s.name.as_str()), Some("A"));
        assert_eq!(cache.get_stadium_by_id("x9").map(|s| s.name.as_str()), Some("B"));

        let matches: Vec<Match> =
            serde_json::from_str(r#"[{"id":"m1","title":"One"},{"_id":"m2","title":"Two"}]"#).unwrap();
        let g = cache.next_generation();
        cache.load_matches(g, Some(matches));
        assert_eq!(cache.get_match_by_id("m1").map(|m| m.title.as_str()), Some("One"));
        assert_eq!(cache.get_match_by_id("m2").map(|m| m.title.as_str()), Some("Two"));
    }

    #[test]
    fn snapshot_resolves_against_alternate_user_id() {
        let mut cache = DomainCache::default();
        let stored = User { alt_id: Some("mongo1".into()), name: "Ana".into(), ..User::default() };
        let g = cache.next_generation();
        cache.load_users(g, Some(vec![user("u2", "Ben", "222"), stored]), None);
        assert_eq!(cache.get_user_by_id("mongo1").map(|u| u.name.as_str()), Some("Ana"));

        let snapshot = User { id: Some("mongo1".into()), name: "Old name".into(), ..User::default() };
        cache.resolve_current_user(Some(&snapshot));
        assert_eq!(cache.current_user_name(), Some("Ana"));
    }

    #[test]
    fn failed_load_keeps_previous_collection() {
        let mut cache = DomainCache::default();
        let g = cache.next_generation();
        cache.load_stadiums(g, Some(vec![stadium(Some("1"), None, "A")]));
        let g = cache.next_generation();
        assert!(!cache.load_stadiums(g, None));
        assert_eq!(cache.stadiums.len(), 1);
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut cache = DomainCache::default();
        let older = cache.next_generation();
        let newer = cache.next_generation();
        assert!(cache.load_stadiums(newer, Some(vec![stadium(Some("2"), None, "New")])));
        assert!(!cache.load_stadiums(older, Some(vec![stadium(Some("1"), None, "Old")])));
        assert_eq!(cache.stadiums[0].name, "New");
    }

    #[test]
    fn load_matches_normalizes_populated_stadium() {
        let mut cache = DomainCache::default();
        let matches: Vec<Match> = serde_json::from_str(
            r#"[{"id":"m1","stadium":{"_id":"s1","name":"Riverside"}},{"id":"m2","stadium":"s2"}]"#,
        )
        .unwrap();
        let g = cache.next_generation();
        cache.load_matches(g, Some(matches));
        assert_eq!(cache.matches[0].stadium_id.as_deref(), Some("s1"));
        assert_eq!(cache.matches[1].stadium_id.as_deref(), Some("s2"));
        // Not in the stadium cache, but the back-reference resolves it.
        let first = &cache.matches[0];
        assert_eq!(cache.stadium_for(first).map(|s| s.name.as_str()), Some("Riverside"));
        assert!(cache.stadium_for(&cache.matches[1]).is_none());
    }

    #[test]
    fn rehydrates_current_user_from_fresh_record() {
        let mut cache = DomainCache::default();
        let mut snapshot = user("u1", "Old Name", "111");
        snapshot.bio = "stale".into();
        let g = cache.next_generation();
        cache.load_users(g, Some(vec![user("u1", "New Name", "111")]), Some(snapshot));
        let current = cache.current_user.as_ref().unwrap();
        assert_eq!(current.name, "New Name");
        assert_eq!(current.bio, "");
    }

    #[test]
    fn unknown_snapshot_id_becomes_guest() {
        let mut cache = DomainCache {
            current_user: Some(user("u9", "Ghost", "999")),
            ..DomainCache::default()
        };
        let g = cache.next_generation();
        cache.load_users(g, Some(vec![user("u1", "Ana", "111")]), Some(user("u9", "Ghost", "999")));
        assert!(cache.current_user.is_none());
    }

    #[test]
    fn snapshot_matches_alternate_id() {
        let mut cache = DomainCache::default();
        let fresh = User { alt_id: Some("mongo1".into()), name: "Ana".into(), ..User::default() };
        let snapshot = User { alt_id: Some("mongo1".into()), ..User::default() };
        let g = cache.next_generation();
        cache.load_users(g, Some(vec![fresh]), Some(snapshot));
        assert_eq!(cache.current_user_name(), Some("Ana"));
    }

    #[test]
    fn phone_lookup_ignores_formatting() {
        let mut cache = DomainCache::default();
        let g = cache.next_generation();
        cache.load_users(g, Some(vec![user("u1", "Ana", "0555 123 456")]), None);
        assert_eq!(cache.find_user_by_phone("0555123456").map(|u| u.name.as_str()), Some("Ana"));
        assert!(cache.find_user_by_phone("0000").is_none());
    }
}
