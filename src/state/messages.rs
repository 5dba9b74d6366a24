use crate::state::network::LoadingState;
use crate::state::router::Page;
use crossterm::event::{KeyEvent, MouseEvent};
use pitchside_api::client::ApiFailure;
use pitchside_api::wire::NewMatch;
use pitchside_api::{Match, Stadium, User};

/// Work for the network worker. Every request carries the generation its
/// collection reload is stamped with; mutations reload afterwards.
#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadStadiums { generation: u64 },
    LoadMatches { generation: u64 },
    LoadUsers { generation: u64 },
    CreateStadium { stadium: Stadium, generation: u64 },
    BookSlot { stadium_id: String, time: String, generation: u64 },
    CreateMatch { new_match: NewMatch, generation: u64 },
    JoinMatch { match_id: String, player_name: String, generation: u64 },
    CreateUser { user: User, generation: u64 },
    /// `user_id` is `None` for a record that was never persisted; it is
    /// created instead.
    UpdateUser { user_id: Option<String>, user: User, generation: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateStadium,
    BookSlot { time: String },
    CreateMatch,
    JoinMatch,
    CreateUser,
    UpdateUser,
}

#[derive(Debug, Clone)]
pub enum MutationOutput {
    Stadium(Box<Stadium>),
    Match(Box<Match>),
    User(Box<User>),
    Joined,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    StadiumsLoaded { generation: u64, stadiums: Option<Vec<Stadium>> },
    MatchesLoaded { generation: u64, matches: Option<Vec<Match>> },
    UsersLoaded { generation: u64, users: Option<Vec<User>> },
    MutationFinished { mutation: Mutation, result: Result<MutationOutput, ApiFailure> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    AppStarted,
    Tick,
    /// The page has been shown long enough for its layout to settle.
    PageSettled(Page),
}
