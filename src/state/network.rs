use crate::state::messages::{Mutation, MutationOutput, NetworkRequest, NetworkResponse};
use log::{debug, error, info};
use pitchside_api::client::{ApiResult, PitchsideApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reload {
    Stadiums,
    Matches,
    Users,
}

/// Runs requests one at a time, in arrival order. A mutation's result is
/// sent before the reload of the collection it touched, so the UI sees
/// "booked" and then the fresh stadium list.
pub struct NetworkWorker {
    client: PitchsideApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: PitchsideApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, requests, responses, is_loading: Arc::new(AtomicBool::new(false)) }
    }

    pub async fn run(mut self) {
        info!("network worker talking to {}", self.client.base_url());
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;
            let ok = self.handle(request).await;
            debug!("network request complete");
            self.stop_loading_animation(ok).await;
            if self.responses.is_closed() {
                break;
            }
        }
    }

    /// Returns false when the request (or its reload) failed.
    async fn handle(&self, request: NetworkRequest) -> bool {
        match request {
            NetworkRequest::LoadStadiums { generation } => self.reload(Reload::Stadiums, generation).await,
            NetworkRequest::LoadMatches { generation } => self.reload(Reload::Matches, generation).await,
            NetworkRequest::LoadUsers { generation } => self.reload(Reload::Users, generation).await,
            NetworkRequest::CreateStadium { stadium, generation } => {
                debug!("creating stadium {}", stadium.name);
                let result = self.client.create_stadium(&stadium).await;
                self.mutate(Mutation::CreateStadium, wrap(result, MutationOutput::Stadium), Reload::Stadiums, generation)
                    .await
            }
            NetworkRequest::BookSlot { stadium_id, time, generation } => {
                debug!("booking {stadium_id} at {time}");
                let result = self.client.book_slot(&stadium_id, &time).await;
                self.mutate(
                    Mutation::BookSlot { time },
                    wrap(result, MutationOutput::Stadium),
                    Reload::Stadiums,
                    generation,
                )
                .await
            }
            NetworkRequest::CreateMatch { new_match, generation } => {
                debug!("creating match {}", new_match.title);
                let result = self.client.create_match(&new_match).await;
                self.mutate(Mutation::CreateMatch, wrap(result, MutationOutput::Match), Reload::Matches, generation)
                    .await
            }
            NetworkRequest::JoinMatch { match_id, player_name, generation } => {
                debug!("{player_name} joining {match_id}");
                let result = self.client.join_match(&match_id, &player_name).await.map(|_| MutationOutput::Joined);
                self.mutate(Mutation::JoinMatch, result, Reload::Matches, generation).await
            }
            NetworkRequest::CreateUser { user, generation } => {
                debug!("creating user {}", user.name);
                let result = self.client.create_user(&user).await;
                self.mutate(Mutation::CreateUser, wrap(result, MutationOutput::User), Reload::Users, generation)
                    .await
            }
            NetworkRequest::UpdateUser { user_id, user, generation } => {
                let result = match user_id {
                    Some(id) => {
                        debug!("updating user {id}");
                        self.client.update_user(&id, &user).await
                    }
                    None => {
                        debug!("user {} has no id yet, creating instead", user.name);
                        self.client.create_user(&user).await
                    }
                };
                self.mutate(Mutation::UpdateUser, wrap(result, MutationOutput::User), Reload::Users, generation)
                    .await
            }
        }
    }

    async fn mutate(
        &self,
        mutation: Mutation,
        result: ApiResult<MutationOutput>,
        reload: Reload,
        generation: u64,
    ) -> bool {
        let ok = result.is_ok();
        if !self.send(NetworkResponse::MutationFinished { mutation, result }).await {
            return false;
        }
        // Reload even after a failure; the backend may have applied part of it.
        self.reload(reload, generation).await && ok
    }

    async fn reload(&self, reload: Reload, generation: u64) -> bool {
        let (response, ok) = match reload {
            Reload::Stadiums => {
                let stadiums = self.client.list_stadiums().await;
                let ok = stadiums.is_some();
                (NetworkResponse::StadiumsLoaded { generation, stadiums }, ok)
            }
            Reload::Matches => {
                let matches = self.client.list_matches().await;
                let ok = matches.is_some();
                (NetworkResponse::MatchesLoaded { generation, matches }, ok)
            }
            Reload::Users => {
                let users = self.client.list_users().await;
                let ok = users.is_some();
                (NetworkResponse::UsersLoaded { generation, users }, ok)
            }
        };
        self.send(response).await && ok
    }

    async fn send(&self, response: NetworkResponse) -> bool {
        match self.responses.send(response).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to send network response: {e}");
                false
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self.responses.send(NetworkResponse::LoadingStateChanged { loading_state }).await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses.send(NetworkResponse::LoadingStateChanged { loading_state }).await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

fn wrap<T>(result: ApiResult<T>, into: impl FnOnce(Box<T>) -> MutationOutput) -> ApiResult<MutationOutput> {
    result.map(|value| into(Box::new(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    async fn drain(mut rx: mpsc::Receiver<NetworkResponse>) -> Vec<NetworkResponse> {
        let mut out = Vec::new();
        while let Some(r) = rx.recv().await {
            if !matches!(r, NetworkResponse::LoadingStateChanged { .. }) {
                out.push(r);
            }
        }
        out
    }

    #[tokio::test]
    async fn join_reports_result_then_reloads_matches() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/matches/m1/join")
            .match_body(mockito::Matcher::Json(serde_json::json!({"playerName": "Ana"})))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/matches")
            .with_status(200)
            .with_body(r#"[{"id":"m1","players":["Ana"],"maxPlayers":10}]"#)
            .create_async()
            .await;

        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, resp_rx) = mpsc::channel(64);
        let worker = NetworkWorker::new(PitchsideApi::new(server.url()), req_rx, resp_tx);
        req_tx
            .send(NetworkRequest::JoinMatch { match_id: "m1".into(), player_name: "Ana".into(), generation: 7 })
            .await
            .unwrap();
        drop(req_tx);
        worker.run().await;

        let responses = drain(resp_rx).await;
        assert!(matches!(
            &responses[0],
            NetworkResponse::MutationFinished { mutation: Mutation::JoinMatch, result: Ok(MutationOutput::Joined) }
        ));
        match &responses[1] {
            NetworkResponse::MatchesLoaded { generation, matches: Some(m) } => {
                assert_eq!(*generation, 7);
                assert_eq!(m[0].players, vec!["Ana".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_booking_carries_server_message_and_still_reloads() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/stadiums/s1/book")
            .with_status(409)
            .with_body(r#"{"error":"Slot already booked"}"#)
            .create_async()
            .await;
        server.mock("GET", "/stadiums").with_status(500).create_async().await;

        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, resp_rx) = mpsc::channel(64);
        let worker = NetworkWorker::new(PitchsideApi::new(server.url()), req_rx, resp_tx);
        req_tx
            .send(NetworkRequest::BookSlot { stadium_id: "s1".into(), time: "09:00".into(), generation: 1 })
            .await
            .unwrap();
        drop(req_tx);
        worker.run().await;

        let responses = drain(resp_rx).await;
        match &responses[0] {
            NetworkResponse::MutationFinished { mutation: Mutation::BookSlot { time }, result: Err(failure) } => {
                assert_eq!(time, "09:00");
                assert_eq!(failure.error, "Slot already booked");
                assert_eq!(failure.status, Some(409));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(responses[1], NetworkResponse::StadiumsLoaded { stadiums: None, .. }));
    }

    #[tokio::test]
    async fn user_without_id_is_created_not_updated() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/users")
            .with_status(201)
            .with_body(r#"{"id":"u5","name":"Ana"}"#)
            .create_async()
            .await;
        server.mock("GET", "/users").with_status(200).with_body("[]").create_async().await;

        let (req_tx, req_rx) = mpsc::channel(4);
        let (resp_tx, resp_rx) = mpsc::channel(64);
        let worker = NetworkWorker::new(PitchsideApi::new(server.url()), req_rx, resp_tx);
        let user = pitchside_api::User { name: "Ana".into(), ..Default::default() };
        req_tx.send(NetworkRequest::UpdateUser { user_id: None, user, generation: 1 }).await.unwrap();
        drop(req_tx);
        worker.run().await;

        create.assert_async().await;
        let responses = drain(resp_rx).await;
        match &responses[0] {
            NetworkResponse::MutationFinished { result: Ok(MutationOutput::User(u)), .. } => {
                assert_eq!(u.id.as_deref(), Some("u5"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
