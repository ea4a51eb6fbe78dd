//! Screen controller: the user-facing actions and how their completions
//! are merged into [`ScreenState`].
//!
//! Actions never wait on the network. Each one spawns its request on the
//! tokio runtime; the finished request comes back as an [`Outcome`] over a
//! channel and is applied on the UI thread by [`Controller::pump`] (or
//! awaited with [`Controller::settle`]).

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use super::ScreenState;
use crate::api::{ApiClient, NewUser, PositionList, User};
use crate::error::ApiError;

/// One call against the API, ready to be spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Token,
    Positions,
    Users { page: u32, count: u32 },
    UserById(String),
    CreateUser { user: NewUser, token: String },
}

impl Request {
    /// Run the call and wrap its result for the UI thread.
    pub async fn execute(self, client: &ApiClient) -> Outcome {
        match self {
            Self::Token => Outcome::Token(client.token().await),
            Self::Positions => Outcome::Positions(client.positions().await),
            Self::Users { page, count } => Outcome::Users {
                page,
                result: client.users(page, count).await,
            },
            Self::UserById(id) => Outcome::UserById(client.user(&id).await),
            Self::CreateUser { user, token } => {
                Outcome::UserCreated(client.create_user(&user, &token).await)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Positions => "positions",
            Self::Users { .. } => "users",
            Self::UserById(_) => "user_by_id",
            Self::CreateUser { .. } => "create_user",
        }
    }
}

/// A finished request.
#[derive(Debug)]
pub enum Outcome {
    Token(Result<String, ApiError>),
    Positions(Result<PositionList, ApiError>),
    Users {
        page: u32,
        result: Result<Vec<User>, ApiError>,
    },
    UserById(Result<User, ApiError>),
    UserCreated(Result<String, ApiError>),
}

impl Outcome {
    /// Banner context for a failure of this call.
    pub fn error_context(&self) -> &'static str {
        match self {
            Self::Token(_) => "Error fetching token",
            Self::Positions(_) => "Error fetching positions",
            Self::Users { .. } => "Error fetching users",
            Self::UserById(_) => "Error fetching user by ID",
            Self::UserCreated(_) => "Error adding user",
        }
    }
}

impl ScreenState {
    /// Merge a completion into the state. Returns a follow-up request when
    /// the completion calls for one (a successful create reloads page 1).
    pub fn apply(&mut self, outcome: Outcome) -> Option<Request> {
        let context = outcome.error_context();
        let failure = match outcome {
            Outcome::Token(Ok(token)) => {
                self.token = Some(token);
                None
            }
            Outcome::Positions(Ok(list)) => {
                self.positions = Some(list);
                None
            }
            Outcome::Users {
                page,
                result: Ok(users),
            } => {
                if page == 1 {
                    self.users = users;
                } else {
                    self.users.extend(users);
                }
                None
            }
            Outcome::UserById(Ok(user)) => {
                self.selected_user = Some(user);
                None
            }
            Outcome::UserCreated(Ok(message)) => {
                self.notice = Some(format!("User added: {message}"));
                self.page = 1;
                return Some(Request::Users {
                    page: 1,
                    count: self.page_size,
                });
            }
            Outcome::Token(Err(e))
            | Outcome::Positions(Err(e))
            | Outcome::Users { result: Err(e), .. }
            | Outcome::UserById(Err(e))
            | Outcome::UserCreated(Err(e)) => Some(e),
        };
        if let Some(err) = failure {
            warn!(context, error = %err, "request failed");
            self.error.raise(err.compose_banner(context));
        }
        None
    }
}

pub struct Controller {
    state: ScreenState,
    client: ApiClient,
    runtime: Handle,
    tx: UnboundedSender<Outcome>,
    rx: UnboundedReceiver<Outcome>,
}

impl Controller {
    /// `runtime` executes the spawned requests; the controller itself is
    /// driven from a synchronous loop.
    pub fn new(client: ApiClient, runtime: Handle, page_size: u32) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            state: ScreenState::new(page_size),
            client,
            runtime,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn base_url(&self) -> &url::Url {
        self.client.base_url()
    }

    /// Initial loads: token, positions and the first page, all at once.
    pub fn start(&mut self) {
        info!(base_url = %self.client.base_url(), "starting initial loads");
        self.request_token();
        self.request_positions();
        self.load_users(1, self.state.page_size);
    }

    pub fn request_token(&mut self) {
        self.dispatch(Request::Token);
    }

    pub fn request_positions(&mut self) {
        self.dispatch(Request::Positions);
    }

    /// Page 1 replaces the loaded users once it arrives; later pages append.
    pub fn load_users(&mut self, page: u32, count: u32) {
        self.dispatch(Request::Users { page, count });
    }

    /// Request the next page. The page counter moves forward right away,
    /// whether or not that page ever arrives.
    pub fn show_more(&mut self) {
        let next = self.state.page + 1;
        self.load_users(next, self.state.page_size);
        self.state.page = next;
    }

    pub fn fetch_user_by_id(&mut self, id: &str) {
        self.dispatch(Request::UserById(id.to_owned()));
    }

    pub fn submit_new_user(&mut self, user: NewUser, token: String) {
        self.dispatch(Request::CreateUser { user, token });
    }

    pub fn dismiss_error_banner(&mut self) {
        self.state.error.dismiss();
    }

    pub fn acknowledge_notice(&mut self) {
        self.state.notice = None;
    }

    /// Apply every completion that has already arrived. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            self.complete(outcome);
            applied += 1;
        }
        applied
    }

    /// Wait until nothing is in flight, applying completions as they come,
    /// including follow-ups they trigger.
    pub async fn settle(&mut self) {
        while self.state.in_flight > 0 {
            match self.rx.recv().await {
                Some(outcome) => self.complete(outcome),
                None => break,
            }
        }
    }

    fn dispatch(&mut self, request: Request) {
        debug!(request = request.name(), "dispatching");
        self.state.in_flight += 1;
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = request.execute(&client).await;
            // Only fails once the controller is gone.
            let _ = tx.send(outcome);
        });
    }

    fn complete(&mut self, outcome: Outcome) {
        self.state.in_flight = self.state.in_flight.saturating_sub(1);
        if let Some(next) = self.state.apply(outcome) {
            self.dispatch(next);
        }
    }
}
