//! End-to-end search flow against a mock GitHub API.

use std::cell::RefCell;
use std::rc::Rc;

use github_profile_explorer::components::{CardView, ResultDisplay, SearchInput, SubmitTrigger};
use github_profile_explorer::config::AppConfig;
use github_profile_explorer::{Coordinator, GitHubClient, ViewError};
use mockito::Server;

fn client_for(server: &Server) -> GitHubClient {
    let config = AppConfig {
        api_base_url: server.url(),
        ..AppConfig::default()
    };
    GitHubClient::from_config(&config).unwrap()
}

/// Coordinator wired to a search input and result display the way the
/// window wires them.
struct Harness {
    coordinator: Coordinator,
    input: Rc<RefCell<SearchInput>>,
    views: Rc<RefCell<Vec<CardView>>>,
}

impl Harness {
    fn new() -> Self {
        let mut coordinator = Coordinator::default();
        let input = Rc::new(RefCell::new(SearchInput::new()));
        let views = Rc::new(RefCell::new(Vec::new()));

        let display = Rc::new(RefCell::new(ResultDisplay::new()));
        let input_sink = Rc::clone(&input);
        let view_sink = Rc::clone(&views);
        coordinator.subscribe(move |state| {
            input_sink.borrow_mut().set_loading(state.loading);
            let view = display.borrow_mut().render(state).clone();
            view_sink.borrow_mut().push(view);
        });

        Self {
            coordinator,
            input,
            views,
        }
    }

    async fn search(&mut self, client: &GitHubClient, text: &str) {
        let request = {
            let mut input = self.input.borrow_mut();
            input.set_text(text);
            input.submit(SubmitTrigger::EnterKey)
        };
        if let Some(request) = request {
            self.coordinator
                .submit_search(client, &request.raw_handle)
                .await;
        }
    }

    fn last_view(&self) -> CardView {
        self.views.borrow().last().cloned().unwrap()
    }
}

#[tokio::test]
async fn successful_search_renders_the_card() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/TheMaff")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "login": "TheMaff",
                "name": "Marcos",
                "avatar_url": "http://avatar",
                "bio": "Frontend dev",
                "public_repos": 42,
                "html_url": "http://github.com/TheMaff"
            }"#,
        )
        .create_async()
        .await;
    let client = client_for(&server);
    let mut harness = Harness::new();

    harness.search(&client, "TheMaff").await;

    let views = harness.views.borrow().clone();
    assert_eq!(views.first(), Some(&CardView::Loading));
    let card = views.last().and_then(CardView::card).unwrap().clone();
    assert_eq!(card.title, "Marcos");
    assert_eq!(card.repos_label, "42 repos públicos");
    assert_eq!(card.profile_url, "http://github.com/TheMaff");
    assert!(!harness.input.borrow().is_disabled());
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_user_shows_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/octocat")
        .with_status(404)
        .create_async()
        .await;
    let client = client_for(&server);
    let mut harness = Harness::new();

    harness.search(&client, "octocat").await;

    let state = harness.coordinator.state();
    assert_eq!(state.error, Some(ViewError::NotFound));
    assert_eq!(state.user, None);
    assert!(!state.loading);
    assert_eq!(harness.last_view(), CardView::NotFound);
}

#[tokio::test]
async fn server_failure_shows_generic_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/users/octocat")
        .with_status(500)
        .create_async()
        .await;
    let client = client_for(&server);
    let mut harness = Harness::new();

    harness.search(&client, "octocat").await;

    assert_eq!(
        harness.coordinator.state().error,
        Some(ViewError::GenericError)
    );
    assert_eq!(harness.last_view(), CardView::GenericError);
}

#[tokio::test]
async fn blank_search_never_reaches_the_network() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = client_for(&server);
    let mut harness = Harness::new();

    harness.search(&client, "   ").await;

    assert_eq!(harness.last_view(), CardView::EmptyInput);
    assert!(!harness.coordinator.loading());
    mock.assert_async().await;
}

#[tokio::test]
async fn a_new_search_replaces_the_previous_result() {
    let mut server = Server::new_async().await;
    let _found = server
        .mock("GET", "/users/octocat")
        .with_status(200)
        .with_body(r#"{"login":"octocat","avatar_url":"u","html_url":"p","public_repos":8}"#)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/users/ghost")
        .with_status(404)
        .create_async()
        .await;
    let client = client_for(&server);
    let mut harness = Harness::new();

    harness.search(&client, "octocat").await;
    let user = harness.coordinator.state().user.clone().unwrap();
    assert_eq!(user.public_repo_count, 8);
    assert_eq!(user.display_name, None);

    harness.search(&client, "ghost").await;

    let views = harness.views.borrow().clone();
    assert_eq!(
        &views[views.len() - 2..],
        &[CardView::Loading, CardView::NotFound]
    );
    assert_eq!(harness.coordinator.state().user, None);
}
