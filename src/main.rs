#![windows_subsystem = "windows"]
slint::include_modules!();

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use github_profile_explorer::client::{fetch_avatar, AvatarPixels, GitHubClient, ProfileLookup};
use github_profile_explorer::components::{
    CardView, ResultDisplay, SearchInput, SubmitTrigger,
};
use github_profile_explorer::config::AppConfig;
use github_profile_explorer::state::{Coordinator, ViewState};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("Invalid configuration")?;

    let client = Arc::new(GitHubClient::from_config(&config)?);

    // Background tokio runtime for async HTTP
    let rt = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;

    let app = AppWindow::new()?;

    let coordinator = Rc::new(RefCell::new(Coordinator::new(config.stale_policy)));
    let search_input = Rc::new(RefCell::new(SearchInput::new()));
    let display = Rc::new(RefCell::new(ResultDisplay::new()));

    // =============================================
    //  VIEWS: re-render on every state change
    // =============================================
    {
        let app_weak = app.as_weak();
        let search_input = search_input.clone();
        let display = display.clone();
        let client = client.clone();
        let rt = rt.handle().clone();
        let avatar_size = config.avatar_size;

        coordinator
            .borrow_mut()
            .subscribe(move |state: &ViewState| {
                search_input.borrow_mut().set_loading(state.loading);

                let Some(app) = app_weak.upgrade() else { return };
                app.set_loading(state.loading);

                let view = display.borrow_mut().render(state).clone();
                show_view(&app, &view);

                if let CardView::Populated(card) = &view {
                    load_avatar(
                        &rt,
                        app_weak.clone(),
                        &client,
                        card.handle.clone(),
                        card.avatar_url.clone(),
                        avatar_size,
                    );
                }
            });
    }
    show_view(&app, display.borrow().view());

    // =============================================
    //  CALLBACK: search-requested
    // =============================================
    {
        let coordinator = coordinator.clone();
        let search_input = search_input.clone();
        let client = client.clone();
        let rt = rt.handle().clone();

        app.on_search_requested(move |raw, from_enter| {
            let trigger = if from_enter {
                SubmitTrigger::EnterKey
            } else {
                SubmitTrigger::Button
            };

            let request = {
                let mut input = search_input.borrow_mut();
                input.set_text(raw.as_str());
                input.submit(trigger)
            };
            let Some(request) = request else { return };

            let Some(pending) = coordinator.borrow_mut().begin(&request.raw_handle) else {
                return;
            };
            let id = pending.id;

            let client = client.clone();
            let task = rt.spawn(async move { client.lookup(&pending.handle).await });

            let settle_on = coordinator.clone();
            let spawned = slint::spawn_local(async move {
                match task.await {
                    Ok(outcome) => {
                        settle_on.borrow_mut().settle(id, outcome);
                    }
                    Err(e) => {
                        settle_on.borrow_mut().abandon(id, &e.to_string());
                    }
                }
            });

            if let Err(e) = spawned {
                error!(error = %e, "could not wait for lookup on the UI event loop");
                coordinator.borrow_mut().abandon(id, &e.to_string());
            }
        });
    }

    // =============================================
    //  CALLBACK: profile-clicked
    // =============================================
    app.on_profile_clicked(|url| {
        if url.is_empty() {
            return;
        }
        if let Err(e) = open::that(url.as_str()) {
            warn!(%url, error = %e, "failed to open profile in browser");
        }
    });

    info!("starting GitHub profile explorer");
    app.run()?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .init();
}

/// Copies the selected view into the window properties.
fn show_view(app: &AppWindow, view: &CardView) {
    app.set_status_text(view.message().into());
    app.set_status_is_error(view.is_error());

    match view.card() {
        Some(card) => {
            app.set_card_title(card.title.as_str().into());
            app.set_card_handle(card.handle.as_str().into());
            app.set_card_bio(card.biography.clone().unwrap_or_default().into());
            app.set_card_repos(card.repos_label.as_str().into());
            app.set_card_profile_url(card.profile_url.as_str().into());
            app.set_avatar(slint::Image::default());
            app.set_show_card(true);
        }
        None => app.set_show_card(false),
    }
}

/// Downloads the avatar in the background and shows it if the same profile
/// is still on the card.
fn load_avatar(
    rt: &Handle,
    app_weak: slint::Weak<AppWindow>,
    client: &GitHubClient,
    handle: String,
    url: String,
    size: u32,
) {
    let http = client.http().clone();

    rt.spawn(async move {
        let Some(AvatarPixels { rgba, width, height }) = fetch_avatar(&http, &url, size).await
        else {
            return;
        };

        let _ = slint::invoke_from_event_loop(move || {
            let Some(app) = app_weak.upgrade() else { return };
            if !app.get_show_card() || app.get_card_handle().as_str() != handle {
                return;
            }
            let buf = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(
                &rgba, width, height,
            );
            app.set_avatar(slint::Image::from_rgba8(buf));
        });
    });
}
