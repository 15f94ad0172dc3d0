//! View orchestrator service tests.
//!
//! Run on a paused clock: `settle()` lets every runnable task finish before
//! the clock moves, and the hourly refresh is reached with `advance_hours`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{category_key, page_of, search_key, ScriptedClient};
use movieskyy::catalog::{FetchError, Normalizer};
use movieskyy::orchestrator::{OrchestratorHandle, OrchestratorService, ServiceOptions};
use movieskyy_common::{CatalogMode, Category};

fn spawn(client: &Arc<ScriptedClient>) -> OrchestratorHandle {
    OrchestratorService::spawn(client.clone(), Normalizer::default(), ServiceOptions::default())
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn advance_hours(hours: u64) {
    tokio::time::sleep(Duration::from_secs(hours * 3600 + 1)).await;
    settle().await;
}

fn titles(handle: &OrchestratorHandle) -> Vec<String> {
    handle
        .snapshot()
        .results
        .into_iter()
        .map(|r| r.title)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn startup_loads_trending_and_features_first_result() {
    let client = ScriptedClient::new();
    client.respond(category_key(Category::Trending), Ok(page_of(&["Dune", "Wonka"])));

    let view = spawn(&client);
    let state = view
        .wait_for(|s| !s.loading && s.last_updated.is_some())
        .await
        .unwrap();

    assert_eq!(state.category, Category::Trending);
    assert_eq!(titles(&view), vec!["Dune", "Wonka"]);
    assert_eq!(state.featured.as_ref().map(|f| f.title.as_str()), Some("Dune"));
    assert!(state.shows_featured());
    assert!(state.error.is_none());
    assert_eq!(
        client.calls(),
        vec![(CatalogMode::category(Category::Trending), 1)]
    );
}

#[tokio::test(start_paused = true)]
async fn stale_search_completion_is_dropped() {
    let client = ScriptedClient::new();
    client.respond(search_key("batman"), Ok(page_of(&["Batman Begins"])));
    client.respond(search_key("batman2"), Ok(page_of(&["The Batman Part II"])));
    client.hold(search_key("batman"));

    let view = spawn(&client);
    settle().await;

    view.submit_search_text("batman").await.unwrap();
    settle().await;
    assert_eq!(client.call_count(&search_key("batman")), 1);
    assert!(view.snapshot().loading);

    view.submit_search_text("batman2").await.unwrap();
    let state = view
        .wait_for(|s| !s.loading && s.search_text == "batman2")
        .await
        .unwrap();
    assert_eq!(state.title(), "Search results for \"batman2\"");
    assert_eq!(titles(&view), vec!["The Batman Part II"]);

    // The slower "batman" request finishes last and must not win.
    client.release(&search_key("batman"));
    settle().await;

    let state = view.snapshot();
    assert_eq!(state.search_text, "batman2");
    assert_eq!(titles(&view), vec!["The Batman Part II"]);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn slow_category_load_is_dropped_after_switching() {
    let client = ScriptedClient::new();
    client.respond(category_key(Category::Popular), Ok(page_of(&["Popular Movie"])));
    client.respond(category_key(Category::Upcoming), Ok(page_of(&["Upcoming Movie"])));
    client.hold(category_key(Category::Popular));

    let view = spawn(&client);
    settle().await;

    view.select_category(Category::Popular).await.unwrap();
    view.select_category(Category::Upcoming).await.unwrap();
    view.wait_for(|s| !s.loading && s.category == Category::Upcoming)
        .await
        .unwrap();

    client.release(&category_key(Category::Popular));
    settle().await;

    assert_eq!(view.snapshot().category, Category::Upcoming);
    assert_eq!(titles(&view), vec!["Upcoming Movie"]);
}

#[tokio::test(start_paused = true)]
async fn selecting_category_clears_search() {
    let client = ScriptedClient::new();
    client.respond(category_key(Category::TopRated), Ok(page_of(&["The Godfather"])));

    let view = spawn(&client);
    settle().await;

    view.submit_search_text("dune").await.unwrap();
    settle().await;
    assert!(view.snapshot().searching);

    view.select_category(Category::TopRated).await.unwrap();
    let state = view
        .wait_for(|s| !s.loading && s.category == Category::TopRated)
        .await
        .unwrap();

    assert_eq!(state.search_text, "");
    assert!(!state.searching);
    assert_eq!(state.title(), "Top Rated Movies");
    assert_eq!(titles(&view), vec!["The Godfather"]);
    assert!(!state.shows_featured());
}

#[tokio::test(start_paused = true)]
async fn keystrokes_are_debounced() {
    let client = ScriptedClient::new();
    let view = spawn(&client);
    settle().await;

    for text in ["b", "ba", "bat", "batm"] {
        view.type_search(text).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(client.calls().iter().all(|(mode, _)| !mode.is_search()));

    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;

    assert_eq!(client.call_count(&search_key("b")), 0);
    assert_eq!(client.call_count(&search_key("bat")), 0);
    assert_eq!(client.call_count(&search_key("batm")), 1);
    assert_eq!(view.snapshot().search_text, "batm");
}

#[tokio::test(start_paused = true)]
async fn clearing_search_cancels_pending_keystrokes() {
    let client = ScriptedClient::new();
    let view = spawn(&client);
    settle().await;

    view.type_search("inter").await.unwrap();
    view.clear_search().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    settle().await;

    assert_eq!(client.call_count(&search_key("inter")), 0);
    let state = view.snapshot();
    assert_eq!(state.search_text, "");
    assert!(!state.searching);
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn clearing_as_quiet_period_ends_returns_to_category() {
    let client = ScriptedClient::new();
    let view = spawn(&client);
    settle().await;

    for _ in 0..20 {
        view.type_search("inter").await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;
        view.clear_search().await.unwrap();
        settle().await;

        let state = view.snapshot();
        assert_eq!(state.search_text, "");
        assert!(!state.searching);
        assert_eq!(state.title(), "Trending Today");
    }
}

#[tokio::test(start_paused = true)]
async fn hourly_tick_refreshes_active_listing() {
    let client = ScriptedClient::new();
    client.respond(category_key(Category::Trending), Ok(page_of(&["Old"])));
    client.respond(category_key(Category::Trending), Ok(page_of(&["New"])));

    let view = spawn(&client);
    view.wait_for(|s| !s.loading).await.unwrap();
    assert_eq!(titles(&view), vec!["Old"]);

    advance_hours(1).await;

    let state = view.snapshot();
    assert_eq!(client.call_count(&category_key(Category::Trending)), 2);
    assert_eq!(titles(&view), vec!["New"]);
    assert!(!state.auto_updating);
    assert!(state.last_updated.is_some());
}

#[tokio::test(start_paused = true)]
async fn tick_refreshes_active_search() {
    let client = ScriptedClient::new();
    let view = spawn(&client);
    settle().await;

    view.submit_search_text("alien").await.unwrap();
    settle().await;
    advance_hours(1).await;

    assert_eq!(client.call_count(&search_key("alien")), 2);
    assert_eq!(client.call_count(&category_key(Category::Trending)), 1);
}

#[tokio::test(start_paused = true)]
async fn timer_keeps_running_after_failed_tick() {
    let client = ScriptedClient::new();
    let key = category_key(Category::Trending);
    client.respond(key.clone(), Ok(page_of(&["First"])));
    client.respond(key.clone(), Err(FetchError::Unreachable("connection reset".into())));
    client.respond(key.clone(), Ok(page_of(&["Third"])));

    let view = spawn(&client);
    view.wait_for(|s| !s.loading).await.unwrap();

    advance_hours(1).await;
    let state = view.snapshot();
    assert_eq!(state.error.as_deref(), Some("Failed to fetch movies"));
    assert_eq!(titles(&view), vec!["First"]);
    assert!(!state.auto_updating);

    advance_hours(1).await;
    let state = view.snapshot();
    assert!(state.error.is_none());
    assert_eq!(titles(&view), vec!["Third"]);
    assert_eq!(client.call_count(&key), 3);
}

#[tokio::test(start_paused = true)]
async fn missing_credential_enters_setup_mode_until_success() {
    let client = ScriptedClient::new();
    let key = category_key(Category::Trending);
    client.respond(key.clone(), Err(FetchError::MissingCredential));
    client.respond(key.clone(), Ok(page_of(&["Configured"])));

    let view = spawn(&client);
    let state = view.wait_for(|s| !s.loading).await.unwrap();
    assert!(state.setup_required);
    assert!(state.error.is_none());
    assert!(state.results.is_empty());

    view.retry().await.unwrap();
    let state = view
        .wait_for(|s| !s.loading && !s.results.is_empty())
        .await
        .unwrap();
    assert!(!state.setup_required);
    assert_eq!(titles(&view), vec!["Configured"]);
}

#[tokio::test(start_paused = true)]
async fn retry_reissues_active_search() {
    let client = ScriptedClient::new();
    let key = search_key("dune");
    client.respond(
        key.clone(),
        Err(FetchError::UpstreamRejected {
            status: 500,
            body: String::new(),
        }),
    );
    client.respond(key.clone(), Ok(page_of(&["Dune: Part Two"])));

    let view = spawn(&client);
    settle().await;

    view.submit_search_text("dune").await.unwrap();
    let state = view
        .wait_for(|s| !s.loading && s.search_text == "dune")
        .await
        .unwrap();
    assert_eq!(state.error.as_deref(), Some("Failed to fetch movies"));

    view.retry().await.unwrap();
    let state = view
        .wait_for(|s| !s.loading && s.error.is_none())
        .await
        .unwrap();
    assert_eq!(state.search_text, "dune");
    assert_eq!(client.call_count(&key), 2);
    assert_eq!(titles(&view), vec!["Dune: Part Two"]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_timer_and_commands() {
    let client = ScriptedClient::new();
    let view = spawn(&client);
    settle().await;

    view.shutdown();
    settle().await;
    advance_hours(3).await;

    assert_eq!(client.calls().len(), 1);
    assert!(view.retry().await.is_err());
}
