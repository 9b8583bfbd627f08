//! Tests for the main window controller
//!
//! Drives the controller step by step: inputs go in through its methods and
//! query responses are pulled with `recv_response`, so every interleaving is
//! explicit. One test runs the full `run` loop.

use super::fixtures::{FakeBackend, FakeEngine, SurfaceCall, TestWindow, WindowCall, settle};
use crate::controller::{MainController, MainInput};
use crate::launcher::WindowLauncher;
use crate::selection::{Cursor, Phase};
use crate::{AppEvent, EventChannel, Key, WindowLabel};
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    channel: EventChannel,
    main: TestWindow,
    engine: Arc<FakeEngine>,
    backend: Arc<FakeBackend>,
    controller: MainController<FakeEngine>,
}

fn harness() -> Harness {
    let channel = EventChannel::new();
    let main = TestWindow::new(WindowLabel::Main);
    let engine = Arc::new(FakeEngine::abacus_abbey());
    let backend = Arc::new(FakeBackend::new());
    let launcher = Arc::new(WindowLauncher::new(backend.clone()));
    launcher.adopt(main.window.clone());

    let controller = MainController::start(
        main.context(&channel),
        main.surface.clone(),
        engine.clone(),
        launcher,
    );
    Harness {
        channel,
        main,
        engine,
        backend,
        controller,
    }
}

/// Type `text` and apply the engine's answer
async fn type_and_wait(h: &mut Harness, text: &str) {
    h.controller.on_input(text);
    let response = h.controller.recv_response().await.unwrap();
    h.controller.on_response(response);
}

fn render_count(h: &Harness) -> usize {
    h.main
        .surface
        .calls()
        .iter()
        .filter(|call| matches!(call, SurfaceCall::RenderList(_)))
        .count()
}

#[tokio::test]
async fn test_show_window_order() {
    let h = harness();
    h.main.window.set_minimized(true);
    h.main.surface.clear_calls();

    h.controller.on_show_window();

    assert_eq!(
        h.main.window.calls(),
        vec![
            WindowCall::Show,
            WindowCall::IsMinimized,
            WindowCall::Unminimize,
            WindowCall::SetFocus,
        ]
    );
    assert_eq!(h.main.surface.calls(), vec![SurfaceCall::FocusInput]);
}

#[tokio::test]
async fn test_show_window_skips_unminimize_when_not_minimized() {
    let h = harness();

    h.controller.on_show_window();

    assert_eq!(
        h.main.window.calls(),
        vec![WindowCall::Show, WindowCall::IsMinimized, WindowCall::SetFocus]
    );
}

#[tokio::test]
async fn test_show_failure_leaves_input_unfocused() {
    let h = harness();
    h.main.window.set_fail_show(true);
    h.main.surface.clear_calls();

    h.controller.on_show_window();

    assert_eq!(h.main.window.calls(), vec![WindowCall::Show]);
    assert!(h.main.surface.calls().is_empty());
}

#[tokio::test]
async fn test_type_navigate_confirm() {
    let mut h = harness();
    h.controller.on_show_window();

    type_and_wait(&mut h, "ab").await;
    let list = h.main.surface.last_list().unwrap();
    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].to_string(), "> [ab]acus (🔤)");
    assert_eq!(list.items[1].to_string(), "  [ab]bey (🔡)");

    assert!(h.controller.on_key(Key::ArrowDown));
    assert_eq!(
        h.main.surface.calls().last(),
        Some(&SurfaceCall::MoveMarker {
            from: Some(0),
            to: 1
        })
    );

    assert!(h.controller.on_key(Key::Enter));
    let selected = tokio::time::timeout(Duration::from_secs(1), h.engine.wait_for_selection())
        .await
        .unwrap();
    assert_eq!(selected, "abbey");

    assert!(!h.main.window.is_visible());
    assert_eq!(h.controller.machine().phase(), Phase::Idle);
    assert_eq!(h.controller.machine().query(), "");
    assert!(h.main.surface.calls().contains(&SurfaceCall::ClearInput));
    assert!(h.main.surface.last_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_navigation_moves_marker_without_rerender() {
    let mut h = harness();
    type_and_wait(&mut h, "ab").await;
    let renders = render_count(&h);

    h.controller.on_key(Key::ArrowDown);
    h.controller.on_key(Key::ArrowDown);
    h.controller.on_key(Key::ArrowUp);

    // 0 -> 1 -> 0 (wrapped) -> 1 (wrapped back)
    assert_eq!(render_count(&h), renders);
    assert_eq!(h.controller.machine().cursor(), Cursor::Selected(1));
}

#[tokio::test(start_paused = true)]
async fn test_last_query_wins() {
    let mut h = harness();
    h.engine.delay("a", Duration::from_millis(100));

    h.controller.on_input("a");
    h.controller.on_input("ab");

    let first = h.controller.recv_response().await.unwrap();
    assert_eq!(first.seq, 2);
    h.controller.on_response(first);

    let late = h.controller.recv_response().await.unwrap();
    assert_eq!(late.seq, 1);
    h.controller.on_response(late);

    assert_eq!(h.controller.machine().query(), "ab");
    assert_eq!(h.controller.machine().candidates().len(), 2);
    // Two clears on input, one render for "ab", nothing for the stale answer
    assert_eq!(render_count(&h), 3);
}

#[tokio::test]
async fn test_escape_clears_and_hides() {
    let mut h = harness();
    h.controller.on_show_window();
    type_and_wait(&mut h, "ab").await;
    h.controller.on_key(Key::ArrowDown);

    assert!(h.controller.on_key(Key::Escape));

    let machine = h.controller.machine();
    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(machine.query(), "");
    assert!(machine.candidates().is_empty());
    assert_eq!(machine.cursor(), Cursor::NoSelection);
    assert!(!h.main.window.is_visible());
    assert!(h.main.surface.calls().contains(&SurfaceCall::ClearInput));
    assert!(h.main.surface.last_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_response_after_escape_is_discarded() {
    let mut h = harness();
    h.controller.on_input("ab");
    h.controller.on_key(Key::Escape);

    let response = h.controller.recv_response().await.unwrap();
    h.controller.on_response(response);

    assert!(h.controller.machine().candidates().is_empty());
    assert!(h.main.surface.last_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_enter_without_selection_is_a_no_op() {
    let mut h = harness();
    h.controller.on_show_window();
    type_and_wait(&mut h, "zz").await;
    assert_eq!(h.controller.machine().phase(), Phase::NoMatches);

    assert!(!h.controller.on_key(Key::Enter));
    settle().await;

    assert!(h.engine.selections().is_empty());
    assert!(h.main.window.is_visible());
    assert_eq!(h.controller.machine().query(), "zz");
}

#[tokio::test]
async fn test_enter_while_querying_is_a_no_op() {
    let mut h = harness();
    h.controller.on_input("ab");

    assert!(!h.controller.on_key(Key::Enter));
    settle().await;
    assert!(h.engine.selections().is_empty());
}

#[tokio::test]
async fn test_key_consumption() {
    let mut h = harness();

    // Empty list: only Tab and Escape are taken
    assert!(h.controller.on_key(Key::Tab));
    assert!(!h.controller.on_key(Key::ArrowDown));
    assert!(!h.controller.on_key(Key::ArrowUp));
    assert!(!h.controller.on_key(Key::Other));

    type_and_wait(&mut h, "ab").await;
    h.main.surface.clear_calls();
    assert!(h.controller.on_key(Key::Tab));
    assert_eq!(
        h.main.surface.calls(),
        vec![
            SurfaceCall::MoveMarker {
                from: Some(0),
                to: 1
            },
            SurfaceCall::FocusInput,
        ]
    );
}

#[tokio::test]
async fn test_click_confirms_that_item() {
    let mut h = harness();
    type_and_wait(&mut h, "ab").await;

    h.controller.on_click(5);
    settle().await;
    assert!(h.engine.selections().is_empty());

    h.controller.on_click(1);
    let selected = tokio::time::timeout(Duration::from_secs(1), h.engine.wait_for_selection())
        .await
        .unwrap();
    assert_eq!(selected, "abbey");
    assert_eq!(h.controller.machine().phase(), Phase::Idle);
}

#[tokio::test]
async fn test_engine_unavailable_shows_empty_list() {
    let mut h = harness();
    h.engine.set_unavailable(true);

    type_and_wait(&mut h, "ab").await;

    assert_eq!(h.controller.machine().phase(), Phase::NoMatches);
    assert!(h.main.surface.last_list().unwrap().is_empty());
}

#[tokio::test]
async fn test_max_results_is_passed_to_engine() {
    let mut h = harness();
    type_and_wait(&mut h, "ab").await;
    assert_eq!(h.engine.queries(), vec![("ab".to_string(), 5)]);

    let Harness {
        controller, engine, ..
    } = h;
    let mut controller = controller.with_max_results(1);
    controller.on_input("ab");
    let response = controller.recv_response().await.unwrap();
    controller.on_response(response);
    assert_eq!(controller.machine().candidates().len(), 1);
    assert_eq!(engine.queries()[1], ("ab".to_string(), 1));
}

#[tokio::test]
async fn test_dataset_loaded_at_start_and_on_reload() {
    let h = harness();
    settle().await;
    assert_eq!(h.engine.reloads(), 1);

    h.engine.set_fail_reload(true);
    h.controller.reload();
    settle().await;
    assert_eq!(h.engine.reloads(), 2);
}

#[tokio::test]
async fn test_open_window_uses_current_theme() {
    let mut h = harness();
    h.controller.set_theme("dark");

    h.controller.open_window("help").unwrap();
    assert_eq!(h.backend.created()[0].theme.as_deref(), Some("dark"));

    assert!(h.controller.open_window("nope").is_err());
    assert_eq!(h.backend.created().len(), 1);
}

#[tokio::test]
async fn test_theme_broadcast_is_applied() {
    let mut h = harness();
    h.controller.handle_event(AppEvent::ThemeChanged("dark".to_string()));

    assert_eq!(h.controller.theme(), "dark");
    assert_eq!(h.main.surface.themes(), vec!["light", "dark"]);
}

#[tokio::test]
async fn test_run_loop_end_to_end() {
    let h = harness();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let Harness {
        channel,
        main,
        engine,
        controller,
        ..
    } = h;
    let task = tokio::spawn(controller.run(rx));

    channel.publish(AppEvent::ShowWindow);
    tx.send(MainInput::Input("ab".to_string())).unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        while !main.window.is_visible()
            || main.surface.last_list().is_none_or(|list| list.items.len() != 2)
        {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();

    tx.send(MainInput::Key(Key::ArrowDown)).unwrap();
    tx.send(MainInput::Key(Key::Enter)).unwrap();
    let selected = tokio::time::timeout(Duration::from_secs(1), engine.wait_for_selection())
        .await
        .unwrap();
    assert_eq!(selected, "abbey");

    drop(tx);
    task.await.unwrap();
    assert!(!main.window.is_visible());
}
