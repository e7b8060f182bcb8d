use noteboard_core::{
    Editor, EditorWidgets, HeadlessSurface, ListView, Mediator, MemorySink, Visibility,
    WatcherExit, WidgetKind,
};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const POLL: Duration = Duration::from_millis(20);

fn compose(poll: Duration) -> (Arc<Editor>, Arc<HeadlessSurface>) {
    let list = ListView::new(poll).unwrap();
    let registry = EditorWidgets::create(list).into_registry().unwrap();
    let surface = Arc::new(HeadlessSurface::new());
    let editor = Editor::compose(&registry, Arc::new(MemorySink::new()), surface.clone()).unwrap();
    (editor, surface)
}

fn wait_for(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    check()
}

fn surface_is_consistent(editor: &Editor, surface: &HeadlessSurface) -> bool {
    let visible = editor.visibility().is_visible();
    [
        WidgetKind::SaveControl,
        WidgetKind::TitleEditor,
        WidgetKind::ContentEditor,
    ]
    .into_iter()
    .all(|widget| surface.is_visible(widget) == Some(visible))
        && surface.is_visible(WidgetKind::EmptyPlaceholder) == Some(!visible)
}

#[test]
fn watcher_hides_editors_after_platform_clears_selection() {
    let (editor, surface) = compose(POLL);
    editor.widgets().add.click();
    assert_eq!(editor.visibility(), Visibility::Visible);

    editor.widgets().list.clear_selection();

    assert!(wait_for(Duration::from_secs(2), || {
        editor.visibility() == Visibility::Hidden
    }));
    assert_eq!(surface.is_visible(WidgetKind::TitleEditor), Some(false));
    assert_eq!(surface.is_visible(WidgetKind::EmptyPlaceholder), Some(true));
}

#[test]
fn watcher_shows_editors_when_selection_appears_unannounced() {
    let (editor, surface) = compose(POLL);
    editor.widgets().add.click();
    editor.widgets().list.clear_selection();
    assert!(wait_for(Duration::from_secs(2), || {
        editor.visibility() == Visibility::Hidden
    }));

    editor
        .widgets()
        .list
        .model()
        .with(|collection| collection.select(0))
        .unwrap();

    assert!(wait_for(Duration::from_secs(2), || {
        editor.visibility() == Visibility::Visible
    }));
    assert_eq!(surface.is_visible(WidgetKind::SaveControl), Some(true));
}

#[test]
fn concurrent_visibility_requests_never_tear() {
    let (editor, surface) = compose(Duration::from_millis(10));
    editor.widgets().add.click();

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let editor = Arc::clone(&editor);
            thread::spawn(move || {
                for round in 0..200 {
                    editor.hide_elements((worker + round) % 2 == 0);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(surface_is_consistent(&editor, &surface));
    // Selection is non-empty, so the watcher settles on visible.
    assert!(wait_for(Duration::from_secs(2), || {
        editor.visibility() == Visibility::Visible
    }));
    assert!(surface_is_consistent(&editor, &surface));
}

#[test]
fn shutdown_stops_sampling() {
    let (editor, _surface) = compose(POLL);
    editor.widgets().add.click();

    assert_eq!(editor.shutdown(), Some(WatcherExit::Stopped));
    assert!(!editor.widgets().list.is_watching());

    editor.widgets().list.clear_selection();
    thread::sleep(POLL * 5);
    assert_eq!(editor.visibility(), Visibility::Visible);
    assert_eq!(editor.shutdown(), None);
}
