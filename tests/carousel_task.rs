use event_gallery::carousel::{Carousel, CarouselOptions, LayoutMode, PageShell, StripLayout};
use event_gallery::events::Interaction;
use event_gallery::projects::{DisplayList, Project, fallback_projects};
use event_gallery::tasks;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct RecordingShell {
    locks: Mutex<Vec<bool>>,
    inquiries: Mutex<Vec<String>>,
    contact_scrolls: Mutex<usize>,
}

impl PageShell for RecordingShell {
    fn set_scroll_locked(&self, locked: bool) {
        self.locks.lock().unwrap().push(locked);
    }
    fn inquire(&self, project_title: &str) {
        self.inquiries.lock().unwrap().push(project_title.to_string());
    }
    fn scroll_to_contact(&self) {
        *self.contact_scrolls.lock().unwrap() += 1;
    }
}

fn carousel(shell: Arc<RecordingShell>) -> Carousel<StripLayout> {
    let base = fallback_projects().remove(0);
    let projects: Vec<Project> = (1..=4)
        .map(|id| Project {
            id,
            title: format!("Projekt {id}"),
            ..base.clone()
        })
        .collect();
    let items = DisplayList::tripled(projects);
    let layout = StripLayout::new(items.len(), 1440.0, LayoutMode::Desktop);
    Carousel::mount(
        items,
        layout,
        shell,
        CarouselOptions::default(),
        tokio::time::Instant::now().into_std(),
    )
}

#[tokio::test(start_paused = true)]
async fn click_inquire_and_contact_scroll_through_the_frame_loop() {
    let shell = Arc::new(RecordingShell::default());
    let (tx, rx) = mpsc::channel::<Interaction>(8);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(tasks::carousel::run(
        carousel(shell.clone()),
        rx,
        cancel.clone(),
        Duration::from_millis(16),
    ));

    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.send(Interaction::Click { index: 6 }).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(shell.locks.lock().unwrap().is_empty(), "opened mid-flight");

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(*shell.locks.lock().unwrap(), vec![true]);

    tx.send(Interaction::Inquire).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(*shell.inquiries.lock().unwrap(), vec!["Projekt 3".to_string()]);
    assert_eq!(*shell.locks.lock().unwrap(), vec![true, false]);
    assert_eq!(*shell.contact_scrolls.lock().unwrap(), 0);

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(*shell.contact_scrolls.lock().unwrap(), 1);

    cancel.cancel();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn cancelling_with_overlay_open_releases_scroll_lock() {
    let shell = Arc::new(RecordingShell::default());
    let (tx, rx) = mpsc::channel::<Interaction>(8);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(tasks::carousel::run(
        carousel(shell.clone()),
        rx,
        cancel.clone(),
        Duration::from_millis(16),
    ));

    tx.send(Interaction::Click { index: 1 }).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*shell.locks.lock().unwrap(), vec![true]);

    // Dropping the sender alone keeps the loop alive.
    drop(tx);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.is_finished());

    cancel.cancel();
    handle.await.unwrap().unwrap();
    assert_eq!(*shell.locks.lock().unwrap(), vec![true, false]);
}
