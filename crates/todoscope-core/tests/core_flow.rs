use std::cell::{Cell, RefCell};

use chrono::{Duration, NaiveDate};
use todoscope_core::error::ClientError;
use todoscope_core::session::BinderSettings;
use todoscope_core::task::Task;
use todoscope_core::view::EMPTY_PLACEHOLDER;
use todoscope_core::{Binder, TaskApi};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn task(id: u64, title: &str, date: NaiveDate) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed: false,
        date,
    }
}

/// In-memory stand-in for the remote collection.
struct FakeApi {
    tasks: Vec<Task>,
    fail_fetch: bool,
    fail_append: bool,
    today: NaiveDate,
    next_id: Cell<u64>,
    fetches: Cell<usize>,
    appended: RefCell<Vec<String>>,
}

impl FakeApi {
    fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            fail_fetch: false,
            fail_append: false,
            today: day(2024, 6, 1),
            next_id: Cell::new(99),
            fetches: Cell::new(0),
            appended: RefCell::new(vec![]),
        }
    }
}

impl TaskApi for FakeApi {
    async fn fetch_all(&self) -> Result<Vec<Task>, ClientError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail_fetch {
            return Err(ClientError::fetch_status(500));
        }
        Ok(self.tasks.clone())
    }

    async fn append(&self, title: &str) -> Result<Task, ClientError> {
        self.appended.borrow_mut().push(title.to_string());
        if self.fail_append {
            return Err(ClientError::append_status(500));
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(task(id, title, self.today))
    }
}

fn twenty_five() -> Vec<Task> {
    (1..=25)
        .map(|id| task(id, &format!("task {id}"), day(2024, 1, 1)))
        .collect()
}

#[tokio::test]
async fn search_narrows_list_to_matching_title() {
    let api = FakeApi::with_tasks(vec![
        task(1, "Buy milk", day(2024, 1, 1)),
        task(2, "Walk dog", day(2024, 2, 1)),
    ]);
    let mut binder = Binder::new(api, BinderSettings::default());
    binder.init().await;
    binder.set_search("milk").await;

    let view = binder.view();
    assert_eq!(view.lines(), vec!["Buy milk (Date: 2024-01-01)".to_string()]);
    assert_eq!(view.pages.len(), 1);
}

#[tokio::test]
async fn third_page_of_twenty_five() {
    let mut binder = Binder::new(FakeApi::with_tasks(twenty_five()), BinderSettings::default());
    binder.init().await;
    binder.go_to_page(3).await;

    let view = binder.view();
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[0].line, "task 21 (Date: 2024-01-01)");
    assert_eq!(view.pages.len(), 3);
    assert!(view.pages[2].active);
}

#[tokio::test]
async fn blank_add_makes_no_request() {
    let mut binder = Binder::new(FakeApi::with_tasks(vec![]), BinderSettings::default());
    binder.add_task("").await;
    binder.add_task("   ").await;

    assert!(binder.api().appended.borrow().is_empty());
    assert!(binder.session().tasks.is_empty());
    assert!(binder.view().banner.is_none());
}

#[tokio::test]
async fn successful_add_prepends_and_returns_to_first_page() {
    let mut binder = Binder::new(FakeApi::with_tasks(twenty_five()), BinderSettings::default());
    binder.init().await;
    binder.go_to_page(2).await;
    binder.add_task("Test").await;

    let session = binder.session();
    let first = session.tasks.first().expect("task added");
    assert_eq!(first.id, 99);
    assert_eq!(first.title, "Test");
    assert_eq!(first.date, day(2024, 6, 1));
    assert_eq!(session.current_page, 1);
    assert!(session.inputs.new_title.is_empty());
    assert_eq!(session.tasks.len(), 26);
    assert_eq!(binder.api().appended.borrow().as_slice(), ["Test".to_string()]);
}

#[tokio::test]
async fn failed_fetch_leaves_list_empty_and_banner_expires() {
    let mut api = FakeApi::with_tasks(twenty_five());
    api.fail_fetch = true;
    let mut binder = Binder::new(api, BinderSettings::default());
    binder.init().await;

    assert!(binder.session().tasks.is_empty());
    let banner = binder.error().cloned().expect("banner raised");
    assert_eq!(banner.message, "Failed to fetch todos (HTTP 500)");

    let shown = binder.view_at(banner.raised_at);
    assert_eq!(shown.banner.as_deref(), Some(banner.message.as_str()));
    assert_eq!(shown.placeholder, Some(EMPTY_PLACEHOLDER));

    let timeout = binder.settings().banner_timeout;
    let hidden = binder.view_at(banner.raised_at + timeout);
    assert!(hidden.banner.is_none());
}

#[tokio::test]
async fn failed_add_keeps_typed_title() {
    let mut api = FakeApi::with_tasks(vec![task(1, "Buy milk", day(2024, 1, 1))]);
    api.fail_append = true;
    let mut binder = Binder::new(api, BinderSettings::default());
    binder.init().await;
    binder.add_task("Test").await;

    assert_eq!(binder.session().tasks.len(), 1);
    assert_eq!(binder.session().inputs.new_title, "Test");
    assert_eq!(
        binder.error().map(|b| b.message.as_str()),
        Some("Failed to add todo (HTTP 500)")
    );
}

#[tokio::test]
async fn reload_after_failure_is_allowed() {
    let mut api = FakeApi::with_tasks(twenty_five());
    api.fail_fetch = true;
    let mut binder = Binder::new(api, BinderSettings::default());
    binder.init().await;
    binder.init().await;

    assert_eq!(binder.api().fetches.get(), 2);
    let banner = binder.error().cloned().expect("banner raised");
    assert_eq!(banner.seq, 2);
    let hidden = binder.view_at(banner.raised_at + binder.settings().banner_timeout + Duration::seconds(1));
    assert!(hidden.banner.is_none());
}

#[tokio::test]
async fn date_bounds_apply_on_render() {
    let api = FakeApi::with_tasks(vec![
        task(1, "Buy milk", day(2024, 1, 1)),
        task(2, "Walk dog", day(2024, 2, 1)),
        task(3, "File taxes", day(2024, 4, 15)),
    ]);
    let mut binder = Binder::new(api, BinderSettings { page_size: 2, ..BinderSettings::default() });
    binder.init().await;
    binder.go_to_page(2).await;
    binder.set_from(Some(day(2024, 2, 1))).await;
    binder.set_to(Some(day(2024, 3, 31))).await;
    binder.apply_filter().await;

    let view = binder.view();
    assert_eq!(view.current_page, 1);
    assert_eq!(view.lines(), vec!["Walk dog (Date: 2024-02-01)".to_string()]);
    assert_eq!(view.pages.len(), 1);
}

fn dated_twenty_five() -> Vec<Task> {
    (1..=25)
        .map(|d| task(d as u64, &format!("task {d}"), day(2024, 1, d)))
        .collect()
}

#[tokio::test]
async fn from_bound_edit_returns_to_first_page() {
    let mut binder = Binder::new(FakeApi::with_tasks(dated_twenty_five()), BinderSettings::default());
    binder.init().await;
    binder.go_to_page(3).await;
    binder.set_from(Some(day(2024, 1, 20))).await;

    let view = binder.view();
    assert_eq!(view.current_page, 1);
    assert_eq!(view.total_matches, 6);
    assert_eq!(view.rows.len(), 6);
    assert_eq!(view.rows[0].line, "task 20 (Date: 2024-01-20)");
    assert_eq!(view.placeholder, None);
    assert_eq!(view.pages.len(), 1);
    assert!(view.pages[0].active);
}

#[tokio::test]
async fn to_bound_edit_returns_to_first_page() {
    let mut binder = Binder::new(FakeApi::with_tasks(dated_twenty_five()), BinderSettings::default());
    binder.init().await;
    binder.go_to_page(2).await;
    binder.set_to(Some(day(2024, 1, 12))).await;

    let view = binder.view();
    assert_eq!(view.current_page, 1);
    assert_eq!(view.total_matches, 12);
    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.rows[0].line, "task 1 (Date: 2024-01-01)");
    assert_eq!(view.pages.len(), 2);
    assert!(view.pages[0].active);
    assert!(!view.pages[1].active);
}

#[tokio::test]
async fn unchanged_bound_keeps_page() {
    let mut binder = Binder::new(FakeApi::with_tasks(dated_twenty_five()), BinderSettings::default());
    binder.init().await;
    binder.set_from(Some(day(2024, 1, 2))).await;
    binder.go_to_page(2).await;
    binder.set_from(Some(day(2024, 1, 2))).await;
    binder.set_to(None).await;

    let view = binder.view();
    assert_eq!(view.current_page, 2);
    assert_eq!(view.rows[0].line, "task 12 (Date: 2024-01-12)");
    assert!(view.pages[1].active);
}
