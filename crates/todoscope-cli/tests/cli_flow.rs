use chrono::{Duration, NaiveDate};
use serde_json::json;
use todoscope_cli::cli::Command;
use todoscope_cli::config::{Config, Settings};
use todoscope_cli::{Outcome, execute};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn collection_server() -> MockServer {
    let server = MockServer::start().await;
    let records: Vec<serde_json::Value> = (1..=25)
        .map(|id| json!({"userId": 1, "id": id, "title": format!("task {id}"), "completed": false}))
        .chain(std::iter::once(
            json!({"userId": 1, "id": 26, "title": "Buy milk", "completed": true}),
        ))
        .collect();
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 201, "title": "Test", "completed": false
        })))
        .mount(&server)
        .await;
    server
}

fn settings_for(server: &MockServer) -> Settings {
    let mut cfg = Config::defaults();
    cfg.set("api.url", format!("{}/todos", server.uri()));
    cfg.set("dates.synthesize", "today");
    cfg.set("color", "off");
    cfg.settings().expect("valid settings")
}

async fn run_command(settings: &Settings, command: Command, input: &str) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = execute(settings, command, input.as_bytes(), &mut out)
        .await
        .expect("command runs");
    (outcome, String::from_utf8(out).expect("utf8 output"))
}

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

#[tokio::test]
async fn list_prints_requested_page() {
    let server = collection_server().await;
    let settings = settings_for(&server);

    let (outcome, text) = run_command(
        &settings,
        Command::List {
            search: String::new(),
            from: None,
            to: None,
            page: 3,
        },
        "",
    )
    .await;

    assert_eq!(outcome, Outcome::Done);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], format!("task 21 (Date: {})", today()));
    assert_eq!(lines[5], format!("Buy milk (Date: {})", today()));
    assert_eq!(lines[6], "Pages: 1 2 [3]");
}

#[tokio::test]
async fn list_with_search_and_future_bound_finds_nothing() {
    let server = collection_server().await;
    let settings = settings_for(&server);
    let tomorrow = chrono::Utc::now().date_naive() + Duration::days(1);

    let (_, text) = run_command(
        &settings,
        Command::List {
            search: "MILK".to_string(),
            from: Some(tomorrow),
            to: None,
            page: 1,
        },
        "",
    )
    .await;
    assert_eq!(text, "No tasks found.\n");

    let (_, text) = run_command(
        &settings,
        Command::List {
            search: "MILK".to_string(),
            from: NaiveDate::from_ymd_opt(2000, 1, 1),
            to: None,
            page: 1,
        },
        "",
    )
    .await;
    assert_eq!(text, format!("Buy milk (Date: {})\nPages: [1]\n", today()));
}

#[tokio::test]
async fn add_puts_new_task_on_top() {
    let server = collection_server().await;
    let settings = settings_for(&server);

    let (outcome, text) = run_command(
        &settings,
        Command::Add {
            title: vec!["Test".to_string()],
        },
        "",
    )
    .await;

    assert_eq!(outcome, Outcome::Done);
    assert_eq!(text.lines().next(), Some(format!("Test (Date: {})", today()).as_str()));
    assert!(text.ends_with("Pages: [1] 2 3\n"));
}

#[tokio::test]
async fn failed_fetch_reports_action_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let settings = settings_for(&server);

    let (outcome, text) = run_command(
        &settings,
        Command::List {
            search: String::new(),
            from: None,
            to: None,
            page: 1,
        },
        "",
    )
    .await;

    assert_eq!(outcome, Outcome::ActionFailed);
    assert_eq!(text, "! Failed to fetch todos (HTTP 500)\nNo tasks found.\n");
}

#[tokio::test]
async fn shell_session_filters_pages_and_adds() {
    let server = collection_server().await;
    let settings = settings_for(&server);
    let script = "search milk\nsearch\npage 2\nfrom not-a-date\nadd Test\nquit\n";

    let (outcome, text) = run_command(&settings, Command::Shell, script).await;
    assert_eq!(outcome, Outcome::Done);

    let renders: Vec<&str> = text.split(todoscope_cli::shell::PROMPT).collect();
    assert_eq!(renders.len(), 7);
    assert!(renders[0].ends_with("Pages: [1] 2 3\n"));
    assert_eq!(renders[1], format!("Buy milk (Date: {})\nPages: [1]\n", today()));
    assert!(renders[3].starts_with(&format!("task 11 (Date: {})", today())));
    assert!(renders[3].ends_with("Pages: 1 [2] 3\n"));
    assert!(renders[4].starts_with("error: invalid date 'not-a-date'"));
    assert!(renders[5].starts_with(&format!("Test (Date: {})", today())));
    assert!(renders[5].ends_with("Pages: [1] 2 3\n"));
    assert_eq!(renders[6], "");
}
