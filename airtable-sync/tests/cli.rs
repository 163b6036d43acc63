use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: [&str; 7] = [
    "AIRTABLE_API_KEY",
    "AIRTABLE_ENDPOINT_URL",
    "AIRTABLE_BASE_ID",
    "AIRTABLE_TABLE_ID",
    "DINCHARYA_BASE_ID",
    "DINCHARYA_PRIORITIES_TABLE_ID",
    "DINCHARYA_TASKS_TABLE_ID",
];

/// A command isolated from the caller's environment and any local `.env`.
fn isolated_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("airtable-sync").expect("Binary exists");
    cmd.current_dir(workdir);
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().expect("binary runs"))
        .await
        .expect("join blocking task")
}

#[test]
fn help_lists_the_sync_command() {
    let workdir = TempDir::new().unwrap();
    isolated_cmd(workdir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn sync_help_maps_jobs_to_the_scripts_they_replace() {
    let workdir = TempDir::new().unwrap();
    isolated_cmd(workdir.path())
        .arg("sync")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("entries").and(predicate::str::contains("sync_airtable.py")))
        .stdout(predicate::str::contains("dincharya").and(predicate::str::contains("sync_dincharya.py")));
}

#[test]
fn sync_requires_a_job_or_config() {
    let workdir = TempDir::new().unwrap();
    isolated_cmd(workdir.path())
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config").or(predicate::str::contains("JOB")));
}

#[test]
fn sync_without_api_key_fails_before_any_request() {
    let workdir = TempDir::new().unwrap();
    isolated_cmd(workdir.path())
        .arg("sync")
        .arg("entries")
        .env("AIRTABLE_BASE_ID", "appLog")
        .env("AIRTABLE_TABLE_ID", "tblEntries")
        .assert()
        .failure()
        .stderr(predicate::str::contains("AIRTABLE_API_KEY"));

    assert!(!workdir.path().join("entries_data.csv").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_entries_preset_writes_csv_and_prints_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appLog/tblEntries"))
        .and(header("Authorization", "Bearer pat-test"))
        .and(query_param("sort[0][field]", "Date"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "rec1", "fields": {"Name": "One", "Type": "Journal", "Date": "2024-01-02"}},
                {"id": "rec2", "fields": {"Name": "Two", "Type": "Journal", "Date": "2024-01-05",
                    "Entry Sentiment (AI)": {"value": "Positive"}}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(workdir.path());
    cmd.arg("sync")
        .arg("entries")
        .env("AIRTABLE_API_KEY", "pat-test")
        .env("AIRTABLE_ENDPOINT_URL", server.uri())
        .env("AIRTABLE_BASE_ID", "appLog")
        .env("AIRTABLE_TABLE_ID", "tblEntries");

    let output = run_blocking(cmd).await;
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("SYNC COMPLETE"), "stdout: {stdout}");
    assert!(stdout.contains("Records: 2"), "stdout: {stdout}");
    assert!(stdout.contains("Date Range: 2024-01-02 to 2024-01-05"), "stdout: {stdout}");
    assert!(stdout.contains("Types: {Journal: 2}"), "stdout: {stdout}");

    let csv = fs::read_to_string(workdir.path().join("entries_data.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Record ID,Name,Type,Date,"));
    assert!(lines[2].starts_with("rec2,Two,Journal,2024-01-05,"));
    assert!(lines[2].ends_with(",Positive,"));
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_with_config_file_exports_declared_tables() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appPlanner/tblGoals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "records": [
                {"id": "recG1", "fields": {"Goal": "Read more", "Owners": ["Asha", "Ravi"]}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let config_path = workdir.path().join("planner.yaml");
    fs::write(
        &config_path,
        r#"
base_id: appPlanner
tables:
  - name: goals
    table_id: tblGoals
    columns:
      - name: Record ID
        record_id: true
      - name: Goal
      - name: People
        field: Owners
      - name: Archived
        default: "false"
"#,
    )
    .unwrap();

    let out_dir = workdir.path().join("exports");
    let mut cmd = isolated_cmd(workdir.path());
    cmd.arg("sync")
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&out_dir)
        .env("AIRTABLE_API_KEY", "pat-test")
        .env("AIRTABLE_ENDPOINT_URL", server.uri());

    let output = run_blocking(cmd).await;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let csv = fs::read_to_string(out_dir.join("goals.csv")).unwrap();
    assert_eq!(
        csv.lines().collect::<Vec<_>>(),
        vec![
            "Record ID,Goal,People,Archived",
            "recG1,Read more,\"Asha, Ravi\",False",
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_surfaces_api_errors_with_non_zero_exit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("AUTHENTICATION_REQUIRED"))
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(workdir.path());
    cmd.arg("sync")
        .arg("dincharya")
        .env("AIRTABLE_API_KEY", "bad-key")
        .env("AIRTABLE_ENDPOINT_URL", server.uri())
        .env("DINCHARYA_BASE_ID", "appDin")
        .env("DINCHARYA_PRIORITIES_TABLE_ID", "tblP")
        .env("DINCHARYA_TASKS_TABLE_ID", "tblT");

    let output = run_blocking(cmd).await;
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("401"), "stderr: {stderr}");
    assert!(!workdir.path().join("priorities.csv").exists());
    assert!(!workdir.path().join("tasks.csv").exists());
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use airtable_sync::cli::{run, Cli, Commands};

    // A missing config file fails the run, after the initial event.
    let cli = Cli {
        command: Commands::Sync {
            job: None,
            config: Some(std::path::PathBuf::from("dummy.yaml")),
            output_dir: None,
        },
    };

    let _ = run(cli).await;

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
