//! Integration tests for the social-queue binary against a mock backend

use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const QUEUE: &str = r#"[
    {"id": 1, "content": "Product launch", "platform": "twitter",
     "scheduled_at": "2099-03-01T09:30:00", "media_url": null, "status": "pending"},
    {"id": 2, "content": "Team offsite recap", "platform": "linkedin",
     "scheduled_at": "2025-01-01T09:30:00", "media_url": null, "status": "published"},
    {"id": 3, "content": "Retry me", "platform": "threads",
     "scheduled_at": "2025-01-02T09:30:00", "media_url": null, "status": "failed"}
]"#;

/// Config pointing at `server`, with schedules entered in UTC
fn setup_test_env(server: &ServerGuard) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = format!(
        r#"
[api]
base_url = "{}"
timeout_secs = 5

[defaults]
platforms = ["linkedin"]

[schedule]
timezone = "utc"
"#,
        server.url()
    );
    fs::write(&config_path, config_content).unwrap();

    (temp_dir, config_path.to_string_lossy().to_string())
}

fn social_queue(config_path: &str) -> Command {
    let mut cmd = Command::cargo_bin("social-queue").unwrap();
    cmd.env("SOCIALCMD_CONFIG", config_path)
        .env("SOCIALCMD_LOG_LEVEL", "error")
        .env_remove("SOCIALCMD_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_list_shows_upcoming_by_default() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/posts")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(QUEUE)
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Product launch"))
        .stdout(predicate::str::contains("X (Twitter)"))
        .stdout(predicate::str::contains("Retry me"))
        .stdout(predicate::str::contains("Team offsite").not());
}

#[test]
fn test_list_json_all_tabs() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/posts")
        .with_status(200)
        .with_body(QUEUE)
        .create();
    let (_dir, config) = setup_test_env(&server);

    let output = social_queue(&config)
        .args(["list", "--tab", "all", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let posts = json.as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["status"], "pending");
}

#[test]
fn test_list_filters_by_platform_and_search() {
    let mut server = Server::new();
    let _m = server
        .mock("GET", "/posts")
        .with_status(200)
        .with_body(QUEUE)
        .expect(2)
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["list", "--tab", "all", "--platform", "LinkedIn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Team offsite recap"))
        .stdout(predicate::str::contains("Product launch").not());

    social_queue(&config)
        .args(["list", "--tab", "all", "--search", "LAUNCH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Product launch"))
        .stdout(predicate::str::contains("Retry me").not());
}

#[test]
fn test_list_backend_unreachable_exits_1() {
    let server = Server::new();
    let (_dir, config) = setup_test_env(&server);
    drop(server);

    social_queue(&config).arg("list").assert().code(1);
}

#[test]
fn test_schedule_sends_one_request_per_platform() {
    let mut server = Server::new();
    let create = server
        .mock("POST", "/posts")
        .match_body(Matcher::Json(serde_json::json!([
            {
                "content": "Launch day!",
                "platform": "twitter",
                "scheduled_at": "2025-03-01T09:30:00.000Z",
                "media_url": "",
                "status": "pending"
            },
            {
                "content": "Launch day!",
                "platform": "threads",
                "scheduled_at": "2025-03-01T09:30:00.000Z",
                "media_url": "",
                "status": "pending"
            }
        ])))
        .with_status(200)
        .with_body(
            r#"[
                {"id": 10, "content": "Launch day!", "platform": "twitter",
                 "scheduled_at": "2025-03-01T09:30:00", "status": "pending"},
                {"id": 11, "content": "Launch day!", "platform": "threads",
                 "scheduled_at": "2025-03-01T09:30:00", "status": "pending"}
            ]"#,
        )
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args([
            "schedule",
            "--content",
            "Launch day!",
            "--platform",
            "twitter",
            "--platform",
            "threads",
            "--at",
            "2025-03-01T09:30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("10 | X (Twitter)"))
        .stdout(predicate::str::contains("11 | Threads"));

    create.assert();
}

#[test]
fn test_schedule_too_long_exits_3_without_request() {
    let mut server = Server::new();
    let create = server.mock("POST", "/posts").expect(0).create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args([
            "schedule",
            "--content",
            &"x".repeat(300),
            "--platform",
            "twitter",
            "--platform",
            "linkedin",
            "--at",
            "2025-03-01T09:30",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("X (Twitter)"))
        .stderr(predicate::str::contains("LinkedIn").not());

    create.assert();
}

#[test]
fn test_schedule_rejects_unknown_platform() {
    let server = Server::new();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["schedule", "-c", "hi", "-p", "myspace", "-a", "2025-03-01T09:30"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown platform"));
}

#[test]
fn test_schedule_rejects_bad_time() {
    let server = Server::new();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["schedule", "-c", "hi", "-a", "next tuesday"])
        .assert()
        .code(3);
}

#[test]
fn test_schedule_server_rejection_exits_1_with_detail() {
    let mut server = Server::new();
    let _m = server
        .mock("POST", "/posts")
        .with_status(422)
        .with_body(r#"{"detail": [{"msg": "Content too long for twitter"}]}"#)
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["schedule", "-c", "hi", "-a", "2025-03-01T09:30"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Content too long for twitter"));
}

#[test]
fn test_delete_declined_makes_no_request() {
    let mut server = Server::new();
    let delete = server.mock("DELETE", "/posts/42").expect(0).create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["delete", "42"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Are you sure you want to delete this post?",
        ));

    delete.assert();
}

#[test]
fn test_delete_confirmed() {
    let mut server = Server::new();
    let delete = server
        .mock("DELETE", "/posts/42")
        .with_status(200)
        .with_body(r#"{"message": "Post deleted"}"#)
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["delete", "42"])
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted post 42"));

    delete.assert();
}

#[test]
fn test_delete_missing_post_exits_1() {
    let mut server = Server::new();
    let _m = server
        .mock("DELETE", "/posts/404")
        .with_status(404)
        .with_body(r#"{"detail": "Post not found"}"#)
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["delete", "404", "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Post not found"));
}

#[test]
fn test_invalid_config_exits_2() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[queue]\npoll_interval = \"whenever\"\n").unwrap();

    social_queue(&config_path.to_string_lossy())
        .arg("list")
        .assert()
        .code(2);
}

#[test]
fn test_watch_once_exits_after_first_poll() {
    let mut server = Server::new();
    let list = server
        .mock("GET", "/posts")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create();
    let (_dir, config) = setup_test_env(&server);

    social_queue(&config)
        .args(["watch", "--once", "--interval", "1h"])
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success();

    list.assert();
}
