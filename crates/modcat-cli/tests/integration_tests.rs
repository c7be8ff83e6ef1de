//! Integration tests for CLI commands

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated store and settings for one test
struct Sandbox {
    dir: TempDir,
    env_repos: Option<String>,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.yaml"), "requestTimeout: 2s\n").unwrap();
        Self {
            dir,
            env_repos: None,
        }
    }

    fn with_env_repos(mut self, value: &str) -> Self {
        self.env_repos = Some(value.to_string());
        self
    }

    fn store_dir(&self) -> &Path {
        self.dir.path()
    }

    fn stored_repos(&self) -> Option<serde_json::Value> {
        let path = self.store_dir().join("modcat_module_repos.json");
        let content = std::fs::read_to_string(path).ok()?;
        Some(serde_json::from_str(&content).unwrap())
    }

    /// Helper to run modcat command
    fn modcat(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_modcat"));
        cmd.args(args)
            .env("MODCAT_STORE_DIR", self.store_dir())
            .env("MODCAT_CONFIG", self.dir.path().join("config.yaml"))
            .env_remove("RUST_LOG")
            .env_remove("MODULES_REPO");
        if let Some(value) = &self.env_repos {
            cmd.env("MODULES_REPO", value);
        }
        cmd.output().expect("Failed to execute modcat")
    }

    fn seed(&self, repos: serde_json::Value) {
        std::fs::write(
            self.store_dir().join("modcat_module_repos.json"),
            repos.to_string(),
        )
        .unwrap();
    }
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

/// URL on a port nothing listens on
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/index.json", port)
}

mod repo_command {
    use super::*;

    #[test]
    fn test_first_use_seeds_default_repository() {
        let sandbox = Sandbox::new();
        let output = sandbox.modcat(&["repo", "list", "--json"]);

        assert!(output.status.success());
        let json = stdout_json(&output);
        let repos = json.as_array().unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0]["name"], "forkspacer-official");
        assert_eq!(repos[0]["enabled"], true);
        assert_eq!(repos[0]["origin"], "user");

        let stored = sandbox.stored_repos().expect("default should be persisted");
        assert_eq!(stored.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_list_message() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([]));

        let output = sandbox.modcat(&["repo", "list"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("No repositories configured."));
    }

    #[test]
    fn test_add_then_duplicate_is_rejected() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([]));

        let output = sandbox.modcat(&["repo", "add", "community", "https://community.example/index.json"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("has been added"));

        let output = sandbox.modcat(&["repo", "add", "again", "https://community.example/index.json"]);
        assert_eq!(output.status.code(), Some(2));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("already exists"));

        let stored = sandbox.stored_repos().unwrap();
        assert_eq!(stored.as_array().unwrap().len(), 1);
        assert_eq!(stored[0]["name"], "community");
    }

    #[test]
    fn test_add_rejects_non_http_url() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([]));

        let output = sandbox.modcat(&["repo", "add", "local", "file:///tmp/index.json"]);
        assert_eq!(output.status.code(), Some(2));
        assert_eq!(sandbox.stored_repos().unwrap(), serde_json::json!([]));
    }

    #[test]
    fn test_remove_last_repository_does_not_reseed() {
        let sandbox = Sandbox::new();
        sandbox.modcat(&["repo", "list"]);

        let output = sandbox.modcat(&[
            "repo",
            "remove",
            "https://raw.githubusercontent.com/forkspacer/modules/main/index.json",
        ]);
        assert!(output.status.success());
        assert_eq!(sandbox.stored_repos().unwrap(), serde_json::json!([]));

        let output = sandbox.modcat(&["repo", "list", "--json"]);
        assert_eq!(stdout_json(&output), serde_json::json!([]));
    }

    #[test]
    fn test_disable_persists() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([
            {"name": "a", "url": "https://a.example/index.json", "enabled": true}
        ]));

        let output = sandbox.modcat(&["repo", "disable", "https://a.example/index.json"]);
        assert!(output.status.success());
        assert_eq!(sandbox.stored_repos().unwrap()[0]["enabled"], false);
    }

    #[test]
    fn test_toggle_unknown_repository() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([]));

        let output = sandbox.modcat(&["repo", "enable", "https://missing.example/index.json"]);
        assert_eq!(output.status.code(), Some(4));
    }

    #[test]
    fn test_environment_repositories_are_listed_but_not_persisted() {
        let sandbox = Sandbox::new()
            .with_env_repos(r#"[{"name":"team","url":"https://team.example/index.json"}]"#);
        sandbox.seed(serde_json::json!([
            {"name": "a", "url": "https://a.example/index.json"}
        ]));

        let output = sandbox.modcat(&["repo", "list", "--json"]);
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json[0]["name"], "team");
        assert_eq!(json[0]["origin"], "env");
        assert_eq!(json[1]["name"], "a");

        sandbox.modcat(&["repo", "add", "b", "https://b.example/index.json"]);
        let stored = sandbox.stored_repos().unwrap();
        let urls: Vec<_> = stored
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["url"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            urls,
            vec!["https://a.example/index.json", "https://b.example/index.json"]
        );
    }
}

mod catalog_command {
    use super::*;

    #[test]
    fn test_no_repositories_gives_empty_catalog() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([]));

        let output = sandbox.modcat(&["catalog", "--json"]);
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["modules"], serde_json::json!([]));
        assert_eq!(json["unreachable"], serde_json::json!([]));
    }

    #[test]
    fn test_all_repositories_failing_exits_with_catalog_unavailable() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([
            {"name": "down", "url": unreachable_url()}
        ]));

        let output = sandbox.modcat(&["catalog"]);
        assert_eq!(output.status.code(), Some(3));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Failed to fetch any catalogs"));
        assert!(stderr.contains("down: Network error"));
    }

    #[test]
    fn test_disabled_repositories_are_skipped() {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([
            {"name": "down", "url": unreachable_url(), "enabled": false}
        ]));

        let output = sandbox.modcat(&["catalog", "--json"]);
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["modules"], serde_json::json!([]));
    }
}

mod served_catalogs {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog(modules: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "apiVersion": "v1",
            "modules": modules,
            "categories": [{"name": "database", "displayName": "Databases"}],
        }))
    }

    async fn server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/first/index.json"))
            .respond_with(catalog(serde_json::json!([
                {
                    "name": "redis",
                    "displayName": "Redis",
                    "description": "In-memory data store",
                    "category": "database",
                    "tags": ["cache"],
                    "versions": [{"version": "1.2.0"}, {"version": "1.1.0"}]
                },
                {
                    "name": "nginx",
                    "displayName": "NGINX",
                    "description": "Web server",
                    "category": "networking",
                    "versions": [{"version": "0.3.0"}]
                }
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/second/index.json"))
            .respond_with(catalog(serde_json::json!([
                {"name": "redis", "displayName": "Redis (fork)", "category": "database"}
            ])))
            .mount(&server)
            .await;
        server
    }

    async fn run(sandbox: Sandbox, args: Vec<&'static str>) -> (Sandbox, Output) {
        tokio::task::spawn_blocking(move || {
            let output = sandbox.modcat(&args);
            (sandbox, output)
        })
        .await
        .unwrap()
    }

    fn sandbox(server: &MockServer) -> Sandbox {
        let sandbox = Sandbox::new();
        sandbox.seed(serde_json::json!([
            {"name": "first", "url": format!("{}/first/index.json", server.uri())},
            {"name": "down", "url": unreachable_url()},
            {"name": "second", "url": format!("{}/second/index.json", server.uri())}
        ]));
        sandbox
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_catalog_merges_first_wins_and_reports_unreachable() {
        let server = server().await;
        let (sandbox, output) = run(sandbox(&server), vec!["catalog", "--json"]).await;

        assert!(output.status.success());
        let json = stdout_json(&output);
        let modules = json["modules"].as_array().unwrap();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0]["name"], "redis");
        assert_eq!(modules[0]["displayName"], "Redis");
        assert_eq!(modules[1]["name"], "nginx");
        assert_eq!(json["unreachable"].as_array().unwrap().len(), 1);
        assert_eq!(json["unreachable"][0]["name"], "down");

        let stored = sandbox.stored_repos().unwrap();
        assert!(stored[0].get("lastSync").is_some());
        assert!(stored[1].get("lastSync").is_none());
        assert!(stored[2].get("lastSync").is_some());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_catalog_search_and_category() {
        let server = server().await;

        let (sandbox, output) = run(sandbox(&server), vec!["catalog", "--search", "CACHE", "--json"]).await;
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["modules"].as_array().unwrap().len(), 1);
        assert_eq!(json["modules"][0]["name"], "redis");

        let (_, output) = run(sandbox, vec!["catalog", "--category", "networking", "--json"]).await;
        let json = stdout_json(&output);
        assert_eq!(json["modules"].as_array().unwrap().len(), 1);
        assert_eq!(json["modules"][0]["name"], "nginx");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_show_module() {
        let server = server().await;

        let (sandbox, output) = run(sandbox(&server), vec!["show", "redis", "--json"]).await;
        assert!(output.status.success());
        let json = stdout_json(&output);
        assert_eq!(json["versions"][0]["version"], "1.2.0");

        let (_, output) = run(sandbox, vec!["show", "missing"]).await;
        assert_eq!(output.status.code(), Some(4));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_install_resolves_then_reports_unavailable() {
        let server = server().await;

        let (sandbox, output) = run(sandbox(&server), vec!["install", "redis"]).await;
        assert_eq!(output.status.code(), Some(6));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Redis"));
        assert!(stdout.contains("1.2.0"));

        let (sandbox, output) = run(sandbox, vec!["install", "redis", "--version", "9.9.9"]).await;
        assert_eq!(output.status.code(), Some(4));

        let (_, output) = run(sandbox, vec!["install", "missing"]).await;
        assert_eq!(output.status.code(), Some(4));
    }
}
