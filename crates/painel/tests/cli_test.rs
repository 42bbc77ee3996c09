//! Integration tests for the `painel` CLI binary.
//!
//! Argument parsing, completions, config handling and error exit codes are
//! checked without a backend; list and write commands run against a
//! wiremock server standing in for the PHP API.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `painel` binary with env isolation.
///
/// Clears all `PAINEL_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn painel_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("painel");
    cmd.env("PAINEL_CONFIG", config)
        .env("NO_COLOR", "1")
        .env_remove("PAINEL_PROFILE")
        .env_remove("PAINEL_API_URL")
        .env_remove("PAINEL_TENANT")
        .env_remove("PAINEL_OUTPUT")
        .env_remove("PAINEL_INSECURE")
        .env_remove("PAINEL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn scratch() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    (dir, config)
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

async fn api() -> (MockServer, String) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    (server, base)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, config) = scratch();
    let output = painel_cmd(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in:\n{stderr}");
}

#[test]
fn test_help_flag() {
    let (_dir, config) = scratch();
    painel_cmd(&config).arg("--help").assert().success().stdout(
        predicate::str::contains("segments")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("calls"))
            .and(predicate::str::contains("records")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("painel"));
}

#[test]
fn test_portuguese_alias() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["segmentos", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}

#[test]
fn test_invalid_subcommand() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .arg("reports")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_malformed_assignment_is_a_usage_error() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["segments", "create", "--set", "nome"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("FIELD=VALUE"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete -c painel"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_list_without_config_exits_3() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["segments", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("default"));
}

#[test]
fn test_config_path_honours_env() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["config", "set", "profiles.prod.api_url", "https://painel.example.com/api"])
        .assert()
        .success();
    painel_cmd(&config)
        .args(["config", "set", "profiles.prod.tenant_id", "7"])
        .assert()
        .success();
    painel_cmd(&config)
        .args(["config", "use", "prod"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("default_profile = \"prod\""), "{written}");

    painel_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("https://painel.example.com/api")
                .and(predicate::str::contains("tenant_id = \"7\"")),
        );

    painel_cmd(&config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* prod"));
}

#[test]
fn test_config_set_rejects_bad_url() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["config", "set", "profiles.prod.api_url", "ftp://nope"])
        .assert()
        .failure();
    assert!(!config.exists());
}

#[test]
fn test_config_set_unknown_key() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["config", "set", "defaults.colour", "red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_use_missing_profile_fails() {
    let (_dir, config) = scratch();
    painel_cmd(&config)
        .args(["config", "use", "ghost"])
        .assert()
        .code(2);
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_segments_list_as_json() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/segmentos.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": 1, "nome": "Varejo", "descricao": "Lojas"},
                {"id": 2, "nome": "Saúde", "descricao": null}
            ]
        })))
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "-o", "json", "segments", "list", "--search", "vare"]);

    let out = run(cmd).await.success();
    let stdout = String::from_utf8_lossy(&out.get_output().stdout).into_owned();
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["nome"], "Varejo");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_plain_sorted_and_capped() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/assuntos.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "nome": "Rede"},
            {"id": 1, "nome": "Impressora"},
            {"id": 2, "nome": "Acesso"}
        ])))
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args([
        "--api-url", base.as_str(), "-o", "plain", "subjects", "list", "--sort", "id", "--desc", "--limit",
        "2",
    ]);

    run(cmd)
        .await
        .success()
        .stdout("3\n2\n")
        .stderr(predicate::str::contains("Showing 2 of 3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_sort_column_is_rejected() {
    let (_server, base) = api().await;
    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "list", "--sort", "cor"]);
    run(cmd)
        .await
        .code(2)
        .stderr(predicate::str::contains("cor"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_without_tenant_exits_3_without_request() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "clients", "list"]);
    run(cmd).await.code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clients_list_sends_tenant_header() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/clientes.php"))
        .and(header("X-Empresa-Id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 10, "nome": "ACME", "cnpj": "12345678000199"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "--tenant", "7", "-o", "plain", "clients", "list"]);
    run(cmd).await.success().stdout("10\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_missing_record_exits_4() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/segmentos.php"))
        .and(query_param("id", "99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": null
        })))
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "get", "99"]);
    run(cmd)
        .await
        .code(4)
        .stderr(predicate::str::contains("segments list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_with_empty_name_never_posts() {
    let (server, base) = api().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "create", "--set", "descricao=x"]);
    run(cmd)
        .await
        .code(2)
        .stderr(predicate::str::contains("Name is required"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_posts_and_reports_success() {
    let (server, base) = api().await;
    Mock::given(method("POST"))
        .and(path("/api/segmentos.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Segmento criado",
            "data": {"id": 5}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/segmentos.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "nome": "Indústria"}
        ])))
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "create", "--set", "nome=Indústria"]);
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Segmento criado"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_photo_on_segment_is_rejected() {
    let (_server, base) = api().await;
    let (dir, config) = scratch();
    let photo = dir.path().join("foto.png");
    std::fs::write(&photo, b"png").unwrap();

    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "create", "--set", "nome=A", "--photo"])
        .arg(&photo);
    run(cmd)
        .await
        .code(2)
        .stderr(predicate::str::contains("photo"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_is_refused_when_not_interactive() {
    let (server, base) = api().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "delete", "1"]);
    run(cmd)
        .await
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/segmentos.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "nome": "Varejo"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/segmentos.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Segmento excluído"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "--yes", "segments", "delete", "1"]);
    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Segmento excluído"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_error_exits_1() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/segmentos.php"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Banco indisponível"
        })))
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "segments", "list"]);
    run(cmd)
        .await
        .code(1)
        .stderr(predicate::str::contains("Banco indisponível"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_records_lists_any_endpoint() {
    let (server, base) = api().await;
    Mock::given(method("GET"))
        .and(path("/api/relatorios.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"titulo": "Mensal", "id": 2},
            {"id": 1, "titulo": "Anual", "total": 12}
        ])))
        .mount(&server)
        .await;

    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", base.as_str(), "records", "relatorios.php", "--sort", "titulo"]);
    run(cmd).await.success().stdout(
        predicate::str::contains("total")
            .and(predicate::str::is_match("(?s)Anual.*Mensal").unwrap()),
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_api_exits_7() {
    let (_dir, config) = scratch();
    let mut cmd = painel_cmd(&config);
    cmd.args(["--api-url", "http://127.0.0.1:9/api", "--timeout", "2", "segments", "list"]);
    run(cmd).await.code(7);
}
