use assert_fs::TempDir;
use assert_fs::prelude::*;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use markmap_tools_e2e_tests::{RequestLog, spawn_server, unreachable_base_url};
use markmap_tools_lib::cli::{
    Command, ResolvedCommand, SmokeTestParams, resolve_command, run_command, run_smoke_test,
};
use markmap_tools_lib::client::{ImageFormat, check_health};
use markmap_tools_lib::error::{MarkmapToolsError, Stage};
use markmap_tools_lib::utils::build_http_client;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

fn fake_png(len: usize) -> Vec<u8> {
    let mut image = PNG_SIGNATURE.to_vec();
    image.extend((0..len - PNG_SIGNATURE.len()).map(|i| (i % 256) as u8));
    image
}

fn build_params(base_url: &str, output_path: &Path) -> SmokeTestParams {
    let command = Command::SmokeTest {
        config_path: None,
        base_url: Some(base_url.to_string()),
        output_path: Some(output_path.to_str().unwrap().to_string()),
    };
    match resolve_command(command).expect("Failed to resolve smoke-test command") {
        ResolvedCommand::SmokeTest(params) => params,
        _ => unreachable!("Resolved command type mismatch"),
    }
}

fn health_ok(body: Value) -> Router {
    Router::new().route("/api/health", get(move || async move { Json(body) }))
}

fn service(health: Value, render_status: StatusCode, render_body: Vec<u8>) -> Router {
    health_ok(health).route(
        "/api/render",
        post(move || async move {
            let content_type = if render_status == StatusCode::OK {
                "image/png"
            } else {
                "application/json"
            };
            (render_status, [(header::CONTENT_TYPE, content_type)], render_body)
        }),
    )
}

#[tokio::test]
async fn test_health_version_is_reported_and_render_proceeds() {
    init_tracing();

    let log = RequestLog::default();
    let received: Arc<Mutex<Option<Value>>> = Arc::default();
    let image = fake_png(4096);

    let app = {
        let received = received.clone();
        let image = image.clone();
        health_ok(json!({ "version": "1.0" })).route(
            "/api/render",
            post(move |Json(body): Json<Value>| async move {
                *received.lock().unwrap() = Some(body);
                ([(header::CONTENT_TYPE, "image/png")], image)
            }),
        )
    };
    let base_url = spawn_server(app, log.clone())
        .await
        .expect("Failed to start mock service");

    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");
    let params = build_params(&base_url, output.path());

    let client = build_http_client().unwrap();
    let health = check_health(&client, &params.endpoints, params.health_timeout)
        .await
        .expect("Health check should succeed");
    assert_eq!(health.version_or_unknown(), "1.0");

    let outcome = run_smoke_test(params)
        .await
        .expect("Smoke test should pass");

    assert_eq!(outcome.size, image.len() as u64);
    assert_eq!(std::fs::read(output.path()).unwrap(), image);
    assert_eq!(log.count("/api/render"), 1);

    let body = received
        .lock()
        .unwrap()
        .clone()
        .expect("Render endpoint should receive a JSON body");
    assert_eq!(body["width"], 1920);
    assert_eq!(body["height"], 1080);
    assert_eq!(body["format"], "png");
    assert!(!body["markdown"].as_str().unwrap().trim().is_empty());
}

#[tokio::test]
async fn test_missing_version_is_shown_as_unknown() {
    init_tracing();

    let base_url = spawn_server(
        service(json!({ "status": "ok" }), StatusCode::OK, fake_png(64)),
        RequestLog::default(),
    )
    .await
    .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let params = build_params(&base_url, &temp.path().join("mindmap.png"));

    let client = build_http_client().unwrap();
    let health = check_health(&client, &params.endpoints, params.health_timeout)
        .await
        .expect("Health check should succeed");

    assert_eq!(health.version, None);
    assert_eq!(health.version_or_unknown(), "unknown");
}

#[tokio::test]
async fn test_loosely_typed_health_fields_are_accepted() {
    init_tracing();

    let cases = [
        (json!({ "version": 1.0 }), "1.0"),
        (json!({ "version": "1.0", "timestamp": 1700000000 }), "1.0"),
        (json!({ "version": "1.0", "status": { "db": "ok" } }), "1.0"),
        (json!({ "version": null, "endpoints": "none" }), "unknown"),
    ];

    for (health, expected_version) in cases {
        let log = RequestLog::default();
        let base_url = spawn_server(
            service(health.clone(), StatusCode::OK, fake_png(64)),
            log.clone(),
        )
        .await
        .expect("Failed to start mock service");
        let temp = TempDir::new().unwrap();
        let output = temp.child("mindmap.png");
        let params = build_params(&base_url, output.path());

        let client = build_http_client().unwrap();
        let report = check_health(&client, &params.endpoints, params.health_timeout)
            .await
            .unwrap_or_else(|err| panic!("Health body {health} should be accepted: {err:?}"));
        assert_eq!(report.version_or_unknown(), expected_version, "for {health}");

        run_smoke_test(params)
            .await
            .unwrap_or_else(|err| panic!("Smoke test should pass for {health}: {err:?}"));
        assert_eq!(log.count("/api/render"), 1, "Render should follow {health}");
        output.assert(predicate::path::is_file());
    }
}

#[tokio::test]
async fn test_unreachable_server_fails_before_rendering() {
    init_tracing();

    let base_url = unreachable_base_url().await.unwrap();
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");

    let result = run_smoke_test(build_params(&base_url, output.path())).await;

    assert!(
        matches!(
            result,
            Err(MarkmapToolsError::ServerUnreachable {
                stage: Stage::Health,
                ..
            })
        ),
        "Expected the health check to fail to connect, got {:?}",
        result
    );
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_unhealthy_status_skips_render() {
    init_tracing();

    let log = RequestLog::default();
    let app = Router::new()
        .route(
            "/api/health",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "status": "error", "message": "Service unavailable" })),
                )
            }),
        )
        .route("/api/render", post(|| async { fake_png(64) }));
    let base_url = spawn_server(app, log.clone())
        .await
        .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");

    let result = run_smoke_test(build_params(&base_url, output.path())).await;

    assert!(
        matches!(
            result,
            Err(MarkmapToolsError::UnexpectedStatus { status: 503, .. })
        ),
        "Expected an unexpected status error, got {:?}",
        result
    );
    assert_eq!(log.count("/api/health"), 1);
    assert_eq!(log.count("/api/render"), 0, "Render must not be requested");
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_render_error_payload_is_reported_without_output() {
    init_tracing();

    let error_body = json!({
        "error": "Internal server error",
        "message": "Failed to render mindmap"
    });
    let base_url = spawn_server(
        service(
            json!({ "version": "1.0.0" }),
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::to_vec(&error_body).unwrap(),
        ),
        RequestLog::default(),
    )
    .await
    .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");

    let result = run_smoke_test(build_params(&base_url, output.path())).await;

    match result {
        Err(MarkmapToolsError::RenderRejected { status, detail }) => {
            assert_eq!(status, 500);
            assert_eq!(detail, "Internal server error: Failed to render mindmap");
        }
        other => panic!("Expected a rejected render, got {:?}", other),
    }
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_plain_text_error_is_truncated() {
    init_tracing();

    let base_url = spawn_server(
        service(
            json!({ "version": "1.0.0" }),
            StatusCode::BAD_GATEWAY,
            "upstream exploded ".repeat(40).into_bytes(),
        ),
        RequestLog::default(),
    )
    .await
    .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");

    let result = run_smoke_test(build_params(&base_url, output.path())).await;

    match result {
        Err(MarkmapToolsError::RenderRejected { status, detail }) => {
            assert_eq!(status, 502);
            assert_eq!(detail.chars().count(), 200);
            assert!(detail.starts_with("upstream exploded"));
        }
        other => panic!("Expected a rejected render, got {:?}", other),
    }
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_slow_render_times_out() {
    init_tracing();

    let app = health_ok(json!({ "version": "1.0.0" })).route(
        "/api/render",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            fake_png(64).into_response()
        }),
    );
    let base_url = spawn_server(app, RequestLog::default())
        .await
        .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");

    let params = SmokeTestParams {
        render_timeout: Duration::from_secs(1),
        ..build_params(&base_url, output.path())
    };
    let result = run_smoke_test(params).await;

    assert!(
        matches!(
            result,
            Err(MarkmapToolsError::RequestTimeout {
                stage: Stage::Render,
                timeout_secs: 1,
                ..
            })
        ),
        "Expected a render timeout, got {:?}",
        result
    );
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_slow_health_check_times_out_with_health_hints() {
    init_tracing();

    let log = RequestLog::default();
    let app = Router::new()
        .route(
            "/api/health",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "version": "1.0.0" }))
            }),
        )
        .route("/api/render", post(|| async { fake_png(64) }));
    let base_url = spawn_server(app, log.clone())
        .await
        .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.png");

    let params = SmokeTestParams {
        health_timeout: Duration::from_secs(1),
        ..build_params(&base_url, output.path())
    };
    let err = run_smoke_test(params)
        .await
        .expect_err("A slow health endpoint should time out");

    assert!(
        matches!(
            err,
            MarkmapToolsError::RequestTimeout {
                stage: Stage::Health,
                timeout_secs: 1,
                ..
            }
        ),
        "Expected a health timeout, got {:?}",
        err
    );
    let hints = err.hints();
    assert!(!hints.is_empty());
    assert!(hints.iter().any(|hint| hint.contains("server is running")));
    assert!(
        hints.iter().all(|hint| !hint.contains("markdown")),
        "Health timeout hints should not talk about the render: {hints:?}"
    );
    assert_eq!(log.count("/api/render"), 0, "Render must not be requested");
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_invalid_sample_is_rejected_locally() {
    init_tracing();

    let log = RequestLog::default();
    let base_url = spawn_server(
        service(json!({ "version": "1.0.0" }), StatusCode::OK, fake_png(64)),
        log.clone(),
    )
    .await
    .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();
    let output = temp.child("mindmap.jpeg");

    let mut params = build_params(&base_url, output.path());
    params.request.width = 50;
    params.request.format = ImageFormat::Jpeg;

    let result = run_smoke_test(params).await;

    assert!(
        matches!(result, Err(MarkmapToolsError::InvalidRenderRequest { .. })),
        "Expected a validation error, got {:?}",
        result
    );
    assert_eq!(log.count("/api/render"), 0);
    output.assert(predicate::path::missing());
}

#[tokio::test]
async fn test_run_command_exit_codes() {
    init_tracing();

    let ok_url = spawn_server(
        service(json!({ "version": "1.0.0" }), StatusCode::OK, fake_png(64)),
        RequestLog::default(),
    )
    .await
    .expect("Failed to start mock service");
    let failing_url = spawn_server(
        service(
            json!({ "version": "1.0.0" }),
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error":"boom"}"#.to_vec(),
        ),
        RequestLog::default(),
    )
    .await
    .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();

    let passed = temp.child("passed.png");
    let code = run_command(ResolvedCommand::SmokeTest(build_params(&ok_url, passed.path()))).await;
    assert_eq!(code, ExitCode::SUCCESS);
    passed.assert(predicate::path::is_file());

    let failed = temp.child("failed.png");
    let code =
        run_command(ResolvedCommand::SmokeTest(build_params(&failing_url, failed.path()))).await;
    assert_eq!(code, ExitCode::FAILURE);
    failed.assert(predicate::path::missing());

    let unreachable = unreachable_base_url().await.unwrap();
    let code = run_command(ResolvedCommand::SmokeTest(build_params(
        &unreachable,
        temp.child("unreachable.png").path(),
    )))
    .await;
    assert_eq!(code, ExitCode::FAILURE);
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_service_failures_stay_quiet_at_default_log_level() {
    let buffer = LogBuffer::default();
    let subscriber = {
        let buffer = buffer.clone();
        tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .with_writer(move || buffer.clone())
            .finish()
    };
    let _guard = tracing::subscriber::set_default(subscriber);

    let unhealthy = Router::new().route(
        "/api/health",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let unhealthy_url = spawn_server(unhealthy, RequestLog::default())
        .await
        .expect("Failed to start mock service");
    let rejecting_url = spawn_server(
        service(
            json!({ "version": "1.0.0" }),
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error":"boom"}"#.to_vec(),
        ),
        RequestLog::default(),
    )
    .await
    .expect("Failed to start mock service");
    let temp = TempDir::new().unwrap();

    let result = run_smoke_test(build_params(&unhealthy_url, &temp.path().join("a.png"))).await;
    assert!(matches!(
        result,
        Err(MarkmapToolsError::UnexpectedStatus { status: 503, .. })
    ));
    let result = run_smoke_test(build_params(&rejecting_url, &temp.path().join("b.png"))).await;
    assert!(matches!(
        result,
        Err(MarkmapToolsError::RenderRejected { status: 500, .. })
    ));

    let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(
        logged.is_empty(),
        "Nothing should reach stderr at the default level, got:\n{logged}"
    );
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("markmap_tools_lib=debug,markmap_tools_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
