use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pixel_brief_server::{router, AppState, FeedMessage, ServerConfig};
use pixel_brief_store::open_store_in_memory;
use tower::ServiceExt;

const FORM: &str = "order_name=QC+Tet+2026&deadline_date=2026-01-20&deadline_time=17%3A00&platform=Facebook&layout=Cover&headline=Big+Sale";

fn state() -> Arc<AppState> {
    let config = ServerConfig {
        background: None,
        minify_css: false,
        open: false,
        ..ServerConfig::default()
    };
    Arc::new(AppState::new(config, open_store_in_memory().unwrap()).unwrap())
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_text(app: Router, req: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn index_renders_default_form() {
    let (status, html) = body_text(router(state()), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("LIVE PREVIEW"));
    assert!(html.contains("DOWNLOAD (ENTER NAME FIRST)"));
    assert!(html.contains(r#"value="17:00""#));
}

#[tokio::test]
async fn index_prefills_from_query() {
    let (status, html) = body_text(router(state()), get(&format!("/?{FORM}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("QC Tet 2026"));
    assert!(html.contains("DOWNLOAD WORD DOC"));
}

#[tokio::test]
async fn preview_renders_fragment() {
    let (status, html) = body_text(router(state()), post_form("/preview", FORM)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.starts_with("<div class=\"preview-card\">"));
    assert!(html.contains("📢 Big Sale"));
    assert!(!html.contains("<html"));
}

#[tokio::test]
async fn preview_rejects_unknown_layout() {
    let (status, _) = body_text(
        router(state()),
        post_form("/preview", "platform=Digital&layout=Cover"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn save_appends_row_and_notifies_feed() {
    let state = state();
    let mut rx = state.feed().subscribe();

    let (status, html) = body_text(router(Arc::clone(&state)), post_form("/save", FORM)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Saved to Memory Card!"));

    let rows = state.store().history().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].order_name.as_deref(), Some("QC Tet 2026"));
    assert_eq!(rows[0].platform.as_deref(), Some("Facebook"));
    assert_eq!(rows[0].deadline.as_deref(), Some("20/01/2026 17:00"));
    assert_eq!(rows[0].content_summary.as_deref(), Some("Big Sale..."));

    assert_eq!(
        rx.recv().await.unwrap(),
        FeedMessage::OrderSaved {
            id: rows[0].id,
            order_name: "QC Tet 2026".to_string(),
        }
    );
}

#[tokio::test]
async fn save_without_name_warns_and_stores_nothing() {
    let state = state();

    let (status, html) = body_text(
        router(Arc::clone(&state)),
        post_form("/save", "platform=Facebook&layout=Cover"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(html.contains("ENTER NAME!"));
    assert_eq!(state.store().count().unwrap(), 0);
}

#[tokio::test]
async fn export_returns_docx_attachment() {
    let response = router(state())
        .oneshot(post_form("/export", FORM))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("filename=\"Brief_QC Tet 2026.docx\""));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn export_without_name_is_rejected() {
    let (status, _) = body_text(
        router(state()),
        post_form("/export", "platform=Facebook&layout=Cover"),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn history_endpoints_list_saved_rows() {
    let state = state();
    let app = router(Arc::clone(&state));

    let (status, _) = body_text(app.clone(), post_form("/save", FORM)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, html) = body_text(app.clone(), get("/history")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<td>QC Tet 2026</td>"));

    let (status, json) = body_text(app, get("/api/history?limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["order_name"], "QC Tet 2026");
}

#[tokio::test]
async fn platforms_endpoint_lists_catalog() {
    let (status, json) = body_text(router(state()), get("/api/platforms")).await;

    assert_eq!(status, StatusCode::OK);
    let catalog: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(catalog[0]["name"], "Facebook");
    assert_eq!(catalog[4]["layouts"][0], "Custom");
}

#[tokio::test]
async fn serves_theme_assets() {
    let (status, css) = body_text(router(state()), get("/assets/theme.css")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(css.contains("linear-gradient"));

    let (status, _) = body_text(router(state()), get("/assets/background")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn serves_configured_background() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("bg.jpg");
    std::fs::write(&image, b"not really a jpeg").unwrap();

    let config = ServerConfig {
        background: Some(image),
        minify_css: false,
        open: false,
        ..ServerConfig::default()
    };
    let state = Arc::new(AppState::new(config, open_store_in_memory().unwrap()).unwrap());

    let (status, body) = body_text(router(Arc::clone(&state)), get("/assets/background")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "not really a jpeg");

    let (_, css) = body_text(router(state), get("/assets/theme.css")).await;
    assert!(css.contains("/assets/background"));
}

#[tokio::test]
async fn preview_error_is_escaped_html() {
    let (status, html) = body_text(
        router(state()),
        post_form(
            "/preview",
            "platform=Facebook&layout=%3Cimg+src%3Dx+onerror%3Dalert%281%29%3E",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(html.starts_with("<p class=\"preview-error\">"));
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img"));
}

#[tokio::test]
async fn index_selects_platform_given_in_lower_case() {
    let (status, html) = body_text(
        router(state()),
        get("/?platform=instagram&layout=Story"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"<option value="Instagram" selected>"#));
    assert!(html.contains("Post (Square)"));
}

#[tokio::test]
async fn index_shows_configured_heading() {
    let config = ServerConfig {
        title: "Tab Title".to_string(),
        heading: "Resort Orders".to_string(),
        tagline: Some("Fill it in, hit save".to_string()),
        background: None,
        minify_css: false,
        open: false,
        ..ServerConfig::default()
    };
    let state = Arc::new(AppState::new(config, open_store_in_memory().unwrap()).unwrap());

    let (status, html) = body_text(router(state), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Tab Title</title>"));
    assert!(html.contains("Resort Orders"));
    assert!(html.contains("Fill it in, hit save"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_saves_all_land() {
    let state = state();
    let app = router(Arc::clone(&state));

    let saves = (0..5).map(|i| {
        let app = app.clone();
        let body = FORM.replace("QC+Tet+2026", &format!("Order+{i}"));
        tokio::spawn(async move { body_text(app, post_form("/save", &body)).await.0 })
    });

    for save in saves.collect::<Vec<_>>() {
        assert_eq!(save.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(state.store().count().unwrap(), 5);
}
