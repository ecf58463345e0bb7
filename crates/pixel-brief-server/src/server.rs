//! Brief builder server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use pixel_brief_model::{platforms, BriefError, BriefForm};
use pixel_brief_render::{export_docx, Flash, PageContext, TemplateEngine, ThemeAssets, DOCX_MIME};
use pixel_brief_store::{NewOrder, OrderStore, StoreError};

use crate::error::ApiError;
use crate::feed::{FeedMessage, HistoryFeed};

const SAVED_MESSAGE: &str = "💾 Saved to Memory Card!";
const MISSING_NAME_MESSAGE: &str = "⚠️ ENTER NAME!";

/// Configuration for the brief server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Browser tab title
    pub title: String,

    /// Heading shown at the top of the page
    pub heading: String,

    /// Optional line under the heading
    pub tagline: Option<String>,

    /// Record store file
    pub db_path: PathBuf,

    /// Optional page background image
    pub background: Option<PathBuf>,

    /// Minify the theme stylesheet
    pub minify_css: bool,

    /// Open browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            host: "127.0.0.1".to_string(),
            title: "Pixel Resort Briefs".to_string(),
            heading: "Order Brief WSKL".to_string(),
            tagline: None,
            db_path: PathBuf::from("briefs.db"),
            background: Some(PathBuf::from("bg.jpg")),
            minify_css: true,
            open: true,
        }
    }
}

impl ServerConfig {
    /// Background image path, if configured and present on disk.
    pub fn existing_background(&self) -> Option<&PathBuf> {
        self.background.as_ref().filter(|path| path.is_file())
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Failed to open record store: {0}")]
    StoreError(#[from] pixel_brief_store::StoreError),

    #[error("Failed to prepare assets: {0}")]
    AssetError(#[from] pixel_brief_render::RenderError),
}

/// Shared request state.
pub struct AppState {
    config: ServerConfig,
    store: OrderStore,
    templates: TemplateEngine,
    feed: HistoryFeed,
    stylesheet: String,
}

impl AppState {
    /// Build the shared state around an opened store.
    pub fn new(config: ServerConfig, store: OrderStore) -> Result<Self, ServerError> {
        let stylesheet = ThemeAssets::build_stylesheet(
            config.existing_background().is_some(),
            config.minify_css,
        )?;

        Ok(Self {
            config,
            store,
            templates: TemplateEngine::new(),
            feed: HistoryFeed::new(),
            stylesheet,
        })
    }

    /// Feed of saved orders.
    pub fn feed(&self) -> &HistoryFeed {
        &self.feed
    }

    /// The record store.
    pub fn store(&self) -> &OrderStore {
        &self.store
    }
}

/// Run a store call on the blocking pool.
async fn with_store<T, F>(state: &Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&OrderStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    Ok(tokio::task::spawn_blocking(move || f(&state.store)).await??)
}

/// Page state for `form`, with the saved history attached.
async fn page(state: &Arc<AppState>, form: BriefForm) -> Result<PageContext, ApiError> {
    let history = with_store(state, |store| store.history()).await?;
    Ok(PageContext::new(&state.config.title, form)
        .with_heading(&state.config.heading, state.config.tagline.clone())
        .with_history(history))
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/preview", post(preview_handler))
        .route("/save", post(save_handler))
        .route("/export", post(export_handler))
        .route("/history", get(history_handler))
        .route("/api/history", get(api_history_handler))
        .route("/api/platforms", get(api_platforms_handler))
        .route("/assets/theme.css", get(stylesheet_handler))
        .route("/assets/app.js", get(script_handler))
        .route("/__feed", get(ws_handler));

    if let Some(background) = state.config.existing_background() {
        app = app.route_service("/assets/background", ServeFile::new(background));
    }

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Brief builder server.
pub struct BriefServer {
    config: ServerConfig,
}

impl BriefServer {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Open the store and serve until interrupted.
    pub async fn start(self) -> Result<(), ServerError> {
        let raw_addr = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(raw_addr.clone()))?;

        let store = pixel_brief_store::open_store(&self.config.db_path)?;
        let open_browser = self.config.open;
        let state = Arc::new(AppState::new(self.config, store)?);
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Serving brief builder at http://{}", addr);

        if open_browser {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Builder page, prefilled from the query string when one is given.
async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(form): Query<BriefForm>,
) -> Result<Html<String>, ApiError> {
    let form = if form == BriefForm::default() {
        BriefForm::initial()
    } else {
        form
    };

    let page = page(&state, form).await?;
    Ok(Html(state.templates.render_page(&page)?))
}

/// Live preview fragment for the submitted form.
///
/// An invalid form gets an escaped error fragment with status 400.
async fn preview_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BriefForm>,
) -> Result<Response, ApiError> {
    match form.into_brief() {
        Ok(brief) => Ok(Html(state.templates.render_preview(&brief)?).into_response()),
        Err(err) => {
            tracing::debug!("Preview rejected: {}", err);
            let status = ApiError::from(err.clone()).status();
            let html = state.templates.render_preview_error(&err.to_string())?;
            Ok((status, Html(html)).into_response())
        }
    }
}

/// Append a summarized row and re-render the page with a status message.
async fn save_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<BriefForm>,
) -> Result<Response, ApiError> {
    let brief = match form.clone().into_brief() {
        Ok(brief) => brief,
        Err(err) => {
            let page = page(&state, form).await?;
            let html = state.templates.render_page(&page)?;
            return Ok((ApiError::from(err).status(), Html(html)).into_response());
        }
    };

    if brief.require_order_name().is_err() {
        tracing::warn!("Save rejected: order name missing");
        let page = page(&state, form)
            .await?
            .with_flash(Flash::warn(MISSING_NAME_MESSAGE));
        let html = state.templates.render_page(&page)?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
    }

    let order = NewOrder::from_brief(&brief);
    let id = with_store(&state, move |store| store.save(&order)).await?;
    state.feed.send(FeedMessage::OrderSaved {
        id,
        order_name: brief.order_name.clone(),
    });

    let page = page(&state, form).await?.with_flash(Flash::ok(SAVED_MESSAGE));
    Ok(Html(state.templates.render_page(&page)?).into_response())
}

/// Download the brief as a Word document.
async fn export_handler(Form(form): Form<BriefForm>) -> Result<Response, ApiError> {
    let brief = form.into_brief()?;
    if brief.require_order_name().is_err() {
        return Err(BriefError::MissingOrderName.into());
    }

    let bytes = export_docx(&brief)?;
    let disposition = content_disposition(&brief.export_file_name());
    tracing::info!(file = %brief.export_file_name(), "Exported brief");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// History table fragment.
async fn history_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let rows = with_store(&state, |store| store.history()).await?;
    Ok(Html(state.templates.render_history(&rows)?))
}

#[derive(Debug, Default, Deserialize)]
struct HistoryQuery {
    limit: Option<u32>,
    #[serde(default)]
    offset: u32,
}

async fn api_history_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = with_store(&state, move |store| store.history_page(query.limit, query.offset)).await?;
    Ok(Json(rows))
}

async fn api_platforms_handler() -> impl IntoResponse {
    Json(platforms())
}

async fn stylesheet_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.clone(),
    )
}

async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ThemeAssets::script(),
    )
}

/// Handler for the saved-order feed WebSocket.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward feed messages to one connected page.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let (sink, incoming) = socket.split();
    forward_feed(sink, incoming, state.feed.subscribe()).await;
}

/// Push feed messages to `sink` until the page closes its socket.
///
/// Incoming frames are drained so a closed page releases its receiver right
/// away. A lagging receiver skips the missed messages and keeps going.
async fn forward_feed<Tx, Rx, E>(
    mut sink: Tx,
    mut incoming: Rx,
    mut feed: broadcast::Receiver<FeedMessage>,
) where
    Tx: Sink<Message> + Unpin,
    Rx: Stream<Item = Result<Message, E>> + Unpin,
{
    if send_json(&mut sink, &FeedMessage::Connected).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            msg = feed.recv() => match msg {
                Ok(msg) => {
                    if send_json(&mut sink, &msg).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Feed receiver lagged");
                }
                Err(RecvError::Closed) => break,
            },
            frame = incoming.next() => match frame {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Feed connection closed");
}

async fn send_json<Tx>(sink: &mut Tx, msg: &FeedMessage) -> Result<(), ()>
where
    Tx: Sink<Message> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|e| {
        tracing::warn!("Failed to encode feed message: {}", e);
    })?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

/// `attachment` disposition with an ASCII fallback and a UTF-8 file name.
fn content_disposition(file_name: &str) -> HeaderValue {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let value = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        percent_encode(file_name)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn percent_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            _ => format!("%{:02X}", b),
        })
        .collect()
}
