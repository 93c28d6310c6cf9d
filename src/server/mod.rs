//! Development server with live reload
//!
//! Regenerates the site into memory, serves it over HTTP and tells connected
//! browsers to reload after each rebuild. It reaches the core only through
//! [`Generator::generate`].

mod watch;

pub use watch::{ChangeWatcher, DEBOUNCE};

use anyhow::{Context as _, Result};
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::generator::{GeneratedFile, Generator};
use crate::JsonBlog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

const NOT_FOUND_PAGE: &str = "<!DOCTYPE html>
<html>
<head><title>404 Not Found</title></head>
<body>
<h1>404 Not Found</h1>
<p>The requested page could not be found.</p>
</body>
</html>
";

/// Server state: the latest generated site, keyed by output name
struct ServerState {
    files: RwLock<HashMap<String, String>>,
    reload_tx: broadcast::Sender<()>,
}

impl ServerState {
    fn new() -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Self {
            files: RwLock::new(HashMap::new()),
            reload_tx,
        }
    }

    /// Swap in a freshly generated site
    async fn replace(&self, generated: Vec<GeneratedFile>) -> usize {
        let files: HashMap<String, String> = generated
            .into_iter()
            .map(|f| (f.name, f.content))
            .collect();
        let count = files.len();
        *self.files.write().await = files;
        count
    }
}

/// Reload the config and regenerate into memory
async fn rebuild(app: &JsonBlog, generator: &Generator, state: &ServerState) -> Result<usize> {
    let blog = app.load_blog()?;
    let files = generator.generate(&blog).await?;
    Ok(state.replace(files).await)
}

/// Start the development server
pub async fn start(app: &JsonBlog, ip: &str, port: u16, open: bool) -> Result<()> {
    let generator = Arc::new(Generator::new(&app.base_dir)?);
    let state = Arc::new(ServerState::new());

    let count = rebuild(app, &generator, &state)
        .await
        .context("Initial generation failed")?;
    tracing::info!("Generated {} files", count);

    let router = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Live reload enabled. Watching for changes...");
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let mut watcher = ChangeWatcher::start(&app.config_path, &app.base_dir, Some(&app.output_dir))?;
    let watch_app = app.clone();
    tokio::spawn(async move {
        while let Some(paths) = watcher.changed().await {
            println!();
            for path in &paths {
                println!("📝 File changed: {}", path.display());
            }

            println!("\n🔄 Regenerating...");
            match rebuild(&watch_app, &generator, &state).await {
                Ok(count) => {
                    println!("✅ Regenerated {} files", count);
                    // Notify all connected clients to reload
                    let _ = state.reload_tx.send(());
                }
                Err(e) => {
                    println!("❌ Generation failed: {:#}", e);
                }
            }
        }
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Serve a generated file, injecting the live reload script into HTML
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let files = state.files.read().await;

    let name = resolve_path(request.uri().path());
    let found = files.get_key_value(name.as_str()).or_else(|| {
        // "/about" -> about.html
        files.get_key_value(format!("{}.html", name).as_str())
    });

    match found {
        Some((name, content)) => {
            let mime = content_type(name);
            let body = if mime.starts_with("text/html") {
                inject_live_reload(content)
            } else {
                content.clone()
            };
            ([(header::CONTENT_TYPE, mime)], body).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            NOT_FOUND_PAGE,
        )
            .into_response(),
    }
}

/// Map a request path to a generated file name
fn resolve_path(path: &str) -> String {
    let clean = path.trim_start_matches('/');
    if clean.is_empty() {
        "index.html".to_string()
    } else if clean.ends_with('/') {
        format!("{}index.html", clean)
    } else {
        clean.to_string()
    }
}

fn content_type(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        _ => "text/plain; charset=utf-8",
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        // If no </body> tag, append to end
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
