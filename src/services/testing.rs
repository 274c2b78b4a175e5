//! In-memory stand-ins for the chart renderer and the live data source,
//! plus a one-shot HTTP responder and a log event counter

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::api::live_data::{ApiError, LiveDataSource};
use crate::models::{ChartState, ChartStyle, LiveSeries};
use crate::services::chart_service::{ChartRenderer, RenderError};

/// Counts redraws and keeps the last painted frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub redraws: usize,
    pub last_state: Option<ChartState>,
    pub last_caption: Option<String>,
    pub fail: bool,
}

impl ChartRenderer for RecordingRenderer {
    fn redraw(
        &mut self,
        state: &ChartState,
        _style: &ChartStyle,
        caption: &str,
    ) -> Result<(), RenderError> {
        self.redraws += 1;
        self.last_state = Some(state.clone());
        self.last_caption = Some(caption.to_string());

        if self.fail {
            return Err(RenderError::Draw("canvas unavailable".to_string()));
        }
        Ok(())
    }
}

/// Hands out queued results in order, one per fetch
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<LiveSeries, ApiError>>>,
}

impl ScriptedSource {
    pub fn new(responses: Vec<Result<LiveSeries, ApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl LiveDataSource for ScriptedSource {
    async fn fetch(&self) -> Result<LiveSeries, ApiError> {
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(ApiError::Decode("no scripted response left".to_string())))
    }
}

/// A fetch that never completes
pub struct PendingSource;

#[async_trait]
impl LiveDataSource for PendingSource {
    async fn fetch(&self) -> Result<LiveSeries, ApiError> {
        std::future::pending().await
    }
}

/// Answer a single HTTP request with a canned response.
/// Resolves the receiver with the request line that was received.
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&request);
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (format!("http://{}", addr), rx)
}

/// Records the level of every WARN or ERROR event emitted from this crate
#[derive(Clone, Default)]
pub struct WarningCounter {
    levels: Arc<Mutex<Vec<Level>>>,
}

impl WarningCounter {
    pub fn levels(&self) -> Vec<Level> {
        self.levels.lock().unwrap().clone()
    }
}

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) && *metadata.level() <= Level::WARN {
            self.levels.lock().unwrap().push(*metadata.level());
        }
    }
}
