use std::collections::HashMap;
use std::future::Future;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use cotton_logging::{cotton_debug, cotton_error, cotton_info};
use tokio_util::sync::CancellationToken;

use crate::service::{AgronomyService, ClientSettings, ReqwestService};
use crate::{ApiError, CropQuery, EngineEvent, FailureKind, FertilizerQuery, ImageUpload, RequestId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] ApiError),
}

enum EngineCommand {
    Predict {
        request_id: RequestId,
        upload: ImageUpload,
    },
    RecommendCrop {
        request_id: RequestId,
        query: CropQuery,
    },
    RecommendFertilizer {
        request_id: RequestId,
        query: FertilizerQuery,
    },
    Cancel {
        request_id: RequestId,
    },
}

type TokenMap = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Runs remote requests on a background tokio runtime.
///
/// Every request produces exactly one [`EngineEvent`]. Cancelled requests
/// complete with [`FailureKind::Cancelled`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let service = ReqwestService::new(settings)?;
        cotton_info!("Engine targeting {}", service.base_url());
        Self::with_service(Arc::new(service))
    }

    pub fn with_service(service: Arc<dyn AgronomyService>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let tokens: TokenMap = Arc::new(Mutex::new(HashMap::new()));
            while let Ok(command) = cmd_rx.recv() {
                dispatch(&runtime, &service, &tokens, command, &event_tx);
            }
            cotton_debug!("Engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn predict(&self, request_id: RequestId, upload: ImageUpload) {
        self.send(EngineCommand::Predict { request_id, upload });
    }

    pub fn recommend_crop(&self, request_id: RequestId, query: CropQuery) {
        self.send(EngineCommand::RecommendCrop { request_id, query });
    }

    pub fn recommend_fertilizer(&self, request_id: RequestId, query: FertilizerQuery) {
        self.send(EngineCommand::RecommendFertilizer { request_id, query });
    }

    pub fn cancel(&self, request_id: RequestId) {
        self.send(EngineCommand::Cancel { request_id });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, mpsc::RecvTimeoutError> {
        match self.event_rx.lock() {
            Ok(rx) => rx.recv_timeout(timeout),
            Err(_) => Err(mpsc::RecvTimeoutError::Disconnected),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            cotton_error!("Engine thread is gone; command dropped");
        }
    }
}

fn dispatch(
    runtime: &tokio::runtime::Runtime,
    service: &Arc<dyn AgronomyService>,
    tokens: &TokenMap,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    let service = service.clone();
    let event_tx = event_tx.clone();
    match command {
        EngineCommand::Cancel { request_id } => {
            let token = tokens.lock().ok().and_then(|mut map| map.remove(&request_id));
            match token {
                Some(token) => {
                    cotton_debug!("Cancelling request {}", request_id);
                    token.cancel();
                }
                None => cotton_debug!("Cancel for settled request {}", request_id),
            }
        }
        EngineCommand::Predict { request_id, upload } => {
            let token = register(tokens, request_id);
            let tokens = tokens.clone();
            runtime.spawn(async move {
                let result =
                    run_cancellable(&token, async { service.predict(&upload).await }).await;
                forget(&tokens, request_id);
                let _ = event_tx.send(EngineEvent::PredictionCompleted { request_id, result });
            });
        }
        EngineCommand::RecommendCrop { request_id, query } => {
            let token = register(tokens, request_id);
            let tokens = tokens.clone();
            runtime.spawn(async move {
                let result =
                    run_cancellable(&token, async { service.recommend_crop(&query).await }).await;
                forget(&tokens, request_id);
                let _ = event_tx.send(EngineEvent::CropCompleted { request_id, result });
            });
        }
        EngineCommand::RecommendFertilizer { request_id, query } => {
            let token = register(tokens, request_id);
            let tokens = tokens.clone();
            runtime.spawn(async move {
                let result = run_cancellable(&token, async {
                    service.recommend_fertilizer(&query).await
                })
                .await;
                forget(&tokens, request_id);
                let _ = event_tx.send(EngineEvent::FertilizerCompleted { request_id, result });
            });
        }
    }
}

fn register(tokens: &TokenMap, request_id: RequestId) -> CancellationToken {
    let token = CancellationToken::new();
    if let Ok(mut map) = tokens.lock() {
        map.insert(request_id, token.clone());
    }
    token
}

fn forget(tokens: &TokenMap, request_id: RequestId) {
    if let Ok(mut map) = tokens.lock() {
        map.remove(&request_id);
    }
}

async fn run_cancellable<T>(
    token: &CancellationToken,
    request: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::select! {
        _ = token.cancelled() => Err(ApiError::new(FailureKind::Cancelled, "request superseded")),
        result = request => result,
    }
}
