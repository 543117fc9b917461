use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use cotton_core::{CropInput, Effect, FertilizerInput, Msg, PreviewId, UploadCandidate};
use cotton_engine::{
    ClientSettings, CropQuery, EngineError, EngineEvent, EngineHandle, FertilizerQuery,
    ImageUpload, PreviewStore,
};
use cotton_logging::{cotton_debug, cotton_info, cotton_warn};

use super::app::Input;

/// Executes core effects against the engine and the preview store, and feeds
/// engine completions back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    previews: PreviewStore,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        preview_dir: Option<PathBuf>,
        input_tx: mpsc::Sender<Input>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings)?;
        let previews = match preview_dir {
            Some(dir) => PreviewStore::in_dir(dir),
            None => PreviewStore::new(),
        };
        let runner = Self { engine, previews };
        runner.spawn_event_loop(input_tx);
        Ok(runner)
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CreatePreview {
                    preview_id,
                    file_name,
                    bytes,
                } => match self.previews.create(preview_id, &file_name, &bytes) {
                    Ok(path) => cotton_debug!("Preview {} at {:?}", preview_id, path),
                    Err(err) => cotton_warn!("Preview {} unavailable: {}", preview_id, err),
                },
                Effect::ReleasePreview { preview_id } => {
                    self.previews.release(preview_id);
                }
                Effect::SubmitClassification { request_id, upload } => {
                    cotton_info!(
                        "Predict request_id={} file={} bytes={}",
                        request_id,
                        upload.file_name,
                        upload.size()
                    );
                    self.engine.predict(request_id, to_upload(&upload));
                }
                Effect::CancelRequest { request_id } => {
                    self.engine.cancel(request_id);
                }
                Effect::RecommendCrop { request_id, input } => {
                    cotton_info!("Crop recommendation request_id={}", request_id);
                    self.engine.recommend_crop(request_id, crop_query(input));
                }
                Effect::RecommendFertilizer { request_id, input } => {
                    cotton_info!("Fertilizer recommendation request_id={}", request_id);
                    self.engine
                        .recommend_fertilizer(request_id, fertilizer_query(input));
                }
            }
        }
    }

    pub fn preview_path(&self, preview_id: PreviewId) -> Option<&Path> {
        self.previews.path(preview_id)
    }

    fn spawn_event_loop(&self, input_tx: mpsc::Sender<Input>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            match engine.recv_timeout(Duration::from_millis(100)) {
                Ok(event) => {
                    if input_tx.send(Input::Msg(map_event(event))).is_err() {
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PredictionCompleted { request_id, result } => match result {
            Ok(prediction) => Msg::PredictionSucceeded {
                request_id,
                label: prediction.predicted_class,
                confidence: prediction.confidence,
            },
            Err(err) => Msg::PredictionFailed {
                request_id,
                reason: err.to_string(),
            },
        },
        EngineEvent::CropCompleted { request_id, result }
        | EngineEvent::FertilizerCompleted { request_id, result } => match result {
            Ok(recommendation) => Msg::RecommendationReceived {
                request_id,
                recommendation,
            },
            Err(err) => Msg::RecommendationFailed {
                request_id,
                reason: err.to_string(),
            },
        },
    }
}

fn crop_query(input: CropInput) -> CropQuery {
    CropQuery {
        temperature: input.temperature,
        nitrogen: input.nitrogen,
        humidity: input.humidity,
        ph: input.ph,
        potassium: input.potassium,
        phosphorus: input.phosphorus,
        rainfall: input.rainfall,
    }
}

fn fertilizer_query(input: FertilizerInput) -> FertilizerQuery {
    FertilizerQuery {
        temperature: input.temperature,
        humidity: input.humidity,
        moisture: input.moisture,
        soil_type: input.soil_type,
        crop_type: input.crop_type,
        nitrogen: input.nitrogen,
        potassium: input.potassium,
        phosphorous: input.phosphorous,
    }
}

fn to_upload(upload: &UploadCandidate) -> ImageUpload {
    ImageUpload::shared(
        upload.file_name.clone(),
        upload.mime_type.clone(),
        upload.bytes.clone(),
    )
}
