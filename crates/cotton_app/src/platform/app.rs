use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use cotton_core::{update, AppState, Msg, Phase, Submission};
use cotton_engine::{ClientSettings, EngineError};
use cotton_logging::{cotton_debug, cotton_info};

use super::effects::EffectRunner;
use super::ui::commands::{self, HELP};
use super::ui::render::{render, Section, ALL_SECTIONS};

/// Everything the session loop reacts to: core messages from the user or the
/// engine, plus shell-only requests.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Msg(Msg),
    Show,
    Help,
    Quit,
    Invalid(String),
}

pub struct Session<W: Write> {
    state: AppState,
    runner: EffectRunner,
    input_rx: mpsc::Receiver<Input>,
    input_tx: mpsc::Sender<Input>,
    sections: Vec<Section>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        settings: ClientSettings,
        preview_dir: Option<PathBuf>,
        sections: &[Section],
        out: W,
    ) -> Result<Self, EngineError> {
        let (input_tx, input_rx) = mpsc::channel();
        let runner = EffectRunner::new(settings, preview_dir, input_tx.clone())?;
        Ok(Self {
            state: AppState::new(),
            runner,
            input_rx,
            input_tx,
            sections: sections.to_vec(),
            out,
        })
    }

    /// Feeds `msgs` in order, then waits for every outstanding request.
    pub fn run_until_settled(&mut self, msgs: Vec<Msg>) -> io::Result<()> {
        for msg in msgs {
            self.dispatch(msg)?;
        }
        while self.state.is_busy() {
            match self.input_rx.recv() {
                Ok(Input::Msg(msg)) => self.dispatch(msg)?,
                Ok(_) => {}
                Err(_) => break,
            }
        }
        Ok(())
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub fn run_shell(&mut self) -> io::Result<()> {
        self.spawn_stdin_reader();
        writeln!(self.out, "Type help for a list of commands.")?;
        self.render_sections(&ALL_SECTIONS)?;

        while let Ok(input) = self.input_rx.recv() {
            match input {
                Input::Msg(msg) => self.dispatch(msg)?,
                Input::Show => self.render_sections(&ALL_SECTIONS)?,
                Input::Help => {
                    for line in HELP {
                        writeln!(self.out, "  {line}")?;
                    }
                }
                Input::Invalid(message) => writeln!(self.out, "{message}")?,
                Input::Quit => break,
            }
            self.out.flush()?;
        }
        // Release the preview and drop any outstanding request.
        self.dispatch(Msg::ResetClicked)
    }

    /// True when the last request and all inputs were accepted.
    pub fn succeeded(&self) -> bool {
        let form_failed = |submission: &Submission| matches!(submission, Submission::Failed { .. });
        self.state.upload_error().is_none()
            && self.state.phase() != Phase::Failed
            && self.state.crop_form().errors().is_empty()
            && self.state.fertilizer_form().errors().is_empty()
            && !form_failed(self.state.crop_form().submission())
            && !form_failed(self.state.fertilizer_form().submission())
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        cotton_debug!("Dispatch {}", msg_name(&msg));
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let dirty = state.consume_dirty();
        self.state = state;
        if dirty {
            let sections = self.sections.clone();
            self.render_sections(&sections)?;
        }
        Ok(())
    }

    fn render_sections(&mut self, sections: &[Section]) -> io::Result<()> {
        let view = self.state.view();
        let preview = view
            .upload
            .as_ref()
            .and_then(|upload| self.runner.preview_path(upload.preview_id));
        for line in render(&view, preview, sections) {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }

    fn spawn_stdin_reader(&self) {
        let input_tx = self.input_tx.clone();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if let Some(input) = commands::parse_line(&line) {
                    let quit = input == Input::Quit;
                    if input_tx.send(input).is_err() || quit {
                        return;
                    }
                }
            }
            cotton_info!("End of input");
            let _ = input_tx.send(Input::Quit);
        });
    }
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::FilesSelected(_) => "FilesSelected",
        Msg::ResetClicked => "ResetClicked",
        Msg::ResubmitClicked => "ResubmitClicked",
        Msg::PredictionSucceeded { .. } => "PredictionSucceeded",
        Msg::PredictionFailed { .. } => "PredictionFailed",
        Msg::CropFieldChanged { .. } => "CropFieldChanged",
        Msg::CropSubmitted => "CropSubmitted",
        Msg::FertilizerFieldChanged { .. } => "FertilizerFieldChanged",
        Msg::FertilizerSubmitted => "FertilizerSubmitted",
        Msg::RecommendationReceived { .. } => "RecommendationReceived",
        Msg::RecommendationFailed { .. } => "RecommendationFailed",
    }
}
