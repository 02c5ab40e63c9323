//! Session state machine.
//!
//! [`ViewStateController`] owns the [`ViewState`] and is the only place it
//! changes. It routes messages to the capture and intake adapters, hands images
//! to the classifier and polls in-flight service work from [`tick`].
//!
//! | From          | Message                        | To            |
//! |---------------|--------------------------------|---------------|
//! | Home          | ChooseCamera                   | Capturing     |
//! | Home          | ChooseUpload                   | Uploading     |
//! | Capturing     | Capture                        | ResultPending |
//! | Capturing     | SwitchCamera                   | Capturing     |
//! | Capturing     | ChooseUpload                   | Uploading     |
//! | Uploading     | FileSelected / FilesDropped    | ResultPending |
//! | Uploading     | ChooseCamera                   | Capturing     |
//! | ResultPending | ClassificationResolved(Ok)     | ResultReady   |
//! | ResultPending | ClassificationResolved(Err)    | Home          |
//! | ResultReady   | NewAnalysis                    | Home          |
//!
//! Every other pair is ignored. Chat messages and notice dismissal apply in
//! any state.
//!
//! [`tick`]: ViewStateController::tick

mod message;
#[cfg(test)]
mod tests;

pub use message::{Message, Notice, NoticeLevel, Transition, ViewState};

use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::FutureExt;

use crate::capture::{CaptureConstraints, CaptureDevice, FacingMode, MediaCaptureAdapter};
use crate::chat::ChatSession;
use crate::config::AppConfig;
use crate::intake::{ImageIntakeAdapter, IntakeError};
use crate::model::{CategoryKey, EncodedImage, FrameEncoder, Transcript};
use crate::services::{
    ChatAssistant, ClassificationError, Classifier, Clock, RandomClassifier, ScriptedAssistant,
    ServiceFuture,
};
use crate::views::{self, RenderModel, ViewContext};

/// User-facing notice texts.
pub mod notice_text {
    /// Camera could not be started
    pub const CAMERA_ACCESS_FAILED: &str =
        "No se pudo acceder a la cámara. Asegúrate de haber dado los permisos necesarios.";
    /// Capture or switch requested without a live stream
    pub const NO_ACTIVE_CAMERA: &str =
        "La cámara no está activa. Vuelve a abrirla para hacer una foto.";
    /// The live stream did not deliver a frame
    pub const CAPTURE_FAILED: &str = "No se pudo capturar la imagen. Inténtalo de nuevo.";
    /// Selected file is not an image
    pub const INVALID_IMAGE: &str = "Por favor, selecciona una imagen válida.";
    /// Selected image could not be decoded
    pub const UNREADABLE_IMAGE: &str = "No se pudo leer la imagen. Prueba con otro archivo.";
    /// Classifier failed
    pub const ANALYSIS_FAILED: &str = "No se pudo analizar la imagen. Inténtalo de nuevo.";
}

/// Owns the session state and its collaborators.
pub struct ViewStateController {
    state: ViewState,
    capture: MediaCaptureAdapter,
    intake: ImageIntakeAdapter,
    classifier: Box<dyn Classifier>,
    classification: Option<ServiceFuture<Result<CategoryKey, ClassificationError>>>,
    chat: ChatSession,
    notice: Option<Notice>,
    drag_over: bool,
    upload_preview: Option<EncodedImage>,
}

impl ViewStateController {
    /// Create a session in the Home state.
    pub fn new(
        capture: MediaCaptureAdapter,
        intake: ImageIntakeAdapter,
        classifier: Box<dyn Classifier>,
        assistant: Box<dyn ChatAssistant>,
    ) -> Self {
        Self {
            state: ViewState::Home,
            capture,
            intake,
            classifier,
            classification: None,
            chat: ChatSession::new(assistant),
            notice: None,
            drag_over: false,
            upload_preview: None,
        }
    }

    /// Create a session with the scripted services configured from `config`.
    pub fn from_config(
        config: &AppConfig,
        device: Box<dyn CaptureDevice>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let encoder = FrameEncoder::new(config.capture.jpeg_quality);
        let (ideal_width, ideal_height) = config.capture.resolution();
        let capture = MediaCaptureAdapter::new(device, config.preferences.default_facing)
            .with_constraints(CaptureConstraints {
                ideal_width,
                ideal_height,
            })
            .with_encoder(encoder);

        let seed = config.preferences.random_seed;
        let classifier = RandomClassifier::new(Rc::clone(&clock), seed)
            .with_delay(Duration::from_millis(config.timing.classification_delay_ms));
        // Offset the seed so chat replies do not mirror classification picks.
        let assistant = ScriptedAssistant::new(clock, seed.map(|s| s.wrapping_add(1)))
            .with_delay(Duration::from_millis(config.timing.chat_reply_delay_ms));

        Self::new(
            capture,
            ImageIntakeAdapter::new(encoder),
            Box::new(classifier),
            Box::new(assistant),
        )
    }

    /// Current state.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Notice currently shown, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Chat transcript.
    pub fn transcript(&self) -> &Transcript {
        self.chat.transcript()
    }

    /// Camera adapter, for inspecting stream state.
    pub fn capture(&self) -> &MediaCaptureAdapter {
        &self.capture
    }

    /// Selected camera.
    pub fn facing(&self) -> FacingMode {
        self.capture.facing()
    }

    /// Whether a drag is hovering over the upload area.
    pub fn drag_over(&self) -> bool {
        self.drag_over
    }

    /// Last uploaded image.
    pub fn upload_preview(&self) -> Option<&EncodedImage> {
        self.upload_preview.as_ref()
    }

    /// Whether any service call is still in flight.
    pub fn is_busy(&self) -> bool {
        self.classification.is_some() || self.chat.pending_replies() > 0
    }

    /// Apply a user message.
    ///
    /// While a notice is shown only [`Message::DismissNotice`] is accepted.
    /// [`Message::ClassificationResolved`] only arrives through [`tick`](Self::tick).
    pub fn update(&mut self, message: Message) -> Transition {
        if let Message::ClassificationResolved(_) = message {
            log::warn!("Rejecting classification result not produced by the classifier");
            return Transition::Ignored;
        }
        if self.notice.is_some() && !matches!(message, Message::DismissNotice) {
            log::debug!("Notice open, ignoring {}", message.name());
            return Transition::Ignored;
        }
        self.handle(message)
    }

    /// Poll in-flight classification and chat replies. Returns whether
    /// anything visible changed.
    pub fn tick(&mut self) -> bool {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        let mut changed = false;

        if let Some(pending) = self.classification.as_mut() {
            if let Poll::Ready(result) = pending.poll_unpin(&mut cx) {
                self.classification = None;
                let outcome = self.handle(Message::ClassificationResolved(result));
                changed |= outcome != Transition::Ignored;
            }
        }

        changed |= self.chat.poll_replies(&mut cx) > 0;
        changed
    }

    /// Render model for the current state.
    pub fn view(&self) -> RenderModel {
        let ctx = ViewContext {
            facing: self.capture.facing(),
            streaming: self.capture.is_streaming(),
            drag_over: self.drag_over,
            upload_preview: self.upload_preview.as_ref().map(EncodedImage::dimensions),
            notice: self.notice.as_ref(),
            transcript: self.chat.transcript(),
        };
        views::render(self.state, &ctx)
    }

    fn handle(&mut self, message: Message) -> Transition {
        match (self.state, message) {
            (_, Message::DismissNotice) => match self.notice.take() {
                Some(_) => Transition::Unchanged,
                None => Transition::Ignored,
            },
            (_, Message::AskAboutCategory(key)) => {
                self.chat.ask(key);
                Transition::Unchanged
            }
            (_, Message::SendChat(text)) => {
                if self.chat.send(&text) {
                    Transition::Unchanged
                } else {
                    Transition::Ignored
                }
            }

            (ViewState::Home | ViewState::Uploading, Message::ChooseCamera) => self.open_camera(),
            (ViewState::Home, Message::ChooseUpload) => self.move_to(ViewState::Uploading),
            (ViewState::Capturing, Message::ChooseUpload) => {
                self.capture.stop();
                self.move_to(ViewState::Uploading)
            }
            (ViewState::Capturing, Message::Capture) => self.capture_photo(),
            (ViewState::Capturing, Message::SwitchCamera) => self.switch_camera(),

            (ViewState::Uploading, Message::FileSelected(file)) => {
                let result = self.intake.from_file(&file);
                self.accept_upload(result)
            }
            (ViewState::Uploading, Message::FilesDropped(payload)) => {
                self.drag_over = false;
                let result = self.intake.from_drop(&payload);
                self.accept_upload(result)
            }
            (ViewState::Uploading, Message::DragEnter) => {
                self.drag_over = true;
                Transition::Unchanged
            }
            (ViewState::Uploading, Message::DragLeave) => {
                self.drag_over = false;
                Transition::Unchanged
            }

            (ViewState::ResultPending, Message::ClassificationResolved(result)) => {
                self.classification = None;
                match result {
                    Ok(key) => {
                        log::info!("♻️ Classified as {}", key);
                        self.move_to(ViewState::ResultReady(key))
                    }
                    Err(e) => {
                        log::warn!("Classification failed: {}", e);
                        self.notice = Some(Notice::error(notice_text::ANALYSIS_FAILED));
                        self.move_to(ViewState::Home)
                    }
                }
            }
            (ViewState::ResultReady(_), Message::NewAnalysis) => {
                self.upload_preview = None;
                self.move_to(ViewState::Home)
            }

            (state, message) => {
                log::debug!("Ignoring {} in {}", message.name(), state.name());
                Transition::Ignored
            }
        }
    }

    fn move_to(&mut self, to: ViewState) -> Transition {
        let from = self.state;
        if from == ViewState::Uploading {
            self.drag_over = false;
        }
        self.state = to;
        log::debug!("🔄 {} -> {}", from.name(), to.name());
        Transition::Moved { from, to }
    }

    fn open_camera(&mut self) -> Transition {
        match self.capture.start(self.capture.facing()) {
            Ok(_) => self.move_to(ViewState::Capturing),
            Err(e) => {
                log::warn!("Could not open camera: {}", e);
                self.notice = Some(Notice::error(notice_text::CAMERA_ACCESS_FAILED));
                Transition::Unchanged
            }
        }
    }

    fn capture_photo(&mut self) -> Transition {
        if !self.capture.is_streaming() {
            self.notice = Some(Notice::warning(notice_text::NO_ACTIVE_CAMERA));
            return Transition::Unchanged;
        }

        match self.capture.capture_frame() {
            Ok(image) => {
                self.capture.stop();
                self.begin_classification(image)
            }
            Err(e) => {
                log::warn!("Capture failed: {}", e);
                self.notice = Some(Notice::error(notice_text::CAPTURE_FAILED));
                Transition::Unchanged
            }
        }
    }

    fn switch_camera(&mut self) -> Transition {
        if !self.capture.is_streaming() {
            self.notice = Some(Notice::warning(notice_text::NO_ACTIVE_CAMERA));
            return Transition::Unchanged;
        }

        if let Err(e) = self.capture.switch_facing() {
            log::warn!("Could not switch camera: {}", e);
            self.notice = Some(Notice::error(notice_text::CAMERA_ACCESS_FAILED));
        }
        Transition::Unchanged
    }

    fn accept_upload(&mut self, result: Result<EncodedImage, IntakeError>) -> Transition {
        match result {
            Ok(image) => {
                self.upload_preview = Some(image.clone());
                self.begin_classification(image)
            }
            Err(IntakeError::NoFile) => {
                log::debug!("Drop without files");
                Transition::Ignored
            }
            Err(e @ IntakeError::UnsupportedType { .. }) => {
                log::warn!("{}", e);
                self.notice = Some(Notice::error(notice_text::INVALID_IMAGE));
                Transition::Unchanged
            }
            Err(e @ IntakeError::DecodeFailure { .. }) => {
                log::warn!("{}", e);
                self.notice = Some(Notice::error(notice_text::UNREADABLE_IMAGE));
                Transition::Unchanged
            }
        }
    }

    fn begin_classification(&mut self, image: EncodedImage) -> Transition {
        self.classification = Some(self.classifier.classify(image));
        self.move_to(ViewState::ResultPending)
    }
}
