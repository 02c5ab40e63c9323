//! Session scenarios driven through messages and a manual clock.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use image::{ImageFormat, Rgba, RgbaImage};

use super::*;
use crate::capture::{CameraAvailability, CameraStats, SyntheticCamera};
use crate::intake::{DropPayload, SelectedFile};
use crate::model::Sender;
use crate::services::{Delay, ManualClock};
use crate::views::{Region, ResultPanel};

const CLASSIFY_DELAY: Duration = Duration::from_millis(2000);
const CHAT_DELAY: Duration = Duration::from_millis(1000);

/// Answers with a scripted sequence of categories after the usual delay.
struct QueuedClassifier {
    clock: Rc<dyn Clock>,
    answers: RefCell<VecDeque<Result<CategoryKey, ClassificationError>>>,
    calls: Rc<RefCell<Vec<(u32, u32)>>>,
}

impl Classifier for QueuedClassifier {
    fn classify(
        &self,
        image: EncodedImage,
    ) -> ServiceFuture<Result<CategoryKey, ClassificationError>> {
        self.calls.borrow_mut().push(image.dimensions());
        let answer = self
            .answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(CategoryKey::Organic));
        let delay = Delay::new(Rc::clone(&self.clock), CLASSIFY_DELAY);
        async move {
            delay.await;
            answer
        }
        .boxed_local()
    }
}

struct Harness {
    clock: Rc<ManualClock>,
    camera: Rc<CameraStats>,
    classify_calls: Rc<RefCell<Vec<(u32, u32)>>>,
    session: ViewStateController,
}

impl Harness {
    fn new(answers: Vec<Result<CategoryKey, ClassificationError>>) -> Self {
        Self::with_camera(SyntheticCamera::new(), answers)
    }

    fn with_camera(
        camera: SyntheticCamera,
        answers: Vec<Result<CategoryKey, ClassificationError>>,
    ) -> Self {
        let clock = Rc::new(ManualClock::new());
        let shared: Rc<dyn Clock> = clock.clone();
        let stats = camera.stats();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let capture = MediaCaptureAdapter::new(Box::new(camera), FacingMode::Rear)
            .with_constraints(CaptureConstraints {
                ideal_width: 64,
                ideal_height: 36,
            });
        let classifier = QueuedClassifier {
            clock: Rc::clone(&shared),
            answers: RefCell::new(answers.into()),
            calls: Rc::clone(&calls),
        };
        let assistant = ScriptedAssistant::new(shared, Some(11));

        let session = ViewStateController::new(
            capture,
            ImageIntakeAdapter::default(),
            Box::new(classifier),
            Box::new(assistant),
        );

        Self {
            clock,
            camera: stats,
            classify_calls: calls,
            session,
        }
    }

    fn send(&mut self, message: Message) -> Transition {
        self.session.update(message)
    }

    fn wait(&mut self, by: Duration) -> bool {
        self.clock.advance(by);
        self.session.tick()
    }
}

fn png_file(name: &str) -> SelectedFile {
    let img = RgbaImage::from_pixel(30, 20, Rgba([90, 90, 90, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    SelectedFile::new(name, "image/png", out.into_inner())
}

#[test]
fn test_starts_at_home() {
    let h = Harness::new(vec![]);
    assert_eq!(h.session.state(), ViewState::Home);
    assert!(h.session.notice().is_none());
    assert!(!h.session.is_busy());
    assert_eq!(h.session.view().region, Region::Home);
}

#[test]
fn test_camera_then_upload_releases_stream_once() {
    let mut h = Harness::new(vec![]);

    assert_eq!(
        h.send(Message::ChooseCamera),
        Transition::Moved {
            from: ViewState::Home,
            to: ViewState::Capturing
        }
    );
    assert!(h.session.capture().is_streaming());

    h.send(Message::ChooseUpload);
    assert_eq!(h.session.state(), ViewState::Uploading);
    assert!(!h.session.capture().is_streaming());
    assert_eq!(h.camera.opened(), 1);
    assert_eq!(h.camera.released(), 1);
}

#[test]
fn test_capture_classifies_and_shows_plastic() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Plastic)]);

    h.send(Message::ChooseCamera);
    assert_eq!(
        h.send(Message::Capture),
        Transition::Moved {
            from: ViewState::Capturing,
            to: ViewState::ResultPending
        }
    );
    assert_eq!(h.camera.active(), 0, "capture releases the camera");
    assert_eq!(*h.classify_calls.borrow(), vec![(64, 36)]);
    assert!(matches!(
        h.session.view().result,
        Some(ResultPanel::Analyzing { .. })
    ));

    assert!(!h.wait(Duration::from_millis(1999)));
    assert_eq!(h.session.state(), ViewState::ResultPending);

    assert!(h.wait(Duration::from_millis(1)));
    assert_eq!(
        h.session.state(),
        ViewState::ResultReady(CategoryKey::Plastic)
    );

    let Some(ResultPanel::Ready(card)) = h.session.view().result else {
        panic!("expected a result card");
    };
    assert_eq!(card.key, CategoryKey::Plastic);
    assert_eq!(card.name, "Plástico");
    assert_eq!(card.disposal, "Contenedor amarillo");
    assert!(!h.session.is_busy());
}

#[test]
fn test_new_analysis_returns_home() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Glass)]);
    h.send(Message::ChooseUpload);
    h.send(Message::FileSelected(png_file("jar.png")));
    h.wait(CLASSIFY_DELAY);
    assert!(h.session.upload_preview().is_some());

    assert_eq!(
        h.send(Message::NewAnalysis),
        Transition::Moved {
            from: ViewState::ResultReady(CategoryKey::Glass),
            to: ViewState::Home
        }
    );
    assert!(h.session.upload_preview().is_none());
    assert!(h.session.view().result.is_none());
}

#[test]
fn test_session_is_restartable() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Metal), Ok(CategoryKey::Paper)]);

    h.send(Message::ChooseCamera);
    h.send(Message::Capture);
    h.wait(CLASSIFY_DELAY);
    assert_eq!(h.session.state(), ViewState::ResultReady(CategoryKey::Metal));
    h.send(Message::NewAnalysis);

    h.send(Message::ChooseCamera);
    h.send(Message::Capture);
    h.wait(CLASSIFY_DELAY);
    assert_eq!(h.session.state(), ViewState::ResultReady(CategoryKey::Paper));
    assert_eq!(h.camera.opened(), 2);
    assert_eq!(h.camera.active(), 0);
}

#[test]
fn test_switch_camera_alternates_facing() {
    let mut h = Harness::new(vec![]);
    h.send(Message::ChooseCamera);
    assert_eq!(h.session.facing(), FacingMode::Rear);

    let mut seen = Vec::new();
    for _ in 0..4 {
        assert_eq!(h.send(Message::SwitchCamera), Transition::Unchanged);
        seen.push(h.session.facing());
    }

    assert_eq!(
        seen,
        vec![
            FacingMode::Front,
            FacingMode::Rear,
            FacingMode::Front,
            FacingMode::Rear
        ]
    );
    assert_eq!(h.session.state(), ViewState::Capturing);
    assert_eq!(h.camera.active(), 1);
}

#[test]
fn test_capture_without_stream_warns() {
    let camera = SyntheticCamera::with_availability(CameraAvailability::RearOnly);
    let mut h = Harness::with_camera(camera, vec![]);
    h.send(Message::ChooseCamera);

    // The front camera is missing, so the switch leaves no live stream.
    h.send(Message::SwitchCamera);
    assert_eq!(
        h.session.notice().map(|n| n.text.as_str()),
        Some(notice_text::CAMERA_ACCESS_FAILED)
    );
    h.send(Message::DismissNotice);

    assert_eq!(h.send(Message::Capture), Transition::Unchanged);
    assert_eq!(h.session.state(), ViewState::Capturing);
    let notice = h.session.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.text, notice_text::NO_ACTIVE_CAMERA);
    assert!(h.classify_calls.borrow().is_empty());
}

#[test]
fn test_denied_camera_stays_home_with_notice() {
    let camera = SyntheticCamera::with_availability(CameraAvailability::PermissionDenied);
    let mut h = Harness::with_camera(camera, vec![]);

    assert_eq!(h.send(Message::ChooseCamera), Transition::Unchanged);
    assert_eq!(h.session.state(), ViewState::Home);
    assert_eq!(
        h.session.view().notice,
        Some(Notice::error(notice_text::CAMERA_ACCESS_FAILED))
    );
}

#[test]
fn test_notice_blocks_until_dismissed() {
    let camera = SyntheticCamera::with_availability(CameraAvailability::NoDevice);
    let mut h = Harness::with_camera(camera, vec![]);
    h.send(Message::ChooseCamera);

    assert_eq!(h.send(Message::ChooseUpload), Transition::Ignored);
    assert_eq!(h.session.state(), ViewState::Home);

    assert_eq!(h.send(Message::DismissNotice), Transition::Unchanged);
    assert_eq!(h.send(Message::DismissNotice), Transition::Ignored);
    assert!(matches!(
        h.send(Message::ChooseUpload),
        Transition::Moved { .. }
    ));
}

#[test]
fn test_non_image_upload_stays_uploading() {
    let mut h = Harness::new(vec![]);
    h.send(Message::ChooseUpload);

    let file = SelectedFile::new("recibo.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    assert_eq!(h.send(Message::FileSelected(file)), Transition::Unchanged);

    assert_eq!(h.session.state(), ViewState::Uploading);
    assert_eq!(
        h.session.notice().map(|n| n.text.as_str()),
        Some(notice_text::INVALID_IMAGE)
    );
    assert!(h.classify_calls.borrow().is_empty());
}

#[test]
fn test_corrupt_upload_stays_uploading() {
    let mut h = Harness::new(vec![]);
    h.send(Message::ChooseUpload);

    let file = SelectedFile::new("roto.jpg", "image/jpeg", vec![0xFF, 0xD8, 0x00]);
    h.send(Message::FileSelected(file));

    assert_eq!(h.session.state(), ViewState::Uploading);
    assert_eq!(
        h.session.notice().map(|n| n.text.as_str()),
        Some(notice_text::UNREADABLE_IMAGE)
    );
}

#[test]
fn test_drop_flow() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Hazardous)]);
    h.send(Message::ChooseUpload);

    h.send(Message::DragEnter);
    assert!(h.session.view().upload.is_some_and(|u| u.drag_over));
    h.send(Message::DragLeave);
    assert!(!h.session.drag_over());

    h.send(Message::DragEnter);
    assert_eq!(
        h.send(Message::FilesDropped(DropPayload::default())),
        Transition::Ignored
    );
    assert!(!h.session.drag_over());

    h.send(Message::FilesDropped(DropPayload::new(vec![png_file("pila.png")])));
    assert_eq!(h.session.state(), ViewState::ResultPending);
    assert_eq!(*h.classify_calls.borrow(), vec![(30, 20)]);

    h.wait(CLASSIFY_DELAY);
    assert_eq!(
        h.session.state(),
        ViewState::ResultReady(CategoryKey::Hazardous)
    );
}

#[test]
fn test_upload_then_camera() {
    let mut h = Harness::new(vec![]);
    h.send(Message::ChooseUpload);
    assert!(matches!(
        h.send(Message::ChooseCamera),
        Transition::Moved {
            to: ViewState::Capturing,
            ..
        }
    ));
    assert_eq!(h.camera.active(), 1);
}

#[test]
fn test_unlisted_messages_are_ignored() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Organic)]);

    assert_eq!(h.send(Message::Capture), Transition::Ignored);
    assert_eq!(h.send(Message::SwitchCamera), Transition::Ignored);
    assert_eq!(h.send(Message::NewAnalysis), Transition::Ignored);
    assert_eq!(h.send(Message::DragEnter), Transition::Ignored);
    assert_eq!(
        h.send(Message::ClassificationResolved(Ok(CategoryKey::Glass))),
        Transition::Ignored
    );
    assert_eq!(h.session.state(), ViewState::Home);
    assert!(h.session.notice().is_none());

    h.send(Message::ChooseUpload);
    h.send(Message::FileSelected(png_file("a.png")));
    assert_eq!(h.send(Message::ChooseCamera), Transition::Ignored);
    assert_eq!(h.send(Message::ChooseUpload), Transition::Ignored);
    assert_eq!(h.send(Message::NewAnalysis), Transition::Ignored);
    assert_eq!(h.session.state(), ViewState::ResultPending);

    h.wait(CLASSIFY_DELAY);
    assert_eq!(h.send(Message::ChooseCamera), Transition::Ignored);
    assert_eq!(h.send(Message::Capture), Transition::Ignored);
    assert_eq!(h.camera.opened(), 0);
}

#[test]
fn test_classification_failure_returns_home() {
    let mut h = Harness::new(vec![Err(ClassificationError::Timeout)]);
    h.send(Message::ChooseCamera);
    h.send(Message::Capture);

    assert!(h.wait(CLASSIFY_DELAY));
    assert_eq!(h.session.state(), ViewState::Home);
    assert_eq!(
        h.session.notice().map(|n| n.text.as_str()),
        Some(notice_text::ANALYSIS_FAILED)
    );
}

#[test]
fn test_chat_order_with_awaited_sends() {
    let mut h = Harness::new(vec![]);

    h.send(Message::SendChat("A".to_string()));
    h.wait(CHAT_DELAY);
    h.send(Message::SendChat("B".to_string()));
    h.wait(CHAT_DELAY);

    let chat = h.session.view().chat;
    let lines: Vec<_> = chat.iter().map(|m| (m.sender, m.text.as_str())).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], (Sender::User, "A"));
    assert_eq!(lines[1].0, Sender::Assistant);
    assert_eq!(lines[2], (Sender::User, "B"));
    assert_eq!(lines[3].0, Sender::Assistant);
}

#[test]
fn test_ask_from_result_card_uses_key() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Paper)]);
    h.send(Message::ChooseUpload);
    h.send(Message::FileSelected(png_file("caja.png")));
    h.wait(CLASSIFY_DELAY);

    let Some(ResultPanel::Ready(card)) = h.session.view().result else {
        panic!("expected a result card");
    };
    assert_eq!(h.send(Message::AskAboutCategory(card.key)), Transition::Unchanged);
    assert!(h.session.is_busy());

    h.wait(CHAT_DELAY);
    let transcript = h.session.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript.messages()[0].text.contains("papel/cartón"));
    assert!(transcript.messages()[1].text.contains("contenedor azul"));
    assert_eq!(h.session.state(), ViewState::ResultReady(CategoryKey::Paper));
}

#[test]
fn test_chat_reply_arrives_while_notice_open() {
    let camera = SyntheticCamera::with_availability(CameraAvailability::PermissionDenied);
    let mut h = Harness::with_camera(camera, vec![]);

    h.send(Message::SendChat("hola".to_string()));
    h.send(Message::ChooseCamera);
    assert!(h.session.notice().is_some());
    assert_eq!(
        h.send(Message::SendChat("ignorado".to_string())),
        Transition::Ignored
    );

    assert!(h.wait(CHAT_DELAY));
    assert_eq!(h.session.transcript().len(), 2);
}

#[test]
fn test_blank_chat_is_ignored() {
    let mut h = Harness::new(vec![]);
    assert_eq!(h.send(Message::SendChat("  ".to_string())), Transition::Ignored);
    assert!(h.session.transcript().is_empty());
}

#[test]
fn test_from_config_uses_capture_settings() {
    let mut config = AppConfig::new();
    config.capture.ideal_width = 48;
    config.capture.ideal_height = 32;
    config.preferences.default_facing = FacingMode::Front;
    config.preferences.random_seed = Some(8);
    config.timing.classification_delay_ms = 10;

    let clock = Rc::new(ManualClock::new());
    let shared: Rc<dyn Clock> = clock.clone();
    let mut session =
        ViewStateController::from_config(&config, Box::new(SyntheticCamera::new()), shared);

    assert_eq!(session.facing(), FacingMode::Front);
    session.update(Message::ChooseCamera);
    assert_eq!(
        session.capture().preview().map(|p| (p.width, p.height)),
        Some((48, 32))
    );

    session.update(Message::Capture);
    clock.advance(Duration::from_millis(10));
    assert!(session.tick());
    assert!(session.state().result().is_some());
}

#[test]
fn test_switch_without_stream_warns() {
    let camera = SyntheticCamera::with_availability(CameraAvailability::RearOnly);
    let mut h = Harness::with_camera(camera, vec![]);
    h.send(Message::ChooseCamera);

    h.send(Message::SwitchCamera);
    h.send(Message::DismissNotice);
    assert!(!h.session.capture().is_streaming());
    let opened = h.camera.opened();

    assert_eq!(h.send(Message::SwitchCamera), Transition::Unchanged);
    let notice = h.session.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.text, notice_text::NO_ACTIVE_CAMERA);
    assert_eq!(h.camera.opened(), opened);
    assert_eq!(h.session.facing(), FacingMode::Front);
    assert_eq!(h.session.state(), ViewState::Capturing);

    h.send(Message::DismissNotice);
    assert!(matches!(
        h.send(Message::ChooseUpload),
        Transition::Moved {
            to: ViewState::Uploading,
            ..
        }
    ));
}

#[test]
fn test_classification_result_only_comes_from_classifier() {
    let mut h = Harness::new(vec![Ok(CategoryKey::Organic)]);
    h.send(Message::ChooseCamera);
    h.send(Message::Capture);

    assert_eq!(
        h.send(Message::ClassificationResolved(Ok(CategoryKey::Glass))),
        Transition::Ignored
    );
    assert_eq!(h.session.state(), ViewState::ResultPending);
    assert!(h.session.is_busy());

    h.wait(CLASSIFY_DELAY);
    assert_eq!(
        h.session.state(),
        ViewState::ResultReady(CategoryKey::Organic)
    );
}

#[test]
fn test_non_image_drop_stays_uploading() {
    let mut h = Harness::new(vec![]);
    h.send(Message::ChooseUpload);

    let file = SelectedFile::new("x.txt", "text/plain", b"hola".to_vec());
    assert_eq!(
        h.send(Message::FilesDropped(DropPayload::new(vec![file]))),
        Transition::Unchanged
    );

    assert_eq!(h.session.state(), ViewState::Uploading);
    assert_eq!(
        h.session.notice().map(|n| n.text.as_str()),
        Some(notice_text::INVALID_IMAGE)
    );
    assert!(h.classify_calls.borrow().is_empty());
}

#[test]
fn test_denied_camera_from_upload_stays_uploading() {
    let camera = SyntheticCamera::with_availability(CameraAvailability::PermissionDenied);
    let mut h = Harness::with_camera(camera, vec![]);
    h.send(Message::ChooseUpload);

    assert_eq!(h.send(Message::ChooseCamera), Transition::Unchanged);
    assert_eq!(h.session.state(), ViewState::Uploading);
    assert_eq!(
        h.session.notice(),
        Some(&Notice::error(notice_text::CAMERA_ACCESS_FAILED))
    );
    assert_eq!(h.camera.active(), 0);
}
