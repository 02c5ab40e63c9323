//! Render model for the session.
//!
//! [`render`] is a pure function of the session state; it decides which of the
//! four regions is visible and fills in the panels. Presentation (markup,
//! widgets, terminal output) lives in whatever consumes the model.

mod result;

pub use result::{
    ANALYZING_LABEL, DISPOSAL_HEADING, ResultCard, ResultPanel, TIPS_HEADING, result_panel,
};

use crate::capture::FacingMode;
use crate::controller::{Notice, ViewState};
use crate::model::{CategoryKey, ChatMessage, Transcript};

/// Which region of the page is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Start screen with the camera and upload choices
    Home,
    /// Live camera preview
    Camera,
    /// File picker and drop area
    Upload,
    /// Analysis progress or result card
    Result,
}

impl Region {
    /// Region shown for a state.
    pub fn for_state(state: ViewState) -> Self {
        match state {
            ViewState::Home => Region::Home,
            ViewState::Capturing => Region::Camera,
            ViewState::Uploading => Region::Upload,
            ViewState::ResultPending | ViewState::ResultReady(_) => Region::Result,
        }
    }
}

/// Camera region contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraPanel {
    /// Selected camera
    pub facing: FacingMode,
    /// Whether the preview shows a live stream
    pub live: bool,
}

/// Upload region contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPanel {
    /// Drop area highlight
    pub drag_over: bool,
    /// Dimensions of the last uploaded image
    pub preview: Option<(u32, u32)>,
}

/// A shortcut that asks the assistant about one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickTopic {
    /// Category the tile asks about
    pub key: CategoryKey,
    /// Tile label
    pub label: &'static str,
    /// Tile icon
    pub icon_token: &'static str,
}

/// Everything a presentation layer needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    /// Visible region
    pub region: Region,
    /// Filled when the camera region is visible
    pub camera: Option<CameraPanel>,
    /// Filled when the upload region is visible
    pub upload: Option<UploadPanel>,
    /// Filled when the result region is visible
    pub result: Option<ResultPanel>,
    /// Blocking notice
    pub notice: Option<Notice>,
    /// Chat transcript
    pub chat: Vec<ChatMessage>,
    /// Category shortcuts beside the chat
    pub quick_topics: Vec<QuickTopic>,
}

/// Session data the render model is built from, besides the state itself.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Selected camera
    pub facing: FacingMode,
    /// Whether a stream is live
    pub streaming: bool,
    /// Drop area highlight
    pub drag_over: bool,
    /// Dimensions of the last uploaded image
    pub upload_preview: Option<(u32, u32)>,
    /// Notice to show
    pub notice: Option<&'a Notice>,
    /// Chat transcript
    pub transcript: &'a Transcript,
}

/// Build the render model.
pub fn render(state: ViewState, ctx: &ViewContext<'_>) -> RenderModel {
    let region = Region::for_state(state);

    RenderModel {
        region,
        camera: (region == Region::Camera).then_some(CameraPanel {
            facing: ctx.facing,
            live: ctx.streaming,
        }),
        upload: (region == Region::Upload).then_some(UploadPanel {
            drag_over: ctx.drag_over,
            preview: ctx.upload_preview,
        }),
        result: result_panel(state),
        notice: ctx.notice.cloned(),
        chat: ctx.transcript.messages().to_vec(),
        quick_topics: quick_topics(),
    }
}

/// One shortcut per category, carrying the key rather than a label to match on.
pub fn quick_topics() -> Vec<QuickTopic> {
    CategoryKey::ALL
        .iter()
        .map(|&key| {
            let info = key.info();
            QuickTopic {
                key,
                label: info.name,
                icon_token: info.icon_token,
            }
        })
        .collect()
}
