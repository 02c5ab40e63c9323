//! Session message and state types.
//!
//! All user actions and service completions are represented as messages in the
//! Elm architecture style.

use crate::intake::{DropPayload, SelectedFile};
use crate::model::CategoryKey;
use crate::services::ClassificationError;

/// Which part of the flow the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Choosing between camera and upload
    #[default]
    Home,
    /// Live camera preview
    Capturing,
    /// Waiting for a file
    Uploading,
    /// Image handed to the classifier, waiting for the answer
    ResultPending,
    /// Classification finished
    ResultReady(CategoryKey),
}

impl ViewState {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Home => "Home",
            ViewState::Capturing => "Capturing",
            ViewState::Uploading => "Uploading",
            ViewState::ResultPending => "ResultPending",
            ViewState::ResultReady(_) => "ResultReady",
        }
    }

    /// The resolved category, when there is one.
    pub fn result(&self) -> Option<CategoryKey> {
        match self {
            ViewState::ResultReady(key) => Some(*key),
            _ => None,
        }
    }
}

/// Messages that drive the session.
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    /// Open the camera view
    ChooseCamera,
    /// Open the upload view
    ChooseUpload,
    /// Return to the start after a result
    NewAnalysis,

    // Camera
    /// Take a photo from the live stream
    Capture,
    /// Flip between front and rear camera
    SwitchCamera,

    // Upload
    /// A file was picked
    FileSelected(SelectedFile),
    /// Files were dropped on the upload area
    FilesDropped(DropPayload),
    /// A drag entered the upload area
    DragEnter,
    /// A drag left the upload area
    DragLeave,

    // Classification
    /// The classifier answered; produced by the session's own tick
    ClassificationResolved(Result<CategoryKey, ClassificationError>),

    // Chat
    /// Ask the assistant about a category
    AskAboutCategory(CategoryKey),
    /// Send a free-text chat message
    SendChat(String),

    // Notices
    /// Close the current notice
    DismissNotice,
}

impl Message {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Message::ChooseCamera => "ChooseCamera",
            Message::ChooseUpload => "ChooseUpload",
            Message::NewAnalysis => "NewAnalysis",
            Message::Capture => "Capture",
            Message::SwitchCamera => "SwitchCamera",
            Message::FileSelected(_) => "FileSelected",
            Message::FilesDropped(_) => "FilesDropped",
            Message::DragEnter => "DragEnter",
            Message::DragLeave => "DragLeave",
            Message::ClassificationResolved(_) => "ClassificationResolved",
            Message::AskAboutCategory(_) => "AskAboutCategory",
            Message::SendChat(_) => "SendChat",
            Message::DismissNotice => "DismissNotice",
        }
    }
}

/// What a message did to the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The state changed
    Moved {
        /// State before the message
        from: ViewState,
        /// State after the message
        to: ViewState,
    },
    /// The message was handled but the state stayed the same
    Unchanged,
    /// The message does not apply to the current state
    Ignored,
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Action not possible right now
    Warning,
    /// Something failed
    Error,
}

/// A blocking user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub text: String,
}

impl Notice {
    /// Warning notice.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    /// Error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}
