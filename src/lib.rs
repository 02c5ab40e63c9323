//! ecosort - waste sorting assistant
//!
//! Capture or upload a photo, classify it into one of six waste categories,
//! show where to dispose of it and chat with an assistant about it.
//!
//! The session is an Elm-style state machine ([`ViewStateController`]) fed with
//! [`Message`]s. Classification and chat are asynchronous capabilities behind the
//! [`Classifier`] and [`ChatAssistant`] traits; the bundled implementations are
//! randomized stand-ins with simulated latency.
//!
//! [`Classifier`]: services::Classifier
//! [`ChatAssistant`]: services::ChatAssistant

pub mod capture;
pub mod chat;
pub mod config;
pub mod constants;
pub mod controller;
pub mod intake;
pub mod model;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use controller::{Message, Notice, NoticeLevel, Transition, ViewState, ViewStateController};
pub use views::RenderModel;
