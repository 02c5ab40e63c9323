//! Classification and chat capabilities.
//!
//! Both services are asynchronous and single-threaded: they hand back a boxed
//! local future which the session polls from its tick loop. Swapping in a real
//! backend only means providing another implementation of these traits.

mod clock;
mod scripted;

pub use clock::{Clock, Delay, ManualClock, SystemClock};
pub use scripted::{CANNED_REPLIES, RandomClassifier, ScriptedAssistant, question_about};

use futures::future::LocalBoxFuture;

use crate::model::{CategoryKey, EncodedImage};

/// Future returned by service calls.
pub type ServiceFuture<T> = LocalBoxFuture<'static, T>;

/// Errors a classification backend may report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    /// The backend could not be reached
    #[error("Classification service unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer in time
    #[error("Classification timed out")]
    Timeout,
}

/// Errors a chat backend may report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    /// The backend could not be reached
    #[error("Chat assistant unavailable: {0}")]
    Unavailable(String),
}

/// Assigns a waste category to an image.
pub trait Classifier {
    /// Classify one image. One image in, one category out.
    fn classify(
        &self,
        image: EncodedImage,
    ) -> ServiceFuture<Result<CategoryKey, ClassificationError>>;
}

/// Produces assistant replies.
pub trait ChatAssistant {
    /// Answer the question "how do I recycle this category?".
    fn answer_about(&self, key: CategoryKey) -> ServiceFuture<Result<String, ChatError>>;

    /// Reply to a free-text message.
    fn reply(&self, message: &str) -> ServiceFuture<Result<String, ChatError>>;
}
