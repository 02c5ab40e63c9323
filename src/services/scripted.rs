//! Randomized stand-ins for the classification and chat backends.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    ChatAssistant, ChatError, ClassificationError, Classifier, Clock, Delay, ServiceFuture,
};
use crate::constants::{CHAT_REPLY_DELAY_MS, CLASSIFICATION_DELAY_MS};
use crate::model::{CategoryInfo, CategoryKey, EncodedImage, lookup};

/// Replies used for free-text chat messages.
pub const CANNED_REPLIES: [&str; 5] = [
    "El reciclaje de este material es importante porque...",
    "Para este tipo de residuo, te recomiendo...",
    "Una alternativa interesante es reutilizarlo como...",
    "Según las normativas locales, este residuo debe...",
    "¿Sabías que reciclando esto puedes ayudar a...?",
];

/// The user question posted when asking the assistant about a category.
pub fn question_about(info: &CategoryInfo) -> String {
    format!(
        "Tengo dudas sobre cómo reciclar {}. ¿Podrías ayudarme?",
        info.name.to_lowercase()
    )
}

fn answer_for(info: &CategoryInfo) -> String {
    format!(
        "Por supuesto. Los residuos {} {} Deben depositarse en {}. Un consejo útil: {} \
         ¿Necesitas más información sobre este tipo de residuo?",
        info.name.to_lowercase(),
        info.description.to_lowercase(),
        info.disposal.to_lowercase(),
        info.tips.to_lowercase()
    )
}

fn rng_from(seed: Option<u64>) -> RefCell<StdRng> {
    RefCell::new(match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    })
}

/// Picks a uniformly random category after a fixed delay.
pub struct RandomClassifier {
    clock: Rc<dyn Clock>,
    delay: Duration,
    rng: RefCell<StdRng>,
}

impl RandomClassifier {
    /// Classifier with the default delay; `seed` makes the sequence reproducible.
    pub fn new(clock: Rc<dyn Clock>, seed: Option<u64>) -> Self {
        Self {
            clock,
            delay: Duration::from_millis(CLASSIFICATION_DELAY_MS),
            rng: rng_from(seed),
        }
    }

    /// Override the simulated latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Classifier for RandomClassifier {
    fn classify(
        &self,
        image: EncodedImage,
    ) -> ServiceFuture<Result<CategoryKey, ClassificationError>> {
        let index = self.rng.borrow_mut().gen_range(0..CategoryKey::ALL.len());
        let key = CategoryKey::ALL[index];
        let delay = Delay::new(Rc::clone(&self.clock), self.delay);

        log::debug!(
            "Analyzing {}x{} image ({} bytes)",
            image.width(),
            image.height(),
            image.bytes().len()
        );

        async move {
            delay.await;
            Ok(key)
        }
        .boxed_local()
    }
}

/// Answers category questions from the catalog and free text with canned lines.
pub struct ScriptedAssistant {
    clock: Rc<dyn Clock>,
    delay: Duration,
    rng: RefCell<StdRng>,
}

impl ScriptedAssistant {
    /// Assistant with the default delay; `seed` makes reply choice reproducible.
    pub fn new(clock: Rc<dyn Clock>, seed: Option<u64>) -> Self {
        Self {
            clock,
            delay: Duration::from_millis(CHAT_REPLY_DELAY_MS),
            rng: rng_from(seed),
        }
    }

    /// Override the simulated latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn after_delay(&self, text: String) -> ServiceFuture<Result<String, ChatError>> {
        let delay = Delay::new(Rc::clone(&self.clock), self.delay);
        async move {
            delay.await;
            Ok(text)
        }
        .boxed_local()
    }
}

impl ChatAssistant for ScriptedAssistant {
    fn answer_about(&self, key: CategoryKey) -> ServiceFuture<Result<String, ChatError>> {
        self.after_delay(answer_for(lookup(key)))
    }

    fn reply(&self, message: &str) -> ServiceFuture<Result<String, ChatError>> {
        // No conversational context: the message itself does not affect the reply.
        log::trace!("Scripted reply to {:?}", message);
        let index = self.rng.borrow_mut().gen_range(0..CANNED_REPLIES.len());
        self.after_delay(CANNED_REPLIES[index].to_string())
    }
}
