//! Result region: analysis spinner or category card.

use crate::controller::ViewState;
use crate::model::{CategoryKey, lookup};

/// Shown while the classifier is working.
pub const ANALYZING_LABEL: &str = "Analizando la imagen...";
/// Heading above the disposal instructions.
pub const DISPOSAL_HEADING: &str = "¿Dónde tirarlo?";
/// Heading above the tips.
pub const TIPS_HEADING: &str = "Consejos";

/// Contents of the result region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    /// Waiting for the classifier
    Analyzing {
        /// Progress text
        label: &'static str,
    },
    /// Classification finished
    Ready(ResultCard),
}

/// Category card with disposal guidance and a call to action for the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    /// Resolved category; the ask button sends this key
    pub key: CategoryKey,
    /// Icon token
    pub icon_token: &'static str,
    /// Badge background token
    pub color_token: &'static str,
    /// Name and icon color token
    pub text_color_token: &'static str,
    /// Category name
    pub name: &'static str,
    /// Category description
    pub description: &'static str,
    /// Disposal heading
    pub disposal_heading: &'static str,
    /// Where to deposit the waste
    pub disposal: &'static str,
    /// Tips heading
    pub tips_heading: &'static str,
    /// Recycling tips
    pub tips: &'static str,
    /// Label of the "ask the assistant" button
    pub ask_label: String,
}

impl ResultCard {
    /// Card for a category.
    pub fn for_key(key: CategoryKey) -> Self {
        let info = lookup(key);
        Self {
            key,
            icon_token: info.icon_token,
            color_token: info.color_token,
            text_color_token: info.text_color_token,
            name: info.name,
            description: info.description,
            disposal_heading: DISPOSAL_HEADING,
            disposal: info.disposal,
            tips_heading: TIPS_HEADING,
            tips: info.tips,
            ask_label: format!("Preguntar al asistente sobre {}", info.name),
        }
    }
}

/// Result region contents for a state; `None` outside the result flow.
pub fn result_panel(state: ViewState) -> Option<ResultPanel> {
    match state {
        ViewState::ResultPending => Some(ResultPanel::Analyzing {
            label: ANALYZING_LABEL,
        }),
        ViewState::ResultReady(key) => Some(ResultPanel::Ready(ResultCard::for_key(key))),
        _ => None,
    }
}
