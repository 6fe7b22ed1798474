use tracing::debug;

/// How the user asked for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Button,
    EnterKey,
}

/// Emitted when the user submits the search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequested {
    /// Text exactly as typed, untrimmed.
    pub raw_handle: String,
    pub trigger: SubmitTrigger,
}

/// Search box state: the typed text and whether input is locked while a
/// lookup is running.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    text: String,
    disabled: bool,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Follows the coordinator's loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.disabled = loading;
    }

    /// Submits the current text. Ignored while disabled.
    pub fn submit(&self, trigger: SubmitTrigger) -> Option<SearchRequested> {
        if self.disabled {
            debug!(?trigger, "submit ignored while a lookup is in flight");
            return None;
        }
        Some(SearchRequested {
            raw_handle: self.text.clone(),
            trigger,
        })
    }
}
