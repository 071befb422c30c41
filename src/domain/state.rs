use crate::error::AppError;

pub const PROCESSING_TEXT: &str = "Processing...";

/// The single output slot shown to the agent.
#[derive(Debug, Default)]
pub enum ReplyState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Failure(AppError),
}

impl ReplyState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ReplyState::Loading)
    }

    pub fn display_text(&self) -> Option<String> {
        match self {
            ReplyState::Idle => None,
            ReplyState::Loading => Some(PROCESSING_TEXT.to_string()),
            ReplyState::Success(text) => Some(text.clone()),
            ReplyState::Failure(error) => Some(format!("Error: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_state() {
        assert_eq!(ReplyState::Idle.display_text(), None);
        assert_eq!(
            ReplyState::Loading.display_text().as_deref(),
            Some(PROCESSING_TEXT)
        );
        assert_eq!(
            ReplyState::Success("Hello".into()).display_text().as_deref(),
            Some("Hello")
        );
        assert_eq!(
            ReplyState::Failure(AppError::Validation("draft text is empty".into()))
                .display_text()
                .as_deref(),
            Some("Error: invalid input: draft text is empty")
        );
    }
}
