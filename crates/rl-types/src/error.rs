use thiserror::Error;

pub type WheelResult<T> = Result<T, WheelError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("{what} limit of {limit} reached")]
    CapacityExceeded { what: &'static str, limit: usize },
    #[error("option already exists: {0}")]
    DuplicateOption(String),
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),
    #[error("tab not found: {0}")]
    NotFound(String),
    #[error("cannot delete the last tab")]
    LastTabProtected,
    #[error("index {index} out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("spin needs at least {need} options, tab has {have}")]
    InsufficientOptions { have: usize, need: usize },
    #[error("wheel has no options")]
    NoOptions,
    #[error("stored data is corrupt: {0}")]
    StorageCorrupt(String),
    #[error("a spin is in progress")]
    SpinInProgress,
}

impl WheelError {
    /// Text shown to the user through the dialog service.
    pub fn user_message(&self) -> String {
        match self {
            Self::CapacityExceeded { what: "tabs", limit } => format!("Maximum {limit} tabs allowed."),
            Self::CapacityExceeded { what, limit } => format!("Maximum {limit} {what} allowed."),
            Self::DuplicateOption(text) => format!("\"{text}\" is already on this wheel."),
            Self::EmptyInput(field) => format!("Please enter a {field}."),
            Self::NotFound(_) => "That tab no longer exists.".to_owned(),
            Self::LastTabProtected => "Cannot delete the last tab.".to_owned(),
            Self::IndexOutOfRange { .. } => "That option no longer exists.".to_owned(),
            Self::InsufficientOptions { need, .. } => format!("Add at least {need} options to spin!"),
            Self::NoOptions => "The wheel has no options.".to_owned(),
            Self::StorageCorrupt(_) => "Saved data was unreadable and has been reset.".to_owned(),
            Self::SpinInProgress => "Wait for the wheel to stop spinning.".to_owned(),
        }
    }

    /// Whether the failure should be surfaced through an alert dialog.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::DuplicateOption(_)
                | Self::LastTabProtected
                | Self::InsufficientOptions { .. }
                | Self::SpinInProgress
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_messages_name_the_limit() {
        let tabs = WheelError::CapacityExceeded { what: "tabs", limit: 10 };
        assert_eq!(tabs.user_message(), "Maximum 10 tabs allowed.");

        let options = WheelError::CapacityExceeded { what: "options", limit: 50 };
        assert_eq!(options.user_message(), "Maximum 50 options allowed.");
    }

    #[test]
    fn insufficient_options_matches_spin_prompt() {
        let err = WheelError::InsufficientOptions { have: 1, need: 2 };
        assert_eq!(err.user_message(), "Add at least 2 options to spin!");
        assert!(err.is_user_facing());
    }

    #[test]
    fn storage_corruption_is_not_alerted() {
        assert!(!WheelError::StorageCorrupt("bad json".into()).is_user_facing());
        assert!(!WheelError::NoOptions.is_user_facing());
        assert!(!WheelError::EmptyInput("option").is_user_facing());
    }
}
