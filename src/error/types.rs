use thiserror::Error;

use crate::identity::ScreenId;

/// Unified result type for the screenflow crate.
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Errors surfaced by the navigation engine and the presenters it drives.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("no view template registered for screen `{0}`")]
    TemplateNotFound(ScreenId),
    #[error("no presenter registered for screen `{0}`")]
    PresenterNotRegistered(ScreenId),
    #[error("view container was not supplied")]
    MissingContainer,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("presenter `{0}` has been disposed")]
    DisposedAccess(String),
    #[error("presenter `{0}` is not initialized")]
    NotInitialized(String),
    #[error("presenter `{0}` already has a bound view")]
    AlreadyBound(String),
    #[error("presenter `{0}` was already initialized")]
    AlreadyInitialized(String),
    #[error("view for screen `{screen}` is not a `{expected}`")]
    ViewTypeMismatch {
        screen: ScreenId,
        expected: &'static str,
    },
    #[error("view for screen `{0}` is already borrowed")]
    ViewBusy(ScreenId),
    #[error("presenter failure: {0}")]
    Presenter(String),
    #[error("model decoding failed: {0}")]
    Model(#[from] serde_json::Error),
}

impl NavigationError {
    /// Configuration errors abort navigation and are never retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound(_) | Self::PresenterNotRegistered(_) | Self::MissingContainer
        )
    }

    /// Stable short name used in log and audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TemplateNotFound(_) => "template_not_found",
            Self::PresenterNotRegistered(_) => "presenter_not_registered",
            Self::MissingContainer => "missing_container",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::DisposedAccess(_) => "disposed_access",
            Self::NotInitialized(_) => "not_initialized",
            Self::AlreadyBound(_) => "already_bound",
            Self::AlreadyInitialized(_) => "already_initialized",
            Self::ViewTypeMismatch { .. } => "view_type_mismatch",
            Self::ViewBusy(_) => "view_busy",
            Self::Presenter(_) => "presenter",
            Self::Model(_) => "model",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(NavigationError::TemplateNotFound(ScreenId::from("menu")).is_configuration());
        assert!(NavigationError::MissingContainer.is_configuration());
        assert!(!NavigationError::InvalidArgument("x".into()).is_configuration());
    }

    #[test]
    fn display_names_the_screen() {
        let err = NavigationError::TemplateNotFound(ScreenId::from("profile"));
        assert_eq!(
            err.to_string(),
            "no view template registered for screen `profile`"
        );
        assert_eq!(err.kind(), "template_not_found");
    }
}
