// SPDX-License-Identifier: MPL-2.0

use crate::network::types::Reaction;
use thiserror::Error;

/// What went wrong on the wire.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    Posts,
    FollowRelations,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Follow,
    Reaction(Reaction),
}

impl ToggleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Reaction(reaction) => reaction.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Body,
    Poster,
}

/// Failure of a feed operation, as surfaced to the user.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("fetching {action:?} failed: {source}")]
    Fetch {
        action: FetchAction,
        #[source]
        source: ClientError,
    },
    #[error("toggling {name} status failed: {source}", name = .kind.as_str())]
    Toggle {
        kind: ToggleKind,
        #[source]
        source: ClientError,
    },
    #[error("submitting post failed: {source}")]
    Submit {
        #[source]
        source: ClientError,
    },
    #[error("compose field {0:?} is empty")]
    Validation(ComposeField),
}

impl SyncError {
    pub fn fetch(action: FetchAction) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Fetch { action, source }
    }

    pub fn toggle(kind: ToggleKind) -> impl FnOnce(ClientError) -> Self {
        move |source| Self::Toggle { kind, source }
    }

    pub fn submit(source: ClientError) -> Self {
        Self::Submit { source }
    }

    /// Text for the blocking notification naming the failed action.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch { action, .. } => match action {
                FetchAction::Posts => "Posts could not be successfully retrieved".to_string(),
                FetchAction::FollowRelations => "Could not retrieve data".to_string(),
                FetchAction::Profile => "Error fetching profile data".to_string(),
            },
            Self::Toggle { kind, .. } => format!("Failed to toggle {} status", kind.as_str()),
            Self::Submit { .. } => "Error submitting post".to_string(),
            Self::Validation(ComposeField::Body) => "Post body cannot be empty".to_string(),
            Self::Validation(ComposeField::Poster) => "Poster cannot be empty".to_string(),
        }
    }

    /// True when the error never left the client.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failed_action() {
        let like = SyncError::toggle(ToggleKind::Reaction(Reaction::Like))(ClientError::Status(500));
        assert_eq!(like.user_message(), "Failed to toggle like status");

        let follow = SyncError::toggle(ToggleKind::Follow)(ClientError::Status(404));
        assert_eq!(follow.user_message(), "Failed to toggle follow status");

        let posts = SyncError::fetch(FetchAction::Posts)(ClientError::Status(400));
        assert_eq!(posts.user_message(), "Posts could not be successfully retrieved");

        let submit = SyncError::submit(ClientError::Network("refused".into()));
        assert_eq!(submit.user_message(), "Error submitting post");
    }

    #[test]
    fn test_display_keeps_underlying_cause() {
        let err = SyncError::fetch(FetchAction::Profile)(ClientError::Status(404));
        assert!(err.to_string().contains("status 404"));
        assert!(!err.is_local());
        assert!(SyncError::Validation(ComposeField::Body).is_local());
    }
}
