// SPDX-License-Identifier: MPL-2.0

mod client;
mod error;
mod types;

pub use client::{NetworkClient, RemoteStore};
pub use error::{ClientError, ComposeField, FetchAction, SyncError, ToggleKind};
pub use types::{
    Filter, FollowAffordance, FollowDirection, FollowRelations, Page, Post, PostId, Profile,
    Reaction, ToggleRequest, UserId,
};
