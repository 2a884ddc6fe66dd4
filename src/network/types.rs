// SPDX-License-Identifier: MPL-2.0

use serde::{Deserialize, Serialize};
use std::fmt;

pub type PostId = u64;
pub type UserId = u64;

/// A post exactly as the server last reported it. Counts are never
/// adjusted locally; a fresh server payload replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// Username of the author
    pub poster: String,
    /// Id of the author, used to open their profile
    pub user_id: UserId,
    pub body: String,
    /// Server-formatted creation time, e.g. "Mar 04 2025, 09:15 PM"
    pub timestamp: String,
    pub like_count: u32,
    pub dislike_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    /// The authenticated viewer, as the server sees them. Null for anonymous viewers.
    pub viewer_id: Option<UserId>,
    pub username: String,
    pub follower_count: u32,
    pub following_count: u32,
    #[serde(default)]
    pub follower_ids: Vec<UserId>,
    #[serde(default)]
    pub following_ids: Vec<UserId>,
    #[serde(default)]
    pub follower_usernames: Vec<String>,
    #[serde(default)]
    pub following_usernames: Vec<String>,
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Follow button shown on someone else's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAffordance {
    Follow(UserId),
    Unfollow(UserId),
}

impl FollowAffordance {
    pub fn label(self) -> &'static str {
        match self {
            Self::Follow(_) => "Follow",
            Self::Unfollow(_) => "Unfollow",
        }
    }

    pub fn target(self) -> UserId {
        match self {
            Self::Follow(id) | Self::Unfollow(id) => id,
        }
    }
}

impl Profile {
    /// The follow/unfollow button for this profile, or `None` when the
    /// viewer is looking at themselves (or is unknown).
    pub fn follow_affordance(&self) -> Option<FollowAffordance> {
        let viewer = self.viewer_id?;
        if viewer == self.user_id {
            return None;
        }

        if self.follower_ids.contains(&viewer) {
            Some(FollowAffordance::Unfollow(self.user_id))
        } else {
            Some(FollowAffordance::Follow(self.user_id))
        }
    }
}

/// Usernames and ids of the viewer's followers or followees, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowRelations {
    pub usernames: Vec<String>,
    pub ids: Vec<UserId>,
    #[serde(default)]
    pub option: Option<String>,
}

impl FollowRelations {
    /// Pairs of (username, id) in server order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, UserId)> {
        self.usernames
            .iter()
            .map(String::as_str)
            .zip(self.ids.iter().copied())
    }

    pub fn is_aligned(&self) -> bool {
        self.usernames.len() == self.ids.len()
    }
}

/// Body of a successful follow toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowToggleResponse {
    pub profile: Profile,
}

/// Body of a successful like/dislike toggle. The server also sends the
/// viewer's profile, which the feed has no use for.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionToggleResponse {
    pub posts: Vec<Post>,
}

/// Window of the feed a request is issued against, sent as
/// `offset` / `batchSize` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub size: u32,
}

/// Feed scope. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    AllPosts,
    MyPosts,
}

impl Filter {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::AllPosts => "all-posts",
            Self::MyPosts => "my-posts",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// Path segment of the toggle endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Like => "like-update",
            Self::Dislike => "dislike-update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowDirection {
    Following,
    Followers,
}

impl FollowDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Following => "following",
            Self::Followers => "followers",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Self::Following => "You are following:",
            Self::Followers => "You are followed by:",
        }
    }
}

/// A user action flipping a binary relationship. It carries no guess about
/// the outcome; whatever the server answers is what gets shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleRequest {
    Follow { target_user_id: UserId },
    Reaction { target_post_id: PostId, reaction: Reaction },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: UserId, viewer_id: Option<UserId>, follower_ids: Vec<UserId>) -> Profile {
        Profile {
            user_id,
            viewer_id,
            username: "bob".to_string(),
            follower_count: follower_ids.len() as u32,
            following_count: 0,
            follower_ids,
            following_ids: vec![],
            follower_usernames: vec![],
            following_usernames: vec![],
            posts: vec![],
        }
    }

    #[test]
    fn test_unfollow_shown_when_viewer_follows() {
        let p = profile(2, Some(1), vec![1, 3]);
        assert_eq!(p.follow_affordance(), Some(FollowAffordance::Unfollow(2)));
        assert_eq!(p.follow_affordance().unwrap().label(), "Unfollow");
    }

    #[test]
    fn test_follow_shown_when_viewer_does_not_follow() {
        let p = profile(2, Some(1), vec![3]);
        assert_eq!(p.follow_affordance(), Some(FollowAffordance::Follow(2)));
    }

    #[test]
    fn test_no_affordance_on_own_profile() {
        let p = profile(1, Some(1), vec![]);
        assert_eq!(p.follow_affordance(), None);
    }

    #[test]
    fn test_no_affordance_for_anonymous_viewer() {
        let p = profile(2, None, vec![]);
        assert_eq!(p.follow_affordance(), None);
    }

    #[test]
    fn test_profile_decodes_server_payload() {
        let json = r#"{
            "user_id": 2,
            "username": "bob",
            "follower_count": 1,
            "following_count": 0,
            "posts": [{"id": 7, "poster": "bob", "user_id": 2, "body": "hi",
                       "timestamp": "Mar 04 2025, 09:15 PM", "like_count": 3, "dislike_count": 0}],
            "viewer_id": 1,
            "follower_ids": [1],
            "following_ids": [],
            "follower_usernames": ["alice"],
            "following_usernames": []
        }"#;
        let p: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(p.posts.len(), 1);
        assert_eq!(p.posts[0].like_count, 3);
        assert_eq!(p.follow_affordance(), Some(FollowAffordance::Unfollow(2)));
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let json = r#"{"id": 1, "poster": "a", "user_id": 1, "body": "x",
                       "timestamp": "t", "like_count": -1, "dislike_count": 0}"#;
        assert!(serde_json::from_str::<Post>(json).is_err());
    }

    #[test]
    fn test_follow_relation_entries_are_paired() {
        let rel = FollowRelations {
            usernames: vec!["a".into(), "b".into()],
            ids: vec![4, 9],
            option: Some("following".into()),
        };
        assert!(rel.is_aligned());
        let entries: Vec<_> = rel.entries().collect();
        assert_eq!(entries, vec![("a", 4), ("b", 9)]);
    }
}
