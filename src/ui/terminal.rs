// SPDX-License-Identifier: MPL-2.0

use crate::feed::Container;
use crate::network::{FollowDirection, FollowRelations, Post, Profile};
use crate::ui::Renderer;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::io::Write;

/// Format the server uses for post timestamps
const SERVER_TIME_FORMAT: &str = "%b %d %Y, %I:%M %p";

/// Line-oriented renderer for the text client. Hidden containers are
/// simply not printed.
pub struct TerminalRenderer<W: Write> {
    out: W,
    visible: Vec<Container>,
    busy: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            visible: Vec::new(),
            busy: false,
        }
    }

    /// What has been written so far.
    #[allow(dead_code)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn is_visible(&self, container: Container) -> bool {
        self.visible.contains(&container)
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            log::warn!("Failed to write to terminal: {e}");
        }
    }

    fn write_post(&mut self, post: &Post) {
        let when = format_relative_time(&post.timestamp, Utc::now());
        self.line(&format!(
            "[{}] {} (user {}) - {}",
            post.id, post.poster, post.user_id, when
        ));
        self.line(&format!("    {}", post.body));
        self.line(&format!(
            "    Likes: {}  Dislikes: {}   (like {} / dislike {})",
            post.like_count, post.dislike_count, post.id, post.id
        ));
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn set_busy(&mut self, busy: bool) {
        if busy && !self.busy {
            self.line("Loading...");
        }
        self.busy = busy;
    }

    fn set_visible(&mut self, container: Container, visible: bool) {
        self.visible.retain(|c| *c != container);
        if visible {
            self.visible.push(container);
        }
    }

    fn clear(&mut self, _container: Container) {}

    fn render_posts(&mut self, posts: &[Post], append: bool) {
        if !self.is_visible(Container::Posts) {
            return;
        }
        if !append {
            self.line("──────── posts ────────");
        }
        if posts.is_empty() && !append {
            self.line("No posts yet.");
        }
        for post in posts {
            self.write_post(post);
        }
    }

    fn render_profile(&mut self, profile: &Profile) {
        if !self.is_visible(Container::Profile) {
            return;
        }
        self.line(&format!("════ {} ════", profile.username));
        self.line(&format!(
            "{} followers - {} following",
            profile.follower_count, profile.following_count
        ));
        if let Some(affordance) = profile.follow_affordance() {
            self.line(&format!(
                "[{}] (follow {})",
                affordance.label(),
                affordance.target()
            ));
        }
    }

    fn render_usernames(&mut self, relations: &FollowRelations, direction: FollowDirection) {
        if !self.is_visible(Container::Usernames) {
            return;
        }
        self.line(direction.heading());
        for (username, id) in relations.entries() {
            match direction {
                FollowDirection::Following => {
                    self.line(&format!("  - {username} (profile {id})  [Unfollow] (follow {id})"))
                }
                FollowDirection::Followers => self.line(&format!("  - {username} (profile {id})")),
            }
        }
    }

    fn clear_compose(&mut self) {
        self.line("Posted.");
    }

    fn notify(&mut self, message: &str) {
        self.line(&format!("-- {message}"));
    }

    fn notify_error(&mut self, message: &str) {
        self.line(&format!("!! {message}"));
    }
}

/// Render a server timestamp relative to `now`; unparseable values are
/// shown verbatim.
pub fn format_relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, SERVER_TIME_FORMAT) else {
        return timestamp.to_string();
    };

    let post_time = naive.and_utc();
    let duration = now.signed_duration_since(post_time);

    if duration.num_seconds() < 60 {
        "now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d", duration.num_days())
    } else {
        post_time.format("%b %d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn profile(viewer_id: u64, follower_ids: Vec<u64>) -> Profile {
        Profile {
            user_id: 2,
            viewer_id: Some(viewer_id),
            username: "bob".to_string(),
            follower_count: follower_ids.len() as u32,
            following_count: 4,
            follower_ids,
            following_ids: vec![],
            follower_usernames: vec![],
            following_usernames: vec![],
            posts: vec![],
        }
    }

    fn rendered(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.get_ref().clone()).unwrap()
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2025, 3, 4, 23, 15, 0).unwrap();
        assert_eq!(format_relative_time("Mar 04 2025, 09:15 PM", now), "2h");
        assert_eq!(format_relative_time("Mar 04 2025, 11:15 PM", now), "now");
        assert_eq!(format_relative_time("Feb 01 2025, 09:15 PM", now), "Feb 01");
        assert_eq!(format_relative_time("yesterday", now), "yesterday");
    }

    #[test]
    fn test_profile_shows_unfollow_for_follower() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.set_visible(Container::Profile, true);
        renderer.render_profile(&profile(1, vec![1]));
        let out = rendered(renderer);
        assert!(out.contains("bob"));
        assert!(out.contains("1 followers - 4 following"));
        assert!(out.contains("[Unfollow] (follow 2)"));
    }

    #[test]
    fn test_own_profile_has_no_button() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.set_visible(Container::Profile, true);
        let mut own = profile(2, vec![]);
        own.user_id = 2;
        renderer.render_profile(&own);
        let out = rendered(renderer);
        assert!(!out.contains("Follow"));
    }

    #[test]
    fn test_hidden_container_prints_nothing() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render_profile(&profile(1, vec![]));
        assert!(rendered(renderer).is_empty());
    }

    #[test]
    fn test_unfollow_only_in_following_list() {
        let relations = FollowRelations {
            usernames: vec!["carol".into()],
            ids: vec![3],
            option: None,
        };

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.set_visible(Container::Usernames, true);
        renderer.render_usernames(&relations, FollowDirection::Followers);
        let out = rendered(renderer);
        assert!(out.contains("You are followed by:"));
        assert!(!out.contains("Unfollow"));

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.set_visible(Container::Usernames, true);
        renderer.render_usernames(&relations, FollowDirection::Following);
        let out = rendered(renderer);
        assert!(out.contains("You are following:"));
        assert!(out.contains("[Unfollow] (follow 3)"));
    }
}
