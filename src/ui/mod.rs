// SPDX-License-Identifier: MPL-2.0

mod terminal;

pub use terminal::TerminalRenderer;

use crate::feed::Container;
use crate::network::{FollowDirection, FollowRelations, Post, Profile};

/// Paints state handed to it by the feed controller. Renderers own no
/// feed state of their own.
pub trait Renderer {
    /// Show or hide the busy indicator.
    fn set_busy(&mut self, busy: bool);

    fn set_visible(&mut self, container: Container, visible: bool);

    /// Drop whatever content a container currently shows.
    fn clear(&mut self, container: Container);

    /// Paint posts, after the existing ones when `append` is set and in
    /// place of them otherwise.
    fn render_posts(&mut self, posts: &[Post], append: bool);

    /// Paint the profile header with its follow/unfollow affordance.
    fn render_profile(&mut self, profile: &Profile);

    fn render_usernames(&mut self, relations: &FollowRelations, direction: FollowDirection);

    /// Empty the compose box after a successful submission.
    fn clear_compose(&mut self);

    /// Informational notice that does not indicate a failure.
    fn notify(&mut self, message: &str);

    /// Blocking, human-readable failure notice.
    fn notify_error(&mut self, message: &str);
}
