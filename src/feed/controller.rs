// SPDX-License-Identifier: MPL-2.0

//! Orchestrates loading, paging and toggling against the remote store.
//!
//! Every operation takes `&mut self`, so at most one remote call is in
//! flight per controller and responses are rendered in the order they
//! complete. Displayed posts and profiles are always the verbatim payload
//! of the latest successful response; nothing is patched locally.

use crate::feed::busy::{BusyGuard, BusyIndicator};
use crate::feed::pagination::PaginationCursor;
use crate::feed::scroll::LoadMore;
use crate::feed::view::{Container, Transition, ViewMode, ViewState};
use crate::network::{
    ComposeField, Filter, FollowDirection, Post, Profile, RemoteStore, SyncError, ToggleRequest,
};
use crate::ui::Renderer;

const NOT_IN_FEED: &str = "More posts can only be loaded in the feed (try `all` or `mine`)";

/// Everything the page session remembers between operations.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub filter: Filter,
    pub cursor: PaginationCursor,
    pub view: ViewState,
    /// Posts currently on screen
    pub posts: Vec<Post>,
    /// Profile header currently on screen
    pub profile: Option<Profile>,
}

impl SessionState {
    pub fn new(page_size: u32) -> Self {
        Self {
            filter: Filter::default(),
            cursor: PaginationCursor::new(page_size),
            view: ViewState::new(),
            posts: Vec::new(),
            profile: None,
        }
    }

    fn forget(&mut self, container: Container) {
        match container {
            Container::Posts => self.posts.clear(),
            Container::Profile => self.profile = None,
            Container::Usernames | Container::Compose => {}
        }
    }
}

pub struct FeedController<S: RemoteStore, R: Renderer> {
    store: S,
    renderer: R,
    session: SessionState,
    busy: BusyIndicator,
}

impl<S: RemoteStore, R: Renderer> FeedController<S, R> {
    pub fn new(store: S, renderer: R, page_size: u32) -> Self {
        Self {
            store,
            renderer,
            session: SessionState::new(page_size),
            busy: BusyIndicator::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[allow(dead_code)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn active_filter(&self) -> Filter {
        self.session.filter
    }

    /// Handle for components that must know when a call is in flight.
    pub fn busy_indicator(&self) -> BusyIndicator {
        self.busy.clone()
    }

    /// Initial page load. Anonymous viewers get nothing until they act.
    pub async fn start(&mut self, authenticated: bool) -> Result<(), SyncError> {
        if !authenticated {
            log::info!("Not authenticated, skipping initial load");
            return Ok(());
        }
        self.change_filter(Filter::AllPosts).await
    }

    /// Fetch the page at the cursor. With `append` the posts go after the
    /// ones on screen; without it the feed restarts from offset 0 and
    /// replaces what is shown. The cursor moves only on success.
    ///
    /// Errors have already been shown to the user and logged.
    pub async fn load_posts(&mut self, filter: Filter, append: bool) -> Result<(), SyncError> {
        let mut cursor = self.session.cursor;
        if !append {
            cursor.reset();
        }

        let guard = self.begin_busy();
        let result = self.store.list_posts(filter, cursor.page()).await;
        self.end_busy(guard);

        let posts = result.map_err(|e| self.surface(e))?;
        log::info!(
            "Loaded {} {filter} posts at offset {}",
            posts.len(),
            cursor.offset()
        );

        cursor.advance(posts.len());
        self.session.cursor = cursor;
        self.enter(ViewMode::Feed);
        self.show_posts(posts, append);
        Ok(())
    }

    /// Switch feed scope and reload it from the start. The request is
    /// issued from offset 0; the new filter and cursor are only committed
    /// once its page is on screen.
    pub async fn change_filter(&mut self, filter: Filter) -> Result<(), SyncError> {
        self.load_posts(filter, false).await?;
        self.session.filter = filter;
        Ok(())
    }

    /// Explicit request for the next page of the active feed. Outside the
    /// feed view the user is told instead of the request being dropped.
    pub async fn more(&mut self) -> Result<(), SyncError> {
        if !self.session.view.is(ViewMode::Feed) {
            self.renderer.notify(NOT_IN_FEED);
            return Ok(());
        }
        let filter = self.session.filter;
        self.load_posts(filter, true).await
    }

    /// Respond to the scroll trigger. Requests stamped with a filter that
    /// is no longer active, or arriving while another view is up, are dropped.
    pub async fn load_more(&mut self, request: LoadMore) -> Result<(), SyncError> {
        if request.filter != self.session.filter {
            log::debug!(
                "Dropping load-more for {} (active filter is {})",
                request.filter,
                self.session.filter
            );
            return Ok(());
        }
        if !self.session.view.is(ViewMode::Feed) {
            log::debug!("Dropping load-more outside the feed view");
            return Ok(());
        }
        self.load_posts(request.filter, true).await
    }

    /// Flip a follow or reaction and show what the server says resulted.
    pub async fn handle_toggle(&mut self, request: ToggleRequest) -> Result<(), SyncError> {
        let page = self.session.cursor.page();

        match request {
            ToggleRequest::Follow { target_user_id } => {
                let guard = self.begin_busy();
                let result = self.store.toggle_follow(target_user_id, page).await;
                self.end_busy(guard);

                let profile = result.map_err(|e| self.surface(e))?;
                log::info!("Follow toggled for user {target_user_id}");

                let transition = self.enter(ViewMode::Profile);
                self.renderer.render_profile(&profile);
                // Coming from a view without a post list, the profile's own
                // posts fill the freshly revealed one.
                if !transition.from.is_some_and(|m| m.shows(Container::Posts)) {
                    self.show_posts(profile.posts.clone(), false);
                }
                self.session.profile = Some(profile);
            }
            ToggleRequest::Reaction {
                target_post_id,
                reaction,
            } => {
                // The page sent is the feed's, not derived from the post;
                // the response replaces the whole displayed page.
                let guard = self.begin_busy();
                let result = self
                    .store
                    .toggle_reaction(target_post_id, reaction, page)
                    .await;
                self.end_busy(guard);

                let posts = result.map_err(|e| self.surface(e))?;
                log::info!("{} toggled on post {target_post_id}", reaction.as_str());

                self.enter(ViewMode::Feed);
                self.show_posts(posts, false);
            }
        }

        Ok(())
    }

    /// Publish a post. Empty fields never reach the network, and the
    /// compose box keeps its text unless the server accepted it.
    pub async fn submit_new_post(&mut self, body: &str, poster: &str) -> Result<(), SyncError> {
        if body.trim().is_empty() {
            return Err(self.surface(SyncError::Validation(ComposeField::Body)));
        }
        if poster.trim().is_empty() {
            return Err(self.surface(SyncError::Validation(ComposeField::Poster)));
        }

        let page = self.session.cursor.page();
        let guard = self.begin_busy();
        let result = self.store.submit_post(body, poster, page).await;
        self.end_busy(guard);

        let posts = result.map_err(|e| self.surface(e))?;
        log::info!("Post submitted as {poster}");

        self.enter(ViewMode::Feed);
        self.show_posts(posts, false);
        self.renderer.clear_compose();
        Ok(())
    }

    pub async fn fetch_profile(&mut self, user_id: u64) -> Result<(), SyncError> {
        log::debug!("Fetching profile for user {user_id}");

        let guard = self.begin_busy();
        let result = self.store.fetch_profile(user_id).await;
        self.end_busy(guard);

        let profile = result.map_err(|e| self.surface(e))?;

        self.enter(ViewMode::Profile);
        self.renderer.render_profile(&profile);
        self.show_posts(profile.posts.clone(), false);
        self.session.profile = Some(profile);
        Ok(())
    }

    pub async fn list_follow_relations(
        &mut self,
        direction: FollowDirection,
    ) -> Result<(), SyncError> {
        let guard = self.begin_busy();
        let result = self.store.list_follow_relations(direction).await;
        self.end_busy(guard);

        let relations = result.map_err(|e| self.surface(e))?;

        self.enter(ViewMode::UsernameList);
        self.renderer.render_usernames(&relations, direction);
        Ok(())
    }

    /// Raise the busy indicator for one remote call. A call cancelled
    /// before `end_busy` releases the shared flag through its guard, but the
    /// renderer keeps showing busy until the next call finishes.
    fn begin_busy(&mut self) -> BusyGuard {
        let guard = self.busy.hold();
        self.renderer.set_busy(true);
        guard
    }

    fn end_busy(&mut self, guard: BusyGuard) {
        drop(guard);
        self.renderer.set_busy(false);
    }

    fn enter(&mut self, mode: ViewMode) -> Transition {
        let transition = self.session.view.enter(mode);

        for &container in &transition.hide {
            self.renderer.set_visible(container, false);
            if transition.is_change() {
                self.renderer.clear(container);
                self.session.forget(container);
            }
        }
        for &container in &transition.show {
            self.renderer.set_visible(container, true);
        }

        transition
    }

    fn show_posts(&mut self, posts: Vec<Post>, append: bool) {
        self.renderer.render_posts(&posts, append);
        if append {
            self.session.posts.extend(posts);
        } else {
            self.session.posts = posts;
        }
    }

    /// Tell the user, log the cause, and hand the error back.
    fn surface(&mut self, error: SyncError) -> SyncError {
        if error.is_local() {
            log::warn!("{error}");
        } else {
            log::error!("{error}");
        }
        self.renderer.notify_error(&error.user_message());
        error
    }
}
