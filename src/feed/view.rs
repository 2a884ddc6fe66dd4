// SPDX-License-Identifier: MPL-2.0

/// Which of the three mutually exclusive views is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Feed,
    Profile,
    UsernameList,
}

/// On-screen regions the renderer shows and hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Posts,
    Profile,
    Usernames,
    Compose,
}

impl Container {
    pub const ALL: [Container; 4] = [
        Container::Posts,
        Container::Profile,
        Container::Usernames,
        Container::Compose,
    ];
}

impl ViewMode {
    /// Containers visible while this mode is active. The compose box is
    /// shared by the feed and profile views.
    pub fn containers(self) -> &'static [Container] {
        match self {
            Self::Feed => &[Container::Posts, Container::Compose],
            Self::Profile => &[Container::Profile, Container::Posts, Container::Compose],
            Self::UsernameList => &[Container::Usernames],
        }
    }

    pub fn shows(self, container: Container) -> bool {
        self.containers().contains(&container)
    }
}

/// Result of entering a mode: what to reveal, and what to hide and clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Option<ViewMode>,
    pub to: ViewMode,
    pub show: Vec<Container>,
    pub hide: Vec<Container>,
}

impl Transition {
    pub fn is_change(&self) -> bool {
        self.from != Some(self.to)
    }
}

/// Nothing is shown until the first successful load picks a mode.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    current: Option<ViewMode>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ViewMode> {
        self.current
    }

    pub fn is(&self, mode: ViewMode) -> bool {
        self.current == Some(mode)
    }

    /// Switch to `mode`. Every mode is reachable from every other and
    /// re-entering the current mode is allowed.
    pub fn enter(&mut self, mode: ViewMode) -> Transition {
        let from = self.current.replace(mode);
        let show = mode.containers().to_vec();
        let hide = Container::ALL
            .into_iter()
            .filter(|c| !mode.shows(*c))
            .collect();

        if from != Some(mode) {
            log::debug!("View {from:?} -> {mode:?}");
        }

        Transition {
            from,
            to: mode,
            show,
            hide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_empty() {
        let view = ViewState::new();
        assert_eq!(view.current(), None);
    }

    #[test]
    fn test_username_list_hides_everything_else() {
        let mut view = ViewState::new();
        view.enter(ViewMode::Feed);
        let t = view.enter(ViewMode::UsernameList);
        assert_eq!(t.from, Some(ViewMode::Feed));
        assert_eq!(t.show, vec![Container::Usernames]);
        assert!(t.hide.contains(&Container::Posts));
        assert!(t.hide.contains(&Container::Compose));
        assert!(t.hide.contains(&Container::Profile));
        assert!(t.is_change());
    }

    #[test]
    fn test_compose_shared_by_feed_and_profile() {
        assert!(ViewMode::Feed.shows(Container::Compose));
        assert!(ViewMode::Profile.shows(Container::Compose));
        assert!(!ViewMode::UsernameList.shows(Container::Compose));
    }

    #[test]
    fn test_feed_hides_profile_header() {
        let mut view = ViewState::new();
        view.enter(ViewMode::Profile);
        let t = view.enter(ViewMode::Feed);
        assert_eq!(t.hide, vec![Container::Profile, Container::Usernames]);
        assert!(view.is(ViewMode::Feed));
    }

    #[test]
    fn test_reentering_is_not_a_change() {
        let mut view = ViewState::new();
        view.enter(ViewMode::Feed);
        let t = view.enter(ViewMode::Feed);
        assert!(!t.is_change());
    }
}
