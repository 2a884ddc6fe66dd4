// SPDX-License-Identifier: MPL-2.0

use crate::feed::{FeedController, LoadMore, ScrollGeometry, ScrollTrigger};
use crate::network::{Filter, FollowDirection, Reaction, RemoteStore, ToggleRequest, UserId};
use crate::state::AppSettings;
use crate::ui::Renderer;
use std::ops::ControlFlow;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

const HELP: &str = "\
commands:
  all | mine                      switch feed
  more                            load the next page (feed only)
  scroll <top> <height> <view>    report the feed's scroll position
  like <post> | dislike <post>    toggle a reaction
  follow <user>                   toggle following a user
  profile <user>                  open a profile
  following | followers           list follow relations
  post <text...>                  publish a post
  as <username>                   set who posts are published as
  help | quit";

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("not a number: {0}")]
    InvalidNumber(String),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Filter(Filter),
    More,
    Scroll(ScrollGeometry),
    Toggle(ToggleRequest),
    Profile(UserId),
    Relations(FollowDirection),
    Post(String),
    As(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => return Ok(None),
            "all" => Self::Filter(Filter::AllPosts),
            "mine" => Self::Filter(Filter::MyPosts),
            "more" => Self::More,
            "scroll" => {
                let mut parts = rest.split_whitespace();
                let mut next = |name| -> Result<f64, CommandError> {
                    let raw = parts.next().ok_or(CommandError::MissingArgument(name))?;
                    raw.parse()
                        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
                };
                Self::Scroll(ScrollGeometry {
                    scroll_top: next("top")?,
                    scroll_height: next("height")?,
                    viewport_height: next("view")?,
                })
            }
            "like" | "dislike" => {
                let reaction = if word == "like" {
                    Reaction::Like
                } else {
                    Reaction::Dislike
                };
                Self::Toggle(ToggleRequest::Reaction {
                    target_post_id: parse_id(rest, "post")?,
                    reaction,
                })
            }
            "follow" | "unfollow" => Self::Toggle(ToggleRequest::Follow {
                target_user_id: parse_id(rest, "user")?,
            }),
            "profile" => Self::Profile(parse_id(rest, "user")?),
            "following" => Self::Relations(FollowDirection::Following),
            "followers" => Self::Relations(FollowDirection::Followers),
            // Empty bodies are accepted here; the controller rejects them.
            "post" => Self::Post(rest.to_string()),
            "as" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("username"));
                }
                Self::As(rest.to_string())
            }
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_id(raw: &str, name: &'static str) -> Result<u64, CommandError> {
    let raw = raw
        .split_whitespace()
        .next()
        .ok_or(CommandError::MissingArgument(name))?;
    raw.parse()
        .map_err(|_| CommandError::InvalidNumber(raw.to_string()))
}

/// The host side of a session: turns user input and scroll signals into
/// controller operations, one at a time.
pub struct FeedApp<S: RemoteStore, R: Renderer> {
    controller: FeedController<S, R>,
    trigger: ScrollTrigger,
    settings: AppSettings,
}

impl<S: RemoteStore, R: Renderer> FeedApp<S, R> {
    pub fn new(
        store: S,
        renderer: R,
        settings: AppSettings,
    ) -> (Self, mpsc::UnboundedReceiver<LoadMore>) {
        let controller = FeedController::new(store, renderer, settings.page_size);
        let (trigger, load_more) = ScrollTrigger::new(
            settings.scroll_quiet(),
            settings.scroll_threshold,
            controller.busy_indicator(),
        );

        let app = Self {
            controller,
            trigger,
            settings,
        };
        (app, load_more)
    }

    #[allow(dead_code)]
    pub fn controller(&self) -> &FeedController<S, R> {
        &self.controller
    }

    /// Run until the input ends or the user quits.
    pub async fn run<I>(
        &mut self,
        authenticated: bool,
        input: I,
        mut load_more: mpsc::UnboundedReceiver<LoadMore>,
    ) where
        I: AsyncBufRead + Unpin,
    {
        // Failures are already surfaced by the controller.
        let _ = self.controller.start(authenticated).await;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if self.handle_line(&line).await.is_break() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        log::error!("Failed to read input: {e}");
                        break;
                    }
                },
                Some(request) = load_more.recv() => {
                    let _ = self.controller.load_more(request).await;
                }
            }
        }

        self.trigger.cancel();
        log::info!("Session ended");
    }

    async fn handle_line(&mut self, line: &str) -> ControlFlow<()> {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle_command(command).await,
            Ok(None) => ControlFlow::Continue(()),
            Err(e) => {
                eprintln!("{e}");
                ControlFlow::Continue(())
            }
        }
    }

    async fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        let _ = match command {
            Command::Filter(filter) => self.controller.change_filter(filter).await,
            Command::More => self.controller.more().await,
            Command::Scroll(geometry) => {
                self.trigger
                    .on_scroll(geometry, self.controller.active_filter());
                Ok(())
            }
            Command::Toggle(request) => self.controller.handle_toggle(request).await,
            Command::Profile(user_id) => self.controller.fetch_profile(user_id).await,
            Command::Relations(direction) => {
                self.controller.list_follow_relations(direction).await
            }
            Command::Post(body) => {
                let poster = self.settings.username.clone().unwrap_or_default();
                self.controller.submit_new_post(&body, &poster).await
            }
            Command::As(username) => {
                self.settings.username = Some(username);
                if let Err(e) = self.settings.save() {
                    log::warn!("Failed to save settings: {e}");
                }
                Ok(())
            }
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Quit => return ControlFlow::Break(()),
        };

        ControlFlow::Continue(())
    }
}
