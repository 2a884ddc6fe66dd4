// SPDX-License-Identifier: MPL-2.0

#![allow(dead_code)]

pub const APP_ID: &str = "io.github.murmur.Murmur";
pub const APP_NAME: &str = "Murmur";

#[cfg(feature = "devel")]
pub const IS_DEVEL: bool = true;
#[cfg(not(feature = "devel"))]
pub const IS_DEVEL: bool = false;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
pub const USER_AGENT: &str = "Murmur/0.1 (Feed Client)";

/// Posts requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Quiet period a scroll burst must settle for before the near-bottom check runs.
pub const SCROLL_QUIET_MS: u64 = 200;

/// Distance from the bottom (in pixels) under which more posts are requested.
pub const SCROLL_THRESHOLD: f64 = 100.0;
