// SPDX-License-Identifier: MPL-2.0

mod busy;
mod controller;
mod pagination;
mod scroll;
mod view;

pub use controller::FeedController;
pub use scroll::{LoadMore, ScrollGeometry, ScrollTrigger};
pub use view::Container;
