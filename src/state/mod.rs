// SPDX-License-Identifier: MPL-2.0

mod session;
pub mod settings;

pub use session::Credentials;
pub use settings::AppSettings;
