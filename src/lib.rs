//! Synchronizes the game's aggregated localization document with
//! per-language gettext catalogs.

pub mod error;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod services;
