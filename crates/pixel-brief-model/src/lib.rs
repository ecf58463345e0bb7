//! Creative brief form model.
//!
//! This crate turns raw form fields into a validated [`Brief`] and derives the
//! strings shared by the preview, the exported document and the record store.

pub mod brief;
pub mod deadline;
pub mod platform;

pub use brief::{Brief, BriefError, BriefForm};
pub use deadline::Deadline;
pub use platform::{platforms, Platform, PlatformEntry, UnknownPlatform, CUSTOM_LAYOUT};
