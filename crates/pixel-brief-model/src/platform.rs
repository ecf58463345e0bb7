//! Target platforms and their layout options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A publishing platform a brief is designed for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Facebook,
    Instagram,
    Offline,
    Digital,
    Other,
}

/// Layout option that asks for a free-form size.
pub const CUSTOM_LAYOUT: &str = "Custom";

impl Platform {
    /// All platforms in catalog order.
    pub const ALL: [Platform; 5] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::Offline,
        Platform::Digital,
        Platform::Other,
    ];

    /// Display name, also used as the stored value.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Offline => "Offline",
            Platform::Digital => "Digital",
            Platform::Other => "Other",
        }
    }

    /// Layout options offered for this platform, first one is the default.
    pub fn layouts(&self) -> &'static [&'static str] {
        match self {
            Platform::Facebook => &["Single Image", "Album Grid", "Cover", "Story"],
            Platform::Instagram => &["Post (Square)", "Post (Portrait)", "Story"],
            Platform::Offline => &["Standee", "Poster", "Backdrop"],
            Platform::Digital => &["TV Screen", "Web Banner"],
            Platform::Other => &[CUSTOM_LAYOUT],
        }
    }

    /// Default layout for this platform.
    pub fn default_layout(&self) -> &'static str {
        self.layouts()[0]
    }

    /// Whether `layout` is one of this platform's options.
    pub fn has_layout(&self, layout: &str) -> bool {
        self.layouts().contains(&layout)
    }

    /// Whether a custom size input applies to this platform/layout pair.
    pub fn takes_custom_size(&self, layout: &str) -> bool {
        *self == Platform::Other || layout == CUSTOM_LAYOUT
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a platform name is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Serializable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformEntry {
    /// Platform display name
    pub name: &'static str,
    /// Layout options in order
    pub layouts: &'static [&'static str],
}

/// The ordered platform catalog.
pub fn platforms() -> Vec<PlatformEntry> {
    Platform::ALL
        .iter()
        .map(|p| PlatformEntry {
            name: p.name(),
            layouts: p.layouts(),
        })
        .collect()
}
