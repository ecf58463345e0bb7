//! Raw form fields and the validated brief derived from them.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::platform::{Platform, UnknownPlatform};

/// Characters of the headline kept in a stored summary.
const SUMMARY_CHARS: usize = 30;

/// Placeholder shown in the header while no order name is entered.
const HEADER_NAME_PLACEHOLDER: &str = "NAME";

/// Fallback file stem when the order name has no usable characters.
const FALLBACK_FILE_STEM: &str = "Order";

/// Form fields as submitted by the page or read from a brief file.
///
/// Every field is optional on the wire and defaults to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefForm {
    pub order_name: String,
    /// `YYYY-MM-DD`
    pub deadline_date: String,
    /// `HH:MM`
    pub deadline_time: String,
    pub platform: String,
    pub layout: String,
    pub custom_size: String,
    pub mood: String,
    pub headline: String,
    pub subtext: String,
    pub price: String,
    pub contact_info: String,
    pub design_notes: String,
    pub ref_link: String,
}

/// Errors raised while validating a brief.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BriefError {
    #[error(transparent)]
    UnknownPlatform(#[from] UnknownPlatform),

    #[error("Layout {layout:?} is not offered for {platform}")]
    UnknownLayout { platform: Platform, layout: String },

    #[error("Invalid deadline {field}: {value:?}")]
    InvalidDeadline { field: &'static str, value: String },

    #[error("Order name is required")]
    MissingOrderName,
}

/// A validated creative brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brief {
    pub order_name: String,
    pub deadline: Deadline,
    pub platform: Platform,
    /// Resolved layout, `Custom: <size>` when a custom size was given
    pub layout: String,
    pub mood: Option<String>,
    pub headline: Option<String>,
    pub subtext: Option<String>,
    pub price: Option<String>,
    pub contact_info: Option<String>,
    pub design_notes: Option<String>,
    pub ref_link: Option<String>,
}

impl BriefForm {
    /// Form state of a fresh page: default platform and deadline.
    pub fn initial() -> Self {
        let deadline = Deadline::default();
        let platform = Platform::default();
        Self {
            deadline_date: deadline.date_input(),
            deadline_time: deadline.time_input(),
            platform: platform.name().to_string(),
            layout: platform.default_layout().to_string(),
            ..Self::default()
        }
    }

    /// Validate the form and resolve derived fields.
    pub fn into_brief(self) -> Result<Brief, BriefError> {
        let platform = if self.platform.trim().is_empty() {
            Platform::default()
        } else {
            self.platform.parse::<Platform>()?
        };

        let layout = match self.layout.trim() {
            "" => platform.default_layout(),
            layout => platform
                .layouts()
                .iter()
                .copied()
                .find(|l| *l == layout)
                .ok_or_else(|| BriefError::UnknownLayout {
                    platform,
                    layout: layout.to_string(),
                })?,
        };

        let custom_size = self.custom_size.trim();
        let layout = if platform.takes_custom_size(layout) && !custom_size.is_empty() {
            format!("Custom: {custom_size}")
        } else {
            layout.to_string()
        };

        let default_deadline = Deadline::default();
        let date = parse_or(&self.deadline_date, default_deadline.date, "date", |s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
        })?;
        let time = parse_or(&self.deadline_time, default_deadline.time, "time", |s| {
            NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .ok()
        })?;

        Ok(Brief {
            order_name: self.order_name.trim().to_string(),
            deadline: Deadline::new(date, time),
            platform,
            layout,
            mood: non_empty(self.mood),
            headline: non_empty(self.headline),
            subtext: non_empty(self.subtext),
            price: non_empty(self.price),
            contact_info: non_empty(self.contact_info),
            design_notes: non_empty(self.design_notes),
            ref_link: non_empty(self.ref_link),
        })
    }
}

impl Brief {
    /// `[BRIEF] - dd/mm - <order name>`
    pub fn header(&self) -> String {
        let name = if self.order_name.is_empty() {
            HEADER_NAME_PLACEHOLDER
        } else {
            &self.order_name
        };
        format!("[BRIEF] - {} - {}", self.deadline.short_date(), name)
    }

    /// `<platform> > <layout>`, the preview specs line.
    pub fn specs(&self) -> String {
        format!("{} > {}", self.platform, self.layout)
    }

    /// Short description stored alongside a saved order.
    pub fn summary(&self) -> String {
        match &self.headline {
            Some(headline) => {
                let head: String = headline.chars().take(SUMMARY_CHARS).collect();
                format!("{head}...")
            }
            None => "Brief".to_string(),
        }
    }

    /// Order name reduced to characters safe for a file name.
    pub fn safe_file_stem(&self) -> String {
        let stem: String = self
            .order_name
            .chars()
            .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
            .collect();
        let stem = stem.trim();
        if stem.is_empty() {
            FALLBACK_FILE_STEM.to_string()
        } else {
            stem.to_string()
        }
    }

    /// `Brief_<stem>.docx`
    pub fn export_file_name(&self) -> String {
        format!("Brief_{}.docx", self.safe_file_stem())
    }

    /// Saving and exporting both need an order name.
    pub fn require_order_name(&self) -> Result<(), BriefError> {
        if self.order_name.is_empty() {
            Err(BriefError::MissingOrderName)
        } else {
            Ok(())
        }
    }

    /// Whether any of the note section fields is set.
    pub fn has_notes(&self) -> bool {
        self.design_notes.is_some() || self.ref_link.is_some()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_or<T>(
    raw: &str,
    fallback: T,
    field: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, BriefError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(fallback);
    }
    parse(raw).ok_or_else(|| BriefError::InvalidDeadline {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form() -> BriefForm {
        BriefForm {
            order_name: "QC Tet 2026".to_string(),
            deadline_date: "2026-01-20".to_string(),
            deadline_time: "17:00".to_string(),
            platform: "Facebook".to_string(),
            layout: "Cover".to_string(),
            ..BriefForm::default()
        }
    }

    #[test]
    fn builds_header_and_specs() {
        let brief = form().into_brief().unwrap();

        assert_eq!(brief.header(), "[BRIEF] - 20/01 - QC Tet 2026");
        assert_eq!(brief.specs(), "Facebook > Cover");
        assert_eq!(brief.deadline.display(), "20/01/2026 17:00");
    }

    #[test]
    fn header_uses_placeholder_without_name() {
        let brief = BriefForm {
            order_name: "   ".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.header(), "[BRIEF] - 20/01 - NAME");
        assert_eq!(brief.require_order_name(), Err(BriefError::MissingOrderName));
    }

    #[test]
    fn custom_size_overrides_layout() {
        let brief = BriefForm {
            platform: "Other".to_string(),
            layout: String::new(),
            custom_size: "1200x628 px".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.layout, "Custom: 1200x628 px");
    }

    #[test]
    fn empty_custom_size_keeps_layout() {
        let brief = BriefForm {
            platform: "Other".to_string(),
            layout: "Custom".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.layout, "Custom");
    }

    #[test]
    fn custom_size_ignored_for_fixed_layouts() {
        let brief = BriefForm {
            custom_size: "999".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.layout, "Cover");
    }

    #[test]
    fn rejects_layout_of_other_platform() {
        let err = BriefForm {
            layout: "Standee".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap_err();

        assert!(matches!(err, BriefError::UnknownLayout { .. }));
    }

    #[test]
    fn rejects_unknown_platform() {
        let err = BriefForm {
            platform: "Fax".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap_err();

        assert!(matches!(err, BriefError::UnknownPlatform(_)));
    }

    #[test]
    fn rejects_bad_deadline() {
        let err = BriefForm {
            deadline_date: "20/01/2026".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap_err();

        assert_eq!(
            err,
            BriefError::InvalidDeadline {
                field: "date",
                value: "20/01/2026".to_string()
            }
        );
    }

    #[test]
    fn accepts_time_with_seconds() {
        let brief = BriefForm {
            deadline_time: "08:30:00".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.deadline.time_input(), "08:30");
    }

    #[test]
    fn blank_optionals_become_none() {
        let brief = BriefForm {
            mood: "  ".to_string(),
            price: "99k".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.mood, None);
        assert_eq!(brief.price.as_deref(), Some("99k"));
        assert!(!brief.has_notes());
    }

    #[test]
    fn summary_truncates_by_characters() {
        let brief = BriefForm {
            headline: "Khuyến mãi Tết Nguyên Đán cực lớn cho mọi nhà".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.summary(), "Khuyến mãi Tết Nguyên Đán cực ...");
    }

    #[test]
    fn summary_without_headline() {
        let brief = form().into_brief().unwrap();
        assert_eq!(brief.summary(), "Brief");
    }

    #[test]
    fn file_stem_drops_unsafe_characters() {
        let brief = BriefForm {
            order_name: " Tết/Sale: 50%! ".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.safe_file_stem(), "TếtSale 50");
        assert_eq!(brief.export_file_name(), "Brief_TếtSale 50.docx");
    }

    #[test]
    fn file_stem_falls_back_to_order() {
        let brief = BriefForm {
            order_name: "***".to_string(),
            ..form()
        }
        .into_brief()
        .unwrap();

        assert_eq!(brief.export_file_name(), "Brief_Order.docx");
    }

    #[test]
    fn initial_form_uses_defaults() {
        let form = BriefForm::initial();
        assert_eq!(form.platform, "Facebook");
        assert_eq!(form.layout, "Single Image");
        assert_eq!(form.deadline_time, "17:00");
    }

    #[test]
    fn reads_form_from_toml() {
        let form: BriefForm = toml::from_str(
            r#"
order_name = "Pool Party"
platform = "Instagram"
layout = "Story"
headline = "Splash"
"#,
        )
        .unwrap();

        let brief = form.into_brief().unwrap();
        assert_eq!(brief.specs(), "Instagram > Story");
        assert_eq!(brief.headline.as_deref(), Some("Splash"));
    }
}
