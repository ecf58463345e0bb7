//! Template engine for the builder page and the live preview.

use minijinja::{context, Environment};
use pixel_brief_model::{platforms, Brief, BriefForm, Platform, PlatformEntry};
use pixel_brief_store::OrderRecord;
use serde::Serialize;

/// Errors that can occur while rendering markup.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to serialize page data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to process stylesheet: {0}")]
    Css(String),
}

/// Strings shown in the preview card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewContext {
    pub header: String,
    pub deadline: String,
    pub specs: String,
    pub mood: Option<String>,
    pub headline: Option<String>,
    pub subtext: Option<String>,
    pub price: Option<String>,
    pub contact_info: Option<String>,
    pub design_notes: Option<String>,
    pub ref_link: Option<String>,
    /// Set only for http(s) links, other schemes render as plain text
    pub ref_href: Option<String>,
}

impl From<&Brief> for PreviewContext {
    fn from(brief: &Brief) -> Self {
        let ref_href = brief
            .ref_link
            .as_deref()
            .map(str::trim)
            .filter(|link| link.starts_with("http://") || link.starts_with("https://"))
            .map(str::to_string);

        Self {
            header: brief.header(),
            deadline: brief.deadline.display(),
            specs: brief.specs(),
            mood: brief.mood.clone(),
            headline: brief.headline.clone(),
            subtext: brief.subtext.clone(),
            price: brief.price.clone(),
            contact_info: brief.contact_info.clone(),
            design_notes: brief.design_notes.clone(),
            ref_link: brief.ref_link.clone(),
            ref_href,
        }
    }
}

/// Flash message kind, doubles as a CSS modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Ok,
    Warn,
    Error,
}

/// One-shot status message shown above the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Ok,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Everything the builder page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    /// Browser tab title
    pub title: String,
    /// Page heading, defaults to the title
    pub heading: String,
    /// Optional line under the heading
    pub tagline: Option<String>,
    /// Catalog name of the selected platform
    pub platform: &'static str,
    /// Current form values
    pub form: BriefForm,
    /// Preview card, absent while the form does not validate
    pub preview: Option<PreviewContext>,
    /// Layout options for the selected platform
    pub layouts: Vec<&'static str>,
    /// Whether the custom size input is shown
    pub show_custom_size: bool,
    /// Whether the export button is enabled
    pub export_ready: bool,
    pub flash: Option<Flash>,
    /// Saved rows for the history tab
    pub history: Vec<OrderRecord>,
    /// Active tab, `builder` or `history`
    pub tab: &'static str,
}

impl PageContext {
    /// Build the page state from raw form values.
    ///
    /// A form that fails validation still renders: the error becomes the
    /// flash message and the preview is left out.
    pub fn new(title: impl Into<String>, form: BriefForm) -> Self {
        let platform = form.platform.parse::<Platform>().unwrap_or_default();

        let (preview, flash) = match form.clone().into_brief() {
            Ok(brief) => (Some(PreviewContext::from(&brief)), None),
            Err(err) => (None, Some(Flash::error(err.to_string()))),
        };

        let layout = if form.layout.is_empty() {
            platform.default_layout()
        } else {
            form.layout.as_str()
        };
        let show_custom_size = platform.takes_custom_size(layout);
        let export_ready = preview.is_some() && !form.order_name.trim().is_empty();

        let title = title.into();
        Self {
            heading: title.clone(),
            title,
            tagline: None,
            platform: platform.name(),
            layouts: platform.layouts().to_vec(),
            show_custom_size,
            export_ready,
            preview,
            flash,
            form,
            history: Vec::new(),
            tab: "builder",
        }
    }

    /// Use a page heading distinct from the tab title.
    pub fn with_heading(mut self, heading: impl Into<String>, tagline: Option<String>) -> Self {
        self.heading = heading.into();
        self.tagline = tagline;
        self
    }

    /// Replace the flash message.
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    /// Attach saved rows for the history tab.
    pub fn with_history(mut self, history: Vec<OrderRecord>) -> Self {
        self.history = history;
        self
    }

    /// Open the page on the history tab.
    pub fn on_history_tab(mut self) -> Self {
        self.tab = "history";
        self
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
    catalog: Vec<PlatformEntry>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("base.html", BASE_TEMPLATE)
            .expect("Failed to add base template");
        env.add_template("page.html", PAGE_TEMPLATE)
            .expect("Failed to add page template");
        env.add_template("preview.html", PREVIEW_TEMPLATE)
            .expect("Failed to add preview template");
        env.add_template("history.html", HISTORY_TEMPLATE)
            .expect("Failed to add history template");
        env.add_template("preview_error.html", PREVIEW_ERROR_TEMPLATE)
            .expect("Failed to add preview error template");

        Self {
            env,
            catalog: platforms(),
        }
    }

    /// Render the full builder page.
    pub fn render_page(&self, page: &PageContext) -> Result<String, RenderError> {
        let tmpl = self.env.get_template("page.html")?;
        let catalog_json = serde_json::to_string(&self.catalog)?;

        Ok(tmpl.render(context! {
            title => &page.title,
            heading => &page.heading,
            tagline => &page.tagline,
            platform => page.platform,
            form => &page.form,
            preview => &page.preview,
            platforms => &self.catalog,
            layouts => &page.layouts,
            show_custom_size => page.show_custom_size,
            export_ready => page.export_ready,
            flash => &page.flash,
            history => &page.history,
            tab => page.tab,
            catalog_json => catalog_json,
        })?)
    }

    /// Render the preview card fragment for a brief.
    pub fn render_preview(&self, brief: &Brief) -> Result<String, RenderError> {
        let tmpl = self.env.get_template("preview.html")?;
        Ok(tmpl.render(context! {
            preview => PreviewContext::from(brief),
        })?)
    }

    /// Render the fragment shown in place of a preview for an invalid form.
    pub fn render_preview_error(&self, message: &str) -> Result<String, RenderError> {
        let tmpl = self.env.get_template("preview_error.html")?;
        Ok(tmpl.render(context! { message => message })?)
    }

    /// Render the history table fragment.
    pub fn render_history(&self, history: &[OrderRecord]) -> Result<String, RenderError> {
        let tmpl = self.env.get_template("history.html")?;
        Ok(tmpl.render(context! { history => history })?)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="/assets/theme.css">
</head>
<body>
  <header class="site-header">
    <h1>🌴 {{ heading }} 🌴</h1>
    {% if tagline %}<p class="tagline">{{ tagline }}</p>{% endif %}
  </header>
  <main class="app">
    {% block content %}{% endblock %}
  </main>
  <script src="/assets/app.js"></script>
</body>
</html>"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<nav class="tabs">
  <button type="button" class="tab{% if tab == "builder" %} active{% endif %}" data-tab="builder">📝 BRIEF BUILDER</button>
  <button type="button" class="tab{% if tab == "history" %} active{% endif %}" data-tab="history">💾 MEMORY CARD</button>
</nav>

<section id="tab-builder" class="tab-panel"{% if tab != "builder" %} hidden{% endif %}>
  {% if flash %}<div class="flash flash-{{ flash.kind }}">{{ flash.message }}</div>{% endif %}
  <div class="columns">
    <form id="brief-form" class="brief-form" method="post" action="/save" data-catalog="{{ catalog_json }}">
      <div class="grid grid-3">
        <label>ORDER NAME
          <input type="text" name="order_name" value="{{ form.order_name }}" placeholder="QC Tet 2026">
        </label>
        <label>DATE
          <input type="date" name="deadline_date" value="{{ form.deadline_date }}">
        </label>
        <label>TIME
          <input type="time" name="deadline_time" value="{{ form.deadline_time }}">
        </label>
      </div>

      <div class="grid grid-2">
        <label>PLATFORM
          <select name="platform">
            {% for p in platforms %}<option value="{{ p.name }}"{% if p.name == platform %} selected{% endif %}>{{ p.name }}</option>
            {% endfor %}
          </select>
        </label>
        <label>LAYOUT / SIZE
          <select name="layout">
            {% for l in layouts %}<option value="{{ l }}"{% if l == form.layout %} selected{% endif %}>{{ l }}</option>
            {% endfor %}
          </select>
          <input type="text" name="custom_size" class="custom-size" value="{{ form.custom_size }}" placeholder="Enter size..."{% if not show_custom_size %} hidden{% endif %}>
        </label>
      </div>

      <label>MOOD / TONE
        <input type="text" name="mood" value="{{ form.mood }}" placeholder="e.g. Luxurious, Retro, Warm Gold">
      </label>
      <label>HEADLINE (Main Text)
        <input type="text" name="headline" value="{{ form.headline }}" placeholder="Title here...">
      </label>
      <label>SUB-TEXT
        <textarea name="subtext" rows="3" placeholder="Secondary details...">{{ form.subtext }}</textarea>
      </label>

      <details class="optional"{% if form.price or form.contact_info or form.design_notes or form.ref_link %} open{% endif %}>
        <summary>➕ OPTIONAL INFO (Price, Contact, Notes)</summary>
        <div class="grid grid-2">
          <label>PRICE / PROMO
            <input type="text" name="price" value="{{ form.price }}">
          </label>
          <label>CONTACT INFO
            <input type="text" name="contact_info" value="{{ form.contact_info }}">
          </label>
        </div>
        <label>DESIGNER NOTES
          <textarea name="design_notes" rows="3">{{ form.design_notes }}</textarea>
        </label>
        <label>REF LINK
          <input type="text" name="ref_link" value="{{ form.ref_link }}">
        </label>
      </details>

      <div class="actions">
        <button type="submit" class="primary" formaction="/save">💾 SAVE TO DB</button>
        <button type="submit" class="primary export" formaction="/export"{% if not export_ready %} disabled{% endif %}>{% if export_ready %}📥 DOWNLOAD WORD DOC{% else %}📥 DOWNLOAD (ENTER NAME FIRST){% endif %}</button>
      </div>
    </form>

    <div class="preview-column">
    <div id="preview-error" class="flash flash-error" hidden></div>
    <div id="preview">
      {% if preview %}{% include "preview.html" %}{% endif %}
    </div>
    </div>
  </div>
</section>

<section id="tab-history" class="tab-panel"{% if tab != "history" %} hidden{% endif %}>
  <h3>💾 MEMORY CARD (HISTORY)</h3>
  <div id="history">
    {% include "history.html" %}
  </div>
  <button type="button" id="reload-history">🔄 RELOAD DATA</button>
</section>
{% endblock %}"##;

const PREVIEW_TEMPLATE: &str = r##"<div class="preview-card">
  <div class="preview-title">👁️ LIVE PREVIEW</div>
  <h3 class="preview-header">{{ preview.header }}</h3>
  <p class="tight"><b>📅 D-Line:</b> {{ preview.deadline }}</p>
  <p class="tight"><b>🕹️ Specs:</b> {{ preview.specs }}</p>
  {% if preview.mood %}<p class="mood">✨ {{ preview.mood }}</p>{% endif %}
  <hr class="dashed">
  {% if preview.headline %}<h2 class="tight">📢 {{ preview.headline }}</h2>{% endif %}
  {% if preview.subtext %}<p class="subtext">{{ preview.subtext }}</p>{% endif %}
  {% if preview.price %}<b>💰 {{ preview.price }}</b><br>{% endif %}
  {% if preview.contact_info %}<b>📞 {{ preview.contact_info }}</b>{% endif %}
  {% if preview.design_notes %}<div class="note"><b>⚠️ NOTE:</b> {{ preview.design_notes }}</div>{% endif %}
  {% if preview.ref_href %}<br>🔗 <a href="{{ preview.ref_href }}" rel="noopener noreferrer" target="_blank">Reference Link</a>
  {% elif preview.ref_link %}<br>🔗 {{ preview.ref_link }}{% endif %}
</div>"##;

const PREVIEW_ERROR_TEMPLATE: &str = r##"<p class="preview-error">{{ message }}</p>"##;

const HISTORY_TEMPLATE: &str = r##"{% if history %}<table class="history">
  <thead>
    <tr><th>id</th><th>order_name</th><th>platform</th><th>deadline</th><th>content_summary</th><th>created_at</th></tr>
  </thead>
  <tbody>
  {% for row in history %}
    <tr><td>{{ row.id }}</td><td>{{ row.order_name or "" }}</td><td>{{ row.platform or "" }}</td><td>{{ row.deadline or "" }}</td><td>{{ row.content_summary or "" }}</td><td>{{ row.created_at or "" }}</td></tr>
  {% endfor %}
  </tbody>
</table>{% else %}<p class="empty">No saved briefs yet.</p>{% endif %}"##;
