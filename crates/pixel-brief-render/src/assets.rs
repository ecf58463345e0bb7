//! Theme stylesheet and client script.

use crate::templates::RenderError;

/// URL the configured background image is served from.
pub const BACKGROUND_URL: &str = "/assets/background";

const FALLBACK_BACKGROUND: &str = "background: linear-gradient(to bottom, #87CEEB, #E0F7FA);";

/// Retro theme assets.
pub struct ThemeAssets;

impl ThemeAssets {
    /// Generate the theme stylesheet.
    ///
    /// With `has_background` the page uses the served background image,
    /// otherwise a sky gradient.
    pub fn stylesheet(has_background: bool) -> String {
        let background = if has_background {
            format!(
                "background-image: url(\"{BACKGROUND_URL}\");\n  background-size: cover;\n  background-repeat: no-repeat;\n  background-attachment: fixed;"
            )
        } else {
            FALLBACK_BACKGROUND.to_string()
        };

        format!("{THEME_CSS}\nbody {{\n  {background}\n}}\n")
    }

    /// Generate the stylesheet, minified when asked.
    pub fn build_stylesheet(has_background: bool, minify: bool) -> Result<String, RenderError> {
        let css = Self::stylesheet(has_background);
        if minify {
            Self::minify_css(&css)
        } else {
            Ok(css)
        }
    }

    /// Client script driving the live preview, tabs and history feed.
    pub fn script() -> &'static str {
        APP_JS
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, RenderError> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| RenderError::Css(format!("parse error: {}", e)))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| RenderError::Css(format!("minify error: {}", e)))?;

        Ok(minified.code)
    }
}

const THEME_CSS: &str = r#"@import url('https://fonts.googleapis.com/css2?family=VT323&display=swap');

:root {
  --ink: #1A237E;
  --pop: #FF6F00;
  --paper: rgba(255, 255, 255, 0.9);
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: 'Courier New', monospace;
  color: var(--ink);
  min-height: 100vh;
}

h1, h2, h3, h4 {
  font-family: 'VT323', 'Courier New', monospace;
  color: var(--ink);
  text-transform: uppercase;
}

.site-header {
  text-align: center;
  padding-top: 2rem;
}

.site-header h1 {
  margin-bottom: 5px;
}

.tagline {
  font-size: 0.8rem;
  font-weight: bold;
  margin: 0 0 20px;
}

.app {
  padding: 1rem 2rem 5rem;
}

/* Tabs */
.tabs {
  margin-bottom: 1rem;
}

.tab {
  background-color: rgba(255, 255, 255, 0.5);
  border: 2px solid var(--ink);
  color: var(--ink);
  margin-right: 5px;
  padding: 0.4rem 0.9rem;
  font-family: 'Courier New', monospace;
  font-weight: bold;
  cursor: pointer;
}

.tab.active {
  background-color: var(--pop);
  color: #FFFFFF;
}

.columns {
  display: grid;
  grid-template-columns: 1.2fr 1fr;
  gap: 1.5rem;
  align-items: start;
}

/* Form */
.grid {
  display: grid;
  gap: 0.5rem;
}

.grid-2 {
  grid-template-columns: 0.4fr 0.6fr;
}

.grid-3 {
  grid-template-columns: 0.5fr 0.25fr 0.25fr;
}

label {
  display: block;
  margin-bottom: 0.75rem;
  font-weight: bold;
  font-size: 0.9rem;
}

input, textarea, select {
  display: block;
  width: 100%;
  margin-top: 8px;
  padding: 0.4rem;
  background-color: #FFFFFF;
  color: #000000;
  border: 2px solid var(--ink);
  border-radius: 0;
  font-family: 'Courier New', monospace;
  caret-color: var(--pop);
}

.optional {
  background-color: rgba(255, 255, 255, 0.6);
  border: 1px dashed var(--ink);
  padding: 0.5rem;
  margin-bottom: 1rem;
}

.actions {
  display: grid;
  grid-template-columns: 1fr 1fr;
  gap: 0.5rem;
}

button.primary, #reload-history {
  background-color: var(--pop);
  color: #FFFFFF;
  border: 2px solid var(--ink);
  border-radius: 0;
  padding: 0.6rem;
  font-family: 'Courier New', monospace;
  font-weight: bold;
  text-transform: uppercase;
  box-shadow: 4px 4px 0 var(--ink);
  transition: all 0.1s;
  cursor: pointer;
}

button.primary:hover {
  transform: translate(2px, 2px);
  box-shadow: 2px 2px 0 var(--ink);
}

button.primary:active {
  transform: translate(4px, 4px);
  box-shadow: none;
}

button:disabled {
  opacity: 0.5;
  cursor: not-allowed;
}

/* Flash */
.flash {
  border: 2px solid var(--ink);
  padding: 0.5rem 1rem;
  margin-bottom: 1rem;
  background: var(--paper);
  font-weight: bold;
}

.flash-warn, .flash-error {
  border-color: var(--pop);
}

/* Preview card */
.preview-card {
  background-color: var(--paper);
  border: 2px solid var(--ink);
  padding: 1.5rem;
  box-shadow: 8px 8px 0 rgba(26, 35, 126, 0.2);
}

.preview-title {
  border-bottom: 2px dashed var(--ink);
  padding-bottom: 10px;
  margin-bottom: 10px;
  font-weight: bold;
  font-size: 1.2rem;
}

.preview-header {
  color: var(--pop);
  margin: 0;
}

.tight {
  margin: 0;
}

.mood {
  background: #E0F7FA;
  display: inline-block;
  padding: 2px 8px;
  border: 1px solid var(--ink);
}

hr.dashed {
  border: 0;
  border-top: 2px dashed var(--ink);
  margin: 15px 0;
}

.subtext {
  white-space: pre-wrap;
}

.note {
  background: #FFF3E0;
  padding: 10px;
  border: 1px solid var(--pop);
  margin-top: 10px;
  font-size: 0.9rem;
}

/* History */
table.history {
  width: 100%;
  border-collapse: collapse;
  background: var(--paper);
}

table.history th, table.history td {
  border: 1px solid var(--ink);
  padding: 0.3rem 0.5rem;
  text-align: left;
}
"#;

const APP_JS: &str = r#"(function () {
  const form = document.getElementById('brief-form');
  const preview = document.getElementById('preview');
  const previewError = document.getElementById('preview-error');
  const history = document.getElementById('history');

  document.querySelectorAll('.tab').forEach((tab) => {
    tab.addEventListener('click', () => {
      document.querySelectorAll('.tab').forEach((t) => t.classList.remove('active'));
      document.querySelectorAll('.tab-panel').forEach((p) => { p.hidden = true; });
      tab.classList.add('active');
      document.getElementById('tab-' + tab.dataset.tab).hidden = false;
    });
  });

  async function reloadHistory() {
    const res = await fetch('/history');
    if (res.ok) history.innerHTML = await res.text();
  }

  document.getElementById('reload-history').addEventListener('click', reloadHistory);

  if (!form) return;

  const catalog = JSON.parse(form.dataset.catalog || '[]');
  const platform = form.elements['platform'];
  const layout = form.elements['layout'];
  const customSize = form.elements['custom_size'];
  const orderName = form.elements['order_name'];
  const exportButton = form.querySelector('button.export');

  function syncLayouts() {
    const entry = catalog.find((p) => p.name === platform.value);
    if (!entry) return;
    const current = layout.value;
    layout.innerHTML = '';
    entry.layouts.forEach((name) => {
      const opt = document.createElement('option');
      opt.value = name;
      opt.textContent = name;
      if (name === current) opt.selected = true;
      layout.appendChild(opt);
    });
  }

  function syncControls() {
    customSize.hidden = !(platform.value === 'Other' || layout.value === 'Custom');
    const ready = orderName.value.trim().length > 0;
    exportButton.disabled = !ready;
    exportButton.textContent = ready
      ? '📥 DOWNLOAD WORD DOC'
      : '📥 DOWNLOAD (ENTER NAME FIRST)';
  }

  let pending = null;
  async function refreshPreview() {
    if (pending) pending.abort();
    pending = new AbortController();
    try {
      const res = await fetch('/preview', {
        method: 'POST',
        body: new URLSearchParams(new FormData(form)),
        signal: pending.signal,
      });
      const body = await res.text();
      if (res.ok) {
        previewError.hidden = true;
        preview.innerHTML = body;
      } else {
        // keep the last good card, show the reason as text only
        const parsed = new DOMParser().parseFromString(body, 'text/html');
        previewError.textContent = parsed.body.textContent;
        previewError.hidden = false;
      }
    } catch (_) {
      // superseded by a newer request
    }
  }

  function onEdit(event) {
    if (event.target === platform) syncLayouts();
    syncControls();
    refreshPreview();
  }

  form.addEventListener('input', onEdit);
  form.addEventListener('change', onEdit);

  const scheme = location.protocol === 'https:' ? 'wss:' : 'ws:';
  function connectFeed() {
    const feed = new WebSocket(scheme + '//' + location.host + '/__feed');
    feed.onmessage = (event) => {
      const msg = JSON.parse(event.data);
      if (msg.type === 'order_saved') reloadHistory();
    };
    feed.onclose = () => setTimeout(connectFeed, 2000);
  }
  connectFeed();
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_gradient_without_background() {
        let css = ThemeAssets::stylesheet(false);
        assert!(css.contains("linear-gradient(to bottom, #87CEEB, #E0F7FA)"));
        assert!(!css.contains(BACKGROUND_URL));
    }

    #[test]
    fn references_served_background() {
        let css = ThemeAssets::stylesheet(true);
        assert!(css.contains("url(\"/assets/background\")"));
        assert!(!css.contains("linear-gradient"));
    }

    #[test]
    fn minifies_css() {
        let css = ThemeAssets::build_stylesheet(false, true).unwrap();
        assert!(css.len() < ThemeAssets::stylesheet(false).len());
        assert!(css.contains(".preview-card"));
    }

    #[test]
    fn script_posts_to_preview() {
        assert!(ThemeAssets::script().contains("'/preview'"));
    }

    #[test]
    fn script_shows_preview_errors_as_text() {
        let script = ThemeAssets::script();
        assert!(script.contains("if (res.ok)"));
        assert!(script.contains("previewError.textContent"));
    }

    #[test]
    fn script_reconnects_feed() {
        assert!(ThemeAssets::script().contains("feed.onclose = () => setTimeout(connectFeed"));
    }
}
