use crate::core::BrowserTrait;
use crate::dom::layout::CapturedLayout;
use crate::errors::{ExtractError, Result};
use crate::types::PageIdentity;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Collects identity, markup and per-element layout in a single evaluation so
/// all three describe the same tree state. Each sample names its element so
/// the replay can tell when the reparsed markup has drifted. Layout samples follow
/// `querySelectorAll('*')` order, which is the ordinal the pipeline uses.
/// Returned as a JSON string so the value survives the protocol round trip.
pub const PAGE_CAPTURE_SCRIPT: &str = r#"
(() => {
    const layout = Array.from(document.querySelectorAll('*'), (el) => {
        const sample = { tag: el.localName, rect: null, display: null, visibility: null, error: null };
        try {
            const r = el.getBoundingClientRect();
            sample.rect = { x: r.x, y: r.y, width: r.width, height: r.height };
        } catch (e) {
            sample.rect = null;
        }
        try {
            const style = window.getComputedStyle(el);
            sample.display = style.display;
            sample.visibility = style.visibility;
        } catch (e) {
            sample.error = String(e);
        }
        return sample;
    });
    return JSON.stringify({
        url: location.href,
        title: document.title,
        html: document.documentElement.outerHTML,
        layout,
    });
})()
"#;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CapturedPage {
    pub url: String,
    pub title: String,
    pub html: String,
    pub layout: CapturedLayout,
}

impl CapturedPage {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn identity(&self) -> PageIdentity {
        PageIdentity::new(self.url.clone(), self.title.clone())
    }
}

pub async fn capture_page<B: BrowserTrait>(browser: &B, tab: &B::TabHandle) -> Result<CapturedPage> {
    let value = browser.execute_script(tab, PAGE_CAPTURE_SCRIPT).await?;
    let raw = value.as_str().ok_or_else(|| {
        ExtractError::CaptureFailed(format!("capture script returned {}", value))
    })?;

    let page = CapturedPage::from_json(raw)?;
    debug!(
        url = %page.url,
        html_bytes = page.html.len(),
        samples = page.layout.len(),
        "captured page"
    );
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BrowserConfig, ExtractConfig};
    use crate::dom::DomProcessor;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Browser stand-in that answers the capture script with a canned page.
    struct FakeBrowser {
        capture: Value,
    }

    #[async_trait]
    impl BrowserTrait for FakeBrowser {
        type TabHandle = ();

        async fn launch(&mut self, _config: &BrowserConfig) -> Result<()> {
            Ok(())
        }

        async fn new_tab(&self) -> Result<()> {
            Ok(())
        }

        async fn navigate(&self, _tab: &(), _url: &str) -> Result<()> {
            Ok(())
        }

        async fn execute_script(&self, _tab: &(), script: &str) -> Result<Value> {
            if script == PAGE_CAPTURE_SCRIPT {
                Ok(self.capture.clone())
            } else {
                Err(ExtractError::JavaScriptFailed("unexpected script".to_string()))
            }
        }

        async fn get_url(&self, _tab: &()) -> Result<String> {
            Ok("https://fake.test/login".to_string())
        }

        async fn get_title(&self, _tab: &()) -> Result<String> {
            Ok("Login".to_string())
        }

        fn is_running(&self) -> bool {
            true
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn boxed(width: f64) -> Value {
        json!({ "rect": { "x": 0, "y": 0, "width": width, "height": 20 }, "display": "block", "visibility": "visible" })
    }

    fn login_page() -> Value {
        // html, head, body, form, input, input, button
        let layout = json!([
            boxed(800.0),
            { "rect": { "x": 0, "y": 0, "width": 0, "height": 0 }, "display": "none" },
            boxed(800.0),
            boxed(400.0),
            boxed(200.0),
            boxed(0.0),
            { "rect": { "x": 0, "y": 0, "width": 60, "height": 20 }, "error": "cross-origin" },
        ]);
        let capture = json!({
            "url": "https://fake.test/login",
            "title": "Login",
            "html": r#"<html><head></head><body><form><input name="user" placeholder="User"><input name="token" placeholder="Token"><button data-testid="login">Sign in</button></form></body></html>"#,
            "layout": layout,
        });
        Value::String(capture.to_string())
    }

    fn processor() -> DomProcessor {
        DomProcessor::new(ExtractConfig {
            include_timestamp: false,
            ..ExtractConfig::default()
        })
    }

    #[tokio::test]
    async fn capture_replays_live_layout() {
        let browser = FakeBrowser {
            capture: login_page(),
        };
        let snapshot = processor().capture(&browser, &()).await;

        assert!(snapshot.is_ok());
        assert_eq!(snapshot.title, "Login");
        let selectors: Vec<_> = snapshot.elements.iter().map(|e| e.selector.as_str()).collect();
        // the zero-width token input survives only through its name metadata
        assert_eq!(
            selectors,
            vec![
                r#"input[name="user"]"#,
                r#"input[name="token"]"#,
                r#"[data-testid="login"]"#,
            ]
        );
        assert_eq!(snapshot.elements[2].text.as_deref(), Some("Sign in"));
    }

    #[test]
    fn malformed_capture_becomes_error_snapshot() {
        let browser = FakeBrowser {
            capture: json!({ "not": "a string" }),
        };
        let snapshot = tokio_test::block_on(processor().capture(&browser, &()));

        assert!(snapshot.elements.is_empty());
        assert_eq!(snapshot.url, "https://fake.test/login");
        assert_eq!(snapshot.title, "Login");
        assert!(snapshot.error.unwrap().starts_with("Page capture failed"));
    }

    #[test]
    fn captured_page_fields_default() {
        let page = CapturedPage::from_json(r#"{ "html": "<p>x</p>" }"#).unwrap();
        assert_eq!(page.identity(), PageIdentity::default());
        assert!(page.layout.is_empty());
    }
}
