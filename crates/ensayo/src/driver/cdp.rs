//! CDP-backed driver (requires the `browser` feature and a chromium).
//!
//! One driver owns one browser process and one page, so process isolation
//! doubles as context isolation: cookies and storage never outlive the
//! session. `close_context` is therefore a no-op at the CDP level; the
//! teardown seam stays in place for engines that separate the two.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{ElementState, PageDriver};
use crate::config::{BrowserSettings, Engine};
use crate::result::{EnsayoError, EnsayoResult};

/// Driver over a real chromium process via the Chrome DevTools Protocol
pub struct CdpDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: Arc<Mutex<Option<CdpPage>>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
    slow_mo: Duration,
}

impl std::fmt::Debug for CdpDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpDriver")
            .field("slow_mo", &self.slow_mo)
            .finish_non_exhaustive()
    }
}

impl CdpDriver {
    /// Launch a browser process and open one page.
    ///
    /// Launch failures surface as `Launch`; page creation failures after a
    /// started process surface as `Context`, with the process torn down
    /// first so nothing leaks.
    pub async fn launch(settings: &BrowserSettings) -> EnsayoResult<Self> {
        if settings.name != Engine::Chromium {
            // CDP only speaks to chromium-like engines
            tracing::warn!(
                engine = settings.name.as_str(),
                "engine not available over CDP, launching default engine"
            );
        }

        let mut builder = CdpConfig::builder()
            .window_size(settings.viewport.width, settings.viewport.height);

        if !settings.headless {
            builder = builder.with_head();
        }
        if !settings.args.is_empty() {
            builder = builder.args(settings.args.clone());
        }

        let cdp_config = builder.build().map_err(|e| EnsayoError::Launch {
            message: e.to_string(),
        })?;

        let (mut browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| EnsayoError::Launch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // The process started; tear it down before propagating
                if let Err(close_err) = browser.close().await {
                    tracing::warn!(error = %close_err, "failed to close browser after context error");
                }
                return Err(EnsayoError::Context {
                    message: e.to_string(),
                });
            }
        };

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page: Arc::new(Mutex::new(Some(page))),
            handle,
            slow_mo: Duration::from_millis(settings.slow_mo_ms),
        })
    }

    async fn with_page<T>(
        &self,
        f: impl FnOnce(&CdpPage) -> futures::future::BoxFuture<'_, EnsayoResult<T>>,
    ) -> EnsayoResult<T> {
        let guard = self.page.lock().await;
        let page = guard.as_ref().ok_or_else(|| EnsayoError::InvalidState {
            message: "page already closed".to_string(),
        })?;
        let result = f(page).await;
        drop(guard);
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
        result
    }

    async fn eval<T: serde::de::DeserializeOwned + Send + 'static>(
        &self,
        expr: String,
    ) -> EnsayoResult<T> {
        self.with_page(|page| {
            Box::pin(async move {
                let result = page.evaluate(expr).await.map_err(|e| EnsayoError::Driver {
                    message: e.to_string(),
                })?;
                result.into_value().map_err(|e| EnsayoError::Driver {
                    message: e.to_string(),
                })
            })
        })
        .await
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn goto(&self, url: &str) -> EnsayoResult<()> {
        let url_owned = url.to_string();
        self.with_page(|page| {
            Box::pin(async move {
                page.goto(url_owned.clone())
                    .await
                    .map_err(|e| EnsayoError::Navigation {
                        url: url_owned,
                        message: e.to_string(),
                    })?;
                Ok(())
            })
        })
        .await
    }

    async fn current_url(&self) -> EnsayoResult<String> {
        self.eval("window.location.href".to_string()).await
    }

    async fn element_state(&self, selector: &str) -> EnsayoResult<ElementState> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({selector:?}); \
             if (!el) return 'missing'; \
             const s = window.getComputedStyle(el); \
             const shown = !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length) \
                 && s.visibility !== 'hidden' && s.display !== 'none'; \
             return shown ? 'visible' : 'hidden'; }})()"
        );
        let state: String = self.eval(expr).await?;
        Ok(match state.as_str() {
            "visible" => ElementState::Visible,
            "hidden" => ElementState::Hidden,
            _ => ElementState::Missing,
        })
    }

    async fn click(&self, selector: &str) -> EnsayoResult<()> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({selector:?}); \
             if (!el) throw new Error('no element'); el.click(); return true; }})()"
        );
        let _: bool = self.eval(expr).await?;
        Ok(())
    }

    async fn click_text(&self, selector: &str, text: &str) -> EnsayoResult<()> {
        let expr = format!(
            "(() => {{ const el = Array.from(document.querySelectorAll({selector:?})) \
                 .find(el => (el.textContent || '').includes({text:?})); \
             if (!el) throw new Error('no option'); el.click(); return true; }})()"
        );
        let _: bool = self.eval(expr).await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> EnsayoResult<()> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({selector:?}); \
             if (!el) throw new Error('no element'); \
             el.focus(); el.value = ''; el.value = {text:?}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()"
        );
        let _: bool = self.eval(expr).await?;
        Ok(())
    }

    async fn press_key(&self, key: &str) -> EnsayoResult<()> {
        let expr = format!(
            "(() => {{ const el = document.activeElement || document.body; \
             for (const type of ['keydown', 'keyup']) {{ \
                 el.dispatchEvent(new KeyboardEvent(type, {{ key: {key:?}, bubbles: true }})); \
             }} return true; }})()"
        );
        let _: bool = self.eval(expr).await?;
        Ok(())
    }

    async fn text(&self, selector: &str) -> EnsayoResult<String> {
        let expr = format!(
            "(() => {{ const el = document.querySelector({selector:?}); \
             if (!el) throw new Error('no element'); \
             return (el.textContent || '').trim(); }})()"
        );
        self.eval(expr).await
    }

    async fn text_all(&self, selector: &str) -> EnsayoResult<Vec<String>> {
        let expr = format!(
            "Array.from(document.querySelectorAll({selector:?}))\
             .map(el => (el.textContent || '').trim())"
        );
        self.eval(expr).await
    }

    async fn count(&self, selector: &str) -> EnsayoResult<usize> {
        let expr = format!("document.querySelectorAll({selector:?}).length");
        self.eval(expr).await
    }

    async fn screenshot(&self) -> EnsayoResult<Vec<u8>> {
        self.with_page(|page| {
            Box::pin(async move {
                let params = CaptureScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build();
                let screenshot =
                    page.execute(params)
                        .await
                        .map_err(|e| EnsayoError::Screenshot {
                            message: e.to_string(),
                        })?;
                use base64::Engine as _;
                base64::engine::general_purpose::STANDARD
                    .decode(&screenshot.data)
                    .map_err(|e| EnsayoError::Screenshot {
                        message: e.to_string(),
                    })
            })
        })
        .await
    }

    async fn close_page(&self) -> EnsayoResult<()> {
        let mut guard = self.page.lock().await;
        if let Some(page) = guard.take() {
            page.close().await.map_err(|e| EnsayoError::Driver {
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    async fn close_context(&self) -> EnsayoResult<()> {
        // Process-per-session: nothing between page and process to close
        tracing::debug!("cdp driver has no separate context to close");
        Ok(())
    }

    async fn close_browser(&self) -> EnsayoResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(|e| EnsayoError::Driver {
            message: e.to_string(),
        })?;
        Ok(())
    }
}
