use super::detector::{detect_urls, first_url};
use super::fetch::{build_client, fetch_html};
use super::title::title_from_html;
use super::types::LinkConfig;
use crate::error::TitleError;

/// URL → title pipeline shared by every channel.
///
/// Holds no per-message state; the client's connection pool is the only
/// thing reused between lookups.
#[derive(Clone)]
pub struct TitleResolver {
    client: reqwest::Client,
    config: LinkConfig,
}

impl TitleResolver {
    pub fn new(config: LinkConfig) -> anyhow::Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Fetch one URL and return its normalized page title.
    pub async fn title_for_url(&self, url: &str) -> Result<String, TitleError> {
        let page = fetch_html(&self.client, url, self.config.max_body_chars).await?;
        if page.truncated {
            tracing::debug!(
                url,
                max_chars = self.config.max_body_chars,
                "body truncated before title lookup"
            );
        }
        title_from_html(&page.body)
    }

    /// Run the whole pipeline for one chat message.
    ///
    /// Only the first URL is tried unless `try_all_urls` is set, in which
    /// case candidates are tried in order until one produces a title.
    pub async fn title_for_message(&self, text: &str) -> Result<String, TitleError> {
        if !self.config.try_all_urls {
            let url = first_url(text).ok_or(TitleError::NoUrl)?;
            return self.title_for_url(url).await;
        }

        let mut last_error = TitleError::NoUrl;
        for url in detect_urls(text) {
            match self.title_for_url(url).await {
                Ok(title) => return Ok(title),
                Err(error) => {
                    tracing::debug!(url, %error, "no title for candidate url");
                    last_error = error;
                }
            }
        }
        Err(last_error)
    }
}
