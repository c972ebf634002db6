use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::config::CrawlConfig;
use crate::error::{CrawlError, ParseError};
use crate::ignore::IgnoreFilter;
use crate::parser::{PageContent, PageParser};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const NON_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// [`PageParser`] that downloads pages over HTTP and reads them as HTML.
#[derive(Debug, Clone)]
pub struct HtmlPageParser {
    client: Client,
    ignored_words: IgnoreFilter,
}

impl HtmlPageParser {
    pub fn new(ignored_words: IgnoreFilter) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(format!("webcrawler/{}", env!("CARGO_PKG_VERSION")))
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(CrawlError::HttpClient)?;
        Ok(Self::with_client(client, ignored_words))
    }

    pub fn with_client(client: Client, ignored_words: IgnoreFilter) -> Self {
        Self {
            client,
            ignored_words,
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Result<Self, CrawlError> {
        Self::new(IgnoreFilter::new(&config.ignored_words)?)
    }

    async fn fetch(&self, url: &Url) -> Result<String, ParseError> {
        let http_error = |source| ParseError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;

        if !response.status().is_success() {
            return Err(ParseError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(http_error)
    }
}

#[async_trait]
impl PageParser for HtmlPageParser {
    async fn parse(&self, url: &str) -> Result<PageContent, ParseError> {
        let page_url = Url::parse(url).map_err(|source| ParseError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Fetching {}", page_url);
        let html = self.fetch(&page_url).await?;

        let content = extract(&html, &page_url, &self.ignored_words);
        tracing::debug!(
            "Extracted {} distinct words and {} links from {}",
            content.word_counts.len(),
            content.links.len(),
            page_url
        );
        Ok(content)
    }
}

fn extract(html: &str, base_url: &Url, ignored_words: &IgnoreFilter) -> PageContent {
    let document = Html::parse_document(html);
    PageContent {
        word_counts: extract_words(&document, ignored_words),
        links: extract_links(&document, base_url),
    }
}

fn extract_words(document: &Html, ignored_words: &IgnoreFilter) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    let Ok(body_selector) = Selector::parse("body") else {
        return counts;
    };

    let texts = document
        .select(&body_selector)
        .flat_map(|body| body.descendants())
        .filter(|node| {
            node.parent()
                .and_then(|parent| parent.value().as_element())
                .is_none_or(|element| !NON_TEXT_ELEMENTS.contains(&element.name()))
        })
        .filter_map(|node| node.value().as_text());

    for text in texts {
        for word in text.split_whitespace().filter_map(normalize_word) {
            if ignored_words.should_ignore(&word) {
                continue;
            }
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    counts
}

fn normalize_word(raw: &str) -> Option<String> {
    let word = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect::<String>();
    (!word.is_empty()).then_some(word)
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(link_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| match base_url.join(href) {
            Ok(mut link) => {
                link.set_fragment(None);
                Some(link)
            }
            Err(e) => {
                tracing::debug!(
                    "Failed to join URL '{}' with base '{}': {}",
                    href,
                    base_url,
                    e
                );
                None
            }
        })
        .filter(|link| matches!(link.scheme(), "http" | "https"))
        .map(String::from)
        .collect()
}
