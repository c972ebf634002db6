use dashmap::DashSet;

/// URLs claimed during one crawl. Only ever grows.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    urls: DashSet<String>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller.
    ///
    /// Returns `true` only for the first caller; the check and the insert happen under the same
    /// shard lock, so concurrent discoveries of one URL produce a single winner.
    pub fn claim(&self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
