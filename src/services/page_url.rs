/// Source of the URL the agent is currently looking at, if any.
pub trait PageUrlProvider: Send + Sync {
    fn current_url(&self) -> Option<String>;
}

/// Fixed URL, typically handed over on the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticPageUrl(pub Option<String>);

impl PageUrlProvider for StaticPageUrl {
    fn current_url(&self) -> Option<String> {
        self.0
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}

/// Tries each provider in order and returns the first URL found.
pub struct ChainedPageUrl(pub Vec<Box<dyn PageUrlProvider>>);

impl PageUrlProvider for ChainedPageUrl {
    fn current_url(&self) -> Option<String> {
        self.0.iter().find_map(|provider| provider.current_url())
    }
}
