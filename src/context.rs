use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{CompletionService, HelpdeskService, PageUrlProvider};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub helpdesk: Arc<dyn HelpdeskService>,
    pub completion: Arc<dyn CompletionService>,
    pub page_url: Arc<dyn PageUrlProvider>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        helpdesk: Arc<dyn HelpdeskService>,
        completion: Arc<dyn CompletionService>,
        page_url: Arc<dyn PageUrlProvider>,
    ) -> Self {
        Self {
            config,
            helpdesk,
            completion,
            page_url,
        }
    }
}
