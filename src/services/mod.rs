pub mod completion;
pub mod helpdesk;
pub mod page_url;

pub use completion::CompletionService;
pub use helpdesk::HelpdeskService;
pub use page_url::PageUrlProvider;
