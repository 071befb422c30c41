pub mod openai;
pub mod zendesk;
