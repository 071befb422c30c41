use std::sync::LazyLock;

use regex::Regex;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert Customer Success Engineer helping a \
support agent reply to a customer. Reply with only the improved body text of the response. \
Do not include a subject line, greeting preamble, or any explanation of your changes.";

pub const CONTEXT_SENTENCE: &str =
    "Below is the most recent customer comment on a support ticket, followed by my draft reply.";

pub const CONSTRAINTS_SENTENCE: &str = "Do not invent facts that are not present in the comment \
or the draft, and do not include a subject line.";

pub const COMMENT_OPEN: &str = "<<<CUSTOMER_COMMENT";
pub const COMMENT_CLOSE: &str = "CUSTOMER_COMMENT>>>";
pub const DRAFT_OPEN: &str = "<<<DRAFT_REPLY";
pub const DRAFT_CLOSE: &str = "DRAFT_REPLY>>>";

pub const REPHRASE_INSTRUCTION: &str = "Please professionally rephrase the draft reply to ensure \
it is clear, formal, and polished, suitable for communication from a Customer Success Engineer.";
pub const EXTEND_INSTRUCTION: &str = "Please enhance the draft reply by elaborating on its details \
in a professional and formal manner appropriate for a Customer Success Engineer.";
pub const CONCISE_INSTRUCTION: &str = "Please rewrite the draft reply to be concise while \
maintaining a formal and professional tone suitable for a Customer Success Engineer.";
pub const EMPATHIZE_INSTRUCTION: &str = "Please rewrite the draft reply with a warm, empathetic \
tone that acknowledges the customer's situation while staying professional and accurate.";
pub const POLISH_INSTRUCTION: &str = "Please polish the draft reply so it reads professionally, \
fixing grammar and wording without changing its meaning.";

pub const NO_RESPONSE: &str = "No response.";

static BOILERPLATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\A(?:extra|list|similar|summary|notes)[^\n]*\n?")
        .expect("boilerplate pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Rephrase,
    Extend,
    Concise,
    Empathize,
    Other(String),
}

impl ActionKind {
    pub const KNOWN: [ActionKind; 4] = [
        ActionKind::Rephrase,
        ActionKind::Extend,
        ActionKind::Concise,
        ActionKind::Empathize,
    ];

    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "rephrase" => ActionKind::Rephrase,
            "extend" => ActionKind::Extend,
            "concise" => ActionKind::Concise,
            "empathize" => ActionKind::Empathize,
            other => ActionKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Rephrase => "rephrase",
            ActionKind::Extend => "extend",
            ActionKind::Concise => "concise",
            ActionKind::Empathize => "empathize",
            ActionKind::Other(name) => name,
        }
    }

    /// Unrecognized kinds get the polish instruction.
    pub fn instruction(&self) -> &'static str {
        match self {
            ActionKind::Rephrase => REPHRASE_INSTRUCTION,
            ActionKind::Extend => EXTEND_INSTRUCTION,
            ActionKind::Concise => CONCISE_INSTRUCTION,
            ActionKind::Empathize => EMPATHIZE_INSTRUCTION,
            ActionKind::Other(_) => POLISH_INSTRUCTION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub action: ActionKind,
    pub last_comment: String,
    pub draft_text: String,
}

impl PromptRequest {
    pub fn new(
        action: ActionKind,
        last_comment: impl Into<String>,
        draft_text: impl Into<String>,
    ) -> Self {
        Self {
            action,
            last_comment: last_comment.into(),
            draft_text: draft_text.into(),
        }
    }

    /// System and user messages, in that order.
    pub fn messages(&self) -> [PromptMessage; 2] {
        let user = format!(
            "{CONTEXT_SENTENCE}\n\n{COMMENT_OPEN}\n{comment}\n{COMMENT_CLOSE}\n\n{DRAFT_OPEN}\n{draft}\n{DRAFT_CLOSE}\n\n{instruction}\n{CONSTRAINTS_SENTENCE}",
            comment = self.last_comment.trim(),
            draft = self.draft_text.trim(),
            instruction = self.action.instruction(),
        );

        [
            PromptMessage {
                role: Role::System,
                content: SYSTEM_INSTRUCTION.to_string(),
            },
            PromptMessage {
                role: Role::User,
                content: user,
            },
        ]
    }
}

/// Sanitized completion text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult(pub String);

impl CompletionResult {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cleans raw model output.
    ///
    /// Empty output becomes [`NO_RESPONSE`]. A first line starting with
    /// Extra, List, Similar, Summary or Notes (any case) is dropped together
    /// with its newline; later lines are left alone. The rest is trimmed.
    pub fn sanitize(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        let text = if trimmed.is_empty() {
            NO_RESPONSE
        } else {
            trimmed
        };

        let stripped = BOILERPLATE_LINE.replace(text, "");
        Self(stripped.trim().to_string())
    }
}
