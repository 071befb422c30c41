use crate::domain::prompt::{ActionKind, POLISH_INSTRUCTION};

pub fn render() -> String {
    let mut lines = ActionKind::KNOWN
        .iter()
        .map(|kind| format!("{:<10} {}", kind.as_str(), kind.instruction()))
        .collect::<Vec<_>>();
    lines.push(format!("{:<10} {}", "(other)", POLISH_INSTRUCTION));
    lines.join("\n")
}
