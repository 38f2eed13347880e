//! System prompt and message sequence assembly.

use crate::chat::ChatMessage;
use crate::context::divider;

const PREAMBLE: &str = "You are a helpful assistant for a personal portfolio website. \
You answer visitors' questions about the site owner's research, projects, publications \
and blog posts using the content provided below.";

const GUIDELINES: &[&str] = &[
    "Answer only from the provided content; do not invent projects, papers or facts.",
    "If the content does not contain the answer, say that the information is not available.",
    "When relevant, cite the names of the specific projects or publications you draw on.",
    "Keep answers concise and conversational.",
];

/// The system instruction wrapping an assembled context.
pub fn system_prompt(context: &str) -> String {
    let rule = divider();
    let guidelines: Vec<String> = GUIDELINES.iter().map(|g| format!("- {}", g)).collect();
    format!(
        "{}\n\nAVAILABLE CONTENT:\n{}\n{}\n{}\n\nGUIDELINES:\n{}",
        PREAMBLE,
        rule,
        context,
        rule,
        guidelines.join("\n")
    )
}

/// Full message sequence for one chat turn: the system instruction, the
/// caller's history exactly as given, then the new question.
pub fn build_messages(context: &str, history: &[ChatMessage], question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(context)));
    messages.extend(history.iter().cloned());
    messages.push(ChatMessage::user(question));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;

    #[test]
    fn test_system_prompt_wraps_context_in_dividers() {
        let prompt = system_prompt("[BLOG] Hello\nWorld");
        let rule = divider();
        assert!(prompt.starts_with(PREAMBLE));
        assert!(prompt.contains(&format!("{}\n[BLOG] Hello\nWorld\n{}", rule, rule)));
        for guideline in GUIDELINES {
            assert!(prompt.contains(guideline));
        }
    }

    #[test]
    fn test_build_messages_shape() {
        let history = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
        ];
        let messages = build_messages("ctx", &history, "second?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("ctx"));
        assert_eq!(&messages[1..3], &history[..]);
        assert_eq!(messages[3], ChatMessage::user("second?"));
    }

    #[test]
    fn test_history_is_passed_verbatim() {
        // Same-role runs and duplicates are kept as-is.
        let history = vec![
            ChatMessage::user("a"),
            ChatMessage::user("a"),
            ChatMessage::user("b"),
        ];
        let messages = build_messages("ctx", &history, "  padded question  ");
        let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::User, Role::User, Role::User]
        );
        assert_eq!(messages[4].content, "  padded question  ");
    }

    #[test]
    fn test_single_system_message() {
        let messages = build_messages("ctx", &[], "q");
        assert_eq!(
            messages.iter().filter(|m| m.role == Role::System).count(),
            1
        );
    }
}
