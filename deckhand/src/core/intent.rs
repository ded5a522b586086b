//! Deterministic classification of user messages.
//!
//! The dispatch table is ordered: pending questions win over keyword
//! matches, and keyword rules are checked top to bottom. Affirmative and
//! negative answers match whole tokens only; keyword rules match
//! case-insensitive substrings.

use crate::core::phase::Phase;

/// What the user asked for, given the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The message is the project name we asked for.
    ProvideProjectName(String),
    /// Affirmative answer to the pending deployment question.
    ConfirmDeploy,
    /// Negative answer to the pending deployment question.
    DeclineDeploy,
    /// Explicit deployment request for the active project.
    Deploy,
    /// Tear-down request (with or without an active project).
    Destroy,
    /// Request to create a new static website.
    CreateSite,
    /// Anything else: reply with the capability menu.
    Unknown,
}

const AFFIRMATIVE_WORDS: [&str; 5] = ["yes", "sure", "okay", "ok", "yep"];
const NEGATIVE_WORDS: [&str; 3] = ["no", "nope", "cancel"];

/// Classify a user message against the dispatch table.
pub fn classify(phase: &Phase, message: &str) -> Intent {
    if phase.awaiting_project_name() {
        return Intent::ProvideProjectName(message.trim().to_string());
    }

    let lower = message.to_lowercase();

    if phase.awaiting_deploy_confirmation() {
        if contains_token(&lower, &AFFIRMATIVE_WORDS) || lower.contains("deploy") {
            return Intent::ConfirmDeploy;
        }
        if contains_token(&lower, &NEGATIVE_WORDS) || lower.contains("not now") {
            return Intent::DeclineDeploy;
        }
    }

    if lower.contains("deploy") && phase.project().is_some() {
        return Intent::Deploy;
    }
    if lower.contains("destroy") || lower.contains("remove") || lower.contains("delete") {
        return Intent::Destroy;
    }
    if lower.contains("create") && lower.contains("static website") {
        return Intent::CreateSite;
    }

    Intent::Unknown
}

/// True if any of `words` appears as a whole token in `lower`.
fn contains_token(lower: &str, words: &[&str]) -> bool {
    lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| words.contains(&token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awaiting(project: &str) -> Phase {
        Phase::AwaitingDeployConfirmation {
            project: project.to_string(),
        }
    }

    fn active(project: &str) -> Phase {
        Phase::Active {
            project: project.to_string(),
        }
    }

    #[test]
    fn awaiting_project_name_takes_any_message_verbatim() {
        let phase = Phase::AwaitingProjectName { prior: None };
        let intent = classify(&phase, "  My Site  ");
        assert_eq!(intent, Intent::ProvideProjectName("My Site".to_string()));
        // Even keyword-looking input is treated as the name.
        let intent = classify(&phase, "destroy it");
        assert_eq!(intent, Intent::ProvideProjectName("destroy it".to_string()));
    }

    #[test]
    fn affirmative_words_confirm_deployment() {
        for word in ["yes", "Sure!", "okay then", "ok", "yep"] {
            assert_eq!(
                classify(&awaiting("my-site"), word),
                Intent::ConfirmDeploy,
                "word: {word}"
            );
        }
    }

    #[test]
    fn affirmative_matches_tokens_not_substrings() {
        assert_eq!(classify(&awaiting("my-site"), "eyes only"), Intent::Unknown);
        assert_eq!(classify(&awaiting("my-site"), "nothing"), Intent::Unknown);
    }

    #[test]
    fn deploy_keyword_while_awaiting_counts_as_confirmation() {
        assert_eq!(
            classify(&awaiting("my-site"), "go ahead and deploy"),
            Intent::ConfirmDeploy
        );
    }

    #[test]
    fn negative_words_decline_deployment() {
        for word in ["no", "Nope", "cancel that", "not now"] {
            assert_eq!(
                classify(&awaiting("my-site"), word),
                Intent::DeclineDeploy,
                "word: {word}"
            );
        }
    }

    #[test]
    fn deploy_requires_active_project() {
        assert_eq!(classify(&active("my-site"), "please deploy"), Intent::Deploy);
        // Without a project the message falls through to the menu.
        assert_eq!(classify(&Phase::Idle, "please deploy"), Intent::Unknown);
    }

    #[test]
    fn destroy_synonyms_classify_regardless_of_project() {
        for msg in ["destroy it", "remove the site", "delete everything"] {
            assert_eq!(classify(&Phase::Idle, msg), Intent::Destroy, "msg: {msg}");
            assert_eq!(classify(&active("my-site"), msg), Intent::Destroy);
        }
    }

    #[test]
    fn create_requires_both_keywords() {
        assert_eq!(
            classify(&Phase::Idle, "Create a static website please"),
            Intent::CreateSite
        );
        assert_eq!(classify(&Phase::Idle, "create a blog"), Intent::Unknown);
        assert_eq!(
            classify(&Phase::Idle, "I want a static website"),
            Intent::Unknown
        );
    }

    #[test]
    fn destroy_wins_over_create() {
        // "delete" appears before the create rule in the table.
        assert_eq!(
            classify(&Phase::Idle, "delete and create a static website"),
            Intent::Destroy
        );
    }

    #[test]
    fn unknown_falls_through() {
        assert_eq!(classify(&Phase::Idle, "hello there"), Intent::Unknown);
    }
}
