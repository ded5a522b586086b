//! Conversation state machine.
//!
//! A single enum replaces independent "awaiting" flags so that at most one
//! question can be pending at a time and every transition (including error
//! paths) lands in a defined state.

/// Where the conversation currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No active project.
    Idle,
    /// A create request was made; the next message is taken as the project
    /// name. `prior` remembers the project that was active before, so a
    /// failed creation can restore it.
    AwaitingProjectName { prior: Option<String> },
    /// A project exists and the assistant asked whether to deploy it.
    AwaitingDeployConfirmation { project: String },
    /// A project exists, no pending question.
    Active { project: String },
}

impl Phase {
    /// The active project slug, if any phase carries one.
    ///
    /// While awaiting a project name the previous project is suspended, not
    /// active; it only comes back if creation fails.
    pub fn project(&self) -> Option<&str> {
        match self {
            Phase::Idle | Phase::AwaitingProjectName { .. } => None,
            Phase::AwaitingDeployConfirmation { project } | Phase::Active { project } => {
                Some(project)
            }
        }
    }

    /// True when a deployment question is pending.
    pub fn awaiting_deploy_confirmation(&self) -> bool {
        matches!(self, Phase::AwaitingDeployConfirmation { .. })
    }

    /// True when the next message is taken as a project name.
    pub fn awaiting_project_name(&self) -> bool {
        matches!(self, Phase::AwaitingProjectName { .. })
    }

    /// The phase to fall back to when a pending creation fails.
    pub fn restored_after_failed_create(&self) -> Phase {
        match self {
            Phase::AwaitingProjectName { prior: Some(p) } => Phase::Active { project: p.clone() },
            _ => Phase::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_is_none_without_active_project() {
        assert_eq!(Phase::Idle.project(), None);
        assert_eq!(
            Phase::AwaitingProjectName {
                prior: Some("old-site".to_string())
            }
            .project(),
            None
        );
    }

    #[test]
    fn project_is_carried_through_confirmation_and_active() {
        let awaiting = Phase::AwaitingDeployConfirmation {
            project: "my-site".to_string(),
        };
        assert_eq!(awaiting.project(), Some("my-site"));
        assert!(awaiting.awaiting_deploy_confirmation());

        let active = Phase::Active {
            project: "my-site".to_string(),
        };
        assert_eq!(active.project(), Some("my-site"));
        assert!(!active.awaiting_deploy_confirmation());
    }

    #[test]
    fn failed_create_restores_prior_project_or_idle() {
        let with_prior = Phase::AwaitingProjectName {
            prior: Some("old-site".to_string()),
        };
        assert_eq!(
            with_prior.restored_after_failed_create(),
            Phase::Active {
                project: "old-site".to_string()
            }
        );

        let without = Phase::AwaitingProjectName { prior: None };
        assert_eq!(without.restored_after_failed_create(), Phase::Idle);
    }
}
