//! Decides whether a GitHub webhook delivery should start a benchmark run.

use std::fmt;

use serde::Deserialize;

use crate::{config::TriggerConfig, prelude::*};

/// The parts of an `issue_comment` payload the bot looks at.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueCommentEvent {
    pub action: String,
    pub issue: Issue,
    pub comment: Comment,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub body: String,
    pub author_association: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerDecision {
    Bench { pull_number: u64 },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    Ping,
    Action(String),
    Phrase,
    Association(String),
}

impl fmt::Display for TriggerDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerDecision::Bench { pull_number } => write!(f, "bench #{}", pull_number),
            TriggerDecision::Ignored(IgnoreReason::Ping) => write!(f, "ignored: ping"),
            TriggerDecision::Ignored(IgnoreReason::Action(action)) => {
                write!(f, "ignored: action '{}'", action)
            }
            TriggerDecision::Ignored(IgnoreReason::Phrase) => {
                write!(f, "ignored: not a trigger comment")
            }
            TriggerDecision::Ignored(IgnoreReason::Association(association)) => {
                write!(f, "ignored: author association '{}' not authorized", association)
            }
        }
    }
}

/// Evaluates one webhook delivery given its `X-GitHub-Event` name and raw
/// JSON body.
pub fn evaluate(event: &str, payload: &str, config: &TriggerConfig) -> Result<TriggerDecision> {
    match event {
        "ping" => Ok(TriggerDecision::Ignored(IgnoreReason::Ping)),
        "issue_comment" => {
            let event: IssueCommentEvent = serde_json::from_str(payload)?;
            Ok(evaluate_comment(&event, config))
        }
        other => Err(Error::UnsupportedEvent(other.to_string())),
    }
}

pub fn evaluate_comment(event: &IssueCommentEvent, config: &TriggerConfig) -> TriggerDecision {
    if event.action != "created" {
        return TriggerDecision::Ignored(IgnoreReason::Action(event.action.clone()));
    }
    if event.comment.body.trim() != config.phrase {
        return TriggerDecision::Ignored(IgnoreReason::Phrase);
    }
    let association = &event.comment.author_association;
    if !config.authorized_roles.iter().any(|role| role == association) {
        warn!(
            "Trigger comment on #{} from unauthorized association {}",
            event.issue.number, association
        );
        return TriggerDecision::Ignored(IgnoreReason::Association(association.clone()));
    }
    info!("Benchmark requested on #{}", event.issue.number);
    TriggerDecision::Bench {
        pull_number: event.issue.number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(action: &str, body: &str, association: &str) -> String {
        serde_json::json!({
            "action": action,
            "issue": { "number": 42, "title": "Faster router" },
            "comment": {
                "id": 1,
                "body": body,
                "author_association": association,
                "user": { "login": "octocat" }
            },
            "repository": { "full_name": "octo/repo" }
        })
        .to_string()
    }

    #[test]
    fn member_trigger_starts_bench() {
        let config = TriggerConfig::default();
        let decision = evaluate("issue_comment", &payload("created", "+bench", "MEMBER"), &config)
            .unwrap();
        assert_eq!(decision, TriggerDecision::Bench { pull_number: 42 });
        assert_eq!(decision.to_string(), "bench #42");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let config = TriggerConfig::default();
        let decision =
            evaluate("issue_comment", &payload("created", "  +bench\n", "OWNER"), &config).unwrap();
        assert_eq!(decision, TriggerDecision::Bench { pull_number: 42 });
    }

    #[test]
    fn other_text_is_ignored() {
        let config = TriggerConfig::default();
        let decision = evaluate(
            "issue_comment",
            &payload("created", "+bench please", "OWNER"),
            &config,
        )
        .unwrap();
        assert_eq!(decision, TriggerDecision::Ignored(IgnoreReason::Phrase));
    }

    #[test]
    fn edited_comment_is_ignored() {
        let config = TriggerConfig::default();
        let decision =
            evaluate("issue_comment", &payload("edited", "+bench", "OWNER"), &config).unwrap();
        assert_eq!(
            decision,
            TriggerDecision::Ignored(IgnoreReason::Action("edited".to_string()))
        );
    }

    #[test]
    fn contributor_is_not_authorized() {
        let config = TriggerConfig::default();
        let decision =
            evaluate("issue_comment", &payload("created", "+bench", "CONTRIBUTOR"), &config)
                .unwrap();
        assert_eq!(
            decision,
            TriggerDecision::Ignored(IgnoreReason::Association("CONTRIBUTOR".to_string()))
        );
    }

    #[test]
    fn custom_phrase_and_roles() {
        let config = TriggerConfig {
            phrase: "/bench".to_string(),
            authorized_roles: vec!["COLLABORATOR".to_string()],
        };
        let decision =
            evaluate("issue_comment", &payload("created", "/bench", "COLLABORATOR"), &config)
                .unwrap();
        assert_eq!(decision, TriggerDecision::Bench { pull_number: 42 });
    }

    #[test]
    fn ping_is_ignored_without_parsing() {
        let decision = evaluate("ping", "not json", &TriggerConfig::default()).unwrap();
        assert_eq!(decision, TriggerDecision::Ignored(IgnoreReason::Ping));
    }

    #[test]
    fn unknown_event_is_an_error() {
        let err = evaluate("push", "{}", &TriggerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEvent(ref e) if e == "push"));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = evaluate("issue_comment", "{\"action\":", &TriggerConfig::default()).unwrap_err();
        assert!(matches!(err, Error::JsonError(_)));
    }
}
