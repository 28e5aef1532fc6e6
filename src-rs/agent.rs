use tracing::{info, warn};

use crate::config::EchoConfig;
use crate::error::{ClassifierError, EchoError, StoreError};
use crate::helpers::{build_classifier, open_task_store};
use crate::intent::{Classification, Intent, IntentClassifier};
use crate::result::{TurnAction, TurnResult};
use crate::task::{FillOutcome, TaskStore};

pub const EXHAUSTED_SUFFIX: &str = " (No tasks or slots available).";
pub const UNAVAILABLE_REPLY: &str = "AI connection failed. Please try again.";
pub const CONFUSED_REPLY: &str = "Echo got confused and could not understand that.";
pub const STORE_FAILED_REPLY: &str = "Echo could not update your schedule.";
const TOPIC_PREFIX: &str = "Deep Work: ";

/// One user's scheduler: classifies each chat message and applies at most
/// one allocator call to the task store.
pub struct Agent {
    pub name: String,
    pub config: EchoConfig,
    pub classifier: Box<dyn IntentClassifier>,
    pub tasks: TaskStore,
}

impl Agent {
    pub fn new(name: &str, config: EchoConfig, classifier: Box<dyn IntentClassifier>, tasks: TaskStore) -> Self {
        let resolved_name = if name.is_empty() { "echo" } else { name };
        Self {
            name: resolved_name.to_string(),
            config,
            classifier,
            tasks,
        }
    }

    pub fn from_config(name: &str, config: EchoConfig) -> Result<Self, EchoError> {
        let classifier = build_classifier(&config)?;
        let tasks = open_task_store(&config)?;
        Ok(Self::new(name, config, Box::new(classifier), tasks))
    }

    /// Handles one chat message. Each message is classified on its own; no
    /// mood state carries over between calls.
    pub fn handle_message(&self, text: &str) -> TurnResult {
        if text.trim().is_empty() {
            return TurnResult::failed("", "message required".to_string());
        }

        let classification = match self.classifier.classify(text) {
            Ok(classification) => classification,
            Err(err @ ClassifierError::Unavailable(_)) => {
                warn!(agent = %self.name, error = %err, "classifier unavailable");
                return TurnResult::failed(UNAVAILABLE_REPLY, err.to_string());
            }
            Err(err @ ClassifierError::Format(_)) => {
                warn!(agent = %self.name, error = %err, "classifier output rejected");
                return TurnResult::failed(CONFUSED_REPLY, err.to_string());
            }
        };
        info!(agent = %self.name, intent = ?classification.intent, "message classified");

        match self.dispatch(&classification) {
            Ok((reply, action)) => TurnResult {
                success: true,
                reply,
                intent: Some(classification.intent),
                action,
                error: None,
            },
            Err(err) => {
                warn!(agent = %self.name, error = %err, "store update failed");
                let mut result = TurnResult::failed(STORE_FAILED_REPLY, err.to_string());
                result.intent = Some(classification.intent);
                result
            }
        }
    }

    fn dispatch(&self, classification: &Classification) -> Result<(String, Option<TurnAction>), StoreError> {
        let mut reply = classification.reply.clone();
        let action = match classification.intent {
            Intent::Fill => {
                let (synthesized, outcome) = match &classification.topic {
                    Some(topic) => {
                        let (task, outcome) = self.tasks.add_and_fill(&format!("{TOPIC_PREFIX}{topic}"))?;
                        (Some(task), outcome)
                    }
                    None => (None, self.tasks.fill()?),
                };
                if let FillOutcome::Exhausted { .. } = outcome {
                    reply.push_str(EXHAUSTED_SUFFIX);
                }
                Some(TurnAction::Fill { synthesized, outcome })
            }
            Intent::Clear => {
                let moved = self.tasks.clear()?;
                Some(TurnAction::Clear { moved })
            }
            Intent::None => None,
        };
        Ok((reply, action))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::llm::ProviderError;
    use crate::task::backend::SwitchableBackend;
    use crate::task::{Exhaustion, Snapshot};

    struct Scripted(Mutex<Vec<Result<Classification, ClassifierError>>>);

    impl Scripted {
        fn once(result: Result<Classification, ClassifierError>) -> Box<Self> {
            Box::new(Self(Mutex::new(vec![result])))
        }
    }

    impl IntentClassifier for Scripted {
        fn classify(&self, _text: &str) -> Result<Classification, ClassifierError> {
            self.0
                .lock()
                .expect("lock")
                .pop()
                .unwrap_or_else(|| Err(ClassifierError::Format("script exhausted".to_string())))
        }
    }

    fn said(intent: Intent, topic: Option<&str>, reply: &str) -> Result<Classification, ClassifierError> {
        Ok(Classification {
            intent,
            topic: topic.map(str::to_string),
            reply: reply.to_string(),
        })
    }

    fn agent(classifier: Box<dyn IntentClassifier>) -> Agent {
        let config = EchoConfig::default();
        let tasks = TaskStore::in_memory(config.initial_snapshot()).expect("store");
        Agent::new("test", config, classifier, tasks)
    }

    fn agent_with_switchable_store(classifier: Box<dyn IntentClassifier>) -> (Agent, Arc<AtomicBool>) {
        let config = EchoConfig::default();
        let backend = SwitchableBackend::default();
        let failing = Arc::clone(&backend.failing);
        let tasks = TaskStore::open(config.initial_snapshot(), Box::new(backend)).expect("store");
        (Agent::new("test", config, classifier, tasks), failing)
    }

    fn scheduled(snapshot: &Snapshot) -> Vec<String> {
        snapshot
            .schedule
            .tasks()
            .into_iter()
            .map(|t| t.description.clone())
            .collect()
    }

    #[test]
    fn fill_moves_backlog_head_and_keeps_reply() {
        let agent = agent(Scripted::once(said(Intent::Fill, None, "Great!")));
        agent.tasks.add("Chemistry Test").expect("add");

        let result = agent.handle_message("I am motivated");
        assert!(result.success);
        assert_eq!(result.reply, "Great!");
        match result.action {
            Some(TurnAction::Fill { synthesized: None, outcome: FillOutcome::Placed { slot, .. } }) => {
                assert_eq!(slot.as_deref(), Some("09:00 AM"));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn exhausted_fill_appends_suffix() {
        let agent = agent(Scripted::once(said(Intent::Fill, None, "Great!")));
        let result = agent.handle_message("let's go");
        assert!(result.success);
        assert_eq!(result.reply, "Great! (No tasks or slots available).");
        assert!(matches!(
            result.action,
            Some(TurnAction::Fill {
                outcome: FillOutcome::Exhausted { reason: Exhaustion::BacklogEmpty },
                ..
            })
        ));
    }

    #[test]
    fn topic_is_synthesized_into_backlog_before_fill() {
        let agent = agent(Scripted::once(said(Intent::Fill, Some("Rust"), "Focus time.")));
        let result = agent.handle_message("I want to dig into Rust");
        assert!(result.success);
        let snapshot = agent.tasks.snapshot().expect("snapshot");
        assert_eq!(scheduled(&snapshot), ["Deep Work: Rust"]);
        assert!(snapshot.backlog.is_empty());
    }

    #[test]
    fn clear_reports_moved_count_without_touching_reply() {
        let agent = agent(Scripted::once(said(Intent::Clear, None, "Rest up.")));
        agent.tasks.add("A").expect("add");
        agent.tasks.fill().expect("fill");

        let result = agent.handle_message("I am exhausted");
        assert_eq!(result.reply, "Rest up.");
        assert_eq!(result.action, Some(TurnAction::Clear { moved: 1 }));
        assert_eq!(agent.tasks.backlog().expect("backlog").len(), 1);
    }

    #[test]
    fn none_passes_reply_through_without_mutation() {
        let agent = agent(Scripted::once(said(Intent::None, None, "Tell me more.")));
        agent.tasks.add("A").expect("add");
        let before = agent.tasks.snapshot().expect("snapshot");

        let result = agent.handle_message("hmm");
        assert!(result.success);
        assert_eq!(result.reply, "Tell me more.");
        assert!(result.action.is_none());
        assert_eq!(agent.tasks.snapshot().expect("snapshot"), before);
    }

    #[test]
    fn classifier_errors_become_generic_replies() {
        let down = agent(Scripted::once(Err(ClassifierError::Unavailable(ProviderError::new(
            "network_error",
            "connection refused",
            true,
        )))));
        let result = down.handle_message("hello");
        assert!(!result.success);
        assert_eq!(result.reply, UNAVAILABLE_REPLY);

        let confused = agent(Scripted::once(Err(ClassifierError::Format("bad".to_string()))));
        let result = confused.handle_message("hello");
        assert!(!result.success);
        assert_eq!(result.reply, CONFUSED_REPLY);
        assert!(result.action.is_none());
    }

    #[test]
    fn blank_message_skips_classifier() {
        let agent = agent(Scripted::once(said(Intent::Clear, None, "unused")));
        let result = agent.handle_message("   ");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("message required"));
    }

    #[test]
    fn failed_save_during_topic_fill_keeps_nothing() {
        let (agent, failing) =
            agent_with_switchable_store(Scripted::once(said(Intent::Fill, Some("Rust"), "Focus time.")));
        failing.store(true, Ordering::SeqCst);
        let before = agent.tasks.snapshot().expect("snapshot");

        let result = agent.handle_message("I want to dig into Rust");
        assert!(!result.success);
        assert_eq!(result.reply, STORE_FAILED_REPLY);
        assert_eq!(result.intent, Some(Intent::Fill));
        assert!(result.action.is_none());
        assert_eq!(agent.tasks.snapshot().expect("snapshot"), before);
        assert!(agent.tasks.backlog().expect("backlog").is_empty());
    }

    #[test]
    fn failed_save_during_clear_reports_store_failure() {
        let (agent, failing) = agent_with_switchable_store(Scripted::once(said(Intent::Clear, None, "Rest up.")));
        agent.tasks.add("A").expect("add");
        agent.tasks.fill().expect("fill");
        failing.store(true, Ordering::SeqCst);
        let before = agent.tasks.snapshot().expect("snapshot");

        let result = agent.handle_message("I am exhausted");
        assert!(!result.success);
        assert_eq!(result.reply, STORE_FAILED_REPLY);
        assert!(result.error.is_some());
        assert_eq!(agent.tasks.snapshot().expect("snapshot"), before);
    }
}
