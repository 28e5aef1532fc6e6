use serde::Deserialize;

use super::types::{Classification, Intent};
use crate::error::ClassifierError;

#[derive(Debug, Deserialize)]
struct RawClassification {
    action: String,
    #[serde(default)]
    topic: Option<String>,
    reply: String,
}

/// Parses classifier output into a [`Classification`].
///
/// Prose or a code fence around the object is tolerated. Everything inside
/// it is strict: `action` and `reply` must be strings, and an action outside
/// `FILL|ADD|CLEAR|NONE` is a format error rather than a silent no-op.
pub fn parse_classification(output: &str) -> Result<Classification, ClassifierError> {
    let json = extract_json(output)
        .ok_or_else(|| ClassifierError::Format("output did not contain a JSON object".to_string()))?;
    let raw = serde_json::from_str::<RawClassification>(json)
        .map_err(|err| ClassifierError::Format(err.to_string()))?;

    let intent = match raw.action.trim().to_ascii_uppercase().as_str() {
        "FILL" | "ADD" => Intent::Fill,
        "CLEAR" => Intent::Clear,
        "NONE" => Intent::None,
        other => {
            return Err(ClassifierError::Format(format!("unknown action `{other}`")));
        }
    };
    let topic = raw
        .topic
        .map(|topic| topic.trim().to_string())
        .filter(|topic| !topic.is_empty());

    Ok(Classification {
        intent,
        topic,
        reply: raw.reply,
    })
}

fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_action() {
        let fill = parse_classification(r#"{"action": "FILL", "reply": "Great!"}"#).expect("fill");
        assert_eq!(fill.intent, Intent::Fill);
        assert_eq!(fill.reply, "Great!");

        let add = parse_classification(r#"{"action": "ADD", "topic": " Chemistry ", "reply": "On it."}"#)
            .expect("add");
        assert_eq!(add.intent, Intent::Fill);
        assert_eq!(add.topic.as_deref(), Some("Chemistry"));

        let clear = parse_classification(r#"{"action": "clear", "reply": "Rest up."}"#).expect("clear");
        assert_eq!(clear.intent, Intent::Clear);

        let none = parse_classification(r#"{"action": "NONE", "reply": "Tell me more."}"#).expect("none");
        assert_eq!(none.intent, Intent::None);
        assert!(none.topic.is_none());
    }

    #[test]
    fn tolerates_code_fence_around_object() {
        let output = "```json\n{\"action\": \"CLEAR\", \"reply\": \"ok\"}\n```";
        assert_eq!(parse_classification(output).expect("fenced").intent, Intent::Clear);
    }

    #[test]
    fn blank_topic_is_dropped() {
        let parsed = parse_classification(r#"{"action": "ADD", "topic": "  ", "reply": "ok"}"#)
            .expect("parsed");
        assert!(parsed.topic.is_none());
    }

    #[test]
    fn rejects_malformed_output() {
        for output in [
            "I am not JSON",
            "} backwards {",
            r#"{"action": "DANCE", "reply": "ok"}"#,
            r#"{"action": "FILL"}"#,
            r#"{"reply": "no action"}"#,
            r#"{"action": 3, "reply": "ok"}"#,
        ] {
            assert!(
                matches!(parse_classification(output), Err(ClassifierError::Format(_))),
                "expected format error for {output}"
            );
        }
    }
}
