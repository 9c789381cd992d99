use serde_json::Value;

/// What a single planner response asks the job to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerReply {
    /// The request was accepted; poll `results/<job>` later.
    Queued(String),
    /// Terminal result payload, still in its endpoint-specific shape.
    Result(Value),
    /// The planner reported a failure.
    Failed(String),
}

impl PlannerReply {
    pub fn classify(value: Value) -> Self {
        let mut body = match value {
            Value::Object(body) => body,
            other => {
                return PlannerReply::Failed(format!("unexpected response from planner: {other}"))
            }
        };

        if let Some(error) = body.remove("error") {
            return PlannerReply::Failed(match error {
                Value::String(message) => message,
                other => other.to_string(),
            });
        }

        if let Some(result) = body.remove("result") {
            return PlannerReply::Result(result);
        }

        let queued = body
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|status| status.eq_ignore_ascii_case("queued"));
        if queued {
            match body.get("job") {
                Some(Value::String(job)) if !job.is_empty() => {
                    return PlannerReply::Queued(job.clone())
                }
                Some(Value::Number(job)) => return PlannerReply::Queued(job.to_string()),
                _ => {}
            }
        }

        PlannerReply::Failed(format!(
            "unexpected response from planner: {}",
            Value::Object(body)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_each_response_shape() {
        assert_eq!(
            PlannerReply::classify(json!({"status": "queued", "job": "F2B1-77"})),
            PlannerReply::Queued("F2B1-77".to_string())
        );
        assert_eq!(
            PlannerReply::classify(json!({"status": "ok", "result": {"jumps": []}})),
            PlannerReply::Result(json!({"jumps": []}))
        );
        assert_eq!(
            PlannerReply::classify(json!({"error": "Could not find starting system"})),
            PlannerReply::Failed("Could not find starting system".to_string())
        );
    }

    #[test]
    fn queued_without_job_is_a_failure() {
        assert!(matches!(
            PlannerReply::classify(json!({"status": "queued"})),
            PlannerReply::Failed(_)
        ));
        assert!(matches!(
            PlannerReply::classify(json!([1, 2, 3])),
            PlannerReply::Failed(_)
        ));
    }
}
