use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{TaskError, TaskResult};

/// Task entity - the managed to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique identifier, assigned by the store
    pub id: i64,
    /// Task title, never blank once persisted
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Completion flag
    pub done: bool,
}

/// DTO for creating a new task.
///
/// A client-sent `id` is not part of this shape and is dropped during
/// deserialization along with any other unknown key.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(
        required(message = "Title is required"),
        custom(function = validate_non_blank, message = "Title is required")
    )]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub done: bool,
}

fn validate_non_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("non_blank"));
    }
    Ok(())
}

/// Validated input for the store's create operation
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
}

/// Partial update parsed from a PATCH body.
///
/// Field presence is tracked separately from nullability: an omitted
/// `description` leaves the stored value alone while an explicit `null`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub done: Option<bool>,
}

impl TaskPatch {
    /// Validate a raw JSON object against the closed field set
    /// {title, description, done}.
    ///
    /// Unrecognized keys are silently ignored; recognized keys must carry
    /// the right type. Fields are checked in title, description, done order
    /// and the first failure wins.
    pub fn from_object(fields: &Map<String, Value>) -> TaskResult<Self> {
        let mut patch = TaskPatch::default();

        if let Some(title) = fields.get("title") {
            match title {
                Value::String(s) if !s.trim().is_empty() => {
                    patch.title = Some(s.clone());
                }
                _ => {
                    return Err(TaskError::Validation(
                        "Title is required if specified".to_string(),
                    ));
                }
            }
        }

        if let Some(description) = fields.get("description") {
            match description {
                Value::String(s) => patch.description = Some(Some(s.clone())),
                Value::Null => patch.description = Some(None),
                _ => {
                    return Err(TaskError::Validation(
                        "Description must be a string".to_string(),
                    ));
                }
            }
        }

        if let Some(done) = fields.get("done") {
            match done {
                Value::Bool(b) => patch.done = Some(*b),
                _ => {
                    return Err(TaskError::Validation("Done must be boolean".to_string()));
                }
            }
        }

        Ok(patch)
    }
}

impl Task {
    /// Merge accepted patch fields into this task
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(done) = patch.done {
            self.done = done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_task_missing_title_fails_validation() {
        let input: CreateTask = serde_json::from_value(json!({
            "description": "No title here"
        }))
        .unwrap();

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_task_blank_title_fails_validation() {
        let input: CreateTask = serde_json::from_value(json!({"title": "   "})).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_task_ignores_client_sent_id() {
        let input: CreateTask = serde_json::from_value(json!({
            "id": 42,
            "title": "Buy milk"
        }))
        .unwrap();

        assert_eq!(input.title.as_deref(), Some("Buy milk"));
        assert!(!input.done);
    }

    #[test]
    fn test_patch_accepts_recognized_fields() {
        let patch = TaskPatch::from_object(&object(json!({
            "title": "Now done",
            "done": true
        })))
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("Now done"));
        assert_eq!(patch.done, Some(true));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn test_patch_null_description_clears() {
        let patch = TaskPatch::from_object(&object(json!({"description": null}))).unwrap();
        assert_eq!(patch.description, Some(None));
    }

    #[test]
    fn test_patch_rejects_blank_title() {
        let err = TaskPatch::from_object(&object(json!({"title": ""}))).unwrap_err();
        assert!(err.to_string().contains("Title is required if specified"));
    }

    #[test]
    fn test_patch_rejects_non_string_description() {
        let err = TaskPatch::from_object(&object(json!({"description": 3}))).unwrap_err();
        assert!(err.to_string().contains("Description must be a string"));
    }

    #[test]
    fn test_patch_rejects_non_boolean_done() {
        let err = TaskPatch::from_object(&object(json!({"done": "yes"}))).unwrap_err();
        assert!(err.to_string().contains("Done must be boolean"));
    }

    #[test]
    fn test_patch_ignores_unrecognized_keys() {
        let patch = TaskPatch::from_object(&object(json!({
            "priority": "high",
            "done": false
        })))
        .unwrap();

        assert_eq!(patch, TaskPatch {
            done: Some(false),
            ..TaskPatch::default()
        });
    }

    #[test]
    fn test_apply_patch_touches_only_supplied_fields() {
        let mut task = Task {
            id: 1,
            title: "Write report".to_string(),
            description: Some("Quarterly numbers".to_string()),
            done: false,
        };

        task.apply_patch(TaskPatch {
            done: Some(true),
            ..TaskPatch::default()
        });

        assert!(task.done);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description.as_deref(), Some("Quarterly numbers"));
    }

    #[test]
    fn test_task_json_shape() {
        let task = Task {
            id: 7,
            title: "Buy milk".to_string(),
            description: None,
            done: false,
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            json!({"id": 7, "title": "Buy milk", "description": null, "done": false})
        );
    }
}
