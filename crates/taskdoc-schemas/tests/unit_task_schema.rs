//! Unit tests for the bundled task schema
//!
//! These exercise the schema that ships with the crate the way the pipeline
//! uses it: required fields, enumerations, date shapes and pass-through of
//! unknown fields.

use serde_json::json;
use taskdoc_schemas::{JsonSchemaValidator, SchemaLoader, TaskValidator};

fn validator() -> JsonSchemaValidator {
    JsonSchemaValidator::new(SchemaLoader::bundled())
}

fn complete_task() -> serde_json::Value {
    json!({
        "id": "T-200",
        "summary": "ok",
        "priority": "P1",
        "status": "open",
        "created": "2020-01-01",
        "updated": "2020-01-01"
    })
}

#[cfg(test)]
mod required_field_validation {
    use super::*;

    #[test]
    fn test_complete_task_is_valid() {
        let outcome = validator().validate(&complete_task()).unwrap();
        assert!(outcome.ok, "unexpected errors: {}", outcome.summary());
    }

    #[test]
    fn test_summary_is_optional() {
        let mut task = complete_task();
        task.as_object_mut().unwrap().remove("summary");
        assert!(validator().validate(&task).unwrap().ok);
    }

    #[test]
    fn test_missing_id_is_invalid() {
        let outcome = validator().validate(&json!({"summary": "no id here"})).unwrap();
        assert!(!outcome.ok);
        assert!(outcome.summary().contains("\"id\""));
    }

    #[test]
    fn test_every_required_field_is_reported() {
        let outcome = validator()
            .validate(&json!({"id": "T-100", "summary": "missing fields"}))
            .unwrap();
        assert!(!outcome.ok);
        let summary = outcome.summary();
        for field in ["priority", "status", "created", "updated"] {
            assert!(summary.contains(field), "{} not reported in {}", field, summary);
        }
    }
}

#[cfg(test)]
mod field_constraints {
    use super::*;

    #[test]
    fn test_priority_enum() {
        let mut task = complete_task();
        task["priority"] = json!("BAD");
        let outcome = validator().validate(&task).unwrap();
        assert!(!outcome.ok);
        assert_eq!(outcome.errors.errors[0].path, "/priority");
    }

    #[test]
    fn test_status_enum() {
        for status in ["open", "in-progress", "blocked", "done"] {
            let mut task = complete_task();
            task["status"] = json!(status);
            assert!(validator().validate(&task).unwrap().ok, "{} rejected", status);
        }

        let mut task = complete_task();
        task["status"] = json!("closed");
        assert!(!validator().validate(&task).unwrap().ok);
    }

    #[test]
    fn test_dates_must_be_calendar_dates() {
        let mut task = complete_task();
        task["created"] = json!("2024-01-01T12:00:00.000Z");
        let outcome = validator().validate(&task).unwrap();
        assert!(!outcome.ok);
        assert_eq!(outcome.errors.errors[0].path, "/created");
    }

    #[test]
    fn test_validations_must_be_array() {
        let mut task = complete_task();
        task["validations"] = json!("npm test");
        assert!(!validator().validate(&task).unwrap().ok);

        task["validations"] = json!(["npm test"]);
        assert!(validator().validate(&task).unwrap().ok);
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let mut task = complete_task();
        task["estimate"] = json!("2d");
        task["links"] = json!({"pr": 42});
        assert!(validator().validate(&task).unwrap().ok);
    }
}

#[cfg(test)]
mod schema_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_any_known_priority_and_status_is_valid(
            priority in prop::sample::select(vec!["P0", "P1", "P2", "P3"]),
            status in prop::sample::select(vec!["open", "in-progress", "blocked", "done"]),
            year in 1000u32..9999,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let mut task = complete_task();
            task["priority"] = json!(priority);
            task["status"] = json!(status);
            task["created"] = json!(format!("{:04}-{:02}-{:02}", year, month, day));

            let outcome = validator().validate(&task).unwrap();
            prop_assert!(outcome.ok, "unexpected errors: {}", outcome.summary());
        }

        #[test]
        fn prop_unknown_priority_is_rejected(priority in "[a-z]{1,8}") {
            let mut task = complete_task();
            task["priority"] = json!(priority);

            let outcome = validator().validate(&task).unwrap();
            prop_assert!(!outcome.ok);
            prop_assert!(outcome.summary().starts_with("/priority "));
        }
    }
}
