//! Schema-driven planning.
//!
//! A plan compares prior state with the proposed configuration, attribute by
//! attribute, and decides whether the change can be applied in place.
//!
//! - Computed attributes become unknown (null) whenever anything else
//!   changes, unless the schema marks them stable.
//! - A change to a force-new attribute, or a force-new computed attribute
//!   becoming unknown, requires replacement.

use serde_json::{Map, Value};

use crate::schema::Schema;
use crate::types::{AttributeChange, PlanResult};

/// Plan a resource change.
///
/// `prior` is `None` (or null) for a create; a null `proposed` plans a delete.
pub fn plan(schema: &Schema, prior: Option<&Value>, proposed: &Value) -> PlanResult {
    if proposed.is_null() {
        return PlanResult::no_change(Value::Null);
    }

    match prior.filter(|p| !p.is_null()) {
        None => plan_create(schema, proposed),
        Some(prior) => plan_update(schema, prior, proposed),
    }
}

fn plan_create(schema: &Schema, proposed: &Value) -> PlanResult {
    let mut planned = Map::new();
    let mut changes = Vec::new();

    for name in sorted_names(schema) {
        let attr = &schema.attributes[name];
        if attr.flags.is_computed_only() {
            planned.insert(name.clone(), Value::Null);
            continue;
        }

        let value = lookup(proposed, name);
        if !value.is_null() {
            changes.push(AttributeChange::added(name.clone(), value.clone()));
        }
        planned.insert(name.clone(), value);
    }

    PlanResult::with_changes(Value::Object(planned), changes, false)
}

fn plan_update(schema: &Schema, prior: &Value, proposed: &Value) -> PlanResult {
    let mut planned = Map::new();
    let mut changes = Vec::new();
    let mut requires_replace = false;

    let names = sorted_names(schema);

    for &name in &names {
        let attr = &schema.attributes[name];
        if attr.flags.is_computed_only() {
            continue;
        }

        let before = lookup(prior, name);
        let after = lookup(proposed, name);
        if before != after {
            requires_replace |= attr.force_new;
            changes.push(AttributeChange::modified(
                name.clone(),
                before,
                after.clone(),
            ));
        }
        planned.insert(name.clone(), after);
    }

    let configuration_changed = !changes.is_empty();

    for &name in &names {
        let attr = &schema.attributes[name];
        if !attr.flags.is_computed_only() {
            continue;
        }

        let before = lookup(prior, name);
        if configuration_changed && !attr.stable {
            requires_replace |= attr.force_new;
            if !before.is_null() {
                changes.push(AttributeChange::unknown(name.clone(), before));
            }
            planned.insert(name.clone(), Value::Null);
        } else {
            planned.insert(name.clone(), before);
        }
    }

    if changes.is_empty() {
        PlanResult::no_change(Value::Object(planned))
    } else {
        PlanResult::with_changes(Value::Object(planned), changes, requires_replace)
    }
}

fn sorted_names(schema: &Schema) -> Vec<&String> {
    let mut names: Vec<&String> = schema.attributes.keys().collect();
    names.sort();
    names
}

fn lookup(value: &Value, name: &str) -> Value {
    value.get(name).cloned().unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;
    use serde_json::json;

    fn image_schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string().with_stable_value())
            .with_attribute("file", Attribute::required_string())
            .with_attribute("checksum", Attribute::computed_string().with_force_new())
    }

    fn achievement_schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string().with_stable_value())
            .with_attribute("vendor_id", Attribute::required_string().with_force_new())
            .with_attribute("points", Attribute::required_int64())
    }

    #[test]
    fn test_plan_create() {
        let result = plan(
            &achievement_schema(),
            None,
            &json!({"vendor_id": "SPEEDRUN_1", "points": 100}),
        );

        assert!(!result.requires_replace);
        assert_eq!(result.changes.len(), 2);
        assert_eq!(result.planned_state["id"], Value::Null);
        assert_eq!(result.planned_state["vendor_id"], "SPEEDRUN_1");
    }

    #[test]
    fn test_plan_in_place_update_keeps_stable_id() {
        let prior = json!({"id": "a1", "vendor_id": "SPEEDRUN_1", "points": 10});
        let result = plan(
            &achievement_schema(),
            Some(&prior),
            &json!({"vendor_id": "SPEEDRUN_1", "points": 100}),
        );

        assert!(!result.requires_replace);
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.changes[0].path, "points");
        assert_eq!(result.planned_state["id"], "a1");
        assert_eq!(result.planned_state["points"], 100);
    }

    #[test]
    fn test_plan_force_new_attribute_replaces() {
        let prior = json!({"id": "a1", "vendor_id": "SPEEDRUN_1", "points": 10});
        let result = plan(
            &achievement_schema(),
            Some(&prior),
            &json!({"vendor_id": "SPEEDRUN_2", "points": 10}),
        );

        assert!(result.requires_replace);
    }

    #[test]
    fn test_plan_no_changes() {
        let prior = json!({"id": "img-1", "file": "gold.png", "checksum": "abc"});
        let result = plan(&image_schema(), Some(&prior), &json!({"file": "gold.png"}));

        assert!(result.changes.is_empty());
        assert!(!result.requires_replace);
        assert_eq!(result.planned_state["checksum"], "abc");
        assert_eq!(result.planned_state["id"], "img-1");
    }

    #[test]
    fn test_plan_drifted_file_replaces_through_checksum() {
        // A drifted image has its file cleared in state by read.
        let prior = json!({"id": "img-1", "file": "", "checksum": "abc"});
        let result = plan(&image_schema(), Some(&prior), &json!({"file": "gold.png"}));

        assert!(result.requires_replace);
        assert_eq!(result.planned_state["checksum"], Value::Null);
        assert!(result.changes.iter().any(|c| c.path == "checksum"));
        assert!(result.changes.iter().any(|c| c.path == "file"));
    }

    #[test]
    fn test_plan_delete() {
        let prior = json!({"id": "a1"});
        let result = plan(&achievement_schema(), Some(&prior), &Value::Null);
        assert_eq!(result.planned_state, Value::Null);
        assert!(!result.requires_replace);
    }
}
