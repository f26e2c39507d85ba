//! FeatureScript generation and result decoding
//!
//! Every numeric literal that carries a length is paired with the session's
//! unit name. The service treats bare numbers as dimensionless.

use glam::DVec3;
use serde_json::Value;

use super::entity::EntityType;
use crate::error::{CadError, CadResult};
use crate::units::UnitSystem;

/// Dimensioned vector literal, e.g. `(vector([1, 2, 0]) * inch)`
pub fn point_vector(point: DVec3, units: UnitSystem) -> String {
    format!(
        "(vector([{}, {}, {}]) * {})",
        point.x,
        point.y,
        point.z,
        units.fs_name()
    )
}

/// Dimensioned scalar literal, e.g. `(0.5*inch)`
pub fn with_units(value: f64, units: UnitSystem) -> String {
    format!("({}*{})", value, units.fs_name())
}

/// Line literal through a dimensioned origin; the direction stays unitless
pub fn line(origin: DVec3, direction: DVec3, units: UnitSystem) -> String {
    format!(
        "({{\"origin\": {}, \"direction\": vector([{}, {}, {}]) }} as Line)",
        point_vector(origin, units),
        direction.x,
        direction.y,
        direction.z
    )
}

/// Query that re-resolves a single transient id
pub fn transient_query(transient_id: &str) -> String {
    format!(
        "{{ \"queryType\" : QueryType.TRANSIENT, \"transientId\" : \"{}\" }} as Query",
        transient_id
    )
}

/// A single narrowing operator applied to a working set of entities
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    ContainsPoint(DVec3),
    ClosestTo(DVec3),
    Largest,
    Smallest,
    WithinRadius { point: DVec3, radius: f64 },
    IntersectsLine { origin: DVec3, direction: DVec3 },
    EntityType(EntityType),
}

impl Query {
    /// FeatureScript expression applying this operator to the query `q`
    pub fn inject_featurescript(&self, q: &str, units: UnitSystem) -> String {
        match self {
            Query::ContainsPoint(p) => format!("qContainsPoint({}, {})", q, point_vector(*p, units)),
            Query::ClosestTo(p) => format!("qClosestTo({}, {})", q, point_vector(*p, units)),
            Query::Largest => format!("qLargest({})", q),
            Query::Smallest => format!("qSmallest({})", q),
            Query::WithinRadius { point, radius } => format!(
                "qWithinRadius({}, {}, {})",
                q,
                point_vector(*point, units),
                with_units(*radius, units)
            ),
            Query::IntersectsLine { origin, direction } => format!(
                "qIntersectsLine({}, {})",
                q,
                line(*origin, *direction, units)
            ),
            Query::EntityType(t) => format!("qEntityFilter({}, {})", q, t.as_featurescript()),
        }
    }

    /// Whether the operator selects at most one entity
    pub fn picks_one(&self) -> bool {
        matches!(self, Query::ClosestTo(_) | Query::Largest | Query::Smallest)
    }
}

/// Wrap the body of a script in the evaluation function and return the
/// transient ids of `query_var`
fn evaluate_to_strings(body: &str, query_expr: &str) -> String {
    format!(
        "function(context is Context, queries) {{\n{}    var matching_entities = evaluateQuery(context, {});\n    return transientQueriesToStrings(matching_entities);\n}}\n",
        body, query_expr
    )
}

/// Script that unions `transient_ids`, applies `query` and returns the ids
/// of the matches
pub fn apply_query_script(transient_ids: &[String], query: &Query, units: UnitSystem) -> String {
    // serde_json renders the id list as a FeatureScript array literal
    let ids = serde_json::to_string(transient_ids).unwrap_or_else(|_| "[]".to_string());
    let body = format!(
        "    // Combine all transient ids into one query
    const transient_ids = {ids};
    var element_queries is array = makeArray(size(transient_ids));

    var idx = 0;
    for (var tid in transient_ids)
    {{
        var query = {{ \"queryType\" : QueryType.TRANSIENT, \"transientId\" : tid }} as Query;
        element_queries[idx] = query;
        idx += 1;
    }}

    var cumulative_query = qUnion(element_queries);

    // Apply specific query
    var specific_query = {specific};
",
        ids = ids,
        specific = query.inject_featurescript("cumulative_query", units)
    );
    evaluate_to_strings(&body, "specific_query")
}

/// Script returning everything created by a feature, optionally narrowed
/// to one entity type
pub fn created_by_script(feature_id: &str, entity_type: Option<EntityType>) -> String {
    let query = match entity_type {
        Some(t) => format!(
            "qCreatedBy(makeId(\"{}\"), {})",
            feature_id,
            t.as_featurescript()
        ),
        None => format!("qCreatedBy(makeId(\"{}\"))", feature_id),
    };
    evaluate_to_strings("", &query)
}

/// Script returning the closed regions of a sketch
pub fn sketch_region_script(sketch_id: &str) -> String {
    evaluate_to_strings(
        "",
        &format!("qSketchRegion(makeId(\"{}\"), false)", sketch_id),
    )
}

/// Script returning the entities of one type owned by a part
pub fn owned_by_body_script(part_id: &str, entity_type: EntityType) -> String {
    let body = format!("    var part = {};\n", transient_query(part_id));
    evaluate_to_strings(
        &body,
        &format!("qOwnedByBody(part, {})", entity_type.as_featurescript()),
    )
}

/// Decode the flat `[{value: id}, ...]` result of a script into ids
///
/// `result` is `None` when the service could not evaluate the script.
pub fn decode_transient_ids(result: Option<&Value>, script: &str) -> CadResult<Vec<String>> {
    let result = result.ok_or_else(|| CadError::script("Query has error", script))?;

    let items = result
        .get("value")
        .and_then(Value::as_array)
        .ok_or_else(|| CadError::script("Query returned a malformed result", script))?;

    items
        .iter()
        .map(|item| {
            item.get("value")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| CadError::script("Query returned a non-string transient id", script))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::mock::ids_result;

    #[test]
    fn test_literals_carry_units() {
        let p = DVec3::new(1.0, 2.5, 0.0);
        assert_eq!(point_vector(p, UnitSystem::Inch), "(vector([1, 2.5, 0]) * inch)");
        assert_eq!(with_units(0.5, UnitSystem::Metric), "(0.5*meter)");
        assert_eq!(
            line(DVec3::ZERO, DVec3::Z, UnitSystem::Inch),
            "({\"origin\": (vector([0, 0, 0]) * inch), \"direction\": vector([0, 0, 1]) } as Line)"
        );
    }

    #[test]
    fn test_operator_expressions() {
        let u = UnitSystem::Inch;
        assert_eq!(
            Query::ClosestTo(DVec3::new(0.0, 0.0, 1.0)).inject_featurescript("q", u),
            "qClosestTo(q, (vector([0, 0, 1]) * inch))"
        );
        assert_eq!(Query::Largest.inject_featurescript("q", u), "qLargest(q)");
        assert_eq!(
            Query::WithinRadius {
                point: DVec3::ZERO,
                radius: 2.0
            }
            .inject_featurescript("q", u),
            "qWithinRadius(q, (vector([0, 0, 0]) * inch), (2*inch))"
        );
        assert_eq!(
            Query::EntityType(EntityType::Edge).inject_featurescript("q", u),
            "qEntityFilter(q, EntityType.EDGE)"
        );
        assert!(Query::Smallest.picks_one());
        assert!(!Query::ContainsPoint(DVec3::ZERO).picks_one());
    }

    #[test]
    fn test_apply_script_unions_available() {
        let ids = vec!["JHD".to_string(), "JHK".to_string()];
        let script = apply_query_script(&ids, &Query::Largest, UnitSystem::Inch);
        assert!(script.starts_with("function(context is Context, queries) {"));
        assert!(script.contains("const transient_ids = [\"JHD\",\"JHK\"];"));
        assert!(script.contains("qUnion(element_queries)"));
        assert!(script.contains("var specific_query = qLargest(cumulative_query);"));
        assert!(script.contains("return transientQueriesToStrings(matching_entities);"));
    }

    #[test]
    fn test_fixed_scripts() {
        assert!(created_by_script("F1", Some(EntityType::Body))
            .contains("qCreatedBy(makeId(\"F1\"), EntityType.BODY)"));
        assert!(created_by_script("F1", None).contains("qCreatedBy(makeId(\"F1\"))"));
        assert!(sketch_region_script("F2").contains("qSketchRegion(makeId(\"F2\"), false)"));
        let owned = owned_by_body_script("JHD", EntityType::Face);
        assert!(owned.contains("\"transientId\" : \"JHD\" } as Query;"));
        assert!(owned.contains("qOwnedByBody(part, EntityType.FACE)"));
    }

    #[test]
    fn test_decode_ids() {
        let value = ids_result(&["A", "B"]);
        assert_eq!(decode_transient_ids(Some(&value), "s").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn test_decode_failure_carries_script() {
        let err = decode_transient_ids(None, "function() {}").unwrap_err();
        assert_eq!(err.script_text(), Some("function() {}"));

        let bad = serde_json::json!({"value": 3});
        let err = decode_transient_ids(Some(&bad), "s2").unwrap_err();
        assert_eq!(err.script_text(), Some("s2"));
    }
}
