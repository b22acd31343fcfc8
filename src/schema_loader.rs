//! Shape validation for the catalog and glossary inputs.
//!
//! Both JSON Schemas ship inside the binary so a data directory only has to
//! carry the data files. Loaders run the raw JSON through these validators
//! before typed deserialization, which keeps error messages pointed at the
//! offending JSON location instead of a serde type path.

use anyhow::{Context, Result, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::sync::OnceLock;

const CATALOG_SCHEMA: &str = include_str!("../schema/catalog.schema.json");
const GLOSSARY_SCHEMA: &str = include_str!("../schema/glossary.schema.json");

/// Which input document a schema describes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ShapeKind {
    Catalog,
    Glossary,
}

impl ShapeKind {
    fn label(self) -> &'static str {
        match self {
            ShapeKind::Catalog => "catalog",
            ShapeKind::Glossary => "glossary",
        }
    }

    fn raw(self) -> &'static str {
        match self {
            ShapeKind::Catalog => CATALOG_SCHEMA,
            ShapeKind::Glossary => GLOSSARY_SCHEMA,
        }
    }

    fn cell(self) -> &'static OnceLock<Value> {
        static CATALOG: OnceLock<Value> = OnceLock::new();
        static GLOSSARY: OnceLock<Value> = OnceLock::new();
        match self {
            ShapeKind::Catalog => &CATALOG,
            ShapeKind::Glossary => &GLOSSARY,
        }
    }
}

// The compiled validator borrows the schema document, so the parsed schema is
// kept for the life of the process.
fn schema_value(kind: ShapeKind) -> Result<&'static Value> {
    let cell = kind.cell();
    if let Some(existing) = cell.get() {
        return Ok(existing);
    }
    let parsed: Value = serde_json::from_str(kind.raw())
        .with_context(|| format!("parsing bundled {} schema", kind.label()))?;
    Ok(cell.get_or_init(move || parsed))
}

pub(crate) fn compile_schema(kind: ShapeKind) -> Result<JSONSchema> {
    let schema = schema_value(kind)?;
    JSONSchema::compile(schema).with_context(|| format!("compiling {} schema", kind.label()))
}

/// Validate `instance` against the bundled schema for `kind`.
///
/// All violations are reported at once, one per line.
pub(crate) fn validate_shape(kind: ShapeKind, instance: &Value) -> Result<()> {
    let compiled = compile_schema(kind)?;
    if let Err(errors) = compiled.validate(instance) {
        let details = errors
            .map(|err| format!("{} at '{}'", err, err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("{} failed schema validation:\n{}", kind.label(), details);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_schemas_compile() {
        compile_schema(ShapeKind::Catalog).expect("catalog schema compiles");
        compile_schema(ShapeKind::Glossary).expect("glossary schema compiles");
    }

    #[test]
    fn catalog_shape_requires_status() {
        let ok = json!([{"name": "X", "treaties": ["T1"], "deathPenalty": 2}]);
        validate_shape(ShapeKind::Catalog, &ok).expect("valid catalog");

        let missing = json!([{"name": "X", "treaties": ["T1"]}]);
        let err = validate_shape(ShapeKind::Catalog, &missing).expect_err("status required");
        assert!(err.to_string().contains("catalog failed schema validation"));
    }

    #[test]
    fn catalog_shape_accepts_keyed_objects_and_null_tags() {
        let keyed = json!({"X": {"memberships": null, "deathPenalty": "1"}});
        validate_shape(ShapeKind::Catalog, &keyed).expect("object form is valid");

        let bad_tags = json!([{"name": "X", "situations": "war", "deathPenalty": 0}]);
        assert!(validate_shape(ShapeKind::Catalog, &bad_tags).is_err());
    }

    #[test]
    fn glossary_shape_allows_plain_and_detailed_entries() {
        let glossary = json!({
            "un": "United Nations",
            "iccpr_op2": {"name": "ICCPR-OP2", "longName": "Second Optional Protocol"}
        });
        validate_shape(ShapeKind::Glossary, &glossary).expect("valid glossary");
        assert!(validate_shape(ShapeKind::Glossary, &json!(["un"])).is_err());
        assert!(validate_shape(ShapeKind::Glossary, &json!({"un": 4})).is_err());
    }
}
