/// Schema validation for `metadata.json`
///
/// Validation is a pure function of the parsed document and the
/// directory-derived item id. Errors mark schema violations; warnings are
/// advisory and never block a build, so unknown fields from newer
/// documents only ever warn.
use serde_json::Value;

use super::data::FocalPoint;

/// Top-level fields every document must carry
pub const REQUIRED_FIELDS: [&str; 3] = ["id", "title", "focal_point"];

/// Top-level fields a document may carry
pub const OPTIONAL_FIELDS: [&str; 5] = ["path", "thumbnail", "fullscreen", "details", "metadata"];

/// Axes `focal_point` must define
const FOCAL_AXES: [&str; 2] = ["x", "y"];

/// Outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// No errors and no warnings
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Validate a parsed metadata document against the schema
pub fn validate(metadata: &Value, item_id: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(fields) = metadata.as_object() else {
        report
            .errors
            .push(format!("metadata must be an object, got {}", type_name(metadata)));
        return report;
    };

    for field in REQUIRED_FIELDS {
        if !fields.contains_key(field) {
            report.errors.push(format!("Missing required field: {}", field));
        }
    }

    if let Some(focal_point) = fields.get("focal_point") {
        check_focal_point(focal_point, &mut report);
    }

    match fields.get("title") {
        Some(Value::String(title)) if title.trim().is_empty() => {
            report.warnings.push("title is empty".to_string());
        }
        Some(Value::String(_)) | None => {}
        Some(other) => {
            report
                .errors
                .push(format!("title must be a string, got {}", type_name(other)));
        }
    }

    if let Some(id) = fields.get("id") {
        let matches = matches!(id, Value::String(id) if id == item_id);
        if !matches {
            let shown = match id {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            };
            report.warnings.push(format!(
                "id \"{}\" does not match directory name \"{}\"",
                shown, item_id
            ));
        }
    }

    for field in fields.keys() {
        let known = REQUIRED_FIELDS.contains(&field.as_str())
            || OPTIONAL_FIELDS.contains(&field.as_str());
        if !known {
            report.warnings.push(format!("Unexpected field: {}", field));
        }
    }

    report
}

fn check_focal_point(focal_point: &Value, report: &mut ValidationReport) {
    let Some(axes) = focal_point.as_object() else {
        report.errors.push(format!(
            "focal_point must be an object, got {}",
            type_name(focal_point)
        ));
        return;
    };

    for axis in FOCAL_AXES {
        match axes.get(axis) {
            None => report
                .errors
                .push(format!("focal_point missing required field: {}", axis)),
            Some(Value::Number(number)) => {
                let in_range = number.as_f64().is_some_and(FocalPoint::contains);
                if !in_range {
                    report.errors.push(format!(
                        "focal_point.{} must be between {} and {}, got {}",
                        axis,
                        FocalPoint::MIN,
                        FocalPoint::MAX,
                        number
                    ));
                }
            }
            Some(other) => report.errors.push(format!(
                "focal_point.{} must be a number, got {}",
                axis,
                type_name(other)
            )),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
