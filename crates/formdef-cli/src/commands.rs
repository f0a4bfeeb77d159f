//! Subcommand bodies. Each takes document text and returns what to print.
use anyhow::{anyhow, Context, Result};
use formdef_catalog::{Catalog, Surface};
use formdef_core::{FormdefConfig, SubmissionValueMap, ValidationErrorMap};
use formdef_render::{OutlineRenderer, OutlineTemplates, RenderPlan};
use formdef_transform::{commit_input, transform_input, AffixSelection};
use formdef_validate::{check_complete, Progress, Validator};
use formdef_wire::{from_json, DecodedForm};
use serde::Serialize;
use serde_json::json;

/// Printed text and whether the command succeeded
#[derive(Debug)]
pub struct Report {
    pub output: String,
    pub ok: bool,
}

impl Report {
    fn ok(output: String) -> Self {
        Self { output, ok: true }
    }
}

fn pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn decode(form_json: &str, config: &FormdefConfig) -> Result<DecodedForm> {
    let decoded = from_json(form_json, config.unknown_field_types).context("decoding form definition")?;
    tracing::debug!(form = %decoded.form.id, fields = decoded.form.fields.len(), "form decoded");
    Ok(decoded)
}

fn parse_values(values_json: Option<&str>) -> Result<SubmissionValueMap> {
    match values_json {
        Some(json) => serde_json::from_str(json).context("parsing values"),
        None => Ok(SubmissionValueMap::new()),
    }
}

pub fn check(form_json: &str, config: &FormdefConfig) -> Result<Report> {
    let decoded = decode(form_json, config)?;
    let completeness = check_complete(&decoded.form);
    let output = pretty(&json!({
        "formId": decoded.form.id,
        "ok": completeness.ok,
        "reason": completeness.reason,
        "fields": decoded.form.fields.len(),
        "unsupported": decoded.unsupported,
    }))?;
    Ok(Report {
        output,
        ok: completeness.ok,
    })
}

pub fn validate(form_json: &str, values_json: &str, config: &FormdefConfig) -> Result<Report> {
    let decoded = decode(form_json, config)?;
    let values = parse_values(Some(values_json))?;
    let errors = Validator::new().validate(&decoded.form, &values);
    let progress = Progress::measure(&decoded.form, &values, config.empty_progress);

    let output = pretty(&json!({
        "errors": errors,
        "percent": progress.percent,
    }))?;
    Ok(Report {
        output,
        ok: errors.is_empty(),
    })
}

/// How `plan` prints
pub enum PlanFormat<'a> {
    Json,
    Outline { templates: Option<&'a str> },
}

pub fn plan(
    form_json: &str,
    values_json: Option<&str>,
    format: PlanFormat<'_>,
    config: &FormdefConfig,
) -> Result<Report> {
    let decoded = decode(form_json, config)?;
    let values = parse_values(values_json)?;
    let errors = match values_json {
        Some(_) => Validator::new().validate(&decoded.form, &values),
        None => ValidationErrorMap::new(),
    };

    let plan = RenderPlan::build_with(
        &decoded.form,
        &values,
        &errors,
        &Default::default(),
        config.empty_progress,
    )
    .with_unsupported(&decoded.unsupported, config.unknown_field_types)?;

    let output = match format {
        PlanFormat::Json => pretty(&plan)?,
        PlanFormat::Outline { templates } => {
            let templates = match templates {
                Some(yaml) => OutlineTemplates::from_yaml(yaml)?,
                None => OutlineTemplates::default(),
            };
            OutlineRenderer::with_templates(templates)?.outline(&plan)?
        }
    };
    Ok(Report::ok(output))
}

pub fn transform(
    form_json: &str,
    field_id: &str,
    raw: &str,
    selection: &AffixSelection,
    commit: bool,
    config: &FormdefConfig,
) -> Result<Report> {
    let decoded = decode(form_json, config)?;
    let field = decoded
        .form
        .field(field_id)
        .ok_or_else(|| anyhow!("FIELD/NOT_FOUND: {}", field_id))?;

    let stored = if commit {
        commit_input(field, raw, selection)
    } else {
        transform_input(field, raw, selection)
    };
    Ok(Report::ok(stored))
}

pub fn templates(surface: &str, extra_catalog: Option<&str>) -> Result<Report> {
    let surface: Surface = surface.parse()?;
    let mut catalog = surface.catalog();
    if let Some(yaml) = extra_catalog {
        catalog = catalog.extend(Catalog::from_yaml(yaml)?);
    }

    let width = catalog.keys().map(str::len).max().unwrap_or(0);
    let mut output = String::new();
    for key in catalog.keys() {
        if let Some(template) = catalog.get(key) {
            output.push_str(&format!(
                "{:width$}  {:<12}  {}{}\n",
                key,
                template.field_type.as_str(),
                template.label,
                if template.required { " *" } else { "" },
                width = width
            ));
        }
    }
    Ok(Report::ok(output.trim_end().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"{
        "id": "f-1",
        "formTitle": "Contact",
        "formDescription": "",
        "createdBy": "admin-1",
        "fields": [
            {"fieldType": "text", "label": "Name", "required": true,
             "properties": {"id": "name", "order": 1}},
            {"fieldType": "email", "label": "Email",
             "properties": {"id": "email", "order": 2}},
            {"fieldType": "tel", "label": "Phone",
             "properties": {"id": "phone", "order": 3, "inputMask": {"mask": "phone"}}}
        ]
    }"#;

    fn config() -> FormdefConfig {
        FormdefConfig::standalone()
    }

    #[test]
    fn test_check_reports_completeness() {
        let report = check(FORM, &config()).unwrap();
        assert!(report.ok);
        assert!(report.output.contains("\"fields\": 3"));

        let empty = r#"{"formTitle": "Empty", "createdBy": "u", "fields": []}"#;
        let report = check(empty, &config()).unwrap();
        assert!(!report.ok);
        assert!(report.output.contains("fields is empty"));
    }

    #[test]
    fn test_validate_single_bad_email() {
        let report = validate(FORM, r#"{"name": "Ada", "email": "not-an-email"}"#, &config()).unwrap();
        assert!(!report.ok);
        let parsed: serde_json::Value = serde_json::from_str(&report.output).unwrap();
        assert_eq!(parsed["errors"]["email"], "Please enter a valid email address");
        assert_eq!(parsed["errors"].as_object().unwrap().len(), 1);
        assert_eq!(parsed["percent"], 100);
    }

    #[test]
    fn test_transform_phone_mask() {
        let report = transform(FORM, "phone", "555-123-4567", &AffixSelection::default(), false, &config()).unwrap();
        assert_eq!(report.output, "(555) 123-4567");
        assert!(transform(FORM, "nope", "x", &AffixSelection::default(), false, &config()).is_err());
    }

    #[test]
    fn test_plan_outline() {
        let report = plan(FORM, None, PlanFormat::Outline { templates: None }, &config()).unwrap();
        assert!(report.output.starts_with("# Contact (0%)"));
        assert!(report.output.contains("1. Name [text input] *"));
    }

    #[test]
    fn test_templates_listing() {
        let report = templates("Sales", None).unwrap();
        assert!(report.output.contains("currency-smart"));
        assert!(templates("marketing", None).is_err());
    }
}
