//! Plain-text outlines of a render plan.
//!
//! Uses Handlebars with a few helpers:
//! - percent: append `%` to a 0-100 number
//! - join: join an array (of strings or `{label}` objects) with a separator
//! - default: fallback for missing values

use std::collections::HashMap;

use handlebars::{Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext};
use serde::Deserialize;
use serde_json::Value;

use crate::plan::RenderPlan;
use crate::RenderError;

/// Name of the built-in outline template
pub const DEFAULT_OUTLINE: &str = "outline";

const OUTLINE_TEMPLATE: &str = "\
# {{title}}{{#if progress includeZero=true}} ({{percent progress}}){{/if}}
{{#if description}}{{description}}
{{/if}}
{{#each widgets}}
{{order}}. {{default label \"(untitled)\"}} [{{kind}}]{{#if required}} *{{/if}}{{#if options}}: {{join options \", \"}}{{/if}}{{#if error}} !! {{error}}{{/if}}
{{/each}}
[{{submitLabel}}]
";

/// Outline templates file (`templates:` map of name → body)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutlineTemplates {
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

impl OutlineTemplates {
    pub fn from_yaml(yaml: &str) -> Result<Self, RenderError> {
        serde_yaml::from_str(yaml).map_err(|e| RenderError::Templates(e.to_string()))
    }
}

/// Compiled outline renderer with registered helpers
pub struct OutlineRenderer<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> OutlineRenderer<'a> {
    /// Renderer with only the built-in outline
    pub fn new() -> Result<Self, RenderError> {
        Self::with_templates(OutlineTemplates::default())
    }

    /// Renderer with extra named templates; a template named `outline`
    /// replaces the built-in one
    pub fn with_templates(templates: OutlineTemplates) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("percent", Box::new(PercentHelper));
        handlebars.register_helper("join", Box::new(JoinHelper));
        handlebars.register_helper("default", Box::new(DefaultHelper));

        handlebars
            .register_template_string(DEFAULT_OUTLINE, OUTLINE_TEMPLATE)
            .map_err(|e| RenderError::Templates(e.to_string()))?;
        for (name, body) in &templates.templates {
            handlebars
                .register_template_string(name, body)
                .map_err(|e| RenderError::Templates(format!("{}: {}", name, e)))?;
        }

        Ok(Self { handlebars })
    }

    /// Render a plan with the named template
    pub fn render(&self, template_name: &str, plan: &RenderPlan) -> Result<String, RenderError> {
        let mut data = serde_json::to_value(plan).map_err(|e| RenderError::Render(e.to_string()))?;
        annotate_kinds(&mut data, plan);
        self.handlebars
            .render(template_name, &data)
            .map_err(|e| RenderError::Render(e.to_string()))
    }

    pub fn outline(&self, plan: &RenderPlan) -> Result<String, RenderError> {
        self.render(DEFAULT_OUTLINE, plan)
    }
}

// widget names are friendlier than the tagged enum in templates
fn annotate_kinds(data: &mut Value, plan: &RenderPlan) {
    if let Some(widgets) = data.get_mut("widgets").and_then(Value::as_array_mut) {
        for (json, spec) in widgets.iter_mut().zip(&plan.widgets) {
            if let Some(obj) = json.as_object_mut() {
                obj.insert("kind".to_string(), Value::from(spec.widget.name()));
            }
        }
    }
}

struct PercentHelper;

impl HelperDef for PercentHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper,
        _: &Handlebars,
        _: &Context,
        _: &mut RenderContext,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).and_then(|v| v.value().as_u64()).unwrap_or(0);
        out.write(&format!("{}%", value))?;
        Ok(())
    }
}

struct JoinHelper;

impl HelperDef for JoinHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper,
        _: &Handlebars,
        _: &Context,
        _: &mut RenderContext,
        out: &mut dyn Output,
    ) -> HelperResult {
        let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");

        if let Some(items) = h.param(0).and_then(|v| v.value().as_array()) {
            let strings: Vec<String> = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    Value::Object(obj) => obj
                        .get("label")
                        .and_then(Value::as_str)
                        .map(String::from)
                        .unwrap_or_else(|| item.to_string()),
                    other => other.to_string(),
                })
                .collect();
            out.write(&strings.join(separator))?;
        }
        Ok(())
    }
}

struct DefaultHelper;

impl HelperDef for DefaultHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper,
        _: &Handlebars,
        _: &Context,
        _: &mut RenderContext,
        out: &mut dyn Output,
    ) -> HelperResult {
        let fallback = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");
        match h.param(0).map(|v| v.value()) {
            Some(Value::String(s)) if !s.is_empty() => out.write(s)?,
            Some(v) if !v.is_null() && !v.is_string() => out.write(&v.to_string())?,
            _ => out.write(fallback)?,
        }
        Ok(())
    }
}
