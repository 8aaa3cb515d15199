// src/emit/templates.rs
//! Handlebars templates for the fixed-shape generated files.

use crate::constants::GENERATED_MARKER;
use crate::error::AppError;
use crate::symbols::UnmarshalTest;
use crate::naming::snake_case;
use handlebars::Handlebars;
use serde_json::json;

const RUNTIME_TEMPLATE: &str = include_str!("../../templates/runtime.rs.hbs");
const MOD_TEMPLATE: &str = include_str!("../../templates/mod.rs.hbs");
const TESTS_TEMPLATE: &str = include_str!("../../templates/tests.rs.hbs");

/// The registered template set.
#[derive(Debug)]
pub struct Templates {
    engine: Handlebars<'static>,
}

impl Templates {
    pub fn load() -> Result<Self, AppError> {
        let mut engine = Handlebars::new();
        engine.set_strict_mode(true);
        engine.register_escape_fn(handlebars::no_escape);
        for (name, source) in [
            ("runtime", RUNTIME_TEMPLATE),
            ("mod", MOD_TEMPLATE),
            ("tests", TESTS_TEMPLATE),
        ] {
            engine
                .register_template_string(name, source)
                .map_err(|e| AppError::TemplateRenderError {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(Self { engine })
    }

    pub fn runtime(&self) -> Result<String, AppError> {
        self.render("runtime", &json!({ "marker": GENERATED_MARKER }))
    }

    /// The wiring module: one `mod` + `pub use` per generated module, plus the
    /// test modules.
    pub fn module_index(&self, modules: &[String], test_modules: &[String]) -> Result<String, AppError> {
        self.render(
            "mod",
            &json!({
                "marker": GENERATED_MARKER,
                "modules": modules,
                "test_modules": test_modules,
            }),
        )
    }

    /// Round-trip tests for one page, numbered per target type.
    pub fn tests(&self, source_url: &str, tests: &[UnmarshalTest]) -> Result<String, AppError> {
        let mut seen: Vec<(&str, usize)> = Vec::new();
        let cases: Vec<_> = tests
            .iter()
            .map(|test| {
                let count = match seen.iter_mut().find(|(t, _)| *t == test.target) {
                    Some((_, n)) => {
                        *n += 1;
                        *n
                    }
                    None => {
                        seen.push((&test.target, 1));
                        1
                    }
                };
                json!({
                    "name": format!("unmarshal_{}_{}", snake_case(&test.target), count),
                    "target": test.target,
                    "json": test.json.trim(),
                })
            })
            .collect();
        self.render(
            "tests",
            &json!({
                "marker": GENERATED_MARKER,
                "source_url": source_url,
                "tests": cases,
            }),
        )
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, AppError> {
        self.engine
            .render(name, data)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })
    }
}
