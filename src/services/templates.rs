// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML view rendering with Tera.
//!
//! Templates are embedded at compile time, so the binary has no runtime
//! dependency on the `templates/` directory.

use crate::error::AppError;
use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATES: [(&str, &str); 9] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("home.html", include_str!("../../templates/home.html")),
    ("login.html", include_str!("../../templates/login.html")),
    ("signup.html", include_str!("../../templates/signup.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("travel.html", include_str!("../../templates/travel.html")),
    (
        "travel_confirmation.html",
        include_str!("../../templates/travel_confirmation.html"),
    ),
    ("rewards.html", include_str!("../../templates/rewards.html")),
    ("profile.html", include_str!("../../templates/profile.html")),
];

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template compilation failed: {0}")]
    Compile(String),

    #[error("Template rendering failed: {0}")]
    Render(String),
}

impl From<TemplateError> for AppError {
    fn from(e: TemplateError) -> Self {
        AppError::Template(e.to_string())
    }
}

/// Compiled view templates.
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_templates(TEMPLATES)
            .map_err(|e| TemplateError::Compile(full_message(&e)))?;

        tracing::debug!(count = TEMPLATES.len(), "Templates compiled");
        Ok(Self { tera })
    }

    /// Render `name` with a serializable context.
    pub fn render<C: Serialize>(&self, name: &str, ctx: &C) -> Result<Html<String>, TemplateError> {
        let context =
            Context::from_serialize(ctx).map_err(|e| TemplateError::Render(full_message(&e)))?;
        self.tera
            .render(name, &context)
            .map(Html)
            .map_err(|e| TemplateError::Render(full_message(&e)))
    }
}

/// Tera nests the useful detail in `source()`.
fn full_message(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
