use std::collections::BTreeSet;

use anyhow::Context;

use crate::{
    catalog::template::LayoutTemplate,
    foundation::error::{PanelError, PanelResult},
};

const BUILTIN_JSON: &str = include_str!("../../data/layouts.json");
const CATALOG_VERSION: u32 = 1;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct CatalogFile {
    version: u32,
    templates: Vec<LayoutTemplate>,
}

/// Read-only set of layout templates, in authoring order.
#[derive(Clone, Debug, Default)]
pub struct LayoutCatalog {
    templates: Vec<LayoutTemplate>,
}

impl LayoutCatalog {
    /// Templates bundled with the crate, covering 1 through 9 panels.
    pub fn builtin() -> PanelResult<Self> {
        Self::from_json_str(BUILTIN_JSON)
    }

    pub fn from_json_str(s: &str) -> PanelResult<Self> {
        let file: CatalogFile = serde_json::from_str(s)
            .context("parse layout catalog JSON")
            .map_err(|e| PanelError::serde(format!("{e:#}")))?;
        if file.version != CATALOG_VERSION {
            return Err(PanelError::layout(format!(
                "unsupported layout catalog version {} (expected {CATALOG_VERSION})",
                file.version
            )));
        }
        Self::from_templates(file.templates)
    }

    pub fn from_templates(templates: Vec<LayoutTemplate>) -> PanelResult<Self> {
        let mut seen = BTreeSet::new();
        for t in &templates {
            t.validate()?;
            if !seen.insert(t.id.as_str()) {
                return Err(PanelError::layout(format!(
                    "duplicate layout template id '{}'",
                    t.id
                )));
            }
        }
        Ok(Self { templates })
    }

    pub fn to_json_string(&self) -> PanelResult<String> {
        let file = CatalogFile {
            version: CATALOG_VERSION,
            templates: self.templates.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| PanelError::serde(e.to_string()))
    }

    pub fn templates(&self) -> &[LayoutTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates with exactly `n` panels. An empty result is valid: the caller
    /// decides how to present "no layouts available".
    pub fn templates_for_panel_count(&self, n: usize) -> Vec<&LayoutTemplate> {
        self.templates
            .iter()
            .filter(|t| t.panel_count == n)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&LayoutTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn require(&self, id: &str) -> PanelResult<&LayoutTemplate> {
        self.get(id)
            .ok_or_else(|| PanelError::layout(format!("unknown layout template '{id}'")))
    }

    /// Distinct panel counts present in the catalog, ascending.
    pub fn panel_counts(&self) -> Vec<usize> {
        self.templates
            .iter()
            .map(|t| t.panel_count)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/library.rs"]
mod tests;
