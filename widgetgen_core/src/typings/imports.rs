//! Import resolution for generated typings.
//!
//! Symbols are only imported when the generated declarations actually
//! reference them, so the builtin groups below can list everything a
//! generator might emit.

use crate::error::Result;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use tracing::trace;

pub const REACT_MODULE: &str = "react";
pub const REACT_EXPORTS: &[&str] = &["ComponentType", "CSSProperties", "ReactNode"];

pub const MENDIX_MODULE: &str = "mendix";
pub const MENDIX_EXPORTS: &[&str] = &[
    "ActionValue",
    "DynamicValue",
    "EditableValue",
    "FileValue",
    "ListValue",
    "NativeIcon",
    "NativeImage",
    "ListActionValue",
    "ListAttributeValue",
    "ListExpressionValue",
    "ListReferenceValue",
    "ListReferenceSetValue",
    "ListWidgetValue",
    "ReferenceValue",
    "ReferenceSetValue",
    "SelectionSingleValue",
    "SelectionMultiValue",
    "WebIcon",
    "WebImage",
];

pub const BIG_JS_MODULE: &str = "big.js";
pub const BIG_JS_EXPORTS: &[&str] = &["Big"];

/// Symbols referenced from externally defined modules, keyed by module in
/// first-registration order. A symbol is stored once per module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalImports {
    modules: IndexMap<String, IndexSet<String>>,
}

impl ExternalImports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: &str, symbol: &str) {
        let symbols = self.modules.entry(module.to_string()).or_default();
        if symbols.insert(symbol.to_string()) {
            trace!(module = %module, symbol = %symbol, "Registered external import");
        }
    }

    /// Appends everything from `other` that is not registered yet.
    pub fn merge(&mut self, other: &ExternalImports) {
        for (module, symbols) in other.iter() {
            for symbol in symbols {
                self.register(module, symbol);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.modules.iter().map(|(module, symbols)| {
            (
                module.as_str(),
                symbols.iter().map(String::as_str).collect(),
            )
        })
    }
}

/// Returns the import line for the `available` symbols of `module` that occur
/// in `code` delimited by non-ASCII-word characters, or `None` when none occur.
pub fn generate_import(module: &str, code: &str, available: &[&str]) -> Result<Option<String>> {
    let mut used = Vec::new();
    for symbol in available {
        // ASCII-only non-word boundary on both sides
        let pattern = Regex::new(&format!(
            "[^0-9A-Za-z_]{}[^0-9A-Za-z_]",
            regex::escape(symbol)
        ))?;
        if pattern.is_match(code) {
            used.push(*symbol);
        }
    }
    if used.is_empty() {
        return Ok(None);
    }
    Ok(Some(format!(
        "import {{ {} }} from \"{}\";",
        used.join(", "),
        module
    )))
}

/// All import lines for `code`: react, mendix, big.js, then external modules.
pub fn generate_imports(code: &str, external: &ExternalImports) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let builtin = [
        (REACT_MODULE, REACT_EXPORTS),
        (MENDIX_MODULE, MENDIX_EXPORTS),
        (BIG_JS_MODULE, BIG_JS_EXPORTS),
    ];
    for (module, available) in builtin {
        lines.extend(generate_import(module, code, available)?);
    }
    for (module, symbols) in external.iter() {
        lines.extend(generate_import(module, code, &symbols)?);
    }
    Ok(lines)
}
