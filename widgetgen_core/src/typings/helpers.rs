use crate::descriptor::Property;
use indexmap::IndexSet;

/// Uppercases the first character only; the rest of the key is kept as written.
pub fn capitalize_first_letter(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Joins the members with ` | `, dropping repeats but keeping first-seen order.
pub fn to_unique_union_type<I, S>(types: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    types
        .into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(" | ")
}

/// The properties visible while generating one interface body.
///
/// Inside an object property, `"../key"` addresses a sibling of the object
/// itself. Only one level is supported: the remainder after the first `../`
/// is matched literally against the parent list.
#[derive(Debug, Clone, Copy)]
pub struct PropertyScope<'a> {
    properties: &'a [Property],
    parent: Option<&'a [Property]>,
}

impl<'a> PropertyScope<'a> {
    pub fn root(properties: &'a [Property]) -> Self {
        Self {
            properties,
            parent: None,
        }
    }

    /// Scope for the children of an object property declared in `self`.
    pub fn child(&self, properties: &'a [Property]) -> Self {
        Self {
            properties,
            parent: Some(self.properties),
        }
    }

    pub fn properties(&self) -> &'a [Property] {
        self.properties
    }

    pub fn resolve(&self, key: &str) -> Option<&'a Property> {
        match key.strip_prefix("../") {
            Some(parent_key) => self
                .parent
                .and_then(|parent| parent.iter().find(|p| p.key == parent_key)),
            None => self.properties.iter().find(|p| p.key == key),
        }
    }
}

/// True when `property` is linked to a data source that is itself optional.
pub fn has_optional_data_source(property: &Property, scope: &PropertyScope<'_>) -> bool {
    property
        .data_source
        .as_deref()
        .and_then(|key| scope.resolve(key))
        .is_some_and(|data_source| !data_source.required)
}
