//! Property schema model of a widget descriptor.
//!
//! [`WidgetDescriptor::from_document`] turns the loosely typed document tree
//! into a validated model. Structural rules (objects need child properties,
//! selections need selection types) are enforced here, so the generators only
//! ever see well-formed properties.

pub mod raw;

use crate::error::{Result, WidgetgenError};
use raw::{PropertiesElement, PropertyElement, WidgetDocument};
use std::path::Path;
use tracing::{debug, trace, warn};

pub const LABEL_SYSTEM_PROPERTY: &str = "Label";

/// Target platform of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Web,
    Native,
}

impl Platform {
    fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("Native") => Platform::Native,
            _ => Platform::Web,
        }
    }
}

/// A reserved, framework-defined property such as `Label` or `TabIndex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemProperty {
    pub key: String,
}

/// Returns true when the `Label` system property is present.
pub fn is_labeled(system_properties: &[SystemProperty]) -> bool {
    system_properties
        .iter()
        .any(|p| p.key == LABEL_SYSTEM_PROPERTY)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Boolean,
    String,
    Action,
    TextTemplate,
    Integer,
    Decimal,
    Icon,
    Image,
    File,
    Datasource,
    Attribute {
        attribute_types: Vec<String>,
    },
    Association {
        association_types: Vec<String>,
    },
    Expression {
        return_type: Option<String>,
    },
    Enumeration {
        values: Vec<String>,
    },
    Object {
        properties: Vec<Property>,
        is_list: bool,
    },
    Widgets,
    /// Never empty.
    Selection {
        selection_types: Vec<String>,
    },
    /// `"Symbol:module"` reference to a type defined outside the generated file.
    External {
        symbol: String,
        module: String,
    },
    /// Anything else, including a missing type and malformed external references.
    /// Rendered as `any`.
    Unknown {
        type_name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub kind: PropertyKind,
    pub required: bool,
    /// Key of the data source property this property is linked to.
    pub data_source: Option<String>,
}

impl Property {
    pub fn new(key: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: true,
            data_source: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn linked_to(mut self, data_source: impl Into<String>) -> Self {
        self.data_source = Some(data_source.into());
        self
    }

    /// Builds a property from its element. Returns `Ok(None)` for elements
    /// without a usable key; those are skipped silently.
    pub fn from_element(element: &PropertyElement) -> Result<Option<Property>> {
        let attributes = &element.attributes;
        let key = match attributes.key.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                trace!("Skipping property element without key");
                return Ok(None);
            }
        };

        let kind = PropertyKind::from_element(&key, element)?;

        Ok(Some(Property {
            key,
            kind,
            required: attributes.required.as_deref() != Some("false"),
            data_source: attributes
                .data_source
                .as_ref()
                .filter(|ds| !ds.is_empty())
                .cloned(),
        }))
    }
}

impl PropertyKind {
    fn from_element(key: &str, element: &PropertyElement) -> Result<PropertyKind> {
        let type_name = element.attributes.type_name.as_deref();
        let kind = match type_name {
            Some("boolean") => PropertyKind::Boolean,
            Some("string") => PropertyKind::String,
            Some("action") => PropertyKind::Action,
            Some("textTemplate") => PropertyKind::TextTemplate,
            Some("integer") => PropertyKind::Integer,
            Some("decimal") => PropertyKind::Decimal,
            Some("icon") => PropertyKind::Icon,
            Some("image") => PropertyKind::Image,
            Some("file") => PropertyKind::File,
            Some("datasource") => PropertyKind::Datasource,
            Some("widgets") => PropertyKind::Widgets,
            Some("attribute") => PropertyKind::Attribute {
                attribute_types: element
                    .attribute_types
                    .iter()
                    .flat_map(|types| types.attribute_type.iter())
                    .filter_map(|t| t.attributes.name.clone())
                    .collect(),
            },
            Some("association") => PropertyKind::Association {
                association_types: element
                    .association_types
                    .iter()
                    .flat_map(|types| types.association_type.iter())
                    .filter_map(|t| t.attributes.name.clone())
                    .collect(),
            },
            Some("expression") => PropertyKind::Expression {
                return_type: element
                    .return_type
                    .first()
                    .and_then(|rt| rt.attributes.type_name.clone()),
            },
            Some("enumeration") => PropertyKind::Enumeration {
                values: element
                    .enumeration_values
                    .iter()
                    .flat_map(|values| values.enumeration_value.iter())
                    .filter_map(|v| v.attributes.key.clone())
                    .collect(),
            },
            Some("object") => {
                let properties = match element.properties.first() {
                    Some(children) => extract_properties(children)?,
                    None => Vec::new(),
                };
                if properties.is_empty() {
                    return Err(WidgetgenError::validation(
                        "[XML] Object property requires properties element",
                    ));
                }
                PropertyKind::Object {
                    properties,
                    is_list: element.attributes.is_list.as_deref() == Some("true"),
                }
            }
            Some("selection") => {
                let selection_types: Vec<String> = element
                    .selection_types
                    .iter()
                    .flat_map(|types| types.selection_type.iter())
                    .filter_map(|t| t.attributes.name.clone())
                    .collect();
                if selection_types.is_empty() {
                    return Err(WidgetgenError::validation(
                        "[XML] Selection property requires selectionTypes element",
                    ));
                }
                PropertyKind::Selection { selection_types }
            }
            Some(other) => Self::external_or_unknown(key, other),
            None => {
                warn!(key = %key, "Property has no type, falling back to any");
                PropertyKind::Unknown { type_name: None }
            }
        };
        Ok(kind)
    }

    fn external_or_unknown(key: &str, type_name: &str) -> PropertyKind {
        let parts: Vec<&str> = type_name.split(':').collect();
        if let [symbol, module] = parts.as_slice() {
            debug!(key = %key, symbol = %symbol, module = %module, "External type reference");
            return PropertyKind::External {
                symbol: symbol.to_string(),
                module: module.to_string(),
            };
        }
        warn!(key = %key, type_name = %type_name, "Unknown property type, falling back to any");
        PropertyKind::Unknown {
            type_name: Some(type_name.to_string()),
        }
    }
}

/// Keyed properties of a properties element, in document order.
pub fn extract_properties(element: &PropertiesElement) -> Result<Vec<Property>> {
    let mut properties = Vec::new();
    for property in element.extract_properties() {
        if let Some(property) = Property::from_element(property)? {
            properties.push(property);
        }
    }
    Ok(properties)
}

/// Keyed system properties of a properties element, in document order.
pub fn extract_system_properties(element: &PropertiesElement) -> Vec<SystemProperty> {
    element
        .extract_system_properties()
        .into_iter()
        .filter_map(|p| p.attributes.key.clone())
        .filter(|key| !key.is_empty())
        .map(|key| SystemProperty { key })
        .collect()
}

/// Validated widget descriptor, ready for typings generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub platform: Platform,
    pub properties: Vec<Property>,
    pub system_properties: Vec<SystemProperty>,
}

impl WidgetDescriptor {
    pub fn from_document(document: &WidgetDocument) -> Result<WidgetDescriptor> {
        let widget = document
            .widget
            .as_ref()
            .filter(|w| w.properties.as_ref().is_some_and(|p| !p.is_empty()))
            .ok_or_else(|| {
                WidgetgenError::validation("[XML] XML doesn't contains <properties> element")
            })?;

        if widget.attributes.plugin_widget.as_deref() != Some("true") {
            return Err(WidgetgenError::validation(
                "[XML] Attribute pluginWidget=true not found. Please review your XML",
            ));
        }

        let platform = Platform::from_attribute(widget.attributes.supported_platform.as_deref());

        let (properties, system_properties) = match widget.properties.as_ref().and_then(|p| p.first())
        {
            Some(element) => (
                extract_properties(element)?,
                extract_system_properties(element),
            ),
            None => (Vec::new(), Vec::new()),
        };

        debug!(
            platform = ?platform,
            property_count = properties.len(),
            system_property_count = system_properties.len(),
            "Descriptor validated"
        );

        Ok(WidgetDescriptor {
            platform,
            properties,
            system_properties,
        })
    }
}

impl WidgetDocument {
    pub fn from_json_str(json: &str) -> Result<WidgetDocument> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<WidgetDocument> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_file(path: &Path) -> Result<WidgetDocument> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(value: serde_json::Value) -> PropertyElement {
        serde_json::from_value(value).unwrap()
    }

    fn document(value: serde_json::Value) -> WidgetDocument {
        WidgetDocument::from_value(value).unwrap()
    }

    // ==================== PropertyKind Tests ====================

    #[test]
    fn test_simple_kinds() {
        for (type_name, expected) in [
            ("boolean", PropertyKind::Boolean),
            ("string", PropertyKind::String),
            ("action", PropertyKind::Action),
            ("textTemplate", PropertyKind::TextTemplate),
            ("integer", PropertyKind::Integer),
            ("decimal", PropertyKind::Decimal),
            ("icon", PropertyKind::Icon),
            ("image", PropertyKind::Image),
            ("file", PropertyKind::File),
            ("datasource", PropertyKind::Datasource),
            ("widgets", PropertyKind::Widgets),
        ] {
            let property = Property::from_element(&element(json!({
                "$": { "key": "p", "type": type_name }
            })))
            .unwrap()
            .unwrap();
            assert_eq!(property.kind, expected, "type {type_name}");
        }
    }

    #[test]
    fn test_external_reference() {
        let property = Property::from_element(&element(json!({
            "$": { "key": "left", "type": "ScrollContainerRegion:./region" }
        })))
        .unwrap()
        .unwrap();
        assert_eq!(
            property.kind,
            PropertyKind::External {
                symbol: "ScrollContainerRegion".to_string(),
                module: "./region".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_external_reference_is_unknown() {
        let property = Property::from_element(&element(json!({
            "$": { "key": "left", "type": "A:b:c" }
        })))
        .unwrap()
        .unwrap();
        assert_eq!(
            property.kind,
            PropertyKind::Unknown {
                type_name: Some("A:b:c".to_string())
            }
        );
    }

    #[test]
    fn test_missing_type_is_unknown() {
        let property = Property::from_element(&element(json!({ "$": { "key": "x" } })))
            .unwrap()
            .unwrap();
        assert_eq!(property.kind, PropertyKind::Unknown { type_name: None });
    }

    #[test]
    fn test_required_and_data_source() {
        let property = Property::from_element(&element(json!({
            "$": { "key": "onClick", "type": "action", "required": "false", "dataSource": "items" }
        })))
        .unwrap()
        .unwrap();
        assert!(!property.required);
        assert_eq!(property.data_source.as_deref(), Some("items"));

        let property = Property::from_element(&element(json!({
            "$": { "key": "caption", "type": "string" }
        })))
        .unwrap()
        .unwrap();
        assert!(property.required);
        assert_eq!(property.data_source, None);
    }

    #[test]
    fn test_subtype_metadata() {
        let property = Property::from_element(&element(json!({
            "$": { "key": "value", "type": "attribute" },
            "attributeTypes": [{ "attributeType": [{ "$": { "name": "String" } }, { "$": { "name": "Decimal" } }] }]
        })))
        .unwrap()
        .unwrap();
        assert_eq!(
            property.kind,
            PropertyKind::Attribute {
                attribute_types: vec!["String".to_string(), "Decimal".to_string()]
            }
        );

        let property = Property::from_element(&element(json!({
            "$": { "key": "mode", "type": "enumeration" },
            "enumerationValues": [{ "enumerationValue": [{ "$": { "key": "fast" }, "_": "Fast" }, { "$": { "key": "slow" }, "_": "Slow" }] }]
        })))
        .unwrap()
        .unwrap();
        assert_eq!(
            property.kind,
            PropertyKind::Enumeration {
                values: vec!["fast".to_string(), "slow".to_string()]
            }
        );

        let property = Property::from_element(&element(json!({
            "$": { "key": "visible", "type": "expression" },
            "returnType": [{ "$": { "type": "Boolean" } }]
        })))
        .unwrap()
        .unwrap();
        assert_eq!(
            property.kind,
            PropertyKind::Expression {
                return_type: Some("Boolean".to_string())
            }
        );
    }

    #[test]
    fn test_element_without_key_is_skipped() {
        assert_eq!(
            Property::from_element(&element(json!({ "$": { "type": "string" } }))).unwrap(),
            None
        );
        assert_eq!(
            Property::from_element(&element(json!({ "$": { "key": "", "type": "string" } })))
                .unwrap(),
            None
        );
    }

    // ==================== Invariant Tests ====================

    #[test]
    fn test_object_without_properties_fails() {
        let result = Property::from_element(&element(json!({
            "$": { "key": "rows", "type": "object", "isList": "true" }
        })));
        let err = result.unwrap_err();
        assert!(matches!(err, WidgetgenError::Validation(_)));
        assert!(err.to_string().contains("Object property requires properties element"));
    }

    #[test]
    fn test_object_with_only_keyless_children_fails() {
        let result = Property::from_element(&element(json!({
            "$": { "key": "rows", "type": "object" },
            "properties": [{ "property": [{ "$": { "type": "string" } }] }]
        })));
        assert!(matches!(result, Err(WidgetgenError::Validation(_))));
    }

    #[test]
    fn test_object_children() {
        let property = Property::from_element(&element(json!({
            "$": { "key": "rows", "type": "object", "isList": "true" },
            "properties": [{
                "propertyGroup": [{ "property": [{ "$": { "key": "text", "type": "string" } }] }]
            }]
        })))
        .unwrap()
        .unwrap();
        assert_eq!(
            property.kind,
            PropertyKind::Object {
                properties: vec![Property::new("text", PropertyKind::String)],
                is_list: true,
            }
        );
    }

    #[test]
    fn test_selection_without_types_fails() {
        let result = Property::from_element(&element(json!({
            "$": { "key": "selection", "type": "selection", "dataSource": "ds" }
        })));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Selection property requires selectionTypes element"));

        let result = Property::from_element(&element(json!({
            "$": { "key": "selection", "type": "selection" },
            "selectionTypes": [{ "selectionType": [] }]
        })));
        assert!(matches!(result, Err(WidgetgenError::Validation(_))));
    }

    // ==================== WidgetDescriptor Tests ====================

    #[test]
    fn test_descriptor_missing_properties() {
        let result = WidgetDescriptor::from_document(&document(json!({
            "widget": { "$": { "pluginWidget": "true" } }
        })));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("doesn't contains <properties> element"));

        let result = WidgetDescriptor::from_document(&document(json!({
            "widget": { "$": { "pluginWidget": "true" }, "properties": [] }
        })));
        assert!(matches!(result, Err(WidgetgenError::Validation(_))));

        let result = WidgetDescriptor::from_document(&WidgetDocument::default());
        assert!(matches!(result, Err(WidgetgenError::Validation(_))));
    }

    #[test]
    fn test_descriptor_requires_plugin_widget_true() {
        for attributes in [json!({}), json!({ "pluginWidget": "false" }), json!({ "pluginWidget": "TRUE" })] {
            let result = WidgetDescriptor::from_document(&document(json!({
                "widget": { "$": attributes, "properties": [{}] }
            })));
            let err = result.unwrap_err();
            assert!(err.to_string().contains("pluginWidget=true not found"));
        }
    }

    #[test]
    fn test_descriptor_platform_and_filtering() {
        let descriptor = WidgetDescriptor::from_document(&document(json!({
            "widget": {
                "$": { "pluginWidget": "true", "supportedPlatform": "Native" },
                "properties": [{
                    "property": [
                        { "$": { "key": "a", "type": "string" } },
                        { "$": { "type": "string" } },
                        { "$": { "key": "b", "type": "boolean" } }
                    ],
                    "systemProperty": [{ "$": { "key": "Label" } }, { "$": {} }]
                }]
            }
        })))
        .unwrap();

        assert_eq!(descriptor.platform, Platform::Native);
        let keys: Vec<_> = descriptor.properties.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(
            descriptor.system_properties,
            vec![SystemProperty {
                key: "Label".to_string()
            }]
        );
        assert!(is_labeled(&descriptor.system_properties));
    }

    #[test]
    fn test_descriptor_defaults_to_web() {
        let descriptor = WidgetDescriptor::from_document(&document(json!({
            "widget": { "$": { "pluginWidget": "true", "supportedPlatform": "All" }, "properties": [{}] }
        })))
        .unwrap();
        assert_eq!(descriptor.platform, Platform::Web);
        assert!(descriptor.properties.is_empty());
    }
}
