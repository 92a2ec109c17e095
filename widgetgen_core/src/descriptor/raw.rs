//! Document shapes of a parsed widget descriptor.
//!
//! The descriptor XML is converted to a tree of nested mappings before it
//! reaches this crate: element attributes live under `"$"` and every child
//! element is a list, even when it occurs once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WidgetDocument {
    #[serde(default)]
    pub widget: Option<WidgetElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WidgetElement {
    #[serde(rename = "$", default)]
    pub attributes: WidgetAttributes,
    #[serde(default)]
    pub properties: Option<Vec<PropertiesElement>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetAttributes {
    #[serde(default)]
    pub plugin_widget: Option<String>,
    #[serde(default)]
    pub supported_platform: Option<String>,
}

/// A `<properties>` or `<propertyGroup>` element.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesElement {
    #[serde(default)]
    pub property: Vec<PropertyElement>,
    #[serde(default)]
    pub system_property: Vec<SystemPropertyElement>,
    #[serde(default)]
    pub property_group: Vec<PropertiesElement>,
}

impl PropertiesElement {
    /// Property elements in document order. Groups take precedence over
    /// direct children and are flattened recursively.
    pub fn extract_properties(&self) -> Vec<&PropertyElement> {
        if !self.property_group.is_empty() {
            return self
                .property_group
                .iter()
                .flat_map(PropertiesElement::extract_properties)
                .collect();
        }
        self.property.iter().collect()
    }

    pub fn extract_system_properties(&self) -> Vec<&SystemPropertyElement> {
        if !self.property_group.is_empty() {
            return self
                .property_group
                .iter()
                .flat_map(PropertiesElement::extract_system_properties)
                .collect();
        }
        self.system_property.iter().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyElement {
    #[serde(rename = "$", default)]
    pub attributes: PropertyAttributes,
    #[serde(default)]
    pub properties: Vec<PropertiesElement>,
    #[serde(default)]
    pub selection_types: Vec<SelectionTypesElement>,
    #[serde(default)]
    pub attribute_types: Vec<AttributeTypesElement>,
    #[serde(default)]
    pub association_types: Vec<AssociationTypesElement>,
    #[serde(default)]
    pub enumeration_values: Vec<EnumerationValuesElement>,
    #[serde(default)]
    pub return_type: Vec<ReturnTypeElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAttributes {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub is_list: Option<String>,
    #[serde(default)]
    pub required: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SystemPropertyElement {
    #[serde(rename = "$", default)]
    pub attributes: SystemPropertyAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SystemPropertyAttributes {
    #[serde(default)]
    pub key: Option<String>,
}

/// Any element whose only interesting content is a `name` attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NamedElement {
    #[serde(rename = "$", default)]
    pub attributes: NameAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NameAttributes {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionTypesElement {
    #[serde(default)]
    pub selection_type: Vec<NamedElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeTypesElement {
    #[serde(default)]
    pub attribute_type: Vec<NamedElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationTypesElement {
    #[serde(default)]
    pub association_type: Vec<NamedElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationValuesElement {
    #[serde(default)]
    pub enumeration_value: Vec<EnumerationValueElement>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EnumerationValueElement {
    #[serde(rename = "$", default)]
    pub attributes: EnumerationValueAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EnumerationValueAttributes {
    #[serde(default)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReturnTypeElement {
    #[serde(rename = "$", default)]
    pub attributes: ReturnTypeAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReturnTypeAttributes {
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(props: &[&PropertyElement]) -> Vec<String> {
        props
            .iter()
            .filter_map(|p| p.attributes.key.clone())
            .collect()
    }

    #[test]
    fn test_deserialize_attributes() {
        let doc: WidgetDocument = serde_json::from_value(json!({
            "widget": {
                "$": { "id": "com.example.MyWidget", "pluginWidget": "true", "supportedPlatform": "Native" },
                "properties": [{ "property": [{ "$": { "key": "a", "type": "boolean", "isList": "true" } }] }]
            }
        }))
        .unwrap();

        let widget = doc.widget.unwrap();
        assert_eq!(widget.attributes.plugin_widget.as_deref(), Some("true"));
        assert_eq!(widget.attributes.supported_platform.as_deref(), Some("Native"));
        let props = widget.properties.unwrap();
        let property = &props[0].property[0];
        assert_eq!(property.attributes.type_name.as_deref(), Some("boolean"));
        assert_eq!(property.attributes.is_list.as_deref(), Some("true"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let element: PropertyElement = serde_json::from_value(json!({
            "$": { "key": "a", "type": "string", "defaultValue": "x" },
            "caption": ["A"],
            "description": ["Some text"]
        }))
        .unwrap();
        assert_eq!(element.attributes.key.as_deref(), Some("a"));
    }

    #[test]
    fn test_extract_properties_flattens_nested_groups() {
        let element: PropertiesElement = serde_json::from_value(json!({
            "property": [{ "$": { "key": "ignored", "type": "string" } }],
            "propertyGroup": [
                {
                    "$": { "caption": "General" },
                    "propertyGroup": [
                        { "property": [{ "$": { "key": "first", "type": "string" } }] },
                        {
                            "property": [{ "$": { "key": "second", "type": "string" } }],
                            "systemProperty": [{ "$": { "key": "Label" } }]
                        }
                    ]
                },
                { "property": [{ "$": { "key": "third", "type": "string" } }] }
            ]
        }))
        .unwrap();

        assert_eq!(keys(&element.extract_properties()), vec!["first", "second", "third"]);
        let system = element.extract_system_properties();
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].attributes.key.as_deref(), Some("Label"));
    }

    #[test]
    fn test_extract_properties_without_groups() {
        let element: PropertiesElement = serde_json::from_value(json!({
            "property": [
                { "$": { "key": "a", "type": "string" } },
                { "$": { "key": "b", "type": "string" } }
            ]
        }))
        .unwrap();
        assert_eq!(keys(&element.extract_properties()), vec!["a", "b"]);
        assert!(element.extract_system_properties().is_empty());
    }
}
