//! Runtime-facing typings: the props a widget component receives.

use super::GeneratedTypes;
use super::helpers::{
    PropertyScope, capitalize_first_letter, has_optional_data_source, to_unique_union_type,
};
use super::imports::ExternalImports;
use crate::descriptor::{Platform, Property, PropertyKind, SystemProperty, is_labeled};
use tracing::{debug, warn};

pub fn generate_client_types(
    widget_name: &str,
    properties: &[Property],
    system_properties: &[SystemProperty],
    platform: Platform,
) -> GeneratedTypes {
    debug!(widget = %widget_name, platform = ?platform, "Generating client types");

    let mut generator = ClientTypeGenerator {
        platform,
        declarations: Vec::new(),
        imports: ExternalImports::new(),
    };
    let body = generator.type_body(&PropertyScope::root(properties));

    let primary = match platform {
        Platform::Web => format!(
            "export interface {widget_name}ContainerProps {{\n    name: string;\n    class: string;\n    style?: CSSProperties;\n    tabIndex?: number;\n{}{body}\n}}",
            if is_labeled(system_properties) {
                "    id: string;\n"
            } else {
                ""
            }
        ),
        Platform::Native => format!(
            "export interface {widget_name}Props<Style> {{\n    name: string;\n    style: Style[];\n{body}\n}}"
        ),
    };
    generator.declarations.push(primary);

    GeneratedTypes {
        declarations: generator.declarations,
        imports: generator.imports,
    }
}

struct ClientTypeGenerator {
    platform: Platform,
    declarations: Vec<String>,
    imports: ExternalImports,
}

impl ClientTypeGenerator {
    fn type_body<'a>(&mut self, scope: &PropertyScope<'a>) -> String {
        scope
            .properties()
            .iter()
            .map(|prop| {
                let prop_type = self.prop_type(prop, scope);
                format!(
                    "    {}{}: {};",
                    prop.key,
                    if is_optional(prop) { "?" } else { "" },
                    prop_type
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prop_type<'a>(&mut self, prop: &'a Property, scope: &PropertyScope<'a>) -> String {
        let linked = prop.data_source.is_some();
        match &prop.kind {
            PropertyKind::Boolean => "boolean".to_string(),
            PropertyKind::String => "string".to_string(),
            PropertyKind::Action if linked => "ListActionValue".to_string(),
            PropertyKind::Action => "ActionValue".to_string(),
            PropertyKind::TextTemplate if linked => "ListExpressionValue<string>".to_string(),
            PropertyKind::TextTemplate => "DynamicValue<string>".to_string(),
            PropertyKind::Integer => "number".to_string(),
            PropertyKind::Decimal => "Big".to_string(),
            PropertyKind::Icon => match self.platform {
                Platform::Web => "DynamicValue<WebIcon>".to_string(),
                Platform::Native => "DynamicValue<NativeIcon>".to_string(),
            },
            PropertyKind::Image => match self.platform {
                Platform::Web => "DynamicValue<WebImage>".to_string(),
                Platform::Native => "DynamicValue<NativeImage>".to_string(),
            },
            PropertyKind::File => "DynamicValue<FileValue>".to_string(),
            PropertyKind::Datasource => "ListValue".to_string(),
            PropertyKind::Attribute { attribute_types } => {
                let union = if attribute_types.is_empty() {
                    "string".to_string()
                } else {
                    to_unique_union_type(attribute_types.iter().map(|t| value_type(t)))
                };
                if linked {
                    format!("ListAttributeValue<{union}>")
                } else {
                    format!("EditableValue<{union}>")
                }
            }
            PropertyKind::Association { association_types } => {
                let types: Vec<&str> = if association_types.is_empty() {
                    vec!["Reference"]
                } else {
                    association_types.iter().map(String::as_str).collect()
                };
                to_unique_union_type(types.into_iter().map(|t| association_type(t, linked)))
            }
            PropertyKind::Expression { return_type } => {
                let value = return_type.as_deref().map_or("string", value_type);
                if linked {
                    format!("ListExpressionValue<{value}>")
                } else {
                    format!("DynamicValue<{value}>")
                }
            }
            // The enum type itself is declared by the widget's own sources.
            PropertyKind::Enumeration { .. } => {
                format!("{}Enum", capitalize_first_letter(&prop.key))
            }
            PropertyKind::Object {
                properties,
                is_list,
            } => {
                let child_type = capitalize_first_letter(&prop.key);
                let child_body = self.type_body(&scope.child(properties));
                self.declarations
                    .push(format!("export interface {child_type} {{\n{child_body}\n}}"));
                if *is_list {
                    format!("{child_type}[]")
                } else {
                    child_type
                }
            }
            PropertyKind::Widgets if linked => "ListWidgetValue".to_string(),
            PropertyKind::Widgets => "ReactNode".to_string(),
            PropertyKind::Selection { selection_types } => {
                let mut members: Vec<&str> = selection_types.iter().map(String::as_str).collect();
                if has_optional_data_source(prop, scope) {
                    members.push("None");
                }
                to_unique_union_type(members.into_iter().map(selection_type))
            }
            PropertyKind::External { symbol, module } => {
                self.imports.register(module, symbol);
                symbol.clone()
            }
            PropertyKind::Unknown { type_name } => {
                warn!(key = %prop.key, type_name = ?type_name, "Client type falls back to any");
                "any".to_string()
            }
        }
    }
}

fn is_optional(prop: &Property) -> bool {
    match prop.kind {
        PropertyKind::Action => true,
        PropertyKind::TextTemplate
        | PropertyKind::Expression { .. }
        | PropertyKind::Attribute { .. }
        | PropertyKind::Association { .. }
        | PropertyKind::Icon
        | PropertyKind::Image
        | PropertyKind::File
        | PropertyKind::Datasource
        | PropertyKind::Widgets
        | PropertyKind::Selection { .. } => !prop.required,
        _ => false,
    }
}

/// Client type of an attribute type or expression return type.
fn value_type(name: &str) -> &'static str {
    match name {
        "String" | "HashString" | "Enum" => "string",
        "Boolean" => "boolean",
        "DateTime" => "Date",
        "AutoNumber" | "Decimal" | "Integer" | "Long" | "Currency" | "Float" => "Big",
        _ => "any",
    }
}

fn association_type(name: &str, linked: bool) -> &'static str {
    match (name, linked) {
        ("Reference", false) => "ReferenceValue",
        ("Reference", true) => "ListReferenceValue",
        ("ReferenceSet", false) => "ReferenceSetValue",
        ("ReferenceSet", true) => "ListReferenceSetValue",
        _ => "any",
    }
}

fn selection_type(name: &str) -> &'static str {
    match name {
        "Single" => "SelectionSingleValue",
        "Multi" => "SelectionMultiValue",
        "None" => "undefined",
        _ => "any",
    }
}
