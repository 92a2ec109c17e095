//! Design-time typings: the values the Studio preview hands to a widget.

use super::GeneratedTypes;
use super::helpers::{
    PropertyScope, capitalize_first_letter, has_optional_data_source, to_unique_union_type,
};
use super::imports::ExternalImports;
use crate::descriptor::{Property, PropertyKind, SystemProperty, is_labeled};
use tracing::{debug, warn};

const LEGACY_FIELDS: &str = "
    /**
     * @deprecated Deprecated since version 9.18.0. Please use class property instead.
     */
    className: string;
    class: string;
    style: string;
    styleObject?: CSSProperties;";

const ICON_PREVIEW_TYPE: &str = r#"{ type: "glyph"; iconClass: string; } | { type: "image"; imageUrl: string; iconUrl: string; } | { type: "icon"; iconClass: string; } | undefined"#;

const IMAGE_PREVIEW_TYPE: &str =
    r#"{ type: "static"; imageUrl: string; } | { type: "dynamic"; entity: string; } | null"#;

// `{ type: string }` matches what older Studio versions passed for data sources.
const DATASOURCE_PREVIEW_TYPE: &str = "{} | { caption: string } | { type: string } | null";

const WIDGETS_PREVIEW_TYPE: &str =
    "{ widgetCount: number; renderer: ComponentType<{ children: ReactNode; caption?: string }> }";

pub fn generate_preview_types(
    widget_name: &str,
    properties: &[Property],
    system_properties: &[SystemProperty],
) -> GeneratedTypes {
    let labeled = is_labeled(system_properties);
    debug!(widget = %widget_name, labeled, "Generating preview types");

    let mut generator = PreviewTypeGenerator {
        declarations: Vec::new(),
        imports: ExternalImports::new(),
    };
    let body = generator.type_body(&PropertyScope::root(properties));

    generator.declarations.push(format!(
        "export interface {widget_name}PreviewProps {{{}\n    readOnly: boolean;\n{body}\n}}",
        if labeled { "" } else { LEGACY_FIELDS }
    ));

    GeneratedTypes {
        declarations: generator.declarations,
        imports: generator.imports,
    }
}

struct PreviewTypeGenerator {
    declarations: Vec<String>,
    imports: ExternalImports,
}

impl PreviewTypeGenerator {
    fn type_body<'a>(&mut self, scope: &PropertyScope<'a>) -> String {
        scope
            .properties()
            .iter()
            .map(|prop| format!("    {}: {};", prop.key, self.prop_type(prop, scope)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn prop_type<'a>(&mut self, prop: &'a Property, scope: &PropertyScope<'a>) -> String {
        match &prop.kind {
            PropertyKind::Boolean => "boolean".to_string(),
            PropertyKind::String | PropertyKind::TextTemplate | PropertyKind::File => {
                "string".to_string()
            }
            PropertyKind::Action => "{} | null".to_string(),
            PropertyKind::Integer | PropertyKind::Decimal => "number | null".to_string(),
            PropertyKind::Icon => ICON_PREVIEW_TYPE.to_string(),
            PropertyKind::Image => IMAGE_PREVIEW_TYPE.to_string(),
            PropertyKind::Datasource => DATASOURCE_PREVIEW_TYPE.to_string(),
            PropertyKind::Attribute { .. }
            | PropertyKind::Association { .. }
            | PropertyKind::Expression { .. } => "string".to_string(),
            PropertyKind::Enumeration { .. } => {
                format!("{}Enum", capitalize_first_letter(&prop.key))
            }
            PropertyKind::Object {
                properties,
                is_list,
            } => {
                let child_type = format!("{}PreviewType", capitalize_first_letter(&prop.key));
                let child_body = self.type_body(&scope.child(properties));
                self.declarations
                    .push(format!("export interface {child_type} {{\n{child_body}\n}}"));
                if *is_list {
                    format!("{child_type}[]")
                } else {
                    child_type
                }
            }
            PropertyKind::Widgets => WIDGETS_PREVIEW_TYPE.to_string(),
            PropertyKind::Selection { selection_types } => {
                let mut members: Vec<&str> = selection_types.iter().map(String::as_str).collect();
                if has_optional_data_source(prop, scope) {
                    members.push("None");
                }
                to_unique_union_type(members.into_iter().map(|m| format!("\"{m}\"")))
            }
            PropertyKind::External { symbol, module } => {
                self.imports.register(module, symbol);
                symbol.clone()
            }
            PropertyKind::Unknown { type_name } => {
                warn!(key = %prop.key, type_name = ?type_name, "Preview type falls back to any");
                "any".to_string()
            }
        }
    }
}
