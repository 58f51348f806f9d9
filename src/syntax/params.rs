use tree_sitter::Node;

use crate::parser::SourceKind;
use crate::util::txt;

use super::ParsedSource;

/// Parameter names of the first function-typed signature in a declaration
/// snippet such as `onChange?: (value: number) => void`.
///
/// The snippet is wrapped in a synthetic interface body so a single member
/// parses standalone. Union types are searched for a parenthesized function
/// type (`null | ((value: number) => ReactNode)`). Returns an empty list
/// when no function type is found.
pub fn extract_declared_parameter_names(snippet: &str) -> Vec<String> {
    let wrapped = format!("interface __Declaration {{\n{snippet}\n}}");
    let Ok(parsed) = ParsedSource::parse(wrapped, SourceKind::TypeScript) else {
        return Vec::new();
    };

    let Some(signature) = first_signature(parsed.root()) else {
        return Vec::new();
    };
    let Some(params) = signature_parameters(signature) else {
        return Vec::new();
    };
    parameter_names(params, parsed.src())
}

/// Depth-first search for the first property or method signature.
fn first_signature(node: Node) -> Option<Node> {
    if matches!(node.kind(), "property_signature" | "method_signature") {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(first_signature)
}

fn signature_parameters(signature: Node) -> Option<Node> {
    match signature.kind() {
        "method_signature" => signature.child_by_field_name("parameters"),
        _ => {
            let ty = signature.child_by_field_name("type")?;
            find_function_type(ty)?.child_by_field_name("parameters")
        }
    }
}

fn find_function_type(node: Node) -> Option<Node> {
    match node.kind() {
        "function_type" => Some(node),
        // `: T` and `(T)` wrap exactly one type.
        "type_annotation" | "parenthesized_type" => {
            node.named_child(0).and_then(find_function_type)
        }
        "union_type" => {
            let mut cursor = node.walk();
            let members: Vec<Node> = node.named_children(&mut cursor).collect();
            members.into_iter().find_map(find_function_type)
        }
        _ => None,
    }
}

fn parameter_names(params: Node, src: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        if !matches!(param.kind(), "required_parameter" | "optional_parameter") {
            continue;
        }
        let Some(pattern) = param.child_by_field_name("pattern") else {
            continue;
        };
        // `this: Window` declares the receiver, not a parameter.
        if pattern.kind() == "this" {
            continue;
        }
        let name = txt(pattern, src);
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    names
}
