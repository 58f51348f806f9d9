use crate::catalog::Registry;

/// Interface-name suffix that marks a component's attribute set.
pub const PROPS_SUFFIX: &str = "Props";

/// What a resolved identifier denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Component,
    Attribute,
}

/// Classify by spelling alone.
///
/// Lower-camel names (`onChange`) and props interfaces (`AffixProps`) are
/// attributes; anything else is a component. A component named
/// `SomethingProps` or an attribute starting with a capital is
/// misclassified.
pub fn classify_symbol(name: &str) -> SymbolKind {
    let starts_upper = name.chars().next().is_some_and(char::is_uppercase);
    if !starts_upper || name.ends_with(PROPS_SUFFIX) {
        SymbolKind::Attribute
    } else {
        SymbolKind::Component
    }
}

/// Drop `.` and `-` and lowercase: `Table.Column` and `table-column` both
/// become `tablecolumn`.
pub fn normalize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '.' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Map a declared name and the library folder it was found in onto a
/// registry key.
///
/// Tiers, first hit wins:
/// 1. the normalized name equals a normalized key;
/// 2. a key whose last segment is the name and whose segments include
///    the folder (`Column` in `table` gives `Table.Column`);
/// 3. the normalized folder equals a normalized key.
///
/// Only the first segment of a nested folder (`table/hooks`) counts.
pub fn match_component_name<'r>(
    registry: &'r Registry,
    candidate: &str,
    folder: &str,
) -> Option<&'r str> {
    let wanted = normalize_name(candidate);
    if let Some(name) = registry.names().find(|k| normalize_name(k) == wanted) {
        return Some(name);
    }

    let folder = normalize_name(folder.split('/').next().unwrap_or(folder));
    let qualified = registry.names().find(|k| {
        k.rsplit('.').next() == Some(candidate)
            && k.split('.').map(normalize_name).any(|seg| seg == folder)
    });
    if qualified.is_some() {
        return qualified;
    }

    if folder.is_empty() {
        return None;
    }
    registry.names().find(|k| normalize_name(k) == folder)
}

/// Component a props interface belongs to: `TableColumnProps` gives
/// `Table.Column`. `None` without the suffix.
pub fn props_owner(interface_name: &str) -> Option<String> {
    let stem = interface_name.strip_suffix(PROPS_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(stem.len() + 2);
    for (i, c) in stem.char_indices() {
        if i > 0 && c.is_uppercase() {
            out.push('.');
        }
        out.push(c);
    }
    Some(out)
}
