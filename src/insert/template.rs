use serde::Serialize;

/// Where a handler stub goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A class field before the member holding the JSX site.
    Class,
    /// A memoized callback before the statement holding the JSX site.
    Function,
}

/// Stub text inserted at the start of an already indented member or
/// statement. The text ends by re-indenting whatever followed the
/// insertion point.
///
/// `indent` is the stub's own indent; `body_indent` is the indent of its
/// empty body line.
pub fn render_stub(
    kind: TargetKind,
    handler: &str,
    params: &[String],
    indent: &str,
    body_indent: &str,
) -> String {
    let params = params.join(", ");
    match kind {
        TargetKind::Class => {
            format!("{handler} = ({params}) => {{\n{body_indent}\n{indent}}}\n\n{indent}")
        }
        TargetKind::Function => format!(
            "const {handler} = useCallback(({params}) => {{\n{body_indent}\n{indent}}}, [])\n\n{indent}"
        ),
    }
}
