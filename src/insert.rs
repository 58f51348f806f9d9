//! Handler stub synthesis after a completion entry is accepted.
//!
//! Planning queries the oracle against the buffer exactly as the host
//! holds it; the edits are then built on a private copy. The editor sees
//! exactly one transaction, and only once every step succeeded; anything
//! that gives up earlier leaves the user's text untouched.

mod indent;
mod target;
mod template;

pub use indent::{indent_text, line_indent_width, measure_indent};
pub use target::{locate_target, InsertionTarget};
pub use template::{render_stub, TargetKind};

use serde::Serialize;

use crate::completion::{AfterCompletion, InsertMode, TRIGGER_CHARACTERS};
use crate::document::{rebase_offset, Position, Range, Span, TextDocument, TextEdit};
use crate::editor::{validate_handler_name, Editor, InputRequest};
use crate::error::PropscopeError;
use crate::session::Session;
use crate::syntax::{extract_declared_parameter_names, ParsedSource};
use crate::util::capitalize;

/// `handle` + `onChange` -> `handleOnChange`.
pub fn derive_handler_name(prefix: &str, attribute: &str) -> String {
    format!("{prefix}{}", capitalize(attribute))
}

/// Everything needed to render and place one stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInsertionPlan {
    pub target: TargetKind,
    pub enclosing: Span,
    pub indent_width: usize,
    pub insertion_offset: usize,
    pub parameter_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AbandonReason {
    /// The editor shows a different document than the payload names.
    StaleDocument,
    /// No class or function component encloses the site.
    NoComponent,
    /// The attribute's declaration could not be found in the library.
    NoDeclaration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum InsertOutcome {
    Inserted {
        handler: String,
        kind: TargetKind,
        cursor: Position,
    },
    Abandoned { reason: AbandonReason },
    /// The name prompt was dismissed or the request was cancelled.
    Cancelled,
}

/// Run the post-completion command against `editor`.
///
/// Errors only come from edits the document rejects; every other failure
/// is an [`InsertOutcome`] with no edit applied.
pub fn run_after_completion(
    session: &mut Session<'_>,
    editor: &mut dyn Editor,
    payload: &AfterCompletion,
) -> Result<InsertOutcome, PropscopeError> {
    if session.semantics.is_cancelled() {
        return Ok(InsertOutcome::Cancelled);
    }
    let original = editor.document().clone();
    if original.uri() != payload.uri {
        tracing::debug!(
            expected = %payload.uri,
            found = %original.uri(),
            "stale insertion payload"
        );
        return Ok(abandon(AbandonReason::StaleDocument));
    }

    // Oracle queries go to the buffer the host holds, trigger included.
    let anchor = original.offset_at(payload.trigger_range.end);
    let plan = match plan_insertion(session, &original, anchor, payload.class_component) {
        Ok(plan) => plan,
        Err(reason) => {
            tracing::debug!(attribute = %payload.attribute, ?reason, "insertion abandoned");
            return Ok(abandon(reason));
        }
    };

    let mut edits = Vec::with_capacity(3);
    let mut cursor = original.offset_at(editor.cursor());
    let mut stub_offset = plan.insertion_offset;
    let working = match cleanup_edit(&original, payload.trigger_range) {
        Some(edit) => {
            let replaced = original.span_of(edit.range);
            cursor = rebase_offset(cursor, replaced, 0);
            stub_offset = rebase_offset(stub_offset, replaced, 0);
            let next = original.with_edit(&edit)?;
            edits.push(edit);
            next
        }
        None => original.clone(),
    };

    let derived = derive_handler_name(&session.settings.handler_prefix, &payload.attribute);
    let handler = match payload.mode {
        InsertMode::Direct => derived,
        InsertMode::Inquiry => {
            let request = InputRequest {
                prompt: format!("Handler name for `{}`", payload.attribute),
                value: derived,
            };
            match editor.prompt(&request) {
                Some(name) if validate_handler_name(&name).is_none() => name.trim().to_string(),
                _ => return Ok(InsertOutcome::Cancelled),
            }
        }
    };

    let mut current = working;
    if payload.mode == InsertMode::Inquiry {
        let member = match plan.target {
            TargetKind::Class => "this.",
            TargetKind::Function => "",
        };
        let binding = TextEdit::insert(
            current.position_at(cursor),
            format!("={{{member}{handler}}} "),
        );
        stub_offset = rebase_offset(
            stub_offset,
            Span::new(cursor, cursor),
            binding.new_text.len(),
        );
        current = current.with_edit(&binding)?;
        edits.push(binding);
    }

    let tab_size = session.settings.tab_size;
    let insert_spaces = session.settings.insert_spaces;
    let step = if plan.indent_width > 0 {
        plan.indent_width
    } else {
        tab_size
    };
    let indent = indent_text(plan.indent_width, tab_size, insert_spaces);
    let body_indent = indent_text(plan.indent_width + step, tab_size, insert_spaces);
    let stub = render_stub(
        plan.target,
        &handler,
        &plan.parameter_names,
        &indent,
        &body_indent,
    );
    let stub_start = current.position_at(stub_offset);
    edits.push(TextEdit::insert(stub_start, stub));

    if session.semantics.is_cancelled() {
        return Ok(InsertOutcome::Cancelled);
    }
    editor.apply(&edits)?;

    let caret = Position::new(
        stub_start.line + 1,
        body_indent.encode_utf16().count() as u32,
    );
    editor.set_cursor(caret);
    editor.reveal(Range::new(caret, caret));
    tracing::debug!(
        handler = %handler,
        kind = ?plan.target,
        line = caret.line,
        "handler inserted"
    );

    Ok(InsertOutcome::Inserted {
        handler,
        kind: plan.target,
        cursor: caret,
    })
}

/// Deletion of the trigger character, when `range` still holds one.
fn cleanup_edit(doc: &TextDocument, range: Range) -> Option<TextEdit> {
    let mut chars = doc.text_in(range).chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if TRIGGER_CHARACTERS.contains(&c) => Some(TextEdit::delete(range)),
        _ => None,
    }
}

/// Target, parameters and indentation for a stub serving the attribute
/// that starts at `anchor`, just after its trigger character.
///
/// `doc` is the buffer as the host holds it; every offset in the plan is
/// in its coordinates. `class_hint` is the class span recorded at
/// completion time.
pub fn plan_insertion(
    session: &mut Session<'_>,
    doc: &TextDocument,
    anchor: usize,
    class_hint: Option<Span>,
) -> Result<HandlerInsertionPlan, AbandonReason> {
    let parsed = ParsedSource::parse_with_placeholder(doc, anchor, TRIGGER_CHARACTERS)
        .map_err(|e| {
            tracing::debug!(uri = %doc.uri(), error = %e, "insertion parse failed");
            AbandonReason::NoComponent
        })?;
    let target = locate_target(&mut session.semantics, doc, &parsed, anchor, class_hint)
        .ok_or(AbandonReason::NoComponent)?;

    let declaration = session
        .semantics
        .library_declaration(doc, doc.position_at(anchor))
        .ok_or(AbandonReason::NoDeclaration)?;
    let parameter_names = extract_declared_parameter_names(&declaration);

    Ok(HandlerInsertionPlan {
        target: target.kind,
        enclosing: target.enclosing,
        indent_width: measure_indent(doc, target.sibling, session.settings.tab_size),
        insertion_offset: target.insertion_offset(),
        parameter_names,
    })
}

fn abandon(reason: AbandonReason) -> InsertOutcome {
    InsertOutcome::Abandoned { reason }
}
