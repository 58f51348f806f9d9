//! The editing surface the insertion engine drives.

use std::collections::VecDeque;

use crate::document::{rebase_offset, Position, Range, TextDocument, TextEdit};
use crate::error::PropscopeError;
use crate::util::is_identifier;

/// A single-line input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    pub prompt: String,
    /// Pre-filled value.
    pub value: String,
}

/// Inline validation for the handler-name prompt. `Some(message)` rejects.
pub fn validate_handler_name(input: &str) -> Option<String> {
    let name = input.trim();
    if name.is_empty() {
        return Some("Handler name must not be empty".to_string());
    }
    if !is_identifier(name) {
        return Some(format!("`{name}` is not a valid identifier"));
    }
    None
}

/// An open editor on one document.
pub trait Editor {
    fn document(&self) -> &TextDocument;

    fn cursor(&self) -> Position;

    /// Apply `edits` as one transaction. Each edit is expressed against the
    /// text left by the edits before it.
    fn apply(&mut self, edits: &[TextEdit]) -> Result<(), PropscopeError>;

    fn set_cursor(&mut self, pos: Position);

    fn reveal(&mut self, range: Range);

    /// Ask the user for a line of text. `None` when dismissed. Answers that
    /// fail [`validate_handler_name`] are not accepted.
    fn prompt(&mut self, request: &InputRequest) -> Option<String>;
}

/// Editor over an in-memory document with scripted prompt answers.
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    doc: TextDocument,
    cursor: Position,
    answers: VecDeque<String>,
    revealed: Option<Range>,
    transactions: usize,
    prompts: Vec<InputRequest>,
}

impl MemoryEditor {
    pub fn new(doc: TextDocument, cursor: Position) -> Self {
        Self {
            doc,
            cursor,
            answers: VecDeque::new(),
            revealed: None,
            transactions: 0,
            prompts: Vec::new(),
        }
    }

    /// Queue typed answers. Invalid ones are retried like a user retyping;
    /// running out of answers dismisses the prompt.
    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers.extend(answers.into_iter().map(Into::into));
        self
    }

    pub fn revealed(&self) -> Option<Range> {
        self.revealed
    }

    /// Number of successful [`Editor::apply`] calls.
    pub fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn prompts(&self) -> &[InputRequest] {
        &self.prompts
    }

    pub fn into_document(self) -> TextDocument {
        self.doc
    }
}

impl Editor for MemoryEditor {
    fn document(&self) -> &TextDocument {
        &self.doc
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn apply(&mut self, edits: &[TextEdit]) -> Result<(), PropscopeError> {
        let mut next = self.doc.clone();
        let mut cursor = next.offset_at(self.cursor);
        for edit in edits {
            let span = next.span_of(edit.range);
            next.apply(edit)?;
            cursor = rebase_offset(cursor, span, edit.new_text.len());
        }
        self.cursor = next.position_at(cursor);
        self.doc = next;
        self.transactions += 1;
        Ok(())
    }

    fn set_cursor(&mut self, pos: Position) {
        self.cursor = pos;
    }

    fn reveal(&mut self, range: Range) {
        self.revealed = Some(range);
    }

    fn prompt(&mut self, request: &InputRequest) -> Option<String> {
        self.prompts.push(request.clone());
        while let Some(answer) = self.answers.pop_front() {
            match validate_handler_name(&answer) {
                None => return Some(answer.trim().to_string()),
                Some(message) => tracing::debug!(%answer, %message, "prompt answer rejected"),
            }
        }
        None
    }
}
