use serde::{Deserialize, Serialize};

/// The literal label fragment marking a free-text escape option.
pub const ESCAPE_TOKEN: &str = "Other";

/// The semantic type of a question block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum QuestionKind {
    /// Single line text, number or date input.
    #[serde(rename = "Short Answer")]
    #[strum(serialize = "Short Answer")]
    ShortAnswer,
    /// Multi-line text area.
    #[serde(rename = "Paragraph")]
    #[strum(serialize = "Paragraph")]
    Paragraph,
    /// Exactly one choice among radio controls.
    #[serde(rename = "Radio_Button")]
    #[strum(serialize = "Radio_Button")]
    RadioButton,
    /// Any number of choices among checkbox controls.
    #[serde(rename = "Checkboxes")]
    #[strum(serialize = "Checkboxes")]
    Checkboxes,
    /// One choice from a listbox popup.
    #[serde(rename = "Dropdown")]
    #[strum(serialize = "Dropdown")]
    Dropdown,
    /// A titled section divider, never filled.
    #[serde(rename = "Section Header")]
    #[strum(serialize = "Section Header")]
    SectionHeader,
    /// No known control was found in the block.
    #[serde(rename = "Unknown")]
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl QuestionKind {
    /// Kinds that carry an option list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            QuestionKind::RadioButton | QuestionKind::Checkboxes | QuestionKind::Dropdown
        )
    }

    /// Kinds the synthesizer commits an answer for.
    pub fn is_fillable(&self) -> bool {
        !matches!(self, QuestionKind::SectionHeader | QuestionKind::Unknown)
    }
}

/// A single extracted question.
///
/// Section headers serialize as `{"type", "text"}`, every other kind as
/// `{"question", "type", "options"?}` with `options` omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawQuestion", from = "RawQuestion")]
pub struct Question {
    /// First line of the block label.
    pub text: String,
    /// The classified type.
    pub kind: QuestionKind,
    /// Answer options in document order.
    pub options: Vec<String>,
}

impl Question {
    /// A new question with the given options.
    pub fn new(text: impl Into<String>, kind: QuestionKind, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            options,
        }
    }

    /// A section header.
    pub fn header(text: impl Into<String>) -> Self {
        Self::new(text, QuestionKind::SectionHeader, Vec::new())
    }

    /// Does the label or any option contain the escape token.
    pub fn mentions_escape(&self) -> bool {
        self.text.contains(ESCAPE_TOKEN) || self.options.iter().any(|o| o.contains(ESCAPE_TOKEN))
    }
}

/// The wire shape of a question.
#[derive(Serialize, Deserialize)]
struct RawQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    question: Option<String>,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        if q.kind == QuestionKind::SectionHeader {
            RawQuestion {
                question: None,
                kind: q.kind,
                text: Some(q.text),
                options: Vec::new(),
            }
        } else {
            RawQuestion {
                question: Some(q.text),
                kind: q.kind,
                text: None,
                options: q.options,
            }
        }
    }
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        let text = raw.question.or(raw.text).unwrap_or_default();
        Question {
            text,
            kind: raw.kind,
            options: raw.options,
        }
    }
}

/// The mutable state of one extraction run.
///
/// Created at run start, mutated only by the pipeline and consumed into the
/// result when the run ends.
#[derive(Debug)]
pub struct TraversalState {
    /// 1-based index of the page being processed.
    pub page_index: usize,
    /// Every question recorded so far, append-only.
    pub questions: Vec<Question>,
    /// Position in `questions` of the checkbox question absorbing fragments.
    pub open_checkbox_group: Option<usize>,
}

impl Default for TraversalState {
    fn default() -> Self {
        Self::new()
    }
}

impl TraversalState {
    /// Fresh state positioned on the first page.
    pub fn new() -> Self {
        Self {
            page_index: 1,
            questions: Vec::new(),
            open_checkbox_group: None,
        }
    }

    /// Move to the next page. Checkbox groups never span pages.
    pub fn next_page(&mut self) {
        self.page_index += 1;
        self.open_checkbox_group = None;
    }

    /// Consume the state into the recorded questions.
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}
