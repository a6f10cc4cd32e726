use crate::question::{Question, QuestionKind, TraversalState};

/// Whether a checkbox question is currently absorbing fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// No open group.
    Idle,
    /// Fragments are appended to the question at this position.
    Open(usize),
}

/// A classified block ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// First line of the block label.
    pub text: String,
    /// The classified type.
    pub kind: QuestionKind,
    /// Option lines of the block.
    pub options: Vec<String>,
}

impl Observation {
    /// A new observation.
    pub fn new(text: impl Into<String>, kind: QuestionKind, options: Vec<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            options,
        }
    }
}

/// Merges consecutive checkbox fragments into one logical question.
///
/// Checkbox options are rendered as sibling containers rather than nested
/// under the question, so grouping is purely sequential: the first checkbox
/// fragment opens a question, each following one adds its label as an
/// option, and any other kind closes the group.
pub struct CheckboxAggregator<'a> {
    state: &'a mut TraversalState,
}

impl<'a> CheckboxAggregator<'a> {
    /// Aggregate into `state`.
    pub fn new(state: &'a mut TraversalState) -> Self {
        Self { state }
    }

    /// The current group state.
    pub fn group(&self) -> GroupState {
        match self.state.open_checkbox_group {
            Some(index) if index < self.state.questions.len() => GroupState::Open(index),
            _ => GroupState::Idle,
        }
    }

    /// Account for a block that was seen but left no question behind.
    ///
    /// Any kind other than a checkbox fragment, including a block whose kind
    /// was never determined, ends the open group.
    pub fn skip(&mut self, kind: Option<QuestionKind>) {
        if kind != Some(QuestionKind::Checkboxes) {
            self.state.open_checkbox_group = None;
        }
    }

    /// Record one classified block.
    pub fn push(&mut self, observation: Observation) {
        match (self.group(), observation.kind) {
            (GroupState::Open(index), QuestionKind::Checkboxes) => {
                self.state.questions[index].options.push(observation.text);
            }
            (GroupState::Idle, QuestionKind::Checkboxes) => {
                self.state.questions.push(Question::new(
                    observation.text,
                    QuestionKind::Checkboxes,
                    observation.options,
                ));
                self.state.open_checkbox_group = Some(self.state.questions.len() - 1);
            }
            (_, kind) => {
                self.state.open_checkbox_group = None;
                self.state
                    .questions
                    .push(Question::new(observation.text, kind, observation.options));
            }
        }
    }
}
