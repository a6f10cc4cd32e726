use crate::error::Result;
use crate::navigator::QuestionBlock;
use crate::question::QuestionKind;
use crate::utils::first_line;

/// Single line inputs.
pub const SHORT_ANSWER_SELECTOR: &str =
    "input[type='text'], input[type='number'], input[type='date']";
/// Multi-line inputs.
pub const PARAGRAPH_SELECTOR: &str = "textarea";
/// Radio controls.
pub const RADIO_SELECTOR: &str = "label[role='radio'], div[role='radio']";
/// Checkbox controls.
pub const CHECKBOX_SELECTOR: &str = "label[role='checkbox'], div[role='checkbox']";
/// Dropdown trigger.
pub const LISTBOX_SELECTOR: &str = "div[role='listbox']";
/// Dropdown entries, rendered in a popup outside the question block.
pub const LISTBOX_OPTION_SELECTOR: &str = "div[role='option']";
/// Marker class of section header blocks.
pub const SECTION_HEADER_SELECTOR: &str = ".OxAavc";
/// Elements holding the question label.
pub const TITLE_SELECTOR: &str = ".freebirdFormviewerComponentsQuestionBaseTitle, .freebirdFormviewerComponentsQuestionBaseHeader, .freebirdFormviewerComponentsQuestionText";

/// The bare required-field marker line.
const REQUIRED_MARKER: &str = "*";

/// Control selectors in precedence order. Input types are checked before
/// roles because some controls match several selectors.
pub const KIND_PRECEDENCE: [(QuestionKind, &str); 6] = [
    (QuestionKind::ShortAnswer, SHORT_ANSWER_SELECTOR),
    (QuestionKind::Paragraph, PARAGRAPH_SELECTOR),
    (QuestionKind::RadioButton, RADIO_SELECTOR),
    (QuestionKind::Checkboxes, CHECKBOX_SELECTOR),
    (QuestionKind::Dropdown, LISTBOX_SELECTOR),
    (QuestionKind::SectionHeader, SECTION_HEADER_SELECTOR),
];

/// Option lines of a block: every non-blank line after the first, minus
/// required-field markers.
pub fn parse_options(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .skip(1)
        .filter(|l| *l != REQUIRED_MARKER)
        .map(String::from)
        .collect()
}

/// Determine the kind of a block and its option lines.
///
/// Only radio, checkbox and dropdown kinds carry options. A block without any
/// known control is [`QuestionKind::Unknown`] with no options; it is logged
/// and never aborts the traversal.
pub async fn classify<B: QuestionBlock + ?Sized>(block: &B) -> Result<(QuestionKind, Vec<String>)> {
    let text = block.text().await?;

    for (kind, selector) in KIND_PRECEDENCE {
        if block.contains(selector).await? {
            let options = if kind.has_options() {
                parse_options(&text)
            } else {
                Vec::new()
            };
            return Ok((kind, options));
        }
    }

    log::warn!(
        "Unknown question type for block starting with {:?}",
        first_line(&text)
    );

    Ok((QuestionKind::Unknown, Vec::new()))
}

/// The label of a block: the title element when present, otherwise the whole
/// block text, truncated to its first line.
pub async fn question_text<B: QuestionBlock + ?Sized>(block: &B) -> Result<String> {
    let text = match block.child_text(TITLE_SELECTOR).await? {
        Some(title) if !title.trim().is_empty() => title,
        _ => block.text().await?,
    };

    Ok(first_line(&text).to_string())
}
