//! Throwaway answers that satisfy client side required-field validation.
//!
//! Nothing written here is meaningful. Options containing the escape token
//! are never picked because they open a free-text field the synthesizer does
//! not fill.

use crate::classifier::{
    CHECKBOX_SELECTOR, LISTBOX_OPTION_SELECTOR, LISTBOX_SELECTOR, PARAGRAPH_SELECTOR,
    RADIO_SELECTOR, SHORT_ANSWER_SELECTOR,
};
use crate::error::Result;
use crate::navigator::{FormPage, Interaction, QuestionBlock};
use crate::question::{QuestionKind, ESCAPE_TOKEN};
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Length of a short answer token.
const TOKEN_LEN: usize = 10;
/// Sentences in a paragraph answer.
const PARAGRAPH_SENTENCES: usize = 3;

/// A random alphanumeric token.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// A few random words each closed by a period.
pub fn random_paragraph(sentences: usize) -> String {
    let mut rng = rand::rng();
    let words: Vec<String> = (0..sentences)
        .map(|_| {
            let len = rng.random_range(5..=15);
            format!("{}.", random_token(len))
        })
        .collect();
    words.join(" ")
}

/// Positions of the labels that do not contain the escape token.
fn eligible(labels: &[String]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.contains(ESCAPE_TOKEN))
        .map(|(i, _)| i)
        .collect()
}

/// Pick one eligible label uniformly at random.
pub fn pick_one(labels: &[String]) -> Option<usize> {
    eligible(labels).choose(&mut rand::rng()).copied()
}

/// Pick `min(limit, eligible)` distinct eligible labels uniformly at random,
/// returned in document order.
pub fn pick_many(labels: &[String], limit: usize) -> Vec<usize> {
    let pool = eligible(labels);
    let mut picked: Vec<usize> = pool
        .choose_multiple(&mut rand::rng(), limit.min(pool.len()))
        .copied()
        .collect();
    picked.sort_unstable();
    picked
}

/// Drive the control through the normal path first and fall back to script
/// when the control does not accept native events.
async fn click_with_fallback<B: QuestionBlock + ?Sized>(
    block: &B,
    selector: &str,
    index: usize,
) -> Result<()> {
    match block.click(selector, index, Interaction::Native).await {
        Err(err) if err.is_interaction() => {
            log::debug!("Native click failed ({err}), clicking from script.");
            block.click(selector, index, Interaction::Script).await
        }
        other => other,
    }
}

async fn enter_with_fallback<B: QuestionBlock + ?Sized>(
    block: &B,
    selector: &str,
    value: &str,
) -> Result<()> {
    match block.enter_text(selector, value, Interaction::Native).await {
        Err(err) if err.is_interaction() => {
            log::debug!("Typing failed ({err}), assigning the value from script.");
            block.enter_text(selector, value, Interaction::Script).await
        }
        other => other,
    }
}

async fn page_click_with_fallback<P: FormPage + ?Sized>(
    page: &P,
    selector: &str,
    index: usize,
) -> Result<()> {
    match page.click(selector, index, Interaction::Native).await {
        Err(err) if err.is_interaction() => page.click(selector, index, Interaction::Script).await,
        other => other,
    }
}

/// Commit a throwaway answer for `kind` into `block`.
///
/// Section headers and unknown blocks are left untouched. Fails with
/// [`FormError::InteractionFailure`](crate::FormError::InteractionFailure)
/// only when both the native and the script path failed.
pub async fn fill<P: FormPage>(
    page: &P,
    block: &P::Block,
    kind: QuestionKind,
    checkbox_picks: usize,
) -> Result<()> {
    match kind {
        QuestionKind::ShortAnswer => {
            enter_with_fallback(block, SHORT_ANSWER_SELECTOR, &random_token(TOKEN_LEN)).await
        }
        QuestionKind::Paragraph => {
            enter_with_fallback(
                block,
                PARAGRAPH_SELECTOR,
                &random_paragraph(PARAGRAPH_SENTENCES),
            )
            .await
        }
        QuestionKind::RadioButton => {
            let labels = block.labels(RADIO_SELECTOR).await?;
            match pick_one(&labels) {
                Some(index) => click_with_fallback(block, RADIO_SELECTOR, index).await,
                None => Ok(()),
            }
        }
        QuestionKind::Checkboxes => {
            let labels = block.labels(CHECKBOX_SELECTOR).await?;
            for index in pick_many(&labels, checkbox_picks) {
                click_with_fallback(block, CHECKBOX_SELECTOR, index).await?;
            }
            Ok(())
        }
        QuestionKind::Dropdown => {
            click_with_fallback(block, LISTBOX_SELECTOR, 0).await?;
            let labels = page.labels(LISTBOX_OPTION_SELECTOR).await?;
            match pick_one(&labels) {
                Some(index) => page_click_with_fallback(page, LISTBOX_OPTION_SELECTOR, index).await,
                None => Ok(()),
            }
        }
        QuestionKind::SectionHeader | QuestionKind::Unknown => Ok(()),
    }
}
