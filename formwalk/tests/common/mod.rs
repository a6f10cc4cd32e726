//! An in-memory form implementing the page and block seams.

#![allow(dead_code)]

use async_trait::async_trait;
use formwalk::classifier::{
    CHECKBOX_SELECTOR, LISTBOX_OPTION_SELECTOR, LISTBOX_SELECTOR, PARAGRAPH_SELECTOR,
    RADIO_SELECTOR, SECTION_HEADER_SELECTOR, SHORT_ANSWER_SELECTOR, TITLE_SELECTOR,
};
use formwalk::navigator::{FormPage, Interaction, QuestionBlock};
use formwalk::{FormError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How a block responds to interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Controls {
    /// Native and script paths both work.
    #[default]
    Responsive,
    /// Native events are swallowed, script works.
    NativeBroken,
    /// Nothing works.
    Dead,
    /// The driver fails outright on any interaction.
    DriverFault,
}

/// One question container.
#[derive(Debug, Clone, Default)]
pub struct BlockSpec {
    pub text: String,
    pub title: Option<String>,
    pub controls: Vec<(&'static str, Vec<String>)>,
    pub popup: Vec<String>,
    pub stale_failures: usize,
    pub behaviour: Controls,
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BlockSpec {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn short(label: &str) -> Self {
        Self::new(&format!("{label}\n*")).with_control(SHORT_ANSWER_SELECTOR, &[""])
    }

    pub fn paragraph(label: &str) -> Self {
        Self::new(label).with_control(PARAGRAPH_SELECTOR, &[""])
    }

    pub fn radio(label: &str, options: &[&str]) -> Self {
        let text = std::iter::once(label)
            .chain(options.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(&text).with_control(RADIO_SELECTOR, options)
    }

    /// A checkbox fragment whose text is `label` followed by `options`.
    pub fn checkbox(label: &str, options: &[&str]) -> Self {
        let text = std::iter::once(label)
            .chain(options.iter().copied())
            .collect::<Vec<_>>()
            .join("\n");
        let controls: Vec<&str> = if options.is_empty() {
            vec![label]
        } else {
            options.to_vec()
        };
        Self::new(&text).with_control(CHECKBOX_SELECTOR, &controls)
    }

    pub fn dropdown(label: &str, options: &[&str]) -> Self {
        let mut spec = Self::new(&format!("{label}\nChoose")).with_control(LISTBOX_SELECTOR, &["Choose"]);
        spec.popup = lines(options);
        spec
    }

    pub fn header(label: &str) -> Self {
        Self::new(label).with_control(SECTION_HEADER_SELECTOR, &[""])
    }

    pub fn with_control(mut self, selector: &'static str, labels: &[&str]) -> Self {
        self.controls.push((selector, lines(labels)));
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn stale(mut self, failures: usize) -> Self {
        self.stale_failures = failures;
        self
    }

    pub fn behaving(mut self, behaviour: Controls) -> Self {
        self.behaviour = behaviour;
        self
    }

    fn control(&self, selector: &str) -> Option<&Vec<String>> {
        self.controls
            .iter()
            .find(|(s, _)| *s == selector)
            .map(|(_, labels)| labels)
    }
}

/// A committed interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub page: usize,
    pub block: usize,
    pub selector: String,
    pub label: String,
    pub mode: Interaction,
}

/// How navigation ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ending {
    /// No "Next" on the last page.
    #[default]
    NoNext,
    /// "Next" on this page never leads anywhere.
    TimeoutOn(usize),
    /// "Next" disappears on this page even though more pages exist.
    StopOn(usize),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub page: usize,
    pub navigations: usize,
    pub fetches: usize,
    pub visited: Vec<usize>,
    pub stale_left: HashMap<(usize, usize), usize>,
    pub popup: Vec<String>,
    pub clicks: Vec<Action>,
    pub entered: Vec<(usize, usize, String, Interaction)>,
}

/// The whole form, positioned on one page at a time.
pub struct FakeForm {
    pages: Vec<Vec<BlockSpec>>,
    ending: Ending,
    pub state: Arc<Mutex<FakeState>>,
}

impl FakeForm {
    pub fn new(pages: Vec<Vec<BlockSpec>>) -> Self {
        let mut state = FakeState {
            visited: vec![0],
            ..Default::default()
        };
        for (p, blocks) in pages.iter().enumerate() {
            for (b, spec) in blocks.iter().enumerate() {
                if spec.stale_failures > 0 {
                    state.stale_left.insert((p, b), spec.stale_failures);
                }
            }
        }
        Self {
            pages,
            ending: Ending::default(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn ending(mut self, ending: Ending) -> Self {
        self.ending = ending;
        self
    }

    pub fn navigations(&self) -> usize {
        self.state.lock().unwrap().navigations
    }

    pub fn visited(&self) -> Vec<usize> {
        self.state.lock().unwrap().visited.clone()
    }

    pub fn clicks(&self) -> Vec<Action> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn entered(&self) -> Vec<(usize, usize, String, Interaction)> {
        self.state.lock().unwrap().entered.clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }
}

/// One block as handed out for the current page.
pub struct FakeBlock {
    page: usize,
    index: usize,
    spec: BlockSpec,
    state: Arc<Mutex<FakeState>>,
}

impl FakeBlock {
    /// Fail with a stale reference while the block's stale budget lasts or
    /// once the page it belongs to has been left.
    fn check(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.page != self.page {
            return Err(FormError::StaleElement("page navigated away".into()));
        }
        if let Some(left) = state.stale_left.get_mut(&(self.page, self.index)) {
            if *left > 0 {
                *left -= 1;
                return Err(FormError::StaleElement(format!(
                    "block {} re-rendered",
                    self.index
                )));
            }
        }
        Ok(())
    }

    fn interact(&self, mode: Interaction) -> Result<()> {
        match (self.spec.behaviour, mode) {
            (Controls::Responsive, _) | (Controls::NativeBroken, Interaction::Script) => Ok(()),
            (Controls::DriverFault, _) => Err(FormError::Driver(
                "invalid element state".to_string(),
            )),
            _ => Err(FormError::InteractionFailure(format!(
                "{mode} interaction rejected"
            ))),
        }
    }
}

#[async_trait]
impl QuestionBlock for FakeBlock {
    async fn text(&self) -> Result<String> {
        self.check()?;
        Ok(self.spec.text.clone())
    }

    async fn child_text(&self, selector: &str) -> Result<Option<String>> {
        self.check()?;
        if selector == TITLE_SELECTOR {
            return Ok(self.spec.title.clone());
        }
        Ok(self.spec.control(selector).and_then(|l| l.first().cloned()))
    }

    async fn contains(&self, selector: &str) -> Result<bool> {
        self.check()?;
        Ok(self.spec.control(selector).is_some())
    }

    async fn labels(&self, selector: &str) -> Result<Vec<String>> {
        self.check()?;
        Ok(self.spec.control(selector).cloned().unwrap_or_default())
    }

    async fn click(&self, selector: &str, index: usize, mode: Interaction) -> Result<()> {
        self.check()?;
        let label = self
            .spec
            .control(selector)
            .and_then(|l| l.get(index).cloned())
            .ok_or_else(|| FormError::ElementMissing(selector.to_string()))?;
        self.interact(mode)?;

        let mut state = self.state.lock().unwrap();
        if selector == LISTBOX_SELECTOR {
            state.popup = self.spec.popup.clone();
        }
        state.clicks.push(Action {
            page: self.page,
            block: self.index,
            selector: selector.to_string(),
            label,
            mode,
        });
        Ok(())
    }

    async fn enter_text(&self, selector: &str, value: &str, mode: Interaction) -> Result<()> {
        self.check()?;
        if self.spec.control(selector).is_none() {
            return Err(FormError::ElementMissing(selector.to_string()));
        }
        self.interact(mode)?;
        self.state
            .lock()
            .unwrap()
            .entered
            .push((self.page, self.index, value.to_string(), mode));
        Ok(())
    }
}

#[async_trait]
impl FormPage for FakeForm {
    type Block = FakeBlock;

    async fn question_blocks(&self) -> Result<Vec<FakeBlock>> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        let page = state.page;
        Ok(self.pages[page]
            .iter()
            .enumerate()
            .map(|(index, spec)| FakeBlock {
                page,
                index,
                spec: spec.clone(),
                state: self.state.clone(),
            })
            .collect())
    }

    async fn labels(&self, selector: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        if selector == LISTBOX_OPTION_SELECTOR {
            Ok(state.popup.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn click(&self, selector: &str, index: usize, mode: Interaction) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let label = state
            .popup
            .get(index)
            .cloned()
            .ok_or_else(|| FormError::ElementMissing(selector.to_string()))?;
        let page = state.page;
        state.popup.clear();
        state.clicks.push(Action {
            page,
            block: usize::MAX,
            selector: selector.to_string(),
            label,
            mode,
        });
        Ok(())
    }

    async fn next_page(&self) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let page = state.page;

        match self.ending {
            Ending::TimeoutOn(p) if p == page => {
                return Err(FormError::NavigationTimeout("terminal next".into()))
            }
            Ending::StopOn(p) if p == page => return Ok(false),
            _ => (),
        }

        if page + 1 >= self.pages.len() {
            return Ok(false);
        }

        state.page += 1;
        state.navigations += 1;
        let next = state.page;
        state.visited.push(next);
        Ok(true)
    }
}
