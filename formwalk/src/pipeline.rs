use crate::aggregator::{CheckboxAggregator, Observation};
use crate::classifier::{classify, question_text};
use crate::configuration::Configuration;
use crate::error::Result;
use crate::navigator::{advance_page, FormPage, QuestionBlock};
use crate::post_process::FormSchema;
use crate::question::{QuestionKind, TraversalState};
use crate::synthesizer::fill;

/// What happened to one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Classified, filled when fillable, and recorded.
    Recorded(QuestionKind),
    /// The block had no text.
    Blank,
    /// Every attempt went stale, both fill paths failed, or the driver
    /// reported another failure for this block.
    Skipped,
}

/// Classify one block without touching the traversal state.
///
/// Returns `None` for blank blocks.
async fn observe<B: QuestionBlock>(block: &B) -> Result<Option<Observation>> {
    let text = question_text(block).await?;

    if text.is_empty() {
        return Ok(None);
    }

    let (kind, options) = classify(block).await?;

    Ok(Some(Observation::new(text, kind, options)))
}

/// Process the block at `index`, retrying the whole block when it goes stale.
///
/// Every retry looks the block up again from the page since the page may have
/// re-rendered. The block is recorded only once it has been classified and
/// filled, so a retry never records it twice. Failures of the block itself
/// never escape: the block is skipped and the walk goes on. Only failing to
/// list the page's blocks is returned.
pub async fn process_block<P: FormPage>(
    page: &P,
    first: Option<P::Block>,
    index: usize,
    state: &mut TraversalState,
    config: &Configuration,
) -> Result<BlockOutcome> {
    let attempts = config.block_attempts.max(1);
    let mut block = first;
    let mut last_kind = None;

    for attempt in 1..=attempts {
        let current = match block.take() {
            Some(b) => b,
            None => match page.question_blocks().await {
                Ok(blocks) => match blocks.into_iter().nth(index) {
                    Some(b) => b,
                    None => {
                        log::warn!("Block {index} vanished on re-fetch (attempt {attempt}).");
                        continue;
                    }
                },
                Err(err) if err.is_stale() => {
                    log::warn!("Page went stale while re-fetching block {index}, retrying.");
                    continue;
                }
                Err(err) => return Err(err),
            },
        };

        let observation = match observe(&current).await {
            Ok(Some(observation)) => observation,
            Ok(None) => return Ok(BlockOutcome::Blank),
            Err(err) if err.is_stale() => {
                log::warn!("Stale element encountered on block {index}, retrying ({attempt}/{attempts}).");
                continue;
            }
            Err(err) => {
                log::warn!("Skipping block {index}, classification failed: {err}");
                CheckboxAggregator::new(state).skip(last_kind);
                return Ok(BlockOutcome::Skipped);
            }
        };

        let kind = observation.kind;
        last_kind = Some(kind);

        let filled = if kind.is_fillable() {
            fill(page, &current, kind, config.checkbox_picks).await
        } else {
            Ok(())
        };

        match filled {
            Ok(()) => {
                log::debug!("Block {index}: {kind} {:?}", observation.text);
                CheckboxAggregator::new(state).push(observation);
                return Ok(BlockOutcome::Recorded(kind));
            }
            Err(err) if err.is_stale() => {
                log::warn!("Stale element encountered on block {index}, retrying ({attempt}/{attempts}).");
            }
            Err(err) => {
                log::warn!("Skipping block {index} ({kind}): {err}");
                CheckboxAggregator::new(state).skip(last_kind);
                return Ok(BlockOutcome::Skipped);
            }
        }
    }

    log::warn!("Failed to extract and fill block {index} after {attempts} attempts.");
    CheckboxAggregator::new(state).skip(last_kind);

    Ok(BlockOutcome::Skipped)
}

/// Extract and fill every block on the current page.
pub async fn process_page<P: FormPage>(
    page: &P,
    state: &mut TraversalState,
    config: &Configuration,
) -> Result<Vec<BlockOutcome>> {
    let blocks = page.question_blocks().await?;

    log::info!(
        "Found {} question elements on page {}",
        blocks.len(),
        state.page_index
    );

    let mut outcomes = Vec::with_capacity(blocks.len());

    for (index, block) in blocks.into_iter().enumerate() {
        outcomes.push(process_block(page, Some(block), index, state, config).await?);
    }

    Ok(outcomes)
}

/// Walk every page from the current one until the form has no further page.
///
/// A run-level failure stops the walk; whatever was recorded up to that
/// point stays in `state`.
pub async fn traverse<P: FormPage>(
    page: &P,
    state: &mut TraversalState,
    config: &Configuration,
) -> Result<()> {
    loop {
        log::info!("Extracting and filling questions on page {}", state.page_index);

        process_page(page, state, config).await?;

        if !advance_page(page).await {
            break;
        }

        state.next_page();
    }

    log::info!(
        "Extracted a total of {} questions from {} page(s).",
        state.questions.len(),
        state.page_index
    );

    Ok(())
}

/// Run the whole pipeline against an already loaded page and clean the result.
///
/// Unexpected failures during the walk are logged and the questions gathered
/// so far are returned.
pub async fn extract_from_page<P: FormPage>(page: &P, config: &Configuration) -> FormSchema {
    let mut state = TraversalState::new();

    if let Err(err) = traverse(page, &mut state, config).await {
        log::error!(
            "An error occurred while extracting questions on page {}: {err}",
            state.page_index
        );
    }

    FormSchema::from_questions(state.into_questions())
}

/// Extracts the question schema of a multi-page form.
/// ```rust,no_run
/// use formwalk::pipeline::FormExtractor;
///
/// # async fn run() -> formwalk::Result<()> {
/// let mut extractor = FormExtractor::new("https://example.com/form");
/// extractor.configuration.webdriver.server_url = "http://localhost:9515".into();
/// let schema = extractor.extract().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FormExtractor {
    /// The form url.
    url: String,
    /// Configuration properties.
    pub configuration: Configuration,
}

impl FormExtractor {
    /// Initialize an extractor for a form url.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            configuration: Configuration::new(),
        }
    }

    /// The form url.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replace the configuration.
    pub fn with_configuration(&mut self, configuration: Configuration) -> &mut Self {
        self.configuration = configuration;
        self
    }

    /// Persist the result at this path.
    pub fn with_output_path<P: Into<std::path::PathBuf>>(&mut self, path: Option<P>) -> &mut Self {
        self.configuration.with_output_path(path);
        self
    }

    /// Validate the url before any browser is started.
    pub fn build(self) -> Result<Self> {
        url::Url::parse(&self.url)?;
        Ok(self)
    }

    /// Open a session, walk the form, release the session and return the
    /// cleaned schema, persisting it when an output path is configured.
    ///
    /// Fails only when the session cannot be started or the first page never
    /// becomes ready. The session is released on every path.
    #[cfg(feature = "webdriver")]
    pub async fn extract(&self) -> Result<FormSchema> {
        use crate::navigator::load;
        use crate::session::with_session;
        use crate::utils::log;

        url::Url::parse(&self.url)?;

        let config = &self.configuration;
        let url = self.url.as_str();

        let schema = with_session(config, |driver| async move {
            let page = match load(driver, url, config).await {
                Ok(page) => page,
                Err(err) => {
                    log::error!("Failed to load the form: {err}");
                    return Err(err);
                }
            };
            Ok(extract_from_page(&page, config).await)
        })
        .await?;

        if let Some(ref path) = config.output_path {
            if let Err(err) = schema.save(path).await {
                log::error!("Error saving to JSON: {err}");
            }
        }

        log("Extracted", url);

        Ok(schema)
    }
}
