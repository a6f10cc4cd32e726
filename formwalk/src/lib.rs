#![warn(missing_docs)]

//! Form discovery library that walks every page of a web form in a real
//! browser and emits a normalized description of its questions.
//!
//! Formwalk opens a WebDriver session, loads the form, and then for each page:
//!
//! - enumerates the question blocks in document order,
//! - classifies every block into a [`QuestionKind`],
//! - fills it with a throwaway answer so the form's own validation lets the
//!   "Next" button through,
//! - merges consecutive checkbox fragments into one question.
//!
//! When no further page exists the collected questions are cleaned of
//! free-text "Other" escape options and returned as a [`FormSchema`].
//!
//! # Basic usage
//!
//! ```no_run
//! use formwalk::pipeline::FormExtractor;
//!
//! # async fn run() -> formwalk::Result<()> {
//! let mut extractor = FormExtractor::new("https://docs.google.com/forms/d/e/example/viewform");
//! extractor.with_output_path(Some("extracted_questions.json"));
//!
//! let schema = extractor.extract().await?;
//! println!("{}", schema.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! [`QuestionKind`]: question::QuestionKind
//! [`FormSchema`]: post_process::FormSchema

pub extern crate tokio;
pub extern crate url;

/// Merge consecutive checkbox fragments into one question.
pub mod aggregator;
/// Determine the question type of a block.
pub mod classifier;
/// Configuration structure for `FormExtractor`.
pub mod configuration;
/// Error taxonomy.
pub mod error;
/// Browser backends.
pub mod features;
/// Page and block seams plus page-to-page movement.
pub mod navigator;
/// Per-page extraction driver.
pub mod pipeline;
/// Cleaning and serialization of the extracted questions.
pub mod post_process;
/// The unit of extraction and the traversal state.
pub mod question;
/// Browser session lifecycle.
#[cfg(feature = "webdriver")]
pub mod session;
/// Synthesize throwaway answers.
pub mod synthesizer;
/// Application utils.
pub mod utils;

pub use error::{FormError, Result};
pub use post_process::FormSchema;
pub use question::{Question, QuestionKind};
