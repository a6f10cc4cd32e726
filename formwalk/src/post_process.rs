use crate::error::{FormError, Result};
use crate::question::{Question, QuestionKind, ESCAPE_TOKEN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remove every answer path the synthesizer would not take itself.
///
/// Checkbox questions lose their escape options and disappear when none are
/// left. Radio and dropdown questions lose their escape options. Any other
/// question whose label contains the escape token is dropped. Order is kept
/// and running this twice changes nothing.
pub fn clean(questions: Vec<Question>) -> Vec<Question> {
    questions
        .into_iter()
        .filter_map(|mut question| match question.kind {
            QuestionKind::Checkboxes => {
                question.options.retain(|o| !o.contains(ESCAPE_TOKEN));
                (!question.options.is_empty()).then_some(question)
            }
            _ if question.text.contains(ESCAPE_TOKEN) => None,
            QuestionKind::RadioButton | QuestionKind::Dropdown => {
                question.options.retain(|o| !o.contains(ESCAPE_TOKEN));
                Some(question)
            }
            _ => Some(question),
        })
        .collect()
}

/// The normalized form description returned to callers and persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Questions in document order.
    pub questions: Vec<Question>,
}

/// Artifacts are written either as `{"questions": [...]}` or as a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSchema {
    Wrapped(FormSchema),
    Bare(Vec<Question>),
}

impl FormSchema {
    /// Clean `questions` into a schema.
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: clean(questions),
        }
    }

    /// Pretty printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the schema as indented UTF-8 JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, self.to_json_pretty()?).await?;
        log::info!("Saved extracted questions to {}", path.display());

        Ok(())
    }

    /// Read a schema written by [`FormSchema::save`] or a bare question list.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FormError::ArtifactMissing(path.to_path_buf()))
            }
            Err(err) => return Err(err.into()),
        };

        Ok(match serde_json::from_str::<StoredSchema>(&raw) {
            Ok(StoredSchema::Wrapped(schema)) => schema,
            Ok(StoredSchema::Bare(questions)) => FormSchema { questions },
            Err(_) => serde_json::from_str::<FormSchema>(&raw)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, kind: QuestionKind, options: &[&str]) -> Question {
        Question::new(text, kind, options.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_clean_checkboxes() {
        let cleaned = clean(vec![
            q("Pick fruits", QuestionKind::Checkboxes, &["Apple", "Banana", "Other: specify"]),
            q("Only other", QuestionKind::Checkboxes, &["Other:"]),
        ]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].options, vec!["Apple", "Banana"]);
    }

    #[test]
    fn test_clean_drops_escape_questions() {
        let cleaned = clean(vec![
            q("Name", QuestionKind::ShortAnswer, &[]),
            q("Other comments", QuestionKind::Paragraph, &[]),
            q("Colour", QuestionKind::RadioButton, &["Red", "Other:"]),
            q("Intro", QuestionKind::SectionHeader, &[]),
        ]);
        let texts: Vec<&str> = cleaned.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["Name", "Colour", "Intro"]);
        assert_eq!(cleaned[1].options, vec!["Red"]);
    }

    #[test]
    fn test_clean_idempotent() {
        let input = vec![
            q("Pick", QuestionKind::Checkboxes, &["A", "Other", "B"]),
            q("Other thoughts", QuestionKind::ShortAnswer, &[]),
            q("Size", QuestionKind::Dropdown, &["S", "M", "Other size"]),
            q("Mystery", QuestionKind::Unknown, &["x"]),
        ];
        let once = clean(input);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
        assert!(once.iter().all(|q| !q.mentions_escape()));
    }

    #[test]
    fn test_schema_json_shape() {
        let schema = FormSchema::from_questions(vec![
            q("Intro", QuestionKind::SectionHeader, &[]),
            q("Name", QuestionKind::ShortAnswer, &[]),
        ]);
        let value: serde_json::Value =
            serde_json::from_str(&schema.to_json_pretty().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"questions": [
                {"type": "Section Header", "text": "Intro"},
                {"question": "Name", "type": "Short Answer"}
            ]})
        );
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("questions.json");
        let schema = FormSchema::from_questions(vec![q(
            "Café ☕",
            QuestionKind::RadioButton,
            &["Oui", "Non"],
        )]);

        schema.save(&path).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Café ☕"));
        assert!(raw.contains("\n  "));

        assert_eq!(FormSchema::load(&path).await.unwrap(), schema);
    }

    #[tokio::test]
    async fn test_load_bare_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.json");
        std::fs::write(
            &path,
            r#"[{"question": "Age", "type": "Short Answer"}]"#,
        )
        .unwrap();

        let schema = FormSchema::load(&path).await.unwrap();
        assert_eq!(schema.questions.len(), 1);
        assert_eq!(schema.questions[0].kind, QuestionKind::ShortAnswer);
    }

    #[tokio::test]
    async fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        assert!(matches!(
            FormSchema::load(&missing).await,
            Err(FormError::ArtifactMissing(_))
        ));

        let corrupt = dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{not json").unwrap();
        assert!(matches!(
            FormSchema::load(&corrupt).await,
            Err(FormError::Json(_))
        ));
    }
}
