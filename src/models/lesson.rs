use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum lesson name length for manual entry
pub const MIN_NAME_LEN: usize = 3;
/// Minimum slides content length for manual entry
pub const MIN_SLIDES_LEN: usize = 10;

/// Placeholder stored when summarization exhausts its retries.
///
/// Kept as the literal exported cell value for compatibility with the
/// four-column workbook format; callers should check
/// [`GeneratedLesson::summary_needs_retry`] rather than compare strings.
pub const SUMMARY_RETRY_PLACEHOLDER: &str = "Need to Retry";

/// One unit of lesson input: a name plus raw slide text.
///
/// Immutable once created, whether it came from a workbook row or manual entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInput {
    pub lesson_name: String,
    pub slides_content: String,
}

impl LessonInput {
    pub fn new(lesson_name: impl Into<String>, slides_content: impl Into<String>) -> Self {
        Self {
            lesson_name: lesson_name.into(),
            slides_content: slides_content.into(),
        }
    }

    /// Build a lesson from manual entry, enforcing the form validation rules.
    pub fn from_manual(
        lesson_name: impl Into<String>,
        slides_content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let lesson_name = lesson_name.into();
        let slides_content = slides_content.into();

        let name_len = lesson_name.trim().chars().count();
        if name_len < MIN_NAME_LEN {
            return Err(ValidationError::NameTooShort {
                len: name_len,
                min: MIN_NAME_LEN,
            });
        }

        let slides_len = slides_content.trim().chars().count();
        if slides_len < MIN_SLIDES_LEN {
            return Err(ValidationError::SlidesTooShort {
                len: slides_len,
                min: MIN_SLIDES_LEN,
            });
        }

        Ok(Self {
            lesson_name,
            slides_content,
        })
    }
}

/// A fully or partially processed lesson.
///
/// Created after phase 1 with an empty summary; phase 2 fills
/// `summarized_content` in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLesson {
    pub lesson_name: String,
    /// Original slide text, retained for the workbook export
    pub slides_content: String,
    /// Phase-1 output: long-form markdown lesson content
    pub markdown_content: String,
    /// Phase-2 output; empty until summarization completes
    pub summarized_content: String,
}

impl GeneratedLesson {
    /// Phase-1 result with the summary still pending.
    pub fn from_generation(input: &LessonInput, markdown_content: String) -> Self {
        Self {
            lesson_name: input.lesson_name.clone(),
            slides_content: input.slides_content.clone(),
            markdown_content,
            summarized_content: String::new(),
        }
    }

    /// True when summarization gave up and stored the retry placeholder.
    pub fn summary_needs_retry(&self) -> bool {
        self.summarized_content == SUMMARY_RETRY_PLACEHOLDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_entry_accepts_valid_input() {
        let lesson = LessonInput::from_manual("Photosynthesis", "Slide one: light reactions")
            .expect("valid input");
        assert_eq!(lesson.lesson_name, "Photosynthesis");
    }

    #[test]
    fn manual_entry_rejects_short_name() {
        let err = LessonInput::from_manual("ab", "long enough slides content").unwrap_err();
        assert_eq!(err, ValidationError::NameTooShort { len: 2, min: 3 });
    }

    #[test]
    fn manual_entry_rejects_short_slides() {
        let err = LessonInput::from_manual("Economics", "too short").unwrap_err();
        assert!(matches!(err, ValidationError::SlidesTooShort { .. }));
    }

    #[test]
    fn placeholder_summary_is_flagged() {
        let input = LessonInput::new("Economics", "supply and demand slides");
        let mut lesson = GeneratedLesson::from_generation(&input, "# Economics".to_string());
        assert!(!lesson.summary_needs_retry());

        lesson.summarized_content = SUMMARY_RETRY_PLACEHOLDER.to_string();
        assert!(lesson.summary_needs_retry());
    }
}
