use async_graphql::{Enum, SimpleObject, Union};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Draft,
    Published,
    Archived,
}

impl Default for QuizStatus {
    fn default() -> Self {
        QuizStatus::Draft
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Enum, Copy)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct MultipleChoiceQuestion {
    pub options: Vec<AnswerOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct TrueFalseQuestion {
    pub options: Vec<AnswerOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ShortAnswerQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct EssayQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// Type-conditional question payload. Choice questions carry options with
/// correctness flags; written questions carry a free-text expected answer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Union)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice(MultipleChoiceQuestion),
    TrueFalse(TrueFalseQuestion),
    ShortAnswer(ShortAnswerQuestion),
    Essay(EssayQuestion),
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionKind::MultipleChoice(_) => QuestionType::MultipleChoice,
            QuestionKind::TrueFalse(_) => QuestionType::TrueFalse,
            QuestionKind::ShortAnswer(_) => QuestionType::ShortAnswer,
            QuestionKind::Essay(_) => QuestionType::Essay,
        }
    }

    fn validate(&self) -> AppResult<()> {
        match self {
            QuestionKind::MultipleChoice(q) => {
                if q.options.len() < 2 {
                    return Err(AppError::ValidationError(
                        "Multiple choice questions need at least two options".to_string(),
                    ));
                }
                if !q.options.iter().any(|o| o.is_correct) {
                    return Err(AppError::ValidationError(
                        "Multiple choice questions need at least one correct option".to_string(),
                    ));
                }
            }
            QuestionKind::TrueFalse(q) => {
                if q.options.len() != 2 {
                    return Err(AppError::ValidationError(
                        "True/false questions need exactly two options".to_string(),
                    ));
                }
                if q.options.iter().filter(|o| o.is_correct).count() != 1 {
                    return Err(AppError::ValidationError(
                        "True/false questions need exactly one correct option".to_string(),
                    ));
                }
            }
            // Written answers are graded by hand; an expected answer is optional
            QuestionKind::ShortAnswer(_) | QuestionKind::Essay(_) => {}
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuizQuestion {
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    1
}

impl QuizQuestion {
    pub fn validate(&self) -> AppResult<()> {
        if self.prompt.is_empty() {
            return Err(AppError::ValidationError(
                "Question prompt must not be empty".to_string(),
            ));
        }
        if self.points == 0 {
            return Err(AppError::ValidationError(
                "Question points must be at least 1".to_string(),
            ));
        }
        self.kind.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuizSettings {
    #[serde(default = "default_passing_score")]
    pub passing_score: u8,
    /// Minutes; `None` means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(default = "default_allowed_attempts")]
    pub allowed_attempts: u8,
    #[serde(default)]
    pub randomize_questions: bool,
    #[serde(default = "default_true")]
    pub show_correct_answers: bool,
    #[serde(default = "default_true")]
    pub show_score: bool,
}

fn default_passing_score() -> u8 {
    70
}

fn default_allowed_attempts() -> u8 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for QuizSettings {
    fn default() -> Self {
        QuizSettings {
            passing_score: 70,
            time_limit_minutes: None,
            allowed_attempts: 3,
            randomize_questions: false,
            show_correct_answers: true,
            show_score: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Quiz {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuizQuestion>,
    /// Always `questions.len()`, recomputed on every save.
    pub question_count: i16,
    #[serde(default)]
    pub settings: QuizSettings,
    #[serde(default)]
    pub status: QuizStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        course_id: &str,
        title: &str,
        description: Option<String>,
        questions: Vec<QuizQuestion>,
        settings: QuizSettings,
    ) -> Self {
        let question_count = questions.len() as i16;
        Quiz {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            title: title.to_string(),
            description,
            questions,
            question_count,
            settings,
            status: QuizStatus::Draft,
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.title.is_empty() {
            return Err(AppError::ValidationError(
                "Quiz title must not be empty".to_string(),
            ));
        }
        if self.settings.passing_score > 100 {
            return Err(AppError::ValidationError(
                "Passing score must be between 0 and 100".to_string(),
            ));
        }
        for question in &self.questions {
            question.validate()?;
        }
        Ok(())
    }

    pub fn recount_questions(&mut self) {
        self.question_count = self.questions.len() as i16;
        self.modified_at = Some(Utc::now());
    }
}

#[cfg(test)]
impl Quiz {
    pub fn test_quiz(course_id: &str, questions: Vec<QuizQuestion>) -> Self {
        Quiz::new(
            course_id,
            "Test Quiz",
            None,
            questions,
            QuizSettings::default(),
        )
    }

    pub fn test_true_false_question(prompt: &str) -> QuizQuestion {
        QuizQuestion {
            prompt: prompt.to_string(),
            kind: QuestionKind::TrueFalse(TrueFalseQuestion {
                options: vec![
                    AnswerOption {
                        text: "True".to_string(),
                        is_correct: true,
                    },
                    AnswerOption {
                        text: "False".to_string(),
                        is_correct: false,
                    },
                ],
            }),
            explanation: None,
            points: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_count_set_on_create() {
        let questions = vec![
            Quiz::test_true_false_question("Is Rust compiled?"),
            Quiz::test_true_false_question("Is Rust garbage collected?"),
        ];
        let quiz = Quiz::test_quiz("course", questions);
        assert_eq!(quiz.question_count, 2);
    }

    #[test]
    fn test_recount_questions_after_update() {
        let mut quiz = Quiz::test_quiz("course", vec![Quiz::test_true_false_question("q1")]);
        assert_eq!(quiz.question_count, 1);

        quiz.questions.push(Quiz::test_true_false_question("q2"));
        quiz.questions.push(Quiz::test_true_false_question("q3"));
        quiz.recount_questions();
        assert_eq!(quiz.question_count, 3);
    }

    #[test]
    fn test_question_kind_tag_round_trip() {
        let kind = QuestionKind::ShortAnswer(ShortAnswerQuestion {
            correct_answer: Some("ownership".to_string()),
        });
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "short_answer");

        let parsed: QuestionKind = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, kind);
        assert_eq!(parsed.question_type(), QuestionType::ShortAnswer);
    }

    #[test]
    fn test_multiple_choice_requires_correct_option() {
        let question = QuizQuestion {
            prompt: "Pick one".to_string(),
            kind: QuestionKind::MultipleChoice(MultipleChoiceQuestion {
                options: vec![
                    AnswerOption {
                        text: "a".to_string(),
                        is_correct: false,
                    },
                    AnswerOption {
                        text: "b".to_string(),
                        is_correct: false,
                    },
                ],
            }),
            explanation: None,
            points: 1,
        };
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_true_false_requires_exactly_two_options() {
        let question = QuizQuestion {
            prompt: "True or false".to_string(),
            kind: QuestionKind::TrueFalse(TrueFalseQuestion {
                options: vec![AnswerOption {
                    text: "True".to_string(),
                    is_correct: true,
                }],
            }),
            explanation: None,
            points: 1,
        };
        assert!(question.validate().is_err());
    }

    #[test]
    fn test_quiz_settings_defaults() {
        let settings = QuizSettings::default();
        assert_eq!(settings.passing_score, 70);
        assert_eq!(settings.allowed_attempts, 3);
        assert!(settings.show_correct_answers);
        assert!(settings.time_limit_minutes.is_none());
    }
}
