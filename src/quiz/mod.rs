//! Quiz content module
//!
//! Static trivia catalog, level progression and answer-set preparation.
//! Everything here is pure: randomness comes in through a caller-supplied RNG.

pub mod bank;
pub mod distractors;

pub use bank::{
    Category, Question, QuestionSpec, WIN_THRESHOLD, current_category, has_won_game, questions,
    random_question, unlocked_categories,
};
pub use distractors::{AnswerSet, FALLBACK_POOL, generate_wrong_answers, prepare_answers};
