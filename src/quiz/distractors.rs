//! Wrong-answer generation
//!
//! Each category gets a strategy that looks at the literal form of the correct
//! answer (number, quoted string, boolean) and the operands in the expression to
//! propose plausible mistakes. Whatever the strategy returns is deduplicated and
//! topped up from [`FALLBACK_POOL`], so a valid answer set comes out even for
//! input no strategy anticipated.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::bank::{Category, Question};
use crate::consts::ANSWER_COUNT;

/// Last-resort distractors
pub const FALLBACK_POOL: [&str; 9] = [
    "undefined", "null", "NaN", "Error", "???", "false", "true", "0", "-1",
];

/// Used when no category strategy applies
const GENERIC_WRONG: [&str; 9] = [
    "undefined",
    "null",
    "NaN",
    "true",
    "false",
    "0",
    "1",
    "\"\"",
    "TypeError",
];

/// Every `typeof` result, plus the two that people expect but JS never returns
const TYPEOF_RESULTS: [&str; 9] = [
    "\"undefined\"",
    "\"object\"",
    "\"boolean\"",
    "\"number\"",
    "\"string\"",
    "\"function\"",
    "\"symbol\"",
    "\"null\"",
    "\"array\"",
];

/// Shuffled answers for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub answers: [String; ANSWER_COUNT],
    /// Index of the correct answer after shuffling
    pub correct_index: usize,
}

impl AnswerSet {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.answers[self.correct_index]
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }
}

/// Build the three-answer set for `question`: correct answer plus two distractors, shuffled
pub fn prepare_answers<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> AnswerSet {
    let [first, second] = generate_wrong_answers(question, rng);
    let mut answers = [question.correct.clone(), first, second];
    answers.shuffle(rng);

    // Distractors never equal the correct answer, so exactly one slot matches
    let correct_index = answers
        .iter()
        .position(|answer| *answer == question.correct)
        .unwrap_or(0);

    AnswerSet {
        answers,
        correct_index,
    }
}

/// Exactly two distinct distractors, neither equal to the correct answer
pub fn generate_wrong_answers<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> [String; 2] {
    let correct = question.correct.as_str();

    let candidates = match question.category {
        Category::TypeCoercion => type_coercion_wrong(&question.expression, correct),
        Category::TruthyFalsy => truthy_falsy_wrong(correct),
        Category::Equality => equality_wrong(correct),
        Category::Typeof => typeof_wrong(correct, rng),
        Category::Arrays => array_wrong(correct),
        Category::Objects => object_wrong(correct),
        Category::Unlimited => generic_wrong(correct),
    };

    let mut wrongs: Vec<String> = Vec::with_capacity(2);
    for candidate in candidates {
        if candidate != correct && !wrongs.contains(&candidate) {
            wrongs.push(candidate);
        }
    }
    wrongs.truncate(2);

    while wrongs.len() < 2 {
        // At most three pool entries are excluded, so the pool never runs dry
        let open: Vec<&str> = FALLBACK_POOL
            .iter()
            .copied()
            .filter(|token| *token != correct && !wrongs.iter().any(|w| w.as_str() == *token))
            .collect();
        let pick = open[rng.random_range(0..open.len())];
        wrongs.push(pick.to_string());
    }

    let second = wrongs.pop().unwrap_or_default();
    let first = wrongs.pop().unwrap_or_default();
    [first, second]
}

/// Numeric vs string readings of the operands
fn type_coercion_wrong(expression: &str, correct: &str) -> Vec<String> {
    let mut wrongs = Vec::new();
    let numbers = digit_runs(expression);

    if let &[a, b, ..] = numbers.as_slice() {
        if correct.starts_with('"') {
            wrongs.push(a.saturating_add(b).to_string());
            wrongs.push(a.saturating_mul(b).to_string());
        } else {
            wrongs.push(format!("\"{}{}\"", a, b));
            wrongs.push(a.saturating_sub(b).to_string());
        }
    }

    match correct {
        "42" => wrongs.push("\"42\"".to_string()),
        "\"42\"" => wrongs.push("42".to_string()),
        _ => {}
    }

    wrongs
}

fn truthy_falsy_wrong(correct: &str) -> Vec<String> {
    match correct {
        "true" => strings(&["false", "undefined"]),
        "false" => strings(&["true", "null"]),
        _ => Vec::new(),
    }
}

fn equality_wrong(correct: &str) -> Vec<String> {
    match correct {
        "true" => strings(&["false", "TypeError"]),
        "false" => strings(&["true", "undefined"]),
        _ => Vec::new(),
    }
}

/// Common `typeof` confusions, otherwise two random other type names
fn typeof_wrong<R: Rng + ?Sized>(correct: &str, rng: &mut R) -> Vec<String> {
    match correct {
        "\"object\"" => strings(&["\"null\"", "\"array\""]),
        "\"number\"" => strings(&["\"NaN\"", "\"undefined\""]),
        "\"undefined\"" => strings(&["\"null\"", "\"object\""]),
        _ => {
            let mut others: Vec<&str> = TYPEOF_RESULTS
                .iter()
                .copied()
                .filter(|t| *t != correct)
                .collect();
            others.shuffle(rng);
            strings(&others[..2])
        }
    }
}

/// Off-by-one and doubling for indices and lengths
fn array_wrong(correct: &str) -> Vec<String> {
    if let Some(n) = parse_leading_int(correct) {
        let mut wrongs = vec![n.saturating_sub(1).to_string(), n.saturating_add(1).to_string()];
        if n > 1 {
            wrongs.push(n.saturating_mul(2).to_string());
        }
        return wrongs;
    }

    match correct {
        "true" => strings(&["false", "undefined"]),
        "false" => strings(&["true", "null"]),
        s if s.starts_with('"') => strings(&["undefined", "null"]),
        _ => Vec::new(),
    }
}

fn object_wrong(correct: &str) -> Vec<String> {
    if let Some(n) = parse_leading_int(correct) {
        return vec![n.saturating_add(1).to_string(), "undefined".to_string()];
    }

    match correct {
        "true" => strings(&["false", "undefined"]),
        "false" => strings(&["true", "TypeError"]),
        _ => strings(&["undefined", "null"]),
    }
}

fn generic_wrong(correct: &str) -> Vec<String> {
    GENERIC_WRONG
        .iter()
        .filter(|w| **w != correct)
        .take(2)
        .map(|w| w.to_string())
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Unsigned integer literals in order of appearance (`"5" + 3` yields `[5, 3]`)
fn digit_runs(text: &str) -> Vec<i64> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
        .collect()
}

/// Integer prefix in the manner of JS `parseInt`: optional sign, then digits.
/// `"3"` and `"-1"` parse, `"\"1-2-3\""` and `"true"` do not.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;

    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::bank::questions;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn question(expression: &str, correct: &str, category: Category) -> Question {
        Question {
            expression: expression.to_string(),
            correct: correct.to_string(),
            category,
            difficulty: 1,
            explanation: String::new(),
        }
    }

    fn assert_valid(set: &AnswerSet, correct: &str) {
        assert_eq!(set.answers.len(), 3);
        assert_eq!(set.correct_answer(), correct);
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert_ne!(set.answers[i], set.answers[j], "duplicate in {:?}", set);
            }
        }
    }

    #[test]
    fn test_every_catalog_question_yields_valid_set() {
        let mut rng = Pcg32::seed_from_u64(42);
        for category in Category::ORDER {
            for spec in questions(category) {
                let q = spec.to_question();
                for _ in 0..5 {
                    assert_valid(&prepare_answers(&q, &mut rng), &q.correct);
                }
            }
        }
    }

    #[test]
    fn test_string_result_offers_numeric_readings() {
        let mut rng = Pcg32::seed_from_u64(1);
        let q = question("\"5\" + 3", "\"53\"", Category::TypeCoercion);
        let wrongs = generate_wrong_answers(&q, &mut rng);
        assert_eq!(wrongs, ["8".to_string(), "15".to_string()]);
    }

    #[test]
    fn test_numeric_result_offers_concatenation() {
        let mut rng = Pcg32::seed_from_u64(1);
        let q = question("\"10\" / 2", "5", Category::TypeCoercion);
        let wrongs = generate_wrong_answers(&q, &mut rng);
        assert_eq!(wrongs, ["\"102\"".to_string(), "8".to_string()]);
    }

    #[test]
    fn test_typeof_object_misconceptions() {
        let mut rng = Pcg32::seed_from_u64(1);
        let q = question("typeof null", "\"object\"", Category::Typeof);
        let wrongs = generate_wrong_answers(&q, &mut rng);
        assert_eq!(wrongs, ["\"null\"".to_string(), "\"array\"".to_string()]);
    }

    #[test]
    fn test_array_off_by_one() {
        let mut rng = Pcg32::seed_from_u64(1);
        let q = question("[1,2,3].length", "3", Category::Arrays);
        let wrongs = generate_wrong_answers(&q, &mut rng);
        assert_eq!(wrongs, ["2".to_string(), "4".to_string()]);
    }

    #[test]
    fn test_malformed_input_falls_back() {
        let mut rng = Pcg32::seed_from_u64(9);
        for correct in ["", "undefined", "???", "\u{1F600}", "-1"] {
            for category in Category::ORDER.into_iter().chain([Category::Unlimited]) {
                let q = question("", correct, category);
                let set = prepare_answers(&q, &mut rng);
                assert_valid(&set, correct);
            }
        }
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int("-1"), Some(-1));
        assert_eq!(parse_leading_int("12px"), Some(12));
        assert_eq!(parse_leading_int("\"1-2-3\""), None);
        assert_eq!(parse_leading_int("true"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_shuffle_spreads_correct_answer() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let q = question("typeof 42", "\"number\"", Category::Typeof);
        let mut slots = [0u32; 3];
        for _ in 0..3000 {
            slots[prepare_answers(&q, &mut rng).correct_index] += 1;
        }
        for count in slots {
            assert!((850..1150).contains(&count), "slot count {}", count);
        }
    }

    proptest! {
        #[test]
        fn prop_answer_set_is_valid(
            expression in ".{0,24}",
            correct in ".{0,12}",
            level in 0usize..7,
            seed in any::<u64>(),
        ) {
            let category = Category::ORDER.get(level).copied().unwrap_or(Category::Unlimited);
            let q = question(&expression, &correct, category);
            let mut rng = Pcg32::seed_from_u64(seed);
            let set = prepare_answers(&q, &mut rng);

            prop_assert_eq!(set.correct_answer(), correct.as_str());
            prop_assert_ne!(&set.answers[0], &set.answers[1]);
            prop_assert_ne!(&set.answers[0], &set.answers[2]);
            prop_assert_ne!(&set.answers[1], &set.answers[2]);
        }
    }
}
