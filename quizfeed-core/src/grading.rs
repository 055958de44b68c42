use std::collections::BTreeSet;

use fancy_regex::Regex;
use likhet::{find_best_match, similarity};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::card::{Card, CardKind, ClozeCard};
use crate::review::Grade;
use crate::settings::{FuzzyThresholds, Settings};
use crate::CoreError;

/// Tag key marking a card for all-or-nothing grading.
pub const STRICT_TAG: &str = "strict";

/// Fronts that open like a definition get the same all-or-nothing treatment;
/// a nearly-right definition is a wrong definition.
const DEFINITION_PREFIXES: &[&str] = &["define ", "definition of ", "what is the definition of "];

// Set-overlap cutoffs for multi-select. These are fixed; the configurable
// thresholds only govern fuzzy text comparison.
const MULTI_EASY: f32 = 0.9;
const MULTI_GOOD: f32 = 0.6;
const MULTI_HARD: f32 = 0.2;

/// Raw user response, shaped per card kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Text(String),
    Choice(usize),
    Choices(Vec<usize>),
}

/// Grades a response against a card. Pure and clock-free: the same card,
/// answer and settings always produce the same grade.
///
/// The only failure is a response whose shape doesn't fit the card kind,
/// which is a bug in the caller, not a wrong answer.
pub fn grade(card: &Card, answer: &Answer, settings: &Settings) -> Result<Grade, CoreError> {
    let grade = match (&card.kind, answer) {
        (CardKind::Text(kind), Answer::Text(input)) => grade_free_text(
            &kind.front,
            &kind.back,
            &kind.answers,
            kind.accept.as_deref(),
            card.tag(STRICT_TAG),
            input,
            settings,
        ),
        (CardKind::Audio(kind), Answer::Text(input)) => grade_free_text(
            &kind.front,
            &kind.back,
            &kind.answers,
            None,
            card.tag(STRICT_TAG),
            input,
            settings,
        ),
        (CardKind::Cloze(kind), Answer::Text(input)) => grade_cloze(kind, input, settings),
        (CardKind::McqSingle(kind), Answer::Choice(choice)) => {
            if *choice == kind.correct {
                Grade::Easy
            } else {
                Grade::Again
            }
        }
        (CardKind::McqMulti(kind), Answer::Choices(choices)) => {
            overlap_grade(&kind.correct, choices)
        }
        _ => return Err(CoreError::AnswerShape { kind: card.ckind() }),
    };

    trace!("card {} graded {:?}", card.id, grade);

    Ok(grade)
}

fn grade_free_text(
    front: &str,
    back: &str,
    answers: &[String],
    accept: Option<&str>,
    strict_tagged: bool,
    input: &str,
    settings: &Settings,
) -> Grade {
    let normalized = settings.normalize(input);

    let canonical: Vec<String> = if answers.is_empty() {
        vec![back.to_string()]
    } else {
        answers.to_vec()
    };

    let canonical: Vec<String> = canonical
        .iter()
        .map(|answer| settings.normalize(answer))
        .filter(|answer| !answer.is_empty())
        .collect();

    if canonical.is_empty() {
        // nothing to compare against; the quiz flow still needs a grade
        return Grade::Again;
    }

    if canonical.iter().any(|answer| *answer == normalized) {
        return Grade::Easy;
    }

    if let Some(pattern) = accept {
        match Regex::new(pattern) {
            Ok(re) => {
                let accepted = re.is_match(input).unwrap_or(false)
                    || re.is_match(&normalized).unwrap_or(false);

                if accepted {
                    return Grade::Easy;
                }
            }
            Err(_) => trace!("ignoring broken accept pattern: {pattern}"),
        }
    }

    if strict_tagged || is_definition_front(front) {
        return Grade::Again;
    }

    let best = find_best_match(&normalized, &canonical);

    if canonical.iter().all(|answer| !answer.contains(' ')) {
        // single-word vocabulary: a near miss may well be a different word,
        // so fuzzy credit is capped at Hard
        return if best.score >= settings.thresholds.low {
            Grade::Hard
        } else {
            Grade::Again
        };
    }

    threshold_grade(best.score, &settings.thresholds)
}

fn is_definition_front(front: &str) -> bool {
    let front = front.trim().to_lowercase();

    DEFINITION_PREFIXES
        .iter()
        .any(|prefix| front.starts_with(prefix))
}

fn threshold_grade(score: f32, thresholds: &FuzzyThresholds) -> Grade {
    if score >= thresholds.high {
        Grade::Easy
    } else if score >= thresholds.medium {
        Grade::Good
    } else if score >= thresholds.low {
        Grade::Hard
    } else {
        Grade::Again
    }
}

/// F1-style overlap between the selected and the correct option sets.
fn overlap_grade(correct: &BTreeSet<usize>, choices: &[usize]) -> Grade {
    let selected: BTreeSet<usize> = choices.iter().copied().collect();

    if selected.is_empty() && correct.is_empty() {
        return Grade::Easy;
    }

    let tp = selected.intersection(correct).count() as f32;
    let fp = selected.difference(correct).count() as f32;
    let missed = correct.difference(&selected).count() as f32;

    // denominator can't be zero here, both-empty returned above
    let score = tp / (tp + 0.5 * (fp + missed));

    if score >= MULTI_EASY {
        Grade::Easy
    } else if score >= MULTI_GOOD {
        Grade::Good
    } else if score >= MULTI_HARD {
        Grade::Hard
    } else {
        Grade::Again
    }
}

/// Each blank is graded on its own, the card gets the rounded average.
fn grade_cloze(kind: &ClozeCard, input: &str, settings: &Settings) -> Grade {
    let separator = if input.contains(';') { ';' } else { ',' };
    let segments: Vec<&str> = input.split(separator).collect();

    let mut total = 0u32;

    for (i, canonical) in kind.answers.iter().enumerate() {
        let segment = settings.normalize(segments.get(i).copied().unwrap_or(""));
        let canonical = settings.normalize(canonical);

        let blank = if !canonical.is_empty() && segment == canonical {
            Grade::Easy
        } else {
            threshold_grade(similarity(&segment, &canonical), &settings.thresholds)
        };

        total += blank.value() as u32;
    }

    let average = total as f32 / kind.answers.len() as f32;

    if average >= 2.5 {
        Grade::Easy
    } else if average >= 1.5 {
        Grade::Good
    } else if average >= 0.5 {
        Grade::Hard
    } else {
        Grade::Again
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{AudioCard, McqMultiCard, McqSingleCard, TextCard};
    use crate::deck::DeckId;
    use std::time::Duration;

    fn now() -> Duration {
        Duration::from_secs(1_000_000)
    }

    fn text_card(answers: &[&str]) -> Card {
        Card::new(
            DeckId::new_v4(),
            TextCard {
                front: "capital of france".to_string(),
                back: "Paris".to_string(),
                answers: answers.iter().map(|s| s.to_string()).collect(),
                accept: None,
            },
            now(),
        )
    }

    fn text(s: &str) -> Answer {
        Answer::Text(s.to_string())
    }

    #[test]
    fn exact_match_after_normalization() {
        let card = text_card(&["paris"]);
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("PARIS!"), &settings), Ok(Grade::Easy));
    }

    #[test]
    fn falls_back_to_back_side() {
        let card = text_card(&[]);
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("paris"), &settings), Ok(Grade::Easy));
    }

    #[test]
    fn missing_answers_grade_again() {
        let mut card = text_card(&[]);
        if let CardKind::Text(kind) = &mut card.kind {
            kind.back = String::new();
        }
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("paris"), &settings), Ok(Grade::Again));
    }

    #[test]
    fn single_word_fuzzy_caps_at_hard() {
        let card = text_card(&["paris"]);
        let settings = Settings::default();

        // 1 edit over 5 chars, well above the low cutoff, still only Hard
        assert_eq!(grade(&card, &text("pariz"), &settings), Ok(Grade::Hard));
        assert_eq!(grade(&card, &text("london"), &settings), Ok(Grade::Again));
    }

    #[test]
    fn prose_maps_through_thresholds() {
        let card = text_card(&["aaaaa bbbbb"]);
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("aaaaa bbbbb"), &settings), Ok(Grade::Easy));
        // 2 edits over 11 chars -> 0.818
        assert_eq!(grade(&card, &text("aaaaa bbbzz"), &settings), Ok(Grade::Good));
        // 4 edits -> 0.636
        assert_eq!(grade(&card, &text("aaazz bbzzz"), &settings), Ok(Grade::Hard));
        assert_eq!(grade(&card, &text("zzzzz zzzzz"), &settings), Ok(Grade::Again));
    }

    #[test]
    fn accept_pattern_grades_easy() {
        let mut card = text_card(&["forty two"]);
        if let CardKind::Text(kind) = &mut card.kind {
            kind.accept = Some("^[0-9]+$".to_string());
        }
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("42"), &settings), Ok(Grade::Easy));
    }

    #[test]
    fn broken_accept_pattern_is_ignored() {
        let mut card = text_card(&["paris"]);
        if let CardKind::Text(kind) = &mut card.kind {
            kind.accept = Some("((".to_string());
        }
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("pariz"), &settings), Ok(Grade::Hard));
        assert_eq!(grade(&card, &text("paris"), &settings), Ok(Grade::Easy));
    }

    #[test]
    fn strict_tag_kills_partial_credit() {
        let mut card = text_card(&["light amplification by emission"]);
        card.tags.insert(STRICT_TAG.to_string(), String::new());
        let settings = Settings::default();

        let near_miss = text("light amplification by emision");
        assert_eq!(grade(&card, &near_miss, &settings), Ok(Grade::Again));

        let exact = text("light amplification by emission");
        assert_eq!(grade(&card, &exact, &settings), Ok(Grade::Easy));
    }

    #[test]
    fn definition_front_kills_partial_credit() {
        let mut card = text_card(&["diffusion of water across a membrane"]);
        if let CardKind::Text(kind) = &mut card.kind {
            kind.front = "Define osmosis".to_string();
        }
        let settings = Settings::default();

        let near_miss = text("diffusion of water across a membrain");
        assert_eq!(grade(&card, &near_miss, &settings), Ok(Grade::Again));
    }

    #[test]
    fn mcq_single_is_all_or_nothing() {
        let card = Card::new(
            DeckId::new_v4(),
            McqSingleCard {
                front: "pick one".to_string(),
                options: vec!["a".to_string(), "b".to_string()],
                correct: 1,
            },
            now(),
        );
        let settings = Settings::default();

        assert_eq!(grade(&card, &Answer::Choice(1), &settings), Ok(Grade::Easy));
        assert_eq!(grade(&card, &Answer::Choice(0), &settings), Ok(Grade::Again));
    }

    #[test]
    fn mcq_multi_partial_credit() {
        let card = Card::new(
            DeckId::new_v4(),
            McqMultiCard {
                front: "pick many".to_string(),
                options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                correct: BTreeSet::from([0, 2]),
            },
            now(),
        );
        let settings = Settings::default();

        // one hit, one miss: 1 / (1 + 0.5) = 0.667
        assert_eq!(
            grade(&card, &Answer::Choices(vec![0]), &settings),
            Ok(Grade::Good)
        );
        assert_eq!(
            grade(&card, &Answer::Choices(vec![0, 2]), &settings),
            Ok(Grade::Easy)
        );
        assert_eq!(
            grade(&card, &Answer::Choices(vec![1]), &settings),
            Ok(Grade::Again)
        );
    }

    #[test]
    fn mcq_multi_vacuous_match() {
        let card = Card::new(
            DeckId::new_v4(),
            McqMultiCard {
                front: "pick none".to_string(),
                options: vec!["a".to_string()],
                correct: BTreeSet::new(),
            },
            now(),
        );
        let settings = Settings::default();

        assert_eq!(grade(&card, &Answer::Choices(vec![]), &settings), Ok(Grade::Easy));
    }

    #[test]
    fn cloze_blanks_average() {
        let card = Card::new(
            DeckId::new_v4(),
            ClozeCard::from_template("{{water}} boils at {{100}} degrees").unwrap(),
            now(),
        );
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("water; 100"), &settings), Ok(Grade::Easy));
        // comma works as separator when no semicolon is present
        assert_eq!(grade(&card, &text("water, 100"), &settings), Ok(Grade::Easy));
        // first blank one edit off (0.8 -> Good), second exact: avg 2.5 rounds up
        assert_eq!(grade(&card, &text("wat3r; 100"), &settings), Ok(Grade::Easy));
        // first exact, second hopeless: avg 1.5 rounds to Good
        assert_eq!(grade(&card, &text("water; zzz"), &settings), Ok(Grade::Good));
        assert_eq!(grade(&card, &text("zzzzz; zzz"), &settings), Ok(Grade::Again));
    }

    #[test]
    fn audio_grades_like_text() {
        let card = Card::new(
            DeckId::new_v4(),
            AudioCard {
                front: "clip-42".to_string(),
                back: "bonjour".to_string(),
                answers: vec!["bonjour".to_string()],
            },
            now(),
        );
        let settings = Settings::default();

        assert_eq!(grade(&card, &text("Bonjour!"), &settings), Ok(Grade::Easy));
    }

    #[test]
    fn wrong_answer_shape_is_an_error() {
        let card = text_card(&["paris"]);
        let settings = Settings::default();

        assert_eq!(
            grade(&card, &Answer::Choice(0), &settings),
            Err(CoreError::AnswerShape {
                kind: crate::card::CKind::Text
            })
        );
    }
}
