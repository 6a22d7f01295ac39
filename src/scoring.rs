// src/scoring.rs

//! Pure scoring: answers + answer key in, score / status / XP out.

use std::collections::HashMap;

use crate::{
    config::{
        EXCELLENT_BONUS_XP, EXCELLENT_SCORE, GOOD_BONUS_XP, GOOD_SCORE, SUPPORT_THRESHOLD_PERCENT,
        XP_PER_CORRECT,
    },
    error::AppError,
    models::result::{AnswerSubmission, ResultStatus},
};

/// The scored outcome of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub correct_count: i64,
    pub total_count: i64,
    pub score: i64,
    pub status: ResultStatus,
    pub xp_earned: i64,
}

/// Scores a submission against its answer key.
///
/// Every answer counts toward the total, including answers whose question is
/// missing from the key (those count as wrong). An empty submission is
/// rejected since its percentage is undefined.
pub fn score_answers(
    answers: &[AnswerSubmission],
    answer_key: &HashMap<i64, i64>,
) -> Result<ScoreOutcome, AppError> {
    if answers.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }

    let correct_count = answers
        .iter()
        .filter(|a| answer_key.get(&a.question_id) == Some(&a.selected_answer))
        .count() as i64;
    let total_count = answers.len() as i64;

    let score = percentage(correct_count, total_count);
    let status = classify(score);
    let xp_earned = correct_count * XP_PER_CORRECT + bonus_xp(score);

    Ok(ScoreOutcome {
        correct_count,
        total_count,
        score,
        status,
        xp_earned,
    })
}

/// round(correct / total * 100), halves rounded up.
fn percentage(correct: i64, total: i64) -> i64 {
    // Integer form of floor(x + 0.5), exact for all inputs.
    (200 * correct + total) / (2 * total)
}

pub fn classify(score: i64) -> ResultStatus {
    if score >= SUPPORT_THRESHOLD_PERCENT {
        ResultStatus::DoingFine
    } else {
        ResultStatus::NeedsSupport
    }
}

pub fn bonus_xp(score: i64) -> i64 {
    if score >= EXCELLENT_SCORE {
        EXCELLENT_BONUS_XP
    } else if score >= GOOD_SCORE {
        GOOD_BONUS_XP
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds `total` answers to questions 1..=total, the first `correct` of
    /// them right. Every question's key is option 0.
    fn quiz(total: i64, correct: i64) -> (Vec<AnswerSubmission>, HashMap<i64, i64>) {
        let key = (1..=total).map(|id| (id, 0)).collect();
        let answers = (1..=total)
            .map(|id| AnswerSubmission {
                question_id: id,
                selected_answer: if id <= correct { 0 } else { 1 },
            })
            .collect();
        (answers, key)
    }

    #[test]
    fn test_four_of_ten_is_doing_fine_without_bonus() {
        let (answers, key) = quiz(10, 4);
        let out = score_answers(&answers, &key).unwrap();
        assert_eq!(out.score, 40);
        assert_eq!(out.status, ResultStatus::DoingFine);
        assert_eq!(out.xp_earned, 40);
    }

    #[test]
    fn test_nine_of_ten_earns_excellent_bonus() {
        let (answers, key) = quiz(10, 9);
        let out = score_answers(&answers, &key).unwrap();
        assert_eq!(out.score, 90);
        assert_eq!(out.status, ResultStatus::DoingFine);
        assert_eq!(out.xp_earned, 140);
    }

    #[test]
    fn test_six_of_ten_earns_good_bonus() {
        let (answers, key) = quiz(10, 6);
        let out = score_answers(&answers, &key).unwrap();
        assert_eq!(out.score, 60);
        assert_eq!(out.xp_earned, 85);
    }

    #[test]
    fn test_three_of_ten_needs_support() {
        let (answers, key) = quiz(10, 3);
        let out = score_answers(&answers, &key).unwrap();
        assert_eq!(out.score, 30);
        assert_eq!(out.status, ResultStatus::NeedsSupport);
        assert_eq!(out.xp_earned, 30);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(classify(40), ResultStatus::DoingFine);
        assert_eq!(classify(39), ResultStatus::NeedsSupport);
    }

    #[test]
    fn test_bonus_tiers_are_exclusive() {
        assert_eq!(bonus_xp(100), 50);
        assert_eq!(bonus_xp(80), 50);
        assert_eq!(bonus_xp(79), 25);
        assert_eq!(bonus_xp(60), 25);
        assert_eq!(bonus_xp(59), 0);
        assert_eq!(bonus_xp(0), 0);
    }

    #[test]
    fn test_rounding_matches_standard_rounding() {
        // 1/3 -> 33, 2/3 -> 67, 1/8 -> 12.5 -> 13
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 7), 0);
        assert_eq!(percentage(7, 7), 100);
    }

    #[test]
    fn test_score_stays_in_range_for_all_small_quizzes() {
        for total in 1..=40 {
            for correct in 0..=total {
                let (answers, key) = quiz(total, correct);
                let out = score_answers(&answers, &key).unwrap();
                let expected = ((correct * 100) as f64 / total as f64).round() as i64;
                assert!((0..=100).contains(&out.score));
                assert_eq!(out.score, expected, "{correct}/{total}");
            }
        }
    }

    #[test]
    fn test_missing_question_counts_as_wrong() {
        let key: HashMap<i64, i64> = [(1, 2)].into_iter().collect();
        let answers = vec![
            AnswerSubmission { question_id: 1, selected_answer: 2 },
            AnswerSubmission { question_id: 999, selected_answer: 0 },
        ];
        let out = score_answers(&answers, &key).unwrap();
        assert_eq!(out.correct_count, 1);
        assert_eq!(out.total_count, 2);
        assert_eq!(out.score, 50);
    }

    #[test]
    fn test_empty_submission_rejected() {
        let err = score_answers(&[], &HashMap::new()).unwrap_err();
        assert_eq!(err.kind(), "bad_request");
    }
}
