// src/progression.rs

//! Quiz progression per (student, subject):
//!
//! ```text
//! NotAttempted --submit--> Attempted(locked) --allow_retake--> Attempted(unlocked)
//!      ^                                                              |
//!      +----------------------------reset_for_retake------------------+
//! ```
//!
//! This controller is the only writer of results and of the XP balance.

use std::{collections::HashSet, future::Future, sync::Arc};

use crate::{
    error::AppError,
    ledger::AttemptLedger,
    models::result::{
        AnswerSubmission, QuizResult, ResetOutcome, ResultFilter, ResultStatus, StudentResults,
        SubmitOutcome, TeacherResults,
    },
    questions::QuestionSupplier,
    scoring::score_answers,
    utils::jwt::Claims,
};

#[derive(Clone)]
pub struct ProgressionController {
    ledger: AttemptLedger,
    supplier: Arc<dyn QuestionSupplier>,
}

impl ProgressionController {
    pub fn new(ledger: AttemptLedger, supplier: Arc<dyn QuestionSupplier>) -> Self {
        Self { ledger, supplier }
    }

    /// Supplier reads share the ledger's deadline.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.ledger.timeout(), fut).await?
    }

    /// Scores and records the student's one attempt for a subject.
    ///
    /// * `AlreadyAttempted` carries the stored result, whether it was found
    ///   up front or created by a concurrent submit.
    /// * Answers to unknown questions, or to questions of another subject,
    ///   count as wrong.
    /// * A question answered twice is rejected before anything is read.
    pub async fn submit(
        &self,
        student_id: i64,
        subject_id: i64,
        answers: &[AnswerSubmission],
    ) -> Result<SubmitOutcome, AppError> {
        let mut seen = HashSet::with_capacity(answers.len());
        if !answers.iter().all(|a| seen.insert(a.question_id)) {
            return Err(AppError::BadRequest(
                "Each question may be answered only once".to_string(),
            ));
        }

        self.bounded(self.supplier.subject(subject_id)).await?;

        if let Some(existing) = self.ledger.find(student_id, subject_id).await? {
            tracing::debug!(student_id, subject_id, "Submit rejected, quiz already attempted");
            return Err(AppError::AlreadyAttempted(Box::new(existing)));
        }

        let question_ids: Vec<i64> = answers.iter().map(|a| a.question_id).collect();
        let answer_key = self
            .bounded(self.supplier.answer_key(subject_id, &question_ids))
            .await?;
        let outcome = score_answers(answers, &answer_key)?;

        let result = self
            .ledger
            .record_attempt(student_id, subject_id, &outcome)
            .await?;

        tracing::info!(
            student_id,
            subject_id,
            score = outcome.score,
            xp = outcome.xp_earned,
            "Quiz submitted"
        );

        let message = match outcome.status {
            ResultStatus::DoingFine => "Great job! You are doing fine!",
            ResultStatus::NeedsSupport => "Keep practicing! Additional exercises are available.",
        };

        Ok(SubmitOutcome {
            remedial_eligible: result.remedial_eligible(),
            result,
            correct_count: outcome.correct_count,
            total_questions: outcome.total_count,
            score: outcome.score,
            status: outcome.status,
            xp_earned: outcome.xp_earned,
            message: message.to_string(),
        })
    }

    pub async fn get_result(&self, student_id: i64, subject_id: i64) -> Result<QuizResult, AppError> {
        self.ledger
            .find(student_id, subject_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No result found for this subject".to_string()))
    }

    /// Unlocks a retake. Teacher only; idempotent.
    pub async fn allow_retake(&self, caller: &Claims, result_id: i64) -> Result<QuizResult, AppError> {
        require_teacher(caller)?;

        let result = self.ledger.allow_retake(result_id).await?;
        tracing::info!(
            teacher_id = caller.user_id(),
            result_id,
            student_id = result.student_id,
            "Retake allowed"
        );
        Ok(result)
    }

    /// Deletes an unlocked result and reverses its XP, returning the pair
    /// to the not-attempted state.
    pub async fn reset_for_retake(&self, student_id: i64, subject_id: i64) -> Result<ResetOutcome, AppError> {
        let outcome = self.ledger.reset(student_id, subject_id).await?;
        tracing::info!(
            student_id,
            subject_id,
            xp_reversed = outcome.xp_reversed,
            "Quiz reset for retake"
        );
        Ok(outcome)
    }

    /// Whether remedial practice should be offered for a result.
    pub fn remedial_eligibility(result: &QuizResult) -> bool {
        result.remedial_eligible()
    }

    pub async fn student_results(&self, student_id: i64) -> Result<StudentResults, AppError> {
        self.ledger.list_for_student(student_id).await
    }

    pub async fn teacher_results(&self, caller: &Claims, filter: &ResultFilter) -> Result<TeacherResults, AppError> {
        require_teacher(caller)?;
        self.ledger.list_for_teacher(filter).await
    }
}

fn require_teacher(caller: &Claims) -> Result<(), AppError> {
    if caller.is_teacher() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Teacher access required".to_string()))
    }
}
