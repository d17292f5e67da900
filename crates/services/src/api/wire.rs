use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use exam_core::model::{
    AnswerPair, Paper, PaperId, Question, QuestionId, QuestionOutcome, SubmitResult,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub(super) struct PaperQuestionsResponse {
    #[serde(default)]
    paper: Option<PaperDto>,
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
struct PaperDto {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    question_text: String,
    options: BTreeMap<String, String>,
    marks: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct SubmitRequest<'a> {
    pub paper_id: &'a str,
    pub answers: &'a [AnswerPair],
}

#[derive(Debug, Deserialize)]
pub(super) struct SubmitResponse {
    total_questions: u32,
    correct: u32,
    wrong: u32,
    total_marks: f64,
    obtained_marks: f64,
    percentage: f64,
    #[serde(default)]
    results: Vec<OutcomeDto>,
}

#[derive(Debug, Deserialize)]
struct OutcomeDto {
    question_id: u64,
    #[serde(default)]
    selected_answer: Option<String>,
    correct_answer: String,
    is_correct: bool,
}

fn invalid(err: impl Into<exam_core::Error>) -> ApiError {
    ApiError::InvalidResponse(err.into().to_string())
}

impl PaperQuestionsResponse {
    /// Validate the payload into a domain `Paper` for the requested id.
    pub(super) fn into_paper(self, paper_id: PaperId) -> Result<Paper, ApiError> {
        let (title, description) = self
            .paper
            .map_or((None, None), |paper| (paper.title, paper.description));
        let title = title
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| paper_id.to_string());

        let questions = self
            .questions
            .into_iter()
            .map(|dto| {
                Question::new(
                    QuestionId::new(dto.id),
                    dto.question_text,
                    dto.options,
                    dto.marks,
                )
                .map_err(invalid)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Paper::new(paper_id, title, description, questions).map_err(invalid)
    }
}

impl SubmitResponse {
    pub(super) fn into_result(self) -> Result<SubmitResult, ApiError> {
        let outcomes = self
            .results
            .into_iter()
            .map(|dto| QuestionOutcome {
                question_id: QuestionId::new(dto.question_id),
                selected_answer: dto
                    .selected_answer
                    .filter(|value| !value.trim().is_empty()),
                correct_answer: dto.correct_answer,
                is_correct: dto.is_correct,
            })
            .collect();

        SubmitResult::new(
            self.total_questions,
            self.correct,
            self.wrong,
            self.total_marks,
            self.obtained_marks,
            self.percentage,
            outcomes,
        )
        .map_err(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper_id() -> PaperId {
        PaperId::new("neet-2020").unwrap()
    }

    #[test]
    fn parses_questions_in_backend_order() {
        let body = r#"{
            "paper": { "title": "NEET 2020", "description": null },
            "questions": [
                { "id": 7, "question_text": "Second?", "options": {"B": "b", "A": "a"}, "marks": 4 },
                { "id": 3, "question_text": "First?", "options": {"A": "a"}, "marks": 4.5 }
            ]
        }"#;
        let response: PaperQuestionsResponse = serde_json::from_str(body).unwrap();
        let paper = response.into_paper(paper_id()).unwrap();

        assert_eq!(paper.title(), "NEET 2020");
        let ids: Vec<_> = paper.questions().iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![7, 3]);
        let labels: Vec<_> = paper.questions()[0].options().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["A", "B"]);
    }

    #[test]
    fn missing_paper_block_falls_back_to_id() {
        let body = r#"{ "questions": [] }"#;
        let response: PaperQuestionsResponse = serde_json::from_str(body).unwrap();
        let paper = response.into_paper(paper_id()).unwrap();
        assert_eq!(paper.title(), "neet-2020");
        assert!(paper.is_empty());
    }

    #[test]
    fn invalid_question_is_rejected_at_the_boundary() {
        let body = r#"{ "questions": [
            { "id": 1, "question_text": "Q", "options": {}, "marks": 1 }
        ] }"#;
        let response: PaperQuestionsResponse = serde_json::from_str(body).unwrap();
        let err = response.into_paper(paper_id()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let body = r#"{ "questions": [
            { "id": 1, "question_text": "Q", "options": {"A": "a"}, "marks": 1 },
            { "id": 1, "question_text": "Q again", "options": {"A": "a"}, "marks": 1 }
        ] }"#;
        let response: PaperQuestionsResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_paper(paper_id()).is_err());
    }

    #[test]
    fn submit_request_serializes_pairs() {
        let answers = vec![AnswerPair {
            question_id: QuestionId::new(1),
            selected_answer: "A".into(),
        }];
        let body = serde_json::to_value(SubmitRequest {
            paper_id: "p1",
            answers: &answers,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "paper_id": "p1",
                "answers": [{ "question_id": 1, "selected_answer": "A" }]
            })
        );
    }

    #[test]
    fn parses_score_breakdown() {
        let body = r#"{
            "total_questions": 3, "correct": 1, "wrong": 1,
            "total_marks": 12, "obtained_marks": 3, "percentage": 25.0,
            "results": [
                { "question_id": 1, "selected_answer": "A", "correct_answer": "A", "is_correct": true },
                { "question_id": 2, "selected_answer": "", "correct_answer": "C", "is_correct": false }
            ]
        }"#;
        let response: SubmitResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result().unwrap();
        assert_eq!(result.unanswered(), 1);
        assert_eq!(result.outcomes().len(), 2);
        assert_eq!(result.outcomes()[1].selected_answer, None);
    }

    #[test]
    fn parses_negative_marking_score() {
        let body = r#"{
            "total_questions": 4, "correct": 0, "wrong": 4,
            "total_marks": 16, "obtained_marks": -4, "percentage": -25.0,
            "results": []
        }"#;
        let response: SubmitResponse = serde_json::from_str(body).unwrap();
        let result = response.into_result().unwrap();
        assert!((result.obtained_marks() + 4.0).abs() < f64::EPSILON);
        assert!((result.percentage() + 25.0).abs() < f64::EPSILON);
        assert_eq!(result.unanswered(), 0);
    }

    #[test]
    fn inconsistent_score_is_invalid() {
        let body = r#"{
            "total_questions": 1, "correct": 1, "wrong": 1,
            "total_marks": 4, "obtained_marks": 4, "percentage": 100.0
        }"#;
        let response: SubmitResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(
            response.into_result().unwrap_err(),
            ApiError::InvalidResponse(_)
        ));
    }
}
