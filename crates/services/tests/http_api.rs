use exam_core::model::{AnswerPair, PaperId, QuestionId, SubmissionDraft};
use serde_json::Value;
use services::{ApiConfig, ApiError, ExamApi, HttpExamApi};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Captured request: head (request line + headers) and body.
struct Captured {
    head: String,
    body: String,
}

/// Accept one connection, answer with `status` and `body`, return what was sent.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        let head_end = loop {
            let read = stream.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .map_or(0, |(_, value)| value.trim().parse::<usize>().unwrap());
        while buf.len() < head_end + content_length {
            let read = stream.read(&mut chunk).await.unwrap();
            assert!(read > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..read]);
        }
        let request_body = String::from_utf8_lossy(&buf[head_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        Captured {
            head,
            body: request_body,
        }
    });

    (base, handle)
}

fn api(base: String) -> HttpExamApi {
    HttpExamApi::new(ApiConfig::new(base).with_auth_token(Some("secret-jwt".into())))
}

#[tokio::test]
async fn fetch_paper_sends_bearer_token_and_parses_questions() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{
            "paper": { "title": "Physics Mock" },
            "questions": [
                { "id": 11, "question_text": "Unit of force?", "options": {"A": "Newton", "B": "Joule"}, "marks": 4 },
                { "id": 12, "question_text": "Unit of work?", "options": {"A": "Newton", "B": "Joule"}, "marks": 4 }
            ]
        }"#,
    )
    .await;

    let paper = api(base)
        .fetch_paper(&PaperId::new("phy-1").unwrap())
        .await
        .unwrap();
    assert_eq!(paper.title(), "Physics Mock");
    assert_eq!(paper.questions().len(), 2);
    assert_eq!(paper.questions()[0].id(), QuestionId::new(11));

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("GET /api/papers/phy-1/questions HTTP/1.1"));
    assert!(
        captured
            .head
            .to_ascii_lowercase()
            .contains("authorization: bearer secret-jwt")
    );
}

#[tokio::test]
async fn submit_posts_answer_pairs_and_parses_result() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{
            "total_questions": 2,
            "correct": 1,
            "wrong": 0,
            "total_marks": 8,
            "obtained_marks": 4,
            "percentage": 50.0,
            "results": [
                { "question_id": 11, "selected_answer": "A", "correct_answer": "A", "is_correct": true },
                { "question_id": 12, "selected_answer": null, "correct_answer": "B", "is_correct": false }
            ]
        }"#,
    )
    .await;

    let draft = SubmissionDraft {
        paper_id: PaperId::new("phy-1").unwrap(),
        answers: vec![AnswerPair {
            question_id: QuestionId::new(11),
            selected_answer: "A".into(),
        }],
    };
    let result = api(base).submit_answers(&draft).await.unwrap();
    assert_eq!(result.correct(), 1);
    assert_eq!(result.unanswered(), 1);
    assert_eq!(result.outcomes()[1].selected_answer, None);

    let captured = server.await.unwrap();
    assert!(captured.head.starts_with("POST /api/papers/phy-1/submit HTTP/1.1"));
    let body: Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["paper_id"], "phy-1");
    assert_eq!(body["answers"][0]["question_id"], 11);
    assert_eq!(body["answers"][0]["selected_answer"], "A");
    assert_eq!(body["answers"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn status_codes_map_to_api_errors() {
    let id = PaperId::new("p").unwrap();

    let (base, server) = serve_once("401 Unauthorized", "{}").await;
    let err = api(base).fetch_paper(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    server.await.unwrap();

    let (base, server) = serve_once("404 Not Found", "{}").await;
    let err = api(base).fetch_paper(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    server.await.unwrap();

    let (base, server) = serve_once("500 Internal Server Error", "{}").await;
    let err = api(base).fetch_paper(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(status) if status.as_u16() == 500));
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_body_is_an_invalid_response() {
    let (base, server) = serve_once("200 OK", r#"{"questions": "nope"}"#).await;
    let err = api(base)
        .fetch_paper(&PaperId::new("p").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
    server.await.unwrap();
}
