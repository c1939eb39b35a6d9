use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::services::catalog_cache::CATALOG_CACHE_KEY;
use crate::test_support::{self, TestContext};

async fn send(
    ctx: &TestContext,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(method, uri, token, body))
        .await
        .expect("request");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

fn assessment_payload(title: &str, phase: i32, next_phase_id: Option<&str>) -> Value {
    json!({
        "title": title,
        "description": "Screening round",
        "duration": 30,
        "phase": phase,
        "passing_score": 6,
        "total_marks": 10,
        "next_phase_id": next_phase_id,
        "questions": [
            {
                "id": "q1",
                "text": "Which keyword declares an immutable binding?",
                "type": "MCQ",
                "options": ["let", "mut", "static", "const", "ref"],
                "correct_answer": "let",
                "points": 4
            },
            {
                "id": "q2",
                "text": "Which trait enables `?` on a custom error?",
                "type": "MCQ",
                "options": ["From", "Into", "Display"],
                "correct_answer": "From",
                "points": 6
            },
            {
                "id": "q3",
                "text": "Describe ownership in one paragraph.",
                "type": "SUBJECTIVE",
                "points": 0
            }
        ]
    })
}

async fn create(ctx: &TestContext, token: &str, payload: Value) -> String {
    let (status, body) =
        send(ctx, Method::POST, "/api/v1/assessments", Some(token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    body["id"].as_str().expect("assessment id").to_string()
}

fn passing_answers() -> Value {
    json!({"answers": [
        {"question_id": "q1", "value": "let"},
        {"question_id": "q2", "value": "From"}
    ]})
}

#[tokio::test]
async fn interviewer_creates_and_lists_assessment() {
    let ctx = test_support::setup_test_context().await;
    let author = test_support::insert_user(
        ctx.state.db(),
        "author@example.com",
        "Ada Author",
        UserRole::Interviewer,
    )
    .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());

    let id = create(&ctx, &token, assessment_payload("Rust basics", 1, None)).await;

    let (status, list) = send(&ctx, Method::GET, "/api/v1/assessments", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {list}");
    assert_eq!(list["page"], 1);
    assert_eq!(list["limit"], 50);
    let items = list["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], id);
    assert_eq!(items[0]["questions"][0]["correct_answer"], "let");

    let (status, mine) = send(&ctx, Method::GET, "/api/v1/assessments/my", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {mine}");
    assert_eq!(mine.as_array().expect("mine").len(), 1);
}

#[tokio::test]
async fn candidate_cannot_create_assessment() {
    let ctx = test_support::setup_test_context().await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "cand@example.com", "Cara", UserRole::Candidate)
            .await;
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());

    let (status, body) = send(
        &ctx,
        Method::POST,
        "/api/v1/assessments",
        Some(&token),
        Some(assessment_payload("Nope", 1, None)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {body}");
    assert_eq!(body["detail"], "Only interviewers can create assessments");
}

#[tokio::test]
async fn create_rejects_invalid_payload_and_unknown_next_phase() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());

    let mut payload = assessment_payload("", 1, None);
    payload["questions"][0]["options"] = json!([]);
    let (status, body) =
        send(&ctx, Method::POST, "/api/v1/assessments", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");

    let missing = uuid::Uuid::new_v4().to_string();
    let (status, body) = send(
        &ctx,
        Method::POST,
        "/api/v1/assessments",
        Some(&token),
        Some(assessment_payload("Dangling", 1, Some(&missing))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
}

#[tokio::test]
async fn list_cache_is_invalidated_on_create() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());

    create(&ctx, &token, assessment_payload("First", 1, None)).await;
    let (_, list) = send(&ctx, Method::GET, "/api/v1/assessments", Some(&token), None).await;
    assert_eq!(list["items"].as_array().expect("items").len(), 1);
    assert!(ctx.state.redis().get(CATALOG_CACHE_KEY).await.expect("redis get").is_some());

    create(&ctx, &token, assessment_payload("Second", 1, None)).await;
    assert!(ctx.state.redis().get(CATALOG_CACHE_KEY).await.expect("redis get").is_none());

    let (_, list) = send(&ctx, Method::GET, "/api/v1/assessments", Some(&token), None).await;
    assert_eq!(list["items"].as_array().expect("items").len(), 2);
}

#[tokio::test]
async fn candidate_listing_never_exposes_answer_key() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let candidate_token = test_support::bearer_token(&candidate.id, ctx.state.settings());

    create(&ctx, &author_token, assessment_payload("Keyed", 1, None)).await;
    // Warm the cache with the authoring projection first.
    send(&ctx, Method::GET, "/api/v1/assessments", Some(&author_token), None).await;

    let (status, list) =
        send(&ctx, Method::GET, "/api/v1/assessments", Some(&candidate_token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {list}");
    for question in list["items"][0]["questions"].as_array().expect("questions") {
        assert!(question.get("correct_answer").is_none(), "leaked key: {question}");
    }
}

#[tokio::test]
async fn candidate_view_is_shuffled_once_and_stable() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let id = create(&ctx, &author_token, assessment_payload("Shuffle", 1, None)).await;
    let uri = format!("/api/v1/assessments/{id}");

    let (status, first) = send(&ctx, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {first}");
    let (_, second) = send(&ctx, Method::GET, &uri, Some(&token), None).await;

    let first_options = &first["assessment"]["questions"][0]["options"];
    assert_eq!(first_options, &second["assessment"]["questions"][0]["options"]);

    let mut sorted: Vec<String> =
        serde_json::from_value(first_options.clone()).expect("options");
    sorted.sort();
    assert_eq!(sorted, vec!["const", "let", "mut", "ref", "static"]);

    for question in first["assessment"]["questions"].as_array().expect("questions") {
        assert!(question.get("correct_answer").is_none());
    }
    assert_eq!(first["saved_answers"], json!({}));

    let (_, author_view) = send(&ctx, Method::GET, &uri, Some(&author_token), None).await;
    assert_eq!(
        author_view["assessment"]["questions"][0]["options"],
        json!(["let", "mut", "static", "const", "ref"])
    );
    assert_eq!(author_view["assessment"]["questions"][0]["correct_answer"], "let");
}

#[tokio::test]
async fn edited_options_replace_the_stored_order() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let id = create(&ctx, &author_token, assessment_payload("Edited", 1, None)).await;
    let uri = format!("/api/v1/assessments/{id}");

    let (_, before) = send(&ctx, Method::GET, &uri, Some(&token), None).await;
    let untouched = before["assessment"]["questions"][1]["options"].clone();

    let mut edited = assessment_payload("Edited", 1, None);
    edited["questions"][0]["options"] = json!(["let", "var", "const"]);
    let (status, body) = send(&ctx, Method::PUT, &uri, Some(&author_token), Some(edited)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let (status, after) = send(&ctx, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {after}");
    let mut options: Vec<String> =
        serde_json::from_value(after["assessment"]["questions"][0]["options"].clone())
            .expect("options");
    options.sort();
    assert_eq!(options, vec!["const", "let", "var"]);
    assert_eq!(after["assessment"]["questions"][1]["options"], untouched);

    let (_, again) = send(&ctx, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(
        again["assessment"]["questions"][0]["options"],
        after["assessment"]["questions"][0]["options"]
    );
}

#[tokio::test]
async fn progress_saves_upsert_a_single_attempt() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let id = create(&ctx, &author_token, assessment_payload("Progress", 1, None)).await;

    let (_, view) =
        send(&ctx, Method::GET, &format!("/api/v1/assessments/{id}"), Some(&token), None).await;
    let shown_order = view["assessment"]["questions"][0]["options"].clone();

    let uri = format!("/api/v1/assessments/{id}/progress");
    for value in ["mut", "let"] {
        let (status, body) = send(
            &ctx,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({"answers": [{"question_id": "q1", "value": value}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        assert_eq!(body["message"], "Progress saved");
    }

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM submissions \
         WHERE assessment_id = $1 AND candidate_id = $2 AND status = 'in_progress'",
    )
    .bind(&id)
    .bind(&candidate.id)
    .fetch_one(ctx.state.db())
    .await
    .expect("count");
    assert_eq!(rows, 1);

    let (_, view) =
        send(&ctx, Method::GET, &format!("/api/v1/assessments/{id}"), Some(&token), None).await;
    assert_eq!(view["saved_answers"]["q1"], "let");
    assert_eq!(view["assessment"]["questions"][0]["options"], shown_order);
}

async fn submitted_row(
    ctx: &TestContext,
    assessment_id: &str,
    candidate_id: &str,
) -> (Value, i32, time::PrimitiveDateTime) {
    sqlx::query_as(
        "SELECT answers, score, updated_at FROM submissions \
         WHERE assessment_id = $1 AND candidate_id = $2 AND status = 'submitted'",
    )
    .bind(assessment_id)
    .bind(candidate_id)
    .fetch_one(ctx.state.db())
    .await
    .expect("submitted row")
}

#[tokio::test]
async fn progress_after_submit_leaves_submitted_row_alone() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let id = create(&ctx, &author_token, assessment_payload("Retake", 1, None)).await;

    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/assessments/{id}/submit"),
        Some(&token),
        Some(passing_answers()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let before = submitted_row(&ctx, &id, &candidate.id).await;

    let uri = format!("/api/v1/assessments/{id}/progress");
    for value in ["mut", "static"] {
        let (status, body) = send(
            &ctx,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({"answers": [{"question_id": "q1", "value": value}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
    }

    let after = submitted_row(&ctx, &id, &candidate.id).await;
    assert_eq!(after, before);
    assert_eq!(after.1, 10);

    let in_progress: Vec<Value> = sqlx::query_scalar(
        "SELECT answers FROM submissions \
         WHERE assessment_id = $1 AND candidate_id = $2 AND status = 'in_progress'",
    )
    .bind(&id)
    .bind(&candidate.id)
    .fetch_all(ctx.state.db())
    .await
    .expect("in-progress rows");
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0][0]["value"], "static");
}

#[tokio::test]
async fn repeated_answers_are_rejected() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let id = create(&ctx, &author_token, assessment_payload("Doubled", 1, None)).await;

    let doubled = json!({"answers": [
        {"question_id": "q2", "value": "From"},
        {"question_id": "q2", "value": "From"}
    ]});
    for action in ["submit", "progress"] {
        let (status, body) = send(
            &ctx,
            Method::POST,
            &format!("/api/v1/assessments/{id}/{action}"),
            Some(&token),
            Some(doubled.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
        assert_eq!(body["detail"], "question q2 is answered more than once");
    }

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE assessment_id = $1")
        .bind(&id)
        .fetch_one(ctx.state.db())
        .await
        .expect("count");
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn submit_grades_and_reports_result() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let next = create(&ctx, &author_token, assessment_payload("Phase 2", 2, None)).await;
    let id = create(&ctx, &author_token, assessment_payload("Phase 1", 1, Some(&next))).await;

    let (status, missing) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/assessments/{id}/result"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {missing}");

    let (status, graded) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/assessments/{id}/submit"),
        Some(&token),
        Some(json!({"answers": [
            {"question_id": "q1", "value": "let"},
            {"question_id": "q2", "value": "Display"},
            {"question_id": "q3", "value": "Values have one owner."}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {graded}");
    assert_eq!(graded["score"], 4);
    assert_eq!(graded["total_marks"], 10);
    assert_eq!(graded["passed"], false);
    assert_eq!(graded["next_phase_unlocked"], false);
    assert!(graded.get("next_phase_id").is_none());

    let (status, graded) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/assessments/{id}/submit"),
        Some(&token),
        Some(passing_answers()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {graded}");
    assert_eq!(graded["score"], 10);
    assert_eq!(graded["passed"], true);
    assert_eq!(graded["next_phase_unlocked"], true);
    assert_eq!(graded["next_phase_id"], next);

    let (status, result) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/assessments/{id}/result"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {result}");
    assert_eq!(result["id"], graded["submission_id"]);
    assert_eq!(result["status"], "submitted");
    assert_eq!(result["score"], 10);
    assert_eq!(result["total_marks"], 10);
    assert_eq!(result["next_phase_id"], next);
    assert_eq!(result["answers"][0]["is_correct"], true);
}

#[tokio::test]
async fn later_phase_is_gated_until_predecessor_passed() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let second = create(&ctx, &author_token, assessment_payload("Phase 2", 2, None)).await;
    let first = create(&ctx, &author_token, assessment_payload("Phase 1", 1, Some(&second))).await;

    let second_uri = format!("/api/v1/assessments/{second}");
    let (status, denied) = send(&ctx, Method::GET, &second_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "response: {denied}");
    assert_eq!(denied["detail"], "You must pass the previous phase to access this assessment");

    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("{second_uri}/submit"),
        Some(&token),
        Some(passing_answers()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/assessments/{first}/submit"),
        Some(&token),
        Some(passing_answers()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, view) = send(&ctx, Method::GET, &second_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK, "response: {view}");
    assert_eq!(view["assessment"]["id"], second);
}

#[tokio::test]
async fn later_phase_without_predecessor_is_open() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let candidate =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
    let orphan = create(&ctx, &author_token, assessment_payload("Orphan", 3, None)).await;

    let (status, body) =
        send(&ctx, Method::GET, &format!("/api/v1/assessments/{orphan}"), Some(&token), None)
            .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
}

#[tokio::test]
async fn update_rejects_cycles_and_non_owners() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let other =
        test_support::insert_user(ctx.state.db(), "o@example.com", "Otto", UserRole::Interviewer)
            .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());

    let last = create(&ctx, &token, assessment_payload("C", 3, None)).await;
    let middle = create(&ctx, &token, assessment_payload("B", 2, Some(&last))).await;
    let first = create(&ctx, &token, assessment_payload("A", 1, Some(&middle))).await;

    let (status, body) = send(
        &ctx,
        Method::PUT,
        &format!("/api/v1/assessments/{last}"),
        Some(&token),
        Some(assessment_payload("C", 3, Some(&first))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "phase chain would form a cycle");

    let (status, body) = send(
        &ctx,
        Method::PUT,
        &format!("/api/v1/assessments/{last}"),
        Some(&token),
        Some(assessment_payload("C", 3, Some(&last))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");

    let (status, body) = send(
        &ctx,
        Method::PUT,
        &format!("/api/v1/assessments/{first}"),
        Some(&other_token),
        Some(assessment_payload("Hijack", 1, None)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "response: {body}");
    assert_eq!(body["detail"], "Assessment not found or permission denied");

    let (status, updated) = send(
        &ctx,
        Method::PUT,
        &format!("/api/v1/assessments/{first}"),
        Some(&token),
        Some(assessment_payload("A renamed", 1, Some(&middle))),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {updated}");
    assert_eq!(updated["title"], "A renamed");
    assert_eq!(updated["next_phase_id"], middle);
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());

    let (status, body) =
        send(&ctx, Method::GET, "/api/v1/assessments/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");
    assert_eq!(body["detail"], "Invalid ID");

    let missing = uuid::Uuid::new_v4();
    let (status, _) =
        send(&ctx, Method::GET, &format!("/api/v1/assessments/{missing}"), Some(&token), None)
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cascade_delete_removes_whole_chain() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let other =
        test_support::insert_user(ctx.state.db(), "o@example.com", "Otto", UserRole::Interviewer)
            .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());
    let other_token = test_support::bearer_token(&other.id, ctx.state.settings());

    let last = create(&ctx, &token, assessment_payload("C", 3, None)).await;
    let middle = create(&ctx, &token, assessment_payload("B", 2, Some(&last))).await;
    let first = create(&ctx, &token, assessment_payload("A", 1, Some(&middle))).await;
    let unrelated = create(&ctx, &token, assessment_payload("Z", 1, None)).await;

    let (status, _) = send(
        &ctx,
        Method::DELETE,
        &format!("/api/v1/assessments/{first}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        send(&ctx, Method::DELETE, &format!("/api/v1/assessments/{first}"), Some(&token), None)
            .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["deleted_count"], 3);

    let (_, mine) = send(&ctx, Method::GET, "/api/v1/assessments/my", Some(&token), None).await;
    let ids: Vec<&str> =
        mine.as_array().expect("mine").iter().filter_map(|item| item["id"].as_str()).collect();
    assert_eq!(ids, vec![unrelated.as_str()]);
}

#[tokio::test]
async fn single_delete_leaves_rest_of_chain() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let token = test_support::bearer_token(&author.id, ctx.state.settings());

    let last = create(&ctx, &token, assessment_payload("C", 3, None)).await;
    let middle = create(&ctx, &token, assessment_payload("B", 2, Some(&last))).await;
    let first = create(&ctx, &token, assessment_payload("A", 1, Some(&middle))).await;

    let (status, body) = send(
        &ctx,
        Method::DELETE,
        &format!("/api/v1/assessments/{middle}?cascade=false"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["deleted_count"], 1);

    let (_, mine) = send(&ctx, Method::GET, "/api/v1/assessments/my", Some(&token), None).await;
    let mut ids: Vec<String> = mine
        .as_array()
        .expect("mine")
        .iter()
        .filter_map(|item| item["id"].as_str().map(str::to_string))
        .collect();
    ids.sort();
    let mut expected = vec![first, last];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn owner_lists_submissions_with_candidate_details() {
    let ctx = test_support::setup_test_context().await;
    let author =
        test_support::insert_user(ctx.state.db(), "a@example.com", "Ada", UserRole::Interviewer)
            .await;
    let stays =
        test_support::insert_user(ctx.state.db(), "c@example.com", "Cara", UserRole::Candidate)
            .await;
    let leaves =
        test_support::insert_user(ctx.state.db(), "l@example.com", "Lee", UserRole::Candidate)
            .await;
    let author_token = test_support::bearer_token(&author.id, ctx.state.settings());
    let id = create(&ctx, &author_token, assessment_payload("Listed", 1, None)).await;

    for candidate in [&stays, &leaves] {
        let token = test_support::bearer_token(&candidate.id, ctx.state.settings());
        let (status, _) = send(
            &ctx,
            Method::POST,
            &format!("/api/v1/assessments/{id}/submit"),
            Some(&token),
            Some(passing_answers()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    crate::repositories::users::delete_by_id(ctx.state.db(), &leaves.id)
        .await
        .expect("delete user");

    let (status, rows) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/assessments/{id}/submissions"),
        Some(&author_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {rows}");
    let rows = rows.as_array().expect("rows");
    assert_eq!(rows.len(), 2);

    let known = rows.iter().find(|row| row["candidate_id"] == stays.id).expect("known");
    assert_eq!(known["candidate_name"], "Cara");
    assert_eq!(known["candidate_email"], "c@example.com");

    let gone = rows.iter().find(|row| row["candidate_id"] == leaves.id).expect("gone");
    assert_eq!(gone["candidate_name"], "Deleted User");
    assert_eq!(gone["candidate_email"], "Unknown");

    let stays_token = test_support::bearer_token(&stays.id, ctx.state.settings());
    let (status, _) = send(
        &ctx,
        Method::GET,
        &format!("/api/v1/assessments/{id}/submissions"),
        Some(&stays_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
