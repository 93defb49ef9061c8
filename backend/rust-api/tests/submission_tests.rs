mod common;

use astroquiz_api::store::{MemoryStore, Store};
use axum::{http::StatusCode, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use common::{create_bare_app, create_test_app, json_request, send};

async fn register_user(app: &Router) -> Uuid {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/users",
            json!({
                "username": format!("pilot-{}", Uuid::new_v4()),
                "email": format!("{}@example.com", Uuid::new_v4()),
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Creates a LIVE quiz with one question (two options, first one valid) and
/// returns (quiz_id, question_id, valid_option_id, invalid_option_id).
async fn create_live_quiz(
    app: &Router,
    store: &Arc<MemoryStore>,
    owner: Uuid,
    points: i32,
) -> (Uuid, Uuid, Uuid, Uuid) {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/quizzes",
            json!({
                "created_by": owner,
                "title": "Orbital mechanics",
                "difficulty_id": Uuid::new_v4(),
                "start_date_time": Utc::now() + Duration::hours(1),
                "duration_minutes": 30,
                "mode": "PUBLIC",
                "questions": [{
                    "text": "What is a Hohmann transfer?",
                    "points": points,
                    "options": [
                        { "text": "An orbit change maneuver", "valid": true },
                        { "text": "A docking procedure", "valid": false },
                    ],
                }],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "quiz creation failed: {body}");
    let quiz_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = send(
        app,
        json_request(
            "PUT",
            &format!("/api/v1/quizzes/{quiz_id}/status"),
            json!({ "status": "LIVE" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let questions = store.find_questions_by_quiz(quiz_id).await.unwrap();
    assert_eq!(questions.len(), 1);
    let question_id = questions[0].id;
    let options = store.find_options_by_question(question_id).await.unwrap();
    let valid = options.iter().find(|o| o.valid).unwrap().id;
    let invalid = options.iter().find(|o| !o.valid).unwrap().id;
    (quiz_id, question_id, valid, invalid)
}

fn submission_body(user_id: Uuid, answers: &[(Uuid, Uuid)]) -> Value {
    json!({
        "user_id": user_id,
        "answers": answers
            .iter()
            .map(|(q, o)| json!({ "question_id": q, "option_id": o }))
            .collect::<Vec<_>>(),
    })
}

#[tokio::test]
async fn correct_answer_scores_and_promotes() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (quiz_id, question_id, valid_option, _) =
        create_live_quiz(&app, &store, user_id, 150).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, valid_option)]),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 150);
    assert_eq!(body["quiz_id"].as_str().unwrap(), quiz_id.to_string());
    assert_eq!(body["user_id"].as_str().unwrap(), user_id.to_string());

    let user = store.find_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.points, 150);

    // default ladder: 150 points lands in the Pilot band (min 100)
    let pilot = store.find_top_rank_by_min_points(150).await.unwrap().unwrap();
    assert_eq!(pilot.title, "Pilot");
    assert_eq!(user.rank_id, Some(pilot.id));
}

#[tokio::test]
async fn duplicate_submission_is_rejected() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (_, question_id, valid_option, invalid_option) =
        create_live_quiz(&app, &store, user_id, 10).await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, valid_option)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // second attempt, even with a different option, must fail
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, invalid_option)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("already submitted answer for question"));

    // the first submission's score is untouched
    let submissions = store.find_submissions_by_user(user_id).await.unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].score, 10);
    let user = store.find_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.points, 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_submissions_admit_exactly_one() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (_, question_id, valid_option, invalid_option) =
        create_live_quiz(&app, &store, user_id, 10).await;

    // two racing batches for the same (user, question); the per-user lock
    // serializes them and the loser must see the duplicate rejection
    let first = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, valid_option)]),
        ),
    );
    let second = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, invalid_option)]),
        ),
    );
    let ((status_a, _), (status_b, _)) = tokio::join!(first, second);

    let mut statuses = [status_a, status_b];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    // exactly one row persisted, points counted once
    let submissions = store.find_submissions_by_user(user_id).await.unwrap();
    assert_eq!(submissions.len(), 1);
    let user = store.find_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.points, submissions[0].score);
}

#[tokio::test]
async fn batch_with_repeated_question_is_rejected() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (_, question_id, valid_option, invalid_option) =
        create_live_quiz(&app, &store, user_id, 10).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(
                user_id,
                &[(question_id, valid_option), (question_id, invalid_option)],
            ),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("already submitted answer for question"));
    assert!(store
        .find_submissions_by_user(user_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn submission_to_non_live_quiz_is_rejected() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;

    // quiz stays in CREATED; no status override
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/quizzes",
            json!({
                "created_by": user_id,
                "title": "Not yet live",
                "difficulty_id": Uuid::new_v4(),
                "start_date_time": Utc::now() + Duration::hours(1),
                "duration_minutes": 30,
                "mode": "PRIVATE",
                "questions": [{
                    "text": "q",
                    "points": 5,
                    "options": [{ "text": "a", "valid": true }],
                }],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let quiz_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    let question = store.find_questions_by_quiz(quiz_id).await.unwrap()[0].clone();
    let option = store.find_options_by_question(question.id).await.unwrap()[0].clone();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question.id, option.id)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not Live"));
    assert!(store
        .find_submissions_by_user(user_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn cross_quiz_batch_is_rejected() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (_, question_a, option_a, _) = create_live_quiz(&app, &store, user_id, 10).await;
    let (_, question_b, option_b, _) = create_live_quiz(&app, &store, user_id, 10).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_a, option_a), (question_b, option_b)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("same quiz"));
    assert!(store
        .find_submissions_by_user(user_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn invalid_option_scores_zero() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (_, question_id, _, invalid_option) = create_live_quiz(&app, &store, user_id, 10).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, invalid_option)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 0);

    let submissions = store.find_submissions_by_user(user_id).await.unwrap();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].score, 0);
    let user = store.find_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.points, 0);
}

#[tokio::test]
async fn option_from_another_question_is_not_found() {
    let (app, store) = create_test_app().await;
    let user_id = register_user(&app).await;
    let (_, question_a, _, _) = create_live_quiz(&app, &store, user_id, 10).await;
    let (_, _, option_b, _) = create_live_quiz(&app, &store, user_id, 10).await;

    // option_b belongs to the other quiz's question
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_a, option_b)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("does not belong"));
    assert!(store
        .find_submissions_by_user(user_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn unknown_question_is_not_found() {
    let (app, _) = create_test_app().await;
    let user_id = register_user(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(Uuid::new_v4(), Uuid::new_v4())]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Question not found"));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let (app, store) = create_test_app().await;
    let owner = register_user(&app).await;
    let (_, question_id, valid_option, _) = create_live_quiz(&app, &store, owner, 10).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(Uuid::new_v4(), &[(question_id, valid_option)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("User not found"));
}

#[tokio::test]
async fn promotion_picks_highest_qualifying_band() {
    let (app, store) = create_bare_app().await;

    // R1 [0, 100), R2 [10, 200): a 10-point batch must land the user in R2
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/ranks",
            json!({ "title": "R1", "min_points": 0, "max_points": 100 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, r2) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/ranks",
            json!({ "title": "R2", "min_points": 10, "max_points": 200 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let r2_id: Uuid = r2["id"].as_str().unwrap().parse().unwrap();

    let user_id = register_user(&app).await;
    let registered = store.find_user(user_id).await.unwrap().unwrap();
    assert_ne!(registered.rank_id, Some(r2_id), "fresh user starts in R1");

    let (_, question_id, valid_option, _) = create_live_quiz(&app, &store, user_id, 10).await;
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/submissions",
            submission_body(user_id, &[(question_id, valid_option)]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let user = store.find_user(user_id).await.unwrap().unwrap();
    assert_eq!(user.points, 10);
    assert_eq!(user.rank_id, Some(r2_id));
}

#[tokio::test]
async fn registration_fails_without_ranks() {
    let (app, _) = create_bare_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users",
            json!({ "username": "lost", "email": "lost@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // internal detail is not leaked, only a generic message plus timestamp
    assert_eq!(body["error"], "Internal server error");
    assert!(body["timestamp"].is_string());
}
