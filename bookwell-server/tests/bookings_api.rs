use axum::http::StatusCode;
use axum_test::TestServer;
use bookwell_core::application::ListingPolicy;
use bookwell_core::domain::{Channel, JobId};
use bookwell_core::ports::JobRepository;
use bookwell_server::infra::app_state::RuntimeSettings;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{
    ADMIN_TOKEN, CUSTOMER_ID, CUSTOMER_TOKEN, RecordingTransport, SUPERADMIN_TOKEN,
    TRANSLATOR_ID, TRANSLATOR_TOKEN, bearer, build_test_app, build_test_app_with,
};

async fn create_job(server: &TestServer, payload: Value) -> i64 {
    let response = server
        .post("/api/v1/jobs")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&payload)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "new.booking.saved");
    body["booking"]["id"].as_i64().expect("created job id")
}

async fn seed_jobs(server: &TestServer) -> (i64, i64, i64) {
    let assigned = create_job(
        server,
        json!({
            "user_id": CUSTOMER_ID.get(),
            "translator_id": TRANSLATOR_ID.get(),
            "duration": 60,
            "session_time": "01:00"
        }),
    )
    .await;
    let unassigned = create_job(server, json!({ "user_id": CUSTOMER_ID.get() })).await;
    let foreign = create_job(server, json!({ "user_id": 99 })).await;
    (assigned, unassigned, foreign)
}

fn job_ids(body: &Value, key: &str) -> Vec<i64> {
    body[key]
        .as_array()
        .unwrap_or_else(|| panic!("{key} is not an array: {body}"))
        .iter()
        .map(|job| job["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn health_does_not_require_authentication() {
    let app = build_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn job_routes_reject_missing_and_unknown_tokens() {
    let app = build_test_app().await;

    app.server
        .get("/api/v1/jobs")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .get("/api/v1/jobs/1")
        .add_header("Authorization", bearer("nope"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", "Basic abc")
        .json(&json!({ "jobid": 1 }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn regular_caller_without_target_gets_null_results() {
    let app = build_test_app().await;
    seed_jobs(&app.server).await;

    let response = app
        .server
        .get("/api/v1/jobs")
        .add_header("Authorization", bearer(CUSTOMER_TOKEN))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "status": true, "results": null }));
}

#[tokio::test]
async fn admins_see_every_job_regardless_of_target() {
    let app = build_test_app().await;
    let (assigned, unassigned, foreign) = seed_jobs(&app.server).await;

    for token in [ADMIN_TOKEN, SUPERADMIN_TOKEN] {
        let response = app
            .server
            .get("/api/v1/jobs")
            .add_query_param("user_id", CUSTOMER_ID.get())
            .add_header("Authorization", bearer(token))
            .await;
        let body: Value = response.json();
        assert_eq!(body["status"], true);
        assert_eq!(job_ids(&body, "results"), vec![foreign, unassigned, assigned]);
    }
}

#[tokio::test]
async fn target_listing_covers_customer_and_translator_jobs() {
    let app = build_test_app().await;
    let (assigned, unassigned, _) = seed_jobs(&app.server).await;

    let customer: Value = app
        .server
        .get("/api/v1/jobs")
        .add_query_param("user_id", CUSTOMER_ID.get())
        .add_header("Authorization", bearer(CUSTOMER_TOKEN))
        .await
        .json();
    assert_eq!(job_ids(&customer, "results"), vec![unassigned, assigned]);

    let translator: Value = app
        .server
        .get("/api/v1/jobs")
        .add_query_param("user_id", TRANSLATOR_ID.get())
        .add_header("Authorization", bearer(TRANSLATOR_TOKEN))
        .await
        .json();
    assert_eq!(job_ids(&translator, "results"), vec![assigned]);
}

#[tokio::test]
async fn restricted_policy_blocks_targeting_other_users() {
    let settings = RuntimeSettings {
        listing: ListingPolicy {
            restrict_target_to_self: true,
            ..ListingPolicy::default()
        },
        ..RuntimeSettings::default()
    };
    let app = build_test_app_with(settings, RecordingTransport::default()).await;
    seed_jobs(&app.server).await;

    let body: Value = app
        .server
        .get("/api/v1/jobs")
        .add_query_param("user_id", CUSTOMER_ID.get())
        .add_header("Authorization", bearer(TRANSLATOR_TOKEN))
        .await
        .json();
    assert_eq!(body, json!({ "status": true, "results": null }));
}

#[tokio::test]
async fn listing_pages_and_filters_by_status() {
    let app = build_test_app().await;
    for status in ["pending", "completed", "pending"] {
        create_job(&app.server, json!({ "user_id": 5, "status": status })).await;
    }

    let body: Value = app
        .server
        .get("/api/v1/jobs")
        .add_query_param("status", "pending")
        .add_query_param("per_page", 1)
        .add_query_param("page", 2)
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .await
        .json();
    assert_eq!(job_ids(&body, "results"), vec![1]);
}

#[tokio::test]
async fn created_job_round_trips_through_get() {
    let app = build_test_app().await;
    let id = create_job(
        &app.server,
        json!({
            "user_id": CUSTOMER_ID.get(),
            "translator_id": TRANSLATOR_ID.get(),
            "from_language_id": 7,
            "due": "2026-03-01T09:30:00Z",
            "duration": 90,
            "immediate": true,
            "customer_phone_type": true,
            "status": "assigned",
            "admin_comments": "vip",
            "session_time": "01:30"
        }),
    )
    .await;

    let response = app
        .server
        .get(&format!("/api/v1/jobs/{id}"))
        .add_header("Authorization", bearer(CUSTOMER_TOKEN))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "job.found");

    let job = &body["job"];
    assert_eq!(job["id"], id);
    assert_eq!(job["user_id"], CUSTOMER_ID.get());
    assert_eq!(job["translator_id"], TRANSLATOR_ID.get());
    assert_eq!(job["from_language_id"], 7);
    assert_eq!(job["due"], "2026-03-01T09:30:00Z");
    assert_eq!(job["duration"], 90);
    assert_eq!(job["immediate"], true);
    assert_eq!(job["customer_phone_type"], true);
    assert_eq!(job["customer_physical_type"], false);
    assert_eq!(job["status"], "assigned");
    assert_eq!(job["admin_comments"], "vip");
    assert_eq!(job["session_time"], "01:30");
}

#[tokio::test]
async fn malformed_and_missing_ids_are_not_found_with_status_true() {
    let app = build_test_app().await;
    create_job(&app.server, json!({ "user_id": 3 })).await;
    let writes_before = app.store.writes();

    for path in ["/api/v1/jobs/abc", "/api/v1/jobs/-1", "/api/v1/jobs/404"] {
        let body: Value = app
            .server
            .get(path)
            .add_header("Authorization", bearer(CUSTOMER_TOKEN))
            .await
            .json();
        assert_eq!(
            body,
            json!({ "status": true, "job": null, "message": "job.not.found" }),
            "{path}"
        );
    }
    assert_eq!(app.store.writes(), writes_before);
}

#[tokio::test]
async fn update_of_missing_job_is_a_failed_booking() {
    let app = build_test_app().await;

    let response = app
        .server
        .put("/api/v1/jobs/77")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "user_id": 3 }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "status": true, "booking": null, "message": "failed.to.update.booking" })
    );
}

#[tokio::test]
async fn update_rewrites_the_booking() {
    let app = build_test_app().await;
    let id = create_job(&app.server, json!({ "user_id": 3, "status": "pending" })).await;

    let body: Value = app
        .server
        .put(&format!("/api/v1/jobs/{id}"))
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "user_id": 3, "status": "completed", "flagged": true }))
        .await
        .json();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "booking.has.been.updated");
    assert_eq!(body["booking"]["status"], "completed");
    assert_eq!(body["booking"]["flagged"], true);
}

#[tokio::test]
async fn invalid_booking_payload_is_rejected_before_the_core() {
    let app = build_test_app().await;

    let response = app
        .server
        .post("/api/v1/jobs")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "user_id": 0, "duration": -1 }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.store.writes(), 0);
}

#[tokio::test]
async fn distance_feed_only_writes_present_fields() {
    let app = build_test_app().await;
    let (assigned, unassigned, _) = seed_jobs(&app.server).await;
    let job_id = JobId::new(assigned).unwrap();
    let untouched = app
        .store
        .find_job(JobId::new(unassigned).unwrap())
        .await
        .unwrap();

    let body: Value = app
        .server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned, "distance": "5km", "time": null }))
        .await
        .json();
    assert_eq!(body, json!({ "status": true, "message": "updated" }));

    let distance = app.store.find_distance(job_id).await.unwrap().unwrap();
    assert_eq!(distance.distance.as_deref(), Some("5km"));
    assert_eq!(distance.time, None);

    let body: Value = app
        .server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned, "admincomment": "ok" }))
        .await
        .json();
    assert_eq!(body["status"], true);

    let job = app.store.find_job(job_id).await.unwrap().unwrap();
    assert_eq!(job.admin_comments.as_deref(), Some("ok"));
    assert_eq!(job.session_time.as_deref(), Some("01:00"));
    assert!(!job.flagged);
    assert_eq!(
        app.store
            .find_job(JobId::new(unassigned).unwrap())
            .await
            .unwrap(),
        untouched
    );
    assert_eq!(app.store.distance_count(job_id).await, 1);
}

#[tokio::test]
async fn empty_feed_succeeds_without_writes() {
    let app = build_test_app().await;
    let (assigned, _, _) = seed_jobs(&app.server).await;
    let writes_before = app.store.writes();

    let body: Value = app
        .server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned }))
        .await
        .json();
    assert_eq!(body, json!({ "status": true, "message": "updated" }));
    assert_eq!(app.store.writes(), writes_before);
}

#[tokio::test]
async fn feed_without_valid_job_id_is_unprocessable() {
    let app = build_test_app().await;

    app.server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": 0, "distance": "1km" }))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn history_is_scoped_to_the_caller() {
    let app = build_test_app().await;
    let (assigned, _, _) = seed_jobs(&app.server).await;

    let body: Value = app
        .server
        .get("/api/v1/jobs/history")
        .add_header("Authorization", bearer(TRANSLATOR_TOKEN))
        .await
        .json();
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "history.found");
    assert_eq!(body["history"]["user_id"], TRANSLATOR_ID.get());

    let entries = body["history"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["job_id"], assigned);
    assert_eq!(entries[0]["relation"], "translator");
}

#[tokio::test]
async fn resend_reaches_the_translator_on_each_channel() {
    let app = build_test_app().await;
    let (assigned, _, _) = seed_jobs(&app.server).await;

    let push: Value = app
        .server
        .post("/api/v1/jobs/resend-notifications")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned }))
        .await
        .json();
    assert_eq!(push, json!({ "status": true, "success": "Push sent" }));

    let sms: Value = app
        .server
        .post("/api/v1/jobs/resend-sms-notifications")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned }))
        .await
        .json();
    assert_eq!(sms, json!({ "status": true, "success": "SMS sent" }));

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|n| n.translator_id == TRANSLATOR_ID));
    assert_eq!(sent[0].channel, Channel::Push);
    assert_eq!(sent[1].channel, Channel::Sms);
}

#[tokio::test]
async fn resend_without_translator_or_job_sends_nothing() {
    let app = build_test_app().await;
    let (_, unassigned, _) = seed_jobs(&app.server).await;

    let body: Value = app
        .server
        .post("/api/v1/jobs/resend-notifications")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": unassigned }))
        .await
        .json();
    assert_eq!(
        body,
        json!({ "status": true, "success": null, "message": "notification.no.translator" })
    );

    let body: Value = app
        .server
        .post("/api/v1/jobs/resend-sms-notifications")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": 4040 }))
        .await
        .json();
    assert_eq!(
        body,
        json!({ "status": true, "success": null, "message": "job.not.found" })
    );
    assert!(app.transport.sent().is_empty());
}

#[tokio::test]
async fn transport_failure_is_reported_as_a_fault() {
    let transport = RecordingTransport {
        fail: true,
        ..Default::default()
    };
    let app = build_test_app_with(RuntimeSettings::default(), transport).await;
    let (assigned, _, _) = seed_jobs(&app.server).await;

    let body: Value = app
        .server
        .post("/api/v1/jobs/resend-notifications")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned }))
        .await
        .json();
    assert_eq!(body["status"], false);
    assert_eq!(body["success"], json!({}));
    assert_eq!(
        body["message"],
        "Notification transport error: provider unavailable"
    );
}

#[tokio::test]
async fn distance_feed_accepts_numeric_measurements() {
    let app = build_test_app().await;
    let (assigned, _, _) = seed_jobs(&app.server).await;

    let body: Value = app
        .server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": assigned, "distance": 5, "time": 12 }))
        .await
        .json();
    assert_eq!(body, json!({ "status": true, "message": "updated" }));

    let distance = app
        .store
        .find_distance(JobId::new(assigned).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(distance.distance.as_deref(), Some("5"));
    assert_eq!(distance.time.as_deref(), Some("12"));
}

#[tokio::test]
async fn admins_list_everything_with_blank_or_malformed_target() {
    let app = build_test_app().await;
    let (assigned, unassigned, foreign) = seed_jobs(&app.server).await;

    for target in ["", "abc"] {
        let response = app
            .server
            .get("/api/v1/jobs")
            .add_query_param("user_id", target)
            .add_header("Authorization", bearer(ADMIN_TOKEN))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            job_ids(&body, "results"),
            vec![foreign, unassigned, assigned],
            "user_id={target:?}"
        );
    }
}

#[tokio::test]
async fn regular_caller_blank_target_is_absent_and_malformed_is_rejected() {
    let app = build_test_app().await;
    seed_jobs(&app.server).await;

    let body: Value = app
        .server
        .get("/api/v1/jobs")
        .add_query_param("user_id", "")
        .add_header("Authorization", bearer(CUSTOMER_TOKEN))
        .await
        .json();
    assert_eq!(body, json!({ "status": true, "results": null }));

    let response = app
        .server
        .get("/api/v1/jobs")
        .add_query_param("user_id", "abc")
        .add_header("Authorization", bearer(CUSTOMER_TOKEN))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 422);
    assert_eq!(body["error"]["message"], "user_id must be an integer");
}

#[tokio::test]
async fn malformed_bodies_use_the_json_error_shape() {
    let app = build_test_app().await;

    let response = app
        .server
        .post("/api/v1/jobs/distance-feed")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "jobid": "seven" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 422);
    assert!(body["error"]["message"].as_str().unwrap().contains("jobid"));

    let response = app
        .server
        .post("/api/v1/jobs")
        .add_header("Authorization", bearer(ADMIN_TOKEN))
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["status"], 400);
}
