use chrono::{Duration, Utc};
use futures::future;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;
use uuid::Uuid;

use arena_server::entity::prompt;

use crate::common::{AXIS_SCORE, TOTAL_SCORE, TestApp, routes, uuid_field};

/// Spawn an app with a live three-hour round.
async fn arena_with_live_round() -> (TestApp, Uuid) {
    let app = TestApp::spawn().await;
    let admin = Uuid::new_v4();
    app.start_live_round(admin).await;
    (app, admin)
}

/// Insert a submission row directly, `minutes_ago` in the past.
async fn seed_prompt(
    app: &TestApp,
    character_id: Uuid,
    user: Uuid,
    round_number: i32,
    minutes_ago: i64,
    deleted: bool,
) -> Uuid {
    let id = Uuid::new_v4();
    let model = prompt::ActiveModel {
        id: Set(id),
        participant_id: Set(character_id),
        user_id: Set(user),
        prompt: Set(format!("seeded round {round_number}")),
        round_number: Set(round_number),
        strength_gained: Set(AXIS_SCORE),
        charm_gained: Set(AXIS_SCORE),
        creativity_gained: Set(AXIS_SCORE),
        total_score_gained: Set(TOTAL_SCORE),
        is_deleted: Set(deleted),
        created_at: Set(Utc::now() - Duration::minutes(minutes_ago)),
    };

    model.insert(&app.db).await.expect("Failed to seed prompt");
    id
}

mod submitting {
    use super::*;

    #[tokio::test]
    async fn scored_submission_applies_the_gains() {
        let (app, _) = arena_with_live_round().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        let data = app
            .submit_prompt(user, character_id, "a knight of glass and rain")
            .await;

        uuid_field(&data["prompt_history_id"]);
        assert_eq!(data["round_number"], 1);
        assert_eq!(data["scores"]["strength"], AXIS_SCORE);
        assert_eq!(data["scores"]["charm"], AXIS_SCORE);
        assert_eq!(data["scores"]["creativity"], AXIS_SCORE);
        assert_eq!(data["scores"]["total"], TOTAL_SCORE);
        assert_eq!(data["character"]["total_score"], TOTAL_SCORE);
        assert_eq!(data["character"]["strength"], AXIS_SCORE);
        assert_eq!(data["character"]["charm"], AXIS_SCORE);
        assert_eq!(data["character"]["creativity"], AXIS_SCORE);
    }

    #[tokio::test]
    async fn trims_the_prompt_before_storing() {
        let (app, _) = arena_with_live_round().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        app.submit_prompt(user, character_id, "  hero  ").await;

        let res = app
            .get_with_identity(routes::MY_CHARACTER, user, "player")
            .await;
        assert_eq!(res.status, 200, "fetch failed: {}", res.text);
        assert_eq!(res.data()["current_prompt"], "hero");

        let res = app
            .get_with_identity(routes::MY_PROMPTS, user, "player")
            .await;
        assert_eq!(res.status, 200, "history failed: {}", res.text);
        assert_eq!(res.data()["data"][0]["prompt"], "hero");
    }

    #[tokio::test]
    async fn enforces_the_thirty_character_limit() {
        let (app, _) = arena_with_live_round().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        let res = app
            .post_with_identity(
                routes::PROMPTS,
                &json!({ "character_id": character_id, "prompt": "x".repeat(31) }),
                user,
                "player",
            )
            .await;
        assert_eq!(res.status, 400, "overlong accepted: {}", res.text);
        assert_eq!(res.error_kind(), "INVALID_PROMPT_LENGTH");

        let res = app
            .post_with_identity(
                routes::PROMPTS,
                &json!({ "character_id": character_id, "prompt": "   " }),
                user,
                "player",
            )
            .await;
        assert_eq!(res.status, 400, "blank accepted: {}", res.text);
        assert_eq!(res.error_kind(), "INVALID_PROMPT_LENGTH");

        // Exactly thirty characters is still legal.
        app.submit_prompt(user, character_id, &"x".repeat(30)).await;
    }

    #[tokio::test]
    async fn rejects_submissions_while_no_round_is_active() {
        let app = TestApp::spawn().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        let res = app
            .post_with_identity(
                routes::PROMPTS,
                &json!({ "character_id": character_id, "prompt": "hero" }),
                user,
                "player",
            )
            .await;
        assert_eq!(res.status, 400, "expected rejection: {}", res.text);
        assert_eq!(res.error_kind(), "ROUND_NOT_ACTIVE");
    }

    #[tokio::test]
    async fn cannot_submit_for_another_users_character() {
        let (app, _) = arena_with_live_round().await;
        let owner = Uuid::new_v4();
        let character_id = app.create_character(owner, "Dokkaebi").await;

        let res = app
            .post_with_identity(
                routes::PROMPTS,
                &json!({ "character_id": character_id, "prompt": "hero" }),
                Uuid::new_v4(),
                "player",
            )
            .await;
        assert_eq!(res.status, 404, "expected not found: {}", res.text);
        assert_eq!(res.error_kind(), "CHARACTER_NOT_FOUND");
    }

    #[tokio::test]
    async fn rejects_a_second_submission_in_the_same_round() {
        let (app, _) = arena_with_live_round().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        app.submit_prompt(user, character_id, "first").await;

        let res = app
            .post_with_identity(
                routes::PROMPTS,
                &json!({ "character_id": character_id, "prompt": "second" }),
                user,
                "player",
            )
            .await;
        assert_eq!(res.status, 400, "duplicate accepted: {}", res.text);
        assert_eq!(res.error_kind(), "ALREADY_SUBMITTED");
    }

    #[tokio::test]
    async fn concurrent_duplicates_score_exactly_once() {
        let (app, _) = arena_with_live_round().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        let app_ref = &app;
        let attempts = future::join_all((0..4).map(|_| async move {
            app_ref
                .post_with_identity(
                    routes::PROMPTS,
                    &json!({ "character_id": character_id, "prompt": "hero" }),
                    user,
                    "player",
                )
                .await
        }))
        .await;

        let winners = attempts.iter().filter(|res| res.status == 200).count();
        assert_eq!(winners, 1, "expected exactly one scored submission");
        for res in attempts.iter().filter(|res| res.status != 200) {
            assert!(res.status >= 400, "loser got {}: {}", res.status, res.text);
        }

        let live = prompt::Entity::find()
            .filter(prompt::Column::ParticipantId.eq(character_id))
            .filter(prompt::Column::IsDeleted.eq(false))
            .count(&app.db)
            .await
            .expect("Failed to count submissions");
        assert_eq!(live, 1);

        let res = app
            .get_with_identity(routes::MY_CHARACTER, user, "player")
            .await;
        assert_eq!(res.data()["total_score"], TOTAL_SCORE);
    }

    #[tokio::test]
    async fn can_submit_again_in_the_next_round() {
        let (app, admin) = arena_with_live_round().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        app.submit_prompt(user, character_id, "round one").await;
        let res = app.end_round(admin).await;
        assert_eq!(res.status, 200, "end failed: {}", res.text);
        app.start_live_round(admin).await;

        let data = app.submit_prompt(user, character_id, "round two").await;
        assert_eq!(data["round_number"], 2);
        assert_eq!(data["character"]["total_score"], 2 * TOTAL_SCORE);
    }
}

mod history {
    use super::*;

    #[tokio::test]
    async fn lists_submissions_newest_first() {
        let app = TestApp::spawn().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        seed_prompt(&app, character_id, user, 1, 30, false).await;
        seed_prompt(&app, character_id, user, 2, 20, false).await;
        seed_prompt(&app, character_id, user, 3, 10, false).await;

        let res = app
            .get_with_identity(routes::MY_PROMPTS, user, "player")
            .await;
        assert_eq!(res.status, 200, "history failed: {}", res.text);

        let rows = res.data()["data"].as_array().expect("data should be array");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["round_number"], 3);
        assert_eq!(rows[1]["round_number"], 2);
        assert_eq!(rows[2]["round_number"], 1);

        let pagination = &res.data()["pagination"];
        assert_eq!(pagination["total"], 3);
        assert_eq!(pagination["limit"], 20);
        assert_eq!(pagination["offset"], 0);
    }

    #[tokio::test]
    async fn paginates_with_limit_and_offset() {
        let app = TestApp::spawn().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        for round_number in 1..=5 {
            let minutes_ago = 60 - i64::from(round_number) * 10;
            seed_prompt(&app, character_id, user, round_number, minutes_ago, false).await;
        }

        let res = app
            .get_with_identity(
                &format!("{}?limit=2&offset=2", routes::MY_PROMPTS),
                user,
                "player",
            )
            .await;
        assert_eq!(res.status, 200, "history failed: {}", res.text);

        let rows = res.data()["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["round_number"], 3);
        assert_eq!(rows[1]["round_number"], 2);

        let pagination = &res.data()["pagination"];
        assert_eq!(pagination["total"], 5);
        assert_eq!(pagination["limit"], 2);
        assert_eq!(pagination["offset"], 2);
    }

    #[tokio::test]
    async fn hides_rolled_back_submissions() {
        let app = TestApp::spawn().await;
        let user = Uuid::new_v4();
        let character_id = app.create_character(user, "Dokkaebi").await;

        seed_prompt(&app, character_id, user, 1, 20, false).await;
        seed_prompt(&app, character_id, user, 2, 10, true).await;

        let res = app
            .get_with_identity(routes::MY_PROMPTS, user, "player")
            .await;
        assert_eq!(res.status, 200, "history failed: {}", res.text);

        let rows = res.data()["data"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["round_number"], 1);
        assert_eq!(res.data()["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn requires_an_active_character() {
        let app = TestApp::spawn().await;

        let res = app
            .get_with_identity(routes::MY_PROMPTS, Uuid::new_v4(), "player")
            .await;
        assert_eq!(res.status, 404, "expected not found: {}", res.text);
        assert_eq!(res.error_kind(), "CHARACTER_NOT_FOUND");
    }
}
