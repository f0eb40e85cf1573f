use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

use arena_server::entity::prompt;

use crate::common::{AXIS_SCORE, TOTAL_SCORE, TestApp, routes, uuid_field};

/// Live round, one character, one scored submission. Returns the admin,
/// the character's owner, the character and the prompt history id.
async fn arena_with_submission(app: &TestApp) -> (Uuid, Uuid, Uuid, Uuid) {
    let admin = Uuid::new_v4();
    let user = Uuid::new_v4();
    app.start_live_round(admin).await;
    let character_id = app.create_character(user, "Dokkaebi").await;
    let data = app.submit_prompt(user, character_id, "villain era").await;
    let prompt_id = uuid_field(&data["prompt_history_id"]);
    (admin, user, character_id, prompt_id)
}

mod rolling_back {
    use super::*;

    #[tokio::test]
    async fn restores_scores_and_hides_the_prompt() {
        let app = TestApp::spawn().await;
        let (admin, user, _, prompt_id) = arena_with_submission(&app).await;

        let res = app
            .post_with_identity(
                &routes::prompt_rollback(prompt_id),
                &json!({ "reason": "Abusive content" }),
                admin,
                "admin",
            )
            .await;
        assert_eq!(res.status, 200, "rollback failed: {}", res.text);
        assert_eq!(res.data()["message"], "Prompt deleted and scores rolled back");
        assert_eq!(res.data()["rolled_back"]["strength"], AXIS_SCORE);
        assert_eq!(res.data()["rolled_back"]["charm"], AXIS_SCORE);
        assert_eq!(res.data()["rolled_back"]["creativity"], AXIS_SCORE);
        assert_eq!(res.data()["rolled_back"]["total"], TOTAL_SCORE);

        let res = app
            .get_with_identity(routes::MY_CHARACTER, user, "player")
            .await;
        assert_eq!(res.data()["strength"], 0);
        assert_eq!(res.data()["charm"], 0);
        assert_eq!(res.data()["creativity"], 0);
        assert_eq!(res.data()["total_score"], 0);

        let row = prompt::Entity::find_by_id(prompt_id)
            .one(&app.db)
            .await
            .expect("Failed to query prompt")
            .expect("Rolled-back prompt should still be stored");
        assert!(row.is_deleted);

        let res = app
            .get_with_identity(routes::MY_PROMPTS, user, "player")
            .await;
        assert_eq!(res.data()["data"].as_array().unwrap().len(), 0);
        assert_eq!(res.data()["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn rolling_back_twice_is_not_found() {
        let app = TestApp::spawn().await;
        let (admin, _, _, prompt_id) = arena_with_submission(&app).await;

        let res = app
            .post_with_identity(&routes::prompt_rollback(prompt_id), &json!({}), admin, "admin")
            .await;
        assert_eq!(res.status, 200, "rollback failed: {}", res.text);

        let res = app
            .post_with_identity(&routes::prompt_rollback(prompt_id), &json!({}), admin, "admin")
            .await;
        assert_eq!(res.status, 404, "expected not found: {}", res.text);
        assert_eq!(res.error_kind(), "PROMPT_NOT_FOUND");
    }

    #[tokio::test]
    async fn unknown_prompt_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_identity(
                &routes::prompt_rollback(Uuid::new_v4()),
                &json!({}),
                Uuid::new_v4(),
                "admin",
            )
            .await;
        assert_eq!(res.status, 404, "expected not found: {}", res.text);
        assert_eq!(res.error_kind(), "PROMPT_NOT_FOUND");
    }

    #[tokio::test]
    async fn players_cannot_roll_back() {
        let app = TestApp::spawn().await;
        let (_, user, _, prompt_id) = arena_with_submission(&app).await;

        let res = app
            .post_with_identity(&routes::prompt_rollback(prompt_id), &json!({}), user, "player")
            .await;
        assert_eq!(res.status, 403, "expected forbidden: {}", res.text);
        assert_eq!(res.error_kind(), "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn allows_resubmission_in_the_same_round() {
        let app = TestApp::spawn().await;
        let (admin, user, character_id, prompt_id) = arena_with_submission(&app).await;

        let res = app
            .post_with_identity(&routes::prompt_rollback(prompt_id), &json!({}), admin, "admin")
            .await;
        assert_eq!(res.status, 200, "rollback failed: {}", res.text);

        let data = app.submit_prompt(user, character_id, "redemption arc").await;
        assert_eq!(data["round_number"], 1);
        assert_eq!(data["character"]["total_score"], TOTAL_SCORE);
    }
}

mod end_to_end {
    use super::*;

    #[tokio::test]
    async fn frozen_snapshots_survive_rollbacks() {
        let app = TestApp::spawn().await;
        let (admin, user, character_id, prompt_id) = arena_with_submission(&app).await;

        let res = app.end_round(admin).await;
        assert_eq!(res.status, 200, "end failed: {}", res.text);
        assert_eq!(res.data()["snapshot_created"], true);
        assert_eq!(res.data()["leaderboard_count"], 1);

        let res = app.get_without_identity(&routes::leaderboard(1)).await;
        assert_eq!(res.status, 200, "leaderboard failed: {}", res.text);
        let rows = res.data().as_array().expect("data should be array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[0]["participant_id"], character_id.to_string());
        assert_eq!(rows[0]["total_score"], TOTAL_SCORE);

        // Rounds are over; the offending prompt can still be pulled.
        let res = app
            .post_with_identity(&routes::prompt_rollback(prompt_id), &json!({}), admin, "admin")
            .await;
        assert_eq!(res.status, 200, "rollback failed: {}", res.text);

        let res = app
            .get_with_identity(routes::MY_CHARACTER, user, "player")
            .await;
        assert_eq!(res.data()["total_score"], 0);

        // The frozen board keeps the pre-rollback standings.
        let res = app.get_without_identity(&routes::leaderboard(1)).await;
        let rows = res.data().as_array().unwrap();
        assert_eq!(rows[0]["total_score"], TOTAL_SCORE);
    }
}
