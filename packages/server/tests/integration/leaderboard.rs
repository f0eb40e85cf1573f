use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

use arena_server::entity::participant;

use crate::common::{TestApp, routes};

/// Overwrite a character's attribute scores directly in the store.
async fn set_scores(app: &TestApp, character_id: Uuid, strength: i32, charm: i32, creativity: i32) {
    let character = participant::Entity::find_by_id(character_id)
        .one(&app.db)
        .await
        .expect("Failed to query character")
        .expect("Character should exist");

    let mut model: participant::ActiveModel = character.into();
    model.strength = Set(strength);
    model.charm = Set(charm);
    model.creativity = Set(creativity);
    model.total_score = Set(strength + charm + creativity);
    model.update(&app.db).await.expect("Failed to set scores");
}

/// Three characters with fixed scores, one completed round. Returns the
/// character ids in creation order.
async fn frozen_round(app: &TestApp, scores: [(i32, i32, i32); 3]) -> [Uuid; 3] {
    let admin = Uuid::new_v4();
    let first = app.create_character(Uuid::new_v4(), "Gumiho").await;
    let second = app.create_character(Uuid::new_v4(), "Haetae").await;
    let third = app.create_character(Uuid::new_v4(), "Bulgae").await;

    for (character_id, (strength, charm, creativity)) in
        [first, second, third].into_iter().zip(scores)
    {
        set_scores(app, character_id, strength, charm, creativity).await;
    }

    app.start_live_round(admin).await;
    let res = app.end_round(admin).await;
    assert_eq!(res.status, 200, "end failed: {}", res.text);

    [first, second, third]
}

mod frozen_boards {
    use super::*;

    #[tokio::test]
    async fn freezes_ranked_standings_when_a_round_ends() {
        let app = TestApp::spawn().await;
        let [first, second, third] =
            frozen_round(&app, [(100, 100, 100), (100, 50, 50), (50, 30, 20)]).await;

        let res = app.get_without_identity(&routes::leaderboard(1)).await;
        assert_eq!(res.status, 200, "leaderboard failed: {}", res.text);

        let rows = res.data().as_array().expect("data should be array");
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[0]["participant_id"], first.to_string());
        assert_eq!(rows[0]["total_score"], 300);
        assert_eq!(rows[0]["strength"], 100);
        assert_eq!(rows[0]["round_number"], 1);

        assert_eq!(rows[1]["rank"], 2);
        assert_eq!(rows[1]["participant_id"], second.to_string());
        assert_eq!(rows[1]["total_score"], 200);

        assert_eq!(rows[2]["rank"], 3);
        assert_eq!(rows[2]["participant_id"], third.to_string());
        assert_eq!(rows[2]["total_score"], 100);
    }

    #[tokio::test]
    async fn breaks_total_ties_by_creation_time() {
        let app = TestApp::spawn().await;
        let [first, second, third] =
            frozen_round(&app, [(100, 100, 100), (150, 100, 50), (50, 50, 50)]).await;

        let res = app.get_without_identity(&routes::leaderboard(1)).await;
        let rows = res.data().as_array().unwrap();

        // Both lead with 300; the earlier character keeps the better rank.
        assert_eq!(rows[0]["participant_id"], first.to_string());
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[1]["participant_id"], second.to_string());
        assert_eq!(rows[1]["rank"], 2);
        assert_eq!(rows[2]["participant_id"], third.to_string());
        assert_eq!(rows[2]["rank"], 3);
    }

    #[tokio::test]
    async fn snapshots_ignore_later_score_changes() {
        let app = TestApp::spawn().await;
        let [first, ..] = frozen_round(&app, [(100, 100, 100), (100, 50, 50), (50, 30, 20)]).await;

        set_scores(&app, first, 999, 999, 999).await;

        let res = app.get_without_identity(&routes::leaderboard(1)).await;
        let rows = res.data().as_array().unwrap();
        assert_eq!(rows[0]["participant_id"], first.to_string());
        assert_eq!(rows[0]["total_score"], 300);
    }

    #[tokio::test]
    async fn an_empty_round_freezes_an_empty_board() {
        let app = TestApp::spawn().await;
        let admin = Uuid::new_v4();
        app.start_live_round(admin).await;

        let res = app.end_round(admin).await;
        assert_eq!(res.status, 200, "end failed: {}", res.text);
        assert_eq!(res.data()["snapshot_created"], true);
        assert_eq!(res.data()["leaderboard_count"], 0);

        let res = app.get_without_identity(&routes::leaderboard(1)).await;
        assert_eq!(res.status, 200, "leaderboard failed: {}", res.text);
        assert_eq!(res.data().as_array().unwrap().len(), 0);
    }
}

mod fetching {
    use super::*;

    #[tokio::test]
    async fn rejects_a_round_number_below_one() {
        let app = TestApp::spawn().await;

        for round_number in [0, -3] {
            let res = app
                .get_without_identity(&routes::leaderboard(round_number))
                .await;
            assert_eq!(res.status, 400, "expected rejection: {}", res.text);
            assert_eq!(res.error_kind(), "MISSING_ROUND_NUMBER");
        }
    }

    #[tokio::test]
    async fn an_unseen_round_is_an_empty_board() {
        let app = TestApp::spawn().await;

        let res = app.get_without_identity(&routes::leaderboard(99)).await;
        assert_eq!(res.status, 200, "leaderboard failed: {}", res.text);
        assert_eq!(res.data().as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn paginates_with_limit_and_offset() {
        let app = TestApp::spawn().await;
        let [_, _, third] =
            frozen_round(&app, [(100, 100, 100), (100, 50, 50), (50, 30, 20)]).await;

        let res = app
            .get_without_identity(&format!("{}?limit=2", routes::leaderboard(1)))
            .await;
        let rows = res.data().as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["rank"], 1);
        assert_eq!(rows[1]["rank"], 2);

        let res = app
            .get_without_identity(&format!("{}?limit=2&offset=2", routes::leaderboard(1)))
            .await;
        let rows = res.data().as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["rank"], 3);
        assert_eq!(rows[0]["participant_id"], third.to_string());
    }
}
