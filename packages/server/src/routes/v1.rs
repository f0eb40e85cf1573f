use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/rounds", round_routes())
        .nest("/prompts", prompt_routes())
        .nest("/characters", character_routes())
        .nest("/leaderboard", leaderboard_routes())
        .nest("/admin/rounds", admin_round_routes())
        .nest("/admin/prompts", admin_prompt_routes())
}

fn round_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::round::current_round))
        .routes(routes!(handlers::round::round_info))
}

fn prompt_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::prompt::submit_prompt))
        .routes(routes!(handlers::prompt::my_prompts))
}

fn character_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::character::create_character))
        .routes(routes!(handlers::character::my_character))
        .routes(routes!(handlers::character::character_rank))
}

fn leaderboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::leaderboard::past_leaderboard))
}

fn admin_round_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::round::schedule_round))
        .routes(routes!(handlers::round::start_round))
        .routes(routes!(handlers::round::end_round))
        .routes(routes!(handlers::round::cancel_round))
        .routes(routes!(handlers::round::extend_round))
}

fn admin_prompt_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::prompt::rollback_prompt))
}
