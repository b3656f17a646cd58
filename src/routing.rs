//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    home::{get_home_page, get_root, start_session_endpoint, toggle_selection_endpoint},
    internal_server_error::get_internal_server_error_page,
    member::{
        close_roster_endpoint, create_member_endpoint, delete_member_endpoint, get_roster_modal,
    },
    not_found::get_404_not_found,
    session::{
        abandon_session_endpoint, add_amount_endpoint, finish_session_endpoint, get_session_page,
        update_student_id_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::HOME_VIEW, get(get_home_page))
        .route(endpoints::SESSION_VIEW, get(get_session_page))
        .route(endpoints::ROSTER_VIEW, get(get_roster_modal))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TOGGLE_SELECTION,
            post(toggle_selection_endpoint),
        )
        .route(endpoints::START_SESSION, post(start_session_endpoint))
        .route(endpoints::SESSION_AMOUNT, post(add_amount_endpoint))
        .route(
            endpoints::SESSION_STUDENT_ID,
            put(update_student_id_endpoint),
        )
        .route(endpoints::FINISH_SESSION, post(finish_session_endpoint))
        .route(endpoints::ABANDON_SESSION, post(abandon_session_endpoint))
        .route(endpoints::POST_MEMBER, post(create_member_endpoint))
        .route(endpoints::DELETE_MEMBER, delete(delete_member_endpoint))
        .route(endpoints::CLOSE_ROSTER, post(close_roster_endpoint));

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
