//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/members/{member_id}', use [format_endpoint].

use crate::member::MemberId;

/// The root route which redirects to the view for the current state.
pub const ROOT: &str = "/";
/// The page for selecting members and viewing the history of sessions.
pub const HOME_VIEW: &str = "/home";
/// The page for recording amounts during a session.
pub const SESSION_VIEW: &str = "/session";
/// The roster management overlay.
pub const ROSTER_VIEW: &str = "/members";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to select or deselect a member for the next session.
pub const TOGGLE_SELECTION: &str = "/api/selection/{member_id}";
/// The route to start a session with the selected members.
pub const START_SESSION: &str = "/api/session";
/// The route to add to a member's session total.
pub const SESSION_AMOUNT: &str = "/api/session/members/{member_id}/amount";
/// The route to change a member's student ID during a session.
pub const SESSION_STUDENT_ID: &str = "/api/session/members/{member_id}/student_id";
/// The route to finish the session and record it.
pub const FINISH_SESSION: &str = "/api/session/finish";
/// The route to leave the session without recording it.
pub const ABANDON_SESSION: &str = "/api/session/abandon";
/// The route to add a member to the roster.
pub const POST_MEMBER: &str = "/api/members";
/// The route to delete a member from the roster.
pub const DELETE_MEMBER: &str = "/api/members/{member_id}";
/// The route to close the roster management overlay.
pub const CLOSE_ROSTER: &str = "/api/members/close";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/members/{member_id}', '{member_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: MemberId) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
