//! The tracker page and the endpoints used while a session is in progress.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    alert::Alert,
    app_state::lock_view_router,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, BUTTON_SUCCESS_STYLE, CARD_STYLE,
        FORM_ERROR_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, format_currency,
        page_header,
    },
    member::MemberId,
    session::{ActiveSession, Amount, SessionMember},
    timezone::require_local_offset,
    view_router::ViewRouter,
};

/// The state needed for the tracker page and its endpoints.
#[derive(Debug, Clone)]
pub struct SessionPageState {
    pub view_router: Arc<Mutex<ViewRouter>>,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Shanghai".
    pub local_timezone: String,
}

impl FromRef<AppState> for SessionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            view_router: state.view_router.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Form data for adding to a member's session total.
///
/// The amount is kept as text so that invalid input can be reported next to
/// the member instead of being rejected by the extractor.
#[derive(Debug, Serialize, Deserialize)]
pub struct AmountForm {
    pub amount: String,
}

/// Form data for changing a member's student ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentIdForm {
    #[serde(default)]
    pub student_id: String,
}

/// An invalid amount entered for a member.
struct AmountError<'a> {
    member_id: MemberId,
    input: &'a str,
    message: String,
}

/// Render the tracker page, or redirect home when there is no session.
pub async fn get_session_page(State(state): State<SessionPageState>) -> Result<Response, Error> {
    let view_router = lock_view_router(&state.view_router)?;

    let response = match view_router.session() {
        Some(session) => session_view(session).into_response(),
        None => Redirect::to(endpoints::HOME_VIEW).into_response(),
    };

    Ok(response)
}

/// Add an amount to a member's session total and re-render the session totals.
pub async fn add_amount_endpoint(
    Path(member_id): Path<MemberId>,
    State(state): State<SessionPageState>,
    Form(form): Form<AmountForm>,
) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    let result = form
        .amount
        .parse::<Amount>()
        .and_then(|amount| view_router.add_amount(member_id, amount));

    let amount_error = match result {
        Ok(total) => {
            tracing::debug!("Member {member_id} now has a session total of {total}");
            None
        }
        Err(error @ Error::InvalidAmount(_)) => Some(AmountError {
            member_id,
            input: &form.amount,
            message: format!("Error: {error}"),
        }),
        Err(error) => return error.into_alert_response(),
    };

    match view_router.session() {
        Some(session) => session_content(session, amount_error.as_ref()).into_response(),
        None => Error::NoActiveSession.into_alert_response(),
    }
}

/// Save a student ID edited on the tracker page.
pub async fn update_student_id_endpoint(
    Path(member_id): Path<MemberId>,
    State(state): State<SessionPageState>,
    Form(form): Form<StudentIdForm>,
) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = view_router.set_student_id(member_id, &form.student_id) {
        return error.into_alert_response();
    }

    let name = view_router
        .session()
        .and_then(|session| session.member(member_id))
        .map(|member| member.name.to_string())
        .unwrap_or_default();

    Alert::SuccessSimple {
        message: format!("Saved student ID for {name}"),
    }
    .into_response()
}

/// Finish the session, recording it if anything was reimbursed.
pub async fn finish_session_endpoint(State(state): State<SessionPageState>) -> Response {
    let local_offset = match require_local_offset(&state.local_timezone) {
        Ok(offset) => offset,
        Err(error) => return error.into_alert_response(),
    };

    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    match view_router.finish_session(OffsetDateTime::now_utc(), local_offset) {
        Ok(_) => (
            HxRedirect(endpoints::HOME_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Leave the session without recording it.
pub async fn abandon_session_endpoint(State(state): State<SessionPageState>) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    match view_router.abandon_session() {
        Ok(()) => (
            HxRedirect(endpoints::HOME_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn session_view(session: &ActiveSession) -> Markup {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl"
            {
                (page_header("Team Reimbursement Tracker", "Record the amount reimbursed to each member"))

                (session_content(session, None))

                div class="mt-12 flex justify-center gap-4"
                {
                    button
                        type="button"
                        id="abandon-session"
                        hx-post=(endpoints::ABANDON_SESSION)
                        hx-target-error="#alert-container"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Back"
                    }

                    button
                        type="button"
                        id="finish-session"
                        hx-post=(endpoints::FINISH_SESSION)
                        hx-target-error="#alert-container"
                        class=(BUTTON_SUCCESS_STYLE)
                    {
                        "Finish and Save"
                    }
                }
            }
        }
    );

    base("Session", &content)
}

fn session_content(session: &ActiveSession, amount_error: Option<&AmountError>) -> Markup {
    html!(
        div id="session-content"
        {
            div class={ (CARD_STYLE) " mb-10" }
            {
                h2 class="text-2xl font-bold text-cyan-600 dark:text-cyan-300 mb-2"
                {
                    "Total Group Reimbursement"
                }

                p id="session-total" class="text-5xl font-mono font-extrabold"
                {
                    (format_currency(session.total()))
                }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6"
            {
                @for member in session.members() {
                    (member_card(
                        member,
                        amount_error.filter(|error| error.member_id == member.id),
                    ))
                }
            }
        }
    )
}

fn member_card(member: &SessionMember, amount_error: Option<&AmountError>) -> Markup {
    let amount_url = format_endpoint(endpoints::SESSION_AMOUNT, member.id);
    let student_id_url = format_endpoint(endpoints::SESSION_STUDENT_ID, member.id);
    let amount_input_id = format!("amount-{}", member.id);

    html!(
        div class=(CARD_STYLE) data-member-id=(member.id)
        {
            div class="flex justify-between items-start gap-4 mb-4"
            {
                h3 class="text-2xl font-bold text-cyan-600 dark:text-cyan-400" { (member.name) }

                input
                    type="text"
                    name="student_id"
                    value=(member.student_id.as_deref().unwrap_or_default())
                    placeholder="Student ID"
                    aria-label=(format!("Student ID for {}", member.name))
                    hx-put=(student_id_url)
                    hx-trigger="change"
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    class="w-32 px-2 py-1 text-xs rounded-md border border-gray-300
                        dark:border-gray-600 bg-gray-50 dark:bg-gray-900";
            }

            div class="mb-6"
            {
                p class="text-sm text-gray-500 dark:text-gray-400 mb-1" { "Reimbursed this session" }

                p class="member-total text-4xl font-mono font-extrabold"
                {
                    (format_currency(member.total_amount))
                }
            }

            form
                hx-post=(amount_url)
                hx-target="#session-content"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class="space-y-3"
            {
                label for=(amount_input_id) class="sr-only"
                {
                    "Amount to add for " (member.name)
                }

                input
                    id=(amount_input_id)
                    type="number"
                    name="amount"
                    placeholder="Amount"
                    step="0.01"
                    min="0.01"
                    required
                    value=[amount_error.map(|error| error.input)]
                    class=(FORM_TEXT_INPUT_STYLE);

                @if let Some(error) = amount_error {
                    p class=(FORM_ERROR_STYLE) { (error.message) }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add" }
            }
        }
    )
}
