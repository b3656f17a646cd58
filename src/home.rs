//! The home view: choosing the members for a session and the history of
//! finished sessions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    app_state::lock_view_router,
    endpoints::{self, format_endpoint},
    history::ReimbursementRecord,
    html::{
        BUTTON_SUCCESS_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base, format_currency,
        page_header, truncate_name,
    },
    member::{Member, MemberId, roster_modal},
    view_router::{View, ViewRouter},
};

/// The state needed for the home page.
#[derive(Debug, Clone)]
pub struct HomeState {
    pub view_router: Arc<Mutex<ViewRouter>>,
}

impl FromRef<AppState> for HomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            view_router: state.view_router.clone(),
        }
    }
}

/// Redirect to the view for the current state.
pub async fn get_root(State(state): State<HomeState>) -> Result<Redirect, Error> {
    let view_router = lock_view_router(&state.view_router)?;

    let path = match view_router.view() {
        View::Home => endpoints::HOME_VIEW,
        View::Tracking => endpoints::SESSION_VIEW,
    };

    Ok(Redirect::to(path))
}

/// Render the home page, or redirect to the tracker while a session is active.
pub async fn get_home_page(State(state): State<HomeState>) -> Result<Response, Error> {
    let view_router = lock_view_router(&state.view_router)?;

    if view_router.view() == View::Tracking {
        return Ok(Redirect::to(endpoints::SESSION_VIEW).into_response());
    }

    Ok(home_view(&view_router).into_response())
}

/// Select or deselect a member and re-render the selection grid.
pub async fn toggle_selection_endpoint(
    Path(member_id): Path<MemberId>,
    State(state): State<HomeState>,
) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    match view_router.toggle_selection(member_id) {
        Ok(selected) => {
            tracing::debug!("Member {member_id} selected: {selected}");
            member_selection(&view_router).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

/// Start a session with the selected members and go to the tracker.
pub async fn start_session_endpoint(State(state): State<HomeState>) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    match view_router.start_session() {
        Ok(_) => (
            HxRedirect(endpoints::SESSION_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn home_view(view_router: &ViewRouter) -> Markup {
    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl"
            {
                (page_header("Team Reimbursement Tracker", "Choose who is being reimbursed"))

                section class={ (CARD_STYLE) " mb-10" }
                {
                    div class="flex justify-between items-center mb-6"
                    {
                        h2 class="text-2xl font-bold text-cyan-600 dark:text-cyan-300"
                        {
                            "Select Members"
                        }

                        button
                            type="button"
                            id="manage-members"
                            hx-get=(endpoints::ROSTER_VIEW)
                            hx-target="#modal-container"
                            hx-target-error="#alert-container"
                            class="text-sm font-semibold text-cyan-600 hover:text-cyan-500
                                dark:text-cyan-400 underline"
                        {
                            "Manage members"
                        }
                    }

                    (member_selection(view_router))
                }

                (history_list(view_router.history().list()))
            }
        }

        div id="modal-container"
        {
            @if view_router.is_roster_open() {
                (roster_modal(view_router.registry().members()))
            }
        }
    );

    base("Home", &content)
}

fn member_selection(view_router: &ViewRouter) -> Markup {
    let members = view_router.registry().members();
    let selection_count = view_router.selection_count();

    html!(
        div id="member-selection"
        {
            @if members.is_empty() {
                p class="text-gray-500 dark:text-gray-400 mb-6"
                {
                    "No members yet. Use \"Manage members\" to add some."
                }
            } @else {
                div class="grid grid-cols-2 sm:grid-cols-3 md:grid-cols-4 gap-4 mb-6"
                {
                    @for member in members {
                        (member_button(member, view_router.is_selected(member.id)))
                    }
                }
            }

            button
                type="button"
                id="start-session"
                hx-post=(endpoints::START_SESSION)
                hx-target-error="#alert-container"
                disabled[selection_count == 0]
                class={ (BUTTON_SUCCESS_STYLE) " w-full disabled:opacity-50 disabled:cursor-not-allowed" }
            {
                "Start Reimbursing (" (selection_count) ")"
            }
        }
    )
}

fn member_button(member: &Member, is_selected: bool) -> Markup {
    let toggle_url = format_endpoint(endpoints::TOGGLE_SELECTION, member.id);
    let (display_name, full_name) = truncate_name(member.name.as_ref());
    let selected = is_selected.to_string();
    let style = if is_selected {
        "bg-cyan-600 border-cyan-400 text-white shadow-lg"
    } else {
        "bg-white dark:bg-gray-700 border-gray-200 dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-600"
    };

    html!(
        div
            class={ "relative p-4 rounded-lg border-2 transition " (style) }
            data-member-id=(member.id)
            data-selected=(selected)
        {
            button
                type="button"
                hx-post=(toggle_url)
                hx-target="#member-selection"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                aria-pressed=(selected)
                title=[full_name]
                class="w-full text-left font-semibold text-lg"
            {
                (display_name)
            }

            @if let Some(student_id) = &member.student_id {
                div class="flex items-center gap-2 mt-1 text-xs"
                {
                    span class="student-id font-mono" { (student_id) }

                    button
                        type="button"
                        onclick=(format!("copyStudentId(event, '{}', this)", escape_js(student_id)))
                        class="underline opacity-75 hover:opacity-100"
                    {
                        "Copy"
                    }
                }
            }
        }
    )
}

fn history_list(records: &[ReimbursementRecord]) -> Markup {
    html!(
        section id="history" class=(CARD_STYLE)
        {
            h2 class="text-2xl font-bold text-cyan-600 dark:text-cyan-300 mb-4"
            {
                "Reimbursement History"
            }

            @if records.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No history yet." }
            } @else {
                ul class="divide-y divide-gray-200 dark:divide-gray-700"
                {
                    @for record in records {
                        li class="flex justify-between py-3" data-record-id=(record.id)
                        {
                            span class="text-gray-500 dark:text-gray-400" { (record.date) }
                            span class="font-mono font-semibold" { (format_currency(record.total_amount)) }
                        }
                    }
                }
            }
        }
    )
}

/// Escape a value for use inside a single-quoted JavaScript string.
fn escape_js(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
