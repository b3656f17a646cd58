//! The roster management overlay for adding and deleting members.
//!
//! Every add or delete takes effect immediately. Closing the overlay does not
//! undo anything.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    app_state::lock_view_router,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_TEXT_INPUT_STYLE,
        format_currency,
    },
    member::{Member, MemberFormData, MemberId},
    view_router::ViewRouter,
};

/// The message shown when either field of the add member form is blank.
const EMPTY_FIELDS_MESSAGE: &str = "Name and student ID cannot be empty.";

/// The state needed for managing the roster.
#[derive(Debug, Clone)]
pub struct RosterState {
    pub view_router: Arc<Mutex<ViewRouter>>,
}

impl FromRef<AppState> for RosterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            view_router: state.view_router.clone(),
        }
    }
}

/// Values to show in the add member form.
#[derive(Debug, Default)]
struct RosterFormValues<'a> {
    name: &'a str,
    student_id: &'a str,
    error_message: &'a str,
}

/// Open the roster overlay and render it.
pub async fn get_roster_modal(State(state): State<RosterState>) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = view_router.open_roster() {
        return error.into_alert_response();
    }

    roster_modal_view(view_router.registry().members(), &RosterFormValues::default())
        .into_response()
}

/// Handle the add member form, re-rendering the overlay.
pub async fn create_member_endpoint(
    State(state): State<RosterState>,
    Form(form): Form<MemberFormData>,
) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    match view_router.add_member(&form.name, &form.student_id) {
        Ok(_) => {
            roster_modal_view(view_router.registry().members(), &RosterFormValues::default())
                .into_response()
        }
        Err(Error::EmptyMemberName | Error::EmptyStudentId) => roster_modal_view(
            view_router.registry().members(),
            &RosterFormValues {
                name: &form.name,
                student_id: &form.student_id,
                error_message: EMPTY_FIELDS_MESSAGE,
            },
        )
        .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while adding a member: {error}");
            error.into_alert_response()
        }
    }
}

/// Delete a member and re-render the overlay.
///
/// Deleting a member that does not exist is not an error, the overlay is
/// simply re-rendered.
pub async fn delete_member_endpoint(
    Path(member_id): Path<MemberId>,
    State(state): State<RosterState>,
) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    if view_router.delete_member(member_id).is_none() {
        tracing::debug!("Tried to delete member {member_id}, but they are not on the roster");
    }

    roster_modal_view(view_router.registry().members(), &RosterFormValues::default())
        .into_response()
}

/// Close the overlay and reload the home page to show roster changes.
pub async fn close_roster_endpoint(State(state): State<RosterState>) -> Response {
    let mut view_router = match lock_view_router(&state.view_router) {
        Ok(view_router) => view_router,
        Err(error) => return error.into_alert_response(),
    };

    view_router.close_roster();

    (
        HxRedirect(endpoints::HOME_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// Render the overlay for the members on the roster.
pub(crate) fn roster_modal(members: &[Member]) -> Markup {
    roster_modal_view(members, &RosterFormValues::default())
}

fn roster_modal_view(members: &[Member], values: &RosterFormValues) -> Markup {
    html!(
        div
            id="roster-modal"
            class="fixed inset-0 bg-black/75 flex justify-center items-center z-50 p-4"
            aria-modal="true"
            role="dialog"
        {
            div
                class="bg-white dark:bg-gray-800 rounded-lg shadow-xl w-full
                    max-w-md border border-gray-200 dark:border-gray-700 p-6
                    text-gray-900 dark:text-white"
            {
                div class="flex justify-between items-center mb-6"
                {
                    h2 class="text-2xl font-bold text-cyan-600 dark:text-cyan-300" { "Manage Members" }

                    button
                        type="button"
                        hx-post=(endpoints::CLOSE_ROSTER)
                        hx-target-error="#alert-container"
                        class="text-gray-400 text-3xl leading-none hover:text-gray-600 dark:hover:text-white"
                        aria-label="Close"
                    {
                        "×"
                    }
                }

                section class="mb-6"
                {
                    h3 class="text-lg font-semibold mb-3" { "Add a Member" }

                    (add_member_form(values))
                }

                section
                {
                    h3 class="text-lg font-semibold mb-3" { "Current Members" }

                    @if members.is_empty() {
                        p class="text-gray-500 dark:text-gray-400" { "No members yet." }
                    }

                    ul class="space-y-2 max-h-60 overflow-y-auto pr-2"
                    {
                        @for member in members {
                            (member_row(member))
                        }
                    }
                }
            }
        }
    )
}

fn add_member_form(values: &RosterFormValues) -> Markup {
    html!(
        form
            hx-post=(endpoints::POST_MEMBER)
            hx-target="#roster-modal"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            input
                type="text"
                name="name"
                placeholder="Name"
                aria-label="Name"
                required
                value=(values.name)
                class=(FORM_TEXT_INPUT_STYLE);

            input
                type="text"
                name="student_id"
                placeholder="Student ID (required)"
                aria-label="Student ID"
                required
                value=(values.student_id)
                class=(FORM_TEXT_INPUT_STYLE);

            @if !values.error_message.is_empty() {
                p class=(FORM_ERROR_STYLE) { (values.error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Member" }
        }
    )
}

fn member_row(member: &Member) -> Markup {
    let delete_url = format_endpoint(endpoints::DELETE_MEMBER, member.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Past sessions are not affected.",
        member.name
    );

    html!(
        li
            class="flex justify-between items-center bg-gray-100 dark:bg-gray-700 p-3 rounded-md"
            data-member-id=(member.id)
        {
            div
            {
                p class="font-semibold" { (member.name) }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (member.student_id.as_deref().unwrap_or("No student ID"))
                    " · "
                    (format_currency(member.total_amount))
                }
            }

            button
                type="button"
                hx-delete=(delete_url)
                hx-confirm=(confirm_message)
                hx-target="#roster-modal"
                hx-swap="outerHTML"
                hx-target-error="#alert-container"
                class=(BUTTON_DELETE_STYLE)
                aria-label=(format!("Delete {}", member.name))
            {
                "Delete"
            }
        }
    )
}
