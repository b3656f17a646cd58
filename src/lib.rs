//! Reimbursement Tracker is a small web app for tracking group expense
//! reimbursements.
//!
//! Users select the members taking part, record the amounts reimbursed to
//! each member during a session and keep a running history of completed
//! sessions. All state lives in memory for the lifetime of the server.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod endpoints;
mod history;
mod home;
mod html;
mod internal_server_error;
mod logging;
mod member;
mod not_found;
mod routing;
mod session;
mod timezone;
mod view_router;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use history::{HistoryLog, ReimbursementRecord};
pub use logging::logging_middleware;
pub use member::{Member, MemberId, MemberRegistry, load_roster};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use view_router::{StudentIdSync, View, ViewRouter};

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPage, render_internal_server_error},
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used as a member's name.
    #[error("Name cannot be empty")]
    EmptyMemberName,

    /// An empty string was used as a new member's student ID.
    #[error("Student ID cannot be empty")]
    EmptyStudentId,

    /// The amount was not a finite number greater than zero, or adding it would
    /// overflow a running total.
    #[error("\"{0}\" is not a valid amount, enter a number greater than zero")]
    InvalidAmount(String),

    /// A session was started without selecting any members.
    #[error("select at least one member to start a session")]
    EmptySelection,

    /// A session operation was attempted while no session is in progress.
    #[error("there is no session in progress")]
    NoActiveSession,

    /// A home view operation was attempted while a session is in progress.
    #[error("a session is already in progress")]
    SessionAlreadyActive,

    /// The member is not part of the session in progress.
    #[error("member {0} is not part of the current session")]
    MemberNotInSession(MemberId),

    /// The member is not on the roster.
    #[error("member {0} is not on the roster")]
    MemberNotFound(MemberId),

    /// The roster file given at start-up could not be used.
    #[error("could not load the roster: {0}")]
    InvalidRoster(String),

    /// There was an error formatting a date-time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the lock on the application state.
    #[error("could not acquire the application state lock")]
    StateLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPage {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            Error::StateLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptySelection => Alert::Error {
                message: "No members selected".to_owned(),
                details: "Select at least one member to start a session.".to_owned(),
            }
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::NoActiveSession => Alert::Error {
                message: "No session in progress".to_owned(),
                details: "The session has already ended. \
                    Try refreshing the page to go back to the home page."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::CONFLICT),
            Error::SessionAlreadyActive => Alert::Error {
                message: "Session in progress".to_owned(),
                details: "Finish or leave the current session first.".to_owned(),
            }
            .into_response_with_status(StatusCode::CONFLICT),
            Error::MemberNotInSession(_) => Alert::Error {
                message: "Could not update member".to_owned(),
                details: "The member is not part of the current session.".to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::MemberNotFound(_) => Alert::Error {
                message: "Could not find member".to_owned(),
                details: "The member could not be found. \
                    Try refreshing the page to see if the member has been deleted."
                    .to_owned(),
            }
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
