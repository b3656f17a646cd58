//! Reimbursement sessions: tracking amounts per member until the session is
//! finished or abandoned.

mod amount;
mod page;
mod tracker;

pub use amount::Amount;
pub use page::{
    abandon_session_endpoint, add_amount_endpoint, finish_session_endpoint, get_session_page,
    update_student_id_endpoint,
};
pub use tracker::{ActiveSession, FinishedSession, SessionMember, SessionTracker};
