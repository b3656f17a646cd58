//! Members of the roster and the overlay for managing them.

mod domain;
mod registry;
mod roster;
mod seed;

pub use domain::{MAX_SEED_ID, Member, MemberFormData, MemberId, MemberName, StudentId};
pub use registry::MemberRegistry;
pub(crate) use roster::roster_modal;
pub use roster::{
    close_roster_endpoint, create_member_endpoint, delete_member_endpoint, get_roster_modal,
};
pub use seed::load_roster;
