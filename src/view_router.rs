//! The application state and the transitions between the home and tracker views.
//!
//! [ViewRouter] owns the roster, the history log and the session tracker for
//! the lifetime of the process. Every user action is a method that takes the
//! router by mutable reference, so the HTTP layer only has to hold one lock.

use std::collections::BTreeSet;

use clap::ValueEnum;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    history::{HistoryLog, ReimbursementRecord},
    member::{Member, MemberId, MemberName, MemberRegistry, StudentId},
    session::{ActiveSession, Amount, FinishedSession, SessionTracker},
};

/// Controls when student ID edits made during a session reach the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StudentIdSync {
    /// Edits are written to the session copy and the roster immediately.
    ///
    /// Leaving a session with "back" does not undo edits already written.
    #[default]
    WriteThrough,
    /// Edits only change the session copy until the session is finished.
    ///
    /// Leaving a session with "back" discards them.
    OnFinish,
}

/// The screen the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Member selection and history.
    Home,
    /// Recording amounts for the session in progress.
    Tracking,
}

/// The owned state of the whole application.
#[derive(Debug, Clone)]
pub struct ViewRouter {
    registry: MemberRegistry,
    history: HistoryLog,
    tracker: SessionTracker,
    /// The members selected on the home view for the next session.
    selection: BTreeSet<MemberId>,
    roster_open: bool,
    student_id_sync: StudentIdSync,
}

impl ViewRouter {
    /// Create a router on the home view with an empty history.
    pub fn new(registry: MemberRegistry, student_id_sync: StudentIdSync) -> Self {
        Self {
            registry,
            history: HistoryLog::new(),
            tracker: SessionTracker::new(),
            selection: BTreeSet::new(),
            roster_open: false,
            student_id_sync,
        }
    }

    /// The tracker view is shown exactly while a session is active.
    pub fn view(&self) -> View {
        if self.tracker.is_active() {
            View::Tracking
        } else {
            View::Home
        }
    }

    /// The roster.
    pub fn registry(&self) -> &MemberRegistry {
        &self.registry
    }

    /// Completed sessions, most recent first.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The session in progress, if any.
    pub fn session(&self) -> Option<&ActiveSession> {
        self.tracker.active()
    }

    /// The policy for saving student ID edits made during a session.
    pub fn student_id_sync(&self) -> StudentIdSync {
        self.student_id_sync
    }

    /// Whether the member is selected for the next session.
    pub fn is_selected(&self, member_id: MemberId) -> bool {
        self.selection.contains(&member_id)
    }

    /// The number of members selected for the next session.
    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    /// Whether the roster management overlay is shown.
    pub fn is_roster_open(&self) -> bool {
        self.roster_open
    }

    /// Select the member if they are not selected, otherwise deselect them.
    ///
    /// Returns whether the member is now selected.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SessionAlreadyActive] outside the home view or an
    /// [Error::MemberNotFound] if the member is not on the roster.
    pub fn toggle_selection(&mut self, member_id: MemberId) -> Result<bool, Error> {
        self.require_home()?;

        if self.registry.get(member_id).is_none() {
            return Err(Error::MemberNotFound(member_id));
        }

        if self.selection.remove(&member_id) {
            Ok(false)
        } else {
            self.selection.insert(member_id);
            Ok(true)
        }
    }

    /// Move to the tracker view with a fresh copy of the selected members.
    ///
    /// Members keep their roster order and the selection is cleared.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptySelection] if no members are selected or an
    /// [Error::SessionAlreadyActive] outside the home view.
    pub fn start_session(&mut self) -> Result<&ActiveSession, Error> {
        self.require_home()?;

        let selected: Vec<&Member> = self
            .registry
            .members()
            .iter()
            .filter(|member| self.selection.contains(&member.id))
            .collect();

        if selected.is_empty() {
            return Err(Error::EmptySelection);
        }

        tracing::info!("Starting a session with {} member(s)", selected.len());

        self.tracker.start(selected)?;
        self.selection.clear();
        self.roster_open = false;

        self.tracker.active().ok_or(Error::NoActiveSession)
    }

    /// Add `amount` to a member's session total, returning the new total.
    ///
    /// # Errors
    ///
    /// See [SessionTracker::add_amount].
    pub fn add_amount(&mut self, member_id: MemberId, amount: Amount) -> Result<f64, Error> {
        self.tracker.add_amount(member_id, amount)
    }

    /// Change a member's student ID from the tracker view.
    ///
    /// Whether the roster is updated now or when the session is finished
    /// depends on the [StudentIdSync] policy.
    ///
    /// # Errors
    ///
    /// See [SessionTracker::set_student_id].
    pub fn set_student_id(&mut self, member_id: MemberId, student_id: &str) -> Result<(), Error> {
        self.tracker.set_student_id(member_id, student_id)?;

        if self.student_id_sync == StudentIdSync::WriteThrough
            && !self.registry.update_student_id(member_id, student_id)
        {
            tracing::debug!("Member {member_id} left the roster, skipping student ID update");
        }

        Ok(())
    }

    /// Finish the session and return to the home view.
    ///
    /// A history record is only created, and members' lifetime totals only
    /// updated, when the session total is positive. Returns the new record,
    /// or `None` for a session where nothing was reimbursed.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoActiveSession] if there is no session to finish.
    pub fn finish_session(
        &mut self,
        finished_at: OffsetDateTime,
        local_offset: UtcOffset,
    ) -> Result<Option<ReimbursementRecord>, Error> {
        let finished = self.tracker.finish()?;

        if self.student_id_sync == StudentIdSync::OnFinish {
            self.reconcile_student_ids(&finished);
        }

        if finished.total <= 0.0 {
            tracing::info!("Finished a session with nothing reimbursed");
            return Ok(None);
        }

        for member in &finished.members {
            self.registry.add_to_total(member.id, member.total_amount);
        }

        let record = self
            .history
            .record(finished.total, finished_at, local_offset)?
            .clone();

        tracing::info!("Finished a session totalling {}", finished.total);

        Ok(Some(record))
    }

    /// Leave the session without recording it and return to the home view.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoActiveSession] if there is no session to leave.
    pub fn abandon_session(&mut self) -> Result<(), Error> {
        self.tracker.abandon()?;
        tracing::info!("Abandoned the session");

        Ok(())
    }

    /// Show the roster management overlay.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SessionAlreadyActive] outside the home view.
    pub fn open_roster(&mut self) -> Result<(), Error> {
        self.require_home()?;
        self.roster_open = true;

        Ok(())
    }

    /// Hide the roster management overlay. Changes made in it are kept.
    pub fn close_roster(&mut self) {
        self.roster_open = false;
    }

    /// Add a member to the end of the roster.
    ///
    /// # Errors
    ///
    /// Returns an [Error::EmptyMemberName] or [Error::EmptyStudentId] if either
    /// field is blank. Nothing is changed on error.
    pub fn add_member(&mut self, name: &str, student_id: &str) -> Result<Member, Error> {
        let name = MemberName::new(name)?;
        let student_id = StudentId::new(student_id)?;

        let member = self.registry.add_member(name, student_id);
        tracing::info!("Added member {} to the roster", member.id);

        Ok(member)
    }

    /// Remove a member from the roster and the selection.
    ///
    /// History and any session copy of the member are left untouched.
    /// Returns `None` if there was no such member.
    pub fn delete_member(&mut self, member_id: MemberId) -> Option<Member> {
        self.selection.remove(&member_id);
        let removed = self.registry.delete_member(member_id);

        if removed.is_some() {
            tracing::info!("Deleted member {member_id} from the roster");
        }

        removed
    }

    fn require_home(&self) -> Result<(), Error> {
        match self.view() {
            View::Home => Ok(()),
            View::Tracking => Err(Error::SessionAlreadyActive),
        }
    }

    fn reconcile_student_ids(&mut self, finished: &FinishedSession) {
        for (member_id, student_id) in &finished.edited_student_ids {
            self.registry.update_student_id(*member_id, student_id);
        }
    }
}
