//! The state machine for a single reimbursement session.

use std::collections::BTreeMap;

use crate::{
    Error,
    member::{Member, MemberId, MemberName},
    session::Amount,
};

/// A session-local copy of a [Member].
///
/// The copy starts with a zero total regardless of the member's lifetime
/// total and is discarded when the session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionMember {
    /// The ID of the member on the roster.
    pub id: MemberId,
    /// The member's name when the session started.
    pub name: MemberName,
    /// The amount reimbursed to this member during the session.
    pub total_amount: f64,
    /// The member's student ID, including edits made during the session.
    pub student_id: Option<String>,
}

impl From<&Member> for SessionMember {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            name: member.name.clone(),
            total_amount: 0.0,
            student_id: member.student_id.clone(),
        }
    }
}

/// The members and edits of a session that is in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    members: Vec<SessionMember>,
    /// The latest student ID entered for each member during the session.
    edited_student_ids: BTreeMap<MemberId, String>,
}

impl ActiveSession {
    /// The members of the session in roster order.
    pub fn members(&self) -> &[SessionMember] {
        &self.members
    }

    /// The session copy of the member with `id`.
    pub fn member(&self, id: MemberId) -> Option<&SessionMember> {
        self.members.iter().find(|member| member.id == id)
    }

    /// The sum of every member's session total.
    pub fn total(&self) -> f64 {
        self.members.iter().map(|member| member.total_amount).sum()
    }

    fn member_mut(&mut self, id: MemberId) -> Result<&mut SessionMember, Error> {
        self.members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(Error::MemberNotInSession(id))
    }
}

/// Whether a session is in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// No session is in progress.
    #[default]
    Idle,
    /// A session is in progress.
    Active(ActiveSession),
}

/// The outcome of finishing a session.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedSession {
    /// The sum of all member totals at the moment the session was finished.
    pub total: f64,
    /// The members and their totals for the session.
    pub members: Vec<SessionMember>,
    /// Student IDs edited during the session, keyed by member ID.
    pub edited_student_ids: BTreeMap<MemberId, String>,
}

/// Tracks per-member amounts for one session at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionTracker {
    state: SessionState,
}

impl SessionTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state of the tracker.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a session is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// The session in progress, if any.
    pub fn active(&self) -> Option<&ActiveSession> {
        match &self.state {
            SessionState::Active(session) => Some(session),
            SessionState::Idle => None,
        }
    }

    /// Start a session with a copy of `selected_members`.
    ///
    /// An empty selection is accepted here, callers that need at least one
    /// member must check for it themselves.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SessionAlreadyActive] if a session is in progress.
    pub fn start<'a>(
        &mut self,
        selected_members: impl IntoIterator<Item = &'a Member>,
    ) -> Result<&ActiveSession, Error> {
        if self.is_active() {
            return Err(Error::SessionAlreadyActive);
        }

        let members = selected_members
            .into_iter()
            .map(SessionMember::from)
            .collect();

        self.state = SessionState::Active(ActiveSession {
            members,
            edited_student_ids: BTreeMap::new(),
        });

        self.active().ok_or(Error::NoActiveSession)
    }

    /// Add `amount` to the running total of the member with `member_id`.
    ///
    /// Returns the member's new session total.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoActiveSession] if no session is in progress, or an
    /// [Error::MemberNotInSession] if the member was not selected for the
    /// session, or an [Error::InvalidAmount] if the member or session total
    /// would no longer be a finite number. The state is left unchanged on
    /// error.
    pub fn add_amount(&mut self, member_id: MemberId, amount: Amount) -> Result<f64, Error> {
        let session = self.active_mut()?;
        let session_total = session.total() + amount.value();
        let member = session.member_mut(member_id)?;

        let member_total = member.total_amount + amount.value();
        if !member_total.is_finite() || !session_total.is_finite() {
            return Err(Error::InvalidAmount(amount.to_string()));
        }

        member.total_amount = member_total;

        Ok(member.total_amount)
    }

    /// Set the session copy of a member's student ID. An empty string clears it.
    ///
    /// The edit is remembered so that it can be reconciled with the roster
    /// when the session is finished.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoActiveSession] if no session is in progress, or an
    /// [Error::MemberNotInSession] if the member was not selected for the
    /// session.
    pub fn set_student_id(&mut self, member_id: MemberId, student_id: &str) -> Result<(), Error> {
        let session = self.active_mut()?;

        let member = session.member_mut(member_id)?;
        member.student_id = if student_id.is_empty() {
            None
        } else {
            Some(student_id.to_owned())
        };

        session
            .edited_student_ids
            .insert(member_id, student_id.to_owned());

        Ok(())
    }

    /// End the session and report its total.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoActiveSession] if no session is in progress.
    pub fn finish(&mut self) -> Result<FinishedSession, Error> {
        let session = self.take_active()?;

        Ok(FinishedSession {
            total: session.total(),
            members: session.members,
            edited_student_ids: session.edited_student_ids,
        })
    }

    /// End the session without reporting anything.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoActiveSession] if no session is in progress.
    pub fn abandon(&mut self) -> Result<(), Error> {
        self.take_active().map(|_| ())
    }

    fn active_mut(&mut self) -> Result<&mut ActiveSession, Error> {
        match &mut self.state {
            SessionState::Active(session) => Ok(session),
            SessionState::Idle => Err(Error::NoActiveSession),
        }
    }

    fn take_active(&mut self) -> Result<ActiveSession, Error> {
        match std::mem::take(&mut self.state) {
            SessionState::Active(session) => Ok(session),
            SessionState::Idle => Err(Error::NoActiveSession),
        }
    }
}

#[cfg(test)]
mod session_tracker_tests {
    use std::collections::BTreeMap;

    use crate::{
        Error,
        member::{Member, MemberName},
        session::Amount,
    };

    use super::{SessionState, SessionTracker};

    fn members() -> Vec<Member> {
        vec![
            Member {
                id: 1,
                name: MemberName::new_unchecked("A"),
                total_amount: 0.0,
                student_id: Some("1001".to_owned()),
            },
            Member {
                id: 2,
                name: MemberName::new_unchecked("B"),
                total_amount: 0.0,
                student_id: None,
            },
        ]
    }

    fn amount(value: f64) -> Amount {
        Amount::new(value).unwrap()
    }

    fn totals(tracker: &SessionTracker) -> Vec<(i64, f64)> {
        tracker
            .active()
            .expect("session should be active")
            .members()
            .iter()
            .map(|member| (member.id, member.total_amount))
            .collect()
    }

    #[test]
    fn start_resets_totals_to_zero() {
        let mut members = members();
        members[0].total_amount = 123.45;
        let mut tracker = SessionTracker::new();

        tracker.start(&members).unwrap();

        assert_eq!(totals(&tracker), vec![(1, 0.0), (2, 0.0)]);
    }

    #[test]
    fn start_accepts_empty_selection() {
        let mut tracker = SessionTracker::new();

        let session = tracker.start(std::iter::empty::<&Member>()).unwrap();

        assert!(session.members().is_empty());
        assert_eq!(session.total(), 0.0);
    }

    #[test]
    fn start_fails_while_active() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();

        assert_eq!(tracker.start(&members).err(), Some(Error::SessionAlreadyActive));
    }

    #[test]
    fn add_amount_accumulates() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();

        assert_eq!(tracker.add_amount(1, amount(50.0)), Ok(50.0));
        assert_eq!(totals(&tracker), vec![(1, 50.0), (2, 0.0)]);

        assert_eq!(tracker.add_amount(1, amount(25.5)), Ok(75.5));
        assert_eq!(totals(&tracker), vec![(1, 75.5), (2, 0.0)]);
    }

    #[test]
    fn repeated_additions_equal_their_sum() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();
        let additions = [0.25, 1.5, 10.0, 3.75, 0.5];

        for value in additions {
            tracker.add_amount(2, amount(value)).unwrap();
        }

        let want: f64 = additions.iter().sum();
        assert_eq!(totals(&tracker), vec![(1, 0.0), (2, want)]);
    }

    #[test]
    fn add_amount_for_unselected_member_fails() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members[..1]).unwrap();
        let before = tracker.clone();

        assert_eq!(
            tracker.add_amount(2, amount(1.0)),
            Err(Error::MemberNotInSession(2))
        );
        assert_eq!(tracker, before);
    }

    #[test]
    fn add_amount_that_overflows_fails() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();
        tracker.add_amount(1, amount(1e308)).unwrap();
        let before = tracker.clone();

        let result = tracker.add_amount(1, amount(1e308));

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert_eq!(tracker, before);
        assert_eq!(totals(&tracker), vec![(1, 1e308), (2, 0.0)]);
    }

    #[test]
    fn add_amount_that_overflows_the_session_total_fails() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();
        tracker.add_amount(1, amount(1e308)).unwrap();
        let before = tracker.clone();

        let result = tracker.add_amount(2, amount(1e308));

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert_eq!(tracker, before);
    }

    #[test]
    fn operations_fail_when_idle() {
        let mut tracker = SessionTracker::new();

        assert_eq!(
            tracker.add_amount(1, amount(1.0)),
            Err(Error::NoActiveSession)
        );
        assert_eq!(tracker.set_student_id(1, "x"), Err(Error::NoActiveSession));
        assert_eq!(tracker.finish(), Err(Error::NoActiveSession));
        assert_eq!(tracker.abandon(), Err(Error::NoActiveSession));
    }

    #[test]
    fn finish_reports_total_and_becomes_idle() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();
        tracker.add_amount(1, amount(50.0)).unwrap();
        tracker.add_amount(1, amount(25.5)).unwrap();
        tracker.add_amount(2, amount(4.5)).unwrap();

        let finished = tracker.finish().unwrap();

        assert_eq!(finished.total, 80.0);
        assert_eq!(finished.members.len(), 2);
        assert_eq!(tracker.state(), &SessionState::Idle);
        assert_eq!(tracker.finish(), Err(Error::NoActiveSession));
    }

    #[test]
    fn finish_with_nothing_added_reports_zero() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();

        let finished = tracker.finish().unwrap();

        assert_eq!(finished.total, 0.0);
        assert!(!tracker.is_active());
    }

    #[test]
    fn set_student_id_updates_copy_and_remembers_edit() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();

        tracker.set_student_id(2, "2002").unwrap();
        tracker.set_student_id(1, "").unwrap();

        let session = tracker.active().unwrap();
        assert_eq!(session.member(2).unwrap().student_id.as_deref(), Some("2002"));
        assert_eq!(session.member(1).unwrap().student_id, None);

        let finished = tracker.finish().unwrap();
        assert_eq!(
            finished.edited_student_ids,
            BTreeMap::from([(1, String::new()), (2, "2002".to_owned())])
        );
    }

    #[test]
    fn abandon_discards_session() {
        let members = members();
        let mut tracker = SessionTracker::new();
        tracker.start(&members).unwrap();
        tracker.add_amount(1, amount(10.0)).unwrap();

        tracker.abandon().unwrap();

        assert!(!tracker.is_active());
        tracker.start(&members).unwrap();
        assert_eq!(totals(&tracker), vec![(1, 0.0), (2, 0.0)]);
    }
}
