//! The canonical, mutable list of known members.

use crate::member::{MAX_SEED_ID, Member, MemberId, MemberName, StudentId};

/// The roster of members, kept in insertion order.
///
/// IDs are handed out from a counter that only ever increases, so an ID is
/// never reused even after the member holding it has been deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRegistry {
    members: Vec<Member>,
    next_id: MemberId,
}

impl Default for MemberRegistry {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            next_id: 1,
        }
    }
}

impl MemberRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from an existing roster, e.g. one loaded at start-up.
    ///
    /// Members with an ID that has already been seen are dropped so that IDs
    /// stay unique. Members with an ID above [MAX_SEED_ID] are dropped too.
    /// New IDs continue from the largest seeded ID.
    pub fn with_members(members: Vec<Member>) -> Self {
        let mut registry = Self::new();

        for member in members {
            if registry.get(member.id).is_some() {
                tracing::warn!(
                    "Skipping member \"{}\" with duplicate ID {}",
                    member.name,
                    member.id
                );
                continue;
            }

            if member.id > MAX_SEED_ID {
                tracing::warn!(
                    "Skipping member \"{}\" with ID {} that is too large",
                    member.name,
                    member.id
                );
                continue;
            }

            registry.next_id = registry.next_id.max(member.id + 1);
            registry.members.push(member);
        }

        registry
    }

    /// Add a member to the end of the roster with a zero total.
    pub fn add_member(&mut self, name: MemberName, student_id: StudentId) -> Member {
        let member = Member {
            id: self.next_id,
            name,
            total_amount: 0.0,
            student_id: Some(student_id.to_string()),
        };

        self.next_id += 1;
        self.members.push(member.clone());

        member
    }

    /// Remove the member with `id`.
    ///
    /// Returns the removed member, or `None` if there was no such member.
    pub fn delete_member(&mut self, id: MemberId) -> Option<Member> {
        let index = self.members.iter().position(|member| member.id == id)?;

        Some(self.members.remove(index))
    }

    /// Replace the student ID of the member with `id`.
    ///
    /// An empty string clears the student ID. Returns `false` if there is no
    /// member with `id`.
    pub fn update_student_id(&mut self, id: MemberId, student_id: &str) -> bool {
        match self.members.iter_mut().find(|member| member.id == id) {
            Some(member) => {
                member.student_id = if student_id.is_empty() {
                    None
                } else {
                    Some(student_id.to_owned())
                };
                true
            }
            None => false,
        }
    }

    /// Add `amount` to the lifetime total of the member with `id`.
    ///
    /// Returns `false` if there is no member with `id`.
    pub fn add_to_total(&mut self, id: MemberId, amount: f64) -> bool {
        match self.members.iter_mut().find(|member| member.id == id) {
            Some(member) => {
                let total = member.total_amount + amount;
                if total.is_finite() {
                    member.total_amount = total;
                } else {
                    tracing::warn!(
                        "Lifetime total for member {id} would overflow, keeping {}",
                        member.total_amount
                    );
                }
                true
            }
            None => false,
        }
    }

    /// The member with `id`, if they are on the roster.
    pub fn get(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    /// All members in insertion order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// The number of members on the roster.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
