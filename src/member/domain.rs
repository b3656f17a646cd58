//! Core member domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Identifier for a member of the roster.
pub type MemberId = i64;

/// The largest ID accepted for a member loaded from a roster file.
///
/// IDs for members added later count up from the largest loaded ID, so this
/// leaves them plenty of room before [MemberId::MAX].
pub const MAX_SEED_ID: MemberId = u32::MAX as MemberId;

/// A validated, non-empty member name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct MemberName(String);

impl MemberName {
    /// Create a member name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyMemberName] if `name` is empty
    /// or only contains whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyMemberName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a member name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for MemberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for MemberName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemberName::new(s)
    }
}

impl Display for MemberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, non-empty student ID.
///
/// Only new members are required to have a student ID. Existing members may
/// have their student ID cleared, which is why [Member::student_id] is a
/// plain optional string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct StudentId(String);

impl StudentId {
    /// Create a student ID, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyStudentId] if `student_id` is
    /// empty or only contains whitespace.
    pub fn new(student_id: &str) -> Result<Self, Error> {
        let student_id = student_id.trim();

        if student_id.is_empty() {
            Err(Error::EmptyStudentId)
        } else {
            Ok(Self(student_id.to_string()))
        }
    }
}

impl AsRef<str> for StudentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person eligible to take part in reimbursement sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The unique, stable ID of the member.
    pub id: MemberId,
    /// The display name. Names do not have to be unique.
    pub name: MemberName,
    /// The total reimbursed to this member over all recorded sessions.
    #[serde(default)]
    pub total_amount: f64,
    /// The member's external student identifier, if known.
    #[serde(default, deserialize_with = "deserialize_student_id")]
    pub student_id: Option<String>,
}

/// Treat blank student IDs in seed files the same as a missing one.
fn deserialize_student_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let student_id = Option::<String>::deserialize(deserializer)?;

    Ok(student_id.filter(|id| !id.trim().is_empty()))
}

/// Form data for adding a member to the roster.
#[derive(Debug, Serialize, Deserialize)]
pub struct MemberFormData {
    /// The new member's name, trimmed before use.
    pub name: String,
    /// The new member's student ID, trimmed before use.
    pub student_id: String,
}

#[cfg(test)]
mod member_name_tests {
    use crate::Error;

    use super::{MemberName, StudentId};

    #[test]
    fn trims_whitespace() {
        let name = MemberName::new("  Alice \t").unwrap();

        assert_eq!(name.as_ref(), "Alice");
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(MemberName::new(""), Err(Error::EmptyMemberName));
        assert_eq!(MemberName::new("   "), Err(Error::EmptyMemberName));
    }

    #[test]
    fn rejects_empty_student_id() {
        assert_eq!(StudentId::new(""), Err(Error::EmptyStudentId));
        assert_eq!(StudentId::new(" \n "), Err(Error::EmptyStudentId));
    }

    #[test]
    fn student_id_is_trimmed() {
        let student_id = StudentId::new(" 220230323 ").unwrap();

        assert_eq!(student_id.to_string(), "220230323");
    }
}
