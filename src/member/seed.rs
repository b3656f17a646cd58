//! Loading the initial roster from a JSON file.
//!
//! The file is only read once at start-up, nothing is ever written back.
//! It must contain a JSON array of members:
//!
//! ```json
//! [
//!     { "id": 1, "name": "Alice", "student_id": "220230323" },
//!     { "id": 2, "name": "Bob" }
//! ]
//! ```

use std::{fs, path::Path};

use crate::{
    Error,
    member::{MAX_SEED_ID, Member, MemberName},
};

/// Read the roster stored at `path`.
///
/// # Errors
///
/// Returns an [Error::InvalidRoster] if the file cannot be read or is not
/// valid JSON. Members with a blank name, a negative total or an ID above
/// [MAX_SEED_ID] are also rejected.
pub fn load_roster(path: &Path) -> Result<Vec<Member>, Error> {
    let text = fs::read_to_string(path).map_err(|error| {
        Error::InvalidRoster(format!("could not read {}: {error}", path.display()))
    })?;

    parse_roster(&text)
}

/// Parse a roster from JSON text, see [load_roster].
pub fn parse_roster(text: &str) -> Result<Vec<Member>, Error> {
    let members: Vec<Member> =
        serde_json::from_str(text).map_err(|error| Error::InvalidRoster(error.to_string()))?;

    members
        .into_iter()
        .map(|member| {
            if member.id > MAX_SEED_ID {
                return Err(Error::InvalidRoster(format!(
                    "member {} has an ID that is too large, the largest allowed is {MAX_SEED_ID}",
                    member.id
                )));
            }

            let name = MemberName::new(member.name.as_ref()).map_err(|_| {
                Error::InvalidRoster(format!("member {} has an empty name", member.id))
            })?;

            if !member.total_amount.is_finite() || member.total_amount < 0.0 {
                return Err(Error::InvalidRoster(format!(
                    "member {} has an invalid total {}",
                    member.id, member.total_amount
                )));
            }

            Ok(Member { name, ..member })
        })
        .collect()
}

#[cfg(test)]
mod parse_roster_tests {
    use crate::{
        Error,
        member::{MAX_SEED_ID, Member, MemberName},
    };

    use super::parse_roster;

    #[test]
    fn parses_members_with_optional_fields() {
        let text = r#"[
            { "id": 1, "name": "Alice", "student_id": "220230323" },
            { "id": 5, "name": " Bob ", "student_id": "" },
            { "id": 9, "name": "Carol", "total_amount": 12.5 }
        ]"#;

        let members = parse_roster(text).unwrap();

        assert_eq!(
            members,
            vec![
                Member {
                    id: 1,
                    name: MemberName::new_unchecked("Alice"),
                    total_amount: 0.0,
                    student_id: Some("220230323".to_owned()),
                },
                Member {
                    id: 5,
                    name: MemberName::new_unchecked("Bob"),
                    total_amount: 0.0,
                    student_id: None,
                },
                Member {
                    id: 9,
                    name: MemberName::new_unchecked("Carol"),
                    total_amount: 12.5,
                    student_id: None,
                },
            ]
        );
    }

    #[test]
    fn parses_example_roster() {
        let members = parse_roster(include_str!("../../roster.example.json")).unwrap();

        assert_eq!(members.len(), 9);
        assert_eq!(members[0].name, MemberName::new_unchecked("荣"));
        assert_eq!(members[0].student_id.as_deref(), Some("220230323"));
        assert_eq!(members[4].student_id, None);
        assert!(members.iter().all(|member| member.total_amount == 0.0));
    }

    #[test]
    fn rejects_blank_name() {
        let result = parse_roster(r#"[{ "id": 1, "name": "  " }]"#);

        assert!(matches!(result, Err(Error::InvalidRoster(_))));
    }

    #[test]
    fn rejects_negative_total() {
        let result = parse_roster(r#"[{ "id": 1, "name": "Alice", "total_amount": -1.0 }]"#);

        assert!(matches!(result, Err(Error::InvalidRoster(_))));
    }

    #[test]
    fn rejects_ids_that_are_too_large() {
        for id in [i64::MAX, MAX_SEED_ID + 1] {
            let text = format!(r#"[{{ "id": {id}, "name": "Alice" }}]"#);

            let result = parse_roster(&text);

            assert!(
                matches!(result, Err(Error::InvalidRoster(_))),
                "got {result:?} for ID {id}"
            );
        }
    }

    #[test]
    fn accepts_the_largest_allowed_id() {
        let text = format!(r#"[{{ "id": {MAX_SEED_ID}, "name": "Alice" }}]"#);

        let members = parse_roster(&text).unwrap();

        assert_eq!(members[0].id, MAX_SEED_ID);
    }

    #[test]
    fn rejects_malformed_json() {
        let result = parse_roster(r#"{ "id": 1 }"#);

        assert!(matches!(result, Err(Error::InvalidRoster(_))));
    }
}
