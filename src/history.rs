//! The log of completed reimbursement sessions.

use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::Error;

/// The short date-time format used to display when a session was completed,
/// e.g. "2025/3/7 14:05".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]/[month padding:none]/[day padding:none] [hour]:[minute]");

/// The aggregate result of one completed session.
#[derive(Debug, Clone, PartialEq)]
pub struct ReimbursementRecord {
    /// A unique ID derived from the time the record was created.
    pub id: String,
    /// When the record was created, formatted for display in the local timezone.
    pub date: String,
    /// The sum of every member's amount in the session.
    pub total_amount: f64,
}

/// Completed sessions, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    records: Vec<ReimbursementRecord>,
}

impl HistoryLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a record for a session that totalled `total_amount`.
    ///
    /// The log does not check `total_amount`, callers should only record
    /// sessions with a positive total.
    ///
    /// `created_at` is used for the record ID and `local_offset` for the
    /// displayed date.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidDateFormat] if `created_at` cannot be formatted.
    pub fn record(
        &mut self,
        total_amount: f64,
        created_at: OffsetDateTime,
        local_offset: UtcOffset,
    ) -> Result<&ReimbursementRecord, Error> {
        let id = self.unique_id(created_at)?;
        let date = created_at
            .to_offset(local_offset)
            .format(DISPLAY_DATE_FORMAT)
            .map_err(|error| Error::InvalidDateFormat(error.to_string(), created_at.to_string()))?;

        tracing::debug!("Recording session total {total_amount} as {id}");

        self.records.insert(
            0,
            ReimbursementRecord {
                id,
                date,
                total_amount,
            },
        );

        Ok(&self.records[0])
    }

    /// All records, most recent first.
    pub fn list(&self) -> &[ReimbursementRecord] {
        &self.records
    }

    /// The number of recorded sessions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no session has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn unique_id(&self, created_at: OffsetDateTime) -> Result<String, Error> {
        let timestamp = created_at
            .to_offset(UtcOffset::UTC)
            .format(&Rfc3339)
            .map_err(|error| Error::InvalidDateFormat(error.to_string(), created_at.to_string()))?;

        let is_taken = |id: &str| self.records.iter().any(|record| record.id == id);

        if !is_taken(&timestamp) {
            return Ok(timestamp);
        }

        let mut suffix = 1;
        loop {
            let id = format!("{timestamp}-{suffix}");

            if !is_taken(&id) {
                return Ok(id);
            }

            suffix += 1;
        }
    }
}

#[cfg(test)]
mod history_log_tests {
    use std::collections::HashSet;

    use time::{UtcOffset, macros::datetime};

    use super::HistoryLog;

    #[test]
    fn new_log_is_empty() {
        let log = HistoryLog::new();

        assert!(log.is_empty());
        assert!(log.list().is_empty());
    }

    #[test]
    fn records_are_most_recent_first() {
        let mut log = HistoryLog::new();

        log.record(10.0, datetime!(2025-03-07 06:05 UTC), UtcOffset::UTC)
            .unwrap();
        log.record(20.0, datetime!(2025-03-08 06:05 UTC), UtcOffset::UTC)
            .unwrap();
        log.record(30.0, datetime!(2025-03-09 06:05 UTC), UtcOffset::UTC)
            .unwrap();

        let totals: Vec<f64> = log.list().iter().map(|record| record.total_amount).collect();
        assert_eq!(totals, vec![30.0, 20.0, 10.0]);
    }

    #[test]
    fn id_is_derived_from_utc_timestamp() {
        let mut log = HistoryLog::new();

        let record = log
            .record(75.5, datetime!(2025-03-07 14:05:09 +8), UtcOffset::UTC)
            .unwrap();

        assert_eq!(record.id, "2025-03-07T06:05:09Z");
        assert_eq!(record.total_amount, 75.5);
    }

    #[test]
    fn date_is_formatted_in_local_offset() {
        let mut log = HistoryLog::new();
        let offset = UtcOffset::from_hms(8, 0, 0).unwrap();

        let record = log
            .record(1.0, datetime!(2025-03-07 06:05 UTC), offset)
            .unwrap();

        assert_eq!(record.date, "2025/3/7 14:05");
    }

    #[test]
    fn ids_are_unique_for_identical_timestamps() {
        let mut log = HistoryLog::new();
        let created_at = datetime!(2025-03-07 06:05 UTC);

        for total in [1.0, 2.0, 3.0, 4.0] {
            log.record(total, created_at, UtcOffset::UTC).unwrap();
        }

        let ids: HashSet<&str> = log.list().iter().map(|record| record.id.as_str()).collect();
        assert_eq!(log.len(), 4);
        assert_eq!(ids.len(), 4);
    }
}
