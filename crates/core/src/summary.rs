//! Read-only aggregate over the session log.

use std::collections::HashMap;

use serde::Serialize;

use crate::audit_log::LogEntry;

/// Maximum number of students listed in [`Summary::top_students`].
pub const TOP_STUDENTS_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCount {
    pub student_id: String,
    pub count: usize,
}

/// Derived statistics for a log snapshot. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub average_duration_ms: i64,
    pub top_students: Vec<StudentCount>,
}

impl Summary {
    /// Summarize `entries`.
    ///
    /// Entries without a student id count toward `total` and the average but
    /// not toward `top_students`. Equal counts are ordered by student id.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let total = entries.len();

        let average_duration_ms = if total == 0 {
            0
        } else {
            let sum: i64 = entries.iter().map(|e| e.duration_ms).sum();
            (sum as f64 / total as f64).round() as i64
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for e in entries.iter().filter(|e| !e.student_id.is_empty()) {
            *counts.entry(e.student_id.as_str()).or_default() += 1;
        }

        let mut top_students: Vec<StudentCount> = counts
            .into_iter()
            .map(|(student_id, count)| StudentCount {
                student_id: student_id.to_string(),
                count,
            })
            .collect();
        top_students.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        top_students.truncate(TOP_STUDENTS_LIMIT);

        Self {
            total,
            average_duration_ms,
            top_students,
        }
    }
}
