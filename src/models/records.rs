// file: src/models/records.rs
//
// Typed views over the document-store collections the calendar reads.
// Rows come out of SQLite with every column optional; `TryFrom` checks the
// fields each record needs and the store skips rows that fail.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawyerRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub task_name: String,
    pub task_status: String,
    pub end_date: String,
    pub lawyer: Option<LawyerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub case_no: Option<String>,
    pub case_status: String,
    pub next_hearing: String,
    pub lawyer: Option<LawyerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: String,
    pub status: String,
    pub date: String,
    pub lawyer: Option<LawyerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: String,
    pub total_amount: f64,
    pub payment_status: String,
    pub due_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEventRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub start: String,
}

#[derive(Debug, FromRow)]
pub(crate) struct TaskRow {
    pub id: String,
    pub task_name: Option<String>,
    pub task_status: Option<String>,
    pub end_date: Option<String>,
    pub lawyer_id: Option<String>,
    pub lawyer_name: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct CaseRow {
    pub id: String,
    pub case_no: Option<String>,
    pub case_status: Option<String>,
    pub next_hearing: Option<String>,
    pub lawyer_id: Option<String>,
    pub lawyer_name: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct AppointmentRow {
    pub id: String,
    pub status: Option<String>,
    pub date: Option<String>,
    pub lawyer_id: Option<String>,
    pub lawyer_name: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct InvoiceRow {
    pub id: String,
    pub total_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, FromRow)]
pub(crate) struct UserEventRow {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub start: Option<String>,
}

fn required(record: &str, id: &str, field: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("{} {} is missing {}", record, id, field)),
    }
}

fn lawyer_ref(id: Option<String>, name: Option<String>) -> Option<LawyerRef> {
    id.map(|id| LawyerRef { id, name: name.unwrap_or_default() })
}

impl TryFrom<TaskRow> for TaskRecord {
    type Error = String;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            task_name: required("task", &row.id, "task_name", row.task_name)?,
            task_status: required("task", &row.id, "task_status", row.task_status)?,
            end_date: required("task", &row.id, "end_date", row.end_date)?,
            lawyer: lawyer_ref(row.lawyer_id, row.lawyer_name),
            id: row.id,
        })
    }
}

impl TryFrom<CaseRow> for CaseRecord {
    type Error = String;

    fn try_from(row: CaseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            case_status: required("case", &row.id, "case_status", row.case_status)?,
            next_hearing: required("case", &row.id, "next_hearing", row.next_hearing)?,
            case_no: row.case_no,
            lawyer: lawyer_ref(row.lawyer_id, row.lawyer_name),
            id: row.id,
        })
    }
}

impl TryFrom<AppointmentRow> for AppointmentRecord {
    type Error = String;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: required("appointment", &row.id, "status", row.status)?,
            date: required("appointment", &row.id, "date", row.date)?,
            lawyer: lawyer_ref(row.lawyer_id, row.lawyer_name),
            id: row.id,
        })
    }
}

impl TryFrom<InvoiceRow> for InvoiceRecord {
    type Error = String;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let total_amount = row
            .total_amount
            .ok_or_else(|| format!("invoice {} is missing total_amount", row.id))?;
        Ok(Self {
            total_amount,
            payment_status: required("invoice", &row.id, "payment_status", row.payment_status)?,
            due_date: required("invoice", &row.id, "due_date", row.due_date)?,
            id: row.id,
        })
    }
}

impl TryFrom<UserEventRow> for UserEventRecord {
    type Error = String;

    fn try_from(row: UserEventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required("event", &row.id, "title", row.title)?,
            start: required("event", &row.id, "start", row.start)?,
            user_id: row.user_id,
            id: row.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_row_requires_end_date() {
        let row = TaskRow {
            id: "t1".to_string(),
            task_name: Some("File reply".to_string()),
            task_status: Some("PENDING".to_string()),
            end_date: None,
            lawyer_id: None,
            lawyer_name: None,
        };
        let err = TaskRecord::try_from(row).unwrap_err();
        assert!(err.contains("end_date"));
    }

    #[test]
    fn test_task_row_with_lawyer() {
        let row = TaskRow {
            id: "t2".to_string(),
            task_name: Some("Draft notice".to_string()),
            task_status: Some("PENDING".to_string()),
            end_date: Some("2025-01-10".to_string()),
            lawyer_id: Some("l1".to_string()),
            lawyer_name: Some("A. Menon".to_string()),
        };
        let task = TaskRecord::try_from(row).unwrap();
        assert_eq!(task.end_date, "2025-01-10");
        assert_eq!(task.lawyer.unwrap().name, "A. Menon");
    }

    #[test]
    fn test_blank_field_is_missing() {
        let row = UserEventRow {
            id: "e1".to_string(),
            user_id: "u1".to_string(),
            title: Some("   ".to_string()),
            start: Some("2025-02-01T10:00:00Z".to_string()),
        };
        assert!(UserEventRecord::try_from(row).is_err());
    }
}
