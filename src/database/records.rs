// file: src/database/records.rs
//
// Reads and writes for the matter collections the calendar draws from.
// `lawyer_id = None` means organisation-wide.

use anyhow::{Context, Result};
use log::warn;
use sqlx::SqlitePool;

use crate::models::records::{AppointmentRow, CaseRow, InvoiceRow, TaskRow};
use crate::models::{AppointmentRecord, CaseRecord, InvoiceRecord, TaskRecord};

pub const TASK_PENDING: &str = "PENDING";
pub const TASK_COMPLETED: &str = "COMPLETED";
pub const CASE_RUNNING: &str = "RUNNING";
pub const CASE_DECIDED: &str = "DECIDED";
pub const APPOINTMENT_PENDING: &str = "PENDING";
pub const INVOICE_PENDING: &str = "pending";

/// Converts raw rows, logging and dropping the ones missing required fields.
pub(crate) fn validated<R, T>(rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = String>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed record: {}", e);
                None
            }
        })
        .collect()
}

/// Every task assigned to the lawyer, whatever its status.
pub async fn get_tasks_for_lawyer(pool: &SqlitePool, lawyer_id: &str) -> Result<Vec<TaskRecord>> {
    let rows = sqlx::query_as::<_, TaskRow>(
        "SELECT id, task_name, task_status, end_date, lawyer_id, lawyer_name FROM tasks WHERE lawyer_id = ?",
    )
    .bind(lawyer_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch lawyer tasks")?;

    Ok(validated(rows))
}

pub async fn get_pending_tasks(pool: &SqlitePool) -> Result<Vec<TaskRecord>> {
    let rows = sqlx::query_as::<_, TaskRow>(
        "SELECT id, task_name, task_status, end_date, lawyer_id, lawyer_name FROM tasks WHERE task_status = ?",
    )
    .bind(TASK_PENDING)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pending tasks")?;

    Ok(validated(rows))
}

pub async fn get_running_cases(pool: &SqlitePool, lawyer_id: Option<&str>) -> Result<Vec<CaseRecord>> {
    let rows = sqlx::query_as::<_, CaseRow>(
        r#"
        SELECT id, case_no, case_status, next_hearing, lawyer_id, lawyer_name
        FROM cases
        WHERE case_status = ? AND (? IS NULL OR lawyer_id = ?)
        "#,
    )
    .bind(CASE_RUNNING)
    .bind(lawyer_id)
    .bind(lawyer_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch running cases")?;

    Ok(validated(rows))
}

pub async fn get_pending_appointments(
    pool: &SqlitePool,
    lawyer_id: Option<&str>,
) -> Result<Vec<AppointmentRecord>> {
    let rows = sqlx::query_as::<_, AppointmentRow>(
        r#"
        SELECT id, status, date, lawyer_id, lawyer_name
        FROM appointments
        WHERE status = ? AND (? IS NULL OR lawyer_id = ?)
        "#,
    )
    .bind(APPOINTMENT_PENDING)
    .bind(lawyer_id)
    .bind(lawyer_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pending appointments")?;

    Ok(validated(rows))
}

pub async fn get_pending_invoices(pool: &SqlitePool) -> Result<Vec<InvoiceRecord>> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
        "SELECT id, total_amount, payment_status, due_date FROM invoices WHERE payment_status = ?",
    )
    .bind(INVOICE_PENDING)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pending invoices")?;

    Ok(validated(rows))
}

pub async fn upsert_task(pool: &SqlitePool, task: &TaskRecord) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO tasks (id, task_name, task_status, end_date, lawyer_id, lawyer_name) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&task.id)
    .bind(&task.task_name)
    .bind(&task.task_status)
    .bind(&task.end_date)
    .bind(task.lawyer.as_ref().map(|l| l.id.as_str()))
    .bind(task.lawyer.as_ref().map(|l| l.name.as_str()))
    .execute(pool)
    .await
    .context("Failed to save task")?;

    Ok(())
}

pub async fn upsert_case(pool: &SqlitePool, case: &CaseRecord) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO cases (id, case_no, case_status, next_hearing, lawyer_id, lawyer_name) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&case.id)
    .bind(&case.case_no)
    .bind(&case.case_status)
    .bind(&case.next_hearing)
    .bind(case.lawyer.as_ref().map(|l| l.id.as_str()))
    .bind(case.lawyer.as_ref().map(|l| l.name.as_str()))
    .execute(pool)
    .await
    .context("Failed to save case")?;

    Ok(())
}

pub async fn upsert_appointment(pool: &SqlitePool, appointment: &AppointmentRecord) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO appointments (id, status, date, lawyer_id, lawyer_name) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&appointment.id)
    .bind(&appointment.status)
    .bind(&appointment.date)
    .bind(appointment.lawyer.as_ref().map(|l| l.id.as_str()))
    .bind(appointment.lawyer.as_ref().map(|l| l.name.as_str()))
    .execute(pool)
    .await
    .context("Failed to save appointment")?;

    Ok(())
}

pub async fn upsert_invoice(pool: &SqlitePool, invoice: &InvoiceRecord) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO invoices (id, total_amount, payment_status, due_date) VALUES (?, ?, ?, ?)",
    )
    .bind(&invoice.id)
    .bind(invoice.total_amount)
    .bind(&invoice.payment_status)
    .bind(&invoice.due_date)
    .execute(pool)
    .await
    .context("Failed to save invoice")?;

    Ok(())
}
