// Role-scoped calendar aggregation.
//
// Each scope queries its sources concurrently and concatenates them in a fixed
// order: tasks, cases, appointments, invoices (organisation only), own events.

use anyhow::Result;
use log::debug;

use crate::database::Database;
use crate::utils::logging;
use crate::models::{
    AppointmentRecord, CalendarEvent, CaseRecord, EventColor, InvoiceRecord, Role, Session,
    TaskRecord, UserEventRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarScope {
    /// A lawyer's own matters.
    Own,
    /// Firm-wide view for administrators.
    Organization,
}

impl CalendarScope {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::FieldWorker => CalendarScope::Own,
            Role::Admin | Role::SuperAdmin => CalendarScope::Organization,
        }
    }

    pub fn task_event(&self, task: TaskRecord) -> CalendarEvent {
        match self {
            CalendarScope::Own => CalendarEvent {
                title: "Task Deadline".to_string(),
                start: task.end_date,
                url: format!("/task/{}", task.id),
                resource_id: task.id,
                color: EventColor::Blue,
                lawyer_id: None,
                lawyer_name: None,
            },
            CalendarScope::Organization => CalendarEvent {
                title: format!("Deadline task: {}", task.task_name),
                start: task.end_date,
                url: format!("/task/{}", task.id),
                resource_id: task.id,
                color: EventColor::Red,
                lawyer_id: task.lawyer.as_ref().map(|l| l.id.clone()),
                lawyer_name: task.lawyer.map(|l| l.name),
            },
        }
    }
}

pub fn case_event(case: CaseRecord) -> CalendarEvent {
    CalendarEvent {
        title: "Next Hearing".to_string(),
        start: case.next_hearing,
        url: format!("/case/{}", case.id),
        resource_id: case.id,
        color: EventColor::Green,
        lawyer_id: None,
        lawyer_name: None,
    }
}

pub fn appointment_event(appointment: AppointmentRecord) -> CalendarEvent {
    CalendarEvent {
        title: "Appointment".to_string(),
        start: appointment.date,
        url: format!("/appointments/{}", appointment.id),
        resource_id: appointment.id,
        color: EventColor::Purple,
        lawyer_id: None,
        lawyer_name: None,
    }
}

pub fn invoice_event(invoice: InvoiceRecord) -> CalendarEvent {
    CalendarEvent {
        title: format!("Due Date for Invoice: ₹{}", invoice.total_amount),
        start: invoice.due_date,
        url: format!("/invoices/{}", invoice.id),
        resource_id: invoice.id,
        color: EventColor::Blue,
        lawyer_id: None,
        lawyer_name: None,
    }
}

pub fn user_event(event: UserEventRecord) -> CalendarEvent {
    CalendarEvent {
        title: event.title,
        start: event.start,
        url: format!("/users/{}/events/{}", event.user_id, event.id),
        resource_id: event.id,
        color: EventColor::Orange,
        lawyer_id: None,
        lawyer_name: None,
    }
}

/// A failed source contributes nothing; the others still populate.
fn or_empty<T>(result: Result<Vec<T>>, source: &str) -> Vec<T> {
    match result {
        Ok(records) => {
            debug!("Loaded {} {} for calendar", records.len(), source);
            records
        }
        Err(e) => {
            logging::log_error_with_context(&e, &format!("calendar {}", source));
            Vec::new()
        }
    }
}

/// Builds the calendar for the signed-in user according to their role.
pub async fn aggregate(db: &Database, session: &Session) -> Vec<CalendarEvent> {
    let user_id = session.user_id.as_str();
    let scope = CalendarScope::for_role(session.role);

    let (tasks, cases, appointments, invoices, own_events) = match scope {
        CalendarScope::Own => {
            let (tasks, cases, appointments, own_events) = tokio::join!(
                db.get_tasks_for_lawyer(user_id),
                db.get_running_cases(Some(user_id)),
                db.get_pending_appointments(Some(user_id)),
                db.get_user_events(user_id),
            );
            (tasks, cases, appointments, Ok(Vec::new()), own_events)
        }
        CalendarScope::Organization => {
            tokio::join!(
                db.get_pending_tasks(),
                db.get_running_cases(None),
                db.get_pending_appointments(None),
                db.get_pending_invoices(),
                db.get_user_events(user_id),
            )
        }
    };

    let mut events = Vec::new();
    events.extend(or_empty(tasks, "tasks").into_iter().map(|t| scope.task_event(t)));
    events.extend(or_empty(cases, "cases").into_iter().map(case_event));
    events.extend(or_empty(appointments, "appointments").into_iter().map(appointment_event));
    events.extend(or_empty(invoices, "invoices").into_iter().map(invoice_event));
    events.extend(or_empty(own_events, "user events").into_iter().map(user_event));
    events
}
