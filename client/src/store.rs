//! Data access facade with connected and offline operation.
//!
//! [`DataStore`] probes the backend once per session during [`DataStore::load`]
//! and commits to one of two modes for every operation that follows:
//!
//! - **Connected**: reads and mutations go through the REST API; raw wire
//!   records are translated by the shape mappers and the in-memory collections
//!   mirror what the server confirmed.
//! - **Offline**: collections start from the built-in sample dataset and all
//!   mutations apply to memory only, with locally generated ids.
//!
//! Either way the dashboard sees the same canonical collections and the same
//! operation surface. Failed operations leave the collections untouched.

use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use shared::{
    Course, CoursePatch, Expense, ExpensePatch, NewCourse, NewExpense, NewPayment, NewStudent,
    Payment, PaymentPatch, Student, StudentPatch,
};

use crate::api::{ApiClient, ApiError};
use crate::mappers;
use crate::sample;

/// Outcome of the session's backend probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// No probe has run yet; collections are empty.
    Unknown,
    /// Backend reachable; operations go over the wire.
    Connected,
    /// Backend unreachable; operations apply to the sample dataset in memory.
    Offline,
}

/// Operation failure as surfaced to the dashboard.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Transport(String),
    #[error("{0}")]
    Unhandled(String),
}

impl StoreError {
    fn from_api(err: ApiError, entity: &'static str) -> Self {
        match err {
            ApiError::Status { code: 400, message } => StoreError::Validation(message),
            ApiError::Status { code: 404, .. } => StoreError::NotFound(entity),
            ApiError::Status { message, .. } => StoreError::Unhandled(message),
            ApiError::Network(message) => StoreError::Transport(message),
        }
    }
}

/// User-facing event emitted by store operations, for toast-style display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    /// Informational: the store fell back to the sample dataset.
    Fallback,
    Error,
}

type NotificationHook = Box<dyn Fn(Notification) + Send + Sync>;

pub struct DataStore {
    api: ApiClient,
    mode: ConnectionMode,
    students: Vec<Student>,
    courses: Vec<Course>,
    payments: Vec<Payment>,
    expenses: Vec<Expense>,
    notify_hook: Option<NotificationHook>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::with_api(ApiClient::new())
    }

    pub fn with_api(api: ApiClient) -> Self {
        Self {
            api,
            mode: ConnectionMode::Unknown,
            students: Vec::new(),
            courses: Vec::new(),
            payments: Vec::new(),
            expenses: Vec::new(),
            notify_hook: None,
        }
    }

    /// Register a sink for user-facing notifications.
    pub fn on_notification(&mut self, hook: impl Fn(Notification) + Send + Sync + 'static) {
        self.notify_hook = Some(Box::new(hook));
    }

    fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        if let Some(hook) = &self.notify_hook {
            hook(Notification {
                kind,
                message: message.into(),
            });
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Probe the backend and populate the collections.
    ///
    /// The mode decided here is sticky for the rest of the session: a later
    /// transport failure in connected mode surfaces as an error rather than a
    /// silent switch to offline data.
    pub async fn load(&mut self) {
        match self.api.health().await {
            Ok(_) => {
                self.mode = ConnectionMode::Connected;
                if let Err(err) = self.fetch_all().await {
                    warn!("initial data load failed: {}", err);
                    self.load_sample_data();
                    self.notify(
                        NotificationKind::Error,
                        "Failed to load data from API, using sample data",
                    );
                } else {
                    info!("connected to backend, data loaded");
                }
            }
            Err(err) => {
                info!("backend not reachable ({}), using sample data", err);
                self.mode = ConnectionMode::Offline;
                self.load_sample_data();
                self.notify(
                    NotificationKind::Fallback,
                    "Backend not connected - using sample data. Start your local server at http://localhost:3001",
                );
            }
        }
    }

    /// Re-fetch every collection wholesale. Offline, this resets the
    /// collections to the sample dataset.
    pub async fn refresh(&mut self) -> Result<(), StoreError> {
        match self.mode {
            ConnectionMode::Connected => self
                .fetch_all()
                .await
                .map_err(|e| StoreError::from_api(e, "Data")),
            _ => {
                self.load_sample_data();
                Ok(())
            }
        }
    }

    async fn fetch_all(&mut self) -> Result<(), ApiError> {
        let students = self.api.list("students").await?;
        let courses = self.api.list("courses").await?;
        let payments = self.api.list("payments").await?;
        let expenses = self.api.list("expenses").await?;

        self.students = students.iter().map(mappers::student_to_domain).collect();
        self.courses = courses.iter().map(mappers::course_to_domain).collect();
        self.payments = payments.iter().map(mappers::payment_to_domain).collect();
        self.expenses = expenses.iter().map(mappers::expense_to_domain).collect();
        Ok(())
    }

    fn load_sample_data(&mut self) {
        self.students = sample::sample_students();
        self.courses = sample::sample_courses();
        self.payments = sample::sample_payments();
        self.expenses = sample::sample_expenses();
    }

    fn connected(&self) -> bool {
        self.mode == ConnectionMode::Connected
    }

    /// Resolve a course name from the canonical shape to the persisted id the
    /// write endpoints expect.
    fn course_id_for(&self, name: &str) -> Option<String> {
        self.courses
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.clone())
    }

    // ---- students ----

    pub async fn add_student(&mut self, new: NewStudent) -> Result<Student, StoreError> {
        if self.connected() {
            let course_id = self.course_id_for(&new.course);
            let payload = mappers::student_create_payload(&new, course_id.as_deref());
            let raw = self
                .api
                .create("students", &payload)
                .await
                .map_err(|e| self.report(e, "Student", "Failed to add student"))?;
            let student = mappers::student_to_domain(&raw);
            self.students.push(student.clone());
            self.notify(NotificationKind::Success, "Student added");
            Ok(student)
        } else {
            let student = Student {
                id: Uuid::new_v4().to_string(),
                name: new.name,
                email: new.email,
                phone: new.phone,
                course: new.course,
                batch: new.batch,
                join_date: new.join_date,
                status: new.status,
            };
            self.students.push(student.clone());
            self.notify(NotificationKind::Success, "Student added (offline mode)");
            Ok(student)
        }
    }

    pub async fn update_student(
        &mut self,
        id: &str,
        patch: StudentPatch,
    ) -> Result<Student, StoreError> {
        if patch.is_empty() {
            return Err(self.fail(StoreError::Validation(
                "No fields to update".to_string(),
            )));
        }
        if self.connected() {
            let course_id = patch.course.as_deref().and_then(|c| self.course_id_for(c));
            let payload = mappers::student_patch_payload(&patch, course_id.as_deref());
            let raw = self
                .api
                .update("students", id, &payload)
                .await
                .map_err(|e| self.report(e, "Student", "Failed to update student"))?;
            let student = mappers::student_to_domain(&raw);
            if let Some(existing) = self.students.iter_mut().find(|s| s.id == student.id) {
                *existing = student.clone();
            }
            self.notify(NotificationKind::Success, "Student updated");
            Ok(student)
        } else {
            let index = match self.students.iter().position(|s| s.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Student"))),
            };
            patch.apply(&mut self.students[index]);
            let updated = self.students[index].clone();
            self.notify(NotificationKind::Success, "Student updated (offline mode)");
            Ok(updated)
        }
    }

    pub async fn delete_student(&mut self, id: &str) -> Result<(), StoreError> {
        if self.connected() {
            self.api
                .delete("students", id)
                .await
                .map_err(|e| self.report(e, "Student", "Failed to delete student"))?;
            self.students.retain(|s| s.id != id);
            self.notify(NotificationKind::Success, "Student deleted");
        } else {
            let index = match self.students.iter().position(|s| s.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Student"))),
            };
            self.students.remove(index);
            self.notify(NotificationKind::Success, "Student deleted (offline mode)");
        }
        Ok(())
    }

    // ---- courses ----

    pub async fn add_course(&mut self, new: NewCourse) -> Result<Course, StoreError> {
        if self.connected() {
            let payload = mappers::course_create_payload(&new);
            let raw = self
                .api
                .create("courses", &payload)
                .await
                .map_err(|e| self.report(e, "Course", "Failed to add course"))?;
            let course = mappers::course_to_domain(&raw);
            self.courses.push(course.clone());
            self.notify(NotificationKind::Success, "Course added");
            Ok(course)
        } else {
            let course = Course {
                id: Uuid::new_v4().to_string(),
                name: new.name,
                description: new.description,
                fee_amount: new.fee_amount,
                duration: new.duration,
            };
            self.courses.push(course.clone());
            self.notify(NotificationKind::Success, "Course added (offline mode)");
            Ok(course)
        }
    }

    pub async fn update_course(
        &mut self,
        id: &str,
        patch: CoursePatch,
    ) -> Result<Course, StoreError> {
        if patch.is_empty() {
            return Err(self.fail(StoreError::Validation(
                "No fields to update".to_string(),
            )));
        }
        if self.connected() {
            let payload = mappers::course_patch_payload(&patch);
            let raw = self
                .api
                .update("courses", id, &payload)
                .await
                .map_err(|e| self.report(e, "Course", "Failed to update course"))?;
            let course = mappers::course_to_domain(&raw);
            if let Some(existing) = self.courses.iter_mut().find(|c| c.id == course.id) {
                *existing = course.clone();
            }
            self.notify(NotificationKind::Success, "Course updated");
            Ok(course)
        } else {
            let index = match self.courses.iter().position(|c| c.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Course"))),
            };
            patch.apply(&mut self.courses[index]);
            let updated = self.courses[index].clone();
            self.notify(NotificationKind::Success, "Course updated (offline mode)");
            Ok(updated)
        }
    }

    pub async fn delete_course(&mut self, id: &str) -> Result<(), StoreError> {
        if self.connected() {
            self.api
                .delete("courses", id)
                .await
                .map_err(|e| self.report(e, "Course", "Failed to delete course"))?;
            self.courses.retain(|c| c.id != id);
            self.notify(NotificationKind::Success, "Course deleted");
        } else {
            let index = match self.courses.iter().position(|c| c.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Course"))),
            };
            self.courses.remove(index);
            self.notify(NotificationKind::Success, "Course deleted (offline mode)");
        }
        Ok(())
    }

    // ---- payments ----

    pub async fn add_payment(&mut self, new: NewPayment) -> Result<Payment, StoreError> {
        if self.connected() {
            let payload = mappers::payment_create_payload(&new);
            let mut raw = self
                .api
                .create("payments", &payload)
                .await
                .map_err(|e| self.report(e, "Payment", "Failed to add payment"))?;
            // The create response may predate the joined name; re-attach the
            // snapshot taken from the form.
            if raw.get("student_name").map_or(true, |v| v.is_null()) {
                raw["student_name"] = json!(new.student_name);
            }
            let payment = mappers::payment_to_domain(&raw);
            self.payments.push(payment.clone());
            self.notify(NotificationKind::Success, "Payment added");
            Ok(payment)
        } else {
            let payment = Payment {
                id: Uuid::new_v4().to_string(),
                student_id: new.student_id,
                student_name: new.student_name,
                amount: new.amount,
                status: new.status,
                payment_mode: new.payment_mode,
                transaction_id: new.transaction_id,
                payment_date: new.payment_date,
                description: new.description,
            };
            self.payments.push(payment.clone());
            self.notify(NotificationKind::Success, "Payment added (offline mode)");
            Ok(payment)
        }
    }

    pub async fn update_payment(
        &mut self,
        id: &str,
        patch: PaymentPatch,
    ) -> Result<Payment, StoreError> {
        if patch.is_empty() {
            return Err(self.fail(StoreError::Validation(
                "No fields to update".to_string(),
            )));
        }
        if self.connected() {
            let payload = mappers::payment_patch_payload(&patch);
            let raw = self
                .api
                .update("payments", id, &payload)
                .await
                .map_err(|e| self.report(e, "Payment", "Failed to update payment"))?;
            let payment = mappers::payment_to_domain(&raw);
            if let Some(existing) = self.payments.iter_mut().find(|p| p.id == payment.id) {
                *existing = payment.clone();
            }
            self.notify(NotificationKind::Success, "Payment updated");
            Ok(payment)
        } else {
            let index = match self.payments.iter().position(|p| p.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Payment"))),
            };
            patch.apply(&mut self.payments[index]);
            let updated = self.payments[index].clone();
            self.notify(NotificationKind::Success, "Payment updated (offline mode)");
            Ok(updated)
        }
    }

    pub async fn delete_payment(&mut self, id: &str) -> Result<(), StoreError> {
        if self.connected() {
            self.api
                .delete("payments", id)
                .await
                .map_err(|e| self.report(e, "Payment", "Failed to delete payment"))?;
            self.payments.retain(|p| p.id != id);
            self.notify(NotificationKind::Success, "Payment deleted");
        } else {
            let index = match self.payments.iter().position(|p| p.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Payment"))),
            };
            self.payments.remove(index);
            self.notify(NotificationKind::Success, "Payment deleted (offline mode)");
        }
        Ok(())
    }

    // ---- expenses ----

    pub async fn add_expense(&mut self, new: NewExpense) -> Result<Expense, StoreError> {
        if self.connected() {
            let payload = mappers::expense_create_payload(&new);
            let raw = self
                .api
                .create("expenses", &payload)
                .await
                .map_err(|e| self.report(e, "Expense", "Failed to add expense"))?;
            let expense = mappers::expense_to_domain(&raw);
            self.expenses.push(expense.clone());
            self.notify(NotificationKind::Success, "Expense added");
            Ok(expense)
        } else {
            let expense = Expense {
                id: Uuid::new_v4().to_string(),
                category: new.category,
                amount: new.amount,
                description: new.description,
                payment_mode: new.payment_mode,
                expense_date: new.expense_date,
            };
            self.expenses.push(expense.clone());
            self.notify(NotificationKind::Success, "Expense added (offline mode)");
            Ok(expense)
        }
    }

    pub async fn update_expense(
        &mut self,
        id: &str,
        patch: ExpensePatch,
    ) -> Result<Expense, StoreError> {
        if patch.is_empty() {
            return Err(self.fail(StoreError::Validation(
                "No fields to update".to_string(),
            )));
        }
        if self.connected() {
            let payload = mappers::expense_patch_payload(&patch);
            let raw = self
                .api
                .update("expenses", id, &payload)
                .await
                .map_err(|e| self.report(e, "Expense", "Failed to update expense"))?;
            let expense = mappers::expense_to_domain(&raw);
            if let Some(existing) = self.expenses.iter_mut().find(|e| e.id == expense.id) {
                *existing = expense.clone();
            }
            self.notify(NotificationKind::Success, "Expense updated");
            Ok(expense)
        } else {
            let index = match self.expenses.iter().position(|e| e.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Expense"))),
            };
            patch.apply(&mut self.expenses[index]);
            let updated = self.expenses[index].clone();
            self.notify(NotificationKind::Success, "Expense updated (offline mode)");
            Ok(updated)
        }
    }

    pub async fn delete_expense(&mut self, id: &str) -> Result<(), StoreError> {
        if self.connected() {
            self.api
                .delete("expenses", id)
                .await
                .map_err(|e| self.report(e, "Expense", "Failed to delete expense"))?;
            self.expenses.retain(|e| e.id != id);
            self.notify(NotificationKind::Success, "Expense deleted");
        } else {
            let index = match self.expenses.iter().position(|e| e.id == id) {
                Some(index) => index,
                None => return Err(self.fail(StoreError::NotFound("Expense"))),
            };
            self.expenses.remove(index);
            self.notify(NotificationKind::Success, "Expense deleted (offline mode)");
        }
        Ok(())
    }

    /// Every failed mutation emits an error notification, whichever mode or
    /// validation path it failed on.
    fn fail(&self, err: StoreError) -> StoreError {
        self.notify(NotificationKind::Error, err.to_string());
        err
    }

    /// Convert a transport error, emitting the error notification the
    /// dashboard shows as a toast.
    fn report(&self, err: ApiError, entity: &'static str, fallback_message: &str) -> StoreError {
        let store_err = StoreError::from_api(err, entity);
        let message = match &store_err {
            StoreError::Transport(_) => fallback_message.to_string(),
            other => other.to_string(),
        };
        self.notify(NotificationKind::Error, message);
        store_err
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use shared::{ExpenseCategory, PaymentMode, PaymentStatus, StudentStatus};

    /// Nothing listens on TCP port 9, so every request fails at the transport
    /// layer and the store settles into offline mode.
    fn offline_store() -> DataStore {
        DataStore::with_api(ApiClient::with_base_url(
            "http://127.0.0.1:9/api".to_string(),
        ))
    }

    fn new_course() -> NewCourse {
        NewCourse {
            name: "Computer Science".to_string(),
            description: "Programming fundamentals".to_string(),
            fee_amount: 6000.0,
            duration: "12 months".to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_falls_back_to_sample_data() {
        let mut store = offline_store();
        assert_eq!(store.mode(), ConnectionMode::Unknown);

        store.load().await;

        assert_eq!(store.mode(), ConnectionMode::Offline);
        let names: Vec<&str> = store.courses().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Mathematics", "Physics", "Chemistry", "Biology"]);
        assert_eq!(store.students().len(), 2);
        assert_eq!(store.payments().len(), 2);
        assert_eq!(store.expenses().len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_emits_notification() {
        let seen: Arc<Mutex<Vec<Notification>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut store = offline_store();
        store.on_notification(move |n| sink.lock().unwrap().push(n));
        store.load().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, NotificationKind::Fallback);
        assert!(seen[0].message.contains("using sample data"));
    }

    #[tokio::test]
    async fn test_offline_add_course_generates_unique_ids() {
        let mut store = offline_store();
        store.load().await;

        let a = store.add_course(new_course()).await.unwrap();
        let b = store.add_course(new_course()).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
        assert_eq!(store.courses().len(), 6);
    }

    #[tokio::test]
    async fn test_offline_update_applies_patch_in_place() {
        let mut store = offline_store();
        store.load().await;

        let updated = store
            .update_course(
                "course-1",
                CoursePatch {
                    fee_amount: Some(5500.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.fee_amount, 5500.0);
        assert_eq!(updated.name, "Mathematics");
        let stored = store.courses().iter().find(|c| c.id == "course-1").unwrap();
        assert_eq!(stored.fee_amount, 5500.0);
    }

    #[tokio::test]
    async fn test_offline_update_missing_id_leaves_collection_unchanged() {
        let mut store = offline_store();
        store.load().await;
        let before = store.students().to_vec();

        let result = store
            .update_student(
                "no-such-id",
                StudentPatch {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(StoreError::NotFound("Student"))));
        assert_eq!(store.students(), before.as_slice());
    }

    #[tokio::test]
    async fn test_empty_patch_is_rejected_before_any_routing() {
        let mut store = offline_store();
        store.load().await;

        let result = store.update_payment("pay-1", PaymentPatch::default()).await;
        match result {
            Err(StoreError::Validation(message)) => {
                assert_eq!(message, "No fields to update");
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_failed_mutations_emit_error_notifications() {
        let seen: Arc<Mutex<Vec<Notification>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut store = offline_store();
        store.load().await;
        // Registered after load so only operation failures are captured
        store.on_notification(move |n| sink.lock().unwrap().push(n));

        store
            .update_payment("pay-1", PaymentPatch::default())
            .await
            .unwrap_err();
        store
            .update_student(
                "no-such-id",
                StudentPatch {
                    name: Some("Ghost".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        store.delete_expense("no-such-id").await.unwrap_err();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|n| n.kind == NotificationKind::Error));
        assert_eq!(seen[0].message, "No fields to update");
        assert_eq!(seen[1].message, "Student not found");
        assert_eq!(seen[2].message, "Expense not found");
    }

    #[tokio::test]
    async fn test_offline_delete_and_missing_delete() {
        let mut store = offline_store();
        store.load().await;

        store.delete_expense("exp-1").await.unwrap();
        assert_eq!(store.expenses().len(), 1);

        let result = store.delete_expense("exp-1").await;
        assert!(matches!(result, Err(StoreError::NotFound("Expense"))));
        assert_eq!(store.expenses().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_payment_keeps_canonical_status() {
        let mut store = offline_store();
        store.load().await;

        let payment = store
            .add_payment(NewPayment {
                student_id: "student-1".to_string(),
                student_name: "Rahul Sharma".to_string(),
                amount: 2500.0,
                status: PaymentStatus::Received,
                payment_mode: PaymentMode::Card,
                transaction_id: Some("TXN-1".to_string()),
                payment_date: "2024-04-01".to_string(),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Received);
        assert_eq!(payment.student_name, "Rahul Sharma");

        let updated = store
            .update_payment(
                &payment.id,
                PaymentPatch {
                    status: Some(PaymentStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, PaymentStatus::Pending);
        assert_eq!(updated.payment_mode, PaymentMode::Card);
    }

    #[tokio::test]
    async fn test_offline_add_student_uses_form_values() {
        let mut store = offline_store();
        store.load().await;

        let student = store
            .add_student(NewStudent {
                name: "Amit Kumar".to_string(),
                email: "amit@email.com".to_string(),
                phone: "9876543212".to_string(),
                course: "Chemistry".to_string(),
                batch: "Evening".to_string(),
                join_date: "2024-03-10".to_string(),
                status: StudentStatus::Active,
            })
            .await
            .unwrap();

        assert_eq!(student.course, "Chemistry");
        assert_eq!(store.students().len(), 3);
    }

    #[tokio::test]
    async fn test_offline_expense_crud() {
        let mut store = offline_store();
        store.load().await;

        let expense = store
            .add_expense(NewExpense {
                category: ExpenseCategory::Marketing,
                amount: 2000.0,
                description: "Flyers".to_string(),
                payment_mode: PaymentMode::Cash,
                expense_date: "2024-04-02".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(store.expenses().len(), 3);

        let updated = store
            .update_expense(
                &expense.id,
                ExpensePatch {
                    amount: Some(2500.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.amount, 2500.0);
        assert_eq!(updated.category, ExpenseCategory::Marketing);
    }

    #[tokio::test]
    async fn test_refresh_resets_offline_collections() {
        let mut store = offline_store();
        store.load().await;

        store.add_course(new_course()).await.unwrap();
        assert_eq!(store.courses().len(), 5);

        store.refresh().await.unwrap();
        assert_eq!(store.courses().len(), 4);
    }

    #[tokio::test]
    async fn test_mode_is_sticky_across_operations() {
        let mut store = offline_store();
        store.load().await;
        assert_eq!(store.mode(), ConnectionMode::Offline);

        store.add_course(new_course()).await.unwrap();
        store.delete_course("course-4").await.unwrap();
        assert_eq!(store.mode(), ConnectionMode::Offline);
    }
}
