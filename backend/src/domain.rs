use crate::db::{CourseRow, DbConnection, ExpenseRow, PaymentRow, StudentRow};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Operation-level errors surfaced to the REST layer.
///
/// `Validation` maps to 400, `NotFound` to 404 and `Database` to 500. Database
/// detail is logged but never sent to the caller.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

type DomainResult<T> = Result<T, DomainError>;

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 255;
const MAX_PHONE_LEN: usize = 50;
const MAX_LABEL_LEN: usize = 50;

const STUDENT_STATUSES: [&str; 2] = ["active", "inactive"];
const PAYMENT_STATUSES: [&str; 2] = ["pending", "completed"];
const PAYMENT_MODES: [&str; 4] = ["cash", "upi", "bank", "card"];
const EXPENSE_CATEGORIES: [&str; 6] = [
    "rent",
    "salaries",
    "utilities",
    "marketing",
    "supplies",
    "other",
];

fn validation(message: impl Into<String>) -> DomainError {
    DomainError::Validation(message.into())
}

/// Required non-empty trimmed text field.
fn require_text(value: Option<&str>, field: &str, max: usize) -> DomainResult<String> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        return Err(validation(format!("{} is required", field)));
    }
    if trimmed.len() > max {
        return Err(validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: Option<&str>, field: &str, max: usize) -> DomainResult<Option<String>> {
    match value {
        Some(v) if v.len() > max => Err(validation(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        Some(v) => Ok(Some(v.to_string())),
        None => Ok(None),
    }
}

fn validate_email(value: Option<&str>) -> DomainResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => {
            if v.len() > MAX_NAME_LEN || !v.contains('@') {
                return Err(validation("Invalid email address".to_string()));
            }
            Ok(Some(v.to_string()))
        }
        None => Ok(None),
    }
}

fn require_positive(value: Option<f64>, field: &str) -> DomainResult<f64> {
    match value {
        Some(v) if v > 0.0 => Ok(v),
        Some(_) => Err(validation(format!("{} must be positive", field))),
        None => Err(validation(format!("{} is required", field))),
    }
}

/// Case-insensitive membership check; returns the lowercased value.
fn validate_choice(value: &str, field: &str, allowed: &[&str]) -> DomainResult<String> {
    let lower = value.to_lowercase();
    if allowed.contains(&lower.as_str()) {
        Ok(lower)
    } else {
        Err(validation(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        )))
    }
}

/// Request body for student create and partial update.
///
/// Everything is optional at the serde boundary so that malformed requests get
/// a structured 400 from validation instead of a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_id: Option<String>,
    pub batch: Option<String>,
    pub status: Option<String>,
    pub enrollment_date: Option<String>,
}

impl StudentBody {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.course_id.is_none()
            && self.batch.is_none()
            && self.status.is_none()
            && self.enrollment_date.is_none()
    }
}

/// Request body for course create and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fee: Option<f64>,
    pub duration: Option<String>,
}

impl CourseBody {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.fee.is_none()
            && self.duration.is_none()
    }
}

/// Request body for payment create and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentBody {
    pub student_id: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub mode: Option<String>,
    pub status: Option<String>,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
}

impl PaymentBody {
    pub fn is_empty(&self) -> bool {
        self.student_id.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.mode.is_none()
            && self.status.is_none()
            && self.transaction_id.is_none()
            && self.description.is_none()
    }
}

/// Request body for expense create and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseBody {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub date: Option<String>,
}

impl ExpenseBody {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.mode.is_none()
            && self.date.is_none()
    }
}

/// Service for managing student records
#[derive(Clone)]
pub struct StudentService {
    db: DbConnection,
}

impl StudentService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> DomainResult<Vec<StudentRow>> {
        Ok(self.db.list_students().await?)
    }

    pub async fn get(&self, id: &str) -> DomainResult<StudentRow> {
        self.db
            .get_student(id)
            .await?
            .ok_or(DomainError::NotFound("Student"))
    }

    pub async fn create(&self, body: StudentBody) -> DomainResult<StudentRow> {
        let name = require_text(body.name.as_deref(), "Name", MAX_NAME_LEN)?;
        let email = validate_email(body.email.as_deref())?;
        let phone = optional_text(body.phone.as_deref(), "Phone", MAX_PHONE_LEN)?;
        let batch = optional_text(body.batch.as_deref(), "Batch", MAX_LABEL_LEN)?;
        let status = match body.status.as_deref() {
            Some(s) => validate_choice(s, "Status", &STUDENT_STATUSES)?,
            None => "active".to_string(),
        };

        let now = Utc::now().to_rfc3339();
        let student = StudentRow {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            course_id: body.course_id,
            course_name: None,
            batch,
            status,
            enrollment_date: body.enrollment_date.unwrap_or_else(shared::today_iso),
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.insert_student(&student).await?;
        info!("Created student {} ({})", student.name, student.id);

        // Re-fetch so the response carries the joined course name
        self.get(&student.id).await
    }

    pub async fn update(&self, id: &str, body: StudentBody) -> DomainResult<StudentRow> {
        if body.is_empty() {
            return Err(validation("No fields to update"));
        }

        let mut student = self.get(id).await?;

        if body.name.is_some() {
            student.name = require_text(body.name.as_deref(), "Name", MAX_NAME_LEN)?;
        }
        if body.email.is_some() {
            student.email = validate_email(body.email.as_deref())?;
        }
        if body.phone.is_some() {
            student.phone = optional_text(body.phone.as_deref(), "Phone", MAX_PHONE_LEN)?;
        }
        if let Some(course_id) = body.course_id {
            student.course_id = Some(course_id);
        }
        if body.batch.is_some() {
            student.batch = optional_text(body.batch.as_deref(), "Batch", MAX_LABEL_LEN)?;
        }
        if let Some(status) = body.status.as_deref() {
            student.status = validate_choice(status, "Status", &STUDENT_STATUSES)?;
        }
        if let Some(enrollment_date) = body.enrollment_date {
            student.enrollment_date = enrollment_date;
        }
        student.updated_at = Utc::now().to_rfc3339();

        self.db.update_student(&student).await?;
        info!("Updated student {}", id);

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<StudentRow> {
        let student = self.get(id).await?;
        self.db.delete_student(id).await?;
        info!("Deleted student {}", id);
        Ok(student)
    }
}

/// Service for managing course records
#[derive(Clone)]
pub struct CourseService {
    db: DbConnection,
}

impl CourseService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> DomainResult<Vec<CourseRow>> {
        Ok(self.db.list_courses().await?)
    }

    pub async fn get(&self, id: &str) -> DomainResult<CourseRow> {
        self.db
            .get_course(id)
            .await?
            .ok_or(DomainError::NotFound("Course"))
    }

    pub async fn create(&self, body: CourseBody) -> DomainResult<CourseRow> {
        let name = require_text(body.name.as_deref(), "Name", MAX_NAME_LEN)?;
        let fee = require_positive(body.fee, "Fee")?;
        let description =
            optional_text(body.description.as_deref(), "Description", MAX_DESCRIPTION_LEN)?;
        let duration = optional_text(body.duration.as_deref(), "Duration", MAX_LABEL_LEN)?;

        let course = CourseRow {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            fee,
            duration,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.insert_course(&course).await?;
        info!("Created course {} ({})", course.name, course.id);
        Ok(course)
    }

    pub async fn update(&self, id: &str, body: CourseBody) -> DomainResult<CourseRow> {
        if body.is_empty() {
            return Err(validation("No fields to update"));
        }

        let mut course = self.get(id).await?;

        if body.name.is_some() {
            course.name = require_text(body.name.as_deref(), "Name", MAX_NAME_LEN)?;
        }
        if body.description.is_some() {
            course.description =
                optional_text(body.description.as_deref(), "Description", MAX_DESCRIPTION_LEN)?;
        }
        if body.fee.is_some() {
            course.fee = require_positive(body.fee, "Fee")?;
        }
        if body.duration.is_some() {
            course.duration = optional_text(body.duration.as_deref(), "Duration", MAX_LABEL_LEN)?;
        }

        self.db.update_course(&course).await?;
        info!("Updated course {}", id);
        Ok(course)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<CourseRow> {
        let course = self.get(id).await?;
        self.db.delete_course(id).await?;
        info!("Deleted course {}", id);
        Ok(course)
    }
}

/// Service for managing payment records
#[derive(Clone)]
pub struct PaymentService {
    db: DbConnection,
}

impl PaymentService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> DomainResult<Vec<PaymentRow>> {
        Ok(self.db.list_payments().await?)
    }

    pub async fn get(&self, id: &str) -> DomainResult<PaymentRow> {
        self.db
            .get_payment(id)
            .await?
            .ok_or(DomainError::NotFound("Payment"))
    }

    pub async fn create(&self, body: PaymentBody) -> DomainResult<PaymentRow> {
        let student_id = require_text(body.student_id.as_deref(), "Student id", MAX_NAME_LEN)?;
        let amount = require_positive(body.amount, "Amount")?;
        let mode = match body.mode.as_deref() {
            Some(m) => validate_choice(m, "Mode", &PAYMENT_MODES)?,
            None => "cash".to_string(),
        };
        let status = match body.status.as_deref() {
            Some(s) => validate_choice(s, "Status", &PAYMENT_STATUSES)?,
            None => "completed".to_string(),
        };

        let payment = PaymentRow {
            id: Uuid::new_v4().to_string(),
            student_id,
            student_name: None,
            amount,
            date: body.date.unwrap_or_else(shared::today_iso),
            mode,
            status,
            transaction_id: body.transaction_id,
            description: body.description,
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.insert_payment(&payment).await?;
        info!("Created payment {} for student {}", payment.id, payment.student_id);

        // Re-fetch so the response carries the joined student name
        self.get(&payment.id).await
    }

    pub async fn update(&self, id: &str, body: PaymentBody) -> DomainResult<PaymentRow> {
        if body.is_empty() {
            return Err(validation("No fields to update"));
        }

        let mut payment = self.get(id).await?;

        if let Some(student_id) = body.student_id {
            payment.student_id = student_id;
        }
        if body.amount.is_some() {
            payment.amount = require_positive(body.amount, "Amount")?;
        }
        if let Some(date) = body.date {
            payment.date = date;
        }
        if let Some(mode) = body.mode.as_deref() {
            payment.mode = validate_choice(mode, "Mode", &PAYMENT_MODES)?;
        }
        if let Some(status) = body.status.as_deref() {
            payment.status = validate_choice(status, "Status", &PAYMENT_STATUSES)?;
        }
        if let Some(transaction_id) = body.transaction_id {
            payment.transaction_id = Some(transaction_id);
        }
        if let Some(description) = body.description {
            payment.description = Some(description);
        }

        self.db.update_payment(&payment).await?;
        info!("Updated payment {}", id);

        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> DomainResult<PaymentRow> {
        let payment = self.get(id).await?;
        self.db.delete_payment(id).await?;
        info!("Deleted payment {}", id);
        Ok(payment)
    }
}

/// Service for managing expense records
#[derive(Clone)]
pub struct ExpenseService {
    db: DbConnection,
}

impl ExpenseService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> DomainResult<Vec<ExpenseRow>> {
        Ok(self.db.list_expenses().await?)
    }

    pub async fn get(&self, id: &str) -> DomainResult<ExpenseRow> {
        self.db
            .get_expense(id)
            .await?
            .ok_or(DomainError::NotFound("Expense"))
    }

    pub async fn create(&self, body: ExpenseBody) -> DomainResult<ExpenseRow> {
        let description =
            require_text(body.description.as_deref(), "Description", MAX_DESCRIPTION_LEN)?;
        let amount = require_positive(body.amount, "Amount")?;
        let category = match body.category.as_deref() {
            Some(c) => Some(validate_choice(c, "Category", &EXPENSE_CATEGORIES)?),
            None => None,
        };
        let mode = match body.mode.as_deref() {
            Some(m) => Some(validate_choice(m, "Mode", &PAYMENT_MODES)?),
            None => None,
        };

        let expense = ExpenseRow {
            id: Uuid::new_v4().to_string(),
            description,
            amount,
            category,
            mode,
            date: body.date.unwrap_or_else(shared::today_iso),
            created_at: Utc::now().to_rfc3339(),
        };

        self.db.insert_expense(&expense).await?;
        info!("Created expense {} ({})", expense.id, expense.description);
        Ok(expense)
    }

    pub async fn update(&self, id: &str, body: ExpenseBody) -> DomainResult<ExpenseRow> {
        if body.is_empty() {
            return Err(validation("No fields to update"));
        }

        let mut expense = self.get(id).await?;

        if body.description.is_some() {
            expense.description =
                require_text(body.description.as_deref(), "Description", MAX_DESCRIPTION_LEN)?;
        }
        if body.amount.is_some() {
            expense.amount = require_positive(body.amount, "Amount")?;
        }
        if let Some(category) = body.category.as_deref() {
            expense.category = Some(validate_choice(category, "Category", &EXPENSE_CATEGORIES)?);
        }
        if let Some(mode) = body.mode.as_deref() {
            expense.mode = Some(validate_choice(mode, "Mode", &PAYMENT_MODES)?);
        }
        if let Some(date) = body.date {
            expense.date = date;
        }

        self.db.update_expense(&expense).await?;
        info!("Updated expense {}", id);
        Ok(expense)
    }

    pub async fn delete(&self, id: &str) -> DomainResult<ExpenseRow> {
        let expense = self.get(id).await?;
        self.db.delete_expense(id).await?;
        info!("Deleted expense {}", id);
        Ok(expense)
    }
}
