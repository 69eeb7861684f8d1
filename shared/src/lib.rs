use chrono::Local;
use serde::{Deserialize, Serialize};

/// Today's date in ISO calendar-date form (YYYY-MM-DD).
///
/// Used as the fallback whenever a record arrives without a date.
pub fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
        }
    }

    /// Lenient parse: case-insensitive, anything unrecognized maps to `Active`.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "inactive" => StudentStatus::Inactive,
            _ => StudentStatus::Active,
        }
    }
}

impl Default for StudentStatus {
    fn default() -> Self {
        StudentStatus::Active
    }
}

/// Status of a fee payment.
///
/// The canonical value is `received`; the write endpoints speak `completed`
/// for the same state, and the shape mappers re-map at that boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Received,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Received => "received",
        }
    }

    /// Lenient parse: case-insensitive, anything unrecognized maps to `Pending`.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "received" => PaymentStatus::Received,
            _ => PaymentStatus::Pending,
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

/// How money moved: applies to both payments and expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    Cash,
    Upi,
    Bank,
    Card,
}

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Cash,
        PaymentMode::Upi,
        PaymentMode::Bank,
        PaymentMode::Card,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Upi => "upi",
            PaymentMode::Bank => "bank",
            PaymentMode::Card => "card",
        }
    }

    /// Display label for forms and tables.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::Bank => "Bank Transfer",
            PaymentMode::Card => "Card",
        }
    }

    /// Lenient parse: case-insensitive, anything unrecognized maps to `Cash`.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "upi" => PaymentMode::Upi,
            "bank" => PaymentMode::Bank,
            "card" => PaymentMode::Card,
            _ => PaymentMode::Cash,
        }
    }
}

impl Default for PaymentMode {
    fn default() -> Self {
        PaymentMode::Cash
    }
}

/// Spending category for center expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Rent,
    Salaries,
    Utilities,
    Marketing,
    Supplies,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Rent,
        ExpenseCategory::Salaries,
        ExpenseCategory::Utilities,
        ExpenseCategory::Marketing,
        ExpenseCategory::Supplies,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Salaries => "salaries",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Marketing => "marketing",
            ExpenseCategory::Supplies => "supplies",
            ExpenseCategory::Other => "other",
        }
    }

    /// Display label for forms and tables.
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "Rent",
            ExpenseCategory::Salaries => "Salaries",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Other => "Other",
        }
    }

    /// Lenient parse: case-insensitive, anything unrecognized maps to `Other`.
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "rent" => ExpenseCategory::Rent,
            "salaries" => ExpenseCategory::Salaries,
            "utilities" => ExpenseCategory::Utilities,
            "marketing" => ExpenseCategory::Marketing,
            "supplies" => ExpenseCategory::Supplies,
            _ => ExpenseCategory::Other,
        }
    }
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        ExpenseCategory::Other
    }
}

/// A student enrolled at the center.
///
/// `course` is the course *name*, not an id: the backend persists a course id
/// and denormalizes the name on read, so the canonical shape never carries the
/// relational reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub batch: String,
    /// ISO calendar date (YYYY-MM-DD)
    pub join_date: String,
    pub status: StudentStatus,
}

/// A course offered by the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Course fee, non-negative
    pub fee_amount: f64,
    /// Free-text duration label, e.g. "6 months"
    pub duration: String,
}

/// A fee payment from a student.
///
/// `student_name` is a display snapshot captured when the payment is created;
/// it does not track later renames of the student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// ISO calendar date (YYYY-MM-DD)
    pub payment_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An operating expense of the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub description: String,
    pub payment_mode: PaymentMode,
    /// ISO calendar date (YYYY-MM-DD)
    pub expense_date: String,
}

/// Form data for creating a student (everything but the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub course: String,
    pub batch: String,
    pub join_date: String,
    pub status: StudentStatus,
}

/// Partial update for a student; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub batch: Option<String>,
    pub join_date: Option<String>,
    pub status: Option<StudentStatus>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.course.is_none()
            && self.batch.is_none()
            && self.join_date.is_none()
            && self.status.is_none()
    }

    /// Merge this patch into an existing record.
    pub fn apply(&self, student: &mut Student) {
        if let Some(name) = &self.name {
            student.name = name.clone();
        }
        if let Some(email) = &self.email {
            student.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            student.phone = phone.clone();
        }
        if let Some(course) = &self.course {
            student.course = course.clone();
        }
        if let Some(batch) = &self.batch {
            student.batch = batch.clone();
        }
        if let Some(join_date) = &self.join_date {
            student.join_date = join_date.clone();
        }
        if let Some(status) = self.status {
            student.status = status;
        }
    }
}

/// Form data for creating a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub fee_amount: f64,
    pub duration: String,
}

/// Partial update for a course; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub fee_amount: Option<f64>,
    pub duration: Option<String>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.fee_amount.is_none()
            && self.duration.is_none()
    }

    /// Merge this patch into an existing record.
    pub fn apply(&self, course: &mut Course) {
        if let Some(name) = &self.name {
            course.name = name.clone();
        }
        if let Some(description) = &self.description {
            course.description = description.clone();
        }
        if let Some(fee_amount) = self.fee_amount {
            course.fee_amount = fee_amount;
        }
        if let Some(duration) = &self.duration {
            course.duration = duration.clone();
        }
    }
}

/// Form data for recording a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub student_id: String,
    /// Snapshot of the student's name at creation time
    pub student_name: String,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_mode: PaymentMode,
    pub transaction_id: Option<String>,
    pub payment_date: String,
    pub description: Option<String>,
}

/// Partial update for a payment; only `Some` fields are written.
///
/// The student reference and name snapshot are fixed at creation and are
/// deliberately absent here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    pub amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub payment_mode: Option<PaymentMode>,
    pub transaction_id: Option<String>,
    pub payment_date: Option<String>,
    pub description: Option<String>,
}

impl PaymentPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.status.is_none()
            && self.payment_mode.is_none()
            && self.transaction_id.is_none()
            && self.payment_date.is_none()
            && self.description.is_none()
    }

    /// Merge this patch into an existing record.
    pub fn apply(&self, payment: &mut Payment) {
        if let Some(amount) = self.amount {
            payment.amount = amount;
        }
        if let Some(status) = self.status {
            payment.status = status;
        }
        if let Some(mode) = self.payment_mode {
            payment.payment_mode = mode;
        }
        if let Some(transaction_id) = &self.transaction_id {
            payment.transaction_id = Some(transaction_id.clone());
        }
        if let Some(payment_date) = &self.payment_date {
            payment.payment_date = payment_date.clone();
        }
        if let Some(description) = &self.description {
            payment.description = Some(description.clone());
        }
    }
}

/// Form data for recording an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub category: ExpenseCategory,
    pub amount: f64,
    pub description: String,
    pub payment_mode: PaymentMode,
    pub expense_date: String,
}

/// Partial update for an expense; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    pub category: Option<ExpenseCategory>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub payment_mode: Option<PaymentMode>,
    pub expense_date: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.payment_mode.is_none()
            && self.expense_date.is_none()
    }

    /// Merge this patch into an existing record.
    pub fn apply(&self, expense: &mut Expense) {
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(description) = &self.description {
            expense.description = description.clone();
        }
        if let Some(mode) = self.payment_mode {
            expense.payment_mode = mode;
        }
        if let Some(expense_date) = &self.expense_date {
            expense.expense_date = expense_date.clone();
        }
    }
}
