//! Shape mappers between raw wire records and the canonical domain model.
//!
//! The read direction (`*_to_domain`) treats the record as an untyped
//! key-value map and coerces field by field: persisted rows have drifted over
//! time (snake_case vs camelCase keys, numbers stored as strings, nullable
//! columns), and the dashboard must render something for every record it is
//! handed. Missing or unparseable values therefore map to documented defaults,
//! never to an error.
//!
//! The write direction (`*_create_payload` / `*_patch_payload`) projects only
//! the fields the write endpoints accept, renaming canonical keys to wire keys
//! and including only what is present so partial updates stay partial.

use serde_json::{json, Map, Value};
use shared::{
    Course, CoursePatch, Expense, ExpenseCategory, ExpensePatch, NewCourse, NewExpense,
    NewPayment, NewStudent, Payment, PaymentMode, PaymentPatch, PaymentStatus, Student,
    StudentPatch, StudentStatus,
};

/// First non-null string value among the aliased keys.
fn string_field(raw: &Value, keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|k| raw.get(*k).and_then(Value::as_str))
        .unwrap_or(default)
        .to_string()
}

fn opt_string_field(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| raw.get(*k).and_then(Value::as_str))
        .map(|s| s.to_string())
}

/// Numeric field parsed from a number or a numeric string; an unparseable
/// value falls through to the next alias, and everything-missing maps to 0.
fn number_field(raw: &Value, keys: &[&str]) -> f64 {
    for key in keys {
        match raw.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_f64() {
                    return v;
                }
            }
            Some(Value::String(s)) => {
                if let Ok(v) = s.trim().parse::<f64>() {
                    return v;
                }
            }
            _ => {}
        }
    }
    0.0
}

/// Date field defaulting to today's calendar date.
fn date_field(raw: &Value, keys: &[&str]) -> String {
    opt_string_field(raw, keys).unwrap_or_else(shared::today_iso)
}

/// Payment status crosses vocabularies at this boundary: the wire says
/// `completed` where the canonical model says `received`.
fn payment_status_to_domain(raw: &str) -> PaymentStatus {
    if raw.eq_ignore_ascii_case("completed") {
        PaymentStatus::Received
    } else {
        PaymentStatus::parse_or_default(raw)
    }
}

fn wire_payment_status(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Received => "completed",
        PaymentStatus::Pending => "pending",
    }
}

pub fn student_to_domain(raw: &Value) -> Student {
    Student {
        id: string_field(raw, &["id"], ""),
        name: string_field(raw, &["name"], ""),
        email: string_field(raw, &["email"], ""),
        phone: string_field(raw, &["phone"], ""),
        course: string_field(raw, &["course_name", "course"], ""),
        batch: string_field(raw, &["batch"], "Morning"),
        join_date: date_field(raw, &["enrollment_date", "joinDate"]),
        status: StudentStatus::parse_or_default(&string_field(raw, &["status"], "")),
    }
}

pub fn course_to_domain(raw: &Value) -> Course {
    Course {
        id: string_field(raw, &["id"], ""),
        name: string_field(raw, &["name"], ""),
        description: string_field(raw, &["description"], ""),
        fee_amount: number_field(raw, &["fee", "feeAmount"]),
        duration: string_field(raw, &["duration"], ""),
    }
}

pub fn payment_to_domain(raw: &Value) -> Payment {
    Payment {
        id: string_field(raw, &["id"], ""),
        student_id: string_field(raw, &["student_id", "studentId"], ""),
        student_name: string_field(raw, &["student_name", "studentName"], ""),
        amount: number_field(raw, &["amount"]),
        status: payment_status_to_domain(&string_field(raw, &["status"], "")),
        payment_mode: PaymentMode::parse_or_default(&string_field(
            raw,
            &["mode", "paymentMode"],
            "",
        )),
        transaction_id: opt_string_field(raw, &["transaction_id", "transactionId"]),
        payment_date: date_field(raw, &["date", "paymentDate"]),
        description: opt_string_field(raw, &["description"]),
    }
}

pub fn expense_to_domain(raw: &Value) -> Expense {
    Expense {
        id: string_field(raw, &["id"], ""),
        category: ExpenseCategory::parse_or_default(&string_field(raw, &["category"], "")),
        amount: number_field(raw, &["amount"]),
        description: string_field(raw, &["description"], ""),
        payment_mode: PaymentMode::parse_or_default(&string_field(
            raw,
            &["mode", "paymentMode"],
            "",
        )),
        expense_date: date_field(raw, &["date", "expenseDate"]),
    }
}

/// Write payload for creating a student.
///
/// The canonical shape references the course by name; the facade resolves the
/// name to a persisted course id before calling this.
pub fn student_create_payload(new: &NewStudent, course_id: Option<&str>) -> Value {
    let mut map = Map::new();
    map.insert("name".to_string(), json!(new.name));
    map.insert("email".to_string(), json!(new.email));
    map.insert("phone".to_string(), json!(new.phone));
    map.insert("batch".to_string(), json!(new.batch));
    map.insert("status".to_string(), json!(new.status.as_str()));
    map.insert("enrollment_date".to_string(), json!(new.join_date));
    if let Some(course_id) = course_id {
        map.insert("course_id".to_string(), json!(course_id));
    }
    Value::Object(map)
}

pub fn student_patch_payload(patch: &StudentPatch, course_id: Option<&str>) -> Value {
    let mut map = Map::new();
    if let Some(name) = &patch.name {
        map.insert("name".to_string(), json!(name));
    }
    if let Some(email) = &patch.email {
        map.insert("email".to_string(), json!(email));
    }
    if let Some(phone) = &patch.phone {
        map.insert("phone".to_string(), json!(phone));
    }
    if let Some(batch) = &patch.batch {
        map.insert("batch".to_string(), json!(batch));
    }
    if let Some(status) = patch.status {
        map.insert("status".to_string(), json!(status.as_str()));
    }
    if let Some(join_date) = &patch.join_date {
        map.insert("enrollment_date".to_string(), json!(join_date));
    }
    if let Some(course_id) = course_id {
        map.insert("course_id".to_string(), json!(course_id));
    }
    Value::Object(map)
}

pub fn course_create_payload(new: &NewCourse) -> Value {
    json!({
        "name": new.name,
        "description": new.description,
        "fee": new.fee_amount,
        "duration": new.duration,
    })
}

pub fn course_patch_payload(patch: &CoursePatch) -> Value {
    let mut map = Map::new();
    if let Some(name) = &patch.name {
        map.insert("name".to_string(), json!(name));
    }
    if let Some(description) = &patch.description {
        map.insert("description".to_string(), json!(description));
    }
    if let Some(fee_amount) = patch.fee_amount {
        map.insert("fee".to_string(), json!(fee_amount));
    }
    if let Some(duration) = &patch.duration {
        map.insert("duration".to_string(), json!(duration));
    }
    Value::Object(map)
}

pub fn payment_create_payload(new: &NewPayment) -> Value {
    let mut map = Map::new();
    map.insert("student_id".to_string(), json!(new.student_id));
    map.insert("amount".to_string(), json!(new.amount));
    map.insert("date".to_string(), json!(new.payment_date));
    map.insert("mode".to_string(), json!(new.payment_mode.as_str()));
    map.insert(
        "status".to_string(),
        json!(wire_payment_status(new.status)),
    );
    if let Some(transaction_id) = &new.transaction_id {
        map.insert("transaction_id".to_string(), json!(transaction_id));
    }
    if let Some(description) = &new.description {
        map.insert("description".to_string(), json!(description));
    }
    Value::Object(map)
}

pub fn payment_patch_payload(patch: &PaymentPatch) -> Value {
    let mut map = Map::new();
    if let Some(amount) = patch.amount {
        map.insert("amount".to_string(), json!(amount));
    }
    if let Some(status) = patch.status {
        map.insert("status".to_string(), json!(wire_payment_status(status)));
    }
    if let Some(mode) = patch.payment_mode {
        map.insert("mode".to_string(), json!(mode.as_str()));
    }
    if let Some(transaction_id) = &patch.transaction_id {
        map.insert("transaction_id".to_string(), json!(transaction_id));
    }
    if let Some(payment_date) = &patch.payment_date {
        map.insert("date".to_string(), json!(payment_date));
    }
    if let Some(description) = &patch.description {
        map.insert("description".to_string(), json!(description));
    }
    Value::Object(map)
}

pub fn expense_create_payload(new: &NewExpense) -> Value {
    json!({
        "description": new.description,
        "amount": new.amount,
        "category": new.category.as_str(),
        "mode": new.payment_mode.as_str(),
        "date": new.expense_date,
    })
}

pub fn expense_patch_payload(patch: &ExpensePatch) -> Value {
    let mut map = Map::new();
    if let Some(description) = &patch.description {
        map.insert("description".to_string(), json!(description));
    }
    if let Some(amount) = patch.amount {
        map.insert("amount".to_string(), json!(amount));
    }
    if let Some(category) = patch.category {
        map.insert("category".to_string(), json!(category.as_str()));
    }
    if let Some(mode) = patch.payment_mode {
        map.insert("mode".to_string(), json!(mode.as_str()));
    }
    if let Some(expense_date) = &patch.expense_date {
        map.insert("date".to_string(), json!(expense_date));
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_from_backend_row() {
        let raw = json!({
            "id": "abc-123",
            "name": "Rahul Sharma",
            "email": "rahul@email.com",
            "phone": "9876543210",
            "course_id": "course-1",
            "course_name": "Mathematics",
            "batch": "Morning",
            "status": "active",
            "enrollment_date": "2024-01-15",
            "created_at": "2024-01-15T10:00:00Z"
        });

        let student = student_to_domain(&raw);
        assert_eq!(student.id, "abc-123");
        assert_eq!(student.course, "Mathematics");
        assert_eq!(student.join_date, "2024-01-15");
        assert_eq!(student.status, StudentStatus::Active);
    }

    #[test]
    fn test_student_defaults_for_missing_fields() {
        let raw = json!({ "id": "s-1", "name": "Priya" });

        let student = student_to_domain(&raw);
        assert_eq!(student.email, "");
        assert_eq!(student.phone, "");
        assert_eq!(student.course, "");
        assert_eq!(student.batch, "Morning");
        assert_eq!(student.join_date, shared::today_iso());
        assert_eq!(student.status, StudentStatus::Active);
    }

    #[test]
    fn test_student_nulls_are_treated_as_missing() {
        let raw = json!({
            "id": "s-1",
            "name": "Priya",
            "email": null,
            "course_name": null,
            "course": "Physics"
        });

        let student = student_to_domain(&raw);
        assert_eq!(student.email, "");
        // Null course_name falls through to the historical alias
        assert_eq!(student.course, "Physics");
    }

    #[test]
    fn test_alias_prefers_first_key_when_both_present() {
        let raw = json!({
            "id": "s-1",
            "name": "Priya",
            "course_name": "Chemistry",
            "course": "Physics"
        });
        assert_eq!(student_to_domain(&raw).course, "Chemistry");

        let raw = json!({
            "id": "p-1",
            "mode": "upi",
            "paymentMode": "card"
        });
        assert_eq!(payment_to_domain(&raw).payment_mode, PaymentMode::Upi);
    }

    #[test]
    fn test_course_fee_parses_number_or_string() {
        let from_number = course_to_domain(&json!({ "id": "c-1", "name": "Math", "fee": 5000.0 }));
        assert_eq!(from_number.fee_amount, 5000.0);

        let from_string = course_to_domain(&json!({ "id": "c-1", "name": "Math", "fee": "4500" }));
        assert_eq!(from_string.fee_amount, 4500.0);

        // Unparseable fee falls through to the alias, then to 0
        let with_alias =
            course_to_domain(&json!({ "id": "c-1", "name": "Math", "fee": "n/a", "feeAmount": 4000.0 }));
        assert_eq!(with_alias.fee_amount, 4000.0);

        let garbage = course_to_domain(&json!({ "id": "c-1", "name": "Math", "fee": "n/a" }));
        assert_eq!(garbage.fee_amount, 0.0);

        let missing = course_to_domain(&json!({ "id": "c-1", "name": "Math" }));
        assert_eq!(missing.fee_amount, 0.0);
    }

    #[test]
    fn test_payment_status_crosses_vocabulary() {
        let completed = payment_to_domain(&json!({ "id": "p-1", "status": "completed" }));
        assert_eq!(completed.status, PaymentStatus::Received);

        let pending = payment_to_domain(&json!({ "id": "p-1", "status": "pending" }));
        assert_eq!(pending.status, PaymentStatus::Pending);

        let missing = payment_to_domain(&json!({ "id": "p-1" }));
        assert_eq!(missing.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_payment_defaults() {
        let payment = payment_to_domain(&json!({ "id": "p-1" }));
        assert_eq!(payment.payment_mode, PaymentMode::Cash);
        assert_eq!(payment.amount, 0.0);
        assert_eq!(payment.payment_date, shared::today_iso());
        assert!(payment.transaction_id.is_none());
        assert!(payment.description.is_none());
    }

    #[test]
    fn test_payment_mode_is_case_normalized() {
        let payment = payment_to_domain(&json!({ "id": "p-1", "mode": "UPI" }));
        assert_eq!(payment.payment_mode, PaymentMode::Upi);
    }

    #[test]
    fn test_expense_defaults() {
        let expense = expense_to_domain(&json!({ "id": "e-1" }));
        assert_eq!(expense.category, ExpenseCategory::Other);
        assert_eq!(expense.payment_mode, PaymentMode::Cash);
        assert_eq!(expense.description, "");
        assert_eq!(expense.expense_date, shared::today_iso());
    }

    #[test]
    fn test_expense_aliases() {
        let expense = expense_to_domain(&json!({
            "id": "e-1",
            "category": "Rent",
            "amount": "15000",
            "paymentMode": "bank",
            "expenseDate": "2024-03-01"
        }));
        assert_eq!(expense.category, ExpenseCategory::Rent);
        assert_eq!(expense.amount, 15000.0);
        assert_eq!(expense.payment_mode, PaymentMode::Bank);
        assert_eq!(expense.expense_date, "2024-03-01");
    }

    #[test]
    fn test_payment_create_payload_speaks_wire_vocabulary() {
        let new = NewPayment {
            student_id: "s-1".to_string(),
            student_name: "Rahul Sharma".to_string(),
            amount: 5000.0,
            status: PaymentStatus::Received,
            payment_mode: PaymentMode::Upi,
            transaction_id: None,
            payment_date: "2024-03-05".to_string(),
            description: None,
        };

        let payload = payment_create_payload(&new);
        assert_eq!(payload["status"], "completed");
        assert_eq!(payload["mode"], "upi");
        assert_eq!(payload["date"], "2024-03-05");
        assert_eq!(payload["student_id"], "s-1");
        // The name snapshot is display state, not a writable wire field
        assert!(payload.get("student_name").is_none());
        assert!(payload.get("transaction_id").is_none());
    }

    #[test]
    fn test_patch_payload_contains_only_present_fields() {
        let patch = PaymentPatch {
            status: Some(PaymentStatus::Received),
            ..Default::default()
        };
        let payload = payment_patch_payload(&patch);
        let map = payload.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(payload["status"], "completed");

        let patch = CoursePatch {
            fee_amount: Some(5500.0),
            ..Default::default()
        };
        let payload = course_patch_payload(&patch);
        let map = payload.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(payload["fee"], 5500.0);

        assert!(student_patch_payload(&StudentPatch::default(), None)
            .as_object()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_student_payload_renames_canonical_keys() {
        let patch = StudentPatch {
            join_date: Some("2024-02-01".to_string()),
            ..Default::default()
        };
        let payload = student_patch_payload(&patch, Some("course-1"));
        assert_eq!(payload["enrollment_date"], "2024-02-01");
        assert_eq!(payload["course_id"], "course-1");
        assert!(payload.get("joinDate").is_none());
    }

    #[test]
    fn test_round_trip_through_write_payload() {
        // A canonical record produced from a raw row, projected back through
        // the write payload and re-mapped, keeps every shared field.
        let raw = json!({
            "id": "e-1",
            "description": "Monthly rent",
            "amount": 15000.0,
            "category": "rent",
            "mode": "bank",
            "date": "2024-03-01"
        });
        let expense = expense_to_domain(&raw);

        let new = NewExpense {
            category: expense.category,
            amount: expense.amount,
            description: expense.description.clone(),
            payment_mode: expense.payment_mode,
            expense_date: expense.expense_date.clone(),
        };
        let mut wire = expense_create_payload(&new);
        wire["id"] = json!("e-1");

        assert_eq!(expense_to_domain(&wire), expense);
    }

    #[test]
    fn test_payment_round_trip_preserves_received_status() {
        let raw = json!({
            "id": "p-1",
            "student_id": "s-1",
            "student_name": "Rahul Sharma",
            "amount": 5000.0,
            "status": "completed",
            "mode": "upi",
            "date": "2024-03-05"
        });
        let payment = payment_to_domain(&raw);
        assert_eq!(payment.status, PaymentStatus::Received);

        let new = NewPayment {
            student_id: payment.student_id.clone(),
            student_name: payment.student_name.clone(),
            amount: payment.amount,
            status: payment.status,
            payment_mode: payment.payment_mode,
            transaction_id: payment.transaction_id.clone(),
            payment_date: payment.payment_date.clone(),
            description: payment.description.clone(),
        };
        let mut wire = payment_create_payload(&new);
        wire["id"] = json!("p-1");
        wire["student_name"] = json!("Rahul Sharma");

        assert_eq!(payment_to_domain(&wire), payment);
    }

    #[test]
    fn test_mappers_are_total_on_garbage_input() {
        // Every input produces an output, never a panic
        for raw in [
            json!(null),
            json!([]),
            json!("not an object"),
            json!({ "amount": {}, "status": 7, "mode": [] }),
        ] {
            let _ = student_to_domain(&raw);
            let _ = course_to_domain(&raw);
            let _ = payment_to_domain(&raw);
            let _ = expense_to_domain(&raw);
        }
    }
}
