//! Built-in sample dataset used when the backend is unreachable.
//!
//! The records are internally consistent: payments reference the sample
//! students by id and snapshot their names, and each student's `course` names
//! one of the sample courses. Dates are generated relative to today so the
//! dashboard charts always have recent activity to show.

use chrono::{Datelike, Local, Months, NaiveDate};
use shared::{
    Course, Expense, ExpenseCategory, Payment, PaymentMode, PaymentStatus, Student, StudentStatus,
};

/// Calendar date `months_ago` months back, clamped to `day` of that month.
fn sample_date(months_ago: u32, day: u32) -> String {
    let today = Local::now().date_naive();
    let base = today
        .checked_sub_months(Months::new(months_ago))
        .unwrap_or(today);
    let date = NaiveDate::from_ymd_opt(base.year(), base.month(), day)
        .or_else(|| NaiveDate::from_ymd_opt(base.year(), base.month(), 28))
        .unwrap_or(base);
    date.format("%Y-%m-%d").to_string()
}

pub fn sample_courses() -> Vec<Course> {
    vec![
        Course {
            id: "course-1".to_string(),
            name: "Mathematics".to_string(),
            description: "Advanced mathematics for grades 9-12".to_string(),
            fee_amount: 5000.0,
            duration: "6 months".to_string(),
        },
        Course {
            id: "course-2".to_string(),
            name: "Physics".to_string(),
            description: "Physics concepts and problem solving".to_string(),
            fee_amount: 4500.0,
            duration: "6 months".to_string(),
        },
        Course {
            id: "course-3".to_string(),
            name: "Chemistry".to_string(),
            description: "Organic and inorganic chemistry".to_string(),
            fee_amount: 4500.0,
            duration: "6 months".to_string(),
        },
        Course {
            id: "course-4".to_string(),
            name: "Biology".to_string(),
            description: "Biology for medical entrance".to_string(),
            fee_amount: 4000.0,
            duration: "6 months".to_string(),
        },
    ]
}

pub fn sample_students() -> Vec<Student> {
    vec![
        Student {
            id: "student-1".to_string(),
            name: "Rahul Sharma".to_string(),
            email: "rahul@email.com".to_string(),
            phone: "9876543210".to_string(),
            course: "Mathematics".to_string(),
            batch: "Morning".to_string(),
            join_date: "2024-01-15".to_string(),
            status: StudentStatus::Active,
        },
        Student {
            id: "student-2".to_string(),
            name: "Priya Patel".to_string(),
            email: "priya@email.com".to_string(),
            phone: "9876543211".to_string(),
            course: "Physics".to_string(),
            batch: "Evening".to_string(),
            join_date: "2024-02-01".to_string(),
            status: StudentStatus::Active,
        },
    ]
}

pub fn sample_payments() -> Vec<Payment> {
    vec![
        Payment {
            id: "pay-1".to_string(),
            student_id: "student-1".to_string(),
            student_name: "Rahul Sharma".to_string(),
            amount: 5000.0,
            status: PaymentStatus::Received,
            payment_mode: PaymentMode::Upi,
            transaction_id: None,
            payment_date: sample_date(1, 5),
            description: None,
        },
        Payment {
            id: "pay-2".to_string(),
            student_id: "student-2".to_string(),
            student_name: "Priya Patel".to_string(),
            amount: 4500.0,
            status: PaymentStatus::Pending,
            payment_mode: PaymentMode::Cash,
            transaction_id: None,
            payment_date: sample_date(0, 10),
            description: None,
        },
    ]
}

pub fn sample_expenses() -> Vec<Expense> {
    vec![
        Expense {
            id: "exp-1".to_string(),
            category: ExpenseCategory::Rent,
            amount: 15000.0,
            description: "Monthly rent".to_string(),
            payment_mode: PaymentMode::Bank,
            expense_date: sample_date(0, 1),
        },
        Expense {
            id: "exp-2".to_string(),
            category: ExpenseCategory::Utilities,
            amount: 3500.0,
            description: "Electricity bill".to_string(),
            payment_mode: PaymentMode::Upi,
            expense_date: sample_date(0, 5),
        },
    ]
}
