use anyhow::Result;
use serde::Serialize;
use sqlx::{migrate::MigrateDatabase, FromRow, Sqlite, SqlitePool};
use std::sync::Arc;

// The database URL for the production database
const DATABASE_URL: &str = "sqlite:finflow.db";

/// A persisted student row, in wire shape.
///
/// `course_name` is not a column; every student SELECT joins it in from the
/// courses table so list and single-record responses carry the denormalized
/// course name.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub batch: Option<String>,
    pub status: String,
    pub enrollment_date: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A persisted course row, in wire shape.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub fee: f64,
    pub duration: Option<String>,
    pub created_at: String,
}

/// A persisted payment row, in wire shape.
///
/// `status` holds the wire vocabulary (`pending`/`completed`); `student_name`
/// is joined in from the students table on every SELECT.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PaymentRow {
    pub id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub amount: f64,
    pub date: String,
    pub mode: String,
    pub status: String,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
}

/// A persisted expense row, in wire shape.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub date: String,
    pub created_at: String,
}

const STUDENT_SELECT: &str = r#"
    SELECT s.id, s.name, s.email, s.phone, s.course_id, c.name AS course_name,
           s.batch, s.status, s.enrollment_date, s.created_at, s.updated_at
    FROM students s
    LEFT JOIN courses c ON s.course_id = c.id
"#;

const PAYMENT_SELECT: &str = r#"
    SELECT p.id, p.student_id, s.name AS student_name, p.amount, p.date,
           p.mode, p.status, p.transaction_id, p.description, p.created_at
    FROM payments p
    LEFT JOIN students s ON p.student_id = s.id
"#;

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?
        }

        // Connect to the database
        let pool = SqlitePool::connect(url).await?;

        // Setup database schema
        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the standard database
    pub async fn init() -> Result<Self> {
        Self::new(DATABASE_URL).await
    }

    /// Initialize a test database with a unique name
    pub async fn init_test() -> Result<Self> {
        // Generate a unique database name for tests
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url).await
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                course_id TEXT,
                batch TEXT,
                status TEXT NOT NULL DEFAULT 'active',
                enrollment_date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS courses (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                fee REAL NOT NULL,
                duration TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                mode TEXT NOT NULL DEFAULT 'cash',
                status TEXT NOT NULL DEFAULT 'completed',
                transaction_id TEXT,
                description TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT,
                mode TEXT,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ---- students ----

    pub async fn list_students(&self) -> Result<Vec<StudentRow>> {
        let rows = sqlx::query_as::<_, StudentRow>(&format!(
            "{} ORDER BY s.created_at DESC",
            STUDENT_SELECT
        ))
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_student(&self, id: &str) -> Result<Option<StudentRow>> {
        let row = sqlx::query_as::<_, StudentRow>(&format!("{} WHERE s.id = ?", STUDENT_SELECT))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row)
    }

    pub async fn insert_student(&self, student: &StudentRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO students (id, name, email, phone, course_id, batch, status,
                                  enrollment_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.course_id)
        .bind(&student.batch)
        .bind(&student.status)
        .bind(&student.enrollment_date)
        .bind(&student.created_at)
        .bind(&student.updated_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_student(&self, student: &StudentRow) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students
            SET name = ?, email = ?, phone = ?, course_id = ?, batch = ?,
                status = ?, enrollment_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(&student.course_id)
        .bind(&student.batch)
        .bind(&student.status)
        .bind(&student.enrollment_date)
        .bind(&student.updated_at)
        .bind(&student.id)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_student(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- courses ----

    pub async fn list_courses(&self) -> Result<Vec<CourseRow>> {
        let rows =
            sqlx::query_as::<_, CourseRow>("SELECT * FROM courses ORDER BY created_at DESC")
                .fetch_all(&*self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn get_course(&self, id: &str) -> Result<Option<CourseRow>> {
        let row = sqlx::query_as::<_, CourseRow>("SELECT * FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row)
    }

    pub async fn insert_course(&self, course: &CourseRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (id, name, description, fee, duration, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&course.id)
        .bind(&course.name)
        .bind(&course.description)
        .bind(course.fee)
        .bind(&course.duration)
        .bind(&course.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_course(&self, course: &CourseRow) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE courses
            SET name = ?, description = ?, fee = ?, duration = ?
            WHERE id = ?
            "#,
        )
        .bind(&course.name)
        .bind(&course.description)
        .bind(course.fee)
        .bind(&course.duration)
        .bind(&course.id)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_course(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- payments ----

    pub async fn list_payments(&self) -> Result<Vec<PaymentRow>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            "{} ORDER BY p.created_at DESC",
            PAYMENT_SELECT
        ))
        .fetch_all(&*self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_payment(&self, id: &str) -> Result<Option<PaymentRow>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!("{} WHERE p.id = ?", PAYMENT_SELECT))
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row)
    }

    pub async fn insert_payment(&self, payment: &PaymentRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, student_id, amount, date, mode, status,
                                  transaction_id, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.student_id)
        .bind(payment.amount)
        .bind(&payment.date)
        .bind(&payment.mode)
        .bind(&payment.status)
        .bind(&payment.transaction_id)
        .bind(&payment.description)
        .bind(&payment.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_payment(&self, payment: &PaymentRow) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET amount = ?, date = ?, mode = ?, status = ?, transaction_id = ?,
                description = ?
            WHERE id = ?
            "#,
        )
        .bind(payment.amount)
        .bind(&payment.date)
        .bind(&payment.mode)
        .bind(&payment.status)
        .bind(&payment.transaction_id)
        .bind(&payment.description)
        .bind(&payment.id)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_payment(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---- expenses ----

    pub async fn list_expenses(&self) -> Result<Vec<ExpenseRow>> {
        let rows =
            sqlx::query_as::<_, ExpenseRow>("SELECT * FROM expenses ORDER BY created_at DESC")
                .fetch_all(&*self.pool)
                .await?;
        Ok(rows)
    }

    pub async fn get_expense(&self, id: &str) -> Result<Option<ExpenseRow>> {
        let row = sqlx::query_as::<_, ExpenseRow>("SELECT * FROM expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row)
    }

    pub async fn insert_expense(&self, expense: &ExpenseRow) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expenses (id, description, amount, category, mode, date, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.mode)
        .bind(&expense.date)
        .bind(&expense.created_at)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_expense(&self, expense: &ExpenseRow) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE expenses
            SET description = ?, amount = ?, category = ?, mode = ?, date = ?
            WHERE id = ?
            "#,
        )
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.mode)
        .bind(&expense.date)
        .bind(&expense.id)
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_expense(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
