use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;

pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        create_tables(&pool).await?;

        Ok(Self { pool })
    }
}

/// Creates all tables if they do not exist yet. Safe to run on every startup.
///
/// Money columns are REAL: under NUMERIC affinity SQLite stores whole-number
/// amounts as INTEGER, which the strict sqlite decoder refuses to read into
/// `f64` columns.
///
/// Foreign keys are declared for documentation but the pragma is left off, so
/// the route-level integrity checks are the only enforcement. Deleting a
/// customer does not cascade to their policies or claims.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_number TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            date_of_birth DATE,
            phone TEXT,
            address TEXT,
            city TEXT,
            state TEXT,
            zip_code TEXT,
            ssn TEXT,
            employment_status TEXT,
            annual_income REAL,
            credit_score INTEGER,
            kyc_status TEXT DEFAULT 'pending',
            customer_type TEXT DEFAULT 'individual',
            agent_id INTEGER,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS agents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            agent_code TEXT UNIQUE NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            phone TEXT,
            license_number TEXT,
            commission_rate REAL,
            territory TEXT,
            status TEXT DEFAULT 'active',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS brokers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            broker_code TEXT UNIQUE NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            phone TEXT,
            license_number TEXT,
            company_name TEXT,
            commission_rate REAL,
            territory TEXT,
            specialization TEXT,
            status TEXT DEFAULT 'active',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS policies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            policy_number TEXT UNIQUE NOT NULL,
            customer_id INTEGER NOT NULL,
            broker_id INTEGER NOT NULL,
            policy_type TEXT NOT NULL,
            product_name TEXT NOT NULL,
            coverage_amount REAL NOT NULL,
            premium_amount REAL NOT NULL,
            deductible REAL,
            policy_term INTEGER,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            status TEXT DEFAULT 'pending',
            underwriting_status TEXT DEFAULT 'pending',
            risk_score INTEGER,
            notes TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (customer_id) REFERENCES customers (id),
            FOREIGN KEY (broker_id) REFERENCES brokers (id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS claims (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            claim_number TEXT UNIQUE NOT NULL,
            policy_id INTEGER NOT NULL,
            customer_id INTEGER NOT NULL,
            claim_type TEXT NOT NULL,
            incident_date DATE NOT NULL,
            reported_date DATE DEFAULT (DATE('now')),
            claim_amount REAL NOT NULL,
            approved_amount REAL,
            status TEXT DEFAULT 'submitted',
            priority TEXT DEFAULT 'medium',
            adjuster_id INTEGER,
            description TEXT NOT NULL,
            incident_location TEXT,
            police_report_number TEXT,
            witness_info TEXT,
            notes TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (policy_id) REFERENCES policies (id),
            FOREIGN KEY (customer_id) REFERENCES customers (id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS coverage_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            policy_id INTEGER NOT NULL,
            coverage_type TEXT NOT NULL,
            coverage_limit REAL NOT NULL,
            deductible REAL,
            premium_portion REAL,
            is_active BOOLEAN DEFAULT 1,
            FOREIGN KEY (policy_id) REFERENCES policies (id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS claim_documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            claim_id INTEGER NOT NULL,
            document_type TEXT NOT NULL,
            file_name TEXT NOT NULL,
            file_path TEXT,
            file_size INTEGER,
            uploaded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (claim_id) REFERENCES claims (id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            role TEXT DEFAULT 'admin',
            is_super_admin BOOLEAN DEFAULT 0,
            is_active BOOLEAN DEFAULT 1,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ];

    for sql in statements {
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!("Insurance database tables created successfully");
    Ok(())
}
