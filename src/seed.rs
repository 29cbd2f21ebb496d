//! Fixture data for repeatable UI test runs.
//!
//! Seeding is tolerant of existing rows (`INSERT OR IGNORE` on every table
//! with a unique key), so it can run on every startup. `reset_database` wipes
//! all tables in foreign-key dependency order, resets the autoincrement
//! counters and reseeds; callers must serialize it behind the maintenance
//! lock in `AppState`.

use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::password::hash_password;

pub async fn seed_database(pool: &SqlitePool) -> Result<(), AppError> {
    tracing::info!("Seeding insurance database with sample data...");

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO admins (username, password, email, first_name, last_name, role, is_super_admin, is_active)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind("admin")
    .bind(hash_password("admin")?)
    .bind("admin@example-insurance.com")
    .bind("Super")
    .bind("Admin")
    .bind("superadmin")
    .bind(true)
    .bind(true)
    .execute(pool)
    .await?;

    let agents: &[(&str, &str, &str, &str, &str, &str, f64, &str)] = &[
        ("AGT001", "Luna", "Stormweaver", "luna.stormweaver@example-insurance.com", "555-0101", "INS123456", 0.05, "Northeast"),
        ("AGT002", "Phoenix", "Dragonheart", "phoenix.dragonheart@example-insurance.com", "555-0102", "INS234567", 0.045, "West Coast"),
        ("AGT003", "Aria", "Moonwhisper", "aria.moonwhisper@example-insurance.com", "555-0103", "INS345678", 0.055, "Southeast"),
        ("AGT004", "Zara", "Brightforge", "zara.brightforge@example-insurance.com", "555-0104", "INS456789", 0.048, "Midwest"),
        ("AGT005", "Kai", "Shadowbane", "kai.shadowbane@example-insurance.com", "555-0105", "INS567890", 0.052, "Southwest"),
    ];
    for a in agents {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO agents (agent_code, first_name, last_name, email, phone, license_number, commission_rate, territory)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(a.0)
        .bind(a.1)
        .bind(a.2)
        .bind(a.3)
        .bind(a.4)
        .bind(a.5)
        .bind(a.6)
        .bind(a.7)
        .execute(pool)
        .await?;
    }

    let brokers: &[(&str, &str, &str, &str, &str, &str, &str, f64, &str, &str)] = &[
        (
            "BRK001", "Marcus", "Silverstone", "marcus.silverstone@silverstone-insurance.com",
            "555-2001", "BRK123456", "Silverstone Insurance Brokers", 0.08, "Northeast",
            "Commercial & Personal Lines",
        ),
        (
            "BRK002", "Victoria", "Goldsmith", "victoria.goldsmith@goldsmith-brokers.com",
            "555-2002", "BRK234567", "Goldsmith Insurance Group", 0.075, "West Coast",
            "High Net Worth Individuals",
        ),
        (
            "BRK003", "Alexander", "Ironbridge", "alex.ironbridge@ironbridge-insurance.com",
            "555-2003", "BRK345678", "Ironbridge Risk Solutions", 0.07, "Southeast",
            "Commercial Property & Casualty",
        ),
        (
            "BRK004", "Sophia", "Diamondfield", "sophia.diamondfield@diamondfield-brokers.com",
            "555-2004", "BRK456789", "Diamondfield Insurance Services", 0.085, "Midwest",
            "Life & Health Insurance",
        ),
        (
            "BRK005", "William", "Copperhill", "william.copperhill@copperhill-insurance.com",
            "555-2005", "BRK567890", "Copperhill Insurance Partners", 0.078, "Southwest",
            "Auto & Home Insurance",
        ),
    ];
    for b in brokers {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO brokers (
                broker_code, first_name, last_name, email, phone, license_number,
                company_name, commission_rate, territory, specialization
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(b.0)
        .bind(b.1)
        .bind(b.2)
        .bind(b.3)
        .bind(b.4)
        .bind(b.5)
        .bind(b.6)
        .bind(b.7)
        .bind(b.8)
        .bind(b.9)
        .execute(pool)
        .await?;
    }

    struct SeedCustomer {
        number: &'static str,
        email: &'static str,
        password: &'static str,
        first_name: &'static str,
        last_name: &'static str,
        date_of_birth: &'static str,
        phone: &'static str,
        address: &'static str,
        city: &'static str,
        state: &'static str,
        zip_code: &'static str,
        ssn: &'static str,
        employment_status: &'static str,
        annual_income: f64,
        credit_score: i64,
        kyc_status: &'static str,
        agent_id: i64,
    }

    let customers = [
        SeedCustomer {
            number: "CUST001", email: "wizard.mcspellcaster@email.com", password: "password123",
            first_name: "Wizard", last_name: "McSpellcaster", date_of_birth: "1985-03-15",
            phone: "555-1001", address: "123 Enchanted Lane", city: "New York", state: "NY",
            zip_code: "10001", ssn: "123456789", employment_status: "employed",
            annual_income: 75000.0, credit_score: 720, kyc_status: "approved", agent_id: 1,
        },
        SeedCustomer {
            number: "CUST002", email: "captain.awesome@email.com", password: "secure456",
            first_name: "Captain", last_name: "Awesome", date_of_birth: "1990-07-22",
            phone: "555-1002", address: "456 Victory Blvd", city: "Los Angeles", state: "CA",
            zip_code: "90210", ssn: "234567890", employment_status: "employed",
            annual_income: 85000.0, credit_score: 750, kyc_status: "approved", agent_id: 2,
        },
        SeedCustomer {
            number: "CUST003", email: "ninja.stealthmaster@email.com", password: "mypass789",
            first_name: "Ninja", last_name: "Stealthmaster", date_of_birth: "1978-12-05",
            phone: "555-1003", address: "789 Shadow Drive", city: "Miami", state: "FL",
            zip_code: "33101", ssn: "345678901", employment_status: "self-employed",
            annual_income: 95000.0, credit_score: 680, kyc_status: "pending", agent_id: 3,
        },
        SeedCustomer {
            number: "CUST004", email: "princess.sparkles@email.com", password: "pass2023",
            first_name: "Princess", last_name: "Sparkles", date_of_birth: "1992-09-18",
            phone: "555-1004", address: "321 Rainbow Street", city: "Chicago", state: "IL",
            zip_code: "60601", ssn: "456789012", employment_status: "employed",
            annual_income: 68000.0, credit_score: 740, kyc_status: "approved", agent_id: 1,
        },
        SeedCustomer {
            number: "CUST005", email: "bob.thecoolestguy@email.com", password: "coolpass123",
            first_name: "Bob", last_name: "TheCoolestGuy", date_of_birth: "1987-11-30",
            phone: "555-1005", address: "999 Rad Avenue", city: "Portland", state: "OR",
            zip_code: "97201", ssn: "567890123", employment_status: "employed",
            annual_income: 72000.0, credit_score: 710, kyc_status: "approved", agent_id: 4,
        },
        SeedCustomer {
            number: "CUST006", email: "lady.dragonslayer@email.com", password: "dragonfire99",
            first_name: "Lady", last_name: "Dragonslayer", date_of_birth: "1984-05-12",
            phone: "555-1006", address: "777 Knight Court", city: "Denver", state: "CO",
            zip_code: "80202", ssn: "678901234", employment_status: "self-employed",
            annual_income: 120000.0, credit_score: 780, kyc_status: "approved", agent_id: 5,
        },
    ];

    for c in &customers {
        // Skip the expensive hash when the row is already present.
        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM customers WHERE customer_number = ?")
                .bind(c.number)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }

        sqlx::query(
            r#"
            INSERT OR IGNORE INTO customers (
                customer_number, email, password, first_name, last_name, date_of_birth,
                phone, address, city, state, zip_code, ssn, employment_status, annual_income,
                credit_score, kyc_status, customer_type, agent_id
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(c.number)
        .bind(c.email)
        .bind(hash_password(c.password)?)
        .bind(c.first_name)
        .bind(c.last_name)
        .bind(c.date_of_birth)
        .bind(c.phone)
        .bind(c.address)
        .bind(c.city)
        .bind(c.state)
        .bind(c.zip_code)
        .bind(c.ssn)
        .bind(c.employment_status)
        .bind(c.annual_income)
        .bind(c.credit_score)
        .bind(c.kyc_status)
        .bind("individual")
        .bind(c.agent_id)
        .execute(pool)
        .await?;
    }

    let policies: &[(&str, i64, i64, &str, &str, f64, f64, f64, i64, &str, &str, &str, &str, Option<i64>)] = &[
        ("POL001", 1, 1, "auto", "Comprehensive Auto Insurance", 50000.0, 1200.0, 500.0, 12, "2024-01-01", "2024-12-31", "active", "approved", Some(3)),
        ("POL002", 1, 2, "home", "Homeowners Insurance Plus", 300000.0, 1800.0, 1000.0, 12, "2024-02-01", "2025-01-31", "active", "approved", Some(2)),
        ("POL003", 2, 3, "auto", "Standard Auto Coverage", 35000.0, 950.0, 750.0, 12, "2024-03-15", "2025-03-14", "active", "approved", Some(4)),
        ("POL004", 3, 4, "life", "Term Life Insurance", 500000.0, 600.0, 0.0, 120, "2024-01-15", "2034-01-14", "pending", "pending", None),
        ("POL005", 4, 5, "renters", "Renters Protection Plan", 25000.0, 300.0, 250.0, 12, "2024-04-01", "2025-03-31", "active", "approved", Some(2)),
    ];
    for p in policies {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO policies (
                policy_number, customer_id, broker_id, policy_type, product_name, coverage_amount,
                premium_amount, deductible, policy_term, start_date, end_date,
                status, underwriting_status, risk_score
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(p.0)
        .bind(p.1)
        .bind(p.2)
        .bind(p.3)
        .bind(p.4)
        .bind(p.5)
        .bind(p.6)
        .bind(p.7)
        .bind(p.8)
        .bind(p.9)
        .bind(p.10)
        .bind(p.11)
        .bind(p.12)
        .bind(p.13)
        .execute(pool)
        .await?;
    }

    // coverage_details has no unique key, so guard against duplicating rows
    // when seeding runs against an already-populated database.
    let coverage_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coverage_details")
        .fetch_one(pool)
        .await?;
    if coverage_rows == 0 {
        let coverage: &[(i64, &str, f64, f64, f64)] = &[
            (1, "Liability", 25000.0, 0.0, 600.0),
            (1, "Collision", 15000.0, 500.0, 400.0),
            (1, "Comprehensive", 10000.0, 500.0, 200.0),
            (2, "Dwelling", 250000.0, 1000.0, 1200.0),
            (2, "Personal Property", 50000.0, 500.0, 600.0),
        ];
        for cd in coverage {
            sqlx::query(
                r#"
                INSERT INTO coverage_details (policy_id, coverage_type, coverage_limit, deductible, premium_portion)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(cd.0)
            .bind(cd.1)
            .bind(cd.2)
            .bind(cd.3)
            .bind(cd.4)
            .execute(pool)
            .await?;
        }
    }

    let claims: &[(&str, i64, i64, &str, &str, f64, Option<f64>, &str, &str, &str, &str, Option<&str>)] = &[
        (
            "CLM001", 1, 1, "auto_accident", "2024-05-15", 3500.0, Some(3200.0), "approved",
            "medium", "Rear-end collision on Highway 95", "Highway 95, Mile Marker 42",
            Some("PR2024-5501"),
        ),
        (
            "CLM002", 2, 1, "water_damage", "2024-06-22", 8500.0, None, "under_review",
            "high", "Burst pipe in basement caused flooding", "123 Main St, New York, NY",
            None,
        ),
        (
            "CLM003", 3, 2, "vandalism", "2024-07-03", 1200.0, Some(1200.0), "paid",
            "low", "Vehicle vandalized in parking lot", "Shopping Mall Parking Lot, Los Angeles, CA",
            None,
        ),
    ];
    for cl in claims {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO claims (
                claim_number, policy_id, customer_id, claim_type, incident_date,
                claim_amount, approved_amount, status, priority, description, incident_location, police_report_number
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(cl.0)
        .bind(cl.1)
        .bind(cl.2)
        .bind(cl.3)
        .bind(cl.4)
        .bind(cl.5)
        .bind(cl.6)
        .bind(cl.7)
        .bind(cl.8)
        .bind(cl.9)
        .bind(cl.10)
        .bind(cl.11)
        .execute(pool)
        .await?;
    }

    tracing::info!("Insurance database seeded successfully");
    Ok(())
}

/// Wipes every table in foreign-key dependency order, resets the
/// autoincrement counters and reseeds. A maintenance operation, not safe to
/// run concurrently with live traffic.
pub async fn reset_database(pool: &SqlitePool) -> Result<(), AppError> {
    for table in [
        "coverage_details",
        "claim_documents",
        "claims",
        "policies",
        "customers",
        "agents",
        "brokers",
        "admins",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(pool)
            .await?;
    }

    sqlx::query("DELETE FROM sqlite_sequence").execute(pool).await?;

    seed_database(pool).await
}
