use sqlx::SqlitePool;

/// Provision the full schema. Idempotent, called on every startup and by
/// the in-memory test fixtures.
pub async fn apply_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    // --- Customers ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS customers (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name        TEXT NOT NULL,
            last_name         TEXT NOT NULL,
            phone             TEXT NOT NULL UNIQUE,
            email             TEXT,
            national_id       TEXT UNIQUE,
            birth_date        DATE,
            gender            TEXT CHECK (gender IN ('male','female','other')),
            address           TEXT,
            emergency_contact TEXT,
            emergency_phone   TEXT,
            registered_at     DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            is_active         INTEGER NOT NULL DEFAULT 1,
            photo             TEXT,
            notes             TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Membership plans ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS membership_types (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL UNIQUE,
            duration_months INTEGER NOT NULL,
            price           REAL NOT NULL,
            description     TEXT,
            is_active       INTEGER NOT NULL DEFAULT 1
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Memberships ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS memberships (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id        INTEGER NOT NULL REFERENCES customers(id),
            membership_type_id INTEGER NOT NULL REFERENCES membership_types(id),
            start_date         DATE NOT NULL,
            end_date           DATE NOT NULL,
            fee                REAL NOT NULL,
            is_active          INTEGER NOT NULL DEFAULT 1,
            created_at         DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Payments ---
    // paid_at is nullable on purpose: null means recorded but not yet paid.
    // Settlement status of a membership is never stored here, it is derived
    // from is_settled across all of its rows.
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS payments (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id   INTEGER NOT NULL REFERENCES customers(id),
            membership_id INTEGER REFERENCES memberships(id),
            paid_at       DATETIME,
            amount        REAL NOT NULL,
            method        TEXT NOT NULL DEFAULT 'cash'
                          CHECK (method IN ('cash','card','transfer')),
            note          TEXT,
            is_settled    INTEGER NOT NULL DEFAULT 0 CHECK (is_settled IN (0,1))
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Exercise catalog ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS exercise_categories (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            description TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS exercises (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL,
            category_id    INTEGER REFERENCES exercise_categories(id),
            description    TEXT,
            target_muscles TEXT,
            difficulty     TEXT CHECK (difficulty IN ('beginner','intermediate','advanced'))
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Training programs ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS programs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL REFERENCES customers(id),
            name        TEXT NOT NULL,
            start_date  DATE NOT NULL,
            end_date    DATE,
            goal        TEXT,
            is_active   INTEGER NOT NULL DEFAULT 1,
            created_at  DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS program_exercises (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            program_id  INTEGER NOT NULL REFERENCES programs(id),
            exercise_id INTEGER NOT NULL REFERENCES exercises(id),
            weekday     TEXT CHECK (weekday IN
                        ('monday','tuesday','wednesday','thursday','friday','saturday','sunday')),
            sets        INTEGER,
            reps        TEXT,
            notes       TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Anthropometric measurements ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS measurements (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id  INTEGER NOT NULL REFERENCES customers(id),
            measured_on  DATE NOT NULL,
            height_cm    REAL,
            weight_kg    REAL,
            waist_cm     REAL,
            hip_cm       REAL,
            arm_cm       REAL,
            neck_cm      REAL,
            body_fat_pct REAL,
            muscle_pct   REAL,
            notes        TEXT,
            recorded_at  DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Gym check-ins ---
    sqlx::raw_sql(
        r#"CREATE TABLE IF NOT EXISTS activities (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id      INTEGER NOT NULL REFERENCES customers(id),
            activity_type    TEXT NOT NULL DEFAULT 'workout'
                             CHECK (activity_type IN ('workout','cardio','yoga','pilates','other')),
            started_at       DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            ended_at         DATETIME,
            duration_minutes INTEGER,
            calories_burned  INTEGER,
            notes            TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    // --- Indexes ---
    sqlx::raw_sql(
        r#"CREATE INDEX IF NOT EXISTS idx_memberships_customer ON memberships(customer_id);
           CREATE INDEX IF NOT EXISTS idx_memberships_end_date ON memberships(end_date);
           CREATE INDEX IF NOT EXISTS idx_payments_membership ON payments(membership_id);
           CREATE INDEX IF NOT EXISTS idx_payments_customer ON payments(customer_id);
           CREATE INDEX IF NOT EXISTS idx_measurements_customer ON measurements(customer_id);
           CREATE INDEX IF NOT EXISTS idx_activities_started ON activities(started_at)"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
