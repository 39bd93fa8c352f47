//! Demo data seed script
//!
//! Fills the database with a small, realistic gym:
//! - 5 membership plans (day pass through annual)
//! - 8 exercise categories and a 50-exercise catalog
//! - 8 customers covering every membership state: active, expiring soon,
//!   expired, outstanding balance and no membership at all
//! - payments covering settled, outstanding and installment cases
//! - check-ins across the trailing ten days, several of them today
//! - body measurements and training programs with weekly exercise slots
//!
//! Usage:
//!   DATABASE_URL=sqlite://gympro.db?mode=rwc ./seed-demo [--wipe]
//!
//! Refuses to touch a non-empty database unless --wipe is passed.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, Months, NaiveDate, NaiveDateTime};
use clap::Parser;

use gympro_api::config::Config;
use gympro_api::db;

#[derive(Parser)]
#[command(name = "seed-demo", about = "Seed the gym database with demo data")]
struct Args {
    /// Delete all existing rows before seeding
    #[arg(long)]
    wipe: bool,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn days_ago_at(today: NaiveDate, days: i64, h: u32, min: u32) -> NaiveDateTime {
    (today - Duration::days(days)).and_hms_opt(h, min, 0).unwrap()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    println!("=== Seed Demo Data ===");

    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db::schema::apply_schema(&pool)
        .await
        .context("Failed to apply schema")?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        if !args.wipe {
            bail!("database already holds {existing} customers, pass --wipe to replace them");
        }
        println!("Wiping existing data...");
        sqlx::raw_sql(
            "DELETE FROM program_exercises;
             DELETE FROM programs;
             DELETE FROM activities;
             DELETE FROM measurements;
             DELETE FROM payments;
             DELETE FROM memberships;
             DELETE FROM exercises;
             DELETE FROM exercise_categories;
             DELETE FROM membership_types;
             DELETE FROM customers;
             DELETE FROM sqlite_sequence;",
        )
        .execute(&pool)
        .await
        .context("Failed to wipe existing data")?;
    }

    let today = Local::now().date_naive();

    // 1. Membership plans
    println!("Inserting membership plans...");
    let plans: [(&str, i64, f64, &str); 5] = [
        ("Monthly", 1, 1200.0, "One month of unlimited access"),
        ("Quarterly", 3, 3200.0, "Three months at a small discount"),
        ("Semi-annual", 6, 6000.0, "Six months for the regulars"),
        ("Annual", 12, 10000.0, "Twelve months, best rate"),
        ("Day pass", 0, 50.0, "Single visit, no commitment"),
    ];

    let mut plan_ids = Vec::with_capacity(plans.len());
    for &(name, months, price, description) in &plans {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO membership_types (name, duration_months, price, description)
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(months)
        .bind(price)
        .bind(description)
        .fetch_one(&pool)
        .await
        .with_context(|| format!("Failed to insert plan {name}"))?;
        plan_ids.push(id);
    }

    // 2. Exercise catalog
    println!("Inserting exercise catalog...");
    let categories: [(&str, &str); 8] = [
        ("Cardio", "Cardiovascular conditioning"),
        ("Strength", "Muscle-building resistance work"),
        ("Flexibility", "Stretching and mobility work"),
        ("Functional", "Movements that carry over to daily life"),
        ("Yoga", "Yoga poses and breathing work"),
        ("Pilates", "Mat pilates exercises"),
        ("HIIT", "High-intensity interval circuits"),
        ("CrossFit", "Mixed-modality conditioning"),
    ];

    let mut category_ids = Vec::with_capacity(categories.len());
    for &(name, description) in &categories {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO exercise_categories (name, description) VALUES (?, ?) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&pool)
        .await
        .with_context(|| format!("Failed to insert category {name}"))?;
        category_ids.push(id);
    }

    // (name, category index, description, target muscles, difficulty)
    let exercises: [(&str, usize, &str, &str, &str); 50] = [
        ("Running", 0, "Treadmill or outdoor running", "Lower body", "beginner"),
        ("Cycling", 0, "Stationary bike or outdoor cycling", "Lower body", "beginner"),
        ("Jumping Jack", 0, "Full-body jumping movement", "Full body", "beginner"),
        ("Squat", 1, "Basic squat pattern", "Quadriceps, glutes", "beginner"),
        ("Push-up", 1, "Classic push-up", "Chest, triceps", "intermediate"),
        ("Plank", 3, "Front plank hold", "Core", "beginner"),
        ("Lunge", 1, "Forward lunge", "Quadriceps, glutes", "intermediate"),
        ("Burpee", 3, "Squat thrust with a jump", "Full body", "advanced"),
        ("Mountain Climber", 3, "Alternating knee drive from plank", "Core, shoulders", "intermediate"),
        ("Jump Squat", 1, "Explosive squat jump", "Lower body", "intermediate"),
        ("Deadlift", 1, "Barbell deadlift", "Back, legs", "advanced"),
        ("Bench Press", 1, "Barbell bench press", "Chest, triceps", "advanced"),
        ("Pull-up", 1, "Bodyweight pull-up", "Back, biceps", "advanced"),
        ("Dumbbell Row", 1, "Single-arm dumbbell row", "Back", "intermediate"),
        ("Overhead Press", 1, "Standing shoulder press", "Shoulders, triceps", "intermediate"),
        ("Romanian Deadlift", 1, "Hip hinge with soft knees", "Hamstrings, glutes", "intermediate"),
        ("Leg Press", 1, "Machine leg press", "Quadriceps", "intermediate"),
        ("Chest Fly", 1, "Dumbbell or cable fly", "Chest", "intermediate"),
        ("Lat Pulldown", 1, "Cable lat pulldown", "Back, biceps", "beginner"),
        ("Leg Extension", 1, "Machine leg extension", "Quadriceps", "beginner"),
        ("Leg Curl", 1, "Machine leg curl", "Hamstrings", "beginner"),
        ("Calf Raise", 1, "Standing calf raise", "Calves", "beginner"),
        ("Russian Twist", 3, "Seated trunk rotation", "Core", "intermediate"),
        ("Bicycle Crunch", 3, "Alternating elbow-to-knee crunch", "Core", "intermediate"),
        ("Side Plank", 3, "Lateral plank hold", "Core, obliques", "intermediate"),
        ("Bird Dog", 3, "Opposite arm and leg reach", "Core", "beginner"),
        ("Superman", 3, "Prone back extension", "Back", "beginner"),
        ("Donkey Kick", 3, "Quadruped hip extension", "Glutes", "beginner"),
        ("Fire Hydrant", 3, "Quadruped hip abduction", "Glutes", "beginner"),
        ("Glute Bridge", 3, "Supine hip bridge", "Glutes, hamstrings", "beginner"),
        ("Downward Dog", 4, "Inverted V hold", "Hamstrings, shoulders", "beginner"),
        ("Warrior Pose", 4, "Standing lunge pose", "Legs, core", "beginner"),
        ("Tree Pose", 4, "Single-leg balance pose", "Balance, legs", "intermediate"),
        ("Child Pose", 4, "Kneeling rest fold", "Back, hips", "beginner"),
        ("Cobra Pose", 4, "Prone backbend", "Back", "beginner"),
        ("Hundred", 5, "Breathing pump with legs raised", "Core", "beginner"),
        ("Roll Up", 5, "Articulated sit-up", "Core", "intermediate"),
        ("Single Leg Stretch", 5, "Alternating leg extension", "Core", "intermediate"),
        ("Double Leg Stretch", 5, "Both legs extend and return", "Core", "intermediate"),
        ("Scissors", 5, "Straight-leg switches", "Core, legs", "intermediate"),
        ("Teaser", 5, "V-sit balance", "Core", "advanced"),
        ("Swan Dive", 5, "Dynamic back extension", "Back", "advanced"),
        ("Open Leg Rocker", 5, "Rolling balance with open legs", "Core", "advanced"),
        ("Corkscrew", 5, "Circling leg lower", "Core", "advanced"),
        ("Saw", 5, "Seated rotation and reach", "Core, obliques", "intermediate"),
        ("Side Kick", 5, "Side-lying leg kick", "Legs, obliques", "intermediate"),
        ("Front Support", 5, "Plank from push-up position", "Shoulders, core", "intermediate"),
        ("Back Support", 5, "Reverse plank", "Triceps, core", "intermediate"),
        ("Side Support", 5, "Side plank variation", "Obliques, shoulders", "intermediate"),
        ("Mermaid", 5, "Seated side bend", "Obliques, legs", "intermediate"),
    ];

    let mut exercise_ids: HashMap<&str, i64> = HashMap::new();
    for &(name, cat, description, muscles, difficulty) in &exercises {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO exercises (name, category_id, description, target_muscles, difficulty)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(category_ids[cat])
        .bind(description)
        .bind(muscles)
        .bind(difficulty)
        .fetch_one(&pool)
        .await
        .with_context(|| format!("Failed to insert exercise {name}"))?;
        exercise_ids.insert(name, id);
    }

    // 3. Customers
    println!("Inserting customers...");
    // (first, last, phone, email, gender, birth date, registered days ago)
    let customers: [(&str, &str, &str, &str, &str, (i32, u32, u32), i64); 8] = [
        ("Murat", "Kaya", "05321112233", "murat.kaya@example.com", "male", (1990, 4, 12), 300),
        ("Derya", "Acar", "05322223344", "derya.acar@example.com", "female", (1995, 8, 30), 30),
        ("Emre", "Demir", "05323334455", "emre.demir@example.com", "male", (1988, 1, 23), 40),
        ("Zeynep", "Yılmaz", "05324445566", "zeynep.yilmaz@example.com", "female", (2001, 11, 5), 25),
        ("Can", "Öztürk", "05325556677", "can.ozturk@example.com", "male", (1979, 6, 17), 200),
        ("Elif", "Çelik", "05326667788", "elif.celik@example.com", "female", (1999, 2, 14), 10),
        ("Hakan", "Arslan", "05327778899", "hakan.arslan@example.com", "male", (1969, 12, 2), 5),
        ("Selin", "Koç", "05328889900", "selin.koc@example.com", "female", (2004, 7, 21), 2),
    ];

    let mut customer_ids = Vec::with_capacity(customers.len());
    for &(first, last, phone, email, gender, (by, bm, bd), reg_days) in &customers {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO customers
               (first_name, last_name, phone, email, gender, birth_date, registered_at)
             VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(first)
        .bind(last)
        .bind(phone)
        .bind(email)
        .bind(gender)
        .bind(date(by, bm, bd))
        .bind(days_ago_at(today, reg_days, 10, 0))
        .fetch_one(&pool)
        .await
        .with_context(|| format!("Failed to insert customer {first} {last}"))?;
        customer_ids.push(id);
    }

    // 4. Memberships
    println!("Inserting memberships...");
    // (customer index, plan index, started days ago, fee)
    // Murat runs on a paid annual, Derya owes her quarterly, Emre and Can
    // have lapsed, Zeynep expires within the week, Elif has no payment
    // rows yet, Hakan pays his annual in installments, Selin never joined.
    let memberships: [(usize, usize, i64, f64); 7] = [
        (0, 3, 300, 10000.0),
        (1, 1, 30, 3200.0),
        (2, 0, 40, 1200.0),
        (3, 0, 25, 1200.0),
        (4, 2, 200, 6000.0),
        (5, 1, 10, 3000.0),
        (6, 3, 5, 10000.0),
    ];

    let mut membership_ids = Vec::with_capacity(memberships.len());
    for &(ci, pi, start_days, fee) in &memberships {
        let start = today - Duration::days(start_days);
        let end = start
            .checked_add_months(Months::new(plans[pi].1 as u32))
            .unwrap();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO memberships (customer_id, membership_type_id, start_date, end_date, fee)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(customer_ids[ci])
        .bind(plan_ids[pi])
        .bind(start)
        .bind(end)
        .bind(fee)
        .fetch_one(&pool)
        .await
        .context("Failed to insert membership")?;
        membership_ids.push(id);
    }

    // 5. Payments
    println!("Inserting payments...");
    // (customer index, membership index, amount, method, settled, paid days ago, note)
    let payment_rows: [(usize, Option<usize>, f64, &str, bool, Option<i64>, Option<&str>); 8] = [
        (0, Some(0), 10000.0, "card", true, Some(300), Some("Annual plan paid in full")),
        (1, Some(1), 3200.0, "transfer", false, None, Some("Invoice issued, awaiting transfer")),
        (2, Some(2), 1200.0, "cash", true, Some(40), None),
        (3, Some(3), 1200.0, "card", true, Some(25), None),
        (4, Some(4), 6000.0, "cash", false, None, Some("Never collected")),
        (6, Some(6), 5000.0, "card", true, Some(5), Some("First installment")),
        (6, Some(6), 5000.0, "transfer", true, Some(2), Some("Second installment")),
        (3, None, 500.0, "cash", true, Some(0), Some("Personal training session")),
    ];

    for &(ci, mi, amount, method, settled, paid_days, note) in &payment_rows {
        sqlx::query(
            "INSERT INTO payments
               (customer_id, membership_id, paid_at, amount, method, note, is_settled)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(customer_ids[ci])
        .bind(mi.map(|i| membership_ids[i]))
        .bind(paid_days.map(|d| days_ago_at(today, d, 11, 30)))
        .bind(amount)
        .bind(method)
        .bind(note)
        .bind(settled)
        .execute(&pool)
        .await
        .context("Failed to insert payment")?;
    }

    // 6. Check-ins
    println!("Inserting check-ins...");
    // (customer index, type, days ago, hour, minute, duration, calories, notes)
    let checkins: [(usize, &str, i64, u32, u32, Option<i64>, Option<i64>, Option<&str>); 9] = [
        (0, "workout", 0, 7, 30, Some(60), Some(450), None),
        (3, "cardio", 0, 8, 15, Some(45), Some(380), None),
        (6, "workout", 0, 18, 0, None, None, Some("First session with the trainer")),
        (1, "yoga", 1, 19, 0, Some(50), Some(210), None),
        (2, "workout", 2, 17, 30, Some(70), Some(520), None),
        (0, "cardio", 3, 7, 45, Some(30), Some(300), None),
        (5, "pilates", 5, 9, 0, Some(55), Some(240), None),
        (4, "workout", 6, 20, 0, Some(65), Some(480), None),
        (0, "workout", 10, 7, 30, Some(60), Some(430), None),
    ];

    for &(ci, kind, days, h, min, duration, calories, notes) in &checkins {
        let started = days_ago_at(today, days, h, min);
        let ended = duration.map(|d| started + Duration::minutes(d));
        sqlx::query(
            "INSERT INTO activities
               (customer_id, activity_type, started_at, ended_at,
                duration_minutes, calories_burned, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(customer_ids[ci])
        .bind(kind)
        .bind(started)
        .bind(ended)
        .bind(duration)
        .bind(calories)
        .bind(notes)
        .execute(&pool)
        .await
        .context("Failed to insert check-in")?;
    }

    // 7. Measurements
    println!("Inserting measurements...");
    type MeasurementRow<'a> = (
        usize,
        i64,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<f64>,
        Option<&'a str>,
    );
    // (customer, days ago, height, weight, waist, hip, arm, neck, body fat, muscle, notes)
    let measurement_rows: [MeasurementRow<'_>; 4] = [
        (0, 90, Some(182.0), Some(94.5), Some(102.0), None, None, Some(40.0), None, None, None),
        (
            0,
            10,
            Some(182.0),
            Some(88.2),
            Some(96.0),
            Some(104.0),
            Some(36.5),
            Some(39.0),
            Some(23.8),
            Some(41.0),
            Some("Cutting phase going well"),
        ),
        (1, 20, Some(166.0), Some(61.0), Some(70.0), Some(94.0), Some(27.0), Some(31.0), None, None, None),
        (3, 3, None, Some(55.4), None, None, None, None, None, None, None),
    ];

    for &(ci, days, height, weight, waist, hip, arm, neck, fat, muscle, notes) in &measurement_rows
    {
        sqlx::query(
            "INSERT INTO measurements
               (customer_id, measured_on, height_cm, weight_kg, waist_cm, hip_cm,
                arm_cm, neck_cm, body_fat_pct, muscle_pct, notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(customer_ids[ci])
        .bind(today - Duration::days(days))
        .bind(height)
        .bind(weight)
        .bind(waist)
        .bind(hip)
        .bind(arm)
        .bind(neck)
        .bind(fat)
        .bind(muscle)
        .bind(notes)
        .execute(&pool)
        .await
        .context("Failed to insert measurement")?;
    }

    // 8. Training programs
    println!("Inserting training programs...");
    let strength_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO programs (customer_id, name, start_date, end_date, goal)
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(customer_ids[0])
    .bind("Strength Block A")
    .bind(today - Duration::days(30))
    .bind(today + Duration::days(60))
    .bind("Add 10 kg to the big three")
    .fetch_one(&pool)
    .await
    .context("Failed to insert program")?;

    let lean_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO programs (customer_id, name, start_date, goal)
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(customer_ids[1])
    .bind("Lean & Tone")
    .bind(today - Duration::days(14))
    .bind("Drop body fat, keep strength")
    .fetch_one(&pool)
    .await
    .context("Failed to insert program")?;

    sqlx::query(
        "INSERT INTO programs (customer_id, name, start_date, end_date, goal, is_active)
         VALUES (?, ?, ?, ?, ?, 0)",
    )
    .bind(customer_ids[2])
    .bind("Post-summer reset")
    .bind(today - Duration::days(100))
    .bind(today - Duration::days(40))
    .bind("Get back into the routine")
    .execute(&pool)
    .await
    .context("Failed to insert program")?;

    // (program id, weekday, exercise, sets, reps, notes)
    let slots: [(i64, &str, &str, i64, &str, Option<&str>); 15] = [
        (strength_id, "monday", "Squat", 5, "5", None),
        (strength_id, "monday", "Bench Press", 5, "5", None),
        (strength_id, "monday", "Dumbbell Row", 3, "8", None),
        (strength_id, "wednesday", "Deadlift", 3, "5", Some("Leave one rep in reserve")),
        (strength_id, "wednesday", "Overhead Press", 5, "5", None),
        (strength_id, "wednesday", "Russian Twist", 3, "20", None),
        (strength_id, "friday", "Bench Press", 5, "5", None),
        (strength_id, "friday", "Lat Pulldown", 3, "10", None),
        (strength_id, "friday", "Plank", 3, "60s", None),
        (lean_id, "tuesday", "Leg Press", 4, "12", None),
        (lean_id, "tuesday", "Chest Fly", 3, "15", None),
        (lean_id, "tuesday", "Running", 1, "20 min", None),
        (lean_id, "thursday", "Romanian Deadlift", 3, "10", None),
        (lean_id, "thursday", "Glute Bridge", 4, "15", None),
        (lean_id, "thursday", "Cycling", 1, "15 min", Some("Keep the pace conversational")),
    ];

    for &(program_id, weekday, exercise, sets, reps, notes) in &slots {
        sqlx::query(
            "INSERT INTO program_exercises (program_id, exercise_id, weekday, sets, reps, notes)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(program_id)
        .bind(exercise_ids[exercise])
        .bind(weekday)
        .bind(sets)
        .bind(reps)
        .bind(notes)
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert program slot {exercise}"))?;
    }

    println!();
    println!("=== Demo data seeded successfully! ===");
    println!("  Plans        : {}", plans.len());
    println!("  Categories   : {}", categories.len());
    println!("  Exercises    : {}", exercises.len());
    println!("  Customers    : {}", customers.len());
    println!("  Memberships  : {}", membership_ids.len());
    println!("  Payments     : {}", payment_rows.len());
    println!("  Check-ins    : {}", checkins.len());
    println!("  Measurements : {}", measurement_rows.len());
    println!("  Programs     : 3 ({} exercise slots)", slots.len());

    Ok(())
}
