use std::sync::Arc;

use axum::{
    http::{Method, StatusCode, Uri},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gympro_api::{config::Config, db, middleware::error_context, routes, services, AppState};

async fn not_found(method: Method, uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": uri.path(),
            "method": method.to_string(),
        })),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::schema::apply_schema(&pool).await?;
    info!("Database connected and schema applied");

    services::metrics::start(pool.clone());

    let state = AppState {
        db: pool,
        config: config.clone(),
    };

    // Single-box deployment behind the gym's own network; any origin may call.
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::metrics::metrics_handler))
        // Customers
        .route(
            "/api/customers",
            get(routes::customers::list_customers).post(routes::customers::create_customer),
        )
        .route("/api/customers/search", get(routes::customers::search_customers))
        .route(
            "/api/customers/{id}",
            get(routes::customers::get_customer)
                .put(routes::customers::update_customer)
                .delete(routes::customers::delete_customer),
        )
        // Payments
        .route(
            "/api/payments",
            get(routes::payments::list_payments).post(routes::payments::create_payment),
        )
        .route("/api/payments/customer/{customer_id}", get(routes::payments::list_by_customer))
        .route(
            "/api/payments/membership/{membership_id}",
            get(routes::payments::list_by_membership),
        )
        .route("/api/payments/method/{method}", get(routes::payments::list_by_method))
        .route("/api/payments/settled/{settled}", get(routes::payments::list_by_settled))
        .route(
            "/api/payments/{id}",
            get(routes::payments::get_payment)
                .put(routes::payments::update_payment)
                .patch(routes::payments::settle_payment)
                .delete(routes::payments::delete_payment),
        )
        // Membership plans
        .route(
            "/api/membership-types",
            get(routes::membership_types::list_active)
                .post(routes::membership_types::create_membership_type),
        )
        .route("/api/membership-types/all", get(routes::membership_types::list_all))
        .route("/api/membership-types/active", get(routes::membership_types::list_active))
        .route("/api/membership-types/inactive", get(routes::membership_types::list_inactive))
        .route("/api/membership-types/popular", get(routes::membership_types::list_popular))
        .route(
            "/api/membership-types/price-range",
            get(routes::membership_types::list_by_price_range),
        )
        .route(
            "/api/membership-types/{id}",
            get(routes::membership_types::get_membership_type)
                .put(routes::membership_types::update_membership_type)
                .delete(routes::membership_types::delete_membership_type),
        )
        .route(
            "/api/membership-types/{id}/status",
            patch(routes::membership_types::set_membership_type_status),
        )
        // Memberships
        .route(
            "/api/memberships",
            get(routes::memberships::list_memberships).post(routes::memberships::create_membership),
        )
        .route("/api/memberships/status/active", get(routes::memberships::list_active))
        .route(
            "/api/memberships/status/expiring/{days}",
            get(routes::memberships::list_expiring),
        )
        .route("/api/memberships/status/expired", get(routes::memberships::list_expired))
        .route("/api/memberships/stats/overview", get(routes::memberships::overview))
        .route(
            "/api/memberships/payment/{status}",
            get(routes::memberships::list_by_payment_status),
        )
        .route(
            "/api/memberships/customer/{customer_id}",
            get(routes::memberships::list_by_customer),
        )
        .route(
            "/api/memberships/{id}",
            get(routes::memberships::get_membership)
                .put(routes::memberships::update_membership)
                .delete(routes::memberships::delete_membership),
        )
        .route("/api/memberships/{id}/detail", get(routes::memberships::get_membership_detail))
        // Measurements
        .route(
            "/api/customer-measurements",
            get(routes::measurements::list_measurements)
                .post(routes::measurements::create_measurement),
        )
        .route(
            "/api/customer-measurements/customer/{customer_id}",
            get(routes::measurements::list_by_customer),
        )
        .route(
            "/api/customer-measurements/customer/{customer_id}/latest",
            get(routes::measurements::latest_for_customer),
        )
        .route(
            "/api/customer-measurements/customer/{customer_id}/stats",
            get(routes::measurements::stats_for_customer),
        )
        .route(
            "/api/customer-measurements/{id}",
            get(routes::measurements::get_measurement)
                .put(routes::measurements::update_measurement)
                .delete(routes::measurements::delete_measurement),
        )
        .route(
            "/api/customer-measurements/{id}/body-composition",
            get(routes::measurements::body_composition),
        )
        // Statistics
        .route("/api/stats/dashboard", get(routes::stats::dashboard))
        .route("/api/stats/unpaid-customers", get(routes::stats::unpaid_customers))
        .route(
            "/api/stats/membership-distribution",
            get(routes::stats::membership_distribution),
        )
        .route("/api/stats/revenue/monthly/{year}", get(routes::stats::monthly_revenue))
        .route("/api/stats/demographics", get(routes::stats::demographics))
        .route("/api/stats/entries/weekly", get(routes::stats::weekly_entries))
        // Check-ins
        .route("/api/activities", post(routes::activities::create_activity))
        .route("/api/activities/recent", get(routes::activities::list_recent))
        .route(
            "/api/activities/customer/{customer_id}",
            get(routes::activities::list_by_customer),
        )
        .route(
            "/api/activities/{id}",
            put(routes::activities::update_activity).delete(routes::activities::delete_activity),
        )
        // Exercise catalog
        .route(
            "/api/exercises",
            get(routes::exercises::list_exercises).post(routes::exercises::create_exercise),
        )
        .route("/api/exercises/search", get(routes::exercises::search_exercises))
        .route("/api/exercises/category/{category_id}", get(routes::exercises::list_by_category))
        .route(
            "/api/exercises/difficulty/{difficulty}",
            get(routes::exercises::list_by_difficulty),
        )
        .route(
            "/api/exercises/{id}",
            get(routes::exercises::get_exercise)
                .put(routes::exercises::update_exercise)
                .delete(routes::exercises::delete_exercise),
        )
        .route(
            "/api/exercise-categories",
            get(routes::exercise_categories::list_categories)
                .post(routes::exercise_categories::create_category),
        )
        .route(
            "/api/exercise-categories/{id}",
            get(routes::exercise_categories::get_category)
                .put(routes::exercise_categories::update_category)
                .delete(routes::exercise_categories::delete_category),
        )
        // Training programs
        .route(
            "/api/member-programs",
            get(routes::programs::list_programs).post(routes::programs::create_program),
        )
        .route("/api/member-programs/active", get(routes::programs::list_active))
        .route("/api/member-programs/inactive", get(routes::programs::list_inactive))
        .route(
            "/api/member-programs/customer/{customer_id}",
            get(routes::programs::list_by_customer),
        )
        .route(
            "/api/member-programs/{id}",
            get(routes::programs::get_program)
                .put(routes::programs::update_program)
                .delete(routes::programs::delete_program),
        )
        .route("/api/member-programs/{id}/status", patch(routes::programs::set_program_status))
        // Program exercise slots
        .route(
            "/api/program-exercises",
            post(routes::program_exercises::create_program_exercise),
        )
        .route(
            "/api/program-exercises/batch",
            post(routes::program_exercises::create_program_exercises_batch),
        )
        .route(
            "/api/program-exercises/program/{program_id}",
            get(routes::program_exercises::list_for_program)
                .delete(routes::program_exercises::delete_for_program),
        )
        .route(
            "/api/program-exercises/program/{program_id}/day/{weekday}",
            get(routes::program_exercises::list_for_program_day),
        )
        .route(
            "/api/program-exercises/stats/{program_id}",
            get(routes::program_exercises::stats_for_program),
        )
        .route(
            "/api/program-exercises/{id}",
            get(routes::program_exercises::get_program_exercise)
                .put(routes::program_exercises::update_program_exercise)
                .delete(routes::program_exercises::delete_program_exercise),
        )
        .fallback(not_found)
        .layer(axum::middleware::from_fn(error_context::attach_error_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("GYM Pro API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
