pub mod dashboard;
pub mod health;
pub mod patients;
pub mod transactions;

pub use dashboard::create_dashboard_routes;
pub use health::create_health_routes;
pub use patients::create_patient_routes;
pub use transactions::create_transaction_routes;
