pub mod patients;
pub mod transactions;

pub use patients::Entity as Patients;
pub use transactions::Entity as Transactions;

// Type aliases
pub type PatientRecord = patients::Model;
pub type TransactionRecord = transactions::Model;
pub use transactions::TransactionStatus;
