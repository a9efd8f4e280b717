pub mod patients;
pub mod transactions;

pub use patients::{PatientUpdate, PatientsDao};
pub use transactions::{TransactionQuery, TransactionUpdate, TransactionsDao};
