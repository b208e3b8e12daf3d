//! Medication records: CRUD with date and referential validation, filtered
//! listing, atomic stock mutations, and the inventory reports.

pub mod classification;
pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{MedicationError, MedicationResult};
pub use handlers::{router, MedicationsApiDoc};
pub use models::{
    CreateMedication, Dashboard, ExpiryReport, Medication, MedicationFilter, MedicationList,
    MedicationResponse, StockOperation, StockUpdateResult, UpdateMedication, UpdateStockRequest,
};
pub use postgres::PgMedicationRepository;
pub use repository::MedicationRepository;
pub use service::MedicationService;
