//! Medication classification types: CRUD plus the referential guard that
//! blocks deleting a type while medications still point at it.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{MedicationTypeError, MedicationTypeResult};
pub use handlers::{router, MedicationTypesApiDoc};
pub use models::{
    CreateMedicationType, MedicationType, MedicationTypeDetail, MedicationTypeFilter,
    MedicationTypeList, MedicationTypeWithCount, UpdateMedicationType,
};
pub use postgres::PgMedicationTypeRepository;
pub use repository::MedicationTypeRepository;
pub use service::MedicationTypeService;
