//! Inventory Domain
//!
//! Medications and their classification types for the pharmacy service.
//! Both entity families live in one crate because the relation is needed
//! from both sides: medications join their type on every read, and type
//! deletion counts referencing medications.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routes, wire envelopes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres + in-memory)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::medications::{MedicationService, PgMedicationRepository};
//! use domain_inventory::medication_types::PgMedicationTypeRepository;
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let medications = PgMedicationRepository::new(db.clone());
//! let types = PgMedicationTypeRepository::new(db);
//! let service = MedicationService::new(medications, types);
//! # Ok(())
//! # }
//! ```

pub mod medication_types;
pub mod medications;
pub mod memory;
pub mod pagination;

pub use memory::InMemoryInventory;
pub use pagination::{PageMeta, PageRequest};
