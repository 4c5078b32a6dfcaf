//! # desk-core
//!
//! Core types shared by every orgdesk crate:
//! - Entity structs (`User`, `Organization`) with validated decoding
//! - The server's JSON response envelope (`ApiResponse<T>`) and pagination
//! - Identifier and lenient field helpers for loosely typed backends
//! - Cross-cutting error types

pub mod entities;
pub mod envelope;
pub mod errors;
pub mod ids;
pub mod lenient;
pub mod responses;

pub use entities::{NewOrganization, Organization, OrganizationDraft, OrganizationUpdate, User};
pub use envelope::{ApiResponse, FieldErrors, Rejection};
pub use errors::CoreError;
pub use ids::Id;
pub use responses::Page;
