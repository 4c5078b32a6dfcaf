//! # desk-org
//!
//! Organization CRUD for orgdesk: list with paging and filters, fetch,
//! create, partial update, delete, search, and the signed-in user's own
//! organization. A non-success envelope always becomes an error carrying the
//! server's message or a descriptive default.

mod error;
mod query;
mod service;

pub use error::OrgError;
pub use query::OrganizationQuery;
pub use service::OrganizationService;
