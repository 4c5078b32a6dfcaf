//! Entity structs for orgdesk domain objects.
//!
//! Records coming from the server are decoded through private `*Record`
//! structs and validated in `TryFrom`, so a malformed payload fails at the
//! boundary instead of being cached.

mod organization;
mod user;

pub use organization::{NewOrganization, Organization, OrganizationDraft, OrganizationUpdate};
pub use user::User;
