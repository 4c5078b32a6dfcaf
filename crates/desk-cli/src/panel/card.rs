use desk_core::{Organization, User};
use serde::Serialize;

/// Billing tier shown on the card. The backend exposes no plan data, so
/// every organization shows as free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
}

/// Client-only presentation fields. The server never sees or returns these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decorations {
    pub avatar: String,
    pub role: String,
    pub members: u32,
    pub plan: PlanTier,
}

impl Decorations {
    /// Derive decorations for `org` as seen by `viewer`.
    #[must_use]
    pub fn for_organization(org: &Organization, viewer: Option<&User>) -> Self {
        let belongs = viewer
            .and_then(|user| user.organisation_id.as_ref())
            .is_some_and(|id| *id == org.id);
        Self {
            avatar: avatar_glyph(&org.name),
            role: if belongs { "Member" } else { "Guest" }.to_string(),
            members: u32::from(belongs),
            plan: PlanTier::default(),
        }
    }
}

/// The organization currently on display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgCard {
    #[serde(flatten)]
    pub organization: Organization,
    pub decorations: Decorations,
}

fn avatar_glyph(name: &str) -> String {
    let glyph: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if glyph.is_empty() { "?".to_string() } else { glyph }
}
