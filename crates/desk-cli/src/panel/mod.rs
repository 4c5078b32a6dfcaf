//! Organization management panel.
//!
//! Holds the displayed organization card, separate edit and create forms, a
//! pending delete and a status banner. Actions never fail outward: every
//! error ends up as banner text.

mod banner;
mod card;


use std::future::Future;
use std::time::{Duration, Instant};

use desk_core::{Id, NewOrganization, Organization, OrganizationDraft, OrganizationUpdate, User};
use desk_org::{OrgError, OrganizationService};

pub use banner::{Banner, BannerKind};
pub use card::{Decorations, OrgCard, PlanTier};

/// The organization operations the panel needs.
pub trait OrganizationBackend {
    fn fetch(&self, id: &Id) -> impl Future<Output = Result<Organization, OrgError>> + Send;

    fn create(
        &self,
        new: &NewOrganization,
    ) -> impl Future<Output = Result<Organization, OrgError>> + Send;

    fn update(
        &self,
        id: &Id,
        update: &OrganizationUpdate,
    ) -> impl Future<Output = Result<Option<Organization>, OrgError>> + Send;

    fn delete(&self, id: &Id) -> impl Future<Output = Result<String, OrgError>> + Send;
}

impl OrganizationBackend for &OrganizationService {
    async fn fetch(&self, id: &Id) -> Result<Organization, OrgError> {
        OrganizationService::get(self, id).await
    }

    async fn create(&self, new: &NewOrganization) -> Result<Organization, OrgError> {
        OrganizationService::create(self, new).await
    }

    async fn update(
        &self,
        id: &Id,
        update: &OrganizationUpdate,
    ) -> Result<Option<Organization>, OrgError> {
        OrganizationService::update(self, id, update).await
    }

    async fn delete(&self, id: &Id) -> Result<String, OrgError> {
        OrganizationService::delete(self, id).await
    }
}

pub struct OrgPanel<B> {
    backend: B,
    viewer: Option<User>,
    card: Option<OrgCard>,
    edit_form: Option<OrganizationDraft>,
    create_form: Option<OrganizationDraft>,
    pending_delete: Option<Id>,
    banner: Option<Banner>,
    banner_ttl: Duration,
}

impl<B: OrganizationBackend> OrgPanel<B> {
    pub const fn new(backend: B, banner_ttl: Duration) -> Self {
        Self {
            backend,
            viewer: None,
            card: None,
            edit_form: None,
            create_form: None,
            pending_delete: None,
            banner: None,
            banner_ttl,
        }
    }

    /// The signed-in user, used for the role decoration.
    #[must_use]
    pub fn with_viewer(mut self, viewer: Option<User>) -> Self {
        self.viewer = viewer;
        self
    }

    pub const fn card(&self) -> Option<&OrgCard> {
        self.card.as_ref()
    }

    pub const fn edit_form(&self) -> Option<&OrganizationDraft> {
        self.edit_form.as_ref()
    }

    pub const fn edit_form_mut(&mut self) -> Option<&mut OrganizationDraft> {
        self.edit_form.as_mut()
    }

    pub const fn create_form_mut(&mut self) -> Option<&mut OrganizationDraft> {
        self.create_form.as_mut()
    }

    pub const fn pending_delete(&self) -> Option<&Id> {
        self.pending_delete.as_ref()
    }

    /// The banner, unless it is a success banner past its TTL.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner_at(Instant::now())
    }

    pub fn banner_at(&self, now: Instant) -> Option<&Banner> {
        self.banner
            .as_ref()
            .filter(|banner| !banner.is_expired_at(now, self.banner_ttl))
    }

    // --- Display ---

    /// Fetch `id` and put it on display with fresh decorations.
    pub async fn load(&mut self, id: &Id) -> bool {
        self.banner = None;
        match self.backend.fetch(id).await {
            Ok(org) => {
                self.show(org);
                true
            }
            Err(error) => self.fail(&error),
        }
    }

    /// Display `org`, replacing the current card and closing any edit.
    pub fn show(&mut self, org: Organization) {
        let decorations = Decorations::for_organization(&org, self.viewer.as_ref());
        self.card = Some(OrgCard {
            organization: org,
            decorations,
        });
        self.edit_form = None;
        self.pending_delete = None;
    }

    // --- Edit ---

    /// Open the edit form pre-filled from the displayed organization.
    pub fn begin_edit(&mut self) -> bool {
        self.banner = None;
        match &self.card {
            Some(card) => {
                self.edit_form = Some(OrganizationDraft::from(&card.organization));
                true
            }
            None => self.fail_with("No organization selected"),
        }
    }

    /// Discard the edit form. The displayed card is untouched.
    pub fn cancel_edit(&mut self) {
        self.banner = None;
        self.edit_form = None;
    }

    /// Send the changed fields and fold the result into the card.
    ///
    /// Decorations survive the merge. On failure the form stays open.
    pub async fn save_edit(&mut self) -> bool {
        self.banner = None;
        let (Some(card), Some(form)) = (&self.card, &self.edit_form) else {
            return self.fail_with("No organization is being edited");
        };

        let changes = form.changes_from(&card.organization);
        if changes.is_empty() {
            self.edit_form = None;
            return self.succeed("No changes to save");
        }

        let id = card.organization.id.clone();
        match self.backend.update(&id, &changes).await {
            Ok(returned) => {
                if let Some(card) = self.card.as_mut() {
                    apply_update(&mut card.organization, &changes);
                    if let Some(returned) = returned {
                        card.organization.merge(returned);
                    }
                }
                self.edit_form = None;
                self.succeed("Organization updated successfully")
            }
            Err(error) => self.fail(&error),
        }
    }

    // --- Create ---

    pub fn begin_create(&mut self) {
        self.banner = None;
        self.create_form = Some(OrganizationDraft::default());
    }

    pub fn cancel_create(&mut self) {
        self.banner = None;
        self.create_form = None;
    }

    /// Validate locally, then create. Blank name or email never reaches the
    /// backend.
    pub async fn submit_create(&mut self) -> bool {
        self.banner = None;
        let Some(form) = &self.create_form else {
            return self.fail_with("No organization form is open");
        };

        let new = match form.to_new() {
            Ok(new) => new,
            Err(_) => return self.fail_with("Organization name and email are required"),
        };

        match self.backend.create(&new).await {
            Ok(org) => {
                self.create_form = None;
                self.show(org);
                self.succeed("Organization created successfully")
            }
            Err(error) => self.fail(&error),
        }
    }

    // --- Delete ---

    /// First step: mark the displayed organization for deletion.
    pub fn request_delete(&mut self) -> bool {
        self.banner = None;
        match &self.card {
            Some(card) => {
                self.pending_delete = Some(card.organization.id.clone());
                true
            }
            None => self.fail_with("No organization selected"),
        }
    }

    pub fn cancel_delete(&mut self) {
        self.banner = None;
        self.pending_delete = None;
    }

    /// Second step. Without a pending request this does nothing.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        self.banner = None;

        match self.backend.delete(&id).await {
            Ok(message) => {
                if self
                    .card
                    .as_ref()
                    .is_some_and(|card| card.organization.id == id)
                {
                    self.card = None;
                    self.edit_form = None;
                }
                self.succeed(message)
            }
            Err(error) => self.fail(&error),
        }
    }

    fn succeed(&mut self, text: impl Into<String>) -> bool {
        self.banner = Some(Banner::success(text));
        true
    }

    fn fail(&mut self, error: &OrgError) -> bool {
        tracing::debug!(kind = error.kind(), %error, "panel action failed");
        self.fail_with(error.to_string())
    }

    fn fail_with(&mut self, text: impl Into<String>) -> bool {
        self.banner = Some(Banner::error(text));
        false
    }
}

/// Apply sent changes locally. An empty string clears an optional field.
fn apply_update(org: &mut Organization, changes: &OrganizationUpdate) {
    if let Some(name) = &changes.name {
        org.name.clone_from(name);
    }
    for (slot, change) in [
        (&mut org.email, &changes.email),
        (&mut org.address, &changes.address),
        (&mut org.phone, &changes.phone),
    ] {
        if let Some(value) = change {
            *slot = (!value.is_empty()).then(|| value.clone());
        }
    }
}
