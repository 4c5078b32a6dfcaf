use desk_core::{Id, NewOrganization, Organization, OrganizationUpdate, Page};
use desk_http::{ApiClient, ApiError, QueryParams, expect_data};

use crate::error::OrgError;
use crate::query::OrganizationQuery;

const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// REST client for `/organisations`.
///
/// Every call is independent: nothing is cached and no call is grouped with
/// another.
#[derive(Debug, Clone)]
pub struct OrganizationService {
    api: ApiClient,
}

impl OrganizationService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /organisations` with paging and filters.
    ///
    /// # Errors
    ///
    /// [`OrgError::Api`] for request failures; a `success: false` envelope
    /// becomes [`ApiError::Rejected`] with "Failed to load organizations"
    /// unless the server says otherwise.
    pub async fn list(&self, query: &OrganizationQuery) -> Result<Page<Organization>, OrgError> {
        let result = self
            .api
            .get("/organisations", query.to_params())
            .await
            .and_then(|envelope| {
                expect_data::<Page<Organization>>(envelope, "Failed to load organizations")
            })
            .map(Option::unwrap_or_default)
            .map_err(OrgError::from);
        logged("list", result)
    }

    /// `GET /organisations/:id`.
    ///
    /// # Errors
    ///
    /// [`OrgError::NotFound`] when the envelope carries no record.
    pub async fn get(&self, id: &Id) -> Result<Organization, OrgError> {
        let result = self
            .api
            .get(&item_path(id), QueryParams::new())
            .await
            .and_then(|envelope| {
                expect_data::<Organization>(envelope, "Failed to load organization")
            })
            .map_err(OrgError::from)
            .and_then(|org| org.ok_or_else(|| OrgError::NotFound(id.to_string())));
        logged("get", result)
    }

    /// `POST /organisations`. The payload is validated at construction.
    ///
    /// # Errors
    ///
    /// [`OrgError::Api`]; [`ApiError::MalformedResponse`] when the server
    /// does not echo the created record.
    pub async fn create(&self, new: &NewOrganization) -> Result<Organization, OrgError> {
        let result = self
            .api
            .post("/organisations", new)
            .await
            .and_then(|envelope| {
                expect_data::<Organization>(envelope, "Failed to create organization")
            })
            .and_then(|org| {
                org.ok_or_else(|| {
                    ApiError::MalformedResponse("created organization missing from response".into())
                })
            })
            .map_err(OrgError::from);
        if let Ok(org) = &result {
            tracing::info!(id = %org.id, name = %org.name, "organization created");
        }
        logged("create", result)
    }

    /// `PUT /organisations/:id` with only the fields set in `update`.
    ///
    /// Returns the server's copy when it sends one back.
    ///
    /// # Errors
    ///
    /// [`OrgError::Api`], "Failed to update organization" by default.
    pub async fn update(
        &self,
        id: &Id,
        update: &OrganizationUpdate,
    ) -> Result<Option<Organization>, OrgError> {
        let result = self
            .api
            .put(&item_path(id), update)
            .await
            .and_then(|envelope| {
                expect_data::<Organization>(envelope, "Failed to update organization")
            })
            .map_err(OrgError::from);
        logged("update", result)
    }

    /// `DELETE /organisations/:id`. Returns the server's confirmation text.
    ///
    /// # Errors
    ///
    /// [`OrgError::Api`], "Failed to delete organization" by default.
    pub async fn delete(&self, id: &Id) -> Result<String, OrgError> {
        let result = self.api.delete(&item_path(id)).await.and_then(|envelope| {
            if envelope.success {
                Ok(envelope
                    .server_message()
                    .unwrap_or_else(|| "Organization deleted".to_string()))
            } else {
                Err(ApiError::Rejected {
                    message: envelope.failure_message("Failed to delete organization"),
                    errors: envelope.errors,
                })
            }
        });
        if result.is_ok() {
            tracing::info!(%id, "organization deleted");
        }
        logged("delete", result.map_err(OrgError::from))
    }

    /// `GET /organisations/search?q=&limit=`.
    ///
    /// A zero `limit` falls back to the default of 10.
    ///
    /// # Errors
    ///
    /// [`OrgError::Api`], "Failed to search organizations" by default.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<Organization>, OrgError> {
        let limit = if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit };
        let params = QueryParams::new().with("q", query).with("limit", limit);
        let result = self
            .api
            .get("/organisations/search", params)
            .await
            .and_then(|envelope| {
                expect_data::<Page<Organization>>(envelope, "Failed to search organizations")
            })
            .map(|page| page.map(|p| p.items).unwrap_or_default())
            .map_err(OrgError::from);
        logged("search", result)
    }

    /// `GET /user/organisation`. `None` when the user belongs to none.
    ///
    /// # Errors
    ///
    /// [`OrgError::Api`], "Failed to load organization" by default.
    pub async fn current_user_organization(&self) -> Result<Option<Organization>, OrgError> {
        let result = self
            .api
            .get("/user/organisation", QueryParams::new())
            .await
            .and_then(|envelope| {
                expect_data::<Organization>(envelope, "Failed to load organization")
            })
            .map_err(OrgError::from);
        logged("current user organization", result)
    }
}

fn item_path(id: &Id) -> String {
    format!("/organisations/{}", urlencoding::encode(id.as_str()))
}

fn logged<T>(operation: &'static str, result: Result<T, OrgError>) -> Result<T, OrgError> {
    if let Err(error) = &result {
        tracing::warn!(operation, kind = error.kind(), %error, "organization operation failed");
    }
    result
}
