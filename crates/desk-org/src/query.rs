use desk_http::QueryParams;

/// Filters for `GET /organisations`. Unset and blank values are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub search: Option<String>,
}

impl OrganizationQuery {
    #[must_use]
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .with_opt("page", self.page)
            .with_opt("per_page", self.per_page)
            .with_opt("name", self.name.as_deref())
            .with_opt("email", self.email.as_deref())
            .with_opt("search", self.search.as_deref())
    }
}
