//! Paginated list payloads.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of a list endpoint.
///
/// The backend answers list calls either with a bare array or with a
/// paginator object (`data` plus `current_page`/`last_page`/`per_page`/`total`,
/// optionally nested under `meta`). Both decode into the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: Option<u32>,
    pub total: u64,
}

impl<T> Default for Page<T> {
    /// An empty single page.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            last_page: 1,
            per_page: None,
            total: 0,
        }
    }
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Deserialize)]
struct PageMeta {
    current_page: Option<u32>,
    last_page: Option<u32>,
    per_page: Option<u32>,
    total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Bare(Vec<T>),
    Paginated {
        data: Vec<T>,
        current_page: Option<u32>,
        last_page: Option<u32>,
        per_page: Option<u32>,
        total: Option<u64>,
        meta: Option<PageMeta>,
    },
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PageRepr::<T>::deserialize(deserializer)? {
            PageRepr::Bare(items) => {
                let total = items.len() as u64;
                Ok(Self {
                    items,
                    current_page: 1,
                    last_page: 1,
                    per_page: None,
                    total,
                })
            }
            PageRepr::Paginated {
                data,
                current_page,
                last_page,
                per_page,
                total,
                meta,
            } => {
                let meta = meta.unwrap_or(PageMeta {
                    current_page: None,
                    last_page: None,
                    per_page: None,
                    total: None,
                });
                let current_page = current_page.or(meta.current_page).unwrap_or(1);
                Ok(Self {
                    current_page,
                    last_page: last_page.or(meta.last_page).unwrap_or(current_page),
                    per_page: per_page.or(meta.per_page),
                    total: total.or(meta.total).unwrap_or(data.len() as u64),
                    items: data,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn bare_array_is_a_single_page() {
        let page: Page<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more());
    }

    #[test]
    fn paginator_object_is_decoded() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"data": [4, 5], "current_page": 2, "last_page": 3, "per_page": 2, "total": 6}"#,
        )
        .unwrap();
        assert_eq!(page.items, vec![4, 5]);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.per_page, Some(2));
        assert!(page.has_more());
    }

    #[test]
    fn resource_collection_meta_is_decoded() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"data": [1], "meta": {"current_page": 1, "last_page": 4, "per_page": 1, "total": 4}}"#,
        )
        .unwrap();
        assert_eq!(page.last_page, 4);
        assert_eq!(page.total, 4);
    }
}
