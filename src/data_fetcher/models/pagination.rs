use serde::{Deserialize, Serialize};

/// Envelope shared by the upstream list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl<T> PaginatedResponse<T> {
    /// Page count reported by the source; a missing `meta` means one page.
    pub fn total_pages(&self) -> u32 {
        self.meta
            .as_ref()
            .and_then(|m| m.total_pages)
            .unwrap_or(1)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_from_meta() {
        let page: PaginatedResponse<i64> = serde_json::from_str(
            r#"{"data": [1, 2], "meta": {"current_page": 1, "total_pages": 3, "per_page": 2}}"#,
        )
        .unwrap();
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_missing_meta_is_single_page() {
        let page: PaginatedResponse<i64> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(page.total_pages(), 1);

        let page: PaginatedResponse<i64> =
            serde_json::from_str(r#"{"data": [], "meta": {"total_pages": 0}}"#).unwrap();
        assert_eq!(page.total_pages(), 1);
    }

    #[test]
    fn test_missing_data_is_empty() {
        let page: PaginatedResponse<i64> =
            serde_json::from_str(r#"{"meta": {"total_pages": 1}}"#).unwrap();
        assert!(page.data.is_empty());
    }
}
