//! Convenience builder for HTTP query parameters.
//!
//! FDM collection endpoints accept two query parameters: `filter`, whose only
//! form used here is `name:<value>`, and `limit`, where `0` asks the appliance
//! for its default page.

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: ToString,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Format a server-side name filter.
#[must_use]
pub fn name_filter(name: &str) -> String {
    format!("name:{name}")
}

/// Query parameters for listing a collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Server-side filter expression.
    pub filter: Option<String>,
    /// Page size; `0` means the appliance default.
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Query with only a page size.
    #[must_use]
    pub fn with_limit(limit: u32) -> Self {
        Self {
            filter: None,
            limit: Some(limit),
        }
    }

    /// Query selecting objects by exact name.
    #[must_use]
    pub fn by_name(name: &str) -> Self {
        Self {
            filter: Some(name_filter(name)),
            limit: None,
        }
    }

    /// Convert to URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push_opt("filter", self.filter.as_ref());
        params.push_opt("limit", self.limit);
        params.into_pairs()
    }
}
