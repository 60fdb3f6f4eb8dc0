//! Entity list query parameters.

use crate::error::Error;

/// Extra conditions for listing entities: view, paging and sort order.
///
/// Values are passed to the server verbatim. Negative `limit` or `offset`
/// values are rejected when set, before any request is built.
///
/// # Example
///
/// ```
/// use cuba_core::EntityListParams;
///
/// let params = EntityListParams::new()
///     .view("produce-browse")
///     .limit(20)?
///     .offset(40)?;
/// assert_eq!(params.to_query_params(), vec![
///     ("view".to_string(), "produce-browse".to_string()),
///     ("limit".to_string(), "20".to_string()),
///     ("offset".to_string(), "40".to_string()),
/// ]);
/// # Ok::<(), cuba_core::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityListParams {
    view: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    sort: Option<String>,
}

impl EntityListParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server-side view used to render the result.
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Maximum number of entities in the response.
    pub fn limit(mut self, limit: i64) -> Result<Self, Error> {
        self.limit = Some(non_negative("limit", limit)?);
        Ok(self)
    }

    /// Number of entities to skip.
    pub fn offset(mut self, offset: i64) -> Result<Self, Error> {
        self.offset = Some(non_negative("offset", offset)?);
        Ok(self)
    }

    /// Attribute to sort by, `-` prefix for descending.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Build the ordered query parameters. Empty strings are omitted.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(4);

        if let Some(view) = self.view.as_deref().filter(|v| !v.is_empty()) {
            params.push(("view".to_string(), view.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sort".to_string(), sort.to_string()));
        }

        params
    }
}

fn non_negative(name: &str, value: i64) -> Result<u64, Error> {
    u64::try_from(value)
        .map_err(|_| Error::invalid_format(format!("{name} can not be less than zero, got {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn negative_limit_rejected() {
        for value in [-1, -20, i64::MIN] {
            let err = EntityListParams::new().limit(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        }
    }

    #[test]
    fn negative_offset_rejected() {
        let err = EntityListParams::new().offset(-5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(err.message().contains("offset"));
    }

    #[test]
    fn zero_is_allowed() {
        let params = EntityListParams::new().limit(0).unwrap().offset(0).unwrap();
        assert_eq!(
            params.to_query_params(),
            vec![
                ("limit".to_string(), "0".to_string()),
                ("offset".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn empty_params_produce_nothing() {
        let params = EntityListParams::new().view("").sort("");
        assert!(params.to_query_params().is_empty());
    }

    #[test]
    fn sort_is_passed_verbatim() {
        let params = EntityListParams::new().sort("-createTs");
        assert_eq!(
            params.to_query_params(),
            vec![("sort".to_string(), "-createTs".to_string())]
        );
    }
}
