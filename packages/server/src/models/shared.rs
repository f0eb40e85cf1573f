use serde::{Deserialize, Serialize};

/// Success envelope wrapping every 2xx response body.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Envelope<T> {
    /// Always `true`; failures use the error envelope instead.
    #[schema(example = true)]
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Page size that was applied.
    #[schema(example = 20)]
    pub limit: u64,
    /// Offset that was applied.
    #[schema(example = 0)]
    pub offset: u64,
}

/// Query parameters for offset-paginated lists.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// Items per page.
    #[param(example = 20)]
    pub limit: Option<u64>,
    /// Offset into the full list.
    #[param(example = 0)]
    pub offset: Option<u64>,
}

impl PageQuery {
    /// Effective `(limit, offset)` with defaults applied.
    pub fn window(&self, default_limit: u64) -> (u64, u64) {
        (self.limit.unwrap_or(default_limit), self.offset.unwrap_or(0))
    }
}
