//! Pagination utilities for service layer
//!
//! Provides a `Pagination` struct and helpers to normalize limit/offset inputs.

/// Page size used when the caller passes no (or a non-positive) limit.
pub const DEFAULT_LIMIT: i64 = 20;
/// Largest page size a caller may request.
pub const MAX_LIMIT: i64 = 100;

/// Raw limit/offset as received from the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

/// Pagination after clamping. `offset` is passed through untouched; a
/// negative value is not rejected and is ignored by the store gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self { Self { limit, offset } }

    /// Default zero/unset limit to 20 and clamp to 100.
    pub fn normalize(self) -> Page {
        let limit = if self.limit <= 0 { DEFAULT_LIMIT } else { self.limit.min(MAX_LIMIT) };
        Page { limit: limit as u64, offset: self.offset }
    }
}

impl Page {
    /// Offset to apply, if any.
    pub fn effective_offset(&self) -> Option<u64> {
        u64::try_from(self.offset).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn normalize_defaults_zero_limit() {
        let page = Pagination { limit: 0, offset: 0 }.normalize();
        assert_eq!(page.limit, 20);
        assert_eq!(page, Pagination::new(20, 0).normalize());
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let page = Pagination { limit: 150, offset: 40 }.normalize();
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 40);
        assert_eq!(page, Pagination::new(100, 40).normalize());
    }

    #[test]
    fn normalize_keeps_values_in_range() {
        assert_eq!(Pagination::new(1, 0).normalize().limit, 1);
        assert_eq!(Pagination::new(100, 0).normalize().limit, 100);
        assert_eq!(Pagination::new(-3, 0).normalize().limit, 20);
    }

    #[test]
    fn negative_offset_passes_through_but_is_not_applied() {
        let page = Pagination::new(10, -5).normalize();
        assert_eq!(page.offset, -5);
        assert_eq!(page.effective_offset(), None);
        assert_eq!(Pagination::new(10, 7).normalize().effective_offset(), Some(7));
    }
}
