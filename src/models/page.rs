use serde::{Deserialize, Serialize};

use crate::constants::limits::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const ALLOWED: &'static [&'static str] = &["asc", "desc"];

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Validated listing parameters shared by every paginated endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub per_page: u64,
    pub page: u64,
    pub direction: SortDirection,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PAGE_SIZE,
            page: 1,
            direction: SortDirection::Desc,
        }
    }
}

/// One page of rows plus the counts needed for pagination metadata.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub per_page: u64,
    pub current_page: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn last_page(&self) -> u64 {
        if self.total == 0 || self.per_page == 0 {
            1
        } else {
            self.total.div_ceil(self.per_page)
        }
    }

    /// 1-based index of the first item on this page, if any.
    #[must_use]
    pub fn from(&self) -> Option<u64> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.current_page - 1) * self.per_page + 1)
        }
    }

    #[must_use]
    pub fn to(&self) -> Option<u64> {
        self.from().map(|from| from + self.items.len() as u64 - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: usize, total: u64, per_page: u64, current_page: u64) -> Page<usize> {
        Page {
            items: (0..items).collect(),
            total,
            per_page,
            current_page,
        }
    }

    #[test]
    fn test_last_page() {
        assert_eq!(page(2, 3, 2, 1).last_page(), 2);
        assert_eq!(page(2, 4, 2, 1).last_page(), 2);
        assert_eq!(page(0, 0, 10, 1).last_page(), 1);
    }

    #[test]
    fn test_from_to() {
        let second = page(1, 3, 2, 2);
        assert_eq!(second.from(), Some(3));
        assert_eq!(second.to(), Some(3));

        let empty = page(0, 0, 10, 1);
        assert_eq!(empty.from(), None);
        assert_eq!(empty.to(), None);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("DESC"), None);
    }
}
