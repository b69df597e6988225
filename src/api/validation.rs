//! Field-level request validation producing localized error maps.

use regex::Regex;
use std::sync::LazyLock;

use super::ApiError;
use super::error::FieldErrors;
use crate::constants::limits::{
    CITY_MAX_LEN, CITY_MIN_LEN, EMAIL_MAX_LEN, EMAIL_MIN_LEN, MAX_PAGE_SIZE, NAME_MAX_LEN,
    NAME_MIN_LEN, PASSWORD_MAX_LEN, PASSWORD_MIN_LEN,
};
use crate::i18n::{Lang, Rule};
use crate::models::{ListOptions, SortDirection};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Collects localized failures keyed by field name.
pub struct Validator {
    lang: Lang,
    errors: FieldErrors,
}

impl Validator {
    #[must_use]
    pub fn new(lang: Lang) -> Self {
        Self {
            lang,
            errors: FieldErrors::new(),
        }
    }

    pub fn fail(&mut self, field: &str, rule: Rule) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(rule.message(field, self.lang));
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn into_error(self) -> ApiError {
        ApiError::invalid_data(self.lang, self.errors)
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.has_errors() {
            Err(self.into_error())
        } else {
            Ok(())
        }
    }

    /// Bounded length check, counted in characters.
    fn length<'a>(&mut self, field: &str, value: &'a str, min: usize, max: usize) -> Option<&'a str> {
        let len = value.chars().count();
        if len < min {
            self.fail(field, Rule::MinLen(min));
            None
        } else if len > max {
            self.fail(field, Rule::MaxLen(max));
            None
        } else {
            Some(value)
        }
    }

    /// `required|string|min|max`. Blank strings count as missing.
    pub fn required_text<'a>(
        &mut self,
        field: &str,
        value: Option<&'a str>,
        min: usize,
        max: usize,
    ) -> Option<&'a str> {
        match value.map(str::trim) {
            None | Some("") => {
                self.fail(field, Rule::Required);
                None
            }
            Some(v) => self.length(field, v, min, max),
        }
    }

    /// `nullable|string|min|max`. Returns `None` when absent or invalid;
    /// check [`Self::has_errors`] to tell the two apart.
    pub fn optional_text<'a>(
        &mut self,
        field: &str,
        value: Option<&'a str>,
        min: usize,
        max: usize,
    ) -> Option<&'a str> {
        match value.map(str::trim) {
            None | Some("") => None,
            Some(v) => self.length(field, v, min, max),
        }
    }

    /// `required` with no length bounds.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value.map(str::trim) {
            None | Some("") => {
                self.fail(field, Rule::Required);
                None
            }
            Some(v) => Some(v),
        }
    }

    pub fn city<'a>(&mut self, value: Option<&'a str>) -> Option<&'a str> {
        self.required_text("city", value, CITY_MIN_LEN, CITY_MAX_LEN)
    }

    pub fn name<'a>(&mut self, value: Option<&'a str>) -> Option<&'a str> {
        self.required_text("name", value, NAME_MIN_LEN, NAME_MAX_LEN)
    }

    /// `required|email|min|max`
    pub fn email<'a>(&mut self, value: Option<&'a str>) -> Option<&'a str> {
        let email = self.required_text("email", value, EMAIL_MIN_LEN, EMAIL_MAX_LEN)?;
        if EMAIL_RE.is_match(email) {
            Some(email)
        } else {
            self.fail("email", Rule::Email);
            None
        }
    }

    /// `required|string|confirmed|min|max`
    pub fn confirmed_password<'a>(
        &mut self,
        value: Option<&'a str>,
        confirmation: Option<&str>,
    ) -> Option<&'a str> {
        let password = match value {
            None | Some("") => {
                self.fail("password", Rule::Required);
                return None;
            }
            Some(v) => v,
        };

        if confirmation != Some(password) {
            self.fail("password", Rule::Confirmed);
            return None;
        }

        self.length("password", password, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN)
    }

    /// `nullable|string|min|max` for password changes; no confirmation.
    pub fn optional_password<'a>(&mut self, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            None | Some("") => None,
            Some(p) => self.length("password", p, PASSWORD_MIN_LEN, PASSWORD_MAX_LEN),
        }
    }

    /// Listing parameters: `take` (integer in `1..=MAX_PAGE_SIZE`),
    /// `order_direction` (`asc`/`desc`) and `page`. A `page` that is
    /// unparsable, zero, or whose row offset would not fit in `i64` falls
    /// back to 1.
    pub fn list_options(
        &mut self,
        take: Option<&str>,
        order_direction: Option<&str>,
        page: Option<&str>,
    ) -> ListOptions {
        let mut options = ListOptions::default();

        if let Some(take) = take.map(str::trim).filter(|t| !t.is_empty()) {
            match take.parse::<u64>() {
                Ok(0) => self.fail("take", Rule::MinValue(1)),
                Ok(n) if n > MAX_PAGE_SIZE => self.fail("take", Rule::MaxValue(MAX_PAGE_SIZE)),
                Ok(n) => options.per_page = n,
                Err(_) if take.bytes().all(|b| b.is_ascii_digit()) => {
                    self.fail("take", Rule::MaxValue(MAX_PAGE_SIZE));
                }
                Err(_) => self.fail("take", Rule::Integer),
            }
        }

        if let Some(direction) = order_direction.map(str::trim).filter(|d| !d.is_empty()) {
            match SortDirection::parse(direction) {
                Some(d) => options.direction = d,
                None => self.fail("order_direction", Rule::OneOf(SortDirection::ALLOWED)),
            }
        }

        let max_offset = u64::try_from(i64::MAX).unwrap_or(u64::MAX);
        if let Some(n) = page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|n| *n >= 1)
            .filter(|n| n.checked_mul(options.per_page).is_some_and(|end| end <= max_offset))
        {
            options.page = n;
        }

        options
    }
}
