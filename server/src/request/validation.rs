use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ISBN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9-]+$").expect("valid isbn pattern"));
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*$").expect("valid email pattern")
});
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^01(?:0|1|[6-9])[.-]?(\d{3}|\d{4})[.-]?(\d{4})$").expect("valid phone pattern")
});
static PASSWORD_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\d@$!%*#?&]{8,20}$").expect("valid password pattern"));

const PASSWORD_SPECIALS: &str = "@$!%*#?&";

/// Field-level validation failures keyed by the JSON name of the field.
/// Only the first failure of each field is kept.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    pub fn required<'a>(
        &mut self,
        field: &str,
        label: &str,
        value: &'a Option<String>,
    ) -> Option<&'a str> {
        match value.as_deref() {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                self.add(field, format!("{label} is required"));
                None
            }
        }
    }

    pub fn max_chars(&mut self, field: &str, label: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(field, format!("{label} must be at most {max} characters"));
        }
    }

    pub fn optional_max_chars(
        &mut self,
        field: &str,
        label: &str,
        value: &Option<String>,
        max: usize,
    ) {
        if let Some(value) = value {
            self.max_chars(field, label, value, max);
        }
    }

    pub fn isbn(&mut self, value: &Option<String>) {
        if let Some(isbn) = self.required("isbn", "ISBN", value) {
            if !ISBN.is_match(isbn) {
                self.add("isbn", "ISBN may contain only digits and hyphens");
            }
            self.max_chars("isbn", "ISBN", isbn, 20);
        }
    }

    pub fn email(&mut self, value: &Option<String>) {
        if let Some(email) = self.required("email", "Email", value) {
            if !EMAIL.is_match(email) {
                self.add("email", "Email format is invalid");
            }
            self.max_chars("email", "Email", email, 100);
        }
    }

    pub fn password(&mut self, field: &str, label: &str, value: &Option<String>) {
        if let Some(password) = self.required(field, label, value) {
            let valid = PASSWORD_CHARSET.is_match(password)
                && password.chars().any(|c| c.is_ascii_alphabetic())
                && password.chars().any(|c| c.is_ascii_digit())
                && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
            if !valid {
                self.add(
                    field,
                    format!(
                        "{label} must be 8-20 characters and include a letter, a digit and one of {PASSWORD_SPECIALS}"
                    ),
                );
            }
        }
    }

    pub fn name(&mut self, value: &Option<String>) {
        if let Some(name) = self.required("name", "Name", value) {
            let length = name.chars().count();
            if !(2..=50).contains(&length) {
                self.add("name", "Name must be 2-50 characters");
            }
        }
    }

    pub fn phone(&mut self, value: &Option<String>) {
        if let Some(phone) = value {
            if !PHONE.is_match(phone) {
                self.add("phone", "Phone number format is invalid");
            }
        }
    }

    pub fn price(&mut self, value: Option<i32>) -> i32 {
        match value {
            None => {
                self.add("price", "Price is required");
                0
            }
            Some(price) if price <= 0 => {
                self.add("price", "Price must be positive");
                price
            }
            Some(price) => price,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ValidationErrors;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "first");
        errors.add("title", "second");
        assert_eq!(errors.fields()["title"], "first");
    }

    #[test]
    fn blank_is_missing() {
        let mut errors = ValidationErrors::new();
        assert_eq!(errors.required("title", "Title", &some("   ")), None);
        assert_eq!(errors.fields()["title"], "Title is required");
    }

    #[test]
    fn isbn_accepts_digits_and_hyphens_only() {
        let mut errors = ValidationErrors::new();
        errors.isbn(&some("978-0134685991"));
        assert!(errors.is_empty());

        errors.isbn(&some("978-013468599X"));
        assert!(errors.fields().contains_key("isbn"));

        let mut errors = ValidationErrors::new();
        errors.isbn(&some("123456789012345678901"));
        assert_eq!(errors.fields()["isbn"], "ISBN must be at most 20 characters");
    }

    #[test]
    fn password_policy() {
        let check = |password: &str| {
            let mut errors = ValidationErrors::new();
            errors.password("password", "Password", &some(password));
            errors.is_empty()
        };
        assert!(check("Passw0rd!"));
        assert!(check("a1@aaaaa"));
        assert!(!check("Password!"));
        assert!(!check("12345678!"));
        assert!(!check("Passw0rd"));
        assert!(!check("Pa0!"));
        assert!(!check("Passw0rd!Passw0rd!abc"));
        assert!(!check("Passw0rd!^"));
    }

    #[test]
    fn phone_patterns() {
        let check = |phone: &str| {
            let mut errors = ValidationErrors::new();
            errors.phone(&some(phone));
            errors.is_empty()
        };
        assert!(check("010-1234-5678"));
        assert!(check("01012345678"));
        assert!(check("011.123.4567"));
        assert!(!check("012-1234-5678"));
        assert!(!check("010-12-5678"));
    }

    #[test]
    fn email_and_name() {
        let mut errors = ValidationErrors::new();
        errors.email(&some("hong@example.com"));
        errors.name(&some("Hong"));
        assert!(errors.is_empty());

        errors.email(&some("not-an-email"));
        errors.name(&some("H"));
        assert_eq!(errors.fields()["email"], "Email format is invalid");
        assert_eq!(errors.fields()["name"], "Name must be 2-50 characters");
    }

    #[test]
    fn price_must_be_positive() {
        let mut errors = ValidationErrors::new();
        errors.price(Some(0));
        assert_eq!(errors.fields()["price"], "Price must be positive");

        let mut errors = ValidationErrors::new();
        errors.price(None);
        assert_eq!(errors.fields()["price"], "Price is required");
    }
}
