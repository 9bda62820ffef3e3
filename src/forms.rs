use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pseudo-field used for errors that belong to the whole form rather than a
/// single input (failed login, mismatched password confirmation).
pub const FORM_FIELD: &str = "__form__";

// Display names accept both Latin and Cyrillic letters, credentials are
// Latin-only, and the free-text city is Cyrillic-only. The username edge
// rule (no leading/trailing underscore) is expressed as explicit checks
// because the regex crate has no lookarounds.
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_а-яёА-ЯЁ]+$").unwrap());
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());
static PASSWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9!@#$%^&*_]+$").unwrap());
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap());
static CITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[а-яА-Я]+$").unwrap());
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{11}$").unwrap());
static TELEGRAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@[A-Za-z0-9]+$").unwrap());

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-scoped validation messages. A non-empty collection always means a
/// re-render with the offending form, never a transport-level failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn add_form(&mut self, message: impl Into<String>) {
        self.add(FORM_FIELD, message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn first_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn messages_for(&self, field: &str) -> Vec<String> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

/// The result a mutation form reports back to the page. `Invalid` still
/// travels inside `Ok(..)`: the request succeeded, the input did not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FormOutcome<T> {
    Success(T),
    Invalid(FieldErrors),
}

impl<T> FormOutcome<T> {
    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            FormOutcome::Success(_) => None,
            FormOutcome::Invalid(errors) => Some(errors),
        }
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_length(errors: &mut FieldErrors, field: &str, value: &str, min: usize, max: usize) -> bool {
    let len = char_len(value);
    if len < min || len > max {
        errors.add(
            field,
            format!("Must be between {min} and {max} characters."),
        );
        false
    } else {
        true
    }
}

fn check_display_name(errors: &mut FieldErrors, field: &str, value: &str) {
    if !NAME_RE.is_match(value) {
        errors.add(field, "Only letters, digits and underscores are allowed.");
    }
}

pub fn validate_username(errors: &mut FieldErrors, username: &str) {
    if !check_length(errors, "username", username, 5, 20) {
        return;
    }
    if !USERNAME_RE.is_match(username)
        || username.starts_with('_')
        || username.ends_with('_')
    {
        errors.add(
            "username",
            "Only Latin letters, digits and underscores inside the username.",
        );
    }
}

pub fn validate_password(errors: &mut FieldErrors, field: &str, password: &str) {
    if !check_length(errors, field, password, 8, 20) {
        return;
    }
    if !PASSWORD_RE.is_match(password) {
        errors.add(
            field,
            "Only Latin letters, digits and special characters (!@#$%^&*_).",
        );
    }
}

pub fn validate_email(errors: &mut FieldErrors, email: &str) {
    if !EMAIL_RE.is_match(email) {
        errors.add("email", "Email format (**@**.**).");
    }
}

/// Registration input. `first_name` takes Latin or Cyrillic display names,
/// credentials are Latin-only, and the email is lower-cased before any
/// uniqueness comparison.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterData {
    pub first_name: String,
    pub username: String,
    pub password1: String,
    pub password2: String,
    pub email: String,
}

impl RegisterData {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if check_length(&mut errors, "first_name", &self.first_name, 3, 20) {
            check_display_name(&mut errors, "first_name", &self.first_name);
        }
        validate_username(&mut errors, &self.username);
        validate_password(&mut errors, "password1", &self.password1);
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        validate_email(&mut errors, &self.normalized_email());

        errors
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

impl LoginData {
    /// Only length bounds; everything else is the credential store's call,
    /// and failures stay deliberately generic.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "username", &self.username, 5, 20);
        check_length(&mut errors, "password", &self.password, 8, 20);
        errors
    }
}

/// Identity half of the profile page (account fields).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl IdentityData {
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if check_length(&mut errors, "first_name", &self.first_name, 3, 20) {
            check_display_name(&mut errors, "first_name", &self.first_name);
        }
        // last name is optional; presence triggers the same rule
        if !self.last_name.is_empty() {
            if check_length(&mut errors, "last_name", &self.last_name, 3, 20) {
                check_display_name(&mut errors, "last_name", &self.last_name);
            }
        }
        validate_email(&mut errors, &self.normalized_email());

        errors
    }
}

/// Personal half of the profile page. Every field is optional; a present
/// value must match its pattern.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalData {
    pub gender: String,
    pub city: String,
    pub phone: String,
    pub telegram: String,
    pub birthday: String,
}

impl PersonalData {
    pub fn birthday_date(&self) -> Option<NaiveDate> {
        if self.birthday.is_empty() {
            None
        } else {
            NaiveDate::parse_from_str(&self.birthday, "%Y-%m-%d").ok()
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if !matches!(self.gender.as_str(), "" | "M" | "F") {
            errors.add("gender", "Select a valid gender.");
        }
        if !self.city.is_empty() {
            if char_len(&self.city) > 20 {
                errors.add("city", "Must be at most 20 characters.");
            } else if !CITY_RE.is_match(&self.city) {
                errors.add("city", "Only Cyrillic letters are allowed.");
            }
        }
        if !self.phone.is_empty() && !PHONE_RE.is_match(&self.phone) {
            errors.add("phone", "Exactly 11 digits.");
        }
        if !self.telegram.is_empty() {
            if char_len(&self.telegram) > 32 {
                errors.add("telegram", "Must be at most 32 characters.");
            } else if !TELEGRAM_RE.is_match(&self.telegram) {
                errors.add("telegram", "Telegram username must start with '@'.");
            }
        }
        if !self.birthday.is_empty() && self.birthday_date().is_none() {
            errors.add("birthday", "Enter a valid date.");
        }

        errors
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PasswordChangeData {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl PasswordChangeData {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "old_password", &self.old_password, 8, 20);
        validate_password(&mut errors, "new_password1", &self.new_password1);
        if self.new_password1 != self.new_password2 {
            errors.add("new_password2", "The two password fields didn't match.");
        }
        errors
    }
}

/// Catalogue search box: free text, trimmed, capped at 100 characters. No
/// pattern constraint; an over-long query is clipped rather than rejected.
pub fn clean_search_query(raw: &str) -> String {
    raw.trim().chars().take(100).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_data() -> RegisterData {
        RegisterData {
            first_name: "Alexei".into(),
            username: "dungeon_crawler".into(),
            password1: "s3cret!_pw".into(),
            password2: "s3cret!_pw".into(),
            email: "Player@Example.COM".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(register_data().validate().is_empty());
    }

    #[test]
    fn cyrillic_first_name_is_accepted() {
        let mut data = register_data();
        data.first_name = "Алёна".into();
        assert!(data.validate().is_empty());
    }

    #[test]
    fn short_username_is_a_length_error() {
        let mut data = register_data();
        data.username = "ab".into();
        let errors = data.validate();
        assert!(errors.has("username"));
        assert!(errors.first_for("username").unwrap().contains("between 5 and 20"));
    }

    #[test]
    fn username_rejects_edge_underscores_and_cyrillic() {
        for bad in ["_leading", "trailing_", "кириллица", "has space"] {
            let mut data = register_data();
            data.username = bad.into();
            assert!(data.validate().has("username"), "{bad} should fail");
        }
        let mut data = register_data();
        data.username = "snake_case_ok".into();
        assert!(!data.validate().has("username"));
    }

    #[test]
    fn password_charset_is_enforced() {
        let mut data = register_data();
        data.password1 = "пароль123".into();
        data.password2 = data.password1.clone();
        assert!(data.validate().has("password1"));

        data.password1 = "good!@#_123".into();
        data.password2 = data.password1.clone();
        assert!(!data.validate().has("password1"));
    }

    #[test]
    fn password_confirmation_must_match() {
        let mut data = register_data();
        data.password2 = "different1!".into();
        assert!(data.validate().has("password2"));
    }

    #[test]
    fn email_is_normalized_and_validated() {
        let data = register_data();
        assert_eq!(data.normalized_email(), "player@example.com");

        let mut bad = register_data();
        bad.email = "not-an-email".into();
        assert!(bad.validate().has("email"));
    }

    #[test]
    fn login_checks_lengths_only() {
        let data = LoginData {
            username: "ab".into(),
            password: "short".into(),
        };
        let errors = data.validate();
        assert!(errors.has("username"));
        assert!(errors.has("password"));

        let ok = LoginData {
            username: "whoever".into(),
            password: "whatever-goes".into(),
        };
        assert!(ok.validate().is_empty());
    }

    #[test]
    fn identity_last_name_is_optional() {
        let data = IdentityData {
            first_name: "Morgan".into(),
            last_name: String::new(),
            email: "morgan@example.com".into(),
        };
        assert!(data.validate().is_empty());

        let bad = IdentityData {
            last_name: "x!".into(),
            ..data
        };
        assert!(bad.validate().has("last_name"));
    }

    #[test]
    fn personal_fields_are_optional_but_patterned() {
        assert!(PersonalData::default().validate().is_empty());

        let filled = PersonalData {
            gender: "M".into(),
            city: "Москва".into(),
            phone: "79990001122".into(),
            telegram: "@roller".into(),
            birthday: "1990-05-04".into(),
        };
        assert!(filled.validate().is_empty());
        assert_eq!(
            filled.birthday_date(),
            NaiveDate::from_ymd_opt(1990, 5, 4)
        );
    }

    #[test]
    fn personal_field_patterns_reject_bad_input() {
        let bad = PersonalData {
            gender: "X".into(),
            city: "Moscow".into(),
            phone: "123".into(),
            telegram: "roller".into(),
            birthday: "04/05/1990".into(),
        };
        let errors = bad.validate();
        for field in ["gender", "city", "phone", "telegram", "birthday"] {
            assert!(errors.has(field), "{field} should have an error");
        }
    }

    #[test]
    fn password_change_reuses_registration_rules() {
        let data = PasswordChangeData {
            old_password: "old-password".into(),
            new_password1: "недопустимо".into(),
            new_password2: "недопустимо".into(),
        };
        assert!(data.validate().has("new_password1"));

        let mismatch = PasswordChangeData {
            old_password: "old-password".into(),
            new_password1: "newpass_123".into(),
            new_password2: "newpass_124".into(),
        };
        assert!(mismatch.validate().has("new_password2"));
    }

    #[test]
    fn search_query_is_trimmed_and_clipped() {
        assert_eq!(clean_search_query("  dragons  "), "dragons");
        let long: String = "x".repeat(150);
        assert_eq!(clean_search_query(&long).chars().count(), 100);
    }

    #[test]
    fn form_level_errors_use_the_form_field() {
        let mut errors = FieldErrors::new();
        errors.add_form("Invalid username or password.");
        assert!(errors.has(FORM_FIELD));
        assert_eq!(
            errors.first_for(FORM_FIELD),
            Some("Invalid username or password.")
        );
    }
}
