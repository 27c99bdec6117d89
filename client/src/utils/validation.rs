//! # Validation Utilities
//!
//! Client-side checks run before a form is submitted. Single-value checks
//! return a [`ValidationResult`]; form validators return a field -> message
//! map, empty when the form is valid. Messages are user-facing (Ukrainian).

use std::collections::BTreeMap;

use shared::{CreateListingRequest, LoginRequest, RegisterRequest};

use crate::config::UploadLimits;
use crate::services::api::ImageUpload;

/// Field name -> first error message.
pub type FormErrors = BTreeMap<String, String>;

pub const MAX_PRICE: f64 = 1_000_000.0;

const MSG_REQUIRED: &str = "Це поле обов'язкове";
const MSG_INVALID_EMAIL: &str = "Невірний формат email";
const MSG_INVALID_PHONE: &str = "Невірний формат номеру телефону";
const MSG_INVALID_PASSWORD: &str =
    "Пароль має містити принаймні 8 символів, одну велику літеру, одну малу літеру та одну цифру";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    fn record(self, field: &str, errors: &mut FormErrors) {
        if let Some(message) = self.error {
            errors.entry(field.to_string()).or_insert(message);
        }
    }
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn validate_email(email: &str) -> ValidationResult {
    if email.is_empty() {
        return ValidationResult::err(MSG_REQUIRED);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return ValidationResult::err(MSG_INVALID_EMAIL);
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return ValidationResult::err(MSG_INVALID_EMAIL);
    }
    let dotted = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !dotted {
        return ValidationResult::err(MSG_INVALID_EMAIL);
    }
    ValidationResult::ok()
}

/// Ukrainian number: optional `+38`, then `0` and nine digits. Spaces,
/// dashes and parentheses are ignored.
pub fn validate_phone_number(phone: &str) -> ValidationResult {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    let national = cleaned.strip_prefix("+38").unwrap_or(&cleaned);
    let valid = national.len() == 10
        && national.starts_with('0')
        && national.chars().all(|c| c.is_ascii_digit());
    if valid {
        ValidationResult::ok()
    } else {
        ValidationResult::err(MSG_INVALID_PHONE)
    }
}

/// At least 8 ASCII letters or digits with an uppercase letter, a lowercase
/// letter and a digit.
pub fn validate_password(password: &str) -> ValidationResult {
    let valid = password.len() >= 8
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit());
    if valid {
        ValidationResult::ok()
    } else {
        ValidationResult::err(MSG_INVALID_PASSWORD)
    }
}

/// Price in `(0, 1 000 000]`.
pub fn validate_price(price: f64) -> ValidationResult {
    if !price.is_finite() || price <= 0.0 {
        return ValidationResult::err("Ціна має бути більше 0");
    }
    if price > MAX_PRICE {
        return ValidationResult::err("Занадто висока ціна");
    }
    ValidationResult::ok()
}

/// Length in characters within `min..=max`.
pub fn validate_string_length(value: &str, min: usize, max: usize) -> ValidationResult {
    let len = value.chars().count();
    if len < min {
        return ValidationResult::err(format!("Мінімум {min} символів"));
    }
    if len > max {
        return ValidationResult::err(format!("Максимум {max} символів"));
    }
    ValidationResult::ok()
}

pub fn validate_image_file(image: &ImageUpload, limits: &UploadLimits) -> ValidationResult {
    if !limits
        .accepted_types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&image.content_type))
    {
        return ValidationResult::err("Невірний тип файлу");
    }
    if image.size() > limits.max_file_size {
        return ValidationResult::err("Файл занадто великий");
    }
    ValidationResult::ok()
}

pub fn validate_login(form: &LoginRequest) -> FormErrors {
    let mut errors = FormErrors::new();
    if !validate_email(&form.email).is_valid {
        errors.insert("email".into(), MSG_INVALID_EMAIL.into());
    }
    if form.password.is_empty() {
        errors.insert("password".into(), "Пароль обов'язковий".into());
    }
    errors
}

/// Registration rules; each password rule has its own message.
pub fn validate_register(form: &RegisterRequest) -> FormErrors {
    let mut errors = FormErrors::new();

    if form.name.trim().chars().count() < 2 {
        errors.insert("name".into(), "Ім'я має містити принаймні 2 символи".into());
    }
    if !validate_email(&form.email).is_valid {
        errors.insert("email".into(), MSG_INVALID_EMAIL.into());
    }

    let password = &form.password;
    let password_error = if password.chars().count() < 8 {
        Some("Пароль має містити принаймні 8 символів")
    } else if !password.chars().any(|c| c.is_uppercase()) {
        Some("Пароль має містити принаймні одну велику літеру")
    } else if !password.chars().any(|c| c.is_lowercase()) {
        Some("Пароль має містити принаймні одну малу літеру")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Пароль має містити принаймні одну цифру")
    } else {
        None
    };
    if let Some(message) = password_error {
        errors.insert("password".into(), message.into());
    }

    if let Some(phone) = form.phone_number.as_deref().filter(|p| !p.is_empty()) {
        validate_phone_number(phone).record("phoneNumber", &mut errors);
    }
    errors
}

pub fn validate_listing(form: &CreateListingRequest, limits: &UploadLimits) -> FormErrors {
    let mut errors = FormErrors::new();

    let title = form.title.trim().chars().count();
    if title < 5 {
        errors.insert("title".into(), "Назва має містити принаймні 5 символів".into());
    } else if title > 100 {
        errors.insert("title".into(), "Назва надто довга".into());
    }

    let description = form.description.trim().chars().count();
    if description < 20 {
        errors.insert("description".into(), "Опис має містити принаймні 20 символів".into());
    } else if description > 2000 {
        errors.insert("description".into(), "Опис надто довгий".into());
    }

    validate_price(form.price).record("price", &mut errors);

    if form.location.trim().chars().count() < 3 {
        errors.insert("location".into(), "Локація обов'язкова".into());
    }
    if form.category.trim().is_empty() {
        errors.insert("category".into(), "Категорія обов'язкова".into());
    }
    if form.category_id.is_some_and(|id| id < 1) {
        errors.insert("categoryId".into(), "Невірний ID категорії".into());
    }
    if form.images.len() > limits.max_files {
        errors.insert("images".into(), format!("Максимум {} зображень", limits.max_files));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@b.com").is_valid);
        assert!(validate_email("farmer.ivan@agro.com.ua").is_valid);
        assert!(!validate_email("").is_valid);
        assert!(!validate_email("a@b").is_valid);
        assert!(!validate_email("a@.com").is_valid);
        assert!(!validate_email("a b@c.com").is_valid);
        assert!(!validate_email("a@b@c.com").is_valid);
    }

    #[test]
    fn ukrainian_phone_numbers() {
        assert!(validate_phone_number("0501234567").is_valid);
        assert!(validate_phone_number("+380501234567").is_valid);
        assert!(validate_phone_number("+38 (050) 123-45-67").is_valid);
        assert!(!validate_phone_number("501234567").is_valid);
        assert!(!validate_phone_number("+390501234567").is_valid);
        assert!(!validate_phone_number("05012345678").is_valid);
    }

    #[test]
    fn password_strength() {
        assert!(validate_password("Abcd1234").is_valid);
        assert!(!validate_password("abcd1234").is_valid);
        assert!(!validate_password("ABCD1234").is_valid);
        assert!(!validate_password("Abcdefgh").is_valid);
        assert!(!validate_password("Ab1").is_valid);
        assert!(!validate_password("Abcd 1234").is_valid);
    }

    #[test]
    fn price_range() {
        assert!(validate_price(1_000_000.0).is_valid);
        assert!(validate_price(0.5).is_valid);
        assert!(!validate_price(0.0).is_valid);
        assert!(!validate_price(-3.0).is_valid);
        assert!(!validate_price(1_000_000.01).is_valid);
        assert!(!validate_price(f64::NAN).is_valid);
    }

    #[test]
    fn string_length_counts_characters() {
        assert!(validate_string_length("Зерно", 5, 10).is_valid);
        assert_eq!(
            validate_string_length("abc", 5, 10).error.as_deref(),
            Some("Мінімум 5 символів")
        );
    }

    #[test]
    fn login_form() {
        let ok = LoginRequest {
            email: "a@b.com".into(),
            password: "Abcd1234".into(),
        };
        assert!(validate_login(&ok).is_empty());

        let bad = LoginRequest {
            email: "nope".into(),
            password: String::new(),
        };
        let errors = validate_login(&bad);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["email"], MSG_INVALID_EMAIL);
    }

    #[test]
    fn register_form_reports_first_password_rule() {
        let form = RegisterRequest {
            email: "a@b.com".into(),
            password: "abcdefgh".into(),
            name: "I".into(),
            phone_number: Some("123".into()),
        };
        let errors = validate_register(&form);
        assert_eq!(errors["password"], "Пароль має містити принаймні одну велику літеру");
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("phoneNumber"));

        let blank_phone = RegisterRequest {
            email: "a@b.com".into(),
            password: "Abcd1234".into(),
            name: "Іван".into(),
            phone_number: Some(String::new()),
        };
        assert!(validate_register(&blank_phone).is_empty());
    }

    #[test]
    fn listing_form() {
        let mut form = CreateListingRequest {
            title: "Пшениця озима".into(),
            description: "Продаю пшеницю врожаю 2024 року, 20 тонн".into(),
            price: 8500.0,
            location: "Вінниця".into(),
            category: "grain".into(),
            category_id: Some(3),
            images: vec!["a.jpg".into()],
        };
        let limits = UploadLimits::default();
        assert!(validate_listing(&form, &limits).is_empty());

        form.title = "Зер".into();
        form.price = 0.0;
        form.images = vec!["x".to_string(); 6];
        let errors = validate_listing(&form, &limits);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["price"], "Ціна має бути більше 0");
    }

    #[test]
    fn image_file_checks() {
        let limits = UploadLimits::default();
        assert!(validate_image_file(&ImageUpload::new("a.png", "image/png", vec![0; 10]), &limits).is_valid);
        assert!(!validate_image_file(&ImageUpload::new("a.bmp", "image/bmp", vec![0; 10]), &limits).is_valid);
    }
}
