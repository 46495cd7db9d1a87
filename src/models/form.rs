// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Whole-form validation: per-field rules and transforms composed into one pass.
//! Kept pure so the kernel, the CLI and tests all share it.

use email_address::EmailAddress;
use serde::Serialize;

use crate::config::FormConfig;
use crate::models::avatar::{FileHandle, validate_avatar};
use crate::models::field_error::{FieldError, FieldErrors};
use crate::models::techs::{TechEntry, ValidTech, validate_techs};

/// Raw values as currently entered in the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInput {
    /// Files from the picker; only the first one is used.
    pub avatar: Vec<FileHandle>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<TechEntry>,
}

/// Normalized form data handed to the completion step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidForm {
    pub avatar: FileHandle,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub techs: Vec<ValidTech>,
}

/// Validate every field and normalize on success.
///
/// All fields are checked on each call so the caller can show every problem at once.
///
/// # Examples
///
/// ```
/// use techform::config::FormConfig;
/// use techform::models::form::{FormInput, validate_form};
///
/// let errors = validate_form(&FormInput::default(), &FormConfig::default()).unwrap_err();
/// assert!(errors.contains("name"));
/// assert!(errors.contains("avatar"));
/// ```
pub fn validate_form(input: &FormInput, config: &FormConfig) -> Result<ValidForm, FieldErrors> {
    let mut errors = FieldErrors::new();

    let avatar = match validate_avatar(&input.avatar, &config.avatar) {
        Ok(file) => Some(file),
        Err(errs) => {
            errs.into_iter().for_each(|e| errors.push("avatar", e));
            None
        }
    };
    let name = field(&mut errors, "name", validate_name(&input.name));
    let email = field(
        &mut errors,
        "email",
        validate_email(&input.email, &config.email_suffix),
    );
    let password = field(
        &mut errors,
        "password",
        validate_password(&input.password, config.min_password_len),
    );
    let techs = match validate_techs(&input.techs, &config.techs) {
        Ok(techs) => Some(techs),
        Err(errs) => {
            errors.extend(errs);
            None
        }
    };

    match (avatar, name, email, password, techs) {
        (Some(avatar), Some(name), Some(email), Some(password), Some(techs)) => Ok(ValidForm {
            avatar,
            name,
            email,
            password,
            techs,
        }),
        _ => Err(errors),
    }
}

/// Record a single-field failure under `path`.
fn field<T>(errors: &mut FieldErrors, path: &str, result: Result<T, FieldError>) -> Option<T> {
    result.map_err(|e| errors.push(path, e)).ok()
}

/// Require a non-blank name and title-case it.
pub fn validate_name(raw: &str) -> Result<String, FieldError> {
    if raw.trim().is_empty() {
        return Err(FieldError::Required { label: "Name" });
    }
    Ok(title_case_words(raw))
}

/// Uppercase the first letter of each whitespace-separated word and join with single spaces.
///
/// Letters after the first are left as typed.
pub fn title_case_words(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Require a syntactically valid email ending in `suffix`; returns it lower-cased.
pub fn validate_email(raw: &str, suffix: &str) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required { label: "Email" });
    }
    if EmailAddress::parse_with_options(trimmed, Default::default()).is_err() {
        return Err(FieldError::Format("Enter a valid email address".to_string()));
    }
    let email = trimmed.to_lowercase();
    if !email.ends_with(&suffix.to_lowercase()) {
        return Err(FieldError::Format(format!("Email must end with {suffix}")));
    }
    Ok(email)
}

pub fn validate_password(raw: &str, min_len: usize) -> Result<String, FieldError> {
    if raw.chars().count() < min_len {
        return Err(FieldError::Range(format!(
            "Password must be at least {min_len} characters"
        )));
    }
    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const SUFFIX: &str = "@rocketseat.com.br";

    fn valid_input() -> FormInput {
        FormInput {
            avatar: vec![FileHandle::new(
                "me.png",
                1024,
                "image/png",
                PathBuf::from("me.png"),
            )],
            name: "  ada   lovelace ".into(),
            email: "Ada@Rocketseat.com.br".into(),
            password: "secret1".into(),
            techs: vec![TechEntry::new("Rust", 90), TechEntry::new("SQL", 20)],
        }
    }

    #[test]
    fn valid_input_is_normalized() {
        let form = validate_form(&valid_input(), &FormConfig::default()).unwrap();
        assert_eq!(form.name, "Ada Lovelace");
        assert_eq!(form.email, "ada@rocketseat.com.br");
        assert_eq!(form.avatar.name, "me.png");
        assert_eq!(form.techs.len(), 2);
    }

    #[test]
    fn title_case_collapses_whitespace_and_capitalizes_each_word() {
        assert_eq!(title_case_words("  john   ronald  reuel "), "John Ronald Reuel");
        assert_eq!(title_case_words("mcDonald o'neil"), "McDonald O'neil");
        assert_eq!(title_case_words("élodie\tbrandão"), "Élodie Brandão");
    }

    #[test]
    fn blank_name_is_required() {
        assert_eq!(validate_name("   "), Err(FieldError::Required { label: "Name" }));
    }

    #[test]
    fn wrong_domain_fails_with_suffix_message_regardless_of_case() {
        for email in ["ada@gmail.com", "ADA@GMAIL.COM", "Ada@Example.Org"] {
            let err = validate_email(email, SUFFIX).unwrap_err();
            assert_eq!(
                err,
                FieldError::Format(format!("Email must end with {SUFFIX}")),
                "{email}"
            );
        }
    }

    #[test]
    fn suffix_match_ignores_case() {
        assert_eq!(
            validate_email("BOB@ROCKETSEAT.COM.BR", SUFFIX).unwrap(),
            "bob@rocketseat.com.br"
        );
    }

    #[test]
    fn malformed_email_fails_format() {
        let err = validate_email("not-an-email", SUFFIX).unwrap_err();
        assert_eq!(err.to_string(), "Enter a valid email address");
        assert_eq!(
            validate_email("", SUFFIX),
            Err(FieldError::Required { label: "Email" })
        );
    }

    #[test]
    fn short_password_fails() {
        assert!(matches!(validate_password("12345", 6), Err(FieldError::Range(_))));
        assert!(validate_password("123456", 6).is_ok());
    }

    #[test]
    fn every_failing_field_reports_its_own_message() {
        let input = FormInput {
            techs: vec![TechEntry::new("HTML", 10)],
            ..FormInput::default()
        };
        let errors = validate_form(&input, &FormConfig::default()).unwrap_err();

        for path in ["avatar", "name", "email", "password", "techs"] {
            assert!(errors.contains(path), "missing error for {path}");
        }
        assert_eq!(errors.get("techs").len(), 2);
    }

    #[test]
    fn configured_suffix_is_honoured() {
        let config = FormConfig {
            email_suffix: "@example.org".into(),
            ..FormConfig::default()
        };
        let input = FormInput {
            email: "ada@example.org".into(),
            ..valid_input()
        };
        assert!(validate_form(&input, &config).is_ok());
        assert!(validate_form(&valid_input(), &config).is_err());
    }

    #[test]
    fn password_is_not_serialized() {
        let form = validate_form(&valid_input(), &FormConfig::default()).unwrap();
        let json = serde_json::to_string(&form).unwrap();
        assert!(!json.contains("secret1"));
        assert!(json.contains("Ada Lovelace"));
    }
}
