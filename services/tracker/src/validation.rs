//! services/tracker/src/validation.rs
//!
//! Form-level checks run before a store is called, plus the small parsers
//! that turn command-line text into domain values (tag lists, prompt,
//! related-document and attached-file descriptors).

use chrono::{DateTime, Utc};
use doc_tracker_core::domain::{
    AttachedFile, NewDocument, NewVersion, Prompt, Registration, RelatedDocument,
};
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    PasswordTooShort,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("cannot parse {what} '{input}', expected {expected}")]
    Malformed {
        what: &'static str,
        input: String,
        expected: &'static str,
    },
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Required("email"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

//=========================================================================================
// Forms
//=========================================================================================

/// Raw registration input, including the confirmation field.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
}

impl RegistrationForm {
    pub fn validate(self) -> Result<Registration, ValidationError> {
        require(&self.name, "name")?;
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if self.confirm_password.is_empty() {
            return Err(ValidationError::Required("password confirmation"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(Registration {
            name: self.name,
            email: self.email,
            password: self.password,
            institution: self.institution,
            degree: self.degree,
            field: self.field,
        })
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    check_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::Required("password"));
    }
    Ok(())
}

pub fn validate_new_document(data: &NewDocument) -> Result<(), ValidationError> {
    require(&data.title, "title")
}

pub fn validate_new_version(data: &NewVersion) -> Result<(), ValidationError> {
    require(&data.version, "version")?;
    require(&data.description, "description")?;
    require(&data.changes, "changes")
}

//=========================================================================================
// Field Parsers
//=========================================================================================

/// Splits comma-separated tags, trimming each and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn pipe_fields(input: &str) -> Vec<String> {
    input.split('|').map(|f| f.trim().to_string()).collect()
}

/// Parses `name|ai|content[|notes]`.
pub fn parse_prompt(input: &str, date: DateTime<Utc>) -> Result<Prompt, ValidationError> {
    let malformed = || ValidationError::Malformed {
        what: "prompt",
        input: input.to_string(),
        expected: "name|ai|content[|notes]",
    };
    let mut fields = pipe_fields(input).into_iter();
    let (Some(name), Some(ai_used), Some(content)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };
    let notes = fields.next().unwrap_or_default();
    if name.is_empty() || content.is_empty() || fields.next().is_some() {
        return Err(malformed());
    }

    Ok(Prompt {
        id: Uuid::new_v4(),
        name,
        content,
        ai_used,
        date,
        notes,
    })
}

/// Parses `name=url`.
pub fn parse_related_document(input: &str) -> Result<RelatedDocument, ValidationError> {
    match input.split_once('=') {
        Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
            Ok(RelatedDocument {
                name: name.trim().to_string(),
                url: url.trim().to_string(),
            })
        }
        _ => Err(ValidationError::Malformed {
            what: "related document",
            input: input.to_string(),
            expected: "name=url",
        }),
    }
}

/// Parses `name|type|size[|description]`. The size is free text.
pub fn parse_attached_file(
    input: &str,
    upload_date: DateTime<Utc>,
) -> Result<AttachedFile, ValidationError> {
    let malformed = || ValidationError::Malformed {
        what: "attached file",
        input: input.to_string(),
        expected: "name|type|size[|description]",
    };
    let mut fields = pipe_fields(input).into_iter();
    let (Some(name), Some(file_type), Some(size)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };
    let description = fields.next().unwrap_or_default();
    if name.is_empty() || fields.next().is_some() {
        return Err(malformed());
    }

    Ok(AttachedFile {
        id: Uuid::new_v4(),
        name,
        file_type: if file_type.is_empty() {
            "document".to_string()
        } else {
            file_type
        },
        size,
        upload_date,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: "Ana".into(),
            email: "ana@uni.edu".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn registration_rules() {
        assert!(form().validate().is_ok());
        assert_matches!(
            RegistrationForm { name: "  ".into(), ..form() }.validate(),
            Err(ValidationError::Required("name"))
        );
        assert_matches!(
            RegistrationForm { email: "ana.uni.edu".into(), ..form() }.validate(),
            Err(ValidationError::InvalidEmail(_))
        );
        assert_matches!(
            RegistrationForm {
                password: "abc".into(),
                confirm_password: "abc".into(),
                ..form()
            }
            .validate(),
            Err(ValidationError::PasswordTooShort)
        );
        assert_matches!(
            RegistrationForm { confirm_password: "secret2".into(), ..form() }.validate(),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn login_rules() {
        assert!(validate_login("ana@uni.edu", "x").is_ok());
        assert_matches!(validate_login("", "x"), Err(ValidationError::Required("email")));
        assert_matches!(validate_login("ana@uni", "x"), Err(ValidationError::InvalidEmail(_)));
        assert_matches!(validate_login("ana@uni.edu", ""), Err(ValidationError::Required("password")));
    }

    #[test]
    fn document_and_version_required_fields() {
        assert_matches!(
            validate_new_document(&NewDocument::default()),
            Err(ValidationError::Required("title"))
        );
        let version = NewVersion {
            version: "1.1.0".into(),
            description: "d".into(),
            ..Default::default()
        };
        assert_matches!(validate_new_version(&version), Err(ValidationError::Required("changes")));
    }

    #[test]
    fn tags_are_trimmed_and_empties_dropped() {
        assert_eq!(parse_tags(" ai, thesis ,,  "), vec!["ai".to_string(), "thesis".to_string()]);
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn parses_descriptors() {
        let now = Utc::now();
        let prompt = parse_prompt("Outline|Claude|Draft an outline|first pass", now).unwrap();
        assert_eq!(prompt.ai_used, "Claude");
        assert_eq!(prompt.notes, "first pass");
        assert!(parse_prompt("Outline|Claude", now).is_err());

        let related = parse_related_document("Notes=/docs/notes.pdf").unwrap();
        assert_eq!(related.url, "/docs/notes.pdf");
        assert!(parse_related_document("no-url").is_err());

        let file = parse_attached_file("draft.docx||2.3 MB", now).unwrap();
        assert_eq!(file.file_type, "document");
        assert_eq!(file.size, "2.3 MB");
        assert!(parse_attached_file("a|b|c|d|e", now).is_err());
    }
}
