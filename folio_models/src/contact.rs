use email_address::EmailAddress;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A contact form submission that has passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmissionName,
    pub email: EmailAddress,
    pub message: SubmissionMessage,
    /// Honeypot payload. Legitimate senders leave this empty; any non-empty
    /// value implies an automated submitter.
    pub company: String,
}

#[nutype(
    validate(len_char_min = 2),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionName(String);

#[nutype(
    validate(len_char_min = 10, len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionMessage(String);

/// The raw request body of a contact submission, before validation.
///
/// All fields default to the empty string so that partial (or entirely
/// missing) request bodies deserialize and then fail validation with one
/// issue per offending field instead of being rejected wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSubmissionDraft {
    pub name: String,
    pub email: String,
    pub message: String,
    pub company: String,
}

impl ContactSubmissionDraft {
    /// Validates the draft, collecting one error per invalid field rather
    /// than stopping at the first violation.
    pub fn validate(self) -> Result<ContactSubmission, Vec<ContactFieldError>> {
        let name = SubmissionName::try_new(self.name);
        let email = self.email.parse::<EmailAddress>();
        let message = SubmissionMessage::try_new(self.message);

        match (name, email, message) {
            (Ok(name), Ok(email), Ok(message)) => Ok(ContactSubmission {
                name,
                email,
                message,
                company: self.company,
            }),
            (name, email, message) => {
                let mut errors = Vec::new();
                if name.is_err() {
                    errors.push(ContactFieldError::NameTooShort);
                }
                if email.is_err() {
                    errors.push(ContactFieldError::EmailInvalid);
                }
                if let Err(err) = message {
                    errors.push(match err {
                        SubmissionMessageError::LenCharMinViolated => {
                            ContactFieldError::MessageTooShort
                        }
                        SubmissionMessageError::LenCharMaxViolated => {
                            ContactFieldError::MessageTooLong
                        }
                    });
                }
                Err(errors)
            }
        }
    }
}

/// A single field-level validation failure with its user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactFieldError {
    #[error("Name must be at least 2 characters.")]
    NameTooShort,
    #[error("Please enter a valid email address.")]
    EmailInvalid,
    #[error("Message must be at least 10 characters.")]
    MessageTooShort,
    #[error("Message is too long.")]
    MessageTooLong,
}

impl ContactFieldError {
    /// The name of the submission field this error refers to.
    pub fn field(self) -> &'static str {
        match self {
            Self::NameTooShort => "name",
            Self::EmailInvalid => "email",
            Self::MessageTooShort | Self::MessageTooLong => "message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ContactSubmissionDraft {
        ContactSubmissionDraft {
            name: "Al".into(),
            email: "a@b.com".into(),
            message: "1234567890".into(),
            company: String::new(),
        }
    }

    #[test]
    fn validate_ok() {
        let submission = draft().validate().unwrap();
        assert_eq!(*submission.name, "Al");
        assert_eq!(submission.email.as_str(), "a@b.com");
        assert_eq!(*submission.message, "1234567890");
        assert_eq!(submission.company, "");
    }

    #[test]
    fn validate_keeps_honeypot_value() {
        let submission = ContactSubmissionDraft {
            company: "spammer-co".into(),
            ..draft()
        }
        .validate()
        .unwrap();
        assert_eq!(submission.company, "spammer-co");
    }

    #[test]
    fn validate_name_too_short() {
        let errors = ContactSubmissionDraft {
            name: "A".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, [ContactFieldError::NameTooShort]);
    }

    #[test]
    fn validate_email_invalid() {
        let errors = ContactSubmissionDraft {
            email: "not-an-email".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, [ContactFieldError::EmailInvalid]);
    }

    #[test]
    fn validate_message_too_short() {
        let errors = ContactSubmissionDraft {
            message: "short".into(),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, [ContactFieldError::MessageTooShort]);
    }

    #[test]
    fn validate_message_too_long() {
        let errors = ContactSubmissionDraft {
            message: "x".repeat(5001),
            ..draft()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors, [ContactFieldError::MessageTooLong]);
    }

    #[test]
    fn validate_message_at_limits() {
        ContactSubmissionDraft {
            message: "x".repeat(10),
            ..draft()
        }
        .validate()
        .unwrap();
        ContactSubmissionDraft {
            message: "x".repeat(5000),
            ..draft()
        }
        .validate()
        .unwrap();
    }

    #[test]
    fn validate_collects_all_errors() {
        let errors = ContactSubmissionDraft::default().validate().unwrap_err();
        assert_eq!(
            errors,
            [
                ContactFieldError::NameTooShort,
                ContactFieldError::EmailInvalid,
                ContactFieldError::MessageTooShort,
            ]
        );
    }

    #[test]
    fn draft_deserializes_partial_bodies() {
        let draft: ContactSubmissionDraft =
            serde_json::from_str(r#"{"name":"Al","email":"a@b.com"}"#).unwrap();
        assert_eq!(draft.name, "Al");
        assert_eq!(draft.message, "");
        assert_eq!(draft.company, "");
    }

    #[test]
    fn field_names() {
        assert_eq!(ContactFieldError::NameTooShort.field(), "name");
        assert_eq!(ContactFieldError::EmailInvalid.field(), "email");
        assert_eq!(ContactFieldError::MessageTooShort.field(), "message");
        assert_eq!(ContactFieldError::MessageTooLong.field(), "message");
    }

    #[test]
    fn field_messages() {
        assert_eq!(
            ContactFieldError::MessageTooShort.to_string(),
            "Message must be at least 10 characters."
        );
        assert_eq!(
            ContactFieldError::EmailInvalid.to_string(),
            "Please enter a valid email address."
        );
    }
}
