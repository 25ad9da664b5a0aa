//! Form payloads (`application/x-www-form-urlencoded`) and their validation.
//!
//! Every field defaults to empty so a partial submission still deserializes
//! and is reported field by field instead of being rejected wholesale.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Format of `<input type="datetime-local">`.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

const TITLE_MAX: usize = 256;
const NAME_MAX: usize = 150;
const IMAGE_MAX: usize = 500;
const PASSWORD_MIN: usize = 8;

/// Validation errors keyed by field name, plus errors about the form as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// `?page=` on paginated listings. Kept as text; the paginator decides what
/// a malformed value means.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=` on the login page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

impl NextQuery {
    /// The redirect target, only if it stays on this site.
    pub fn safe_target(&self) -> Option<&str> {
        self.next
            .as_deref()
            .filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
    }
}

fn check_required(errors: &mut FormErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "This field is required.");
    }
}

fn check_max_len(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field,
            format!("Ensure this value has at most {max} characters."),
        );
    }
}

/// Letters, digits and `@ . + - _`, as usernames appear in profile URLs.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.chars().count() <= NAME_MAX
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

fn check_username(errors: &mut FormErrors, value: &str) {
    if value.is_empty() {
        errors.add("username", "This field is required.");
    } else if !is_valid_username(value) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.chars().any(char::is_whitespace)
}

fn check_email(errors: &mut FormErrors, value: &str, required: bool) {
    if value.is_empty() {
        if required {
            errors.add("email", "This field is required.");
        }
    } else if !is_valid_email(value) {
        errors.add("email", "Enter a valid email address.");
    }
}

/// Parse a `datetime-local` value (seconds optional) as UTC.
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn format_datetime_local(value: DateTime<Utc>) -> String {
    value.format(DATETIME_LOCAL_FORMAT).to_string()
}

fn parse_choice(
    errors: &mut FormErrors,
    field: &'static str,
    value: &str,
    choices: &[i32],
    required: bool,
) -> Option<i32> {
    let value = value.trim();
    if value.is_empty() {
        if required {
            errors.add(field, "This field is required.");
        }
        return None;
    }
    match value.parse::<i32>() {
        Ok(id) if choices.contains(&id) => Some(id),
        _ => {
            errors.add(
                field,
                "Select a valid choice. That choice is not one of the available choices.",
            );
            None
        }
    }
}

/// Ids a post form may reference.
#[derive(Debug, Clone, Default)]
pub struct PostChoices {
    pub categories: Vec<i32>,
    pub locations: Vec<i32>,
}

/// Create/edit post form. There is deliberately no author field: the author
/// is whoever is signed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub image: String,
    pub category: String,
    pub location: String,
    pub is_published: Option<String>,
}

/// A validated [`PostForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub is_published: bool,
}

impl PostForm {
    /// An empty form for a new post, publication date preset to `now`.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            pub_date: format_datetime_local(now),
            is_published: Some("on".to_string()),
            ..Self::default()
        }
    }

    pub fn is_published(&self) -> bool {
        self.is_published.is_some()
    }

    pub fn validate(&self, choices: &PostChoices) -> Result<PostInput, FormErrors> {
        let mut errors = FormErrors::new();
        let title = self.title.trim();
        let text = self.text.trim();
        let image = self.image.trim();

        check_required(&mut errors, "title", title);
        check_max_len(&mut errors, "title", title, TITLE_MAX);
        check_required(&mut errors, "text", text);

        let pub_date = if self.pub_date.trim().is_empty() {
            errors.add("pub_date", "This field is required.");
            None
        } else {
            let parsed = parse_datetime_local(&self.pub_date);
            if parsed.is_none() {
                errors.add("pub_date", "Enter a valid date/time.");
            }
            parsed
        };

        if !image.is_empty() {
            check_max_len(&mut errors, "image", image, IMAGE_MAX);
            let looks_like_url = image.starts_with("https://")
                || image.starts_with("http://")
                || (image.starts_with('/') && !image.starts_with("//"));
            if !looks_like_url {
                errors.add("image", "Enter a valid URL.");
            }
        }

        let category_id = parse_choice(
            &mut errors,
            "category",
            &self.category,
            &choices.categories,
            true,
        );
        let location_id = parse_choice(
            &mut errors,
            "location",
            &self.location,
            &choices.locations,
            false,
        );

        errors.into_result(|| PostInput {
            title: title.to_string(),
            text: text.to_string(),
            pub_date: pub_date.unwrap_or_default(),
            image: (!image.is_empty()).then(|| image.to_string()),
            category_id,
            location_id,
            is_published: self.is_published(),
        })
    }
}

/// Comment form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::new();
        let text = self.text.trim();
        check_required(&mut errors, "text", text);
        errors.into_result(|| text.to_string())
    }
}

/// Own-profile edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl ProfileForm {
    /// Returns the trimmed form when valid.
    pub fn validate(&self) -> Result<ProfileForm, FormErrors> {
        let mut errors = FormErrors::new();
        let cleaned = ProfileForm {
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
        };

        check_username(&mut errors, &cleaned.username);
        check_max_len(&mut errors, "first_name", &cleaned.first_name, NAME_MAX);
        check_max_len(&mut errors, "last_name", &cleaned.last_name, NAME_MAX);
        check_email(&mut errors, &cleaned.email, false);

        errors.into_result(|| cleaned)
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        check_required(&mut errors, "username", &self.username);
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }
        errors.into_result(|| ())
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        check_username(&mut errors, self.username.trim());
        check_email(&mut errors, self.email.trim(), false);

        if self.password1.is_empty() {
            errors.add("password1", "This field is required.");
        } else {
            if self.password1.chars().count() < PASSWORD_MIN {
                errors.add(
                    "password1",
                    format!(
                        "This password is too short. It must contain at least {PASSWORD_MIN} characters."
                    ),
                );
            }
            if self.password1.chars().all(|c| c.is_ascii_digit()) {
                errors.add("password1", "This password is entirely numeric.");
            }
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(|| ())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn choices() -> PostChoices {
        PostChoices {
            categories: vec![1, 2],
            locations: vec![5],
        }
    }

    fn valid_post() -> PostForm {
        PostForm {
            title: "  Morning  ".to_string(),
            text: "Coffee.".to_string(),
            pub_date: "2024-03-01T08:30".to_string(),
            image: String::new(),
            category: "2".to_string(),
            location: String::new(),
            is_published: Some("on".to_string()),
        }
    }

    #[test]
    fn post_form_accepts_valid_input() {
        let input = valid_post().validate(&choices()).unwrap();
        assert_eq!(input.title, "Morning");
        assert_eq!(
            input.pub_date,
            Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
        );
        assert_eq!(input.category_id, Some(2));
        assert_eq!(input.location_id, None);
        assert!(input.is_published);
    }

    #[test]
    fn post_form_unchecked_box_means_draft() {
        let mut form = valid_post();
        form.is_published = None;
        assert!(!form.validate(&choices()).unwrap().is_published);
    }

    #[test]
    fn post_form_reports_each_field() {
        let form = PostForm {
            title: "x".repeat(300),
            pub_date: "yesterday".to_string(),
            image: "javascript:alert(1)".to_string(),
            category: "9".to_string(),
            location: "5".to_string(),
            ..PostForm::default()
        };
        let errors = form.validate(&choices()).unwrap_err();
        assert_eq!(errors.field("title").len(), 1);
        assert_eq!(errors.field("text").len(), 1);
        assert_eq!(errors.field("pub_date").len(), 1);
        assert_eq!(errors.field("image").len(), 1);
        assert_eq!(errors.field("category").len(), 1);
        assert!(errors.field("location").is_empty());
    }

    #[test]
    fn post_form_requires_category() {
        let mut form = valid_post();
        form.category = String::new();
        let errors = form.validate(&choices()).unwrap_err();
        assert_eq!(errors.field("category"), ["This field is required."]);
    }

    #[test]
    fn blank_form_round_trips_its_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 9, 12, 0, 0).unwrap();
        let form = PostForm::blank(now);
        assert_eq!(parse_datetime_local(&form.pub_date), Some(now));
        assert!(form.is_published());
    }

    #[test]
    fn comment_form_rejects_whitespace() {
        let form = CommentForm {
            text: "   ".to_string(),
        };
        assert!(form.validate().is_err());
        let form = CommentForm {
            text: " hi ".to_string(),
        };
        assert_eq!(form.validate().unwrap(), "hi");
    }

    #[test]
    fn profile_form_checks_username_and_email() {
        let form = ProfileForm {
            username: "bad name".to_string(),
            email: "nope".to_string(),
            ..ProfileForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("username").len(), 1);
        assert_eq!(errors.field("email").len(), 1);

        let form = ProfileForm {
            username: " anna.k ".to_string(),
            email: "anna@example.org".to_string(),
            ..ProfileForm::default()
        };
        assert_eq!(form.validate().unwrap().username, "anna.k");
    }

    #[test]
    fn registration_form_checks_passwords() {
        let form = RegistrationForm {
            username: "anna".to_string(),
            email: String::new(),
            password1: "1234567".to_string(),
            password2: "7654321".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("password1").len(), 2);
        assert_eq!(errors.field("password2").len(), 1);

        let form = RegistrationForm {
            username: "anna".to_string(),
            email: "anna@example.org".to_string(),
            password1: "correct horse".to_string(),
            password2: "correct horse".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn next_target_must_be_local() {
        let q = |s: &str| NextQuery {
            next: Some(s.to_string()),
        };
        assert_eq!(q("/posts/1/").safe_target(), Some("/posts/1/"));
        assert_eq!(q("//evil.example").safe_target(), None);
        assert_eq!(q("https://evil.example").safe_target(), None);
        assert_eq!(NextQuery::default().safe_target(), None);
    }
}
