//! # Blogicum Shared
//!
//! Form payloads submitted by browsers, and their validation.
//! Validation is pure: it only looks at the submitted values and at the
//! choices the server passes in.

pub mod forms;

pub use forms::{
    CommentForm, FormErrors, LoginForm, NextQuery, PageQuery, PostChoices, PostForm, PostInput,
    ProfileForm, RegistrationForm, format_datetime_local, parse_datetime_local,
};
