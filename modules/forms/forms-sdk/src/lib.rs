//! Forms SDK
//!
//! This crate provides the public API for the `forms` module:
//!
//! - [`FormsClient`] - Public API trait for consumers
//! - [`Form`], [`FormField`], [`FieldKind`], [`FormPager`] - Form models
//! - [`Submission`], [`SubmissionConfirmation`] - Submission models
//! - [`FormsError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use forms_sdk::{FormsClient, ListFormsOptions, Submission};
//!
//! let pager = forms.list_forms(&ListFormsOptions::default()).await?;
//! let form = forms.get_form("f1").await?;
//! let confirmation = forms.submit_form("f1", submission).await?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::FormsClient;
pub use error::FormsError;
pub use models::{
    Device, FieldKind, FieldOption, Form, FormField, FormPager, FormPagerEntry, ListFormsOptions,
    Submission, SubmissionConfirmation, SubmissionMetadata,
};
