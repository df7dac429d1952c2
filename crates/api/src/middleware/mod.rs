//! Request extractors that guard routes.
//!
//! - [`admin::RequireAdmin`] -- Requires valid admin Basic-auth credentials.

pub mod admin;
