//! Helper functions shared by the generators and templates

mod html;
mod url;

pub use html::*;
pub use url::*;
