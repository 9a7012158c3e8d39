//! Redacted views and logging-boundary output.
//!
//! - **`view`**: [`Redacted<T>`], the paired redacted/original value
//! - **`headers`**: header-map views ([`RedactedHeaders`])
//! - **`uri`**: URI views with query rewriting ([`RedactedUri`])
//! - **`output`**: output types for logging boundaries (`RedactedOutput`, `ToRedactedOutput`)
//!
//! Policies live in `crate::policy`.

mod headers;
mod output;
mod uri;
mod view;

#[cfg(feature = "json")]
pub(crate) use output::headers_to_json;

pub use headers::RedactedHeaders;
pub use output::{RedactedOutput, ToRedactedOutput};
pub use uri::RedactedUri;
pub use view::Redacted;
