//! Client response errors.
//!
//! - **`head`**: read-only request/response metadata ([`RequestHead`], [`ResponseHead`])
//! - **`decode`**: the decode failure type and stock decoders
//! - **`response`**: [`ClientResponseError`] and its tri-state [`BodyOutcome`]

mod decode;
mod head;
mod response;

#[cfg(feature = "json")]
pub use decode::decode_json;
pub use decode::{BoxError, DecodeError, decode_text};
pub use head::{RequestHead, RequestSnapshot, ResponseHead};
pub use response::{BodyOutcome, ClientResponseError, RequestDetails};
