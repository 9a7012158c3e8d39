//! Redacted views over header maps.

use std::fmt;

use http::HeaderMap;

use super::view::Redacted;
use crate::policy::HeaderPolicy;

/// Header map paired with its redacted projection.
pub type RedactedHeaders = Redacted<HeaderMap>;

impl Redacted<HeaderMap> {
    /// Applies `policy` to each header independently.
    ///
    /// Iteration order and multiplicity of the input are preserved: the
    /// projection holds exactly one value per input value, in the same order.
    pub fn from_headers(headers: &HeaderMap, policy: &HeaderPolicy) -> Self {
        let mut redacted = HeaderMap::with_capacity(headers.keys_len());
        for (name, value) in headers {
            redacted.append(name.clone(), policy.apply(name, value));
        }
        Self::new(redacted, headers.clone())
    }
}

impl fmt::Display for Redacted<HeaderMap> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_headers(self.value(), f)
    }
}

fn fmt_headers(headers: &HeaderMap, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, (name, value)) in headers.iter().enumerate() {
        if idx > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}: {}", String::from_utf8_lossy(value.as_bytes()))?;
    }
    Ok(())
}
