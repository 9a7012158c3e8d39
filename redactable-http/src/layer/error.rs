use std::{error::Error, fmt};

use crate::error::{BoxError, ClientResponseError};

/// Failure returned by [`Intercept`](super::Intercept).
#[derive(Debug)]
pub enum InterceptError<E, A> {
    /// The wrapped service failed before producing a response.
    Service(E),
    /// Reading the response body failed.
    Body(BoxError),
    /// The response carried a structured error body.
    Response(Box<ClientResponseError<A>>),
}

impl<E, A> InterceptError<E, A> {
    /// The structured response error, if that is what this is.
    pub fn client_response_error(&self) -> Option<&ClientResponseError<A>> {
        match self {
            Self::Response(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_client_response_error(self) -> Option<ClientResponseError<A>> {
        match self {
            Self::Response(error) => Some(*error),
            _ => None,
        }
    }

    pub fn service_error(&self) -> Option<&E> {
        match self {
            Self::Service(error) => Some(error),
            _ => None,
        }
    }
}

impl<E: fmt::Display, A> fmt::Display for InterceptError<E, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(error) => write!(f, "http service failed: {error}"),
            Self::Body(error) => write!(f, "failed to read response body: {error}"),
            Self::Response(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl<E, A> Error for InterceptError<E, A>
where
    E: Error + 'static,
    A: fmt::Debug,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(error) => Some(error),
            Self::Body(error) => Some(&**error),
            Self::Response(error) => error.source(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use http::Response;

    use super::*;
    use crate::policy::RedactionConfig;

    #[test]
    fn response_variant_displays_like_the_client_error() {
        let response = Response::builder().status(503).body(Vec::new()).unwrap();
        let inner =
            ClientResponseError::from_text_response(&RedactionConfig::default(), None, &response);
        let error: InterceptError<io::Error, String> =
            InterceptError::Response(Box::new(inner.clone()));

        assert_eq!(error.to_string(), inner.to_string());
        assert_eq!(format!("{error:#}"), format!("{inner:#}"));
        assert!(error.client_response_error().is_some());
        assert!(error.into_client_response_error().is_some());
    }

    #[test]
    fn service_and_body_variants_chain_their_sources() {
        let error: InterceptError<io::Error, String> =
            InterceptError::Service(io::Error::other("connection reset"));
        assert_eq!(error.to_string(), "http service failed: connection reset");
        assert!(error.source().is_some());
        assert!(error.service_error().is_some());

        let error: InterceptError<io::Error, String> = InterceptError::Body("truncated".into());
        assert_eq!(error.to_string(), "failed to read response body: truncated");
        assert!(error.client_response_error().is_none());
    }
}
