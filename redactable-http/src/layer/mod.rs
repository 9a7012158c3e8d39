//! Tower middleware that turns structured error responses into errors.
//!
//! [`InterceptLayer`] wraps an HTTP client service. For every response it
//! looks at the `Content-Type` header only:
//!
//! - a different (or missing) media type passes the response through with the
//!   body untouched and unread;
//! - a matching media type reads the body exactly once. If the bytes decode,
//!   the call fails with [`InterceptError::Response`]. If they do not, the
//!   response is handed on with a [`ReplayBody`] over the buffered bytes, so
//!   downstream consumers see the original body.
//!
//! ```
//! use std::convert::Infallible;
//!
//! use bytes::Bytes;
//! use http::{Request, Response};
//! use http_body_util::Full;
//! use redactable_http::{InterceptLayer, RedactionConfig};
//! use tower::{Layer, ServiceExt, service_fn};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let client = service_fn(|_request: Request<()>| async {
//!     let response = Response::builder()
//!         .status(404)
//!         .header("content-type", "application/problem+json")
//!         .body(Full::new(Bytes::from_static(
//!             br#"{"title":"Not Found","status":404}"#,
//!         )))
//!         .unwrap();
//!     Ok::<_, Infallible>(response)
//! });
//! let client = InterceptLayer::problem_json(RedactionConfig::default()).layer(client);
//!
//! let error = client
//!     .oneshot(Request::get("https://api.example.com/items").body(()).unwrap())
//!     .await
//!     .unwrap_err();
//! let error = error.client_response_error().unwrap();
//! assert_eq!(error.status(), 404);
//! assert_eq!(error.body().decoded().unwrap().title, "Not Found");
//! # });
//! ```

mod body;
mod error;

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use bytes::Bytes;
use http::{HeaderMap, Request, Response, header::CONTENT_TYPE};
use http_body::Body;
use http_body_util::BodyExt;
use mime::Mime;
use tower_layer::Layer;
use tower_service::Service;

pub use body::ReplayBody;
pub use error::InterceptError;

#[cfg(feature = "json")]
use crate::problem::{APPLICATION_PROBLEM_JSON, ProblemDetails};
use crate::{
    error::{BodyOutcome, BoxError, ClientResponseError, DecodeError, RequestSnapshot},
    policy::RedactionConfig,
};

type DecodeFn<A> = dyn Fn(&[u8]) -> Result<A, DecodeError> + Send + Sync;
type RenderFn<A> = dyn Fn(&A) -> Option<String> + Send + Sync;

/// Boxed future returned by [`Intercept`].
pub type ResponseFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Layer producing [`Intercept`] services.
pub struct InterceptLayer<A> {
    essence: String,
    config: RedactionConfig,
    decode: Arc<DecodeFn<A>>,
    render: Arc<RenderFn<A>>,
}

impl<A> InterceptLayer<A> {
    /// Intercepts responses whose media type essence equals `media_type`'s.
    ///
    /// Parameters such as `charset` are ignored on both sides. Decoded
    /// payloads are not rendered into messages unless [`render_with`] is set.
    ///
    /// [`render_with`]: Self::render_with
    pub fn for_content_type<D>(media_type: &Mime, config: RedactionConfig, decode: D) -> Self
    where
        D: Fn(&[u8]) -> Result<A, DecodeError> + Send + Sync + 'static,
    {
        Self::with_essence(media_type.essence_str(), config, decode)
    }

    fn with_essence<D>(essence: &str, config: RedactionConfig, decode: D) -> Self
    where
        D: Fn(&[u8]) -> Result<A, DecodeError> + Send + Sync + 'static,
    {
        Self {
            essence: essence.to_ascii_lowercase(),
            config,
            decode: Arc::new(decode),
            render: Arc::new(|_: &A| None),
        }
    }

    /// Sets how a decoded payload is shown in the error's `Body:` line.
    #[must_use]
    pub fn render_with<R>(mut self, render: R) -> Self
    where
        R: Fn(&A) -> Option<String> + Send + Sync + 'static,
    {
        self.render = Arc::new(render);
        self
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// The media type essence this layer intercepts, lowercased.
    pub fn media_type(&self) -> &str {
        &self.essence
    }

    fn matches(&self, headers: &HeaderMap) -> bool {
        headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Mime>().ok())
            .is_some_and(|mime| mime.essence_str().eq_ignore_ascii_case(&self.essence))
    }

    async fn intercept<B, E>(
        &self,
        request: &RequestSnapshot,
        response: Response<B>,
    ) -> Result<Response<ReplayBody<B>>, InterceptError<E, A>>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        if !self.matches(response.headers()) {
            tracing::trace!(
                status = %response.status(),
                media_type = %self.essence,
                "passing response through unread"
            );
            return Ok(response.map(ReplayBody::original));
        }

        let (parts, body) = response.into_parts();
        let collected = body
            .collect()
            .await
            .map_err(|error| InterceptError::Body(error.into()))?;
        let trailers = collected.trailers().cloned();
        let bytes = collected.to_bytes();

        match (self.decode)(&bytes) {
            Ok(payload) => {
                let error = ClientResponseError::from_outcome(
                    &self.config,
                    Some(request),
                    &parts,
                    BodyOutcome::Decoded(payload),
                    |payload| (self.render)(payload),
                );
                tracing::debug!(
                    status = %parts.status,
                    error = %error,
                    "raising structured error response"
                );
                Err(InterceptError::Response(Box::new(error)))
            }
            Err(error) => {
                tracing::debug!(
                    status = %parts.status,
                    len = bytes.len(),
                    error = %error,
                    "replaying buffered body that did not decode"
                );
                Ok(Response::from_parts(
                    parts,
                    ReplayBody::buffered(bytes, trailers),
                ))
            }
        }
    }
}

#[cfg(feature = "json")]
impl InterceptLayer<ProblemDetails> {
    /// Intercepts `application/problem+json` responses.
    ///
    /// Decoded problems are rendered as compact JSON.
    pub fn problem_json(config: RedactionConfig) -> Self {
        Self::with_essence(
            APPLICATION_PROBLEM_JSON,
            config,
            crate::error::decode_json::<ProblemDetails>,
        )
        .render_with(|problem| Some(problem.to_json_string()))
    }
}

impl<A> Clone for InterceptLayer<A> {
    fn clone(&self) -> Self {
        Self {
            essence: self.essence.clone(),
            config: self.config.clone(),
            decode: Arc::clone(&self.decode),
            render: Arc::clone(&self.render),
        }
    }
}

impl<A> fmt::Debug for InterceptLayer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptLayer")
            .field("media_type", &self.essence)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S, A> Layer<S> for InterceptLayer<A> {
    type Service = Intercept<S, A>;

    fn layer(&self, inner: S) -> Self::Service {
        Intercept {
            inner,
            layer: self.clone(),
        }
    }
}

/// Service created by [`InterceptLayer`].
pub struct Intercept<S, A> {
    inner: S,
    layer: InterceptLayer<A>,
}

impl<S, A> Intercept<S, A> {
    pub fn new(inner: S, layer: InterceptLayer<A>) -> Self {
        Self { inner, layer }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Clone, A> Clone for Intercept<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            layer: self.layer.clone(),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Intercept<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercept")
            .field("inner", &self.inner)
            .field("layer", &self.layer)
            .finish()
    }
}

impl<S, A, ReqBody, ResBody> Service<Request<ReqBody>> for Intercept<S, A>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Body<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
    A: Send + 'static,
{
    type Response = Response<ReplayBody<ResBody>>;
    type Error = InterceptError<S::Error, A>;
    type Future = ResponseFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(InterceptError::Service)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let snapshot = RequestSnapshot::of(&request);
        let future = self.inner.call(request);
        let layer = self.layer.clone();
        Box::pin(async move {
            let response = future.await.map_err(InterceptError::Service)?;
            layer.intercept(&snapshot, response).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type.parse().unwrap());
        headers
    }

    fn layer() -> InterceptLayer<String> {
        InterceptLayer::for_content_type(
            &mime::APPLICATION_JSON,
            RedactionConfig::default(),
            crate::error::decode_text,
        )
    }

    #[test]
    fn matches_on_essence_ignoring_case_and_parameters() {
        let layer = layer();
        assert!(layer.matches(&headers("application/json")));
        assert!(layer.matches(&headers("Application/JSON; charset=utf-8")));
        assert!(!layer.matches(&headers("text/plain")));
        assert!(!layer.matches(&headers("application/problem+json")));
        assert!(!layer.matches(&headers("not a media type")));
        assert!(!layer.matches(&HeaderMap::new()));
    }

    #[cfg(feature = "json")]
    #[test]
    fn problem_json_layer_targets_problem_media_type() {
        let layer = InterceptLayer::problem_json(RedactionConfig::default());
        assert_eq!(layer.media_type(), "application/problem+json");
        assert!(layer.matches(&headers("application/problem+json; charset=utf-8")));
        assert!(!layer.matches(&headers("application/json")));
    }
}
