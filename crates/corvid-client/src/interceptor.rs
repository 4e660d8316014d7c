//! The response interceptor pipeline.
//!
//! Four stages run in a fixed order around every transport call: token
//! refresh, connection-reset retry, error normalization, upgrade signal.
//! The order matters — both retry stages must have had their one chance
//! before a failure is normalized, and the upgrade signal observes the
//! already-normalized error.
//!
//! Retry state lives in a per-invocation [`Attempt`] value rather than on a
//! shared request object, so concurrent calls cannot interfere with each
//! other's markers.

use std::sync::Arc;

use corvid_auth::SharedTokenSource;
use reqwest::{Method, StatusCode};

use crate::error::{ApiError, ErrorBody};

/// Hook invoked when a normalized error is logged.
pub type ErrorHook = Arc<dyn Fn(&ApiError) + Send + Sync>;

/// Hook invoked when the server signals that this client must upgrade.
pub type UpgradeHook = Arc<dyn Fn() + Send + Sync>;

/// Per-invocation retry markers. Each retry class fires at most once; the
/// two classes are independent and may both fire on the same call.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Attempt {
    pub refresh_retried: bool,
    pub reset_retried: bool,
}

/// Terminal description of a failed attempt.
#[derive(Debug)]
pub(crate) enum Failure {
    /// The server answered with a non-success status.
    Status { status: StatusCode, body: ErrorBody },
    /// The transport failed before an HTTP response existed.
    Transport(reqwest::Error),
}

impl Failure {
    fn status(&self) -> Option<StatusCode> {
        match self {
            Failure::Status { status, .. } => Some(*status),
            Failure::Transport(_) => None,
        }
    }
}

/// Retries a 401 once after refreshing the access token.
pub(crate) struct RefreshTokenStage {
    refresh: Option<SharedTokenSource>,
}

impl RefreshTokenStage {
    pub(crate) fn new(refresh: Option<SharedTokenSource>) -> Self {
        Self { refresh }
    }

    /// Decide whether to re-issue the request after `failure`.
    ///
    /// Fires only when a refresh hook exists, the failure is a 401, the
    /// original request carried an `Authorization` header, and this attempt
    /// has not already been retried for a stale token. Returns the
    /// replacement header value; a refresh hook that yields nothing leaves
    /// the original failure to propagate.
    pub(crate) async fn consider(
        &self,
        failure: &Failure,
        sent_authorization: bool,
        attempt: &mut Attempt,
    ) -> Option<String> {
        let refresh = self.refresh.as_ref()?;

        if failure.status() != Some(StatusCode::UNAUTHORIZED)
            || !sent_authorization
            || attempt.refresh_retried
        {
            return None;
        }

        attempt.refresh_retried = true;

        let token = refresh.token().await.filter(|t| !t.is_empty())?;
        tracing::debug!(target: "corvid::http", "401 received, retrying with refreshed token");

        Some(format!("Bearer {token}"))
    }
}

/// Retries a connection-reset transport failure once.
pub(crate) struct ConnectionResetStage;

impl ConnectionResetStage {
    /// Retry when the transport reports a reset and this attempt has not
    /// already been retried for that reason.
    pub(crate) fn should_retry(&self, error: &reqwest::Error, attempt: &mut Attempt) -> bool {
        self.should_retry_reset(is_connection_reset(error), attempt)
    }

    fn should_retry_reset(&self, is_reset: bool, attempt: &mut Attempt) -> bool {
        if !is_reset || attempt.reset_retried {
            return false;
        }
        attempt.reset_retried = true;
        true
    }
}

/// Check whether a transport error is a connection reset.
pub(crate) fn is_connection_reset(error: &reqwest::Error) -> bool {
    source_chain_has_reset(error)
}

fn source_chain_has_reset(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(error);

    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionReset {
                return true;
            }
        }
        current = err.source();
    }

    false
}

/// Converts a terminal failure into the uniform [`ApiError`] shape and
/// decides whether it is logged.
pub(crate) struct NormalizerStage {
    on_error: Option<ErrorHook>,
    debug: bool,
}

impl NormalizerStage {
    pub(crate) fn new(on_error: Option<ErrorHook>, debug: bool) -> Self {
        Self { on_error, debug }
    }

    /// Build the normalized error.
    ///
    /// Server errors (status >= 500) are logged through the caller's hook or
    /// the default `tracing` sink; in debug mode every failure is logged.
    /// Client errors outside debug mode are not logged. The error is always
    /// returned for raising — logging is a side effect only.
    pub(crate) fn normalize(&self, method: &Method, url: &str, failure: Failure) -> ApiError {
        let (status_code, detail, errors) = match failure {
            Failure::Status { status, body } => {
                let detail = body.message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string()
                });
                (status.as_u16(), detail, body.errors.unwrap_or_default())
            }
            Failure::Transport(error) => (0, error.to_string(), Vec::new()),
        };

        let error = ApiError {
            status_code,
            message: format!("{status_code} {detail} <{method} {url}>"),
            errors,
        };

        if error.status_code >= 500 || self.debug {
            match &self.on_error {
                Some(hook) => hook(&error),
                None => tracing::error!(status = error.status_code, "{error}"),
            }
        }

        error
    }
}

/// Fires the forced-upgrade signal on a 406.
pub(crate) struct UpgradeRequiredStage {
    on_upgrade_required: Option<UpgradeHook>,
}

impl UpgradeRequiredStage {
    pub(crate) fn new(on_upgrade_required: Option<UpgradeHook>) -> Self {
        Self { on_upgrade_required }
    }

    /// Invoke the upgrade hook for a 406. Purely a side effect — the error
    /// propagates unchanged either way.
    pub(crate) fn observe(&self, error: &ApiError) {
        if error.status_code == StatusCode::NOT_ACCEPTABLE.as_u16() {
            if let Some(hook) = &self.on_upgrade_required {
                hook();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn status_failure(status: u16) -> Failure {
        Failure::Status {
            status: StatusCode::from_u16(status).unwrap(),
            body: ErrorBody::default(),
        }
    }

    fn status_failure_with_message(status: u16, message: &str) -> Failure {
        Failure::Status {
            status: StatusCode::from_u16(status).unwrap(),
            body: ErrorBody {
                message: Some(message.to_string()),
                errors: None,
            },
        }
    }

    // ── refresh stage ────────────────────────────────────────────────────

    fn refresher_of(token: Option<&str>) -> SharedTokenSource {
        let token = token.map(str::to_string);
        Arc::new(move || {
            let token = token.clone();
            async move { token }
        })
    }

    #[tokio::test]
    async fn refresh_fires_on_first_authorized_401() {
        let stage = RefreshTokenStage::new(Some(refresher_of(Some("new"))));
        let mut attempt = Attempt::default();

        let header = stage
            .consider(&status_failure(401), true, &mut attempt)
            .await;

        assert_eq!(header.as_deref(), Some("Bearer new"));
        assert!(attempt.refresh_retried);
    }

    #[tokio::test]
    async fn refresh_does_not_fire_twice() {
        let stage = RefreshTokenStage::new(Some(refresher_of(Some("new"))));
        let mut attempt = Attempt {
            refresh_retried: true,
            ..Attempt::default()
        };

        let header = stage
            .consider(&status_failure(401), true, &mut attempt)
            .await;
        assert!(header.is_none());
    }

    #[tokio::test]
    async fn refresh_requires_an_authorization_header() {
        let stage = RefreshTokenStage::new(Some(refresher_of(Some("new"))));
        let mut attempt = Attempt::default();

        let header = stage
            .consider(&status_failure(401), false, &mut attempt)
            .await;
        assert!(header.is_none());
        assert!(!attempt.refresh_retried);
    }

    #[tokio::test]
    async fn refresh_ignores_non_401_failures() {
        let stage = RefreshTokenStage::new(Some(refresher_of(Some("new"))));
        let mut attempt = Attempt::default();

        let header = stage
            .consider(&status_failure(500), true, &mut attempt)
            .await;
        assert!(header.is_none());
    }

    #[tokio::test]
    async fn refresh_without_hook_never_fires() {
        let stage = RefreshTokenStage::new(None);
        let mut attempt = Attempt::default();

        let header = stage
            .consider(&status_failure(401), true, &mut attempt)
            .await;
        assert!(header.is_none());
    }

    #[tokio::test]
    async fn refresher_returning_nothing_propagates_the_failure() {
        let stage = RefreshTokenStage::new(Some(refresher_of(None)));
        let mut attempt = Attempt::default();

        let header = stage
            .consider(&status_failure(401), true, &mut attempt)
            .await;

        assert!(header.is_none());
        // The attempt is still marked: a second 401 will not refresh again.
        assert!(attempt.refresh_retried);
    }

    // ── reset stage ──────────────────────────────────────────────────────

    #[test]
    fn reset_retries_exactly_once() {
        let stage = ConnectionResetStage;
        let mut attempt = Attempt::default();

        assert!(stage.should_retry_reset(true, &mut attempt));
        assert!(attempt.reset_retried);
        assert!(!stage.should_retry_reset(true, &mut attempt));
    }

    #[test]
    fn non_reset_failures_are_not_retried() {
        let stage = ConnectionResetStage;
        let mut attempt = Attempt::default();

        assert!(!stage.should_retry_reset(false, &mut attempt));
        assert!(!attempt.reset_retried);
    }

    #[test]
    fn reset_is_found_anywhere_in_the_source_chain() {
        #[derive(Debug)]
        struct Wrapper(std::io::Error);

        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "wrapped: {}", self.0)
            }
        }

        impl std::error::Error for Wrapper {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let reset = Wrapper(std::io::Error::from(std::io::ErrorKind::ConnectionReset));
        assert!(source_chain_has_reset(&reset));

        let refused = Wrapper(std::io::Error::from(std::io::ErrorKind::ConnectionRefused));
        assert!(!source_chain_has_reset(&refused));

        let bare = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        assert!(source_chain_has_reset(&bare));
    }

    // ── normalizer stage ─────────────────────────────────────────────────

    #[test]
    fn normalizer_builds_the_uniform_message() {
        let stage = NormalizerStage::new(None, false);
        let error = stage.normalize(
            &Method::GET,
            "http://api.com/endpoint",
            status_failure_with_message(500, "Internal Server Error"),
        );

        assert_eq!(error.status_code, 500);
        assert!(error.message.contains("500 Internal Server Error"));
        assert!(error.message.contains("<GET http://api.com/endpoint>"));
    }

    #[test]
    fn normalizer_falls_back_to_the_canonical_reason() {
        let stage = NormalizerStage::new(None, false);
        let error = stage.normalize(&Method::GET, "http://api.com/x", status_failure(502));

        assert_eq!(error.message, "502 Bad Gateway <GET http://api.com/x>");
    }

    #[test]
    fn normalizer_logs_server_errors_through_the_hook() {
        let seen: Arc<Mutex<Vec<u16>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hook: ErrorHook = Arc::new(move |e| sink.lock().unwrap().push(e.status_code));

        let stage = NormalizerStage::new(Some(hook), false);
        stage.normalize(&Method::GET, "http://api.com/x", status_failure(500));
        stage.normalize(&Method::GET, "http://api.com/x", status_failure(400));

        assert_eq!(*seen.lock().unwrap(), vec![500]);
    }

    #[test]
    fn normalizer_logs_everything_in_debug_mode() {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        let hook: ErrorHook = Arc::new(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let stage = NormalizerStage::new(Some(hook), true);
        stage.normalize(&Method::GET, "http://api.com/x", status_failure(400));
        stage.normalize(&Method::GET, "http://api.com/x", status_failure(500));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn normalizer_carries_validation_issues() {
        let stage = NormalizerStage::new(None, false);
        let failure = Failure::Status {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: Some("Bad Request".to_string()),
                errors: Some(vec![crate::error::ValidationIssue {
                    property: "title".to_string(),
                    constraint: "required".to_string(),
                    message: "title is required".to_string(),
                }]),
            },
        };

        let error = stage.normalize(&Method::POST, "http://api.com/articles", failure);
        assert_eq!(error.errors.len(), 1);
        assert_eq!(error.errors[0].property, "title");
    }

    // ── upgrade stage ────────────────────────────────────────────────────

    #[test]
    fn upgrade_hook_fires_on_406_only() {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&count);
        let hook: UpgradeHook = Arc::new(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        let stage = UpgradeRequiredStage::new(Some(hook));
        let normalizer = NormalizerStage::new(None, false);

        let not_acceptable =
            normalizer.normalize(&Method::GET, "http://api.com/x", status_failure(406));
        let not_found = normalizer.normalize(&Method::GET, "http://api.com/x", status_failure(404));

        stage.observe(&not_acceptable);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        stage.observe(&not_found);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn upgrade_stage_without_hook_is_inert() {
        let stage = UpgradeRequiredStage::new(None);
        let normalizer = NormalizerStage::new(None, false);
        let error = normalizer.normalize(&Method::GET, "http://api.com/x", status_failure(406));

        // Nothing to assert beyond "does not panic".
        stage.observe(&error);
    }
}
