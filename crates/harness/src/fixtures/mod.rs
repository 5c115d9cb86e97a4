//! Resource fixture graph.
//!
//! Tests against a live backend need real records to exist before they
//! run: a product test needs a shop, an order test needs a shop, a user
//! and a product. This module models those prerequisites as a directed
//! acyclic graph of named providers. Each provider declares the
//! providers it depends on, a cache scope, and an async build body that
//! talks to the backend through the [`ApiClient`].
//!
//! Resolution is depth-first with memoization per scope: a
//! session-scoped provider runs its body at most once per run no matter
//! how many tests request it. Providers never fail hard; a provider
//! that cannot produce its resource yields an *unavailable* sentinel
//! (`Token("")` / `Id(None)`) and every provider downstream of it is
//! degraded to its own sentinel without touching the backend. Tests
//! observing a sentinel skip instead of failing, so one missing
//! resource cannot cascade into unrelated failures.
//!
//! Providers that create mutable backend records register a cleanup
//! with the owning scope; scope teardown runs cleanups in reverse
//! registration order and isolates failures (logged, never raised), so
//! a product created after its shop is also deleted before it.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::error::TestError;

pub mod providers;

/// A resolved fixture value.
///
/// The sentinel forms (`Token` with an empty string, `Id(None)`) mean
/// the resource could not be created or discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureValue {
    /// A bearer token.
    Token(String),
    /// A backend record id.
    Id(Option<u64>),
}

impl FixtureValue {
    /// Whether this value is the unavailable sentinel.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Token(token) => token.is_empty(),
            Self::Id(id) => id.is_none(),
        }
    }

    /// The token, if present and non-empty.
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Self::Token(token) if !token.is_empty() => Some(token),
            _ => None,
        }
    }

    /// The id, if present.
    #[must_use]
    pub const fn as_id(&self) -> Option<u64> {
        match self {
            Self::Id(id) => *id,
            Self::Token(_) => None,
        }
    }
}

/// The kind of value a provider produces, used to pick the right
/// sentinel when the provider is degraded without running its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Token,
    Id,
}

impl ValueKind {
    /// The unavailable sentinel for this kind.
    #[must_use]
    pub const fn unavailable(self) -> FixtureValue {
        match self {
            Self::Token => FixtureValue::Token(String::new()),
            Self::Id => FixtureValue::Id(None),
        }
    }
}

/// Cache lifetime of a provider's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// One instance per test run.
    Session,
    /// One instance per test.
    Function,
}

/// A deferred teardown action.
pub type CleanupFn =
    Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), TestError>> + Send>> + Send>;

/// Shared handle to a scope's pending cleanups.
///
/// Providers hold a clone so a build body can register teardown for the
/// records it creates without borrowing the scope itself.
#[derive(Clone, Default)]
pub struct CleanupQueue {
    inner: Arc<Mutex<Vec<CleanupFn>>>,
}

impl CleanupQueue {
    /// Register a cleanup to run when the owning scope closes.
    pub fn push<F, Fut>(&self, cleanup: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TestError>> + Send + 'static,
    {
        self.lock().push(Box::new(move || Box::pin(cleanup())));
    }

    /// Number of cleanups currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no cleanups are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn drain(&self) -> Vec<CleanupFn> {
        self.lock().drain(..).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CleanupFn>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CleanupQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// A fixture cache plus its pending cleanups.
#[derive(Debug, Default)]
pub struct Scope {
    cache: HashMap<&'static str, FixtureValue>,
    cleanups: CleanupQueue,
}

impl Scope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The scope's cleanup queue.
    #[must_use]
    pub fn cleanups(&self) -> CleanupQueue {
        self.cleanups.clone()
    }

    /// Run all registered cleanups in reverse registration order.
    ///
    /// A failing cleanup is logged and does not prevent the remaining
    /// cleanups from running; teardown must never fail the run.
    pub async fn close(&mut self) {
        let mut pending = self.cleanups.drain();
        while let Some(cleanup) = pending.pop() {
            if let Err(error) = cleanup().await {
                warn!(%error, "fixture cleanup failed");
            }
        }
        self.cache.clear();
    }
}

/// Context handed to a provider's build body.
///
/// Owned so build bodies can be plain `'static` futures; the client is
/// a cheap handle and dependency values are small.
pub struct ProviderCtx {
    api: ApiClient,
    deps: HashMap<&'static str, FixtureValue>,
    cleanups: CleanupQueue,
}

impl ProviderCtx {
    /// The backend client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// A dependency's token, if it resolved to a usable one.
    #[must_use]
    pub fn token(&self, name: &str) -> Option<String> {
        self.deps
            .get(name)
            .and_then(|value| value.as_token().map(str::to_owned))
    }

    /// A dependency's id, if it resolved to one.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<u64> {
        self.deps.get(name).and_then(FixtureValue::as_id)
    }

    /// Register a cleanup with the scope that owns this provider.
    pub fn on_cleanup<F, Fut>(&self, cleanup: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TestError>> + Send + 'static,
    {
        self.cleanups.push(cleanup);
    }
}

/// Boxed future returned by a provider build body.
pub type BuildFuture = Pin<Box<dyn Future<Output = FixtureValue> + Send>>;

type BuildFn = Box<dyn Fn(ProviderCtx) -> BuildFuture + Send + Sync>;

/// A named, scope-cached resource provider.
pub struct Provider {
    name: &'static str,
    kind: ValueKind,
    scope: ScopeKind,
    deps: Vec<&'static str>,
    build: BuildFn,
}

impl Provider {
    /// Create a provider from its declaration and build body.
    pub fn new(
        name: &'static str,
        kind: ValueKind,
        scope: ScopeKind,
        deps: &[&'static str],
        build: impl Fn(ProviderCtx) -> BuildFuture + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            kind,
            scope,
            deps: deps.to_vec(),
            build: Box::new(build),
        }
    }

    /// Provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

/// Fixture graph configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// A provider name that is not registered.
    #[error("unknown fixture provider: {0}")]
    Unknown(String),

    /// The declared dependencies form a cycle.
    #[error("fixture dependency cycle: {0}")]
    Cycle(String),
}

/// Registry of providers keyed by name.
#[derive(Debug, Default)]
pub struct FixtureRegistry {
    providers: HashMap<&'static str, Provider>,
}

impl FixtureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any previous one with the same name.
    pub fn register(&mut self, provider: Provider) {
        self.providers.insert(provider.name, provider);
    }

    /// Check that every declared dependency exists and the graph is
    /// acyclic. Called once at startup; a cycle or dangling name is a
    /// configuration error, not a runtime one.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Unknown` or `FixtureError::Cycle`.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut done: HashMap<&'static str, bool> = HashMap::new();
        let mut names: Vec<&'static str> = self.providers.keys().copied().collect();
        names.sort_unstable();
        for name in names {
            self.visit(name, &mut done, &mut Vec::new())?;
        }
        Ok(())
    }

    fn visit(
        &self,
        name: &'static str,
        done: &mut HashMap<&'static str, bool>,
        stack: &mut Vec<&'static str>,
    ) -> Result<(), FixtureError> {
        match done.get(name) {
            Some(true) => return Ok(()),
            Some(false) => {
                let mut path = stack.clone();
                path.push(name);
                return Err(FixtureError::Cycle(path.join(" -> ")));
            }
            None => {}
        }
        let provider = self
            .providers
            .get(name)
            .ok_or_else(|| FixtureError::Unknown(name.to_string()))?;
        done.insert(name, false);
        stack.push(name);
        for dep in provider.deps.clone() {
            self.visit(dep, done, stack)?;
        }
        stack.pop();
        done.insert(name, true);
        Ok(())
    }

    /// Resolve a provider, resolving its dependencies first.
    ///
    /// Memoized per the provider's declared scope. If any dependency
    /// resolves to the unavailable sentinel the provider's body is not
    /// run and its own sentinel is cached instead.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Unknown` for an unregistered name.
    /// Backend failures do not error; they degrade to sentinels.
    pub async fn resolve(
        &self,
        name: &str,
        api: &ApiClient,
        session: &mut Scope,
        function: &mut Scope,
    ) -> Result<FixtureValue, FixtureError> {
        self.resolve_inner(name, api, session, function).await
    }

    fn resolve_inner<'a>(
        &'a self,
        name: &'a str,
        api: &'a ApiClient,
        session: &'a mut Scope,
        function: &'a mut Scope,
    ) -> Pin<Box<dyn Future<Output = Result<FixtureValue, FixtureError>> + Send + 'a>> {
        Box::pin(async move {
            let provider = self
                .providers
                .get(name)
                .ok_or_else(|| FixtureError::Unknown(name.to_string()))?;

            let cached = match provider.scope {
                ScopeKind::Session => session.cache.get(provider.name),
                ScopeKind::Function => function.cache.get(provider.name),
            };
            if let Some(value) = cached {
                return Ok(value.clone());
            }

            let mut deps = HashMap::new();
            let mut degraded = false;
            for dep in provider.deps.clone() {
                let value = self
                    .resolve_inner(dep, api, &mut *session, &mut *function)
                    .await?;
                if value.is_unavailable() {
                    degraded = true;
                }
                deps.insert(dep, value);
            }

            let value = if degraded {
                warn!(
                    provider = provider.name,
                    "dependency unavailable, degrading provider"
                );
                provider.kind.unavailable()
            } else {
                let cleanups = match provider.scope {
                    ScopeKind::Session => session.cleanups.clone(),
                    ScopeKind::Function => function.cleanups.clone(),
                };
                let ctx = ProviderCtx {
                    api: api.clone(),
                    deps,
                    cleanups,
                };
                let value = (provider.build)(ctx).await;
                debug!(provider = provider.name, value = ?value, "fixture resolved");
                value
            };

            let cache = match provider.scope {
                ScopeKind::Session => &mut session.cache,
                ScopeKind::Function => &mut function.cache,
            };
            cache.insert(provider.name, value.clone());
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::SuiteConfig;

    fn test_api() -> ApiClient {
        let config = SuiteConfig::from_env().expect("default config");
        ApiClient::new(&config).expect("client should build")
    }

    fn constant_token(value: &'static str) -> impl Fn(ProviderCtx) -> BuildFuture {
        move |_ctx| Box::pin(async move { FixtureValue::Token(value.to_string()) })
    }

    #[tokio::test]
    async fn session_provider_body_runs_once() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "token",
            ValueKind::Token,
            ScopeKind::Session,
            &[],
            |_ctx| {
                Box::pin(async {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                    FixtureValue::Token("session-token".to_string())
                })
            },
        ));

        let api = test_api();
        let mut session = Scope::new();
        let mut function = Scope::new();
        for _ in 0..3 {
            let value = registry
                .resolve("token", &api, &mut session, &mut function)
                .await
                .expect("provider is registered");
            assert_eq!(value.as_token(), Some("session-token"));
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn function_provider_rebuilds_per_scope() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "record",
            ValueKind::Id,
            ScopeKind::Function,
            &[],
            |_ctx| {
                Box::pin(async {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                    FixtureValue::Id(Some(7))
                })
            },
        ));

        let api = test_api();
        let mut session = Scope::new();
        for _ in 0..2 {
            let mut function = Scope::new();
            registry
                .resolve("record", &api, &mut session, &mut function)
                .await
                .expect("provider is registered");
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unavailable_dependency_degrades_without_running_body() {
        static DOWNSTREAM_CALLS: AtomicUsize = AtomicUsize::new(0);

        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "broken_token",
            ValueKind::Token,
            ScopeKind::Session,
            &[],
            constant_token(""),
        ));
        registry.register(Provider::new(
            "dependent_id",
            ValueKind::Id,
            ScopeKind::Session,
            &["broken_token"],
            |_ctx| {
                Box::pin(async {
                    DOWNSTREAM_CALLS.fetch_add(1, Ordering::SeqCst);
                    FixtureValue::Id(Some(1))
                })
            },
        ));

        let api = test_api();
        let mut session = Scope::new();
        let mut function = Scope::new();
        let value = registry
            .resolve("dependent_id", &api, &mut session, &mut function)
            .await
            .expect("provider is registered");
        assert_eq!(value, FixtureValue::Id(None));
        assert!(value.is_unavailable());
        assert_eq!(DOWNSTREAM_CALLS.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cleanups_run_in_reverse_order_and_are_isolated() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut scope = Scope::new();
        let queue = scope.cleanups();
        for name in ["a", "b", "c"] {
            let order = Arc::clone(&order);
            queue.push(move || async move {
                order
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(name);
                if name == "b" {
                    return Err(TestError::skip("simulated cleanup failure"));
                }
                Ok(())
            });
        }

        scope.close().await;
        let order = order.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(*order, vec!["c", "b", "a"]);
        assert!(scope.cleanups().is_empty());
    }

    #[test]
    fn cycle_is_a_configuration_error() {
        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "a",
            ValueKind::Token,
            ScopeKind::Session,
            &["b"],
            constant_token("a"),
        ));
        registry.register(Provider::new(
            "b",
            ValueKind::Token,
            ScopeKind::Session,
            &["a"],
            constant_token("b"),
        ));

        let err = registry.validate().expect_err("cycle should be rejected");
        assert!(matches!(err, FixtureError::Cycle(_)));
    }

    #[test]
    fn unknown_dependency_is_a_configuration_error() {
        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "a",
            ValueKind::Token,
            ScopeKind::Session,
            &["ghost"],
            constant_token("a"),
        ));

        let err = registry.validate().expect_err("dangling dep rejected");
        assert!(matches!(err, FixtureError::Unknown(name) if name == "ghost"));
    }
}
