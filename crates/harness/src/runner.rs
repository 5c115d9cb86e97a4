//! Test case registry and sequential executor.
//!
//! Cases are plain data: a module tag, a file key for the sequencer, a
//! name, and an async body. The runner orders them once, then executes
//! strictly one at a time. Session-scoped fixture state is shared
//! across tests behind a lock (execution is sequential, so the lock is
//! never contended; it exists to keep the sharing explicit), while each
//! test gets a fresh function scope whose cleanups run as soon as the
//! test finishes. Session cleanups run once, after the last test.

use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::api::ApiClient;
use crate::error::TestError;
use crate::fixtures::{FixtureRegistry, FixtureValue, Scope};
use crate::sequencer::Sequencer;

/// Role-oriented suite grouping, used by `--module` filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Auth,
    Admin,
    ShopOwner,
    Frontend,
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Auth => "auth",
            Self::Admin => "admin",
            Self::ShopOwner => "shop-owner",
            Self::Frontend => "frontend",
        };
        f.write_str(name)
    }
}

/// Error for unrecognized module names.
#[derive(Debug, thiserror::Error)]
#[error("unknown module: {0} (expected auth, admin, shop-owner or frontend)")]
pub struct ParseModuleError(String);

impl FromStr for Module {
    type Err = ParseModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(Self::Auth),
            "admin" => Ok(Self::Admin),
            "shop-owner" | "shop_owner" => Ok(Self::ShopOwner),
            "frontend" => Ok(Self::Frontend),
            other => Err(ParseModuleError(other.to_string())),
        }
    }
}

/// Outcome of one test body.
pub type TestResult = Result<(), TestError>;

/// Boxed future returned by a test body.
pub type CaseFuture = std::pin::Pin<Box<dyn std::future::Future<Output = TestResult> + Send>>;

/// A test body; takes the per-test context by value.
pub type CaseFn = fn(TestCtx) -> CaseFuture;

/// One collected test.
pub struct TestCase {
    pub module: Module,
    /// Sequencer file key, e.g. `auth/flow`.
    pub file: &'static str,
    pub name: &'static str,
    pub run: CaseFn,
}

impl TestCase {
    /// Stable identifier: `file::name`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}::{}", self.file, self.name)
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("module", &self.module)
            .field("file", &self.file)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Per-test execution context.
///
/// Hands the test its fixtures and the backend client; cheap to move
/// into the test's future.
#[derive(Clone)]
pub struct TestCtx {
    api: ApiClient,
    registry: Arc<FixtureRegistry>,
    session: Arc<Mutex<Scope>>,
    function: Arc<Mutex<Scope>>,
}

impl TestCtx {
    /// The backend client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Resolve a fixture provider by name.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Fixture` for an unregistered name. A
    /// degraded provider is not an error here; check the returned
    /// value or use [`Self::require_token`] / [`Self::require_id`].
    pub async fn fixture(&self, name: &'static str) -> Result<FixtureValue, TestError> {
        let mut session = self.session.lock().await;
        let mut function = self.function.lock().await;
        let value = self
            .registry
            .resolve(name, &self.api, &mut *session, &mut *function)
            .await?;
        Ok(value)
    }

    /// Resolve a token fixture, skipping the test if it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Skipped` when the provider degraded, or
    /// `TestError::Fixture` for an unregistered name.
    pub async fn require_token(&self, name: &'static str) -> Result<String, TestError> {
        match self.fixture(name).await?.as_token() {
            Some(token) => Ok(token.to_string()),
            None => Err(TestError::skip(format!("fixture {name} unavailable"))),
        }
    }

    /// Resolve an id fixture, skipping the test if it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns `TestError::Skipped` when the provider degraded, or
    /// `TestError::Fixture` for an unregistered name.
    pub async fn require_id(&self, name: &'static str) -> Result<u64, TestError> {
        match self.fixture(name).await?.as_id() {
            Some(id) => Ok(id),
            None => Err(TestError::skip(format!("fixture {name} unavailable"))),
        }
    }

    /// Register a cleanup that runs when this test's scope closes,
    /// regardless of the test outcome.
    pub async fn on_cleanup<F, Fut>(&self, cleanup: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = TestResult> + Send + 'static,
    {
        self.function.lock().await.cleanups().push(cleanup);
    }
}

impl std::fmt::Debug for TestCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCtx").finish_non_exhaustive()
    }
}

/// Aggregate run outcome.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub passed: usize,
    pub skipped: usize,
    /// `(test id, failure message)` pairs.
    pub failures: Vec<(String, String)>,
}

impl RunSummary {
    /// Number of failed tests.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total number of executed tests.
    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.skipped + self.failed()
    }

    /// Whether the run should exit zero.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential test executor.
pub struct Runner {
    api: ApiClient,
    registry: Arc<FixtureRegistry>,
    sequencer: Sequencer,
    session: Arc<Mutex<Scope>>,
}

impl Runner {
    /// Create a runner over a validated registry.
    #[must_use]
    pub fn new(api: ApiClient, registry: FixtureRegistry, sequencer: Sequencer) -> Self {
        Self {
            api,
            registry: Arc::new(registry),
            sequencer,
            session: Arc::new(Mutex::new(Scope::new())),
        }
    }

    /// Order and execute the given cases, one at a time.
    ///
    /// Function-scope cleanups run after each test; session-scope
    /// cleanups run once after the last test.
    pub async fn run(&self, mut cases: Vec<TestCase>) -> RunSummary {
        self.sequencer.order(&mut cases);

        let mut summary = RunSummary::default();
        for case in cases {
            let id = case.id();
            let function = Arc::new(Mutex::new(Scope::new()));
            let ctx = TestCtx {
                api: self.api.clone(),
                registry: Arc::clone(&self.registry),
                session: Arc::clone(&self.session),
                function: Arc::clone(&function),
            };

            info!(test = %id, "running");
            let result = (case.run)(ctx).await;
            function.lock().await.close().await;

            match result {
                Ok(()) => {
                    info!(test = %id, "passed");
                    summary.passed += 1;
                }
                Err(TestError::Skipped(reason)) => {
                    info!(test = %id, %reason, "skipped");
                    summary.skipped += 1;
                }
                Err(failure) => {
                    error!(test = %id, %failure, "failed");
                    summary.failures.push((id, failure.to_string()));
                }
            }
        }

        self.session.lock().await.close().await;
        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::SuiteConfig;
    use crate::fixtures::{BuildFuture, Provider, ProviderCtx, ScopeKind, ValueKind};

    fn test_runner(registry: FixtureRegistry) -> Runner {
        let config = SuiteConfig::from_env().expect("default config");
        let api = ApiClient::new(&config).expect("client should build");
        Runner::new(api, registry, Sequencer::default())
    }

    fn passing(_ctx: TestCtx) -> CaseFuture {
        Box::pin(async { Ok(()) })
    }

    fn skipping(_ctx: TestCtx) -> CaseFuture {
        Box::pin(async { Err(TestError::skip("backend state missing")) })
    }

    fn failing(_ctx: TestCtx) -> CaseFuture {
        Box::pin(async {
            Err(TestError::Status {
                expected: vec![200],
                actual: 500,
                url: "http://test/".to_string(),
                body: String::new(),
            })
        })
    }

    #[tokio::test]
    async fn outcomes_are_classified() {
        let runner = test_runner(FixtureRegistry::new());
        let cases = vec![
            TestCase {
                module: Module::Admin,
                file: "admin/probes",
                name: "passes",
                run: passing,
            },
            TestCase {
                module: Module::Admin,
                file: "admin/probes",
                name: "skips",
                run: skipping,
            },
            TestCase {
                module: Module::Admin,
                file: "admin/probes",
                name: "fails",
                run: failing,
            },
        ];

        let summary = runner.run(cases).await;
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
        let (failed_id, _) = summary.failures.first().expect("one failure");
        assert_eq!(failed_id, "admin/probes::fails");
    }

    #[tokio::test]
    async fn session_fixture_survives_across_tests_and_closes_at_end() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        static CLEANUPS: AtomicUsize = AtomicUsize::new(0);

        fn counted(ctx: ProviderCtx) -> BuildFuture {
            Box::pin(async move {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                ctx.on_cleanup(|| async {
                    CLEANUPS.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                });
                FixtureValue::Token("shared".to_string())
            })
        }

        fn uses_fixture(ctx: TestCtx) -> CaseFuture {
            Box::pin(async move {
                let token = ctx.require_token("shared_token").await?;
                assert_eq!(token, "shared");
                Ok(())
            })
        }

        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "shared_token",
            ValueKind::Token,
            ScopeKind::Session,
            &[],
            counted,
        ));

        let runner = test_runner(registry);
        let cases = vec![
            TestCase {
                module: Module::Auth,
                file: "auth/flow",
                name: "first",
                run: uses_fixture,
            },
            TestCase {
                module: Module::Auth,
                file: "auth/flow",
                name: "second",
                run: uses_fixture,
            },
        ];

        let summary = runner.run(cases).await;
        assert_eq!(summary.passed, 2);
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(CLEANUPS.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unavailable_fixture_turns_into_a_skip() {
        fn requires_token(ctx: TestCtx) -> CaseFuture {
            Box::pin(async move {
                ctx.require_token("degraded_token").await?;
                Ok(())
            })
        }

        let mut registry = FixtureRegistry::new();
        registry.register(Provider::new(
            "degraded_token",
            ValueKind::Token,
            ScopeKind::Session,
            &[],
            |_ctx| Box::pin(async { FixtureValue::Token(String::new()) }),
        ));

        let runner = test_runner(registry);
        let summary = runner
            .run(vec![TestCase {
                module: Module::Auth,
                file: "auth/flow",
                name: "needs_token",
                run: requires_token,
            }])
            .await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed(), 0);
    }

    #[test]
    fn module_names_parse_both_spellings() {
        assert_eq!("shop-owner".parse::<Module>().ok(), Some(Module::ShopOwner));
        assert_eq!("shop_owner".parse::<Module>().ok(), Some(Module::ShopOwner));
        assert!("storefront".parse::<Module>().is_err());
    }
}
