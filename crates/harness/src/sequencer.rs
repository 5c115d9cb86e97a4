//! Deterministic cross-file test ordering.
//!
//! The backend is stateful for the whole run: the admin account, its
//! rate-limit budget, and the `shop1`-style owner accounts created by
//! flow tests are shared by every file. Default collection order would
//! leave those dependencies implicit and fragile; instead the order is
//! fixed up front by a static priority table, ascending:
//!
//! 1. flow files that establish long-lived state,
//! 2. flow files that consume it,
//! 3. files not named in the table (independent probes),
//! 4. credential-disruptive files (password change, logout),
//! 5. pure-negative files and idempotent catalog probes.
//!
//! Within one file whose tests have a known internal ordering (the auth
//! flow), a secondary table assigns per-test ranks. Sorting is a pure
//! function of `(file, test name)` - no test or fixture runs during
//! ordering - and the sort is stable, so ties keep collection order.

use crate::runner::TestCase;

/// Priority assigned to files absent from the table.
const DEFAULT_FILE_PRIORITY: i32 = 50;

/// Composite ordering key: `(file priority, in-file rank)`.
pub type Priority = (i32, i32);

/// Test ordering policy.
#[derive(Debug, Clone)]
pub struct Sequencer {
    files: Vec<(&'static str, i32)>,
    methods: Vec<(&'static str, &'static str, i32)>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self {
            files: vec![
                // Establishes the session admin + shop-owner credentials
                // and the long-lived shop they hang off.
                ("auth/flow", 10),
                // Flow files consuming session state.
                ("admin/business_flow", 20),
                ("shop_owner/business_flow", 30),
                ("frontend/flow", 40),
                // Credential-disruptive files: password rewrites, then
                // logouts that invalidate the session tokens.
                ("auth/password_change", 60),
                ("auth/logout", 70),
                // Pure-negative and idempotent probes.
                ("auth/unauthorized", 80),
                ("frontend/catalog", 90),
            ],
            methods: vec![
                ("auth/flow", "admin_login", 1),
                ("auth/flow", "shop_owner_login", 2),
                ("auth/flow", "shop_owner_refresh", 3),
                ("auth/flow", "temp_token_login", 4),
            ],
        }
    }
}

impl Sequencer {
    /// Build a sequencer from explicit tables.
    #[must_use]
    pub const fn new(
        files: Vec<(&'static str, i32)>,
        methods: Vec<(&'static str, &'static str, i32)>,
    ) -> Self {
        Self { files, methods }
    }

    /// The composite priority for one test.
    #[must_use]
    pub fn priority(&self, file: &str, name: &str) -> Priority {
        let file_priority = self
            .files
            .iter()
            .find(|(known, _)| *known == file)
            .map_or(DEFAULT_FILE_PRIORITY, |(_, priority)| *priority);
        let rank = self
            .methods
            .iter()
            .find(|(known_file, known_name, _)| *known_file == file && *known_name == name)
            .map_or(0, |(_, _, rank)| *rank);
        (file_priority, rank)
    }

    /// Sort cases ascending by composite priority; ties keep their
    /// input order (stable sort).
    pub fn order(&self, cases: &mut [TestCase]) {
        cases.sort_by_key(|case| self.priority(case.file, case.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CaseFuture, Module, TestCtx};

    fn noop(_ctx: TestCtx) -> CaseFuture {
        Box::pin(async { Ok(()) })
    }

    fn case(module: Module, file: &'static str, name: &'static str) -> TestCase {
        TestCase {
            module,
            file,
            name,
            run: noop,
        }
    }

    fn ids(cases: &[TestCase]) -> Vec<String> {
        cases.iter().map(TestCase::id).collect()
    }

    #[test]
    fn files_follow_the_priority_table() {
        let mut cases = vec![
            case(Module::Auth, "auth/unauthorized", "admin_without_token"),
            case(Module::Frontend, "frontend/flow", "register_and_login"),
            case(Module::Auth, "auth/flow", "admin_login"),
            case(Module::Admin, "admin/business_flow", "shop_lifecycle"),
        ];
        Sequencer::default().order(&mut cases);
        assert_eq!(
            ids(&cases),
            vec![
                "auth/flow::admin_login",
                "admin/business_flow::shop_lifecycle",
                "frontend/flow::register_and_login",
                "auth/unauthorized::admin_without_token",
            ]
        );
    }

    #[test]
    fn unknown_files_get_the_default_mid_range_priority() {
        let mut cases = vec![
            case(Module::Auth, "auth/unauthorized", "probe"),
            case(Module::Admin, "admin/somewhere_new", "probe"),
            case(Module::Auth, "auth/flow", "admin_login"),
        ];
        Sequencer::default().order(&mut cases);
        assert_eq!(
            ids(&cases),
            vec![
                "auth/flow::admin_login",
                "admin/somewhere_new::probe",
                "auth/unauthorized::probe",
            ]
        );
    }

    #[test]
    fn in_file_ranks_order_the_auth_flow() {
        let mut cases = vec![
            case(Module::Auth, "auth/flow", "temp_token_login"),
            case(Module::Auth, "auth/flow", "shop_owner_login"),
            case(Module::Auth, "auth/flow", "admin_login"),
        ];
        Sequencer::default().order(&mut cases);
        assert_eq!(
            ids(&cases),
            vec![
                "auth/flow::admin_login",
                "auth/flow::shop_owner_login",
                "auth/flow::temp_token_login",
            ]
        );
    }

    #[test]
    fn sorting_is_stable_for_equal_priorities() {
        let mut cases = vec![
            case(Module::Admin, "admin/probes", "b_second"),
            case(Module::Admin, "admin/probes", "a_first"),
        ];
        Sequencer::default().order(&mut cases);
        assert_eq!(ids(&cases), vec!["admin/probes::b_second", "admin/probes::a_first"]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let mut cases = vec![
            case(Module::Auth, "auth/logout", "owner_logout"),
            case(Module::Auth, "auth/flow", "admin_login"),
            case(Module::Admin, "admin/probes", "shop_list"),
        ];
        let sequencer = Sequencer::default();
        sequencer.order(&mut cases);
        let once = ids(&cases);
        sequencer.order(&mut cases);
        assert_eq!(ids(&cases), once);
    }
}
