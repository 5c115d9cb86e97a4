//! End-to-end suites for the OrderEase backend.
//!
//! Each module contributes a list of [`TestCase`]s against one role's
//! slice of the API. Cases are collected here and handed to the
//! harness runner, which orders and executes them; nothing in this
//! crate assumes an execution order beyond what the sequencer's
//! priority table guarantees.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod auth;
pub mod frontend;
pub mod shop_owner;

use orderease_harness::{Module, TestCase};

/// All cases from every suite, in declaration order.
#[must_use]
pub fn all_cases() -> Vec<TestCase> {
    let mut cases = auth::cases();
    cases.extend(admin::cases());
    cases.extend(shop_owner::cases());
    cases.extend(frontend::cases());
    cases
}

/// Cases filtered to one module, or all of them.
#[must_use]
pub fn cases_for(module: Option<Module>) -> Vec<TestCase> {
    let mut cases = all_cases();
    if let Some(module) = module {
        cases.retain(|case| case.module == module);
    }
    cases
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn case_ids_are_unique() {
        let cases = all_cases();
        let ids: HashSet<String> = cases.iter().map(TestCase::id).collect();
        assert_eq!(ids.len(), cases.len());
    }

    #[test]
    fn every_module_contributes_cases() {
        for module in [
            Module::Auth,
            Module::Admin,
            Module::ShopOwner,
            Module::Frontend,
        ] {
            assert!(
                !cases_for(Some(module)).is_empty(),
                "no cases for module {module}"
            );
        }
    }

    #[test]
    fn module_filter_is_a_strict_subset() {
        let all = all_cases().len();
        let auth_only = cases_for(Some(Module::Auth)).len();
        assert!(auth_only > 0);
        assert!(auth_only < all);
        assert_eq!(cases_for(None).len(), all);
    }
}
