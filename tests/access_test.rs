//! Access tests: rules evaluated against session permissions and actors.

mod common;

use custompages::auth::access::can_access;
use custompages::auth::session::{MANAGE_PAGES, Permissions, SITE_ADMIN};
use common::*;

#[test]
fn test_rules_against_session_permissions() {
    let perms = Permissions::from_csv("pages.view, course.teach,,");
    assert!(perms.has("course.teach"));
    assert!(can_access("pages.view", &perms));
    assert!(can_access("other.cap, course.teach", &perms));
    assert!(!can_access("other.cap", &perms));
    assert!(!can_access("!pages.view", &perms));
    assert!(can_access("!guest.only", &perms));
}

#[test]
fn test_first_granting_token_wins() {
    let perms = Permissions::from_csv("a.view");
    assert!(can_access("a.view, !a.view", &perms));
    assert!(can_access("!a.view, a.view", &perms));
    assert!(!can_access("!a.view, b.view", &perms));
}

#[test]
fn test_site_admin_holds_every_capability() {
    let admin = actor_with(&[SITE_ADMIN]);
    assert!(can_access("anything.at.all", &admin));
    assert!(!can_access("!anything.at.all", &admin));
    assert!(admin.can_manage_pages());
}

#[test]
fn test_manager_and_anonymous() {
    let manager = actor_with(&[MANAGE_PAGES]);
    assert!(manager.can_manage_pages());
    assert!(!manager.is_admin());

    let visitor = anonymous();
    assert!(can_access("", &visitor));
    assert!(!can_access("pages.view", &visitor));
    assert!(!visitor.can_manage_pages());
}
