//! Menu tests: navigation tree filtering, URLs, the editor list and their HTML.

mod common;

use custompages::auth::session::{MANAGE_PAGES, SITE_ADMIN};
use custompages::menu::{
    self, build_menu, list_pages, navigation, page_url, render_menu_html, render_page_list_html,
};
use custompages::models::page::{PageType, ROOT_PARENT};
use custompages::models::setting::PluginSettings;
use custompages::store::PageStore;
use common::*;

fn labels(nodes: &[menu::MenuNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.label.as_str()).collect()
}

#[test]
fn test_menu_filters_hidden_pages() {
    let mut hidden = root_page(2, "Hidden");
    hidden.on_menu = false;
    let mut deleted = root_page(3, "Deleted");
    deleted.deleted = true;
    let mut scheduled = root_page(4, "Scheduled");
    scheduled.visible_from = tomorrow();
    let mut form = root_page(5, "Form");
    form.page_type = PageType::Form;
    let mut restricted = root_page(6, "Staff");
    restricted.access_rule = "site.staff".to_string();

    let pages = vec![root_page(1, "Home"), hidden, deleted, scheduled, form, restricted];
    let menu = build_menu(&pages, ROOT_PARENT, &anonymous(), &PluginSettings::default(), now());
    assert_eq!(labels(&menu), vec!["Home"]);

    let staff = actor_with(&["site.staff"]);
    let menu = build_menu(&pages, ROOT_PARENT, &staff, &PluginSettings::default(), now());
    assert_eq!(labels(&menu), vec!["Home", "Staff"]);
}

#[test]
fn test_menu_nests_and_orders_children() {
    let mut b = page(3, 1, "B");
    b.sort_order = 2;
    let mut a = page(2, 1, "A");
    a.sort_order = 1;
    let pages = vec![root_page(1, "Parent"), b, a, page(4, 2, "Grandchild")];

    let menu = build_menu(&pages, ROOT_PARENT, &anonymous(), &PluginSettings::default(), now());
    assert_eq!(menu.len(), 1);
    assert_eq!(labels(&menu[0].children), vec!["A", "B"]);
    assert_eq!(labels(&menu[0].children[0].children), vec!["Grandchild"]);
}

#[test]
fn test_denied_parent_hides_subtree() {
    let mut parent = root_page(1, "Members");
    parent.access_rule = "members.view".to_string();
    let pages = vec![parent, page(2, 1, "Child")];
    let menu = build_menu(&pages, ROOT_PARENT, &anonymous(), &PluginSettings::default(), now());
    assert!(menu.is_empty());
}

#[test]
fn test_page_urls_follow_clean_url_setting() {
    let mut about = root_page(7, "About");
    about.menu_slug = "about".to_string();
    let plain = PluginSettings::default();
    let clean = PluginSettings { cleanurl_enabled: true, ..PluginSettings::default() };

    assert_eq!(page_url(&about, &plain), "/pages/?id=7");
    assert_eq!(page_url(&about, &clean), "/pages/about");
    assert_eq!(page_url(&root_page(8, "No slug"), &clean), "/pages/?id=8");
}

#[test]
fn test_cycle_in_parent_chain_terminates() {
    // 1 -> 2 -> 1 is unreachable from the root, so hang 2 off the root as well.
    let pages = vec![root_page(1, "One"), page(2, 1, "Two"), page(1, 2, "One again")];
    let menu = build_menu(&pages, ROOT_PARENT, &anonymous(), &PluginSettings::default(), now());
    assert_eq!(labels(&menu), vec!["One"]);
    assert_eq!(labels(&menu[0].children), vec!["Two"]);
    assert!(menu[0].children[0].children.is_empty());
}

#[test]
fn test_navigation_adds_editor_link_for_page_managers() {
    let pages = vec![root_page(1, "Home")];
    let settings = PluginSettings::default();

    let manager = actor_with(&[MANAGE_PAGES]);
    let nav = navigation(&pages, &manager, manager.can_manage_pages(), manager.is_admin(), &settings, now());
    assert_eq!(labels(&nav), vec!["Pages", "Home"]);
    assert_eq!(nav[0].url, "/pages/admin");

    let admin = actor_with(&[SITE_ADMIN]);
    let nav = navigation(&pages, &admin, admin.can_manage_pages(), admin.is_admin(), &settings, now());
    assert_eq!(labels(&nav), vec!["Home"]);
}

#[test]
fn test_menu_html_escapes_labels() {
    let pages = vec![root_page(1, "Tom & <Jerry>"), page(2, 1, "Child")];
    let menu = build_menu(&pages, ROOT_PARENT, &anonymous(), &PluginSettings::default(), now());
    let html = render_menu_html(&menu);
    assert!(html.starts_with("<ul class=\"custompages_nav\">"));
    assert!(html.contains("Tom &amp; &lt;Jerry&gt;"));
    assert!(html.contains("<ul class=\"custompages_submenu\">"));
    assert!(html.contains("href=\"/pages/?id=2\""));
}

#[test]
fn test_editor_list_ignores_menu_filters() {
    let mut hidden = page(2, 1, "Hidden form");
    hidden.page_type = PageType::Form;
    hidden.on_menu = false;
    hidden.visible_from = tomorrow();
    hidden.access_rule = "nobody.has.this".to_string();
    let mut deleted = root_page(3, "Deleted");
    deleted.deleted = true;

    let list = list_pages(&[root_page(1, "Home"), hidden, deleted]);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].children[0].name, "Hidden form");

    let html = render_page_list_html(&list, "tok123");
    assert!(html.contains("action=\"/pages/admin/2/delete\""));
    assert!(html.contains("name=\"csrf_token\" value=\"tok123\""));
    assert!(html.contains("href=\"/pages/admin/1/edit\""));
    assert!(html.contains("<h4 class=\"custompages-title\">Hidden form</h4>"));
    assert!(html.contains("href=\"/pages/admin/new\""));
    assert!(!html.contains("Deleted"));
}

#[tokio::test]
async fn test_store_menu_pages_feed_the_menu() {
    let mut later = root_page(2, "Later");
    later.visible_from = tomorrow();
    let store = MemoryStore::with_pages(vec![root_page(1, "Now"), later]);

    let pages = store.menu_pages(now()).await.unwrap();
    let menu = build_menu(&pages, ROOT_PARENT, &anonymous(), &PluginSettings::default(), now());
    assert_eq!(labels(&menu), vec!["Now"]);
}
