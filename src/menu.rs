//! Navigation menus and the editor's page tree.
//!
//! Both walks run over a page list fetched once per request. Parent chains are
//! expected to be acyclic; a page reached twice is skipped and logged.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::access::{CapabilityCheck, can_access};
use crate::lang;
use crate::models::page::{Page, ROOT_PARENT};
use crate::models::setting::PluginSettings;
use crate::text::escape_html;

pub const BASE_URL: &str = "/pages";
pub const ADMIN_URL: &str = "/pages/admin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub children: Vec<MenuNode>,
}

/// URL of a page: slug based when clean URLs are on and a slug is set.
pub fn page_url(page: &Page, settings: &PluginSettings) -> String {
    let slug = page.menu_slug.trim();
    if settings.cleanurl_enabled && !slug.is_empty() {
        format!("{BASE_URL}/{slug}")
    } else {
        view_url(page.id)
    }
}

pub fn view_url(id: i64) -> String {
    format!("{BASE_URL}/?id={id}")
}

fn children_of(pages: &[Page], parent_id: i64) -> Vec<&Page> {
    let mut children: Vec<&Page> = pages.iter().filter(|p| p.parent_id == parent_id).collect();
    children.sort_by_key(|p| (p.sort_order, p.id));
    children
}

/// Menu tree below `parent_id` as seen by an actor holding `caps`.
pub fn build_menu(
    pages: &[Page],
    parent_id: i64,
    caps: &impl CapabilityCheck,
    settings: &PluginSettings,
    now: DateTime<Utc>,
) -> Vec<MenuNode> {
    let mut visited = HashSet::new();
    walk_menu(pages, parent_id, caps, settings, now, &mut visited)
}

fn walk_menu(
    pages: &[Page],
    parent_id: i64,
    caps: &impl CapabilityCheck,
    settings: &PluginSettings,
    now: DateTime<Utc>,
    visited: &mut HashSet<i64>,
) -> Vec<MenuNode> {
    let mut nodes = Vec::new();
    for page in children_of(pages, parent_id) {
        if !page.is_menu_visible(now) || !can_access(&page.access_rule, caps) {
            continue;
        }
        if !visited.insert(page.id) {
            log::warn!("Page {} appears twice in the menu tree; parent chain has a cycle", page.id);
            continue;
        }
        nodes.push(MenuNode {
            id: page.id,
            label: page.name.clone(),
            url: page_url(page, settings),
            children: walk_menu(pages, page.id, caps, settings, now, visited),
        });
    }
    nodes
}

/// Nodes the navigation hook adds to the host navigation on every page view.
///
/// Users who manage pages without being site administrators get a link to the
/// page editor first; administrators reach it through the host's admin tree.
pub fn navigation(
    pages: &[Page],
    caps: &impl CapabilityCheck,
    can_manage: bool,
    is_admin: bool,
    settings: &PluginSettings,
    now: DateTime<Utc>,
) -> Vec<MenuNode> {
    let mut nodes = Vec::new();
    if can_manage && !is_admin {
        nodes.push(MenuNode {
            id: 0,
            label: lang::get_string(lang::PLUGIN_NAME),
            url: ADMIN_URL.to_string(),
            children: Vec::new(),
        });
    }
    nodes.extend(build_menu(pages, ROOT_PARENT, caps, settings, now));
    nodes
}

/// Standalone `<ul>` rendition of a menu tree.
pub fn render_menu_html(nodes: &[MenuNode]) -> String {
    let mut html = String::from("<ul class=\"custompages_nav\">");
    for node in nodes {
        render_menu_item(node, &mut html);
    }
    html.push_str("</ul>");
    html
}

fn render_menu_item(node: &MenuNode, html: &mut String) {
    html.push_str(&format!(
        "<li class=\"custompages_item\"><a href=\"{}\">{}</a>",
        escape_html(&node.url),
        escape_html(&node.label)
    ));
    if !node.children.is_empty() {
        html.push_str("<ul class=\"custompages_submenu\">");
        for child in &node.children {
            render_menu_item(child, html);
        }
        html.push_str("</ul>");
    }
    html.push_str("</li>");
}

/// A node of the editor's page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageListNode {
    pub id: i64,
    pub name: String,
    pub children: Vec<PageListNode>,
}

/// Every non-deleted page as a tree, ignoring menu flags, dates and access rules.
pub fn list_pages(pages: &[Page]) -> Vec<PageListNode> {
    let live: Vec<Page> = pages.iter().filter(|p| !p.deleted).cloned().collect();
    let mut visited = HashSet::new();
    walk_list(&live, ROOT_PARENT, &mut visited)
}

fn walk_list(pages: &[Page], parent_id: i64, visited: &mut HashSet<i64>) -> Vec<PageListNode> {
    let mut nodes = Vec::new();
    for page in children_of(pages, parent_id) {
        if !visited.insert(page.id) {
            log::warn!("Page {} appears twice in the page list; parent chain has a cycle", page.id);
            continue;
        }
        nodes.push(PageListNode {
            id: page.id,
            name: page.name.clone(),
            children: walk_list(pages, page.id, visited),
        });
    }
    nodes
}

/// Editor list markup with View, Edit and Delete actions per page.
pub fn render_page_list_html(nodes: &[PageListNode], csrf_token: &str) -> String {
    let mut html = String::from("<ul class=\"custompages-list\">");
    for node in nodes {
        render_list_item(node, csrf_token, &mut html);
    }
    html.push_str(&format!(
        "<li class=\"custompages-list-element\"><a href=\"{ADMIN_URL}/new\" class=\"custompages-add\">{}</a></li>",
        escape_html(&lang::get_string(lang::ADD_PAGE))
    ));
    html.push_str("</ul>");
    html
}

fn render_list_item(node: &PageListNode, csrf_token: &str, html: &mut String) {
    html.push_str("<li class=\"custompages-list-element\">");
    html.push_str(&format!(
        "<div class=\"pages-action\">\
         <a href=\"{view}\" class=\"custompages-edit\">View</a> | \
         <a href=\"{ADMIN_URL}/{id}/edit\" class=\"custompages-edit\">Edit</a> | \
         <form method=\"post\" action=\"{ADMIN_URL}/{id}/delete\" class=\"custompages-delete-form\">\
         <input type=\"hidden\" name=\"csrf_token\" value=\"{csrf}\" />\
         <button type=\"submit\" class=\"custompages-delete\">Delete</button></form></div>",
        view = escape_html(&view_url(node.id)),
        id = node.id,
        csrf = escape_html(csrf_token),
    ));
    html.push_str(&format!("<h4 class=\"custompages-title\">{}</h4>", escape_html(&node.name)));
    if !node.children.is_empty() {
        html.push_str("<ul class=\"custompages_submenu\">");
        for child in &node.children {
            render_list_item(child, csrf_token, html);
        }
        html.push_str("</ul>");
    }
    html.push_str("</li>");
}
