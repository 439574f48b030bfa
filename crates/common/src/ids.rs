//! Element ids and CSS class names used by the console

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{TestsuiteError, TestsuiteResult};

pub const ROOT_CONTAINER: &str = "hal-root-container";
pub const FINDER: &str = "hal-finder";
pub const HAL_MODAL: &str = "hal-modal";
pub const HAL_MODAL_FORM: &str = "hal-modal-form";

pub const ADD: &str = "add";
pub const FORM: &str = "form";
pub const TABLE: &str = "table";
pub const TAB: &str = "tab";
pub const EDITING: &str = "editing";
pub const READONLY: &str = "readonly";

/// CSS class names
pub mod css {
    pub const TOAST_NOTIFICATIONS_LIST_PF: &str = "toast-notifications-list-pf";
    pub const ALERT_SUCCESS: &str = "alert-success";
    pub const ALERT_DANGER: &str = "alert-danger";
    pub const NAVBAR: &str = "navbar";
    pub const NAV_PF_VERTICAL: &str = "nav-pf-vertical";
    pub const HAS_ERROR: &str = "has-error";
    pub const FORM_GROUP: &str = "form-group";
    pub const ACTIVE: &str = "active";
    pub const SELECTED: &str = "selected";
    pub const BTN_PRIMARY: &str = "btn-primary";
    pub const BREADCRUMB: &str = "breadcrumb";
    pub const DATA_TABLE_BUTTONS: &str = "dt-buttons";
}

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Turns arbitrary text into an id fragment: lower case, runs of anything
/// else than `[a-z0-9]` collapsed to `-`, no leading or trailing `-`.
pub fn as_id(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Builds an id from several parts, joined with `-`.
///
/// Empty additional parts are skipped. The first part must not be empty.
pub fn build(first: &str, rest: &[&str]) -> TestsuiteResult<String> {
    let head = as_id(first);
    if head.is_empty() {
        return Err(TestsuiteError::InvalidId(format!(
            "first id part must not be empty (got {:?})",
            first
        )));
    }

    let mut parts = vec![head];
    parts.extend(rest.iter().map(|part| as_id(part)).filter(|id| !id.is_empty()));
    Ok(parts.join("-"))
}
