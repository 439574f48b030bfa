//! Forms with a read-only and an editing state

use thirtyfour::components::SelectElement;
use thirtyfour::prelude::*;
use tracing::debug;

use crate::error::{TestsuiteError, TestsuiteResult};
use crate::fragment::{xpath_literal, Fragment, FragmentRoot};
use crate::ids::{self, css};
use crate::management::Value;
use crate::wait::has_class;

const BLANK_SLATE: &str = "blank-slate-pf";
const SWITCH: &str = "bootstrap-switch";
const TAG_REMOVE: &str = "tm-tag-remove";

/// A console form.
///
/// Fields are addressed by attribute name. The input of attribute `attr` in
/// form `f` has id `f-attr-editing`, its read-only value `f-attr-readonly`.
#[derive(Clone)]
pub struct FormFragment {
    root: FragmentRoot,
}

impl Fragment for FormFragment {
    fn create(root: FragmentRoot) -> Self {
        Self { root }
    }

    fn root(&self) -> &FragmentRoot {
        &self.root
    }
}

impl FormFragment {
    // ------------------------------------------------------ state

    /// Switches to editing state
    pub async fn edit(&self) -> TestsuiteResult<()> {
        debug!("edit form");
        self.operation_link("edit").await?.click().await?;
        let editing = self.section(ids::EDITING).await?;
        self.root.gui().element_visible(&editing).await
    }

    /// Saves and waits until the form is back in read-only state
    pub async fn save(&self) -> TestsuiteResult<()> {
        self.try_save().await?;
        let readonly = self.section(ids::READONLY).await?;
        self.root.model().element_visible(&readonly).await
    }

    /// Clicks save without waiting for the read-only state, for input that
    /// is expected to fail validation
    pub async fn try_save(&self) -> TestsuiteResult<()> {
        debug!("save form");
        self.operation_button("save").await?.click().await?;
        Ok(())
    }

    pub async fn cancel(&self) -> TestsuiteResult<()> {
        self.operation_button("cancel").await?.click().await?;
        let readonly = self.section(ids::READONLY).await?;
        self.root.gui().element_visible(&readonly).await
    }

    /// Opens the reset confirmation
    pub async fn reset(&self) -> TestsuiteResult<()> {
        debug!("reset form");
        self.operation_link("reset").await?.click().await?;
        Ok(())
    }

    /// Opens the remove confirmation of a singleton form
    pub async fn remove(&self) -> TestsuiteResult<()> {
        debug!("remove singleton");
        self.operation_link("remove").await?.click().await?;
        Ok(())
    }

    /// The empty state shown by singleton forms without a resource
    pub async fn empty_state(&self) -> TestsuiteResult<WebElement> {
        self.root.find(By::ClassName(BLANK_SLATE)).await
    }

    /// Clicks the primary action of the empty state
    pub async fn empty_state_add(&self) -> TestsuiteResult<()> {
        let empty = self.empty_state().await?;
        self.root.gui().element_visible(&empty).await?;
        empty
            .find(By::Css(format!("button.{}", css::BTN_PRIMARY)))
            .await?
            .click()
            .await?;
        Ok(())
    }

    // ------------------------------------------------------ input

    pub async fn text(&self, attribute: &str, value: &str) -> TestsuiteResult<()> {
        let input = self.input(attribute).await?;
        input.clear().await?;
        input.send_keys(value).await?;
        Ok(())
    }

    pub async fn number(&self, attribute: &str, value: i64) -> TestsuiteResult<()> {
        self.text(attribute, &value.to_string()).await
    }

    /// Sets a switch to `value`, clicking it only when it differs
    pub async fn flip(&self, attribute: &str, value: bool) -> TestsuiteResult<()> {
        let input = self.input(attribute).await?;
        if input.is_selected().await? != value {
            input.find(ancestor(SWITCH)).await?.click().await?;
        }
        Ok(())
    }

    /// Replaces the tags of a list input
    pub async fn list(&self, attribute: &str, values: &[String]) -> TestsuiteResult<()> {
        self.clear_tags(attribute).await?;
        let input = self.input(attribute).await?;
        for value in values {
            input.send_keys(value.as_str()).await?;
            input.send_keys(Key::Enter).await?;
        }
        Ok(())
    }

    /// Replaces the `key=value` tags of a properties input
    pub async fn properties(&self, attribute: &str, pairs: &[(String, String)]) -> TestsuiteResult<()> {
        let tags: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        self.list(attribute, &tags).await
    }

    pub async fn select(&self, attribute: &str, option: &str) -> TestsuiteResult<()> {
        let input = self.input(attribute).await?;
        SelectElement::new(&input).await?.select_by_value(option).await?;
        Ok(())
    }

    /// Empties a field. Switches are turned off, list inputs lose all tags.
    pub async fn clear(&self, attribute: &str) -> TestsuiteResult<()> {
        let input = self.input(attribute).await?;
        if input.attr("type").await?.as_deref() == Some("checkbox") {
            return self.flip(attribute, false).await;
        }
        self.clear_tags(attribute).await?;
        input.clear().await?;
        Ok(())
    }

    /// Sets a field according to the kind of value
    pub async fn set(&self, attribute: &str, value: &Value) -> TestsuiteResult<()> {
        debug!("set {} = {:?}", attribute, value);
        match value {
            Value::Text(s) => self.text(attribute, s).await,
            Value::Number(n) => self.number(attribute, *n).await,
            Value::Bool(b) => self.flip(attribute, *b).await,
            Value::List(items) => self.list(attribute, items).await,
            Value::Properties(pairs) => self.properties(attribute, pairs).await,
            Value::Undefined => self.clear(attribute).await,
        }
    }

    /// Sets several fields in order
    pub async fn fill(&self, fields: &[(&str, Value)]) -> TestsuiteResult<()> {
        for (attribute, value) in fields {
            self.set(attribute, value).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------ read-only values

    pub async fn value(&self, attribute: &str) -> TestsuiteResult<String> {
        let id = self.field_id(attribute, ids::READONLY).await?;
        let element = self.root.wait_for(By::Id(id)).await?;
        Ok(element.text().await?.trim().to_string())
    }

    pub async fn int_value(&self, attribute: &str) -> TestsuiteResult<i64> {
        let text = self.value(attribute).await?;
        text.parse().map_err(|_| {
            TestsuiteError::assertion(format!("{} is not a number: {:?}", attribute, text))
        })
    }

    pub async fn bool_value(&self, attribute: &str) -> TestsuiteResult<bool> {
        let text = self.value(attribute).await?;
        match text.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => Ok(true),
            "false" | "off" | "no" => Ok(false),
            _ => Err(TestsuiteError::assertion(format!(
                "{} is not a boolean: {:?}",
                attribute, text
            ))),
        }
    }

    /// Waits until the field shows a validation error
    pub async fn expect_error(&self, attribute: &str) -> TestsuiteResult<()> {
        let group = self.form_group(attribute).await?;
        self.root
            .gui()
            .element_has_class(&group, css::HAS_ERROR)
            .await
            .map_err(|_| TestsuiteError::assertion(format!("expected validation error for '{}'", attribute)))
    }

    /// Whether the field currently shows a validation error
    pub async fn has_error(&self, attribute: &str) -> TestsuiteResult<bool> {
        let group = self.form_group(attribute).await?;
        has_class(&group, css::HAS_ERROR).await
    }

    // ------------------------------------------------------ lookup

    async fn input(&self, attribute: &str) -> TestsuiteResult<WebElement> {
        let id = self.field_id(attribute, ids::EDITING).await?;
        self.root.wait_for(By::Id(id)).await
    }

    async fn form_group(&self, attribute: &str) -> TestsuiteResult<WebElement> {
        let input = self.input(attribute).await?;
        Ok(input.find(ancestor(css::FORM_GROUP)).await?)
    }

    async fn field_id(&self, attribute: &str, suffix: &str) -> TestsuiteResult<String> {
        let form_id = self.root.id().await?;
        ids::build(&form_id, &[attribute, suffix])
    }

    async fn section(&self, suffix: &str) -> TestsuiteResult<WebElement> {
        let form_id = self.root.id().await?;
        let id = ids::build(&form_id, &[suffix])?;
        self.root.wait_for(By::Id(id)).await
    }

    async fn clear_tags(&self, attribute: &str) -> TestsuiteResult<()> {
        let group = self.form_group(attribute).await?;
        for remove in group.find_all(By::ClassName(TAG_REMOVE)).await? {
            remove.click().await?;
        }
        Ok(())
    }

    async fn operation_link(&self, operation: &str) -> TestsuiteResult<WebElement> {
        self.root
            .wait_for(By::Css(format!("a[data-operation='{}']", operation)))
            .await
    }

    async fn operation_button(&self, operation: &str) -> TestsuiteResult<WebElement> {
        self.root
            .wait_for(By::Css(format!("button[data-operation='{}']", operation)))
            .await
    }
}

/// Closest ancestor `div` carrying `class`
fn ancestor(class: &str) -> By {
    By::XPath(format!(
        "./ancestor::div[contains(concat(' ', normalize-space(@class), ' '), {})][1]",
        xpath_literal(&format!(" {} ", class))
    ))
}
