//! The application contract: what a plugin registers against a hook.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::AppError;
use crate::host::MenuContext;

/// Outcome of an application's visibility predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Show the application.
    Visible,
    /// The application applies to this context but is hidden right now.
    Hidden,
    /// The application does not apply to this context at all.
    NotApplicable,
}

impl Visibility {
    /// Whether the application should be displayed.
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

impl From<bool> for Visibility {
    fn from(shown: bool) -> Self {
        if shown {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }
}

/// Styling for the button rendered for an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Icon name in the host's icon font.
    pub icon: String,
    /// Icon family (`"in"` for the built-in font).
    #[serde(rename = "iconType")]
    pub icon_type: String,
    /// Button background, as a CSS color.
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    /// Label color, as a CSS color.
    #[serde(rename = "fontColor")]
    pub font_color: String,
}

impl ButtonConfig {
    /// Button styling from its four host settings.
    pub fn new(
        icon: impl Into<String>,
        icon_type: impl Into<String>,
        background_color: impl Into<String>,
        font_color: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            icon_type: icon_type.into(),
            background_color: background_color.into(),
            font_color: font_color.into(),
        }
    }
}

/// Display metadata of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDescriptor {
    /// Button label.
    pub label: String,
    /// Tooltip text.
    pub description: String,
    /// Button styling.
    #[serde(rename = "buttonCfg")]
    pub button_cfg: ButtonConfig,
}

impl AppDescriptor {
    /// Descriptor with the given label, tooltip and styling.
    pub fn new(
        label: impl Into<String>,
        description: impl Into<String>,
        button_cfg: ButtonConfig,
    ) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            button_cfg,
        }
    }
}

/// An application that can be registered against a hook.
///
/// `is_shown` should only inspect the context; `action` performs the
/// application's effect when the user activates it.
#[async_trait]
pub trait ContextApp: Send + Sync {
    /// Label, tooltip and styling.
    fn descriptor(&self) -> &AppDescriptor;

    /// Decide whether the application is shown for `ctx`.
    async fn is_shown(&self, _ctx: &MenuContext) -> Result<Visibility, AppError> {
        Ok(Visibility::Visible)
    }

    /// Run the application for `ctx`.
    async fn action(&self, _ctx: &MenuContext) -> Result<(), AppError> {
        Ok(())
    }
}

/// Shared handle on a registered application.
pub type AppHandle = Arc<dyn ContextApp>;

/// Whether two handles point at the same application instance.
pub fn same_app(a: &AppHandle, b: &AppHandle) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(AppDescriptor);

    impl ContextApp for Plain {
        fn descriptor(&self) -> &AppDescriptor {
            &self.0
        }
    }

    fn style() -> ButtonConfig {
        ButtonConfig::new("apps", "in", "#000000", "#ffffff")
    }

    fn plain(label: &str) -> AppHandle {
        Arc::new(Plain(AppDescriptor::new(label, label, style())))
    }

    #[test]
    fn test_identity_is_by_instance() {
        let a = plain("same");
        let b = plain("same");

        assert!(same_app(&a, &Arc::clone(&a)));
        assert!(!same_app(&a, &b));
    }

    #[tokio::test]
    async fn test_default_predicate_and_action() {
        let app = plain("default");
        let ctx = MenuContext::default();

        assert_eq!(app.is_shown(&ctx).await.unwrap(), Visibility::Visible);
        assert!(app.action(&ctx).await.is_ok());
    }

    #[test]
    fn test_visibility_from_bool() {
        assert!(Visibility::from(true).is_visible());
        assert_eq!(Visibility::from(false), Visibility::Hidden);
        assert!(!Visibility::NotApplicable.is_visible());
    }

    #[test]
    fn test_descriptor_serializes_host_field_names() {
        let descriptor = AppDescriptor::new("Label", "Tip", style());
        let value = serde_json::to_value(&descriptor).unwrap();

        assert_eq!(value["buttonCfg"]["iconType"], "in");
        assert_eq!(value["buttonCfg"]["backgroundColor"], "#000000");
        assert_eq!(value["description"], "Tip");
    }
}
