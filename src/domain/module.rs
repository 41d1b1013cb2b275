//! Module codes and the endpoints they resolve to.

use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{ModuleCode, RecordId, TypeConstraintError};

/// Static description of one backend dataset and its pages.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub module_code: ModuleCode,
    /// Human readable name used in page headings.
    pub title: String,
    /// Client-side route of the add/edit/view page.
    pub list_route: String,
    pub fetch_endpoint: String,
    pub delete_endpoint_prefix: String,
}

impl ModuleDescriptor {
    pub fn new(
        module_code: &str,
        title: &str,
        list_route: &str,
        fetch_endpoint: &str,
        delete_endpoint_prefix: &str,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            module_code: ModuleCode::new(module_code)?,
            title: title.to_string(),
            list_route: list_route.to_string(),
            fetch_endpoint: fetch_endpoint.to_string(),
            delete_endpoint_prefix: delete_endpoint_prefix.to_string(),
        })
    }
}

/// Endpoints derived from an optional descriptor.
///
/// Unknown module codes resolve to empty strings; an empty fetch endpoint
/// means "skip fetching and render an empty list".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedEndpoints {
    pub list_route: String,
    pub fetch_endpoint: String,
    pub delete_endpoint_prefix: String,
}

impl ResolvedEndpoints {
    pub fn is_fetchable(&self) -> bool {
        !self.fetch_endpoint.is_empty()
    }
}

impl From<Option<&ModuleDescriptor>> for ResolvedEndpoints {
    fn from(descriptor: Option<&ModuleDescriptor>) -> Self {
        match descriptor {
            Some(descriptor) => Self {
                list_route: descriptor.list_route.clone(),
                fetch_endpoint: descriptor.fetch_endpoint.clone(),
                delete_endpoint_prefix: descriptor.delete_endpoint_prefix.clone(),
            },
            None => Self::default(),
        }
    }
}

/// Immutable lookup table from module code to descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
}

impl ModuleRegistry {
    pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
        Self { modules }
    }

    pub fn resolve(&self, code: &str) -> Option<&ModuleDescriptor> {
        self.modules
            .iter()
            .find(|descriptor| descriptor.module_code.as_str() == code)
    }

    /// Endpoints for `code`, empty when the code is missing or unknown.
    pub fn endpoints(&self, code: Option<&str>) -> ResolvedEndpoints {
        ResolvedEndpoints::from(code.and_then(|code| self.resolve(code)))
    }

    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }
}

/// Action requested from an add/edit/view page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleAction {
    Add,
    Edit,
    View,
}

impl ModuleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ModuleAction::Add => "add",
            ModuleAction::Edit => "edit",
            ModuleAction::View => "view",
        }
    }

    pub fn is_read_only(self) -> bool {
        self == ModuleAction::View
    }
}

impl FromStr for ModuleAction {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "add" => Ok(ModuleAction::Add),
            "edit" => Ok(ModuleAction::Edit),
            "view" => Ok(ModuleAction::View),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown action `{other}`"
            ))),
        }
    }
}

/// Page addressed by the `action` and `pid` query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageTarget {
    pub action: ModuleAction,
    pub pid: Option<RecordId>,
}

impl PageTarget {
    /// Missing or unknown actions mean `add`; edit and view without a pid
    /// fall back to `add` as well.
    pub fn from_query(action: Option<&str>, pid: Option<&str>) -> Self {
        let action = action
            .and_then(|action| action.parse::<ModuleAction>().ok())
            .unwrap_or(ModuleAction::Add);
        let pid = pid.and_then(|pid| RecordId::new(pid).ok());

        match (action, pid) {
            (ModuleAction::Add, _) | (_, None) => Self {
                action: ModuleAction::Add,
                pid: None,
            },
            (action, pid) => Self { action, pid },
        }
    }

    /// Path segment of the detail endpoint; `0` asks for a blank record.
    pub fn detail_key(&self) -> Cow<'_, str> {
        self.pid
            .as_ref()
            .map_or(Cow::Borrowed("0"), RecordId::path_segment)
    }

    pub fn is_read_only(&self) -> bool {
        self.action.is_read_only()
    }

    /// URL of this page.
    pub fn url(&self, route: &str) -> String {
        navigation_url(route, self.action, self.pid.as_ref())
    }
}

/// URL of the add/edit/view page for `action`, carrying the record id when given.
pub fn navigation_url(list_route: &str, action: ModuleAction, id: Option<&RecordId>) -> String {
    match id {
        Some(id) => format!(
            "{list_route}?action={}&pid={}",
            action.as_str(),
            urlencoding::encode(id.as_str())
        ),
        None => format!("{list_route}?action={}", action.as_str()),
    }
}

/// URL of the generic list page for a module.
pub fn list_url(code: &ModuleCode) -> String {
    format!("/base/basemaster?mod={}", urlencoding::encode(code.as_str()))
}
