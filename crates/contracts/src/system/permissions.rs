use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Resource domains that permissions are granted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Module {
    Dashboard,
    Alarm,
    Asset,
    Sample,
    Organization,
    Role,
    SamplingPoint,
    SamplingRoute,
    User,
}

impl Module {
    /// Code used on the left side of `module:action`
    pub fn code(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Alarm => "alarm",
            Module::Asset => "asset",
            Module::Sample => "sample",
            Module::Organization => "organization",
            Module::Role => "role",
            Module::SamplingPoint => "sampling_point",
            Module::SamplingRoute => "sampling_route",
            Module::User => "user",
        }
    }

    pub fn all() -> Vec<Module> {
        vec![
            Module::Dashboard,
            Module::Alarm,
            Module::Asset,
            Module::Sample,
            Module::Organization,
            Module::Role,
            Module::SamplingPoint,
            Module::SamplingRoute,
            Module::User,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Module::all().into_iter().find(|m| m.code() == code)
    }
}

/// Operations a permission can allow on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub fn code(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::List => "list",
        }
    }

    pub fn all() -> Vec<Action> {
        vec![
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::List,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Action::all().into_iter().find(|a| a.code() == code)
    }
}

/// Combinations that are structurally invalid: the dashboard is read-only and
/// alarms are raised by the monitoring pipeline, never by hand.
pub const DENYLIST: &[(Module, Action)] = &[
    (Module::Dashboard, Action::Create),
    (Module::Dashboard, Action::Update),
    (Module::Dashboard, Action::Delete),
    (Module::Alarm, Action::Create),
];

pub fn is_denylisted(module: Module, action: Action) -> bool {
    DENYLIST.contains(&(module, action))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    #[error("permission '{0}' is not of the form module:action")]
    Malformed(String),
    #[error("unknown module '{0}'")]
    UnknownModule(String),
    #[error("unknown action '{0}'")]
    UnknownAction(String),
    #[error("permission '{0}' is not valid for its module")]
    Denylisted(String),
}

/// A single `module:action` capability.
///
/// Values of this type are always valid: construction goes through
/// [`Permission::new`] or [`FromStr`], both of which reject denylisted pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    module: Module,
    action: Action,
}

impl Permission {
    pub fn new(module: Module, action: Action) -> Result<Self, PermissionError> {
        if is_denylisted(module, action) {
            return Err(PermissionError::Denylisted(format!(
                "{}:{}",
                module.code(),
                action.code()
            )));
        }
        Ok(Self { module, action })
    }

    pub fn module(&self) -> Module {
        self.module
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Every permission that may legally appear in a role
    pub fn all() -> Vec<Permission> {
        Module::all()
            .into_iter()
            .flat_map(|m| {
                Action::all()
                    .into_iter()
                    .filter_map(move |a| Permission::new(m, a).ok())
            })
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module.code(), self.action.code())
    }
}

impl FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, action) = s
            .split_once(':')
            .ok_or_else(|| PermissionError::Malformed(s.to_string()))?;
        let module = Module::from_code(module)
            .ok_or_else(|| PermissionError::UnknownModule(module.to_string()))?;
        let action = Action::from_code(action)
            .ok_or_else(|| PermissionError::UnknownAction(action.to_string()))?;
        Permission::new(module, action)
    }
}

impl TryFrom<String> for Permission {
    type Error = PermissionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

/// Flattened, deduplicated capabilities of a user. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, permission: Permission) -> bool {
        self.0.insert(permission)
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn contains_all<'a>(&self, required: impl IntoIterator<Item = &'a Permission>) -> bool {
        required.into_iter().all(|p| self.0.contains(p))
    }

    pub fn contains_any<'a>(&self, required: impl IntoIterator<Item = &'a Permission>) -> bool {
        required.into_iter().any(|p| self.0.contains(p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let p: Permission = "sampling_route:update".parse().unwrap();
        assert_eq!(p.module(), Module::SamplingRoute);
        assert_eq!(p.action(), Action::Update);
        assert_eq!(p.to_string(), "sampling_route:update");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "alarm".parse::<Permission>(),
            Err(PermissionError::Malformed("alarm".to_string()))
        );
        assert_eq!(
            "pump:read".parse::<Permission>(),
            Err(PermissionError::UnknownModule("pump".to_string()))
        );
        assert_eq!(
            "asset:archive".parse::<Permission>(),
            Err(PermissionError::UnknownAction("archive".to_string()))
        );
        assert!(matches!(
            "asset:read:extra".parse::<Permission>(),
            Err(PermissionError::UnknownAction(_))
        ));
    }

    #[test]
    fn test_denylisted_pairs_never_construct() {
        for (module, action) in DENYLIST {
            assert!(Permission::new(*module, *action).is_err());
            let raw = format!("{}:{}", module.code(), action.code());
            assert!(matches!(
                raw.parse::<Permission>(),
                Err(PermissionError::Denylisted(_))
            ));
        }
        assert!(Permission::all()
            .iter()
            .all(|p| !is_denylisted(p.module(), p.action())));
        assert_eq!(
            Permission::all().len(),
            Module::all().len() * Action::all().len() - DENYLIST.len()
        );
    }

    #[test]
    fn test_serde_uses_string_form() {
        let p: Permission = "user:list".parse().unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"user:list\"");
        let back: Permission = serde_json::from_str("\"user:list\"").unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Permission>("\"dashboard:create\"").is_err());
    }

    #[test]
    fn test_set_contains_all_and_any() {
        let read: Permission = "asset:read".parse().unwrap();
        let list: Permission = "asset:list".parse().unwrap();
        let delete: Permission = "asset:delete".parse().unwrap();
        let set: PermissionSet = [read, list].into_iter().collect();
        assert!(set.contains_all(&[read, list]));
        assert!(!set.contains_all(&[read, delete]));
        assert!(set.contains_any(&[read, delete]));
        assert!(!set.contains_any(&[delete]));
        assert!(set.contains_all(std::iter::empty()));
    }
}
