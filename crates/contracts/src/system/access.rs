use std::fmt;
use thiserror::Error;

use super::permissions::{Permission, PermissionSet};

/// What a guarded piece of UI needs from the current user.
///
/// Lists are conjunctive unless built with [`Requirement::any`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Requirement {
    #[default]
    Unrestricted,
    All(Vec<Permission>),
    Any(Vec<Permission>),
    /// Built from strings that did not parse; never satisfied
    Invalid(Vec<String>),
}

impl Requirement {
    pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let list: Vec<Permission> = permissions.into_iter().collect();
        if list.is_empty() {
            Requirement::Unrestricted
        } else {
            Requirement::All(list)
        }
    }

    pub fn any(permissions: impl IntoIterator<Item = Permission>) -> Self {
        let list: Vec<Permission> = permissions.into_iter().collect();
        if list.is_empty() {
            Requirement::Unrestricted
        } else {
            Requirement::Any(list)
        }
    }

    /// Conjunctive requirement from `module:action` strings.
    ///
    /// A string that fails to parse (denylisted pairs included) makes the
    /// requirement unsatisfiable instead of silently widening access.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut parsed = Vec::with_capacity(raw.len());
        let mut invalid = Vec::new();
        for s in raw {
            match s.as_ref().parse::<Permission>() {
                Ok(p) => parsed.push(p),
                Err(e) => {
                    log::warn!("Guard requirement rejected: {}", e);
                    invalid.push(s.as_ref().to_string());
                }
            }
        }
        if invalid.is_empty() {
            Requirement::all(parsed)
        } else {
            Requirement::Invalid(invalid)
        }
    }

    pub fn is_satisfied_by(&self, granted: &PermissionSet) -> bool {
        match self {
            Requirement::Unrestricted => true,
            Requirement::All(list) => granted.contains_all(list),
            Requirement::Any(list) => granted.contains_any(list),
            Requirement::Invalid(_) => false,
        }
    }
}

impl From<Permission> for Requirement {
    fn from(value: Permission) -> Self {
        Requirement::All(vec![value])
    }
}

impl From<Vec<Permission>> for Requirement {
    fn from(value: Vec<Permission>) -> Self {
        Requirement::all(value)
    }
}

impl From<&str> for Requirement {
    fn from(value: &str) -> Self {
        Requirement::parse(&[value])
    }
}

impl From<&[&str]> for Requirement {
    fn from(value: &[&str]) -> Self {
        Requirement::parse(value)
    }
}

impl<const N: usize> From<[&str; N]> for Requirement {
    fn from(value: [&str; N]) -> Self {
        Requirement::parse(&value)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |list: &[Permission], sep: &str| {
            list.iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(sep)
        };
        match self {
            Requirement::Unrestricted => write!(f, "nothing"),
            Requirement::All(list) => write!(f, "{}", join(list, " and ")),
            Requirement::Any(list) => write!(f, "{}", join(list, " or ")),
            Requirement::Invalid(raw) => write!(f, "invalid permissions {}", raw.join(", ")),
        }
    }
}

/// Render decision shared by both guard flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Allowed,
    Denied,
}

impl GuardState {
    /// `granted` is `None` while the session is still being restored
    pub fn evaluate(required: &Requirement, granted: Option<&PermissionSet>) -> Self {
        match granted {
            None => GuardState::Loading,
            Some(set) if required.is_satisfied_by(set) => GuardState::Allowed,
            Some(_) => GuardState::Denied,
        }
    }
}

/// Raised by page-level guards; handled by the page error boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not permitted: requires {required}")]
pub struct Unauthorized {
    pub required: Requirement,
}

/// Hard-guard transition: `Ok(None)` while loading, `Ok(Some(()))` when
/// allowed, `Err` when denied.
pub fn authorize(
    required: &Requirement,
    granted: Option<&PermissionSet>,
) -> Result<Option<()>, Unauthorized> {
    match GuardState::evaluate(required, granted) {
        GuardState::Loading => Ok(None),
        GuardState::Allowed => Ok(Some(())),
        GuardState::Denied => Err(Unauthorized {
            required: required.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Permission {
        s.parse().unwrap()
    }

    fn granted(list: &[&str]) -> PermissionSet {
        list.iter().map(|s| p(s)).collect()
    }

    #[test]
    fn test_loading_wins_over_everything() {
        assert_eq!(
            GuardState::evaluate(&Requirement::Unrestricted, None),
            GuardState::Loading
        );
        assert_eq!(
            GuardState::evaluate(&Requirement::from("alarm:list"), None),
            GuardState::Loading
        );
    }

    #[test]
    fn test_empty_requirement_is_unrestricted() {
        let nothing = PermissionSet::new();
        assert_eq!(Requirement::all(Vec::new()), Requirement::Unrestricted);
        assert_eq!(Requirement::parse::<&str>(&[]), Requirement::Unrestricted);
        assert_eq!(
            GuardState::evaluate(&Requirement::Unrestricted, Some(&nothing)),
            GuardState::Allowed
        );
    }

    #[test]
    fn test_all_requires_subset() {
        let set = granted(&["asset:list", "asset:read"]);
        let both = Requirement::from(["asset:list", "asset:read"]);
        let extra = Requirement::from(["asset:list", "asset:delete"]);
        assert_eq!(GuardState::evaluate(&both, Some(&set)), GuardState::Allowed);
        assert_eq!(GuardState::evaluate(&extra, Some(&set)), GuardState::Denied);
    }

    #[test]
    fn test_any_is_explicit_opt_in() {
        let set = granted(&["role:read"]);
        let any = Requirement::any([p("role:read"), p("role:update")]);
        assert_eq!(GuardState::evaluate(&any, Some(&set)), GuardState::Allowed);
        let any_missing = Requirement::any([p("role:delete")]);
        assert_eq!(
            GuardState::evaluate(&any_missing, Some(&set)),
            GuardState::Denied
        );
    }

    #[test]
    fn test_invalid_strings_never_allow() {
        let set: PermissionSet = Permission::all().into_iter().collect();
        let req = Requirement::from("dashboard:create");
        assert!(matches!(req, Requirement::Invalid(_)));
        assert_eq!(GuardState::evaluate(&req, Some(&set)), GuardState::Denied);
    }

    #[test]
    fn test_authorize_transitions() {
        let req = Requirement::from("user:list");
        assert_eq!(authorize(&req, None), Ok(None));
        assert_eq!(authorize(&req, Some(&granted(&["user:list"]))), Ok(Some(())));
        let err = authorize(&req, Some(&granted(&["user:read"]))).unwrap_err();
        assert_eq!(err.required, req);
        assert_eq!(err.to_string(), "not permitted: requires user:list");
    }
}
