use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permissions::{Permission, PermissionSet};

/// Role as stored by the identity service.
///
/// `permissions` keeps the raw strings exactly as received; validation
/// happens when the role is resolved, so one bad entry never discards the
/// whole role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub level: i32,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Returns the role with its permission set replaced wholesale
    pub fn with_permissions<I, S>(self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            updated_at: Utc::now(),
            ..self
        }
    }

    /// Applies an edit of this role. The permission set is replaced, never
    /// merged; an edit addressed to another role is ignored.
    pub fn apply(self, update: UpdateRoleDto) -> Self {
        if update.id != self.id {
            log::warn!("Role '{}': ignoring edit for role '{}'", self.id, update.id);
            return self;
        }
        Self {
            name: update.name,
            level: update.level,
            ..self
        }
        .with_permissions(update.permissions.iter().map(Permission::to_string))
    }
}

/// Session payloads carry either one role or a list of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleAssignment {
    Single(Role),
    Many(Vec<Role>),
}

impl RoleAssignment {
    pub fn roles(&self) -> &[Role] {
        match self {
            RoleAssignment::Single(role) => std::slice::from_ref(role),
            RoleAssignment::Many(roles) => roles,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRoleDto {
    pub id: String,
    pub name: String,
    pub level: i32,
    /// Replaces the stored set entirely
    pub permissions: Vec<Permission>,
}

/// Flattens the permissions of every given role into one set.
///
/// Accepts anything iterable over roles, so a single role (`Some(&role)`),
/// a slice, or nothing (`None`) all work. Entries that do not parse, including
/// denylisted pairs, are dropped.
pub fn resolve<'a, I>(roles: I) -> PermissionSet
where
    I: IntoIterator<Item = &'a Role>,
{
    let mut set = PermissionSet::new();
    for role in roles {
        for raw in &role.permissions {
            match raw.parse::<Permission>() {
                Ok(permission) => {
                    set.insert(permission);
                }
                Err(e) => {
                    log::warn!("Role '{}': dropping permission: {}", role.name, e);
                }
            }
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::permissions::{is_denylisted, Action, Module};

    fn role(name: &str, permissions: &[&str]) -> Role {
        let now = Utc::now();
        Role {
            id: format!("role-{}", name),
            name: name.to_string(),
            level: 1,
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    fn p(s: &str) -> Permission {
        s.parse().unwrap()
    }

    #[test]
    fn test_apply_replaces_permissions_wholesale() {
        let before = role("operator", &["alarm:list", "alarm:read"]);
        let update = UpdateRoleDto {
            id: before.id.clone(),
            name: "viewer".to_string(),
            level: 2,
            permissions: vec![p("asset:list")],
        };

        let after = before.clone().apply(update);
        assert_eq!(after.name, "viewer");
        assert_eq!(after.level, 2);
        assert_eq!(after.permissions, vec!["asset:list".to_string()]);
        assert_eq!(after.created_at, before.created_at);

        let set = resolve(Some(&after));
        assert_eq!(set.len(), 1);
        assert!(!set.contains(&p("alarm:read")));
    }

    #[test]
    fn test_apply_ignores_edit_for_other_role() {
        let before = role("operator", &["alarm:list"]);
        let update = UpdateRoleDto {
            id: "role-admin".to_string(),
            name: "admin".to_string(),
            level: 9,
            permissions: Vec::new(),
        };
        assert_eq!(before.clone().apply(update), before);
    }

    #[test]
    fn test_resolve_nothing_is_empty() {
        assert!(resolve(None::<&Role>).is_empty());
        assert!(resolve(&Vec::<Role>::new()).is_empty());
        assert!(resolve(None::<&Vec<Role>>.into_iter().flatten()).is_empty());
    }

    #[test]
    fn test_resolve_single_role() {
        let analyst = role("analyst", &["sample:list", "sample:read"]);
        let set = resolve(Some(&analyst));
        assert_eq!(set.len(), 2);
        assert!(set.contains(&p("sample:read")));
    }

    #[test]
    fn test_resolve_is_union_without_duplicates() {
        let a = role("a", &["alarm:list", "alarm:read", "asset:list"]);
        let b = role("b", &["alarm:read", "alarm:update"]);
        let forward = resolve(&[a.clone(), b.clone()]);
        let backward = resolve(&[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 4);
        assert!(forward.contains_all(&[
            p("alarm:list"),
            p("alarm:read"),
            p("asset:list"),
            p("alarm:update")
        ]));
    }

    #[test]
    fn test_resolve_drops_denylisted_and_malformed() {
        let broken = role(
            "broken",
            &["dashboard:create", "dashboard:read", "alarm:create", "nonsense", "pump:list"],
        );
        let set = resolve(Some(&broken));
        assert_eq!(set.len(), 1);
        assert!(set.contains(&p("dashboard:read")));
        assert!(set
            .iter()
            .all(|perm| !is_denylisted(perm.module(), perm.action())));
        assert!(!set
            .iter()
            .any(|perm| perm.module() == Module::Dashboard && perm.action() == Action::Create));
    }

    #[test]
    fn test_role_assignment_accepts_object_or_array() {
        let single = serde_json::json!({
            "id": "r1",
            "name": "operator",
            "level": 2,
            "permissions": ["asset:read"],
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });
        let many = serde_json::Value::Array(vec![single.clone(), single.clone()]);

        let one: RoleAssignment = serde_json::from_value(single).unwrap();
        let list: RoleAssignment = serde_json::from_value(many).unwrap();
        assert_eq!(one.roles().len(), 1);
        assert_eq!(list.roles().len(), 2);
        assert_eq!(resolve(list.roles()), resolve(one.roles()));
    }

    #[test]
    fn test_with_permissions_replaces_set() {
        let original = role("editor", &["asset:read", "asset:update"]);
        let edited = original.clone().with_permissions(["sample:list"]);
        assert_eq!(edited.permissions, vec!["sample:list".to_string()]);
        assert_eq!(original.permissions.len(), 2);
        assert_eq!(edited.id, original.id);
    }
}
