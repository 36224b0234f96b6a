use std::marker::PhantomData;

use super::codec::ModalChild;

/// Feature families of dialogs. Each owns one URL parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalNamespace {
    Alarm,
    Asset,
    Sample,
    Organization,
    Role,
    SamplingPoint,
    SamplingRoute,
    User,
}

impl ModalNamespace {
    /// Query parameter name; must stay stable, links depend on it
    pub const fn param(&self) -> &'static str {
        match self {
            ModalNamespace::Alarm => "alarm_modal",
            ModalNamespace::Asset => "asset_modal",
            ModalNamespace::Sample => "sample_modal",
            ModalNamespace::Organization => "organization_modal",
            ModalNamespace::Role => "role_modal",
            ModalNamespace::SamplingPoint => "sampling_point_modal",
            ModalNamespace::SamplingRoute => "sampling_route_modal",
            ModalNamespace::User => "user_modal",
        }
    }

    pub fn all() -> Vec<ModalNamespace> {
        vec![
            ModalNamespace::Alarm,
            ModalNamespace::Asset,
            ModalNamespace::Sample,
            ModalNamespace::Organization,
            ModalNamespace::Role,
            ModalNamespace::SamplingPoint,
            ModalNamespace::SamplingRoute,
            ModalNamespace::User,
        ]
    }
}

/// Row dialogs shared by the resource pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudModal {
    View,
    Edit,
    Delete,
}

impl ModalChild for CrudModal {
    fn param_value(&self) -> &'static str {
        match self {
            CrudModal::View => "view",
            CrudModal::Edit => "edit",
            CrudModal::Delete => "delete",
        }
    }

    fn from_param_value(value: &str) -> Option<Self> {
        match value {
            "view" => Some(CrudModal::View),
            "edit" => Some(CrudModal::Edit),
            "delete" => Some(CrudModal::Delete),
            _ => None,
        }
    }
}

/// A namespace bound to the child enumeration it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalScope<C> {
    namespace: ModalNamespace,
    _child: PhantomData<fn() -> C>,
}

impl<C: ModalChild> ModalScope<C> {
    pub const fn new(namespace: ModalNamespace) -> Self {
        Self {
            namespace,
            _child: PhantomData,
        }
    }

    pub fn namespace(&self) -> ModalNamespace {
        self.namespace
    }

    pub fn param(&self) -> &'static str {
        self.namespace.param()
    }
}

pub const ALARM_MODAL: ModalScope<CrudModal> = ModalScope::new(ModalNamespace::Alarm);
pub const ASSET_MODAL: ModalScope<CrudModal> = ModalScope::new(ModalNamespace::Asset);
pub const SAMPLE_MODAL: ModalScope<CrudModal> = ModalScope::new(ModalNamespace::Sample);
pub const ORGANIZATION_MODAL: ModalScope<CrudModal> =
    ModalScope::new(ModalNamespace::Organization);
pub const ROLE_MODAL: ModalScope<CrudModal> = ModalScope::new(ModalNamespace::Role);
pub const SAMPLING_POINT_MODAL: ModalScope<CrudModal> =
    ModalScope::new(ModalNamespace::SamplingPoint);
pub const SAMPLING_ROUTE_MODAL: ModalScope<CrudModal> =
    ModalScope::new(ModalNamespace::SamplingRoute);
pub const USER_MODAL: ModalScope<CrudModal> = ModalScope::new(ModalNamespace::User);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_params_are_unique() {
        let params: HashSet<&str> = ModalNamespace::all().iter().map(|n| n.param()).collect();
        assert_eq!(params.len(), ModalNamespace::all().len());
    }

    #[test]
    fn test_crud_child_values_round_trip() {
        for child in [CrudModal::View, CrudModal::Edit, CrudModal::Delete] {
            assert_eq!(CrudModal::from_param_value(child.param_value()), Some(child));
        }
    }

    #[test]
    fn test_scope_param() {
        assert_eq!(ALARM_MODAL.param(), "alarm_modal");
        assert_eq!(USER_MODAL.namespace(), ModalNamespace::User);
    }
}
