//! Dialog state persisted in the URL: one query parameter per namespace
//! names the open dialog, the row it was opened for stays in memory.

pub mod bindings;
pub mod catalog;
pub mod codec;
pub mod controller;
pub mod location;
pub mod registry;

pub use bindings::{
    expect_modal_controller, expect_modal_registry, modal_outlet, outlet_payload,
    provide_modal_controller, provide_modal_controller_with, ModalHandle,
};
pub use catalog::{CrudModal, ModalNamespace, ModalScope, ALARM_MODAL};
pub use codec::ModalChild;
pub use controller::{ModalController, Subscription};
pub use registry::ModalRegistry;
