//! Page-level logic between `painel-api` and front ends (CLI, UI).
//!
//! - **[`TableControls`]**: search, stable sort and record cap over any
//!   [`Tabular`] collection. Pure derivation, no I/O.
//!
//! - **[`MessageBus`]**: one transient status message per page with a single
//!   cancellable expiry timer.
//!
//! - **[`ResourceClient`]**: typed CRUD over [`painel_api::ApiClient`]. Reads
//!   the `{success, message, data}` envelope and enforces tenant scoping.
//!
//! - **[`EntityFormLifecycle`]**: the create/edit/delete state machine every
//!   entity page shares. Validates locally, saves, then refetches.
//!
//! - **Domain model** ([`model`]): [`RecordId`], [`FieldValue`],
//!   [`DynamicRecord`] and the six typed resources.

pub mod error;
pub mod lifecycle;
pub mod message;
pub mod model;
pub mod resource_client;
pub mod session;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use lifecycle::{DeleteOutcome, EntityFormLifecycle, FormMode, FormState, SubmitOutcome};
pub use message::{DEFAULT_MESSAGE_DELAY, Message, MessageBus, MessageKind};
pub use resource_client::{Ack, ResourceClient};
pub use session::{PageSession, TenantContext};
pub use table::{
    DEFAULT_RECORDS_PER_PAGE, SortConfig, SortDirection, SortKind, TableControls, TableState,
};

pub use model::{
    Attachment, Client, DynamicRecord, Equipment, FieldValue, RecordId, Resource, Scalar, Segment,
    ServiceCall, Subject, Tabular, User, ValidationError, apply_fields,
};
