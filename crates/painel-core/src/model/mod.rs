// ── Domain model ──
//
// Record identity, the Tabular capability, the Resource contract and
// the six typed resources served by the panel backend.

/// Implement [`Tabular`] for a resource struct over the listed columns
/// and expose them as `Self::FIELDS`.
macro_rules! tabular_fields {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $ty {
            pub const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];
        }

        impl $crate::model::Tabular for $ty {
            fn record_id(&self) -> Option<$crate::model::RecordId> {
                self.id.clone()
            }

            fn field(&self, key: &str) -> $crate::model::FieldValue {
                match key {
                    $(stringify!($field) => $crate::model::FieldValue::from(self.$field.clone()),)+
                    _ => $crate::model::FieldValue::Null,
                }
            }

            fn values(&self) -> Vec<$crate::model::FieldValue> {
                vec![$($crate::model::FieldValue::from(self.$field.clone())),+]
            }
        }
    };
}

pub mod record;
pub mod resource;
pub mod scalar;

pub mod client;
pub mod equipment;
pub mod segment;
pub mod service_call;
pub mod subject;
pub mod user;

pub use client::Client;
pub use equipment::Equipment;
pub use record::{DynamicRecord, FieldValue, RecordId, Tabular};
pub use resource::{Resource, ValidationError, apply_fields, rules};
pub use scalar::Scalar;
pub use segment::Segment;
pub use service_call::ServiceCall;
pub use subject::Subject;
pub use user::{Attachment, User};
