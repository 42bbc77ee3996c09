// painel-api: async client for the panel's PHP resource endpoints

pub mod client;
pub mod envelope;
pub mod error;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::Error;
pub use request::{
    FormPart, FormPayload, METHOD_OVERRIDE_HEADER, Method, RequestBody, RequestConfig,
    TENANT_HEADER, WirePlan,
};
pub use transport::{TlsMode, TransportConfig};
