//! Share links: a self-contained snapshot of a bill published under an
//! opaque id for a limited time.

pub mod payload;
pub mod registry;

pub use payload::{PaymentInfo, SharePayload, SharedOrder, SharedPerson};
pub use registry::{ShareId, ShareRegistry};
