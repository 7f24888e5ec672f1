//! CloudOps CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the CloudOps machine
//! controllers.

pub mod machine;
pub mod references;
pub mod vpc_machine;

pub use machine::*;
pub use references::*;
pub use vpc_machine::*;
