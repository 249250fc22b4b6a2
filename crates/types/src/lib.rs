//! Shared data model for the WorkSpaces image-builder provisioner.
//!
//! The types here describe the three shapes that cross the function boundary:
//!
//! - [`ProvisionRequest`]: the invocation event delivered by the orchestrator
//! - [`AutomationParameters`]: the parameter bundle handed to later pipeline stages
//! - [`HandlerResponse`]: the envelope that wraps either the parameters or a failure
//!
//! Directory and desktop types model the subset of the managed desktop service
//! that the provisioner consumes.

pub mod desktop;
pub mod directory;
pub mod event;
pub mod parameters;
pub mod response;

pub use desktop::{BuilderDesktopRequest, DesktopId, FAILED_DESKTOP_ID, ResourceTag, RunningMode};
pub use directory::{DataAccessStatus, RegistrationState};
pub use event::{NumberOrText, ProvisionRequest};
pub use parameters::{AutomationParameters, CapacityDescriptor, ComputeTypeDescriptor, WorkspaceIdEntry};
pub use response::HandlerResponse;
