//! # WorkSpaces image builder provisioning
//!
//! The engine runs the first stage of the image pipeline: it confirms that a
//! directory can host a builder desktop, asks the desktop service for one, and
//! hands the rest of the pipeline a flat parameter bundle.
//!
//! ## Flow
//!
//! 1. Resolve the directory and bundle ids (event key, legacy event key,
//!    environment, then parameter store for the directory)
//! 2. Check the directory is `REGISTERED` with WorkSpaces
//! 3. Check directory data access is `Enabled`
//! 4. Make sure the automation API's default endpoint is on
//! 5. Request the builder desktop (failure is recorded, not raised)
//! 6. Derive image and bundle names from one timestamp
//!
//! ## Architecture
//!
//! - **`config`**: startup configuration read from the function environment
//! - **`resolve`**: pure precedence rules layering the event over configuration
//! - **`naming`**: timestamped image and bundle names
//! - **`provisioner`**: [`BuilderProvisioner`], the orchestration itself
//! - **`handler`**: the invocation boundary that always returns a [`HandlerResponse`]
//!
//! ## Usage
//!
//! ```ignore
//! use wsimage_engine::{BuilderProvisioner, ProvisionerConfig, handle_event};
//!
//! let config = ProvisionerConfig::from_env()?;
//! let clients = wsimage_api::aws::load_service_clients().await;
//! let provisioner = BuilderProvisioner::new(config, clients);
//! let response = handle_event(&provisioner, serde_json::json!({"BundleId": "wsb-5678"})).await;
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod naming;
pub mod provisioner;
pub mod resolve;

pub use config::{ConfigError, DIRECTORY_ID_PARAMETER, ProvisionerConfig};
pub use error::ProvisionError;
pub use handler::{handle_event, handle_request};
pub use provisioner::{API_DEPLOYMENT_STAGE, BuilderProvisioner, ProvisionOutcome};
pub use resolve::{ResolvedSettings, resolve_identifier, resolve_settings};
pub use wsimage_types::HandlerResponse;
