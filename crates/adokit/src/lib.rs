//! # adokit
//!
//! Pure Rust client for Azure DevOps variable group resources.
//!
//! This crate provides the building blocks for reconciling desired-state
//! variable group definitions against a project:
//! - Resolving the project scope from the organization project list
//! - Listing variable groups and looking one up by exact name
//! - Assembling create/update request bodies
//! - Issuing create, update, and delete requests
//!
//! All remote access flows through the [`sender::RequestSender`] trait, whose
//! production implementation is a blocking ureq agent authenticating with a
//! personal access token. [`sender::MockSender`] emulates the endpoints in
//! memory for tests.
//!
//! ## Example
//!
//! ```no_run
//! use adokit::{Client, GroupPayload};
//! use std::collections::BTreeMap;
//!
//! let client = Client::new("https://dev.azure.com/contoso", "pat-token");
//! let project = client.resolve_project("Fabrikam").unwrap();
//!
//! let payload = GroupPayload {
//!     name: "release-vars".to_string(),
//!     description: "Release settings".to_string(),
//!     group_type: "Vsts".to_string(),
//!     variables: BTreeMap::new(),
//! };
//!
//! match client.find_by_name(&project, &payload.name).unwrap() {
//!     Some(existing) => {
//!         client.update(&project, existing.id, &payload).unwrap();
//!     }
//!     None => {
//!         client.create(&project, &payload).unwrap();
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod payload;
pub mod sender;
pub mod types;

pub use client::Client;
pub use error::{Error, Result};
pub use payload::GroupPayload;
pub use types::{ProjectRef, VariableGroupRef, VariableValue};
