//! Data models for searu API resources.
//!
//! These mirror the JSON the API server emits:
//!
//! - `Project`, `Node`, `Vm`, `Vpc`: resources listed on the dashboard
//! - `ListResponse`: the envelope every list endpoint returns
//! - `NewUser`, `User`: account creation

pub mod resource;
pub mod user;

pub use resource::{ListResponse, Metadata, Node, Project, Vm, VmSpec, VmState, VmStatus, Vpc, VpcSpec};
pub use user::{NewUser, User};
