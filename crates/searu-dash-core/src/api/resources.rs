//! Typed helpers for the resource endpoints.
//!
//! Each helper is a thin wrapper over the verb methods on `ApiClient`, so
//! the wire behaviour is exactly that of `request`. Bodies are then checked
//! against the expected model; a `{"msg": ...}` error reply or a non-JSON
//! body surfaces as `ApiError::UnexpectedShape`.

use reqwest::Method;

use super::{ApiClient, ApiError, ApiResponse, RequestSpec};
use crate::models::{ListResponse, NewUser, Node, Project, User, Vm, Vpc};
use crate::token::Token;

const USERS_PATH: &str = "users";
const PROJECTS_PATH: &str = "projects";
const NODES_PATH: &str = "nodes";
const VMS_PATH: &str = "vms";
const VPCS_PATH: &str = "vpcs";

impl ApiClient {
    /// The API root answers with its version string; no token needed.
    pub async fn version(&self) -> Result<ApiResponse, ApiError> {
        self.request(RequestSpec::new(Method::GET, "")).await
    }

    pub async fn create_user(&self, user: &NewUser, token: &Token) -> Result<User, ApiError> {
        self.post(USERS_PATH, user, Some(token)).await?.into_typed()
    }

    pub async fn list_projects(&self, token: &Token) -> Result<ListResponse<Project>, ApiError> {
        self.get(PROJECTS_PATH, token).await?.into_typed()
    }

    pub async fn create_project(&self, project: &Project, token: &Token) -> Result<Project, ApiError> {
        self.post(PROJECTS_PATH, project, Some(token)).await?.into_typed()
    }

    pub async fn list_nodes(&self, token: &Token) -> Result<ListResponse<Node>, ApiError> {
        self.get(NODES_PATH, token).await?.into_typed()
    }

    pub async fn get_node(&self, id: &str, token: &Token) -> Result<Node, ApiError> {
        self.get(&format!("{}/{}", NODES_PATH, id), token).await?.into_typed()
    }

    pub async fn list_vms(&self, token: &Token) -> Result<ListResponse<Vm>, ApiError> {
        self.get(VMS_PATH, token).await?.into_typed()
    }

    pub async fn create_vm(&self, vm: &Vm, token: &Token) -> Result<Vm, ApiError> {
        self.post(VMS_PATH, vm, Some(token)).await?.into_typed()
    }

    /// Deletion answers with an empty body, returned as-is.
    pub async fn delete_vm(&self, name: &str, token: &Token) -> Result<ApiResponse, ApiError> {
        self.del(&format!("{}/{}", VMS_PATH, name), token).await
    }

    pub async fn list_vpcs(&self, token: &Token) -> Result<ListResponse<Vpc>, ApiError> {
        self.get(VPCS_PATH, token).await?.into_typed()
    }

    pub async fn create_vpc(&self, vpc: &Vpc, token: &Token) -> Result<Vpc, ApiError> {
        self.post(VPCS_PATH, vpc, Some(token)).await?.into_typed()
    }

    pub async fn delete_vpc(&self, name: &str, token: &Token) -> Result<ApiResponse, ApiError> {
        self.del(&format!("{}/{}", VPCS_PATH, name), token).await
    }
}
