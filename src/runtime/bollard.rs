// ABOUTME: Bollard-based implementation of the runtime capability traits.
// ABOUTME: Translates intents into Docker remote API calls and normalizes results.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    ContainerDetails, ContainerError, ContainerOps, ContainerSpec, ContainerSummary, ImageError,
    ImageOps, ImageRecord, LayerProgress, PullEvent, PullEventStream,
};
use crate::types::{ContainerId, ImageId};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding as ApiPortBinding};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, InspectContainerOptions, ListContainersOptions,
    ListImagesOptions, RemoveContainerOptions, StopContainerOptions,
};
use futures::StreamExt;
use serde_json::Value;
use std::collections::HashMap;

/// Failed to establish the daemon connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("failed to connect to container runtime: {0}")]
    ConnectionFailed(String),
}

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_image_transport_error(e: bollard::errors::Error) -> ImageError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => ImageError::Runtime(format!("{status_code}: {message}")),
        e => ImageError::Unavailable(e.to_string()),
    }
}

fn map_image_pull_error(e: bollard::errors::Error, reference: &str) -> ImageError {
    ImageError::PullFailed(format!("{}: {}", reference, e))
}

fn map_container_transport_error(e: bollard::errors::Error) -> ContainerError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => ContainerError::Runtime(format!("{status_code}: {message}")),
        e => ContainerError::Unavailable(e.to_string()),
    }
}

fn map_container_create_error(e: bollard::errors::Error) -> ContainerError {
    match e {
        bollard::errors::Error::DockerResponseServerError { message, .. } => {
            ContainerError::CreateFailed(message)
        }
        e => ContainerError::Unavailable(e.to_string()),
    }
}

fn map_container_start_error(e: bollard::errors::Error) -> ContainerError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 304,
            message,
        } => ContainerError::AlreadyRunning(message),
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => ContainerError::NotFound(message),
        e => map_container_transport_error(e),
    }
}

fn map_container_stop_error(e: bollard::errors::Error) -> ContainerError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 304,
            message,
        } => ContainerError::NotRunning(message),
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => ContainerError::NotFound(message),
        e => map_container_transport_error(e),
    }
}

fn map_container_not_found_error(e: bollard::errors::Error) -> ContainerError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => ContainerError::NotFound(message),
        e => map_container_transport_error(e),
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
///
/// Holds the single daemon connection for the process lifetime.
pub struct BollardRuntime {
    client: Docker,
}

impl BollardRuntime {
    /// Create a runtime from an existing Docker client.
    pub fn new(client: Docker) -> Self {
        Self { client }
    }

    /// Connect to the local daemon using Docker's default socket resolution
    /// (honors `DOCKER_HOST`).
    pub fn connect_local() -> Result<Self, ConnectError> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| ConnectError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client))
    }
}

impl Sealed for BollardRuntime {}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn list_images(&self) -> Result<Vec<ImageRecord>, ImageError> {
        let images = self
            .client
            .list_images(Some(ListImagesOptions::default()))
            .await
            .map_err(map_image_transport_error)?;

        Ok(images
            .into_iter()
            .map(|img| ImageRecord {
                id: ImageId::new(img.id),
                tags: img.repo_tags,
            })
            .collect())
    }

    async fn pull_image(
        &self,
        repository: &str,
        tag: &str,
    ) -> Result<PullEventStream, ImageError> {
        let reference = format!("{repository}:{tag}");
        tracing::debug!("pulling image {reference}");

        let opts = CreateImageOptions {
            from_image: Some(repository.to_string()),
            tag: Some(tag.to_string()),
            ..Default::default()
        };

        let stream = self.client.create_image(Some(opts), None, None);

        let mapped = stream.map(move |item| match item {
            Ok(info) => {
                // The daemon reports pull failures as in-band error records
                // on an otherwise successful HTTP stream.
                if let Some(err) = info.error_detail {
                    let err = err.message.unwrap_or_default();
                    return Err(ImageError::PullFailed(format!("{reference}: {err}")));
                }
                Ok(PullEvent {
                    status: info.status.unwrap_or_default(),
                    id: info.id,
                    detail: info.progress_detail.map(|d| LayerProgress {
                        current: d.current.unwrap_or(0).max(0) as u64,
                        total: d.total.unwrap_or(0).max(0) as u64,
                    }),
                })
            }
            Err(e) => Err(map_image_pull_error(e, &reference)),
        });

        Ok(Box::pin(mapped))
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerSummary>, ContainerError> {
        let opts = ListContainersOptions {
            all,
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(map_container_transport_error)?;

        Ok(containers
            .into_iter()
            .map(|c| ContainerSummary {
                id: ContainerId::new(c.id.unwrap_or_default()),
                names: c.names.unwrap_or_default(),
            })
            .collect())
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<ContainerId, ContainerError> {
        let mut port_bindings: HashMap<String, Option<Vec<ApiPortBinding>>> = HashMap::new();
        for binding in &spec.port_bindings {
            port_bindings.insert(
                binding.container_port.clone(),
                Some(vec![ApiPortBinding {
                    host_ip: Some(binding.host_ip.clone()),
                    host_port: Some(binding.host_port.clone()),
                }]),
            );
        }

        let host_config = HostConfig {
            binds: if spec.binds.is_empty() {
                None
            } else {
                Some(spec.binds.clone())
            },
            port_bindings: if port_bindings.is_empty() {
                None
            } else {
                Some(port_bindings)
            },
            ..Default::default()
        };

        let body = ContainerCreateBody {
            image: Some(spec.image.to_string()),
            cmd: Some(spec.command.clone()),
            exposed_ports: if spec.exposed_ports.is_empty() {
                None
            } else {
                Some(spec.exposed_ports.clone())
            },
            host_config: Some(host_config),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: Some(spec.name.trimmed().to_string()),
            ..Default::default()
        };

        tracing::debug!("creating container {}", spec.name);
        let response = self
            .client
            .create_container(Some(opts), body)
            .await
            .map_err(map_container_create_error)?;

        Ok(ContainerId::new(response.id))
    }

    async fn inspect_container(
        &self,
        id: &ContainerId,
    ) -> Result<ContainerDetails, ContainerError> {
        let details = self
            .client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(map_container_not_found_error)?;

        let running = details
            .state
            .as_ref()
            .and_then(|s| s.running)
            .unwrap_or(false);

        let config = match details.config {
            Some(c) => serde_json::to_value(c).map_err(|e| {
                ContainerError::Runtime(format!("failed to encode container config: {e}"))
            })?,
            None => Value::Object(Default::default()),
        };

        let host_config = match details.host_config {
            Some(hc) => serde_json::to_value(hc).map_err(|e| {
                ContainerError::Runtime(format!("failed to encode host config: {e}"))
            })?,
            None => Value::Object(Default::default()),
        };

        Ok(ContainerDetails {
            id: ContainerId::new(details.id.unwrap_or_else(|| id.as_str().to_string())),
            name: details.name.unwrap_or_default(),
            running,
            config,
            host_config,
        })
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(
                id.as_str(),
                None::<bollard::query_parameters::StartContainerOptions>,
            )
            .await
            .map_err(map_container_start_error)
    }

    async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .stop_container(id.as_str(), None::<StopContainerOptions>)
            .await
            .map_err(map_container_stop_error)
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .remove_container(id.as_str(), None::<RemoveContainerOptions>)
            .await
            .map_err(map_container_not_found_error)
    }
}
