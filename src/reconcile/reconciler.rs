// ABOUTME: Reconciliation of the desired node configuration against runtime state.
// ABOUTME: Owns the run/stop orchestration and the pull progress fold.

use futures::StreamExt;

use crate::config::NodeConfig;
use crate::reconcile::error::ReconcileError;
use crate::reconcile::progress::{ProgressEvent, PullProgress};
use crate::reconcile::spec::{node_container_spec, spec_matches};
use crate::runtime::{ContainerError, ContainerOps, ImageOps};
use crate::types::{ContainerId, ContainerName};

/// Orchestrates `run` and `stop` against a container runtime.
///
/// Holds no state of its own: the runtime is re-queried at the start of
/// every operation, and nothing observed in one invocation is trusted in
/// the next.
pub struct Reconciler<'a, R> {
    runtime: &'a R,
}

impl<'a, R> Reconciler<'a, R>
where
    R: ImageOps + ContainerOps,
{
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Bring the node container described by `desired` into the running
    /// state, taking the minimal corrective action.
    ///
    /// Emits one [`ProgressEvent`] per phase transition to `observer`.
    /// Returns the id of the running container.
    ///
    /// # Errors
    ///
    /// Any adapter failure aborts the operation and propagates, except
    /// the stop/remove pair while replacing a drifted container, which
    /// is best-effort.
    pub async fn run<F>(
        &self,
        desired: &NodeConfig,
        mut observer: F,
    ) -> Result<ContainerId, ReconcileError>
    where
        F: FnMut(ProgressEvent),
    {
        let reference = desired.image.to_string();
        let images = self.runtime.list_images().await?;
        if images.iter().any(|img| img.has_tag(&reference)) {
            observer(ProgressEvent::ImageFound);
        } else {
            self.pull(desired, &mut observer).await?;
        }

        let spec = node_container_spec(desired);
        let containers = self.runtime.list_containers(true).await?;
        let existing = containers
            .into_iter()
            .find(|c| c.names.iter().any(|n| n == desired.name.as_str()));

        let mut kept = None;
        if let Some(found) = existing {
            let details = self.runtime.inspect_container(&found.id).await?;
            if spec_matches(&spec, &details) {
                observer(ProgressEvent::ContainerFound);
                kept = Some((found.id, details.running));
            } else {
                observer(ProgressEvent::ContainerConfigModified);
                // Best effort: the goal (container gone) is reached whether
                // or not it was still running or even still present.
                let _ = self.runtime.stop_container(&found.id).await;
                let _ = self.runtime.remove_container(&found.id).await;
            }
        }

        let (id, running) = match kept {
            Some(kept) => kept,
            None => {
                observer(ProgressEvent::ContainerCreated);
                (self.runtime.create_container(&spec).await?, false)
            }
        };

        if !running {
            self.runtime.start_container(&id).await?;
        }
        observer(ProgressEvent::ContainerStarted(id.clone()));

        Ok(id)
    }

    /// Stop the container with the given name.
    ///
    /// # Errors
    ///
    /// Fails with [`ContainerError::NotFound`] when no container carries
    /// the name; stop failures propagate unmodified, with no retry.
    pub async fn stop(&self, name: &ContainerName) -> Result<(), ReconcileError> {
        let containers = self.runtime.list_containers(true).await?;
        let found = containers
            .into_iter()
            .find(|c| c.names.iter().any(|n| n == name.as_str()))
            .ok_or_else(|| ContainerError::NotFound(name.to_string()))?;

        self.runtime.stop_container(&found.id).await?;
        Ok(())
    }

    /// Pull the desired image, folding the daemon's raw event stream into
    /// [`PullProgress`] and emitting the pull phase events.
    async fn pull<F>(&self, desired: &NodeConfig, observer: &mut F) -> Result<(), ReconcileError>
    where
        F: FnMut(ProgressEvent),
    {
        observer(ProgressEvent::PullStarted);

        let mut events = self
            .runtime
            .pull_image(&desired.image.repository(), desired.image.tag())
            .await?;

        let mut progress = PullProgress::default();
        let mut extracting_seen = false;

        // Events must be applied in arrival order; the accumulator is
        // order-sensitive.
        while let Some(event) = events.next().await {
            let event = event?;
            let Some(layer) = event.id.as_deref() else {
                continue;
            };
            match event.status.as_str() {
                "Waiting" => progress.record_waiting(layer),
                "Downloading" => {
                    if let Some(detail) = event.detail {
                        progress.record_downloading(layer, detail);
                        observer(ProgressEvent::PullDownloading(progress.clone()));
                    }
                }
                "Extracting" if !extracting_seen => {
                    extracting_seen = true;
                    observer(ProgressEvent::PullExtracting);
                }
                _ => {}
            }
        }

        observer(ProgressEvent::PullDone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::error::ReconcileErrorKind;
    use crate::reconcile::spec::desired_value;
    use crate::runtime::traits::sealed::Sealed;
    use crate::runtime::{
        ContainerDetails, ContainerSpec, ContainerSummary, ImageError, ImageRecord, LayerProgress,
        PullEvent, PullEventStream,
    };
    use crate::types::ImageId;
    use async_trait::async_trait;
    use futures::stream;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRuntime {
        images: Vec<ImageRecord>,
        containers: Vec<ContainerSummary>,
        details: Vec<ContainerDetails>,
        pull_events: Vec<PullEvent>,
        pull_error: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRuntime {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Sealed for FakeRuntime {}

    #[async_trait]
    impl ImageOps for FakeRuntime {
        async fn list_images(&self) -> Result<Vec<ImageRecord>, ImageError> {
            self.record("list_images");
            Ok(self.images.clone())
        }

        async fn pull_image(
            &self,
            repository: &str,
            tag: &str,
        ) -> Result<PullEventStream, ImageError> {
            self.record(format!("pull_image:{repository}:{tag}"));
            let mut items: Vec<Result<PullEvent, ImageError>> =
                self.pull_events.clone().into_iter().map(Ok).collect();
            if let Some(msg) = &self.pull_error {
                items.push(Err(ImageError::PullFailed(msg.clone())));
            }
            Ok(Box::pin(stream::iter(items)))
        }
    }

    #[async_trait]
    impl ContainerOps for FakeRuntime {
        async fn list_containers(
            &self,
            all: bool,
        ) -> Result<Vec<ContainerSummary>, ContainerError> {
            self.record(format!("list_containers:{all}"));
            Ok(self.containers.clone())
        }

        async fn create_container(
            &self,
            spec: &ContainerSpec,
        ) -> Result<ContainerId, ContainerError> {
            self.record(format!("create:{}", spec.name));
            Ok(ContainerId::new("new-id".to_string()))
        }

        async fn inspect_container(
            &self,
            id: &ContainerId,
        ) -> Result<ContainerDetails, ContainerError> {
            self.record(format!("inspect:{id}"));
            self.details
                .iter()
                .find(|d| d.id == *id)
                .cloned()
                .ok_or_else(|| ContainerError::NotFound(id.to_string()))
        }

        async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
            self.record(format!("start:{id}"));
            Ok(())
        }

        async fn stop_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
            self.record(format!("stop:{id}"));
            Ok(())
        }

        async fn remove_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
            self.record(format!("remove:{id}"));
            Ok(())
        }
    }

    fn eosio_config() -> NodeConfig {
        NodeConfig::from_args(None, None, None, None).unwrap()
    }

    fn image_for(config: &NodeConfig) -> ImageRecord {
        ImageRecord {
            id: ImageId::new("sha256:0123abcd".to_string()),
            tags: vec![config.image.to_string()],
        }
    }

    fn summary(id: &str, name: &str) -> ContainerSummary {
        ContainerSummary {
            id: ContainerId::new(id.to_string()),
            names: vec![name.to_string()],
        }
    }

    /// Inspection snapshot a daemon would report for a container created
    /// from `config`'s spec, including fields the daemon defaults itself.
    fn matching_details(config: &NodeConfig, id: &str, running: bool) -> ContainerDetails {
        let spec = node_container_spec(config);
        let desired = desired_value(&spec);
        let mut config_obj = desired.as_object().unwrap().clone();
        let mut host_config = config_obj.remove("HostConfig").unwrap();
        config_obj.remove("name");
        config_obj.insert("Tty".to_string(), json!(false));
        config_obj.insert("AttachStdout".to_string(), json!(false));
        host_config["NetworkMode"] = json!("default");
        ContainerDetails {
            id: ContainerId::new(id.to_string()),
            name: spec.name.as_str().to_string(),
            running,
            config: Value::Object(config_obj),
            host_config,
        }
    }

    fn layer(status: &str, id: &str, detail: Option<(u64, u64)>) -> PullEvent {
        PullEvent {
            status: status.to_string(),
            id: Some(id.to_string()),
            detail: detail.map(|(current, total)| LayerProgress { current, total }),
        }
    }

    #[tokio::test]
    async fn pulls_creates_and_starts_when_nothing_exists() {
        let config = eosio_config();
        let runtime = FakeRuntime {
            pull_events: vec![
                layer("Waiting", "aa11", None),
                layer("Downloading", "aa11", Some((10, 100))),
                layer("Downloading", "aa11", Some((100, 100))),
                layer("Extracting", "aa11", Some((100, 100))),
                layer("Extracting", "aa11", Some((100, 100))),
            ],
            ..Default::default()
        };

        let mut events = Vec::new();
        let id = Reconciler::new(&runtime)
            .run(&config, |e| events.push(e))
            .await
            .unwrap();

        assert!(!id.as_str().is_empty());
        assert_eq!(events[0], ProgressEvent::PullStarted);
        assert!(matches!(events[1], ProgressEvent::PullDownloading(_)));
        assert!(matches!(events[2], ProgressEvent::PullDownloading(_)));
        // second Extracting is suppressed
        assert_eq!(
            &events[3..],
            &[
                ProgressEvent::PullExtracting,
                ProgressEvent::PullDone,
                ProgressEvent::ContainerCreated,
                ProgressEvent::ContainerStarted(id.clone()),
            ]
        );

        let calls = runtime.calls();
        assert!(calls.contains(&"pull_image:eosio/eos-dev:latest".to_string()));
        assert!(calls.contains(&"start:new-id".to_string()));
        assert!(
            !calls
                .iter()
                .any(|c| c.starts_with("stop:") || c.starts_with("remove:"))
        );
    }

    #[tokio::test]
    async fn starts_matching_stopped_container_without_recreating() {
        let config = eosio_config();
        let runtime = FakeRuntime {
            images: vec![image_for(&config)],
            containers: vec![summary("abc123", "/eosio")],
            details: vec![matching_details(&config, "abc123", false)],
            ..Default::default()
        };

        let mut events = Vec::new();
        let id = Reconciler::new(&runtime)
            .run(&config, |e| events.push(e))
            .await
            .unwrap();

        assert_eq!(id.as_str(), "abc123");
        assert_eq!(
            events,
            vec![
                ProgressEvent::ImageFound,
                ProgressEvent::ContainerFound,
                ProgressEvent::ContainerStarted(id),
            ]
        );

        let calls = runtime.calls();
        assert!(calls.contains(&"start:abc123".to_string()));
        assert!(!calls.iter().any(|c| c.starts_with("create:")));
        assert!(!calls.iter().any(|c| c.starts_with("remove:")));
    }

    #[tokio::test]
    async fn does_not_restart_matching_running_container() {
        let config = eosio_config();
        let runtime = FakeRuntime {
            images: vec![image_for(&config)],
            containers: vec![summary("abc123", "/eosio")],
            details: vec![matching_details(&config, "abc123", true)],
            ..Default::default()
        };

        let mut events = Vec::new();
        let id = Reconciler::new(&runtime)
            .run(&config, |e| events.push(e))
            .await
            .unwrap();

        assert_eq!(events.last(), Some(&ProgressEvent::ContainerStarted(id)));
        assert!(!runtime.calls().iter().any(|c| c.starts_with("start:")));
    }

    #[tokio::test]
    async fn second_run_tolerates_daemon_added_defaults() {
        // matching_details carries fields the desired spec never mentions;
        // they must not read as drift.
        let config = eosio_config();
        let runtime = FakeRuntime {
            images: vec![image_for(&config)],
            containers: vec![summary("abc123", "/eosio")],
            details: vec![matching_details(&config, "abc123", true)],
            ..Default::default()
        };

        let mut events = Vec::new();
        Reconciler::new(&runtime)
            .run(&config, |e| events.push(e))
            .await
            .unwrap();

        assert!(events.contains(&ProgressEvent::ContainerFound));
        assert!(!events.contains(&ProgressEvent::ContainerConfigModified));
    }

    #[tokio::test]
    async fn replaces_container_when_binds_drift() {
        let desired =
            NodeConfig::from_args(None, None, None, Some("/srv/contracts:/mnt/dev/contracts"))
                .unwrap();
        // the existing container was created without any binds
        let existing = matching_details(&eosio_config(), "old-id", true);
        let runtime = FakeRuntime {
            images: vec![image_for(&desired)],
            containers: vec![summary("old-id", "/eosio")],
            details: vec![existing],
            ..Default::default()
        };

        let mut events = Vec::new();
        let id = Reconciler::new(&runtime)
            .run(&desired, |e| events.push(e))
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![
                ProgressEvent::ImageFound,
                ProgressEvent::ContainerConfigModified,
                ProgressEvent::ContainerCreated,
                ProgressEvent::ContainerStarted(id),
            ]
        );

        let calls = runtime.calls();
        let stop = calls.iter().position(|c| c == "stop:old-id").unwrap();
        let remove = calls.iter().position(|c| c == "remove:old-id").unwrap();
        let create = calls.iter().position(|c| c.starts_with("create:")).unwrap();
        assert!(stop < remove && remove < create);
        assert_eq!(calls.iter().filter(|c| c.starts_with("stop:")).count(), 1);
        assert_eq!(calls.iter().filter(|c| c.starts_with("remove:")).count(), 1);
        assert_eq!(calls.iter().filter(|c| c.starts_with("create:")).count(), 1);
    }

    #[tokio::test]
    async fn pull_failure_aborts_the_operation() {
        let config = eosio_config();
        let runtime = FakeRuntime {
            pull_events: vec![layer("Waiting", "aa11", None)],
            pull_error: Some("manifest unknown".to_string()),
            ..Default::default()
        };

        let mut events = Vec::new();
        let err = Reconciler::new(&runtime)
            .run(&config, |e| events.push(e))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ReconcileErrorKind::PullFailed);
        assert!(!events.contains(&ProgressEvent::PullDone));
        assert!(!runtime.calls().iter().any(|c| c.starts_with("create:")));
    }

    #[tokio::test]
    async fn stop_fails_when_no_container_matches() {
        let runtime = FakeRuntime::default();
        let name = ContainerName::new("eosio").unwrap();

        let err = Reconciler::new(&runtime).stop(&name).await.unwrap_err();

        assert_eq!(err.kind(), ReconcileErrorKind::ContainerNotFound);
        assert_eq!(runtime.calls(), vec!["list_containers:true".to_string()]);
    }

    #[tokio::test]
    async fn stop_stops_the_matching_container() {
        let runtime = FakeRuntime {
            containers: vec![summary("abc123", "/eosio")],
            ..Default::default()
        };
        let name = ContainerName::new("eosio").unwrap();

        Reconciler::new(&runtime).stop(&name).await.unwrap();

        assert!(runtime.calls().contains(&"stop:abc123".to_string()));
    }
}
