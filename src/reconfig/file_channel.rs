//! Reconfiguration channel driven by a watched configuration file.

use crate::error::{ConfigError, Result};
use crate::reconfig::{ReconfigChannel, ReconfigHandler, Subscription};
use crate::sources::{ConfigSource, FileSource};
use notify::{Event, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Default quiet period before a changed file is reloaded.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Channel that delivers the contents of a config file whenever it changes.
///
/// Uses the `notify` crate to watch the directory holding the file, so the
/// watch survives editors that save by writing a temporary file and renaming
/// it over the original. Events for other entries in the directory are
/// ignored. Bursts of change events are
/// collapsed: the file is reloaded once the debounce period has passed
/// without further events. Reloads run on a tokio worker, which is the thread
/// handlers are invoked on.
///
/// A file that fails to load is logged and skipped; subscribers only ever
/// see successfully parsed records.
///
/// # Examples
///
/// ```rust,no_run
/// use costmap_weights::core::{ConfigCell, WeightSet};
/// use costmap_weights::reconfig::{FileChannel, ReconfigBridge};
/// use std::time::Duration;
///
/// # async fn example() -> costmap_weights::error::Result<()> {
/// let cell = ConfigCell::new(WeightSet::default());
/// let channel = FileChannel::new("config/weights.yaml")
///     .with_debounce(Duration::from_millis(200));
///
/// let _bridge = ReconfigBridge::attach(cell.clone(), &channel)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileChannel {
    path: PathBuf,
    debounce: Duration,
}

impl FileChannel {
    /// Create a channel watching `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Set the quiet period before a changed file is reloaded.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the debounce duration for this channel.
    pub fn debounce_duration(&self) -> Duration {
        self.debounce
    }
}

impl ReconfigChannel for FileChannel {
    /// Start watching the file.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::WatchError`] if there is no tokio runtime or the
    ///   watcher cannot be created
    /// - [`ConfigError::LoadError`] if the path cannot be resolved
    fn subscribe(&self, handler: ReconfigHandler) -> Result<Subscription> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| ConfigError::WatchError(format!("No tokio runtime available: {}", e)))?;

        let canonical_path = self
            .path
            .canonicalize()
            .map_err(|e| ConfigError::LoadError(format!("Failed to resolve path: {}", e)))?;

        let (watch_dir, file_name) = match (canonical_path.parent(), canonical_path.file_name()) {
            (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_os_string()),
            _ => {
                return Err(ConfigError::WatchError(format!(
                    "Path has no parent directory: {}",
                    canonical_path.display()
                )));
            }
        };

        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<()>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let is_change = matches!(
                        event.kind,
                        notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                    );
                    let is_ours = event
                        .paths
                        .iter()
                        .any(|path| path.file_name() == Some(file_name.as_os_str()));
                    if is_change && is_ours {
                        let _ = event_tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = %e, "File watch error"),
            }
        })
        .map_err(|e| ConfigError::WatchError(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::WatchError(format!("Failed to watch path: {}", e)))?;

        let debounce = self.debounce;
        let source = FileSource::new(canonical_path.clone());
        let task = runtime.spawn(async move {
            while event_rx.recv().await.is_some() {
                sleep(debounce).await;
                while event_rx.try_recv().is_ok() {}

                tracing::debug!(source = %source.name(), "Config file changed, reloading");
                match source.load() {
                    Ok(fields) => handler(&fields),
                    Err(e) => tracing::error!(
                        source = %source.name(),
                        error = %e,
                        "Failed to reload config file, keeping current weights"
                    ),
                }
            }
        });

        tracing::info!(path = %canonical_path.display(), "Watching config file");

        // Never locked; only makes the cancel closure Sync
        let watcher = parking_lot::Mutex::new(watcher);
        Ok(Subscription::new(self.name(), move || {
            task.abort();
            drop(watcher);
        }))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconfig::ReconfigFields;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::time::timeout;

    fn forward_to(tx: mpsc::UnboundedSender<ReconfigFields>) -> ReconfigHandler {
        Arc::new(move |fields: &ReconfigFields| {
            let _ = tx.send(fields.clone());
        })
    }

    #[test]
    fn test_subscribe_without_runtime_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("weights.yaml");
        fs::write(&config_path, "obstacle_weight: 1.0").unwrap();

        let channel = FileChannel::new(&config_path);
        let result = channel.subscribe(Arc::new(|_fields: &ReconfigFields| {}));
        assert!(matches!(result, Err(ConfigError::WatchError(_))));
    }

    #[tokio::test]
    async fn test_watch_nonexistent_file() {
        let channel = FileChannel::new("/nonexistent/weights.yaml");
        let result = channel.subscribe(Arc::new(|_fields: &ReconfigFields| {}));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_file_change_delivers_fields() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("weights.yaml");
        fs::write(&config_path, "obstacle_weight: 1.0\ninflation_weight: 1.0\n").unwrap();

        let channel = FileChannel::new(&config_path).with_debounce(Duration::from_millis(50));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = channel.subscribe(forward_to(tx)).unwrap();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::write(&config_path, "obstacle_weight: 4.0\ninflation_weight: 2.0\n").unwrap();
        });

        let fields = timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fields.get_f64("obstacle_weight").unwrap(), 4.0);
        assert_eq!(fields.get_f64("inflation_weight").unwrap(), 2.0);
    }

    #[test]
    fn test_debounce_duration() {
        let channel = FileChannel::new("weights.yaml");
        assert_eq!(channel.debounce_duration(), DEFAULT_DEBOUNCE);

        let channel = channel.with_debounce(Duration::from_millis(10));
        assert_eq!(channel.debounce_duration(), Duration::from_millis(10));
    }

    #[test]
    fn test_name() {
        let channel = FileChannel::new("weights.yaml");
        assert_eq!(channel.name(), "file:weights.yaml");
        assert_eq!(channel.path(), Path::new("weights.yaml"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_watch_survives_rename_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("weights.yaml");
        let staging_path = temp_dir.path().join("weights.yaml.swp");
        fs::write(&config_path, "obstacle_weight: 1.0\ninflation_weight: 1.0\n").unwrap();

        let channel = FileChannel::new(&config_path).with_debounce(Duration::from_millis(50));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = channel.subscribe(forward_to(tx)).unwrap();

        async fn wait_for(rx: &mut mpsc::UnboundedReceiver<ReconfigFields>, obstacle: f64) {
            timeout(Duration::from_secs(5), async {
                while let Some(fields) = rx.recv().await {
                    if fields.get_f64("obstacle_weight").ok() == Some(obstacle) {
                        return;
                    }
                }
                panic!("channel closed");
            })
            .await
            .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        fs::write(&staging_path, "obstacle_weight: 5.0\ninflation_weight: 1.0\n").unwrap();
        fs::rename(&staging_path, &config_path).unwrap();
        wait_for(&mut rx, 5.0).await;

        fs::write(&config_path, "obstacle_weight: 6.0\ninflation_weight: 1.0\n").unwrap();
        wait_for(&mut rx, 6.0).await;
    }
}
