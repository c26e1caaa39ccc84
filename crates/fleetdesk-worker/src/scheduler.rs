//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, info};

use fleetdesk_auth::signature::NonceStore;
use fleetdesk_core::config::signature::SignatureConfig;
use fleetdesk_core::error::AppError;

/// Cron-based scheduler for periodic background tasks.
pub struct MaintenanceScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// Nonce store swept on a timer.
    nonces: NonceStore,
    /// Signature policy (sweep cadence and window).
    config: SignatureConfig,
}

impl std::fmt::Debug for MaintenanceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceScheduler").finish()
    }
}

impl MaintenanceScheduler {
    /// Create a new maintenance scheduler.
    pub async fn new(nonces: NonceStore, config: SignatureConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            nonces,
            config,
        })
    }

    /// Register all default scheduled tasks.
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_nonce_sweep().await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Maintenance scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Maintenance scheduler shut down");
        Ok(())
    }

    /// Nonce sweep on the configured cadence (default every 10 minutes).
    ///
    /// Nonces only need to live as long as the signature validity
    /// window; anything older can never match an accepted request.
    async fn register_nonce_sweep(&self) -> Result<(), AppError> {
        let nonces = self.nonces.clone();
        let max_age = self.config.validity_window_seconds;
        let schedule = format!("0 */{} * * * *", self.config.sweep_interval_minutes);

        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let nonces = nonces.clone();
            Box::pin(async move {
                debug!("Running nonce sweep");
                let removed = nonces.sweep(max_age);
                if removed > 0 {
                    info!(removed, "Nonce sweep completed");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create nonce_sweep schedule: {e}")))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add nonce_sweep schedule: {e}")))?;

        info!(
            interval_minutes = self.config.sweep_interval_minutes,
            "Registered: nonce_sweep"
        );
        Ok(())
    }
}
