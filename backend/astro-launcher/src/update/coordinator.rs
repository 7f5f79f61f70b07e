use crate::context::LauncherContext;
use crate::update::UpdateHelper;
use crate::{LauncherError, LauncherResult};

use astro_api::{ApiResult, ReleaseAsset, ReleaseFeed};

use std::path::PathBuf;

use tracing::{debug, info, warn};

/// A newer release than the one running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateDescriptor {
    pub current_version: String,
    pub latest_version: String,
    pub assets: Vec<ReleaseAsset>,
    /// Name of the most recently updated asset, the one restarted after install.
    pub newest_asset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Update checks are switched off in the config.
    Disabled,
    /// Feed could not be read.
    Unavailable,
    UpToDate,
    /// A newer version exists; only a notice was logged.
    Notified,
    /// The update helper is waiting for this process to exit.
    Scheduled,
}

/// Where an automatic update installs to and how it restarts the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoUpdateTarget {
    pub install_dir: PathBuf,
    pub restart_args: Vec<String>,
}

pub struct UpdateCoordinator {
    feed: ReleaseFeed,
    current_version: String,
    release_page_url: String,
    auto_update: Option<AutoUpdateTarget>,
}

impl UpdateCoordinator {
    /// Notice-only coordinator.
    pub fn new(feed: ReleaseFeed, current_version: &str, release_page_url: &str) -> Self {
        Self {
            feed,
            current_version: current_version.to_string(),
            release_page_url: release_page_url.to_string(),
            auto_update: None,
        }
    }

    /// Also install newer releases into `target`.
    pub fn with_auto_update(mut self, target: AutoUpdateTarget) -> Self {
        self.auto_update = Some(target);
        self
    }

    /// Build the coordinator for this launcher run.
    ///
    /// Automatic updates only apply to a standalone executable that was not
    /// started with `--noupdate`.
    pub fn from_context(ctx: &LauncherContext) -> LauncherResult<Self> {
        let cfg = &ctx.config.update;
        let user_agent = format!("astro-launcher/{}", ctx.version);
        let feed = ReleaseFeed::new(&cfg.feed_url, &user_agent, cfg.request_timeout())?;
        let coordinator = Self::new(feed, ctx.version, &cfg.release_page_url);

        if !ctx.standalone || ctx.disable_auto_update {
            return Ok(coordinator);
        }

        let exe = std::env::current_exe()?;
        let install_dir = exe.parent().map(PathBuf::from).ok_or_else(|| {
            LauncherError::from(std::io::Error::other(format!(
                "{} has no parent directory",
                exe.display()
            )))
        })?;

        Ok(coordinator.with_auto_update(AutoUpdateTarget {
            install_dir,
            restart_args: std::env::args().skip(1).collect(),
        }))
    }

    /// Check the feed and act on the result. Never fails: problems are
    /// logged and startup carries on.
    pub async fn run(&self) -> UpdateOutcome {
        let descriptor = match self.check_for_update().await {
            Ok(Some(descriptor)) => descriptor,
            Ok(None) => {
                debug!("Launcher v{} is up to date", self.current_version);
                return UpdateOutcome::UpToDate;
            }
            Err(e) => {
                warn!("Could not check for launcher updates: {e}");
                return UpdateOutcome::Unavailable;
            }
        };

        info!(
            "UPDATE: There is a newer version of the launcher out! {}",
            descriptor.latest_version
        );
        info!("Download it at {}", self.release_page_url);

        let Some(target) = &self.auto_update else {
            return UpdateOutcome::Notified;
        };

        match self.autoupdate(&descriptor, target) {
            Ok(()) => UpdateOutcome::Scheduled,
            Err(e) => {
                warn!("Automatic update failed, continuing with v{}: {e}", self.current_version);
                UpdateOutcome::Notified
            }
        }
    }

    /// Latest release if it differs from the running version.
    pub async fn check_for_update(&self) -> ApiResult<Option<UpdateDescriptor>> {
        let release = self.feed.latest_release().await?;

        if !release.differs_from(&self.current_version) {
            return Ok(None);
        }

        Ok(Some(UpdateDescriptor {
            current_version: self.current_version.clone(),
            latest_version: release.tag_name.clone(),
            newest_asset: release.newest_asset().map(|a| a.name.clone()),
            assets: release.assets,
        }))
    }

    /// Hand the update to a detached helper process.
    pub fn autoupdate(
        &self,
        descriptor: &UpdateDescriptor,
        target: &AutoUpdateTarget,
    ) -> LauncherResult<()> {
        let helper = UpdateHelper::plan(
            descriptor,
            &target.install_dir,
            std::process::id(),
            &target.restart_args,
        )
        .ok_or_else(|| {
            LauncherError::update_helper_spawn(std::io::Error::other(format!(
                "release {} has no downloadable assets",
                descriptor.latest_version
            )))
        })?;

        helper.spawn()?;
        info!(
            "Update to {} scheduled, shutting down so it can be installed",
            descriptor.latest_version
        );
        Ok(())
    }
}
