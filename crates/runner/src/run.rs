//! The per-target capture/diff sequence.

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    time::Duration,
};

use {
    anyhow::Context,
    tokio::task::JoinSet,
    tracing::{error, info},
};

use {
    sitediff_browser::{BrowserError, CaptureArtifact, Renderer, capture, settle},
    sitediff_compare::{CompareError, DiffResult, diff_images},
    sitediff_config::PageTarget,
};

use crate::{
    context::RunContext,
    report::{RunReport, TargetStatus},
};

/// Scroll and diff tuning for a run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub scroll_step: u64,
    pub settle_timeout: Duration,
    pub threshold: f64,
}

/// Drives the per-target sequence over a single shared page handle.
pub struct Runner<'a, R: Renderer + ?Sized> {
    renderer: &'a R,
    ctx: &'a RunContext,
    opts: RunOptions,
}

impl<'a, R: Renderer + ?Sized> Runner<'a, R> {
    pub fn new(renderer: &'a R, ctx: &'a RunContext, opts: RunOptions) -> Self {
        Self {
            renderer,
            ctx,
            opts,
        }
    }

    /// Run every target sequentially and wait for all diffs to finish.
    ///
    /// Each diff is spawned as a task so the next target's captures can
    /// start as soon as the previous diff has been initiated, but every
    /// handle is awaited before the report is returned — only then may the
    /// browser session be released.
    ///
    /// A capture failure marks its target failed and skips its diff without
    /// halting the run; duplicate target names and directory provisioning
    /// failures abort the run before the first capture.
    pub async fn run(&self, targets: &[PageTarget]) -> anyhow::Result<RunReport> {
        ensure_unique_names(targets)?;

        self.ctx
            .provision()
            .context("failed to provision output directories")?;

        let mut statuses: HashMap<String, TargetStatus> = HashMap::new();
        let mut diffs: JoinSet<(String, Result<DiffResult, CompareError>)> = JoinSet::new();

        for target in targets {
            match self.capture_target(target).await {
                Ok((dev, baseline)) => {
                    let name = target.name.clone();
                    let diff_path = self.ctx.diff_path(&target.name);
                    let threshold = self.opts.threshold;
                    diffs.spawn(async move {
                        let result =
                            diff_images(&dev.path, &baseline, &diff_path, threshold).await;
                        (name, result)
                    });
                },
                Err(e) => {
                    error!(target = target.name, error = %e, "capture failed, skipping diff");
                    statuses.insert(target.name.clone(), TargetStatus::CaptureFailed(e.to_string()));
                },
            }
        }

        // Every diff must resolve before the run is complete.
        while let Some(joined) = diffs.join_next().await {
            let (name, result) = joined.map_err(|e| anyhow::anyhow!("diff task panicked: {e}"))?;
            match result {
                Ok(diff) => {
                    info!(
                        target = name,
                        diff = %diff.diff_image_path.display(),
                        diff_pixels = diff.diff_pixel_count,
                        error_rate = diff.error_rate,
                        "diff complete"
                    );
                    statuses.insert(name, TargetStatus::Diffed(diff));
                },
                Err(e) => {
                    error!(target = name, error = %e, "diff failed");
                    statuses.insert(name, TargetStatus::DiffFailed(e.to_string()));
                },
            }
        }

        // Report in input order regardless of diff completion order.
        let mut report = RunReport::default();
        for target in targets {
            if let Some(status) = statuses.remove(&target.name) {
                report.push(&target.name, status);
            }
        }
        Ok(report)
    }

    /// Navigate/settle/capture dev — and prod, unless a baseline directory
    /// is configured — then resolve the baseline path for the diff.
    async fn capture_target(
        &self,
        target: &PageTarget,
    ) -> Result<(CaptureArtifact, PathBuf), BrowserError> {
        let dev = self
            .capture_env(&self.ctx.dev_domain, target, self.ctx.dev_path(&target.name))
            .await?;

        let baseline = match self.ctx.baseline_path(&target.name) {
            Some(path) => path,
            None => {
                let prod = self
                    .capture_env(
                        &self.ctx.prod_domain,
                        target,
                        self.ctx.prod_path(&target.name),
                    )
                    .await?;
                prod.path
            },
        };

        Ok((dev, baseline))
    }

    async fn capture_env(
        &self,
        domain: &str,
        target: &PageTarget,
        dest: PathBuf,
    ) -> Result<CaptureArtifact, BrowserError> {
        let url = format!("{}{}", domain, target.path);
        info!(target = target.name, url, "capturing");
        self.renderer.navigate(&url).await?;
        let stats = settle(self.renderer, self.opts.scroll_step, self.opts.settle_timeout).await?;
        info!(
            target = target.name,
            steps = stats.steps,
            timeouts = stats.timeouts,
            height = stats.final_height,
            "page settled"
        );
        capture(self.renderer, &dest).await
    }
}

fn ensure_unique_names(targets: &[PageTarget]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for target in targets {
        if !seen.insert(target.name.as_str()) {
            anyhow::bail!(
                "duplicate target name {:?}: output paths would collide",
                target.name
            );
        }
    }
    Ok(())
}
