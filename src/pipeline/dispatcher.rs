use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{error, info};

use crate::error::{InputError, RenderError, Result};
use crate::pipeline::engine::{display_name, render_one, RenderSummary, Renderer};
use crate::pipeline::progress::ProgressReporter;

/// Result of one file's job
#[derive(Debug)]
pub struct JobOutcome {
    pub input: PathBuf,
    pub result: Result<RenderSummary>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole run, in input order
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<JobOutcome>,
}

impl DispatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RenderSummary> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &RenderError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.input.as_path(), e)))
    }

    /// True when every job produced its artifact
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(JobOutcome::is_success)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Runs one renderer over many input files on a bounded worker pool.
///
/// Jobs share nothing but the renderer's read-only state. A failing job is
/// recorded in the report and never stops the others.
pub struct JobDispatcher {
    workers: usize,
    progress: ProgressReporter,
}

impl JobDispatcher {
    pub fn new(workers: usize, progress: ProgressReporter) -> Self {
        Self {
            workers: workers.max(1),
            progress,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Render every input, at most `workers` at a time
    pub fn run(&self, renderer: &dyn Renderer, inputs: &[PathBuf]) -> Result<DispatchReport> {
        if inputs.is_empty() {
            return Ok(DispatchReport::default());
        }
        check_inputs(inputs)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.min(inputs.len()))
            .thread_name(|i| format!("ledlog-worker-{}", i))
            .build()
            .map_err(|e| RenderError::generic(format!("failed to start worker pool: {}", e)))?;

        info!(
            "🎬 Rendering {} file(s) to {} with {} worker(s)",
            inputs.len(),
            renderer.name(),
            pool.current_num_threads()
        );

        let overall = self.progress.overall(inputs.len(), renderer.name());
        let failures = AtomicUsize::new(0);

        let outcomes: Vec<JobOutcome> = pool.install(|| {
            inputs
                .par_iter()
                .map(|input| {
                    let file_progress = self.progress.file(&display_name(input));
                    let result = render_one(renderer, input, &file_progress);
                    drop(file_progress);

                    if let Err(e) = &result {
                        failures.fetch_add(1, Ordering::Relaxed);
                        error!("{}: {}", input.display(), e.user_message());
                    }
                    overall.inc(1);

                    JobOutcome {
                        input: input.clone(),
                        result,
                    }
                })
                .collect()
        });

        let failed = failures.load(Ordering::Relaxed);
        overall.finish_with_message(if failed == 0 {
            "done".to_string()
        } else {
            format!("{} failed", failed)
        });

        info!("✅ {} of {} file(s) rendered", outcomes.len() - failed, outcomes.len());
        Ok(DispatchReport { outcomes })
    }
}

/// Fail before any job starts if an input is missing or unreadable
pub fn check_inputs(inputs: &[PathBuf]) -> Result<()> {
    for input in inputs {
        let not_found = || {
            RenderError::from(InputError::FileNotFound {
                path: input.display().to_string(),
            })
        };
        if !input.is_file() {
            return Err(not_found());
        }
        std::fs::File::open(input).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => not_found(),
            _ => RenderError::Io(e),
        })?;
    }
    Ok(())
}
