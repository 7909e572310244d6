//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the resolved settings. It is built once in
//! `main` after CLI parsing and hands out a fresh
//! [`ExecutionContext`] for every formula that runs.

use std::path::Path;

use alchemist_config::Settings;
use alchemist_formula::ExecutionContext;

/// Runtime context passed to every command handler.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    pub settings: Settings,
}

impl RuntimeContext {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn verbose(&self) -> bool {
        self.settings.verbose
    }

    /// Build the execution context for the formula file `page`.
    ///
    /// The task directory is the page's parent relative to the config
    /// directory.
    pub fn execution_context(&self, page: &Path) -> ExecutionContext {
        let settings = &self.settings;
        let parent = page.parent().unwrap_or(Path::new(""));
        let task_dir = parent.strip_prefix(&settings.cfgdir).unwrap_or(parent);

        ExecutionContext::new(&settings.cfgdir, &settings.targetdir, task_dir)
            .with_verbose(settings.verbose)
            .with_dry_run(settings.test)
            .with_max_steps(Some(settings.maxsteps))
    }
}
