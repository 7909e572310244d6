//! Clap CLI definitions for the `gitalchemist` command.

use std::path::PathBuf;

use alchemist_config::Overrides;
use clap::{ArgGroup, Parser};

/// gitalchemist -- replay scripted git histories.
///
/// Every task is a directory below the config directory holding a
/// `gitalchemist.yaml` formula and the files it copies into the repository.
#[derive(Parser, Debug)]
#[command(
    name = "gitalchemist",
    about = "Build git repositories with a scripted history from formula files",
    version,
    group(
        ArgGroup::new("mode")
            .required(true)
            .multiple(false)
            .args(["tasks", "runall", "clean"])
    )
)]
pub struct Cli {
    /// Task directories below the config directory.
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Run every task of the config directory.
    #[arg(long)]
    pub runall: bool,

    /// Remove the target directory.
    #[arg(long)]
    pub clean: bool,

    /// Base directory for the generated git repositories [env: GITALCHEMIST_TARGETDIR].
    #[arg(long, value_name = "DIR")]
    pub targetdir: Option<PathBuf>,

    /// Base directory of the formulas [env: GITALCHEMIST_CFGDIR].
    #[arg(long, value_name = "DIR")]
    pub cfgdir: Option<PathBuf>,

    /// Execute only this many steps of each formula; 0 executes all.
    #[arg(long, value_name = "N")]
    pub maxsteps: Option<usize>,

    /// Emit debug messages.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Test run: steps are logged but not executed.
    #[arg(long)]
    pub test: bool,

    /// Settings file (default: gitalchemist.config.yaml if present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// What the invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Tasks(Vec<String>),
    RunAll,
    Clean,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.clean {
            Mode::Clean
        } else if self.runall {
            Mode::RunAll
        } else {
            Mode::Tasks(self.tasks.clone())
        }
    }

    /// Settings given on the command line. Unset flags leave the lower
    /// settings layers in charge.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            targetdir: self.targetdir.clone(),
            cfgdir: self.cfgdir.clone(),
            verbose: self.verbose.then_some(true),
            test: self.test.then_some(true),
            maxsteps: self.maxsteps,
        }
    }
}
