use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;

pub struct AppContext {
    /// Working directory the command was started in.
    pub cwd: PathBuf,
    pub config: Config,
    pub robot_mode: bool,
    pub verbosity: u8,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &cwd)?;

        Ok(Self {
            cwd,
            config,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
            quiet: cli.quiet,
        })
    }

    /// Resolve a user-supplied path against the working directory.
    #[must_use]
    pub fn resolve(&self, path: &std::path::Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
