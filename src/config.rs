//! Fixed bounds, keywords and the few process-level knobs the shell reads at
//! startup. There are no configuration files.

use std::{env,fs,io};
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{ColorChoice,TermLogger,TerminalMode,WriteLogger};

/// Words per command, program name included.
pub const MAX_ARGS: usize = 4;
/// Commands per pipeline, sequence or conditional chain.
pub const MAX_COMMANDS: usize = 4;
/// Files per concatenation line.
pub const MAX_FILES: usize = 4;
/// `grep` accepts a pattern and one file at most.
pub const MAX_GREP_ARGS: usize = 3;
/// Words per command inside an `&&`/`||` chain.
pub const MAX_CONDITIONAL_ARGS: usize = MAX_ARGS - 1;

pub const EXIT_KEYWORD: &'static str = "dter";
pub const FOREGROUND_KEYWORD: &'static str = "fore";

const DEFAULT_PROMPT: &'static str = "microshell$ ";
const LOG_KEY: &'static str = "MICROSH_LOG";
const LOG_FILE_KEY: &'static str = "MICROSH_LOG_FILE";
const PROMPT_KEY: &'static str = "MICROSH_PROMPT";

#[derive(Debug, Clone)]
pub struct Config {
	pub prompt: String,
	pub log_level: LevelFilter,
	pub log_file: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Config {
		Config { prompt: DEFAULT_PROMPT.to_string(), log_level: LevelFilter::Warn, log_file: None }
	}
}

impl Config {
	pub fn from_env() -> Config {
		let mut config = Config::default();
		if let Ok(prompt) = env::var(PROMPT_KEY) {
			config.prompt = prompt;
		}
		if let Some(level) = env::var(LOG_KEY).ok().and_then(|s| s.parse().ok()) {
			config.log_level = level;
		}
		config.log_file = env::var_os(LOG_FILE_KEY).map(PathBuf::from);
		config
	}

	/// Installs the global logger. Only the first call in a process has an effect.
	pub fn init_logging(&self) -> io::Result<()> {
		let log_config = simplelog::Config::default();
		let r = match self.log_file {
			Some(ref path) => WriteLogger::init(self.log_level, log_config, fs::File::create(path)?),
			None => TermLogger::init(self.log_level, log_config, TerminalMode::Stderr, ColorChoice::Auto),
		};
		if r.is_err() {
			log::debug!("logger already installed");
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::default();
		assert_eq!(config.prompt, "microshell$ ");
		assert_eq!(config.log_level, LevelFilter::Warn);
		assert!(config.log_file.is_none());
		assert_eq!(MAX_CONDITIONAL_ARGS, 3);
	}
}
