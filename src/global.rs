use crate::config::Config;
use crate::job;

#[derive(Debug, Default)]
pub struct State {
	pub config: Config,
	pub job_slot: job::JobSlot,
}

impl State {
	pub fn new(config: Config) -> State {
		State { config: config, job_slot: job::JobSlot::Empty }
	}
}
