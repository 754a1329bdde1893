use std::io;

use log::debug;

use crate::builtin;
use crate::conditional;
use crate::error::Result;
use crate::exec;
use crate::global;
use crate::job;
use crate::parser;
use crate::pipeline;
use crate::redirect;
use crate::sequence;
use crate::types::Mode;

/// What the read loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control { Continue, Exit }

fn dispatch(state: &mut global::State, mode: Mode, line: &str) -> Result<()> {
	match mode {
		Mode::Empty => {},
		Mode::WordCount => { builtin::word_count(line)?; },
		Mode::Concat => { builtin::concat(line, &mut io::stdout())?; },
		Mode::Conditional => { conditional::run(line)?; },
		Mode::Pipeline => pipeline::run(&pipeline::parse(line)?)?,
		Mode::Redirect => { redirect::run(line)?; },
		Mode::Background => { job::background(&mut state.job_slot, line)?; },
		Mode::Sequence => sequence::run_line(line, &mut io::stdout())?,
		Mode::Simple => { exec::execute(&parser::split(line)?, &mut io::stdout())?; },
	}
	Ok(())
}

/// Runs one input line. Errors are reported here and never end the loop.
pub fn eval(state: &mut global::State, line: &str) -> Control {
	let line = line.trim();
	if let Some(builtin) = builtin::match_builtin(line) {
		return builtin(state);
	}
	let mode = parser::classify(line);
	debug!("{:?}: {}", mode, line);
	if let Err(e) = dispatch(state, mode, line) {
		e.report();
	}
	Control::Continue
}
