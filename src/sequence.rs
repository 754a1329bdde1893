use std::io::Write;

use log::debug;

use crate::config::MAX_COMMANDS;
use crate::error::{Result,ShellError};
use crate::exec;
use crate::parser;

/// Runs each `;` segment in turn through the plain-command executor. Results
/// are not inspected; a bad segment is reported and skipped.
pub fn run<W: Write>(segments: &[&str], out: &mut W) -> Result<()> {
	if segments.len() > MAX_COMMANDS {
		return Err(ShellError::TooManyCommands(MAX_COMMANDS));
	}
	for segment in segments {
		let segment = segment.trim();
		if segment.is_empty() {
			ShellError::EmptyCommand.report();
			continue;
		}
		match parser::split(segment).and_then(|argv| exec::execute(&argv, out)) {
			Ok(outcome) => debug!("'{}' success={}", segment, outcome.success),
			Err(e) => e.report(),
		}
	}
	Ok(())
}

pub fn run_line<W: Write>(line: &str, out: &mut W) -> Result<()> {
	run(&parser::split_commands(line, ';')?, out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn runs_every_segment() {
		let mut out = vec![];
		run_line("echo a; false ;echo b", &mut out).unwrap();
		assert_eq!(out, b"a\nb\n");
	}

	#[test]
	fn blank_and_bad_segments_are_skipped() {
		let mut out = vec![];
		run_line("echo a; ; echo 1 2 3 4 5; echo b", &mut out).unwrap();
		assert_eq!(out, b"a\nb\n");
	}

	#[test]
	fn too_many_segments() {
		let mut out = vec![];
		let e = run_line("echo 1; echo 2; echo 3; echo 4; echo 5", &mut out).unwrap_err();
		assert_eq!(e.kind(), ErrorKind::ResourceLimit);
		assert!(out.is_empty());
	}
}
