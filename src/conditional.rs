use log::debug;

use crate::error::Result;
use crate::exec::{self,ChildSpec};
use crate::parser;
use crate::types::{Argv,Chain,Operator};

/// Left-to-right fold over `chain`; `run` is called only for commands whose
/// operator is not already decided by the previous result.
pub fn eval_chain<F>(chain: &Chain, mut run: F) -> bool where F: FnMut(&Argv) -> bool {
	let mut result = run(&chain.first);
	for &(op, ref argv) in &chain.rest {
		result = match (op, result) {
			(Operator::And, true) | (Operator::Or, false) => run(argv),
			_ => {
				debug!("skipping {:?} after {:?}", argv, op);
				result
			},
		};
	}
	result
}

/// Runs an `&&`/`||` chain with inherited stdio. A command that cannot be
/// spawned counts as a failure.
pub fn run(line: &str) -> Result<bool> {
	let chain = parser::parse_chain(line)?;
	Ok(eval_chain(&chain, |argv| {
		exec::run(argv, &ChildSpec::default()).unwrap_or_else(|e| {
			e.report();
			false
		})
	}))
}
