use log::debug;

use crate::error::Result;
use crate::exec::{self,ChildSpec};
use crate::parser;

/// Runs one command whose stdin/stdout are rewired to the files named by its
/// `<`, `>` and `>>` operators. The files are opened by the child.
pub fn run(segment: &str) -> Result<bool> {
	let redirection = parser::parse_redirection(segment)?;
	debug!("redirect {:?} < {:?} > {:?}", redirection.argv, redirection.input, redirection.output);
	let spec = ChildSpec { redirects: redirection.redirects(), ..ChildSpec::default() };
	exec::run(&redirection.argv, &spec)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use std::os::unix::fs::PermissionsExt;

	#[test]
	fn truncate_then_read_back() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("out.txt");
		let copy = dir.path().join("copy.txt");

		assert!(run(&format!("echo hello > {}", out.display())).unwrap());
		assert_eq!(fs::read(&out).unwrap(), b"hello\n");
		assert!(run(&format!("echo bye > {}", out.display())).unwrap());
		assert_eq!(fs::read(&out).unwrap(), b"bye\n");

		assert!(run(&format!("cat < {} > {}", out.display(), copy.display())).unwrap());
		assert_eq!(fs::read(&copy).unwrap(), b"bye\n");
	}

	#[test]
	fn append_keeps_order() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("log.txt");
		assert!(run(&format!("echo a >> {}", out.display())).unwrap());
		assert!(run(&format!("echo b >> {}", out.display())).unwrap());
		assert_eq!(fs::read(&out).unwrap(), b"a\nb\n");
	}

	#[test]
	fn created_files_are_0644() {
		let dir = tempfile::tempdir().unwrap();
		let out = dir.path().join("mode.txt");
		assert!(run(&format!("true > {}", out.display())).unwrap());
		let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
		// the umask may only clear bits
		assert_eq!(mode & !0o644, 0);
		assert!(mode & 0o600 == 0o600);
	}

	#[test]
	fn missing_input_fails_the_child_only() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("missing.txt");
		assert!(!run(&format!("cat < {}", missing.display())).unwrap());
	}
}
