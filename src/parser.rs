use crate::config::{MAX_ARGS,MAX_COMMANDS,MAX_CONDITIONAL_ARGS};
use crate::error::{Result,ShellError};
use crate::types::*;

struct Parser<'a> {
	line: &'a str,
	i: usize,
}

impl<'a> Parser<'a> {
	fn new(line: &'a str) -> Parser<'a> {
		Parser { line: line, i: 0 }
	}

	fn peek(&self) -> Option<u8> {
		self.line.as_bytes().get(self.i).cloned()
	}

	fn rest(&self) -> &'a [u8] {
		&self.line.as_bytes()[self.i ..]
	}

	fn proceed_while<F>(&mut self, f: F) where F: Fn(&Parser<'a>, u8) -> bool {
		while let Some(c) = self.peek() {
			if !f(&*self, c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		match c {
			b' ' | b'\t' | b'\n' => true,
			_ => false,
		}
	}

	fn is_letter(c: u8) -> bool {
		match c {
			b'>' | b'<' => false,
			_ => !Parser::is_whitespace(c),
		}
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(|_, c| Parser::is_whitespace(c));
	}

	fn read_while<F>(&mut self, f: F) -> &'a str where F: Fn(&Parser<'a>, u8) -> bool {
		let orig = self.i;
		self.proceed_while(f);
		&self.line[orig .. self.i]
	}

	fn read_words(&mut self) -> Vec<&'a str> {
		let mut words = vec![];
		loop {
			self.skip_whitespaces();
			let word = self.read_while(|_, c| !Parser::is_whitespace(c));
			if word.is_empty() {
				break;
			}
			words.push(word);
		}
		words
	}

	fn parse_redirect(&mut self) -> Result<Option<Redirect>> {
		let typ = match self.peek() {
			Some(b'<') => {
				self.i += 1;
				RedirectType::Input
			},
			Some(b'>') => if self.rest().starts_with(b">>") {
				self.i += 2;
				RedirectType::Append
			} else {
				self.i += 1;
				RedirectType::Output
			},
			_ => { return Ok(None); },
		};

		self.skip_whitespaces();
		let target = self.read_while(|_, c| Parser::is_letter(c));
		if target.is_empty() {
			return Err(ShellError::syntax("empty redirect"));
		}
		Ok(Some(Redirect::new(target, typ)?))
	}

	fn parse_redirection(&mut self) -> Result<Redirection> {
		let mut words: Vec<&'a str> = vec![];
		let mut input = None;
		let mut output = None;

		loop {
			self.skip_whitespaces();
			if let Some(redirect) = self.parse_redirect()? {
				if redirect.typ == RedirectType::Input {
					input = Some(redirect);
				} else {
					output = Some(redirect);
				}
				continue;
			}
			let word = self.read_while(|_, c| Parser::is_letter(c));
			if word.is_empty() {
				break;
			}
			words.push(word);
		}

		Ok(Redirection { argv: Argv::new(words, MAX_ARGS)?, input: input, output: output })
	}

	fn read_operator(&mut self) -> Option<Operator> {
		let op = if self.rest().starts_with(b"&&") {
			Operator::And
		} else if self.rest().starts_with(b"||") {
			Operator::Or
		} else {
			return None;
		};
		self.i += 2;
		Some(op)
	}

	fn at_operator(&self) -> bool {
		let rest = self.rest();
		rest.starts_with(b"&&") || rest.starts_with(b"||")
	}

	fn parse_chain(&mut self) -> Result<Chain> {
		let mut groups: Vec<Vec<&'a str>> = vec![];
		let mut operators: Vec<Operator> = vec![];
		let mut current: Vec<&'a str> = vec![];

		loop {
			self.skip_whitespaces();
			if self.peek().is_none() {
				break;
			}
			if let Some(op) = self.read_operator() {
				if current.is_empty() {
					return Err(ShellError::syntax(format!("syntax error near '{}'", operator_str(op))));
				}
				if operators.len() == MAX_COMMANDS - 1 {
					return Err(ShellError::TooManyCommands(MAX_COMMANDS));
				}
				groups.push(current);
				operators.push(op);
				current = vec![];
				continue;
			}
			let word = self.read_while(|p, c| !Parser::is_whitespace(c) && !p.at_operator());
			current.push(word);
		}

		if current.is_empty() {
			return match operators.last() {
				Some(&op) => Err(ShellError::syntax(format!("missing command after '{}'", operator_str(op)))),
				None => Err(ShellError::EmptyCommand),
			};
		}
		groups.push(current);

		let mut argvs = groups.into_iter().map(|g| Argv::new(g, MAX_CONDITIONAL_ARGS));
		let first = match argvs.next() {
			Some(argv) => argv?,
			None => { return Err(ShellError::EmptyCommand); },
		};
		let mut rest = Vec::with_capacity(operators.len());
		for (op, argv) in operators.into_iter().zip(argvs) {
			rest.push((op, argv?));
		}
		Ok(Chain { first: first, rest: rest })
	}
}

fn operator_str(op: Operator) -> &'static str {
	match op {
		Operator::And => "&&",
		Operator::Or => "||",
	}
}

/// Splits `text` on runs of blanks into at most `MAX_ARGS` words.
pub fn split(text: &str) -> Result<Argv> {
	split_with_limit(text, MAX_ARGS)
}

pub fn split_with_limit(text: &str, limit: usize) -> Result<Argv> {
	let mut parser = Parser::new(text);
	Argv::new(parser.read_words(), limit)
}

/// Every whitespace-separated word, unbounded.
pub fn words(text: &str) -> Vec<&str> {
	Parser::new(text).read_words()
}

/// Cuts `line` at each `delim`. Zero-length pieces are dropped; blank ones are
/// kept so callers can report them.
pub fn split_segments(line: &str, delim: char) -> Vec<&str> {
	line.split(delim).filter(|s| !s.is_empty()).collect()
}

/// Like `split_segments`, failing once more than `MAX_COMMANDS` pieces appear.
pub fn split_commands(line: &str, delim: char) -> Result<Vec<&str>> {
	let segments = split_segments(line, delim);
	if segments.len() > MAX_COMMANDS {
		return Err(ShellError::TooManyCommands(MAX_COMMANDS));
	}
	Ok(segments)
}

pub fn parse_redirection(segment: &str) -> Result<Redirection> {
	Parser::new(segment).parse_redirection()
}

pub fn parse_chain(line: &str) -> Result<Chain> {
	Parser::new(line).parse_chain()
}

/// Picks the component for `line`. The checks run in a fixed order and the
/// first match wins.
pub fn classify(line: &str) -> Mode {
	if line.trim().is_empty() {
		Mode::Empty
	} else if line.starts_with('#') {
		Mode::WordCount
	} else if line.contains('~') {
		Mode::Concat
	} else if line.contains("&&") || line.contains("||") {
		Mode::Conditional
	} else if line.contains('|') {
		Mode::Pipeline
	} else if line.contains('<') || line.contains('>') {
		Mode::Redirect
	} else if line.ends_with('+') {
		Mode::Background
	} else if line.contains(';') {
		Mode::Sequence
	} else {
		Mode::Simple
	}
}
