use std::io;
use io::{BufRead,IsTerminal,Write};

use microsh::config::Config;
use microsh::global::State;
use microsh::Control;

fn main() {
	let config = Config::from_env();
	if let Err(e) = config.init_logging() {
		eprintln!("log file: {}", e);
	}

	let interactive = io::stdin().is_terminal();
	let mut state = State::new(config);
	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	loop {
		if interactive {
			let _ = stdout.write_all(state.config.prompt.as_bytes());
			let _ = stdout.flush();
		}
		let mut line: Vec<u8> = vec![];
		match stdin_locked.read_until(b'\n', &mut line) {
			Ok(0) => { break; },
			Ok(_) => {},
			Err(e) => {
				eprintln!("{}", e);
				break;
			},
		}
		let line = String::from_utf8_lossy(&line);
		if microsh::eval(&mut state, line.trim_end_matches('\n')) == Control::Exit {
			break;
		}
	}
}
