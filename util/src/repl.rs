use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Evaluation failed: {0:?}")]
    Evaluate(E),
}

pub trait Repl {
    type Error: std::fmt::Debug;
    const HISTORY: Option<&'static str> = None;
    const PROMPT: &'static str = ">> ";
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

/// Collects lines ending in `\` into a single multi-line input.
#[derive(Default, Debug)]
struct Continuation(Option<String>);
impl Continuation {
    fn feed(&mut self, mut line: String) -> Option<String> {
        let more = line.ends_with('\\');
        if more {
            line.pop();
            line.push('\n');
        }
        let input = match self.0.take() {
            Some(mut input) => {
                input.push_str(&line);
                input
            }
            None => line,
        };
        if more {
            self.0 = Some(input);
            None
        } else {
            Some(input)
        }
    }
}

pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        if let Err(e) = editor.load_history(history) {
            log::debug!("no history loaded from {history}: {e}");
        }
    }
    let mut pending = Continuation::default();
    loop {
        match editor.readline(R::PROMPT) {
            Ok(line) => {
                let input = match pending.feed(line) {
                    Some(input) => input,
                    None => continue,
                };
                editor.add_history_entry(input.as_str());
                repl.evaluate(input).map_err(Error::Evaluate)?;
                if let Some(history) = R::HISTORY {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
