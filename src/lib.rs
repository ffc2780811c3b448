pub mod literal;
pub mod protocol;

use std::io::{self, BufRead, Write};

use chaindict::{Dict, DictError, Value};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// Input ended in the middle of a literal
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {ch:?} at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unterminated string literal")]
    UnterminatedString,

    /// Does not fit an i64
    #[error("invalid integer literal: {0}")]
    InvalidInt(String),

    #[error("name '{0}' is not defined")]
    UnknownName(String),

    /// A literal parsed fine but more input followed it
    #[error("trailing input at position {pos}")]
    TrailingInput { pos: usize },

    /// Set members and map keys go through the same check as dictionary keys
    #[error(transparent)]
    Unhashable(#[from] DictError),

    #[error("literal nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("line is not valid UTF-8 at byte {pos}")]
    InvalidUtf8 { pos: usize },

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} takes {expected} argument(s), got {got}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
}

/// Runs the line protocol until `input` hits EOF, one reply line per command
pub fn serve<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    let mut dict: Dict<Value, Value> = Dict::new();
    let mut raw = Vec::new();
    let mut buf = String::new();

    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        buf.clear();

        let parsed = std::str::from_utf8(&raw)
            .map_err(|e| ParseError::InvalidUtf8 {
                pos: e.valid_up_to(),
            })
            .and_then(protocol::parse_command);

        match parsed {
            Ok(None) => continue,
            Ok(Some(cmd)) => protocol::handle_and_encode(cmd, &mut dict, &mut buf),
            Err(e) => {
                debug!(target: "command", "rejected {:?}: {e}", String::from_utf8_lossy(&raw));
                protocol::encode_error(&e, &mut buf);
            }
        }

        writeln!(output, "{buf}")?;
        output.flush()?;
    }

    debug!("input closed with {} keys stored", dict.len());
    Ok(())
}
