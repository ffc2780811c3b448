use std::fmt::Write;

use chaindict::{Dict, DictError, Value};
use log::trace;

use crate::ParseError;
use crate::literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(Value),
    Set(Value, Value),
    Has(Value),
    Len,
    Stats,
}

/// Parses one command line. Blank lines give `Ok(None)`
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let cmd = match name {
        "get" => {
            let [key] = args("get", rest)?;
            Command::Get(key)
        }
        "set" => {
            let [key, value] = args("set", rest)?;
            Command::Set(key, value)
        }
        "has" => {
            let [key] = args("has", rest)?;
            Command::Has(key)
        }
        "len" => {
            args::<0>("len", rest)?;
            Command::Len
        }
        "stats" => {
            args::<0>("stats", rest)?;
            Command::Stats
        }
        other => return Err(ParseError::UnknownCommand(other.into())),
    };
    Ok(Some(cmd))
}

/// Parses exactly `N` argument literals for `command`
fn args<const N: usize>(command: &'static str, rest: &str) -> Result<[Value; N], ParseError> {
    let values = literal::parse_values(rest)?;
    let got = values.len();
    values.try_into().map_err(|_| ParseError::WrongArity {
        command,
        expected: N,
        got,
    })
}

/// Applies `cmd` to `dict` and writes the reply into `buf`
pub fn handle_and_encode(cmd: Command, dict: &mut Dict<Value, Value>, buf: &mut String) {
    trace!(target: "command", "{cmd:?}");

    // writing into a String cannot fail
    let _ = match cmd {
        Command::Get(key) => match dict.get(&key) {
            Ok(v) => write!(buf, "{v}"),
            Err(e) => encode_dict_error(&e, &key, buf),
        },
        // set can only fail on an unhashable key
        Command::Set(key, value) => match dict.set(key, value) {
            Ok(()) => write!(buf, "ok"),
            Err(e) => write!(buf, "TypeError: {e}"),
        },
        Command::Has(key) => match dict.contains(&key) {
            Ok(true) => write!(buf, "True"),
            Ok(false) => write!(buf, "False"),
            Err(e) => encode_dict_error(&e, &key, buf),
        },
        Command::Len => write!(buf, "{}", dict.len()),
        Command::Stats => {
            let stats = dict.stats();
            write!(
                buf,
                "buckets={} items={} empty={} longest_chain={}",
                stats.buckets, stats.items, stats.empty_buckets, stats.longest_chain
            )
        }
    };
}

pub fn encode_error(err: &ParseError, buf: &mut String) {
    let _ = match err {
        ParseError::Unhashable(e) => write!(buf, "TypeError: {e}"),
        e => write!(buf, "SyntaxError: {e}"),
    };
}

fn encode_dict_error(err: &DictError, key: &Value, buf: &mut String) -> std::fmt::Result {
    match err {
        DictError::KeyNotFound => write!(buf, "KeyError: {key}"),
        DictError::UnhashableKey { .. } => write!(buf, "TypeError: {err}"),
    }
}

#[cfg(test)]
mod test {
    use chaindict::{Dict, Value};

    use super::{Command, handle_and_encode, parse_command};
    use crate::ParseError;

    fn reply(line: &str, dict: &mut Dict<Value, Value>) -> String {
        let mut buf = String::new();
        let cmd = parse_command(line).unwrap().unwrap();
        handle_and_encode(cmd, dict, &mut buf);
        buf
    }

    #[test]
    fn parse() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("len"), Ok(Some(Command::Len)));
        assert_eq!(
            parse_command("  set 'a'   (1, 2)  "),
            Ok(Some(Command::Set(
                Value::from("a"),
                Value::Tuple(vec![Value::Int(1), Value::Int(2)])
            )))
        );
        assert_eq!(
            parse_command("has {1}"),
            Ok(Some(Command::Has(Value::Set(vec![Value::Int(1)]))))
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            parse_command("del 1"),
            Err(ParseError::UnknownCommand("del".into()))
        );
        assert_eq!(
            parse_command("set 1"),
            Err(ParseError::WrongArity {
                command: "set",
                expected: 2,
                got: 1
            })
        );
        assert_eq!(parse_command("get [1"), Err(ParseError::UnexpectedEnd));
    }

    #[test]
    fn replies() {
        let mut d = Dict::new();

        assert_eq!(reply("get 2", &mut d), "KeyError: 2");
        assert_eq!(reply("has 'a'", &mut d), "False");
        assert_eq!(reply("set 'a' 1", &mut d), "ok");
        assert_eq!(reply("has 'a'", &mut d), "True");
        assert_eq!(reply("get 'a'", &mut d), "1");
        assert_eq!(reply("set 'a' 1", &mut d), "ok");
        assert_eq!(reply("set 2 1", &mut d), "ok");
        assert_eq!(reply("len", &mut d), "2");
        assert_eq!(
            reply("get [1]", &mut d),
            "TypeError: unhashable type: 'list'"
        );
        assert_eq!(
            reply("set {1} 2", &mut d),
            "TypeError: unhashable type: 'set'"
        );
        assert_eq!(reply("len", &mut d), "2");
    }

    #[test]
    fn stats() {
        let mut d = Dict::new();
        for i in 0..7 {
            reply(&format!("set {i} None"), &mut d);
        }
        // 7 items went over 0.75 of 8 buckets
        let out = reply("stats", &mut d);
        assert!(out.starts_with("buckets=16 items=7 "), "{out}");
    }
}
