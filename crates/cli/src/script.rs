//! Line-based command scripts.
//!
//! ```text
//! # comment
//! add <id> <name...> <quantity> <threshold>
//! receive <id> <quantity>
//! fulfill <id> <quantity>
//! show
//! ```
//!
//! Tokens are whitespace-separated. A token starting with `#` begins a
//! comment running to the end of the line; a `#` inside a token (`Cable#2`)
//! is ordinary text.

use thiserror::Error;

use stockwatch_core::{DomainError, DomainResult, ProductId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        id: ProductId,
        name: String,
        quantity: u64,
        reorder_threshold: u64,
    },
    Receive {
        id: ProductId,
        quantity: u64,
    },
    Fulfill {
        id: ProductId,
        quantity: u64,
    },
    Show,
}

/// A parsed command with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub command: Command,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

/// Parse a whole script. Blank lines and `#` comments are skipped; the first
/// malformed line aborts parsing.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let tokens: Vec<&str> = raw
            .split_whitespace()
            .take_while(|token| !token.starts_with('#'))
            .collect();
        if tokens.is_empty() {
            continue;
        }
        let command = parse_command(&tokens).map_err(|message| ScriptError { line, message })?;
        lines.push(ScriptLine { line, command });
    }
    Ok(lines)
}

fn parse_command(tokens: &[&str]) -> Result<Command, String> {
    let (verb, args) = tokens
        .split_first()
        .ok_or_else(|| "empty command".to_string())?;

    match verb.to_ascii_lowercase().as_str() {
        "add" => {
            if args.len() < 4 {
                return Err("usage: add <id> <name> <quantity> <threshold>".to_string());
            }
            let (numbers, head) = (&args[args.len() - 2..], &args[..args.len() - 2]);
            Ok(Command::Add {
                id: parse_id(head[0])?,
                name: head[1..].join(" "),
                quantity: parse_quantity(numbers[0])?,
                reorder_threshold: parse_quantity(numbers[1])?,
            })
        }
        "receive" | "fulfill" => {
            let [id, quantity] = args else {
                return Err(format!("usage: {verb} <id> <quantity>"));
            };
            let id = parse_id(id)?;
            let quantity = parse_quantity(quantity)?;
            if verb.eq_ignore_ascii_case("receive") {
                Ok(Command::Receive { id, quantity })
            } else {
                Ok(Command::Fulfill { id, quantity })
            }
        }
        "show" if args.is_empty() => Ok(Command::Show),
        "show" => Err("usage: show".to_string()),
        other => Err(format!("unknown command `{other}`")),
    }
}

fn parse_id(raw: &str) -> Result<ProductId, String> {
    ProductId::parse(raw).map_err(|e| e.to_string())
}

fn parse_quantity(raw: &str) -> Result<u64, String> {
    parse_count(raw).map_err(|e| e.to_string())
}

fn parse_count(raw: &str) -> DomainResult<u64> {
    raw.parse::<u64>()
        .map_err(|_| DomainError::validation(format!("`{raw}` is not a non-negative integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command_and_skips_comments() {
        let script = "\
# header
add P001 Laptop 0 5

receive P001 10   # delivery
FULFILL P001 6
show
";
        let lines = parse_script(script).unwrap();

        assert_eq!(
            lines,
            vec![
                ScriptLine {
                    line: 2,
                    command: Command::Add {
                        id: ProductId::new("P001"),
                        name: "Laptop".to_string(),
                        quantity: 0,
                        reorder_threshold: 5,
                    },
                },
                ScriptLine {
                    line: 4,
                    command: Command::Receive {
                        id: ProductId::new("P001"),
                        quantity: 10,
                    },
                },
                ScriptLine {
                    line: 5,
                    command: Command::Fulfill {
                        id: ProductId::new("P001"),
                        quantity: 6,
                    },
                },
                ScriptLine {
                    line: 6,
                    command: Command::Show,
                },
            ]
        );
    }

    #[test]
    fn add_accepts_multi_word_names() {
        let lines = parse_script("add D7 USB-C Dock Pro 3 1").unwrap();
        match &lines[0].command {
            Command::Add { name, quantity, reorder_threshold, .. } => {
                assert_eq!(name, "USB-C Dock Pro");
                assert_eq!(*quantity, 3);
                assert_eq!(*reorder_threshold, 1);
            }
            other => panic!("Expected Add, got {other:?}"),
        }
    }

    #[test]
    fn hash_inside_a_token_is_part_of_the_name() {
        let lines = parse_script("add P1 Cable#2 1 1\nreceive P1 3 #restock").unwrap();

        match &lines[0].command {
            Command::Add { name, .. } => assert_eq!(name, "Cable#2"),
            other => panic!("Expected Add, got {other:?}"),
        }
        assert_eq!(
            lines[1].command,
            Command::Receive {
                id: ProductId::new("P1"),
                quantity: 3,
            }
        );
    }

    #[test]
    fn negative_quantity_reports_line() {
        let err = parse_script("add P1 Cable 1 1\nreceive P1 -4").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.starts_with("validation failed"));
        assert!(err.message.contains("-4"));
        assert_eq!(err.to_string(), format!("line 2: {}", err.message));
    }

    #[test]
    fn wrong_arity_and_unknown_verbs_are_rejected() {
        assert!(parse_script("receive P1").is_err());
        assert!(parse_script("fulfill P1 1 2").is_err());
        assert!(parse_script("add P1 1 2").is_err());
        assert!(parse_script("show all").is_err());

        let err = parse_script("restock P1 4").unwrap_err();
        assert_eq!(err.message, "unknown command `restock`");
    }

    #[test]
    fn zero_quantity_parses_and_is_left_to_the_warehouse() {
        let lines = parse_script("fulfill P1 0").unwrap();
        assert_eq!(
            lines[0].command,
            Command::Fulfill {
                id: ProductId::new("P1"),
                quantity: 0,
            }
        );
    }
}
