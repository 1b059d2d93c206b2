//! Terminal command parsing.
//!
//! One typed line becomes one [`UserCommand`]. Positions are 1-based, as
//! printed next to catalog and basket lines.

use std::fmt;
use std::str::FromStr;

use larek_core::PaymentMethod;

use crate::error::InputError;

/// Which catalog item `show` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// 1-based position in the catalog list.
    Position(usize),
    /// Catalog id.
    Id(String),
}

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    List,
    Show(ItemRef),
    Toggle,
    Basket,
    Remove(usize),
    Order,
    Pay(PaymentMethod),
    Address(String),
    Next,
    Email(String),
    Phone(String),
    Submit,
    Close,
    Help,
    Quit,
}

/// Text printed by `help`.
pub const HELP: &str = "\
Commands:
  list                 show the catalog
  show <n|id>          open an item
  toggle               buy / remove the open item
  basket               open the basket
  remove <n>           remove basket line n
  order                start checkout from the basket
  pay card|cash        choose a payment method
  address <text>       set the delivery address
  next                 continue to contacts
  email <text>         set the email
  phone <text>         set the phone number
  submit               place the order
  close                close the window
  help                 this text
  quit                 leave the store";

fn parse_position(raw: &str) -> Result<usize, InputError> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(InputError::InvalidIndex(raw.to_string())),
    }
}

impl FromStr for UserCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(InputError::Empty);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "list" | "ls" => UserCommand::List,
            "show" | "open" => {
                if rest.is_empty() {
                    return Err(InputError::MissingArgument {
                        command: "show",
                        expected: "a position or an item id",
                    });
                }
                if rest.chars().all(|c| c.is_ascii_digit()) {
                    UserCommand::Show(ItemRef::Position(parse_position(rest)?))
                } else {
                    UserCommand::Show(ItemRef::Id(rest.to_string()))
                }
            }
            "toggle" | "buy" => UserCommand::Toggle,
            "basket" | "cart" => UserCommand::Basket,
            "remove" | "rm" => {
                if rest.is_empty() {
                    return Err(InputError::MissingArgument {
                        command: "remove",
                        expected: "a basket position",
                    });
                }
                UserCommand::Remove(parse_position(rest)?)
            }
            "order" | "checkout" => UserCommand::Order,
            "pay" => {
                if rest.is_empty() {
                    return Err(InputError::MissingArgument {
                        command: "pay",
                        expected: "`card` or `cash`",
                    });
                }
                let method = rest
                    .parse::<PaymentMethod>()
                    .map_err(|_| InputError::Unknown(format!("pay {rest}")))?;
                UserCommand::Pay(method)
            }
            "address" => UserCommand::Address(rest.to_string()),
            "next" => UserCommand::Next,
            "email" => UserCommand::Email(rest.to_string()),
            "phone" => UserCommand::Phone(rest.to_string()),
            "submit" => UserCommand::Submit,
            "close" | "back" => UserCommand::Close,
            "help" | "?" => UserCommand::Help,
            "quit" | "exit" | "q" => UserCommand::Quit,
            _ => return Err(InputError::Unknown(line.to_string())),
        };

        Ok(command)
    }
}

impl fmt::Display for UserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserCommand::List => f.write_str("list"),
            UserCommand::Show(ItemRef::Position(n)) => write!(f, "show {n}"),
            UserCommand::Show(ItemRef::Id(id)) => write!(f, "show {id}"),
            UserCommand::Toggle => f.write_str("toggle"),
            UserCommand::Basket => f.write_str("basket"),
            UserCommand::Remove(n) => write!(f, "remove {n}"),
            UserCommand::Order => f.write_str("order"),
            UserCommand::Pay(method) => write!(f, "pay {method}"),
            UserCommand::Address(text) => write!(f, "address {text}"),
            UserCommand::Next => f.write_str("next"),
            UserCommand::Email(text) => write!(f, "email {text}"),
            UserCommand::Phone(text) => write!(f, "phone {text}"),
            UserCommand::Submit => f.write_str("submit"),
            UserCommand::Close => f.write_str("close"),
            UserCommand::Help => f.write_str("help"),
            UserCommand::Quit => f.write_str("quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<UserCommand, InputError> {
        line.parse()
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("list").unwrap(), UserCommand::List);
        assert_eq!(parse("  BASKET ").unwrap(), UserCommand::Basket);
        assert_eq!(parse("next").unwrap(), UserCommand::Next);
        assert_eq!(parse("q").unwrap(), UserCommand::Quit);
    }

    #[test]
    fn test_show_by_position_or_id() {
        assert_eq!(parse("show 2").unwrap(), UserCommand::Show(ItemRef::Position(2)));
        assert_eq!(
            parse("show 854cef69-976d").unwrap(),
            UserCommand::Show(ItemRef::Id("854cef69-976d".to_string()))
        );
        assert_eq!(parse("show 0"), Err(InputError::InvalidIndex("0".to_string())));
        assert!(matches!(parse("show"), Err(InputError::MissingArgument { .. })));
    }

    #[test]
    fn test_text_fields_keep_spaces() {
        assert_eq!(
            parse("address  Main St, 1 ").unwrap(),
            UserCommand::Address("Main St, 1".to_string())
        );
        assert_eq!(parse("email").unwrap(), UserCommand::Email(String::new()));
    }

    #[test]
    fn test_payment_choice() {
        assert_eq!(parse("pay cash").unwrap(), UserCommand::Pay(PaymentMethod::Cash));
        assert_eq!(parse("pay online").unwrap(), UserCommand::Pay(PaymentMethod::Card));
        assert!(matches!(parse("pay barter"), Err(InputError::Unknown(_))));
        assert!(matches!(parse("pay"), Err(InputError::MissingArgument { .. })));
    }

    #[test]
    fn test_remove_requires_position() {
        assert_eq!(parse("remove 1").unwrap(), UserCommand::Remove(1));
        assert_eq!(parse("remove x"), Err(InputError::InvalidIndex("x".to_string())));
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(parse("   "), Err(InputError::Empty));
        assert_eq!(parse("dance now"), Err(InputError::Unknown("dance now".to_string())));
    }
}
