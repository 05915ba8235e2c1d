//! Line commands for the interactive session.

use storefront_types::{Category, ProductId, SortBy, SortByParseError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Products { category: Option<Category> },
    Categories,
    Filter(FilterCommand),
    Show(ProductId),
    Add(ProductId),
    Remove(ProductId),
    Quantity { id: ProductId, quantity: i64 },
    Increment(ProductId),
    Decrement(ProductId),
    Cart,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCommand {
    Min(u32),
    Max(u32),
    Sort(SortBy),
    Reset,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("`{0}` is not a whole number")]
    InvalidNumber(String),
    #[error("{0} (expected one of: newest, price-low-high, price-high-low, popular)")]
    InvalidSort(String),
    #[error("unknown category `{0}` (try `categories`)")]
    UnknownCategory(String),
}

impl From<SortByParseError> for CommandParseError {
    fn from(err: SortByParseError) -> Self {
        CommandParseError::InvalidSort(err.to_string())
    }
}

pub const HELP: &str = "\
Commands:
  products [category]        list products, optionally by category
  categories                 list the store's categories
  filter min <n>             raise the minimum price (0-1000)
  filter max <n>             lower the maximum price (0-1000)
  filter sort <order>        newest | price-low-high | price-high-low | popular
  filter reset               clear price range and sort
  show <id>                  product detail and recommendations
  add <id>                   add a loaded product to the cart
  remove <id>                remove a line from the cart
  qty <id> <n>               set a line's quantity (0 removes it)
  inc <id> / dec <id>        adjust a line's quantity by one
  cart                       show the cart and order summary
  help                       show this help
  quit                       leave the store";

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandParseError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "products" | "ls" => Command::Products {
                category: words.next().map(category).transpose()?,
            },
            "categories" => Command::Categories,
            "filter" => Command::Filter(parse_filter(&mut words)?),
            "show" => Command::Show(product_id(words.next(), "show")?),
            "add" => Command::Add(product_id(words.next(), "add")?),
            "remove" | "rm" => Command::Remove(product_id(words.next(), "remove")?),
            "qty" => {
                let id = product_id(words.next(), "qty")?;
                let raw = words.next().ok_or(CommandParseError::MissingArgument {
                    command: "qty",
                    argument: "a quantity",
                })?;
                let quantity = raw
                    .parse::<i64>()
                    .map_err(|_| CommandParseError::InvalidNumber(raw.to_string()))?;
                Command::Quantity { id, quantity }
            }
            "inc" => Command::Increment(product_id(words.next(), "inc")?),
            "dec" => Command::Decrement(product_id(words.next(), "dec")?),
            "cart" => Command::Cart,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn product_id(word: Option<&str>, command: &'static str) -> Result<ProductId, CommandParseError> {
    word.map(ProductId::from)
        .ok_or(CommandParseError::MissingArgument {
            command,
            argument: "a product id",
        })
}

fn category(word: &str) -> Result<Category, CommandParseError> {
    Category::parse(word).ok_or_else(|| CommandParseError::UnknownCategory(word.to_string()))
}

fn parse_filter<'a>(
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<FilterCommand, CommandParseError> {
    let missing = |argument| CommandParseError::MissingArgument {
        command: "filter",
        argument,
    };

    let kind = words
        .next()
        .ok_or_else(|| missing("min, max, sort or reset"))?;
    match kind.to_ascii_lowercase().as_str() {
        "min" => Ok(FilterCommand::Min(price(words.next(), missing("a price"))?)),
        "max" => Ok(FilterCommand::Max(price(words.next(), missing("a price"))?)),
        "sort" => {
            let raw = words.next().ok_or_else(|| missing("a sort order"))?;
            Ok(FilterCommand::Sort(SortBy::parse(raw)?))
        }
        "reset" => Ok(FilterCommand::Reset),
        other => Err(CommandParseError::Unknown(format!("filter {other}"))),
    }
}

fn price(word: Option<&str>, missing: CommandParseError) -> Result<u32, CommandParseError> {
    let raw = word.ok_or(missing)?;
    raw.parse::<u32>()
        .map_err(|_| CommandParseError::InvalidNumber(raw.to_string()))
}
