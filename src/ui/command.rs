use thiserror::Error;

/// Failures that stem from what the user typed rather than from the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("invalid command: {0}")]
    Invalid(String),

    #[error("no active book; use ADDD or ADDBOOK first")]
    NoActiveBook,
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ADD - t1 - t2 - [definition]`, targeting the active book.
    Add {
        term1: String,
        term2: String,
        definition: Option<String>,
    },
    /// `ADDD - book - t1 - t2 - [definition]`.
    AddTo {
        book: String,
        term1: String,
        term2: String,
        definition: Option<String>,
    },
    /// `QBOOKS`
    ListBooks,
    /// `Q book term`
    Query { book: String, term: String },
    /// `ADDBOOK book language1 language2 [description]`
    AddBook {
        name: String,
        language1: String,
        language2: String,
        description: Option<String>,
    },
    /// `LIST [book]`
    List { book: Option<String> },
    Help,
    Exit,
}

impl Command {
    /// Parse a non-blank line. Command words are case-sensitive.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "ADD" => {
                let args = dash_args(word, rest, 2, 3)?;
                let mut args = args.into_iter();
                Ok(Self::Add {
                    term1: next_arg(&mut args),
                    term2: next_arg(&mut args),
                    definition: args.next().filter(|d| !d.is_empty()),
                })
            }
            "ADDD" => {
                let args = dash_args(word, rest, 3, 4)?;
                let mut args = args.into_iter();
                Ok(Self::AddTo {
                    book: next_arg(&mut args),
                    term1: next_arg(&mut args),
                    term2: next_arg(&mut args),
                    definition: args.next().filter(|d| !d.is_empty()),
                })
            }
            "QBOOKS" => no_args(word, rest, Self::ListBooks),
            "Q" => {
                let (book, term) = rest
                    .split_once(char::is_whitespace)
                    .map(|(book, term)| (book, term.trim()))
                    .filter(|(_, term)| !term.is_empty())
                    .ok_or_else(|| usage(word, "Q bookName term"))?;
                Ok(Self::Query {
                    book: book.to_string(),
                    term: term.to_string(),
                })
            }
            "ADDBOOK" => {
                let shape = "ADDBOOK bookName language1 language2 [description]";
                let (name, rest) = next_field(rest).ok_or_else(|| usage(word, shape))?;
                let (language1, rest) = next_field(rest).ok_or_else(|| usage(word, shape))?;
                let (language2, rest) = next_field(rest).ok_or_else(|| usage(word, shape))?;
                let description = Some(strip_quotes(rest.trim()))
                    .filter(|d| !d.is_empty())
                    .map(str::to_string);
                Ok(Self::AddBook {
                    name: name.to_string(),
                    language1: language1.to_string(),
                    language2: language2.to_string(),
                    description,
                })
            }
            "LIST" => {
                if rest.split_whitespace().count() > 1 {
                    return Err(usage(word, "LIST [bookName]"));
                }
                Ok(Self::List {
                    book: (!rest.is_empty()).then(|| rest.to_string()),
                })
            }
            "HELP" => no_args(word, rest, Self::Help),
            "EXIT" => no_args(word, rest, Self::Exit),
            _ => Err(CommandError::Invalid(format!(
                "unknown command '{word}', type HELP for the command list"
            ))),
        }
    }
}

/// Split ` - a - b - c` into `["a", "b", "c"]`. The leading separator is
/// mandatory and a trailing empty argument is kept so `ADD - a - b -` still
/// counts as an explicit (empty) definition.
fn dash_args(
    word: &str,
    rest: &str,
    required: usize,
    max: usize,
) -> Result<Vec<String>, CommandError> {
    let shape = match word {
        "ADD" => "ADD - term1 - term2 - [definition]",
        _ => "ADDD - bookName - term1 - term2 - [definition]",
    };

    let mut pieces = rest.split('-').map(str::trim);
    if pieces.next() != Some("") {
        return Err(usage(word, shape));
    }
    let args: Vec<String> = pieces.map(str::to_string).collect();

    if args.len() < required || args.len() > max {
        return Err(usage(word, shape));
    }
    if args[..required].iter().any(String::is_empty) {
        return Err(usage(word, shape));
    }
    Ok(args)
}

/// Split off the first whitespace-delimited field, skipping any run of
/// whitespace before it.
fn next_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    Some(text.split_once(char::is_whitespace).unwrap_or((text, "")))
}

fn next_arg(args: &mut impl Iterator<Item = String>) -> String {
    args.next().unwrap_or_default()
}

fn no_args(word: &str, rest: &str, command: Command) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(usage(word, word))
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

fn usage(word: &str, shape: &str) -> CommandError {
    CommandError::Invalid(format!("malformed {word}, expected: {shape}"))
}
