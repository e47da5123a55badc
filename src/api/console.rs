//! Line-based operator console input

use thiserror::Error;

/// One parsed console line
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    /// Move the simulated receiver to a new fix
    Gps {
        latitude: f64,
        longitude: f64,
        altitude: f64,
        hdop: Option<f64>,
    },
    /// Drop the simulated receiver's fix
    NoFix,
    Help,
    Quit,
    /// Named command with its (possibly empty) argument string
    Command { name: String, argument: String },
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConsoleError {
    #[error("usage: gps <latitude> <longitude> <altitude> [hdop]")]
    GpsUsage,
    #[error("invalid number \"{0}\"")]
    InvalidNumber(String),
}

fn parse_number(token: &str) -> Result<f64, ConsoleError> {
    token
        .parse::<f64>()
        .map_err(|_| ConsoleError::InvalidNumber(token.to_string()))
}

impl ConsoleInput {
    pub fn parse(line: &str) -> Result<Self, ConsoleError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "" => Ok(ConsoleInput::Empty),
            "help" => Ok(ConsoleInput::Help),
            "quit" | "exit" => Ok(ConsoleInput::Quit),
            "nofix" => Ok(ConsoleInput::NoFix),
            "gps" => {
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                if !(3..=4).contains(&tokens.len()) {
                    return Err(ConsoleError::GpsUsage);
                }
                Ok(ConsoleInput::Gps {
                    latitude: parse_number(tokens[0])?,
                    longitude: parse_number(tokens[1])?,
                    altitude: parse_number(tokens[2])?,
                    hdop: tokens.get(3).map(|token| parse_number(token)).transpose()?,
                })
            }
            name => Ok(ConsoleInput::Command {
                name: name.to_string(),
                argument: rest.to_string(),
            }),
        }
    }
}
