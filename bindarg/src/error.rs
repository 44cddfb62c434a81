use std::fmt::{Display, Formatter};

use crate::ValueKind;

////////////////////////////////////////// ConversionError /////////////////////////////////////////

/// A string could not be converted to the kind an option holds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConversionError {
    kind: ValueKind,
    value: String,
    reason: String,
}

impl ConversionError {
    pub(crate) fn new(kind: ValueKind, value: &str, reason: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// The kind that was requested.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// The text that failed to convert.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot convert {:?} to {}: {}",
            self.value, self.kind, self.reason
        )
    }
}

impl std::error::Error for ConversionError {}

//////////////////////////////////////////// ConfigError ///////////////////////////////////////////

/// ConfigError reports a mistake in how a target type declares its options.  These are
/// programming errors and are detected before any argument is looked at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    /// An option was declared with an empty name.
    MissingName {
        /// The field the option binds.
        field: &'static str,
    },
    /// An option's name or alias collides with one declared earlier.
    Duplicate {
        /// The rendered long name of the later option, e.g. `--n`.
        name: String,
        /// The rendered alias of the later option, e.g. `-a`, or empty.
        alias: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingName { field } => {
                write!(f, "option name for field {} is required.", field)
            }
            ConfigError::Duplicate { name, alias } => {
                write!(f, "name [{}] or alias [{}] is duplicated.", name, alias)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

//////////////////////////////////////////// ParseError ////////////////////////////////////////////

/// ParseError reports bad input on the command line.  Options are identified by their display
/// form, e.g. `-i/--integer`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A token starting with '-' matched no remaining option.
    UnknownOption {
        /// The offending token.
        token: String,
    },
    /// A valued option was last on the line, or was followed by something that is not a value.
    NoValue {
        /// The option missing its value.
        option: String,
    },
    /// The value given for an option could not be converted.
    FailedToSet {
        /// The option being set.
        option: String,
        /// The underlying conversion failure.
        source: ConversionError,
    },
    /// A required option was never supplied.
    Required {
        /// The first required option left unmatched.
        option: String,
    },
    /// Positional arguments are required but none were supplied.
    ArgumentsRequired,
    /// A positional argument was supplied but the target declares nowhere to put it.
    NoArgumentsSink {
        /// The positional argument.
        argument: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnknownOption { token } => write!(f, "unknown option : {}", token),
            ParseError::NoValue { option } => {
                write!(f, "no value is found for option {}", option)
            }
            ParseError::FailedToSet { option, .. } => {
                write!(f, "failed to set argument. option : {}", option)
            }
            ParseError::Required { option } => write!(f, "option {} is required.", option),
            ParseError::ArgumentsRequired => write!(f, "arguments are required."),
            ParseError::NoArgumentsSink { argument } => {
                write!(f, "failed to set argument {}", argument)
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::FailedToSet { source, .. } => Some(source),
            _ => None,
        }
    }
}

/////////////////////////////////////////////// Error //////////////////////////////////////////////

/// The error returned by [crate::ArgumentProcessor::parse].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The target type is declared incorrectly.
    Config(ConfigError),
    /// The command line is invalid for the target type.
    Parse(ParseError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(err) => write!(f, "{}", err),
            Error::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => err.source(),
            Error::Parse(err) => err.source(),
        }
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            "option -i/--integer is required.",
            ParseError::Required {
                option: "-i/--integer".to_string()
            }
            .to_string()
        );
        assert_eq!(
            "unknown option : -g",
            ParseError::UnknownOption {
                token: "-g".to_string()
            }
            .to_string()
        );
        assert_eq!(
            "no value is found for option -s/--string",
            ParseError::NoValue {
                option: "-s/--string".to_string()
            }
            .to_string()
        );
        assert_eq!(
            "arguments are required.",
            ParseError::ArgumentsRequired.to_string()
        );
        assert_eq!(
            "option name for field a is required.",
            ConfigError::MissingName { field: "a" }.to_string()
        );
        assert_eq!(
            "name [--n] or alias [-ab] is duplicated.",
            ConfigError::Duplicate {
                name: "--n".to_string(),
                alias: "-ab".to_string()
            }
            .to_string()
        );
    }

    #[test]
    fn failed_to_set_carries_cause() {
        let cause = ConversionError::new(ValueKind::Int, "fuga", "invalid digit found in string");
        let err = Error::from(ParseError::FailedToSet {
            option: "-i/--integer".to_string(),
            source: cause.clone(),
        });
        assert_eq!("failed to set argument. option : -i/--integer", err.to_string());
        let source = err.source().unwrap();
        assert_eq!(Some(&cause), source.downcast_ref::<ConversionError>());
    }
}
