#![doc = include_str!("../README.md")]

use std::io::Write;

mod binder;
mod error;
pub mod matcher;
pub mod usage;
mod value;

pub use binder::{
    ArgumentsDescriptor, ArgumentsInfo, ArgumentsSink, ArgumentsSpec, Bind, Binder,
    OptionDescriptor, OptionInfo, OptionSpec, Resolution, LONG_PREFIX, SHORT_PREFIX,
};
pub use error::{ConfigError, ConversionError, Error, ParseError};
pub use value::{OptionValue, Value, ValueKind};

///////////////////////////////////////// ArgumentProcessor ////////////////////////////////////////

/// ArgumentProcessor parses command lines into [Bind] targets and renders usage for the last
/// target it saw.
///
/// Declarations are resolved afresh on every call; nothing about one target carries into the
/// next parse except the option table used for usage.  A processor is not meant to be shared
/// between threads while parsing.
#[derive(Clone, Debug, Default)]
pub struct ArgumentProcessor {
    options: Vec<OptionInfo>,
    arguments: Option<ArgumentsInfo>,
}

impl ArgumentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `args` into `target`, returning the same target populated.
    ///
    /// Configuration errors are reported before any argument is considered.  On a parse error
    /// the target may be partially populated.
    pub fn parse<'t, T: Bind + ?Sized, S: AsRef<str>>(
        &mut self,
        target: &'t mut T,
        args: &[S],
    ) -> Result<&'t mut T, Error> {
        {
            let mut resolution = self.resolve(target)?;
            if let Err(err) = matcher::match_args(&mut resolution, args) {
                tracing::debug!(error = %err, "command line rejected");
                return Err(err.into());
            }
        }
        Ok(target)
    }

    /// Resolve `target` so its usage can be rendered without parsing anything.
    pub fn describe<T: Bind + ?Sized>(&mut self, target: &mut T) -> Result<(), ConfigError> {
        self.resolve(target).map(|_| ())
    }

    /// The options of the last resolved target, in declaration order.
    pub fn options(&self) -> &[OptionInfo] {
        &self.options
    }

    /// The positional sink of the last resolved target.
    pub fn arguments(&self) -> Option<&ArgumentsInfo> {
        self.arguments.as_ref()
    }

    /// See [usage::one_line].
    pub fn one_line_usage(&self) -> String {
        usage::one_line(&self.options)
    }

    /// See [usage::multi_line].
    pub fn usage(&self) -> String {
        usage::multi_line(&self.options)
    }

    pub fn write_one_line_usage(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}", self.one_line_usage())
    }

    pub fn write_usage(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}", self.usage())
    }

    fn resolve<'a, T: Bind + ?Sized>(
        &mut self,
        target: &'a mut T,
    ) -> Result<Resolution<'a>, ConfigError> {
        let resolution = Resolution::of(target)?;
        self.options = resolution.option_infos();
        self.arguments = resolution.arguments().map(|a| a.info().clone());
        Ok(resolution)
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
