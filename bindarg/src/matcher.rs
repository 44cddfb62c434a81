//! The matcher walks the command line once, left to right, and feeds every token to the option
//! or positional sink it belongs to.

use crate::binder::{Resolution, LONG_PREFIX, SHORT_PREFIX};
use crate::{ParseError, ValueKind};

/// Everything after this token is a positional argument.
pub const SEPARATOR: &str = LONG_PREFIX;

/// Match `args` against the descriptors of `resolution`, storing into the bound fields.
///
/// Each option may be matched once; after it is matched it no longer participates in lookups,
/// so supplying it a second time fails as an unknown option.  Errors are reported on the first
/// problem found.
pub fn match_args<S: AsRef<str>>(
    resolution: &mut Resolution<'_>,
    args: &[S],
) -> Result<(), ParseError> {
    // Indices of options not yet matched, in declaration order.
    let mut remaining: Vec<usize> = (0..resolution.options().len()).collect();
    let mut idx = 0;
    while idx < args.len() {
        let arg = args[idx].as_ref();
        if arg == SEPARATOR {
            tracing::trace!(count = args.len() - idx - 1, "separator; the rest are arguments");
            for arg in &args[idx + 1..] {
                push_argument(resolution, arg.as_ref())?;
            }
            break;
        } else if arg.starts_with(SHORT_PREFIX) {
            let Some(pos) = search(resolution, &remaining, arg) else {
                return Err(ParseError::UnknownOption {
                    token: arg.to_string(),
                });
            };
            let opt = remaining[pos];
            if resolution.options()[opt].info().kind() == ValueKind::Bool {
                tracing::trace!(option = arg, "switch");
                assign(resolution, opt, "true")?;
            } else {
                idx += 1;
                let Some(value) = args.get(idx) else {
                    return Err(no_value(resolution, opt));
                };
                let value = value.as_ref();
                let info = resolution.options()[opt].info();
                if value.starts_with(SHORT_PREFIX) && !info.kind().accepts_hyphen_value() {
                    return Err(no_value(resolution, opt));
                }
                if search(resolution, &remaining, value).is_some() {
                    return Err(no_value(resolution, opt));
                }
                tracing::trace!(option = arg, value, "valued option");
                assign(resolution, opt, value)?;
            }
            remaining.remove(pos);
        } else {
            push_argument(resolution, arg)?;
        }
        idx += 1;
    }
    for &opt in remaining.iter() {
        let info = resolution.options()[opt].info();
        if info.required() {
            return Err(ParseError::Required {
                option: info.to_string(),
            });
        }
    }
    if let Some(arguments) = resolution.arguments_mut() {
        if arguments.info().required() && !arguments.has_args() {
            return Err(ParseError::ArgumentsRequired);
        }
        arguments.allocate();
    }
    Ok(())
}

// Returns the position within `remaining` of the option named by `token`.
fn search(resolution: &Resolution<'_>, remaining: &[usize], token: &str) -> Option<usize> {
    remaining
        .iter()
        .position(|&opt| resolution.options()[opt].info().matches(token))
}

fn assign(resolution: &mut Resolution<'_>, opt: usize, value: &str) -> Result<(), ParseError> {
    let descriptor = &mut resolution.options_mut()[opt];
    descriptor
        .assign(value)
        .map_err(|source| ParseError::FailedToSet {
            option: descriptor.info().to_string(),
            source,
        })
}

fn push_argument(resolution: &mut Resolution<'_>, arg: &str) -> Result<(), ParseError> {
    match resolution.arguments_mut() {
        Some(arguments) => {
            tracing::trace!(argument = arg, "positional");
            arguments.push(arg);
            Ok(())
        }
        None => Err(ParseError::NoArgumentsSink {
            argument: arg.to_string(),
        }),
    }
}

fn no_value(resolution: &Resolution<'_>, opt: usize) -> ParseError {
    ParseError::NoValue {
        option: resolution.options()[opt].info().to_string(),
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
