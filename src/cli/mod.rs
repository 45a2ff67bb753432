//! Command-line surface.
//!
//! Flags are single-dash and matched case-insensitively by any prefix of
//! the flag name (`-e`, `-ERR`, `-out_prefix` all work), with `-err_prefix`
//! checked first. The first token that is not a flag names the child
//! program; every later non-flag token is passed through to it verbatim.

use thiserror::Error;

pub const ERR_PREFIX_FLAG: &str = "-err_prefix";
pub const OUT_PREFIX_FLAG: &str = "-out_prefix";

pub const DEFAULT_ERR_PREFIX: &str = "Error: ";

pub const USAGE: &str = "\
Usage: runtee [-err_prefix <prefix>] [-out_prefix <prefix>] <program> [<args>...]
  -err_prefix <prefix>  prefix added to every line of the child's stderr (default \"Error: \")
  -out_prefix <prefix>  prefix added to every line of the child's stdout (default empty)
Flag names match case-insensitively by prefix, e.g. -e or -OUT.
";

/// Errors in the argument list itself. The diagnostic goes to stderr, the
/// usage text to stdout, and the run exits with -1.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("{flag} requires <prefix> parameter")]
    MissingFlagValue { flag: &'static str },

    #[error("Program is not set")]
    NoProgramSpecified,
}

/// Everything a run needs, parsed from argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub err_prefix: String,
    pub out_prefix: String,
    pub program: String,
    pub args: Vec<String>,
}

/// Case-insensitive prefix match against the full flag name, dash included.
fn matches_flag(token: &str, flag: &str) -> bool {
    !token.is_empty()
        && token.len() <= flag.len()
        && flag[..token.len()].eq_ignore_ascii_case(token)
}

/// Parse the argument list (without the executable name itself).
pub fn parse<I>(args: I) -> Result<Options, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut err_prefix = DEFAULT_ERR_PREFIX.to_string();
    let mut out_prefix = String::new();
    let mut program = None;
    let mut child_args = Vec::new();

    let mut tokens = args.into_iter();
    while let Some(token) = tokens.next() {
        if matches_flag(&token, ERR_PREFIX_FLAG) {
            err_prefix = tokens.next().ok_or(UsageError::MissingFlagValue {
                flag: ERR_PREFIX_FLAG,
            })?;
        } else if matches_flag(&token, OUT_PREFIX_FLAG) {
            out_prefix = tokens.next().ok_or(UsageError::MissingFlagValue {
                flag: OUT_PREFIX_FLAG,
            })?;
        } else if program.is_none() {
            program = Some(token);
        } else {
            child_args.push(token);
        }
    }

    let program = program.ok_or(UsageError::NoProgramSpecified)?;
    Ok(Options {
        err_prefix,
        out_prefix,
        program,
        args: child_args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(tokens: &[&str]) -> Result<Options, UsageError> {
        parse(tokens.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_without_flags() {
        let options = parse_args(&["prog", "a", "b"]).unwrap();
        assert_eq!(options.err_prefix, "Error: ");
        assert_eq!(options.out_prefix, "");
        assert_eq!(options.program, "prog");
        assert_eq!(options.args, vec!["a", "b"]);
    }

    #[test]
    fn full_flag_names() {
        let options =
            parse_args(&["-err_prefix", "E!", "-out_prefix", "O!", "prog"]).unwrap();
        assert_eq!(options.err_prefix, "E!");
        assert_eq!(options.out_prefix, "O!");
        assert_eq!(options.program, "prog");
        assert!(options.args.is_empty());
    }

    #[test]
    fn abbreviated_and_case_insensitive_flags() {
        let options = parse_args(&["-E", "E!", "-Out_Pref", "O!", "prog"]).unwrap();
        assert_eq!(options.err_prefix, "E!");
        assert_eq!(options.out_prefix, "O!");
    }

    #[test]
    fn flags_after_program_are_still_flags() {
        let options = parse_args(&["prog", "-o", "O!", "arg"]).unwrap();
        assert_eq!(options.out_prefix, "O!");
        assert_eq!(options.program, "prog");
        assert_eq!(options.args, vec!["arg"]);
    }

    #[test]
    fn bare_dash_resolves_to_err_prefix() {
        let options = parse_args(&["-", "E!", "prog"]).unwrap();
        assert_eq!(options.err_prefix, "E!");
        assert_eq!(options.out_prefix, "");
    }

    #[test]
    fn unmatched_dash_token_is_positional() {
        let options = parse_args(&["-x", "arg"]).unwrap();
        assert_eq!(options.program, "-x");
        assert_eq!(options.args, vec!["arg"]);

        let options = parse_args(&["prog", "-n", "5"]).unwrap();
        assert_eq!(options.args, vec!["-n", "5"]);
    }

    #[test]
    fn missing_flag_value() {
        assert_eq!(
            parse_args(&["-err_prefix"]),
            Err(UsageError::MissingFlagValue {
                flag: ERR_PREFIX_FLAG
            })
        );
        assert_eq!(
            parse_args(&["prog", "-out_prefix"]),
            Err(UsageError::MissingFlagValue {
                flag: OUT_PREFIX_FLAG
            })
        );
    }

    #[test]
    fn program_is_required() {
        assert_eq!(parse_args(&[]), Err(UsageError::NoProgramSpecified));
        assert_eq!(
            parse_args(&["-out_prefix", "X"]),
            Err(UsageError::NoProgramSpecified)
        );
    }
}
