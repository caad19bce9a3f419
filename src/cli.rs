//! Command-line interface definitions.

use clap::Parser;

use crate::{
    error::{Error, Result},
    updater::Rotation,
};

/// AWS MFA session credential rotator.
///
/// Exchanges an MFA code for temporary credentials using the long-lived keys
/// of the source profile and stores them in the destination profile of the
/// shared credentials file. The expiration is recorded as `mfa_expiration`
/// under `[profile <source>]` in the shared config file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Source (long-lived) profile
    #[arg(short, long, default_value = "default")]
    pub source: String,

    /// MFA-enabled destination profile
    #[arg(short, long)]
    pub destination: Option<String>,

    /// MFA code; needs at least a few seconds of validity left
    #[arg(short, long)]
    pub code: Option<String>,

    /// Show time left on the source profile's token instead of rotating
    #[arg(short, long)]
    pub time_left: bool,

    /// Quiet mode
    #[arg(short, long)]
    pub quiet: bool,

    /// Session duration in seconds (900-129600) [default: service default]
    #[arg(long, env = "AWS_SESSION_DURATION", value_parser = clap::value_parser!(i32).range(900..=129600))]
    pub duration: Option<i32>,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Rotate(Rotation),
    TimeLeft { source: String },
}

impl Args {
    /// Validates flag combinations. Empty values count as missing.
    pub fn into_command(self) -> Result<Command> {
        let source = non_empty(self.source).ok_or_else(|| missing("-s <source profile>"))?;

        if self.time_left {
            return Ok(Command::TimeLeft { source });
        }

        let destination = self
            .destination
            .and_then(non_empty)
            .ok_or_else(|| missing("-d <destination profile>"))?;
        let code = self
            .code
            .and_then(non_empty)
            .ok_or_else(|| missing("-c <MFA code>"))?;

        Ok(Command::Rotate(Rotation {
            source,
            destination,
            code,
            duration: self.duration,
        }))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn missing(flag: &str) -> Error {
    Error::Configuration(format!("missing required flag {flag}; see --help"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        Args::try_parse_from(std::iter::once("aws-mfa-rotate").chain(args.iter().copied()))
            .expect("arguments parse")
            .into_command()
    }

    #[test]
    fn rotate_with_all_flags() {
        let command = parse(&["-s", "long-term", "-d", "mfa", "-c", "123456", "-q"]).unwrap();
        assert_eq!(
            command,
            Command::Rotate(Rotation {
                source: "long-term".to_string(),
                destination: "mfa".to_string(),
                code: "123456".to_string(),
                duration: None,
            })
        );
    }

    #[test]
    fn source_defaults_to_default() {
        match parse(&["-d", "mfa", "-c", "123456", "--duration", "3600"]).unwrap() {
            Command::Rotate(rotation) => {
                assert_eq!(rotation.source, "default");
                assert_eq!(rotation.duration, Some(3600));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn time_left_needs_no_destination() {
        assert_eq!(
            parse(&["-t", "-s", "work"]).unwrap(),
            Command::TimeLeft {
                source: "work".to_string()
            }
        );
    }

    #[test]
    fn missing_destination_or_code_is_a_configuration_error() {
        assert!(matches!(parse(&["-c", "123456"]), Err(Error::Configuration(_))));
        assert!(matches!(parse(&["-d", "mfa"]), Err(Error::Configuration(_))));
        assert!(matches!(parse(&["-d", "mfa", "-c", ""]), Err(Error::Configuration(_))));
        assert!(matches!(parse(&["-t", "-s", ""]), Err(Error::Configuration(_))));
    }

    #[test]
    fn duration_out_of_range_is_rejected() {
        let result = Args::try_parse_from(["aws-mfa-rotate", "-d", "mfa", "-c", "1", "--duration", "60"]);
        assert!(result.is_err());
    }
}
