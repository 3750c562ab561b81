//! Command-line parsing

use std::path::PathBuf;

use gears_core::GoldenMode;

use crate::error::CliError;

pub const USAGE: &str = "\
Usage: glesgears [COMMAND] [OPTIONS]

Commands:
  info                      Print gear mesh statistics (default)
  export <OUT.stl>          Write the posed scene as binary STL
  run                       Run the frame loop headless
  check <CAPTURE_DIR>       Replay captured frames through the golden-image harness
  write-config <FILE>       Write the default scene configuration

Options:
  --config <FILE>           Load the scene from a RON file
  --json                    (info) print a JSON report
  --frame <N>               (export) advance the animation N frames first
  --frames <N>              (run) number of frames, default 600
  -golden | --golden        (check) store captured frames as golden images
  -test | --test            (check) compare captured frames with golden images
  -h | --help               Show this message";

/// Default frame count of `run`
const DEFAULT_RUN_FRAMES: u64 = 600;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Info { json: bool },
    Export { output: PathBuf, frame: u64 },
    Run { frames: u64 },
    Check { capture_dir: PathBuf, mode: GoldenMode },
    WriteConfig { output: PathBuf },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Parse arguments (without the program name)
pub fn parse_args<I>(args: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = None;
    let mut json = false;
    let mut frame = None;
    let mut frames = None;
    let mut mode = GoldenMode::Off;
    let mut help = false;
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => help = true,
            "--json" => json = true,
            "-golden" | "--golden" => mode = GoldenMode::Generate,
            "-test" | "--test" => mode = GoldenMode::Test,
            "--config" => config = Some(PathBuf::from(value(&mut args, "--config")?)),
            "--frame" => frame = Some(number(&mut args, "--frame")?),
            "--frames" => frames = Some(number(&mut args, "--frames")?),
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option '{other}'")));
            }
            _ => positional.push(arg),
        }
    }

    if help {
        return Ok(Args {
            config,
            command: Command::Help,
        });
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None | Some("info") => Command::Info { json },
        Some("export") => Command::Export {
            output: required_path(positional.next(), "export needs an output file")?,
            frame: frame.unwrap_or(0),
        },
        Some("run") => Command::Run {
            frames: frames.unwrap_or(DEFAULT_RUN_FRAMES),
        },
        Some("check") => {
            let capture_dir = required_path(positional.next(), "check needs a capture directory")?;
            if mode == GoldenMode::Off {
                return Err(CliError::Usage("check needs -golden or -test".into()));
            }
            Command::Check { capture_dir, mode }
        }
        Some("write-config") => Command::WriteConfig {
            output: required_path(positional.next(), "write-config needs an output file")?,
        },
        Some(other) => return Err(CliError::Usage(format!("unknown command '{other}'"))),
    };

    if let Some(extra) = positional.next() {
        return Err(CliError::Usage(format!("unexpected argument '{extra}'")));
    }

    Ok(Args { config, command })
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))
}

fn number(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<u64, CliError> {
    let text = value(args, flag)?;
    text.parse()
        .map_err(|_| CliError::Usage(format!("{flag} expects a number, got '{text}'")))
}

fn required_path(arg: Option<String>, message: &str) -> Result<PathBuf, CliError> {
    arg.map(PathBuf::from)
        .ok_or_else(|| CliError::Usage(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, CliError> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_arguments_is_info() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Info { json: false });
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_info_json_with_config() {
        let args = parse(&["info", "--json", "--config", "scene.ron"]).unwrap();
        assert_eq!(args.command, Command::Info { json: true });
        assert_eq!(args.config, Some(PathBuf::from("scene.ron")));
    }

    #[test]
    fn test_export() {
        let args = parse(&["export", "out.stl", "--frame", "90"]).unwrap();
        assert_eq!(
            args.command,
            Command::Export {
                output: PathBuf::from("out.stl"),
                frame: 90
            }
        );
        assert!(parse(&["export"]).is_err());
    }

    #[test]
    fn test_run_default_frames() {
        let args = parse(&["run"]).unwrap();
        assert_eq!(args.command, Command::Run { frames: 600 });
        assert!(parse(&["run", "--frames", "many"]).is_err());
    }

    #[test]
    fn test_check_modes() {
        let args = parse(&["check", "captures", "-test"]).unwrap();
        assert_eq!(
            args.command,
            Command::Check {
                capture_dir: PathBuf::from("captures"),
                mode: GoldenMode::Test
            }
        );
        let args = parse(&["-golden", "check", "captures"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Check {
                mode: GoldenMode::Generate,
                ..
            }
        ));
        assert!(parse(&["check", "captures"]).is_err());
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["export", "-h"]).unwrap().command, Command::Help);
    }

    #[test]
    fn test_unknown_input_is_rejected() {
        assert!(matches!(parse(&["--fast"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["spin"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["info", "extra"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["--config"]), Err(CliError::Usage(_))));
    }
}
