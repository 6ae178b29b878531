use std::path::PathBuf;

pub(super) const USAGE: &str = "\
Usage: wondersprouts [options]

Reads a story aloud, logging each highlighted word.

Options:
  --story <dir>      story bundle directory (default: built-in sample story)
  --rate <r>         narration rate, 0.1 to 1.0
  --settings <file>  JSON file for saved rate and bookmark
  --autoplay         start narrating as soon as the story opens
  --fast             run on a simulated clock without sleeping
  -h, --help         show this message";

#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct CliOptions {
    pub(super) story_dir: Option<PathBuf>,
    pub(super) rate: Option<f32>,
    pub(super) settings_path: Option<PathBuf>,
    pub(super) autoplay: bool,
    pub(super) fast: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) enum CliAction {
    Run(CliOptions),
    Help,
}

pub(super) fn parse_args<I>(args: I) -> Result<CliAction, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "--story" => {
                let dir = args.next().ok_or("--story needs a directory")?;
                options.story_dir = Some(PathBuf::from(dir));
            }
            "--rate" => {
                let value = args.next().ok_or("--rate needs a value")?;
                let rate = value
                    .parse::<f32>()
                    .map_err(|_| format!("invalid rate: {value}"))?;
                options.rate = Some(rate);
            }
            "--settings" => {
                let path = args.next().ok_or("--settings needs a file")?;
                options.settings_path = Some(PathBuf::from(path));
            }
            "--autoplay" => options.autoplay = true,
            "--fast" => options.fast = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(CliAction::Run(options))
}
