//! Command-line options.

use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: fieldscan [--list] [--once] [--config PATH]

  --list         List capture devices and exit
  --once         Stop after the first detection
  --config PATH  Read settings from PATH instead of searching for fieldscan.conf
  -h, --help     Show this help";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub list: bool,
    pub once: bool,
    pub config_path: Option<PathBuf>,
    pub help: bool,
}

impl Options {
    /// Parses arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--list" => options.list = true,
                "--once" => options.once = true,
                "-h" | "--help" => options.help = true,
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| "--config requires a path".to_string())?;
                    options.config_path = Some(PathBuf::from(path));
                }
                other => return Err(format!("Unknown argument '{}'", other)),
            }
        }

        Ok(options)
    }
}
