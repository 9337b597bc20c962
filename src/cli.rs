use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: rendercube --show <render_cube_txt> OR rendercube --compare <render_cube1_txt> <render_cube2_txt>";

/// What the process was asked to do, decided from argument count and the
/// literal mode flag alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show(PathBuf),
    Compare(PathBuf, PathBuf),
    Usage,
}

impl Command {
    /// Parse a full argument vector, program name included.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let flag = args.get(1).and_then(|a| a.to_str());
        match (args.len(), flag) {
            (3, Some("--show")) => Command::Show(PathBuf::from(&args[2])),
            (4, Some("--compare")) => {
                Command::Compare(PathBuf::from(&args[2]), PathBuf::from(&args[3]))
            }
            _ => Command::Usage,
        }
    }
}
