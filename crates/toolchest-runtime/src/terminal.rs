//! Terminal-window opening.
//!
//! Used for the "open a shell in the tool's directory" action, and as the
//! Windows route for shell scripts (see [`crate::launch`]).

use std::path::Path;

use crate::launch::LaunchSpec;
use crate::platform::Platform;

/// Build a spec that opens an OS terminal window in `dir`.
///
/// On Windows this is `cmd /c start "<title>" /D "<dir>" cmd` — the outer
/// cmd exits immediately and the started window stays open. On POSIX the
/// Debian `x-terminal-emulator` alternative is used with the working
/// directory set; desktops without it will fail the spawn, which callers
/// report through the log sink.
#[must_use]
pub fn open_terminal_spec(title: &str, dir: &Path, platform: Platform) -> LaunchSpec {
    match platform {
        Platform::Windows => LaunchSpec {
            program: "cmd".to_owned(),
            args: vec![
                "/c".to_owned(),
                format!("start \"{title}\" /D \"{}\" cmd", dir.display()),
            ],
            cwd: None,
        },
        Platform::Posix => LaunchSpec {
            program: "x-terminal-emulator".to_owned(),
            args: Vec::new(),
            cwd: Some(dir.to_path_buf()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_spec_quotes_title_and_directory() {
        let spec = open_terminal_spec("sqlmap", Path::new("C:\\tools\\sqlmap"), Platform::Windows);
        assert_eq!(spec.program, "cmd");
        assert_eq!(spec.args[0], "/c");
        assert_eq!(spec.args[1], "start \"sqlmap\" /D \"C:\\tools\\sqlmap\" cmd");
        assert!(spec.cwd.is_none());
    }

    #[test]
    fn posix_spec_sets_the_working_directory() {
        let spec = open_terminal_spec("sqlmap", Path::new("/opt/sqlmap"), Platform::Posix);
        assert_eq!(spec.program, "x-terminal-emulator");
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/opt/sqlmap")));
    }
}
