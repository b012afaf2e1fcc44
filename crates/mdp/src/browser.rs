//! Opening the preview page in the user's browser.

use std::process::Command;

/// Program and leading arguments used to open a URL on this platform.
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/c", "start"])
    } else {
        ("xdg-open", &[])
    }
}

/// Launch the platform opener for `url` without waiting for it.
pub(crate) fn open(url: &str) -> std::io::Result<()> {
    let (program, args) = opener();
    Command::new(program).args(args).arg(url).spawn()?;
    tracing::debug!(program, url, "Browser launched");
    Ok(())
}
