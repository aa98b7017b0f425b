use std::env;
use std::process::Command;
use tracing::debug;

/// Platform launcher that hands a URL to the default browser
fn browser_command(url: &str) -> Result<Command, std::io::Error> {
    let os = env::consts::OS;
    let command = match os {
        "macos" => {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        }
        "windows" => {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", url]);
            cmd
        }
        "linux" => {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
        _ => {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("Unsupported OS: {}", os),
            ));
        }
    };
    Ok(command)
}

/// Opens the served map in the default browser
pub fn open_browser(url: &str) -> Result<(), std::io::Error> {
    let mut command = browser_command(url)?;
    debug!(program = ?command.get_program(), url, "launching browser");
    command.spawn()?;
    Ok(())
}
