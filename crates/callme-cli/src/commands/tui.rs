use anyhow::{anyhow, Result};
use callme_config::SurfacePreference;
use clap::Args;
use std::env;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Args)]
pub struct TuiArgs {
    /// auto, native or fallback
    #[arg(long)]
    pub surface: Option<SurfacePreference>,
    /// Write TUI debug logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

pub fn launch(config_path: Option<PathBuf>, args: TuiArgs, verbose: bool) -> Result<()> {
    let mut command = build_command(config_path, args);
    if verbose {
        eprintln!("launching {:?}", command);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = command.exec();
        Err(exec_error(err))
    }

    #[cfg(not(unix))]
    {
        use anyhow::Context as _;
        let status = command.status().with_context(|| "launch callme-tui")?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

fn build_command(config_path: Option<PathBuf>, args: TuiArgs) -> Command {
    let mut command = Command::new(find_tui_binary());
    if let Some(path) = config_path {
        command.arg("--config").arg(path);
    }
    if let Some(surface) = args.surface {
        command.arg("--surface").arg(surface.to_string());
    }
    if let Some(path) = args.log_file {
        command.arg("--log-file").arg(path);
    }
    command
}

fn find_tui_binary() -> PathBuf {
    let name = format!("callme-tui{}", env::consts::EXE_SUFFIX);
    if let Ok(current) = env::current_exe() {
        if let Some(dir) = current.parent() {
            let candidate = dir.join(&name);
            if candidate.is_file() {
                return candidate;
            }
        }
    }
    PathBuf::from(name)
}

fn exec_error(err: std::io::Error) -> anyhow::Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        return anyhow!(
            "callme-tui binary not found; build it with `cargo build -p callme-tui` or install the package"
        );
    }
    anyhow!("launch callme-tui failed: {}", err)
}
