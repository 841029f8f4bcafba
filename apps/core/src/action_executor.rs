use std::sync::Arc;

use tracing::{error, info};

use crate::model::CatalogEntry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("empty command")]
    EmptyCommand,
    #[error("failed to launch '{target}': {message}")]
    LaunchFailed { target: String, message: String },
}

/// How a resolved command gets started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchPlan {
    /// Executable followed by arguments, started without shell association.
    Direct { file: String, arguments: String },
    /// URI, applet, or bare command handed to the shell's open verb.
    Shell { target: String },
}

/// Process creation capability.
pub trait ProcessLauncher: Send + Sync {
    fn spawn_direct(&self, file: &str, arguments: &str) -> Result<(), LaunchError>;
    fn shell_open(&self, target: &str) -> Result<(), LaunchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn spawn_direct(&self, file: &str, arguments: &str) -> Result<(), LaunchError> {
        let mut command = std::process::Command::new(file);

        #[cfg(target_os = "windows")]
        {
            use std::os::windows::process::CommandExt;
            if !arguments.is_empty() {
                command.raw_arg(arguments);
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            command.args(arguments.split_whitespace());
        }

        spawn_detached(&mut command)
            .map(|_| ())
            .map_err(|e| LaunchError::LaunchFailed {
                target: file.to_string(),
                message: e.to_string(),
            })
    }

    #[cfg(target_os = "windows")]
    fn shell_open(&self, target: &str) -> Result<(), LaunchError> {
        use windows_sys::Win32::UI::Shell::ShellExecuteW;
        use windows_sys::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

        let verb = to_wide("open");
        let target_wide = to_wide(target);
        let result = unsafe {
            ShellExecuteW(
                std::ptr::null_mut(),
                verb.as_ptr(),
                target_wide.as_ptr(),
                std::ptr::null(),
                std::ptr::null(),
                SW_SHOWNORMAL,
            )
        } as isize;

        if result <= 32 {
            return Err(LaunchError::LaunchFailed {
                target: target.to_string(),
                message: format!("ShellExecuteW failed (code={result})"),
            });
        }
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    fn shell_open(&self, target: &str) -> Result<(), LaunchError> {
        let opener = if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        };
        let mut command = std::process::Command::new(opener);
        command.arg(target);
        spawn_detached(&mut command)
            .map(|_| ())
            .map_err(|e| LaunchError::LaunchFailed {
                target: target.to_string(),
                message: format!("{opener}: {e}"),
            })
    }
}

/// Starts `command` and hands the child to a thread that waits on it, so a
/// finished process never lingers as a zombie. Returns the child's pid.
pub fn spawn_detached(command: &mut std::process::Command) -> std::io::Result<u32> {
    let mut child = command.spawn()?;
    let pid = child.id();
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(pid)
}

pub struct ActionExecutor {
    launcher: Arc<dyn ProcessLauncher>,
}

impl ActionExecutor {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self { launcher }
    }

    pub fn execute(&self, entry: &CatalogEntry) -> Result<LaunchPlan, LaunchError> {
        let plan = split_command(&expand_system_environment(entry.command.trim()))?;
        match &plan {
            LaunchPlan::Direct { file, arguments } => self.launcher.spawn_direct(file, arguments)?,
            LaunchPlan::Shell { target } => self.launcher.shell_open(target)?,
        }
        Ok(plan)
    }

    /// Runs the entry's command. Failures are logged and reported as `false`
    /// so the caller's query loop is never interrupted.
    pub fn invoke(&self, entry: &CatalogEntry) -> bool {
        match self.execute(entry) {
            Ok(plan) => {
                info!(name = %entry.name, plan = ?plan, "launched entry");
                true
            }
            Err(e) => {
                error!(name = %entry.name, command = %entry.command, "can't open entry: {e}");
                false
            }
        }
    }
}

/// Expands `%VAR%` references through `lookup`, then splits the result.
pub fn plan_launch(
    command: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LaunchPlan, LaunchError> {
    split_command(&expand_environment_strings(command.trim(), lookup))
}

/// Splits an already expanded command on its first space. A command with a
/// space is an executable plus arguments; anything else goes through the
/// shell.
pub fn split_command(expanded: &str) -> Result<LaunchPlan, LaunchError> {
    let expanded = expanded.trim();
    if expanded.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }

    match expanded.split_once(' ') {
        Some((file, rest)) => Ok(LaunchPlan::Direct {
            file: file.to_string(),
            arguments: rest.trim_start().to_string(),
        }),
        None => Ok(LaunchPlan::Shell {
            target: expanded.to_string(),
        }),
    }
}

/// Expands `%VAR%` references against the live process environment.
#[cfg(target_os = "windows")]
pub fn expand_system_environment(input: &str) -> String {
    use windows_sys::Win32::System::Environment::ExpandEnvironmentStringsW;

    if !input.contains('%') {
        return input.to_string();
    }

    let input_wide = to_wide(input);
    let needed = unsafe { ExpandEnvironmentStringsW(input_wide.as_ptr(), std::ptr::null_mut(), 0) };
    if needed == 0 {
        return input.to_string();
    }

    let mut output = vec![0_u16; needed as usize];
    let written =
        unsafe { ExpandEnvironmentStringsW(input_wide.as_ptr(), output.as_mut_ptr(), needed) };
    if written == 0 {
        return input.to_string();
    }

    while output.last().copied() == Some(0) {
        output.pop();
    }
    String::from_utf16_lossy(&output)
}

/// Expands `%VAR%` references against the live process environment.
#[cfg(not(target_os = "windows"))]
pub fn expand_system_environment(input: &str) -> String {
    expand_environment_strings(input, |name| std::env::var(name).ok())
}

/// Unknown or empty variable names are left untouched, `%` included.
pub fn expand_environment_strings(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('%') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                out.push_str(name);
                rest = &after[end..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(target_os = "windows")]
fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}
