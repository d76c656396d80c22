//! Swift toolchain collaborators
//!
//! - `PackageResolver`: Swift Package Manager (`swift package ...`)
//! - `FrameworkBuilder`: xcodebuild archives combined into xcframeworks

mod package_manager;
mod resolver;
mod xcframework;

pub use package_manager::SwiftPackageManager;
pub use resolver::{
    unique_dependencies, DependencyDescriptor, PackageDependency, PackageInfo, PackageResolver,
};
pub use xcframework::{FrameworkBuilder, XcodeFrameworkBuilder};

use crate::error::{CartonError, CartonResult};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Max number of output lines to include in tool error messages.
const ERROR_TAIL_LINES: usize = 50;

/// Extract the useful tail of tool output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `ERROR_TAIL_LINES`
/// lines so error messages are actionable without being overwhelming.
pub(crate) fn error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail: Vec<&str> = if total > ERROR_TAIL_LINES {
        lines[total - ERROR_TAIL_LINES..].to_vec()
    } else {
        lines
    };
    tail.join("\n")
}

/// Run `program` with `args` and return its stdout.
///
/// The child is killed if the returned future is dropped.
pub(crate) async fn exec(program: &Path, args: &[String]) -> CartonResult<String> {
    let command = format!("{} {}", program.display(), args.join(" "));
    debug!("Executing: {}", command);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| CartonError::command_failed(command.clone(), e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    if output.status.success() {
        Ok(stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(CartonError::command_exec(command, error_output(&stdout, &stderr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_output_keeps_tail() {
        let stdout: String = (0..60).map(|i| format!("line {}\n", i)).collect();
        let output = error_output(&stdout, "error: boom");

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), ERROR_TAIL_LINES);
        assert_eq!(lines.last(), Some(&"error: boom"));
        assert_eq!(lines.first(), Some(&"line 11"));
    }

    #[test]
    fn error_output_short() {
        assert_eq!(error_output("a\n", "b\n"), "a\nb");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exec_reports_failure_output() {
        let err = exec(
            Path::new("sh"),
            &["-c".to_string(), "echo nope >&2; exit 3".to_string()],
        )
        .await
        .unwrap_err();

        match err {
            CartonError::CommandExecution { output, .. } => assert_eq!(output, "nope"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn exec_missing_binary() {
        let err = exec(Path::new("/nonexistent/carton-tool"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CartonError::CommandFailed { .. }));
    }
}
