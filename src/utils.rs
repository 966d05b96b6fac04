//! Terminal output helpers and file checks.

use colored::*;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Check file permissions and return warnings.
pub fn check_file_permissions(path: &Path) -> Vec<String> {
    let mut warnings = Vec::new();

    #[cfg(unix)]
    {
        if let Ok(metadata) = std::fs::metadata(path) {
            let mode = metadata.permissions().mode();

            // Group or others can read the passwords.
            if mode & 0o077 != 0 {
                tracing::warn!(path = %path.display(), mode = mode & 0o777, "insecure permissions");
                warnings.push(format!(
                    "File has insecure permissions: {:o}. Run 'chmod 600 {}' to fix.",
                    mode & 0o777,
                    path.display()
                ));
            }
        }
    }

    #[cfg(not(unix))]
    let _ = path;

    warnings
}

/// Print an error message and exit.
pub fn error_exit(message: &str, code: i32) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(code);
}

/// Print a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message.
pub fn warning(message: &str) {
    println!("{} {}", "Warning:".yellow(), message);
}

/// Print an informational message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".cyan(), message);
}

/// Text shown when a website has no saved details.
pub fn not_found_message(website: &str) -> String {
    format!("No details for {website} exist")
}
