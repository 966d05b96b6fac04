//! Interactive form mode.

use crate::clipboard::SessionClipboard;
use crate::error::{PassError, Result};
use crate::session::{SearchOutcome, Session};
use crate::utils::{self, success, warning};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Interactive shell over a [`Session`].
pub struct InteractiveForm {
    session: Session,
    editor: DefaultEditor,
    clipboard: SessionClipboard,
    clipboard_timeout: u64,
}

/// Split a line into its command word and the rest.
fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    }
}

/// Lines that set the password are kept out of history.
fn records_history(line: &str) -> bool {
    !matches!(split_command(line).0, "password" | "p")
}

impl InteractiveForm {
    /// Create a new interactive session.
    pub fn new(session: Session, clipboard_timeout: u64) -> Result<Self> {
        for warn in utils::check_file_permissions(session.store().path()) {
            warning(&warn);
        }

        let editor = DefaultEditor::new()
            .map_err(|_| PassError::Other("Failed to create editor".to_string()))?;

        Ok(Self {
            session,
            editor,
            clipboard: SessionClipboard::system(),
            clipboard_timeout,
        })
    }

    /// Run the interactive loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = format!("{} ", "passkeeper>".cyan());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if records_history(line) {
                        let _ = self.editor.add_history_entry(line);
                    }

                    match self.execute_command(line) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("{} {}", "Error:".red(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("\nUse 'exit' to quit");
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.session.form.clear();
        match self.clipboard.finish() {
            Ok(true) => success("Clipboard cleared"),
            Ok(false) => {}
            Err(e) => warning(&e.to_string()),
        }
        Ok(())
    }

    /// Execute one command. Returns true when the shell should exit.
    fn execute_command(&mut self, input: &str) -> Result<bool> {
        let (command, arg) = split_command(input);

        match command {
            "help" | "?" => self.show_help(),
            "exit" | "quit" | "q" => return Ok(true),
            "website" | "w" => self.session.form.website = arg.to_string(),
            "email" | "e" => self.session.form.email = arg.to_string(),
            "password" | "p" => self.session.form.password = arg.to_string(),
            "generate" | "gen" => self.generate()?,
            "search" | "s" => {
                if !arg.is_empty() {
                    self.session.form.website = arg.to_string();
                }
                self.search()?;
            }
            "add" | "save" => self.save()?,
            "show" => self.show_form(),
            "clear" => {
                self.session.form.clear();
                success("Form cleared");
            }
            _ => {
                eprintln!("Unknown command: {command}. Type 'help' for available commands.");
            }
        }

        Ok(false)
    }

    fn generate(&mut self) -> Result<()> {
        let timeout = self.clipboard_timeout;
        let password = self.session.generate().to_string();
        println!("{}: {}", "Password".bold(), password);

        match self.clipboard.copy(&password, timeout) {
            Ok(()) if timeout > 0 => success(&format!(
                "Copied to clipboard (will clear in {timeout} seconds)"
            )),
            Ok(()) => success("Copied to clipboard"),
            Err(e) => warning(&e.to_string()),
        }
        Ok(())
    }

    fn search(&self) -> Result<()> {
        if self.session.form.website.is_empty() {
            warning("Enter a website first: website <name>");
            return Ok(());
        }

        match self.session.search()? {
            SearchOutcome::Found(credential) => {
                println!(
                    "{}",
                    format!("Search result for {}", credential.website).bold()
                );
                println!("{}: {}", "Email".bold(), credential.email);
                println!("{}: {}", "Password".bold(), credential.password);
            }
            SearchOutcome::NoDataFile => utils::info("No data file found"),
            SearchOutcome::NotFound(website) => utils::info(&utils::not_found_message(&website)),
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        match self.session.save() {
            Ok(credential) => {
                success(&format!("Saved credential for {}", credential.website));
                Ok(())
            }
            Err(e) if e.is_validation() => {
                warning("Please don't leave the website or password fields empty!");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn show_form(&self) {
        let form = &self.session.form;
        let masked = "*".repeat(form.password.chars().count());
        println!("{:>10}: {}", "Website".bold(), form.website);
        println!("{:>10}: {}", "Email".bold(), form.email);
        println!("{:>10}: {}", "Password".bold(), masked);
        println!("{:>10}: {}", "File".bold(), self.session.store().path().display());
    }

    fn print_welcome(&self) {
        println!("{}", "passkeeper interactive mode".bold());
        println!("Data file: {}", self.session.store().path().display());
        println!("Type 'help' for available commands.\n");
    }

    fn show_help(&self) {
        println!("{}", "Commands:".bold());
        println!("  website, w <name>    Set the website field");
        println!("  email, e <address>   Set the email/username field");
        println!("  password, p <pw>     Set the password field");
        println!("  generate, gen        Generate a password and copy it");
        println!("  search, s [name]     Look up the website");
        println!("  add, save            Save the form");
        println!("  show                 Show the form");
        println!("  clear                Clear all fields");
        println!("  help, ?              Show this help");
        println!("  exit, quit           Leave");
    }
}
