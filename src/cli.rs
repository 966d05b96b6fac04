//! Command-line interface implementation.

use crate::clipboard;
use crate::error::{PassError, Result};
use crate::generator::{self, parse_count_range, PasswordConfig};
use crate::models::Credential;
use crate::store::{CredentialStore, DEFAULT_DATA_FILE};
use crate::utils::{self, success, warning};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::{self, BufRead};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use zeroize::Zeroize;

/// Local password manager with a password generator.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the data file
    #[arg(
        short = 'f',
        long,
        global = true,
        env = "PASSKEEPER_FILE",
        default_value = DEFAULT_DATA_FILE
    )]
    pub file: PathBuf,

    /// Output format
    #[arg(
        short = 'o',
        long,
        global = true,
        value_enum,
        default_value = "text"
    )]
    pub output: OutputFormat,

    /// Email pre-filled in the interactive form
    #[arg(long, value_name = "EMAIL", default_value = "")]
    pub default_email: String,

    /// Seconds before a copied password is cleared from the clipboard (0 keeps it)
    #[arg(long, value_name = "SECS", default_value = "30")]
    pub clipboard_timeout: u64,

    /// Omit to start the interactive form
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Per-class counts and symbol alphabet for generated passwords.
#[derive(Args, Debug, Clone)]
pub struct GeneratorArgs {
    /// Number of letters, N or MIN-MAX
    #[arg(long, value_name = "RANGE", value_parser = parse_count_range, default_value = "8-10")]
    pub letters: RangeInclusive<usize>,

    /// Number of symbols, N or MIN-MAX
    #[arg(long, value_name = "RANGE", value_parser = parse_count_range, default_value = "2-4")]
    pub symbols: RangeInclusive<usize>,

    /// Number of digits, N or MIN-MAX
    #[arg(long, value_name = "RANGE", value_parser = parse_count_range, default_value = "2-4")]
    pub digits: RangeInclusive<usize>,

    /// Symbols to draw from instead of the default set
    #[arg(long, value_name = "CHARS")]
    pub symbol_chars: Option<String>,
}

impl GeneratorArgs {
    /// Build a validated generator config.
    pub fn to_config(&self) -> Result<PasswordConfig> {
        let mut config = PasswordConfig::default()
            .with_letter_count(self.letters.clone())?
            .with_symbol_count(self.symbols.clone())?
            .with_digit_count(self.digits.clone())?;

        if let Some(chars) = &self.symbol_chars {
            config = config.with_symbol_chars(chars)?;
        }

        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save or overwrite the credential for a website
    Add {
        /// Website name
        website: String,

        /// Email or username
        #[arg(short, long, default_value = "")]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(short, long, conflicts_with = "generate")]
        password: Option<String>,

        /// Generate the password
        #[arg(short, long)]
        generate: bool,

        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,

        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// Show the saved credential for a website
    Find {
        /// Website name
        website: String,

        /// Copy the password to the clipboard
        #[arg(short, long)]
        copy: bool,
    },

    /// Generate a password
    Generate {
        /// Copy to clipboard
        #[arg(short, long)]
        copy: bool,

        #[command(flatten)]
        generator: GeneratorArgs,
    },
}

impl Cli {
    /// Store for the configured data file.
    pub fn store(&self) -> CredentialStore {
        CredentialStore::new(&self.file)
    }

    /// Execute the subcommand. Does nothing when none was given.
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Some(Commands::Add {
                website,
                email,
                password,
                generate,
                copy,
                generator,
            }) => self.add(website, email, password.clone(), *generate, *copy, generator),
            Some(Commands::Find { website, copy }) => self.find(website, *copy),
            Some(Commands::Generate { copy, generator }) => self.generate(*copy, generator),
            None => Ok(()),
        }
    }

    fn add(
        &self,
        website: &str,
        email: &str,
        password: Option<String>,
        generate: bool,
        copy: bool,
        generator_args: &GeneratorArgs,
    ) -> Result<()> {
        let store = self.store();
        self.warn_permissions(&store);

        let mut password = match password {
            Some(password) => password,
            None if generate => generator::generate_password(&generator_args.to_config()?),
            None => read_password()?,
        };

        store.upsert(website, email, &password)?;

        if copy {
            clipboard::copy(&password)?;
        }

        match self.output {
            OutputFormat::Text => {
                success(&format!("Saved credential for {website}"));
                if copy {
                    success("Copied to clipboard");
                } else if generate {
                    println!("{}: {}", "Password".bold(), password);
                }
            }
            OutputFormat::Json => {
                let mut json = serde_json::json!({
                    "website": website,
                    "saved": true,
                });
                if generate && !copy {
                    json["password"] = serde_json::Value::String(password.clone());
                }
                print_json(&json)?;
            }
        }

        password.zeroize();
        Ok(())
    }

    fn find(&self, website: &str, copy: bool) -> Result<()> {
        let store = self.store();
        self.warn_permissions(&store);

        let found = store.find(website)?;

        if let (Some(credential), true) = (&found, copy) {
            clipboard::copy(&credential.password)?;
        }

        match self.output {
            OutputFormat::Text => match found {
                Some(mut credential) => {
                    println!("{}", format!("Search result for {website}").bold());
                    println!("{}: {}", "Email".bold(), credential.email);
                    if copy {
                        println!("{}: {}", "Password".bold(), credential.masked_password());
                        success("Copied to clipboard");
                    } else {
                        println!("{}: {}", "Password".bold(), credential.password);
                    }
                    credential.password.zeroize();
                }
                None if !store.exists() => {
                    utils::info(&format!("No data file found at {}", store.path().display()));
                }
                None => utils::info(&utils::not_found_message(website)),
            },
            OutputFormat::Json => {
                let json = match found {
                    Some(credential) => found_json(&credential, copy),
                    None => serde_json::json!({
                        "found": false,
                        "website": website,
                        "credential": null,
                    }),
                };
                print_json(&json)?;
            }
        }

        Ok(())
    }

    fn generate(&self, copy: bool, generator_args: &GeneratorArgs) -> Result<()> {
        let mut password = generator::generate_password(&generator_args.to_config()?);

        if copy {
            clipboard::copy(&password)?;
        }

        match self.output {
            OutputFormat::Text if copy => success("Copied to clipboard"),
            OutputFormat::Text => println!("{password}"),
            OutputFormat::Json => {
                let json = if copy {
                    serde_json::json!({ "copied": true })
                } else {
                    serde_json::json!({ "password": password })
                };
                print_json(&json)?;
            }
        }

        password.zeroize();
        Ok(())
    }

    fn warn_permissions(&self, store: &CredentialStore) {
        if self.output == OutputFormat::Text {
            for warn in utils::check_file_permissions(store.path()) {
                warning(&warn);
            }
        }
    }
}

fn found_json(credential: &Credential, copied: bool) -> serde_json::Value {
    let password = if copied {
        serde_json::Value::Null
    } else {
        serde_json::Value::String(credential.password.clone())
    };

    serde_json::json!({
        "found": true,
        "website": credential.website,
        "credential": {
            "email": credential.email,
            "password": password,
        },
    })
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let out = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{out}");
    Ok(())
}

/// Prompt for a password, or read one line from stdin when it is not a terminal.
fn read_password() -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        use dialoguer::Password;

        return Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| PassError::Other(e.to_string()));
    }

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(PassError::Cancelled);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
