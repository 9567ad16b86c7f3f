use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fieldcheck_core::{ErrorList, FieldPath};
use fieldcheck_validation as validation;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use tracing::info;

mod doc;

#[derive(Parser, Debug)]
#[command(name = "fieldcheckctl", version, about = "Name syntax and append-only checks for Kubernetes-style objects")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check an object name (DNS-1123 subdomain)
    Name {
        name: String,
        /// Treat NAME as a generateName prefix (trailing '-' allowed)
        #[arg(long = "prefix", action = ArgAction::SetTrue)]
        prefix: bool,
    },
    /// Check a DNS-1123 label
    Label {
        value: String,
        #[arg(long = "path", default_value = "value")]
        path: String,
    },
    /// Check a DNS-1123 subdomain
    Subdomain {
        value: String,
        #[arg(long = "path", default_value = "value")]
        path: String,
    },
    /// Reject names containing "--"
    Hyphens {
        name: String,
        #[arg(long = "path", default_value = "metadata.name")]
        path: String,
    },
    /// Check that a secret reference in a document has name and namespace
    SecretRef {
        /// YAML or JSON document
        file: String,
        /// Dotted path of the reference, e.g. "spec.secretRef"
        #[arg(long = "field", default_value = "spec.secretRef")]
        field: String,
    },
    /// Read an int-or-percent value, optionally scaled against a total
    Percent {
        /// e.g. "25%" or "3"
        value: String,
        #[arg(long = "total")]
        total: Option<i32>,
        #[arg(long = "round-up", action = ArgAction::SetTrue)]
        round_up: bool,
    },
    /// Check that a list field only grew at the end between two documents
    AppendOnly {
        old: String,
        new: String,
        /// Dotted path of the list, e.g. "spec.dns.domains"
        #[arg(long = "field")]
        field: String,
    },
}

fn init_tracing() {
    let env = std::env::var("FIELDCHECK_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

/// Turn a dotted CLI path ("spec.secretRef") into a field path.
fn field_path(dotted: &str) -> FieldPath {
    let mut parts = dotted.split('.').filter(|s| !s.is_empty());
    let mut path = FieldPath::new(parts.next().unwrap_or(""));
    for p in parts { path = path.child(p); }
    path
}

fn report(output: Output, errs: &ErrorList) -> Result<ExitCode> {
    match output {
        Output::Human => {
            if errs.is_empty() { println!("ok"); } else { println!("{}", errs); }
        }
        Output::Json => println!("{}", serde_json::to_string_pretty(errs)?),
    }
    Ok(if errs.is_empty() { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

fn parse_int_or_string(raw: &str) -> IntOrString {
    match raw.parse::<i32>() {
        Ok(n) => IntOrString::Int(n),
        Err(_) => IntOrString::String(raw.to_string()),
    }
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Name { name, prefix } => {
            info!(name = %name, prefix, "name invoked");
            let msgs = validation::validate_name(&name, prefix);
            match cli.output {
                Output::Human => {
                    if msgs.is_empty() { println!("ok"); }
                    for m in &msgs { println!("{}", m); }
                }
                Output::Json => println!("{}", serde_json::to_string_pretty(&msgs)?),
            }
            Ok(if msgs.is_empty() { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        Commands::Label { value, path } => {
            info!(value = %value, "label invoked");
            report(cli.output, &validation::validate_dns1123_label(&value, &field_path(&path)))
        }
        Commands::Subdomain { value, path } => {
            info!(value = %value, "subdomain invoked");
            report(cli.output, &validation::validate_dns1123_subdomain(&value, &field_path(&path)))
        }
        Commands::Hyphens { name, path } => {
            info!(name = %name, "hyphens invoked");
            report(cli.output, &validation::validate_no_consecutive_hyphens(&name, &field_path(&path)))
        }
        Commands::SecretRef { file, field } => {
            info!(file = %file, field = %field, "secret-ref invoked");
            let json = doc::load(&file)?;
            let secret_ref = doc::secret_ref_at(&json, &field)?;
            report(cli.output, &validation::validate_secret_reference(&secret_ref, &field_path(&field)))
        }
        Commands::Percent { value, total, round_up } => {
            info!(value = %value, total = ?total, "percent invoked");
            let v = parse_int_or_string(&value);
            let percent = validation::percent_value(&v);
            let resolved = validation::int_or_percent_value(&v);
            let scaled = match total {
                Some(t) => Some(validation::scaled_value(&v, t, round_up)?),
                None => None,
            };
            match cli.output {
                Output::Human => {
                    match percent {
                        Some(p) => println!("percent: {}%", p),
                        None => println!("percent: no"),
                    }
                    println!("value: {}", resolved);
                    if let Some(s) = scaled { println!("scaled: {}", s); }
                }
                Output::Json => {
                    let out = serde_json::json!({ "percent": percent, "value": resolved, "scaled": scaled });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::AppendOnly { old, new, field } => {
            info!(old = %old, new = %new, field = %field, "append-only invoked");
            let old_list = doc::string_list_at(&doc::load(&old)?, &field)?;
            let new_list = doc::string_list_at(&doc::load(&new)?, &field)?;
            let enforce = validation::should_enforce_immutability(&new_list, &old_list);
            let errs = validation::validate_append_only(&new_list, &old_list, &field_path(&field));
            match cli.output {
                Output::Human => {
                    println!("enforce immutability: {}", enforce);
                    if !errs.is_empty() { println!("{}", errs); }
                }
                Output::Json => {
                    let out = serde_json::json!({ "enforce": enforce, "errors": errs });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
            }
            Ok(if errs.is_empty() { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
    }
}
