mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use itemform::ConstraintGroup;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "itemform")]
#[command(version, about = "itemform - validate item form submissions", long_about = None)]
struct Cli {
    /// Configuration file (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "itemform.toml")]
    config: PathBuf,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind and validate a submission, printing every violation
    Validate {
        /// Operation the submission is for
        #[arg(short, long, default_value = "create")]
        group: GroupArg,

        /// Read fields from a JSON object file instead of arguments
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the error bag as JSON
        #[arg(long)]
        json: bool,

        /// Also run the hand-written item validator
        #[arg(long)]
        with_validator: bool,

        /// Submitted fields as name=value
        fields: Vec<String>,
    },

    /// Print the message codes generated for a violation code
    Codes {
        /// Violation code, e.g. required
        code: String,

        /// Object name, e.g. item
        object: String,

        /// Field name; omit for object-level codes
        field: Option<String>,

        /// Declared type of the field
        #[arg(default_value = "String")]
        type_name: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum GroupArg {
    /// Adding a new item
    Create,
    /// Editing an existing item
    Update,
}

impl From<GroupArg> for ConstraintGroup {
    fn from(arg: GroupArg) -> Self {
        match arg {
            GroupArg::Create => ConstraintGroup::Create,
            GroupArg::Update => ConstraintGroup::Update,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = itemform::Config::load(&cli.config)?;

    match cli.command {
        Commands::Validate {
            group,
            input,
            json,
            with_validator,
            fields,
        } => {
            let options = commands::validate::Options {
                group: group.into(),
                input,
                json,
                with_validator,
            };
            let valid = commands::validate::execute(&config, &options, &fields)?;
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Codes {
            code,
            object,
            field,
            type_name,
        } => {
            commands::codes::execute(&config, &code, &object, field.as_deref(), &type_name);
            Ok(ExitCode::SUCCESS)
        }
    }
}
