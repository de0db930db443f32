use crate::config::DEFAULT_PROTECTED_LABEL;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitswitch")]
#[command(author, version, about = "Save Git identities and switch the global one")]
pub struct Cli {
    /// Profile file (defaults to ~/.config/gitswitch/profiles.toml)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Quit right after switching instead of returning to the home screen
    #[arg(long)]
    pub exit_on_switch: bool,

    /// Alias of the profile that cannot be deleted
    #[arg(long, value_name = "LABEL", default_value = DEFAULT_PROTECTED_LABEL)]
    pub protected_label: String,
}
