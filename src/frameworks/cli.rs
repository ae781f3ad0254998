use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "email-toner")]
#[command(about = "Draft and rewrite emails in the right tone", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides the config file).
    #[arg(long, global = true, env = "EMAIL_TONER_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether a session token is stored.
    Status,
    Login(LoginArgs),
    /// Create an account; asks for the emailed OTP interactively.
    Signup(SignupArgs),
    /// Reset a forgotten password through an emailed OTP.
    ForgotPassword(ForgotPasswordArgs),
    Logout,
    /// List the designations, occasions and tones the backend offers.
    Catalog,
    Generate(GenerateArgs),
    Rewrite(RewriteArgs),
    History(HistoryArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    /// Read from stdin when omitted.
    #[arg(long, env = "EMAIL_TONER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, env = "EMAIL_TONER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct ForgotPasswordArgs {
    #[arg(long)]
    pub email: String,
}

#[derive(Args, Debug, Default)]
pub struct ResultArgs {
    /// Copy the email to the clipboard.
    #[arg(long)]
    pub copy: bool,
    /// Save the email to history.
    #[arg(long)]
    pub save: bool,
    /// Print escaped HTML instead of plain text.
    #[arg(long)]
    pub html: bool,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// A listed designation, or any custom recipient.
    #[arg(long)]
    pub recipient: String,
    /// A listed occasion, or any custom occasion.
    #[arg(long)]
    pub occasion: String,
    /// Suggested by the backend when omitted.
    #[arg(long)]
    pub tone: Option<String>,
    /// Target length, 50 to 400 words.
    #[arg(long)]
    pub words: Option<String>,
    #[command(flatten)]
    pub result: ResultArgs,
}

#[derive(Args, Debug)]
pub struct RewriteArgs {
    #[arg(long)]
    pub tone: String,
    #[arg(long)]
    pub words: Option<String>,
    /// File with the original email; stdin when omitted.
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub result: ResultArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Tone filter: "all", a listed tone, or "Other".
    #[arg(long, default_value = "all")]
    pub tone: String,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Show rewritten emails instead of generated ones.
    #[arg(long)]
    pub regenerated: bool,
    /// Print the email with this id.
    #[arg(long)]
    pub show: Option<String>,
    /// Copy the email with this id.
    #[arg(long)]
    pub copy: Option<String>,
}
