//! Command-line definitions.

use clap::{Args, Parser, Subcommand};
use postflow_core::models::{PaymentGateway, Platform};

/// Routes the commands stand in for. They decide whether a 401 ends the session.
pub const AUTH_ROUTE: &str = "/auth";
pub const DASHBOARD_ROUTE: &str = "/dashboard";
pub const ADMIN_DASHBOARD_ROUTE: &str = "/admin/dashboard";
pub const PRICING_ROUTE: &str = "/";

#[derive(Debug, Parser)]
#[command(name = "postflow", version, about = "Automate social media content from the terminal")]
pub struct Cli {
    /// API base URL (overrides the config file)
    #[arg(long, env = "POSTFLOW_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
    },
    /// Verify an account with the emailed one-time code
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Send a new one-time code
    ResendOtp {
        #[arg(long)]
        email: String,
    },
    /// Sign in (prompts for the password)
    Login {
        /// Defaults to the last email used
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the locally stored session
    Whoami,
    /// View or edit your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Connected social accounts
    #[command(subcommand)]
    Accounts(AccountsCommand),
    /// Content topics
    #[command(subcommand)]
    Topics(TopicsCommand),
    /// Posting schedules
    #[command(subcommand)]
    Schedules(SchedulesCommand),
    /// Generate a post with AI
    Generate(GenerateArgs),
    /// Pricing plans and subscription
    #[command(subcommand)]
    Plans(PlansCommand),
    /// Scheduled posts
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Activity overview
    Dashboard {
        /// Show the open admin dashboard
        #[arg(long)]
        admin: bool,
    },
}

impl Command {
    /// The client-side route this command represents.
    pub fn route(&self) -> &'static str {
        match self {
            Command::Register { .. }
            | Command::Verify { .. }
            | Command::ResendOtp { .. }
            | Command::Login { .. } => AUTH_ROUTE,
            Command::Plans(PlansCommand::List) => PRICING_ROUTE,
            Command::Dashboard { admin: true } => ADMIN_DASHBOARD_ROUTE,
            _ => DASHBOARD_ROUTE,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    List,
    /// Print the URL that starts the provider's OAuth flow
    Connect { platform: Platform },
    Disconnect { platform: Platform },
}

#[derive(Debug, Subcommand)]
pub enum TopicsCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Comma separated
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    List,
    Add {
        #[arg(long)]
        platform: Platform,
        /// Time of day, HH:MM (repeatable)
        #[arg(long = "time", required = true)]
        times: Vec<String>,
        /// Weekday (repeatable); every day when omitted
        #[arg(long = "day")]
        days: Vec<String>,
        #[arg(long)]
        timezone: Option<String>,
        /// Create the schedule paused
        #[arg(long)]
        paused: bool,
    },
    Remove { id: String },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long)]
    pub topic: String,
    #[arg(long)]
    pub platform: Platform,
    #[arg(long)]
    pub tone: Option<String>,
    /// Queue the generated post at this RFC 3339 time
    #[arg(long)]
    pub queue_at: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum PlansCommand {
    List,
    /// Print the checkout URL for a plan
    Subscribe {
        plan_id: String,
        #[arg(long, default_value = "stripe")]
        gateway: PaymentGateway,
    },
    /// Show the current subscription
    Status,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    List,
    Add {
        #[arg(long)]
        platform: Platform,
        #[arg(long)]
        content: String,
        /// RFC 3339 time, e.g. 2024-06-01T09:00:00Z
        #[arg(long)]
        at: String,
    },
    Cancel { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("postflow").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_routes() {
        assert_eq!(parse(&["login"]).command.route(), AUTH_ROUTE);
        assert_eq!(parse(&["plans", "list"]).command.route(), PRICING_ROUTE);
        assert_eq!(parse(&["plans", "status"]).command.route(), DASHBOARD_ROUTE);
        assert_eq!(parse(&["dashboard", "--admin"]).command.route(), ADMIN_DASHBOARD_ROUTE);
        assert_eq!(parse(&["dashboard"]).command.route(), DASHBOARD_ROUTE);
        assert_eq!(parse(&["topics", "list"]).command.route(), DASHBOARD_ROUTE);
    }

    #[test]
    fn test_parse_schedule_add() {
        let cli = parse(&[
            "schedules", "add", "--platform", "linkedin", "--time", "09:00", "--time", "17:00",
            "--day", "monday",
        ]);
        match cli.command {
            Command::Schedules(SchedulesCommand::Add { platform, times, days, paused, .. }) => {
                assert_eq!(platform, Platform::Linkedin);
                assert_eq!(times, vec!["09:00", "17:00"]);
                assert_eq!(days, vec!["monday"]);
                assert!(!paused);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_subscribe_gateway() {
        let cli = parse(&["plans", "subscribe", "pro", "--gateway", "paystack"]);
        match cli.command {
            Command::Plans(PlansCommand::Subscribe { plan_id, gateway }) => {
                assert_eq!(plan_id, "pro");
                assert_eq!(gateway, PaymentGateway::Paystack);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_platform() {
        let result = Cli::try_parse_from(["postflow", "accounts", "connect", "myspace"]);
        assert!(result.is_err());
    }
}
