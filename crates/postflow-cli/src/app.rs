//! Command handlers.
//!
//! `App` owns the configured API client. Every command first moves the
//! in-process router to the route it represents, so the client's
//! session-expiry policy sees the same routes the web views would.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use postflow_core::models::{
    EntityId, GenerateRequest, ProfileUpdate, RegisterRequest, ScheduleInput, ScheduledPostInput,
    TopicInput,
};
use postflow_core::utils::{format_datetime, format_price, single_line, truncate_string};
use postflow_core::{ApiClient, AuthState, Config, MemoryLocation};
use tracing::info;

use crate::cli::{
    AccountsCommand, Command, GenerateArgs, PlansCommand, PostsCommand, ProfileCommand,
    SchedulesCommand, TopicsCommand, DASHBOARD_ROUTE,
};

/// Width of the content column in post listings
const CONTENT_PREVIEW_LEN: usize = 60;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub struct App {
    config: Config,
    api: ApiClient,
    location: Arc<MemoryLocation>,
}

impl App {
    pub fn new(config: Config, base_url: String) -> Result<Self> {
        let store = config.session_store()?;
        let location = Arc::new(MemoryLocation::new(DASHBOARD_ROUTE));
        let notified = AtomicBool::new(false);
        let navigator = move |route: &str| {
            // A terminal has no login page to show; tell the user how to get there
            if !notified.swap(true, Ordering::SeqCst) {
                info!(route = route, "Session expired");
                eprintln!("Your session has expired. Run `postflow login` to sign in again.");
            }
        };

        let mut builder = ApiClient::builder(base_url)
            .store(store)
            .location(location.clone())
            .navigator(Arc::new(navigator));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let api = builder.build().context("Failed to create API client")?;

        Ok(Self {
            config,
            api,
            location,
        })
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        self.location.set_path(command.route());
        info!(route = command.route(), "Running command");

        match command {
            Command::Register { name, email, company } => self.register(name, email, company).await,
            Command::Verify { email, otp } => self.verify(&email, &otp).await,
            Command::ResendOtp { email } => {
                let ack = self.api.resend_otp(&email).await?;
                println!("{}", ack.message.as_deref().unwrap_or("A new code is on its way."));
                Ok(())
            }
            Command::Login { email } => self.login(email).await,
            Command::Logout => {
                self.api.logout()?;
                println!("Signed out.");
                Ok(())
            }
            Command::Whoami => self.whoami(),
            Command::Profile(cmd) => self.profile(cmd).await,
            Command::Accounts(cmd) => self.accounts(cmd).await,
            Command::Topics(cmd) => self.topics(cmd).await,
            Command::Schedules(cmd) => self.schedules(cmd).await,
            Command::Generate(args) => self.generate(args).await,
            Command::Plans(cmd) => self.plans(cmd).await,
            Command::Posts(cmd) => self.posts(cmd).await,
            Command::Dashboard { admin } => self.dashboard(admin).await,
        }
    }

    // ===== Auth =====

    async fn register(&mut self, name: String, email: String, company: Option<String>) -> Result<()> {
        let password = rpassword::prompt_password("Choose a password: ")?;
        let confirm = rpassword::prompt_password("Confirm password: ")?;
        if password != confirm {
            bail!("Passwords do not match");
        }

        let request = RegisterRequest {
            name,
            email: email.clone(),
            password,
            company,
        };
        let auth = self.api.register(&request).await?;

        if self.api.session().begin(&auth)? {
            self.remember_email(email)?;
            println!("Account created. You are signed in.");
        } else {
            println!(
                "{}",
                auth.message
                    .as_deref()
                    .unwrap_or("Account created. Check your email for a verification code.")
            );
            println!("Then run: postflow verify --email {} --otp <code>", email);
        }
        Ok(())
    }

    async fn verify(&mut self, email: &str, otp: &str) -> Result<()> {
        let auth = self.api.verify_otp(email, otp).await?;
        if !self.api.session().begin(&auth)? {
            bail!("Verification succeeded but no session was issued; run `postflow login`");
        }
        self.remember_email(email.to_string())?;
        println!("Email verified. You are signed in.");
        Ok(())
    }

    async fn login(&mut self, email: Option<String>) -> Result<()> {
        let Some(email) = email.or_else(|| self.config.last_email.clone()) else {
            bail!("No email given; pass --email");
        };
        let password = rpassword::prompt_password(format!("Password for {}: ", email))?;

        let auth = self.api.login(&email, &password).await?;
        if !self.api.session().begin(&auth)? {
            bail!("Login response did not include a session token");
        }

        let greeting = auth
            .user
            .as_ref()
            .map(|u| u.display_name().to_string())
            .unwrap_or_else(|| email.clone());
        self.remember_email(email)?;
        println!("Signed in as {}.", greeting);
        Ok(())
    }

    fn remember_email(&mut self, email: String) -> Result<()> {
        if self.config.last_email.as_deref() != Some(email.as_str()) {
            self.config.last_email = Some(email);
            self.config.save()?;
        }
        Ok(())
    }

    fn whoami(&self) -> Result<()> {
        let session = self.api.session();
        match session.state()? {
            AuthState::Anonymous => println!("Not signed in."),
            AuthState::Authenticated => match session.user()? {
                Some(user) => {
                    println!("Signed in as {}", user.display_name());
                    if let Some(ref email) = user.email {
                        println!("  email: {}", email);
                    }
                    if let Some(ref plan) = user.plan {
                        println!("  plan:  {}", plan);
                    }
                }
                None => println!("Signed in (no cached profile; run `postflow profile show`)."),
            },
        }
        println!("API: {}", self.api.base_url());
        Ok(())
    }

    async fn profile(&self, cmd: ProfileCommand) -> Result<()> {
        let user = match cmd {
            ProfileCommand::Show => self.api.get_profile().await?,
            ProfileCommand::Update { name, company, timezone } => {
                let update = ProfileUpdate { name, company, timezone };
                if update.is_empty() {
                    bail!("Nothing to update; pass --name, --company or --timezone");
                }
                let user = self.api.update_profile(&update).await?;
                println!("Profile updated.");
                user
            }
        };
        self.api.session().update_user(&user)?;

        println!("Name:     {}", user.name.as_deref().unwrap_or("-"));
        println!("Email:    {}", user.email.as_deref().unwrap_or("-"));
        println!("Company:  {}", user.company.as_deref().unwrap_or("-"));
        println!("Timezone: {}", user.timezone.as_deref().unwrap_or("-"));
        if user.is_admin() {
            println!("Role:     admin");
        }
        Ok(())
    }

    // ===== Social accounts =====

    async fn accounts(&self, cmd: AccountsCommand) -> Result<()> {
        match cmd {
            AccountsCommand::List => {
                let accounts = self.api.get_social_accounts().await?;
                if accounts.is_empty() {
                    println!("No social accounts connected.");
                }
                for account in accounts {
                    println!(
                        "{:<10} {:<14} {}",
                        account.platform.label(),
                        account.status_display(),
                        account.account_name.as_deref().unwrap_or("")
                    );
                }
            }
            AccountsCommand::Connect { platform } => {
                let connect = self.api.connect_social(platform).await?;
                println!("Open this URL to connect {}:", platform);
                println!("{}", connect.auth_url);
            }
            AccountsCommand::Disconnect { platform } => {
                let ack = self.api.disconnect_social(platform).await?;
                println!(
                    "{}",
                    ack.message
                        .unwrap_or_else(|| format!("{} disconnected.", platform))
                );
            }
        }
        Ok(())
    }

    // ===== Topics =====

    async fn topics(&self, cmd: TopicsCommand) -> Result<()> {
        match cmd {
            TopicsCommand::List => {
                let topics = self.api.get_topics().await?;
                if topics.is_empty() {
                    println!("No topics yet. Add one with `postflow topics add <name>`.");
                }
                for topic in topics {
                    println!(
                        "{:<12} {:<24} {}",
                        display_id(&topic.id),
                        topic.name,
                        topic.description.as_deref().unwrap_or("")
                    );
                }
            }
            TopicsCommand::Add { name, description, keywords } => {
                let input = TopicInput {
                    name,
                    description,
                    keywords: keywords
                        .into_iter()
                        .map(|k| k.trim().to_string())
                        .filter(|k| !k.is_empty())
                        .collect(),
                };
                let topic = self.api.create_topic(&input).await?;
                println!("Added topic {} ({}).", topic.name, display_id(&topic.id));
            }
            TopicsCommand::Remove { id } => {
                let ack = self.api.delete_topic(&EntityId::from(id.as_str())).await?;
                println!("{}", ack.message.as_deref().unwrap_or("Topic removed."));
            }
        }
        Ok(())
    }

    // ===== Schedules =====

    async fn schedules(&self, cmd: SchedulesCommand) -> Result<()> {
        match cmd {
            SchedulesCommand::List => {
                let schedules = self.api.get_schedules().await?;
                if schedules.is_empty() {
                    println!("No posting schedules.");
                }
                for s in schedules {
                    println!(
                        "{:<12} {:<10} {:<8} {:<20} {}",
                        display_id(&s.id),
                        s.platform.label(),
                        if s.is_active { "active" } else { "paused" },
                        s.times_display(),
                        s.days_display()
                    );
                }
            }
            SchedulesCommand::Add { platform, times, days, timezone, paused } => {
                let input = ScheduleInput {
                    platform,
                    times: validate_times(&times)?,
                    days: validate_days(&days)?,
                    timezone,
                    is_active: !paused,
                };
                let schedule = self.api.create_schedule(&input).await?;
                println!(
                    "Scheduled {} posts at {} ({}).",
                    schedule.platform,
                    schedule.times_display(),
                    schedule.days_display()
                );
            }
            SchedulesCommand::Remove { id } => {
                let ack = self.api.delete_schedule(&EntityId::from(id.as_str())).await?;
                println!("{}", ack.message.as_deref().unwrap_or("Schedule removed."));
            }
        }
        Ok(())
    }

    // ===== Content =====

    async fn generate(&self, args: GenerateArgs) -> Result<()> {
        let queue_at = args.queue_at.as_deref().map(parse_time).transpose()?;

        let request = GenerateRequest {
            topic: args.topic,
            platform: args.platform,
            tone: args.tone,
        };
        let generated = self.api.generate_content(&request).await?;
        let text = generated.full_text();
        println!("{}", text);

        if let Some(at) = queue_at {
            let post = self
                .api
                .create_scheduled_post(&ScheduledPostInput {
                    platform: args.platform,
                    content: text,
                    scheduled_at: at,
                })
                .await?;
            println!();
            println!("Queued as post {} for {}.", display_id(&post.id), format_datetime(&at));
        }
        Ok(())
    }

    // ===== Plans =====

    async fn plans(&self, cmd: PlansCommand) -> Result<()> {
        match cmd {
            PlansCommand::List => {
                let plans = self.api.get_plans().await?;
                for plan in plans {
                    let interval = plan.interval.as_deref().unwrap_or("month");
                    println!(
                        "{:<12} {:<14} {}/{}",
                        plan.id,
                        plan.name,
                        format_price(plan.price, &plan.currency),
                        interval
                    );
                    for feature in &plan.features {
                        println!("{:<12}   - {}", "", feature);
                    }
                }
            }
            PlansCommand::Subscribe { plan_id, gateway } => {
                let resp = self
                    .api
                    .subscribe(&EntityId::from(plan_id.as_str()), gateway)
                    .await?;
                println!("Complete your {} checkout here:", gateway);
                println!("{}", resp.checkout_url);
            }
            PlansCommand::Status => match self.api.get_subscription().await? {
                Some(sub) => {
                    let name = sub.plan.as_ref().map(|p| p.name.as_str()).unwrap_or("unknown plan");
                    println!("{} ({})", name, sub.status.as_deref().unwrap_or("unknown"));
                    if let Some(ref end) = sub.current_period_end {
                        let label = if sub.is_active() { "Renews" } else { "Ends" };
                        println!("{}: {}", label, format_datetime(end));
                    }
                }
                None => println!("Free tier. See `postflow plans list`."),
            },
        }
        Ok(())
    }

    // ===== Scheduled posts =====

    async fn posts(&self, cmd: PostsCommand) -> Result<()> {
        match cmd {
            PostsCommand::List => {
                let posts = self.api.get_scheduled_posts().await?;
                if posts.is_empty() {
                    println!("No scheduled posts.");
                }
                for post in posts {
                    println!(
                        "{:<12} {:<10} {:<10} {:<20} {}",
                        display_id(&post.id),
                        post.platform.label(),
                        post.status.as_str(),
                        post.scheduled_at
                            .as_ref()
                            .map(format_datetime)
                            .unwrap_or_else(|| "-".to_string()),
                        truncate_string(&single_line(&post.content), CONTENT_PREVIEW_LEN)
                    );
                }
            }
            PostsCommand::Add { platform, content, at } => {
                let input = ScheduledPostInput {
                    platform,
                    content,
                    scheduled_at: parse_time(&at)?,
                };
                let post = self.api.create_scheduled_post(&input).await?;
                println!("Queued post {}.", display_id(&post.id));
            }
            PostsCommand::Cancel { id } => {
                let ack = self
                    .api
                    .delete_scheduled_post(&EntityId::from(id.as_str()))
                    .await?;
                println!("{}", ack.message.as_deref().unwrap_or("Post cancelled."));
            }
        }
        Ok(())
    }

    // ===== Dashboard =====

    async fn dashboard(&self, admin: bool) -> Result<()> {
        if admin {
            let overview = self.api.dashboard_overview().await?;
            if let Some(users) = overview.total_users {
                println!("Users:              {}", users);
            }
            print_overview(&overview);
            return Ok(());
        }

        let (overview, posts, accounts) = futures::join!(
            self.api.dashboard_overview(),
            self.api.get_scheduled_posts(),
            self.api.get_social_accounts(),
        );
        let (overview, posts, accounts) = (overview?, posts?, accounts?);

        let connected: Vec<String> = accounts
            .iter()
            .filter(|a| a.is_connected)
            .map(|a| a.platform.label().to_string())
            .collect();
        println!(
            "Connected:          {}",
            if connected.is_empty() { "none".to_string() } else { connected.join(", ") }
        );
        print_overview(&overview);

        let upcoming: Vec<_> = posts
            .iter()
            .filter(|p| p.scheduled_at.map(|at| at > Utc::now()).unwrap_or(false))
            .take(5)
            .collect();
        if !upcoming.is_empty() {
            println!();
            println!("Upcoming:");
            for post in upcoming {
                println!(
                    "  {} {:<10} {}",
                    post.scheduled_at
                        .as_ref()
                        .map(format_datetime)
                        .unwrap_or_default(),
                    post.platform.label(),
                    truncate_string(&single_line(&post.content), CONTENT_PREVIEW_LEN)
                );
            }
        }
        Ok(())
    }
}

fn print_overview(overview: &postflow_core::models::DashboardOverview) {
    println!("Posts:              {}", overview.total_posts);
    println!("  published:        {}", overview.published_posts);
    println!("  scheduled:        {}", overview.scheduled_posts);
    println!("  failed:           {}", overview.failed_posts);
    if let Some(rate) = overview.success_rate() {
        println!("Success rate:       {}%", rate);
    }
    println!("Active schedules:   {}", overview.active_schedules);
}

fn display_id(id: &Option<EntityId>) -> String {
    id.as_ref().map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid time '{}'; expected RFC 3339, e.g. 2024-06-01T09:00:00Z", value))
}

/// Normalize `H:MM` / `HH:MM` times to `HH:MM`.
fn validate_times(times: &[String]) -> Result<Vec<String>> {
    times
        .iter()
        .map(|t| {
            NaiveTime::parse_from_str(t.trim(), "%H:%M")
                .map(|time| time.format("%H:%M").to_string())
                .with_context(|| format!("Invalid time '{}'; expected HH:MM", t))
        })
        .collect()
}

fn validate_days(days: &[String]) -> Result<Vec<String>> {
    days.iter()
        .map(|d| {
            let day = d.trim().to_ascii_lowercase();
            WEEKDAYS
                .iter()
                .find(|w| **w == day || (day.len() >= 3 && w.starts_with(day.as_str())))
                .map(|w| w.to_string())
                .with_context(|| format!("Invalid day '{}'", d))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_times() {
        let times = vec!["9:00".to_string(), "17:30".to_string()];
        assert_eq!(validate_times(&times).unwrap(), vec!["09:00", "17:30"]);
        assert!(validate_times(&["25:00".to_string()]).is_err());
        assert!(validate_times(&["noon".to_string()]).is_err());
    }

    #[test]
    fn test_validate_days() {
        let days = vec!["Mon".to_string(), "friday".to_string()];
        assert_eq!(validate_days(&days).unwrap(), vec!["monday", "friday"]);
        assert!(validate_days(&["mo".to_string()]).is_err());
        assert!(validate_days(&["funday".to_string()]).is_err());
    }

    #[test]
    fn test_parse_time() {
        let at = parse_time("2024-06-01T09:00:00+01:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-06-01T08:00:00+00:00");
        assert!(parse_time("tomorrow").is_err());
    }

    #[test]
    fn test_display_id() {
        assert_eq!(display_id(&None), "-");
        assert_eq!(display_id(&Some(EntityId::Num(4))), "4");
    }
}
