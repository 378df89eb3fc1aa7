use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use towork_core::auth::RegisterKind;
use towork_core::mission::{BudgetType, ExperienceLevel, WorkMode};

mod commands;

#[derive(Parser)]
#[command(name = "towork")]
#[command(about = "ToWork CLI - freelance marketplace client", long_about = None)]
struct Cli {
    /// Log filter, e.g. `towork=debug`. Falls back to RUST_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
        /// Keep the session across restarts (`--remember=false` for this
        /// session only); defaults to the configured choice
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        remember: Option<bool>,
    },
    /// Clear the stored session
    Logout,
    /// Show the logged-in account
    Whoami,
    /// Create an account
    Register {
        #[arg(value_enum)]
        kind: AccountKind,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Show the menu, or where a URL leads for the current session
    Nav { url: Option<String> },
    /// Read or change the client configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Missions, as client or freelancer
    Missions {
        #[command(subcommand)]
        action: MissionAction,
    },
    /// Candidatures received on the client's missions
    Candidatures {
        #[command(subcommand)]
        action: CandidatureAction,
    },
    /// Milestones of one mission
    Milestones {
        mission: i64,
        #[command(subcommand)]
        action: MilestoneAction,
    },
    /// Client wallet
    Wallet {
        #[command(subcommand)]
        action: WalletAction,
    },
    /// Freelancer earnings
    Portfolio,
    /// Mission conversations
    Conversations {
        #[command(subcommand)]
        action: ConversationAction,
    },
    /// Domains and competences
    Domaines {
        #[command(subcommand)]
        action: DomaineAction,
    },
    /// AI assistants
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
    /// Show the profile of the logged-in account
    Profile,
    /// Feedback on a completed mission
    Feedback {
        mission: i64,
        #[command(subcommand)]
        action: FeedbackAction,
    },
    /// Administration
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Point the client at another backend
    SetUrl { url: String },
}

#[derive(Subcommand)]
enum MissionAction {
    /// Missions posted by the client
    Mine,
    /// Freelancer board, grouped by stage
    Board {
        /// Refetch missions and candidatures
        #[arg(long)]
        refresh: bool,
    },
    /// Apply to a mission, or answer in its thread
    Apply {
        id: i64,
        #[arg(long)]
        message: String,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        resume_url: Option<String>,
    },
    /// Publish a mission
    Create(CreateMission),
    /// Change the status of a mission
    Status { id: i64, status: String },
    /// Mark a mission completed
    Close { id: i64 },
    /// Hand the final delivery to the client
    Submit { id: i64 },
    Delete { id: i64 },
}

#[derive(clap::Args)]
struct CreateMission {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// Domain id; suggested by the AI when omitted
    #[arg(long)]
    domaine: Option<i64>,
    #[arg(long)]
    budget: f64,
    #[arg(long, value_enum, default_value = "fixed")]
    budget_type: BudgetKind,
    #[arg(long)]
    days: u32,
    #[arg(long, value_enum, default_value = "intermediate")]
    experience: Experience,
    #[arg(long, value_enum, default_value = "remote")]
    work_mode: Mode,
    /// Comma or newline separated skills
    #[arg(long)]
    skills: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    deadline: Option<String>,
    /// Let the AI complete the form before publishing
    #[arg(long)]
    draft: bool,
}

#[derive(Subcommand)]
enum CandidatureAction {
    /// Candidatures and suggested freelancers of a mission
    List { mission: i64 },
    Accept {
        mission: i64,
        id: i64,
        #[arg(long)]
        message: Option<String>,
    },
    Reject {
        mission: i64,
        id: i64,
        #[arg(long)]
        message: Option<String>,
    },
}

#[derive(Subcommand)]
enum MilestoneAction {
    List,
    Create {
        title: String,
        amount: f64,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    Deliver {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    Upload {
        id: i64,
        file: PathBuf,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Reopen a delivered milestone
    Revert { id: i64 },
    Accept {
        id: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    Reject {
        id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Pay a validated milestone from the wallet
    Pay {
        id: i64,
        #[arg(long)]
        freelancer: i64,
    },
}

#[derive(Subcommand)]
enum WalletAction {
    /// Balance and ledger
    Show,
    Recharge { amount: f64 },
}

#[derive(Subcommand)]
enum ConversationAction {
    List,
    Show {
        id: i64,
        /// Ask the AI for a summary of the thread
        #[arg(long)]
        summary: bool,
    },
    /// Print new messages as they arrive
    Watch { id: i64 },
    Send { id: i64, message: String },
}

#[derive(Subcommand)]
enum DomaineAction {
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Domains offered in the mission form
    Active,
    Search { keyword: String },
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Activate or deactivate a domain
    Toggle { id: i64 },
    Delete { id: i64 },
    /// Certify a competence
    Certify { competence: i64, certification: String },
}

#[derive(Subcommand)]
enum AiAction {
    /// Draft a mission from a title and a short description
    Draft {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Extract skills from a resume
    Resume { file: PathBuf },
}

#[derive(Subcommand)]
enum FeedbackAction {
    Show,
    Give {
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        comment: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Directory statistics and latest accounts
    Users,
    /// Delete a client or freelancer account
    DeleteUser { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum AccountKind {
    Client,
    Freelancer,
}

impl From<AccountKind> for RegisterKind {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Client => RegisterKind::Client,
            AccountKind::Freelancer => RegisterKind::Freelancer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BudgetKind {
    Fixed,
    Hourly,
    Negotiable,
}

impl From<BudgetKind> for BudgetType {
    fn from(kind: BudgetKind) -> Self {
        match kind {
            BudgetKind::Fixed => BudgetType::Fixed,
            BudgetKind::Hourly => BudgetType::Hourly,
            BudgetKind::Negotiable => BudgetType::Negotiable,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Experience {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl From<Experience> for ExperienceLevel {
    fn from(level: Experience) -> Self {
        match level {
            Experience::Beginner => ExperienceLevel::Beginner,
            Experience::Intermediate => ExperienceLevel::Intermediate,
            Experience::Advanced => ExperienceLevel::Advanced,
            Experience::Expert => ExperienceLevel::Expert,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Remote,
    OnSite,
    Hybrid,
}

impl From<Mode> for WorkMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Remote => WorkMode::Remote,
            Mode::OnSite => WorkMode::OnSite,
            Mode::Hybrid => WorkMode::Hybrid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = commands::logging::init(cli.log.as_deref())?;

    // Config commands must work even when the stored config is broken.
    let command = match cli.command {
        Commands::Config { action } => {
            return match action {
                ConfigAction::Show => commands::config::show(),
                ConfigAction::SetUrl { url } => commands::config::set_url(&url),
            };
        }
        other => other,
    };

    let context = commands::utils::load_context()?;

    match command {
        Commands::Login {
            email,
            password,
            remember,
        } => commands::auth::login(&context, &email, &password, remember).await?,
        Commands::Logout => commands::auth::logout(&context)?,
        Commands::Whoami => commands::auth::whoami(&context),
        Commands::Register {
            kind,
            email,
            password,
            first_name,
            last_name,
            phone,
            city,
        } => {
            let form = commands::auth::RegisterForm {
                email,
                password,
                first_name,
                last_name,
                phone,
                city,
            };
            commands::auth::register(&context, kind.into(), form).await?
        }
        Commands::Nav { url } => commands::auth::nav(&context, url.as_deref()),
        Commands::Config { .. } => {}
        Commands::Missions { action } => match action {
            MissionAction::Mine => commands::missions::mine(&context).await?,
            MissionAction::Board { refresh } => commands::missions::board(&context, refresh).await?,
            MissionAction::Apply {
                id,
                message,
                price,
                days,
                resume_url,
            } => {
                commands::missions::apply(&context, id, &message, resume_url.as_deref(), price, days)
                    .await?
            }
            MissionAction::Create(args) => {
                let form = commands::missions::MissionArgs {
                    title: args.title,
                    description: args.description,
                    domaine_id: args.domaine,
                    budget: args.budget,
                    budget_type: args.budget_type.into(),
                    duration_days: args.days,
                    experience: args.experience.into(),
                    work_mode: args.work_mode.into(),
                    skills: args.skills,
                    notes: args.notes,
                    deadline: args.deadline,
                };
                commands::missions::create(&context, form, args.draft).await?
            }
            MissionAction::Status { id, status } => {
                commands::missions::set_status(&context, id, &status).await?
            }
            MissionAction::Close { id } => commands::missions::close(&context, id).await?,
            MissionAction::Submit { id } => commands::missions::submit(&context, id).await?,
            MissionAction::Delete { id } => commands::missions::delete(&context, id).await?,
        },
        Commands::Candidatures { action } => match action {
            CandidatureAction::List { mission } => {
                commands::candidatures::list(&context, mission).await?
            }
            CandidatureAction::Accept {
                mission,
                id,
                message,
            } => commands::candidatures::accept(&context, mission, id, message.as_deref()).await?,
            CandidatureAction::Reject {
                mission,
                id,
                message,
            } => commands::candidatures::reject(&context, mission, id, message.as_deref()).await?,
        },
        Commands::Milestones { mission, action } => {
            let mut milestones = commands::milestones::open(&context, mission)?;
            match action {
                MilestoneAction::List => commands::milestones::list(&mut milestones).await?,
                MilestoneAction::Create {
                    title,
                    amount,
                    description,
                    due,
                } => {
                    commands::milestones::create(&mut milestones, title, amount, description, due)
                        .await?
                }
                MilestoneAction::Deliver { id, notes } => {
                    commands::milestones::deliver(&mut milestones, id, notes.as_deref()).await?
                }
                MilestoneAction::Upload { id, file, comment } => {
                    commands::milestones::upload(&mut milestones, id, &file, comment).await?
                }
                MilestoneAction::Revert { id } => {
                    commands::milestones::revert(&mut milestones, id).await?
                }
                MilestoneAction::Accept { id, notes } => {
                    commands::milestones::accept(&mut milestones, id, notes.as_deref()).await?
                }
                MilestoneAction::Reject { id, reason } => {
                    commands::milestones::reject(&mut milestones, id, reason.as_deref()).await?
                }
                MilestoneAction::Pay { id, freelancer } => {
                    commands::milestones::pay(&mut milestones, id, freelancer).await?
                }
            }
        }
        Commands::Wallet { action } => match action {
            WalletAction::Show => commands::wallet::show(&context).await?,
            WalletAction::Recharge { amount } => commands::wallet::recharge(&context, amount).await?,
        },
        Commands::Portfolio => commands::wallet::portfolio(&context).await?,
        Commands::Conversations { action } => match action {
            ConversationAction::List => commands::conversations::list(&context).await?,
            ConversationAction::Show { id, summary } => {
                commands::conversations::show(&context, id, summary).await?
            }
            ConversationAction::Watch { id } => commands::conversations::watch(&context, id).await?,
            ConversationAction::Send { id, message } => {
                commands::conversations::send(&context, id, &message).await?
            }
        },
        Commands::Domaines { action } => match action {
            DomaineAction::List { page } => commands::catalog::list(&context, page).await?,
            DomaineAction::Active => commands::catalog::active(&context).await?,
            DomaineAction::Search { keyword } => commands::catalog::search(&context, &keyword).await?,
            DomaineAction::Create { name, description } => {
                commands::catalog::create(&context, &name, description).await?
            }
            DomaineAction::Toggle { id } => commands::catalog::toggle(&context, id).await?,
            DomaineAction::Delete { id } => commands::catalog::delete(&context, id).await?,
            DomaineAction::Certify {
                competence,
                certification,
            } => commands::catalog::certify(&context, competence, &certification).await?,
        },
        Commands::Ai { action } => match action {
            AiAction::Draft { title, description } => {
                commands::ai::draft(&context, &title, &description).await?
            }
            AiAction::Resume { file } => commands::ai::resume(&context, &file).await?,
        },
        Commands::Profile => commands::profile::show(&context).await?,
        Commands::Feedback { mission, action } => match action {
            FeedbackAction::Show => commands::profile::feedback(&context, mission).await?,
            FeedbackAction::Give { rating, comment } => {
                commands::profile::give_feedback(&context, mission, rating, &comment).await?
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Users => commands::admin::users(&context).await?,
            AdminAction::DeleteUser { id } => commands::admin::delete_user(&context, id).await?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn feedback_rating_is_bounded() {
        assert!(Cli::try_parse_from(["towork", "feedback", "3", "give", "6", "Très bien"]).is_err());
        assert!(Cli::try_parse_from(["towork", "feedback", "3", "give", "5", "Très bien"]).is_ok());
    }

    #[test]
    fn remember_flag_is_tri_state() {
        fn remember(extra: Option<&str>) -> Option<bool> {
            let mut args = vec!["towork", "login", "a@towork.io", "--password", "secret1"];
            args.extend(extra);
            match Cli::try_parse_from(args).unwrap().command {
                Commands::Login { remember, .. } => remember,
                _ => panic!("expected login"),
            }
        }
        assert_eq!(remember(None), None);
        assert_eq!(remember(Some("--remember")), Some(true));
        assert_eq!(remember(Some("--remember=false")), Some(false));
    }

    #[test]
    fn create_mission_defaults() {
        let cli = Cli::try_parse_from([
            "towork", "missions", "create", "--title", "Site", "--description", "Vitrine",
            "--budget", "500", "--days", "10",
        ])
        .unwrap();
        let Commands::Missions {
            action: MissionAction::Create(args),
        } = cli.command
        else {
            panic!("expected missions create");
        };
        assert_eq!(BudgetType::from(args.budget_type), BudgetType::Fixed);
        assert_eq!(WorkMode::from(args.work_mode), WorkMode::Remote);
        assert!(args.domaine.is_none());
    }
}
