//! Portal CLI
//!
//! Terminal front-end for the project-collaboration portal:
//! - Sign in and out, register
//! - Browse, join and leave projects
//! - Team chat, tasks and milestones
//! - Proposals, announcements, course sections and the assignment calendar

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal::api::HttpTransport;
use portal::calendar::{MonthGrid, YearMonth, WEEKDAY_HEADERS};
use portal::config::{generate_default_config, Config};
use portal::forms::{
    AnnouncementForm, CrnForm, CustomProjectForm, LoginForm, MilestoneForm, ProfileForm,
    ProjectForm, RegistrationForm, TaskForm,
};
use portal::membership::Affordance;
use portal::model::time::{format_date, format_datetime};
use portal::model::*;
use portal::session::FileSessionStore;
use portal::{AppState, ClientError, ClientResult, Dashboard, NoticeLevel, ProjectTab, View};

type PortalDashboard = Dashboard<HttpTransport, FileSessionStore>;

#[derive(Parser)]
#[command(name = "portal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Project collaboration portal client")]
#[command(long_about = "Find a team, join a project and keep track of its work.\nFaculty can create projects, review proposals and manage course sections.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/portal/config.toml or ./portal.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// student or faculty
        #[arg(long, default_value = "student")]
        role: String,
        /// Course section code (students)
        #[arg(long, default_value = "")]
        crn: String,
        /// Title, e.g. Dr. (faculty)
        #[arg(long, default_value = "")]
        title: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse the project directory
    Projects {
        /// Server-side keyword filter
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show one project
    Project {
        id: Id,
        /// overview, messages, tasks or milestones
        #[arg(short, long, default_value = "overview", value_parser = parse_tab)]
        tab: ProjectTab,
    },

    /// Create a project (faculty)
    CreateProject {
        name: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        capacity: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Join a project
    Join { id: Id },

    /// Leave a project
    Leave {
        id: Id,
        /// Confirm leaving
        #[arg(short, long)]
        yes: bool,
    },

    /// Post to a project's team chat
    Message { project: Id, content: String },

    /// Project tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Project milestones
    #[command(subcommand)]
    Milestone(MilestoneCommand),

    /// Student directory
    Students {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Your profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Custom project proposals
    #[command(subcommand)]
    Proposal(ProposalCommand),

    /// Announcements
    #[command(subcommand)]
    Announcement(AnnouncementCommand),

    /// Course sections (faculty)
    #[command(subcommand)]
    Crn(CrnCommand),

    /// Assignment calendar
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// List the assignments due on one day of the month
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
        day: Option<u32>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        project: Id,
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Team member id
        #[arg(short, long, default_value = "")]
        assignee: String,
        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        due: String,
    },
    /// Change a task's status
    Status {
        project: Id,
        task: Id,
        /// pending, in_progress or completed
        #[arg(value_parser = parse_task_status)]
        status: TaskStatus,
    },
}

#[derive(Subcommand)]
pub enum MilestoneCommand {
    /// Add a milestone
    Add {
        project: Id,
        title: String,
        /// YYYY-MM-DD
        due: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    /// Update profile fields; omitted fields keep their current value
    Update {
        #[arg(long)]
        biography: Option<String>,
        #[arg(long)]
        skills: Option<String>,
        #[arg(long)]
        interests: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ProposalCommand {
    /// Propose a project (students)
    Submit {
        name: String,
        #[arg(long)]
        course: String,
        #[arg(long)]
        capacity: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "")]
        notes: String,
    },
    List,
    /// Approve or reject a proposal (faculty)
    Review {
        id: Id,
        /// approve or reject
        #[arg(value_parser = parse_decision)]
        decision: ReviewDecision,
    },
}

#[derive(Subcommand)]
pub enum AnnouncementCommand {
    List {
        #[arg(short, long)]
        project: Option<Id>,
    },
    Post {
        title: String,
        content: String,
        /// Required for students; omit for a section-wide announcement
        #[arg(short, long)]
        project: Option<Id>,
        #[arg(long, default_value = "normal")]
        priority: String,
        #[arg(long = "type", default_value = "announcement")]
        story_type: String,
    },
    Delete {
        id: Id,
    },
}

#[derive(Subcommand)]
pub enum CrnCommand {
    List,
    Add { code: String, course_name: String },
    Delete { id: Id },
}

fn parse_tab(raw: &str) -> Result<ProjectTab, String> {
    ProjectTab::parse(raw).ok_or_else(|| format!("unknown tab '{raw}'"))
}

fn parse_task_status(raw: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(raw).ok_or_else(|| format!("unknown status '{raw}'"))
}

fn parse_decision(raw: &str) -> Result<ReviewDecision, String> {
    ReviewDecision::parse(raw).ok_or_else(|| format!("expected approve or reject, got '{raw}'"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{content}"),
        }
        return Ok(());
    }

    let transport = HttpTransport::new(&config.api.base_url, config.api.timeout())?;
    let store = FileSessionStore::new(&config.session.file);
    let mut dash = Dashboard::new(transport, store);

    let needs_session = !matches!(cli.command, Commands::Login { .. } | Commands::Register { .. });
    if needs_session && dash.restore_session().is_none() {
        if matches!(cli.command, Commands::Logout) {
            println!("Not signed in");
            return Ok(());
        }
        eprintln!("Not signed in. Run `portal login <username> --password <password>` first.");
        std::process::exit(1);
    }

    let outcome = execute(&mut dash, cli.command, cli.format).await;

    for notice in dash.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.text),
            NoticeLevel::Error => eprintln!("error: {}", notice.text),
        }
    }

    match outcome {
        Ok(()) => Ok(()),
        Err(ClientError::Unconfirmed) => {
            eprintln!("Leaving a project needs confirmation: re-run with --yes");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            std::process::exit(1);
        }
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("portal={}", config.logging.level).into());

    // Diagnostics go to stderr so command output stays clean
    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn execute(dash: &mut PortalDashboard, command: Commands, format: OutputFormat) -> ClientResult<()> {
    match command {
        Commands::Login { username, password } => {
            let user = dash.login(&LoginForm { username, password }).await?;
            println!("Signed in as {} ({})", user.full_name(), user.role);
            println!("You are on {} project(s)", dash.state().my_projects().len());
        }

        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
            role,
            crn,
            title,
        } => {
            let form = RegistrationForm {
                username,
                email,
                password,
                first_name,
                last_name,
                role,
                crn,
                title,
            };
            dash.register(&form).await?;
        }

        Commands::Logout => {
            dash.logout().await;
            println!("Signed out");
        }

        Commands::Whoami => {
            let state = dash.state();
            if let Some(user) = state.user() {
                if format == OutputFormat::Json {
                    print_json(user)?;
                } else {
                    println!("{} <{}> ({})", user.full_name(), user.username, user.role);
                    if let Some(crn) = &user.crn {
                        println!("Section: {crn}");
                    }
                    if let Some(title) = user.title.as_deref().filter(|t| !t.is_empty()) {
                        println!("Title:   {title}");
                    }
                }
            }
        }

        Commands::Projects { search, page } => {
            dash.load_projects(search.as_deref()).await?;
            dash.load_my_projects().await?;
            dash.go_to_page(page);
            print_directory(dash.state(), format)?;
        }

        Commands::Project { id, tab } => {
            // Memberships first, for the one-project check
            dash.load_my_projects().await?;
            dash.open_project(id).await?;
            if tab != ProjectTab::Overview {
                dash.select_tab(tab).await?;
            }
            print_project(dash.state(), format)?;
        }

        Commands::CreateProject {
            name,
            course,
            capacity,
            description,
        } => {
            let form = ProjectForm {
                name,
                description,
                course,
                capacity,
            };
            dash.create_project(&form).await?;
        }

        Commands::Join { id } => {
            dash.load_projects(None).await?;
            dash.join_project(id).await?;
        }

        Commands::Leave { id, yes } => {
            dash.load_projects(None).await?;
            dash.leave_project(id, yes).await?;
        }

        Commands::Message { project, content } => {
            dash.open_project(project).await?;
            dash.send_message(&content).await?;
            print_project(dash.state(), format)?;
        }

        Commands::Task(TaskCommand::Add {
            project,
            title,
            description,
            assignee,
            due,
        }) => {
            dash.open_project(project).await?;
            let form = TaskForm {
                title,
                description,
                assignee_id: assignee,
                due_date: due,
            };
            dash.create_task(&form).await?;
            print_project(dash.state(), format)?;
        }

        Commands::Task(TaskCommand::Status { project, task, status }) => {
            dash.open_project(project).await?;
            dash.update_task_status(task, status).await?;
            print_project(dash.state(), format)?;
        }

        Commands::Milestone(MilestoneCommand::Add {
            project,
            title,
            due,
            description,
        }) => {
            dash.open_project(project).await?;
            let form = MilestoneForm {
                title,
                description,
                due_date: due,
            };
            dash.create_milestone(&form).await?;
            print_project(dash.state(), format)?;
        }

        Commands::Students { search } => {
            dash.load_students(search.as_deref()).await?;
            let students = dash.state().students();
            if format == OutputFormat::Json {
                print_json(&students)?;
            } else {
                for student in students {
                    println!("{:>5}  {:<24} {}", student.id, student.name, student.skill_tags().join(", "));
                }
            }
        }

        Commands::Profile(ProfileCommand::Show) => {
            dash.show_view(View::Profile).await?;
            if let Some(profile) = dash.state().profile() {
                if format == OutputFormat::Json {
                    print_json(profile)?;
                } else {
                    println!("{} <{}> ({})", profile.full_name(), profile.username, profile.role);
                    println!("Biography: {}", profile.biography.as_deref().unwrap_or("-"));
                    println!("Skills:    {}", profile.skills.as_deref().unwrap_or("-"));
                    println!("Interests: {}", profile.interests.as_deref().unwrap_or("-"));
                }
            }
        }

        Commands::Profile(ProfileCommand::Update {
            biography,
            skills,
            interests,
        }) => {
            dash.load_profile().await?;
            let mut form = dash
                .state()
                .profile()
                .map(ProfileForm::from_profile)
                .unwrap_or_default();
            if let Some(biography) = biography {
                form.biography = biography;
            }
            if let Some(skills) = skills {
                form.skills = skills;
            }
            if let Some(interests) = interests {
                form.interests = interests;
            }
            dash.update_profile(&form).await?;
        }

        Commands::Proposal(ProposalCommand::Submit {
            name,
            course,
            capacity,
            description,
            notes,
        }) => {
            let form = CustomProjectForm {
                name,
                description,
                course,
                capacity,
                notes,
            };
            dash.submit_custom_project(&form).await?;
        }

        Commands::Proposal(ProposalCommand::List) => {
            dash.load_submissions().await?;
            let submissions = dash.state().submissions();
            if format == OutputFormat::Json {
                print_json(&submissions)?;
            } else {
                for s in submissions {
                    println!(
                        "{:>5}  {:<28} {:<10} {:<9} by {}",
                        s.id,
                        s.name,
                        s.course,
                        s.status.as_str(),
                        s.submitter_name.as_deref().unwrap_or("Unknown")
                    );
                }
            }
        }

        Commands::Proposal(ProposalCommand::Review { id, decision }) => {
            dash.load_submissions().await?;
            dash.review_submission(id, decision).await?;
        }

        Commands::Announcement(AnnouncementCommand::List { project }) => {
            dash.load_announcements(project).await?;
            let announcements = dash.state().announcements();
            if format == OutputFormat::Json {
                print_json(&announcements)?;
            } else {
                for a in announcements {
                    let flag = if a.priority == Priority::High { "!" } else { " " };
                    let when = a.created_at.as_ref().map(format_datetime).unwrap_or_default();
                    println!("{flag}{:>4}  {}  [{}]  {}", a.id, a.title, a.scope_label(), when);
                    println!("       {}", a.content);
                }
            }
        }

        Commands::Announcement(AnnouncementCommand::Post {
            title,
            content,
            project,
            priority,
            story_type,
        }) => {
            let form = AnnouncementForm {
                title,
                content,
                story_type,
                priority,
                project_id: project.map(|id| id.to_string()).unwrap_or_default(),
            };
            dash.post_announcement(&form).await?;
        }

        Commands::Announcement(AnnouncementCommand::Delete { id }) => {
            dash.delete_announcement(id).await?;
        }

        Commands::Crn(CrnCommand::List) => {
            dash.load_crns().await?;
            let crns = dash.state().crns();
            if format == OutputFormat::Json {
                print_json(&crns)?;
            } else {
                for crn in crns {
                    println!(
                        "{:>5}  {:<10} {:<30} {}",
                        crn.id,
                        crn.code,
                        crn.course_name,
                        crn.faculty_name.as_deref().unwrap_or("")
                    );
                }
            }
        }

        Commands::Crn(CrnCommand::Add { code, course_name }) => {
            dash.create_crn(&CrnForm { code, course_name }).await?;
        }

        Commands::Crn(CrnCommand::Delete { id }) => {
            dash.delete_crn(id).await?;
        }

        Commands::Calendar { year, month, day } => {
            dash.load_calendar().await?;
            let current = dash.state().calendar().cursor();
            let cursor = YearMonth::new(year.unwrap_or(current.year()), month.unwrap_or(current.month()))
                .unwrap_or(current);
            let grid = dash.calendar_show(cursor);

            match day.and_then(|d| chrono::NaiveDate::from_ymd_opt(cursor.year(), cursor.month(), d)) {
                Some(date) => match dash.calendar_day(date) {
                    Some(listing) => println!("{listing}"),
                    None => println!("Nothing due {}", date),
                },
                None => print_calendar(&grid),
            }
        }

        // Handled before a session is needed
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_json<V: serde::Serialize + ?Sized>(value: &V) -> ClientResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn action_label(state: &AppState, project: &Project) -> &'static str {
    match state.affordance_for(project) {
        Some(Affordance::Join) => "join",
        Some(Affordance::Leave) => "member",
        _ => "",
    }
}

fn print_directory(state: &AppState, format: OutputFormat) -> ClientResult<()> {
    let directory = state.directory();
    if format == OutputFormat::Json {
        return print_json(directory.current());
    }

    if directory.is_empty() {
        match state.keyword() {
            Some(keyword) => println!("No projects match '{keyword}'"),
            None => println!("No projects yet"),
        }
        return Ok(());
    }

    println!("{:>5}  {:<30} {:<12} {:>7}  {:<5}  {}", "ID", "NAME", "COURSE", "SEATS", "STATUS", "");
    for project in directory.current() {
        println!(
            "{:>5}  {:<30} {:<12} {:>7}  {:<5}  {}",
            project.id,
            project.name,
            project.course,
            project.occupancy(),
            project.effective_status().label(),
            action_label(state, project)
        );
    }
    println!("Page {} of {}", directory.page(), directory.page_count());
    Ok(())
}

fn print_project(state: &AppState, format: OutputFormat) -> ClientResult<()> {
    let Some(open) = state.open_project() else {
        return Ok(());
    };
    if format == OutputFormat::Json {
        return match open.tab {
            ProjectTab::Overview => print_json(&open.project),
            ProjectTab::Messages => print_json(&open.messages),
            ProjectTab::Tasks => print_json(&open.tasks),
            ProjectTab::Milestones => print_json(&open.milestones),
        };
    }

    let project = &open.project;
    match open.tab {
        ProjectTab::Overview => {
            println!("{} [{}]", project.name, project.effective_status().label());
            println!("Course:  {}", project.course);
            println!("Creator: {}", project.creator_name());
            println!("Seats:   {}", project.occupancy());
            if !project.description.is_empty() {
                println!("\n{}\n", project.description);
            }
            println!("Team:");
            for member in &project.team_members {
                let joined = member.joined_at.as_ref().map(format_date).unwrap_or_default();
                println!("  {:>5}  {:<24} {}", member.id, member.name, joined);
            }
            match state.affordance_for(project) {
                Some(Affordance::Join) => println!("\nRun `portal join {}` to join", project.id),
                Some(Affordance::Leave) => println!("\nRun `portal leave {} --yes` to leave", project.id),
                Some(Affordance::Unavailable(block)) => println!("\n{block}"),
                None => {}
            }
        }
        ProjectTab::Messages => {
            for message in &open.messages {
                println!(
                    "[{}] {}: {}",
                    format_datetime(&message.created_at),
                    message.sender.name,
                    message.content
                );
            }
        }
        ProjectTab::Tasks => {
            println!("{} open task(s)", open.open_task_count);
            for task in &open.tasks {
                let assignee = task.assignee.as_ref().map(|a| a.name.as_str()).unwrap_or("Unassigned");
                let due = task
                    .due_date
                    .as_ref()
                    .map(|d| format!(" | Due: {}", format_date(d)))
                    .unwrap_or_default();
                println!("{:>5}  {:<12} {}  ({assignee}{due})", task.id, task.status.label(), task.title);
            }
        }
        ProjectTab::Milestones => {
            for milestone in &open.milestones {
                println!(
                    "{:>5}  {:<10} {}  Due: {}",
                    milestone.id,
                    milestone.status,
                    milestone.title,
                    format_date(&milestone.due_date)
                );
            }
        }
    }
    Ok(())
}

fn print_calendar(grid: &MonthGrid) {
    println!("{:^28}", grid.month.label());
    println!("{}", WEEKDAY_HEADERS.map(|h| format!("{h:>4}")).join(""));
    for week in grid.weeks() {
        let line: String = week
            .iter()
            .map(|cell| {
                let mark = if cell.is_marked() { '*' } else { ' ' };
                if cell.in_month {
                    format!("{:>3}{mark}", chrono::Datelike::day(&cell.date))
                } else {
                    "    ".to_string()
                }
            })
            .collect();
        println!("{line}");
    }
    println!("* = assignment due; use --day to list them");
}
