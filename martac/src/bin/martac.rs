use anyhow::Context;
use clap::{
    Parser,
    Subcommand,
};
use martac::{
    platform::Builder as PlatformBuilder,
    Platform,
};
use martcore::ac::{
    role::Role,
    session::SessionToken,
    user::User,
};
use martdb_sqlite::{
    MigrationProfile,
    SqliteBackend,
};
use std::{
    str::FromStr,
    time::Instant,
};

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(long, value_name = "MARTAC_DB_URL", env = "MARTAC_DB_URL")]
    martac_db_url: String,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    User {
        #[command(subcommand)]
        cmd: UserCmd,
    },
    #[command(arg_required_else_help = true)]
    Role {
        #[command(subcommand)]
        cmd: RoleCmd,
    },
    #[command(arg_required_else_help = true)]
    Permission {
        #[command(subcommand)]
        cmd: PermissionCmd,
    },
    #[command(arg_required_else_help = true)]
    Session {
        #[command(subcommand)]
        cmd: SessionCmd,
    },
    /// Sync the permission catalog into the store
    Seed,
    #[command(arg_required_else_help = true)]
    /// Probe a single permission for a user
    Check {
        name: String,
        code: String,
    },
}

#[derive(Debug, Subcommand)]
enum UserCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    /// Show the user together with their resolved permission set
    Show {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    AssignRole {
        name: String,
        role: String,
    },
    #[command(arg_required_else_help = true)]
    ClearRole {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    Sessions {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    /// Purge every session held by the user
    Logout {
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum RoleCmd {
    #[command(arg_required_else_help = true)]
    Create {
        name: String,
        #[clap(long, default_value = "")]
        description: String,
    },
    List,
    #[command(arg_required_else_help = true)]
    Show {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    Delete {
        name: String,
    },
    #[command(arg_required_else_help = true)]
    /// Replace the full set of permissions assigned to the role
    SetPermissions {
        name: String,
        codes: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum PermissionCmd {
    List,
}

#[derive(Debug, Subcommand)]
enum SessionCmd {
    #[command(arg_required_else_help = true)]
    /// Open a new session for the user, printing its token
    Login {
        name: String,
        #[clap(long, default_value = "localhost")]
        origin: String,
    },
    #[command(arg_required_else_help = true)]
    /// Purge the session behind the token
    Logout {
        token: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("martdb_sqlite")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap();

    let platform = PlatformBuilder::new()
        .ac_platform(
            SqliteBackend::create_and_connect(&args.martac_db_url)
                .await?
                .run_migration_profile(MigrationProfile::Martac)
                .await?
        )
        .build();

    match args.command {
        Commands::User { cmd } => {
            parse_user(&platform, cmd).await?;
        },
        Commands::Role { cmd } => {
            parse_role(&platform, cmd).await?;
        },
        Commands::Permission { cmd } => {
            parse_permission(&platform, cmd).await?;
        },
        Commands::Session { cmd } => {
            parse_session(&platform, cmd).await?;
        },
        Commands::Seed => {
            let count = platform.seed_permission_catalog().await?;
            println!("{count} new permission(s) provisioned");
        },
        Commands::Check { name, code } => {
            let user = require_user(&platform, &name).await?;
            let instant = Instant::now();
            let granted = platform.has_permission(user.id, &code).await?;
            let elapsed = instant.elapsed();
            let granted = if granted {
                "granted"
            } else {
                "not granted"
            };
            println!("{code:?} {granted} to {name}; evaluation took {elapsed:?}");
        },
    }

    Ok(())
}

async fn require_user<'p>(
    platform: &'p Platform,
    name: &str,
) -> anyhow::Result<User> {
    platform.get_user_by_name(name).await?
        .with_context(|| format!("no user named {name:?}"))
}

async fn require_role<'p>(
    platform: &'p Platform,
    name: &str,
) -> anyhow::Result<Role> {
    platform.get_role_by_name(name).await?
        .with_context(|| format!("no role named {name:?}"))
}

async fn parse_user<'p>(
    platform: &'p Platform,
    arg: UserCmd,
) -> anyhow::Result<()> {
    match arg {
        UserCmd::Create { name } => {
            let user = platform.create_user(&name).await?;
            let id = user.id;
            let name = user.name;
            println!("user {name:?} created with id {id}");
        }
        UserCmd::Show { name } => {
            let user = require_user(platform, &name).await?;
            println!("id: {}", user.id);
            println!("name: {}", user.name);
            println!("created_ts: {}", user.created_ts);
            match user.role_id {
                Some(role_id) => {
                    let role = platform.get_role(role_id).await?;
                    println!("role: {}", role.name);
                }
                None => println!("role: (none)"),
            }
            let permissions = platform.evaluate_permissions(user.id).await?;
            println!("{}", serde_json::to_string_pretty(&permissions)?);
        }
        UserCmd::AssignRole { name, role } => {
            let user = require_user(platform, &name).await?;
            let role = require_role(platform, &role).await?;
            platform.set_user_role(user.id, Some(role.id)).await?;
            println!("user {name} assigned role {}", role.name);
        }
        UserCmd::ClearRole { name } => {
            let user = require_user(platform, &name).await?;
            platform.set_user_role(user.id, None).await?;
            println!("user {name} no longer belongs to any role");
        }
        UserCmd::Sessions { name } => {
            let user = require_user(platform, &name).await?;
            for session in platform.get_user_sessions(user.id).await?.iter() {
                println!(
                    "origin {:?} created {} last active {}",
                    session.origin,
                    session.created_ts,
                    session.last_active_ts,
                );
            }
        }
        UserCmd::Logout { name } => {
            let user = require_user(platform, &name).await?;
            platform.logout_user(user.id).await?;
            println!("all sessions for {name} purged");
        }
    }
    Ok(())
}

async fn parse_role<'p>(
    platform: &'p Platform,
    arg: RoleCmd,
) -> anyhow::Result<()> {
    match arg {
        RoleCmd::Create { name, description } => {
            let role = platform.create_role(&name, &description).await?;
            println!("role {:?} created with id {}", role.name, role.id);
        }
        RoleCmd::List => {
            for role in platform.list_roles().await?.iter() {
                println!("{}\t{}\t{}", role.id, role.name, role.description);
            }
        }
        RoleCmd::Show { name } => {
            let role = require_role(platform, &name).await?;
            println!("id: {}", role.id);
            println!("name: {}", role.name);
            println!("description: {}", role.description);
            for permission in platform.get_role_permissions(role.id).await?.iter() {
                println!("{}\t{}", permission.code, permission.name);
            }
        }
        RoleCmd::Delete { name } => {
            let role = require_role(platform, &name).await?;
            platform.delete_role(role.id).await?;
            println!("role {name} deleted");
        }
        RoleCmd::SetPermissions { name, codes } => {
            let role = require_role(platform, &name).await?;
            let catalog = platform.list_permissions().await?;
            let ids = codes.iter()
                .map(|code| catalog.iter()
                    .find(|permission| &permission.code == code)
                    .map(|permission| permission.id)
                    .with_context(|| format!("no permission with code {code:?}"))
                )
                .collect::<anyhow::Result<Vec<_>>>()?;
            platform.replace_role_permissions(role.id, &ids).await?;
            let count = platform.get_role_permissions(role.id).await?.len();
            println!("role {name} now carries {count} permission(s)");
        }
    }
    Ok(())
}

async fn parse_permission<'p>(
    platform: &'p Platform,
    arg: PermissionCmd,
) -> anyhow::Result<()> {
    match arg {
        PermissionCmd::List => {
            for permission in platform.list_permissions().await?.iter() {
                println!(
                    "{}\t{}\t{}",
                    permission.id,
                    permission.category,
                    permission.code,
                );
            }
        }
    }
    Ok(())
}

async fn parse_session<'p>(
    platform: &'p Platform,
    arg: SessionCmd,
) -> anyhow::Result<()> {
    match arg {
        SessionCmd::Login { name, origin } => {
            let user = require_user(platform, &name).await?;
            let principal = platform.new_user_session(user, origin).await?;
            println!("session token: {}", principal.session().token);
        }
        SessionCmd::Logout { token } => {
            platform.logout_session(SessionToken::from_str(&token)?).await?;
            println!("session purged");
        }
    }
    Ok(())
}
