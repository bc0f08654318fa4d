pub mod gateway;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const CMD_TEAMS: &str = "teams";
pub const CMD_WORKSPACES: &str = "workspaces";
pub const CMD_MEMBERS: &str = "members";
pub const CMD_INVITES: &str = "invites";
pub const CMD_ME: &str = "me";
pub const CMD_STATS: &str = "stats";
pub const CMD_API_KEYS: &str = "api-keys";
pub const CMD_STATUS: &str = "status";
pub const CMD_LINKEDIN_CONNECT: &str = "linkedin-connect";
pub const CMD_PLAYGROUND: &str = "playground";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("portal")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_TEAMS).about("List teams").arg(
                Arg::new("mine")
                    .long("mine")
                    .help("Only teams the signed-in user belongs to")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(Command::new(CMD_WORKSPACES).about("List workspaces"))
        .subcommand(Command::new(CMD_MEMBERS).about("List organization members"))
        .subcommand(Command::new(CMD_INVITES).about("List pending invites"))
        .subcommand(Command::new(CMD_ME).about("Show the signed-in user"))
        .subcommand(Command::new(CMD_STATS).about("Show enrichment usage"))
        .subcommand(Command::new(CMD_API_KEYS).about("List API keys (portal route)"))
        .subcommand(
            Command::new(CMD_STATUS)
                .about("Show an integration's connection status")
                .arg(
                    Arg::new("provider")
                        .help("linkedin, hubspot, salesforce or dynamics")
                        .required(true),
                )
                .arg(
                    Arg::new("watch")
                        .short('w')
                        .long("watch")
                        .help("Keep polling while the status is pending")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .help("Poll interval in milliseconds")
                        .default_value("5000")
                        .value_parser(clap::value_parser!(u64).range(100..)),
                ),
        )
        .subcommand(
            Command::new(CMD_LINKEDIN_CONNECT)
                .about("Start a LinkedIn live session and wait for the login")
                .arg(
                    Arg::new("poll-interval")
                        .long("poll-interval")
                        .help("Login poll interval in milliseconds")
                        .default_value("3000")
                        .value_parser(clap::value_parser!(u64).range(100..)),
                ),
        )
        .subcommand(
            Command::new(CMD_PLAYGROUND)
                .about("Replay the scripted enrichment demo")
                .arg(
                    Arg::new("input")
                        .help("Email address or LinkedIn profile URL")
                        .required(true),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the step delays")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("no-delay")
                        .long("no-delay")
                        .help("Print the script without waiting between steps")
                        .action(ArgAction::SetTrue),
                ),
        );

    let command = gateway::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "portal");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let matches = new().get_matches_from(vec![
            "portal",
            "teams",
            "--mine",
            "--token",
            "tok123",
            "--org-id",
            "org1",
            "--api-url",
            "https://gateway.tld/api",
        ]);

        assert_eq!(
            matches.get_one::<String>(gateway::ARG_TOKEN).cloned(),
            Some("tok123".to_string())
        );
        assert_eq!(
            matches.get_one::<String>(gateway::ARG_API_URL).cloned(),
            Some("https://gateway.tld/api".to_string())
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, CMD_TEAMS);
        assert!(sub.get_flag("mine"));
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PORTAL_TOKEN", Some("env-token")),
                ("PORTAL_ORG_ID", Some("org-env")),
                ("PORTAL_DEVLOGIN_KEY", Some("key1")),
                ("PORTAL_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["portal", "me"]);
                assert_eq!(
                    matches.get_one::<String>(gateway::ARG_TOKEN).cloned(),
                    Some("env-token".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(gateway::ARG_ORG_ID).cloned(),
                    Some("org-env".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>(gateway::ARG_DEVLOGIN_KEY).cloned(),
                    Some("key1".to_string())
                );
                assert_eq!(matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_status_defaults() {
        let matches = new().get_matches_from(vec!["portal", "status", "hubspot"]);
        let sub = matches.subcommand_matches(CMD_STATUS).unwrap();
        assert_eq!(sub.get_one::<String>("provider").cloned(), Some("hubspot".to_string()));
        assert_eq!(sub.get_one::<u64>("interval").copied(), Some(5000));
        assert!(!sub.get_flag("watch"));
    }

    #[test]
    fn test_playground_seed() {
        let matches = new().get_matches_from(vec!["portal", "playground", "dana@example.com", "--seed", "7"]);
        let sub = matches.subcommand_matches(CMD_PLAYGROUND).unwrap();
        assert_eq!(sub.get_one::<u64>("seed").copied(), Some(7));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(new().try_get_matches_from(vec!["portal"]).is_err());
    }

    #[test]
    fn test_verbosity_count() {
        temp_env::with_vars([("PORTAL_LOG_LEVEL", None::<String>)], || {
            let matches = new().get_matches_from(vec!["portal", "-vvv", "stats"]);
            assert_eq!(matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(), Some(3));
        });
    }
}
