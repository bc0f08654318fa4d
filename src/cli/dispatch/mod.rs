use crate::cli::{
    actions::{
        linkedin, playground,
        resources::{self, Resource},
        status, Action,
    },
    commands::{
        gateway::{ARG_API_URL, ARG_DEVLOGIN_KEY, ARG_ORG_ID, ARG_PORTAL_URL, ARG_TOKEN},
        CMD_API_KEYS, CMD_INVITES, CMD_LINKEDIN_CONNECT, CMD_ME, CMD_MEMBERS, CMD_PLAYGROUND,
        CMD_STATS, CMD_STATUS, CMD_TEAMS, CMD_WORKSPACES,
    },
    globals::GlobalArgs,
};
use crate::config::PortalConfig;
use crate::integrations::Provider;
use anyhow::{anyhow, bail, ensure, Context, Result};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = global_args(matches)?;

    let action = match matches.subcommand() {
        Some((CMD_TEAMS, sub)) => resource(
            globals,
            Resource::Teams {
                mine: sub.get_flag("mine"),
            },
        ),
        Some((CMD_WORKSPACES, _)) => resource(globals, Resource::Workspaces),
        Some((CMD_MEMBERS, _)) => resource(globals, Resource::Members),
        Some((CMD_INVITES, _)) => resource(globals, Resource::Invites),
        Some((CMD_ME, _)) => resource(globals, Resource::Me),
        Some((CMD_STATS, _)) => resource(globals, Resource::Stats),
        Some((CMD_API_KEYS, _)) => resource(globals, Resource::ApiKeys),
        Some((CMD_STATUS, sub)) => {
            let provider = sub
                .get_one::<String>("provider")
                .context("missing required argument: <provider>")?
                .parse::<Provider>()
                .map_err(|e| anyhow!(e))?;
            Action::Status(status::Args {
                globals,
                provider,
                watch: sub.get_flag("watch"),
                interval: millis(sub, "interval")?,
            })
        }
        Some((CMD_LINKEDIN_CONNECT, sub)) => Action::LinkedInConnect(linkedin::Args {
            globals,
            poll_interval: millis(sub, "poll-interval")?,
        }),
        Some((CMD_PLAYGROUND, sub)) => Action::Playground(playground::Args {
            input: sub
                .get_one::<String>("input")
                .cloned()
                .context("missing required argument: <input>")?,
            seed: sub.get_one::<u64>("seed").copied(),
            no_delay: sub.get_flag("no-delay"),
        }),
        Some((other, _)) => bail!("unknown subcommand: {other}"),
        None => bail!("missing subcommand"),
    };

    Ok(action)
}

fn resource(globals: GlobalArgs, resource: Resource) -> Action {
    Action::Resource(resources::Args { globals, resource })
}

fn millis(matches: &clap::ArgMatches, id: &str) -> Result<Duration> {
    matches
        .get_one::<u64>(id)
        .copied()
        .map(Duration::from_millis)
        .with_context(|| format!("missing argument: --{id}"))
}

fn global_args(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let config = PortalConfig::load().with_overrides(
        matches.get_one::<String>(ARG_API_URL).map(String::as_str),
        matches.get_one::<String>(ARG_PORTAL_URL).map(String::as_str),
    );
    validate_base_url(ARG_API_URL, &config.api_base_url)?;
    validate_base_url(ARG_PORTAL_URL, &config.portal_base_url)?;

    let mut globals = GlobalArgs::new(config);
    if let Some(token) = non_empty(matches, ARG_TOKEN) {
        globals.set_token(SecretString::from(token));
    }
    globals.org_id = non_empty(matches, ARG_ORG_ID);
    globals.dev_login_key = non_empty(matches, ARG_DEVLOGIN_KEY).map(SecretString::from);

    Ok(globals)
}

fn non_empty(matches: &clap::ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_base_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).with_context(|| format!("invalid --{name}: {value}"))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "--{name} must be an http(s) URL: {value}"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    const CLEAR: [(&str, Option<&str>); 6] = [
        ("PORTAL_API_GATEWAY_URL", None),
        ("NEXT_PUBLIC_API_GATEWAY_URL", None),
        ("PORTAL_BASE_URL", None),
        ("PORTAL_TOKEN", None),
        ("PORTAL_ORG_ID", None),
        ("PORTAL_DEVLOGIN_KEY", None),
    ];

    fn dispatch(args: &[&str]) -> Result<Action> {
        let matches = commands::new().get_matches_from(args.iter().copied());
        handler(&matches)
    }

    #[test]
    fn test_teams_mine() {
        temp_env::with_vars(CLEAR, || {
            let action = dispatch(&["portal", "teams", "--mine", "-t", "tok123", "-o", "org1"]).unwrap();
            let Action::Resource(args) = action else {
                panic!("expected a resource action");
            };
            assert_eq!(args.resource, Resource::Teams { mine: true });
            assert_eq!(
                args.globals.token.as_ref().map(|t| t.expose_secret().to_string()),
                Some("tok123".to_string())
            );
            assert_eq!(args.globals.org_id.as_deref(), Some("org1"));
            assert_eq!(args.globals.config.api_base_url, "http://localhost:8000/api");
        });
    }

    #[test]
    fn test_api_url_flag_beats_env() {
        temp_env::with_vars(
            [
                ("PORTAL_API_GATEWAY_URL", Some("https://env.tld/api")),
                ("PORTAL_TOKEN", None),
            ],
            || {
                let action = dispatch(&["portal", "me", "--api-url", " https://flag.tld/api "]).unwrap();
                let Action::Resource(args) = action else {
                    panic!("expected a resource action");
                };
                assert_eq!(args.globals.config.api_base_url, "https://flag.tld/api");
            },
        );
    }

    #[test]
    fn test_invalid_api_url() {
        temp_env::with_vars(CLEAR, || {
            let err = dispatch(&["portal", "me", "--api-url", "not a url"]).unwrap_err();
            assert!(err.to_string().contains("invalid --api-url"));

            let err = dispatch(&["portal", "me", "--api-url", "ftp://gateway.tld"]).unwrap_err();
            assert!(err.to_string().contains("http(s)"));
        });
    }

    #[test]
    fn test_status_provider() {
        temp_env::with_vars(CLEAR, || {
            let action = dispatch(&["portal", "status", "Dynamics365", "--watch", "--interval", "250"]).unwrap();
            let Action::Status(args) = action else {
                panic!("expected a status action");
            };
            assert_eq!(args.provider, Provider::Dynamics);
            assert!(args.watch);
            assert_eq!(args.interval, Duration::from_millis(250));

            assert!(dispatch(&["portal", "status", "pipedrive"]).is_err());
        });
    }

    #[test]
    fn test_blank_token_is_ignored() {
        temp_env::with_vars(CLEAR, || {
            let action = dispatch(&["portal", "linkedin-connect", "--token", "  "]).unwrap();
            let Action::LinkedInConnect(args) = action else {
                panic!("expected a linkedin action");
            };
            assert!(args.globals.token.is_none());
            assert_eq!(args.poll_interval, Duration::from_millis(3000));
        });
    }

    #[test]
    fn test_playground() {
        temp_env::with_vars(CLEAR, || {
            let action = dispatch(&["portal", "playground", "dana@example.com", "--no-delay"]).unwrap();
            let Action::Playground(args) = action else {
                panic!("expected a playground action");
            };
            assert_eq!(args.input, "dana@example.com");
            assert_eq!(args.seed, None);
            assert!(args.no_delay);
        });
    }
}
