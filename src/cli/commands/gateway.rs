//! Connection arguments shared by every subcommand.

use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_PORTAL_URL: &str = "portal-url";
pub const ARG_TOKEN: &str = "token";
pub const ARG_ORG_ID: &str = "org-id";
pub const ARG_DEVLOGIN_KEY: &str = "dev-login-key";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Gateway base URL")
                .long_help(
                    "Gateway base URL. Defaults to PORTAL_API_GATEWAY_URL, then NEXT_PUBLIC_API_GATEWAY_URL, then http://localhost:8000/api.",
                )
                .global(true),
        )
        .arg(
            Arg::new(ARG_PORTAL_URL)
                .long(ARG_PORTAL_URL)
                .help("Portal origin serving the /api routes")
                .long_help("Portal origin serving the /api routes. Defaults to PORTAL_BASE_URL, then http://localhost:3000.")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TOKEN)
                .short('t')
                .long(ARG_TOKEN)
                .help("Bearer token, or DEVLOGIN to authenticate with the dev-login key")
                .env("PORTAL_TOKEN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ORG_ID)
                .short('o')
                .long(ARG_ORG_ID)
                .help("Organization id sent as x-org-id")
                .env("PORTAL_ORG_ID")
                .global(true),
        )
        .arg(
            Arg::new(ARG_DEVLOGIN_KEY)
                .long(ARG_DEVLOGIN_KEY)
                .help("Dev-login key, used when the token is DEVLOGIN")
                .env("PORTAL_DEVLOGIN_KEY")
                .hide_env_values(true)
                .global(true),
        )
}
