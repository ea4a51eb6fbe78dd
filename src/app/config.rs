//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use url::Url;

use super::Theme;
use crate::api::DEFAULT_BASE_URL;

/// Users requested per page, at startup and by "show more".
pub const DEFAULT_PAGE_SIZE: u32 = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ThemeName {
    Dark,
    #[default]
    Mocha,
}

impl ThemeName {
    pub fn theme(self) -> Theme {
        match self {
            Self::Dark => Theme::dark(),
            Self::Mocha => Theme::mocha(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "usermgmt-tui", version, about)]
pub struct Config {
    /// Base URL of the user-management API.
    #[arg(
        long,
        env = "USERMGMT_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        value_parser = parse_base_url
    )]
    pub base_url: Url,

    /// Users fetched per page.
    #[arg(
        long,
        env = "USERMGMT_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,

    #[arg(long, value_enum, env = "USERMGMT_THEME", default_value_t = ThemeName::Mocha)]
    pub theme: ThemeName,

    /// Keybinding overrides (`Action = KeySpec` per line).
    #[arg(long, env = "USERMGMT_KEYBINDS")]
    pub keybinds: Option<PathBuf>,

    /// Write logs here; filtered by RUST_LOG (default: info).
    #[arg(long, env = "USERMGMT_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Only URLs that endpoint paths can be appended to (`http://host/prefix`).
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("{url} cannot carry a path"));
    }
    Ok(url)
}
