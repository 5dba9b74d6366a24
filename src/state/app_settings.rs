use crate::state::session::default_session_path;
use chrono::{Local, NaiveDate};
use log::LevelFilter;
use pitchside_api::StatusThresholds;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:3000";
pub const DEFAULT_API_PATH: &str = "/api";
pub const DEFAULT_SOON_DAYS: i64 = 1;
pub const MAX_SOON_DAYS: i64 = 3650;

/// Post-load action picked on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupAction {
    Login,
    CreateMatch,
    JoinMatch,
}

impl StartupAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "login" => Some(StartupAction::Login),
            "create_match" => Some(StartupAction::CreateMatch),
            "join_match" => Some(StartupAction::JoinMatch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub origin: String,
    pub api_path: String,
    pub startup_action: Option<StartupAction>,
    pub past_before: NaiveDate,
    pub soon_within_days: i64,
    pub session_file: PathBuf,
    pub log_level: Option<LevelFilter>,
    pub full_screen: bool,
}

#[derive(Debug)]
pub enum CliCommand {
    Run(Box<AppSettings>),
    Help,
    Version,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SettingsError {
    UnknownArgument(String),
    MissingValue(&'static str),
    InvalidValue { setting: &'static str, value: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
            SettingsError::MissingValue(flag) => write!(f, "{flag} needs a value"),
            SettingsError::InvalidValue { setting, value } => write!(f, "Invalid value for {setting}: {value}"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl AppSettings {
    /// Flags first, then environment, then defaults.
    pub fn load() -> Result<CliCommand, SettingsError> {
        Self::from_sources(
            std::env::args().skip(1),
            |key| std::env::var(key).ok(),
            Local::now().date_naive(),
        )
    }

    pub fn from_sources(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
        today: NaiveDate,
    ) -> Result<CliCommand, SettingsError> {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut origin = None;
        let mut startup_action = None;
        let mut past_before = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(CliCommand::Help),
                "-V" | "--version" => return Ok(CliCommand::Version),
                "--origin" => origin = Some(args.next().ok_or(SettingsError::MissingValue("--origin"))?),
                "--action" => {
                    let raw = args.next().ok_or(SettingsError::MissingValue("--action"))?;
                    let action = StartupAction::parse(&raw)
                        .ok_or(SettingsError::InvalidValue { setting: "--action", value: raw })?;
                    startup_action = Some(action);
                }
                "--past-before" => {
                    let raw = args.next().ok_or(SettingsError::MissingValue("--past-before"))?;
                    past_before = Some(parse_date("--past-before", &raw)?);
                }
                _ => return Err(SettingsError::UnknownArgument(arg)),
            }
        }

        let past_before = match past_before {
            Some(date) => date,
            None => match env("PITCHSIDE_PAST_BEFORE") {
                Some(raw) => parse_date("PITCHSIDE_PAST_BEFORE", &raw)?,
                None => today,
            },
        };
        let soon_within_days = match env("PITCHSIDE_SOON_DAYS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if (0..=MAX_SOON_DAYS).contains(&days) => days,
                _ => return Err(SettingsError::InvalidValue { setting: "PITCHSIDE_SOON_DAYS", value: raw }),
            },
            None => DEFAULT_SOON_DAYS,
        };
        let log_level = match env("PITCHSIDE_LOG") {
            Some(raw) => Some(
                raw.parse::<LevelFilter>()
                    .map_err(|_| SettingsError::InvalidValue { setting: "PITCHSIDE_LOG", value: raw })?,
            ),
            None => None,
        };

        Ok(CliCommand::Run(Box::new(AppSettings {
            origin: origin
                .or_else(|| env("PITCHSIDE_ORIGIN"))
                .unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            api_path: env("PITCHSIDE_API_PATH").unwrap_or_else(|| DEFAULT_API_PATH.to_string()),
            startup_action,
            past_before,
            soon_within_days,
            session_file: env("PITCHSIDE_SESSION_FILE").map(PathBuf::from).unwrap_or_else(default_session_path),
            log_level,
            full_screen: false,
        })))
    }

    /// Origin joined with the API path, e.g. `http://127.0.0.1:3000/api`.
    pub fn base_url(&self) -> String {
        let origin = self.origin.trim_end_matches('/');
        let path = self.api_path.trim_matches('/');
        if path.is_empty() { origin.to_string() } else { format!("{origin}/{path}") }
    }

    pub fn thresholds(&self) -> StatusThresholds {
        StatusThresholds::new(self.past_before, self.soon_within_days)
    }
}

fn parse_date(setting: &'static str, raw: &str) -> Result<NaiveDate, SettingsError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| SettingsError::InvalidValue { setting, value: raw.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn run(args: &[&str], env: &[(&str, &str)]) -> Result<AppSettings, SettingsError> {
        let env: HashMap<String, String> = env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        match AppSettings::from_sources(args.iter().map(|a| a.to_string()), |k| env.get(k).cloned(), today())? {
            CliCommand::Run(settings) => Ok(*settings),
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let s = run(&[], &[("PITCHSIDE_SESSION_FILE", "/tmp/s.json")]).unwrap();
        assert_eq!(s.base_url(), "http://127.0.0.1:3000/api");
        assert_eq!(s.past_before, today());
        assert_eq!(s.soon_within_days, 1);
        assert_eq!(s.session_file, PathBuf::from("/tmp/s.json"));
        assert!(s.startup_action.is_none());
        assert!(s.log_level.is_none());
    }

    #[test]
    fn flags_beat_environment() {
        let s = run(
            &["--origin", "https://pitch.example/", "--past-before", "2025-01-31", "--action", "join_match"],
            &[
                ("PITCHSIDE_ORIGIN", "http://ignored"),
                ("PITCHSIDE_PAST_BEFORE", "2024-01-01"),
                ("PITCHSIDE_API_PATH", "/v2/"),
                ("PITCHSIDE_LOG", "debug"),
            ],
        )
        .unwrap();
        assert_eq!(s.base_url(), "https://pitch.example/v2");
        assert_eq!(s.past_before, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(s.startup_action, Some(StartupAction::JoinMatch));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn bad_input_is_reported() {
        assert_eq!(run(&["--bogus"], &[]).unwrap_err(), SettingsError::UnknownArgument("--bogus".into()));
        assert_eq!(run(&["--action"], &[]).unwrap_err(), SettingsError::MissingValue("--action"));
        assert!(matches!(
            run(&["--action", "delete_everything"], &[]),
            Err(SettingsError::InvalidValue { setting: "--action", .. })
        ));
        assert!(matches!(
            run(&[], &[("PITCHSIDE_SOON_DAYS", "soon")]),
            Err(SettingsError::InvalidValue { setting: "PITCHSIDE_SOON_DAYS", .. })
        ));
    }

    #[test]
    fn soon_window_must_be_in_range() {
        for raw in ["1000000000", "-1", "3651"] {
            assert!(matches!(
                run(&[], &[("PITCHSIDE_SOON_DAYS", raw)]),
                Err(SettingsError::InvalidValue { setting: "PITCHSIDE_SOON_DAYS", .. })
            ));
        }
        let s = run(&[], &[("PITCHSIDE_SOON_DAYS", "3650")]).unwrap();
        assert_eq!(s.soon_within_days, MAX_SOON_DAYS);
    }

    #[test]
    fn help_and_version_short_circuit() {
        let cmd = AppSettings::from_sources(["--help".to_string(), "--bogus".to_string()], |_| None, today());
        assert!(matches!(cmd, Ok(CliCommand::Help)));
        let cmd = AppSettings::from_sources(["-V".to_string()], |_| None, today());
        assert!(matches!(cmd, Ok(CliCommand::Version)));
    }
}
