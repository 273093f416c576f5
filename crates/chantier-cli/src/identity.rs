//! Current-user resolution for mutating commands.
//!
//! The resolution chain: `--user` flag > `CHANTIER_USER` env > user config
//! file > `USER` env (TTY only). The core trusts whatever identity it is
//! given; this module is the identity collaborator, nothing more.

use chantier_core::model::UserRef;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Errors from identity resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: &'static str,
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IdentityError {}

/// `[user]` table of `<config>/chantier/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub user: Option<ConfiguredUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfiguredUser {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ConfiguredUser {
    fn into_user_ref(self) -> UserRef {
        let mut user = UserRef::from_name(&self.name);
        if let Some(id) = self.id {
            user.id = id;
        }
        user.avatar = self.avatar;
        user
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chantier/config.toml"))
}

/// Load the user config file, tolerating its absence.
pub fn load_user_config() -> anyhow::Result<UserConfig> {
    let Some(path) = config_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    toml::from_str::<UserConfig>(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))
}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
    fn configured_user(&self) -> Option<ConfiguredUser>;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }

    fn configured_user(&self) -> Option<ConfiguredUser> {
        load_user_config().ok().and_then(|c| c.user)
    }
}

fn resolve_user_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<UserRef> {
    if let Some(name) = cli_flag {
        if !name.trim().is_empty() {
            return Some(UserRef::from_name(name));
        }
    }

    if let Some(name) = env.get("CHANTIER_USER") {
        return Some(UserRef::from_name(&name));
    }

    if let Some(configured) = env.configured_user() {
        return Some(configured.into_user_ref());
    }

    if env.is_tty() {
        if let Some(name) = env.get("USER") {
            return Some(UserRef::from_name(&name));
        }
    }

    None
}

/// Resolve the current user, or `None` when nothing in the chain matches.
#[must_use]
pub fn resolve_user(cli_flag: Option<&str>) -> Option<UserRef> {
    resolve_user_with(cli_flag, &RealEnv)
}

/// Resolve the current user, erroring for mutating commands that need one.
pub fn require_user(cli_flag: Option<&str>) -> Result<UserRef, IdentityError> {
    resolve_user(cli_flag).ok_or_else(|| IdentityError {
        message: "User identity required for this command. \
                  Set --user, CHANTIER_USER, or add [user] to the chantier config."
            .to_string(),
        code: "missing_user",
    })
}
