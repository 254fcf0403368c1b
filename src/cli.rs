use std::path::PathBuf;

use clap::Parser;

use crate::config::AppConfig;

/// Command-line flags. Anything given here wins over the environment.
#[derive(Debug, Parser)]
#[command(name = "squares-api")]
#[command(about = "CRUD HTTP service for squares")]
#[command(version)]
pub struct ServeArgs {
    #[arg(long, short, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Serve without token checks on POST/PUT/DELETE /squares")]
    pub no_auth: bool,

    #[arg(long, help = "Directory holding the static HTML pages (overrides STATIC_DIR)")]
    pub static_dir: Option<PathBuf>,
}

impl ServeArgs {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.no_auth {
            config.security.auth_enabled = false;
        }
        if let Some(dir) = self.static_dir {
            config.server.static_dir = dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::development();
        ServeArgs::try_parse_from(["squares-api", "--port", "8080", "--no-auth", "--static-dir", "/srv/pages"])
            .unwrap()
            .apply(&mut config);

        assert_eq!(config.server.port, 8080);
        assert!(!config.security.auth_enabled);
        assert_eq!(config.server.static_dir, PathBuf::from("/srv/pages"));
    }

    #[test]
    fn no_flags_keep_config() {
        let mut config = AppConfig::development();
        ServeArgs::try_parse_from(["squares-api"]).unwrap().apply(&mut config);

        assert_eq!(config.server.port, 3000);
        assert!(config.security.auth_enabled);
    }
}
