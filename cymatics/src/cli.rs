use clap::{Parser, Subcommand};
use cymatics::{ChladniMode, Config};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (built-in presets when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the standing-wave interference panels
    Chladni {
        /// Mode pair such as 7x11; repeat to replace the presets
        #[arg(long = "mode", value_name = "NxM")]
        modes: Vec<ChladniMode>,
    },
    /// Render the rotating potential with its field streamlines
    Anode {
        /// Angular order: 1 vortex, 2 double helix, 4 octopole
        #[arg(long)]
        mode: Option<u32>,
    },
    /// Render both figures with the configured settings
    All,
}

/// Fold command-line overrides into a parsed config. Validation runs after
/// this, so a flag can fill in what the file leaves empty.
pub fn apply_args(config: &mut Config, args: &Args) {
    if let Some(dir) = &args.output {
        config.output.dir = dir.clone();
    }
    match &args.command {
        Command::Chladni { modes } if !modes.is_empty() => {
            config.chladni.modes = modes.clone();
        }
        Command::Anode { mode: Some(mode) } => config.anode.mode = *mode,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cymatics::chladni::default_modes;

    fn applied(config: &mut Config, argv: &[&str]) {
        let args = Args::parse_from(argv);
        apply_args(config, &args);
    }

    #[test]
    fn repeated_mode_replaces_the_presets() {
        let mut config = Config::default();
        applied(&mut config, &["cymatics", "chladni", "--mode", "2x3", "--mode", "4,9"]);
        assert_eq!(
            config.chladni.modes,
            vec![ChladniMode::new(2, 3), ChladniMode::new(4, 9)]
        );
    }

    #[test]
    fn chladni_without_modes_keeps_the_config() {
        let mut config = Config::default();
        applied(&mut config, &["cymatics", "chladni"]);
        assert_eq!(config.chladni.modes, default_modes());
    }

    #[test]
    fn anode_mode_overrides() {
        let mut config = Config::default();
        applied(&mut config, &["cymatics", "anode", "--mode", "4"]);
        assert_eq!(config.anode.mode, 4);

        applied(&mut config, &["cymatics", "anode"]);
        assert_eq!(config.anode.mode, 4);
    }

    #[test]
    fn output_overrides_the_directory() {
        let mut config = Config::default();
        applied(&mut config, &["cymatics", "all", "--output", "figures/run1"]);
        assert_eq!(config.output.dir, PathBuf::from("figures/run1"));
        applied(&mut config, &["cymatics", "--output", "elsewhere", "anode"]);
        assert_eq!(config.output.dir, PathBuf::from("elsewhere"));
    }

    #[test]
    fn command_line_modes_fill_an_empty_file_list() {
        let mut config = Config::parse_toml("[chladni]\nmodes = []").unwrap();
        applied(&mut config, &["cymatics", "chladni", "--mode", "2x3"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.chladni.modes, vec![ChladniMode::new(2, 3)]);
    }

    #[test]
    fn bad_mode_is_a_parse_error() {
        assert!(Args::try_parse_from(["cymatics", "chladni", "--mode", "7"]).is_err());
    }
}
