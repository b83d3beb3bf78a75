use antpos::reference::CminfoSettings;
use antpos::utils::ConfigError;
use antpos::{ArrayCenter, Config, OutputFrame, ReferenceConfig, UtmZone};
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::path::PathBuf;

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

fn command() -> Command {
    Command::new("antpos")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts surveyed antenna UTM positions to ENU coordinates about the center of array")
        .color(ColorChoice::Auto)
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("JSON configuration file. Command line flags override its values."))
        .arg(Arg::new("antennas")
            .short('a')
            .long("antennas")
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Antenna survey list: `name easting northing elevation` per line.
Defaults to HERA_350.txt"))
        .arg(Arg::new("output")
            .short('o')
            .long("output")
            .value_name("FILE")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Output JSON file, `-` for stdout.
Defaults to HERA_350_ENU.json (HERA_350_ECEF.json with --frame ecef)"))
        .arg(Arg::new("zone")
            .short('z')
            .long("zone")
            .value_name("ZONE")
            .value_parser(|s: &str| s.parse::<UtmZone>().map_err(|e| e.to_string()))
            .help("UTM zone and latitude band of the survey, for example 34J"))
        .arg(Arg::new("frame")
            .short('f')
            .long("frame")
            .value_name("FRAME")
            .value_parser(|s: &str| s.parse::<OutputFrame>().map_err(|e| e.to_string()))
            .help("Output frame: enu (default) or ecef"))
        .arg(Arg::new("pretty")
            .short('p')
            .long("pretty")
            .action(ArgAction::SetTrue)
            .help("Pretty print the JSON output"))
        .next_help_heading("Center of array")
        .arg(Arg::new("cofa")
            .long("cofa")
            .value_name("LAT,LON,ALT")
            .allow_hyphen_values(true)
            .conflicts_with_all(["redis", "cminfo-key"])
            .value_parser(|s: &str| s.parse::<ArrayCenter>().map_err(|e| e.to_string()))
            .help("Use this center of array (degrees, degrees, meters) instead of the key-value cache"))
        .arg(Arg::new("redis")
            .long("redis")
            .value_name("URL")
            .help("Key-value cache URL. Defaults to redis://redishost:6379"))
        .arg(Arg::new("cminfo-key")
            .long("cminfo-key")
            .value_name("KEY")
            .help("Hash holding cofa_lat, cofa_lon and cofa_alt. Defaults to cminfo"))
        .next_help_heading("General")
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .help("Only report warnings and errors"))
        .arg(Arg::new("dump-config")
            .long("dump-config")
            .action(ArgAction::SetTrue)
            .help("Print the effective configuration as JSON and exit"))
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: command().get_matches(),
        }
    }

    #[cfg(test)]
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self {
            matches: command().try_get_matches_from(args)?,
        })
    }

    pub fn quiet(&self) -> bool {
        self.matches.get_flag("quiet")
    }

    pub fn dump_config(&self) -> bool {
        self.matches.get_flag("dump-config")
    }

    /// Configuration file contents (or defaults) with command line overrides applied
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = match self.matches.get_one::<PathBuf>("config") {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(path) = self.matches.get_one::<PathBuf>("antennas") {
            config.antenna_file = path.clone();
        }
        if let Some(path) = self.matches.get_one::<PathBuf>("output") {
            config.output_file = Some(path.clone());
        }
        if let Some(zone) = self.matches.get_one::<UtmZone>("zone") {
            config.utm_zone = *zone;
        }
        if let Some(frame) = self.matches.get_one::<OutputFrame>("frame") {
            config.frame = *frame;
        }
        if self.matches.get_flag("pretty") {
            config.pretty = true;
        }

        if let Some(cofa) = self.matches.get_one::<ArrayCenter>("cofa") {
            config.reference = ReferenceConfig::Static(*cofa);
        } else {
            let url = self.matches.get_one::<String>("redis");
            let key = self.matches.get_one::<String>("cminfo-key");
            if url.is_some() || key.is_some() {
                let mut settings = match &config.reference {
                    ReferenceConfig::Cminfo(settings) => settings.clone(),
                    ReferenceConfig::Static(_) => CminfoSettings::default(),
                };
                if let Some(url) = url {
                    settings.url = url.clone();
                }
                if let Some(key) = key {
                    settings.key = key.clone();
                }
                config.reference = ReferenceConfig::Cminfo(settings);
            }
        }

        config.validate()?;
        Ok(config)
    }
}
