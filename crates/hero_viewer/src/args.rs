use std::path::PathBuf;

const USAGE: &str = "usage: hero_viewer [CONFIG.json] [--asset-root DIR] [--reduced-motion] [--step] [--coarse-pointer]";

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerArgs {
    pub config_path: Option<PathBuf>,
    pub asset_root: PathBuf,
    pub reduced_motion: bool,
    /// Force the wheel-driven step interaction.
    pub step: bool,
    /// Pretend the primary pointer is touch.
    pub coarse_pointer: bool,
}

impl Default for ViewerArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            asset_root: PathBuf::from("assets"),
            reduced_motion: false,
            step: false,
            coarse_pointer: false,
        }
    }
}

impl ViewerArgs {
    /// Parse everything after the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--asset-root" => {
                    let dir = args
                        .next()
                        .ok_or_else(|| format!("--asset-root needs a directory\n{USAGE}"))?;
                    parsed.asset_root = PathBuf::from(dir);
                }
                "--reduced-motion" => parsed.reduced_motion = true,
                "--step" => parsed.step = true,
                "--coarse-pointer" => parsed.coarse_pointer = true,
                "-h" | "--help" => return Err(USAGE.to_string()),
                flag if flag.starts_with("--") => {
                    return Err(format!("unknown flag {flag}\n{USAGE}"));
                }
                path => {
                    if parsed.config_path.is_some() {
                        return Err(format!("more than one config path given\n{USAGE}"));
                    }
                    parsed.config_path = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ViewerArgs, String> {
        ViewerArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(parse(&[]).expect("parse"), ViewerArgs::default());
    }

    #[test]
    fn flags_and_config_path() {
        let args = parse(&["hero.json", "--asset-root", "public", "--step", "--reduced-motion"])
            .expect("parse");
        assert_eq!(args.config_path, Some(PathBuf::from("hero.json")));
        assert_eq!(args.asset_root, PathBuf::from("public"));
        assert!(args.step);
        assert!(args.reduced_motion);
        assert!(!args.coarse_pointer);
    }

    #[test]
    fn rejects_unknown_flags_and_missing_values() {
        assert!(parse(&["--fast"]).expect_err("unknown").contains("unknown flag"));
        assert!(parse(&["--asset-root"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
