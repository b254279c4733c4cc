use std::path::PathBuf;

use clap::Parser;
use transitions::Transition;

#[derive(Parser, Debug)]
#[command(
    name = "hoverdrift",
    author,
    version,
    about = "GPU hover-transition gallery demo"
)]
pub struct Cli {
    /// Gallery manifest (TOML) listing the hoverable items and their images.
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Transition variant, overriding the manifest (`perlin`, `fly-eye`,
    /// `glitch-displace`, `smooth-fade`, `rgb-shift`).
    #[arg(long, value_name = "VARIANT", value_parser = parse_transition)]
    pub transition: Option<Transition>,

    /// Window size, overriding the manifest (e.g. `1280x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Log filter, overriding the `RUST_LOG` environment variable
    /// (e.g. `debug` or `effect=trace`).
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

fn parse_transition(value: &str) -> Result<Transition, String> {
    value.parse().map_err(|err| format!("{err}"))
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("window size must be non-zero, got '{value}'"));
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_manifest_and_overrides() {
        let cli = Cli::try_parse_from([
            "hoverdrift",
            "gallery.toml",
            "--transition",
            "rgb-shift",
            "--size",
            "800x600",
        ])
        .expect("valid arguments parse");
        assert_eq!(cli.manifest, PathBuf::from("gallery.toml"));
        assert_eq!(cli.transition, Some(Transition::RgbShift));
        assert_eq!(cli.size, Some((800, 600)));
    }

    #[test]
    fn overrides_are_optional() {
        let cli = Cli::try_parse_from(["hoverdrift", "g.toml"]).expect("manifest alone parses");
        assert!(cli.transition.is_none());
        assert!(cli.size.is_none());
    }

    #[test]
    fn rejects_unknown_variants_and_bad_sizes() {
        assert!(Cli::try_parse_from(["hoverdrift", "g.toml", "--transition", "ripple"]).is_err());
        assert!(Cli::try_parse_from(["hoverdrift", "g.toml", "--size", "800"]).is_err());
        assert!(Cli::try_parse_from(["hoverdrift", "g.toml", "--size", "0x600"]).is_err());
    }
}
