use crate::schema::{Alignment, BarConfig, Geometry, Margins, Position};
use clap::Parser;
use std::path::PathBuf;

/// Command-line overrides.  Every flag is optional; anything left unset
/// keeps the value from the config file (or its default).
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "limebar", version, about = "Markup-driven status bar for wlroots compositors")]
pub struct Cli {
    /// Alternate config file.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bar geometry, e.g. `1920x24+0+0`.  Omitted parts keep their default.
    #[arg(short = 'g', long, value_name = "WxH+X+Y")]
    pub geometry: Option<Geometry>,

    /// Background color (`#RRGGBB` or `#RRGGBBAA`).
    #[arg(short = 'B', long, value_name = "COLOR")]
    pub background: Option<String>,

    /// Add a font, e.g. `"Monospace Bold 12"`.  Repeatable; order is the
    /// index used by `T=` in markup.
    #[arg(short = 'f', long = "font", value_name = "FONT")]
    pub fonts: Vec<String>,

    /// Underline thickness in pixels.
    #[arg(short = 'u', long = "underline", value_name = "PX")]
    pub underline_thickness: Option<i32>,

    /// Horizontal padding on both sides of every segment.
    #[arg(short = 'p', long, value_name = "PX")]
    pub padding: Option<i32>,

    /// Placement of the whole line.
    #[arg(short = 'a', long, value_enum)]
    pub alignment: Option<Alignment>,

    /// Dock at the top or the bottom of the output.
    #[arg(short = 't', long, value_enum)]
    pub position: Option<Position>,

    /// Shorthand for `--position bottom`.
    #[arg(short = 'b', long, conflicts_with = "position")]
    pub bottom: bool,

    /// Margins as `top,right,bottom,left`.
    #[arg(short = 'm', long = "margin", value_name = "T,R,B,L")]
    pub margins: Option<Margins>,

    /// Text drawn between segments.
    #[arg(short = 's', long, value_name = "STRING")]
    pub separator: Option<String>,

    /// Background opacity multiplier (0.0 – 1.0).
    #[arg(short = 'o', long, value_name = "FLOAT")]
    pub opacity: Option<f32>,

    /// Do not parse markup; every line is shown as-is.
    #[arg(short = 'r', long)]
    pub raw: bool,

    /// Default text color for raw mode.
    #[arg(short = 'F', long, value_name = "COLOR")]
    pub text_color: Option<String>,

    /// Underline color when a segment sets neither `U` nor `F`.
    #[arg(short = 'U', long, value_name = "COLOR")]
    pub underline_color: Option<String>,

    /// Layer-shell namespace.
    #[arg(short = 'n', long, value_name = "NAME")]
    pub name: Option<String>,

    /// Keep running after standard input is closed.
    #[arg(short = 'P', long)]
    pub permanent: bool,

    /// Do not reserve an exclusive zone for the bar.
    #[arg(long)]
    pub no_exclusive: bool,
}

impl Cli {
    /// Layer these flags over `config` and normalise the result.
    pub fn apply(self, mut config: BarConfig) -> BarConfig {
        if let Some(geometry) = self.geometry {
            geometry.apply(&mut config.global);
        }
        if let Some(bg) = self.background {
            config.theme.background = bg;
        }
        if !self.fonts.is_empty() {
            config.fonts = self.fonts;
        }
        if let Some(t) = self.underline_thickness {
            config.layout.underline_thickness = t;
        }
        if let Some(p) = self.padding {
            config.layout.padding = p;
        }
        if let Some(a) = self.alignment {
            config.layout.alignment = a;
        }
        if let Some(p) = self.position {
            config.global.position = p;
        }
        if self.bottom {
            config.global.position = Position::Bottom;
        }
        if let Some(m) = self.margins {
            config.layout.margins = m;
        }
        if let Some(s) = self.separator {
            config.layout.separator = Some(s);
        }
        if let Some(o) = self.opacity {
            config.global.opacity = o;
        }
        if self.raw {
            config.global.raw = true;
        }
        if let Some(c) = self.text_color {
            config.theme.text_color = c;
        }
        if let Some(c) = self.underline_color {
            config.theme.underline_color = c;
        }
        if let Some(n) = self.name {
            config.global.namespace = n;
        }
        if self.permanent {
            config.global.permanent = true;
        }
        if self.no_exclusive {
            config.global.exclusive_zone = false;
        }
        config.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("limebar").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_file_values() {
        let cli = parse(&[
            "-g", "1280x30+0+0", "-B", "#102030", "-f", "Sans 9", "-f", "Serif 9",
            "-a", "right", "-m", "1,2,3,4", "-s", " | ", "-o", "0.5", "-r", "-b",
        ]);
        let cfg = cli.apply(BarConfig::default());

        assert_eq!((cfg.global.width, cfg.global.height), (1280, 30));
        assert_eq!(cfg.theme.background, "#102030");
        assert_eq!(cfg.fonts, vec!["Sans 9", "Serif 9"]);
        assert_eq!(cfg.layout.alignment, Alignment::Right);
        assert_eq!(cfg.layout.margins, Margins { top: 1, right: 2, bottom: 3, left: 4 });
        assert_eq!(cfg.layout.separator.as_deref(), Some(" | "));
        assert_eq!(cfg.global.opacity, 0.5);
        assert!(cfg.global.raw);
        assert_eq!(cfg.global.position, Position::Bottom);
    }

    #[test]
    fn no_flags_keeps_config() {
        let mut base = BarConfig::default();
        base.layout.padding = 4;
        let cfg = parse(&[]).apply(base.clone());
        assert_eq!(cfg, base);
    }

    #[test]
    fn opacity_is_clamped() {
        let cfg = parse(&["-o", "7"]).apply(BarConfig::default());
        assert_eq!(cfg.global.opacity, 1.0);
    }

    #[test]
    fn malformed_margin_is_a_usage_error() {
        let res = Cli::try_parse_from(["limebar", "-m", "1,2"]);
        assert!(res.is_err());
    }
}
