//! Handle the color theme
use ratatui::style::{Color, Modifier, Style};

use crate::options::AutoCompleteOptions;

/// The color scheme of the field and its suggestion list
///
/// <pre>
/// > ap            --> prompt & query
/// +------------+
/// | Apple      |  --> current & current_match
/// |------------|  --> separator
/// | Apricot    |  --> suggestion & matched
/// +------------+
/// </pre>
#[derive(Copy, Clone, Debug, Default)]
pub struct ColorTheme {
    /// The text field and general text
    pub normal: Style,
    /// Suggestion rows that are not highlighted
    pub suggestion: Style,
    /// Matched text on suggestion rows
    pub matched: Style,
    /// Highlighted suggestion row, non-matched text
    pub current: Style,
    /// Highlighted suggestion row, matched text
    pub current_match: Style,
    /// Separator lines between rows
    pub separator: Style,
    /// Query text
    pub query: Style,
    /// Prompt prefix
    pub prompt: Style,
    /// Field border
    pub border: Style,
}

impl ColorTheme {
    /// Setup the theme from the options
    pub fn init_from_options(options: &AutoCompleteOptions) -> ColorTheme {
        if let Some(color) = options.color.as_deref() {
            ColorTheme::from_options(color)
        } else {
            match std::env::var_os("NO_COLOR") {
                Some(no_color) if !no_color.is_empty() => ColorTheme::none(),
                _ => ColorTheme::dark256(),
            }
        }
    }

    fn none() -> Self {
        Self {
            current: Style::default().bold(),
            ..ColorTheme::default()
        }
    }

    fn bw() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            matched: base.matched.underlined(),
            current: base.current.reversed(),
            current_match: base.current_match.reversed().underlined(),
            separator: base.separator.dim(),
            ..base
        }
    }

    fn default16() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            suggestion: base.suggestion.bg(Color::Black),
            matched: base.matched.fg(Color::Green).bg(Color::Black),
            current: base.current.fg(Color::Yellow).bg(Color::DarkGray),
            current_match: base.current_match.fg(Color::Green).bg(Color::DarkGray),
            separator: base.separator.fg(Color::DarkGray).bg(Color::Black),
            prompt: base.prompt.fg(Color::Blue),
            border: base.border.fg(Color::Black),
            ..base
        }
    }

    fn dark256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            suggestion: base.suggestion.bg(Color::Indexed(235)),
            matched: base.matched.fg(Color::Indexed(108)).bg(Color::Indexed(235)),
            current: base.current.bg(Color::Indexed(238)),
            current_match: base.current_match.fg(Color::Indexed(151)).bg(Color::Indexed(238)),
            separator: base.separator.fg(Color::Indexed(59)).bg(Color::Indexed(235)),
            prompt: base.prompt.fg(Color::Indexed(110)),
            border: base.border.fg(Color::Indexed(59)),
            ..base
        }
    }

    fn light256() -> Self {
        let base = ColorTheme::none();
        ColorTheme {
            suggestion: base.suggestion.bg(Color::Indexed(254)),
            matched: base.matched.fg(Color::Indexed(0)).bg(Color::Indexed(220)),
            current: base.current.bg(Color::Indexed(251)),
            current_match: base.current_match.fg(Color::Indexed(66)).bg(Color::Indexed(251)),
            separator: base.separator.fg(Color::Indexed(145)).bg(Color::Indexed(254)),
            prompt: base.prompt.fg(Color::Indexed(25)),
            border: base.border.fg(Color::Indexed(145)),
            ..base
        }
    }

    fn set_color(&mut self, name: &str, spec: &str) {
        let spec_parts: Vec<_> = spec.split(['+', ':']).collect();

        let raw_color = spec_parts[0];
        let new_color = if raw_color.len() == 7 && raw_color.starts_with('#') {
            let r = u8::from_str_radix(&raw_color[1..3], 16).unwrap_or(255);
            let g = u8::from_str_radix(&raw_color[3..5], 16).unwrap_or(255);
            let b = u8::from_str_radix(&raw_color[5..7], 16).unwrap_or(255);
            Some(Color::Rgb(r, g, b))
        } else {
            raw_color.parse::<u8>().ok().map(Color::Indexed).or_else(|| {
                debug!("Unknown color '{raw_color}'");
                None
            })
        };

        let mut modifier = Modifier::empty();
        for part in spec_parts.iter().skip(1) {
            modifier |= parse_modifier(part).unwrap_or_else(|| {
                debug!("Unknown modifier '{part}'");
                Modifier::empty()
            });
        }

        let (component_name, layer) = if let Some(n) = name.strip_suffix("_fg").or(name.strip_suffix("-fg")) {
            (n, "fg")
        } else if let Some(n) = name.strip_suffix("_bg").or(name.strip_suffix("-bg")) {
            (n, "bg")
        } else if name == "bg" {
            ("", "bg")
        } else {
            (name, "fg")
        };

        let target = match component_name {
            "" | "normal" => &mut self.normal,
            "suggestion" | "row" => &mut self.suggestion,
            "matched" | "hl" => &mut self.matched,
            "current" | "fg+" => &mut self.current,
            "bg+" => {
                set_style(&mut self.current, "bg", new_color, modifier);
                return;
            }
            "current_match" | "hl+" => &mut self.current_match,
            "separator" => &mut self.separator,
            "query" => &mut self.query,
            "prompt" => &mut self.prompt,
            "border" => &mut self.border,
            other => {
                debug!("Unknown theme component '{other}'");
                return;
            }
        };
        set_style(target, layer, new_color, modifier);
    }

    /// Builds a theme from a `--color` string: a base palette name and/or `name:color` pairs
    pub fn from_options(color: &str) -> Self {
        let mut theme = ColorTheme::dark256();
        for pair in color.split(',') {
            if let Some((name, spec)) = pair.split_once(':') {
                theme.set_color(name, spec);
            } else {
                theme = match pair {
                    "light" => ColorTheme::light256(),
                    "16" => ColorTheme::default16(),
                    "bw" => ColorTheme::bw(),
                    "none" | "empty" => ColorTheme::none(),
                    "dark" | "default" => ColorTheme::dark256(),
                    t => {
                        debug!("Unknown color theme '{t}'");
                        ColorTheme::dark256()
                    }
                };
            }
        }
        theme
    }
}

/// Parses one text modifier name, long or short form
pub(crate) fn parse_modifier(name: &str) -> Option<Modifier> {
    Some(match name {
        "x" | "regular" => Modifier::empty(),
        "b" | "bold" => Modifier::BOLD,
        "u" | "underlined" => Modifier::UNDERLINED,
        "c" | "crossed-out" => Modifier::CROSSED_OUT,
        "d" | "dim" => Modifier::DIM,
        "i" | "italic" => Modifier::ITALIC,
        "r" | "reverse" => Modifier::REVERSED,
        _ => return None,
    })
}

fn set_style(s: &mut Style, layer: &str, color: Option<Color>, modifier: Modifier) {
    if let Some(c) = color {
        *s = match layer {
            "fg" => s.fg(c),
            "bg" => s.bg(c),
            _ => *s,
        }
    }
    *s = s.add_modifier(modifier);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_themes() {
        let none = ColorTheme::none();
        assert!(none.current.add_modifier.contains(Modifier::BOLD));
        assert_eq!(none.suggestion, Style::default());

        let bw = ColorTheme::bw();
        assert!(bw.matched.add_modifier.contains(Modifier::UNDERLINED));
        assert!(bw.current.add_modifier.contains(Modifier::REVERSED));

        let dark = ColorTheme::dark256();
        assert_eq!(dark.matched.fg, Some(Color::Indexed(108)));
        assert_eq!(dark.current.bg, Some(Color::Indexed(238)));

        let light = ColorTheme::from_options("light");
        assert_eq!(light.matched.bg, Some(Color::Indexed(220)));

        let theme_16 = ColorTheme::from_options("16");
        assert_eq!(theme_16.matched.fg, Some(Color::Green));
    }

    #[test]
    fn color_overrides() {
        let theme = ColorTheme::from_options("matched:108");
        assert_eq!(theme.matched.fg, Some(Color::Indexed(108)));

        let theme = ColorTheme::from_options("prompt:#00ff00");
        assert_eq!(theme.prompt.fg, Some(Color::Rgb(0, 255, 0)));

        let theme = ColorTheme::from_options("separator_bg:17");
        assert_eq!(theme.separator.bg, Some(Color::Indexed(17)));

        let theme = ColorTheme::from_options("bg+:236");
        assert_eq!(theme.current.bg, Some(Color::Indexed(236)));
    }

    #[test]
    fn base_then_overrides() {
        let theme = ColorTheme::from_options("bw,matched:1:bold");
        assert!(theme.current.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(theme.matched.fg, Some(Color::Indexed(1)));
        assert!(theme.matched.add_modifier.contains(Modifier::BOLD));
        assert!(theme.matched.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn modifier_shortcuts() {
        assert_eq!(parse_modifier("b"), Some(Modifier::BOLD));
        assert_eq!(parse_modifier("italic"), Some(Modifier::ITALIC));
        assert_eq!(parse_modifier("regular"), Some(Modifier::empty()));
        assert_eq!(parse_modifier("sparkly"), None);
    }

    #[test]
    fn unknown_entries_are_ignored() {
        let theme = ColorTheme::from_options("nope:108,matched:notacolor");
        let dark = ColorTheme::dark256();
        assert_eq!(theme.matched, dark.matched);
        assert_eq!(theme.normal, dark.normal);
    }
}
