//! Placeholder substitution and chat colors for arrival notifications.
//!
//! Templates use `$(key)` tokens. Only the five keys in [`Substitutions`]
//! are recognised; any other token is copied through verbatim, so a typo
//! in a user-edited template shows up in the output instead of failing.

/// Opening delimiter of a placeholder token.
const TOKEN_OPEN: &str = "$(";

/// Closing delimiter of a placeholder token.
const TOKEN_CLOSE: char = ')';

/// ANSI SGR sequence that resets all attributes.
pub const ANSI_RESET: &str = "\u{1b}[0m";

/// The sixteen classic chat colors a template may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// `black`
    Black,
    /// `dark_blue`
    DarkBlue,
    /// `dark_green`
    DarkGreen,
    /// `dark_aqua`
    DarkAqua,
    /// `dark_red`
    DarkRed,
    /// `dark_purple`
    DarkPurple,
    /// `gold`
    Gold,
    /// `gray`
    Gray,
    /// `dark_gray`
    DarkGray,
    /// `blue`
    Blue,
    /// `green`
    Green,
    /// `aqua`
    Aqua,
    /// `red`
    Red,
    /// `light_purple`
    LightPurple,
    /// `yellow`
    Yellow,
    /// `white`, also the fallback for unknown names.
    #[default]
    White,
}

impl Color {
    /// Every color, in palette order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// Look up a color by name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.name().eq_ignore_ascii_case(wanted))
    }

    /// Look up a color by name, falling back to [`Color::White`].
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::debug!(color = name, "unknown color name, using white");
            Self::default()
        })
    }

    /// The lowercase name used in template files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkBlue => "dark_blue",
            Self::DarkGreen => "dark_green",
            Self::DarkAqua => "dark_aqua",
            Self::DarkRed => "dark_red",
            Self::DarkPurple => "dark_purple",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Aqua => "aqua",
            Self::Red => "red",
            Self::LightPurple => "light_purple",
            Self::Yellow => "yellow",
            Self::White => "white",
        }
    }

    /// ANSI SGR escape selecting this color on a terminal.
    pub const fn ansi_code(self) -> &'static str {
        match self {
            Self::Black => "\u{1b}[30m",
            Self::DarkBlue => "\u{1b}[34m",
            Self::DarkGreen => "\u{1b}[32m",
            Self::DarkAqua => "\u{1b}[36m",
            Self::DarkRed => "\u{1b}[31m",
            Self::DarkPurple => "\u{1b}[35m",
            Self::Gold => "\u{1b}[33m",
            Self::Gray => "\u{1b}[37m",
            Self::DarkGray => "\u{1b}[90m",
            Self::Blue => "\u{1b}[94m",
            Self::Green => "\u{1b}[92m",
            Self::Aqua => "\u{1b}[96m",
            Self::Red => "\u{1b}[91m",
            Self::LightPurple => "\u{1b}[95m",
            Self::Yellow => "\u{1b}[93m",
            Self::White => "\u{1b}[97m",
        }
    }
}

impl core::fmt::Display for Color {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Values for the placeholders an arrival notification may use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    /// `$(player)`: display name of the arriving member.
    pub player: String,
    /// `$(date)`: date of the previous departure.
    pub date: String,
    /// `$(time)`: time of day of the previous departure.
    pub time: String,
    /// `$(since)`: time elapsed since the previous departure.
    pub since: String,
    /// `$(server)`: address of the scope.
    pub server: String,
}

impl Substitutions {
    /// Value for placeholder `key`, if it is one of the known keys.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "player" => Some(&self.player),
            "date" => Some(&self.date),
            "time" => Some(&self.time),
            "since" => Some(&self.since),
            "server" => Some(&self.server),
            _ => None,
        }
    }
}

/// Replace every known `$(key)` token in `template`.
///
/// Substituted values are not rescanned. Unknown keys and an unterminated
/// `$(` are copied through unchanged.
pub fn render(template: &str, substitutions: &Substitutions) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(TOKEN_OPEN) {
        let (literal, token) = rest.split_at(start);
        out.push_str(literal);

        let after_open = token.strip_prefix(TOKEN_OPEN).unwrap_or(token);
        match after_open
            .split_once(TOKEN_CLOSE)
            .and_then(|(key, tail)| substitutions.get(key).map(|value| (value, tail)))
        {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                // Not a known token; keep the opener and scan on from just after it.
                out.push_str(TOKEN_OPEN);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
