use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;
use std::path::PathBuf;

const ABOUT: &str = "Weather board for Norwegian cities";

const LONG_ABOUT: &str = "
TUI showing the current weather and a two day forecast for one of ten Norwegian cities, sourced
from the met.no Locationforecast API.

The city is given by its key (oslo, bergen, trondheim, stavanger, tromso, bodo, kristiansand,
alesund, fredrikstad, drammen). Press `c` to pick another city, `r` to refresh and `q` to quit.

A QR code on screen links to the mobile city picker. Opening that link (or passing `--mobile`)
shows the picker at startup.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City key (e.g. oslo, bergen, tromso)")]
    pub city: Option<String>,

    #[arg(long, help = "Path to the config file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Open the city picker at startup")]
    pub mobile: bool,

    #[arg(long, value_name = "URL", help = "Deep link of the form <base>?mobile=true&city=<key>")]
    pub link: Option<String>,

    #[arg(long, help = "Print one snapshot as text and exit")]
    pub print: bool,

    #[arg(long, help = "List the known cities and exit")]
    pub list_cities: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args() {
        Args::command().debug_assert();

        let args = Args::parse_from(["yrboard", "bergen", "--print"]);
        assert_eq!(args.city.as_deref(), Some("bergen"));
        assert!(args.print);
        assert!(!args.mobile);

        let args = Args::parse_from([
            "yrboard",
            "--link",
            "https://example.org/?mobile=true&city=bodo",
        ]);
        assert_eq!(args.city, None);
        assert!(args.link.is_some());
    }
}
