//! Startup banner.

use console::style;

const LOGO: &str = r"
     _       _
  __| |_   _(_) ___  _   _ _ __
 / _` | | | | |/ _ \| | | | '__|
| (_| | |_| | | (_) | |_| | |
 \__,_|\__,_|/ |\___/ \__,_|_|
           |__/";

/// Print the banner to stderr so stdout stays free for command output.
pub fn print(url: &str) {
    eprintln!("{}", style(LOGO).cyan().bold());
    eprintln!(
        "  {} v{}  {}",
        style("dujour").bold(),
        env!("CARGO_PKG_VERSION"),
        style(url).green()
    );
    eprintln!();
}
