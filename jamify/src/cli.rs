use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "jamify", version, about = "Play a GIF in time with the beats you tap")]
pub struct Cli {
    /// GIF files to play (F9 moves to the next one)
    pub gifs: Vec<PathBuf>,

    /// Delay between frame scheduling ticks in ms
    #[arg(long)]
    pub render_delay_ms: Option<f64>,

    /// Loop duration in ms used before any beats are tapped
    #[arg(long)]
    pub loop_ms: Option<f64>,

    /// Average only the most recent N tap gaps
    #[arg(long)]
    pub max_taps: Option<usize>,

    /// Write the log here instead of .jamify/jamify.log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_flags() {
        let cli = Cli::parse_from(["jamify", "a.gif", "b.gif", "--loop-ms", "480", "-vv"]);
        assert_eq!(cli.gifs, vec![PathBuf::from("a.gif"), PathBuf::from("b.gif")]);
        assert_eq!(cli.loop_ms, Some(480.0));
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_file.is_none());
    }
}
