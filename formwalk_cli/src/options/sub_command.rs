use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// walk the form, fill it with throwaway answers and print its questions.
    EXTRACT {
        /// Where to save the extracted questions.
        #[clap(short, long)]
        output: Option<PathBuf>,
        /// Print only, do not write the questions to disk.
        #[clap(long, conflicts_with = "output")]
        no_save: bool,
    },
    /// print questions saved by a previous extract.
    SHOW {
        /// The saved questions file.
        #[clap(long)]
        path: Option<PathBuf>,
    },
}
