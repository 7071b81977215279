use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Read questions from stdin, one per line, until EOF or `exit`
    Repl,
}
