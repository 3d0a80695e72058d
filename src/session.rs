//! The interactive form: pick a data source once, then answer question
//! submissions until the user quits.

use crate::config::ChatConfig;
use crate::error::Result;
use crate::loader::DataSource;
use crate::retriever::Retriever;
use crate::utils::split_queries;
use std::io::{BufRead, Write};

pub struct ChatSession {
    config: ChatConfig,
}

impl ChatSession {
    pub fn new(config: ChatConfig) -> Self {
        ChatSession { config }
    }

    /// Run the form over `input`/`output`.
    ///
    /// A bundle that fails to load ends the session with that error; search
    /// failures only affect the answers of their own submission.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        let mut line = String::new();

        write!(
            output,
            "Data source (URL or path) [{}]: ",
            self.config.data_path.display()
        )?;
        output.flush()?;
        if input.read_line(&mut line)? == 0 {
            return Ok(());
        }

        let source = DataSource::parse(&line, &self.config);
        let retriever = match source.load() {
            Ok(bundle) => {
                writeln!(output, "Data loaded: {} entries.", bundle.len())?;
                Retriever::new(bundle)
            }
            Err(e) => {
                writeln!(output, "Failed to load data: {}", e)?;
                return Err(e);
            }
        };

        let delimiter = self.config.delimiter;
        loop {
            write!(output, "\nQuestions (separate with '{}'): ", delimiter)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break; // EOF (Ctrl+D)
            }

            let submission = line.trim_end_matches(['\r', '\n']);
            if matches!(submission.trim(), ":q" | ":quit") {
                break;
            }

            let queries = split_queries(submission, delimiter);
            if queries.is_empty() {
                writeln!(output, "Enter at least one question.")?;
                continue;
            }

            tracing::debug!("Answering {} question(s)", queries.len());
            for response in retriever.answer(&queries, self.config.top_k) {
                writeln!(output, "\n{}", response)?;
            }
        }

        Ok(())
    }
}
