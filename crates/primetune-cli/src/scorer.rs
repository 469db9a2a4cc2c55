use crate::error::{CliError, Result};
use primetune::core::score::{ScoreError, Scorer};
use std::process::Command;
use tracing::trace;

pub const PARAM_PLACEHOLDER: &str = "{}";

/// Scores a candidate by running an external command and parsing the last
/// non-empty line of its stdout as a floating-point score.
///
/// Every `{}` in the arguments is replaced by the candidate value; when no
/// argument carries the placeholder, the value is appended as the final
/// argument instead.
pub struct CommandScorer {
    program: String,
    args: Vec<String>,
    append_param: bool,
}

impl CommandScorer {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| CliError::ScorerCommand("empty command line".to_string()))?;

        let has_placeholder = args.iter().any(|arg| arg.contains(PARAM_PLACEHOLDER));
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            append_param: !has_placeholder,
        })
    }

    fn args_for(&self, param: u64) -> Vec<String> {
        let value = param.to_string();
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|arg| arg.replace(PARAM_PLACEHOLDER, &value))
            .collect();
        if self.append_param {
            args.push(value);
        }
        args
    }
}

impl Scorer for CommandScorer {
    fn score(&self, param: u64) -> std::result::Result<f64, ScoreError> {
        let args = self.args_for(param);
        trace!(param, program = %self.program, "Invoking scorer command");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                ScoreError::new(param, format!("failed to launch '{}': {e}", self.program))
            })?;

        if !output.status.success() {
            return Err(ScoreError::new(
                param,
                format!("command exited with {}", output.status),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let last_line = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| ScoreError::new(param, "command produced no output"))?;

        last_line.parse::<f64>().map_err(|_| {
            ScoreError::new(
                param,
                format!("could not parse a score from output line '{last_line}'"),
            )
        })
    }
}
