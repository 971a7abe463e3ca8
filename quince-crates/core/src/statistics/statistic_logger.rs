use std::fmt::Display;

use itertools::Itertools;

use super::statistic_logging::log_statistic;

/// Logs statistics under a prefix, e.g. `engine_arc_propagations`.
#[derive(Debug, Default, Clone)]
pub struct StatisticLogger {
    /// The prefix which will be attached to the statistic name.
    name_prefix: String,
}

impl StatisticLogger {
    pub fn new<Part: Display>(name_prefix: impl IntoIterator<Item = Part>) -> Self {
        Self {
            name_prefix: name_prefix.into_iter().join("_"),
        }
    }

    pub fn attach_to_prefix(&self, addition_to_prefix: impl Display) -> Self {
        if self.name_prefix.is_empty() {
            return StatisticLogger::new([addition_to_prefix]);
        }

        Self {
            name_prefix: format!("{}_{addition_to_prefix}", self.name_prefix),
        }
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }
}

impl std::fmt::Write for StatisticLogger {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        log_statistic(&self.name_prefix, s);
        Ok(())
    }
}
