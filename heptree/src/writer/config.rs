use std::fs;
use std::path::Path;
use regex::Regex;
use serde::{Serialize, Deserialize};
use tracing::{debug, error};

use crate::writer::error::{TreeWriterError, TreeWriterResult};

/// One `(input array, branch name, class name)` triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchConfig {
    pub input_array: String,
    pub branch_name: String,
    pub class_name: String,
}

impl BranchConfig {
    pub fn new(input_array: &str, branch_name: &str, class_name: &str) -> Self {
        BranchConfig {
            input_array: input_array.to_string(),
            branch_name: branch_name.to_string(),
            class_name: class_name.to_string(),
        }
    }
}

/// Writer configuration: the ordered branch list and how events are processed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeWriterConfig {
    pub branches: Vec<BranchConfig>,
    /// Project the branches of one event in parallel.
    pub parallel: bool,
    /// Size of a dedicated thread pool; 0 uses the global rayon pool.
    pub num_threads: usize,
}

impl Default for TreeWriterConfig {
    fn default() -> Self {
        TreeWriterConfig { branches: Vec::new(), parallel: true, num_threads: 0 }
    }
}

impl TreeWriterConfig {
    pub fn from_json_str(json: &str) -> TreeWriterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> TreeWriterResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reads branch definitions from detector-card text.
    ///
    /// Only lines of the form `add Branch <input> <name> <class>` are used;
    /// everything after `#` is a comment. A line starting with `add Branch`
    /// that does not have exactly three arguments is logged and skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use heptree::writer::config::TreeWriterConfig;
    ///
    /// let card = "
    ///   set EnergyWeight 1.0   # unrelated setting
    ///   add Branch Delphes/allParticles Particle GenParticle
    ///   add Branch UniqueObjectFinder/jets Jet Jet
    /// ";
    /// let config = TreeWriterConfig::from_card_str(card).unwrap();
    /// assert_eq!(config.branches.len(), 2);
    /// assert_eq!(config.branches[1].branch_name, "Jet");
    /// ```
    pub fn from_card_str(card: &str) -> TreeWriterResult<Self> {
        let definition = Regex::new(r"^\s*add\s+Branch\s+(\S+)\s+(\S+)\s+(\S+)\s*$")?;
        let keyword = Regex::new(r"^\s*add\s+Branch\b")?;

        let mut config = TreeWriterConfig::default();

        for (number, raw) in card.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or("");

            if let Some(caps) = definition.captures(line) {
                config = config.add_branch(&caps[1], &caps[2], &caps[3]);
            } else if keyword.is_match(line) {
                let err = TreeWriterError::MalformedCardLine { line: number + 1, text: line.trim().to_string() };
                error!("** ERROR: {}", err);
            }
        }

        debug!("read {} branch definitions from card", config.branches.len());
        Ok(config)
    }

    pub fn from_card_file(path: &Path) -> TreeWriterResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_card_str(&text)
    }

    pub fn add_branch(mut self, input_array: &str, branch_name: &str, class_name: &str) -> Self {
        self.branches.push(BranchConfig::new(input_array, branch_name, class_name));
        self
    }

    pub fn with_threads(mut self, parallel: bool, num_threads: usize) -> Self {
        self.parallel = parallel;
        self.num_threads = num_threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let config = TreeWriterConfig::from_json_str(
            r#"{"branches": [{"input_array": "Delphes/allParticles", "branch_name": "Particle", "class_name": "GenParticle"}]}"#,
        )
        .unwrap();

        assert_eq!(config.branches, vec![BranchConfig::new("Delphes/allParticles", "Particle", "GenParticle")]);
        assert!(config.parallel);
        assert_eq!(config.num_threads, 0);
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(TreeWriterConfig::from_json_str("{branches: 3").is_err());
    }

    #[test]
    fn test_card_keeps_order_and_skips_noise() {
        let card = "\
# a comment line
module TreeWriter TreeWriter {
  add Branch Delphes/allParticles Particle GenParticle
  # add Branch Commented/out Nope Track
  add Branch TrackMerger/tracks Track Track   # trailing comment
  add Branch Broken/line Jet
  add Branch MissingET/momentum MissingET MissingET
}
";
        let config = TreeWriterConfig::from_card_str(card).unwrap();
        let names: Vec<&str> = config.branches.iter().map(|b| b.branch_name.as_str()).collect();
        assert_eq!(names, vec!["Particle", "Track", "MissingET"]);
        assert_eq!(config.branches[1].input_array, "TrackMerger/tracks");
    }

    #[test]
    fn test_builder() {
        let config = TreeWriterConfig::default()
            .add_branch("a", "A", "Track")
            .with_threads(false, 4);
        assert_eq!(config.branches.len(), 1);
        assert!(!config.parallel);
        assert_eq!(config.num_threads, 4);
    }
}
