use std::fs;
use std::path::{Path, PathBuf};

use nodeproc::config::{PipelineConfig, PipelinePaths};
use nodeproc::pipeline::Orchestrator;
use tempfile::TempDir;

/// Temporary `<root>/nodes` + `<root>/hb` layout.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("nodes")).unwrap();
        fs::create_dir_all(root.path().join("hb").join("output")).unwrap();
        Self { root }
    }

    pub fn base(&self) -> PathBuf {
        self.root.path().join("hb")
    }

    pub fn nodes(&self) -> PathBuf {
        self.root.path().join("nodes")
    }

    pub fn output(&self) -> PathBuf {
        self.base().join("output")
    }

    pub fn write_node(&self, name: &str, content: &str) {
        fs::write(self.nodes().join(name), content).unwrap();
    }

    pub fn orchestrator(&self) -> Orchestrator {
        self.orchestrator_with(&PipelineConfig::default())
    }

    pub fn orchestrator_with(&self, config: &PipelineConfig) -> Orchestrator {
        Orchestrator::new(PipelinePaths::from_base(&self.base()), config)
    }

    pub fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.output().join(name)).unwrap()
    }
}

/// Names of the `.txt` files in `dir`, sorted.
pub fn txt_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".txt"))
        .collect();
    names.sort();
    names
}
