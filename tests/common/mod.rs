//! Common test utilities for Stackforge integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch area with a manifests directory and an install root
#[allow(dead_code)]
pub struct TestSpace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to the scratch root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestSpace {
    /// Create a new test space with an empty manifests directory
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        std::fs::create_dir_all(path.join("manifests")).expect("Failed to create manifests dir");
        Self { temp, path }
    }

    /// The manifests directory
    pub fn manifests_dir(&self) -> PathBuf {
        self.path.join("manifests")
    }

    /// An install root path (not created; the engine creates it on demand)
    pub fn install_root(&self) -> PathBuf {
        self.path.join("root")
    }

    /// Write a manifest file into the manifests directory
    pub fn write_manifest(&self, name: &str, content: &str) {
        std::fs::write(self.manifests_dir().join(name), content)
            .expect("Failed to write manifest");
    }

    /// Check if a path exists relative to the scratch root
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

/// A minimal valid manifest with a name-only base software source
#[allow(dead_code)]
pub const MINIMAL_MANIFEST: &str = r#"{
    "schemaVersion": "1",
    "baseSoftware": { "name": "DemoApp", "target": "App" }
}"#;

/// A manifest exercising models, steps, and VRAM profiles
#[allow(dead_code)]
pub const FULL_MANIFEST: &str = r#"{
    "schemaVersion": "1",
    "id": "demo",
    "title": "Demo Stack",
    "baseSoftware": {
        "name": "DemoApp",
        "repositoryUrl": "https://example.invalid/demo-app.git",
        "target": "App"
    },
    "dependencies": {
        "python": "3.11",
        "pipRequirements": [
            { "relativeTo": "baseSoftware.target", "path": "requirements.txt" }
        ]
    },
    "vramProfiles": [
        { "id": "8gb", "label": "8 GB", "ggufPreference": ["Q4"] },
        { "id": "16gb", "label": "16 GB", "ggufPreference": ["Q8"] }
    ],
    "models": [
        {
            "name": "weights",
            "source": "url",
            "url": "https://example.invalid/weights.safetensors",
            "target": "App/models"
        }
    ],
    "extensions": [
        {
            "name": "manager",
            "repository": "https://example.invalid/manager.git",
            "target": "App/extensions/manager"
        }
    ],
    "optionalSteps": [
        { "id": "a", "description": "warm caches", "shell": "true", "enabledByDefault": true },
        { "id": "b", "description": "benchmark", "shell": "true", "enabledByDefault": false }
    ]
}"#;
