//! Test utilities for requirecat

use tempfile::TempDir;
use std::fs;

/// Create a repository with a specific file structure
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    
    for (path, content) in structure {
        let full_path = root.join(path);
        
        // Create parent directories if needed
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        
        fs::write(&full_path, content).unwrap();
    }
    
    temp_dir
}
