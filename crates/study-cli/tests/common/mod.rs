use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// `study` binary run inside `dir`, isolated from the caller's environment
pub fn study_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("study").unwrap();
    cmd.current_dir(dir);
    cmd.env_remove("STUDY_CONFIG");
    cmd.env_remove("STUDY_DATABASE");
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

/// Create a folder holding the given files
pub fn material_folder(root: &Path, name: &str, files: &[&str]) -> PathBuf {
    let folder = root.join(name);
    fs::create_dir_all(&folder).unwrap();
    for file in files {
        fs::write(folder.join(file), b"%PDF-1.4").unwrap();
    }
    folder
}
