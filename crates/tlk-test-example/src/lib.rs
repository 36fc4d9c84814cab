use std::path::PathBuf;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

pub fn demos_root() -> PathBuf {
    workspace_root().join("demos").join("npcs")
}

pub fn npc_dir(name: &str) -> PathBuf {
    demos_root().join(name)
}

pub fn script_path(name: &str) -> PathBuf {
    npc_dir(name).join("script.json")
}

pub fn testcase_path(name: &str) -> PathBuf {
    npc_dir(name).join("testcase.json")
}
