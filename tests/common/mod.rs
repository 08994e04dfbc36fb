#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

pub fn lovescale_cmd() -> Command {
    let mut cmd = Command::cargo_bin("lovescale").unwrap();
    cmd.env_remove("LOVESCALE_ROOT");
    cmd.env_remove("LOVESCALE_LOG");
    cmd
}

/// Initialize a journal in `root` and replace its lexicon with a small one
pub fn init_with_small_lexicon(root: &Path) {
    lovescale_cmd().arg("init").arg(root).assert().success();
    fs::write(
        root.join(".lovescale/lexicon.toml"),
        "positive = [\"행복\"]\nnegative = [\"힘들\"]\nneg_prefix = [\"안 \"]\n",
    )
    .unwrap();
}
